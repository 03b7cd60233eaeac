//! Input/Output operations for AAT calculations
//!
//! This module handles logging setup, snapshot archive loading and the
//! plain-text tensor report.

mod output;
mod snapshot_loader;

pub use output::{setup_output, write_tensor_report};
pub use snapshot_loader::load_archive;
