//! AAT Calculation Command-Line Interface
//!
//! Reads a snapshot archive, evaluates the atomic axial tensor and reports it.

use color_eyre::eyre::Result;

mod app;
mod config;
mod io;

use app::AatApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    AatApplication::from_cli()?.run()
}
