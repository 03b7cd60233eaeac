//! Gaussian AO basis functions and their overlap integrals.

pub mod basis;
pub mod cgto;
pub mod gto;

#[cfg(test)]
mod helper;

pub use basis::{overlap_matrix, Basis, BasisSet};
pub use cgto::ContractedGTO;
pub use gto::{GTO, GTO1d};
