//! Atomic axial tensors (AATs) from finite differences of wavefunction
//! overlaps between nuclear-displaced and field-perturbed snapshots.

pub mod archive;
pub mod coupling_impl;
pub mod determinant_impl;
pub mod dispatch_impl;
pub mod error;
pub mod fd_impl;
pub mod overlap_impl;
pub mod wavefunction_impl;

#[cfg(test)]
mod archive_test;
#[cfg(test)]
mod test_utils;

pub use archive::SnapshotArchive;
pub use coupling_impl::{CouplingBlocks, ExcitationSpace, LoopStrategy};
pub use determinant_impl::{determinant_overlap, factorized_overlap, Excitation, SpinLabel};
pub use dispatch_impl::{Dispatcher, ExecutionMode};
pub use error::{AatError, Result};
pub use fd_impl::{
    compute_aat, AatOptions, AatResult, AatTensor, ChannelTensors, ElementIndex, FourPoint,
    PerturbedSnapshots, SignCombination,
};
pub use overlap_impl::{mo_overlap, AoOverlapProvider, GaussianOverlap, OrbitalRepresentation};
pub use wavefunction_impl::{
    CorrelatedSnapshot, DoublesAmplitudes, Method, Normalization, OrbitalSet, ReferenceSnapshot,
    Snapshot, Wavefunction,
};
