//! Finite-difference assembly of the atomic axial tensor
//!
//! Each element couples a nuclear displacement (bra, real orbitals) with a
//! magnetic field perturbation (ket, complex orbitals):
//!
//! AAT[R, B] = Im <∂Ψ/∂R | ∂Ψ/∂B>
//!           ≈ Im [f(+,+) - f(+,-) - f(-,+) + f(-,-)] / (4 ΔR ΔB)
//!
//! where f(σ_R, σ_B) = <Ψ(R + σ_R ΔR)|Ψ(B + σ_B ΔB)>. The four overlaps must
//! come from phase-aligned orbitals; that is the solver's responsibility.
//!
//! Every element walks through [`ElementStage`]; the double↔double block of
//! correlated methods is handed to the dispatcher as self-contained tasks.

mod driver;
mod finite_difference;
mod options;
mod snapshots;

pub use driver::{compute_aat, AatResult, AatTensor, ChannelTensors, ElementStage};
pub use finite_difference::{ElementIndex, FourPoint, Sign, SignCombination};
pub use options::AatOptions;
pub use snapshots::PerturbedSnapshots;
