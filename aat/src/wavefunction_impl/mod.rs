//! Wavefunction snapshots consumed by the tensor assembly
//!
//! A snapshot is the converged state of the electronic structure solver at
//! one perturbed condition (a displaced nucleus or an applied field). It is
//! created once, never mutated, and shared read-only by every stage.
//!
//! # Amplitude convention
//!
//! Doubles amplitudes are stored in spatial-orbital form, `t[i,j,a,b]` being
//! the coefficient of the determinant with `i→a` in the α string and `j→b`
//! in the β string. Closed-shell symmetry gives `t[i,j,a,b] = t[j,i,b,a]`.
//! The intermediate-normalized wavefunction reads
//!
//! |Ψ> = c0 |0> + 1/4 Σ_{IJAB} t_{IJ}^{AB} |Φ_{IJ}^{AB}>
//!
//! with the spin-orbital amplitudes `t_{IJ}^{AB}` derived from the spatial
//! ones, see [`DoublesAmplitudes::to_spin_orbital`].

mod amplitudes;
mod wavefunction;

pub use amplitudes::DoublesAmplitudes;
pub use wavefunction::{
    CorrelatedSnapshot, Method, Normalization, OrbitalSet, ReferenceSnapshot, Snapshot,
    Wavefunction,
};
