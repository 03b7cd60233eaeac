//! Coupling blocks between a bra and a ket wavefunction
//!
//! With |Ψ> = c0 |0> + |D>, the overlap <Ψ_bra|Ψ_ket> splits into four
//! blocks: <0|0>, <0|D>, <D|0> and <D|D>. Each block is a sum over
//! excitation pairs (i→a, j→b) of amplitude products times determinant
//! overlaps.
//!
//! # Spatial-orbital form
//!
//! A closed-shell doubles manifold expands per pair as
//!
//! |D_ij^ab> = 1/4 A (|αα> + |ββ>) + 1/2 t (|α(ia)β(jb)> + |α(jb)β(ia)>)
//!
//! with `A = t[i,j,a,b] - t[i,j,b,a]`. Because the α and β determinants
//! share one MO overlap, <0|D> collapses to 1/2 A <0|αα> + t <0|αβ> and
//! <D|D> carries the channel weights 1/8 (αα/αα, αα/ββ), 1/2 (αα/αβ,
//! αβ/αα) and 1 (αβ/αβ). Flipping every spin on both sides maps the
//! expansion onto itself, so only the αα and α(ia)β(jb) bra terms are
//! evaluated and their sum is doubled.
//!
//! # Spin-orbital form
//!
//! |D> = 1/4 Σ_{IJAB} t_IJ^AB |Φ_IJ^AB>, so <0|D> carries 1/4 and <D|D>
//! carries 1/16.
//!
//! # Loop strategies
//!
//! The per-pair expansions are symmetric under (ia) ↔ (jb), so summing over
//! unique pairs `ia ≥ jb` with multiplicity `2 / (1 + δ)` equals the sum
//! over every ordered pair.

mod coupling;
mod pairs;

pub use coupling::{CouplingBlocks, ExcitationSpace};
pub use pairs::{ExcitationPair, LoopStrategy};
