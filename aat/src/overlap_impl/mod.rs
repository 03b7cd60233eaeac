//! MO overlap matrices between two snapshots
//!
//! The bra and ket generally live on different geometries (a displaced
//! nucleus against a field-perturbed reference), so the AO overlap is the
//! mixed-basis matrix S_{μν} = <χ_μ(bra)|χ_ν(ket)>, and
//!
//! S_MO = C_bra† · S_AO · C_ket
//!
//! In the spin-orbital representation each spatial MO `p` becomes the pair
//! `2p` (α) and `2p + 1` (β) and cross-spin elements vanish.

mod overlap;

pub use overlap::{
    mo_overlap, mo_overlap_from_ao, spin_block, AoOverlapProvider, GaussianOverlap,
    OrbitalRepresentation,
};
