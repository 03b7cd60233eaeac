//! Overlaps between (excited) Slater determinants built on two
//! non-orthogonal MO sets
//!
//! For determinants of occupied orbitals the overlap is det(S_oo). An
//! excitation i→a on the bra replaces MO row `i` by row `a`; on the ket it
//! replaces column `i` by column `a`. The overlap of the excited
//! determinants is the determinant of the leading occupied block after all
//! substitutions have been applied.

mod determinant;
#[cfg(test)]
mod tests;

pub use determinant::{
    determinant_overlap, factorized_overlap, Excitation, SpinLabel, SpinResolvedExcitation,
};
