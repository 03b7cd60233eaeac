use crate::error::{AatError, Result};
use crate::wavefunction_impl::OrbitalSet;
use basis::{overlap_matrix, BasisSet};
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Source of AO overlap integrals for a pair of basis sets.
pub trait AoOverlapProvider: Send + Sync {
    fn ao_overlap(&self, bra: &BasisSet, ket: &BasisSet) -> DMatrix<f64>;
}

/// Analytic overlaps of contracted Cartesian Gaussians.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianOverlap;

impl AoOverlapProvider for GaussianOverlap {
    fn ao_overlap(&self, bra: &BasisSet, ket: &BasisSet) -> DMatrix<f64> {
        overlap_matrix(bra, ket)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitalRepresentation {
    /// Unified spin orbitals, one determinant per overlap.
    SpinOrbital,
    /// Spatial orbitals with the α and β determinants factorized.
    Spatial,
}

impl OrbitalRepresentation {
    /// Number of determinant rows per occupied spatial orbital.
    pub fn spin_factor(&self) -> usize {
        match self {
            OrbitalRepresentation::SpinOrbital => 2,
            OrbitalRepresentation::Spatial => 1,
        }
    }
}

impl FromStr for OrbitalRepresentation {
    type Err = AatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spin" => Ok(OrbitalRepresentation::SpinOrbital),
            "spatial" => Ok(OrbitalRepresentation::Spatial),
            other => Err(AatError::InvalidConfiguration(format!(
                "unknown orbital representation '{}' (expected spin or spatial)",
                other
            ))),
        }
    }
}

impl fmt::Display for OrbitalRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrbitalRepresentation::SpinOrbital => write!(f, "spin"),
            OrbitalRepresentation::Spatial => write!(f, "spatial"),
        }
    }
}

fn check_shapes(bra: &DMatrix<Complex64>, ket: &DMatrix<Complex64>) -> Result<()> {
    if bra.shape() != ket.shape() {
        return Err(AatError::DimensionMismatch {
            bra: bra.shape(),
            ket: ket.shape(),
        });
    }
    Ok(())
}

/// MO overlap from precomputed AO integrals. `s_ao` rows follow the bra AO
/// basis, columns the ket AO basis.
pub fn mo_overlap_from_ao(
    bra: &DMatrix<Complex64>,
    ket: &DMatrix<Complex64>,
    s_ao: &DMatrix<f64>,
    representation: OrbitalRepresentation,
) -> Result<DMatrix<Complex64>> {
    check_shapes(bra, ket)?;
    if s_ao.shape() != (bra.nrows(), ket.nrows()) {
        return Err(AatError::DimensionMismatch {
            bra: s_ao.shape(),
            ket: (bra.nrows(), ket.nrows()),
        });
    }

    let s_ao = s_ao.map(|s| Complex64::new(s, 0.0));
    let s_mo = bra.adjoint() * s_ao * ket;

    Ok(match representation {
        OrbitalRepresentation::Spatial => s_mo,
        OrbitalRepresentation::SpinOrbital => spin_block(&s_mo),
    })
}

/// MO overlap between two orbital sets, fetching the mixed AO integrals
/// from `provider`.
pub fn mo_overlap(
    bra: &OrbitalSet,
    ket: &OrbitalSet,
    provider: &dyn AoOverlapProvider,
    representation: OrbitalRepresentation,
) -> Result<DMatrix<Complex64>> {
    check_shapes(&bra.coefficients, &ket.coefficients)?;
    trace!(
        "MO overlap <{}|{}> in {} representation",
        bra.basis.name,
        ket.basis.name,
        representation
    );
    let s_ao = provider.ao_overlap(&bra.basis, &ket.basis);
    mo_overlap_from_ao(&bra.coefficients, &ket.coefficients, &s_ao, representation)
}

/// Interleaved spin-orbital expansion: S_so[p,q] = S[p/2,q/2] if p and q
/// carry the same spin, zero otherwise.
pub fn spin_block(s: &DMatrix<Complex64>) -> DMatrix<Complex64> {
    DMatrix::from_fn(2 * s.nrows(), 2 * s.ncols(), |p, q| {
        if p % 2 == q % 2 {
            s[(p / 2, q / 2)]
        } else {
            Complex64::new(0.0, 0.0)
        }
    })
}
