use super::amplitudes::DoublesAmplitudes;
use crate::error::{AatError, Result};
use basis::BasisSet;
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Electronic structure method that produced the snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    HartreeFock,
    Cid,
    Mp2,
}

impl Method {
    pub fn is_correlated(&self) -> bool {
        !matches!(self, Method::HartreeFock)
    }
}

impl FromStr for Method {
    type Err = AatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hf" | "rhf" => Ok(Method::HartreeFock),
            "cid" => Ok(Method::Cid),
            "mp2" => Ok(Method::Mp2),
            other => Err(AatError::InvalidConfiguration(format!(
                "unknown method '{}' (expected hf, rhf, cid or mp2)",
                other
            ))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::HartreeFock => write!(f, "RHF"),
            Method::Cid => write!(f, "CID"),
            Method::Mp2 => write!(f, "MP2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Rescale the correlated wavefunction to unit norm.
    Full,
    /// Use the reference weight and amplitudes as delivered (c0 = 1 for
    /// intermediate-normalized solvers).
    Intermediate,
}

impl Normalization {
    /// Factor applied to both the reference weight and the amplitudes.
    pub fn scale_factor(&self, reference_weight: Complex64, doubles: &DoublesAmplitudes) -> Result<f64> {
        match self {
            Normalization::Intermediate => Ok(1.0),
            Normalization::Full => {
                let norm_squared = reference_weight.norm_sqr() + doubles.norm_squared();
                if norm_squared <= 0.0 || !norm_squared.is_finite() {
                    return Err(AatError::InvalidConfiguration(format!(
                        "cannot normalize a wavefunction with squared norm {}",
                        norm_squared
                    )));
                }
                Ok(1.0 / norm_squared.sqrt())
            }
        }
    }
}

impl FromStr for Normalization {
    type Err = AatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Normalization::Full),
            "intermediate" => Ok(Normalization::Intermediate),
            other => Err(AatError::InvalidConfiguration(format!(
                "unknown normalization '{}' (expected full or intermediate)",
                other
            ))),
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Normalization::Full => write!(f, "full"),
            Normalization::Intermediate => write!(f, "intermediate"),
        }
    }
}

/// MO coefficients of one snapshot together with the AO basis they expand.
#[derive(Debug, Clone)]
pub struct OrbitalSet {
    /// rows: AO functions, columns: MOs
    pub coefficients: DMatrix<Complex64>,
    pub basis: Arc<BasisSet>,
    /// occupied spatial orbitals, frozen core included
    pub n_occupied: usize,
    pub n_frozen: usize,
}

impl OrbitalSet {
    pub fn new(
        coefficients: DMatrix<Complex64>,
        basis: Arc<BasisSet>,
        n_occupied: usize,
        n_frozen: usize,
    ) -> Result<Self> {
        if coefficients.nrows() != basis.len() {
            return Err(AatError::InvalidConfiguration(format!(
                "coefficient matrix has {} AO rows but basis '{}' has {} functions",
                coefficients.nrows(),
                basis.name,
                basis.len()
            )));
        }
        if n_occupied > coefficients.ncols() {
            return Err(AatError::InvalidConfiguration(format!(
                "{} occupied orbitals requested but only {} MOs available",
                n_occupied,
                coefficients.ncols()
            )));
        }
        if n_frozen > n_occupied {
            return Err(AatError::InvalidConfiguration(format!(
                "{} frozen orbitals exceed {} occupied orbitals",
                n_frozen, n_occupied
            )));
        }
        Ok(OrbitalSet {
            coefficients,
            basis,
            n_occupied,
            n_frozen,
        })
    }

    /// Real coefficients, as delivered for field-free snapshots.
    pub fn from_real(
        coefficients: &DMatrix<f64>,
        basis: Arc<BasisSet>,
        n_occupied: usize,
        n_frozen: usize,
    ) -> Result<Self> {
        let coefficients = coefficients.map(|c| Complex64::new(c, 0.0));
        Self::new(coefficients, basis, n_occupied, n_frozen)
    }

    pub fn n_ao(&self) -> usize {
        self.coefficients.nrows()
    }

    pub fn n_mo(&self) -> usize {
        self.coefficients.ncols()
    }

    pub fn n_virtual(&self) -> usize {
        self.n_mo() - self.n_occupied
    }

    pub fn n_active_occupied(&self) -> usize {
        self.n_occupied - self.n_frozen
    }
}

/// Capabilities shared by uncorrelated and correlated snapshots.
pub trait Wavefunction: Send + Sync {
    fn orbitals(&self) -> &OrbitalSet;

    /// Coefficient of the reference determinant.
    fn reference_weight(&self) -> Complex64;

    /// Doubles amplitudes, `None` for an uncorrelated wavefunction.
    fn doubles(&self) -> Option<&DoublesAmplitudes>;

    fn is_correlated(&self) -> bool {
        self.doubles().is_some()
    }
}

/// Single-determinant snapshot (RHF).
#[derive(Debug, Clone)]
pub struct ReferenceSnapshot {
    pub orbitals: OrbitalSet,
}

impl ReferenceSnapshot {
    pub fn new(orbitals: OrbitalSet) -> Self {
        ReferenceSnapshot { orbitals }
    }
}

impl Wavefunction for ReferenceSnapshot {
    fn orbitals(&self) -> &OrbitalSet {
        &self.orbitals
    }

    fn reference_weight(&self) -> Complex64 {
        Complex64::new(1.0, 0.0)
    }

    fn doubles(&self) -> Option<&DoublesAmplitudes> {
        None
    }
}

/// Reference determinant plus doubles (CID or MP2 first-order wavefunction).
#[derive(Debug, Clone)]
pub struct CorrelatedSnapshot {
    pub orbitals: OrbitalSet,
    pub reference_weight: Complex64,
    pub doubles: DoublesAmplitudes,
}

impl CorrelatedSnapshot {
    pub fn new(
        orbitals: OrbitalSet,
        reference_weight: Complex64,
        doubles: DoublesAmplitudes,
    ) -> Result<Self> {
        let expected = (orbitals.n_active_occupied(), orbitals.n_virtual());
        if (doubles.n_occ(), doubles.n_virt()) != expected {
            return Err(AatError::InvalidConfiguration(format!(
                "doubles amplitudes have shape {:?} but the orbitals imply ({}, {}, {}, {})",
                doubles.shape(),
                expected.0,
                expected.0,
                expected.1,
                expected.1
            )));
        }
        Ok(CorrelatedSnapshot {
            orbitals,
            reference_weight,
            doubles,
        })
    }

    /// Copy with reference weight and amplitudes rescaled per `mode`.
    pub fn normalized(&self, mode: Normalization) -> Result<Self> {
        let factor = mode.scale_factor(self.reference_weight, &self.doubles)?;
        Ok(CorrelatedSnapshot {
            orbitals: self.orbitals.clone(),
            reference_weight: self.reference_weight * factor,
            doubles: self.doubles.scaled(Complex64::new(factor, 0.0)),
        })
    }

    /// <Ψ|Ψ> = |c0|² + <D|D>
    pub fn norm_squared(&self) -> f64 {
        self.reference_weight.norm_sqr() + self.doubles.norm_squared()
    }
}

impl Wavefunction for CorrelatedSnapshot {
    fn orbitals(&self) -> &OrbitalSet {
        &self.orbitals
    }

    fn reference_weight(&self) -> Complex64 {
        self.reference_weight
    }

    fn doubles(&self) -> Option<&DoublesAmplitudes> {
        Some(&self.doubles)
    }
}

/// Either kind of snapshot, as decoded from an archive.
#[derive(Debug, Clone)]
pub enum Snapshot {
    Reference(ReferenceSnapshot),
    Correlated(CorrelatedSnapshot),
}

impl Wavefunction for Snapshot {
    fn orbitals(&self) -> &OrbitalSet {
        match self {
            Snapshot::Reference(s) => s.orbitals(),
            Snapshot::Correlated(s) => s.orbitals(),
        }
    }

    fn reference_weight(&self) -> Complex64 {
        match self {
            Snapshot::Reference(s) => s.reference_weight(),
            Snapshot::Correlated(s) => s.reference_weight(),
        }
    }

    fn doubles(&self) -> Option<&DoublesAmplitudes> {
        match self {
            Snapshot::Reference(s) => s.doubles(),
            Snapshot::Correlated(s) => s.doubles(),
        }
    }
}

impl From<ReferenceSnapshot> for Snapshot {
    fn from(s: ReferenceSnapshot) -> Self {
        Snapshot::Reference(s)
    }
}

impl From<CorrelatedSnapshot> for Snapshot {
    fn from(s: CorrelatedSnapshot) -> Self {
        Snapshot::Correlated(s)
    }
}
