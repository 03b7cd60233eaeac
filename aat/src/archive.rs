//! Serialized snapshot sets
//!
//! An archive holds everything one tensor assembly consumes: the AO basis
//! sets of every perturbed geometry and, per perturbed condition, the MO
//! coefficients, orbital counts and (for correlated methods) the reference
//! weight and doubles amplitudes. YAML and JSON encodings are supported.
//!
//! ```yaml
//! n_atoms: 1
//! basis_sets:
//!   - name: ref
//!     shells:
//!       - center: [0.0, 0.0, 0.0]
//!         nwchem: |
//!           H    S
//!                 3.42525091             0.15432897
//! nuclear_plus:
//!   - basis: ref
//!     coefficients: [[1.0]]
//!     n_occupied: 1
//! ```

use crate::error::{AatError, Result};
use crate::fd_impl::PerturbedSnapshots;
use crate::wavefunction_impl::{
    CorrelatedSnapshot, DoublesAmplitudes, OrbitalSet, ReferenceSnapshot, Snapshot, Wavefunction,
};
use basis::{BasisSet, ContractedGTO};
use nalgebra::{DMatrix, Vector3};
use num_complex::Complex64;
use periodic_table_on_an_enum::Element;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomRecord {
    pub element: String,
    pub coords: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShellRecord {
    /// NWChem shell block placed on `center`
    Nwchem { center: [f64; 3], nwchem: String },
    /// one contracted Cartesian Gaussian
    Cartesian {
        center: [f64; 3],
        l_xyz: [i32; 3],
        exponents: Vec<f64>,
        coefficients: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisRecord {
    pub name: String,
    pub shells: Vec<ShellRecord>,
}

/// Flat row-major `(i, j, a, b)` amplitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeRecord {
    pub real: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imag: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// name of an entry of `basis_sets`
    pub basis: String,
    /// real part, one row per AO
    pub coefficients: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficients_imag: Option<Vec<Vec<f64>>>,
    pub n_occupied: usize,
    #[serde(default)]
    pub n_frozen: usize,
    /// [re, im]; 1 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_weight: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doubles: Option<AmplitudeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotArchive {
    pub n_atoms: usize,
    #[serde(default)]
    pub atoms: Vec<AtomRecord>,
    pub basis_sets: Vec<BasisRecord>,
    pub nuclear_plus: Vec<SnapshotRecord>,
    pub nuclear_minus: Vec<SnapshotRecord>,
    pub field_plus: Vec<SnapshotRecord>,
    pub field_minus: Vec<SnapshotRecord>,
}

fn invalid(context: &str, message: impl std::fmt::Display) -> AatError {
    AatError::InvalidConfiguration(format!("{}: {}", context, message))
}

impl ShellRecord {
    fn functions(&self) -> std::result::Result<Vec<ContractedGTO>, String> {
        match self {
            ShellRecord::Nwchem { center, nwchem } => {
                ContractedGTO::parse_nwchem(nwchem, Vector3::from(*center))
            }
            ShellRecord::Cartesian {
                center,
                l_xyz,
                exponents,
                coefficients,
            } => {
                if exponents.len() != coefficients.len() {
                    return Err(format!(
                        "{} exponents but {} coefficients",
                        exponents.len(),
                        coefficients.len()
                    ));
                }
                Ok(vec![ContractedGTO::new(
                    "cartesian",
                    Vector3::from(*center),
                    Vector3::from(*l_xyz),
                    exponents,
                    coefficients,
                )])
            }
        }
    }

    fn from_function(function: &ContractedGTO) -> Self {
        let l_xyz = function
            .primitives
            .first()
            .map(|p| [p.l_xyz.x, p.l_xyz.y, p.l_xyz.z])
            .unwrap_or([0, 0, 0]);
        let center = function.center();
        ShellRecord::Cartesian {
            center: [center.x, center.y, center.z],
            l_xyz,
            exponents: function.primitives.iter().map(|p| p.alpha).collect(),
            coefficients: function.coefficients.clone(),
        }
    }
}

impl BasisRecord {
    pub fn from_basis_set(basis: &BasisSet) -> Self {
        BasisRecord {
            name: basis.name.clone(),
            shells: basis.functions.iter().map(ShellRecord::from_function).collect(),
        }
    }

    fn build(&self) -> Result<BasisSet> {
        let context = format!("basis set '{}'", self.name);
        let mut functions = Vec::new();
        for shell in &self.shells {
            functions.extend(shell.functions().map_err(|e| invalid(&context, e))?);
        }
        Ok(BasisSet::new(&self.name, functions))
    }
}

fn matrix_from_rows(rows: &[Vec<f64>], context: &str) -> Result<DMatrix<f64>> {
    let ncols = rows.first().map_or(0, |r| r.len());
    if let Some(bad) = rows.iter().position(|r| r.len() != ncols) {
        return Err(invalid(
            context,
            format!("coefficient row {} has {} entries, expected {}", bad, rows[bad].len(), ncols),
        ));
    }
    Ok(DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

impl SnapshotRecord {
    /// Encodes a snapshot whose basis is stored under `basis` in the archive.
    pub fn from_snapshot<W: Wavefunction>(snapshot: &W, basis: &str) -> Self {
        let orbitals = snapshot.orbitals();
        let c = &orbitals.coefficients;
        let rows = |part: fn(&Complex64) -> f64| -> Vec<Vec<f64>> {
            (0..c.nrows())
                .map(|i| (0..c.ncols()).map(|j| part(&c[(i, j)])).collect())
                .collect()
        };
        let imag = rows(|z| z.im);
        let has_imag = imag.iter().flatten().any(|v| *v != 0.0);
        let weight = snapshot.reference_weight();

        SnapshotRecord {
            basis: basis.to_string(),
            coefficients: rows(|z| z.re),
            coefficients_imag: has_imag.then_some(imag),
            n_occupied: orbitals.n_occupied,
            n_frozen: orbitals.n_frozen,
            reference_weight: snapshot.doubles().map(|_| [weight.re, weight.im]),
            doubles: snapshot.doubles().map(|t| AmplitudeRecord {
                real: t.as_slice().iter().map(|z| z.re).collect(),
                imag: Some(t.as_slice().iter().map(|z| z.im).collect()),
            }),
        }
    }

    fn build(&self, bases: &HashMap<String, Arc<BasisSet>>, context: &str) -> Result<Snapshot> {
        let basis = bases
            .get(&self.basis)
            .cloned()
            .ok_or_else(|| invalid(context, format!("unknown basis set '{}'", self.basis)))?;

        let real = matrix_from_rows(&self.coefficients, context)?;
        let coefficients = match &self.coefficients_imag {
            None => real.map(|re| Complex64::new(re, 0.0)),
            Some(rows) => {
                let imag = matrix_from_rows(rows, context)?;
                if imag.shape() != real.shape() {
                    return Err(invalid(
                        context,
                        format!(
                            "imaginary coefficients {:?} do not match real coefficients {:?}",
                            imag.shape(),
                            real.shape()
                        ),
                    ));
                }
                real.zip_map(&imag, Complex64::new)
            }
        };
        let orbitals = OrbitalSet::new(coefficients, basis, self.n_occupied, self.n_frozen)
            .map_err(|e| invalid(context, e))?;

        let Some(doubles) = &self.doubles else {
            return Ok(ReferenceSnapshot::new(orbitals).into());
        };
        let imag = doubles
            .imag
            .clone()
            .unwrap_or_else(|| vec![0.0; doubles.real.len()]);
        if imag.len() != doubles.real.len() {
            return Err(invalid(context, "real and imaginary amplitudes differ in length"));
        }
        let data = doubles
            .real
            .iter()
            .zip(imag.iter())
            .map(|(&re, &im)| Complex64::new(re, im))
            .collect();
        let amplitudes =
            DoublesAmplitudes::from_vec(orbitals.n_active_occupied(), orbitals.n_virtual(), data)
                .map_err(|e| invalid(context, e))?;
        let weight = self
            .reference_weight
            .map_or(Complex64::new(1.0, 0.0), |[re, im]| Complex64::new(re, im));

        Ok(CorrelatedSnapshot::new(orbitals, weight, amplitudes)
            .map_err(|e| invalid(context, e))?
            .into())
    }
}

impl SnapshotArchive {
    pub fn from_yaml(input: &str) -> Result<Self> {
        serde_yml::from_str(input).map_err(|e| invalid("snapshot archive", e))
    }

    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| invalid("snapshot archive", e))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(self).map_err(|e| invalid("snapshot archive", e))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| invalid("snapshot archive", e))
    }

    /// Element symbols of the atoms, validated against the periodic table.
    pub fn elements(&self) -> Result<Vec<Element>> {
        self.atoms
            .iter()
            .map(|atom| {
                Element::from_symbol(&atom.element)
                    .ok_or_else(|| invalid("atoms", format!("invalid element symbol '{}'", atom.element)))
            })
            .collect()
    }

    /// Decodes every basis set and snapshot. Snapshots sharing a basis name
    /// share one `BasisSet`.
    pub fn to_snapshots(&self) -> Result<PerturbedSnapshots<Snapshot>> {
        if !self.atoms.is_empty() && self.atoms.len() != self.n_atoms {
            return Err(invalid(
                "atoms",
                format!("{} atoms listed for n_atoms = {}", self.atoms.len(), self.n_atoms),
            ));
        }
        self.elements()?;

        let mut bases = HashMap::new();
        for record in &self.basis_sets {
            if bases
                .insert(record.name.clone(), Arc::new(record.build()?))
                .is_some()
            {
                return Err(invalid("basis_sets", format!("duplicate name '{}'", record.name)));
            }
        }

        let group = |name: &str, records: &[SnapshotRecord]| -> Result<Vec<Snapshot>> {
            records
                .iter()
                .enumerate()
                .map(|(k, r)| r.build(&bases, &format!("{}[{}]", name, k)))
                .collect()
        };

        Ok(PerturbedSnapshots {
            n_atoms: self.n_atoms,
            nuclear_plus: group("nuclear_plus", &self.nuclear_plus)?,
            nuclear_minus: group("nuclear_minus", &self.nuclear_minus)?,
            field_plus: group("field_plus", &self.field_plus)?,
            field_minus: group("field_minus", &self.field_minus)?,
        })
    }

    /// Encodes a snapshot set. Each distinct basis set is stored once;
    /// same-named basis sets whose shells differ (displaced geometries)
    /// are stored under `name#k`.
    pub fn from_snapshots<W: Wavefunction>(
        snapshots: &PerturbedSnapshots<W>,
        atoms: Vec<AtomRecord>,
    ) -> Self {
        let mut catalog = BasisCatalog::default();
        let mut encode = |group: &[W]| -> Vec<SnapshotRecord> {
            group
                .iter()
                .map(|s| SnapshotRecord::from_snapshot(s, &catalog.store(&s.orbitals().basis)))
                .collect()
        };
        let nuclear_plus = encode(&snapshots.nuclear_plus);
        let nuclear_minus = encode(&snapshots.nuclear_minus);
        let field_plus = encode(&snapshots.field_plus);
        let field_minus = encode(&snapshots.field_minus);

        SnapshotArchive {
            n_atoms: snapshots.n_atoms,
            atoms,
            basis_sets: catalog.records,
            nuclear_plus,
            nuclear_minus,
            field_plus,
            field_minus,
        }
    }
}

/// Basis records keyed by content, for writing archives.
#[derive(Default)]
struct BasisCatalog {
    records: Vec<BasisRecord>,
    /// name each stored record was requested under
    origins: Vec<String>,
}

impl BasisCatalog {
    /// Returns the archive name under which `basis` is stored.
    fn store(&mut self, basis: &BasisSet) -> String {
        let mut record = BasisRecord::from_basis_set(basis);
        if let Some(k) = self
            .records
            .iter()
            .zip(&self.origins)
            .position(|(stored, origin)| *origin == basis.name && stored.shells == record.shells)
        {
            return self.records[k].name.clone();
        }

        let taken = |name: &str| self.records.iter().any(|r| r.name == name);
        if taken(record.name.as_str()) {
            record.name = (1..)
                .map(|k| format!("{}#{}", basis.name, k))
                .find(|name| !taken(name.as_str()))
                .unwrap_or_default();
        }
        let name = record.name.clone();
        self.records.push(record);
        self.origins.push(basis.name.clone());
        name
    }
}
