use super::finite_difference::Sign;
use crate::error::{AatError, Result};
use crate::wavefunction_impl::{Method, Wavefunction};

/// The perturbed snapshots of one tensor assembly: `3 · n_atoms` nuclear
/// displacements and 3 field directions, each at both signs.
#[derive(Debug, Clone)]
pub struct PerturbedSnapshots<W> {
    pub n_atoms: usize,
    pub nuclear_plus: Vec<W>,
    pub nuclear_minus: Vec<W>,
    pub field_plus: Vec<W>,
    pub field_minus: Vec<W>,
}

impl<W> PerturbedSnapshots<W> {
    pub fn nuclear(&self, coordinate: usize, sign: Sign) -> &W {
        match sign {
            Sign::Plus => &self.nuclear_plus[coordinate],
            Sign::Minus => &self.nuclear_minus[coordinate],
        }
    }

    pub fn field(&self, direction: usize, sign: Sign) -> &W {
        match sign {
            Sign::Plus => &self.field_plus[direction],
            Sign::Minus => &self.field_minus[direction],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &W> {
        self.nuclear_plus
            .iter()
            .chain(self.nuclear_minus.iter())
            .chain(self.field_plus.iter())
            .chain(self.field_minus.iter())
    }

    pub fn try_map<'s, U, F>(&'s self, mut f: F) -> Result<PerturbedSnapshots<U>>
    where
        F: FnMut(&'s W) -> Result<U>,
    {
        let mut convert = |v: &'s [W]| v.iter().map(&mut f).collect::<Result<Vec<U>>>();
        Ok(PerturbedSnapshots {
            n_atoms: self.n_atoms,
            nuclear_plus: convert(&self.nuclear_plus)?,
            nuclear_minus: convert(&self.nuclear_minus)?,
            field_plus: convert(&self.field_plus)?,
            field_minus: convert(&self.field_minus)?,
        })
    }
}

impl<W: Wavefunction> PerturbedSnapshots<W> {
    /// Counts, variant and orbital partitioning must be consistent across
    /// the whole set.
    pub fn validate(&self, method: Method) -> Result<()> {
        if self.n_atoms == 0 {
            return Err(AatError::InvalidConfiguration(
                "snapshot set describes zero atoms".to_string(),
            ));
        }
        let expected_nuclear = 3 * self.n_atoms;
        for (name, len, expected) in [
            ("nuclear_plus", self.nuclear_plus.len(), expected_nuclear),
            ("nuclear_minus", self.nuclear_minus.len(), expected_nuclear),
            ("field_plus", self.field_plus.len(), 3),
            ("field_minus", self.field_minus.len(), 3),
        ] {
            if len != expected {
                return Err(AatError::InvalidConfiguration(format!(
                    "{} holds {} snapshots, expected {}",
                    name, len, expected
                )));
            }
        }

        let Some(first) = self.iter().next() else {
            return Err(AatError::InvalidConfiguration("empty snapshot set".to_string()));
        };
        let n_occupied = first.orbitals().n_occupied;
        let n_frozen = first.orbitals().n_frozen;
        let amplitude_shape = first.doubles().map(|t| t.shape());

        for (k, snapshot) in self.iter().enumerate() {
            if snapshot.is_correlated() != method.is_correlated() {
                return Err(AatError::InvalidConfiguration(format!(
                    "snapshot {} is {} but method {} needs {} snapshots",
                    k,
                    if snapshot.is_correlated() { "correlated" } else { "uncorrelated" },
                    method,
                    if method.is_correlated() { "correlated" } else { "uncorrelated" },
                )));
            }
            let orbitals = snapshot.orbitals();
            if orbitals.n_occupied != n_occupied || orbitals.n_frozen != n_frozen {
                return Err(AatError::InvalidConfiguration(format!(
                    "snapshot {} has {} occupied / {} frozen orbitals, expected {} / {}",
                    k, orbitals.n_occupied, orbitals.n_frozen, n_occupied, n_frozen
                )));
            }
            if snapshot.doubles().map(|t| t.shape()) != amplitude_shape {
                return Err(AatError::InvalidConfiguration(format!(
                    "snapshot {} has doubles of shape {:?}, expected {:?}",
                    k,
                    snapshot.doubles().map(|t| t.shape()),
                    amplitude_shape
                )));
            }
        }
        Ok(())
    }
}
