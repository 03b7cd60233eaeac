use super::pairs::{ExcitationPair, LoopStrategy};
use crate::determinant_impl::{
    determinant_overlap, factorized_overlap, Excitation, SpinLabel, SpinResolvedExcitation,
};
use crate::error::{AatError, Result};
use crate::overlap_impl::OrbitalRepresentation;
use crate::wavefunction_impl::{DoublesAmplitudes, OrbitalSet};
use nalgebra::DMatrix;
use num_complex::Complex64;

/// Orbital partitioning of the determinants in one representation. In the
/// spin-orbital representation every count is doubled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcitationSpace {
    pub n_frozen: usize,
    /// occupied orbitals including the frozen core, i.e. the determinant width
    pub n_occupied: usize,
    pub n_virtual: usize,
}

impl ExcitationSpace {
    pub fn new(orbitals: &OrbitalSet, representation: OrbitalRepresentation) -> Self {
        let k = representation.spin_factor();
        ExcitationSpace {
            n_frozen: k * orbitals.n_frozen,
            n_occupied: k * orbitals.n_occupied,
            n_virtual: k * orbitals.n_virtual(),
        }
    }

    pub fn n_active(&self) -> usize {
        self.n_occupied - self.n_frozen
    }

    /// Absolute MO indices of the pair's substitution.
    fn excitation(&self, pair: &ExcitationPair) -> Excitation {
        Excitation::double(
            pair.i + self.n_frozen,
            pair.a + self.n_occupied,
            pair.j + self.n_frozen,
            pair.b + self.n_occupied,
        )
    }

    fn swapped_excitation(&self, pair: &ExcitationPair) -> Excitation {
        Excitation::double(
            pair.j + self.n_frozen,
            pair.b + self.n_occupied,
            pair.i + self.n_frozen,
            pair.a + self.n_occupied,
        )
    }
}

type Term = (Complex64, SpinResolvedExcitation);

/// Coupling blocks for one (bra, ket) overlap, i.e. one sign combination of
/// one tensor element. Amplitudes are expected in the representation's form
/// (spin-orbital amplitudes for [`OrbitalRepresentation::SpinOrbital`]).
pub struct CouplingBlocks<'a> {
    overlap: &'a DMatrix<Complex64>,
    representation: OrbitalRepresentation,
    space: ExcitationSpace,
    strategy: LoopStrategy,
}

impl<'a> CouplingBlocks<'a> {
    pub fn new(
        overlap: &'a DMatrix<Complex64>,
        representation: OrbitalRepresentation,
        space: ExcitationSpace,
        strategy: LoopStrategy,
    ) -> Self {
        CouplingBlocks {
            overlap,
            representation,
            space,
            strategy,
        }
    }

    fn determinant(&self, bra: &SpinResolvedExcitation, ket: &SpinResolvedExcitation) -> Result<Complex64> {
        match self.representation {
            OrbitalRepresentation::Spatial => {
                factorized_overlap(self.overlap, self.space.n_occupied, bra, ket)
            }
            OrbitalRepresentation::SpinOrbital => determinant_overlap(
                self.overlap,
                self.space.n_occupied,
                &bra.excitation,
                &ket.excitation,
            ),
        }
    }

    fn check_amplitudes(&self, t: &DoublesAmplitudes) -> Result<()> {
        if t.n_occ() != self.space.n_active() || t.n_virt() != self.space.n_virtual {
            return Err(AatError::InvalidConfiguration(format!(
                "amplitudes of shape {:?} do not fit {} active occupied and {} virtual {} orbitals",
                t.shape(),
                self.space.n_active(),
                self.space.n_virtual,
                self.representation
            )));
        }
        Ok(())
    }

    fn pairs(&self) -> Vec<ExcitationPair> {
        self.strategy
            .pairs(self.space.n_active(), self.space.n_virtual)
    }

    /// Determinants of one excitation pair against a reference partner,
    /// spin-reduced form.
    fn reference_coupled_terms(&self, pair: &ExcitationPair, t: &DoublesAmplitudes) -> Vec<Term> {
        let (i, j, a, b) = (pair.i, pair.j, pair.a, pair.b);
        let excitation = self.space.excitation(pair);
        match self.representation {
            OrbitalRepresentation::Spatial => vec![
                (
                    0.5 * t.antisymmetrized(i, j, a, b),
                    SpinResolvedExcitation::new(excitation, SpinLabel::Alpha),
                ),
                (
                    t[(i, j, a, b)],
                    SpinResolvedExcitation::new(excitation, SpinLabel::Mixed),
                ),
            ],
            OrbitalRepresentation::SpinOrbital => vec![(
                0.25 * t[(i, j, a, b)],
                SpinResolvedExcitation::new(excitation, SpinLabel::Alpha),
            )],
        }
    }

    /// Full spin expansion of one excitation pair, symmetric under
    /// (ia) ↔ (jb) so that it can enter both sides of <D|D>.
    fn doubles_terms(&self, pair: &ExcitationPair, t: &DoublesAmplitudes) -> Vec<Term> {
        let (i, j, a, b) = (pair.i, pair.j, pair.a, pair.b);
        let excitation = self.space.excitation(pair);
        match self.representation {
            OrbitalRepresentation::Spatial => {
                let mut terms = self.alpha_leading_terms(pair, t);
                terms.push((
                    0.25 * t.antisymmetrized(i, j, a, b),
                    SpinResolvedExcitation::new(excitation, SpinLabel::Beta),
                ));
                terms.push((
                    0.5 * t[(i, j, a, b)],
                    SpinResolvedExcitation::new(self.space.swapped_excitation(pair), SpinLabel::Mixed),
                ));
                terms
            }
            OrbitalRepresentation::SpinOrbital => vec![(
                0.25 * t[(i, j, a, b)],
                SpinResolvedExcitation::new(excitation, SpinLabel::Alpha),
            )],
        }
    }

    /// One term of each α↔β mirror pair of the spatial expansion: αα stands
    /// for ββ, and the mixed excitation for its (ia) ↔ (jb) mirror. Spin
    /// flip of both sides leaves a factorized overlap unchanged, so <D|D>
    /// is twice the sum over these bra terms.
    fn alpha_leading_terms(&self, pair: &ExcitationPair, t: &DoublesAmplitudes) -> Vec<Term> {
        let (i, j, a, b) = (pair.i, pair.j, pair.a, pair.b);
        let excitation = self.space.excitation(pair);
        vec![
            (
                0.25 * t.antisymmetrized(i, j, a, b),
                SpinResolvedExcitation::new(excitation, SpinLabel::Alpha),
            ),
            (
                0.5 * t[(i, j, a, b)],
                SpinResolvedExcitation::new(excitation, SpinLabel::Mixed),
            ),
        ]
    }

    /// Pairs with their expansion; pairs whose every coefficient vanishes
    /// (spin-forbidden spin-orbital entries) are dropped.
    fn expanded<F>(&self, t: &DoublesAmplitudes, conjugate: bool, expand: F) -> Vec<(f64, Vec<Term>)>
    where
        F: Fn(&Self, &ExcitationPair, &DoublesAmplitudes) -> Vec<Term>,
    {
        let zero = Complex64::new(0.0, 0.0);
        self.pairs()
            .iter()
            .filter_map(|pair| {
                let terms: Vec<Term> = expand(self, pair, t)
                    .into_iter()
                    .filter(|(c, _)| *c != zero)
                    .map(|(c, d)| if conjugate { (c.conj(), d) } else { (c, d) })
                    .collect();
                (!terms.is_empty()).then_some((pair.multiplicity, terms))
            })
            .collect()
    }

    /// c0_bra* c0_ket <0|0>
    pub fn reference_reference(&self, bra_weight: Complex64, ket_weight: Complex64) -> Result<Complex64> {
        let reference = SpinResolvedExcitation::reference();
        Ok(bra_weight.conj() * ket_weight * self.determinant(&reference, &reference)?)
    }

    /// c0_bra* <0|D_ket>
    pub fn reference_double(&self, bra_weight: Complex64, ket: &DoublesAmplitudes) -> Result<Complex64> {
        self.check_amplitudes(ket)?;
        let reference = SpinResolvedExcitation::reference();
        let sum = self
            .expanded(ket, false, Self::reference_coupled_terms)
            .iter()
            .map(|(multiplicity, terms)| {
                terms
                    .iter()
                    .map(|(c, d)| -> Result<Complex64> { Ok(c * self.determinant(&reference, d)?) })
                    .sum::<Result<Complex64>>()
                    .map(|s| s * *multiplicity)
            })
            .sum::<Result<Complex64>>()?;
        Ok(bra_weight.conj() * sum)
    }

    /// <D_bra|0> c0_ket
    pub fn double_reference(&self, bra: &DoublesAmplitudes, ket_weight: Complex64) -> Result<Complex64> {
        self.check_amplitudes(bra)?;
        let reference = SpinResolvedExcitation::reference();
        let sum = self
            .expanded(bra, true, Self::reference_coupled_terms)
            .iter()
            .map(|(multiplicity, terms)| {
                terms
                    .iter()
                    .map(|(c, d)| -> Result<Complex64> { Ok(c * self.determinant(d, &reference)?) })
                    .sum::<Result<Complex64>>()
                    .map(|s| s * *multiplicity)
            })
            .sum::<Result<Complex64>>()?;
        Ok(sum * ket_weight)
    }

    /// <D_bra|D_ket>
    pub fn double_double(&self, bra: &DoublesAmplitudes, ket: &DoublesAmplitudes) -> Result<Complex64> {
        self.check_amplitudes(bra)?;
        self.check_amplitudes(ket)?;
        let (bra_terms, fold) = match self.representation {
            OrbitalRepresentation::Spatial => (self.expanded(bra, true, Self::alpha_leading_terms), 2.0),
            OrbitalRepresentation::SpinOrbital => (self.expanded(bra, true, Self::doubles_terms), 1.0),
        };
        let ket_terms = self.expanded(ket, false, Self::doubles_terms);

        bra_terms
            .iter()
            .map(|(bra_mult, bra_dets)| {
                ket_terms
                    .iter()
                    .map(|(ket_mult, ket_dets)| -> Result<Complex64> {
                        let mut sum = Complex64::new(0.0, 0.0);
                        for (cb, db) in bra_dets {
                            for (ck, dk) in ket_dets {
                                sum += cb * ck * self.determinant(db, dk)?;
                            }
                        }
                        Ok(sum * (bra_mult * ket_mult * fold))
                    })
                    .sum::<Result<Complex64>>()
            })
            .sum()
    }
}
