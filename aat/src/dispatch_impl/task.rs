use super::dispatcher::Task;
use crate::coupling_impl::{CouplingBlocks, ExcitationSpace, LoopStrategy};
use crate::error::Result;
use crate::fd_impl::{ElementIndex, FourPoint};
use crate::overlap_impl::OrbitalRepresentation;
use crate::wavefunction_impl::DoublesAmplitudes;
use nalgebra::DMatrix;
use num_complex::Complex64;

/// Double↔double block of one element: the four MO overlaps and the
/// prepared bra (nuclear) and ket (field) amplitudes of the stencil.
#[derive(Debug, Clone)]
pub struct DoubleDoubleTask {
    pub element: ElementIndex,
    pub overlaps: FourPoint<DMatrix<Complex64>>,
    pub bra: FourPoint<DoublesAmplitudes>,
    pub ket: FourPoint<DoublesAmplitudes>,
    pub space: ExcitationSpace,
    pub representation: OrbitalRepresentation,
    pub strategy: LoopStrategy,
    pub nuclear_step: f64,
    pub field_step: f64,
}

impl Task for DoubleDoubleTask {
    type Output = Result<f64>;

    fn element(&self) -> ElementIndex {
        self.element
    }

    fn run(&self) -> Result<f64> {
        let values = FourPoint::try_from_fn(|sc| {
            CouplingBlocks::new(
                self.overlaps.get(sc),
                self.representation,
                self.space,
                self.strategy,
            )
            .double_double(self.bra.get(sc), self.ket.get(sc))
        })?;
        Ok(values.central_difference(self.nuclear_step, self.field_step))
    }
}
