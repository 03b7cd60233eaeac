use super::finite_difference::ElementIndex;
use crate::coupling_impl::LoopStrategy;
use crate::dispatch_impl::Dispatcher;
use crate::error::{AatError, Result};
use crate::overlap_impl::OrbitalRepresentation;
use crate::wavefunction_impl::{Method, Normalization};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Everything `compute_aat` needs besides the snapshots.
#[derive(Debug, Clone)]
pub struct AatOptions {
    pub method: Method,
    pub normalization: Normalization,
    pub representation: OrbitalRepresentation,
    pub strategy: LoopStrategy,
    pub nuclear_step: f64,
    pub field_step: f64,
    pub parallel: bool,
    pub num_workers: usize,
    /// Double↔double tasks held in memory at once. `None` picks one per
    /// element when sequential and four per worker when parallel.
    pub batch_size: Option<usize>,
    /// Evaluate only this element; the rest of the tensor stays zero.
    pub element: Option<ElementIndex>,
    /// Checked before each double↔double task starts.
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for AatOptions {
    fn default() -> Self {
        AatOptions {
            method: Method::HartreeFock,
            normalization: Normalization::Full,
            representation: OrbitalRepresentation::Spatial,
            strategy: LoopStrategy::Restricted,
            nuclear_step: 1e-4,
            field_step: 1e-4,
            parallel: false,
            num_workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            batch_size: None,
            element: None,
            stop_flag: None,
        }
    }
}

impl AatOptions {
    pub fn new(method: Method) -> Self {
        AatOptions {
            method,
            ..Default::default()
        }
    }

    /// Rejects anything that cannot be evaluated, before any numerics.
    pub fn validate(&self, n_atoms: usize) -> Result<()> {
        for (name, step) in [("nuclear", self.nuclear_step), ("field", self.field_step)] {
            if !(step.is_finite() && step > 0.0) {
                return Err(AatError::InvalidConfiguration(format!(
                    "{} step must be positive, got {}",
                    name, step
                )));
            }
        }
        if self.parallel && self.num_workers == 0 {
            return Err(AatError::InvalidConfiguration(
                "parallel evaluation needs at least one worker".to_string(),
            ));
        }
        if self.batch_size == Some(0) {
            return Err(AatError::InvalidConfiguration(
                "task batch size must be at least one".to_string(),
            ));
        }
        if let Some(element) = self.element {
            if element.coordinate >= 3 * n_atoms || element.field >= 3 {
                return Err(AatError::InvalidConfiguration(format!(
                    "element ({}, {}) outside the ({}, 3) tensor",
                    element.coordinate,
                    element.field,
                    3 * n_atoms
                )));
            }
        }
        Ok(())
    }

    /// Elements to evaluate, row-major over (coordinate, field).
    pub fn elements(&self, n_atoms: usize) -> Vec<ElementIndex> {
        match self.element {
            Some(element) => vec![element],
            None => (0..3 * n_atoms)
                .flat_map(|r| (0..3).map(move |b| ElementIndex::new(r, b)))
                .collect(),
        }
    }

    pub fn batch_size(&self) -> usize {
        match (self.batch_size, self.parallel) {
            (Some(size), _) => size.max(1),
            (None, true) => 4 * self.num_workers.max(1),
            (None, false) => 1,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        let dispatcher = if self.parallel {
            Dispatcher::parallel(self.num_workers)
        } else {
            Dispatcher::sequential()
        };
        match &self.stop_flag {
            Some(flag) => dispatcher.with_stop_flag(flag.clone()),
            None => dispatcher,
        }
    }
}
