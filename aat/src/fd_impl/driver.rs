use super::finite_difference::{ElementIndex, FourPoint, SignCombination};
use super::options::AatOptions;
use super::snapshots::PerturbedSnapshots;
use crate::coupling_impl::{CouplingBlocks, ExcitationSpace};
use crate::determinant_impl::{determinant_overlap, Excitation};
use crate::dispatch_impl::DoubleDoubleTask;
use crate::error::{AatError, Result};
use crate::overlap_impl::{mo_overlap, AoOverlapProvider, OrbitalRepresentation};
use crate::wavefunction_impl::{DoublesAmplitudes, OrbitalSet, Wavefunction};
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::time::Instant;
use tracing::{debug, info};

/// Real tensor of shape (3 · n_atoms, 3).
pub type AatTensor = DMatrix<f64>;

/// Per-block contributions of a correlated wavefunction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTensors {
    pub ref_ref: AatTensor,
    pub ref_double: AatTensor,
    pub double_ref: AatTensor,
    pub double_double: AatTensor,
}

impl ChannelTensors {
    fn zeros(n_atoms: usize) -> Self {
        ChannelTensors {
            ref_ref: AatTensor::zeros(3 * n_atoms, 3),
            ref_double: AatTensor::zeros(3 * n_atoms, 3),
            double_ref: AatTensor::zeros(3 * n_atoms, 3),
            double_double: AatTensor::zeros(3 * n_atoms, 3),
        }
    }

    pub fn total(&self) -> AatTensor {
        &self.ref_ref + &self.ref_double + &self.double_ref + &self.double_double
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AatResult {
    Uncorrelated(AatTensor),
    Correlated(ChannelTensors),
}

impl AatResult {
    pub fn total(&self) -> AatTensor {
        match self {
            AatResult::Uncorrelated(tensor) => tensor.clone(),
            AatResult::Correlated(channels) => channels.total(),
        }
    }

    pub fn channels(&self) -> Option<&ChannelTensors> {
        match self {
            AatResult::Uncorrelated(_) => None,
            AatResult::Correlated(channels) => Some(channels),
        }
    }
}

/// Lifecycle of one tensor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementStage {
    BuildSnapshots,
    BuildOverlaps,
    AssembleChannels,
    CentralDifference,
    Done,
}

impl ElementStage {
    fn next(self) -> Self {
        match self {
            ElementStage::BuildSnapshots => ElementStage::BuildOverlaps,
            ElementStage::BuildOverlaps => ElementStage::AssembleChannels,
            ElementStage::AssembleChannels => ElementStage::CentralDifference,
            ElementStage::CentralDifference | ElementStage::Done => ElementStage::Done,
        }
    }
}

struct ElementProgress {
    element: ElementIndex,
    stage: ElementStage,
}

impl ElementProgress {
    fn start(element: ElementIndex) -> Self {
        debug!(
            "element ({}, {}): {:?}",
            element.coordinate,
            element.field,
            ElementStage::BuildSnapshots
        );
        ElementProgress {
            element,
            stage: ElementStage::BuildSnapshots,
        }
    }

    fn advance(&mut self) {
        self.stage = self.stage.next();
        debug!(
            "element ({}, {}): {:?}",
            self.element.coordinate, self.element.field, self.stage
        );
    }
}

/// A snapshot after normalization, with its amplitudes already in the
/// form the chosen representation consumes.
struct PreparedState<'a> {
    orbitals: &'a OrbitalSet,
    weight: Complex64,
    doubles: Option<DoublesAmplitudes>,
}

impl PreparedState<'_> {
    fn doubles(&self) -> Result<&DoublesAmplitudes> {
        self.doubles.as_ref().ok_or_else(|| {
            AatError::InvalidConfiguration("correlated block requested for an uncorrelated snapshot".to_string())
        })
    }
}

fn prepare<'a, W: Wavefunction>(snapshot: &'a W, options: &AatOptions) -> Result<PreparedState<'a>> {
    let orbitals = snapshot.orbitals();
    let Some(doubles) = snapshot.doubles() else {
        return Ok(PreparedState {
            orbitals,
            weight: snapshot.reference_weight(),
            doubles: None,
        });
    };

    let factor = options
        .normalization
        .scale_factor(snapshot.reference_weight(), doubles)?;
    let scaled = doubles.scaled(Complex64::new(factor, 0.0));
    let doubles = match options.representation {
        OrbitalRepresentation::Spatial => scaled,
        OrbitalRepresentation::SpinOrbital => scaled.to_spin_orbital(),
    };
    Ok(PreparedState {
        orbitals,
        weight: snapshot.reference_weight() * factor,
        doubles: Some(doubles),
    })
}

/// The bra/ket pairs feeding one element's four-point stencil.
struct ElementInputs<'s, 'a> {
    bra: FourPoint<&'s PreparedState<'a>>,
    ket: FourPoint<&'s PreparedState<'a>>,
}

impl<'s, 'a> ElementInputs<'s, 'a> {
    fn new(states: &'s PerturbedSnapshots<PreparedState<'a>>, element: ElementIndex) -> Self {
        ElementInputs {
            bra: FourPoint::from_fn(|sc| states.nuclear(element.coordinate, sc.nuclear())),
            ket: FourPoint::from_fn(|sc| states.field(element.field, sc.field())),
        }
    }

    fn overlaps(
        &self,
        provider: &dyn AoOverlapProvider,
        representation: OrbitalRepresentation,
    ) -> Result<FourPoint<DMatrix<Complex64>>> {
        FourPoint::try_from_fn(|sc| {
            mo_overlap(
                self.bra.get(sc).orbitals,
                self.ket.get(sc).orbitals,
                provider,
                representation,
            )
        })
    }
}

/// Evaluates the atomic axial tensor from a validated set of perturbed
/// snapshots. Returns one tensor for RHF and the four coupling-block
/// tensors for correlated methods.
pub fn compute_aat<W: Wavefunction>(
    snapshots: &PerturbedSnapshots<W>,
    provider: &dyn AoOverlapProvider,
    options: &AatOptions,
) -> Result<AatResult> {
    options.validate(snapshots.n_atoms)?;
    snapshots.validate(options.method)?;

    let elements = options.elements(snapshots.n_atoms);
    info!(
        "AAT assembly: method {}, {} orbitals, {} normalization, {} loops",
        options.method, options.representation, options.normalization, options.strategy
    );
    info!(
        "  {} atom(s), {} element(s), steps ΔR = {:e}, ΔB = {:e}",
        snapshots.n_atoms,
        elements.len(),
        options.nuclear_step,
        options.field_step
    );
    let start = Instant::now();

    let states = snapshots.try_map(|s| prepare(s, options))?;
    let result = if options.method.is_correlated() {
        AatResult::Correlated(correlated_tensors(&states, &elements, provider, options)?)
    } else {
        AatResult::Uncorrelated(uncorrelated_tensor(&states, &elements, provider, options)?)
    };

    info!("AAT assembly finished in {:.2?}", start.elapsed());
    Ok(result)
}

fn uncorrelated_tensor(
    states: &PerturbedSnapshots<PreparedState<'_>>,
    elements: &[ElementIndex],
    provider: &dyn AoOverlapProvider,
    options: &AatOptions,
) -> Result<AatTensor> {
    let mut tensor = AatTensor::zeros(3 * states.n_atoms, 3);

    for &element in elements {
        info!("element ({}, {})", element.coordinate, element.field);
        let mut progress = ElementProgress::start(element);
        let inputs = ElementInputs::new(states, element);

        progress.advance();
        // α and β share the spatial block; the spin doubling is the factor
        // 2 applied to the difference of det(S_oo) below
        let overlaps = inputs.overlaps(provider, OrbitalRepresentation::Spatial)?;

        progress.advance();
        let ref_ref = FourPoint::try_from_fn(|sc| {
            determinant_overlap(
                overlaps.get(sc),
                inputs.bra.get(sc).orbitals.n_occupied,
                &Excitation::Reference,
                &Excitation::Reference,
            )
        })?;

        progress.advance();
        tensor[(element.coordinate, element.field)] =
            2.0 * ref_ref.central_difference(options.nuclear_step, options.field_step);

        progress.advance();
    }

    Ok(tensor)
}

fn correlated_tensors(
    states: &PerturbedSnapshots<PreparedState<'_>>,
    elements: &[ElementIndex],
    provider: &dyn AoOverlapProvider,
    options: &AatOptions,
) -> Result<ChannelTensors> {
    let mut channels = ChannelTensors::zeros(states.n_atoms);
    let dispatcher = options.dispatcher();
    let batch_size = options.batch_size();
    info!(
        "Dispatching {} double-double task(s) in batches of {} ({})",
        elements.len(),
        batch_size,
        dispatcher.mode()
    );

    let mut done = 0;
    for batch in elements.chunks(batch_size) {
        let tasks = batch
            .iter()
            .map(|&element| element_task(states, element, provider, options, &mut channels))
            .collect::<Result<Vec<_>>>()?;

        let outputs = match dispatcher.run(tasks) {
            Ok(outputs) => outputs,
            Err(AatError::Cancelled { remaining }) => {
                let unbuilt = elements.len() - done - batch.len();
                return Err(AatError::Cancelled {
                    remaining: remaining + unbuilt,
                });
            }
            Err(e) => return Err(e),
        };
        for (element, value) in outputs {
            channels.double_double[(element.coordinate, element.field)] = value?;
        }
        done += batch.len();
    }

    Ok(channels)
}

/// Fills the three reference channels of `element` and packages the
/// double↔double block as a self-contained task.
fn element_task(
    states: &PerturbedSnapshots<PreparedState<'_>>,
    element: ElementIndex,
    provider: &dyn AoOverlapProvider,
    options: &AatOptions,
    channels: &mut ChannelTensors,
) -> Result<DoubleDoubleTask> {
    info!("element ({}, {})", element.coordinate, element.field);
    let mut progress = ElementProgress::start(element);
    let inputs = ElementInputs::new(states, element);
    let space = ExcitationSpace::new(inputs.bra.pp.orbitals, options.representation);

    progress.advance();
    let overlaps = inputs.overlaps(provider, options.representation)?;

    progress.advance();
    let blocks = |sc: SignCombination| {
        CouplingBlocks::new(overlaps.get(sc), options.representation, space, options.strategy)
    };
    let ref_ref = FourPoint::try_from_fn(|sc| {
        blocks(sc).reference_reference(inputs.bra.get(sc).weight, inputs.ket.get(sc).weight)
    })?;
    let ref_double = FourPoint::try_from_fn(|sc| {
        blocks(sc).reference_double(inputs.bra.get(sc).weight, inputs.ket.get(sc).doubles()?)
    })?;
    let double_ref = FourPoint::try_from_fn(|sc| {
        blocks(sc).double_reference(inputs.bra.get(sc).doubles()?, inputs.ket.get(sc).weight)
    })?;
    let bra = FourPoint::try_from_fn(|sc| inputs.bra.get(sc).doubles().cloned())?;
    let ket = FourPoint::try_from_fn(|sc| inputs.ket.get(sc).doubles().cloned())?;

    progress.advance();
    let (h_r, h_b) = (options.nuclear_step, options.field_step);
    let idx = (element.coordinate, element.field);
    channels.ref_ref[idx] = ref_ref.central_difference(h_r, h_b);
    channels.ref_double[idx] = ref_double.central_difference(h_r, h_b);
    channels.double_ref[idx] = double_ref.central_difference(h_r, h_b);
    debug!(
        "element ({}, {}): <0|0> {:+.8e}, <0|D> {:+.8e}, <D|0> {:+.8e}",
        element.coordinate,
        element.field,
        channels.ref_ref[idx],
        channels.ref_double[idx],
        channels.double_ref[idx]
    );
    progress.advance();

    Ok(DoubleDoubleTask {
        element,
        overlaps,
        bra,
        ket,
        space,
        representation: options.representation,
        strategy: options.strategy,
        nuclear_step: h_r,
        field_step: h_b,
    })
}
