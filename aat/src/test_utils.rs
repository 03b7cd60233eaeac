//! Fixtures shared by the unit tests

use crate::wavefunction_impl::DoublesAmplitudes;
use basis::{BasisSet, ContractedGTO};
use nalgebra::{DMatrix, Vector3};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// One normalized s primitive per center.
pub fn s_basis(name: &str, centers: &[Vector3<f64>]) -> Arc<BasisSet> {
    let functions = centers
        .iter()
        .map(|c| ContractedGTO::new("s", *c, Vector3::new(0, 0, 0), &[0.8], &[1.0]))
        .collect();
    Arc::new(BasisSet::new(name, functions))
}

pub fn line_centers(n: usize) -> Vec<Vector3<f64>> {
    (0..n)
        .map(|k| Vector3::new(0.1 * k as f64, 0.05 * k as f64, 1.3 * k as f64))
        .collect()
}

pub fn random_complex_matrix(rng: &mut StdRng, nrows: usize, ncols: usize) -> DMatrix<Complex64> {
    DMatrix::from_fn(nrows, ncols, |_, _| {
        Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
    })
}

/// Near-identity overlap, as between two slightly perturbed MO sets.
pub fn perturbed_identity(rng: &mut StdRng, n: usize, scale: f64) -> DMatrix<Complex64> {
    let noise = random_complex_matrix(rng, n, n) * Complex64::new(scale, 0.0);
    DMatrix::identity(n, n) + noise
}

/// Random amplitudes obeying t[i,j,a,b] = t[j,i,b,a].
pub fn symmetric_amplitudes(seed: u64, n_occ: usize, n_virt: usize) -> DoublesAmplitudes {
    let mut rng = StdRng::seed_from_u64(seed);
    let raw = DoublesAmplitudes::from_fn(n_occ, n_virt, |_, _, _, _| {
        Complex64::new(rng.gen_range(-0.2..0.2), rng.gen_range(-0.2..0.2))
    });
    DoublesAmplitudes::from_fn(n_occ, n_virt, |i, j, a, b| {
        (raw[(i, j, a, b)] + raw[(j, i, b, a)]) * 0.5
    })
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Symmetrically orthonormalized AOs, C = S^{-1/2}.
pub fn lowdin_orbitals(basis: &BasisSet) -> DMatrix<f64> {
    let s = basis::overlap_matrix(basis, basis);
    let eigen = s.symmetric_eigen();
    let inv_sqrt = DMatrix::from_diagonal(&eigen.eigenvalues.map(|l| 1.0 / l.sqrt()));
    &eigen.eigenvectors * inv_sqrt * eigen.eigenvectors.transpose()
}
