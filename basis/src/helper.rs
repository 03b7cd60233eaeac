//! Quadrature used to check analytic integrals in tests.

use nalgebra::Vector3;
use rayon::prelude::*;

/// Composite Simpson nodes on [a, b] with their weights, step included.
/// `n` is rounded up to an even number of intervals.
fn simpson_nodes(a: f64, b: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n + n % 2;
    let h = (b - a) / n as f64;
    (0..=n)
        .map(|i| {
            let w = match i {
                0 => 1.0,
                i if i == n => 1.0,
                i if i % 2 == 1 => 4.0,
                _ => 2.0,
            };
            (a + i as f64 * h, w * h / 3.0)
        })
        .collect()
}

pub(crate) fn simpson_integration<F>(f: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    simpson_nodes(a, b, n).into_iter().map(|(x, w)| w * f(x)).sum()
}

/// Tensor-product Simpson rule over the box [lower, upper] with `n`
/// intervals per axis; planes of constant x are summed in parallel.
pub(crate) fn simpson_integration_3d<F>(f: F, lower: Vector3<f64>, upper: Vector3<f64>, n: usize) -> f64
where
    F: Fn(f64, f64, f64) -> f64 + Sync,
{
    let [xs, ys, zs] = [0, 1, 2].map(|k| simpson_nodes(lower[k], upper[k], n));
    xs.par_iter()
        .map(|&(x, wx)| {
            ys.iter()
                .map(|&(y, wy)| wy * zs.iter().map(|&(z, wz)| wz * f(x, y, z)).sum::<f64>())
                .sum::<f64>()
                * wx
        })
        .sum()
}
