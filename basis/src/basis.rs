#![allow(non_snake_case)]

use crate::cgto::ContractedGTO;
use nalgebra::{DMatrix, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A real-valued basis function with an analytic overlap integral.
pub trait Basis {
    fn evaluate(&self, r: &Vector3<f64>) -> f64;
    fn Sab(a: &Self, b: &Self) -> f64;
}

/// An ordered set of contracted AO functions, e.g. the basis of one molecule
/// at one geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasisSet {
    pub name: String,
    pub functions: Vec<ContractedGTO>,
}

impl BasisSet {
    pub fn new(name: &str, functions: Vec<ContractedGTO>) -> Self {
        BasisSet {
            name: name.to_string(),
            functions,
        }
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Rigidly moves every function centered at `from` to `to`. Used to build
    /// the basis of a geometry where one atom has been displaced.
    pub fn with_center_moved(&self, name: &str, from: Vector3<f64>, to: Vector3<f64>) -> Self {
        let functions = self
            .functions
            .iter()
            .map(|f| {
                if (f.center() - from).norm() < 1e-12 {
                    f.recentered(to)
                } else {
                    f.clone()
                }
            })
            .collect();
        BasisSet::new(name, functions)
    }
}

/// AO overlap matrix S_{μν} = <bra_μ|ket_ν> between two (possibly different)
/// basis sets. Rows follow `bra`, columns follow `ket`.
pub fn overlap_matrix(bra: &BasisSet, ket: &BasisSet) -> DMatrix<f64> {
    let rows: Vec<Vec<f64>> = bra
        .functions
        .par_iter()
        .map(|mu| {
            ket.functions
                .iter()
                .map(|nu| ContractedGTO::Sab(mu, nu))
                .collect()
        })
        .collect();

    DMatrix::from_fn(bra.len(), ket.len(), |i, j| rows[i][j])
}
