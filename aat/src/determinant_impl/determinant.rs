use crate::error::{AatError, Result};
use nalgebra::DMatrix;
use num_complex::Complex64;

/// Excitation pattern relative to the reference determinant. Indices are
/// absolute MO indices (frozen-core offset already applied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Excitation {
    Reference,
    /// i→a together with j→b
    Double {
        i: usize,
        a: usize,
        j: usize,
        b: usize,
    },
}

impl Excitation {
    /// Builds a pattern from `[]` or `[i, a, j, b]`.
    pub fn from_indices(indices: &[usize]) -> Result<Self> {
        match *indices {
            [] => Ok(Excitation::Reference),
            [i, a, j, b] => Ok(Excitation::Double { i, a, j, b }),
            _ => Err(AatError::UnsupportedExcitationRank(indices.len())),
        }
    }

    pub fn double(i: usize, a: usize, j: usize, b: usize) -> Self {
        Excitation::Double { i, a, j, b }
    }

    /// Substituted (occupied, virtual) pairs in application order.
    fn substitutions(&self) -> Vec<(usize, usize)> {
        match *self {
            Excitation::Reference => Vec::new(),
            Excitation::Double { i, a, j, b } => vec![(i, a), (j, b)],
        }
    }

    fn max_index(&self) -> Option<usize> {
        match *self {
            Excitation::Reference => None,
            Excitation::Double { i, a, j, b } => [i, a, j, b].into_iter().max(),
        }
    }
}

/// Routing of the substitutions of one pattern onto the α and β
/// determinants in the factorized representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinLabel {
    /// both substitutions in the α determinant
    Alpha,
    /// both substitutions in the β determinant
    Beta,
    /// first substitution in α, second in β
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinResolvedExcitation {
    pub excitation: Excitation,
    pub spin: SpinLabel,
}

impl SpinResolvedExcitation {
    pub fn new(excitation: Excitation, spin: SpinLabel) -> Self {
        SpinResolvedExcitation { excitation, spin }
    }

    pub fn reference() -> Self {
        SpinResolvedExcitation::new(Excitation::Reference, SpinLabel::Alpha)
    }

    /// Splits the substitutions into the (α, β) determinants.
    fn route(&self) -> (Vec<(usize, usize)>, Vec<(usize, usize)>) {
        let subs = self.excitation.substitutions();
        match self.spin {
            SpinLabel::Alpha => (subs, Vec::new()),
            SpinLabel::Beta => (Vec::new(), subs),
            SpinLabel::Mixed => {
                let mut alpha = subs;
                let beta = alpha.split_off(alpha.len().min(1));
                (alpha, beta)
            }
        }
    }
}

/// Row or column selection of the full MO overlap after a sequence of
/// swaps; position `k` of the result holds the original index now at `k`.
fn permuted_indices(dim: usize, swaps: &[(usize, usize)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..dim).collect();
    for &(p, q) in swaps {
        order.swap(p, q);
    }
    order
}

fn check_bounds(s: &DMatrix<Complex64>, n_occ: usize, patterns: &[&Excitation]) -> Result<()> {
    if s.nrows() != s.ncols() {
        return Err(AatError::InvalidConfiguration(format!(
            "MO overlap must be square, got {:?}",
            s.shape()
        )));
    }
    if n_occ > s.nrows() {
        return Err(AatError::InvalidConfiguration(format!(
            "occupied width {} exceeds MO dimension {}",
            n_occ,
            s.nrows()
        )));
    }
    for pattern in patterns {
        if let Some(max) = pattern.max_index() {
            if max >= s.nrows() {
                return Err(AatError::InvalidConfiguration(format!(
                    "excitation {:?} out of range for {} orbitals",
                    pattern,
                    s.nrows()
                )));
            }
        }
    }
    Ok(())
}

fn restricted_determinant(
    s: &DMatrix<Complex64>,
    n_occ: usize,
    row_swaps: &[(usize, usize)],
    col_swaps: &[(usize, usize)],
) -> Complex64 {
    let rows = permuted_indices(s.nrows(), row_swaps);
    let cols = permuted_indices(s.ncols(), col_swaps);
    let block = DMatrix::from_fn(n_occ, n_occ, |r, c| s[(rows[r], cols[c])]);
    block.determinant()
}

/// Overlap of two determinants in the unified (spin-orbital) representation:
/// bra substitutions swap rows, ket substitutions swap columns, and the
/// leading `n_occ × n_occ` block is reduced to its determinant.
pub fn determinant_overlap(
    s: &DMatrix<Complex64>,
    n_occ: usize,
    bra: &Excitation,
    ket: &Excitation,
) -> Result<Complex64> {
    check_bounds(s, n_occ, &[bra, ket])?;
    Ok(restricted_determinant(
        s,
        n_occ,
        &bra.substitutions(),
        &ket.substitutions(),
    ))
}

/// Overlap in the factorized (spatial) representation: `s` is the spatial
/// MO overlap shared by the α and β determinants, substitutions are routed
/// by each pattern's spin label, and the result is det(α) · det(β).
pub fn factorized_overlap(
    s: &DMatrix<Complex64>,
    n_occ: usize,
    bra: &SpinResolvedExcitation,
    ket: &SpinResolvedExcitation,
) -> Result<Complex64> {
    check_bounds(s, n_occ, &[&bra.excitation, &ket.excitation])?;
    let (bra_alpha, bra_beta) = bra.route();
    let (ket_alpha, ket_beta) = ket.route();

    let alpha = restricted_determinant(s, n_occ, &bra_alpha, &ket_alpha);
    let beta = restricted_determinant(s, n_occ, &bra_beta, &ket_beta);
    Ok(alpha * beta)
}
