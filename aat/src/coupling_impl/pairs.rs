use crate::error::{AatError, Result};
use itertools::iproduct;
use std::fmt;
use std::str::FromStr;

/// How the excitation-pair sums are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStrategy {
    /// unique pairs `ia ≥ jb` weighted by `2 / (1 + δ(ia, jb))`
    Restricted,
    /// every ordered pair, unit weight
    Full,
}

impl FromStr for LoopStrategy {
    type Err = AatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restricted" => Ok(LoopStrategy::Restricted),
            "full" => Ok(LoopStrategy::Full),
            other => Err(AatError::InvalidConfiguration(format!(
                "unknown loop strategy '{}' (expected restricted or full)",
                other
            ))),
        }
    }
}

impl fmt::Display for LoopStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopStrategy::Restricted => write!(f, "restricted"),
            LoopStrategy::Full => write!(f, "full"),
        }
    }
}

/// One term (i→a, j→b) of an excitation-pair sum; indices are relative to
/// the active occupied and virtual ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcitationPair {
    pub i: usize,
    pub a: usize,
    pub j: usize,
    pub b: usize,
    pub multiplicity: f64,
}

impl LoopStrategy {
    pub fn pairs(&self, n_occ: usize, n_virt: usize) -> Vec<ExcitationPair> {
        let all = iproduct!(0..n_occ, 0..n_virt, 0..n_occ, 0..n_virt);
        match self {
            LoopStrategy::Full => all
                .map(|(i, a, j, b)| ExcitationPair {
                    i,
                    a,
                    j,
                    b,
                    multiplicity: 1.0,
                })
                .collect(),
            LoopStrategy::Restricted => all
                .filter_map(|(i, a, j, b)| {
                    let ia = i * n_virt + a;
                    let jb = j * n_virt + b;
                    (ia >= jb).then(|| ExcitationPair {
                        i,
                        a,
                        j,
                        b,
                        multiplicity: if ia == jb { 1.0 } else { 2.0 },
                    })
                })
                .collect(),
        }
    }
}
