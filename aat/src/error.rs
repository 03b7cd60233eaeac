//! Error type shared by every stage of the tensor assembly

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AatError {
    /// Unrecognized option string, inconsistent snapshot set or an
    /// out-of-bounds element request. Raised before any numerics.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Bra and ket coefficient matrices (AO rows, MO columns) disagree.
    #[error("Bra and ket orbital sets do not have the same dimensions: {bra:?} vs. {ket:?}")]
    DimensionMismatch {
        bra: (usize, usize),
        ket: (usize, usize),
    },

    /// Excitation pattern with a length other than 0 or 4.
    #[error("Unsupported excitation rank: pattern has {0} indices, expected 0 or 4")]
    UnsupportedExcitationRank(usize),

    #[error("Dispatch cancelled with {remaining} element(s) left unevaluated")]
    Cancelled { remaining: usize },
}

pub type Result<T> = std::result::Result<T, AatError>;
