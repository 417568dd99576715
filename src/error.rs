use std::io;
use std::ops::Range;

use thiserror::Error;

/// Errors produced while selecting round numbers.
#[derive(Debug, Error)]
pub enum RoundsError {
    /// An input parameter is outside the domain the security bounds are defined on.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No candidate in the scanned ranges satisfies every security bound.
    #[error(
        "no round configuration with R_F in {full_rounds:?} and R_P in {partial_rounds:?} \
         satisfies the security bounds"
    )]
    SearchExhausted {
        full_rounds: Range<u32>,
        partial_rounds: Range<u32>,
    },

    #[error("report I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, RoundsError>;
