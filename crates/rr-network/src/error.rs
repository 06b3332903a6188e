//! Network-subsystem error type.

use thiserror::Error;

use rr_core::CoreError;

/// Errors produced by `rr-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{file} line {line}: {msg}")]
    Parse {
        file: &'static str,
        line: u64,
        msg:  String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
