//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `From`.

use thiserror::Error;

use crate::{EdgeId, VertexId};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `rr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
