//! Error taxonomy for the engine.
//!
//! Nothing on the per-frame path propagates these to the host: asset and
//! service failures are logged and recovered where they happen. They exist
//! so that construction, parsing and collaborator calls can use `?`.

use thiserror::Error;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A texture or image referenced by the manifest is not in the catalog.
    #[error("asset missing: {id}")]
    AssetMissing { id: String },

    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// User-supplied input failed validation (surfaced inline, never fatal).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Failure of an out-of-process collaborator call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),

    /// The collaborator answered, but a field was missing or out of range.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("timed out after {after_ms} ms")]
    TimedOut { after_ms: f64 },

    /// The responding side went away before answering.
    #[error("request dropped before completion")]
    Dropped,
}

impl From<futures::channel::oneshot::Canceled> for ServiceError {
    fn from(_: futures::channel::oneshot::Canceled) -> Self {
        ServiceError::Dropped
    }
}
