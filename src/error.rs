//! Controller and media engine errors.

/// Errors surfaced synchronously by controller operations.
///
/// Engine readiness problems are not represented here: operations that
/// need a ready engine quietly do nothing until buffering catches up.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Invalid time value: {value} (must be a finite, non-negative number)")]
    InvalidTime { value: f64 },

    #[error("Invalid marker kind '{kind}' (expected chapter, advertisement, or custom)")]
    InvalidMarkerKind { kind: String },

    #[error("Seek to {target:.3}s rejected by media engine: {source}")]
    SeekRejected {
        target: f64,
        #[source]
        source: EngineError,
    },
}

/// Errors reported by a [`MediaEngine`](crate::host::MediaEngine).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("media engine is not ready")]
    NotReady,

    #[error("position {target:.3}s is outside the seekable range")]
    OutOfRange { target: f64 },

    #[error("{0}")]
    Failed(String),
}

/// Result alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;
