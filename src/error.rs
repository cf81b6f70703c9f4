//! Error types.
//!
//! Three tiers, by who deals with them:
//!
//! - [`ConfigError`] is fatal and raised while options or pipelines are built.
//! - [`NegotiationError`] is recovered inside the ETag interceptors; the
//!   response goes out untagged.
//! - [`PipelineError`] is returned to the host.

use thiserror::Error;

/// Invalid configuration, detected before any request is served.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown ETag hash algorithm `{0}` (expected md5, sha1, sha256, sha384 or sha512)")]
    UnknownAlgorithm(String),

    #[error("unknown ETag validator `{0}` (expected strong or weak)")]
    UnknownValidator(String),

    #[error("invalid ETag options document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("pipeline has no endpoint handler registered")]
    MissingEndpoint,
}

/// A failure while fingerprinting or revalidating a response.
#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("response body is not buffered; the downstream handler installed its own sink")]
    BodyNotBuffered,
}

/// A failure surfaced to the host while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to flush buffered response body: {0}")]
    Flush(#[source] std::io::Error),

    /// The endpoint or a middleware reported its own failure.
    #[error("handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl PipelineError {
    /// Wraps any error raised by a handler.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Handler(err.into())
    }
}
