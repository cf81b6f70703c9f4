//! Pipeline-stage ETag interceptor.

use std::sync::Arc;

use super::intercept::intercept;
use super::negotiate::Negotiator;
use super::options::ETagOptions;
use crate::context::Context;
use crate::error::PipelineError;
use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};

/// Middleware that fingerprints every eligible response passing through it
/// and answers matching conditional requests with `304 Not Modified`.
///
/// Register it with [`PipelineBuilder::use_etag`](crate::middleware::PipelineBuilder::use_etag)
/// or [`PipelineBuilder::layer`](crate::middleware::PipelineBuilder::layer).
///
/// # Examples
///
/// ```rust
/// use etagger::etag::{ETagMiddleware, ETagOptions, HashAlgorithm, ValidatorStrength};
///
/// let etag = ETagMiddleware::new(ETagOptions::new(
///     HashAlgorithm::Sha256,
///     ValidatorStrength::Weak,
///     64 * 1024,
/// ));
/// assert_eq!(etag.options().algorithm(), HashAlgorithm::Sha256);
/// ```
#[derive(Debug, Clone)]
pub struct ETagMiddleware {
    negotiator: Arc<Negotiator>,
}

impl ETagMiddleware {
    pub fn new(options: ETagOptions) -> Self {
        Self {
            negotiator: Arc::new(Negotiator::new(options)),
        }
    }

    pub fn options(&self) -> &ETagOptions {
        self.negotiator.options()
    }
}

impl Default for ETagMiddleware {
    fn default() -> Self {
        Self::new(ETagOptions::default())
    }
}

impl Middleware for ETagMiddleware {
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture<Result<Context, PipelineError>> {
        let negotiator = Arc::clone(&self.negotiator);
        Box::pin(async move { intercept(&negotiator, ctx, |ctx| next.run(ctx)).await })
    }
}
