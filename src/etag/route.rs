//! Per-route ETag decorator.
//!
//! [`ETagRoute`] wraps a single [`Handler`] instead of a whole pipeline. Its
//! inline settings are merged over the global [`ETagOptions`] once, when
//! [`wrap`](ETagRoute::wrap) builds the decorated handler.

use std::sync::Arc;

use super::intercept::intercept;
use super::negotiate::Negotiator;
use super::options::{ETagOptions, ETagOverrides, HashAlgorithm, ValidatorStrength};
use crate::context::Context;
use crate::error::PipelineError;
use crate::handler::{BoxFuture, Handler};

/// Route-level ETag settings that take precedence over the global options.
///
/// # Examples
///
/// ```rust
/// use etagger::etag::{ETagOptions, ETagRoute, ValidatorStrength};
/// use etagger::handler::handler_fn;
///
/// let global = ETagOptions::default();
/// let report = ETagRoute::new()
///     .validator(ValidatorStrength::Weak)
///     .max_body_length(1024 * 1024)
///     .wrap(&global, handler_fn(|ctx| async move { ctx }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ETagRoute {
    overrides: ETagOverrides,
}

impl ETagRoute {
    /// A decorator that inherits every global setting.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_overrides(overrides: ETagOverrides) -> Self {
        Self { overrides }
    }

    #[must_use]
    pub fn algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.overrides.algorithm = Some(algorithm);
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: ValidatorStrength) -> Self {
        self.overrides.validator = Some(validator);
        self
    }

    #[must_use]
    pub fn max_body_length(mut self, max_body_length: usize) -> Self {
        self.overrides.max_body_length = Some(max_body_length);
        self
    }

    #[must_use]
    pub fn allow_head(mut self, allow: bool) -> Self {
        self.overrides.allow_head = Some(allow);
        self
    }

    pub fn overrides(&self) -> &ETagOverrides {
        &self.overrides
    }

    /// Returns `handler` decorated with ETag negotiation under the merged options.
    pub fn wrap(&self, global: &ETagOptions, handler: Handler) -> Handler {
        let negotiator = Arc::new(Negotiator::new(global.merged(&self.overrides)));
        Arc::new(move |ctx: Context| -> BoxFuture<Result<Context, PipelineError>> {
            let negotiator = Arc::clone(&negotiator);
            let handler = Arc::clone(&handler);
            Box::pin(async move { intercept(&negotiator, ctx, |ctx| handler(ctx)).await })
        })
    }
}
