//! Middleware pipeline — composable before/after request handler logic.
//!
//! This module defines the host side of the interception contract: an
//! ordered stack of middleware wrapped around one endpoint [`Handler`].
//! Each middleware receives the request [`Context`] by value plus a [`Next`]
//! continuation, and must hand a context back.
//!
//! ## Core types
//!
//! - [`Middleware`] — trait implemented by all middleware.
//! - [`Next`] — cursor into the remaining chain; [`Next::run`] consumes it, so
//!   the downstream chain is invoked at most once per middleware.
//! - [`MiddlewareHandler`] — type-erased, cheaply-cloneable middleware function.
//! - [`Pipeline`] / [`PipelineBuilder`] — the composed stack and its fluent
//!   registration API.

use std::sync::Arc;

use crate::context::Context;
use crate::error::{ConfigError, PipelineError};
use crate::etag::{ETagMiddleware, ETagOptions};
use crate::handler::{BoxFuture, Handler};

/// A type-erased, reference-counted middleware function.
///
/// Every entry in the middleware stack is stored as a `MiddlewareHandler`.
/// The [`Arc`] wrapper makes handlers cheap to clone so that [`Next`] can
/// advance through the chain without copying closures.
pub type MiddlewareHandler = Arc<
    dyn Fn(Context, Next) -> BoxFuture<Result<Context, PipelineError>> + Send + Sync + 'static,
>;

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |ctx: Context, next: Next| middleware.handle(ctx, next))
}

/// The core trait for all middleware.
///
/// Implementors receive a [`Context`] and a [`Next`] cursor. They may pass
/// through, short-circuit by returning the context without calling `next`, or
/// decorate the response after `next.run(ctx).await` returns.
///
/// # Examples
///
/// ```rust
/// use etagger::{context::Context, error::PipelineError, handler::BoxFuture};
/// use etagger::middleware::{Middleware, Next};
///
/// struct PoweredBy;
///
/// impl Middleware for PoweredBy {
///     fn handle(&self, ctx: Context, next: Next) -> BoxFuture<Result<Context, PipelineError>> {
///         Box::pin(async move {
///             let mut ctx = next.run(ctx).await?;
///             ctx.response_mut().add_header("X-Powered-By", "etagger");
///             Ok(ctx)
///         })
///     }
/// }
/// ```
pub trait Middleware: Send + Sync {
    /// Handle the request and optionally delegate to the next middleware.
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture<Result<Context, PipelineError>>;
}

/// A cursor into the remaining middleware chain for a single request.
///
/// When the stack is exhausted, [`run`](Self::run) invokes the endpoint.
pub struct Next {
    middlewares: Arc<[MiddlewareHandler]>,
    // Tracks which middleware to invoke on the next `run` call.
    index: usize,
    endpoint: Handler,
}

impl Next {
    /// Creates a `Next` positioned at the start of `middlewares`.
    pub fn new(middlewares: Arc<[MiddlewareHandler]>, endpoint: Handler) -> Self {
        Self {
            middlewares,
            index: 0,
            endpoint,
        }
    }

    /// Invokes the next middleware in the chain, or the endpoint when none remain.
    pub async fn run(mut self, ctx: Context) -> Result<Context, PipelineError> {
        let current = self.middlewares.get(self.index).cloned();
        match current {
            Some(handler) => {
                self.index += 1;
                handler(ctx, self).await
            }
            None => (self.endpoint)(ctx).await,
        }
    }
}

/// A composed middleware stack around one endpoint.
///
/// Middleware runs in registration order on the way in and in reverse order on
/// the way out.
///
/// # Examples
///
/// ```rust
/// use etagger::{Context, Pipeline, Request, handler::try_handler_fn};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = Pipeline::builder()
///     .use_etag()
///     .endpoint(try_handler_fn(|mut ctx| async move {
///         ctx.response_mut().write(b"hello")?;
///         Ok::<_, std::io::Error>(ctx)
///     }))
///     .build()?;
///
/// let ctx = pipeline.execute(Context::new(Request::get("/"))).await?;
/// assert!(ctx.response().headers().contains("etag"));
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    middlewares: Arc<[MiddlewareHandler]>,
    endpoint: Handler,
}

impl Pipeline {
    /// Starts a fluent registration.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Runs `ctx` through every middleware and the endpoint.
    pub async fn execute(&self, ctx: Context) -> Result<Context, PipelineError> {
        Next::new(Arc::clone(&self.middlewares), Arc::clone(&self.endpoint))
            .run(ctx)
            .await
    }

    /// Returns the number of registered middleware.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns `true` if only the endpoint is registered.
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

/// Fluent registration for a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    middlewares: Vec<MiddlewareHandler>,
    endpoint: Option<Handler>,
}

impl PipelineBuilder {
    /// Appends a middleware to the stack.
    #[must_use]
    pub fn layer<M>(self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.layer_handler(from_middleware(Arc::new(middleware)))
    }

    /// Appends an already type-erased middleware function.
    #[must_use]
    pub fn layer_handler(mut self, handler: MiddlewareHandler) -> Self {
        self.middlewares.push(handler);
        self
    }

    /// Appends an [`ETagMiddleware`] with default options.
    #[must_use]
    pub fn use_etag(self) -> Self {
        self.use_etag_with(ETagOptions::default())
    }

    /// Appends an [`ETagMiddleware`] configured with `options`.
    #[must_use]
    pub fn use_etag_with(self, options: ETagOptions) -> Self {
        self.layer(ETagMiddleware::new(options))
    }

    /// Sets the endpoint handler that terminates the chain.
    #[must_use]
    pub fn endpoint(mut self, handler: Handler) -> Self {
        self.endpoint = Some(handler);
        self
    }

    /// Finishes registration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEndpoint`] if [`endpoint`](Self::endpoint)
    /// was never called.
    pub fn build(self) -> Result<Pipeline, ConfigError> {
        let endpoint = self.endpoint.ok_or(ConfigError::MissingEndpoint)?;
        Ok(Pipeline {
            middlewares: self.middlewares.into(),
            endpoint,
        })
    }
}
