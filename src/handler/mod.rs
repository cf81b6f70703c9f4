//! Endpoint handlers — the innermost step of a pipeline.
//!
//! Handlers are stored behind `Arc<dyn Fn(…)>` so they can be cloned and
//! shared across tasks without copying the underlying closure. Build one from
//! an async closure with [`handler_fn`] or, when the body can fail,
//! [`try_handler_fn`]; decorators such as
//! [`ETagRoute`](crate::etag::ETagRoute) take a [`Handler`] and return another.

use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::PipelineError;

/// A heap-allocated, `Send` future.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Type-erased async handler that consumes a [`Context`] and hands it back
/// once the response has been produced.
pub type Handler =
    Arc<dyn Fn(Context) -> BoxFuture<Result<Context, PipelineError>> + Send + Sync + 'static>;

/// Wraps an infallible async closure as a [`Handler`].
///
/// # Examples
///
/// ```rust
/// use etagger::StatusCode;
/// use etagger::handler::handler_fn;
///
/// let accepted = handler_fn(|mut ctx| async move {
///     ctx.response_mut().set_status(StatusCode::Accepted);
///     ctx
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Handler
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Context> + Send + 'static,
{
    Arc::new(move |ctx: Context| -> BoxFuture<Result<Context, PipelineError>> {
        let fut = f(ctx);
        Box::pin(async move { Ok(fut.await) })
    })
}

/// Wraps a fallible async closure as a [`Handler`]. Its error is reported as
/// [`PipelineError::Handler`].
///
/// # Examples
///
/// ```rust
/// use etagger::handler::try_handler_fn;
///
/// let hello = try_handler_fn(|mut ctx| async move {
///     ctx.response_mut().write(b"Hello, World!")?;
///     Ok::<_, std::io::Error>(ctx)
/// });
/// ```
pub fn try_handler_fn<F, Fut, E>(f: F) -> Handler
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Context, E>> + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    Arc::new(move |ctx: Context| -> BoxFuture<Result<Context, PipelineError>> {
        let fut = f(ctx);
        Box::pin(async move { fut.await.map_err(PipelineError::handler) })
    })
}
