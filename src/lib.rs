//! # etagger
//!
//! ETag fingerprinting and conditional-GET revalidation for async HTTP
//! pipelines.
//!
//! Responses to eligible `GET` requests are buffered, hashed, and tagged with
//! an `ETag` header. When the request's `If-None-Match` names the same tag,
//! the response is rewritten to `304 Not Modified` and its body is dropped.
//!
//! ## Quick Start
//!
//! ```rust
//! use etagger::{Context, Pipeline, Request, StatusCode, handler::try_handler_fn};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::builder()
//!     .use_etag()
//!     .endpoint(try_handler_fn(|mut ctx| async move {
//!         ctx.response_mut().write(b"Hello, World!")?;
//!         Ok::<_, std::io::Error>(ctx)
//!     }))
//!     .build()?;
//!
//! let first = pipeline.execute(Context::new(Request::get("/"))).await?;
//! let etag = first.response().headers().get("ETag").unwrap_or_default().to_owned();
//!
//! let revalidated = pipeline
//!     .execute(Context::new(Request::get("/").header("If-None-Match", etag)))
//!     .await?;
//! assert_eq!(revalidated.response().status(), StatusCode::NotModified);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod etag;
pub mod handler;
pub mod http;
pub mod middleware;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use context::Context;
pub use error::{ConfigError, NegotiationError, PipelineError};
pub use etag::{ETagMiddleware, ETagOptions, ETagRoute};
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use middleware::{Middleware, Next, Pipeline};
