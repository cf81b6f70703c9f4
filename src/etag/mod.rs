//! ETag generation and `If-None-Match` revalidation.
//!
//! The pieces, leaves first:
//!
//! - [`options`] — [`ETagOptions`] (hash algorithm, validator strength, body
//!   size limit) and sparse [`ETagOverrides`].
//! - [`fingerprint`] — [`compute_etag`] and the [`ETag`] value type.
//! - [`gate`] — the eligibility predicate ([`gate::check`], [`gate::is_eligible`]).
//! - [`negotiate`] — [`Negotiator`], which tags a finished response and
//!   rewrites it to `304 Not Modified` on a match.
//! - Two interceptors sharing one buffering pass: [`ETagMiddleware`] for a
//!   whole [`Pipeline`](crate::middleware::Pipeline) and [`ETagRoute`] for a
//!   single [`Handler`](crate::handler::Handler).
//!
//! ## Matching
//!
//! `If-None-Match` members from every header line are compared with weak
//! comparison: quotes and any `W/` prefix are stripped from both sides and
//! the remainder is compared ASCII case-insensitively. `*` matches anything.
//!
//! ## Failure behavior
//!
//! A negotiation failure is logged and swallowed; the client receives the
//! downstream response verbatim, untagged. Errors from the downstream handler
//! are returned unchanged and skip negotiation.

pub mod fingerprint;
pub mod gate;
mod intercept;
pub mod middleware;
pub mod negotiate;
pub mod options;
pub mod route;

pub use fingerprint::{EMPTY_BODY_DIGEST, ETag, compute_etag};
pub use gate::Ineligible;
pub use middleware::ETagMiddleware;
pub use negotiate::{Negotiator, Outcome};
pub use options::{
    DEFAULT_MAX_BODY_LENGTH, ETagOptions, ETagOverrides, HashAlgorithm, ValidatorStrength,
};
pub use route::ETagRoute;
