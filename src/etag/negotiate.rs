//! Negotiation controller — tags a finished response and revalidates it
//! against the request's `If-None-Match`.

use std::sync::Arc;

use tracing::{debug, info};

use super::fingerprint::{ETag, compute_etag};
use super::gate::{self, Ineligible};
use super::options::ETagOptions;
use crate::error::NegotiationError;
use crate::http::{Request, Response, StatusCode};

/// What [`Negotiator::negotiate`] did to the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response was left untouched.
    Skipped(Ineligible),
    /// An `ETag` header was added; the status stays `200 OK`.
    Tagged(ETag),
    /// An `ETag` header was added and the status rewritten to `304 Not Modified`.
    NotModified(ETag),
}

/// Applies one set of [`ETagOptions`] to finished responses.
///
/// Cheap to clone; the options are shared read-only.
#[derive(Debug, Clone)]
pub struct Negotiator {
    options: Arc<ETagOptions>,
}

impl Negotiator {
    pub fn new(options: impl Into<Arc<ETagOptions>>) -> Self {
        let options = options.into();
        debug!(
            algorithm = %options.algorithm(),
            validator = %options.validator(),
            max_body_length = options.max_body_length(),
            allow_head = options.allows_head(),
            "ETag negotiator configured"
        );
        Self { options }
    }

    pub fn options(&self) -> &ETagOptions {
        &self.options
    }

    /// Tags `response` and rewrites it to `304` when the client's copy is current.
    ///
    /// Once the gate passes, the `ETag` header is set whether or not the
    /// request matches, so both `200` and `304` responses carry it.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::BodyNotBuffered`] when the response would
    /// qualify but its body streams to a host sink. The response is not
    /// modified in that case.
    pub fn negotiate(
        &self,
        request: &Request,
        response: &mut Response,
    ) -> Result<Outcome, NegotiationError> {
        let body = response.body().as_bytes();
        let verdict = gate::check(
            request.method(),
            response.status(),
            response.headers(),
            body.map_or(0, <[u8]>::len),
            request.headers(),
            &self.options,
        );
        if let Err(reason) = verdict {
            return Ok(Outcome::Skipped(reason));
        }
        let body = body.ok_or(NegotiationError::BodyNotBuffered)?;

        let if_none_match: Vec<&str> = request.headers().tokens("If-None-Match").collect();
        if !if_none_match.is_empty() {
            info!(if_none_match = ?if_none_match, "request has an If-None-Match header");
        }

        let etag = compute_etag(body, &self.options);
        response.set_header("ETag", etag.to_string());
        info!(validator = %self.options.validator(), etag = %etag, "set ETag on response");

        if etag.matches_any(if_none_match) {
            response.set_status(StatusCode::NotModified);
            info!(etag = %etag, "If-None-Match matches; responding 304 Not Modified");
            Ok(Outcome::NotModified(etag))
        } else {
            Ok(Outcome::Tagged(etag))
        }
    }
}
