//! Eligibility gate — decides whether a response gets an ETag at all.

use std::fmt;

use tracing::{debug, info};

use super::options::ETagOptions;
use crate::http::{Headers, Method, StatusCode};

/// Why a response was left untagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligible {
    /// Only `GET` (and `HEAD` when enabled) is fingerprinted.
    Method(Method),
    /// The request carried `Cache-Control: no-cache`.
    NoCache,
    /// The response status is not `200 OK`.
    Status(StatusCode),
    /// The response already carries an `ETag`.
    ExistingETag,
    /// The buffered body is larger than the configured limit.
    BodyTooLarge { len: usize, max: usize },
}

impl fmt::Display for Ineligible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(method) => write!(f, "method {method} is not eligible"),
            Self::NoCache => f.write_str("request sent Cache-Control: no-cache"),
            Self::Status(status) => write!(f, "status {status} is not 200 OK"),
            Self::ExistingETag => f.write_str("response already has an ETag"),
            Self::BodyTooLarge { len, max } => {
                write!(f, "body of {len} bytes exceeds the {max} byte limit")
            }
        }
    }
}

/// Checks every eligibility rule and reports the first one that fails.
///
/// Rules, in order:
///
/// 1. The method is `GET`, or `HEAD` when [`ETagOptions::allows_head`].
/// 2. No `no-cache` token appears in the request's `Cache-Control` headers.
/// 3. The response status is exactly `200 OK`.
/// 4. The response has no `ETag` header yet.
/// 5. `body_len` is at most [`ETagOptions::max_body_length`].
pub fn check(
    method: &Method,
    status: StatusCode,
    response_headers: &Headers,
    body_len: usize,
    request_headers: &Headers,
    options: &ETagOptions,
) -> Result<(), Ineligible> {
    let eligible_method =
        *method == Method::Get || (*method == Method::Head && options.allows_head());
    if !eligible_method {
        debug!(%method, "method is not eligible for ETag");
        return Err(Ineligible::Method(method.clone()));
    }

    if is_no_cache(request_headers) {
        debug!("Cache-Control: no-cache disables ETag for this request");
        return Err(Ineligible::NoCache);
    }

    if status != StatusCode::Ok {
        debug!(%status, "status is not 200; skipping ETag");
        return Err(Ineligible::Status(status));
    }

    if response_headers.contains("ETag") {
        debug!("response already has an ETag header");
        return Err(Ineligible::ExistingETag);
    }

    let max = options.max_body_length();
    if body_len > max {
        debug!(body_len, max, "body exceeds the configured ETag size limit");
        return Err(Ineligible::BodyTooLarge { len: body_len, max });
    }

    Ok(())
}

/// Boolean form of [`check`].
pub fn is_eligible(
    method: &Method,
    status: StatusCode,
    response_headers: &Headers,
    body_len: usize,
    request_headers: &Headers,
    options: &ETagOptions,
) -> bool {
    check(
        method,
        status,
        response_headers,
        body_len,
        request_headers,
        options,
    )
    .is_ok()
}

/// Returns `true` if a `Cache-Control` directive is exactly `no-cache`
/// (ASCII case-insensitive), looking at every comma-separated token.
pub fn is_no_cache(request_headers: &Headers) -> bool {
    let cache_control: Vec<&str> = request_headers.tokens("Cache-Control").collect();
    if !cache_control.is_empty() {
        info!(cache_control = ?cache_control, "request has a Cache-Control header");
    }
    cache_control
        .iter()
        .any(|directive| directive.eq_ignore_ascii_case("no-cache"))
}
