//! Body fingerprinting and validator comparison.
//!
//! An ETag is the base64url (unpadded) digest of the whole buffered body,
//! wrapped in double quotes and prefixed with `W/` when weak. Empty bodies
//! skip hashing and use [`EMPTY_BODY_DIGEST`].

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use tracing::debug;

use super::options::{ETagOptions, HashAlgorithm, ValidatorStrength};

/// Opaque tag used for every empty body, whatever the configured algorithm.
///
/// This is the unpadded base64url SHA-512 of zero bytes.
pub const EMPTY_BODY_DIGEST: &str =
    "z4PhNX7vuL3xVChQ1m2AB9Yg5AULVxXcg_SpIdNs6c5H0NE8XYXysP-DGNKHfuwvY7kxvUdBeoGlODJ6-SfaPg";

/// An entity tag: an opaque string plus its validator strength.
///
/// # Examples
///
/// ```
/// use etagger::etag::{ETag, ValidatorStrength};
///
/// let tag = ETag::new(ValidatorStrength::Weak, "abc123");
/// assert_eq!(tag.to_string(), r#"W/"abc123""#);
/// assert!(tag.matches(r#""abc123""#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ETag {
    strength: ValidatorStrength,
    opaque: String,
}

impl ETag {
    /// Creates a tag from its unquoted opaque part.
    pub fn new(strength: ValidatorStrength, opaque: impl Into<String>) -> Self {
        Self {
            strength,
            opaque: opaque.into(),
        }
    }

    pub fn is_weak(&self) -> bool {
        self.strength == ValidatorStrength::Weak
    }

    /// The tag without quotes or weak prefix.
    pub fn opaque(&self) -> &str {
        &self.opaque
    }

    /// Compares against one `If-None-Match` member.
    ///
    /// Uses weak comparison: the `W/` prefix and surrounding quotes are
    /// stripped from the candidate, then the opaque parts are compared
    /// ASCII case-insensitively. `*` matches any tag.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        candidate == "*" || opaque_part(candidate).eq_ignore_ascii_case(&self.opaque)
    }

    /// Returns `true` if any of `candidates` [`matches`](Self::matches).
    pub fn matches_any<'a>(&self, candidates: impl IntoIterator<Item = &'a str>) -> bool {
        candidates.into_iter().any(|candidate| self.matches(candidate))
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_weak() {
            write!(f, "W/\"{}\"", self.opaque)
        } else {
            write!(f, "\"{}\"", self.opaque)
        }
    }
}

/// Fingerprints `body` with the algorithm and validator strength in `options`.
///
/// # Examples
///
/// ```
/// use etagger::etag::{compute_etag, ETagOptions, EMPTY_BODY_DIGEST};
///
/// let options = ETagOptions::default();
/// let tag = compute_etag(b"", &options);
/// assert_eq!(tag.to_string(), format!("\"{EMPTY_BODY_DIGEST}\""));
/// ```
pub fn compute_etag(body: &[u8], options: &ETagOptions) -> ETag {
    if body.is_empty() {
        debug!("response has no body content; using the empty-body tag");
        return ETag::new(options.validator(), EMPTY_BODY_DIGEST);
    }

    let digest = digest(options.algorithm(), body);
    debug!(
        algorithm = %options.algorithm(),
        hash_len = digest.len(),
        "hashed response body"
    );
    ETag::new(options.validator(), URL_SAFE_NO_PAD.encode(digest))
}

fn digest(algorithm: HashAlgorithm, body: &[u8]) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Md5 => Md5::digest(body).to_vec(),
        HashAlgorithm::Sha1 => Sha1::digest(body).to_vec(),
        HashAlgorithm::Sha256 => Sha256::digest(body).to_vec(),
        HashAlgorithm::Sha384 => Sha384::digest(body).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(body).to_vec(),
    }
}

// `W/"abc"` -> `abc`, `"abc"` -> `abc`
fn opaque_part(tag: &str) -> &str {
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    tag.trim_matches('"')
}
