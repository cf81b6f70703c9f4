//! ETag configuration.
//!
//! [`ETagOptions`] is built once, wrapped in an `Arc`, and read concurrently
//! by every request. [`ETagOverrides`] carries a sparse set of settings, used
//! both as the on-disk JSON shape and as per-route inline overrides.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default body size limit for fingerprinting: 40 KiB.
pub const DEFAULT_MAX_BODY_LENGTH: usize = 40 * 1024;

/// Hash function used to fingerprint response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum HashAlgorithm {
    Md5,
    #[default]
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    /// Accepts `md5`, `sha1`, `sha256`, `sha384` and `sha512` in any case,
    /// with or without a dash after `sha`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Strength of the emitted validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ValidatorStrength {
    /// `"<digest>"` — changes whenever a byte of the body changes.
    #[default]
    Strong,
    /// `W/"<digest>"` — promises semantic equivalence only.
    Weak,
}

impl ValidatorStrength {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Weak => "weak",
        }
    }
}

impl fmt::Display for ValidatorStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorStrength {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("strong") {
            Ok(Self::Strong)
        } else if s.trim().eq_ignore_ascii_case("weak") {
            Ok(Self::Weak)
        } else {
            Err(ConfigError::UnknownValidator(s.to_owned()))
        }
    }
}

impl TryFrom<String> for ValidatorStrength {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A sparse set of ETag settings. `None` means "inherit".
///
/// # Examples
///
/// ```
/// use etagger::etag::{ETagOptions, ETagOverrides, HashAlgorithm, ValidatorStrength};
///
/// let global = ETagOptions::default();
/// let route = ETagOverrides {
///     validator: Some(ValidatorStrength::Weak),
///     ..ETagOverrides::default()
/// };
///
/// let merged = global.merged(&route);
/// assert_eq!(merged.algorithm(), HashAlgorithm::Sha1);
/// assert_eq!(merged.validator(), ValidatorStrength::Weak);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ETagOverrides {
    pub algorithm: Option<HashAlgorithm>,
    pub validator: Option<ValidatorStrength>,
    pub max_body_length: Option<usize>,
    pub allow_head: Option<bool>,
}

/// Effective ETag settings.
///
/// | Setting           | Default |
/// |-------------------|---------|
/// | `algorithm`       | SHA-1   |
/// | `validator`       | strong  |
/// | `max_body_length` | 40960   |
/// | `allow_head`      | `false` |
///
/// A `max_body_length` of zero is never active: every constructor replaces it
/// with [`DEFAULT_MAX_BODY_LENGTH`].
///
/// # Examples
///
/// ```
/// use etagger::etag::{ETagOptions, HashAlgorithm};
///
/// let options = ETagOptions::from_json(r#"{ "algorithm": "sha256", "max_body_length": 0 }"#)?;
/// assert_eq!(options.algorithm(), HashAlgorithm::Sha256);
/// assert_eq!(options.max_body_length(), 40960);
/// # Ok::<(), etagger::error::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ETagOverrides")]
pub struct ETagOptions {
    algorithm: HashAlgorithm,
    validator: ValidatorStrength,
    max_body_length: usize,
    allow_head: bool,
}

impl ETagOptions {
    pub fn new(
        algorithm: HashAlgorithm,
        validator: ValidatorStrength,
        max_body_length: usize,
    ) -> Self {
        Self {
            algorithm,
            validator,
            max_body_length: coerce_max_body_length(max_body_length),
            allow_head: false,
        }
    }

    /// Makes `HEAD` requests eligible alongside `GET`.
    #[must_use]
    pub fn with_head(mut self, allow: bool) -> Self {
        self.allow_head = allow;
        self
    }

    /// Parses a JSON options document; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidJson`] for malformed documents, unknown
    /// keys, and unrecognized algorithm or validator names.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Returns these options with every `Some` field of `overrides` applied.
    pub fn merged(&self, overrides: &ETagOverrides) -> Self {
        Self {
            algorithm: overrides.algorithm.unwrap_or(self.algorithm),
            validator: overrides.validator.unwrap_or(self.validator),
            max_body_length: overrides
                .max_body_length
                .map_or(self.max_body_length, coerce_max_body_length),
            allow_head: overrides.allow_head.unwrap_or(self.allow_head),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn validator(&self) -> ValidatorStrength {
        self.validator
    }

    pub fn max_body_length(&self) -> usize {
        self.max_body_length
    }

    pub fn allows_head(&self) -> bool {
        self.allow_head
    }
}

impl Default for ETagOptions {
    fn default() -> Self {
        Self::new(
            HashAlgorithm::default(),
            ValidatorStrength::default(),
            DEFAULT_MAX_BODY_LENGTH,
        )
    }
}

impl From<ETagOverrides> for ETagOptions {
    fn from(overrides: ETagOverrides) -> Self {
        Self::default().merged(&overrides)
    }
}

fn coerce_max_body_length(len: usize) -> usize {
    if len == 0 { DEFAULT_MAX_BODY_LENGTH } else { len }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ETagOptions::default();
        assert_eq!(options.algorithm(), HashAlgorithm::Sha1);
        assert_eq!(options.validator(), ValidatorStrength::Strong);
        assert_eq!(options.max_body_length(), 40960);
        assert!(!options.allows_head());
    }

    #[test]
    fn zero_max_body_length_is_coerced() {
        let options = ETagOptions::new(HashAlgorithm::Md5, ValidatorStrength::Weak, 0);
        assert_eq!(options.max_body_length(), DEFAULT_MAX_BODY_LENGTH);

        let merged = ETagOptions::new(HashAlgorithm::Md5, ValidatorStrength::Weak, 10)
            .merged(&ETagOverrides {
                max_body_length: Some(0),
                ..ETagOverrides::default()
            });
        assert_eq!(merged.max_body_length(), DEFAULT_MAX_BODY_LENGTH);
    }

    #[test]
    fn algorithm_names_parse_loosely() {
        assert_eq!("MD5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!(" sha512 ".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
        assert!(matches!(
            "whirlpool".parse::<HashAlgorithm>(),
            Err(ConfigError::UnknownAlgorithm(name)) if name == "whirlpool"
        ));
    }

    #[test]
    fn validator_names_parse() {
        assert_eq!("Weak".parse::<ValidatorStrength>().unwrap(), ValidatorStrength::Weak);
        assert!(matches!(
            "medium".parse::<ValidatorStrength>(),
            Err(ConfigError::UnknownValidator(_))
        ));
    }

    #[test]
    fn merge_prefers_overrides() {
        let global = ETagOptions::new(HashAlgorithm::Sha384, ValidatorStrength::Strong, 512);
        let merged = global.merged(&ETagOverrides {
            algorithm: Some(HashAlgorithm::Md5),
            validator: None,
            max_body_length: Some(1024),
            allow_head: Some(true),
        });
        assert_eq!(merged.algorithm(), HashAlgorithm::Md5);
        assert_eq!(merged.validator(), ValidatorStrength::Strong);
        assert_eq!(merged.max_body_length(), 1024);
        assert!(merged.allows_head());
    }

    #[test]
    fn empty_overrides_keep_global() {
        let global = ETagOptions::new(HashAlgorithm::Sha512, ValidatorStrength::Weak, 99);
        assert_eq!(global.merged(&ETagOverrides::default()), global);
    }

    #[test]
    fn from_json_full_document() {
        let options = ETagOptions::from_json(
            r#"{ "algorithm": "SHA384", "validator": "weak", "max_body_length": 2048, "allow_head": true }"#,
        )
        .unwrap();
        assert_eq!(options.algorithm(), HashAlgorithm::Sha384);
        assert_eq!(options.validator(), ValidatorStrength::Weak);
        assert_eq!(options.max_body_length(), 2048);
        assert!(options.allows_head());
    }

    #[test]
    fn from_json_empty_document_is_default() {
        assert_eq!(ETagOptions::from_json("{}").unwrap(), ETagOptions::default());
    }

    #[test]
    fn from_json_rejects_unknown_algorithm() {
        let err = ETagOptions::from_json(r#"{ "algorithm": "crc32" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)));
        assert!(err.to_string().contains("crc32"));
    }

    #[test]
    fn from_json_rejects_unknown_keys() {
        assert!(ETagOptions::from_json(r#"{ "algorithim": "md5" }"#).is_err());
    }
}
