//! Typed environment configuration
//!
//! Every accessor comes in two flavours: `*_optional` returns `Ok(None)` for
//! an unset variable, `*_required` turns that into [`EnvError::Missing`]. A
//! set but malformed value is always an error.
//!
//! Lookups go through an [`EnvSource`], so tests can inject a `HashMap`
//! instead of touching the process environment.

use std::collections::HashMap;

use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::errors::{ErrorCause, ErrorKind, UtilError};

/// Where variables are read from
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Environment variable \"{0}\" is required")]
    Missing(String),

    #[error("Environment variable \"{0}\" must be a number")]
    NotANumber(String),

    #[error("Environment variable \"{0}\" must be a boolean (true/false/1/0/on/off/yes/no)")]
    NotABoolean(String),

    #[error("Environment variable \"{0}\" must be a valid port number")]
    InvalidPort(String),

    #[error("Environment variable \"{name}\" must be a valid URL")]
    InvalidUrl {
        name: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Environment variable \"{name}\" must be a valid JSON string")]
    InvalidJson {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Environment variable \"{0}\" must match the regex pattern")]
    PatternMismatch(String),

    #[error("Environment variable \"{name}\" must be one of the allowed values. \"{value}\" was provided.")]
    NotOneOf { name: String, value: String },
}

impl EnvError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnvError::Missing(_) => ErrorKind::Error,
            EnvError::NotANumber(_) | EnvError::NotABoolean(_) | EnvError::InvalidUrl { .. } => {
                ErrorKind::TypeError
            }
            EnvError::InvalidJson { .. } | EnvError::PatternMismatch(_) => ErrorKind::SyntaxError,
            EnvError::InvalidPort(_) | EnvError::NotOneOf { .. } => ErrorKind::RangeError,
        }
    }
}

impl From<EnvError> for UtilError {
    fn from(err: EnvError) -> Self {
        let cause = match &err {
            EnvError::InvalidUrl { source, .. } => Some(ErrorCause::from(UtilError::new(
                ErrorKind::TypeError,
                source.to_string(),
            ))),
            EnvError::InvalidJson { source, .. } => Some(ErrorCause::from(UtilError::new(
                ErrorKind::SyntaxError,
                source.to_string(),
            ))),
            _ => None,
        };
        UtilError {
            kind: err.kind(),
            message: err.to_string(),
            cause,
        }
    }
}

pub type Result<T> = std::result::Result<T, EnvError>;

/// Leading-integer parse: optional whitespace and sign, then digits
///
/// Trailing garbage is ignored (`"42px"` is 42); no digits at all is `None`.
fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Typed view over an [`EnvSource`]
#[derive(Debug, Clone, Default)]
pub struct Env<S = ProcessEnv> {
    source: S,
}

impl Env<ProcessEnv> {
    pub fn from_process() -> Self {
        Self::new(ProcessEnv)
    }
}

impl<S: EnvSource> Env<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    fn require<T>(name: &str, value: Option<T>) -> Result<T> {
        value.ok_or_else(|| EnvError::Missing(name.to_string()))
    }

    pub fn optional(&self, name: &str) -> Option<String> {
        let value = self.source.var(name);
        tracing::trace!(name, found = value.is_some(), "env lookup");
        value
    }

    pub fn required(&self, name: &str) -> Result<String> {
        Self::require(name, self.optional(name))
    }

    pub fn int_optional(&self, name: &str) -> Result<Option<i64>> {
        self.optional(name)
            .map(|value| parse_int_prefix(&value).ok_or_else(|| EnvError::NotANumber(name.to_string())))
            .transpose()
    }

    pub fn int_required(&self, name: &str) -> Result<i64> {
        Self::require(name, self.int_optional(name)?)
    }

    pub fn bool_optional(&self, name: &str) -> Result<Option<bool>> {
        self.optional(name)
            .map(|value| parse_bool(&value).ok_or_else(|| EnvError::NotABoolean(name.to_string())))
            .transpose()
    }

    pub fn bool_required(&self, name: &str) -> Result<bool> {
        Self::require(name, self.bool_optional(name)?)
    }

    /// Ports below 1024 are reserved and rejected
    pub fn port_optional(&self, name: &str) -> Result<Option<u16>> {
        let Some(value) = self.int_optional(name)? else {
            return Ok(None);
        };
        match u16::try_from(value) {
            Ok(port) if port >= 1024 => Ok(Some(port)),
            _ => Err(EnvError::InvalidPort(name.to_string())),
        }
    }

    pub fn port_required(&self, name: &str) -> Result<u16> {
        Self::require(name, self.port_optional(name)?)
    }

    pub fn url_optional(&self, name: &str) -> Result<Option<Url>> {
        self.optional(name)
            .map(|value| {
                Url::parse(&value).map_err(|source| EnvError::InvalidUrl {
                    name: name.to_string(),
                    source,
                })
            })
            .transpose()
    }

    pub fn url_required(&self, name: &str) -> Result<Url> {
        Self::require(name, self.url_optional(name)?)
    }

    pub fn json_optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        self.optional(name)
            .map(|value| {
                serde_json::from_str(&value).map_err(|source| EnvError::InvalidJson {
                    name: name.to_string(),
                    source,
                })
            })
            .transpose()
    }

    pub fn json_required<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        Self::require(name, self.json_optional(name)?)
    }

    pub fn regex_optional(&self, name: &str, pattern: &Regex) -> Result<Option<String>> {
        match self.optional(name) {
            Some(value) if !pattern.is_match(&value) => {
                Err(EnvError::PatternMismatch(name.to_string()))
            }
            value => Ok(value),
        }
    }

    pub fn regex_required(&self, name: &str, pattern: &Regex) -> Result<String> {
        Self::require(name, self.regex_optional(name, pattern)?)
    }

    pub fn one_of_optional(&self, name: &str, allowed: &[&str]) -> Result<Option<String>> {
        match self.optional(name) {
            Some(value) if !allowed.contains(&value.as_str()) => Err(EnvError::NotOneOf {
                name: name.to_string(),
                value,
            }),
            value => Ok(value),
        }
    }

    pub fn one_of_required(&self, name: &str, allowed: &[&str]) -> Result<String> {
        Self::require(name, self.one_of_optional(name, allowed)?)
    }
}
