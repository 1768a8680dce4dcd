// Target Domain Model

use super::error::{DomainError, Result};
use std::fmt;
use std::str::FromStr;

/// Endpoint being watched (URL string)
///
/// Immutable once constructed. Construction only checks that the string
/// looks like an endpoint reference (`scheme://rest`, no whitespace); the
/// prober decides whether it is actually reachable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target(String);

impl Target {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();

        if raw.trim().is_empty() {
            return Err(invalid(&raw, "target is empty"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(invalid(&raw, "target contains whitespace"));
        }

        match raw.split_once("://") {
            Some((scheme, rest)) if is_scheme(scheme) && !rest.is_empty() => Ok(Self(raw)),
            Some(_) => Err(invalid(&raw, "malformed scheme or missing host")),
            None => Err(invalid(&raw, "missing scheme (expected e.g. https://)")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn invalid(raw: &str, reason: &str) -> DomainError {
    DomainError::InvalidTarget {
        target: raw.to_string(),
        reason: reason.to_string(),
    }
}

impl FromStr for Target {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Target {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
