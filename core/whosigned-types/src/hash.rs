//! SHA-256 content hashes.

use crate::validate::is_valid_hash;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A SHA-256 digest in hex form.
///
/// Always 64 hex characters. Input is accepted in any case; comparison,
/// hashing and serialization use the lowercase form so two hashes that differ
/// only in case are equal. The text as given is kept for display.
#[derive(Debug, Clone)]
pub struct ContentHash {
    hex: String,
    input: String,
}

impl ContentHash {
    /// Parses a hash, rejecting anything that is not exactly 64 hex digits.
    pub fn parse(s: &str) -> Result<Self> {
        if !is_valid_hash(s) {
            return Err(Error::InvalidHash(s.to_string()));
        }
        Ok(Self {
            hex: s.to_ascii_lowercase(),
            input: s.to_string(),
        })
    }

    /// Parses a hash typed into a form: surrounding whitespace is ignored
    /// and blank input is reported separately from a malformed one.
    pub fn from_form_input(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyHash);
        }
        Self::parse(trimmed)
    }

    /// Returns the lowercase hex form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// Returns the hash as it was written, in its original case.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.input
    }

    /// Returns the first `n` characters, for short labels.
    #[must_use]
    pub fn prefix(&self, n: usize) -> &str {
        &self.hex[..n.min(self.hex.len())]
    }

    /// Whether `other` names the same digest, ignoring case.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.hex.eq_ignore_ascii_case(other)
    }
}

impl PartialEq for ContentHash {
    fn eq(&self, other: &Self) -> bool {
        self.hex == other.hex
    }
}

impl Eq for ContentHash {}

impl Hash for ContentHash {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hex.hash(state);
    }
}

impl PartialOrd for ContentHash {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ContentHash {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hex.cmp(&other.hex)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl FromStr for ContentHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.hex
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex)
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
