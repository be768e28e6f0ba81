//! Wire events as delivered by a relay.
//!
//! A `RawEvent` is untrusted: relays return whatever was published to them,
//! and nothing about its shape beyond the JSON field types is guaranteed.
//! Typed records are produced from it only through validation.

use serde::{Deserialize, Serialize};

/// A single tag: an ordered list of strings whose first element is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// Builds a tag from its parts.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// The tag key, if the tag has any elements.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The first value after the key.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }
}

/// A signed event as received from a relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event identifier (hex of the SHA-256 of the serialized event).
    pub id: String,
    /// Author public key (hex).
    pub pubkey: String,
    /// Event kind.
    pub kind: u16,
    /// Unix timestamp of creation, in seconds.
    pub created_at: u64,
    /// Tags, in publication order.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Free-form content.
    #[serde(default)]
    pub content: String,
    /// Schnorr signature over the id.
    #[serde(default)]
    pub sig: String,
}

impl RawEvent {
    /// Returns the first value of the first tag named `name`.
    ///
    /// Duplicate keys are legal; only the first match is consulted, even if
    /// it carries no value.
    #[must_use]
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name() == Some(name))
            .and_then(Tag::value)
    }
}
