//! Relay subscription filters.
//!
//! Serializes to the shape relays expect in a `REQ`:
//! `{"kinds":[1063,3063],"#x":["<hash>"],"limit":100}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single relay filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<u16>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Tag filters keyed as `#<letter>`.
    #[serde(flatten)]
    pub tags: BTreeMap<String, Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to the given event kinds.
    pub fn kinds(mut self, kinds: impl IntoIterator<Item = u16>) -> Self {
        self.kinds.extend(kinds);
        self
    }

    /// Restricts to events signed by one of `authors`.
    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors.extend(authors.into_iter().map(Into::into));
        self
    }

    /// Restricts to events carrying a `name` tag with one of `values`.
    pub fn tag<I, S>(mut self, name: char, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .entry(format!("#{name}"))
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Caps the number of events a relay should return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Values of the `name` tag filter, if any.
    pub fn tag_values(&self, name: char) -> Option<&[String]> {
        self.tags.get(&format!("#{name}")).map(Vec::as_slice)
    }
}
