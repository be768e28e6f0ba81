//! Signer profiles (kind 0 metadata events).

use crate::display::generate_user_name;
use crate::event::RawEvent;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Event kind of a profile metadata event.
pub const PROFILE_KIND: u16 = 0;

/// Self-published display metadata. Every field is optional, and a field of
/// the wrong JSON type is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    /// Avatar URL.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub picture: Option<String>,
    /// Short bio.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub about: Option<String>,
    /// Verified handle (`user@domain`).
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub nip05: Option<String>,
}

impl ProfileMetadata {
    /// Parses profile JSON. Blank or malformed content yields `None`.
    #[must_use]
    pub fn parse(content: &str) -> Option<Self> {
        if content.trim().is_empty() {
            return None;
        }
        match serde_json::from_str(content) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!("Failed to parse profile metadata: {e}");
                None
            }
        }
    }
}

/// The profile chosen for a signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    /// The signer this profile belongs to.
    pub pubkey: String,
    /// The metadata event the profile was read from.
    pub event: RawEvent,
    /// Parsed metadata; `None` when the event content could not be read.
    pub metadata: Option<ProfileMetadata>,
}

impl ProfileRecord {
    /// Picks the newest revision among `events` and parses it.
    ///
    /// Events that are not profile events by `pubkey` are ignored. On equal
    /// timestamps the earlier event in `events` wins. Returns `None` when
    /// nothing usable remains.
    pub fn latest<I>(pubkey: &str, events: I) -> Option<Self>
    where
        I: IntoIterator<Item = RawEvent>,
    {
        let mut latest: Option<RawEvent> = None;
        for event in events {
            if event.kind != PROFILE_KIND || !event.pubkey.eq_ignore_ascii_case(pubkey) {
                continue;
            }
            if latest.as_ref().is_none_or(|l| event.created_at > l.created_at) {
                latest = Some(event);
            }
        }
        latest.map(|event| Self::from_event(pubkey, event))
    }

    /// Wraps a single profile event.
    pub fn from_event(pubkey: impl Into<String>, event: RawEvent) -> Self {
        let metadata = ProfileMetadata::parse(&event.content);
        Self {
            pubkey: pubkey.into(),
            event,
            metadata,
        }
    }

    /// `name`, then `display_name`, then a name generated from the key.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.metadata
            .as_ref()
            .and_then(|m| non_empty(&m.name).or_else(|| non_empty(&m.display_name)))
            .map(str::to_string)
            .unwrap_or_else(|| generate_user_name(&self.pubkey))
    }

    #[must_use]
    pub fn picture(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| non_empty(&m.picture))
    }

    #[must_use]
    pub fn about(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| non_empty(&m.about))
    }

    #[must_use]
    pub fn nip05(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| non_empty(&m.nip05))
    }
}

/// Accepts a JSON string; any other value becomes `None`.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
