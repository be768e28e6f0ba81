//! File metadata records (NIP-94).

use crate::event::{RawEvent, Tag};
use crate::validate::check_file_record;
use crate::{Error, Result};
use serde::{Serialize, Serializer};

/// The two event kinds that carry file metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Regular file metadata event.
    Primary,
    /// Replaceable variant used by app stores and similar publishers.
    Replaceable,
}

impl RecordKind {
    /// All accepted kinds, in filter order.
    pub const ALL: [RecordKind; 2] = [RecordKind::Primary, RecordKind::Replaceable];

    /// The wire kind number.
    #[must_use]
    pub const fn kind(self) -> u16 {
        match self {
            RecordKind::Primary => 1063,
            RecordKind::Replaceable => 3063,
        }
    }

    /// Maps a wire kind number back, if it is a file metadata kind.
    #[must_use]
    pub const fn from_kind(kind: u16) -> Option<Self> {
        match kind {
            1063 => Some(RecordKind::Primary),
            3063 => Some(RecordKind::Replaceable),
            _ => None,
        }
    }
}

/// A raw event that passed file record validation.
///
/// Can only be built through `TryFrom<RawEvent>`, so holding one means the
/// `url` and `x` tags are present and well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    kind: RecordKind,
    event: RawEvent,
}

impl FileRecord {
    /// Unique identifier; the deduplication key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.event.id
    }

    /// Public key of the signer.
    #[must_use]
    pub fn signer(&self) -> &str {
        &self.event.pubkey
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Creation time, seconds since the Unix epoch.
    #[must_use]
    pub fn created_at(&self) -> u64 {
        self.event.created_at
    }

    /// Free-text description.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.event.content
    }

    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.event.tags
    }

    /// Where the file can be fetched.
    #[must_use]
    pub fn url(&self) -> &str {
        self.event.tag_value("url").unwrap_or_default()
    }

    /// The content hash the record asserts.
    #[must_use]
    pub fn hash(&self) -> &str {
        self.event.tag_value("x").unwrap_or_default()
    }

    /// MIME type from the `m` tag.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.event.tag_value("m")
    }

    /// Byte count from the `size` tag, when it parses as a decimal integer.
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.event.tag_value("size")?.trim().parse().ok()
    }

    /// Last path segment of the URL, or "Unknown File".
    #[must_use]
    pub fn file_name(&self) -> &str {
        match self.url().rsplit('/').next() {
            Some(name) if !name.is_empty() => name,
            _ => "Unknown File",
        }
    }

    /// Whether the MIME type announces an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type().is_some_and(|m| m.starts_with("image/"))
    }

    /// The underlying signed event.
    #[must_use]
    pub fn as_event(&self) -> &RawEvent {
        &self.event
    }

    #[must_use]
    pub fn into_event(self) -> RawEvent {
        self.event
    }
}

impl TryFrom<RawEvent> for FileRecord {
    type Error = Error;

    fn try_from(event: RawEvent) -> Result<Self> {
        check_file_record(&event)?;
        let kind = RecordKind::from_kind(event.kind).ok_or(Error::UnsupportedKind(event.kind))?;
        Ok(Self { kind, event })
    }
}

impl Serialize for FileRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.event.serialize(serializer)
    }
}
