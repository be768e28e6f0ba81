//! Acceptance rules for hashes and file metadata records.
//!
//! Every component that needs to decide whether a hash or a record is
//! acceptable calls into this module. Pure functions, no I/O.

use crate::event::RawEvent;
use crate::record::RecordKind;
use crate::{Error, Result};

/// Length of a hex-encoded SHA-256 digest or public key.
pub const HEX_KEY_LEN: usize = 64;

fn is_hex64(s: &str) -> bool {
    s.len() == HEX_KEY_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Whether `s` is exactly 64 hex digits, in any case.
#[must_use]
pub fn is_valid_hash(s: &str) -> bool {
    is_hex64(s)
}

/// Whether `s` has the shape of a hex-encoded public key.
#[must_use]
pub fn is_valid_public_key(s: &str) -> bool {
    is_hex64(s)
}

/// Checks a raw event against the file metadata schema, naming the first
/// rule it breaks.
pub fn check_file_record(event: &RawEvent) -> Result<()> {
    if RecordKind::from_kind(event.kind).is_none() {
        return Err(Error::UnsupportedKind(event.kind));
    }

    match event.tag_value("url") {
        Some(url) if !url.is_empty() => {}
        _ => return Err(Error::MissingTag("url")),
    }

    match event.tag_value("x") {
        Some(x) if x.is_empty() => Err(Error::MissingTag("x")),
        Some(x) if !is_valid_hash(x) => Err(Error::InvalidHash(x.to_string())),
        Some(_) => Ok(()),
        None => Err(Error::MissingTag("x")),
    }
}

/// Whether a raw event is an acceptable file metadata record.
#[must_use]
pub fn is_valid_file_record(event: &RawEvent) -> bool {
    check_file_record(event).is_ok()
}
