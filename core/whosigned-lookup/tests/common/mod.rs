//! Shared test helpers for lookup tests.

#![allow(dead_code)]

use whosigned_types::{RawEvent, RelayEndpoint, Tag, PROFILE_KIND};

/// The example hash shown on the verification page.
pub const HASH: &str = "a1b2c3d4e5f6789012345678901234567890abcdef1234567890abcdef123456";

pub const RELAY_A: &str = "wss://relay-a.test";
pub const RELAY_B: &str = "wss://relay-b.test";
pub const RELAY_C: &str = "wss://relay-c.test";

/// Routes `RUST_LOG` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A 64-hex-char key made of one repeated digit.
pub fn key(digit: char) -> String {
    digit.to_string().repeat(64)
}

pub fn endpoint(url: &str) -> RelayEndpoint {
    RelayEndpoint::new(url)
}

/// A valid PRIMARY file record for `HASH`.
pub fn file_event(id: &str, signer: &str, created_at: u64) -> RawEvent {
    RawEvent {
        id: id.to_string(),
        pubkey: signer.to_string(),
        kind: 1063,
        created_at,
        tags: vec![
            Tag::new(["url", "https://cdn.test/files/report.pdf"]),
            Tag::new(["x", HASH]),
            Tag::new(["m", "application/pdf"]),
            Tag::new(["size", "2048"]),
        ],
        content: "quarterly report".into(),
        sig: "00".repeat(64),
    }
}

/// A file record missing its `url` tag.
pub fn event_without_url(id: &str, signer: &str) -> RawEvent {
    let mut event = file_event(id, signer, 1_700_000_000);
    event.tags.retain(|t| t.name() != Some("url"));
    event
}

/// A profile event for `signer` with the given JSON content.
pub fn profile_event(signer: &str, created_at: u64, content: &str) -> RawEvent {
    RawEvent {
        id: format!("{created_at:064x}"),
        pubkey: signer.to_string(),
        kind: PROFILE_KIND,
        created_at,
        tags: vec![],
        content: content.into(),
        sig: "00".repeat(64),
    }
}

/// A profile event with just a name.
pub fn named_profile(signer: &str, created_at: u64, name: &str) -> RawEvent {
    profile_event(signer, created_at, &format!(r#"{{"name":"{name}"}}"#))
}
