//! Presentation helpers shared by anything that shows records or signers.

use sha2::{Digest, Sha256};

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

const ADJECTIVES: [&str; 16] = [
    "Swift", "Quiet", "Bright", "Bold", "Clever", "Gentle", "Lucky", "Brave",
    "Calm", "Eager", "Happy", "Keen", "Mellow", "Nimble", "Proud", "Wise",
];

const NOUNS: [&str; 16] = [
    "Falcon", "Otter", "Badger", "Heron", "Lynx", "Panda", "Raven", "Tiger",
    "Walrus", "Fox", "Koala", "Moose", "Owl", "Gecko", "Bison", "Crane",
];

/// Formats a byte count with 1024-based units and up to two decimals.
///
/// `0` is `"0 Bytes"`, `1536` is `"1.5 KB"`, `1048576` is `"1 MB"`.
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut number = format!("{value:.2}");
    if number.contains('.') {
        number = number.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{number} {}", SIZE_UNITS[unit])
}

/// A stable, human-friendly name for a key with no profile.
///
/// The same key always maps to the same name.
#[must_use]
pub fn generate_user_name(pubkey: &str) -> String {
    let digest = Sha256::digest(pubkey.to_ascii_lowercase().as_bytes());
    let adjective = ADJECTIVES[(digest[0] as usize) % ADJECTIVES.len()];
    let noun = NOUNS[(digest[1] as usize) % NOUNS.len()];
    let suffix = hex::encode(&digest[2..4]);
    format!("{adjective} {noun} {suffix}")
}
