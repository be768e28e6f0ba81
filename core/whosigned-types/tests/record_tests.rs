use pretty_assertions::assert_eq;
use whosigned_types::validate::{check_file_record, is_valid_file_record, is_valid_public_key};
use whosigned_types::{ContentHash, Error, FileRecord, RawEvent, RecordKind, RelayEndpoint, Tag};

const HASH: &str = "a1b2c3d4e5f6789012345678901234567890abcdef1234567890abcdef123456";

fn file_event(tags: Vec<Tag>) -> RawEvent {
    RawEvent {
        id: "1".repeat(64),
        pubkey: "2".repeat(64),
        kind: 1063,
        created_at: 1_700_000_000,
        tags,
        content: "release build".into(),
        sig: "3".repeat(128),
    }
}

fn full_tags() -> Vec<Tag> {
    vec![
        Tag::new(["url", "https://cdn.example.com/files/app-v1.2.apk"]),
        Tag::new(["x", HASH]),
        Tag::new(["m", "application/vnd.android.package-archive"]),
        Tag::new(["size", "1536"]),
    ]
}

// ── ContentHash ─────────────────────────────────────────────────

#[test]
fn content_hash_parse_valid() {
    let hash = ContentHash::parse(HASH).unwrap();
    assert_eq!(hash.as_str(), HASH);
    assert_eq!(hash.to_string(), HASH);
}

#[test]
fn content_hash_is_case_insensitive() {
    let upper = ContentHash::parse(&HASH.to_uppercase()).unwrap();
    let lower = ContentHash::parse(HASH).unwrap();
    assert_eq!(upper, lower);
    assert!(lower.matches(&HASH.to_uppercase()));
}

#[test]
fn content_hash_rejects_bad_input() {
    assert_eq!(
        ContentHash::parse("invalid-hash"),
        Err(Error::InvalidHash("invalid-hash".into()))
    );
    assert!(ContentHash::parse(&HASH[..63]).is_err());
    assert!(ContentHash::parse(&format!("{HASH}0")).is_err());
    assert!(ContentHash::parse("").is_err());
}

#[test]
fn content_hash_keeps_original_text() {
    let mixed = format!("{}{}", HASH[..32].to_uppercase(), &HASH[32..]);
    let hash = ContentHash::from_form_input(&format!(" {mixed} ")).unwrap();
    assert_eq!(hash.original(), mixed);
    assert_eq!(hash.as_str(), HASH);
    assert_eq!(hash, ContentHash::parse(HASH).unwrap());
    assert_eq!(serde_json::to_value(&hash).unwrap(), serde_json::json!(HASH));
}

#[test]
fn content_hash_form_input_trims() {
    let hash = ContentHash::from_form_input(&format!("  {HASH}\n")).unwrap();
    assert_eq!(hash.as_str(), HASH);
}

#[test]
fn content_hash_form_input_empty() {
    assert_eq!(ContentHash::from_form_input("   "), Err(Error::EmptyHash));
}

#[test]
fn content_hash_from_str_and_prefix() {
    let hash: ContentHash = HASH.parse().unwrap();
    assert_eq!(hash.prefix(8), "a1b2c3d4");
    assert_eq!(hash.prefix(100), HASH);
}

#[test]
fn content_hash_serde_rejects_invalid() {
    let ok: ContentHash = serde_json::from_str(&format!("\"{HASH}\"")).unwrap();
    assert_eq!(ok.as_str(), HASH);
    assert!(serde_json::from_str::<ContentHash>("\"nope\"").is_err());
}

// ── RawEvent ────────────────────────────────────────────────────

#[test]
fn raw_event_deserializes_wire_json() {
    let json = format!(
        r#"{{"id":"{id}","pubkey":"{pk}","kind":1063,"created_at":1700000000,
            "tags":[["url","https://x.test/a.png"],["x","{HASH}"]],"content":"","sig":"00"}}"#,
        id = "a".repeat(64),
        pk = "b".repeat(64),
    );
    let event: RawEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(event.kind, 1063);
    assert_eq!(event.tag_value("url"), Some("https://x.test/a.png"));
    assert_eq!(event.tag_value("x"), Some(HASH));
    assert_eq!(event.tag_value("m"), None);
}

#[test]
fn raw_event_first_duplicate_tag_wins() {
    let event = file_event(vec![
        Tag::new(["url", "https://first.test/a"]),
        Tag::new(["url", "https://second.test/b"]),
        Tag::new(["x", HASH]),
    ]);
    assert_eq!(event.tag_value("url"), Some("https://first.test/a"));
}

#[test]
fn raw_event_tag_without_value() {
    let event = file_event(vec![Tag::new(["url"]), Tag::new(["x", HASH])]);
    assert_eq!(event.tag_value("url"), None);
    assert!(!is_valid_file_record(&event));
}

// ── Validation ──────────────────────────────────────────────────

#[test]
fn check_names_the_broken_rule() {
    let mut wrong_kind = file_event(full_tags());
    wrong_kind.kind = 1;
    assert_eq!(check_file_record(&wrong_kind), Err(Error::UnsupportedKind(1)));

    let no_url = file_event(vec![Tag::new(["x", HASH])]);
    assert_eq!(check_file_record(&no_url), Err(Error::MissingTag("url")));

    let empty_url = file_event(vec![Tag::new(["url", ""]), Tag::new(["x", HASH])]);
    assert_eq!(check_file_record(&empty_url), Err(Error::MissingTag("url")));

    let no_x = file_event(vec![Tag::new(["url", "https://a.test/f"])]);
    assert_eq!(check_file_record(&no_x), Err(Error::MissingTag("x")));

    let bad_x = file_event(vec![Tag::new(["url", "https://a.test/f"]), Tag::new(["x", "abc"])]);
    assert_eq!(check_file_record(&bad_x), Err(Error::InvalidHash("abc".into())));
}

#[test]
fn replaceable_kind_is_accepted() {
    let mut event = file_event(full_tags());
    event.kind = 3063;
    let record = FileRecord::try_from(event).unwrap();
    assert_eq!(record.kind(), RecordKind::Replaceable);
}

#[test]
fn public_key_shape() {
    assert!(is_valid_public_key(&"f".repeat(64)));
    assert!(!is_valid_public_key("npub1xyz"));
}

// ── FileRecord accessors ────────────────────────────────────────

#[test]
fn file_record_accessors() {
    let record = FileRecord::try_from(file_event(full_tags())).unwrap();
    assert_eq!(record.id(), "1".repeat(64));
    assert_eq!(record.signer(), "2".repeat(64));
    assert_eq!(record.kind(), RecordKind::Primary);
    assert_eq!(record.kind().kind(), 1063);
    assert_eq!(record.created_at(), 1_700_000_000);
    assert_eq!(record.content(), "release build");
    assert_eq!(record.url(), "https://cdn.example.com/files/app-v1.2.apk");
    assert_eq!(record.hash(), HASH);
    assert_eq!(record.mime_type(), Some("application/vnd.android.package-archive"));
    assert_eq!(record.size(), Some(1536));
    assert_eq!(record.file_name(), "app-v1.2.apk");
    assert!(!record.is_image());
}

#[test]
fn file_record_image_and_unknown_name() {
    let record = FileRecord::try_from(file_event(vec![
        Tag::new(["url", "https://cdn.example.com/"]),
        Tag::new(["x", HASH]),
        Tag::new(["m", "image/png"]),
        Tag::new(["size", "lots"]),
    ]))
    .unwrap();
    assert!(record.is_image());
    assert_eq!(record.file_name(), "Unknown File");
    assert_eq!(record.size(), None);
}

#[test]
fn file_record_rejects_invalid_event() {
    let err = FileRecord::try_from(file_event(vec![Tag::new(["x", HASH])])).unwrap_err();
    assert_eq!(err, Error::MissingTag("url"));
}

#[test]
fn file_record_serializes_as_event() {
    let event = file_event(full_tags());
    let record = FileRecord::try_from(event.clone()).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json, serde_json::to_value(&event).unwrap());
}

#[test]
fn record_kind_roundtrip() {
    for kind in RecordKind::ALL {
        assert_eq!(RecordKind::from_kind(kind.kind()), Some(kind));
    }
    assert_eq!(RecordKind::from_kind(0), None);
}

// ── RelayEndpoint ───────────────────────────────────────────────

#[test]
fn relay_endpoint_label() {
    let unnamed = RelayEndpoint::new("wss://nos.lol");
    assert_eq!(unnamed.label(), "wss://nos.lol");
    let named = RelayEndpoint::named("Damus", "wss://relay.damus.io");
    assert_eq!(named.label(), "Damus");
    assert_eq!(named.to_string(), "wss://relay.damus.io");
}

#[test]
fn relay_endpoint_serde_optional_name() {
    let endpoint: RelayEndpoint = serde_json::from_str(r#"{"url":"wss://nos.lol"}"#).unwrap();
    assert_eq!(endpoint, RelayEndpoint::new("wss://nos.lol"));
    let json = serde_json::to_string(&endpoint).unwrap();
    assert!(!json.contains("name"));
}
