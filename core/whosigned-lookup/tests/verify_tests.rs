mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use whosigned_lookup::transport::mock::{MockConnector, MockRelay};
use whosigned_lookup::{
    CancelHandle, CancelSignal, FanOutConfig, FileVerifier, LookupConfig, LookupError,
    ProfileOutcome, ResolverConfig,
};
use whosigned_types::generate_user_name;

const PROFILES: &str = "wss://profiles.test";

fn lookup_config() -> LookupConfig {
    LookupConfig {
        records: FanOutConfig::default(),
        identities: ResolverConfig {
            preferred: endpoint(PROFILES),
            fallbacks: vec![],
            use_default_transport: false,
            ..Default::default()
        },
    }
}

#[tokio::test(start_paused = true)]
async fn verifies_records_and_resolves_each_signer_once() {
    init_tracing();
    let alice = key('a');
    let bob = key('b');
    let profiles = MockRelay::with_events(vec![named_profile(&alice, 1, "alice")]);
    let connector = Arc::new(
        MockConnector::new()
            .with_relay(
                RELAY_A,
                MockRelay::with_events(vec![
                    file_event("a1", &alice, 300),
                    file_event("a2", &alice, 200),
                ]),
            )
            .with_relay(
                RELAY_B,
                MockRelay::with_events(vec![
                    file_event("b1", &bob, 100),
                    file_event("a1", &alice, 300),
                ]),
            )
            .with_relay(RELAY_C, MockRelay::hanging())
            .with_relay(PROFILES, profiles.clone()),
    );
    let verifier = FileVerifier::new(connector.clone(), lookup_config());

    let verification = verifier
        .verify(
            HASH,
            &[endpoint(RELAY_A), endpoint(RELAY_B), endpoint(RELAY_C)],
            &CancelSignal::never(),
        )
        .await
        .unwrap();

    let ids: Vec<&str> = verification.signatures.iter().map(|s| s.record.id()).collect();
    assert_eq!(ids, vec!["a1", "a2", "b1"]);
    assert_eq!(verification.unique_signers(), 2);
    assert_eq!(verification.summary(), "Found 3 signatures from 2 signers");

    // one profile query per distinct signer
    assert_eq!(profiles.query_count(), 2);

    let alice_view = &verification.signatures[0].signer;
    assert_eq!(alice_view.display_name(), "alice");
    assert!(alice_view.profile.is_found());

    let bob_view = &verification.signatures[2].signer;
    assert_eq!(bob_view.profile, ProfileOutcome::NotFound);
    assert_eq!(bob_view.display_name(), generate_user_name(&bob));
}

#[tokio::test]
async fn unsigned_hash_is_empty_success() {
    let connector =
        Arc::new(MockConnector::new().with_relay(RELAY_A, MockRelay::with_events(vec![])));
    let verifier = FileVerifier::new(connector, lookup_config());

    let verification = verifier
        .verify(HASH, &[endpoint(RELAY_A)], &CancelSignal::never())
        .await
        .unwrap();

    assert!(verification.is_unsigned());
    assert_eq!(verification.summary(), "Found 0 signatures from 0 signers");
}

#[tokio::test]
async fn single_signature_summary_is_singular() {
    let connector = Arc::new(
        MockConnector::new()
            .with_relay(RELAY_A, MockRelay::with_events(vec![file_event("only", &key('1'), 1)])),
    );
    let verifier = FileVerifier::new(connector, lookup_config());

    let verification = verifier
        .verify(HASH, &[endpoint(RELAY_A)], &CancelSignal::never())
        .await
        .unwrap();
    assert_eq!(verification.summary(), "Found 1 signature from 1 signer");
}

#[tokio::test]
async fn signer_with_malformed_key_is_not_found() {
    let connector = Arc::new(MockConnector::new().with_relay(
        RELAY_A,
        MockRelay::with_events(vec![file_event("odd", "not-a-key", 1)]),
    ));
    let verifier = FileVerifier::new(connector.clone(), lookup_config());

    let verification = verifier
        .verify(HASH, &[endpoint(RELAY_A)], &CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(verification.signatures.len(), 1);
    assert_eq!(verification.signatures[0].signer.profile, ProfileOutcome::NotFound);
    assert_eq!(connector.connected(), vec![RELAY_A.to_string()]);
}

#[tokio::test]
async fn invalid_hash_input_is_rejected() {
    let connector = Arc::new(MockConnector::new());
    let verifier = FileVerifier::new(connector.clone(), lookup_config());

    let err = verifier
        .verify("invalid-hash", &[endpoint(RELAY_A)], &CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::InvalidHash(_)));
    assert!(connector.connected().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_signer_resolution() {
    let connector = Arc::new(
        MockConnector::new()
            .with_relay(RELAY_A, MockRelay::with_events(vec![file_event("e1", &key('1'), 1)]))
            .with_relay(PROFILES, MockRelay::hanging()),
    );
    let verifier = FileVerifier::new(connector, lookup_config());
    let handle = CancelHandle::new();
    let signal = handle.signal();
    let endpoints = [endpoint(RELAY_A)];

    let (result, _) = tokio::join!(verifier.verify(HASH, &endpoints, &signal), async {
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        handle.cancel();
    });

    assert!(matches!(result, Err(LookupError::Cancelled)));
}

#[tokio::test]
async fn verification_serializes_for_rendering() {
    let connector = Arc::new(
        MockConnector::new()
            .with_relay(RELAY_A, MockRelay::with_events(vec![file_event("e1", &key('1'), 1)])),
    );
    let verifier = FileVerifier::new(connector, lookup_config());

    let verification = verifier
        .verify(HASH, &[endpoint(RELAY_A)], &CancelSignal::never())
        .await
        .unwrap();
    let json = serde_json::to_value(&verification).unwrap();

    assert_eq!(json["hash"], HASH);
    assert_eq!(json["signatures"][0]["record"]["id"], "e1");
    assert_eq!(json["signatures"][0]["signer"]["profile"]["outcome"], "not_found");
    assert_eq!(json["endpoints"][0]["status"]["status"], "responded");
}
