//! # Integration Tests for Contract Bindings, Verifier, and Tracker
//!
//! Runs the ledger client against wiremock JSON-RPC servers to verify
//! request construction, ABI round-trips, confirmation polling, and the
//! verify-then-resolve composition without a live chain.
//!
//! Mocks discriminate calls by the 4-byte selector (or JSON-RPC method
//! name) appearing in the request body. `serde_json` renders object
//! keys sorted, so body substring matches are deterministic.

use std::time::Duration;

use metacert_chain::{
    CertLedger, ChainError, ConfirmationTracker, CredentialVerifier, LedgerConfig, RpcClient,
    RpcConfig, TrackerConfig, TxHandle, VerifierConfig,
};
use metacert_core::{Address, TokenUid};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTRACT: &str = "0xbFB014898E5f55d98136fCD3dB7964231113e5aF";
const OWNER: &str = "0x1ddc4663d4ea70b96a05372466952755a54a5834";
const SENDER: &str = "0x00a329c0648769a73afac7f9381e08fb43dbea72";

// keccak256("certMinted(uint256)")
const CERT_MINTED_TOPIC: &str =
    "0xa809625a2a051c62c99b566321a763ec45149af775ced1e21f5101c3cb72913e";

fn rpc_result(value: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": value }))
}

fn hex_word(value_hex: &str) -> String {
    format!("{value_hex:0>64}")
}

/// ABI-encode a return of a single dynamic string.
fn abi_string_return(s: &str) -> String {
    let mut data = hex::encode(s.as_bytes());
    while data.len() % 64 != 0 {
        data.push('0');
    }
    format!(
        "0x{}{}{}",
        hex_word("20"),
        hex_word(&format!("{:x}", s.len())),
        data
    )
}

fn ledger_for(server: &MockServer) -> CertLedger {
    let rpc = RpcClient::new(RpcConfig::new(server.uri())).expect("rpc build");
    CertLedger::new(
        rpc,
        LedgerConfig::read_only(Address::new(CONTRACT).unwrap()),
    )
}

fn writable_ledger_for(server: &MockServer) -> CertLedger {
    let rpc = RpcClient::new(RpcConfig::new(server.uri())).expect("rpc build");
    CertLedger::new(
        rpc,
        LedgerConfig::read_only(Address::new(CONTRACT).unwrap())
            .with_sender(Address::new(SENDER).unwrap()),
    )
}

fn verifier_for(server: &MockServer) -> CredentialVerifier {
    CredentialVerifier::new(
        ledger_for(server),
        VerifierConfig::default().with_gateway(server.uri()),
    )
    .expect("verifier build")
}

// ── Contract reads ───────────────────────────────────────────────────

#[tokio::test]
async fn verify_cert_decodes_boolean() {
    let server = MockServer::start().await;

    // Selector for verifyCert(address,uint256), token 5.
    Mock::given(method("POST"))
        .and(body_string_contains("757c80b3"))
        .respond_with(rpc_result(serde_json::json!(format!("0x{}", hex_word("01")))))
        .expect(1)
        .mount(&server)
        .await;

    let ledger = ledger_for(&server);
    let owner = Address::new(OWNER).unwrap();
    assert!(ledger.verify_cert(&owner, TokenUid(5)).await.unwrap());
}

#[tokio::test]
async fn verify_cert_false_for_non_holder_or_absent_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("757c80b3"))
        .respond_with(rpc_result(serde_json::json!(format!("0x{}", hex_word("00")))))
        .expect(1)
        .mount(&server)
        .await;

    let ledger = ledger_for(&server);
    let owner = Address::new(OWNER).unwrap();
    // The entry point answers false for both "not the owner" and
    // "token 7 does not exist" — indistinguishable by design.
    assert!(!ledger.verify_cert(&owner, TokenUid(7)).await.unwrap());
}

#[tokio::test]
async fn owner_of_decodes_address() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("6352211e"))
        .respond_with(rpc_result(serde_json::json!(format!(
            "0x{}",
            hex_word(&OWNER[2..])
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let ledger = ledger_for(&server);
    let owner = ledger.owner_of(TokenUid(3)).await.unwrap();
    assert_eq!(owner, Address::new(OWNER).unwrap());
}

#[tokio::test]
async fn head_block_parses_hex_quantity() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("eth_blockNumber"))
        .respond_with(rpc_result(serde_json::json!("0x401")))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(ledger_for(&server).head_block().await.unwrap(), 1025);
}

// ── Verifier composition ─────────────────────────────────────────────

#[tokio::test]
async fn resolve_rewrites_fetches_and_parses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("c87b56dd"))
        .respond_with(rpc_result(serde_json::json!(abi_string_return(
            "ipfs://QmMeta"
        ))))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ipfs/QmMeta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Alice's Diploma",
            "description": "Completed program",
            "image": "ipfs://QmImg",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let verifier = verifier_for(&server);
    let resolved = verifier.resolve(TokenUid(1)).await.unwrap();
    assert_eq!(resolved.metadata.name, "Alice's Diploma");
    assert_eq!(resolved.metadata_url, format!("{}/ipfs/QmMeta", server.uri()));
    assert_eq!(resolved.image_url, format!("{}/ipfs/QmImg", server.uri()));

    // Reads mutate nothing: a second resolve returns identical data.
    let again = verifier.resolve(TokenUid(1)).await.unwrap();
    assert_eq!(again, resolved);
}

#[tokio::test]
async fn resolve_accepts_gateway_form_token_uri() {
    let server = MockServer::start().await;

    // The contract stored a gateway URL instead of the raw form; both
    // must resolve identically.
    Mock::given(method("POST"))
        .and(body_string_contains("c87b56dd"))
        .respond_with(rpc_result(serde_json::json!(abi_string_return(
            "https://gateway.pinata.cloud/ipfs/QmMeta"
        ))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ipfs/QmMeta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Bob's Award",
            "description": "For service",
            "image": "ipfs://QmImg",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let verifier = verifier_for(&server);
    let resolved = verifier.resolve(TokenUid(2)).await.unwrap();
    assert_eq!(resolved.metadata_url, format!("{}/ipfs/QmMeta", server.uri()));
}

#[tokio::test]
async fn resolve_maps_gateway_failure_to_metadata_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("c87b56dd"))
        .respond_with(rpc_result(serde_json::json!(abi_string_return(
            "ipfs://QmGone"
        ))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ipfs/QmGone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let verifier = verifier_for(&server);
    let err = verifier.resolve(TokenUid(9)).await.unwrap_err();
    assert!(matches!(err, ChainError::MetadataUnavailable { .. }));
}

#[tokio::test]
async fn resolve_maps_malformed_document_to_metadata_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("c87b56dd"))
        .respond_with(rpc_result(serde_json::json!(abi_string_return(
            "ipfs://QmBad"
        ))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ipfs/QmBad"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let verifier = verifier_for(&server);
    let err = verifier.resolve(TokenUid(9)).await.unwrap_err();
    assert!(matches!(err, ChainError::MetadataUnavailable { .. }));
}

#[tokio::test]
async fn negative_verification_short_circuits_resolution() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("757c80b3"))
        .respond_with(rpc_result(serde_json::json!(format!("0x{}", hex_word("00")))))
        .expect(1)
        .mount(&server)
        .await;

    // tokenURI must never be called when verification fails.
    Mock::given(method("POST"))
        .and(body_string_contains("c87b56dd"))
        .respond_with(rpc_result(serde_json::json!(abi_string_return("ipfs://Qm"))))
        .expect(0)
        .mount(&server)
        .await;

    let verifier = verifier_for(&server);
    let owner = Address::new(OWNER).unwrap();
    let err = verifier
        .verify_and_resolve(&owner, TokenUid(7))
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::VerificationFailed { .. }));
}

// ── Writes and confirmation ──────────────────────────────────────────

#[tokio::test]
async fn mint_without_sender_is_not_connected() {
    let server = MockServer::start().await;
    let ledger = ledger_for(&server); // read-only: no signing identity

    let owner = Address::new(OWNER).unwrap();
    let err = ledger
        .mint_cert(TokenUid(1), &owner, "ipfs://QmMeta")
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::NotConnected));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn mint_rejects_empty_metadata_url_before_submission() {
    let server = MockServer::start().await;
    let ledger = writable_ledger_for(&server);

    let owner = Address::new(OWNER).unwrap();
    let err = ledger.mint_cert(TokenUid(1), &owner, "").await.unwrap_err();
    assert!(matches!(err, ChainError::InvalidArgument { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn register_issuer_validates_numeric_ids() {
    let server = MockServer::start().await;
    let ledger = writable_ledger_for(&server);

    let err = ledger
        .register_issuer("Example University", "1 Campus Way", 0, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::InvalidArgument { .. }));

    let err = ledger
        .register_issuer("", "1 Campus Way", 123, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::InvalidArgument { .. }));
}

#[tokio::test]
async fn mint_confirmation_extracts_uid_by_signature() {
    let server = MockServer::start().await;
    let tx_hash = "0x4479a29476e18aa9e273fcad63a73b1fd31ec1a7069f5125a94b0e992c7d85a6";

    Mock::given(method("POST"))
        .and(body_string_contains("eth_sendTransaction"))
        .and(body_string_contains("2b84e7aa"))
        .respond_with(rpc_result(serde_json::json!(tx_hash)))
        .expect(1)
        .mount(&server)
        .await;

    // First poll: still pending.
    Mock::given(method("POST"))
        .and(body_string_contains("eth_getTransactionReceipt"))
        .respond_with(rpc_result(serde_json::Value::Null))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Second poll: included, mint event sitting behind a transfer log.
    Mock::given(method("POST"))
        .and(body_string_contains("eth_getTransactionReceipt"))
        .respond_with(rpc_result(serde_json::json!({
            "transactionHash": tx_hash,
            "blockNumber": "0x3ea",
            "status": "0x1",
            "logs": [
                {
                    "address": CONTRACT,
                    "topics": ["0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"],
                    "data": "0x",
                },
                {
                    "address": CONTRACT,
                    "topics": [CERT_MINTED_TOPIC],
                    "data": format!("0x{}", hex_word("2a")),
                },
            ],
        })))
        .mount(&server)
        .await;

    let ledger = writable_ledger_for(&server);
    let owner = Address::new(OWNER).unwrap();
    let handle = ledger
        .mint_cert(TokenUid(42), &owner, "https://gateway.pinata.cloud/ipfs/QmMeta")
        .await
        .unwrap();
    assert_eq!(handle.hash, tx_hash);

    let tracker = ConfirmationTracker::new(
        ledger.rpc().clone(),
        TrackerConfig {
            poll_interval: Duration::from_millis(10),
            timeout: Duration::from_secs(5),
        },
    );
    let receipt = tracker.await_confirmation(&handle).await.unwrap();
    assert_eq!(receipt.block_number, 1002);
    assert_eq!(receipt.minted_token_uid().unwrap(), TokenUid(42));
}

#[tokio::test]
async fn reverted_transaction_fails_confirmation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("eth_getTransactionReceipt"))
        .respond_with(rpc_result(serde_json::json!({
            "transactionHash": "0xdead",
            "blockNumber": "0x10",
            "status": "0x0",
            "logs": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = ConfirmationTracker::new(
        RpcClient::new(RpcConfig::new(server.uri())).unwrap(),
        TrackerConfig::default(),
    );
    let err = tracker
        .await_confirmation(&TxHandle {
            hash: "0xdead".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        ChainError::TransactionFailed { reason } => assert!(reason.contains("reverted")),
        other => panic!("expected TransactionFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn pending_forever_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("eth_getTransactionReceipt"))
        .respond_with(rpc_result(serde_json::Value::Null))
        .mount(&server)
        .await;

    let tracker = ConfirmationTracker::new(
        RpcClient::new(RpcConfig::new(server.uri())).unwrap(),
        TrackerConfig {
            poll_interval: Duration::from_millis(10),
            timeout: Duration::from_millis(50),
        },
    );
    let err = tracker
        .await_confirmation(&TxHandle {
            hash: "0xpending".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        ChainError::TransactionFailed { reason } => assert!(reason.contains("timed out")),
        other => panic!("expected TransactionFailed, got: {other:?}"),
    }
}
