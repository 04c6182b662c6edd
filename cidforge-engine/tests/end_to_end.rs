//! End-to-end tests for the CID engine
//!
//! Exercises the full pipeline: bytes → chunks → nodes → multihash →
//! CID string, plus parse/convert round trips and the timeout race.
//!
//! Run with: cargo test --package cidforge-engine --test end_to_end

use cidforge_engine::{
    calculate_cid, convert_cid, parse_cid, same_content, verify_cid, ByteSource, CidError,
    CidOptions, CidVersion, Codec, Multibase, DEFAULT_CHUNK_SIZE, MAX_INPUT_SIZE,
};
use std::io::Write;

/// Generate test file data of specified size
fn generate_file(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Route engine debug output through the test harness when RUST_LOG is set
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn test_empty_input_is_stable() {
    init_tracing();
    let a = calculate_cid(Vec::new(), CidOptions::default()).await.unwrap();
    let b = calculate_cid(Vec::new(), CidOptions::default()).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a, "bafybeif7ztnhq65lumvvtr4ekcwd2ifwgm3awq4zfr3srh462rwyinlb4y");
}

#[tokio::test]
async fn test_hello_world_across_versions() {
    let v1 = calculate_cid(b"hello world".as_slice(), CidOptions::default())
        .await
        .unwrap();
    assert_eq!(
        v1,
        "bafybeihykld7uyxzogax6vgyvag42y7464eywpf55gxi5qpoisibh3c5wa"
    );

    let v0 = calculate_cid(
        b"hello world".as_slice(),
        CidOptions::default().with_version(CidVersion::V0),
    )
    .await
    .unwrap();
    assert_eq!(v0, "Qmf412jQZiuVUtdgnB36FXFX7xg5V6KEbSJ4dpQuhkLyfD");

    // same multihash behind both renderings
    assert!(same_content(&v0, &v1).unwrap());
}

#[tokio::test]
async fn test_multi_chunk_pipeline() {
    init_tracing();
    // large enough for four chunks, not aligned to the chunk size
    let data = generate_file(3 * DEFAULT_CHUNK_SIZE + 1000);

    let chunked = calculate_cid(data.clone(), CidOptions::default())
        .await
        .unwrap();
    let unchunked = calculate_cid(data.clone(), CidOptions::default().with_chunking(false))
        .await
        .unwrap();

    // deterministic
    let again = calculate_cid(data, CidOptions::default()).await.unwrap();
    assert_eq!(chunked, again);

    // the DAG shape is part of the identity
    assert_ne!(chunked, unchunked);
}

#[tokio::test]
async fn test_small_input_chunking_flag_is_irrelevant() {
    let data = generate_file(1000);
    let with = calculate_cid(data.clone(), CidOptions::default())
        .await
        .unwrap();
    let without = calculate_cid(data, CidOptions::default().with_chunking(false))
        .await
        .unwrap();
    assert_eq!(with, without);
}

#[tokio::test]
async fn test_file_and_memory_sources_agree() {
    let data = generate_file(2 * DEFAULT_CHUNK_SIZE + 17);
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&data).unwrap();
    tmp.flush().unwrap();

    let from_memory = calculate_cid(data, CidOptions::default()).await.unwrap();
    let from_file = calculate_cid(ByteSource::from_path(tmp.path()), CidOptions::default())
        .await
        .unwrap();
    assert_eq!(from_memory, from_file);
}

#[tokio::test]
async fn test_size_bound_rejected_before_hashing() {
    // sparse file: the gate must trip on metadata alone
    let tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.as_file().set_len(MAX_INPUT_SIZE + 1).unwrap();

    let result = calculate_cid(ByteSource::from_path(tmp.path()), CidOptions::default()).await;
    assert!(matches!(result, Err(CidError::SizeExceeded { .. })));
}

#[tokio::test]
async fn test_v0_raw_combination_fails() {
    let options = CidOptions::default()
        .with_version(CidVersion::V0)
        .with_format(Codec::Raw);
    let result = calculate_cid(b"data".as_slice(), options).await;
    assert!(matches!(result, Err(CidError::VersionCodec(_))));
}

#[tokio::test]
async fn test_timeout_fires() {
    // enough work that a 1 ms budget cannot win the race
    let data = generate_file(32 * 1024 * 1024);
    let result = calculate_cid(data, CidOptions::default().with_timeout_ms(1)).await;
    assert!(matches!(result, Err(CidError::Timeout { timeout_ms: 1 })));
}

#[tokio::test]
async fn test_parse_convert_round_trip() {
    let original = calculate_cid(b"round trip".as_slice(), CidOptions::default())
        .await
        .unwrap();
    let parsed = parse_cid(&original).unwrap();

    // re-render through base58btc and back
    let b58 = convert_cid(
        &parsed,
        &CidOptions::default().with_encoding(Multibase::Base58Btc),
    )
    .unwrap();
    assert!(b58.starts_with('z'));

    let reparsed = parse_cid(&b58).unwrap();
    assert_eq!(reparsed.multihash(), parsed.multihash());
    assert_eq!(reparsed.codec(), parsed.codec());

    // and back to base32 text
    let b32 = convert_cid(&b58, &CidOptions::default()).unwrap();
    assert_eq!(b32, original);
}

#[tokio::test]
async fn test_convert_v0_to_v1() {
    let v0 = calculate_cid(
        b"legacy".as_slice(),
        CidOptions::default().with_version(CidVersion::V0),
    )
    .await
    .unwrap();
    assert!(v0.starts_with("Qm"));

    let v1 = convert_cid(&v0, &CidOptions::default()).unwrap();
    assert!(v1.starts_with('b'));
    assert!(same_content(&v0, &v1).unwrap());

    // and back down
    let back = convert_cid(&v1, &CidOptions::default().with_version(CidVersion::V0)).unwrap();
    assert_eq!(back, v0);
}

#[tokio::test]
async fn test_convert_raw_to_v0_fails() {
    let raw = calculate_cid(
        b"raw bytes".as_slice(),
        CidOptions::default().with_format(Codec::Raw),
    )
    .await
    .unwrap();
    let result = convert_cid(&raw, &CidOptions::default().with_version(CidVersion::V0));
    assert!(matches!(result, Err(CidError::VersionCodec(_))));
}

#[tokio::test]
async fn test_verify_against_remote_identifier() {
    let data = b"pinned content".to_vec();
    // the "service" returns a v0 identifier for dag-pb content
    let remote = calculate_cid(
        data.clone(),
        CidOptions::default().with_version(CidVersion::V0),
    )
    .await
    .unwrap();

    assert!(verify_cid(data.clone(), &remote).await.unwrap());
    assert!(!verify_cid(b"tampered content".to_vec(), &remote)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_verify_follows_expected_codec() {
    let data = b"raw pinned".to_vec();
    let remote = calculate_cid(data.clone(), CidOptions::default().with_format(Codec::Raw))
        .await
        .unwrap();
    assert!(verify_cid(data, &remote).await.unwrap());
}

#[tokio::test]
async fn test_parse_rejects_garbage() {
    assert!(parse_cid("").is_err());
    assert!(parse_cid("definitely not a CID").is_err());
    assert!(parse_cid("Qm_invalid_base58_characters_________________").is_err());
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let inputs: Vec<Vec<u8>> = (0..8).map(|i| generate_file(10_000 + i)).collect();
    let handles: Vec<_> = inputs
        .iter()
        .map(|data| tokio::spawn(calculate_cid(data.clone(), CidOptions::default())))
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    // every distinct input gets a distinct identifier, reproducibly
    for (data, cid) in inputs.iter().zip(&results) {
        let again = calculate_cid(data.clone(), CidOptions::default())
            .await
            .unwrap();
        assert_eq!(&again, cid);
    }
    let unique: std::collections::HashSet<_> = results.iter().collect();
    assert_eq!(unique.len(), results.len());
}
