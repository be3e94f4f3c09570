//! Property-based tests for token issuance and verification
//!
//! These tests verify:
//! - Issued tokens roundtrip correctly (issue -> verify -> claims)
//! - Malformed tokens never verify and never cause panics
//! - Payload tampering is always detected
//! - Subject binding and key validation work correctly

mod common;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Duration;
use janus_auth_core::{SigningKey, TokenCodec};
use janus_types::Role;
use proptest::prelude::*;

use common::{test_codec, TEST_SECRET};

// ============================================================================
// Strategies
// ============================================================================

/// Generate plausible usernames
fn arb_subject() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{2,20}"
}

/// Generate role sets, including the empty set
fn arb_roles() -> impl Strategy<Value = Vec<Role>> {
    prop::collection::vec(prop_oneof![Just(Role::User), Just(Role::Admin)], 0..3)
}

/// Generate malformed token strings
fn arb_malformed_token() -> impl Strategy<Value = String> {
    prop_oneof![
        // No dots
        "[a-zA-Z0-9_-]{10,50}",
        // Too many segments
        "[a-zA-Z0-9_-]{5,15}\\.[a-zA-Z0-9_-]{5,15}\\.[a-zA-Z0-9_-]{5,15}\\.[a-zA-Z0-9_-]{5,15}",
        // Empty parts
        Just("..signature".to_string()),
        Just("header..".to_string()),
        Just("..".to_string()),
        Just(".".to_string()),
        Just("".to_string()),
        // Invalid base64 characters
        "[!@#$%^&*()]{5,20}\\.[a-zA-Z0-9_-]{10,30}\\.[a-zA-Z0-9_-]{10,30}",
        // Valid base64 but not JSON
        any::<[u8; 32]>().prop_map(|bytes| {
            let junk = URL_SAFE_NO_PAD.encode(bytes);
            format!("{junk}.{junk}.{junk}")
        }),
        // Truncated signatures
        any::<[u8; 16]>().prop_map(|bytes| {
            let payload = URL_SAFE_NO_PAD.encode(bytes);
            format!("{payload}.{payload}.ab")
        }),
    ]
}

/// Generate valid signing keys (32+ bytes)
fn arb_valid_key() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), 32..64)
        .prop_map(|bytes| bytes.iter().map(|b| (b % 94 + 33) as char).collect())
}

/// Generate invalid signing keys (< 32 bytes)
fn arb_invalid_key() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), 1..31)
        .prop_map(|bytes| bytes.iter().map(|b| (b % 94 + 33) as char).collect())
}

// ============================================================================
// Signing Key Validation Properties
// ============================================================================

proptest! {
    /// Property: Valid keys (32+ bytes) should be accepted
    #[test]
    fn prop_valid_key_accepted(key in arb_valid_key()) {
        let result = SigningKey::new(&key);
        prop_assert!(result.is_ok(), "Key of {} bytes should be valid", key.len());
    }

    /// Property: Invalid keys (< 32 bytes) should be rejected
    #[test]
    fn prop_invalid_key_rejected(key in arb_invalid_key()) {
        let result = SigningKey::new(&key);
        prop_assert!(result.is_err(), "Key of {} bytes should be rejected", key.len());
    }
}

// ============================================================================
// Issue/Verify Properties
// ============================================================================

proptest! {
    /// Property: Issued tokens should always verify for their subject
    #[test]
    fn prop_issued_token_roundtrips(subject in arb_subject(), roles in arb_roles()) {
        let codec = test_codec();

        let token = codec.issue(&subject, &roles).unwrap();
        let claims = codec.verify(&token, &subject).unwrap();

        prop_assert_eq!(claims.sub, subject);
        prop_assert_eq!(claims.roles, roles);
        prop_assert_eq!(claims.iss, codec.issuer());
        prop_assert!(claims.exp > claims.iat);
    }

    /// Property: Malformed tokens should never verify and never panic
    #[test]
    fn prop_malformed_token_never_verifies(token in arb_malformed_token(), subject in arb_subject()) {
        let codec = test_codec();
        prop_assert!(codec.verify(&token, &subject).is_err());
    }

    /// Property: The subject can be peeked without the key
    #[test]
    fn prop_peek_subject_matches_issued(subject in arb_subject(), roles in arb_roles()) {
        let codec = test_codec();
        let token = codec.issue(&subject, &roles).unwrap();
        prop_assert_eq!(TokenCodec::peek_subject(&token), Some(subject));
    }

    /// Property: A token issued to one subject never verifies as another
    #[test]
    fn prop_foreign_subject_rejected(owner in arb_subject(), other in arb_subject()) {
        prop_assume!(owner != other);
        let codec = test_codec();

        let token = codec.issue(&owner, &[Role::User]).unwrap();
        prop_assert!(codec.verify(&token, &other).is_err());
    }

    /// Property: Any bit flip in the payload should be detected
    #[test]
    fn prop_payload_tampering_detected(
        subject in arb_subject(),
        tamper_byte in 0usize..512usize,
        tamper_bit in 0u8..8u8
    ) {
        let codec = test_codec();
        let token = codec.issue(&subject, &[Role::User]).unwrap();

        // Flip one bit of the decoded payload and re-encode it
        let parts: Vec<&str> = token.split('.').collect();
        prop_assert_eq!(parts.len(), 3);

        let mut payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let idx = tamper_byte % payload.len();
        payload[idx] ^= 1 << tamper_bit;

        let tampered = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(&payload),
            parts[2]
        );
        prop_assert!(codec.verify(&tampered, &subject).is_err());
    }

    /// Property: Tokens never verify under a different key
    #[test]
    fn prop_wrong_key_rejected(subject in arb_subject(), other_key in arb_valid_key()) {
        prop_assume!(other_key != TEST_SECRET);
        let codec = test_codec();
        let other = TokenCodec::new(
            SigningKey::new(&other_key).unwrap(),
            codec.issuer(),
            Duration::seconds(3600),
        );

        let token = codec.issue(&subject, &[Role::User]).unwrap();
        prop_assert!(other.verify(&token, &subject).is_err());
    }

    /// Property: Tokens from a different issuer are rejected
    #[test]
    fn prop_foreign_issuer_rejected(subject in arb_subject(), issuer in "[a-z][a-z-]{3,20}") {
        let codec = test_codec();
        prop_assume!(issuer != codec.issuer());

        let foreign = TokenCodec::new(
            SigningKey::new(TEST_SECRET).unwrap(),
            issuer,
            Duration::seconds(3600),
        );

        let token = foreign.issue(&subject, &[Role::User]).unwrap();
        prop_assert!(codec.verify(&token, &subject).is_err());
    }
}

// ============================================================================
// Non-Property Edge Case Tests
// ============================================================================

#[test]
fn test_key_exactly_32_bytes() {
    let key = "a".repeat(32);
    assert!(SigningKey::new(&key).is_ok());
}

#[test]
fn test_key_31_bytes_rejected() {
    let key = "a".repeat(31);
    assert!(SigningKey::new(&key).is_err());
}

#[test]
fn test_issued_token_has_three_segments() {
    let codec = test_codec();
    let token = codec.issue("alice", &[Role::User]).unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[test]
fn test_peek_subject_on_garbage_is_none() {
    assert_eq!(TokenCodec::peek_subject("not-a-token"), None);
    assert_eq!(TokenCodec::peek_subject(""), None);
    assert_eq!(TokenCodec::peek_subject(".!!!."), None);
}
