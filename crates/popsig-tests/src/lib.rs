//! Shared fixtures for the popsig end-to-end tests

/// PKCS#8 DER P-256 key used across the test suites
pub const P256_DER: &[u8] = include_bytes!("../../popsig-core/tests/fixtures/p256.der");

/// P-256 key whose public X coordinate starts with a zero byte
pub const P256_SHORT_X_DER: &[u8] =
    include_bytes!("../../popsig-core/tests/fixtures/p256_short_x.der");

/// Envelope over the example request, produced by an independent ECDSA implementation
pub const REFERENCE_ENVELOPE: &[u8] =
    include_bytes!("../../popsig-core/tests/fixtures/reference_envelope.bin");

/// FILETIME of the reference envelope
pub const REFERENCE_TIMESTAMP: u64 = 132_000_000_000_000_000;
