//! Canonical payload assembly
//!
//! Layout (all fields NUL-terminated, no escaping):
//! - prefix: `00 00 00 01` (scheme version 1) followed by `00` (policy byte)
//! - timestamp: 8 bytes, big-endian, followed by `00`
//! - method, url, authorization, body: raw bytes, each followed by `00`
//!
//! Any verifier has to rebuild these bytes exactly. A NUL inside a field
//! is indistinguishable from the delimiter; that ambiguity belongs to the
//! scheme and is left alone.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::timestamp::Timestamp;
use crate::SCHEME_VERSION;

/// Policy byte following the version in the payload prefix
pub const POLICY_BYTE: u8 = 0;

/// Field delimiter
const NUL: u8 = 0;

/// Offset of the 8 timestamp bytes within the payload
pub const PAYLOAD_TIMESTAMP_OFFSET: usize = 5;

/// The request fields covered by a signature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestParts<'a> {
    /// HTTP method, e.g. `POST`
    pub method: &'a [u8],
    /// Request URL or path exactly as the authority sees it
    pub url: &'a [u8],
    /// `Authorization` header value, empty when absent
    pub authorization: &'a [u8],
    /// Request body, empty when absent
    pub body: &'a [u8],
}

impl<'a> RequestParts<'a> {
    pub fn new(method: &'a [u8], url: &'a [u8], authorization: &'a [u8], body: &'a [u8]) -> Self {
        Self {
            method,
            url,
            authorization,
            body,
        }
    }
}

/// Exact byte sequence that is hashed and signed
///
/// Wiped on drop since it carries the authorization header.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CanonicalPayload(Vec<u8>);

impl CanonicalPayload {
    /// Assemble the payload for `request` at `timestamp`
    pub fn build(timestamp: Timestamp, request: &RequestParts<'_>) -> Self {
        let fields = [
            request.method,
            request.url,
            request.authorization,
            request.body,
        ];
        let capacity = PAYLOAD_TIMESTAMP_OFFSET
            + 8
            + 1
            + fields.iter().map(|f| f.len() + 1).sum::<usize>();

        let mut buf = Vec::with_capacity(capacity);
        buf.extend_from_slice(&SCHEME_VERSION.to_be_bytes());
        buf.push(POLICY_BYTE);
        buf.extend_from_slice(&timestamp.to_be_bytes());
        buf.push(NUL);
        for field in fields {
            buf.extend_from_slice(field);
            buf.push(NUL);
        }
        Self(buf)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Timestamp bytes embedded in the payload
    pub fn timestamp_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out.copy_from_slice(&self.0[PAYLOAD_TIMESTAMP_OFFSET..PAYLOAD_TIMESTAMP_OFFSET + 8]);
        out
    }

    /// Hasher primed with the payload, ready for digest signing
    pub fn hasher(&self) -> Sha256 {
        Sha256::new_with_prefix(&self.0)
    }

    /// SHA-256 of the payload
    pub fn digest(&self) -> [u8; 32] {
        self.hasher().finalize().into()
    }
}

impl core::fmt::Debug for CanonicalPayload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CanonicalPayload")
            .field("len", &self.0.len())
            .field("timestamp", &u64::from_be_bytes(self.timestamp_bytes()))
            .finish()
    }
}

impl AsRef<[u8]> for CanonicalPayload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
