//! popsig core - proof-of-possession request signatures
//!
//! Signs outbound HTTP requests for an authority that expects an ECDSA
//! P-256 signature over a NUL-delimited canonical encoding of the request,
//! stamped with a FILETIME-style timestamp. Key storage, the HTTP client
//! and header injection belong to the host; this crate takes raw byte
//! buffers and returns raw byte buffers.

pub mod encoding;
pub mod envelope;
pub mod error;
pub mod jwk;
pub mod key;
pub mod payload;
pub mod signer;
pub mod timestamp;
pub mod verify;

pub use encoding::{IntegerEncoding, FIELD_SIZE};
pub use envelope::{SignatureEnvelope, ENVELOPE_HEADER_LEN, MAX_ENVELOPE_LEN};
pub use error::{Error, Result};
pub use jwk::ProofKey;
pub use key::{PrivateKey, PublicPoint};
pub use payload::{CanonicalPayload, RequestParts};
pub use signer::RequestSigner;
pub use timestamp::Timestamp;
pub use verify::{verify_bytes, verify_envelope};

/// Signature scheme version, written into payloads and envelopes
pub const SCHEME_VERSION: u32 = 1;

/// HTTP header carrying the base64 envelope
pub const SIGNATURE_HEADER: &str = "Signature";

/// Public key (X, Y) of a PKCS#8 DER P-256 private key
pub fn extract_public_key(der: &[u8], encoding: IntegerEncoding) -> Result<(Vec<u8>, Vec<u8>)> {
    let point = PrivateKey::from_pkcs8_der(der)?.public_point()?;
    Ok(point.coordinates(encoding))
}

/// Sign one request at the current time and return the envelope bytes
pub fn sign(
    der: &[u8],
    method: &[u8],
    url: &[u8],
    authorization: &[u8],
    body: &[u8],
    encoding: IntegerEncoding,
) -> Result<Vec<u8>> {
    let signer = RequestSigner::from_pkcs8_der(der)?.with_encoding(encoding);
    let envelope = signer.sign(&RequestParts::new(method, url, authorization, body))?;
    Ok(envelope.to_bytes())
}
