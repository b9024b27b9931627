//! ECDSA P-256 request signing
//!
//! sign(request):
//!   payload = canonical(timestamp, request)
//!   (r, s)  = ECDSA-P256(SHA256(payload)) with a fresh random nonce
//!   return version || timestamp || r || s

use p256::ecdsa::{signature::RandomizedDigestSigner, Signature, SigningKey};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use tracing::debug;

use crate::encoding::IntegerEncoding;
use crate::envelope::SignatureEnvelope;
use crate::error::{Error, Result};
use crate::key::{PrivateKey, PublicPoint};
use crate::payload::{CanonicalPayload, RequestParts};
use crate::timestamp::Timestamp;

/// Signs requests with one private key
///
/// Holds no mutable state; a single signer can be shared across threads.
#[derive(Clone)]
pub struct RequestSigner {
    signing_key: SigningKey,
    encoding: IntegerEncoding,
}

impl RequestSigner {
    /// Signer using the legacy minimal integer encoding
    pub fn new(key: &PrivateKey) -> Self {
        Self {
            signing_key: SigningKey::from(key.secret_key()),
            encoding: IntegerEncoding::default(),
        }
    }

    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        Ok(Self::new(&PrivateKey::from_pkcs8_der(der)?))
    }

    pub fn with_encoding(mut self, encoding: IntegerEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn encoding(&self) -> IntegerEncoding {
        self.encoding
    }

    pub fn public_point(&self) -> Result<PublicPoint> {
        PublicPoint::from_public_key(&self.signing_key.verifying_key().into())
    }

    /// Sign `request` at the current wall-clock time
    pub fn sign(&self, request: &RequestParts<'_>) -> Result<SignatureEnvelope> {
        self.sign_at(Timestamp::now()?, request)
    }

    /// Sign `request` at a caller-chosen timestamp
    pub fn sign_at(
        &self,
        timestamp: Timestamp,
        request: &RequestParts<'_>,
    ) -> Result<SignatureEnvelope> {
        self.sign_at_with_rng(timestamp, request, &mut OsRng)
    }

    /// Sign with nonce entropy drawn from `rng`
    pub fn sign_at_with_rng<R: CryptoRng + RngCore>(
        &self,
        timestamp: Timestamp,
        request: &RequestParts<'_>,
        rng: &mut R,
    ) -> Result<SignatureEnvelope> {
        let payload = CanonicalPayload::build(timestamp, request);

        let signature: Signature = self
            .signing_key
            .try_sign_digest_with_rng(rng, payload.hasher())
            .map_err(|e| Error::Signing(e.to_string()))?;

        let (r, s) = signature.split_bytes();
        let r: [u8; 32] = r.into();
        let s: [u8; 32] = s.into();
        let envelope = SignatureEnvelope::new(
            timestamp,
            &self.encoding.encode(&r),
            &self.encoding.encode(&s),
        )?;

        // both embeddings of the timestamp must agree
        if payload.timestamp_bytes() != envelope.timestamp().to_be_bytes() {
            return Err(Error::Encoding(
                "envelope timestamp differs from signed payload".to_string(),
            ));
        }

        debug!(
            timestamp = timestamp.as_u64(),
            payload_len = payload.as_bytes().len(),
            components_len = envelope.components().len(),
            "signed request"
        );
        Ok(envelope)
    }
}

impl core::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("signing_key", &"[REDACTED]")
            .field("encoding", &self.encoding)
            .finish()
    }
}
