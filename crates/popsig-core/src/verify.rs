//! Signature verification against a rebuilt canonical payload

use p256::ecdsa::{signature::DigestVerifier, Signature};
use tracing::debug;

use crate::encoding::pad_to_field;
use crate::envelope::SignatureEnvelope;
use crate::error::{Error, Result};
use crate::key::PublicPoint;
use crate::payload::{CanonicalPayload, RequestParts};
use crate::SCHEME_VERSION;

/// Verify `envelope` over `request` with the signer's public point
///
/// The payload is rebuilt with the timestamp carried in the envelope.
pub fn verify_envelope(
    public: &PublicPoint,
    request: &RequestParts<'_>,
    envelope: &SignatureEnvelope,
) -> Result<()> {
    if envelope.version() != SCHEME_VERSION {
        return Err(Error::UnsupportedVersion(envelope.version()));
    }

    let verifying_key = public.verifying_key()?;
    let payload = CanonicalPayload::build(envelope.timestamp(), request);

    for (r, s) in envelope.component_splits() {
        let Ok(signature) = signature_from_components(r, s) else {
            continue;
        };
        if verifying_key
            .verify_digest(payload.hasher(), &signature)
            .is_ok()
        {
            debug!(r_len = r.len(), s_len = s.len(), "signature verified");
            return Ok(());
        }
    }

    Err(Error::SignatureVerificationFailed)
}

/// Parse raw envelope bytes and verify them
pub fn verify_bytes(public: &PublicPoint, request: &RequestParts<'_>, envelope: &[u8]) -> Result<()> {
    verify_envelope(public, request, &SignatureEnvelope::parse(envelope)?)
}

fn signature_from_components(r: &[u8], s: &[u8]) -> Result<Signature> {
    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(&pad_to_field(r)?);
    rs[32..].copy_from_slice(&pad_to_field(s)?);
    Signature::from_slice(&rs).map_err(|e| Error::InvalidEnvelope(e.to_string()))
}
