//! Signature envelope: `version (4) || timestamp (8) || r || s`
//!
//! There is no length prefix between r and s. With fixed-width encoding
//! the split is always 32/32; with minimal encoding the parser yields
//! every split that keeps both components within 32 bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::encoding::FIELD_SIZE;
use crate::error::{Error, Result};
use crate::timestamp::Timestamp;
use crate::SCHEME_VERSION;

/// Version plus timestamp
pub const ENVELOPE_HEADER_LEN: usize = 12;

/// Largest possible envelope (both components at full width)
pub const MAX_ENVELOPE_LEN: usize = ENVELOPE_HEADER_LEN + 2 * FIELD_SIZE;

/// Decoded or freshly produced signature envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEnvelope {
    version: u32,
    timestamp: Timestamp,
    /// r followed directly by s
    components: Vec<u8>,
}

impl SignatureEnvelope {
    /// Envelope for the current scheme version
    pub fn new(timestamp: Timestamp, r: &[u8], s: &[u8]) -> Result<Self> {
        if r.is_empty() || s.is_empty() || r.len() > FIELD_SIZE || s.len() > FIELD_SIZE {
            return Err(Error::Encoding(format!(
                "signature component lengths r={} s={} out of range",
                r.len(),
                s.len()
            )));
        }
        let mut components = Vec::with_capacity(r.len() + s.len());
        components.extend_from_slice(r);
        components.extend_from_slice(s);
        Ok(Self {
            version: SCHEME_VERSION,
            timestamp,
            components,
        })
    }

    /// Split raw envelope bytes; the version is not checked here
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ENVELOPE_HEADER_LEN + 2 {
            return Err(Error::InvalidEnvelope(format!(
                "{} bytes is too short",
                bytes.len()
            )));
        }
        if bytes.len() > MAX_ENVELOPE_LEN {
            return Err(Error::InvalidEnvelope(format!(
                "{} bytes exceeds {} byte maximum",
                bytes.len(),
                MAX_ENVELOPE_LEN
            )));
        }

        let mut version = [0u8; 4];
        let mut timestamp = [0u8; 8];
        version.copy_from_slice(&bytes[..4]);
        timestamp.copy_from_slice(&bytes[4..ENVELOPE_HEADER_LEN]);

        Ok(Self {
            version: u32::from_be_bytes(version),
            timestamp: Timestamp::from_be_bytes(timestamp),
            components: bytes[ENVELOPE_HEADER_LEN..].to_vec(),
        })
    }

    /// Decode a `Signature` header value (standard base64)
    pub fn from_header_value(value: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(value.trim())
            .map_err(|e| Error::InvalidEnvelope(format!("invalid base64: {}", e)))?;
        Self::parse(&bytes)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// r || s as carried on the wire
    pub fn components(&self) -> &[u8] {
        &self.components
    }

    /// Every plausible (r, s) split, most likely first
    pub fn component_splits(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        let len = self.components.len();
        let min_r = len.saturating_sub(FIELD_SIZE).max(1);
        let max_r = FIELD_SIZE.min(len.saturating_sub(1));
        // even split first, then the rest
        let half = len / 2;
        let preferred = (len % 2 == 0 && half >= min_r && half <= max_r).then_some(half);
        preferred
            .into_iter()
            .chain((min_r..=max_r).filter(move |r_len| Some(*r_len) != preferred))
            .map(move |r_len| self.components.split_at(r_len))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ENVELOPE_HEADER_LEN + self.components.len());
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.components);
        out
    }

    /// Value for the `Signature` request header
    pub fn to_header_value(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &[u8] = include_bytes!("../tests/fixtures/reference_envelope.bin");

    #[test]
    fn test_layout() {
        let ts = Timestamp::from_filetime(132_000_000_000_000_000);
        let envelope = SignatureEnvelope::new(ts, &[0xaa; 32], &[0xbb; 31]).unwrap();
        let bytes = envelope.to_bytes();
        assert_eq!(&bytes[..4], &[0, 0, 0, 1]);
        assert_eq!(&bytes[4..12], &ts.to_be_bytes());
        assert_eq!(&bytes[12..44], &[0xaa; 32]);
        assert_eq!(&bytes[44..], &[0xbb; 31]);
        assert_eq!(bytes.len(), 75);
    }

    #[test]
    fn test_parse_reference() {
        let envelope = SignatureEnvelope::parse(REFERENCE).unwrap();
        assert_eq!(envelope.version(), 1);
        assert_eq!(envelope.timestamp().as_u64(), 132_000_000_000_000_000);
        assert_eq!(envelope.components().len(), 64);
        assert_eq!(envelope.to_bytes(), REFERENCE);

        let splits: Vec<_> = envelope.component_splits().collect();
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].0.len(), 32);
    }

    #[test]
    fn test_minimal_splits() {
        let ts = Timestamp::from_filetime(1);
        let envelope = SignatureEnvelope::new(ts, &[0x11; 31], &[0x22; 32]).unwrap();
        let lens: Vec<_> = envelope
            .component_splits()
            .map(|(r, s)| (r.len(), s.len()))
            .collect();
        assert_eq!(lens, vec![(31, 32), (32, 31)]);

        let envelope = SignatureEnvelope::new(ts, &[0x11; 31], &[0x22; 31]).unwrap();
        let lens: Vec<_> = envelope
            .component_splits()
            .map(|(r, s)| (r.len(), s.len()))
            .collect();
        assert_eq!(lens[0], (31, 31));
        assert_eq!(lens.len(), 3);
    }

    #[test]
    fn test_header_value() {
        let envelope = SignatureEnvelope::parse(REFERENCE).unwrap();
        let header = envelope.to_header_value();
        assert_eq!(header, STANDARD.encode(REFERENCE));
        assert_eq!(SignatureEnvelope::from_header_value(&header).unwrap(), envelope);
    }

    #[test]
    fn test_parse_rejects_bad_lengths() {
        assert!(matches!(
            SignatureEnvelope::parse(&REFERENCE[..13]),
            Err(Error::InvalidEnvelope(_))
        ));
        let mut long = REFERENCE.to_vec();
        long.push(0);
        assert!(matches!(
            SignatureEnvelope::parse(&long),
            Err(Error::InvalidEnvelope(_))
        ));
        assert!(matches!(
            SignatureEnvelope::from_header_value("not base64!"),
            Err(Error::InvalidEnvelope(_))
        ));
    }

    #[test]
    fn test_new_rejects_oversized_component() {
        let ts = Timestamp::from_filetime(1);
        assert!(matches!(
            SignatureEnvelope::new(ts, &[1; 33], &[1; 32]),
            Err(Error::Encoding(_))
        ));
        assert!(matches!(
            SignatureEnvelope::new(ts, &[], &[1; 32]),
            Err(Error::Encoding(_))
        ));
    }
}
