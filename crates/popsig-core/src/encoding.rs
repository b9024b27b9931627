//! Big-endian integer encoding for coordinates and signature components
//!
//! The legacy signer emits X, Y, r and s as minimal big-endian integers,
//! so a value with a leading zero byte comes out shorter than 32 bytes.
//! Verifiers that expect fixed 32-byte fields reject those outputs, which
//! is why the width policy is selectable.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Width of a P-256 field element or scalar in bytes
pub const FIELD_SIZE: usize = 32;

/// How 256-bit unsigned integers are written into output buffers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegerEncoding {
    /// Leading zero bytes stripped (legacy wire format)
    #[default]
    Minimal,
    /// Always 32 bytes, zero-padded on the left
    FixedWidth,
}

impl IntegerEncoding {
    /// Encode a 32-byte big-endian integer under this policy
    pub fn encode(self, value: &[u8; FIELD_SIZE]) -> Vec<u8> {
        match self {
            IntegerEncoding::Minimal => strip_leading_zeros(value).to_vec(),
            IntegerEncoding::FixedWidth => value.to_vec(),
        }
    }
}

/// Slice of `value` with leading zero bytes removed (empty for zero)
pub fn strip_leading_zeros(value: &[u8]) -> &[u8] {
    let start = value.iter().position(|b| *b != 0).unwrap_or(value.len());
    &value[start..]
}

/// Left-pad a big-endian integer to 32 bytes
pub fn pad_to_field(value: &[u8]) -> Result<[u8; FIELD_SIZE]> {
    let value = strip_leading_zeros(value);
    if value.len() > FIELD_SIZE {
        return Err(Error::Encoding(format!(
            "integer is {} bytes, exceeds {} byte field",
            value.len(),
            FIELD_SIZE
        )));
    }
    let mut out = [0u8; FIELD_SIZE];
    out[FIELD_SIZE - value.len()..].copy_from_slice(value);
    Ok(out)
}
