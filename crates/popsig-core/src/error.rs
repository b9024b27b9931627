//! Error types for popsig-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Key material is malformed, not PKCS#8, not EC, or not on P-256
    #[error("Key parse error: {0}")]
    KeyParse(String),

    /// The ECDSA signing operation itself failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// An internal invariant was violated while assembling output
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Invalid signature envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Unsupported signature version: {0}")]
    UnsupportedVersion(u32),

    #[error("Signature verification failed")]
    SignatureVerificationFailed,
}
