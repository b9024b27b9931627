//! Private key files (PKCS#8 DER or PEM)

use std::path::Path;

use anyhow::Context;
use popsig_core::PrivateKey;
use zeroize::Zeroizing;

const PEM_LABEL: &[u8] = b"-----BEGIN";

/// Read and decode a PKCS#8 private key file
///
/// The raw file contents are wiped once decoded.
pub fn load_private_key(path: &Path) -> anyhow::Result<PrivateKey> {
    let bytes = Zeroizing::new(
        std::fs::read(path).with_context(|| format!("reading key {}", path.display()))?,
    );

    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let key = if bytes[start..].starts_with(PEM_LABEL) {
        let pem = std::str::from_utf8(&bytes).context("PEM key is not UTF-8")?;
        PrivateKey::from_pkcs8_pem(pem)?
    } else {
        PrivateKey::from_pkcs8_der(&bytes)?
    };
    tracing::debug!(path = %path.display(), "loaded private key");
    Ok(key)
}
