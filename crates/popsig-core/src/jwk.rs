//! Proof-of-possession key published alongside signed requests
//!
//! The authority learns the device key as a JWK whose `x`/`y` members are
//! unpadded base64url of the coordinate bytes.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::encoding::IntegerEncoding;
use crate::error::{Error, Result};
use crate::key::PublicPoint;

/// EC public key in JWK form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofKey {
    pub crv: String,
    pub alg: String,
    #[serde(rename = "use")]
    pub key_use: String,
    pub kty: String,
    pub x: String,
    pub y: String,
}

impl ProofKey {
    pub const CURVE: &'static str = "P-256";
    pub const ALGORITHM: &'static str = "ES256";
    pub const KEY_USE: &'static str = "sig";
    pub const KEY_TYPE: &'static str = "EC";

    /// Decode back into a validated public point
    pub fn to_public_point(&self) -> Result<PublicPoint> {
        if self.kty != Self::KEY_TYPE || self.crv != Self::CURVE {
            return Err(Error::KeyParse(format!(
                "unsupported JWK kty={} crv={}",
                self.kty, self.crv
            )));
        }
        let x = URL_SAFE_NO_PAD
            .decode(&self.x)
            .map_err(|e| Error::KeyParse(format!("invalid JWK x: {}", e)))?;
        let y = URL_SAFE_NO_PAD
            .decode(&self.y)
            .map_err(|e| Error::KeyParse(format!("invalid JWK y: {}", e)))?;
        PublicPoint::from_coordinates(&x, &y)
    }
}

impl PublicPoint {
    /// JWK for this point, coordinates written under `encoding`
    pub fn proof_key(&self, encoding: IntegerEncoding) -> ProofKey {
        let (x, y) = self.coordinates(encoding);
        ProofKey {
            crv: ProofKey::CURVE.to_string(),
            alg: ProofKey::ALGORITHM.to_string(),
            key_use: ProofKey::KEY_USE.to_string(),
            kty: ProofKey::KEY_TYPE.to_string(),
            x: URL_SAFE_NO_PAD.encode(x),
            y: URL_SAFE_NO_PAD.encode(y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::PrivateKey;

    fn point() -> PublicPoint {
        PrivateKey::from_pkcs8_der(include_bytes!("../tests/fixtures/p256_short_x.der"))
            .unwrap()
            .public_point()
            .unwrap()
    }

    #[test]
    fn test_json_shape() {
        let jwk = point().proof_key(IntegerEncoding::FixedWidth);
        let value = serde_json::to_value(&jwk).unwrap();
        assert_eq!(value["crv"], "P-256");
        assert_eq!(value["alg"], "ES256");
        assert_eq!(value["use"], "sig");
        assert_eq!(value["kty"], "EC");
        // 32 bytes -> 43 unpadded base64url chars
        assert_eq!(jwk.x.len(), 43);
        assert!(!jwk.x.contains('='));
    }

    #[test]
    fn test_minimal_width_shortens_x() {
        let jwk = point().proof_key(IntegerEncoding::Minimal);
        // 31 bytes -> 42 chars
        assert_eq!(jwk.x.len(), 42);
        assert_eq!(jwk.y.len(), 43);
    }

    #[test]
    fn test_decode_back() {
        let point = point();
        for encoding in [IntegerEncoding::Minimal, IntegerEncoding::FixedWidth] {
            assert_eq!(point.proof_key(encoding).to_public_point().unwrap(), point);
        }
    }

    #[test]
    fn test_rejects_wrong_curve() {
        let mut jwk = point().proof_key(IntegerEncoding::FixedWidth);
        jwk.crv = "P-384".to_string();
        assert!(matches!(jwk.to_public_point(), Err(Error::KeyParse(_))));
    }
}
