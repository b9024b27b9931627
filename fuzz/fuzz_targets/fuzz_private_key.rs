#![no_main]

use libfuzzer_sys::fuzz_target;
use popsig_core::{Error, IntegerEncoding, PrivateKey};

fuzz_target!(|data: &[u8]| {
    // Decoding must fail closed, never panic
    match PrivateKey::from_pkcs8_der(data) {
        Ok(key) => {
            let point = key.public_point().unwrap();
            let (x, y) = point.coordinates(IntegerEncoding::FixedWidth);
            assert_eq!(x.len(), 32);
            assert_eq!(y.len(), 32);
        }
        Err(e) => assert!(matches!(e, Error::KeyParse(_))),
    }
});
