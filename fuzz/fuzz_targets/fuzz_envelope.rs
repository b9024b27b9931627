#![no_main]

use libfuzzer_sys::fuzz_target;
use popsig_core::{SignatureEnvelope, FIELD_SIZE, MAX_ENVELOPE_LEN};

fuzz_target!(|data: &[u8]| {
    // Parse envelope - should not panic
    if let Ok(envelope) = SignatureEnvelope::parse(data) {
        assert!(data.len() <= MAX_ENVELOPE_LEN);

        // Round-trip should preserve bytes
        assert_eq!(envelope.to_bytes(), data);

        for (r, s) in envelope.component_splits() {
            assert!(!r.is_empty() && r.len() <= FIELD_SIZE);
            assert!(!s.is_empty() && s.len() <= FIELD_SIZE);
            assert_eq!(r.len() + s.len(), envelope.components().len());
        }

        let header = envelope.to_header_value();
        let reparsed = SignatureEnvelope::from_header_value(&header).unwrap();
        assert_eq!(reparsed, envelope);
    }

    // Arbitrary text as a header value should not panic either
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = SignatureEnvelope::from_header_value(text);
    }
});
