#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use popsig_core::{CanonicalPayload, RequestParts, Timestamp};

#[derive(Debug, Arbitrary)]
struct Request<'a> {
    timestamp: u64,
    method: &'a [u8],
    url: &'a [u8],
    authorization: &'a [u8],
    body: &'a [u8],
}

fuzz_target!(|input: Request<'_>| {
    let parts = RequestParts::new(input.method, input.url, input.authorization, input.body);
    let payload = CanonicalPayload::build(Timestamp::from_filetime(input.timestamp), &parts);
    let bytes = payload.as_bytes();

    // prefix, timestamp and separator are fixed
    assert_eq!(&bytes[..5], &[0, 0, 0, 1, 0]);
    assert_eq!(payload.timestamp_bytes(), input.timestamp.to_be_bytes());
    assert_eq!(bytes[13], 0);

    // every field contributes its bytes plus one NUL
    let fields_len =
        input.method.len() + input.url.len() + input.authorization.len() + input.body.len() + 4;
    assert_eq!(bytes.len(), 14 + fields_len);
    assert_eq!(bytes[bytes.len() - 1], 0);
});
