#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_http_negotiation::multipart::RangeResponse;
use shiguredo_http_negotiation::range::{ContentRange, Range};

#[derive(Arbitrary, Debug)]
struct FuzzRange {
    header: String,
    body: Vec<u8>,
    merge: bool,
    random: u64,
}

fuzz_target!(|input: FuzzRange| {
    if let Ok(range) = Range::parse(&input.header) {
        let _ = range.values();
        if let Ok(reparsed) = Range::parse(&range.to_string()) {
            assert_eq!(reparsed, range);
        }

        let resolved = range.resolve(input.body.len() as u64, input.merge);
        for &(first, last) in resolved.values() {
            assert!(first <= last);
            assert!((last as usize) < input.body.len());
        }

        match RangeResponse::new(&resolved, "application/octet-stream", input.random) {
            RangeResponse::Single(content_range) => {
                let _ = content_range.to_string();
            }
            RangeResponse::Multipart(multipart) => {
                let body = multipart.build(&input.body).unwrap();
                assert_eq!(body.len() as u64, multipart.encoded_len());
            }
            RangeResponse::Unsatisfiable(content_range) => {
                assert!(content_range.is_unsatisfied());
            }
        }
    }

    if let Ok(content_range) = ContentRange::parse(&input.header) {
        let _ = content_range.length();
        let _ = ContentRange::parse(&content_range.to_string());
    }
});
