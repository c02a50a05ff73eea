#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_negotiation::conditional::{IfMatch, IfNoneMatch, IfRange};
use shiguredo_http_negotiation::etag::{ETag, ETags};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let etag = ETag::parse(s);
        assert!(etag.weak_compare(&etag));
        assert_eq!(etag.compare(&etag), !etag.is_weak());

        if let Ok(etags) = ETags::parse(s) {
            let _ = etags.contains_strong(&etag);
            let _ = etags.contains_weak(&etag);
            let _ = ETags::parse(&etags.to_string());
        }

        if let Ok(if_match) = IfMatch::parse(s) {
            let _ = if_match.matches(&etag);
        }
        if let Ok(if_none_match) = IfNoneMatch::parse(s) {
            let _ = if_none_match.matches(&etag);
        }
        if let Ok(if_range) = IfRange::parse(s) {
            let _ = if_range.is_satisfied(Some(&etag), None);
        }
    }
});
