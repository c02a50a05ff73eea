#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_negotiation::auth::Authorization;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(auth) = Authorization::parse(s) {
            assert_eq!(auth.scheme(), auth.scheme().to_ascii_lowercase());
            let _ = auth.basic();
            let _ = auth.bearer();
            let _ = auth.to_string();
        }
    }
});
