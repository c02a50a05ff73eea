#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_negotiation::cookie::Cookies;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(cookies) = Cookies::parse(s) {
            for (name, _) in cookies.iter() {
                assert!(cookies.contains(name));
            }
            let _ = Cookies::parse(&cookies.to_string());
        }
    }
});
