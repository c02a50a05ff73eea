#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_negotiation::host::{Host, parse_host};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_host(s);

        if let Ok(host) = Host::parse(s) {
            if let Ok(reparsed) = Host::parse(&host.to_string()) {
                assert_eq!(reparsed, host);
            }
        }
    }
});
