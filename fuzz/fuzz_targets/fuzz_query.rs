#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_negotiation::query::Query;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(query) = Query::parse(s) {
            for name in query.names() {
                let _ = query.as_bool(name);
                let _ = query.as_int(name);
                let _ = query.as_float(name);
            }

            if let Ok(reparsed) = Query::parse(&query.to_string()) {
                assert_eq!(reparsed, query);
            }
        }
    }
});
