#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_negotiation::content_type::ContentType;
use shiguredo_http_negotiation::params::parse_header;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok((value, params)) = parse_header(s) {
            let _ = params.sorted();

            // Display 出力を再パースしても同じパラメータになる
            if !value.contains(';') && !value.contains('"') {
                let displayed = format!("{}{}", value, params);
                if let Ok((_, reparsed)) = parse_header(&displayed) {
                    assert_eq!(reparsed, params);
                }
            }
        }

        if let Ok(content_type) = ContentType::parse(s) {
            let _ = content_type.charset();
            let _ = content_type.boundary();
            let _ = content_type.is_multipart();
            let _ = ContentType::parse(&content_type.to_string());
        }
    }
});
