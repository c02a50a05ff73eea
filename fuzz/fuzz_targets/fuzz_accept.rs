#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_http_negotiation::accept::Accept;
use shiguredo_http_negotiation::language::Languages;

#[derive(Arbitrary, Debug)]
struct FuzzNegotiation {
    header: String,
    supported: Vec<String>,
}

fuzz_target!(|input: FuzzNegotiation| {
    if let Ok(accept) = Accept::parse(&input.header) {
        assert!(!accept.items().is_empty());
        for pair in accept.items().windows(2) {
            assert!(pair[0].cmp_priority(&pair[1]) != std::cmp::Ordering::Greater);
        }

        if let Some(chosen) = accept.negotiate(&input.supported) {
            assert!(input.supported.contains(chosen));
        }

        // Display 出力を再パース (ラウンドトリップ)
        if let Ok(reparsed) = Accept::parse(&accept.to_string()) {
            assert_eq!(reparsed, accept);
        }
    }

    if let Ok(languages) = Languages::parse(&input.header) {
        if let Some(chosen) = languages.negotiate(&input.supported) {
            assert!(input.supported.contains(chosen));
        }

        if let Ok(reparsed) = Languages::parse(&languages.to_string()) {
            assert_eq!(reparsed, languages);
        }
    }
});
