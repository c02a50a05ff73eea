#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_negotiation::date::HttpDate;

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(date) = HttpDate::parse(s) {
            let _ = date.day_of_week();
            let _ = date.to_system_time();

            // Display 出力は IMF-fixdate として再パースできる
            let displayed = date.to_string();
            if let Ok(reparsed) = HttpDate::parse(&displayed) {
                assert_eq!(reparsed, date);
            }

            // うるう秒は翌日の 00:00:00 になる
            if date.second() < 60 {
                assert_eq!(
                    HttpDate::from_unix_timestamp(date.unix_timestamp()).ok(),
                    Some(date)
                );
            }
        }
    }
});
