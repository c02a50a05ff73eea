//! ヘッダー値の代表的な性質のテスト
//!
//! 各ヘッダーについて、よく知られた入力に対する結果を公開 API だけで確認する。

use shiguredo_http_negotiation::accept::{Accept, MediaType};
use shiguredo_http_negotiation::etag::ETag;
use shiguredo_http_negotiation::host::parse_host;
use shiguredo_http_negotiation::language::{Language, Languages};
use shiguredo_http_negotiation::quality::Quality;
use shiguredo_http_negotiation::range::{Range, consolidate_ranges};

#[test]
fn media_type_roundtrip_ignores_param_order() {
    let media = MediaType::parse("text/html; level=1; charset=utf-8; q=0.5").unwrap();
    assert_eq!(media.to_string(), "text/html;charset=utf-8;level=1;q=0.5");
    assert_eq!(MediaType::parse(&media.to_string()).unwrap(), media);
}

#[test]
fn language_and_etag_roundtrip() {
    let language = Language::parse("en_us;q=0.25").unwrap();
    assert_eq!(language.to_string(), "en-US;q=0.25");
    assert_eq!(Language::parse(&language.to_string()).unwrap(), language);

    for value in ["W/\"0815\"", "\"x\"", "\"\""] {
        let etag = ETag::parse(value);
        assert_eq!(etag.to_string(), value);
        assert_eq!(ETag::parse(&etag.to_string()), etag);
    }
}

#[test]
fn quality_validation() {
    assert!(Quality::parse("1.000").is_ok());
    assert!(Quality::parse("0.5").is_ok());
    assert!(Quality::parse("1.1").is_err());
    assert!(Quality::parse("0.12345").is_err());
}

#[test]
fn specificity_ordering() {
    let accept = Accept::parse("text/html, application/xml;q=0.9, */*;q=0.8").unwrap();
    let mimetypes: Vec<&str> = accept.items().iter().map(|m| m.mimetype()).collect();
    assert_eq!(mimetypes, vec!["text/html", "application/xml", "*/*"]);

    // 同じ品質値なら特定度の高いものが先
    let accept = Accept::parse("*/*, text/*, text/html").unwrap();
    let mimetypes: Vec<&str> = accept.items().iter().map(|m| m.mimetype()).collect();
    assert_eq!(mimetypes, vec!["text/html", "text/*", "*/*"]);
}

#[test]
fn negotiation_determinism() {
    let accept = Accept::parse("application/json;q=0.8, text/html;q=0.7, text/*;q=0.5").unwrap();
    assert_eq!(
        accept.negotiate(&["application/json", "text/html"]),
        Some(&"application/json")
    );
    assert_eq!(accept.negotiate(&["text/plain"]), Some(&"text/plain"));
    assert_eq!(accept.negotiate(&["image/jpg"]), None);
}

#[test]
fn negotiation_is_preference_major() {
    // 候補の順序ではなく希望の優先順で決まる
    let accept = Accept::parse("text/html, application/json;q=0.9").unwrap();
    assert_eq!(
        accept.negotiate(&["application/json", "text/html"]),
        Some(&"text/html")
    );

    let languages = Languages::parse("de-DE, en;q=0.5").unwrap();
    assert_eq!(languages.negotiate(&["en-GB", "de-DE"]), Some(&"de-DE"));
    assert_eq!(languages.negotiate(&["en-GB", "fr"]), Some(&"en-GB"));
    assert_eq!(languages.negotiate(&["fr"]), None);
}

#[test]
fn absent_headers_use_defaults() {
    assert_eq!(Accept::parse("").unwrap(), Accept::default());
    assert_eq!(Accept::default().negotiate(&["a/b", "c/d"]), Some(&"a/b"));
    assert_eq!(Languages::parse("  ").unwrap(), Languages::default());
    assert_eq!(Languages::default().to_string(), "*");
}

#[test]
fn range_parse_and_resolve() {
    let range = Range::parse("bytes=0-4,90-99,5-75,100-199,101-102").unwrap();
    assert_eq!(range.resolve(150, true).values(), &[(0, 75), (90, 149)]);

    // マージしない場合はヘッダーの順序を保つ
    assert_eq!(
        range.resolve(150, false).values(),
        &[(0, 4), (90, 99), (5, 75), (100, 149), (101, 102)]
    );
}

#[test]
fn range_suffix_and_clamp() {
    let range = Range::parse("bytes=-1023").unwrap();
    assert_eq!(range.values(), vec![(-1023, -1)]);
    assert_eq!(range.resolve(500, false).values(), &[(0, 499)]);
}

#[test]
fn etag_weak_semantics() {
    assert!(!ETag::parse("W/\"0815\"").compare(&ETag::parse("\"0815\"")));
    assert!(ETag::parse("\"x\"").compare(&ETag::parse("\"x\"")));
}

#[test]
fn host_parsing() {
    assert_eq!(
        parse_host("[2a01:8790:16d:0:218:de87:164:8745]:80").unwrap(),
        ("[2a01:8790:16d:0:218:de87:164:8745]", Some(80))
    );
    assert_eq!(parse_host("localhost").unwrap(), ("localhost", None));
}

#[test]
fn consolidation_idempotence() {
    let disjoint = vec![(0, 3), (10, 20), (30, 30)];
    let merged: Vec<_> = consolidate_ranges(disjoint.clone()).collect();
    assert_eq!(merged, disjoint);

    // 隣接する区間は統合される
    let merged: Vec<_> = consolidate_ranges([(5, 9), (0, 4), (20, 25), (24, 30)]).collect();
    assert_eq!(merged, vec![(0, 9), (20, 30)]);
}
