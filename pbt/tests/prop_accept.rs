//! Accept / 品質値のプロパティテスト

use pbt::{media_range, media_type, params, quality_millis, quality_string};
use proptest::prelude::*;
use shiguredo_http_negotiation::accept::{Accept, MediaType};
use shiguredo_http_negotiation::quality::Quality;

fn media(range: &str, pairs: &[(String, String)], millis: u16) -> MediaType {
    let mut media = MediaType::parse(range)
        .unwrap()
        .with_quality(Quality::from_millis(millis));
    for (name, value) in pairs {
        media = media.with_param(name, value);
    }
    media
}

// ========================================
// 品質値
// ========================================

proptest! {
    #[test]
    fn quality_grammar_accepted(q in quality_string()) {
        prop_assert!(Quality::parse(&q).is_ok());
    }
}

proptest! {
    #[test]
    fn quality_display_roundtrip(millis in quality_millis()) {
        let q = Quality::from_millis(millis);
        prop_assert_eq!(Quality::parse(&q.to_string()).unwrap(), q);
    }
}

proptest! {
    #[test]
    fn quality_too_many_digits_rejected(digits in "[0-9]{4,6}") {
        let input = format!("0.{}", digits);
        prop_assert!(Quality::parse(&input).is_err());
    }
}

// ========================================
// MediaType
// ========================================

proptest! {
    #[test]
    fn media_type_display_roundtrip(range in media_range(), pairs in params(), millis in quality_millis()) {
        let media = media(&range, &pairs, millis);
        let reparsed = MediaType::parse(&media.to_string()).unwrap();
        prop_assert_eq!(reparsed, media);
    }
}

proptest! {
    #[test]
    fn media_type_matches_itself(mimetype in media_type(), pairs in params()) {
        let media = media(&mimetype, &pairs, 1000);
        prop_assert!(media.matches(&mimetype));
        prop_assert!(media.matches(&mimetype.to_ascii_uppercase()));
        prop_assert!(MediaType::wildcard().matches(&mimetype));
    }
}

// ========================================
// Accept
// ========================================

proptest! {
    #[test]
    fn accept_items_in_priority_order(
        entries in proptest::collection::vec((media_range(), 1u16..=1000), 1..8)
    ) {
        let header = entries
            .iter()
            .map(|(range, millis)| format!("{};q={}", range, Quality::from_millis(*millis)))
            .collect::<Vec<_>>()
            .join(", ");
        let accept = Accept::parse(&header).unwrap();

        prop_assert_eq!(accept.items().len(), entries.len());
        for pair in accept.items().windows(2) {
            prop_assert!(pair[0].cmp_priority(&pair[1]) != std::cmp::Ordering::Greater);
        }
    }
}

proptest! {
    #[test]
    fn accept_display_roundtrip(
        entries in proptest::collection::vec((media_range(), params(), 1u16..=1000), 1..6)
    ) {
        let items: Vec<MediaType> = entries
            .iter()
            .map(|(range, pairs, millis)| media(range, pairs, *millis))
            .collect();
        let accept = Accept::new(items);
        prop_assert_eq!(Accept::parse(&accept.to_string()).unwrap(), accept);
    }
}

// 希望側が主ループ: 最初に何かに一致する希望について、最初に一致した候補が選ばれる
proptest! {
    #[test]
    fn accept_negotiate_preference_major(
        entries in proptest::collection::vec((media_range(), 1u16..=1000), 1..6),
        supported in proptest::collection::vec(media_type(), 0..6),
    ) {
        let items: Vec<MediaType> = entries
            .iter()
            .map(|(range, millis)| media(range, &[], *millis))
            .collect();
        let accept = Accept::new(items);

        let expected = accept
            .items()
            .iter()
            .find_map(|item| supported.iter().find(|c| item.matches(c)));
        prop_assert_eq!(accept.negotiate(&supported), expected);
    }
}

proptest! {
    #[test]
    fn accept_default_takes_first(supported in proptest::collection::vec(media_type(), 0..6)) {
        prop_assert_eq!(Accept::default().negotiate(&supported), supported.first());
    }
}

proptest! {
    #[test]
    fn accept_no_panic(input in ".{0,64}") {
        let _ = Accept::parse(&input);
    }
}
