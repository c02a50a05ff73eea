//! パラメータ付きヘッダー値のプロパティテスト

use pbt::{param_value, params, token};
use proptest::prelude::*;
use shiguredo_http_negotiation::params::{Parameters, parse_header};

fn build(pairs: &[(String, String)]) -> Parameters {
    let mut params = Parameters::new();
    for (name, value) in pairs {
        params.insert(name, value);
    }
    params
}

// Display した値を再パースすると同じパラメータになる
proptest! {
    #[test]
    fn params_display_roundtrip(value in token(), pairs in params()) {
        let params = build(&pairs);
        let header = format!("{}{}", value, params);

        let (reparsed_value, reparsed) = parse_header(&header).unwrap();
        prop_assert_eq!(reparsed_value, value);
        prop_assert_eq!(reparsed, params);
    }
}

// 出力はキー順
proptest! {
    #[test]
    fn params_display_sorted(pairs in params()) {
        let mut reversed = pairs.clone();
        reversed.reverse();
        prop_assert_eq!(build(&pairs).to_string(), build(&reversed).to_string());
    }
}

// キーは大文字小文字を区別しない
proptest! {
    #[test]
    fn params_key_case_insensitive(name in "[a-z]{1,8}", value in param_value()) {
        let mut params = Parameters::new();
        params.insert(&name.to_ascii_uppercase(), &value);
        prop_assert_eq!(params.get(&name), Some(value.as_str()));
        prop_assert!(params.iter().all(|(k, _)| k == name));
    }
}

// 同じキーは最後の値が残る
proptest! {
    #[test]
    fn params_last_wins(name in "[a-z]{1,8}", first in token(), last in token()) {
        let header = format!("v; {}={}; {}={}", name, first, name, last);
        let (_, params) = parse_header(&header).unwrap();
        prop_assert_eq!(params.len(), 1);
        prop_assert_eq!(params.get(&name), Some(last.as_str()));
    }
}

// 任意の入力でパニックしない
proptest! {
    #[test]
    fn params_no_panic(input in ".{0,64}") {
        let _ = parse_header(&input);
    }
}
