//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// トークン / パラメーター
// ========================================

/// token (RFC 9110 Section 5.6.2) の小文字部分集合
pub fn token() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9+.-]{0,11}".prop_map(|s| s)
}

/// パラメーター値 (token または空白を含む値)
pub fn param_value() -> impl Strategy<Value = String> {
    prop_oneof![token(), "[a-z ]{1,10}".prop_map(|s| s),]
}

/// パラメーターの組 (名前は重複させない, `q` を除く)
pub fn params() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::btree_map("[a-p]{1,6}", param_value(), 0..=3)
        .prop_map(|m| m.into_iter().collect())
}

// ========================================
// 品質値
// ========================================

/// 品質値 (千分率)
pub fn quality_millis() -> impl Strategy<Value = u16> {
    0u16..=1000
}

/// 品質値の文字列 (厳密な文法に従う)
pub fn quality_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "1\\.0{1,3}".prop_map(|s| s),
        "0\\.[0-9]{1,3}".prop_map(|s| s),
    ]
}

// ========================================
// メディアタイプ
// ========================================

/// `type/subtype` (完全一致)
pub fn media_type() -> impl Strategy<Value = String> {
    (token(), token()).prop_map(|(t, s)| format!("{}/{}", t, s))
}

/// `type/subtype`, `type/*`, `*/*` のいずれか
pub fn media_range() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => media_type(),
        1 => token().prop_map(|t| format!("{}/*", t)),
        1 => Just("*/*".to_string()),
    ]
}

// ========================================
// 言語タグ生成 (BCP 47/RFC 5646)
// ========================================

/// 先頭サブタグ: ALPHA のみ (1-8 文字)
pub fn language_primary_subtag() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,8}".prop_map(|s| s)
}

/// 後続サブタグ: ALPHA / DIGIT (1-8 文字)
pub fn language_subsequent_subtag() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}".prop_map(|s| s)
}

/// 言語タグ: primary-subtag *("-" subtag)
pub fn language_tag() -> impl Strategy<Value = String> {
    (
        language_primary_subtag(),
        proptest::collection::vec(language_subsequent_subtag(), 0..=2),
    )
        .prop_map(|(primary, rest)| {
            if rest.is_empty() {
                primary
            } else {
                format!("{}-{}", primary, rest.join("-"))
            }
        })
}

// ========================================
// ETag / Range
// ========================================

/// ETag のタグ値 (etagc から `"` を除いたもの)
pub fn etag_value() -> impl Strategy<Value = String> {
    "[!#-~]{0,16}".prop_map(|s| s)
}

/// 両端を含む区間 `(first, last)`
pub fn interval(max: u64) -> impl Strategy<Value = (u64, u64)> {
    (0..max, 0..max).prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
}

/// Range の範囲指定文字列 (`a-b`, `a-`, `-n`)
pub fn range_spec(max: u64) -> impl Strategy<Value = String> {
    prop_oneof![
        interval(max).prop_map(|(a, b)| format!("{}-{}", a, b)),
        (0..max).prop_map(|a| format!("{}-", a)),
        (1..max).prop_map(|n| format!("-{}", n)),
    ]
}
