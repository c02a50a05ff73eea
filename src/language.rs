//! Accept-Language ヘッダーと言語ネゴシエーション (RFC 9110 Section 12.5.4)
//!
//! ## 概要
//!
//! Accept-Language ヘッダーを重み付き言語タグのリストとしてパースし、
//! サーバーが提供できる言語の中から 1 つを選びます。
//!
//! 言語タグは先頭のサブタグ (言語) と残り (地域などのバリアント) に分けて扱います。
//! `_` は `-` と同じ区切りとして受け付けます。
//!
//! - `*` は任意の言語に一致します
//! - バリアントなし (`en`) は言語が同じなら一致します
//! - バリアント付き (`en-US`) は言語とバリアントの両方が同じ場合に一致します。
//!   ただし候補側にバリアントがない場合は言語だけを比較します
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::language::Languages;
//!
//! let languages = Languages::parse("fr-CH, fr;q=0.9, en;q=0.8, *;q=0.5").unwrap();
//! assert_eq!(languages.negotiate(&["en-GB", "fr-FR"]), Some(&"fr-FR"));
//! assert_eq!(languages.negotiate(&["de"]), Some(&"de"));
//! ```

use core::cmp::Ordering;
use core::fmt;

use crate::limits::HeaderLimits;
use crate::negotiation::{self, Preference};
use crate::quality::{Quality, QualityError, Specificity};

/// Accept-Language パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageError {
    /// 不正な言語タグ
    InvalidTag,
    /// q 以外のパラメータ
    InvalidParameter,
    /// 不正な q 値
    InvalidQuality,
    /// 受け入れ可能な言語がない (すべて q=0)
    NothingAcceptable,
    /// ヘッダー値が長すぎる
    TooLarge { size: usize, limit: usize },
    /// 要素数が多すぎる
    TooMany { count: usize, limit: usize },
}

impl fmt::Display for LanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageError::InvalidTag => write!(f, "invalid language tag"),
            LanguageError::InvalidParameter => write!(f, "invalid language parameter"),
            LanguageError::InvalidQuality => write!(f, "invalid quality value"),
            LanguageError::NothingAcceptable => write!(f, "no acceptable language"),
            LanguageError::TooLarge { size, limit } => {
                write!(f, "Accept-Language header too large: {} > {}", size, limit)
            }
            LanguageError::TooMany { count, limit } => {
                write!(f, "too many languages: {} > {}", count, limit)
            }
        }
    }
}

impl std::error::Error for LanguageError {}

impl From<QualityError> for LanguageError {
    fn from(_: QualityError) -> Self {
        LanguageError::InvalidQuality
    }
}

/// 重み付き言語タグ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    tag: String,
    variant: Option<String>,
    quality: Quality,
    specificity: Specificity,
}

impl Language {
    /// ロケール文字列から作成 (`*`, `en`, `en-US`, `en_US`)
    pub fn new(locale: &str) -> Result<Self, LanguageError> {
        if locale == "*" {
            return Ok(Language::wildcard());
        }

        let (tag, variant) = split_locale(locale).ok_or(LanguageError::InvalidTag)?;
        if !is_valid_language_tag(&tag, variant.as_deref()) {
            return Err(LanguageError::InvalidTag);
        }

        let specificity = if variant.is_some() {
            Specificity::Exact
        } else {
            Specificity::Partial
        };
        Ok(Language {
            tag,
            variant,
            quality: Quality::MAX,
            specificity,
        })
    }

    /// `*`
    pub fn wildcard() -> Self {
        Language {
            tag: "*".to_string(),
            variant: None,
            quality: Quality::MAX,
            specificity: Specificity::None,
        }
    }

    /// 品質値を設定
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// `tag;q=value` 形式をパース
    ///
    /// `;` 以降は `q=<品質値>` だけを受け付けます。
    pub fn parse(input: &str) -> Result<Self, LanguageError> {
        let (locale, rest) = match input.split_once(';') {
            Some((locale, rest)) => (locale, rest.trim()),
            None => (input, ""),
        };

        let language = Language::new(locale.trim())?;
        if rest.is_empty() {
            return Ok(language);
        }

        let q = rest
            .strip_prefix("q=")
            .ok_or(LanguageError::InvalidParameter)?;
        Ok(language.with_quality(Quality::parse(q)?))
    }

    /// 言語 (先頭サブタグ、小文字)
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// バリアント (例: "US")
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// 品質値
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// 特定度
    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// `en-US` 形式のロケール文字列
    pub fn locale(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{}-{}", self.tag, variant),
            None => self.tag.clone(),
        }
    }

    /// 候補の言語がこの言語タグに一致するか
    pub fn matches(&self, candidate: &str) -> bool {
        if self.specificity == Specificity::None {
            return true;
        }

        let Some((tag, variant)) = split_locale(candidate.trim()) else {
            return false;
        };

        if tag != self.tag {
            return false;
        }
        match (&variant, self.specificity) {
            (None, _) | (_, Specificity::Partial) => true,
            (Some(variant), _) => self.variant.as_ref() == Some(variant),
        }
    }

    /// 優先順の比較 (優先度の高いものが `Less`)
    pub fn cmp_priority(&self, other: &Language) -> Ordering {
        negotiation::priority_order(self, other)
    }
}

impl Preference for Language {
    fn quality(&self) -> Quality {
        self.quality
    }

    fn specificity(&self) -> Specificity {
        self.specificity
    }

    fn matches(&self, candidate: &str) -> bool {
        Language::matches(self, candidate)
    }
}

/// `en-US;q=0.5` 形式で出力 (q=1.0 は省略)
impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if let Some(variant) = &self.variant {
            write!(f, "-{}", variant)?;
        }
        if self.quality != Quality::MAX {
            write!(f, ";q={}", self.quality)?;
        }
        Ok(())
    }
}

/// ロケールを言語とバリアントに分割し、大文字小文字を正規化
///
/// 言語は小文字、2 文字のサブタグは大文字、4 文字のサブタグは先頭だけ大文字、
/// それ以外は小文字にします。
fn split_locale(locale: &str) -> Option<(String, Option<String>)> {
    let mut subtags = locale.split(['-', '_']);
    let tag = subtags.next()?.to_ascii_lowercase();
    if tag.is_empty() {
        return None;
    }

    let variant: Vec<String> = subtags.map(normalize_subtag).collect();
    if variant.is_empty() {
        return Some((tag, None));
    }
    Some((tag, Some(variant.join("-"))))
}

fn normalize_subtag(subtag: &str) -> String {
    let is_alpha = subtag.bytes().all(|b| b.is_ascii_alphabetic());
    match subtag.len() {
        2 if is_alpha => subtag.to_ascii_uppercase(),
        4 if is_alpha => {
            let lower = subtag.to_ascii_lowercase();
            let (head, rest) = lower.split_at(1);
            format!("{}{}", head.to_ascii_uppercase(), rest)
        }
        _ => subtag.to_ascii_lowercase(),
    }
}

fn is_valid_language_tag(tag: &str, variant: Option<&str>) -> bool {
    // 先頭サブタグは ALPHA のみ
    if tag.len() > 8 || !tag.bytes().all(|b| b.is_ascii_alphabetic()) {
        return false;
    }

    // 後続サブタグは ALPHA / DIGIT
    variant.is_none_or(|variant| {
        variant
            .split('-')
            .all(|part| !part.is_empty() && part.len() <= 8 && part.bytes().all(|b| b.is_ascii_alphanumeric()))
    })
}

/// Accept-Language ヘッダー
///
/// 要素は常に優先順に並んでおり、空になることはありません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Languages {
    items: Vec<Language>,
}

impl Languages {
    /// 言語タグのリストから作成
    ///
    /// 空のリストは `*` 1 つになります。
    pub fn new(mut items: Vec<Language>) -> Self {
        if items.is_empty() {
            items.push(Language::wildcard());
        }
        negotiation::sort_by_priority(&mut items);
        Languages { items }
    }

    /// Accept-Language ヘッダーをパース (q=0 の要素は取り除く)
    pub fn parse(input: &str) -> Result<Self, LanguageError> {
        Self::parse_with_limits(input, &HeaderLimits::default())
    }

    /// 制限を指定して Accept-Language ヘッダーをパース
    pub fn parse_with_limits(input: &str, limits: &HeaderLimits) -> Result<Self, LanguageError> {
        parse_languages(input, limits, false)
    }

    /// q=0 の要素を残して Accept-Language ヘッダーをパース
    pub fn parse_keep_null(input: &str) -> Result<Self, LanguageError> {
        parse_languages(input, &HeaderLimits::default(), true)
    }

    /// 言語タグ一覧 (優先順)
    pub fn items(&self) -> &[Language] {
        &self.items
    }

    /// 候補の中から最も希望に合うものを選ぶ
    pub fn negotiate<'a, C: AsRef<str>>(&self, supported: &'a [C]) -> Option<&'a C> {
        negotiation::negotiate(&self.items, supported)
    }
}

impl Default for Languages {
    fn default() -> Self {
        Languages::new(Vec::new())
    }
}

impl fmt::Display for Languages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.items.iter().map(|item| item.to_string()).collect();
        write!(f, "{}", values.join(","))
    }
}

fn parse_languages(
    input: &str,
    limits: &HeaderLimits,
    keep_null: bool,
) -> Result<Languages, LanguageError> {
    limits
        .check_value_size(input)
        .map_err(|(size, limit)| LanguageError::TooLarge { size, limit })?;

    if input.trim().is_empty() {
        return Ok(Languages::default());
    }

    let count = input.split(',').count();
    if count > limits.max_list_items {
        return Err(LanguageError::TooMany {
            count,
            limit: limits.max_list_items,
        });
    }

    let mut items = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let language = Language::parse(part)?;
        if !keep_null && language.quality.is_zero() {
            continue;
        }
        items.push(language);
    }

    if items.is_empty() {
        return Err(LanguageError::NothingAcceptable);
    }

    Ok(Languages::new(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales(languages: &Languages) -> Vec<String> {
        languages.items().iter().map(|l| l.locale()).collect()
    }

    #[test]
    fn test_language_parse() {
        let lang = Language::parse("en-us;q=0.8").unwrap();
        assert_eq!(lang.tag(), "en");
        assert_eq!(lang.variant(), Some("US"));
        assert_eq!(lang.quality().millis(), 800);
        assert_eq!(lang.specificity(), Specificity::Exact);

        let lang = Language::parse("FR").unwrap();
        assert_eq!(lang.tag(), "fr");
        assert_eq!(lang.variant(), None);
        assert_eq!(lang.specificity(), Specificity::Partial);

        let lang = Language::parse("*").unwrap();
        assert_eq!(lang.specificity(), Specificity::None);
    }

    #[test]
    fn test_language_underscore() {
        let lang = Language::parse("pt_BR").unwrap();
        assert_eq!(lang.locale(), "pt-BR");
    }

    #[test]
    fn test_language_subtag_case() {
        let lang = Language::parse("ZH-hant-tw").unwrap();
        assert_eq!(lang.tag(), "zh");
        assert_eq!(lang.variant(), Some("Hant-TW"));
    }

    #[test]
    fn test_language_errors() {
        assert_eq!(Language::parse("en;level=1"), Err(LanguageError::InvalidParameter));
        assert_eq!(Language::parse("en;q=1"), Err(LanguageError::InvalidQuality));
        assert_eq!(Language::parse("en;q=0.1234"), Err(LanguageError::InvalidQuality));
        assert_eq!(Language::parse("123"), Err(LanguageError::InvalidTag));
        assert_eq!(Language::parse("en-"), Err(LanguageError::InvalidTag));
        assert_eq!(Language::parse(""), Err(LanguageError::InvalidTag));
        assert_eq!(Language::parse("-US"), Err(LanguageError::InvalidTag));
    }

    #[test]
    fn test_language_matches() {
        let any = Language::wildcard();
        assert!(any.matches("de"));

        let partial = Language::parse("en").unwrap();
        assert!(partial.matches("en"));
        assert!(partial.matches("en-GB"));
        assert!(partial.matches("EN_us"));
        assert!(!partial.matches("fr"));

        let exact = Language::parse("en-US").unwrap();
        assert!(exact.matches("en-us"));
        assert!(exact.matches("en"));
        assert!(!exact.matches("en-GB"));
        assert!(!exact.matches("fr-US"));
    }

    #[test]
    fn test_languages_ordering() {
        let languages = Languages::parse("en;q=0.8, *;q=0.8, en-US;q=0.8, fr").unwrap();
        assert_eq!(locales(&languages), vec!["fr", "en-US", "en", "*"]);
    }

    #[test]
    fn test_languages_negotiate() {
        let languages = Languages::parse("fr-CH, fr;q=0.9, en;q=0.8, *;q=0.5").unwrap();
        assert_eq!(languages.negotiate(&["en", "fr-CH"]), Some(&"fr-CH"));
        assert_eq!(languages.negotiate(&["en-GB", "fr-FR"]), Some(&"fr-FR"));
        assert_eq!(languages.negotiate(&["de", "en"]), Some(&"en"));
        assert_eq!(languages.negotiate(&["de"]), Some(&"de"));

        let strict = Languages::parse("fr-CH").unwrap();
        assert_eq!(strict.negotiate(&["fr-FR"]), None);
        assert_eq!(strict.negotiate(&["fr-FR", "fr"]), Some(&"fr"));
    }

    #[test]
    fn test_languages_default_and_null() {
        assert_eq!(locales(&Languages::default()), vec!["*"]);
        assert_eq!(Languages::parse(" ").unwrap(), Languages::default());

        let languages = Languages::parse("de;q=0.0, en").unwrap();
        assert_eq!(locales(&languages), vec!["en"]);
        assert_eq!(
            Languages::parse("de;q=0.0"),
            Err(LanguageError::NothingAcceptable)
        );

        let kept = Languages::parse_keep_null("de;q=0.0, en").unwrap();
        assert_eq!(locales(&kept), vec!["en", "de"]);
    }

    #[test]
    fn test_languages_limits() {
        let limits = HeaderLimits {
            max_list_items: 1,
            ..Default::default()
        };
        assert_eq!(
            Languages::parse_with_limits("en, fr", &limits),
            Err(LanguageError::TooMany { count: 2, limit: 1 })
        );
    }

    #[test]
    fn test_display_reparses() {
        let languages = Languages::parse("en-us;q=0.5, fr, *;q=0.125").unwrap();
        assert_eq!(languages.to_string(), "fr,en-US;q=0.5,*;q=0.125");
        assert_eq!(Languages::parse(&languages.to_string()).unwrap(), languages);
    }
}
