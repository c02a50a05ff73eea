//! Accept ヘッダーとメディアタイプネゴシエーション (RFC 9110 Section 12.5.1)
//!
//! ## 概要
//!
//! Accept ヘッダーを重み付きメディアレンジのリストとしてパースし、
//! サーバーが提供できるメディアタイプの中から 1 つを選びます。
//!
//! - `*` は `*/*`、`text/` は `text/*`、`text` は `text/*` として扱います
//! - `*/html` のようにサブタイプだけが具体的なものはエラーです
//! - q=0 の要素は受け入れ不可として取り除きます ([`Accept::parse_keep_null`] を除く)
//! - 空の Accept ヘッダーはすべてを受け入れる `*/*` になります
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::accept::Accept;
//!
//! let accept = Accept::parse("application/json;q=0.8, text/html;q=0.7, text/*;q=0.5").unwrap();
//! assert_eq!(accept.negotiate(&["application/json", "text/html"]), Some(&"application/json"));
//! assert_eq!(accept.negotiate(&["text/plain"]), Some(&"text/plain"));
//! assert_eq!(accept.negotiate(&["image/jpg"]), None);
//! ```

use core::cmp::Ordering;
use core::fmt;

use crate::limits::HeaderLimits;
use crate::negotiation::{self, Preference};
use crate::params::{self, Parameters, ParamsError};
use crate::quality::{Quality, QualityError, Specificity};

/// Accept パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptError {
    /// 不正なメディアレンジ
    InvalidMediaRange,
    /// 不正な q 値
    InvalidQuality,
    /// 引用符が閉じていない
    UnterminatedQuote,
    /// 受け入れ可能なメディアレンジがない (すべて q=0)
    NothingAcceptable,
    /// ヘッダー値が長すぎる
    TooLarge { size: usize, limit: usize },
    /// 要素数が多すぎる
    TooMany { count: usize, limit: usize },
}

impl fmt::Display for AcceptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptError::InvalidMediaRange => write!(f, "invalid media range"),
            AcceptError::InvalidQuality => write!(f, "invalid quality value"),
            AcceptError::UnterminatedQuote => write!(f, "unterminated quoted string"),
            AcceptError::NothingAcceptable => write!(f, "no acceptable media range"),
            AcceptError::TooLarge { size, limit } => {
                write!(f, "Accept header too large: {} > {}", size, limit)
            }
            AcceptError::TooMany { count, limit } => {
                write!(f, "too many media ranges: {} > {}", count, limit)
            }
        }
    }
}

impl std::error::Error for AcceptError {}

impl From<ParamsError> for AcceptError {
    fn from(e: ParamsError) -> Self {
        match e {
            ParamsError::UnterminatedQuote => AcceptError::UnterminatedQuote,
        }
    }
}

impl From<QualityError> for AcceptError {
    fn from(_: QualityError) -> Self {
        AcceptError::InvalidQuality
    }
}

/// 重み付きメディアレンジ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    mimetype: String,
    slash: usize,
    params: Parameters,
    quality: Quality,
    specificity: Specificity,
}

impl MediaType {
    /// タイプとサブタイプから作成
    ///
    /// `maintype` が `*` ならサブタイプに関係なく `*/*` になります。
    pub fn new(maintype: &str, subtype: &str) -> Self {
        let maintype = maintype.to_ascii_lowercase();
        let subtype = if maintype == "*" || subtype.is_empty() {
            "*".to_string()
        } else {
            subtype.to_ascii_lowercase()
        };
        let specificity = if maintype == "*" {
            Specificity::None
        } else if subtype == "*" {
            Specificity::Partial
        } else {
            Specificity::Exact
        };
        MediaType {
            slash: maintype.len(),
            mimetype: format!("{}/{}", maintype, subtype),
            params: Parameters::new(),
            quality: Quality::MAX,
            specificity,
        }
    }

    /// `*/*`
    pub fn wildcard() -> Self {
        MediaType::new("*", "*")
    }

    /// 品質値を設定
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// パラメータを追加
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name, value);
        self
    }

    /// メディアレンジをパース
    pub fn parse(input: &str) -> Result<Self, AcceptError> {
        let (mimetype, mut params) = params::parse_header(input)?;

        let quality = match params.remove("q") {
            Some(q) => Quality::parse(&q)?,
            None => Quality::MAX,
        };

        let (maintype, subtype) = split_mimetype(&mimetype)?;
        let mut media = MediaType::new(maintype, subtype);
        media.params = params;
        media.quality = quality;
        Ok(media)
    }

    /// `type/subtype`
    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    /// タイプ
    pub fn maintype(&self) -> &str {
        &self.mimetype[..self.slash]
    }

    /// サブタイプ
    pub fn subtype(&self) -> &str {
        &self.mimetype[self.slash + 1..]
    }

    /// q 以外のパラメータ
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// 品質値
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// 特定度
    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// 候補のメディアタイプがこのメディアレンジに一致するか
    ///
    /// 候補のパラメータは無視し、大文字小文字を区別せずに比較します。
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.split(';').next().unwrap_or_default().trim();
        match self.specificity {
            Specificity::None => true,
            Specificity::Partial => candidate
                .split_once('/')
                .is_some_and(|(maintype, _)| maintype.eq_ignore_ascii_case(self.maintype())),
            Specificity::Exact => candidate.eq_ignore_ascii_case(&self.mimetype),
        }
    }

    /// 優先順の比較 (優先度の高いものが `Less`)
    pub fn cmp_priority(&self, other: &MediaType) -> Ordering {
        negotiation::priority_order(self, other)
    }
}

impl Preference for MediaType {
    fn quality(&self) -> Quality {
        self.quality
    }

    fn specificity(&self) -> Specificity {
        self.specificity
    }

    fn matches(&self, candidate: &str) -> bool {
        MediaType::matches(self, candidate)
    }
}

/// `type/subtype;k=v;q=0.5` 形式で出力
///
/// `q` も他のパラメータと同じくキー順に並べます。q=1.0 は省略します。
impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quality == Quality::MAX {
            return write!(f, "{}{}", self.mimetype, self.params);
        }
        let mut params = self.params.clone();
        params.insert("q", &self.quality.to_string());
        write!(f, "{}{}", self.mimetype, params)
    }
}

fn split_mimetype(mimetype: &str) -> Result<(&str, &str), AcceptError> {
    if mimetype == "*" {
        return Ok(("*", "*"));
    }

    let (maintype, subtype) = match mimetype.split_once('/') {
        Some((maintype, "")) => (maintype, "*"),
        Some((maintype, subtype)) => (maintype, subtype),
        None => (mimetype, "*"),
    };

    if maintype == "*" && subtype != "*" {
        return Err(AcceptError::InvalidMediaRange);
    }
    if !params::is_token(maintype) || !params::is_token(subtype) {
        return Err(AcceptError::InvalidMediaRange);
    }

    Ok((maintype, subtype))
}

/// Accept ヘッダー
///
/// 要素は常に優先順に並んでおり、空になることはありません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accept {
    items: Vec<MediaType>,
}

impl Accept {
    /// メディアレンジのリストから作成
    ///
    /// 空のリストは `*/*` 1 つになります。
    pub fn new(mut items: Vec<MediaType>) -> Self {
        if items.is_empty() {
            items.push(MediaType::wildcard());
        }
        negotiation::sort_by_priority(&mut items);
        Accept { items }
    }

    /// Accept ヘッダーをパース (q=0 の要素は取り除く)
    pub fn parse(input: &str) -> Result<Self, AcceptError> {
        Self::parse_with_limits(input, &HeaderLimits::default())
    }

    /// 制限を指定して Accept ヘッダーをパース
    pub fn parse_with_limits(input: &str, limits: &HeaderLimits) -> Result<Self, AcceptError> {
        parse_accept(input, limits, false)
    }

    /// q=0 の要素を残して Accept ヘッダーをパース
    pub fn parse_keep_null(input: &str) -> Result<Self, AcceptError> {
        parse_accept(input, &HeaderLimits::default(), true)
    }

    /// メディアレンジ一覧 (優先順)
    pub fn items(&self) -> &[MediaType] {
        &self.items
    }

    /// 候補の中から最も希望に合うものを選ぶ
    pub fn negotiate<'a, C: AsRef<str>>(&self, supported: &'a [C]) -> Option<&'a C> {
        negotiation::negotiate(&self.items, supported)
    }

    /// 候補を受け入れ可能か (q=0 の要素も一致とみなす)
    pub fn accepts(&self, candidate: &str) -> bool {
        self.items.iter().any(|item| item.matches(candidate))
    }
}

impl Default for Accept {
    fn default() -> Self {
        Accept::new(Vec::new())
    }
}

impl fmt::Display for Accept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.items.iter().map(|item| item.to_string()).collect();
        write!(f, "{}", values.join(","))
    }
}

fn parse_accept(input: &str, limits: &HeaderLimits, keep_null: bool) -> Result<Accept, AcceptError> {
    limits
        .check_value_size(input)
        .map_err(|(size, limit)| AcceptError::TooLarge { size, limit })?;

    if input.trim().is_empty() {
        return Ok(Accept::default());
    }

    let parts = params::split_unquoted(input, ',');
    if parts.len() > limits.max_list_items {
        return Err(AcceptError::TooMany {
            count: parts.len(),
            limit: limits.max_list_items,
        });
    }

    let mut items = Vec::new();
    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let media = MediaType::parse(part)?;
        if !keep_null && media.quality.is_zero() {
            continue;
        }
        items.push(media);
    }

    if items.is_empty() {
        return Err(AcceptError::NothingAcceptable);
    }

    Ok(Accept::new(items))
}
