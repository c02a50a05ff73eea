//! 条件付きリクエストヘッダー (RFC 9110 Section 13)
//!
//! ## 概要
//!
//! If-Match / If-None-Match / If-Range / If-Modified-Since / If-Unmodified-Since の
//! パースと評価を提供します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::conditional::{IfMatch, IfModifiedSince, IfNoneMatch, IfRange};
//! use shiguredo_http_negotiation::date::HttpDate;
//! use shiguredo_http_negotiation::etag::ETag;
//!
//! let if_match = IfMatch::parse("\"abc\", \"def\"").unwrap();
//! assert!(if_match.matches(&ETag::strong("abc")));
//!
//! let if_none_match = IfNoneMatch::parse("*").unwrap();
//! assert!(if_none_match.is_any());
//!
//! // 引用符を含む値は ETag、それ以外は日付
//! assert!(IfRange::parse("W/\"x\"").unwrap().is_etag());
//! assert!(IfRange::parse("Sun, 06 Nov 1994 08:49:37 GMT").unwrap().is_date());
//!
//! let ims = IfModifiedSince::parse("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
//! let last_modified = HttpDate::parse("Mon, 07 Nov 1994 00:00:00 GMT").unwrap();
//! assert!(ims.is_modified(&last_modified));
//! ```

use core::fmt;

use crate::date::{DateError, HttpDate};
use crate::etag::{ETag, ETagError, ETags};

/// 条件付きリクエストエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalError {
    /// 空の入力
    Empty,
    /// ETag パースエラー
    ETag(ETagError),
    /// 日付パースエラー
    Date(DateError),
}

impl fmt::Display for ConditionalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionalError::Empty => write!(f, "empty conditional header"),
            ConditionalError::ETag(e) => write!(f, "invalid etag in conditional header: {}", e),
            ConditionalError::Date(e) => write!(f, "invalid date in conditional header: {}", e),
        }
    }
}

impl std::error::Error for ConditionalError {}

impl From<ETagError> for ConditionalError {
    fn from(e: ETagError) -> Self {
        ConditionalError::ETag(e)
    }
}

impl From<DateError> for ConditionalError {
    fn from(e: DateError) -> Self {
        ConditionalError::Date(e)
    }
}

/// If-Match ヘッダー (RFC 9110 Section 13.1.1)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IfMatch(ETags);

impl IfMatch {
    /// If-Match ヘッダーをパース
    pub fn parse(input: &str) -> Result<Self, ConditionalError> {
        Ok(IfMatch(ETags::parse(input)?))
    }

    /// ワイルドカード (*) かどうか
    pub fn is_any(&self) -> bool {
        self.0.is_any()
    }

    /// 現在の ETag が条件を満たすか (Strong 比較)
    ///
    /// ETag が 1 つもない場合は何にも一致しません。
    pub fn matches(&self, etag: &ETag) -> bool {
        self.0.contains_strong(etag)
    }

    /// ETag リスト
    pub fn etags(&self) -> &ETags {
        &self.0
    }
}

impl fmt::Display for IfMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// If-None-Match ヘッダー (RFC 9110 Section 13.1.2)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IfNoneMatch(ETags);

impl IfNoneMatch {
    /// If-None-Match ヘッダーをパース
    pub fn parse(input: &str) -> Result<Self, ConditionalError> {
        Ok(IfNoneMatch(ETags::parse(input)?))
    }

    /// ワイルドカード (*) かどうか
    pub fn is_any(&self) -> bool {
        self.0.is_any()
    }

    /// 現在の ETag が条件を満たすか (Weak 比較)
    ///
    /// true ならリクエストを処理し、false なら 304 / 412 を返す。
    pub fn matches(&self, etag: &ETag) -> bool {
        !self.0.contains_weak(etag)
    }

    /// ETag リスト
    pub fn etags(&self) -> &ETags {
        &self.0
    }
}

impl fmt::Display for IfNoneMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// If-Modified-Since ヘッダー (RFC 9110 Section 13.1.3)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfModifiedSince(HttpDate);

impl IfModifiedSince {
    /// If-Modified-Since ヘッダーをパース
    pub fn parse(input: &str) -> Result<Self, ConditionalError> {
        Ok(IfModifiedSince(HttpDate::parse(input)?))
    }

    /// 日時
    pub fn date(&self) -> &HttpDate {
        &self.0
    }

    /// 指定日時より後に変更されているか
    ///
    /// false なら 304 を返す。
    pub fn is_modified(&self, last_modified: &HttpDate) -> bool {
        *last_modified > self.0
    }
}

impl fmt::Display for IfModifiedSince {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// If-Unmodified-Since ヘッダー (RFC 9110 Section 13.1.4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfUnmodifiedSince(HttpDate);

impl IfUnmodifiedSince {
    /// If-Unmodified-Since ヘッダーをパース
    pub fn parse(input: &str) -> Result<Self, ConditionalError> {
        Ok(IfUnmodifiedSince(HttpDate::parse(input)?))
    }

    /// 日時
    pub fn date(&self) -> &HttpDate {
        &self.0
    }

    /// 指定日時以降変更されていないか
    ///
    /// false なら 412 を返す。
    pub fn is_unmodified(&self, last_modified: &HttpDate) -> bool {
        *last_modified <= self.0
    }
}

impl fmt::Display for IfUnmodifiedSince {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// If-Range ヘッダー (RFC 9110 Section 13.1.5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IfRange {
    /// ETag による条件
    ETag(ETag),
    /// 日時による条件
    Date(HttpDate),
}

impl IfRange {
    /// If-Range ヘッダーをパース
    ///
    /// `"` を含む値は ETag、それ以外は HTTP-date として扱います。
    pub fn parse(input: &str) -> Result<Self, ConditionalError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ConditionalError::Empty);
        }

        if input.contains('"') {
            Ok(IfRange::ETag(ETag::parse(input)))
        } else {
            Ok(IfRange::Date(HttpDate::parse(input)?))
        }
    }

    /// ETag かどうか
    pub fn is_etag(&self) -> bool {
        matches!(self, IfRange::ETag(_))
    }

    /// 日時かどうか
    pub fn is_date(&self) -> bool {
        matches!(self, IfRange::Date(_))
    }

    /// ETag を取得
    pub fn etag(&self) -> Option<&ETag> {
        match self {
            IfRange::ETag(e) => Some(e),
            IfRange::Date(_) => None,
        }
    }

    /// 日時を取得
    pub fn date(&self) -> Option<&HttpDate> {
        match self {
            IfRange::ETag(_) => None,
            IfRange::Date(d) => Some(d),
        }
    }

    /// 現在の表現に対して Range を適用してよいか
    ///
    /// ETag は Strong 比較、日時は Last-Modified との完全一致で判定します。
    /// false なら Range を無視して 200 で全体を返す。
    pub fn is_satisfied(&self, etag: Option<&ETag>, last_modified: Option<&HttpDate>) -> bool {
        match self {
            IfRange::ETag(expected) => etag.is_some_and(|etag| expected.compare(etag)),
            IfRange::Date(date) => last_modified == Some(date),
        }
    }
}

impl fmt::Display for IfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IfRange::ETag(e) => write!(f, "{}", e),
            IfRange::Date(d) => write!(f, "{}", d),
        }
    }
}
