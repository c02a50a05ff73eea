//! ETag ヘッダー (RFC 9110 Section 8.8.3)
//!
//! ## 概要
//!
//! エンティティタグと、If-Match / If-None-Match で使う ETag のリストを提供します。
//!
//! 単一の ETag のパースは失敗しません。`W/` または `w/` で始まれば weak とし、
//! 前後の引用符を 1 つずつ取り除いた残りをタグ値とします。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::etag::{ETag, ETags};
//!
//! let weak = ETag::parse("W/\"0815\"");
//! assert!(weak.is_weak());
//! assert!(!weak.compare(&ETag::parse("\"0815\"")));
//! assert!(weak.weak_compare(&ETag::parse("\"0815\"")));
//!
//! let etags = ETags::parse("\"a\", W/\"b\"").unwrap();
//! assert!(etags.contains_strong(&ETag::strong("a")));
//! assert!(!etags.contains_strong(&ETag::strong("b")));
//! ```

use core::fmt;

use crate::limits::HeaderLimits;

/// ETag リストパースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ETagError {
    /// ETag が 1 つもない
    Empty,
    /// ヘッダー値が長すぎる
    TooLarge { size: usize, limit: usize },
    /// 要素数が多すぎる
    TooMany { count: usize, limit: usize },
}

impl fmt::Display for ETagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ETagError::Empty => write!(f, "empty etag list"),
            ETagError::TooLarge { size, limit } => {
                write!(f, "etag list too large: {} > {}", size, limit)
            }
            ETagError::TooMany { count, limit } => {
                write!(f, "too many etags: {} > {}", count, limit)
            }
        }
    }
}

impl std::error::Error for ETagError {}

/// エンティティタグ
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ETag {
    value: String,
    weak: bool,
}

impl ETag {
    /// ETag 文字列をパース
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (weak, rest) = match input.strip_prefix("W/").or_else(|| input.strip_prefix("w/")) {
            Some(rest) => (true, rest),
            None => (false, input),
        };

        let rest = rest.strip_prefix('"').unwrap_or(rest);
        let rest = rest.strip_suffix('"').unwrap_or(rest);

        ETag {
            value: rest.to_string(),
            weak,
        }
    }

    /// Strong ETag を作成
    pub fn strong(value: &str) -> Self {
        ETag {
            value: value.to_string(),
            weak: false,
        }
    }

    /// Weak ETag を作成
    pub fn weak(value: &str) -> Self {
        ETag {
            value: value.to_string(),
            weak: true,
        }
    }

    /// タグ値 (引用符なし)
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Weak ETag かどうか
    pub fn is_weak(&self) -> bool {
        self.weak
    }

    /// Strong 比較 (RFC 9110 Section 8.8.3.2)
    ///
    /// 両方が Strong ETag で、タグ値が同一の場合に true
    pub fn compare(&self, other: &ETag) -> bool {
        self.value == other.value && !(self.weak || other.weak)
    }

    /// Weak 比較 (weak フラグを無視してタグ値だけを比較)
    pub fn weak_compare(&self, other: &ETag) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weak {
            write!(f, "W/\"{}\"", self.value)
        } else {
            write!(f, "\"{}\"", self.value)
        }
    }
}

/// ETag のリスト (If-Match, If-None-Match 用)
///
/// 同じ ETag は 1 つにまとめます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ETags {
    /// ワイルドカード (*)
    Any,
    /// ETag の集合
    Tags(Vec<ETag>),
}

impl ETags {
    /// カンマ区切りの ETag リストをパース
    pub fn parse(input: &str) -> Result<Self, ETagError> {
        Self::parse_with_limits(input, &HeaderLimits::default())
    }

    /// 制限を指定して ETag リストをパース
    pub fn parse_with_limits(input: &str, limits: &HeaderLimits) -> Result<Self, ETagError> {
        limits
            .check_value_size(input)
            .map_err(|(size, limit)| ETagError::TooLarge { size, limit })?;

        let input = input.trim();
        if input == "*" {
            return Ok(ETags::Any);
        }

        let mut tags: Vec<ETag> = Vec::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let etag = ETag::parse(part);
            if !tags.contains(&etag) {
                tags.push(etag);
            }
            if tags.len() > limits.max_list_items {
                return Err(ETagError::TooMany {
                    count: tags.len(),
                    limit: limits.max_list_items,
                });
            }
        }

        if tags.is_empty() {
            return Err(ETagError::Empty);
        }

        Ok(ETags::Tags(tags))
    }

    /// ワイルドカードかどうか
    pub fn is_any(&self) -> bool {
        matches!(self, ETags::Any)
    }

    /// ETag 一覧 (ワイルドカードの場合は空)
    pub fn tags(&self) -> &[ETag] {
        match self {
            ETags::Any => &[],
            ETags::Tags(tags) => tags,
        }
    }

    /// ETag が 1 つもないか (ワイルドカードは空ではない)
    pub fn is_empty(&self) -> bool {
        matches!(self, ETags::Tags(tags) if tags.is_empty())
    }

    /// 指定した ETag が含まれるか (Strong 比較)
    pub fn contains_strong(&self, etag: &ETag) -> bool {
        match self {
            ETags::Any => true,
            ETags::Tags(tags) => tags.iter().any(|t| t.compare(etag)),
        }
    }

    /// 指定した ETag が含まれるか (Weak 比較)
    pub fn contains_weak(&self, etag: &ETag) -> bool {
        match self {
            ETags::Any => true,
            ETags::Tags(tags) => tags.iter().any(|t| t.weak_compare(etag)),
        }
    }
}

impl Default for ETags {
    fn default() -> Self {
        ETags::Tags(Vec::new())
    }
}

impl fmt::Display for ETags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ETags::Any => write!(f, "*"),
            ETags::Tags(tags) => {
                let s: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
                write!(f, "{}", s.join(","))
            }
        }
    }
}
