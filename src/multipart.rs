//! multipart/byteranges 生成 (RFC 9110 Section 14.6)
//!
//! ## 概要
//!
//! 解決済みの Range からレスポンスの形を決め、複数範囲の場合は
//! multipart/byteranges ボディを生成します。
//!
//! - 満たせる範囲がない: 416 と `Content-Range: bytes */size`
//! - 1 つ: 206 と単一の Content-Range
//! - 2 つ以上: 206 と multipart/byteranges ボディ
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::multipart::RangeResponse;
//! use shiguredo_http_negotiation::range::Range;
//!
//! let body = b"0123456789";
//! let resolved = Range::parse("bytes=0-1,8-").unwrap().resolve(body.len() as u64, true);
//!
//! match RangeResponse::new(&resolved, "text/plain", 42) {
//!     RangeResponse::Multipart(multipart) => {
//!         let bytes = multipart.build(body).unwrap();
//!         assert_eq!(bytes.len() as u64, multipart.encoded_len());
//!         assert!(multipart.content_type().starts_with("multipart/byteranges; boundary="));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use core::fmt;

use crate::range::{ContentRange, ResolvedRanges};

/// multipart/byteranges 生成エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartError {
    /// 範囲がボディの外側を指している
    RangeOutOfBounds { last: u64, len: usize },
}

impl fmt::Display for MultipartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultipartError::RangeOutOfBounds { last, len } => {
                write!(f, "range out of bounds: {} >= {}", last, len)
            }
        }
    }
}

impl std::error::Error for MultipartError {}

/// multipart/byteranges ボディビルダー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRangesBody {
    /// 境界文字列
    boundary: String,
    /// 各パートの Content-Type
    content_type: String,
    /// 各パートの Content-Range
    parts: Vec<ContentRange>,
}

impl ByteRangesBody {
    /// 乱数値を受け取って境界を生成する
    ///
    /// 乱数生成は呼び出し側の責任となる。
    pub fn new(random_value: u64, content_type: &str, ranges: &ResolvedRanges) -> Self {
        Self::with_boundary(
            &format!("----ByteRanges{:016x}", random_value),
            content_type,
            ranges,
        )
    }

    /// 境界を指定して作成
    pub fn with_boundary(boundary: &str, content_type: &str, ranges: &ResolvedRanges) -> Self {
        ByteRangesBody {
            boundary: boundary.to_string(),
            content_type: content_type.to_string(),
            parts: ranges.content_ranges().collect(),
        }
    }

    /// 境界文字列を取得
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// レスポンスの Content-Type ヘッダー値
    pub fn content_type(&self) -> String {
        format!("multipart/byteranges; boundary={}", self.boundary)
    }

    /// 各パートの Content-Range
    pub fn parts(&self) -> &[ContentRange] {
        &self.parts
    }

    /// `build` が返すボディの長さ (Content-Length)
    pub fn encoded_len(&self) -> u64 {
        let delimiter = 2 + self.boundary.len() as u64 + 2;
        let parts: u64 = self
            .parts
            .iter()
            .map(|part| {
                delimiter
                    + part_headers(&self.content_type, part).len() as u64
                    + part.length().unwrap_or(0)
                    + 2
            })
            .sum();
        parts + 2 + self.boundary.len() as u64 + 4
    }

    /// ボディをビルド
    ///
    /// 各範囲は両端を含むスライスとして切り出す。
    pub fn build(&self, body: &[u8]) -> Result<Vec<u8>, MultipartError> {
        let mut result = Vec::new();

        for part in &self.parts {
            let Some((first, last)) = part.range() else {
                continue;
            };
            if last >= body.len() as u64 {
                return Err(MultipartError::RangeOutOfBounds {
                    last,
                    len: body.len(),
                });
            }

            // 境界
            result.extend_from_slice(b"--");
            result.extend_from_slice(self.boundary.as_bytes());
            result.extend_from_slice(b"\r\n");

            // Content-Type / Content-Range とヘッダー終端
            result.extend_from_slice(part_headers(&self.content_type, part).as_bytes());

            // ボディ
            result.extend_from_slice(&body[first as usize..=last as usize]);
            result.extend_from_slice(b"\r\n");
        }

        // 終了境界
        result.extend_from_slice(b"--");
        result.extend_from_slice(self.boundary.as_bytes());
        result.extend_from_slice(b"--\r\n");

        Ok(result)
    }
}

fn part_headers(content_type: &str, part: &ContentRange) -> String {
    format!(
        "Content-Type: {}\r\nContent-Range: {}\r\n\r\n",
        content_type, part
    )
}

/// Range リクエストに対するレスポンスの形
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeResponse {
    /// 単一範囲 (206)
    Single(ContentRange),
    /// 複数範囲 (206, multipart/byteranges)
    Multipart(ByteRangesBody),
    /// 満たせる範囲がない (416)
    Unsatisfiable(ContentRange),
}

impl RangeResponse {
    /// 解決済みの範囲からレスポンスの形を決める
    ///
    /// 重なり合う範囲は統合してから使います。
    pub fn new(resolved: &ResolvedRanges, content_type: &str, random_value: u64) -> Self {
        let consolidated;
        let resolved = if resolved.is_disjoint() {
            resolved
        } else {
            consolidated = resolved.consolidate();
            &consolidated
        };

        match resolved.values() {
            [] => RangeResponse::Unsatisfiable(ContentRange::unsatisfied(
                resolved.unit(),
                resolved.size(),
            )),
            [_] => match resolved.content_ranges().next() {
                Some(content_range) => RangeResponse::Single(content_range),
                None => RangeResponse::Unsatisfiable(ContentRange::unsatisfied(
                    resolved.unit(),
                    resolved.size(),
                )),
            },
            _ => RangeResponse::Multipart(ByteRangesBody::new(
                random_value,
                content_type,
                resolved,
            )),
        }
    }

    /// HTTP ステータスコード
    pub fn status_code(&self) -> u16 {
        match self {
            RangeResponse::Single(_) | RangeResponse::Multipart(_) => 206,
            RangeResponse::Unsatisfiable(_) => 416,
        }
    }

    /// 単一範囲の場合にボディから切り出す
    pub fn slice<'a>(&self, body: &'a [u8]) -> Option<&'a [u8]> {
        let RangeResponse::Single(content_range) = self else {
            return None;
        };
        let (first, last) = content_range.range()?;
        body.get(first as usize..=last as usize)
    }
}
