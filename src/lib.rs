//! # shiguredo_http_negotiation
//!
//! 依存なしの HTTP ヘッダー値パースとコンテントネゴシエーションライブラリ (Sans I/O)
//!
//! ## 特徴
//!
//! - **依存なし**: 標準ライブラリのみ使用
//! - **Sans I/O**: ヘッダー値の文字列を受け取り、不変な値型を返すだけ
//! - **再シリアライズ**: すべての値型の `Display` はそのままヘッダー値として使える
//!
//! ## 対応ヘッダー
//!
//! - `Accept` / `Accept-Language` とネゴシエーション
//! - `Content-Type`
//! - `ETag` / `If-Match` / `If-None-Match` / `If-Range`
//! - `If-Modified-Since` / `If-Unmodified-Since` (HTTP-date)
//! - `Range` / `Content-Range` と multipart/byteranges
//! - `Host` / `Authorization` / `Cookie` / クエリ文字列
//!
//! ## 使い方
//!
//! ### ネゴシエーション
//!
//! ```rust
//! use shiguredo_http_negotiation::accept::Accept;
//!
//! let accept = Accept::parse("application/json;q=0.8, text/html;q=0.7, text/*;q=0.5").unwrap();
//! assert_eq!(accept.negotiate(&["application/json", "text/html"]), Some(&"application/json"));
//! assert_eq!(accept.negotiate(&["text/plain"]), Some(&"text/plain"));
//! assert_eq!(accept.negotiate(&["image/jpg"]), None);
//! ```
//!
//! ### Range
//!
//! ```rust
//! use shiguredo_http_negotiation::range::Range;
//!
//! let range = Range::parse("bytes=0-4,90-99,5-75,100-199,101-102").unwrap();
//! let resolved = range.resolve(150, true);
//! assert_eq!(resolved.values(), &[(0, 75), (90, 149)]);
//! ```
//!
//! ### エラー
//!
//! ```rust
//! use shiguredo_http_negotiation::Error;
//! use shiguredo_http_negotiation::range::Range;
//!
//! fn parse(value: &str) -> Result<Range, Error> {
//!     Ok(Range::parse(value)?)
//! }
//!
//! let err = parse("bytes=1-x").unwrap_err();
//! assert_eq!(err.status_code(), 400);
//! assert_eq!(err.reason(), "Range is malformed.");
//! ```

pub mod accept;
pub mod auth;
pub mod conditional;
pub mod content_type;
pub mod cookie;
pub mod date;
mod error;
pub mod etag;
pub mod host;
pub mod language;
mod limits;
pub mod multipart;
pub mod negotiation;
pub mod params;
pub mod quality;
pub mod query;
pub mod range;

pub use accept::{Accept, MediaType};
pub use content_type::ContentType;
pub use date::HttpDate;
pub use error::Error;
pub use etag::{ETag, ETags};
pub use language::{Language, Languages};
pub use limits::HeaderLimits;
pub use quality::{Quality, Specificity};
pub use range::{ContentRange, Range, ResolvedRanges};
