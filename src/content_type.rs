//! Content-Type ヘッダーパース (RFC 9110 Section 8.3)
//!
//! ## 概要
//!
//! Content-Type ヘッダーを MIME タイプとパラメータに分解します。
//! MIME タイプの形式は検査しません。空の値は空の Content-Type になります。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::content_type::ContentType;
//!
//! let ct = ContentType::parse("Text/HTML; Charset=utf-8").unwrap();
//! assert_eq!(ct.mimetype(), "text/html");
//! assert_eq!(ct.charset(), Some("utf-8"));
//!
//! let ct = ContentType::parse("multipart/form-data; boundary=----WebKitFormBoundary").unwrap();
//! assert_eq!(ct.boundary(), Some("----WebKitFormBoundary"));
//! ```

use core::fmt;

use crate::params::{self, Parameters, ParamsError};

/// パース済み Content-Type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentType {
    mimetype: String,
    params: Parameters,
}

impl ContentType {
    /// Content-Type 文字列をパース
    pub fn parse(input: &str) -> Result<Self, ParamsError> {
        let (mimetype, params) = params::parse_header(input)?;
        Ok(ContentType { mimetype, params })
    }

    /// 新しい ContentType を作成
    pub fn new(mimetype: &str) -> Self {
        ContentType {
            mimetype: mimetype.trim().to_ascii_lowercase(),
            params: Parameters::new(),
        }
    }

    /// パラメータを追加
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name, value);
        self
    }

    /// MIME タイプ (例: "text/html")
    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    /// パラメータ一覧
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// パラメータを取得 (大文字小文字を区別しない)
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// charset パラメータ
    pub fn charset(&self) -> Option<&str> {
        self.param("charset")
    }

    /// boundary パラメータ
    pub fn boundary(&self) -> Option<&str> {
        self.param("boundary")
    }

    /// MIME タイプが空かどうか
    pub fn is_empty(&self) -> bool {
        self.mimetype.is_empty()
    }

    /// multipart/* かどうか
    pub fn is_multipart(&self) -> bool {
        self.mimetype.starts_with("multipart/")
    }
}

/// パラメータはキー順に出力
impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mimetype, self.params)
    }
}
