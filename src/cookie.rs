//! Cookie ヘッダーパース (RFC 6265 Section 5.4)
//!
//! ## 概要
//!
//! Cookie リクエストヘッダーを、出現順を保った名前と値の対応に変換します。
//!
//! - 同じ名前が複数回現れた場合は最後の値を使う (位置は最初の出現位置)
//! - 値を囲む二重引用符は取り除く
//! - 空のヘッダーは空の Cookies になる
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::cookie::Cookies;
//!
//! let cookies = Cookies::parse("session=abc123; user=\"john\"; session=xyz").unwrap();
//! assert_eq!(cookies.get("session"), Some("xyz"));
//! assert_eq!(cookies.get("user"), Some("john"));
//! assert_eq!(cookies.to_string(), "session=xyz; user=john");
//! ```

use core::fmt;

use crate::limits::HeaderLimits;
use crate::params::is_token;

/// Cookie パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieError {
    /// `=` がない
    InvalidFormat,
    /// 不正な名前
    InvalidName,
    /// 不正な値
    InvalidValue,
    /// ヘッダー値が長すぎる
    TooLarge { size: usize, limit: usize },
    /// Cookie が多すぎる
    TooMany { count: usize, limit: usize },
}

impl fmt::Display for CookieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieError::InvalidFormat => write!(f, "invalid cookie format"),
            CookieError::InvalidName => write!(f, "invalid cookie name"),
            CookieError::InvalidValue => write!(f, "invalid cookie value"),
            CookieError::TooLarge { size, limit } => {
                write!(f, "cookie header too large: {} > {}", size, limit)
            }
            CookieError::TooMany { count, limit } => {
                write!(f, "too many cookies: {} > {}", count, limit)
            }
        }
    }
}

impl std::error::Error for CookieError {}

/// Cookie ヘッダーの内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies {
    items: Vec<(String, String)>,
}

impl Cookies {
    /// 空の Cookies を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// Cookie ヘッダーをパース
    pub fn parse(input: &str) -> Result<Self, CookieError> {
        Self::parse_with_limits(input, &HeaderLimits::default())
    }

    /// 制限を指定して Cookie ヘッダーをパース
    pub fn parse_with_limits(input: &str, limits: &HeaderLimits) -> Result<Self, CookieError> {
        limits
            .check_value_size(input)
            .map_err(|(size, limit)| CookieError::TooLarge { size, limit })?;

        let mut cookies = Cookies::new();

        for pair in input.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }

            let (name, value) = parse_cookie_pair(pair)?;
            cookies.set(name, value);

            if cookies.len() > limits.max_list_items {
                return Err(CookieError::TooMany {
                    count: cookies.len(),
                    limit: limits.max_list_items,
                });
            }
        }

        Ok(cookies)
    }

    /// Cookie を追加 (同名の Cookie は値を置き換える)
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), CookieError> {
        if !is_token(name) {
            return Err(CookieError::InvalidName);
        }
        if !value.bytes().all(is_cookie_octet) {
            return Err(CookieError::InvalidValue);
        }
        self.set(name, value);
        Ok(())
    }

    fn set(&mut self, name: &str, value: &str) {
        match self.items.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.items.push((name.to_string(), value.to_string())),
        }
    }

    /// 値を取得 (名前は大文字小文字を区別する)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Cookie が存在するか
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Cookie の数
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Cookie が 1 つもないか
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(name, value)` を出現順に返す
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl fmt::Display for Cookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

fn parse_cookie_pair(pair: &str) -> Result<(&str, &str), CookieError> {
    let (name, value) = pair.split_once('=').ok_or(CookieError::InvalidFormat)?;
    let name = name.trim();
    let value = value.trim();

    // RFC 6265 Section 4.1.1: cookie-name = token
    if !is_token(name) {
        return Err(CookieError::InvalidName);
    }

    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    Ok((name, value))
}

// RFC 6265 Section 4.1.1 cookie-octet
fn is_cookie_octet(b: u8) -> bool {
    b == 0x21
        || (0x23..=0x2B).contains(&b)
        || (0x2D..=0x3A).contains(&b)
        || (0x3C..=0x5B).contains(&b)
        || (0x5D..=0x7E).contains(&b)
}
