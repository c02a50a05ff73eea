//! Authorization ヘッダー (RFC 9110 Section 11.6.2)
//!
//! ## 概要
//!
//! Authorization ヘッダーを認証スキームと資格情報に分割します。
//! スキームは小文字に正規化し、資格情報は前後の空白を取り除きます。
//!
//! Basic (RFC 7617) と Bearer (RFC 6750) の資格情報を取り出すヘルパーも提供します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::auth::Authorization;
//!
//! let auth = Authorization::parse("  Token   Some Token Value     ").unwrap();
//! assert_eq!(auth.scheme(), "token");
//! assert_eq!(auth.credentials(), "Some Token Value");
//!
//! let auth = Authorization::parse("Basic dXNlcjpwYXNzd29yZA==").unwrap();
//! let basic = auth.basic().unwrap();
//! assert_eq!(basic.username(), "user");
//! assert_eq!(basic.password(), "password");
//! ```

use core::fmt;

/// 認証ヘッダーエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// 空の入力
    Empty,
    /// Basic スキームでない
    NotBasicScheme,
    /// Bearer スキームでない
    NotBearerScheme,
    /// Base64 デコードエラー
    Base64DecodeError,
    /// UTF-8 デコードエラー
    Utf8Error,
    /// コロンが見つからない (user:password 形式でない)
    MissingColon,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Empty => write!(f, "empty authorization header"),
            AuthError::NotBasicScheme => write!(f, "not basic authentication scheme"),
            AuthError::NotBearerScheme => write!(f, "not bearer authentication scheme"),
            AuthError::Base64DecodeError => write!(f, "base64 decode error"),
            AuthError::Utf8Error => write!(f, "utf-8 decode error"),
            AuthError::MissingColon => write!(f, "missing colon in credentials"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Authorization ヘッダー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    /// 認証スキーム (小文字)
    scheme: String,
    /// 資格情報 (空の場合もある)
    credentials: String,
}

impl Authorization {
    /// スキームと資格情報から作成
    pub fn new(scheme: &str, credentials: &str) -> Self {
        Authorization {
            scheme: scheme.to_ascii_lowercase(),
            credentials: credentials.trim().to_string(),
        }
    }

    /// Basic 認証の Authorization を作成
    ///
    /// # 例
    ///
    /// ```rust
    /// use shiguredo_http_negotiation::auth::Authorization;
    ///
    /// let auth = Authorization::basic_credentials("user", "password");
    /// assert_eq!(auth.to_string(), "Basic dXNlcjpwYXNzd29yZA==");
    /// ```
    pub fn basic_credentials(username: &str, password: &str) -> Self {
        let credentials = format!("{}:{}", username, password);
        Authorization {
            scheme: "basic".to_string(),
            credentials: base64_encode(credentials.as_bytes()),
        }
    }

    /// Authorization ヘッダー値をパース
    ///
    /// 最初の空白の並びでスキームと資格情報に分割します。
    pub fn parse(input: &str) -> Result<Self, AuthError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AuthError::Empty);
        }

        let (scheme, credentials) = match input.find(char::is_whitespace) {
            Some(pos) => (&input[..pos], input[pos..].trim()),
            None => (input, ""),
        };

        Ok(Authorization {
            scheme: scheme.to_ascii_lowercase(),
            credentials: credentials.to_string(),
        })
    }

    /// 認証スキーム (小文字)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// 資格情報
    pub fn credentials(&self) -> &str {
        &self.credentials
    }

    /// Basic 認証の資格情報をデコード
    pub fn basic(&self) -> Result<BasicCredentials, AuthError> {
        if self.scheme != "basic" {
            return Err(AuthError::NotBasicScheme);
        }

        let decoded = base64_decode(&self.credentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::Utf8Error)?;
        let (username, password) = decoded.split_once(':').ok_or(AuthError::MissingColon)?;

        Ok(BasicCredentials {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Bearer トークンを取得
    pub fn bearer(&self) -> Result<&str, AuthError> {
        if self.scheme != "bearer" || self.credentials.is_empty() {
            return Err(AuthError::NotBearerScheme);
        }
        Ok(&self.credentials)
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 登録済みスキームは慣用の大文字小文字で出力する
        let scheme = match self.scheme.as_str() {
            "basic" => "Basic",
            "bearer" => "Bearer",
            "digest" => "Digest",
            other => other,
        };
        if self.credentials.is_empty() {
            write!(f, "{}", scheme)
        } else {
            write!(f, "{} {}", scheme, self.credentials)
        }
    }
}

/// Basic 認証の資格情報 (RFC 7617 Section 2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    username: String,
    password: String,
}

impl BasicCredentials {
    /// ユーザー名を取得
    pub fn username(&self) -> &str {
        &self.username
    }

    /// パスワードを取得
    pub fn password(&self) -> &str {
        &self.password
    }
}

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_encode(input: &[u8]) -> String {
    let mut result = String::with_capacity(input.len().div_ceil(3) * 4);

    for chunk in input.chunks(3) {
        let n = chunk
            .iter()
            .enumerate()
            .fold(0u32, |n, (i, &b)| n | (b as u32) << (16 - 8 * i));

        for i in 0..4 {
            if i <= chunk.len() {
                result.push(BASE64_ALPHABET[(n >> (18 - 6 * i) & 0x3F) as usize] as char);
            } else {
                result.push('=');
            }
        }
    }

    result
}

fn base64_value(b: u8) -> Option<u32> {
    match b {
        b'A'..=b'Z' => Some((b - b'A') as u32),
        b'a'..=b'z' => Some((b - b'a') as u32 + 26),
        b'0'..=b'9' => Some((b - b'0') as u32 + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

fn base64_decode(input: &str) -> Result<Vec<u8>, AuthError> {
    let input = input.trim_end_matches('=');
    let mut result = Vec::with_capacity(input.len() * 3 / 4);

    let mut buf: u32 = 0;
    let mut bits: u32 = 0;

    for b in input.bytes() {
        let value = base64_value(b).ok_or(AuthError::Base64DecodeError)?;
        buf = (buf << 6) | value;
        bits += 6;

        if bits >= 8 {
            bits -= 8;
            result.push((buf >> bits) as u8);
            buf &= (1 << bits) - 1;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64() {
        for (plain, encoded) in [
            (&b""[..], ""),
            (b"f", "Zg=="),
            (b"fo", "Zm8="),
            (b"foo", "Zm9v"),
            (b"foob", "Zm9vYg=="),
            (b"fooba", "Zm9vYmE="),
            (b"foobar", "Zm9vYmFy"),
        ] {
            assert_eq!(base64_encode(plain), encoded);
            assert_eq!(base64_decode(encoded).unwrap(), plain);
        }
        assert_eq!(base64_decode("Zm9v!"), Err(AuthError::Base64DecodeError));
    }

    #[test]
    fn test_parse() {
        let auth = Authorization::parse("  Token   Some Token Value     ").unwrap();
        assert_eq!(auth.scheme(), "token");
        assert_eq!(auth.credentials(), "Some Token Value");
    }

    #[test]
    fn test_parse_tab_separator() {
        let auth = Authorization::parse("Bearer\tabc.def").unwrap();
        assert_eq!(auth.scheme(), "bearer");
        assert_eq!(auth.bearer().unwrap(), "abc.def");
    }

    #[test]
    fn test_parse_scheme_only() {
        let auth = Authorization::parse("Negotiate").unwrap();
        assert_eq!(auth.scheme(), "negotiate");
        assert_eq!(auth.credentials(), "");
        assert_eq!(auth.to_string(), "negotiate");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Authorization::parse(""), Err(AuthError::Empty));
        assert_eq!(Authorization::parse("   "), Err(AuthError::Empty));
    }

    #[test]
    fn test_basic() {
        let auth = Authorization::parse("basic dXNlcjpwYXNzd29yZA==").unwrap();
        let basic = auth.basic().unwrap();
        assert_eq!(basic.username(), "user");
        assert_eq!(basic.password(), "password");

        // パスワードにコロンを含む
        let auth = Authorization::basic_credentials("user", "pa:ss");
        let basic = Authorization::parse(&auth.to_string())
            .unwrap()
            .basic()
            .unwrap();
        assert_eq!(basic.password(), "pa:ss");
    }

    #[test]
    fn test_basic_errors() {
        let auth = Authorization::parse("Bearer abc").unwrap();
        assert_eq!(auth.basic(), Err(AuthError::NotBasicScheme));

        // "user" (コロンなし)
        let auth = Authorization::parse("Basic dXNlcg==").unwrap();
        assert_eq!(auth.basic(), Err(AuthError::MissingColon));

        let auth = Authorization::parse("Basic !!!").unwrap();
        assert_eq!(auth.basic(), Err(AuthError::Base64DecodeError));

        // 0xff 0xfe
        let auth = Authorization::parse("Basic //4=").unwrap();
        assert_eq!(auth.basic(), Err(AuthError::Utf8Error));
    }

    #[test]
    fn test_bearer_errors() {
        let auth = Authorization::parse("Basic abc").unwrap();
        assert_eq!(auth.bearer(), Err(AuthError::NotBearerScheme));
        let auth = Authorization::parse("Bearer").unwrap();
        assert_eq!(auth.bearer(), Err(AuthError::NotBearerScheme));
    }

    #[test]
    fn test_display() {
        let auth = Authorization::parse("BEARER token123").unwrap();
        assert_eq!(auth.to_string(), "Bearer token123");
        assert_eq!(Authorization::parse(&auth.to_string()).unwrap(), auth);

        let auth = Authorization::new("Custom", " xyz ");
        assert_eq!(auth.to_string(), "custom xyz");
    }
}
