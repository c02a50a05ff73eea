//! Host ヘッダーパース (RFC 9110 Section 7.2)
//!
//! ## 概要
//!
//! Host ヘッダー値をホストと任意のポートに分割します。
//!
//! - `[` で始まる値は IPv6 リテラルとして扱い、最後の `]:` で分割する
//! - それ以外は最初の `:` で分割する
//!
//! [`parse_host`] は分割だけを行い、[`Host::parse`] はさらにホスト部分を検証します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::host::{Host, parse_host};
//!
//! assert_eq!(parse_host("[::1]:5555").unwrap(), ("[::1]", Some(5555)));
//!
//! let host = Host::parse("example.com:8080").unwrap();
//! assert_eq!(host.host(), "example.com");
//! assert_eq!(host.port(), Some(8080));
//! ```

use core::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Host パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// 空の入力
    Empty,
    /// 不正なホスト
    InvalidHost,
    /// 不正なポート
    InvalidPort,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Empty => write!(f, "empty Host header"),
            HostError::InvalidHost => write!(f, "invalid Host header host"),
            HostError::InvalidPort => write!(f, "invalid Host header port"),
        }
    }
}

impl std::error::Error for HostError {}

/// Host ヘッダー値をホストとポートに分割
///
/// IPv6 リテラルのホストは角括弧を含んだまま返します。
pub fn parse_host(value: &str) -> Result<(&str, Option<u16>), HostError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(HostError::Empty);
    }

    let split = if value.starts_with('[') {
        value
            .rfind("]:")
            .map(|pos| (&value[..pos + 1], &value[pos + 2..]))
    } else {
        value.split_once(':')
    };

    match split {
        Some((host, port)) => Ok((host, Some(parse_port(port)?))),
        None => Ok((value, None)),
    }
}

/// Host ヘッダー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    host: String,
    port: Option<u16>,
}

impl Host {
    /// Host ヘッダーをパース
    pub fn parse(input: &str) -> Result<Self, HostError> {
        let (host, port) = parse_host(input)?;

        if host.chars().any(|c| c.is_whitespace()) {
            return Err(HostError::InvalidHost);
        }

        let valid = if let Some(inner) = host.strip_prefix('[') {
            inner
                .strip_suffix(']')
                .is_some_and(is_valid_ipv6_or_future)
        } else {
            host.parse::<Ipv4Addr>().is_ok() || is_valid_reg_name(host)
        };
        if !valid {
            return Err(HostError::InvalidHost);
        }

        Ok(Host {
            host: host.to_string(),
            port,
        })
    }

    /// Host 名 (IPv6 は角括弧付き)
    pub fn host(&self) -> &str {
        &self.host
    }

    /// ポート番号 (任意)
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// IPv6 リテラルかどうか
    pub fn is_ipv6(&self) -> bool {
        self.host.starts_with('[')
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(port) = self.port {
            write!(f, "{}:{}", self.host, port)
        } else {
            write!(f, "{}", self.host)
        }
    }
}

fn parse_port(input: &str) -> Result<u16, HostError> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HostError::InvalidPort);
    }
    input.parse::<u16>().map_err(|_| HostError::InvalidPort)
}

fn is_valid_ipv6_or_future(input: &str) -> bool {
    if input.starts_with('v') || input.starts_with('V') {
        return is_valid_ipvfuture(input);
    }
    input.parse::<Ipv6Addr>().is_ok()
}

// "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )
fn is_valid_ipvfuture(input: &str) -> bool {
    let Some((version, rest)) = input[1..].split_once('.') else {
        return false;
    };
    !version.is_empty()
        && version.bytes().all(|b| b.is_ascii_hexdigit())
        && !rest.is_empty()
        && rest
            .bytes()
            .all(|b| is_unreserved(b) || is_sub_delim(b) || b == b':')
}

fn is_valid_reg_name(input: &str) -> bool {
    let bytes = input.as_bytes();
    if bytes.is_empty() {
        return false;
    }

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if is_unreserved(b) || is_sub_delim(b) {
            i += 1;
            continue;
        }
        if b == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            i += 3;
            continue;
        }
        return false;
    }

    true
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'.' || b == b'_' || b == b'~'
}

fn is_sub_delim(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_name() {
        assert_eq!(parse_host("example.com").unwrap(), ("example.com", None));
        assert_eq!(
            parse_host("example.com:8080").unwrap(),
            ("example.com", Some(8080))
        );
        assert_eq!(parse_host("127.0.0.1:80").unwrap(), ("127.0.0.1", Some(80)));
    }

    #[test]
    fn test_parse_host_ipv6() {
        assert_eq!(parse_host("[::1]:5555").unwrap(), ("[::1]", Some(5555)));
        assert_eq!(
            parse_host("[fe80::ca1f:eaff:fe69:2501]").unwrap(),
            ("[fe80::ca1f:eaff:fe69:2501]", None)
        );
        assert_eq!(
            parse_host("[2a01:8790:16d:0:218:de87:164:8745]:80").unwrap(),
            ("[2a01:8790:16d:0:218:de87:164:8745]", Some(80))
        );
    }

    #[test]
    fn test_parse_host_invalid_port() {
        assert_eq!(parse_host("example.com:"), Err(HostError::InvalidPort));
        assert_eq!(parse_host("example.com:abc"), Err(HostError::InvalidPort));
        assert_eq!(parse_host("example.com:65536"), Err(HostError::InvalidPort));
        assert_eq!(parse_host("a:1:2"), Err(HostError::InvalidPort));
        assert_eq!(parse_host("[::1]:"), Err(HostError::InvalidPort));
        assert_eq!(parse_host(""), Err(HostError::Empty));
    }

    #[test]
    fn test_host_parse() {
        let host = Host::parse("example.com:8080").unwrap();
        assert_eq!(host.host(), "example.com");
        assert_eq!(host.port(), Some(8080));
        assert!(!host.is_ipv6());

        let host = Host::parse("[::1]").unwrap();
        assert!(host.is_ipv6());
        assert_eq!(host.host(), "[::1]");
        assert_eq!(host.port(), None);

        let host = Host::parse("[v1.fe80::a+en1]:443").unwrap();
        assert_eq!(host.port(), Some(443));
    }

    #[test]
    fn test_host_parse_invalid() {
        assert!(Host::parse("").is_err());
        assert_eq!(Host::parse("exa mple.com"), Err(HostError::InvalidHost));
        assert_eq!(Host::parse("user@example.com"), Err(HostError::InvalidHost));
        assert_eq!(Host::parse("[::1"), Err(HostError::InvalidHost));
        assert_eq!(Host::parse("[not-an-ip]"), Err(HostError::InvalidHost));
        assert_eq!(Host::parse("[v.x]"), Err(HostError::InvalidHost));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Host::parse("example.com:8080").unwrap().to_string(),
            "example.com:8080"
        );
        assert_eq!(Host::parse("[::1]:80").unwrap().to_string(), "[::1]:80");
    }
}
