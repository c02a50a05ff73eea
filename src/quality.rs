//! 品質値と特定度 (RFC 9110 Section 12.4.2)
//!
//! ## 概要
//!
//! 重み付きリスト (Accept / Accept-Language) の要素に付く品質値と、
//! 品質値が同じ場合の並び順を決める 3 段階の特定度を提供します。
//!
//! 品質値の文法は `0.xxx` (小数 1-3 桁) か `1.0` / `1.00` / `1.000` だけを受け付けます。
//! `1` や `0` のような整数表記、4 桁以上の小数、1 を超える値はエラーです。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::quality::Quality;
//!
//! let q = Quality::parse("0.125").unwrap();
//! assert_eq!(q.millis(), 125);
//! assert_eq!(q.to_string(), "0.125");
//!
//! assert!(Quality::parse("1.1").is_err());
//! assert!(Quality::parse("0.12345").is_err());
//! ```

use core::fmt;

/// 品質値パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityError {
    /// 不正な形式
    InvalidFormat,
}

impl fmt::Display for QualityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityError::InvalidFormat => write!(f, "invalid quality value"),
        }
    }
}

impl std::error::Error for QualityError {}

/// 品質値 (0.000 - 1.000)
///
/// 1000 分の 1 単位の整数で保持します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u16);

impl Quality {
    /// 最大値 (1.0)
    pub const MAX: Quality = Quality(1000);
    /// 最小値 (0.0)
    pub const MIN: Quality = Quality(0);

    /// 品質値をパース
    pub fn parse(input: &str) -> Result<Self, QualityError> {
        let (int_part, frac) = input
            .split_once('.')
            .ok_or(QualityError::InvalidFormat)?;

        if frac.is_empty() || frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QualityError::InvalidFormat);
        }

        match int_part {
            "1" => {
                if frac.bytes().all(|b| b == b'0') {
                    Ok(Quality::MAX)
                } else {
                    Err(QualityError::InvalidFormat)
                }
            }
            "0" => {
                let mut value = 0u16;
                for (i, b) in frac.bytes().enumerate() {
                    let digit = (b - b'0') as u16;
                    value += digit * 10u16.pow(2 - i as u32);
                }
                Ok(Quality(value))
            }
            _ => Err(QualityError::InvalidFormat),
        }
    }

    /// 1000 分の 1 単位の値から作成 (1000 を超える値は 1000 に丸める)
    pub fn from_millis(millis: u16) -> Self {
        Quality(millis.min(1000))
    }

    /// 1000 分の 1 単位の値
    pub fn millis(&self) -> u16 {
        self.0
    }

    /// f32 に変換
    pub fn as_f32(&self) -> f32 {
        self.0 as f32 / 1000.0
    }

    /// 0 かどうか (受け入れ不可)
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::MAX
    }
}

/// 厳格な文法で再パースできる形式で出力
impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1000 => write!(f, "1.0"),
            0 => write!(f, "0.0"),
            v => {
                let mut frac = format!("{:03}", v);
                while frac.ends_with('0') {
                    frac.pop();
                }
                write!(f, "0.{}", frac)
            }
        }
    }
}

/// 特定度
///
/// 品質値が同じ要素の間では、より特定的なものが優先されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    /// ワイルドカード (`*/*`, `*`)
    None,
    /// 部分一致 (`type/*`, 地域なしの言語タグ)
    Partial,
    /// 完全一致 (`type/subtype`, 地域付きの言語タグ)
    Exact,
}
