//! クエリ文字列パース (application/x-www-form-urlencoded)
//!
//! ## 概要
//!
//! クエリ文字列を、名前ごとに値のリストを持つマルチマップに変換します。
//!
//! - `+` は空白としてデコードする
//! - パーセントエンコードをデコードし、不正な UTF-8 は置換文字に変える
//! - 不正なパーセントエンコードはそのまま残す
//! - 名前は最初に現れた順を保つ
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::query::Query;
//!
//! let query = Query::parse("name=hello+world&tag=a&tag=b&debug=on").unwrap();
//! assert_eq!(query.get("name"), Some("hello world"));
//! assert_eq!(query.get_all("tag"), &["a", "b"]);
//! assert_eq!(query.as_bool("debug").unwrap(), Some(true));
//! ```

use core::fmt;

use crate::limits::HeaderLimits;

/// クエリパースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// 空のフィールド (strict の場合)
    EmptyField,
    /// `=` のないフィールド (strict の場合)
    MissingEquals { field: String },
    /// フィールドが多すぎる
    TooMany { count: usize, limit: usize },
    /// 値を要求された型に変換できない
    InvalidValue { name: String, value: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::EmptyField => write!(f, "empty query field"),
            QueryError::MissingEquals { field } => write!(f, "bad query field: {:?}", field),
            QueryError::TooMany { count, limit } => {
                write!(f, "too many query fields: {} > {}", count, limit)
            }
            QueryError::InvalidValue { name, value } => {
                write!(f, "invalid value for query parameter {}: {:?}", name, value)
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// クエリパースのオプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// 値が空のフィールドを残すか (デフォルト: true)
    pub keep_blank_values: bool,
    /// 空のフィールドや `=` のないフィールドをエラーにするか (デフォルト: true)
    pub strict: bool,
    /// フィールド区切り文字 (デフォルト: `&`)
    pub separator: char,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            keep_blank_values: true,
            strict: true,
            separator: '&',
        }
    }
}

/// パース済みクエリ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    fields: Vec<(String, Vec<String>)>,
}

impl Query {
    /// デフォルトのオプションでパース
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        Self::parse_with_options(input, &QueryOptions::default(), &HeaderLimits::default())
    }

    /// オプションと制限を指定してパース
    pub fn parse_with_options(
        input: &str,
        options: &QueryOptions,
        limits: &HeaderLimits,
    ) -> Result<Self, QueryError> {
        let mut query = Query::default();
        if input.is_empty() {
            return Ok(query);
        }

        let count = input.matches(options.separator).count() + 1;
        if count > limits.max_query_fields {
            return Err(QueryError::TooMany {
                count,
                limit: limits.max_query_fields,
            });
        }

        for field in input.split(options.separator) {
            if field.is_empty() {
                if options.strict {
                    return Err(QueryError::EmptyField);
                }
                continue;
            }

            let (name, value) = match field.split_once('=') {
                Some(pair) => pair,
                None if options.strict => {
                    return Err(QueryError::MissingEquals {
                        field: field.to_string(),
                    });
                }
                None if options.keep_blank_values => (field, ""),
                None => continue,
            };

            if value.is_empty() && !options.keep_blank_values {
                continue;
            }

            query.append(&form_decode(name), &form_decode(value));
        }

        Ok(query)
    }

    /// 値を追加
    pub fn append(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value.to_string()),
            None => self
                .fields
                .push((name.to_string(), vec![value.to_string()])),
        }
    }

    /// 最初の値を取得
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// すべての値を取得
    pub fn get_all(&self, name: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// 名前が存在するか
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// 名前の一覧 (最初に現れた順)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, value)` をすべて返す
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().flat_map(|(n, values)| {
            values.iter().map(move |v| (n.as_str(), v.as_str()))
        })
    }

    /// 名前の数
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 最初の値を真偽値として取得
    ///
    /// `t` `true` `yes` `1` `on` は true、`f` `false` `no` `0` `off` は false、
    /// `n` `none` `null` と値がない場合は `None` になります。大文字小文字は区別しません。
    pub fn as_bool(&self, name: &str) -> Result<Option<bool>, QueryError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        match value.to_ascii_lowercase().as_str() {
            "t" | "true" | "yes" | "1" | "on" => Ok(Some(true)),
            "f" | "false" | "no" | "0" | "off" => Ok(Some(false)),
            "n" | "none" | "null" => Ok(None),
            _ => Err(invalid_value(name, value)),
        }
    }

    /// 最初の値を整数として取得
    pub fn as_int(&self, name: &str) -> Result<Option<i64>, QueryError> {
        self.get(name)
            .map(|value| {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| invalid_value(name, value))
            })
            .transpose()
    }

    /// 最初の値を浮動小数点数として取得
    pub fn as_float(&self, name: &str) -> Result<Option<f64>, QueryError> {
        self.get(name)
            .map(|value| {
                value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| invalid_value(name, value))
            })
            .transpose()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.pairs().enumerate() {
            if i > 0 {
                write!(f, "&")?;
            }
            write!(f, "{}={}", form_encode(name), form_encode(value))?;
        }
        Ok(())
    }
}

fn invalid_value(name: &str, value: &str) -> QueryError {
    QueryError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

/// `+` を空白に戻してからパーセントデコード
fn form_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => result.push(b' '),
            b'%' => {
                let decoded = bytes
                    .get(i + 1..i + 3)
                    .and_then(|hex| Some((from_hex_char(hex[0])? << 4) | from_hex_char(hex[1])?));
                match decoded {
                    Some(b) => {
                        result.push(b);
                        i += 3;
                        continue;
                    }
                    None => result.push(b'%'),
                }
            }
            b => result.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&result).into_owned()
}

fn form_encode(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'*') {
            result.push(byte as char);
        } else if byte == b' ' {
            result.push('+');
        } else {
            result.push('%');
            result.push(to_hex_char(byte >> 4));
            result.push(to_hex_char(byte & 0x0F));
        }
    }
    result
}

fn to_hex_char(nibble: u8) -> char {
    char::from_digit(nibble as u32, 16)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('0')
}

fn from_hex_char(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> QueryOptions {
        QueryOptions {
            strict: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse() {
        let query = Query::parse("a=1&b=2&a=3").unwrap();
        assert_eq!(query.len(), 2);
        assert_eq!(query.get("a"), Some("1"));
        assert_eq!(query.get_all("a"), &["1", "3"]);
        assert_eq!(query.get("b"), Some("2"));
        assert_eq!(query.get("c"), None);
        assert!(query.get_all("c").is_empty());
        assert_eq!(query.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(Query::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_decode() {
        let query = Query::parse("q=hello+world&j=%E6%97%A5%E6%9C%AC&p=100%25").unwrap();
        assert_eq!(query.get("q"), Some("hello world"));
        assert_eq!(query.get("j"), Some("日本"));
        assert_eq!(query.get("p"), Some("100%"));
    }

    #[test]
    fn test_decode_invalid_escape_kept() {
        let query = Query::parse("a=%zz&b=%4&c=%").unwrap();
        assert_eq!(query.get("a"), Some("%zz"));
        assert_eq!(query.get("b"), Some("%4"));
        assert_eq!(query.get("c"), Some("%"));
    }

    #[test]
    fn test_decode_invalid_utf8_replaced() {
        let query = Query::parse("a=%FF").unwrap();
        assert_eq!(query.get("a"), Some("\u{FFFD}"));
    }

    #[test]
    fn test_strict() {
        assert_eq!(Query::parse("a=1&&b=2"), Err(QueryError::EmptyField));
        assert_eq!(
            Query::parse("a=1&flag"),
            Err(QueryError::MissingEquals {
                field: "flag".to_string()
            })
        );
    }

    #[test]
    fn test_lenient() {
        let limits = HeaderLimits::default();
        let query = Query::parse_with_options("a=1&&flag&b=", &lenient(), &limits).unwrap();
        assert_eq!(query.get("a"), Some("1"));
        assert_eq!(query.get("flag"), Some(""));
        assert_eq!(query.get("b"), Some(""));

        let options = QueryOptions {
            keep_blank_values: false,
            ..lenient()
        };
        let query = Query::parse_with_options("a=1&&flag&b=", &options, &limits).unwrap();
        assert_eq!(query.len(), 1);
        assert!(!query.contains("flag"));
        assert!(!query.contains("b"));
    }

    #[test]
    fn test_separator() {
        let options = QueryOptions {
            separator: ';',
            ..Default::default()
        };
        let query =
            Query::parse_with_options("a=1;b=2&3", &options, &HeaderLimits::default()).unwrap();
        assert_eq!(query.get("b"), Some("2&3"));
    }

    #[test]
    fn test_limits() {
        let limits = HeaderLimits {
            max_query_fields: 2,
            ..Default::default()
        };
        let options = QueryOptions::default();
        assert!(Query::parse_with_options("a=1&b=2", &options, &limits).is_ok());
        assert_eq!(
            Query::parse_with_options("a=1&b=2&c=3", &options, &limits),
            Err(QueryError::TooMany { count: 3, limit: 2 })
        );
    }

    #[test]
    fn test_as_bool() {
        let query =
            Query::parse("a=t&b=TRUE&c=yes&d=1&e=On&f=f&g=No&h=0&i=off&j=null&k=N&l=maybe").unwrap();
        for name in ["a", "b", "c", "d", "e"] {
            assert_eq!(query.as_bool(name).unwrap(), Some(true), "{name}");
        }
        for name in ["f", "g", "h", "i"] {
            assert_eq!(query.as_bool(name).unwrap(), Some(false), "{name}");
        }
        assert_eq!(query.as_bool("j").unwrap(), None);
        assert_eq!(query.as_bool("k").unwrap(), None);
        assert_eq!(query.as_bool("missing").unwrap(), None);
        assert!(matches!(
            query.as_bool("l"),
            Err(QueryError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_as_number() {
        let query = Query::parse("i=-42&f=2.5&x=abc").unwrap();
        assert_eq!(query.as_int("i").unwrap(), Some(-42));
        assert_eq!(query.as_float("f").unwrap(), Some(2.5));
        assert_eq!(query.as_int("missing").unwrap(), None);
        assert!(query.as_int("f").is_err());
        assert!(query.as_float("x").is_err());
    }

    #[test]
    fn test_display() {
        let mut query = Query::default();
        query.append("name", "hello world");
        query.append("tag", "a&b");
        query.append("tag", "日");
        assert_eq!(
            query.to_string(),
            "name=hello+world&tag=a%26b&tag=%E6%97%A5"
        );
        assert_eq!(Query::parse(&query.to_string()).unwrap(), query);
    }
}
