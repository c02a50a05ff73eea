//! パラメータ付きヘッダー値のパース
//!
//! ## 概要
//!
//! `value; key=value; key2="quoted value"` 形式のヘッダー値を、
//! 先頭の値とパラメータの順序付きマップに分解します。
//! Content-Type / Accept などの構造化ヘッダーはすべてこのパーサーの上に構築されています。
//!
//! - 先頭の値は前後の空白を除去し、小文字化します
//! - パラメータ名は小文字化します (同じ名前が複数ある場合は最後の値が有効)
//! - 引用符付きの値では `%22` を `"` に、`%0D%0A` を改行に戻します
//! - 文法に合わないパラメータは無視します (引用符が閉じていない場合のみエラー)
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::params::parse_header;
//!
//! let (value, params) = parse_header("Text/HTML; Charset=utf-8; title=\"a %22b%22\"").unwrap();
//! assert_eq!(value, "text/html");
//! assert_eq!(params.get("charset"), Some("utf-8"));
//! assert_eq!(params.get("title"), Some("a \"b\""));
//! ```

use core::fmt;

/// パラメータパースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// 引用符が閉じていない
    UnterminatedQuote,
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::UnterminatedQuote => write!(f, "unterminated quoted string"),
        }
    }
}

impl std::error::Error for ParamsError {}

/// パラメータの順序付きマップ
///
/// キーは常に小文字で保持します。挿入順を保持し、
/// 同じキーを再挿入した場合は位置を変えずに値だけを置き換えます。
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    /// 空のパラメータを作成
    pub fn new() -> Self {
        Parameters {
            entries: Vec::new(),
        }
    }

    /// パラメータを追加 (既存のキーは上書き)
    pub fn insert(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value.to_string();
        } else {
            self.entries.push((name, value.to_string()));
        }
    }

    /// パラメータを取得 (大文字小文字を区別しない)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// パラメータを取り除いて値を返す
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self
            .entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(pos).1)
    }

    /// キーが含まれるか
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// パラメータ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 挿入順のイテレータ
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// キー順にソートしたパラメータ
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut sorted: Vec<(&str, &str)> = self.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        sorted
    }
}

impl PartialEq for Parameters {
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Eq for Parameters {}

/// `;k=v` の連続としてキー順に出力
///
/// トークンとして表せない値は引用符で囲み、`"` と改行を
/// `%22` / `%0D%0A` に置き換えます。
impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.sorted() {
            if needs_quoting(value) {
                write!(f, ";{}=\"{}\"", name, escape_value(value))?;
            } else {
                write!(f, ";{}={}", name, value)?;
            }
        }
        Ok(())
    }
}

/// ヘッダー値を先頭の値とパラメータに分解
///
/// 最初の `;` で分割し、先頭の値は trim して小文字化します。
/// `;` がなければパラメータは空です。
pub fn parse_header(value: &str) -> Result<(String, Parameters), ParamsError> {
    match value.find(';') {
        Some(pos) => {
            let primary = value[..pos].trim().to_ascii_lowercase();
            let params = parse_parameters(&value[pos..])?;
            Ok((primary, params))
        }
        None => Ok((value.trim().to_ascii_lowercase(), Parameters::new())),
    }
}

/// `; key=value` の連続をパース
///
/// 入力は `;` から始まる部分を想定しています。
/// 各 `;` の位置で `key=token` または `key="quoted"` を試し、
/// 合わない場所は読み飛ばします。
pub fn parse_parameters(input: &str) -> Result<Parameters, ParamsError> {
    let mut params = Parameters::new();
    let mut pos = 0;

    while let Some(offset) = input[pos..].find(';') {
        let start = pos + offset + 1;
        match scan_parameter(input, start)? {
            Some((name, value, end)) => {
                params.insert(name, &value);
                pos = end;
            }
            None => pos = start,
        }
    }

    Ok(params)
}

/// `;` 直後から 1 つのパラメータを読み取る
///
/// 戻り値は (名前, 値, 読み終えた位置)
fn scan_parameter(input: &str, start: usize) -> Result<Option<(&str, String, usize)>, ParamsError> {
    let bytes = input.as_bytes();
    let mut i = start;

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    let name_start = i;
    while i < bytes.len() && is_token_char(bytes[i]) {
        i += 1;
    }
    if i == name_start || i >= bytes.len() || bytes[i] != b'=' {
        return Ok(None);
    }
    let name = &input[name_start..i];
    i += 1;

    if i < bytes.len() && bytes[i] == b'"' {
        let body_start = i + 1;
        let close = input[body_start..]
            .find('"')
            .ok_or(ParamsError::UnterminatedQuote)?;
        let raw = &input[body_start..body_start + close];
        return Ok(Some((name, unescape_value(raw), body_start + close + 1)));
    }

    let value_start = i;
    while i < bytes.len() && is_token_char(bytes[i]) {
        i += 1;
    }
    if i == value_start {
        return Ok(None);
    }

    Ok(Some((name, input[value_start..i].to_string(), i)))
}

/// 引用符内の転送用置換を戻す
fn unescape_value(raw: &str) -> String {
    raw.replace("%22", "\"").replace("%0D%0A", "\n")
}

/// 引用符内に書けるよう置換
fn escape_value(value: &str) -> String {
    value.replace('"', "%22").replace('\n', "%0D%0A")
}

/// 引用符の外側にある区切り文字で分割
///
/// 引用符で囲まれた区間の区切り文字は無視します。
pub(crate) fn split_unquoted(input: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quote = false;

    for (i, c) in input.char_indices() {
        if c == '"' {
            in_quote = !in_quote;
        } else if c == delimiter && !in_quote {
            parts.push(&input[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

/// 有効なトークンかどうか
pub(crate) fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_token_char)
}

/// トークン文字 (RFC 9110 Section 5.6.2)
pub(crate) fn is_token_char(b: u8) -> bool {
    matches!(b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'0'..=b'9' | b'A'..=b'Z' | b'^' | b'_' | b'`' | b'a'..=b'z' | b'|' | b'~'
    )
}

/// 引用符で囲む必要があるかどうか
fn needs_quoting(s: &str) -> bool {
    !is_token(s)
}
