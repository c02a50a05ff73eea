//! Range リクエストヘッダー (RFC 9110 Section 14)
//!
//! ## 概要
//!
//! Range ヘッダーのパース、リソースサイズに対する範囲の解決、
//! 重なり合う範囲の統合、Content-Range ヘッダーを提供します。
//!
//! 範囲指定は 3 種類あります:
//! - `first-last`: 両端を含む範囲
//! - `first-`: first から末尾まで
//! - `-length`: 末尾から length バイト
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::range::{ContentRange, Range};
//!
//! let range = Range::parse("bytes=0-4,90-99,5-75,100-199,101-102").unwrap();
//! assert_eq!(range.unit(), "bytes");
//!
//! let resolved = range.resolve(150, true);
//! assert_eq!(resolved.values(), &[(0, 75), (90, 149)]);
//!
//! let cr = ContentRange::new_bytes(0, 499, Some(1000));
//! assert_eq!(cr.to_string(), "bytes 0-499/1000");
//! ```

use core::fmt;

use crate::limits::HeaderLimits;

/// Range パースエラー
///
/// いずれもクライアントエラー (400) です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// `=` がない、または単位が空
    MissingUnit,
    /// 不正な範囲指定
    Malformed,
    /// 開始位置も終了位置もない
    MissingOffsets,
    /// ヘッダー値が長すぎる
    TooLarge { size: usize, limit: usize },
    /// 範囲指定が多すぎる
    TooMany { count: usize, limit: usize },
}

impl RangeError {
    /// 対応する HTTP ステータスコード
    pub fn status_code(&self) -> u16 {
        400
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::MissingUnit => write!(f, "Missing range unit, e.g. 'bytes='"),
            RangeError::Malformed => write!(f, "Range is malformed."),
            RangeError::MissingOffsets => write!(f, "Range offsets are missing."),
            RangeError::TooLarge { size, limit } => {
                write!(f, "Range header too large: {} > {}", size, limit)
            }
            RangeError::TooMany { count, limit } => {
                write!(f, "too many ranges: {} > {}", count, limit)
            }
        }
    }
}

impl std::error::Error for RangeError {}

/// 範囲指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// 開始位置から終了位置まで (両端含む)
    /// bytes=0-499 → Range { start: 0, end: 499 }
    Range { start: u64, end: u64 },
    /// 開始位置から末尾まで
    /// bytes=500- → FromStart { start: 500 }
    FromStart { start: u64 },
    /// 末尾から n バイト
    /// bytes=-500 → Suffix { length: 500 }
    Suffix { length: u64 },
}

impl RangeSpec {
    /// `(first, last)` 形式
    ///
    /// 末尾までは `last = -1`、末尾からの指定は `first` が負の値になります。
    pub fn as_pair(&self) -> (i64, i64) {
        match *self {
            RangeSpec::Range { start, end } => (start as i64, end as i64),
            RangeSpec::FromStart { start } => (start as i64, -1),
            RangeSpec::Suffix { length } => (-(length as i64), -1),
        }
    }

    /// リソースサイズに対する実際のバイト範囲 (両端含む)
    ///
    /// 末尾からの指定がリソースより長い場合は先頭から、
    /// 終了位置がリソースを超える場合は末尾までに切り詰めます。
    /// 開始位置がリソースの外側にある場合やリソースが空の場合は `None` です。
    pub fn resolve(&self, size: u64) -> Option<(u64, u64)> {
        if size == 0 {
            return None;
        }
        let last = size - 1;
        match *self {
            RangeSpec::Range { start, end } => {
                if start > last {
                    return None;
                }
                Some((start, end.min(last)))
            }
            RangeSpec::FromStart { start } => {
                if start > last {
                    return None;
                }
                Some((start, last))
            }
            RangeSpec::Suffix { length } => Some((size.saturating_sub(length), last)),
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeSpec::Range { start, end } => write!(f, "{}-{}", start, end),
            RangeSpec::FromStart { start } => write!(f, "{}-", start),
            RangeSpec::Suffix { length } => write!(f, "-{}", length),
        }
    }
}

/// Range ヘッダー (RFC 9110 Section 14.2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    /// 範囲単位 (通常は "bytes")
    unit: String,
    /// 範囲指定のリスト (ヘッダーに現れた順)
    specs: Vec<RangeSpec>,
}

impl Range {
    /// 単位と範囲指定から作成
    pub fn new(unit: &str, specs: Vec<RangeSpec>) -> Self {
        Range {
            unit: unit.to_string(),
            specs,
        }
    }

    /// Range ヘッダーをパース
    pub fn parse(input: &str) -> Result<Self, RangeError> {
        Self::parse_with_limits(input, &HeaderLimits::default())
    }

    /// 制限を指定して Range ヘッダーをパース
    pub fn parse_with_limits(input: &str, limits: &HeaderLimits) -> Result<Self, RangeError> {
        limits
            .check_value_size(input)
            .map_err(|(size, limit)| RangeError::TooLarge { size, limit })?;

        let (unit, set) = input.split_once('=').ok_or(RangeError::MissingUnit)?;
        let unit = unit.trim();
        if unit.is_empty() {
            return Err(RangeError::MissingUnit);
        }

        let count = set.split(',').count();
        if count > limits.max_range_specs {
            return Err(RangeError::TooMany {
                count,
                limit: limits.max_range_specs,
            });
        }

        let specs = set
            .split(',')
            .map(parse_range_spec)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Range {
            unit: unit.to_string(),
            specs,
        })
    }

    /// 単位を取得
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// バイト範囲かどうか
    pub fn is_bytes(&self) -> bool {
        self.unit.eq_ignore_ascii_case("bytes")
    }

    /// 範囲指定のリストを取得
    pub fn specs(&self) -> &[RangeSpec] {
        &self.specs
    }

    /// `(first, last)` 形式の範囲指定のリスト
    pub fn values(&self) -> Vec<(i64, i64)> {
        self.specs.iter().map(RangeSpec::as_pair).collect()
    }

    /// リソースサイズに対して範囲を解決
    ///
    /// `merge` が false の場合はヘッダーの順序を保ちます。
    /// true の場合は重なる範囲と隣接する範囲を統合し、開始位置順に並べます。
    ///
    /// 満たせない範囲指定 (開始位置がリソースの外側にあるもの、
    /// サイズ 0 のリソースに対するもの) は取り除きます。
    /// そのため結果の要素数は範囲指定の数より少なくなることがあります。
    pub fn resolve(&self, size: u64, merge: bool) -> ResolvedRanges {
        let values = self.specs.iter().filter_map(|spec| spec.resolve(size));
        let values = if merge {
            consolidate_ranges(values).collect()
        } else {
            values.collect()
        };

        ResolvedRanges {
            unit: self.unit.clone(),
            size,
            values,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.unit)?;
        let specs: Vec<String> = self.specs.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", specs.join(","))
    }
}

/// 範囲指定をパース
fn parse_range_spec(s: &str) -> Result<RangeSpec, RangeError> {
    let (first, last) = s.trim().split_once('-').ok_or(RangeError::Malformed)?;
    let first = first.trim();
    let last = last.trim();

    match (first.is_empty(), last.is_empty()) {
        (false, false) => {
            let start = parse_offset(first)?;
            let end = parse_offset(last)?;
            if end < start {
                return Err(RangeError::Malformed);
            }
            Ok(RangeSpec::Range { start, end })
        }
        (false, true) => Ok(RangeSpec::FromStart {
            start: parse_offset(first)?,
        }),
        (true, false) => {
            let length = parse_offset(last)?;
            if length == 0 {
                return Err(RangeError::Malformed);
            }
            Ok(RangeSpec::Suffix { length })
        }
        (true, true) => Err(RangeError::MissingOffsets),
    }
}

/// 10 進数のオフセット (i64::MAX 以下)
fn parse_offset(s: &str) -> Result<u64, RangeError> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::Malformed);
    }
    s.parse::<i64>()
        .map(|v| v as u64)
        .map_err(|_| RangeError::Malformed)
}

/// 解決済みの範囲 (両端含む)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRanges {
    unit: String,
    size: u64,
    values: Vec<(u64, u64)>,
}

impl ResolvedRanges {
    /// 単位を取得
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// 解決に使ったリソースサイズ
    pub fn size(&self) -> u64 {
        self.size
    }

    /// `(first, last)` のリスト
    pub fn values(&self) -> &[(u64, u64)] {
        &self.values
    }

    /// 範囲の数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 満たせる範囲が 1 つもないか (416 を返す)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 範囲同士が重なっていないか
    ///
    /// 統合していない範囲をそのままレスポンスに使う前に確認します。
    pub fn is_disjoint(&self) -> bool {
        let mut sorted = self.values.clone();
        sorted.sort_unstable();
        sorted.windows(2).all(|w| w[1].0 > w[0].1)
    }

    /// 範囲の合計バイト数
    pub fn total_length(&self) -> u64 {
        self.values
            .iter()
            .map(|(first, last)| last - first + 1)
            .sum()
    }

    /// 重なる範囲と隣接する範囲を統合
    pub fn consolidate(&self) -> ResolvedRanges {
        ResolvedRanges {
            unit: self.unit.clone(),
            size: self.size,
            values: consolidate_ranges(self.values.iter().copied()).collect(),
        }
    }

    /// 各範囲の Content-Range
    pub fn content_ranges(&self) -> impl Iterator<Item = ContentRange> + '_ {
        self.values.iter().map(move |&(first, last)| ContentRange {
            unit: self.unit.clone(),
            range: Some((first, last)),
            complete_length: Some(self.size),
        })
    }
}

/// 両端を含む区間の列を、重なりも隣接もない最小の区間列に統合
///
/// 結果は開始位置の昇順です。
pub fn consolidate_ranges<I>(ranges: I) -> Consolidate
where
    I: IntoIterator<Item = (u64, u64)>,
{
    let mut sorted: Vec<(u64, u64)> = ranges.into_iter().collect();
    sorted.sort_unstable();
    let mut ranges = sorted.into_iter();
    let current = ranges.next();
    Consolidate { ranges, current }
}

/// [`consolidate_ranges`] のイテレータ
#[derive(Debug)]
pub struct Consolidate {
    ranges: std::vec::IntoIter<(u64, u64)>,
    current: Option<(u64, u64)>,
}

impl Iterator for Consolidate {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        let (start, mut stop) = self.current.take()?;
        for (next_start, next_stop) in self.ranges.by_ref() {
            if next_start > stop.saturating_add(1) {
                self.current = Some((next_start, next_stop));
                return Some((start, stop));
            }
            stop = stop.max(next_stop);
        }
        Some((start, stop))
    }
}

/// Content-Range ヘッダー (RFC 9110 Section 14.4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRange {
    unit: String,
    range: Option<(u64, u64)>,
    complete_length: Option<u64>,
}

impl ContentRange {
    /// Content-Range ヘッダーをパース
    pub fn parse(input: &str) -> Result<Self, RangeError> {
        let (unit, rest) = input
            .trim()
            .split_once(' ')
            .ok_or(RangeError::MissingUnit)?;
        let (range, length) = rest.trim().split_once('/').ok_or(RangeError::Malformed)?;

        let complete_length = match length {
            "*" => None,
            length => Some(parse_offset(length)?),
        };

        let range = match range {
            "*" => None,
            range => {
                let (first, last) = range.split_once('-').ok_or(RangeError::Malformed)?;
                let first = parse_offset(first)?;
                let last = parse_offset(last)?;
                if first > last {
                    return Err(RangeError::Malformed);
                }
                Some((first, last))
            }
        };

        Ok(ContentRange {
            unit: unit.to_string(),
            range,
            complete_length,
        })
    }

    /// 新しい Content-Range を作成 (bytes)
    pub fn new_bytes(first: u64, last: u64, complete_length: Option<u64>) -> Self {
        ContentRange {
            unit: "bytes".to_string(),
            range: Some((first, last)),
            complete_length,
        }
    }

    /// 範囲が満たせない場合の Content-Range (`bytes */size`)
    pub fn unsatisfied(unit: &str, complete_length: u64) -> Self {
        ContentRange {
            unit: unit.to_string(),
            range: None,
            complete_length: Some(complete_length),
        }
    }

    /// 単位を取得
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// `(first, last)` を取得
    pub fn range(&self) -> Option<(u64, u64)> {
        self.range
    }

    /// 完全な長さを取得
    pub fn complete_length(&self) -> Option<u64> {
        self.complete_length
    }

    /// 範囲の長さを取得
    pub fn length(&self) -> Option<u64> {
        self.range.map(|(first, last)| last - first + 1)
    }

    /// 範囲が満たせないかどうか
    pub fn is_unsatisfied(&self) -> bool {
        self.range.is_none()
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some((first, last)) => write!(f, "{} {}-{}/", self.unit, first, last)?,
            None => write!(f, "{} */", self.unit)?,
        }
        match self.complete_length {
            Some(len) => write!(f, "{}", len),
            None => write!(f, "*"),
        }
    }
}
