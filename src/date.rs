//! HTTP-date パース (RFC 9110 Section 5.6.7)
//!
//! ## 概要
//!
//! HTTP-date のパースと生成を提供します。値は常に UTC で保持します。
//!
//! パースできる形式:
//! - IMF-fixdate: `Sun, 06 Nov 1994 08:49:37 GMT`
//! - RFC 850: `Sunday, 06-Nov-94 08:49:37 GMT`
//! - ANSI C asctime: `Sun Nov  6 08:49:37 1994`
//! - RFC 2822: `6 Nov 1994 09:49 +0100` (曜日省略可、秒省略可、タイムゾーン付き)
//!
//! タイムゾーンのない日付は UTC として扱います。出力は常に IMF-fixdate です。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_negotiation::date::HttpDate;
//!
//! let date = HttpDate::parse("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
//! assert_eq!(date.year(), 1994);
//! assert_eq!(date.month(), 11);
//! assert_eq!(date.day(), 6);
//! assert_eq!(date.to_string(), "Sun, 06 Nov 1994 08:49:37 GMT");
//!
//! // UTC に変換される
//! let date = HttpDate::parse("Wed, 21 Oct 2015 07:28:00 +0200").unwrap();
//! assert_eq!(date.to_string(), "Wed, 21 Oct 2015 05:28:00 GMT");
//! ```

use core::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// HTTP-date パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// 空の日付
    Empty,
    /// 不正な形式
    InvalidFormat,
    /// 不正な曜日
    InvalidDayName,
    /// 不正な日
    InvalidDay,
    /// 不正な月
    InvalidMonth,
    /// 不正な年
    InvalidYear,
    /// 不正な時
    InvalidHour,
    /// 不正な分
    InvalidMinute,
    /// 不正な秒
    InvalidSecond,
    /// 不正なタイムゾーン
    InvalidTimeZone,
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::Empty => write!(f, "empty date"),
            DateError::InvalidFormat => write!(f, "invalid date format"),
            DateError::InvalidDayName => write!(f, "invalid day name"),
            DateError::InvalidDay => write!(f, "invalid day"),
            DateError::InvalidMonth => write!(f, "invalid month"),
            DateError::InvalidYear => write!(f, "invalid year"),
            DateError::InvalidHour => write!(f, "invalid hour"),
            DateError::InvalidMinute => write!(f, "invalid minute"),
            DateError::InvalidSecond => write!(f, "invalid second"),
            DateError::InvalidTimeZone => write!(f, "invalid time zone"),
        }
    }
}

impl std::error::Error for DateError {}

/// 曜日
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// 短い形式の曜日名を取得
    pub fn short_name(&self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sun",
            DayOfWeek::Monday => "Mon",
            DayOfWeek::Tuesday => "Tue",
            DayOfWeek::Wednesday => "Wed",
            DayOfWeek::Thursday => "Thu",
            DayOfWeek::Friday => "Fri",
            DayOfWeek::Saturday => "Sat",
        }
    }

    /// 曜日名からパース (大文字小文字を区別しない)
    fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sun" | "sunday" => Some(DayOfWeek::Sunday),
            "mon" | "monday" => Some(DayOfWeek::Monday),
            "tue" | "tuesday" => Some(DayOfWeek::Tuesday),
            "wed" | "wednesday" => Some(DayOfWeek::Wednesday),
            "thu" | "thursday" => Some(DayOfWeek::Thursday),
            "fri" | "friday" => Some(DayOfWeek::Friday),
            "sat" | "saturday" => Some(DayOfWeek::Saturday),
            _ => None,
        }
    }

    /// 1970-01-01 からの日数から求める
    fn from_days(days: i64) -> Self {
        match (days + 4).rem_euclid(7) {
            0 => DayOfWeek::Sunday,
            1 => DayOfWeek::Monday,
            2 => DayOfWeek::Tuesday,
            3 => DayOfWeek::Wednesday,
            4 => DayOfWeek::Thursday,
            5 => DayOfWeek::Friday,
            _ => DayOfWeek::Saturday,
        }
    }
}

/// UTC の日時
///
/// フィールド順 (年、月、日、時、分、秒) で比較できます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HttpDate {
    /// 年 (1-9999)
    year: u16,
    /// 月 (1-12)
    month: u8,
    /// 日 (1-31)
    day: u8,
    /// 時 (0-23)
    hour: u8,
    /// 分 (0-59)
    minute: u8,
    /// 秒 (0-60, 60はうるう秒)
    second: u8,
}

impl HttpDate {
    /// HTTP-date 文字列をパース
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DateError::Empty);
        }

        let rest = strip_day_name(strip_trailing_comments(input))?;

        let mut tokens: Vec<&str> = Vec::new();
        for (i, token) in rest.split_whitespace().enumerate() {
            // RFC 850: 06-Nov-94
            if i == 0 && token.matches('-').count() == 2 {
                tokens.extend(token.split('-'));
            } else {
                tokens.push(token);
            }
        }

        let (day, month, year, time, zone) = match tokens.as_slice() {
            // asctime: Nov  6 08:49:37 1994
            [month, day, time, year] if parse_month(month).is_ok() => {
                (*day, *month, *year, *time, None)
            }
            [day, month, year, time] => (*day, *month, *year, *time, None),
            [day, month, year, time, zone] => (*day, *month, *year, *time, Some(*zone)),
            _ => return Err(DateError::InvalidFormat),
        };

        let day = parse_number(day, 2).ok_or(DateError::InvalidDay)?;
        let month = parse_month(month)?;
        let year = parse_year(year)?;
        let (hour, minute, second) = parse_time(time)?;
        let offset = match zone {
            Some(zone) => parse_zone(zone)?,
            None => 0,
        };

        HttpDate::from_offset_datetime(year, month, day as u8, hour, minute, second, offset)
    }

    /// UTC の日時から作成
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, DateError> {
        if !(1..=9999).contains(&year) {
            return Err(DateError::InvalidYear);
        }
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidMonth);
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(DateError::InvalidDay);
        }
        if hour > 23 {
            return Err(DateError::InvalidHour);
        }
        if minute > 59 {
            return Err(DateError::InvalidMinute);
        }
        if second > 60 {
            return Err(DateError::InvalidSecond);
        }

        Ok(HttpDate {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// UTC からのオフセット (分) 付きの日時から作成し、UTC に変換
    ///
    /// 例えば CET+2 の 07:28 は `offset_minutes = 120` で 05:28 UTC になります。
    pub fn from_offset_datetime(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        offset_minutes: i32,
    ) -> Result<Self, DateError> {
        let local = HttpDate::new(year, month, day, hour, minute, second)?;
        if offset_minutes == 0 {
            return Ok(local);
        }
        HttpDate::from_unix_timestamp(local.unix_timestamp() - i64::from(offset_minutes) * 60)
    }

    /// Unix タイムスタンプ (秒) から作成
    pub fn from_unix_timestamp(timestamp: i64) -> Result<Self, DateError> {
        let days = timestamp.div_euclid(86_400);
        let secs = timestamp.rem_euclid(86_400);
        let (year, month, day) = civil_from_days(days);
        if !(1..=9999).contains(&year) {
            return Err(DateError::InvalidYear);
        }

        Ok(HttpDate {
            year: year as u16,
            month,
            day,
            hour: (secs / 3600) as u8,
            minute: (secs % 3600 / 60) as u8,
            second: (secs % 60) as u8,
        })
    }

    /// `SystemTime` から作成 (秒未満は切り捨て)
    pub fn from_system_time(time: SystemTime) -> Result<Self, DateError> {
        let timestamp = match time.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => {
                let d = e.duration();
                let secs = d.as_secs() as i64;
                if d.subsec_nanos() > 0 {
                    -secs - 1
                } else {
                    -secs
                }
            }
        };
        HttpDate::from_unix_timestamp(timestamp)
    }

    /// Unix タイムスタンプ (秒)
    pub fn unix_timestamp(&self) -> i64 {
        let days = days_from_civil(i64::from(self.year), self.month, self.day);
        days * 86_400
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// `SystemTime` に変換
    pub fn to_system_time(&self) -> SystemTime {
        let timestamp = self.unix_timestamp();
        if timestamp >= 0 {
            UNIX_EPOCH + Duration::from_secs(timestamp as u64)
        } else {
            UNIX_EPOCH - Duration::from_secs(timestamp.unsigned_abs())
        }
    }

    /// 曜日
    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from_days(days_from_civil(
            i64::from(self.year),
            self.month,
            self.day,
        ))
    }

    /// 年を取得
    pub fn year(&self) -> u16 {
        self.year
    }

    /// 月を取得 (1-12)
    pub fn month(&self) -> u8 {
        self.month
    }

    /// 日を取得 (1-31)
    pub fn day(&self) -> u8 {
        self.day
    }

    /// 時を取得 (0-23)
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// 分を取得 (0-59)
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// 秒を取得 (0-60)
    pub fn second(&self) -> u8 {
        self.second
    }
}

impl fmt::Display for HttpDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // IMF-fixdate 形式で出力
        write!(
            f,
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            self.day_of_week().short_name(),
            self.day,
            month_name(self.month),
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// HTTP-date をパースして UTC の日時を返す
pub fn parse_http_datetime(input: &str) -> Result<HttpDate, DateError> {
    HttpDate::parse(input)
}

/// IMF-fixdate 形式 (`%a, %d %b %Y %H:%M:%S GMT`) で出力
pub fn serialize_http_datetime(date: &HttpDate) -> String {
    date.to_string()
}

/// 先頭の曜日を取り除く
///
/// カンマがあればその前は曜日でなければならない。
/// カンマがなければ先頭の単語が曜日の場合だけ取り除く。
fn strip_day_name(input: &str) -> Result<&str, DateError> {
    if let Some((head, tail)) = input.split_once(',') {
        DayOfWeek::from_name(head.trim()).ok_or(DateError::InvalidDayName)?;
        return Ok(tail);
    }

    match input.split_once(char::is_whitespace) {
        Some((head, tail)) if DayOfWeek::from_name(head).is_some() => Ok(tail),
        _ => Ok(input),
    }
}

/// 末尾のコメントを取り除く (RFC 5322 CFWS)
///
/// `+0200 (CEST)` のようにゾーンの後ろに付くコメントだけを対象とします。
fn strip_trailing_comments(input: &str) -> &str {
    let mut input = input.trim_end();
    while input.ends_with(')') {
        let Some(open) = input.rfind('(') else {
            break;
        };
        input = input[..open].trim_end();
    }
    input
}

/// 最大 `max_digits` 桁の数字
fn parse_number(s: &str, max_digits: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_digits || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// 年をパース
///
/// 2 桁は RFC 9110 の規則で補正し、3 桁は 1900 を足す (RFC 2822 obs-year)。
fn parse_year(s: &str) -> Result<u16, DateError> {
    let year = parse_number(s, 4).ok_or(DateError::InvalidYear)? as u16;
    match s.len() {
        1 | 2 => Ok(interpret_two_digit_year(year)),
        3 => Ok(year + 1900),
        _ => Ok(year),
    }
}

/// 月名をパース (大文字小文字を区別しない)
fn parse_month(s: &str) -> Result<u8, DateError> {
    match s.to_ascii_lowercase().as_str() {
        "jan" => Ok(1),
        "feb" => Ok(2),
        "mar" => Ok(3),
        "apr" => Ok(4),
        "may" => Ok(5),
        "jun" => Ok(6),
        "jul" => Ok(7),
        "aug" => Ok(8),
        "sep" => Ok(9),
        "oct" => Ok(10),
        "nov" => Ok(11),
        "dec" => Ok(12),
        _ => Err(DateError::InvalidMonth),
    }
}

/// 月番号から月名を取得
fn month_name(month: u8) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

/// 時刻をパース (HH:MM[:SS])
fn parse_time(s: &str) -> Result<(u8, u8, u8), DateError> {
    let parts: Vec<&str> = s.split(':').collect();
    let (hour, minute, second) = match parts.as_slice() {
        [hour, minute] => (*hour, *minute, "0"),
        [hour, minute, second] => (*hour, *minute, *second),
        _ => return Err(DateError::InvalidFormat),
    };

    let hour = parse_number(hour, 2).ok_or(DateError::InvalidHour)?;
    let minute = parse_number(minute, 2).ok_or(DateError::InvalidMinute)?;
    let second = parse_number(second, 2).ok_or(DateError::InvalidSecond)?;

    if hour > 23 {
        return Err(DateError::InvalidHour);
    }
    if minute > 59 {
        return Err(DateError::InvalidMinute);
    }
    if second > 60 {
        return Err(DateError::InvalidSecond);
    }

    Ok((hour as u8, minute as u8, second as u8))
}

/// タイムゾーンをパースし、UTC からのオフセット (分) を返す
fn parse_zone(s: &str) -> Result<i32, DateError> {
    let offset = match s.to_ascii_uppercase().as_str() {
        "GMT" | "UT" | "UTC" | "Z" => 0,
        "EST" => -5 * 60,
        "EDT" => -4 * 60,
        "CST" => -6 * 60,
        "CDT" => -5 * 60,
        "MST" => -7 * 60,
        "MDT" => -6 * 60,
        "PST" => -8 * 60,
        "PDT" => -7 * 60,
        _ => {
            let (sign, digits) = match s.split_at_checked(1) {
                Some(("+", digits)) => (1, digits),
                Some(("-", digits)) => (-1, digits),
                _ => return Err(DateError::InvalidTimeZone),
            };
            if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DateError::InvalidTimeZone);
            }
            let hours = parse_number(&digits[..2], 2).ok_or(DateError::InvalidTimeZone)?;
            let minutes = parse_number(&digits[2..], 2).ok_or(DateError::InvalidTimeZone)?;
            if minutes > 59 {
                return Err(DateError::InvalidTimeZone);
            }
            sign * (hours * 60 + minutes) as i32
        }
    };
    Ok(offset)
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// 1970-01-01 からの日数 (proleptic Gregorian)
fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let month = i64::from(month);
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// 1970-01-01 からの日数を (年, 月, 日) に変換
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

/// 現在の年を取得
#[cfg(not(test))]
fn current_year() -> u16 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let (year, _, _) = civil_from_days(now.as_secs() as i64 / 86_400);
    year as u16
}

#[cfg(test)]
thread_local! {
    static CURRENT_YEAR_FOR_TEST: std::cell::Cell<u16> = const { std::cell::Cell::new(2026) };
}

#[cfg(test)]
fn current_year() -> u16 {
    CURRENT_YEAR_FOR_TEST.with(|y| y.get())
}

#[cfg(test)]
fn set_current_year_for_test(year: u16) {
    CURRENT_YEAR_FOR_TEST.with(|y| y.set(year));
}

/// 2 桁年を RFC 9110 準拠で解釈する
///
/// 50 年以上未来に見える年は、下 2 桁が同じ直近の過去の年とみなす。
fn interpret_two_digit_year(two_digit: u16) -> u16 {
    let current = current_year();
    let current_century = (current / 100) * 100;
    let candidate = current_century + two_digit;

    if candidate > current + 50 {
        candidate - 100
    } else {
        candidate
    }
}
