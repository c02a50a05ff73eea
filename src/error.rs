use std::fmt;

use crate::accept::AcceptError;
use crate::auth::AuthError;
use crate::conditional::ConditionalError;
use crate::cookie::CookieError;
use crate::date::DateError;
use crate::etag::ETagError;
use crate::host::HostError;
use crate::language::LanguageError;
use crate::params::ParamsError;
use crate::quality::QualityError;
use crate::query::QueryError;
use crate::range::RangeError;

/// ヘッダー値パースエラー
///
/// 各モジュールのエラーをまとめたものです。
/// どのバリアントもクライアントから受け取った値の文法エラーを表します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// パラメーター付きの値
    Params(ParamsError),
    /// 品質値
    Quality(QualityError),
    /// Accept
    Accept(AcceptError),
    /// Accept-Language
    Language(LanguageError),
    /// ETag / If-Match / If-None-Match
    ETag(ETagError),
    /// 条件付きリクエストヘッダー
    Conditional(ConditionalError),
    /// Range / Content-Range
    Range(RangeError),
    /// Host
    Host(HostError),
    /// HTTP-date
    Date(DateError),
    /// Authorization
    Auth(AuthError),
    /// Cookie
    Cookie(CookieError),
    /// クエリ文字列
    Query(QueryError),
}

impl Error {
    /// 対応する HTTP ステータスコード
    pub fn status_code(&self) -> u16 {
        400
    }

    /// クライアントに返す理由文
    pub fn reason(&self) -> String {
        match self {
            Error::Params(e) => e.to_string(),
            Error::Quality(e) => e.to_string(),
            Error::Accept(e) => e.to_string(),
            Error::Language(e) => e.to_string(),
            Error::ETag(e) => e.to_string(),
            Error::Conditional(e) => e.to_string(),
            Error::Range(e) => e.to_string(),
            Error::Host(e) => e.to_string(),
            Error::Date(e) => e.to_string(),
            Error::Auth(e) => e.to_string(),
            Error::Cookie(e) => e.to_string(),
            Error::Query(e) => e.to_string(),
        }
    }

    fn subject(&self) -> &'static str {
        match self {
            Error::Params(_) => "parameterized value",
            Error::Quality(_) => "quality value",
            Error::Accept(_) => "Accept header",
            Error::Language(_) => "Accept-Language header",
            Error::ETag(_) => "ETag header",
            Error::Conditional(_) => "conditional header",
            Error::Range(_) => "Range header",
            Error::Host(_) => "Host header",
            Error::Date(_) => "HTTP-date",
            Error::Auth(_) => "Authorization header",
            Error::Cookie(_) => "Cookie header",
            Error::Query(_) => "query string",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.subject(), self.reason())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Params(e) => Some(e),
            Error::Quality(e) => Some(e),
            Error::Accept(e) => Some(e),
            Error::Language(e) => Some(e),
            Error::ETag(e) => Some(e),
            Error::Conditional(e) => Some(e),
            Error::Range(e) => Some(e),
            Error::Host(e) => Some(e),
            Error::Date(e) => Some(e),
            Error::Auth(e) => Some(e),
            Error::Cookie(e) => Some(e),
            Error::Query(e) => Some(e),
        }
    }
}

impl From<ParamsError> for Error {
    fn from(e: ParamsError) -> Self {
        Error::Params(e)
    }
}

impl From<QualityError> for Error {
    fn from(e: QualityError) -> Self {
        Error::Quality(e)
    }
}

impl From<AcceptError> for Error {
    fn from(e: AcceptError) -> Self {
        Error::Accept(e)
    }
}

impl From<LanguageError> for Error {
    fn from(e: LanguageError) -> Self {
        Error::Language(e)
    }
}

impl From<ETagError> for Error {
    fn from(e: ETagError) -> Self {
        Error::ETag(e)
    }
}

impl From<ConditionalError> for Error {
    fn from(e: ConditionalError) -> Self {
        Error::Conditional(e)
    }
}

impl From<RangeError> for Error {
    fn from(e: RangeError) -> Self {
        Error::Range(e)
    }
}

impl From<HostError> for Error {
    fn from(e: HostError) -> Self {
        Error::Host(e)
    }
}

impl From<DateError> for Error {
    fn from(e: DateError) -> Self {
        Error::Date(e)
    }
}

impl From<AuthError> for Error {
    fn from(e: AuthError) -> Self {
        Error::Auth(e)
    }
}

impl From<CookieError> for Error {
    fn from(e: CookieError) -> Self {
        Error::Cookie(e)
    }
}

impl From<QueryError> for Error {
    fn from(e: QueryError) -> Self {
        Error::Query(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;

    fn parse_range(input: &str) -> Result<Range, Error> {
        Ok(Range::parse(input)?)
    }

    #[test]
    fn test_from_range_error() {
        let err = parse_range("bytes=a-b").unwrap_err();
        assert_eq!(err, Error::Range(RangeError::Malformed));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.reason(), "Range is malformed.");
        assert_eq!(err.to_string(), "invalid Range header: Range is malformed.");
    }

    #[test]
    fn test_source() {
        use std::error::Error as _;

        let err = Error::from(HostError::InvalidPort);
        assert_eq!(
            err.source().map(|e| e.to_string()),
            Some("invalid Host header port".to_string())
        );
    }
}
