//! Single-option checks. Each returns the normalized value or the
//! operator-facing rejection; empty input is "absent", never "zero".
use crate::domain::Attachment;
use crate::error::ValidationError;

/// Schemes accepted for plain HTTP targets (probes, proxy URLs).
pub const HTTP_URL_SCHEMES: [&str; 2] = ["http://", "https://"];
/// Schemes accepted in addition for bidirectional targets.
pub const WEBSOCKET_URL_SCHEMES: [&str; 2] = ["ws://", "wss://"];

const SCHEME_DELIMITER: &str = "://";

pub const STATUS_CODE_MIN: i64 = 100;
pub const STATUS_CODE_MAX: i64 = 599;
pub const DEFAULT_STATUS_CODE: u16 = 200;

/// Lower bound applied to an integer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `>= 0`
    NonNegative,
    /// `>= 1`
    AtLeastOne,
    /// `> 0`; same range as `AtLeastOne`, kept apart for the message.
    StrictlyPositive,
}

impl Bound {
    const fn minimum(self) -> i64 {
        match self {
            Bound::NonNegative => 0,
            Bound::AtLeastOne | Bound::StrictlyPositive => 1,
        }
    }
}

#[must_use]
pub fn matches_http_url(url: &str) -> bool {
    HTTP_URL_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

#[must_use]
pub fn matches_websocket_url(url: &str) -> bool {
    WEBSOCKET_URL_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

fn parse_integer(field: &'static str, raw: &str) -> Result<Option<i64>, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_err| ValidationError::NotAnInteger {
            field,
            value: value.to_owned(),
        })
}

/// Integer option with a lower bound; `violation` is returned below it.
///
/// # Errors
///
/// Returns `NotAnInteger` for non-numeric input and `violation` when the
/// value is below the bound.
pub fn bounded_integer(
    field: &'static str,
    raw: &str,
    bound: Bound,
    violation: ValidationError,
) -> Result<Option<u64>, ValidationError> {
    let Some(value) = parse_integer(field, raw)? else {
        return Ok(None);
    };
    if value < bound.minimum() {
        return Err(violation);
    }
    u64::try_from(value).map(Some).map_err(|_err| violation)
}

/// Status code in `[100, 599]`; empty means "server default (200)".
///
/// # Errors
///
/// Returns `NotAnInteger` or `StatusCodeOutOfBounds`.
pub fn status_code(raw: &str) -> Result<Option<u16>, ValidationError> {
    let Some(value) = parse_integer("status code", raw)? else {
        return Ok(None);
    };
    if !(STATUS_CODE_MIN..=STATUS_CODE_MAX).contains(&value) {
        return Err(ValidationError::StatusCodeOutOfBounds { value });
    }
    u16::try_from(value)
        .map(Some)
        .map_err(|_err| ValidationError::StatusCodeOutOfBounds { value })
}

/// URL accepted by the outbound-request and probe commands.
///
/// # Errors
///
/// Returns `EmptyUrl` or `UrlSchemeNotAllowed`.
pub fn http_or_websocket_url(raw: &str) -> Result<&str, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    if !matches_http_url(raw) && !matches_websocket_url(raw) {
        return Err(ValidationError::UrlSchemeNotAllowed {
            url: raw.to_owned(),
        });
    }
    Ok(raw)
}

/// Proxy URL; always plain HTTP whatever the target scheme.
///
/// # Errors
///
/// Returns `EmptyProxyUrl` or `ProxyUrlSchemeNotAllowed`.
pub fn proxy_url(raw: &str) -> Result<&str, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptyProxyUrl);
    }
    if !matches_http_url(raw) {
        return Err(ValidationError::ProxyUrlSchemeNotAllowed {
            url: raw.to_owned(),
        });
    }
    Ok(raw)
}

/// Host for the raw-socket probe: non-empty and scheme-less.
///
/// # Errors
///
/// Returns `EmptyTcpHost` or `TcpHostHasScheme`.
pub fn tcp_host(raw: &str) -> Result<&str, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptyTcpHost);
    }
    if raw.contains(SCHEME_DELIMITER) {
        return Err(ValidationError::TcpHostHasScheme {
            host: raw.to_owned(),
        });
    }
    Ok(raw)
}

/// Exactly one selected file.
///
/// # Errors
///
/// Returns `NoFileSelected` or `TooManyFiles`.
pub fn single_file(files: &[Attachment]) -> Result<&Attachment, ValidationError> {
    match files {
        [] => Err(ValidationError::NoFileSelected),
        [file] => Ok(file),
        _ => Err(ValidationError::TooManyFiles { count: files.len() }),
    }
}

/// Client certificate and key travel together or not at all.
#[must_use]
pub fn client_cert_pair<'opts>(
    cert: Option<&'opts Attachment>,
    key: Option<&'opts Attachment>,
) -> Option<(&'opts Attachment, &'opts Attachment)> {
    cert.zip(key)
}

/// Non-empty text after trimming, forwarded verbatim to the server.
#[must_use]
pub fn trimmed(raw: &str) -> Option<&str> {
    let value = raw.trim();
    if value.is_empty() { None } else { Some(value) }
}
