//! Salesforce error-response handling.

use std::sync::LazyLock;

use crate::error::{Error, ErrorKind, Result};

/// Maximum length of any server-supplied text carried inside an error.
pub const MAX_ERROR_TEXT: usize = 500;

static TOKEN_PATTERN: LazyLock<Option<regex_lite::Regex>> =
    LazyLock::new(|| regex_lite::Regex::new(r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+").ok());

static SESSION_PATTERN: LazyLock<Option<regex_lite::Regex>> =
    LazyLock::new(|| regex_lite::Regex::new(r"sid=[A-Za-z0-9]{20,}").ok());

/// Extension trait turning non-success Salesforce responses into errors.
pub trait ResponseExt: Sized {
    /// Pass 2xx responses through, convert anything else into an [`Error`].
    fn check_salesforce_error(self) -> impl std::future::Future<Output = Result<Self>> + Send;
}

impl ResponseExt for reqwest::Response {
    async fn check_salesforce_error(self) -> Result<Self> {
        let status = self.status();
        if status.is_success() {
            return Ok(self);
        }

        let body = self.text().await.unwrap_or_default();
        Err(parse_error_response(status.as_u16(), &body))
    }
}

/// Parse an error response body and convert it to the matching error kind.
pub fn parse_error_response(status: u16, body: &str) -> Error {
    // Array format: [{"errorCode": "...", "message": "..."}]
    if let Ok(errors) = serde_json::from_str::<Vec<SalesforceErrorResponse>>(body) {
        if let Some(err) = errors.into_iter().next() {
            return Error::new(ErrorKind::SalesforceApi {
                error_code: err.error_code,
                message: sanitize_error_message(&err.message),
                fields: err.fields.unwrap_or_default(),
            });
        }
    }

    if let Ok(err) = serde_json::from_str::<SalesforceErrorResponse>(body) {
        return Error::new(ErrorKind::SalesforceApi {
            error_code: err.error_code,
            message: sanitize_error_message(&err.message),
            fields: err.fields.unwrap_or_default(),
        });
    }

    let sanitized = sanitize_error_message(body);
    let kind = match status {
        401 => ErrorKind::Authentication(sanitized),
        403 => ErrorKind::Authorization(sanitized),
        404 => ErrorKind::NotFound(sanitized),
        _ => ErrorKind::Http {
            status,
            message: sanitized,
        },
    };

    Error::new(kind)
}

/// Sanitize an error message to prevent exposing sensitive data.
///
/// Access tokens and `sid=` session ids are redacted and the result is
/// capped at [`MAX_ERROR_TEXT`] characters.
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = message.to_string();

    if let Some(pattern) = TOKEN_PATTERN.as_ref() {
        sanitized = pattern
            .replace_all(&sanitized, "[REDACTED_TOKEN]")
            .into_owned();
    }
    if let Some(pattern) = SESSION_PATTERN.as_ref() {
        sanitized = pattern
            .replace_all(&sanitized, "sid=[REDACTED]")
            .into_owned();
    }

    if sanitized.chars().count() > MAX_ERROR_TEXT {
        let mut truncated = excerpt(&sanitized, MAX_ERROR_TEXT);
        truncated.push_str("...[truncated]");
        return truncated;
    }

    sanitized
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Salesforce API error response format.
#[derive(Debug, serde::Deserialize)]
struct SalesforceErrorResponse {
    #[serde(alias = "errorCode")]
    error_code: String,
    message: String,
    fields: Option<Vec<String>>,
}
