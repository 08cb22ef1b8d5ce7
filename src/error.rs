//! Error types and HTTP status classification for GitLab API operations.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Query parameters whose values never appear in error messages.
const SENSITIVE_PARAMS: &[&str] = &["private_token", "password", "access_token"];

/// Classification of a failed HTTP exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 404.
    NotFound,
    /// 403 that is neither a rate limit nor a login lockout.
    Forbidden,
    /// 403 whose message mentions a rate limit.
    TooManyRequests,
    /// 403 whose message mentions login attempts.
    TooManyLoginAttempts,
    /// 415.
    UnsupportedMediaType,
    /// 422.
    UnprocessableEntity,
    /// Any other 4xx.
    ClientError,
    /// Any 5xx.
    ServerError,
}

impl ErrorKind {
    /// Map a status code (and, for 403, the body message) to a kind.
    ///
    /// Returns `None` for anything outside 400..=599.
    pub fn from_status(status: u16, message: Option<&str>) -> Option<Self> {
        let kind = match status {
            404 => Self::NotFound,
            403 => {
                let message = message.unwrap_or_default().to_lowercase();
                if message.contains("rate limit") {
                    Self::TooManyRequests
                } else if message.contains("login attempts") {
                    Self::TooManyLoginAttempts
                } else {
                    Self::Forbidden
                }
            }
            415 => Self::UnsupportedMediaType,
            422 => Self::UnprocessableEntity,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => return None,
        };
        Some(kind)
    }
}

/// A classified API failure.
///
/// Built once per failing exchange and never retried. The message always
/// reads `"<VERB> <url>: <status> - <summary>"`, followed by an error
/// summary block when the body carried structured `errors`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    status: StatusCode,
    method: Method,
    url: String,
    message: String,
    errors: Vec<Value>,
    documentation_url: Option<String>,
    body: Value,
}

impl ApiError {
    /// Classify a response. Returns `None` when the status is not an error.
    pub fn from_response(method: &Method, url: &Url, status: StatusCode, body: &Value) -> Option<Self> {
        let object = body.as_object();
        let message_field = object.and_then(|o| o.get("message")).map(display_value);
        let error_field = object.and_then(|o| o.get("error")).map(display_value);

        let match_text = message_field
            .clone()
            .or_else(|| body.as_str().map(ToOwned::to_owned));
        let kind = ErrorKind::from_status(status.as_u16(), match_text.as_deref())?;

        let raw_errors: &[Value] = object
            .and_then(|o| o.get("errors"))
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);
        let errors = raw_errors.to_vec();

        let summary = match (&message_field, &error_field) {
            (Some(message), _) => message.clone(),
            (None, Some(error)) => format!("Error: {error}"),
            (None, None) => status.canonical_reason().unwrap_or("Unknown Error").to_string(),
        };

        let url = redact_url(url);
        let mut message = format!("{} {}: {} - {}", method, url, status.as_u16(), summary);
        if message_field.is_some() && !raw_errors.is_empty() {
            message.push_str("\nError summary:\n");
            message.push_str(&error_summary(raw_errors));
        }

        let documentation_url = object
            .and_then(|o| o.get("documentation_url"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);

        Some(Self {
            kind,
            status,
            method: method.clone(),
            url,
            message,
            errors,
            documentation_url,
            body: body.clone(),
        })
    }

    /// The classification.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The HTTP status of the failed exchange.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URL with credentials redacted.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The full human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The `errors` entries exactly as the server sent them.
    ///
    /// Entries are usually objects of diagnostic fields, but strings and
    /// other values are kept too.
    pub fn errors(&self) -> &[Value] {
        &self.errors
    }

    /// The `documentation_url` field of the body, if any.
    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation_url.as_deref()
    }

    /// The decoded response body.
    pub fn body(&self) -> &Value {
        &self.body
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn error_summary(errors: &[Value]) -> String {
    let mut lines = Vec::new();
    for entry in errors {
        match entry {
            Value::Object(fields) => {
                lines.extend(fields.iter().map(|(k, v)| format!("  {k}: {}", display_value(v))));
            }
            other => lines.push(format!("  {}", display_value(other))),
        }
    }
    lines.join("\n")
}

fn redact_url(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if SENSITIVE_PARAMS.contains(&k.as_ref()) {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Errors that can occur during GitLab API operations.
#[derive(Debug, Error)]
pub enum FoxkitError {
    /// The server answered with a 4xx/5xx status.
    #[error(transparent)]
    Api(Box<ApiError>),

    /// A resource identifier could not be turned into an API path.
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Configuration could not be turned into a working client.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl From<ApiError> for FoxkitError {
    fn from(err: ApiError) -> Self {
        Self::Api(Box::new(err))
    }
}

impl FoxkitError {
    /// The classified API error, if this failure came from an HTTP status.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// The classification, if this failure came from an HTTP status.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.api_error().map(ApiError::kind)
    }

    /// True when the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }
}

/// Result type alias for GitLab operations.
pub type Result<T> = core::result::Result<T, FoxkitError>;

/// Turns an expected 404 into `Ok(None)`.
///
/// ```no_run
/// use foxkit::{Client, Found, ProjectRef};
///
/// # async fn example(client: &Client) -> foxkit::Result<()> {
/// match client.project(&ProjectRef::Id(42), Default::default()).await.found()? {
///     Some(project) => println!("{project}"),
///     None => println!("no such project"),
/// }
/// # Ok(())
/// # }
/// ```
pub trait Found<T> {
    /// `Ok(Some(value))` on success, `Ok(None)` on NotFound, `Err` otherwise.
    fn found(self) -> Result<Option<T>>;
}

impl<T> Found<T> for Result<T> {
    fn found(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify(status: u16, body: Value) -> Option<ApiError> {
        let url = Url::parse("https://gitlab.example.com/api/v3/projects/1").unwrap();
        ApiError::from_response(
            &Method::GET,
            &url,
            StatusCode::from_u16(status).unwrap(),
            &body,
        )
    }

    #[test]
    fn test_success_and_redirect_statuses_are_not_errors() {
        for status in [200, 201, 204, 301, 304] {
            assert!(classify(status, Value::Null).is_none(), "status {status}");
        }
    }

    #[test]
    fn test_status_table() {
        let cases = [
            (404, ErrorKind::NotFound),
            (403, ErrorKind::Forbidden),
            (415, ErrorKind::UnsupportedMediaType),
            (422, ErrorKind::UnprocessableEntity),
            (400, ErrorKind::ClientError),
            (401, ErrorKind::ClientError),
            (409, ErrorKind::ClientError),
            (500, ErrorKind::ServerError),
            (502, ErrorKind::ServerError),
            (599, ErrorKind::ServerError),
        ];
        for (status, kind) in cases {
            assert_eq!(classify(status, Value::Null).unwrap().kind(), kind, "status {status}");
        }
    }

    #[test]
    fn test_403_rate_limit_and_login_attempts() {
        let err = classify(403, json!({"message": "API rate limit exceeded"})).unwrap();
        assert_eq!(err.kind(), ErrorKind::TooManyRequests);

        let err = classify(
            403,
            json!({"message": "Maximum number of login attempts exceeded"}),
        )
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::TooManyLoginAttempts);

        let err = classify(403, Value::Null).unwrap();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_validation_failed_message() {
        let err = classify(
            422,
            json!({
                "message": "Validation Failed",
                "errors": [{"resource": "Issue", "field": "title", "code": "missing_field"}]
            }),
        )
        .unwrap();

        let message = err.to_string();
        assert!(message.starts_with("GET https://gitlab.example.com/api/v3/projects/1: "));
        assert!(message.contains("422 - Validation Failed"));
        assert!(message.contains("resource: Issue"));
        assert!(message.contains("field: title"));
        assert!(message.contains("code: missing_field"));
        assert_eq!(err.errors()[0]["resource"], "Issue");

        // Lines follow the key order of the entry
        let resource = message.find("resource: Issue").unwrap();
        let field = message.find("field: title").unwrap();
        let code = message.find("code: missing_field").unwrap();
        assert!(resource < field && field < code);
    }

    #[test]
    fn test_summary_falls_back_to_error_field_then_status_phrase() {
        let err = classify(401, json!({"error": "invalid_token"})).unwrap();
        assert!(err.message().ends_with("401 - Error: invalid_token"));

        let err = classify(404, Value::Null).unwrap();
        assert!(err.message().ends_with("404 - Not Found"));
    }

    #[test]
    fn test_bare_array_body_has_no_fields() {
        let err = classify(500, json!(["boom"])).unwrap();
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert!(err.errors().is_empty());
        assert!(err.documentation_url().is_none());
        assert!(err.message().ends_with("500 - Internal Server Error"));
    }

    #[test]
    fn test_documentation_url_is_kept_separately() {
        let err = classify(
            404,
            json!({"message": "Not Found", "documentation_url": "https://docs.example.com/api"}),
        )
        .unwrap();
        assert_eq!(err.documentation_url(), Some("https://docs.example.com/api"));
        assert!(!err.message().contains("docs.example.com"));
    }

    #[test]
    fn test_errors_without_message_do_not_append_summary() {
        let err = classify(400, json!({"errors": [{"field": "name"}]})).unwrap();
        assert!(!err.message().contains("Error summary"));
        assert_eq!(err.errors().len(), 1);
    }

    #[test]
    fn test_non_object_errors_are_kept() {
        let err = classify(
            422,
            json!({"message": "Validation Failed", "errors": ["name is taken", {"field": "path"}]}),
        )
        .unwrap();
        assert_eq!(err.errors(), &[json!("name is taken"), json!({"field": "path"})]);
        assert!(err.message().contains("name is taken"));
    }

    #[test]
    fn test_url_credentials_are_redacted() {
        let url =
            Url::parse("https://gitlab.example.com/api/v3/user?private_token=sekrit&page=2").unwrap();
        let err =
            ApiError::from_response(&Method::GET, &url, StatusCode::UNAUTHORIZED, &Value::Null)
                .unwrap();
        assert!(!err.message().contains("sekrit"));
        assert!(err.url().contains("private_token=REDACTED"));
        assert!(err.url().contains("page=2"));
    }

    #[test]
    fn test_found_converts_only_not_found() {
        let not_found: Result<u32> = Err(classify(404, Value::Null).unwrap().into());
        assert!(not_found.found().unwrap().is_none());

        let ok: Result<u32> = Ok(7);
        assert_eq!(ok.found().unwrap(), Some(7));

        let forbidden: Result<u32> = Err(classify(403, Value::Null).unwrap().into());
        let err = forbidden.found().unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Forbidden));
    }
}
