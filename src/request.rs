//! Request options and their translation into a concrete HTTP request.

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{FoxkitError, Result};

/// Option keys lifted into headers, with the header they become.
pub const CONVENIENCE_HEADERS: &[(&str, &str)] =
    &[("accept", "Accept"), ("content_type", "Content-Type")];

/// Raw per-call options.
///
/// A flat map of fields plus three reserved keys: `query` (a map of query
/// parameters), `headers` (a map of headers) and the convenience header
/// keys `accept` and `content_type`. For GET and HEAD the remaining fields
/// become query parameters; for other verbs they form the JSON body.
///
/// # Example
///
/// ```
/// use foxkit::RequestOptions;
///
/// let options = RequestOptions::new()
///     .field("title", "Fix the build")
///     .query("sudo", 5)
///     .accept("text/plain");
/// assert_eq!(options.get("title").unwrap(), "Fix the build");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions(Map<String, Value>);

impl From<Map<String, Value>> for RequestOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl RequestOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from a JSON object (`null` is treated as empty).
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(FoxkitError::InvalidConfig(format!(
                "request options must be an object, got {other}"
            ))),
        }
    }

    /// Options from any serializable struct of fields.
    pub fn from_serialize<T: Serialize + ?Sized>(fields: &T) -> Result<Self> {
        Self::from_value(serde_json::to_value(fields)?)
    }

    /// Set a body (or, for GET/HEAD, query) field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set an explicit query parameter.
    #[must_use]
    pub fn query(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.nested("query", key.into(), value.into())
    }

    /// Set a request header.
    #[must_use]
    pub fn header(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.nested("headers", key.into(), Value::String(value.into()))
    }

    /// Override the `Accept` header.
    #[must_use]
    pub fn accept(self, media_type: impl Into<String>) -> Self {
        self.field("accept", media_type.into())
    }

    /// Override the `Content-Type` header.
    #[must_use]
    pub fn content_type(self, media_type: impl Into<String>) -> Self {
        self.field("content_type", media_type.into())
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when no key is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    fn nested(mut self, section: &str, key: String, value: Value) -> Self {
        let entry = self
            .0
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(map) = entry {
            map.insert(key, value);
        }
        self
    }
}

/// A request with options lifted into query, headers and body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the api endpoint, or an absolute URL.
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// Extra headers; these override the client defaults.
    pub headers: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
}

impl RequestSpec {
    /// Split raw options into query, headers and body for `method`.
    pub fn build(method: Method, path: &str, options: RequestOptions) -> Self {
        let mut fields = options.into_map();

        let mut headers: Vec<(String, String)> = take_map(&mut fields, "headers")
            .into_iter()
            .filter_map(|(k, v)| scalar(&v).map(|v| (header_name(&k), v)))
            .collect();
        for (key, header) in CONVENIENCE_HEADERS {
            if let Some(value) = fields.remove(*key).as_ref().and_then(scalar) {
                upsert(&mut headers, header, value);
            }
        }

        let explicit_query = take_map(&mut fields, "query");

        let mut spec = Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers,
            body: None,
        };

        if spec.method == Method::GET || spec.method == Method::HEAD {
            for (key, value) in fields.into_iter().chain(explicit_query) {
                spec.set_query(&key, &value);
            }
        } else {
            for (key, value) in explicit_query {
                spec.set_query(&key, &value);
            }
            if !fields.is_empty() {
                spec.body = Some(Value::Object(fields));
            }
        }

        spec
    }

    /// Current value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a query parameter only if it is not already present.
    pub fn query_default(&mut self, key: &str, value: impl ToString) {
        if self.query_value(key).is_none() {
            self.query.push((key.to_string(), value.to_string()));
        }
    }

    fn set_query(&mut self, key: &str, value: &Value) {
        self.query.retain(|(k, _)| k != key && *k != format!("{key}[]"));
        match value {
            Value::Array(items) => {
                let name = format!("{key}[]");
                self.query
                    .extend(items.iter().filter_map(scalar).map(|v| (name.clone(), v)));
            }
            other => {
                if let Some(v) = scalar(other) {
                    self.query.push((key.to_string(), v));
                }
            }
        }
    }
}

/// Prefix `path` with `api/<version>/` unless it already carries an api prefix.
pub fn with_api_prefix(path: &str, api_version: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.starts_with("api/") {
        path.to_string()
    } else {
        format!("api/{api_version}/{path}")
    }
}

fn take_map(fields: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match fields.remove(key) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `content_type` becomes `Content-Type`.
fn header_name(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn upsert(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_fields_become_query() {
        let options = RequestOptions::new()
            .field("state", "opened")
            .field("per_page", 20)
            .query("sort", "desc");
        let spec = RequestSpec::build(Method::GET, "/projects", options);

        assert_eq!(spec.query_value("state"), Some("opened"));
        assert_eq!(spec.query_value("per_page"), Some("20"));
        assert_eq!(spec.query_value("sort"), Some("desc"));
        assert!(spec.body.is_none());
    }

    #[test]
    fn test_explicit_query_wins_on_get() {
        let options = RequestOptions::new().field("page", 1).query("page", 3);
        let spec = RequestSpec::build(Method::GET, "/users", options);
        assert_eq!(spec.query, vec![("page".to_string(), "3".to_string())]);
    }

    #[test]
    fn test_post_fields_become_body() {
        let options = RequestOptions::new()
            .field("title", "hello")
            .field("code", "puts 1")
            .query("sudo", "root");
        let spec = RequestSpec::build(Method::POST, "/projects/1/snippets", options);

        assert_eq!(spec.body, Some(json!({"title": "hello", "code": "puts 1"})));
        assert_eq!(spec.query_value("sudo"), Some("root"));
    }

    #[test]
    fn test_convenience_headers_are_lifted() {
        let options = RequestOptions::new()
            .accept("text/plain")
            .content_type("application/x-www-form-urlencoded")
            .header("x_custom_thing", "1")
            .header("accept", "application/xml");
        let spec = RequestSpec::build(Method::POST, "/session", options);

        assert!(spec.body.is_none());
        assert!(spec
            .headers
            .contains(&("Accept".to_string(), "text/plain".to_string())));
        assert!(!spec
            .headers
            .contains(&("Accept".to_string(), "application/xml".to_string())));
        assert!(spec.headers.contains(&(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string()
        )));
        assert!(spec
            .headers
            .contains(&("X-Custom-Thing".to_string(), "1".to_string())));
    }

    #[test]
    fn test_array_query_values() {
        let options = RequestOptions::new().field("labels", json!(["bug", "ui"]));
        let spec = RequestSpec::build(Method::GET, "/issues", options);
        assert_eq!(
            spec.query,
            vec![
                ("labels[]".to_string(), "bug".to_string()),
                ("labels[]".to_string(), "ui".to_string())
            ]
        );
    }

    #[test]
    fn test_query_default_does_not_override() {
        let mut spec = RequestSpec::build(Method::GET, "/users", RequestOptions::new().field("per_page", 5));
        spec.query_default("per_page", 100);
        assert_eq!(spec.query_value("per_page"), Some("5"));

        let mut spec = RequestSpec::build(Method::GET, "/users", RequestOptions::new());
        spec.query_default("per_page", 100);
        assert_eq!(spec.query_value("per_page"), Some("100"));
    }

    #[test]
    fn test_api_prefix() {
        assert_eq!(with_api_prefix("/projects/1", "v3"), "api/v3/projects/1");
        assert_eq!(with_api_prefix("projects/1", "v4"), "api/v4/projects/1");
        assert_eq!(with_api_prefix("api/v3/projects/1", "v3"), "api/v3/projects/1");
        assert_eq!(with_api_prefix("/api/v3/user", "v3"), "api/v3/user");
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(RequestOptions::from_value(json!(null)).unwrap().is_empty());
        assert!(RequestOptions::from_value(json!([1, 2])).is_err());
        let options = RequestOptions::from_value(json!({"query": {"page": 2}})).unwrap();
        let spec = RequestSpec::build(Method::DELETE, "/users/1", options);
        assert_eq!(spec.query_value("page"), Some("2"));
        assert!(spec.body.is_none());
    }
}
