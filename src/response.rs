//! Decoded HTTP responses and `Link` header relations.

use std::collections::HashMap;

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE, LINK};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::Result;

/// One completed HTTP exchange, after decoding.
///
/// `body` is `Value::Null` for an empty body, the parsed document for JSON,
/// a `Value::String` for other UTF-8 text (raw files), and `Value::Null`
/// for binary content. The undecoded body is always kept in `raw`.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Decoded body.
    pub body: Value,
    /// `Link` relations by name, e.g. `next` or `last`.
    pub rels: HashMap<String, Url>,
    /// Method of the request that produced this response.
    pub method: Method,
    /// Final URL of the request.
    pub url: Url,
    /// Body bytes as received.
    pub raw: Bytes,
}

impl ResponseEnvelope {
    /// Build an envelope from raw parts.
    pub fn new(method: Method, url: Url, status: StatusCode, headers: HeaderMap, raw: Bytes) -> Self {
        let rels = headers
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| parse_link_header(value, &url))
            .collect();
        let body = decode_body(&headers, &raw);
        Self {
            status,
            headers,
            body,
            rels,
            method,
            url,
            raw,
        }
    }

    /// The URL of a named relation.
    pub fn rel(&self, name: &str) -> Option<&Url> {
        self.rels.get(name)
    }

    /// The `next` relation, if the server advertised one.
    pub fn next_url(&self) -> Option<&Url> {
        self.rel("next")
    }

    /// A header value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The body bytes, untouched by decoding. Use this for archives and blobs.
    pub fn bytes(&self) -> &Bytes {
        &self.raw
    }

    /// Deserialize the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

fn decode_body(headers: &HeaderMap, bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    let declared_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("json"));
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => value,
        Err(err) => {
            if declared_json {
                tracing::debug!(error = %err, "response declared JSON but did not parse");
            }
            std::str::from_utf8(bytes)
                .map_or(Value::Null, |text| Value::String(text.to_string()))
        }
    }
}

/// Parse an RFC 8288 `Link` header into `(rel, url)` pairs.
///
/// Relative targets resolve against `base`. A link with several
/// space-separated relation names yields one pair per name.
pub fn parse_link_header(header: &str, base: &Url) -> Vec<(String, Url)> {
    let mut links = Vec::new();
    for part in header.split(',') {
        let part = part.trim();
        let Some(rest) = part.strip_prefix('<') else {
            continue;
        };
        let Some((target, params)) = rest.split_once('>') else {
            continue;
        };
        let Ok(url) = base.join(target.trim()) else {
            continue;
        };
        for param in params.split(';') {
            let Some((key, value)) = param.trim().split_once('=') else {
                continue;
            };
            if !key.trim().eq_ignore_ascii_case("rel") {
                continue;
            }
            for rel in value.trim().trim_matches('"').split_whitespace() {
                links.push((rel.to_ascii_lowercase(), url.clone()));
            }
        }
    }
    links
}
