//! HTTP request handlers for the mock server.

pub mod keys;
pub mod projects;
pub mod users;

pub use keys::*;
pub use projects::*;
pub use users::*;

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::state::MockState;

/// Items per page when the request does not say.
const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page the server hands out.
const MAX_PER_PAGE: u32 = 100;

/// Query parameters common to every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// `401` unless the request carries the token the state requires.
pub(crate) fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let token = headers
        .get(crate::PRIVATE_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if state.accepts(token) {
        Ok(())
    } else {
        Err(message(StatusCode::UNAUTHORIZED, "401 Unauthorized"))
    }
}

/// A GitLab-style `{"message": ...}` error body.
pub(crate) fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(serde_json::json!({ "message": text }))).into_response()
}

pub(crate) fn not_found(what: &str) -> Response {
    message(StatusCode::NOT_FOUND, &format!("404 {what} Not Found"))
}

/// Slice `items` into the requested page and attach GitLab's pagination
/// headers (`Link` plus the `X-*` family).
pub(crate) fn paginated<T: Serialize>(items: &[T], query: &PageQuery, uri: &Uri) -> Response {
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let page = query.page.unwrap_or(1).max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page as usize).max(1);

    let start = ((page - 1) as usize).saturating_mul(per_page as usize);
    let slice = items
        .get(start..)
        .map(|rest| &rest[..rest.len().min(per_page as usize)])
        .unwrap_or_default();

    let mut response = (StatusCode::OK, Json(slice)).into_response();
    let headers = response.headers_mut();

    let link_to = |target: usize| page_link(uri, target, per_page);
    let mut links = Vec::new();
    if (page as usize) < total_pages {
        links.push(format!("<{}>; rel=\"next\"", link_to(page as usize + 1)));
    }
    if page > 1 {
        links.push(format!("<{}>; rel=\"prev\"", link_to(page as usize - 1)));
    }
    links.push(format!("<{}>; rel=\"first\"", link_to(1)));
    links.push(format!("<{}>; rel=\"last\"", link_to(total_pages)));

    let next_page = if (page as usize) < total_pages {
        (page + 1).to_string()
    } else {
        String::new()
    };
    let prev_page = if page > 1 {
        (page - 1).to_string()
    } else {
        String::new()
    };

    for (name, value) in [
        ("link", links.join(", ")),
        ("x-total", total.to_string()),
        ("x-total-pages", total_pages.to_string()),
        ("x-per-page", per_page.to_string()),
        ("x-page", page.to_string()),
        ("x-next-page", next_page),
        ("x-prev-page", prev_page),
    ] {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }
    response
}

/// The request path with `page`/`per_page` replaced and other query
/// parameters kept.
fn page_link(uri: &Uri, page: usize, per_page: u32) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes()) {
        if key != "page" && key != "per_page" {
            query.append_pair(&key, &value);
        }
    }
    query.append_pair("page", &page.to_string());
    query.append_pair("per_page", &per_page.to_string());
    format!("{}?{}", uri.path(), query.finish())
}
