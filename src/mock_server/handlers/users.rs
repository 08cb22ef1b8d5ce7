//! User endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{authorize, not_found, paginated, PageQuery};
use crate::mock_server::state::MockState;
use crate::{User, UserUpdateParams};

/// Query parameters for listing users.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ListUsersQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let users: Vec<User> = state
        .list_users(query.search.as_deref())
        .into_iter()
        .cloned()
        .collect();
    let page = PageQuery {
        page: query.page,
        per_page: query.per_page,
    };
    paginated(&users, &page, &uri)
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.find_user(&id) {
        Some(user) => (StatusCode::OK, Json(user.clone())).into_response(),
        None => not_found("User"),
    }
}

/// GET /user
pub async fn get_current_user(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.get_current_user() {
        Some(user) => (StatusCode::OK, Json(user.clone())).into_response(),
        None => super::message(StatusCode::UNAUTHORIZED, "401 Unauthorized"),
    }
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(params): Json<UserUpdateParams>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.update_user(id, params) {
        Some(user) => (StatusCode::OK, Json(user.clone())).into_response(),
        None => not_found("User"),
    }
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    if state.delete_user(id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("User")
    }
}
