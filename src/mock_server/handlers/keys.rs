//! SSH key endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{authorize, message, not_found, paginated, PageQuery};
use crate::mock_server::state::MockState;
use crate::SshKey;

fn owned_keys(state: &MockState, user_id: u64) -> Vec<SshKey> {
    state.keys_for(user_id).into_iter().cloned().collect()
}

/// GET /user/keys
pub async fn list_current_user_keys(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.current_user {
        Some(id) => paginated(&owned_keys(&state, id), &query, &uri),
        None => message(StatusCode::UNAUTHORIZED, "401 Unauthorized"),
    }
}

/// GET /users/{id}/keys
pub async fn list_user_keys(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.find_user(&id) {
        Some(user) => paginated(&owned_keys(&state, user.id), &query, &uri),
        None => not_found("User"),
    }
}

/// GET /user/keys/{id}
pub async fn get_key(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.get_key(id) {
        Some(key) => (StatusCode::OK, Json(key.clone())).into_response(),
        None => not_found("Key"),
    }
}
