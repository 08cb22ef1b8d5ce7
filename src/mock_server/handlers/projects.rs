//! Project and repository endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{authorize, not_found, paginated, PageQuery};
use crate::mock_server::state::MockState;

/// GET /projects/{id}
///
/// `id` is numeric or a `namespace%2Fpath` slug; axum decodes the latter.
pub async fn get_project(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.find_project(&id) {
        Some(project) => (StatusCode::OK, Json(project.clone())).into_response(),
        None => not_found("Project"),
    }
}

/// GET /projects/{id}/repository/tags
pub async fn list_tags(
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

    match state.find_project(&id) {
        Some(project) => paginated(state.tags_for(project.id), &query, &uri),
        None => not_found("Project"),
    }
}
