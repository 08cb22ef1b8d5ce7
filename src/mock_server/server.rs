//! Mock GitLab API server.
//!
//! Provides an axum-based HTTP server that simulates the GitLab v3 API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock GitLab API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` as the client's `api_endpoint`.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}/", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new().with_current_user(scenario.current_user);

        for user in scenario.users {
            state = state.with_user(user);
        }
        for (owner, key) in scenario.keys {
            state = state.with_key(owner, key);
        }
        for project in scenario.projects {
            state = state.with_project(project);
        }
        for (project_id, tags) in scenario.tags {
            state = state.with_tags(project_id, tags);
        }

        state
    }

    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let api = Router::new()
            // User routes
            .route("/users", get(handlers::list_users))
            .route(
                "/users/:id",
                get(handlers::get_user)
                    .put(handlers::update_user)
                    .delete(handlers::delete_user),
            )
            .route("/user", get(handlers::get_current_user))
            // Key routes
            .route("/user/keys", get(handlers::list_current_user_keys))
            .route("/user/keys/:id", get(handlers::get_key))
            .route("/users/:id/keys", get(handlers::list_user_keys))
            // Project routes
            .route("/projects/:id", get(handlers::get_project))
            .route("/projects/:id/repository/tags", get(handlers::list_tags));

        Router::new()
            .nest("/api/v3", api)
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Client, ClientConfig, Get, List, Options, Project, ProjectRef, User, UserRef};

    fn client_for(server: &MockServer, token: Option<&str>) -> Client {
        Client::from_config(ClientConfig::from_options(Options {
            api_endpoint: Some(server.url().to_string()),
            private_token: token.map(str::to_string),
            ..Default::default()
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let response = reqwest::get(format!("{}health", server.url()))
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_router_paginates_without_network() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let router = MockServer::create_router(MockServer::default_state().shared());
        let response = router
            .oneshot(
                Request::get("/api/v3/users?per_page=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["x-total-pages"], "3");
        assert_eq!(response.headers()["x-next-page"], "2");
        let link = response.headers()["link"].to_str().unwrap();
        assert!(link.contains("</api/v3/users?page=2&per_page=2>; rel=\"next\""));
    }

    #[tokio::test]
    async fn test_get_current_user() {
        let server = MockServer::start().await;
        let client = client_for(&server, Some("test-token"));

        let me = User::get(&client, UserRef::Current).await.unwrap();
        assert_eq!(me.username, "john_smith");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_project_by_slug() {
        let server = MockServer::start().await;
        let client = client_for(&server, None);

        let project: ProjectRef = "diaspora/diaspora-client".parse().unwrap();
        let project = Project::get(&client, project).await.unwrap();
        assert_eq!(project.id, 4);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_users_follows_link_header() {
        let server = MockServer::start().await;
        let client = client_for(&server, None);

        let page = User::list_page(&client, &Default::default(), 1, 2).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, Some(5));
        assert!(page.has_more);

        let all = User::list_all(&client, &Default::default()).await.unwrap();
        assert_eq!(all.len(), 5);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_required_token() {
        let state = MockState::new()
            .with_user(Fixtures::user(1, "john_smith"))
            .with_required_token("secret");
        let server = MockServer::with_state(state).await;

        let anonymous = client_for(&server, None);
        let err = User::get(&anonymous, UserRef::Id(1)).await.unwrap_err();
        assert_eq!(err.api_error().unwrap().status().as_u16(), 401);

        let authed = client_for(&server, Some("secret"));
        assert!(User::get(&authed, UserRef::Id(1)).await.is_ok());

        server.shutdown().await;
    }
}
