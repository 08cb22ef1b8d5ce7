//! Mock GitLab API server for E2E testing.
//!
//! An in-memory server that simulates the GitLab v3 API, including `Link`
//! header pagination and `PRIVATE-TOKEN` checks. Unlike wiremock, which
//! mocks per-test at the HTTP level, this server keeps state across
//! requests, so workflows (update then read back, delete then 404) can be
//! tested end to end.
//!
//! # Example
//!
//! ```ignore
//! use foxkit::mock_server::MockServer;
//! use foxkit::{Client, ClientConfig, Get, Options, User, UserRef};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = Client::from_config(ClientConfig::from_options(Options {
//!         api_endpoint: Some(server.url().to_string()),
//!         ..Default::default()
//!     }))
//!     .unwrap();
//!
//!     // Server comes with default fixtures
//!     let me = User::get(&client, UserRef::Current).await.unwrap();
//!     assert_eq!(me.username, "john_smith");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;
