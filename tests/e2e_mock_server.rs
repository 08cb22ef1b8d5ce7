//! E2E tests using the mock GitLab server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use foxkit::mock_server::{Fixtures, MockServer, MockState};
use foxkit::{
    get_tags, Client, ClientConfig, Foxkit, Get, KeyListQuery, List, Options, ProjectRef,
    RequestOptions, SshKey, Update, User, UserRef, UserUpdateParams,
};

fn client_for(server: &MockServer, options: Options) -> Client {
    Client::from_config(ClientConfig::from_options(Options {
        api_endpoint: Some(server.url().to_string()),
        ..options
    }))
    .unwrap()
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    let result = reqwest::get(format!("{}health", url)).await;
    assert!(result.is_err());
}

// =============================================================================
// Pagination Workflows
// =============================================================================

#[tokio::test]
async fn test_auto_paginate_follows_server_links() {
    let server = MockServer::start().await;
    let client = client_for(
        &server,
        Options {
            auto_paginate: Some(true),
            per_page: Some(2),
            ..Default::default()
        },
    );

    let users = client.all_users(RequestOptions::new()).await.unwrap();
    assert_eq!(users.as_array().unwrap().len(), 5);

    let last = client.last_response().unwrap();
    assert_eq!(last.header("x-page"), Some("3"));
    assert!(last.rel("next").is_none());
    assert!(last.rel("prev").is_some());

    server.shutdown().await;
}

#[tokio::test]
async fn test_page_stream_with_filters() {
    let server = MockServer::start().await;
    let client = client_for(&server, Options::default());

    let stream = client.page_stream(
        "users",
        RequestOptions::new().field("search", "smith").field("per_page", 1),
    );
    let smiths: Vec<User> = stream.collect().await.unwrap();

    let names: Vec<_> = smiths.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["john_smith", "jack_smith"]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_list_all_users_and_keys() {
    let server = MockServer::start().await;
    let client = client_for(&server, Options::default());

    let users = User::list_all(&client, &Default::default()).await.unwrap();
    assert_eq!(users.len(), 5);
    assert!(users.iter().any(|u| !u.is_active()));

    let mine = SshKey::list_all(&client, &KeyListQuery::default()).await.unwrap();
    assert_eq!(mine.len(), 2);

    let jacks = SshKey::list_all(
        &client,
        &KeyListQuery {
            user: UserRef::Id(2),
        },
    )
    .await
    .unwrap();
    assert_eq!(jacks.len(), 1);

    server.shutdown().await;
}

// =============================================================================
// Stateful Workflows
// =============================================================================

#[tokio::test]
async fn test_update_then_read_back() {
    let server = MockServer::start().await;
    let client = client_for(&server, Options::default());

    let params = UserUpdateParams {
        bio: Some("Rustacean".to_string()),
        ..Default::default()
    };
    let updated = User::update(&client, 3, params).await.unwrap();
    assert_eq!(updated.bio.as_deref(), Some("Rustacean"));

    let fetched = User::get(&client, UserRef::Login("mary_jones".to_string()))
        .await
        .unwrap();
    assert_eq!(fetched.bio.as_deref(), Some("Rustacean"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let server = MockServer::start().await;
    let client = client_for(&server, Options::default());

    assert!(client.delete_user(2, RequestOptions::new()).await.unwrap());
    assert!(!client.delete_user(2, RequestOptions::new()).await.unwrap());

    let err = User::get(&client, UserRef::Id(2)).await.unwrap_err();
    assert!(err.is_not_found());

    // Keys go with their owner
    let keys = client.user_keys(&UserRef::Id(1), RequestOptions::new()).await.unwrap();
    assert_eq!(keys.as_array().unwrap().len(), 2);

    server.shutdown().await;
}

#[tokio::test]
async fn test_state_changes_are_visible() {
    let server = MockServer::start_empty().await;
    let client = client_for(&server, Options::default());

    let project = ProjectRef::Id(10);
    assert!(!client.project_exists(&project, RequestOptions::new()).await.unwrap());

    {
        let state = server.state();
        let mut state = state.write().await;
        state.projects.insert(10, Fixtures::project(10, "gitlab-org", "gitlab-ce"));
        state.tags.insert(10, vec![Fixtures::tag("v8.0.0", "abc123")]);
    }

    assert!(client.project_exists(&project, RequestOptions::new()).await.unwrap());
    let slug: ProjectRef = "gitlab-org/gitlab-ce".parse().unwrap();
    let tags = get_tags(&client, &slug).await.unwrap();
    assert_eq!(tags[0].name, "v8.0.0");

    server.shutdown().await;
}

// =============================================================================
// Authentication Workflows
// =============================================================================

#[tokio::test]
async fn test_token_is_required_when_configured() {
    let state = MockState::new()
        .with_user(Fixtures::user(1, "john_smith"))
        .with_current_user(1)
        .with_required_token("dd34asd13as");
    let server = MockServer::with_state(state).await;

    let anonymous = client_for(&server, Options::default());
    let err = User::get(&anonymous, UserRef::Current).await.unwrap_err();
    assert_eq!(err.api_error().unwrap().status().as_u16(), 401);

    let authed = client_for(
        &server,
        Options {
            private_token: Some("dd34asd13as".to_string()),
            ..Default::default()
        },
    );
    let me = User::get(&authed, UserRef::Current).await.unwrap();
    assert_eq!(me.username, "john_smith");

    server.shutdown().await;
}

#[tokio::test]
async fn test_foxkit_facade_reuses_client() {
    let server = MockServer::start().await;

    let mut foxkit = Foxkit::with_env(Options::default());
    foxkit.configure(|defaults| {
        defaults.api_endpoint = Some(server.url().to_string());
        defaults.private_token = Some("dd34asd13as".to_string());
    });

    let first = foxkit.client().unwrap();
    let second = foxkit.client().unwrap();
    assert!(first.is_token_authenticated());

    first.get("user", RequestOptions::new()).await.unwrap();
    // Clones share the last-response slot
    assert!(second.last_response().is_some());

    server.shutdown().await;
}
