//! Execution tests for the CLI update command.
//!
//! Uses wiremock to mock the GitLab API and test the typed `Update` path.

use foxkit::{Client, ClientConfig, Options, Update, User, UserUpdateParams};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::from_config(ClientConfig::from_options(Options {
        api_endpoint: Some(server.uri()),
        private_token: Some("admin-token".to_string()),
        ..Default::default()
    }))
    .unwrap()
}

#[tokio::test]
async fn test_update_user_returns_updated_entity() {
    let mock_server = MockServer::start().await;

    // Only the fields that were set go over the wire
    let expected_params = serde_json::json!({
        "name": "Jack Smith Jr.",
        "projects_limit": 20
    });

    let updated_user = serde_json::json!({
        "id": 2,
        "username": "jack_smith",
        "name": "Jack Smith Jr.",
        "projects_limit": 20
    });

    Mock::given(method("PUT"))
        .and(path("/api/v3/users/2"))
        .and(header("PRIVATE-TOKEN", "admin-token"))
        .and(body_json(&expected_params))
        .respond_with(ResponseTemplate::new(200).set_body_json(&updated_user))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let params = UserUpdateParams {
        name: Some("Jack Smith Jr.".to_string()),
        projects_limit: Some(20),
        ..Default::default()
    };

    let user = User::update(&client, 2, params).await.unwrap();

    assert_eq!(user.name.as_deref(), Some("Jack Smith Jr."));
    assert_eq!(user.projects_limit, Some(20));
}

#[tokio::test]
async fn test_update_user_as_non_admin_is_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v3/users/2"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({"message": "403 Forbidden"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = User::update(&client, 2, UserUpdateParams::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(foxkit::ErrorKind::Forbidden));
}
