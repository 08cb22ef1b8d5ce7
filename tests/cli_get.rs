//! Execution tests for the CLI get command.
//!
//! Uses wiremock to mock the GitLab API and test the typed `Get` path.

use foxkit::{Client, ClientConfig, Get, Options, Project, ProjectRef, Snippet, SshKey, User, UserRef};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::from_config(ClientConfig::from_options(Options {
        api_endpoint: Some(server.uri()),
        private_token: Some("test-token".to_string()),
        ..Default::default()
    }))
    .unwrap()
}

#[tokio::test]
async fn test_get_project_by_slug() {
    let mock_server = MockServer::start().await;

    let project_json = serde_json::json!({
        "id": 3,
        "name": "Diaspora Project Site",
        "path_with_namespace": "diaspora/diaspora-project-site",
        "public": false,
        "visibility_level": 0
    });

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/diaspora%2Fdiaspora-project-site"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&project_json))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let reference: ProjectRef = "diaspora/diaspora-project-site".parse().unwrap();
    let project = Project::get(&client, reference).await.unwrap();

    assert_eq!(project.name, "Diaspora Project Site");
    assert_eq!(project.reference(), ProjectRef::Id(3));
}

#[tokio::test]
async fn test_get_current_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "username": "john_smith",
            "state": "active"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let me = User::get(&client, UserRef::Current).await.unwrap();

    assert_eq!(me.username, "john_smith");
    assert!(me.is_active());
}

#[tokio::test]
async fn test_get_user_by_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users/jack_smith"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 2,
            "username": "jack_smith"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let user = User::get(&client, UserRef::from(Some("jack_smith"))).await.unwrap();
    assert_eq!(user.id, 2);
}

#[tokio::test]
async fn test_get_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/user/keys/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "title": "Public key",
            "key": "ssh-rsa AAAAB3NzaC1yc2EAAAABJQAAAIEAiPWx6WM4lhHNedGfBpPJNPpZ7yKu"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let key = tokio_test::assert_ok!(SshKey::get(&client, 1).await);
    assert_eq!(key.key_type(), Some("ssh-rsa"));
}

#[tokio::test]
async fn test_get_snippet() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/42/snippets/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "title": "test",
            "file_name": "add.rb",
            "author": {"id": 1, "username": "john_smith"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let snippet = Snippet::get(&client, (ProjectRef::Id(42), 7)).await.unwrap();
    assert_eq!(snippet.author.unwrap().username, "john_smith");
}

#[tokio::test]
async fn test_get_missing_project_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/projects/99"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"message": "404 Project Not Found"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = tokio_test::assert_err!(Project::get(&client, ProjectRef::Id(99)).await);
    assert!(err.is_not_found());
}
