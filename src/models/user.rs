//! User and SSH key models and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::identity::UserRef;
use crate::pagination::Page;
use crate::request::RequestOptions;
use crate::traits::{Get, List, Update};

/// A GitLab user.
///
/// Admins see more fields than other callers; everything past `web_url`
/// is optional for that reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Numeric user id.
    pub id: u64,

    /// Login name.
    pub username: String,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// `active` or `blocked`.
    #[serde(default)]
    pub state: Option<String>,

    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,

    /// Profile URL.
    #[serde(default)]
    pub web_url: Option<String>,

    /// Email address.
    #[serde(default)]
    pub email: Option<String>,

    /// Biography.
    #[serde(default)]
    pub bio: Option<String>,

    /// Skype id.
    #[serde(default)]
    pub skype: Option<String>,

    /// LinkedIn account.
    #[serde(default)]
    pub linkedin: Option<String>,

    /// Twitter account.
    #[serde(default)]
    pub twitter: Option<String>,

    /// Website URL.
    #[serde(default)]
    pub website_url: Option<String>,

    /// Whether the user is an administrator.
    #[serde(default)]
    pub is_admin: Option<bool>,

    /// Whether the user may create groups.
    #[serde(default)]
    pub can_create_group: Option<bool>,

    /// Whether the user may create projects.
    #[serde(default)]
    pub can_create_project: Option<bool>,

    /// Number of projects the user may create.
    #[serde(default)]
    pub projects_limit: Option<u32>,

    /// When the account was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Private token; only present in a session response.
    #[serde(default, skip_serializing)]
    pub private_token: Option<String>,
}

impl User {
    /// True when the account is not blocked.
    pub fn is_active(&self) -> bool {
        self.state.as_deref() != Some("blocked")
    }

    /// A reference usable with the endpoint methods.
    pub fn reference(&self) -> UserRef {
        UserRef::Id(self.id)
    }
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserListQuery {
    /// Match username, name or email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Exact username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Only active users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Only blocked users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
}

/// Parameters for updating a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdateParams {
    /// New email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// New login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// New website URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,

    /// New project limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_limit: Option<u32>,

    /// Grant or revoke admin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,

    /// Allow or forbid group creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_create_group: Option<bool>,
}

#[async_trait]
impl Get for User {
    type Id = UserRef;

    #[tracing::instrument(skip(client))]
    async fn get(client: &Client, user: UserRef) -> Result<Self> {
        let envelope = client
            .request(reqwest::Method::GET, &client.user_path(&user), RequestOptions::new())
            .await?;
        envelope.json()
    }
}

#[async_trait]
impl List for User {
    type Query = UserListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &Client,
        query: &Self::Query,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Self>> {
        let options = RequestOptions::from_serialize(query)?;
        client.page("users", options, page, per_page).await
    }
}

#[async_trait]
impl Update for User {
    type Id = u64;
    type Params = UserUpdateParams;

    #[tracing::instrument(skip(client))]
    async fn update(client: &Client, user_id: u64, params: Self::Params) -> Result<Self> {
        let body = client
            .update_user(user_id, RequestOptions::from_serialize(&params)?)
            .await?;
        Ok(serde_json::from_value(body)?)
    }
}

/// An SSH key registered to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshKey {
    /// Numeric key id.
    pub id: u64,

    /// Key title.
    pub title: String,

    /// Public key material.
    pub key: String,

    /// When the key was added.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SshKey {
    /// The key type, e.g. `ssh-rsa`.
    pub fn key_type(&self) -> Option<&str> {
        self.key.split_whitespace().next()
    }
}

/// Query parameters for listing SSH keys.
#[derive(Debug, Clone, Default)]
pub struct KeyListQuery {
    /// Whose keys; the authenticated user by default.
    pub user: UserRef,
}

#[async_trait]
impl Get for SshKey {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &Client, key_id: u64) -> Result<Self> {
        let body = client.key(key_id, RequestOptions::new()).await?;
        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl List for SshKey {
    type Query = KeyListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &Client,
        query: &Self::Query,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Self>> {
        let path = format!("{}/keys", client.user_path(&query.user));
        client.page(&path, RequestOptions::new(), page, per_page).await
    }
}
