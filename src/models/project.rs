//! Project model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::identity::ProjectRef;
use crate::request::RequestOptions;
use crate::traits::Get;

/// A GitLab project.
///
/// Projects live in a namespace (a user or a group) and own one
/// repository plus snippets, issues and so on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Numeric project id.
    pub id: u64,

    /// Project name.
    pub name: String,

    /// e.g. `Diaspora / Diaspora Client`.
    #[serde(default)]
    pub name_with_namespace: Option<String>,

    /// URL path segment.
    #[serde(default)]
    pub path: Option<String>,

    /// e.g. `diaspora/diaspora-client`.
    #[serde(default)]
    pub path_with_namespace: Option<String>,

    /// Project description.
    #[serde(default)]
    pub description: Option<String>,

    /// Default branch.
    #[serde(default)]
    pub default_branch: Option<String>,

    /// Whether the project is public.
    #[serde(default)]
    pub public: bool,

    /// 0 private, 10 internal, 20 public.
    #[serde(default)]
    pub visibility_level: Option<u32>,

    /// Whether the project is archived.
    #[serde(default)]
    pub archived: bool,

    /// SSH clone URL.
    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,

    /// HTTP clone URL.
    #[serde(default)]
    pub http_url_to_repo: Option<String>,

    /// Browser URL.
    #[serde(default)]
    pub web_url: Option<String>,

    /// Owning user, for personal projects.
    #[serde(default)]
    pub owner: Option<ProjectOwner>,

    /// Owning namespace.
    #[serde(default)]
    pub namespace: Option<Namespace>,

    /// When the project was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last push, issue or comment.
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// The user owning a personal project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectOwner {
    /// User id.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
}

/// A user or group namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    /// Namespace id.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// URL path segment.
    #[serde(default)]
    pub path: Option<String>,
}

impl Project {
    /// A reference usable with the endpoint methods.
    pub fn reference(&self) -> ProjectRef {
        ProjectRef::Id(self.id)
    }

    /// `namespace/path`, if the server sent it.
    pub fn slug(&self) -> Option<&str> {
        self.path_with_namespace.as_deref()
    }

    /// `public`, `internal` or `private`.
    pub fn visibility(&self) -> &'static str {
        match self.visibility_level {
            Some(20) => "public",
            Some(10) => "internal",
            Some(_) => "private",
            None if self.public => "public",
            None => "private",
        }
    }

    /// Tags of this project's repository.
    pub async fn tags(&self, client: &Client) -> Result<Vec<crate::models::repository::Tag>> {
        crate::models::repository::get_tags(client, &self.reference()).await
    }

    /// Snippets of this project.
    pub async fn snippets(&self, client: &Client) -> Result<Vec<crate::models::snippet::Snippet>> {
        crate::models::snippet::get_snippets(client, &self.reference()).await
    }
}

#[async_trait]
impl Get for Project {
    type Id = ProjectRef;

    #[tracing::instrument(skip(client))]
    async fn get(client: &Client, project: ProjectRef) -> Result<Self> {
        let body = client.project(&project, RequestOptions::new()).await?;
        Ok(serde_json::from_value(body)?)
    }
}
