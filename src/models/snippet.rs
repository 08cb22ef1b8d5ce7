//! Project snippet model.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::identity::ProjectRef;
use crate::pagination::Page;
use crate::request::RequestOptions;
use crate::traits::{Get, List};

/// A snippet attached to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    /// Snippet id.
    pub id: u64,

    /// Title.
    pub title: String,

    /// File name used for highlighting.
    #[serde(default)]
    pub file_name: Option<String>,

    /// Author.
    #[serde(default)]
    pub author: Option<SnippetAuthor>,

    /// Expiry, if any.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Last update.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The author of a snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetAuthor {
    /// User id.
    pub id: u64,
    /// Login name.
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

#[async_trait]
impl Get for Snippet {
    /// (project, snippet id)
    type Id = (ProjectRef, u64);

    #[tracing::instrument(skip(client))]
    async fn get(client: &Client, id: Self::Id) -> Result<Self> {
        let (project, snippet_id) = id;
        let body = client
            .project_snippet(&project, snippet_id, RequestOptions::new())
            .await?;
        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl List for Snippet {
    /// Project reference (`42` or `owner/name`).
    type Query = String;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &Client,
        project: &Self::Query,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Self>> {
        let project = ProjectRef::from_str(project)?;
        let path = format!("{}/snippets", client.project_path(&project));
        client.page(&path, RequestOptions::new(), page, per_page).await
    }
}

/// Fetch every snippet of a project.
pub async fn get_snippets(client: &Client, project: &ProjectRef) -> Result<Vec<Snippet>> {
    Snippet::list_all(client, &project.to_string()).await
}
