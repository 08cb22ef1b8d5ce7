//! Repository tag and tree models.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::identity::ProjectRef;
use crate::pagination::Page;
use crate::request::RequestOptions;
use crate::traits::List;

/// A repository tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,

    /// Annotation message, for annotated tags.
    #[serde(default)]
    pub message: Option<String>,

    /// The tagged commit.
    #[serde(default)]
    pub commit: Option<TagCommit>,

    /// Whether the tag is protected.
    #[serde(default)]
    pub protected: bool,
}

/// The commit a tag points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCommit {
    /// Commit SHA.
    pub id: String,
    /// Commit message.
    #[serde(default)]
    pub message: Option<String>,
}

impl Tag {
    /// The tagged commit SHA.
    pub fn sha(&self) -> Option<&str> {
        self.commit.as_ref().map(|c| c.id.as_str())
    }
}

/// A file or directory in a repository tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Object SHA.
    pub id: String,

    /// File or directory name.
    pub name: String,

    /// `tree` or `blob`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Unix file mode, e.g. `100644`.
    #[serde(default)]
    pub mode: Option<String>,
}

impl TreeEntry {
    /// True for directories.
    pub fn is_dir(&self) -> bool {
        self.kind == "tree"
    }
}

/// Query parameters for listing a repository tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeQuery {
    /// Subdirectory to list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Branch, tag or commit; the default branch if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<String>,
}

#[async_trait]
impl List for Tag {
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
        let path = format!("{}/repository/tags", client.project_path(&project));
        client.page(&path, RequestOptions::new(), page, per_page).await
    }
}

#[async_trait]
impl List for TreeEntry {
    /// (project reference, filters)
    type Query = (String, TreeQuery);

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &Client,
        query: &Self::Query,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Self>> {
        let (project, filters) = query;
        let project = ProjectRef::from_str(project)?;
        let path = format!("{}/repository/tree", client.project_path(&project));
        let options = RequestOptions::from_serialize(filters)?;
        client.page(&path, options, page, per_page).await
    }
}

/// Fetch every tag of a project.
///
/// # Example
///
/// ```no_run
/// use foxkit::{get_tags, Client, ProjectRef};
///
/// # async fn example(client: &Client) -> foxkit::Result<()> {
/// let project: ProjectRef = "gitlab-org/gitlab-ce".parse()?;
/// for tag in get_tags(client, &project).await? {
///     println!("{} {:?}", tag.name, tag.sha());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn get_tags(client: &Client, project: &ProjectRef) -> Result<Vec<Tag>> {
    Tag::list_all(client, &project.to_string()).await
}

/// Fetch the full listing of one tree level.
pub async fn get_tree(client: &Client, project: &ProjectRef, query: TreeQuery) -> Result<Vec<TreeEntry>> {
    TreeEntry::list_all(client, &(project.to_string(), query)).await
}

/// Fetch a single page of a tree listing.
pub async fn get_tree_page(
    client: &Client,
    project: &ProjectRef,
    query: TreeQuery,
    page: u32,
    per_page: u32,
) -> Result<Page<TreeEntry>> {
    TreeEntry::list_page(client, &(project.to_string(), query), page, per_page).await
}
