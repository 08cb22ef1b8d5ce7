//! Project snippets API.

use serde_json::Value;

use crate::client::Client;
use crate::error::Result;
use crate::identity::ProjectRef;
use crate::request::RequestOptions;

impl Client {
    fn snippets_path(&self, project: &ProjectRef) -> String {
        format!("{}/snippets", self.project_path(project))
    }

    /// Snippets of a project.
    pub async fn project_snippets(&self, project: &ProjectRef, options: RequestOptions) -> Result<Value> {
        self.paginate(&self.snippets_path(project), options).await
    }

    /// A single snippet.
    pub async fn project_snippet(
        &self,
        project: &ProjectRef,
        snippet_id: u64,
        options: RequestOptions,
    ) -> Result<Value> {
        let path = format!("{}/{snippet_id}", self.snippets_path(project));
        self.get(&path, options).await
    }

    /// Create a snippet (`title`, `file_name`, `code`, `visibility_level`).
    pub async fn create_project_snippet(
        &self,
        project: &ProjectRef,
        options: RequestOptions,
    ) -> Result<Value> {
        self.post(&self.snippets_path(project), options).await
    }

    /// Update a snippet.
    pub async fn update_project_snippet(
        &self,
        project: &ProjectRef,
        snippet_id: u64,
        options: RequestOptions,
    ) -> Result<Value> {
        let path = format!("{}/{snippet_id}", self.snippets_path(project));
        self.put(&path, options).await
    }

    /// Delete a snippet, returning the deleted snippet.
    pub async fn delete_project_snippet(
        &self,
        project: &ProjectRef,
        snippet_id: u64,
        options: RequestOptions,
    ) -> Result<Value> {
        let path = format!("{}/{snippet_id}", self.snippets_path(project));
        self.delete(&path, options).await
    }

    /// Raw content of a snippet, as a string.
    pub async fn project_snippet_content(
        &self,
        project: &ProjectRef,
        snippet_id: u64,
        options: RequestOptions,
    ) -> Result<Value> {
        let path = format!("{}/{snippet_id}/raw", self.snippets_path(project));
        self.get(&path, options).await
    }
}
