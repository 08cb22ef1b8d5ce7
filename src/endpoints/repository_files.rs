//! Repository files API.
//!
//! Mutations take `file_path`, `branch_name`, `commit_message` and, for
//! create and update, `content` plus an optional `encoding` (`text` or
//! `base64`).

use serde_json::Value;

use crate::client::Client;
use crate::error::Result;
use crate::identity::ProjectRef;
use crate::request::RequestOptions;

impl Client {
    fn files_path(&self, project: &ProjectRef) -> String {
        format!("{}/repository/files", self.project_path(project))
    }

    /// File info (name, size, base64 content) for `file_path` at `ref`.
    pub async fn repository_files(&self, project: &ProjectRef, options: RequestOptions) -> Result<Value> {
        self.paginate(&self.files_path(project), options).await
    }

    /// Create a file.
    pub async fn create_repository_file(
        &self,
        project: &ProjectRef,
        options: RequestOptions,
    ) -> Result<Value> {
        self.post(&self.files_path(project), options).await
    }

    /// Update a file.
    pub async fn update_repository_file(
        &self,
        project: &ProjectRef,
        options: RequestOptions,
    ) -> Result<Value> {
        self.put(&self.files_path(project), options).await
    }

    /// Delete a file.
    pub async fn delete_repository_file(
        &self,
        project: &ProjectRef,
        options: RequestOptions,
    ) -> Result<Value> {
        self.delete(&self.files_path(project), options).await
    }
}
