//! Repositories API.

use bytes::Bytes;
use serde_json::Value;

use crate::client::Client;
use crate::error::Result;
use crate::identity::ProjectRef;
use crate::request::RequestOptions;

impl Client {
    fn repository_path(&self, project: &ProjectRef, rest: &str) -> String {
        format!("{}/repository/{rest}", self.project_path(project))
    }

    /// Tags of a project, in reverse alphabetical order.
    pub async fn repository_tags(&self, project: &ProjectRef, options: RequestOptions) -> Result<Value> {
        self.paginate(&self.repository_path(project, "tags"), options)
            .await
    }

    /// Create a tag (`tag_name`, `ref`, optional `message`).
    pub async fn create_repository_tag(
        &self,
        project: &ProjectRef,
        options: RequestOptions,
    ) -> Result<Value> {
        self.post(&self.repository_path(project, "tags"), options)
            .await
    }

    /// Files and directories of a project (`path`, `ref_name` filters).
    pub async fn repository_tree(&self, project: &ProjectRef, options: RequestOptions) -> Result<Value> {
        self.paginate(&self.repository_path(project, "tree"), options)
            .await
    }

    /// Raw contents of `filepath` at commit or branch `sha`.
    pub async fn repository_raw_file_content(
        &self,
        project: &ProjectRef,
        sha: &str,
        filepath: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        let path = self.repository_path(project, &format!("blobs/{}", urlencoding::encode(sha)));
        self.get(&path, options.field("filepath", filepath)).await
    }

    /// Raw contents of the blob `sha`, byte for byte.
    pub async fn repository_raw_blob_content(
        &self,
        project: &ProjectRef,
        sha: &str,
        options: RequestOptions,
    ) -> Result<Bytes> {
        let path = self.repository_path(project, &format!("raw_blobs/{}", urlencoding::encode(sha)));
        self.raw_bytes(&path, options).await
    }

    /// An archive of the repository (`sha` selects the revision).
    pub async fn repository_archive(&self, project: &ProjectRef, options: RequestOptions) -> Result<Bytes> {
        self.raw_bytes(&self.repository_path(project, "archive"), options)
            .await
    }

    async fn raw_bytes(&self, path: &str, options: RequestOptions) -> Result<Bytes> {
        let envelope = self.request(reqwest::Method::GET, path, options).await?;
        Ok(envelope.bytes().clone())
    }

    /// Compare two refs given as `from` and `to`.
    pub async fn repository_diff_between(
        &self,
        project: &ProjectRef,
        options: RequestOptions,
    ) -> Result<Value> {
        self.get(&self.repository_path(project, "compare"), options)
            .await
    }

    /// Contributors of the repository.
    pub async fn repository_contributors(
        &self,
        project: &ProjectRef,
        options: RequestOptions,
    ) -> Result<Value> {
        self.get(&self.repository_path(project, "contributors"), options)
            .await
    }
}
