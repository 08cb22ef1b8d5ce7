//! Projects API.

use serde_json::Value;

use crate::client::Client;
use crate::error::{Found, Result};
use crate::identity::ProjectRef;
use crate::request::RequestOptions;

impl Client {
    /// Get a single project.
    pub async fn project(&self, project: &ProjectRef, options: RequestOptions) -> Result<Value> {
        self.get(&self.project_path(project), options).await
    }

    /// Check whether a project exists.
    ///
    /// NotFound is `Ok(false)`; other failures are returned.
    pub async fn project_exists(&self, project: &ProjectRef, options: RequestOptions) -> Result<bool> {
        Ok(self.project(project, options).await.found()?.is_some())
    }
}
