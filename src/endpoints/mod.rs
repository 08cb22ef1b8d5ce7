//! Endpoint methods on [`Client`](crate::Client).
//!
//! Each submodule adds one `impl Client` block with thin wrappers that fix
//! a path template and forward to the request executor or the paginator.
//! They return the decoded JSON body as a [`serde_json::Value`]; typed
//! access lives in the model types such as [`User`](crate::User).

mod project_snippets;
mod projects;
mod repositories;
mod repository_files;
mod sessions;
mod users;

use crate::client::Client;
use crate::identity::{ProjectRef, UserRef};

impl Client {
    /// API path for a project.
    pub(crate) fn project_path(&self, project: &ProjectRef) -> String {
        project.path(&self.config().api_version)
    }

    /// API path for a user, or for the authenticated user.
    pub(crate) fn user_path(&self, user: &UserRef) -> String {
        user.path(&self.config().api_version)
    }
}
