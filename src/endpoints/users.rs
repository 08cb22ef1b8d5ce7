//! Users API, including SSH keys.

use reqwest::Method;
use serde_json::Value;

use crate::client::Client;
use crate::error::Result;
use crate::identity::UserRef;
use crate::request::RequestOptions;

impl Client {
    /// Every user, in sign-up order. Admins see more fields.
    pub async fn all_users(&self, options: RequestOptions) -> Result<Value> {
        self.paginate("users", options).await
    }

    /// A single user, or the authenticated user for [`UserRef::Current`].
    pub async fn user(&self, user: &UserRef, options: RequestOptions) -> Result<Value> {
        self.get(&self.user_path(user), options).await
    }

    /// Create a user (admin only).
    ///
    /// Fields such as `email`, `password`, `username` and `name` go in
    /// `options`.
    pub async fn create_user(&self, options: RequestOptions) -> Result<Value> {
        self.post("users", options).await
    }

    /// Update a user (admin only).
    pub async fn update_user(&self, user_id: u64, options: RequestOptions) -> Result<Value> {
        self.put(&format!("users/{user_id}"), options).await
    }

    /// Delete a user (admin only). True when the server answered 204.
    pub async fn delete_user(&self, user_id: u64, options: RequestOptions) -> Result<bool> {
        self.boolean_from_response(Method::DELETE, &format!("users/{user_id}"), options)
            .await
    }

    /// SSH keys of a user, or of the authenticated user.
    pub async fn user_keys(&self, user: &UserRef, options: RequestOptions) -> Result<Value> {
        self.paginate(&format!("{}/keys", self.user_path(user)), options)
            .await
    }

    /// A single SSH key of the authenticated user.
    pub async fn key(&self, key_id: u64, options: RequestOptions) -> Result<Value> {
        self.get(&format!("user/keys/{key_id}"), options).await
    }

    /// Add an SSH key (`title`, `key`) for the authenticated user.
    pub async fn add_key(&self, options: RequestOptions) -> Result<Value> {
        self.post("user/keys", options).await
    }

    /// Add an SSH key for the given user (admin only).
    pub async fn add_user_key(&self, user_id: u64, options: RequestOptions) -> Result<Value> {
        self.post(
            &format!("{}/keys", self.user_path(&UserRef::Id(user_id))),
            options,
        )
        .await
    }

    /// Delete an SSH key of the authenticated user.
    pub async fn delete_key(&self, key_id: u64, options: RequestOptions) -> Result<bool> {
        self.boolean_from_response(Method::DELETE, &format!("user/keys/{key_id}"), options)
            .await
    }

    /// Delete an SSH key of the given user (admin only).
    pub async fn delete_user_key(
        &self,
        user_id: u64,
        key_id: u64,
        options: RequestOptions,
    ) -> Result<bool> {
        self.boolean_from_response(
            Method::DELETE,
            &format!("users/{user_id}/keys/{key_id}"),
            options,
        )
        .await
    }
}
