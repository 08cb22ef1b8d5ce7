//! Update trait for modifying resources.

use async_trait::async_trait;

use crate::client::Client;
use crate::error::Result;

/// Update an existing resource and return its new state.
///
/// # Example
///
/// ```no_run
/// use foxkit::{Client, Update, User, UserUpdateParams};
///
/// # async fn example(client: &Client) -> foxkit::Result<()> {
/// let user = User::update(
///     client,
///     42,
///     UserUpdateParams {
///         bio: Some("Ruby and Rust".to_string()),
///         ..Default::default()
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Update: Sized {
    /// The identifier type.
    type Id: Send;

    /// Fields to change.
    type Params: Send;

    /// Update the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not found, the caller lacks
    /// permission, or the request fails.
    async fn update(client: &Client, id: Self::Id, params: Self::Params) -> Result<Self>;
}
