//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::Client;
use crate::error::Result;

/// Fetch a single resource by identifier.
///
/// # Example
///
/// ```no_run
/// use foxkit::{Client, Get, User, UserRef};
///
/// # async fn example(client: &Client) -> foxkit::Result<()> {
/// let me = User::get(client, UserRef::Current).await?;
/// let other = User::get(client, UserRef::Login("sferik".to_string())).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Get: Sized {
    /// How the resource is identified (`UserRef`, `ProjectRef`, a key id).
    type Id: Send;

    /// Fetch the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not found or the request fails.
    async fn get(client: &Client, id: Self::Id) -> Result<Self>;
}
