//! List trait for fetching collections of resources.

use async_trait::async_trait;

use crate::client::Client;
use crate::error::Result;
use crate::pagination::Page;

/// Default page size for list operations (the server maximum).
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum pages to fetch when the client sets no cap of its own.
const MAX_PAGES: u32 = 1000;

/// List resources with pagination support.
///
/// # Example
///
/// ```no_run
/// use foxkit::{Client, List, User, UserListQuery};
///
/// # async fn example(client: &Client) -> foxkit::Result<()> {
/// // Fetch a single page
/// let page = User::list_page(client, &Default::default(), 1, 20).await?;
///
/// // Fetch every page
/// let query = UserListQuery {
///     search: Some("john".to_string()),
///     ..Default::default()
/// };
/// let johns = User::list_all(client, &query).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Filters, sent as query parameters.
    type Query: Default + Send + Sync;

    /// List one page.
    ///
    /// # Arguments
    ///
    /// * `client` - The GitLab API client
    /// * `query` - Filters
    /// * `page` - Page number (1-indexed)
    /// * `per_page` - Number of items per page (max 100)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &Client,
        query: &Self::Query,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Self>>;

    /// List every page.
    ///
    /// Stops when the server reports no further page, or at the client's
    /// `max_pages` cap.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &Client, query: &Self::Query) -> Result<Vec<Self>> {
        let limit = client.config().max_pages.unwrap_or(MAX_PAGES);
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let result = Self::list_page(client, query, page, DEFAULT_PAGE_SIZE).await?;
            let done = !result.has_more || result.is_empty();
            all_items.extend(result.items);

            if done {
                break;
            }
            if page >= limit {
                tracing::warn!("Reached pagination limit of {} pages, stopping", limit);
                break;
            }
            page += 1;
        }

        Ok(all_items)
    }
}
