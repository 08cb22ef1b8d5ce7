//! Pagination over `Link: <..>; rel="next"` responses.
//!
//! [`Client::paginate`] fetches one page, or every page when auto-pagination
//! is on. [`PageStream`] hands pages to the caller one at a time instead.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::client::Client;
use crate::config::AUTO_PAGINATE_PER_PAGE;
use crate::error::Result;
use crate::request::{RequestOptions, RequestSpec};
use crate::response::ResponseEnvelope;

/// A page of typed results.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages (if the server said).
    pub total: Option<u64>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub per_page: u32,
    /// Whether there are more pages.
    pub has_more: bool,
    /// URL of the next page, if any.
    #[serde(skip)]
    pub next: Option<Url>,
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode a page from a response.
    ///
    /// Page numbers come from the `X-Page`/`X-Per-Page`/`X-Total` headers
    /// when present, else from the requested values.
    pub fn from_envelope(envelope: &ResponseEnvelope, page: u32, per_page: u32) -> Result<Self> {
        let items: Vec<T> = envelope.json()?;
        let number = |name: &str| envelope.header(name).and_then(|v| v.trim().parse::<u64>().ok());

        let next = envelope.next_url().cloned();
        let has_more = next.is_some()
            || envelope
                .header("x-next-page")
                .is_some_and(|v| !v.trim().is_empty());

        Ok(Self {
            items,
            total: number("x-total"),
            page: number("x-page").and_then(|n| u32::try_from(n).ok()).unwrap_or(page),
            per_page: number("x-per-page")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(per_page),
            has_more,
            next,
        })
    }
}

impl<T> Page<T> {
    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            has_more: self.has_more,
            next: self.next,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Combines a newly fetched page into the accumulated result.
pub type Accumulator<'a> = dyn FnMut(&mut Value, &ResponseEnvelope) + Send + 'a;

impl Client {
    /// GET a list endpoint.
    ///
    /// With auto-pagination on, every `next` link is followed and array
    /// pages are concatenated. Otherwise only the first page is returned.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any page; earlier pages are discarded.
    pub async fn paginate(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.paginate_inner(path, options, None).await
    }

    /// Like [`paginate`](Client::paginate), but each followed page is
    /// combined into the result by `accumulator` instead of array append.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foxkit::{Client, RequestOptions};
    ///
    /// # async fn example(client: &Client) -> foxkit::Result<()> {
    /// let mut pages = 1;
    /// let first = client
    ///     .paginate_with("users", RequestOptions::new(), |_data, _page| pages += 1)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn paginate_with<F>(
        &self,
        path: &str,
        options: RequestOptions,
        mut accumulator: F,
    ) -> Result<Value>
    where
        F: FnMut(&mut Value, &ResponseEnvelope) + Send,
    {
        self.paginate_inner(path, options, Some(&mut accumulator)).await
    }

    /// Start streaming the pages of a list endpoint.
    ///
    /// The stream follows `next` links regardless of the auto-paginate
    /// setting; the caller decides when to stop.
    pub fn page_stream(&self, path: &str, options: RequestOptions) -> PageStream {
        PageStream {
            client: self.clone(),
            pending: Some(self.pagination_spec(path, options)),
            pages: 0,
        }
    }

    /// GET one numbered page of a list endpoint and decode it.
    pub async fn page<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
        page: u32,
        per_page: u32,
    ) -> Result<Page<T>> {
        let options = options.query("page", page).query("per_page", per_page);
        let envelope = self.request(Method::GET, path, options).await?;
        Page::from_envelope(&envelope, page, per_page)
    }

    fn pagination_spec(&self, path: &str, options: RequestOptions) -> RequestSpec {
        let mut spec = RequestSpec::build(Method::GET, path, options);
        let config = self.config();
        if config.auto_paginate || config.per_page.is_some() {
            spec.query_default(
                "per_page",
                config.per_page.unwrap_or(AUTO_PAGINATE_PER_PAGE),
            );
        }
        spec
    }

    #[tracing::instrument(skip(self, options, accumulator))]
    async fn paginate_inner(
        &self,
        path: &str,
        options: RequestOptions,
        mut accumulator: Option<&mut Accumulator<'_>>,
    ) -> Result<Value> {
        let spec = self.pagination_spec(path, options);
        let headers = spec.headers.clone();

        let first = self.execute(spec).await?;
        let mut data = first.body.clone();
        if !self.config().auto_paginate {
            return Ok(data);
        }

        let max_pages = self.config().max_pages;
        let mut pages: u32 = 1;
        let mut next = first.next_url().cloned();

        while let Some(url) = next {
            if max_pages.is_some_and(|max| pages >= max) {
                tracing::warn!("Reached pagination limit of {} pages, stopping", pages);
                break;
            }

            let page = self.follow(&url, &headers).await?;
            pages += 1;
            tracing::debug!(page = pages, url = %page.url, "followed next link");

            match accumulator.as_deref_mut() {
                Some(accumulate) => accumulate(&mut data, &page),
                None => {
                    if let (Value::Array(all), Value::Array(items)) = (&mut data, &page.body) {
                        all.extend(items.iter().cloned());
                    }
                }
            }
            next = page.next_url().cloned();
        }

        Ok(data)
    }

    async fn follow(&self, url: &Url, headers: &[(String, String)]) -> Result<Arc<ResponseEnvelope>> {
        self.execute(RequestSpec {
            method: Method::GET,
            path: url.to_string(),
            query: Vec::new(),
            headers: headers.to_vec(),
            body: None,
        })
        .await
    }
}

/// Pages of a list endpoint, fetched lazily and strictly in order.
///
/// Owns a client clone so there are no lifetime parameters.
#[derive(Debug)]
pub struct PageStream {
    client: Client,
    pending: Option<RequestSpec>,
    pages: u32,
}

impl PageStream {
    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once a page without a `next` link has been
    /// returned, or once the client's `max_pages` cap is reached.
    pub async fn next_page(&mut self) -> Result<Option<Arc<ResponseEnvelope>>> {
        let Some(spec) = self.pending.take() else {
            return Ok(None);
        };
        if self
            .client
            .config()
            .max_pages
            .is_some_and(|max| self.pages >= max)
        {
            tracing::warn!("Reached pagination limit of {} pages, stopping", self.pages);
            return Ok(None);
        }

        let headers = spec.headers.clone();
        let envelope = self.client.execute(spec).await?;
        self.pages += 1;

        self.pending = envelope.next_url().map(|url| RequestSpec {
            method: Method::GET,
            path: url.to_string(),
            query: Vec::new(),
            headers,
            body: None,
        });
        Ok(Some(envelope))
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages
    }

    /// Collect the items of every remaining page.
    pub async fn collect<T: DeserializeOwned>(mut self) -> Result<Vec<T>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            let items: Vec<T> = page.json()?;
            all.extend(items);
        }
        Ok(all)
    }
}
