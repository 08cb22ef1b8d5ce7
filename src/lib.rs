//! GitLab API client library.
//!
//! A Rust library for the GitLab REST API (v3 by default). Every call goes
//! through one pipeline: resolve the configuration, pick credentials, build
//! the request, perform one exchange, classify failures, and follow
//! pagination links when asked to.
//!
//! # Quick Start
//!
//! ```no_run
//! use foxkit::{Client, Found, Get, List, Options, ProjectRef, User, UserRef};
//!
//! #[tokio::main]
//! async fn main() -> foxkit::Result<()> {
//!     // Explicit options win; FOXKIT_* environment variables fill the gaps
//!     let client = Client::new(Options {
//!         private_token: Some("glpat-123".to_string()),
//!         auto_paginate: Some(true),
//!         ..Default::default()
//!     })?;
//!
//!     // Typed access
//!     let me = User::get(&client, UserRef::Current).await?;
//!     println!("Hello, {}", me.username);
//!
//!     // Untyped access to any endpoint
//!     let project: ProjectRef = "gitlab-org/gitlab-ce".parse()?;
//!     match client.project(&project, Default::default()).await.found()? {
//!         Some(p) => println!("{}", p["web_url"]),
//!         None => println!("no such project"),
//!     }
//!
//!     // Every page of a list endpoint
//!     let users = User::list_all(&client, &Default::default()).await?;
//!     println!("{} users", users.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Options`] / [`ClientConfig`] - configuration layers and the resolved
//!   snapshot
//! - [`Credentials`] - token, basic, or anonymous; `.netrc` fallback
//! - [`ProjectRef`] / [`UserRef`] - resource identities and their API paths
//! - [`Client`] - the request executor, plus endpoint methods
//! - [`Client::paginate`] / [`PageStream`] - `Link` header pagination
//! - [`FoxkitError`] / [`ApiError`] - classified failures
//! - [`Get`], [`List`], [`Update`] - typed operations on models
//! - [`Foxkit`] - caller-owned shared defaults and client reuse
//!
//! # Configuration
//!
//! The client reads `FOXKIT_*` environment variables for anything not set
//! explicitly, for example:
//!
//! - `FOXKIT_PRIVATE_TOKEN` - private token (preferred over login/password)
//! - `FOXKIT_LOGIN` / `FOXKIT_PASSWORD` - basic authentication
//! - `FOXKIT_API_ENDPOINT` - base URL (defaults to `https://gitlab.com/`)
//! - `FOXKIT_AUTO_PAGINATE` / `FOXKIT_PER_PAGE` - pagination behaviour

mod auth;
mod client;
mod config;
mod endpoints;
mod error;
mod foxkit;
mod identity;
mod models;
mod pagination;
mod request;
mod response;
mod traits;

pub mod cli;
pub mod output;

pub use output::PrettyPrint;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use auth::{
    netrc_credentials, Credentials, CredentialsWarning, Netrc, NetrcEntry, NetrcSyntaxError,
    PRIVATE_TOKEN_HEADER,
};
pub use client::{Client, ClientCache};
pub use config::{
    ClientConfig, ConnectionOptions, Options, AUTO_PAGINATE_PER_PAGE, DEFAULT_API_ENDPOINT,
    DEFAULT_API_VERSION, DEFAULT_MEDIA_TYPE, DEFAULT_WEB_ENDPOINT, USER_AGENT,
};
pub use error::{ApiError, ErrorKind, FoxkitError, Found, Result};
pub use foxkit::Foxkit;
pub use identity::{ProjectRecord, ProjectRef, UserRef};
pub use pagination::{Accumulator, Page, PageStream};
pub use request::{RequestOptions, RequestSpec, CONVENIENCE_HEADERS};
pub use response::{parse_link_header, ResponseEnvelope};

// Re-export traits
pub use traits::{Get, List, Update, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{
    // Project types
    Namespace,
    Project,
    ProjectOwner,
    // Repository types
    Tag,
    TagCommit,
    TreeEntry,
    TreeQuery,
    // Snippet types
    Snippet,
    SnippetAuthor,
    // User types
    KeyListQuery,
    SshKey,
    User,
    UserListQuery,
    UserUpdateParams,
};

// Re-export convenience functions
pub use models::{get_snippets, get_tags, get_tree, get_tree_page};

// Re-export the HTTP method type used by `Client::request`
pub use reqwest::Method;
