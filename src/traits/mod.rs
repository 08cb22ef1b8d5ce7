//! Typed operations on GitLab resources.
//!
//! Each model implements the traits its endpoints support. The untyped
//! endpoint methods on [`Client`](crate::Client) remain available for
//! anything not modelled here.

mod get;
mod list;
mod update;

pub use get::Get;
pub use list::{List, DEFAULT_PAGE_SIZE};
pub use update::Update;
