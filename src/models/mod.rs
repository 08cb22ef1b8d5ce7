//! GitLab API model types.

mod project;
mod repository;
mod snippet;
mod user;

pub use project::*;
pub use repository::*;
pub use snippet::*;
pub use user::*;
