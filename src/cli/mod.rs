//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the foxkit binary.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

/// GitLab API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "foxkit", about = "GitLab API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single resource.
    Get {
        /// The type of resource to get.
        entity: Entity,

        /// Project id or `owner/name`, user id or login (`me` for yourself),
        /// key id, or snippet id.
        id: String,

        /// Project the snippet belongs to.
        #[arg(long)]
        project: Option<String>,
    },

    /// List resources, one page at a time.
    List {
        /// The type of resource to list.
        entity: Entity,

        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        per_page: Option<u32>,

        /// Project id or `owner/name` (tags, tree, snippets).
        #[arg(long)]
        project: Option<String>,

        /// User id or login whose keys to list (defaults to yourself).
        #[arg(long)]
        user: Option<String>,

        /// Directory to list (tree).
        #[arg(long)]
        path: Option<String>,

        /// Branch, tag or commit (tree).
        #[arg(long = "ref")]
        ref_name: Option<String>,

        /// Filter users by name, username or email.
        #[arg(long)]
        search: Option<String>,
    },

    /// Update a user (admin only).
    Update {
        /// The type of resource to update.
        entity: Entity,

        /// The id of the resource to update.
        id: u64,

        /// New display name.
        #[arg(long)]
        name: Option<String>,

        /// New email.
        #[arg(long)]
        email: Option<String>,

        /// New biography.
        #[arg(long)]
        bio: Option<String>,
    },

    /// Send a raw request to any endpoint.
    Api {
        /// HTTP method.
        method: HttpMethod,

        /// Path relative to `api/<version>/`, e.g. `projects/42/snippets`.
        path: String,

        /// A `key=value` field; query for GET, JSON body otherwise.
        /// Values that parse as JSON (numbers, booleans) are sent typed.
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,

        /// Follow `next` links and concatenate every page.
        #[arg(long)]
        paginate: bool,
    },
}

/// Resource types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A project.
    #[value(alias = "projects")]
    Project,
    /// A user.
    #[value(alias = "users")]
    User,
    /// An SSH key.
    #[value(alias = "keys")]
    Key,
    /// A repository tag.
    #[value(alias = "tags")]
    Tag,
    /// A repository tree listing.
    #[value(alias = "trees")]
    Tree,
    /// A project snippet.
    #[value(alias = "snippets")]
    Snippet,
}

/// Methods accepted by the `api` command.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "UPPER")]
pub enum HttpMethod {
    /// GET
    #[value(alias = "get")]
    Get,
    /// POST
    #[value(alias = "post")]
    Post,
    /// PUT
    #[value(alias = "put")]
    Put,
    /// PATCH
    #[value(alias = "patch")]
    Patch,
    /// DELETE
    #[value(alias = "delete")]
    Delete,
    /// HEAD
    #[value(alias = "head")]
    Head,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Head => Self::HEAD,
        }
    }
}

/// Parse `key=value`. The value is JSON if it parses as JSON, else a string.
pub fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("title=hello").unwrap(), ("title".to_string(), json!("hello")));
        assert_eq!(parse_field("per_page=5").unwrap(), ("per_page".to_string(), json!(5)));
        assert_eq!(parse_field("admin=false").unwrap(), ("admin".to_string(), json!(false)));
        assert_eq!(parse_field("q=a=b").unwrap(), ("q".to_string(), json!("a=b")));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }
}
