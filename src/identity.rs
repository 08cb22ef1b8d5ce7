//! Resource identity resolution.
//!
//! Projects and users can be named several ways (numeric id, `owner/name`,
//! a loose record, a web URL, "the current user"). Each is resolved once
//! into an API path such as `api/v3/projects/42`.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use url::Url;

use crate::error::{FoxkitError, Result};

/// A loosely shaped project description, as callers often have on hand.
///
/// Recognized keys: `id`; `project` or `name`; `owner`, `user` or
/// `username`. Synonyms may appear together; the first one listed wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRecord {
    /// Numeric project id.
    pub id: Option<u64>,
    /// Project name.
    pub name: Option<String>,
    /// Namespace (user or group) owning the project.
    pub owner: Option<String>,
}

impl ProjectRecord {
    /// Read a record out of a JSON object.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let id = match map.get("id") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(n.as_u64().ok_or_else(|| {
                FoxkitError::InvalidIdentity(format!("'{n}' is not a project id"))
            })?),
            Some(Value::String(s)) => Some(s.trim().parse().map_err(|_| {
                FoxkitError::InvalidIdentity(format!("'{s}' is not a project id"))
            })?),
            Some(other) => {
                return Err(FoxkitError::InvalidIdentity(format!(
                    "'{other}' is not a project id"
                )))
            }
        };
        Ok(Self {
            id,
            name: first_text(map, &["project", "name"])?,
            owner: first_text(map, &["owner", "user", "username"])?,
        })
    }
}

/// The first of `keys` holding a non-blank string.
fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Result<Option<String>> {
    for key in keys {
        match map.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.trim().is_empty() => continue,
            Some(Value::String(s)) => return Ok(Some(s.trim().to_string())),
            Some(other) => {
                return Err(FoxkitError::InvalidIdentity(format!(
                    "'{key}' must be a string, got {other}"
                )))
            }
        }
    }
    Ok(None)
}

/// A reference to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    /// Numeric id.
    Id(u64),
    /// Namespace and project name.
    Slug {
        /// Namespace.
        owner: String,
        /// Project name.
        name: String,
    },
    /// A bare identifier without a namespace, passed through as-is.
    Key(String),
}

impl From<u64> for ProjectRef {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl FromStr for ProjectRef {
    type Err = FoxkitError;

    /// `"42"` is an id, `"owner/name"` splits on the first `/`, anything
    /// else without a slash is a bare key.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FoxkitError::InvalidIdentity("empty project reference".to_string()));
        }
        if let Ok(id) = s.parse::<u64>() {
            return Ok(Self::Id(id));
        }
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok(Self::Slug {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            Some(_) => Err(FoxkitError::InvalidIdentity(format!(
                "'{s}' is not of the form owner/name"
            ))),
            None => Ok(Self::Key(s.to_string())),
        }
    }
}

impl TryFrom<ProjectRecord> for ProjectRef {
    type Error = FoxkitError;

    fn try_from(record: ProjectRecord) -> Result<Self> {
        if let Some(id) = record.id {
            return Ok(Self::Id(id));
        }
        match (record.owner, record.name) {
            (Some(owner), Some(name)) => Ok(Self::Slug { owner, name }),
            (None, Some(name)) => Ok(Self::Key(name)),
            _ => Err(FoxkitError::InvalidIdentity(
                "project record needs an id or a name".to_string(),
            )),
        }
    }
}

impl ProjectRef {
    /// Resolve a JSON value: number, string, or object record.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self::Id).ok_or_else(|| {
                FoxkitError::InvalidIdentity(format!("'{n}' is not a project id"))
            }),
            Value::String(s) => s.parse(),
            Value::Object(map) => Self::try_from(ProjectRecord::from_map(map)?),
            other => Err(FoxkitError::InvalidIdentity(format!(
                "cannot resolve a project from {other}"
            ))),
        }
    }

    /// Parse a web URL such as `https://gitlab.com/sferik/octokit`.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        let path = url.path().trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        path.parse()
    }

    /// The namespace, if known.
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::Slug { owner, .. } => Some(owner),
            _ => None,
        }
    }

    /// The project name, if known.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Slug { name, .. } | Self::Key(name) => Some(name),
            Self::Id(_) => None,
        }
    }

    /// The numeric id, if known.
    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Id(id) => Some(*id),
            _ => None,
        }
    }

    /// `owner/name`, if both are known.
    pub fn slug(&self) -> Option<String> {
        match self {
            Self::Slug { owner, name } => Some(format!("{owner}/{name}")),
            _ => None,
        }
    }

    /// Browser URL under the given web endpoint.
    pub fn web_url(&self, web_endpoint: &str) -> Option<String> {
        let slug = self.slug()?;
        let base = web_endpoint.trim_end_matches('/');
        Some(format!("{base}/{slug}"))
    }

    /// The path segment identifying the project in API URLs.
    fn segment(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Slug { owner, name } => urlencoding::encode(&format!("{owner}/{name}")).into_owned(),
            Self::Key(key) => urlencoding::encode(key).into_owned(),
        }
    }

    /// API path, e.g. `api/v3/projects/42` or `api/v3/projects/sferik%2Foctokit`.
    pub fn path(&self, api_version: &str) -> String {
        format!("api/{api_version}/projects/{}", self.segment())
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Slug { owner, name } => write!(f, "{owner}/{name}"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

/// A reference to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UserRef {
    /// The authenticated user.
    #[default]
    Current,
    /// Numeric id.
    Id(u64),
    /// Username.
    Login(String),
}

impl From<u64> for UserRef {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<Option<&str>> for UserRef {
    /// `None` and blank strings mean the current user.
    fn from(user: Option<&str>) -> Self {
        match user.map(str::trim) {
            None | Some("") => Self::Current,
            Some(s) => s.parse::<u64>().map_or_else(|_| Self::Login(s.to_string()), Self::Id),
        }
    }
}

impl UserRef {
    /// API path, e.g. `api/v3/users/7` or `api/v3/user`.
    pub fn path(&self, api_version: &str) -> String {
        match self {
            Self::Current => format!("api/{api_version}/user"),
            Self::Id(id) => format!("api/{api_version}/users/{id}"),
            Self::Login(login) => format!("api/{api_version}/users/{}", urlencoding::encode(login)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_with_slash_sets_owner_and_name() {
        let project: ProjectRef = "sferik/octokit".parse().unwrap();
        assert_eq!(project.owner(), Some("sferik"));
        assert_eq!(project.name(), Some("octokit"));
        assert_eq!(project.slug().as_deref(), Some("sferik/octokit"));
        assert_eq!(project.to_string(), "sferik/octokit");
    }

    #[test]
    fn test_split_on_first_slash_only() {
        let project: ProjectRef = "group/sub/repo".parse().unwrap();
        assert_eq!(project.owner(), Some("group"));
        assert_eq!(project.name(), Some("sub/repo"));
        assert_eq!(project.path("v3"), "api/v3/projects/group%2Fsub%2Frepo");
    }

    #[test]
    fn test_id_path() {
        assert_eq!(ProjectRef::Id(12345).path("v3"), "api/v3/projects/12345");
        assert_eq!(ProjectRef::from_str("12345").unwrap(), ProjectRef::Id(12345));
    }

    #[test]
    fn test_all_shapes_agree_on_path() {
        let direct = ProjectRef::Slug {
            owner: "sferik".to_string(),
            name: "octokit".to_string(),
        }
        .path("v3");

        let shapes = [
            ProjectRef::from_str("sferik/octokit").unwrap(),
            ProjectRef::from_value(&json!({"username": "sferik", "name": "octokit"})).unwrap(),
            ProjectRef::from_value(&json!({"user": "sferik", "project": "octokit"})).unwrap(),
            ProjectRef::from_value(&json!({"owner": "sferik", "name": "octokit"})).unwrap(),
            ProjectRef::from_value(&json!("sferik/octokit")).unwrap(),
            ProjectRef::from_url("https://gitlab.com/sferik/octokit").unwrap(),
        ];
        for shape in shapes {
            assert_eq!(shape.path("v3"), direct, "{shape:?}");
        }

        assert_eq!(ProjectRef::from_value(&json!(12345)).unwrap().path("v3"), "api/v3/projects/12345");
    }

    #[test]
    fn test_record_id_wins() {
        let project =
            ProjectRef::from_value(&json!({"id": 7, "owner": "sferik", "name": "octokit"})).unwrap();
        assert_eq!(project, ProjectRef::Id(7));
    }

    #[test]
    fn test_record_synonyms_resolve_by_priority() {
        let project = ProjectRef::from_value(
            &json!({"project": "octokit", "name": "ignored", "owner": "sferik"}),
        )
        .unwrap();
        assert_eq!(project.slug().as_deref(), Some("sferik/octokit"));

        let project = ProjectRef::from_value(
            &json!({"name": "octokit", "user": "sferik", "username": "someone-else"}),
        )
        .unwrap();
        assert_eq!(project.slug().as_deref(), Some("sferik/octokit"));

        let project = ProjectRef::from_value(
            &json!({"name": "octokit", "owner": "sferik", "user": "a", "username": "b"}),
        )
        .unwrap();
        assert_eq!(project.owner(), Some("sferik"));

        let project = ProjectRef::from_value(&json!({"id": "7", "name": "octokit"})).unwrap();
        assert_eq!(project, ProjectRef::Id(7));
    }

    #[test]
    fn test_web_url() {
        let project = ProjectRef::from_url("https://gitlab.com/sferik/octokit.git").unwrap();
        assert_eq!(
            project.web_url("https://gitlab.com/").as_deref(),
            Some("https://gitlab.com/sferik/octokit")
        );
        assert!(ProjectRef::Id(1).web_url("https://gitlab.com/").is_none());
    }

    #[test]
    fn test_invalid_identities() {
        for bad in ["", "  ", "/octokit", "sferik/"] {
            assert!(
                matches!(ProjectRef::from_str(bad), Err(FoxkitError::InvalidIdentity(_))),
                "{bad:?}"
            );
        }
        assert!(matches!(
            ProjectRef::from_value(&json!({"owner": "sferik"})),
            Err(FoxkitError::InvalidIdentity(_))
        ));
        assert!(matches!(
            ProjectRef::from_value(&json!({"name": 5, "owner": "sferik"})),
            Err(FoxkitError::InvalidIdentity(_))
        ));
        assert!(matches!(
            ProjectRef::from_value(&json!(true)),
            Err(FoxkitError::InvalidIdentity(_))
        ));
        assert!(matches!(
            ProjectRef::from_value(&json!(-3)),
            Err(FoxkitError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_user_paths() {
        assert_eq!(UserRef::Current.path("v3"), "api/v3/user");
        assert_eq!(UserRef::from(None).path("v3"), "api/v3/user");
        assert_eq!(UserRef::from(Some("7")).path("v3"), "api/v3/users/7");
        assert_eq!(UserRef::from(Some("sferik")).path("v3"), "api/v3/users/sferik");
        assert_eq!(UserRef::from(42).path("v4"), "api/v4/users/42");
    }
}
