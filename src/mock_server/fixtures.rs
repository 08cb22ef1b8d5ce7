//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{TimeZone, Utc};

use crate::{Namespace, Project, ProjectOwner, SshKey, Tag, TagCommit, User};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// The data a default mock server starts with.
pub struct DefaultScenario {
    pub users: Vec<User>,
    pub keys: Vec<(u64, SshKey)>,
    pub projects: Vec<Project>,
    pub tags: Vec<(u64, Vec<Tag>)>,
    pub current_user: u64,
}

impl Fixtures {
    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create an active user with public profile fields only.
    pub fn user(id: u64, username: &str) -> User {
        let name = username
            .split('_')
            .map(|part| {
                let mut chars = part.chars();
                chars
                    .next()
                    .map(|c| c.to_uppercase().chain(chars).collect::<String>())
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(" ");
        User {
            id,
            username: username.to_string(),
            name: Some(name),
            state: Some("active".to_string()),
            avatar_url: None,
            web_url: Some(format!("http://localhost:3000/{username}")),
            email: None,
            bio: None,
            skype: None,
            linkedin: None,
            twitter: None,
            website_url: None,
            is_admin: None,
            can_create_group: None,
            can_create_project: None,
            projects_limit: None,
            created_at: None,
            private_token: None,
        }
    }

    /// Create a user as an administrator sees it.
    pub fn admin_view_user(id: u64, username: &str) -> User {
        let mut user = Self::user(id, username);
        user.email = Some(format!("{username}@example.com"));
        user.is_admin = Some(false);
        user.can_create_group = Some(true);
        user.can_create_project = Some(true);
        user.projects_limit = Some(10);
        user.created_at = Utc.with_ymd_and_hms(2012, 5, 23, 8, 0, 58).single();
        user
    }

    /// Create a blocked user.
    pub fn blocked_user(id: u64, username: &str) -> User {
        let mut user = Self::user(id, username);
        user.state = Some("blocked".to_string());
        user
    }

    // =========================================================================
    // Key Fixtures
    // =========================================================================

    /// Create an RSA SSH key.
    pub fn ssh_key(id: u64, title: &str) -> SshKey {
        SshKey {
            id,
            title: title.to_string(),
            key: format!("ssh-rsa AAAAB3NzaC1yc2EAAAABJQAAAIEAiPWx6WM4lhHNedGfBpPJNPpZ7yKu{id} {title}"),
            created_at: Utc.with_ymd_and_hms(2014, 8, 1, 14, 47, 39).single(),
        }
    }

    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// Create a public project in a user namespace.
    pub fn project(id: u64, namespace: &str, path: &str) -> Project {
        Project {
            id,
            name: path.to_string(),
            name_with_namespace: Some(format!("{namespace} / {path}")),
            path: Some(path.to_string()),
            path_with_namespace: Some(format!("{namespace}/{path}")),
            description: None,
            default_branch: Some("master".to_string()),
            public: true,
            visibility_level: Some(20),
            archived: false,
            ssh_url_to_repo: Some(format!("git@example.com:{namespace}/{path}.git")),
            http_url_to_repo: Some(format!("http://example.com/{namespace}/{path}.git")),
            web_url: Some(format!("http://example.com/{namespace}/{path}")),
            owner: None,
            namespace: Some(Namespace {
                id,
                name: Some(namespace.to_string()),
                path: Some(namespace.to_string()),
            }),
            created_at: Utc.with_ymd_and_hms(2013, 9, 30, 13, 46, 2).single(),
            last_activity_at: None,
        }
    }

    /// Create a private project owned by a user.
    pub fn private_project(id: u64, owner: &User, path: &str) -> Project {
        let mut project = Self::project(id, &owner.username, path);
        project.public = false;
        project.visibility_level = Some(0);
        project.owner = Some(ProjectOwner {
            id: owner.id,
            name: owner.name.clone(),
            username: Some(owner.username.clone()),
        });
        project
    }

    // =========================================================================
    // Tag Fixtures
    // =========================================================================

    /// Create a lightweight tag.
    pub fn tag(name: &str, sha: &str) -> Tag {
        Tag {
            name: name.to_string(),
            message: None,
            commit: Some(TagCommit {
                id: sha.to_string(),
                message: Some(format!("Release {name}")),
            }),
            protected: false,
        }
    }

    // =========================================================================
    // Scenario Fixtures
    // =========================================================================

    /// Five users (enough to page through with a small `per_page`), a few
    /// keys, two projects, and tags on the public one.
    pub fn default_scenario() -> DefaultScenario {
        let john = Self::admin_view_user(1, "john_smith");
        let users = vec![
            john.clone(),
            Self::admin_view_user(2, "jack_smith"),
            Self::user(3, "mary_jones"),
            Self::blocked_user(4, "spam_bot"),
            Self::user(5, "sam_doe"),
        ];

        let keys = vec![
            (1, Self::ssh_key(1, "Public key")),
            (1, Self::ssh_key(2, "Work laptop")),
            (2, Self::ssh_key(3, "jack@desktop")),
        ];

        let projects = vec![
            Self::project(4, "diaspora", "diaspora-client"),
            Self::private_project(6, &john, "dotfiles"),
        ];

        let tags = vec![(
            4,
            vec![
                Self::tag("v1.0.0", "2695effb5807a22ff3d138d593fd856244e155e7"),
                Self::tag("v1.1.0", "7b5c3cc8be40ee161ae89a06bba6229da1032a0c"),
            ],
        )];

        DefaultScenario {
            users,
            keys,
            projects,
            tags,
            current_user: 1,
        }
    }
}
