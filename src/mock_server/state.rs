//! Mock server state management.
//!
//! Provides the in-memory data store for the mock GitLab API server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Project, SshKey, Tag, User, UserUpdateParams};

/// Shared state for the mock server.
///
/// Wrapped in `Arc<RwLock<_>>` for concurrent access. Ordered maps keep
/// list responses stable across pages.
#[derive(Debug, Default)]
pub struct MockState {
    /// Users indexed by id.
    pub users: BTreeMap<u64, User>,

    /// SSH keys indexed by key id, with the owning user id.
    pub keys: BTreeMap<u64, (u64, SshKey)>,

    /// Projects indexed by id.
    pub projects: BTreeMap<u64, Project>,

    /// Repository tags indexed by project id.
    pub tags: HashMap<u64, Vec<Tag>>,

    /// The user `GET /user` answers with.
    pub current_user: Option<u64>,

    /// If set, requests must carry this token in `PRIVATE-TOKEN`.
    pub required_token: Option<String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a user to the state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    /// Add an SSH key owned by `user_id`.
    pub fn with_key(mut self, user_id: u64, key: SshKey) -> Self {
        self.keys.insert(key.id, (user_id, key));
        self
    }

    /// Add a project to the state.
    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.insert(project.id, project);
        self
    }

    /// Set the tags of a project.
    pub fn with_tags(mut self, project_id: u64, tags: Vec<Tag>) -> Self {
        self.tags.insert(project_id, tags);
        self
    }

    /// Set the authenticated user.
    pub fn with_current_user(mut self, user_id: u64) -> Self {
        self.current_user = Some(user_id);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Whether a request carrying `token` may proceed.
    pub fn accepts(&self, token: Option<&str>) -> bool {
        match self.required_token.as_deref() {
            Some(required) => token == Some(required),
            None => true,
        }
    }

    /// Get a user by id or username.
    pub fn find_user(&self, id_or_login: &str) -> Option<&User> {
        match id_or_login.parse::<u64>() {
            Ok(id) => self.users.get(&id),
            Err(_) => self.users.values().find(|u| u.username == id_or_login),
        }
    }

    /// The authenticated user.
    pub fn get_current_user(&self) -> Option<&User> {
        self.current_user.and_then(|id| self.users.get(&id))
    }

    /// List users, optionally filtered by a search term.
    pub fn list_users(&self, search: Option<&str>) -> Vec<&User> {
        let search = search.map(str::to_lowercase);
        self.users
            .values()
            .filter(|u| {
                search.as_deref().map_or(true, |s| {
                    u.username.to_lowercase().contains(s)
                        || u.name.as_deref().is_some_and(|n| n.to_lowercase().contains(s))
                })
            })
            .collect()
    }

    /// Apply an update to a user and return the updated version.
    pub fn update_user(&mut self, id: u64, params: UserUpdateParams) -> Option<&User> {
        let user = self.users.get_mut(&id)?;
        if let Some(email) = params.email {
            user.email = Some(email);
        }
        if let Some(username) = params.username {
            user.username = username;
        }
        if let Some(name) = params.name {
            user.name = Some(name);
        }
        if let Some(bio) = params.bio {
            user.bio = Some(bio);
        }
        if let Some(website_url) = params.website_url {
            user.website_url = Some(website_url);
        }
        if let Some(limit) = params.projects_limit {
            user.projects_limit = Some(limit);
        }
        if let Some(admin) = params.admin {
            user.is_admin = Some(admin);
        }
        if let Some(can_create_group) = params.can_create_group {
            user.can_create_group = Some(can_create_group);
        }
        self.users.get(&id)
    }

    /// Remove a user and their keys. Returns whether the user existed.
    pub fn delete_user(&mut self, id: u64) -> bool {
        self.keys.retain(|_, (owner, _)| *owner != id);
        self.users.remove(&id).is_some()
    }

    /// Get a key by id.
    pub fn get_key(&self, id: u64) -> Option<&SshKey> {
        self.keys.get(&id).map(|(_, key)| key)
    }

    /// Keys owned by a user.
    pub fn keys_for(&self, user_id: u64) -> Vec<&SshKey> {
        self.keys
            .values()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, key)| key)
            .collect()
    }

    /// Get a project by id or `namespace/path`.
    pub fn find_project(&self, id_or_slug: &str) -> Option<&Project> {
        match id_or_slug.parse::<u64>() {
            Ok(id) => self.projects.get(&id),
            Err(_) => self
                .projects
                .values()
                .find(|p| p.path_with_namespace.as_deref() == Some(id_or_slug)),
        }
    }

    /// Tags of a project; empty when the project has none.
    pub fn tags_for(&self, project_id: u64) -> &[Tag] {
        self.tags.get(&project_id).map_or(&[][..], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_state_find_user_by_id_and_login() {
        let state = MockState::new().with_user(Fixtures::user(1, "john_smith"));

        assert_eq!(state.find_user("1").unwrap().username, "john_smith");
        assert_eq!(state.find_user("john_smith").unwrap().id, 1);
        assert!(state.find_user("2").is_none());
    }

    #[test]
    fn test_state_list_users_with_search() {
        let state = MockState::new()
            .with_user(Fixtures::user(1, "john_smith"))
            .with_user(Fixtures::user(2, "jack_smith"))
            .with_user(Fixtures::user(3, "mary_jones"));

        assert_eq!(state.list_users(None).len(), 3);
        assert_eq!(state.list_users(Some("SMITH")).len(), 2);
        assert_eq!(state.list_users(Some("mary")).len(), 1);
    }

    #[test]
    fn test_state_update_and_delete_user() {
        let mut state = MockState::new()
            .with_user(Fixtures::user(1, "john_smith"))
            .with_key(1, Fixtures::ssh_key(10, "laptop"));

        let updated = state
            .update_user(
                1,
                UserUpdateParams {
                    bio: Some("hello".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("hello"));

        assert!(state.delete_user(1));
        assert!(state.keys_for(1).is_empty());
        assert!(!state.delete_user(1));
    }

    #[test]
    fn test_state_required_token() {
        let open = MockState::new();
        assert!(open.accepts(None));

        let locked = MockState::new().with_required_token("secret");
        assert!(locked.accepts(Some("secret")));
        assert!(!locked.accepts(Some("wrong")));
        assert!(!locked.accepts(None));
    }
}
