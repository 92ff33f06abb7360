use std::{
    collections::{BTreeMap, HashMap},
    sync::RwLock,
};

use chrono::Utc;

use super::{UserDirectory, UserRegistry};
use crate::{
    errors::{GraphError, GraphResult},
    id::generate_user_id,
    types::{NewUser, User, UserId},
    validators::normalize_username,
};

/// Process-local user directory.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    state: RwLock<DirectoryState>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, User>,
    /// Normalized username -> id, kept sorted for search.
    usernames: BTreeMap<String, UserId>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> GraphResult<usize> {
        Ok(self.state.read()?.users.len())
    }

    pub fn is_empty(&self) -> GraphResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> GraphResult<User> {
        self.state
            .read()?
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::user_not_found(id))
    }

    async fn exists(&self, id: &UserId) -> GraphResult<bool> {
        Ok(self.state.read()?.users.contains_key(id))
    }

    async fn find_by_username(&self, username: &str) -> GraphResult<Option<User>> {
        let state = self.state.read()?;
        Ok(state
            .usernames
            .get(&normalize_username(username))
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_all_by_username_containing(&self, fragment: &str) -> GraphResult<Vec<User>> {
        let needle = normalize_username(fragment);
        let state = self.state.read()?;
        Ok(state
            .usernames
            .iter()
            .filter(|(name, _)| name.contains(&needle))
            .filter_map(|(_, id)| state.users.get(id).cloned())
            .collect())
    }

    async fn find_all_by_ids(&self, ids: &[UserId]) -> GraphResult<Vec<User>> {
        let state = self.state.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                let user = state.users.get(id).cloned();
                if user.is_none() {
                    log::warn!("skipping unresolvable user id {id}");
                }
                user
            })
            .collect())
    }
}

impl UserRegistry for MemoryUserDirectory {
    async fn register(&self, new_user: NewUser) -> GraphResult<User> {
        new_user.validate()?;
        let normalized = normalize_username(&new_user.username);

        let mut state = self.state.write()?;
        if state.usernames.contains_key(&normalized) {
            return Err(GraphError::UsernameTaken {
                username: new_user.username,
            });
        }

        let user = new_user.into_user(generate_user_id(), Utc::now());
        state.usernames.insert(normalized, user.id.clone());
        state.users.insert(user.id.clone(), user.clone());
        log::debug!("registered user {} ({})", user.id, user.username);
        Ok(user)
    }
}
