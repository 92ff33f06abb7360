//! User identity lookup.
//!
//! [`UserDirectory`] is the read side the follow graph validates against.
//! [`UserRegistry`] adds the registration seam used to populate a directory;
//! account creation itself happens in the registration flow outside this crate.

mod memory;
mod redis_store;

pub use self::memory::MemoryUserDirectory;
pub use self::redis_store::RedisUserDirectory;

use crate::{
    errors::GraphResult,
    types::{NewUser, User, UserId},
};

#[allow(async_fn_in_trait)]
pub trait UserDirectory {
    /// Fails with [`crate::GraphError::UserNotFound`] when the id does not resolve.
    async fn find_by_id(&self, id: &UserId) -> GraphResult<User>;

    async fn exists(&self, id: &UserId) -> GraphResult<bool>;

    /// Case-insensitive username lookup.
    async fn find_by_username(&self, username: &str) -> GraphResult<Option<User>>;

    async fn exists_by_username(&self, username: &str) -> GraphResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// Users whose username contains `fragment` (case-insensitive), ordered by username.
    async fn find_all_by_username_containing(&self, fragment: &str) -> GraphResult<Vec<User>>;

    /// Resolves ids in order. Ids that no longer resolve are skipped.
    async fn find_all_by_ids(&self, ids: &[UserId]) -> GraphResult<Vec<User>>;
}

#[allow(async_fn_in_trait)]
pub trait UserRegistry: UserDirectory {
    /// Validates and stores a new user, assigning a fresh id.
    ///
    /// Fails with [`crate::GraphError::Validation`] for malformed fields and
    /// [`crate::GraphError::UsernameTaken`] when the username is claimed.
    async fn register(&self, new_user: NewUser) -> GraphResult<User>;
}
