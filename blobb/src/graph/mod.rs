//! The directed follow-edge set.
//!
//! Every backend keeps two invariants: at most one edge per ordered pair, and
//! no edge from a user to themselves. Traversal order is edge-creation order,
//! so paging with `skip = 0, L, 2L, ...` visits every edge exactly once as long
//! as the set is not mutated in between.

mod memory;
mod redis_store;

pub use self::memory::{DEFAULT_LOCK_STRIPES, MemoryGraphStore};
pub use self::redis_store::RedisGraphStore;

use crate::{
    errors::GraphResult,
    types::{Page, UserId},
};

#[allow(async_fn_in_trait)]
pub trait FollowGraphStore {
    /// Always `false` for `follower == followee`.
    async fn edge_exists(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool>;

    /// Returns `true` if a new edge was created and `false` if it already existed.
    ///
    /// Fails with [`crate::GraphError::InvalidArgument`] when `follower == followee`.
    async fn create_edge(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool>;

    /// Returns `true` if an edge was removed and `false` if there was none.
    async fn remove_edge(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool>;

    /// Accounts `of` follows, in edge-creation order.
    async fn list_followees(&self, of: &UserId, page: Page) -> GraphResult<Vec<UserId>>;

    /// Accounts following `of`, in edge-creation order.
    async fn list_followers(&self, of: &UserId, page: Page) -> GraphResult<Vec<UserId>>;

    async fn count_followees(&self, of: &UserId) -> GraphResult<u64>;

    async fn count_followers(&self, of: &UserId) -> GraphResult<u64>;
}
