//! Blobb follow-graph core.
//!
//! Directed "follows" relationships between users: idempotent follow/unfollow,
//! paginated follower/followee traversal and derived profile counters. Storage
//! is abstracted behind [`graph::FollowGraphStore`] and
//! [`directory::UserDirectory`], with in-memory and Redis backends for both.

pub mod directory;
pub mod errors;
pub mod graph;
pub mod id;
pub mod keys;
pub mod profile;
pub mod runtime;
pub mod service;
pub mod types;
pub mod validators;

pub use directory::{MemoryUserDirectory, RedisUserDirectory, UserDirectory, UserRegistry};
pub use errors::{ErrorKind, GraphError, GraphResult, ValidationError, ValidationIssue};
pub use graph::{FollowGraphStore, MemoryGraphStore, RedisGraphStore};
pub use profile::ProfileAggregator;
pub use service::{FollowGraphService, SocialGraphApi};
pub use types::{DEFAULT_PAGE_LIMIT, FollowEdge, NewUser, Page, ProfileInfo, User, UserId};

// Re-export redis types so users don't need to depend on a specific redis version
pub use redis;
pub use redis::aio::ConnectionManager;

/// Delete all keys matching a pattern (for namespace teardown and test cleanup).
///
/// This performs a SCAN + DEL operation to safely delete keys without blocking Redis.
pub async fn purge_pattern(conn: &mut ConnectionManager, pattern: &str) -> Result<u64, GraphError> {
    const SCAN_COUNT: usize = 1000;
    let mut cursor: u64 = 0;
    let mut total_deleted: u64 = 0;

    loop {
        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_COUNT)
            .query_async(conn)
            .await?;

        if !keys.is_empty() {
            let deleted: u64 = redis::cmd("DEL").arg(&keys).query_async(conn).await?;
            total_deleted += deleted;
        }

        cursor = next_cursor;
        if cursor == 0 {
            break;
        }
    }

    log::debug!("purged {total_deleted} keys matching {pattern}");
    Ok(total_deleted)
}
