use redis::{aio::ConnectionManager, cmd};

use super::FollowGraphStore;
use crate::{
    errors::GraphResult,
    keys::KeyContext,
    purge_pattern,
    runtime::scripts::{FOLLOW_EDGE_SCRIPT, UNFOLLOW_EDGE_SCRIPT},
    types::{FollowEdge, Page, UserId},
};

/// Follow graph stored as two sorted sets per user (forward and reverse
/// adjacency) scored by a shared edge sequence.
///
/// Create and remove run as Lua scripts, so the existence check and both
/// sorted-set writes execute as one atomic step on the server.
#[derive(Clone)]
pub struct RedisGraphStore {
    conn: ConnectionManager,
    prefix: String,
    service: String,
}

impl RedisGraphStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
            service: service.into(),
        }
    }

    pub fn key_context(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix, &self.service)
    }

    /// Deletes every key under this store's prefix, users included.
    pub async fn purge_namespace(&self) -> GraphResult<u64> {
        let mut conn = self.conn.clone();
        purge_pattern(&mut conn, &self.key_context().namespace_pattern()).await
    }

    /// Reads one page of a sorted set by rank, skipping a self member if one
    /// was ever written, without shifting the page boundaries of other members.
    async fn page_members(&self, key: &str, of: &UserId, page: Page) -> GraphResult<Vec<UserId>> {
        let mut conn = self.conn.clone();
        let self_rank: Option<u64> = cmd("ZRANK").arg(key).arg(of.as_str()).query_async(&mut conn).await?;

        let Some((start, stop)) = rank_window(page, self_rank) else {
            return Ok(Vec::new());
        };
        if self_rank.is_some() {
            log::warn!("ignoring self edge on {key}");
        }

        let members: Vec<String> = cmd("ZRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await?;
        Ok(members
            .into_iter()
            .filter(|member| member != of.as_str())
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .map(UserId::from)
            .collect())
    }

    async fn cardinality(&self, key: &str, of: &UserId) -> GraphResult<u64> {
        let mut conn = self.conn.clone();
        let (count, self_score): (u64, Option<f64>) = redis::pipe()
            .cmd("ZCARD")
            .arg(key)
            .cmd("ZSCORE")
            .arg(key)
            .arg(of.as_str())
            .query_async(&mut conn)
            .await?;
        Ok(if self_score.is_some() { count.saturating_sub(1) } else { count })
    }
}

/// Inclusive ZRANGE bounds for `page`, given the rank of a self member if any.
///
/// A self member before the window shifts it one rank right; one inside the
/// window widens it by one so the filtered member is replaced. `None` means the
/// window starts beyond any addressable rank, so the page is empty.
fn rank_window(page: Page, self_rank: Option<u64>) -> Option<(i64, i64)> {
    let (skip, limit) = (page.skip(), page.limit());
    let (start, stop) = match self_rank {
        None => (skip, skip.saturating_add(limit - 1)),
        Some(rank) if rank < skip => (skip.saturating_add(1), skip.saturating_add(limit)),
        Some(_) => (skip, skip.saturating_add(limit)),
    };
    let start = i64::try_from(start).ok()?;
    Some((start, i64::try_from(stop).unwrap_or(i64::MAX)))
}

impl FollowGraphStore for RedisGraphStore {
    async fn edge_exists(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool> {
        if follower == followee {
            return Ok(false);
        }
        let key = self.key_context().follows(follower.as_str());
        let mut conn = self.conn.clone();
        let score: Option<f64> = cmd("ZSCORE")
            .arg(&key)
            .arg(followee.as_str())
            .query_async(&mut conn)
            .await?;
        Ok(score.is_some())
    }

    async fn create_edge(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool> {
        let edge = FollowEdge::new(follower, followee)?;
        let ctx = self.key_context();
        let mut invocation = FOLLOW_EDGE_SCRIPT.prepare_invoke();
        invocation
            .key(ctx.follows(edge.follower().as_str()))
            .key(ctx.follows_reverse(edge.followee().as_str()))
            .key(ctx.follows_sequence())
            .arg(edge.follower().as_str())
            .arg(edge.followee().as_str());
        let mut conn = self.conn.clone();
        let created: i64 = invocation.invoke_async(&mut conn).await?;
        log::debug!("create edge {follower} -> {followee}: created={}", created == 1);
        Ok(created == 1)
    }

    async fn remove_edge(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool> {
        let ctx = self.key_context();
        let mut invocation = UNFOLLOW_EDGE_SCRIPT.prepare_invoke();
        invocation
            .key(ctx.follows(follower.as_str()))
            .key(ctx.follows_reverse(followee.as_str()))
            .arg(follower.as_str())
            .arg(followee.as_str());
        let mut conn = self.conn.clone();
        let removed: i64 = invocation.invoke_async(&mut conn).await?;
        log::debug!("remove edge {follower} -> {followee}: removed={}", removed == 1);
        Ok(removed == 1)
    }

    async fn list_followees(&self, of: &UserId, page: Page) -> GraphResult<Vec<UserId>> {
        let key = self.key_context().follows(of.as_str());
        self.page_members(&key, of, page).await
    }

    async fn list_followers(&self, of: &UserId, page: Page) -> GraphResult<Vec<UserId>> {
        let key = self.key_context().follows_reverse(of.as_str());
        self.page_members(&key, of, page).await
    }

    async fn count_followees(&self, of: &UserId) -> GraphResult<u64> {
        let key = self.key_context().follows(of.as_str());
        self.cardinality(&key, of).await
    }

    async fn count_followers(&self, of: &UserId) -> GraphResult<u64> {
        let key = self.key_context().follows_reverse(of.as_str());
        self.cardinality(&key, of).await
    }
}
