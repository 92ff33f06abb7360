use std::sync::Arc;

use crate::{
    errors::GraphResult,
    graph::FollowGraphStore,
    types::{ProfileInfo, UserId},
};

/// Derives follower/following counters from the edge store.
///
/// Holds no state of its own, so a profile always reflects the current edge set.
pub struct ProfileAggregator<S> {
    store: Arc<S>,
}

impl<S> Clone for ProfileAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> ProfileAggregator<S>
where
    S: FollowGraphStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Counts for `user_id`. Does not check that the user exists.
    pub async fn profile_info(&self, user_id: &UserId) -> GraphResult<ProfileInfo> {
        let followers = self.store.count_followers(user_id).await?;
        let follows = self.store.count_followees(user_id).await?;
        Ok(ProfileInfo { followers, follows })
    }
}
