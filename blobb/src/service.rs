use std::sync::Arc;

use crate::{
    directory::UserDirectory,
    errors::{GraphError, GraphResult},
    graph::FollowGraphStore,
    profile::ProfileAggregator,
    types::{Page, ProfileInfo, User, UserId},
};

/// Operations the transport layer calls with an already authenticated acting user.
#[allow(async_fn_in_trait)]
pub trait SocialGraphApi {
    async fn follow_user(&self, acting_user: &User, target_id: &UserId) -> GraphResult<bool>;

    async fn unfollow_user(&self, acting_user: &User, target_id: &UserId) -> GraphResult<bool>;

    /// Accounts `id` follows.
    async fn list_following(&self, id: &UserId, skip: i64, limit: i64) -> GraphResult<Vec<User>>;

    /// Accounts following `id`.
    async fn list_followers(&self, id: &UserId, skip: i64, limit: i64) -> GraphResult<Vec<User>>;

    async fn get_profile_info(&self, id: &UserId) -> GraphResult<ProfileInfo>;
}

/// Validates requests against the directory and applies them to the edge store.
///
/// Every domain check runs before the store is touched, so a rejected request
/// leaves no partial state behind.
pub struct FollowGraphService<D, S> {
    directory: Arc<D>,
    store: Arc<S>,
    profiles: ProfileAggregator<S>,
}

impl<D, S> Clone for FollowGraphService<D, S> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            store: Arc::clone(&self.store),
            profiles: self.profiles.clone(),
        }
    }
}

impl<D, S> FollowGraphService<D, S>
where
    D: UserDirectory,
    S: FollowGraphStore,
{
    pub fn new(directory: Arc<D>, store: Arc<S>) -> Self {
        let profiles = ProfileAggregator::new(Arc::clone(&store));
        Self {
            directory,
            store,
            profiles,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn find_by_id(&self, id: &UserId) -> GraphResult<User> {
        self.directory.find_by_id(id).await
    }

    /// Makes `acting_user` follow `target_id`.
    ///
    /// Returns `false` when the edge already existed.
    pub async fn follow(&self, acting_user: &User, target_id: &UserId) -> GraphResult<bool> {
        if &acting_user.id == target_id {
            return Err(GraphError::invalid_argument(format!(
                "user {target_id} cannot follow themselves"
            )));
        }
        self.ensure_exists(&acting_user.id).await?;
        self.ensure_exists(target_id).await?;
        let created = self.store.create_edge(&acting_user.id, target_id).await?;
        log::debug!("{} follow {target_id}: created={created}", acting_user.id);
        Ok(created)
    }

    /// Removes the edge `acting_user -> target_id` if present.
    ///
    /// The target does not need to exist, so stale edges can always be dropped.
    pub async fn unfollow(&self, acting_user: &User, target_id: &UserId) -> GraphResult<bool> {
        let removed = self.store.remove_edge(&acting_user.id, target_id).await?;
        log::debug!("{} unfollow {target_id}: removed={removed}", acting_user.id);
        Ok(removed)
    }

    pub async fn is_following(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool> {
        self.store.edge_exists(follower, followee).await
    }

    /// Users followed by `id`, one page at a time.
    pub async fn find_all_followed_by(&self, id: &UserId, skip: i64, limit: i64) -> GraphResult<Vec<User>> {
        let page = Page::new(skip, limit)?;
        self.ensure_exists(id).await?;
        let ids = self.store.list_followees(id, page).await?;
        self.directory.find_all_by_ids(&ids).await
    }

    /// Users following `id`, one page at a time.
    pub async fn find_all_following(&self, id: &UserId, skip: i64, limit: i64) -> GraphResult<Vec<User>> {
        let page = Page::new(skip, limit)?;
        self.ensure_exists(id).await?;
        let ids = self.store.list_followers(id, page).await?;
        self.directory.find_all_by_ids(&ids).await
    }

    pub async fn get_user_profile_info(&self, id: &UserId) -> GraphResult<ProfileInfo> {
        self.ensure_exists(id).await?;
        self.profiles.profile_info(id).await
    }

    async fn ensure_exists(&self, id: &UserId) -> GraphResult<()> {
        if self.directory.exists(id).await? {
            Ok(())
        } else {
            Err(GraphError::user_not_found(id))
        }
    }
}

impl<D, S> SocialGraphApi for FollowGraphService<D, S>
where
    D: UserDirectory,
    S: FollowGraphStore,
{
    async fn follow_user(&self, acting_user: &User, target_id: &UserId) -> GraphResult<bool> {
        self.follow(acting_user, target_id).await
    }

    async fn unfollow_user(&self, acting_user: &User, target_id: &UserId) -> GraphResult<bool> {
        self.unfollow(acting_user, target_id).await
    }

    async fn list_following(&self, id: &UserId, skip: i64, limit: i64) -> GraphResult<Vec<User>> {
        self.find_all_followed_by(id, skip, limit).await
    }

    async fn list_followers(&self, id: &UserId, skip: i64, limit: i64) -> GraphResult<Vec<User>> {
        self.find_all_following(id, skip, limit).await
    }

    async fn get_profile_info(&self, id: &UserId) -> GraphResult<ProfileInfo> {
        self.get_user_profile_info(id).await
    }
}
