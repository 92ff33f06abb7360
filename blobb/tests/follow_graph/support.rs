#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

pub(crate) use blobb::{
    ConnectionManager, ErrorKind, FollowGraphService, FollowGraphStore, MemoryGraphStore, MemoryUserDirectory, NewUser,
    Page, RedisGraphStore, RedisUserDirectory, SocialGraphApi, User, UserDirectory, UserId, UserRegistry,
};

pub(crate) type MemoryService = FollowGraphService<MemoryUserDirectory, MemoryGraphStore>;
pub(crate) type RedisService = FollowGraphService<RedisUserDirectory, RedisGraphStore>;

pub(crate) fn new_user(name: &str) -> NewUser {
    NewUser::new(name, format!("{name}@mail.com"), name.to_uppercase(), format!("{name}'s bio"))
}

pub(crate) async fn register_all<D: UserRegistry>(directory: &D, names: &[&str]) -> Vec<User> {
    let mut users = Vec::with_capacity(names.len());
    for name in names {
        users.push(directory.register(new_user(name)).await.expect("register user"));
    }
    users
}

pub(crate) async fn memory_service(names: &[&str]) -> (MemoryService, Vec<User>) {
    let directory = Arc::new(MemoryUserDirectory::new());
    let users = register_all(directory.as_ref(), names).await;
    (FollowGraphService::new(directory, Arc::new(MemoryGraphStore::new())), users)
}

pub(crate) fn ids(users: &[User]) -> Vec<UserId> {
    users.iter().map(|user| user.id.clone()).collect()
}

/// Walks every page of `of`'s followees with the given limit until an empty page comes back.
pub(crate) async fn drain_followees<S: FollowGraphStore>(store: &S, of: &UserId, limit: u64) -> Vec<UserId> {
    let mut page = Page::first(limit).expect("valid limit");
    let mut collected = Vec::new();
    loop {
        let batch = store.list_followees(of, page).await.expect("list followees");
        if batch.is_empty() {
            return collected;
        }
        collected.extend(batch);
        page = page.next();
    }
}

pub(crate) static TEST_NAMESPACE_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub(crate) struct TestNamespace {
    prefix: String,
}

impl TestNamespace {
    pub(crate) fn unique() -> Self {
        let idx = TEST_NAMESPACE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let salt = blobb::id::generate_user_id();
        Self {
            prefix: format!("blobb_test_prefix_{idx}_{}", &salt.as_str()[..8]),
        }
    }

    pub(crate) fn store(&self, conn: &ConnectionManager) -> RedisGraphStore {
        RedisGraphStore::new(conn.clone(), self.prefix.clone(), "social")
    }

    pub(crate) fn service(&self, conn: &ConnectionManager) -> RedisService {
        let directory = RedisUserDirectory::new(conn.clone(), self.prefix.clone(), "social");
        FollowGraphService::new(Arc::new(directory), Arc::new(self.store(conn)))
    }

    pub(crate) async fn cleanup(&self, conn: &ConnectionManager) {
        self.store(conn).purge_namespace().await.expect("purge test namespace");
    }
}

pub(crate) async fn redis_conn() -> ConnectionManager {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
    let client = blobb::redis::Client::open(url).expect("redis client");
    client.get_connection_manager().await.expect("connection manager")
}
