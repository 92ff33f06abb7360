use chrono::Utc;
use redis::{aio::ConnectionManager, cmd};

use super::{UserDirectory, UserRegistry};
use crate::{
    errors::{GraphError, GraphResult},
    id::generate_user_id,
    keys::KeyContext,
    runtime::scripts::REGISTER_USER_SCRIPT,
    types::{NewUser, User, UserId},
    validators::{is_valid_username, normalize_username},
};

/// User directory backed by Redis string keys holding JSON records.
#[derive(Clone)]
pub struct RedisUserDirectory {
    conn: ConnectionManager,
    prefix: String,
    service: String,
}

impl RedisUserDirectory {
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

    fn decode(json: &str) -> GraphResult<User> {
        Ok(serde_json::from_str(json)?)
    }

    async fn load_many(&self, keys: Vec<String>) -> GraphResult<Vec<Option<User>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let raw: Vec<Option<String>> = cmd("MGET").arg(&keys).query_async(&mut conn).await?;
        raw.into_iter()
            .map(|json| json.as_deref().map(Self::decode).transpose())
            .collect()
    }
}

impl UserDirectory for RedisUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> GraphResult<User> {
        let key = self.key_context().user(id.as_str());
        let mut conn = self.conn.clone();
        let json: Option<String> = cmd("GET").arg(&key).query_async(&mut conn).await?;
        match json {
            Some(json) => Self::decode(&json),
            None => Err(GraphError::user_not_found(id)),
        }
    }

    async fn exists(&self, id: &UserId) -> GraphResult<bool> {
        let key = self.key_context().user(id.as_str());
        let mut conn = self.conn.clone();
        let exists: i64 = cmd("EXISTS").arg(&key).query_async(&mut conn).await?;
        Ok(exists == 1)
    }

    async fn find_by_username(&self, username: &str) -> GraphResult<Option<User>> {
        if !is_valid_username(username) {
            return Ok(None);
        }
        let index_key = self.key_context().username_index(&normalize_username(username));
        let mut conn = self.conn.clone();
        let id: Option<String> = cmd("GET").arg(&index_key).query_async(&mut conn).await?;
        let Some(id) = id else {
            return Ok(None);
        };
        match self.find_by_id(&UserId::from(id)).await {
            Ok(user) => Ok(Some(user)),
            Err(GraphError::UserNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn find_all_by_username_containing(&self, fragment: &str) -> GraphResult<Vec<User>> {
        // Usernames never contain glob metacharacters, so a fragment that is not
        // a valid username cannot match anything.
        if !fragment.is_empty() && !is_valid_username(fragment) {
            return Ok(Vec::new());
        }
        const SCAN_COUNT: usize = 1000;
        let ctx = self.key_context();
        let pattern = ctx.username_index(&format!("*{}*", normalize_username(fragment)));
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut index_keys = Vec::new();
        loop {
            let (next_cursor, batch): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await?;
            index_keys.extend(batch);
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        // SCAN may return a key more than once.
        index_keys.sort();
        index_keys.dedup();
        if index_keys.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Option<String>> = cmd("MGET").arg(&index_keys).query_async(&mut conn).await?;
        let user_keys = ids.into_iter().flatten().map(|id| ctx.user(&id)).collect();
        let mut users: Vec<User> = self.load_many(user_keys).await?.into_iter().flatten().collect();
        users.sort_by_key(|user| normalize_username(&user.username));
        Ok(users)
    }

    async fn find_all_by_ids(&self, ids: &[UserId]) -> GraphResult<Vec<User>> {
        let ctx = self.key_context();
        let keys = ids.iter().map(|id| ctx.user(id.as_str())).collect();
        let loaded = self.load_many(keys).await?;
        Ok(ids
            .iter()
            .zip(loaded)
            .filter_map(|(id, user)| {
                if user.is_none() {
                    log::warn!("skipping unresolvable user id {id}");
                }
                user
            })
            .collect())
    }
}

impl UserRegistry for RedisUserDirectory {
    async fn register(&self, new_user: NewUser) -> GraphResult<User> {
        new_user.validate()?;
        let user = new_user.into_user(generate_user_id(), Utc::now());
        let payload = serde_json::to_string(&user)?;

        let ctx = self.key_context();
        let mut invocation = REGISTER_USER_SCRIPT.prepare_invoke();
        invocation
            .key(ctx.username_index(&normalize_username(&user.username)))
            .key(ctx.user(user.id.as_str()))
            .arg(user.id.as_str())
            .arg(payload);
        let mut conn = self.conn.clone();
        let registered: i64 = invocation.invoke_async(&mut conn).await?;
        if registered == 0 {
            return Err(GraphError::UsernameTaken {
                username: user.username,
            });
        }
        log::debug!("registered user {} ({})", user.id, user.username);
        Ok(user)
    }
}
