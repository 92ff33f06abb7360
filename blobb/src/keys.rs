/// Redis key layout for users and follow edges.
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
    pub service: &'a str,
}

/// Relation alias under which follow edges are stored.
pub const FOLLOWS_ALIAS: &str = "follows";
const USERS_COLLECTION: &str = "users";

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str, service: &'a str) -> Self {
        Self { prefix, service }
    }

    pub fn user(&self, user_id: &str) -> String {
        format!("{}:{}:{}:{}", self.prefix, self.service, USERS_COLLECTION, user_id)
    }

    /// Maps a lowercased username to the owning user id.
    pub fn username_index(&self, normalized_username: &str) -> String {
        format!(
            "{}:{}:{}:unique:username:{}",
            self.prefix, self.service, USERS_COLLECTION, normalized_username
        )
    }

    /// Sorted set of followees of `follower_id`, scored by edge sequence.
    pub fn follows(&self, follower_id: &str) -> String {
        self.relation(FOLLOWS_ALIAS, follower_id)
    }

    /// Sorted set of followers of `followee_id`, scored by edge sequence.
    pub fn follows_reverse(&self, followee_id: &str) -> String {
        self.relation_reverse(FOLLOWS_ALIAS, followee_id)
    }

    pub fn follows_sequence(&self) -> String {
        format!("{}:{}:seq:{}", self.prefix, self.service, FOLLOWS_ALIAS)
    }

    pub fn relation(&self, alias: &str, left_id: &str) -> String {
        format!("{}:{}:rel:{}:{}", self.prefix, self.service, alias, left_id)
    }

    pub fn relation_reverse(&self, alias: &str, right_id: &str) -> String {
        format!("{}:{}:rel:{}_reverse:{}", self.prefix, self.service, alias, right_id)
    }

    /// Glob matching every key written under this prefix.
    pub fn namespace_pattern(&self) -> String {
        format!("{}:*", self.prefix)
    }
}
