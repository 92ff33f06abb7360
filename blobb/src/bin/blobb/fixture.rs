use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result, anyhow};
use blobb::{FollowGraphService, FollowGraphStore, NewUser, User, UserRegistry};
use serde::Deserialize;

/// Seed data for the memory backend.
///
/// ```toml
/// [[users]]
/// username = "alice"
/// email = "alice@example.com"
/// display_name = "Alice"
///
/// [[follows]]
/// follower = "alice"
/// followee = "bob"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<NewUser>,
    #[serde(default)]
    pub follows: Vec<FixtureFollow>,
}

/// A follow between two fixture users, by username.
#[derive(Debug, Deserialize)]
pub struct FixtureFollow {
    pub follower: String,
    pub followee: String,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read fixture {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse fixture {}", path.display()))
    }

    /// Registers every user, then replays the follows in file order.
    pub async fn apply<D, S>(self, service: &FollowGraphService<D, S>) -> Result<FixtureSummary>
    where
        D: UserRegistry,
        S: FollowGraphStore,
    {
        let mut by_username: HashMap<String, User> = HashMap::new();
        for new_user in self.users {
            let username = new_user.username.clone();
            let user = service
                .directory()
                .register(new_user)
                .await
                .with_context(|| format!("Failed to register fixture user '{username}'"))?;
            by_username.insert(username, user);
        }

        let mut follows = 0;
        for follow in self.follows {
            let follower = by_username
                .get(&follow.follower)
                .ok_or_else(|| anyhow!("Fixture follow references unknown user '{}'", follow.follower))?;
            let followee = by_username
                .get(&follow.followee)
                .ok_or_else(|| anyhow!("Fixture follow references unknown user '{}'", follow.followee))?;
            if service.follow(follower, &followee.id).await? {
                follows += 1;
            }
        }

        Ok(FixtureSummary {
            users: by_username.len(),
            follows,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSummary {
    pub users: usize,
    pub follows: usize,
}
