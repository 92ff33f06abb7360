use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{GraphError, GraphResult, ValidationError, ValidationIssue},
    validators::{is_valid_email, is_valid_username},
};

/// Default page size used by callers that do not pass an explicit limit.
pub const DEFAULT_PAGE_LIMIT: u64 = 20;
/// Maximum display name length, in characters.
pub const MAX_DISPLAY_NAME_LEN: usize = 64;
/// Maximum bio length, in characters.
pub const MAX_BIO_LEN: usize = 300;

/// Opaque, immutable user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A registered user as resolved by a [`crate::directory::UserDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    pub created_at: DateTime<Utc>,
}

/// Registration payload. The directory assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
        bio: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            display_name: display_name.into(),
            bio: bio.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        if !is_valid_username(&self.username) {
            issues.push(ValidationIssue::new(
                "username",
                "username.format",
                "username must be 1-32 letters, digits or underscores",
            ));
        }
        if !is_valid_email(&self.email) {
            issues.push(ValidationIssue::new("email", "email.format", "email address is not valid"));
        }
        let display_len = self.display_name.chars().count();
        if display_len == 0 || display_len > MAX_DISPLAY_NAME_LEN {
            issues.push(ValidationIssue::new(
                "display_name",
                "length.range",
                format!("display name must be between 1 and {MAX_DISPLAY_NAME_LEN} characters"),
            ));
        }
        if self.bio.chars().count() > MAX_BIO_LEN {
            issues.push(ValidationIssue::new(
                "bio",
                "length.max",
                format!("bio must be at most {MAX_BIO_LEN} characters"),
            ));
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }

    pub fn into_user(self, id: UserId, created_at: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            display_name: self.display_name,
            bio: self.bio,
            created_at,
        }
    }
}

/// Directed follow relationship: `follower` follows `followee`.
///
/// Construction rejects self-loops, so a `FollowEdge` value never describes one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    follower: UserId,
    followee: UserId,
}

impl FollowEdge {
    pub fn new(follower: &UserId, followee: &UserId) -> GraphResult<Self> {
        if follower == followee {
            return Err(GraphError::invalid_argument(format!("user {follower} cannot follow themselves")));
        }
        Ok(Self {
            follower: follower.clone(),
            followee: followee.clone(),
        })
    }

    pub fn follower(&self) -> &UserId {
        &self.follower
    }

    pub fn followee(&self) -> &UserId {
        &self.followee
    }
}

/// Aggregate follow counters for one user, always derived from the edge set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    /// Number of users following this user.
    pub followers: u64,
    /// Number of users this user follows.
    pub follows: u64,
}

/// Validated pagination window `[skip, skip + limit)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    skip: u64,
    limit: u64,
}

impl Page {
    pub fn new(skip: i64, limit: i64) -> GraphResult<Self> {
        if skip < 0 {
            return Err(GraphError::invalid_argument(format!("skip must not be negative (got {skip})")));
        }
        if limit <= 0 {
            return Err(GraphError::invalid_argument(format!("limit must be positive (got {limit})")));
        }
        Ok(Self {
            skip: skip as u64,
            limit: limit as u64,
        })
    }

    pub fn first(limit: u64) -> GraphResult<Self> {
        let limit = i64::try_from(limit).map_err(|_| GraphError::invalid_argument("limit is too large"))?;
        Self::new(0, limit)
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// The page immediately after this one, with the same limit.
    pub fn next(&self) -> Self {
        Self {
            skip: self.skip.saturating_add(self.limit),
            limit: self.limit,
        }
    }

    /// Applies the window to an already ordered sequence.
    pub fn apply<I>(&self, items: I) -> Vec<I::Item>
    where
        I: IntoIterator,
    {
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(limit).collect()
    }
}
