use std::{borrow::Cow, sync::PoisonError};

use thiserror::Error;

use crate::types::UserId;

/// Top-level error type returned by the follow-graph core.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Requested or target user id does not resolve in the directory.
    #[error("user {user_id} not found")]
    UserNotFound { user_id: UserId },

    /// Self-targeting action or out-of-range pagination.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: Cow<'static, str> },

    /// A registration payload failed field validation.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// Username is already claimed by another user.
    #[error("username '{username}' is already taken")]
    UsernameTaken { username: String },

    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other storage-level failure.
    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl<T> From<PoisonError<T>> for GraphError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Other {
            message: Cow::Borrowed("in-memory store lock poisoned"),
        }
    }
}

/// Coarse classification of [`GraphError`] for callers deciding on retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UserNotFound,
    InvalidArgument,
    Infrastructure,
}

impl GraphError {
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn user_not_found(user_id: &UserId) -> Self {
        Self::UserNotFound {
            user_id: user_id.clone(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound { .. } => ErrorKind::UserNotFound,
            Self::InvalidArgument { .. } | Self::Validation(_) | Self::UsernameTaken { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::Redis(_) | Self::Serialization(_) | Self::Other { .. } => ErrorKind::Infrastructure,
        }
    }

    /// Infrastructure failures are the only errors a caller may retry.
    pub fn is_infrastructure(&self) -> bool {
        self.kind() == ErrorKind::Infrastructure
    }
}

/// Collection of validation issues found in a registration payload.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
