pub mod graph;
pub mod user;

use anyhow::{Result, bail};
use blobb::{GraphError, User, UserDirectory, UserId};

/// Resolves a CLI user argument: an id first, then a username (with or without `@`).
pub async fn resolve_user<D>(directory: &D, reference: &str) -> Result<User>
where
    D: UserDirectory,
{
    let username = reference.strip_prefix('@').unwrap_or(reference);
    if username.len() == reference.len() {
        match directory.find_by_id(&UserId::from(reference)).await {
            Ok(user) => return Ok(user),
            Err(GraphError::UserNotFound { .. }) => {}
            Err(err) => return Err(err.into()),
        }
    }
    match directory.find_by_username(username).await? {
        Some(user) => Ok(user),
        None => bail!("No user matches '{reference}'"),
    }
}
