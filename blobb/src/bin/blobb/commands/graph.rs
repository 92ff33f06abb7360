use anyhow::Result;
use blobb::{DEFAULT_PAGE_LIMIT, FollowGraphService, FollowGraphStore, UserDirectory};
use clap::Args;

use super::resolve_user;
use crate::examples::ExampleGroup;
use crate::output::{OutputFormat, OutputManager, ProfileView, UserPage};
use crate::theme::ICONS;

pub const FOLLOW_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Follow Graph",
    commands: &[
        "blobb follow @alice @bob          # alice starts following bob",
        "blobb unfollow @alice @bob        # alice stops following bob",
        "blobb check @alice @bob           # does alice follow bob?",
    ],
}];

pub const LIST_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Paging",
    commands: &[
        "blobb following @alice                     # First page of accounts alice follows",
        "blobb followers @bob --skip 20 --limit 20  # Second page of bob's followers",
    ],
}];

/// Acting user and target of a follow mutation
#[derive(Args)]
pub struct PairArgs {
    /// Acting user (id or username)
    pub actor: String,

    /// Target user (id or username)
    pub target: String,
}

/// User whose adjacency is listed, plus the page window
#[derive(Args)]
pub struct ListArgs {
    /// User id or username
    pub user: String,

    /// Number of entries to skip
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub skip: i64,

    /// Maximum number of entries to return
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT as i64, allow_negative_numbers = true)]
    pub limit: i64,
}

#[derive(Clone, Copy)]
pub enum Direction {
    Following,
    Followers,
}

pub async fn handle_follow<D, S>(
    args: PairArgs,
    service: &FollowGraphService<D, S>,
    output: &OutputManager,
) -> Result<()>
where
    D: UserDirectory,
    S: FollowGraphStore,
{
    let actor = resolve_user(service.directory(), &args.actor).await?;
    let target = resolve_user(service.directory(), &args.target).await?;
    let created = service.follow(&actor, &target.id).await?;
    let message = if created {
        format!("@{} now follows @{}", actor.username, target.username)
    } else {
        format!("@{} already follows @{}", actor.username, target.username)
    };
    output.mutation(ICONS.follow, created, &message);
    Ok(())
}

pub async fn handle_unfollow<D, S>(
    args: PairArgs,
    service: &FollowGraphService<D, S>,
    output: &OutputManager,
) -> Result<()>
where
    D: UserDirectory,
    S: FollowGraphStore,
{
    let actor = resolve_user(service.directory(), &args.actor).await?;
    let target = resolve_user(service.directory(), &args.target).await?;
    let removed = service.unfollow(&actor, &target.id).await?;
    let message = if removed {
        format!("@{} no longer follows @{}", actor.username, target.username)
    } else {
        format!("@{} was not following @{}", actor.username, target.username)
    };
    output.mutation(ICONS.unfollow, removed, &message);
    Ok(())
}

pub async fn handle_list<D, S>(
    direction: Direction,
    args: ListArgs,
    service: &FollowGraphService<D, S>,
    output: &OutputManager,
) -> Result<()>
where
    D: UserDirectory,
    S: FollowGraphStore,
{
    let user = resolve_user(service.directory(), &args.user).await?;
    let users = match direction {
        Direction::Following => service.find_all_followed_by(&user.id, args.skip, args.limit).await?,
        Direction::Followers => service.find_all_following(&user.id, args.skip, args.limit).await?,
    };
    output.verbose(&format!("{} users on page skip={} limit={}", users.len(), args.skip, args.limit));
    output.display(&UserPage {
        skip: args.skip,
        limit: args.limit,
        users,
    })
}

pub async fn handle_profile<D, S>(
    reference: &str,
    service: &FollowGraphService<D, S>,
    output: &OutputManager,
) -> Result<()>
where
    D: UserDirectory,
    S: FollowGraphStore,
{
    let user = resolve_user(service.directory(), reference).await?;
    let info = service.get_user_profile_info(&user.id).await?;
    output.display(&ProfileView {
        id: user.id.as_str(),
        username: &user.username,
        info,
    })
}

pub async fn handle_check<D, S>(
    args: PairArgs,
    service: &FollowGraphService<D, S>,
    output: &OutputManager,
) -> Result<()>
where
    D: UserDirectory,
    S: FollowGraphStore,
{
    let follower = resolve_user(service.directory(), &args.actor).await?;
    let followee = resolve_user(service.directory(), &args.target).await?;
    let follows = service.is_following(&follower.id, &followee.id).await?;
    if matches!(output.options.output_format, OutputFormat::Json) {
        println!("{}", serde_json::json!({ "follows": follows }));
    } else if follows {
        output.success(&format!("@{} follows @{}", follower.username, followee.username));
    } else {
        output.info(&format!("@{} does not follow @{}", follower.username, followee.username));
    }
    Ok(())
}
