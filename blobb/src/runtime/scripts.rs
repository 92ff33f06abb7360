use redis::Script;
use std::sync::LazyLock;

pub const FOLLOW_EDGE_SCRIPT_BODY: &str = include_str!("../../lua/follow_edge.lua");
pub const UNFOLLOW_EDGE_SCRIPT_BODY: &str = include_str!("../../lua/unfollow_edge.lua");
pub const REGISTER_USER_SCRIPT_BODY: &str = include_str!("../../lua/register_user.lua");

pub static FOLLOW_EDGE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(FOLLOW_EDGE_SCRIPT_BODY));
pub static UNFOLLOW_EDGE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(UNFOLLOW_EDGE_SCRIPT_BODY));
pub static REGISTER_USER_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(REGISTER_USER_SCRIPT_BODY));
