use anyhow::Result;
use blobb::{NewUser, UserDirectory, UserRegistry};
use clap::Subcommand;

use super::resolve_user;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, UserCard, UserPage};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Register",
        commands: &[
            "blobb user add --username alice --email alice@example.com --display-name Alice",
            "blobb user add --username bob --email bob@example.com --display-name Bob --bio \"hi\"",
        ],
    },
    ExampleGroup {
        title: "Lookup",
        commands: &[
            "blobb user show @alice            # Look up by username",
            "blobb user search ali             # Usernames containing 'ali'",
        ],
    },
];

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    #[command(name = "add")]
    Add {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        display_name: String,

        #[arg(long, default_value = "")]
        bio: String,
    },

    /// Show a user by id or username
    #[command(name = "show")]
    Show {
        /// User id or username
        user: String,
    },

    /// Find users whose username contains a fragment
    #[command(name = "search")]
    Search {
        /// Case-insensitive username fragment
        fragment: String,
    },
}

pub async fn handle_user_commands<D>(command: UserCommands, directory: &D, output: &OutputManager) -> Result<()>
where
    D: UserRegistry,
{
    match command {
        UserCommands::Add {
            username,
            email,
            display_name,
            bio,
        } => {
            let user = directory.register(NewUser::new(username, email, display_name, bio)).await?;
            output.success(&format!("Registered @{} ({})", user.username, user.id));
            output.display(&UserCard { user: &user })?;
        }
        UserCommands::Show { user } => {
            let user = resolve_user(directory, &user).await?;
            output.display(&UserCard { user: &user })?;
        }
        UserCommands::Search { fragment } => {
            let users = directory.find_all_by_username_containing(&fragment).await?;
            if users.is_empty() {
                output.warning(&format!("No usernames contain '{fragment}'"));
            }
            let limit = users.len() as i64;
            output.display(&UserPage { skip: 0, limit, users })?;
        }
    }
    Ok(())
}
