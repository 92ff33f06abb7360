use anyhow::Result;
use blobb::{ProfileInfo, User};
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;

use crate::theme::{ICONS, THEME};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    /// Display a success message with color and icon
    pub fn success(&self, message: &str) {
        self.line(ICONS.success, message, THEME.success);
    }

    /// Display an error message with color and icon
    pub fn error(&self, message: &str) {
        let output = if self.options.no_color {
            format!("{} {message}", ICONS.error)
        } else {
            format!("{} {}", ICONS.error.color(THEME.error), message.color(THEME.error))
        };
        eprintln!("{output}");
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        self.line(ICONS.warning, message, THEME.warning);
    }

    /// Display info message with color and icon
    pub fn info(&self, message: &str) {
        self.line(ICONS.info, message, THEME.info);
    }

    /// Display verbose information (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.arrow)
            } else {
                format!("{} {}", ICONS.arrow.color(THEME.muted), message.color(THEME.muted))
            };
            eprintln!("{output}");
        }
    }

    /// Display the outcome of a follow or unfollow mutation
    pub fn mutation(&self, icon: &str, changed: bool, message: &str) {
        if self.options.quiet {
            return;
        }
        if matches!(self.options.output_format, OutputFormat::Json) {
            println!("{}", serde_json::json!({ "changed": changed }));
            return;
        }
        let color = if changed { THEME.success } else { THEME.muted };
        self.line(icon, message, color);
    }

    fn line(&self, icon: &str, message: &str, color: colored::Color) {
        if self.options.quiet || matches!(self.options.output_format, OutputFormat::Json) {
            return;
        }
        let output = if self.options.no_color {
            format!("{icon} {message}")
        } else {
            format!("{} {}", icon.color(color), message.color(color))
        };
        println!("{output}");
    }
}

fn themed_table(options: &GlobalOptions, headers: &[&str]) -> Table {
    let mut table = Table::new();
    if options.no_color {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    } else {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    }
    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        })
        .collect();
    table.set_header(header_cells);
    table
}

/// One page of users, rendered with its paging window
#[derive(Serialize)]
pub struct UserPage {
    pub skip: i64,
    pub limit: i64,
    pub users: Vec<User>,
}

impl TableDisplay for UserPage {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["#", "ID", "Username", "Display name"]);
        if self.users.is_empty() {
            table.add_row(vec![Cell::new("-"), Cell::new("No users on this page")]);
            return table;
        }
        for (offset, user) in self.users.iter().enumerate() {
            table.add_row(vec![
                Cell::new(self.skip + offset as i64 + 1),
                Cell::new(&user.id),
                Cell::new(format!("@{}", user.username)),
                Cell::new(&user.display_name),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let names: Vec<String> = self.users.iter().map(|user| format!("@{}", user.username)).collect();
        format!("[{}..{}] {}", self.skip, self.skip + self.users.len() as i64, names.join(" "))
    }
}

/// A single user record
#[derive(Serialize)]
pub struct UserCard<'a> {
    #[serde(flatten)]
    pub user: &'a User,
}

impl TableDisplay for UserCard<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Field", "Value"]);
        let user = self.user;
        table.add_row(vec![Cell::new("ID"), Cell::new(&user.id)]);
        table.add_row(vec![Cell::new("Username"), Cell::new(format!("@{}", user.username))]);
        table.add_row(vec![Cell::new("Email"), Cell::new(&user.email)]);
        table.add_row(vec![Cell::new("Display name"), Cell::new(&user.display_name)]);
        table.add_row(vec![Cell::new("Bio"), Cell::new(&user.bio)]);
        table.add_row(vec![
            Cell::new("Created"),
            Cell::new(user.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        format!("{} @{}", self.user.id, self.user.username)
    }
}

/// Follower/following counters for one user
#[derive(Serialize)]
pub struct ProfileView<'a> {
    pub id: &'a str,
    pub username: &'a str,
    #[serde(flatten)]
    pub info: ProfileInfo,
}

impl TableDisplay for ProfileView<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["User", "Followers", "Follows"]);
        table.add_row(vec![
            Cell::new(format!("@{}", self.username)),
            Cell::new(self.info.followers),
            Cell::new(self.info.follows),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        format!(
            "@{} followers={} follows={}",
            self.username, self.info.followers, self.info.follows
        )
    }
}
