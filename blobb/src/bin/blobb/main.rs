mod commands;
mod context;
mod examples;
mod fixture;
mod output;
mod theme;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use blobb::{
    ConnectionManager, FollowGraphService, FollowGraphStore, MemoryGraphStore, MemoryUserDirectory,
    RedisGraphStore, RedisUserDirectory, UserRegistry,
};
use clap::{
    ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, RgbColor, Style},
    },
    error::ErrorKind,
};

use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};
use std::fmt::Write;
use std::io::{self, Write as IoWrite};

use commands::{
    graph::{Direction, ListArgs, PairArgs, handle_check, handle_follow, handle_list, handle_profile, handle_unfollow},
    user::{UserCommands, handle_user_commands},
};
use context::{Backend, ProjectContext};
use examples::{ExampleGroup, command_examples};
use fixture::Fixture;
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("REDIS_URL", "Redis connection URL for the redis backend"),
    ("RUST_LOG", "Log filter (defaults to 'warn', or 'debug' with --verbose)"),
];

#[derive(Parser)]
#[command(name = "blobb")]
#[command(version = "0.1.0")]
#[command(
    about = "Admin tool for the Blobb follow graph",
    long_about = r#"Admin tool for the Blobb follow graph that provides:

• User registration and lookup
• Idempotent follow / unfollow between users
• Paged follower and following listings
• Profile counters derived from the edge set

Commands:
  user        Register, show and search users
  follow      Follow a user
  unfollow    Unfollow a user
  following   List accounts a user follows
  followers   List accounts following a user
  profile     Show follower / following counts
  check       Check whether one user follows another
  purge       Delete every key in the configured Redis namespace
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to a config file (defaults to the nearest .blobb/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend, overriding the config file
    #[arg(long, value_enum, global = true)]
    backend: Option<Backend>,

    /// Redis connection URL, overriding the config file
    #[arg(long, env = "REDIS_URL", global = true, hide_env_values = true)]
    redis_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn parse_with_styles() -> Self {
        let command = build_cli_command();
        match command.styles(help_styles()).try_get_matches() {
            Ok(matches) => match Cli::from_arg_matches(&matches) {
                Ok(cli) => cli,
                Err(err) => err.exit(),
            },
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = print_blank_line_stdout();
                    if let Err(print_err) = err.print()
                        && print_err.kind() != io::ErrorKind::BrokenPipe
                    {
                        eprintln!("Failed to display help: {print_err}");
                    }
                    let _ = print_blank_line_stdout();
                    std::process::exit(0);
                }
                _ => {
                    let exit_code = err.exit_code();
                    let _ = print_blank_line_stderr();
                    if let Err(print_err) = err.print()
                        && print_err.kind() != io::ErrorKind::BrokenPipe
                    {
                        eprintln!("Failed to display error: {print_err}");
                    }
                    let _ = print_blank_line_stderr();
                    std::process::exit(exit_code);
                }
            },
        }
    }
}

fn build_cli_command() -> Command {
    let use_color = detect_color_support();
    let appendix = render_top_level_appendix(use_color);
    let mut command = Cli::command().after_long_help(appendix);
    command = command.color(if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    });
    attach_command_examples(&mut command, use_color);
    command
}

fn attach_command_examples(command: &mut Command, use_color: bool) {
    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            let help_text = render_examples(example.groups, use_color);
            let updated = subcommand.clone().after_long_help(help_text);
            *subcommand = updated;
        }
    }
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let theme = &THEME;
    let mut buffer = String::new();

    let heading = stylize("Examples:", theme.highlight, true, use_color);
    let _ = writeln!(buffer, "{heading}");

    for (index, group) in groups.iter().enumerate() {
        let title = stylize(group.title, theme.primary, true, use_color);
        let _ = writeln!(buffer, "  {title}");

        for command in group.commands {
            let arrow = stylize(ICONS.arrow, theme.secondary, false, use_color);
            let command_text = stylize(command, theme.secondary, false, use_color);
            let _ = writeln!(buffer, "    {arrow} {command_text}");
        }

        if index + 1 < groups.len() {
            buffer.push('\n');
        }
    }

    buffer
}

fn render_top_level_appendix(use_color: bool) -> String {
    let theme = &THEME;
    let mut buffer = String::new();

    let env_heading = stylize("Environment Variables:", theme.highlight, true, use_color);
    let _ = writeln!(buffer, "{env_heading}");
    for (key, description) in ENVIRONMENT_VARIABLES {
        let key_text = stylize(key, theme.key, true, use_color);
        let value_text = stylize(description, theme.value, false, use_color);
        let _ = writeln!(buffer, "  {key_text}  {value_text}");
    }

    buffer.push('\n');

    let tip_heading = stylize("Tip:", theme.highlight, true, use_color);
    let tip_text = stylize(
        "Use 'blobb <command> --help' to view examples for each command.",
        theme.secondary,
        false,
        use_color,
    );
    let _ = writeln!(buffer, "{tip_heading} {tip_text}");

    buffer
}

fn print_blank_line_stdout() -> io::Result<()> {
    let mut stdout = io::stdout();
    IoWrite::write_all(&mut stdout, b"\n")?;
    IoWrite::flush(&mut stdout)
}

fn print_blank_line_stderr() -> io::Result<()> {
    let mut stderr = io::stderr();
    IoWrite::write_all(&mut stderr, b"\n")?;
    IoWrite::flush(&mut stderr)
}

fn stylize(text: &str, color: ThemeColor, bold: bool, use_color: bool) -> String {
    if use_color {
        let styled = text.color(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    } else {
        text.to_string()
    }
}

fn detect_color_support() -> bool {
    ShouldColorize::from_env().should_colorize()
}

fn help_styles() -> Styles {
    let theme = &THEME;
    Styles::styled()
        .usage(style_from_color(theme.primary).bold())
        .header(style_from_color(theme.highlight).bold())
        .literal(style_from_color(theme.secondary))
        .placeholder(style_from_color(theme.muted))
        .valid(style_from_color(theme.success))
        .invalid(style_from_color(theme.warning))
        .error(style_from_color(theme.error).bold())
}

fn style_from_color(color: ThemeColor) -> Style {
    Style::new().fg_color(Some(color_to_clap_color(color)))
}

fn color_to_clap_color(color: ThemeColor) -> ClapColor {
    match color {
        ThemeColor::Black => ClapColor::Ansi(AnsiColor::Black),
        ThemeColor::Red => ClapColor::Ansi(AnsiColor::Red),
        ThemeColor::Green => ClapColor::Ansi(AnsiColor::Green),
        ThemeColor::Yellow => ClapColor::Ansi(AnsiColor::Yellow),
        ThemeColor::Blue => ClapColor::Ansi(AnsiColor::Blue),
        ThemeColor::Magenta => ClapColor::Ansi(AnsiColor::Magenta),
        ThemeColor::Cyan => ClapColor::Ansi(AnsiColor::Cyan),
        ThemeColor::White => ClapColor::Ansi(AnsiColor::White),
        ThemeColor::BrightBlack => ClapColor::Ansi(AnsiColor::BrightBlack),
        ThemeColor::BrightRed => ClapColor::Ansi(AnsiColor::BrightRed),
        ThemeColor::BrightGreen => ClapColor::Ansi(AnsiColor::BrightGreen),
        ThemeColor::BrightYellow => ClapColor::Ansi(AnsiColor::BrightYellow),
        ThemeColor::BrightBlue => ClapColor::Ansi(AnsiColor::BrightBlue),
        ThemeColor::BrightMagenta => ClapColor::Ansi(AnsiColor::BrightMagenta),
        ThemeColor::BrightCyan => ClapColor::Ansi(AnsiColor::BrightCyan),
        ThemeColor::BrightWhite => ClapColor::Ansi(AnsiColor::BrightWhite),
        ThemeColor::TrueColor { r, g, b } => ClapColor::Rgb(RgbColor(r, g, b)),
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Register, show and search users
    #[command(subcommand)]
    User(UserCommands),

    /// Make one user follow another
    Follow(PairArgs),

    /// Make one user stop following another
    Unfollow(PairArgs),

    /// List accounts a user follows
    Following(ListArgs),

    /// List accounts following a user
    Followers(ListArgs),

    /// Show follower and following counts
    Profile {
        /// User id or username
        user: String,
    },

    /// Check whether one user follows another
    Check(PairArgs),

    /// Delete every key in the configured Redis namespace
    Purge {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_with_styles();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let _ = print_blank_line_stdout();

    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    match execute(cli, &output).await {
        Ok(()) => {
            let _ = print_blank_line_stdout();
        }
        Err(err) => {
            output.error(&format!("{err:#}"));
            let _ = print_blank_line_stdout();
            std::process::exit(1);
        }
    }
}

async fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::load(cli.config.as_deref())?;
    if let Some(path) = &ctx.config_path {
        output.verbose(&format!("Using config {}", path.display()));
    }

    match cli.backend.unwrap_or(ctx.config.store.backend) {
        Backend::Memory => {
            let service = FollowGraphService::new(
                Arc::new(MemoryUserDirectory::new()),
                Arc::new(MemoryGraphStore::with_stripes(ctx.config.store.lock_stripes)),
            );
            match ctx.fixture_path() {
                Some(path) => {
                    let summary = Fixture::load(&path)?.apply(&service).await?;
                    output.verbose(&format!(
                        "Loaded {} users and {} follows from {}",
                        summary.users,
                        summary.follows,
                        path.display()
                    ));
                }
                None => output.verbose("Memory backend started without a fixture"),
            }
            dispatch(cli.command, &service, output).await
        }
        Backend::Redis => {
            let redis_url = match cli.redis_url {
                Some(url) => url,
                None => ctx
                    .redis_url()
                    .context("REDIS_URL environment variable not set. Set it to connect to Redis.")?,
            };
            let client = redis::Client::open(redis_url.as_str()).context("Failed to create Redis client")?;
            let conn = ConnectionManager::new(client)
                .await
                .context("Failed to connect to Redis")?;
            output.verbose("Connected to Redis");

            let settings = &ctx.config.redis;
            let store = RedisGraphStore::new(conn.clone(), &settings.prefix, &settings.service);
            if let Commands::Purge { yes } = cli.command {
                return handle_purge(&store, yes, output).await;
            }
            let directory = RedisUserDirectory::new(conn, &settings.prefix, &settings.service);
            let service = FollowGraphService::new(Arc::new(directory), Arc::new(store));
            dispatch(cli.command, &service, output).await
        }
    }
}

async fn dispatch<D, S>(command: Commands, service: &FollowGraphService<D, S>, output: &OutputManager) -> Result<()>
where
    D: UserRegistry,
    S: FollowGraphStore,
{
    match command {
        Commands::User(user_cmd) => handle_user_commands(user_cmd, service.directory(), output).await,
        Commands::Follow(args) => handle_follow(args, service, output).await,
        Commands::Unfollow(args) => handle_unfollow(args, service, output).await,
        Commands::Following(args) => handle_list(Direction::Following, args, service, output).await,
        Commands::Followers(args) => handle_list(Direction::Followers, args, service, output).await,
        Commands::Profile { user } => handle_profile(&user, service, output).await,
        Commands::Check(args) => handle_check(args, service, output).await,
        Commands::Purge { .. } => bail!("purge is only available with the redis backend"),
    }
}

async fn handle_purge(store: &RedisGraphStore, confirmed: bool, output: &OutputManager) -> Result<()> {
    let pattern = store.key_context().namespace_pattern();
    if !confirmed {
        output.warning(&format!("This deletes every key matching '{pattern}'."));
        output.info("Re-run with --yes to confirm.");
        return Ok(());
    }
    let deleted = store.purge_namespace().await?;
    output.success(&format!("Deleted {deleted} keys matching '{pattern}'"));
    Ok(())
}
