//! FocusTools CLI - task list with a Pomodoro focus timer
//!
//! `focustools serve` hosts the REST API over a local SQLite database; the
//! other subcommands are clients of that API:
//! - Task and session management
//! - Productivity stats
//! - An interactive focus timer that credits completed intervals to a task

use std::net::SocketAddr;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;

use focustools::cli::{
    ApiClient, Cli, Commands, Display, FocusSession, ServeArgs, SessionCommand, SettingsCommand,
    TaskCommand, TimerArgs,
};
use focustools::settings::{Settings, SettingsStore};
use focustools::store::Database;
use focustools::types::{TaskListOptions, TaskUpdate};
use focustools::{server, sound};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(default_filter(&cli));

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Log level used when `RUST_LOG` is not set.
fn default_filter(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if matches!(cli.command, Some(Commands::Serve(_))) {
        "info"
    } else {
        "warn"
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(default: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await?,
        Some(Commands::Task { command }) => {
            let client = ApiClient::new(&cli.server)?;
            run_task_command(&client, command).await?;
        }
        Some(Commands::Session { command }) => {
            let client = ApiClient::new(&cli.server)?;
            run_session_command(&client, command).await?;
        }
        Some(Commands::Stats) => {
            let client = ApiClient::new(&cli.server)?;
            Display::show_stats(&client.stats().await?);
        }
        Some(Commands::Timer(args)) => run_timer(&cli.server, args).await?,
        Some(Commands::Settings { command }) => run_settings_command(command)?,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> Result<()> {
    let path = match args.db {
        Some(path) => path,
        None => Database::default_path()?,
    };
    let db = Database::open(&path)
        .with_context(|| format!("cannot open database {}", path.display()))?;

    let addr = SocketAddr::new(args.bind, args.port);
    server::run(addr, db)
        .await
        .with_context(|| format!("server on {} failed", addr))
}

async fn run_task_command(client: &ApiClient, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add { title } => {
            Display::show_task_created(&client.create_task(&title).await?);
        }
        TaskCommand::List(args) => {
            let options = TaskListOptions {
                completed: args.completed,
                sort: args.sort_by.map(|field| (field, args.order.into())),
            };
            Display::show_tasks(&client.list_tasks(&options).await?);
        }
        TaskCommand::Show { id } => Display::show_task(&client.get_task(&id).await?),
        TaskCommand::Edit {
            id,
            title,
            completed,
            pomodoros,
        } => {
            let update = TaskUpdate {
                title,
                completed,
                pomodoro_count: pomodoros,
            };
            Display::show_task_updated(&client.update_task(&id, &update).await?);
        }
        TaskCommand::Rename { id, title } => match client.rename_task(&id, &title).await? {
            Some(task) => Display::show_task_updated(&task),
            None => Display::show_rename_skipped(),
        },
        TaskCommand::Toggle { id } => {
            Display::show_task_updated(&client.toggle_task(&id).await?);
        }
        TaskCommand::Delete { id } => {
            Display::show_task_deleted(&client.delete_task(&id).await?.task);
        }
        TaskCommand::Search { query } => Display::show_tasks(&client.search_tasks(&query).await?),
        TaskCommand::History { id } => Display::show_sessions(&client.task_sessions(&id).await?),
    }
    Ok(())
}

async fn run_session_command(client: &ApiClient, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Log {
            task_id,
            duration,
            start,
            aborted,
        } => {
            let start = start
                .unwrap_or_else(|| Utc::now() - chrono::Duration::seconds(i64::from(duration)));
            let session = client
                .log_session(&task_id, duration, start, !aborted)
                .await?;
            Display::show_session_logged(&session);
        }
        SessionCommand::List { sort_by, order } => {
            let sort = sort_by.map(|field| (field, order.into()));
            Display::show_sessions(&client.list_sessions(sort).await?);
        }
    }
    Ok(())
}

async fn run_timer(server_url: &str, args: TimerArgs) -> Result<()> {
    let client = ApiClient::new(server_url)?;
    let store = SettingsStore::from_env()?;
    let settings = store.load();

    let mut session = FocusSession::new(client, settings, Some(store));
    if let Some(player) = sound::try_create_player() {
        session = session.with_sound_player(player);
    }
    if let Some(task_id) = args.task {
        session.select_task(&task_id).await;
    }

    session.run(BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

fn run_settings_command(command: SettingsCommand) -> Result<()> {
    let store = SettingsStore::from_env()?;
    let settings = match command {
        SettingsCommand::Show => store.load(),
        SettingsCommand::Set {
            work,
            break_minutes,
            sound,
        } => {
            let mut settings = store.load();
            if let Some(minutes) = work {
                settings = settings.with_work_minutes(minutes);
            }
            if let Some(minutes) = break_minutes {
                settings = settings.with_break_minutes(minutes);
            }
            if let Some(enabled) = sound {
                settings = settings.with_sound_enabled(enabled);
            }
            store.save(&settings)?;
            settings
        }
        SettingsCommand::Reset => {
            let settings = Settings::default();
            store.save(&settings)?;
            settings
        }
    };
    Display::show_settings(&settings, store.path());
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_warn() {
        let cli = Cli::parse_from(["focustools", "stats"]);
        assert_eq!(default_filter(&cli), "warn");
    }

    #[test]
    fn test_default_filter_serve_is_info() {
        let cli = Cli::parse_from(["focustools", "serve"]);
        assert_eq!(default_filter(&cli), "info");
    }

    #[test]
    fn test_default_filter_verbose_wins() {
        let cli = Cli::parse_from(["focustools", "-v", "serve"]);
        assert_eq!(default_filter(&cli), "debug");
    }

    #[test]
    fn test_cli_command_is_consistent() {
        Cli::command().debug_assert();
    }
}
