//! Command definitions for the FocusTools CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::net::IpAddr;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use crate::server::DEFAULT_PORT;
use crate::settings::{BREAK_MINUTES_RANGE, WORK_MINUTES_RANGE};
use crate::types::{SessionSortField, SortOrder, TaskSortField};

use super::client::DEFAULT_SERVER_URL;

// ============================================================================
// CLI Structure
// ============================================================================

/// FocusTools - task list and focus timer
#[derive(Parser, Debug)]
#[command(
    name = "focustools",
    version,
    about = "Task list with a Pomodoro focus timer",
    long_about = "Keeps a task list, logs focus sessions and runs a Pomodoro timer in the terminal.\n\
                  `focustools serve` hosts the REST API; the other commands talk to it.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the FocusTools server
    #[arg(long, global = true, env = "FOCUSTOOLS_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the REST API server
    Serve(ServeArgs),

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Log and list focus sessions
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Show productivity stats
    Stats,

    /// Run an interactive focus timer
    Timer(TimerArgs),

    /// Show or change timer settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments for the serve command
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// SQLite database file (defaults to the user data directory)
    #[arg(long, env = "FOCUSTOOLS_DB")]
    pub db: Option<PathBuf>,
}

/// Arguments for the timer command
#[derive(Args, Debug, Clone, Default)]
pub struct TimerArgs {
    /// Task to credit completed focus intervals to
    #[arg(short, long)]
    pub task: Option<String>,
}

// ============================================================================
// Task Commands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// Add a task
    Add {
        /// Task title
        #[arg(value_parser = validate_title)]
        title: String,
    },

    /// List tasks
    List(TaskListArgs),

    /// Show one task
    Show { id: String },

    /// Change fields of a task
    #[command(group(
        ArgGroup::new("changes")
            .required(true)
            .multiple(true)
            .args(["title", "completed", "pomodoros"])
    ))]
    Edit {
        id: String,

        /// New title
        #[arg(long, value_parser = validate_title)]
        title: Option<String>,

        /// New completion flag
        #[arg(long)]
        completed: Option<bool>,

        /// New pomodoro count
        #[arg(long)]
        pomodoros: Option<u32>,
    },

    /// Rename a task (skipped when the title is unchanged)
    Rename { id: String, title: String },

    /// Flip a task's completion flag
    Toggle { id: String },

    /// Delete a task
    Delete { id: String },

    /// Find tasks whose title contains the query, ignoring case
    Search { query: String },

    /// Show the sessions logged for a task
    History { id: String },
}

/// Arguments for `task list`
#[derive(Args, Debug, Clone, Default)]
pub struct TaskListArgs {
    /// Only tasks with this completion flag
    #[arg(long)]
    pub completed: Option<bool>,

    /// Sort field (title, completed, pomodoroCount, createdAt, updatedAt)
    #[arg(long, value_parser = parse_task_sort_field)]
    pub sort_by: Option<TaskSortField>,

    /// Sort direction
    #[arg(long, value_enum, default_value_t = OrderArg::Asc)]
    pub order: OrderArg,
}

// ============================================================================
// Session Commands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// Log a session by hand
    Log {
        task_id: String,

        /// Length in seconds
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        duration: u32,

        /// Start time (RFC 3339); defaults to `duration` seconds ago
        #[arg(long)]
        start: Option<DateTime<Utc>>,

        /// Record the session as abandoned
        #[arg(long)]
        aborted: bool,
    },

    /// List sessions
    List {
        /// Sort field (taskId, duration, startTime or date, completed, createdAt, updatedAt)
        #[arg(long, value_parser = parse_session_sort_field)]
        sort_by: Option<SessionSortField>,

        /// Sort direction
        #[arg(long, value_enum, default_value_t = OrderArg::Asc)]
        order: OrderArg,
    },
}

// ============================================================================
// Settings Commands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Show the current settings
    Show,

    /// Change settings
    #[command(group(
        ArgGroup::new("changes")
            .required(true)
            .multiple(true)
            .args(["work", "break_minutes", "sound"])
    ))]
    Set {
        /// Work duration in minutes (1-60)
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u32).range(i64::from(WORK_MINUTES_RANGE.0)..=i64::from(WORK_MINUTES_RANGE.1))
        )]
        work: Option<u32>,

        /// Break duration in minutes (1-30)
        #[arg(
            short,
            long = "break",
            value_parser = clap::value_parser!(u32).range(i64::from(BREAK_MINUTES_RANGE.0)..=i64::from(BREAK_MINUTES_RANGE.1))
        )]
        break_minutes: Option<u32>,

        /// Play the notification cue when a phase ends
        #[arg(long)]
        sound: Option<bool>,
    },

    /// Restore the defaults
    Reset,
}

// ============================================================================
// Sort Order
// ============================================================================

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderArg {
    #[default]
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a task title: must not be blank.
fn validate_title(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("title must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

fn parse_task_sort_field(s: &str) -> Result<TaskSortField, String> {
    TaskSortField::parse(s).ok_or_else(|| format!("unknown task field '{}'", s))
}

fn parse_session_sort_field(s: &str) -> Result<SessionSortField, String> {
    SessionSortField::parse(s).ok_or_else(|| format!("unknown session field '{}'", s))
}

// ============================================================================
// Tests
// ============================================================================
