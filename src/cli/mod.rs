//! CLI module for FocusTools.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `client`: HTTP client for the REST API
//! - `display`: Output formatting and display logic
//! - `focus`: Interactive focus timer session

pub mod client;
pub mod commands;
pub mod display;
pub mod focus;

pub use client::{ApiClient, ClientError, DEFAULT_SERVER_URL};
pub use commands::{
    Cli, Commands, OrderArg, ServeArgs, SessionCommand, SettingsCommand, TaskCommand,
    TaskListArgs, TimerArgs,
};
pub use display::Display;
pub use focus::{FocusBackend, FocusCommand, FocusSession};
