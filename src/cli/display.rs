//! Display utilities for the FocusTools CLI.
//!
//! This module provides formatted output for:
//! - Task and session listings
//! - Stats and settings
//! - The interactive timer status line
//! - Error messages

use std::io::Write;
use std::path::Path;

use crate::settings::Settings;
use crate::timer::ProgressRing;
use crate::types::{PopulatedSession, Session, Stats, Task, TimerPhase, TimerState};

/// Progress bar glyphs of the timer status line.
const BAR_FILLED: char = '#';
const BAR_EMPTY: char = '.';

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    // ------------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------------

    /// Shows a single task with its details.
    pub fn show_task(task: &Task) {
        println!("{}", Self::task_line(task));
        println!("  id:         {}", task.id);
        println!("  pomodoros:  {}", task.pomodoro_count);
        println!("  created:    {}", task.created_at.to_rfc3339());
        println!("  updated:    {}", task.updated_at.to_rfc3339());
    }

    pub fn show_task_created(task: &Task) {
        println!("* Added task: {}", task.title);
        println!("  id: {}", task.id);
    }

    pub fn show_task_updated(task: &Task) {
        println!("* Updated: {}", Self::task_line(task));
    }

    pub fn show_task_deleted(task: &Task) {
        println!("* Deleted task: {}", task.title);
    }

    pub fn show_rename_skipped() {
        println!("Title unchanged; nothing to save");
    }

    /// Shows a list of tasks, one per line.
    pub fn show_tasks(tasks: &[Task]) {
        if tasks.is_empty() {
            println!("No tasks");
            return;
        }
        for task in tasks {
            println!("{}  {}", Self::task_line(task), task.id);
        }
    }

    /// Formats a task as `[x] title (N pomodoros)`.
    pub fn task_line(task: &Task) -> String {
        let mark = if task.completed { 'x' } else { ' ' };
        let unit = if task.pomodoro_count == 1 {
            "pomodoro"
        } else {
            "pomodoros"
        };
        format!(
            "[{}] {} ({} {})",
            mark, task.title, task.pomodoro_count, unit
        )
    }

    // ------------------------------------------------------------------------
    // Sessions / Stats
    // ------------------------------------------------------------------------

    pub fn show_session_logged(session: &Session) {
        let (minutes, seconds) = Self::format_time(session.duration);
        let outcome = if session.completed {
            "completed"
        } else {
            "aborted"
        };
        println!(
            "* Logged {}:{:02} {} session for task {}",
            minutes, seconds, outcome, session.task_id
        );
    }

    /// Shows a list of sessions, one per line.
    pub fn show_sessions(sessions: &[PopulatedSession]) {
        if sessions.is_empty() {
            println!("No sessions");
            return;
        }
        for session in sessions {
            println!("{}", Self::session_line(session));
        }
    }

    /// Formats a session as `<start>  MM:SS  <status>  <task title>`.
    pub fn session_line(session: &PopulatedSession) -> String {
        let (minutes, seconds) = Self::format_time(session.duration);
        let status = if session.completed { "done" } else { "aborted" };
        let task = session
            .task_id
            .as_ref()
            .map_or("(deleted task)", |task| task.title.as_str());
        format!(
            "{}  {:>3}:{:02}  {:<7}  {}",
            session.start_time.format("%Y-%m-%d %H:%M"),
            minutes,
            seconds,
            status,
            task
        )
    }

    pub fn show_stats(stats: &Stats) {
        println!("FocusTools stats");
        println!("─────────────────────────────");
        println!("Pomodoros:        {}", stats.total_pomodoros);
        println!("Focused minutes:  {}", stats.total_minutes);
        println!("Completed tasks:  {}", stats.completed_tasks);
        println!("Active tasks:     {}", stats.active_tasks);
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    pub fn show_settings(settings: &Settings, path: &Path) {
        println!("Work:   {} min", settings.work_minutes);
        println!("Break:  {} min", settings.break_minutes);
        println!(
            "Sound:  {}",
            if settings.sound_enabled { "on" } else { "off" }
        );
        println!("File:   {}", path.display());
    }

    // ------------------------------------------------------------------------
    // Timer
    // ------------------------------------------------------------------------

    /// Redraws the timer status line in place.
    pub fn show_timer_status(state: &TimerState, progress: ProgressRing, active: Option<&Task>) {
        print!("\r{}", Self::status_line(state, progress, active));
        let _ = std::io::stdout().flush();
    }

    /// Formats the one-line timer status.
    pub fn status_line(state: &TimerState, progress: ProgressRing, active: Option<&Task>) -> String {
        let (minutes, seconds) = Self::format_time(state.remaining_seconds);
        let marker = if state.running { '>' } else { '|' };
        let task = active.map_or("no task", |task| task.title.as_str());
        format!(
            "{} {:<10} {:02}:{:02} [{}] {}",
            marker,
            state.phase.label(),
            minutes,
            seconds,
            progress.to_bar(BAR_FILLED, BAR_EMPTY),
            task
        )
    }

    /// Shows the end of a phase.
    pub fn show_phase_complete(finished: TimerPhase) {
        println!();
        match finished {
            TimerPhase::Work => println!("* Focus interval complete, time for a break"),
            TimerPhase::Break => println!("* Break over, ready to focus"),
        }
    }

    pub fn show_focus_help() {
        println!("Commands:");
        println!("  p        start / pause");
        println!("  r        reset to a fresh focus interval");
        println!("  + / -    add / subtract 30 seconds");
        println!("  s <id>   select the active task");
        println!("  c        clear the active task");
        println!("  w <min>  set work minutes (1-60)");
        println!("  b <min>  set break minutes (1-30)");
        println!("  m        toggle sound");
        println!("  h        show this help");
        println!("  q        quit");
    }

    // ------------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------------

    pub fn show_message(message: &str) {
        println!("{}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Formats remaining seconds as (minutes, seconds).
    pub fn format_time(total_seconds: u32) -> (u32, u32) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
