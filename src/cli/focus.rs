//! Interactive focus session.
//!
//! Hosts one [`TimerEngine`] in the terminal. The session loop waits on the
//! tick source and on stdin lines at the same time; after every step the
//! tick source is synced to the engine's running flag and pending timer
//! events are handled. A completed work phase is credited to the active task
//! by logging a session and incrementing its pomodoro count.

use std::future::Future;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::settings::{Settings, SettingsStore};
use crate::sound::SoundPlayer;
use crate::timer::{Ticker, TimerEngine, TimerEvent};
use crate::types::{Session, Task, TaskSelection, TimerPhase};

use super::client::{ApiClient, ClientError};
use super::display::Display;

// ============================================================================
// FocusBackend
// ============================================================================

/// Remote operations a focus session needs.
pub trait FocusBackend {
    fn fetch_task(&self, id: &str) -> impl Future<Output = Result<Task, ClientError>>;

    fn log_session(
        &self,
        task_id: &str,
        duration_seconds: u32,
        start_time: DateTime<Utc>,
        completed: bool,
    ) -> impl Future<Output = Result<Session, ClientError>>;

    fn increment_pomodoros(&self, task_id: &str) -> impl Future<Output = Result<Task, ClientError>>;
}

impl FocusBackend for ApiClient {
    async fn fetch_task(&self, id: &str) -> Result<Task, ClientError> {
        self.get_task(id).await
    }

    async fn log_session(
        &self,
        task_id: &str,
        duration_seconds: u32,
        start_time: DateTime<Utc>,
        completed: bool,
    ) -> Result<Session, ClientError> {
        ApiClient::log_session(self, task_id, duration_seconds, start_time, completed).await
    }

    async fn increment_pomodoros(&self, task_id: &str) -> Result<Task, ClientError> {
        ApiClient::increment_pomodoros(self, task_id).await
    }
}

// ============================================================================
// FocusCommand
// ============================================================================

/// A line of input in the focus session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusCommand {
    Toggle,
    Reset,
    AddStep,
    SubtractStep,
    Select(String),
    Clear,
    WorkMinutes(u32),
    BreakMinutes(u32),
    ToggleSound,
    Help,
    Quit,
}

impl FocusCommand {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (head, arg) = match line.split_once(char::is_whitespace) {
            Some((head, arg)) => (head, arg.trim()),
            None => (line, ""),
        };

        let command = match head {
            "p" => Self::Toggle,
            "r" => Self::Reset,
            "+" => Self::AddStep,
            "-" => Self::SubtractStep,
            "s" if arg.is_empty() => return Err("usage: s <task-id>".to_string()),
            "s" => Self::Select(arg.to_string()),
            "c" => Self::Clear,
            "w" => Self::WorkMinutes(parse_minutes(arg, "w")?),
            "b" => Self::BreakMinutes(parse_minutes(arg, "b")?),
            "m" => Self::ToggleSound,
            "h" | "?" => Self::Help,
            "q" => Self::Quit,
            other => return Err(format!("unknown command '{}' (h for help)", other)),
        };
        Ok(Some(command))
    }
}

fn parse_minutes(arg: &str, command: &str) -> Result<u32, String> {
    arg.parse()
        .map_err(|_| format!("usage: {} <minutes>", command))
}

// ============================================================================
// FocusSession
// ============================================================================

/// One interactive timer instance bound to a backend.
pub struct FocusSession<B> {
    backend: B,
    engine: TimerEngine,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    ticker: Ticker,
    selection: TaskSelection,
    settings_store: Option<SettingsStore>,
    /// When the current work phase first started running
    work_started_at: Option<DateTime<Utc>>,
}

impl<B: FocusBackend> FocusSession<B> {
    pub fn new(backend: B, settings: Settings, settings_store: Option<SettingsStore>) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        Self {
            backend,
            engine: TimerEngine::new(settings, event_tx),
            events,
            ticker: Ticker::default(),
            selection: TaskSelection::new(),
            settings_store,
            work_started_at: None,
        }
    }

    /// Attaches a player for the notification cue.
    pub fn with_sound_player(mut self, player: Rc<dyn SoundPlayer>) -> Self {
        self.engine = self.engine.with_sound_player(player);
        self
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn selection(&self) -> &TaskSelection {
        &self.selection
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs until `q` or end of input.
    pub async fn run<R>(&mut self, input: R) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        Display::show_focus_help();
        self.render();

        loop {
            tokio::select! {
                _ = self.ticker.tick() => {
                    self.tick();
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("Input closed, leaving focus session");
                        break;
                    };
                    match FocusCommand::parse(&line) {
                        Ok(Some(FocusCommand::Quit)) => break,
                        Ok(Some(command)) => self.handle(command).await,
                        Ok(None) => {}
                        Err(message) => Display::show_error(&message),
                    }
                }
            }

            self.ticker.sync(self.engine.is_running());
            self.process_events().await;
            self.render();
        }

        self.ticker.cancel();
        println!();
        Ok(())
    }

    /// Advances the engine by one second.
    pub fn tick(&mut self) {
        if let Some(finished) = self.engine.tick() {
            Display::show_phase_complete(finished);
        }
    }

    /// Makes `id` the active task.
    pub async fn select_task(&mut self, id: &str) {
        match self.backend.fetch_task(id).await {
            Ok(task) => {
                Display::show_message(&format!("\nActive task: {}", task.title));
                self.selection.select(task);
            }
            Err(e) => Display::show_error(&format!("\ncannot select task {}: {}", id, e)),
        }
    }

    /// Applies one command.
    pub async fn handle(&mut self, command: FocusCommand) {
        match command {
            FocusCommand::Toggle => {
                self.engine.toggle();
            }
            FocusCommand::Reset => self.engine.reset(),
            FocusCommand::AddStep => {
                self.engine.add_step();
            }
            FocusCommand::SubtractStep => {
                self.engine.subtract_step();
            }
            FocusCommand::Select(id) => self.select_task(&id).await,
            FocusCommand::Clear => {
                self.selection.clear();
                Display::show_message("\nActive task cleared");
            }
            FocusCommand::WorkMinutes(minutes) => {
                let settings = self.latest_settings().with_work_minutes(minutes);
                self.change_settings(settings);
            }
            FocusCommand::BreakMinutes(minutes) => {
                let settings = self.latest_settings().with_break_minutes(minutes);
                self.change_settings(settings);
            }
            FocusCommand::ToggleSound => {
                let enabled = !self.engine.settings().sound_enabled;
                let settings = self.latest_settings().with_sound_enabled(enabled);
                self.change_settings(settings);
            }
            FocusCommand::Help => {
                println!();
                Display::show_focus_help();
            }
            FocusCommand::Quit => {}
        }
    }

    /// Settings including any change still waiting for the phase to end.
    fn latest_settings(&self) -> Settings {
        let current = *self.engine.settings();
        self.engine
            .pending_settings()
            .map_or(current, |pending| Settings {
                sound_enabled: current.sound_enabled,
                ..*pending
            })
    }

    fn change_settings(&mut self, settings: Settings) {
        if let Err(e) = settings.validate() {
            Display::show_error(&format!("\n{}", e));
            return;
        }

        self.engine.apply_settings(settings);
        if !self.engine.is_running() && self.engine.elapsed_seconds() == 0 {
            // The countdown restarted; the next `Started` stamps a new start.
            self.work_started_at = None;
        }
        if self.engine.pending_settings().is_some() {
            Display::show_message("\nNew durations apply when this phase ends");
        }

        if let Some(store) = &self.settings_store {
            if let Err(e) = store.save(&settings) {
                warn!("Failed to save settings: {}", e);
                Display::show_error(&format!("\nsettings not saved: {}", e));
            }
        }
    }

    /// Handles timer events emitted since the last call.
    pub async fn process_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                TimerEvent::Started {
                    phase: TimerPhase::Work,
                } => {
                    if self.work_started_at.is_none() {
                        self.work_started_at = Some(Utc::now());
                    }
                }
                TimerEvent::WorkCompleted { duration_seconds } => {
                    self.credit_active_task(duration_seconds, true).await;
                    self.work_started_at = None;
                }
                TimerEvent::WorkAborted { elapsed_seconds } => {
                    self.credit_active_task(elapsed_seconds, false).await;
                    self.work_started_at = None;
                }
                TimerEvent::Reset => self.work_started_at = None,
                _ => {}
            }
        }
    }

    /// Logs a session for the active task; a completed one also counts as a
    /// pomodoro.
    async fn credit_active_task(&mut self, duration_seconds: u32, completed: bool) {
        let Some(task_id) = self.selection.active().map(|task| task.id.clone()) else {
            info!("No active task, focus interval not logged");
            Display::show_message("No active task selected; session not logged");
            return;
        };
        let start_time = self.work_started_at.unwrap_or_else(|| {
            Utc::now() - chrono::Duration::seconds(i64::from(duration_seconds))
        });

        match self
            .backend
            .log_session(&task_id, duration_seconds, start_time, completed)
            .await
        {
            Ok(session) => Display::show_session_logged(&session),
            Err(e) => {
                warn!("Failed to log session: {}", e);
                Display::show_error(&format!("session not logged: {}", e));
                return;
            }
        }

        if !completed {
            return;
        }
        match self.backend.increment_pomodoros(&task_id).await {
            Ok(task) => self.selection.refresh(task),
            Err(e) => {
                warn!("Failed to update pomodoro count: {}", e);
                Display::show_error(&format!("pomodoro count not updated: {}", e));
            }
        }
    }

    fn render(&self) {
        Display::show_timer_status(
            self.engine.state(),
            self.engine.progress(),
            self.selection.active(),
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
