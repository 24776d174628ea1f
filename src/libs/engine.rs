//! The session timer engine.
//!
//! [`Engine`] owns the timer state and drives the focus/break cycle:
//!
//! ```text
//!            start()                 work ends                 break ends
//!   Idle ───────────────▶ Working ─────────────▶ OnBreak ─────────────▶ Working ...
//!    ▲                       │    every 4th pomodoro: long break
//!    └──────── stop() ───────┴──────────────────────────────────────────────┘
//! ```
//!
//! In ultra focus mode there are no breaks: when the work time runs out the
//! session counts one pomodoro and stops.
//!
//! The engine is single-threaded and event driven. Its caller feeds it
//! [`Command`]s, ticks from the [`Ticker`] it was given, and configuration
//! patches built from store changes. Side effects go to the collaborators in
//! [`Host`] and to the store, and none of their failures stop a session.

use crate::db::keys;
use crate::db::store::Store;
use crate::libs::blocker::RuleSet;
use crate::libs::config::{Config, ConfigPatch};
use crate::libs::formatter::{format_badge, format_remaining};
use crate::libs::history::{self, SessionRecord};
use crate::libs::host::{
    Host, Notification, FOCUS_NOTIFICATION, LONG_BREAK_NOTIFICATION, SESSION_ENDED_NOTIFICATION, SHORT_BREAK_NOTIFICATION,
};
use crate::libs::messages::Message;
use crate::libs::scheduler::{TickId, Ticker};
use crate::libs::timer::{TimerState, LONG_BREAK_EVERY, TICK_INTERVAL, TICK_MILLIS, WORK_COLOR};
use crate::libs::todo::{self, Todo};
use crate::{msg_debug, msg_info, msg_warning};
use chrono::{DateTime, Local};
use std::str::FromStr;
use thiserror::Error;

pub const START_TIMER: &str = "start-timer";
pub const STOP_TIMER: &str = "stop-timer";

/// Commands accepted from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => START_TIMER,
            Command::Stop => STOP_TIMER,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown engine command '{0}'")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            START_TIMER => Ok(Command::Start),
            STOP_TIMER => Ok(Command::Stop),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

/// Source of the wall-clock time stamped on history records.
pub type Clock = fn() -> DateTime<Local>;

pub struct Engine {
    store: Store,
    config: Config,
    state: TimerState,
    ticker: Box<dyn Ticker>,
    host: Host,
    active_tick: Option<TickId>,
    todos_at_start: Vec<Todo>,
    completed_todos: Vec<String>,
    clock: Clock,
}

impl Engine {
    pub fn new(store: Store, ticker: Box<dyn Ticker>, host: Host) -> Self {
        Self::with_clock(store, ticker, host, Local::now)
    }

    /// Loads settings and state from `store`.
    ///
    /// A session still marked as running belongs to a previous process and
    /// is stopped right away instead of being resumed.
    pub fn with_clock(store: Store, ticker: Box<dyn Ticker>, host: Host, clock: Clock) -> Self {
        let config = Config::load(&store);
        let state = TimerState::load(&store, &config).unwrap_or_else(|e| {
            msg_warning!(Message::StoreReadFailed(e.to_string()));
            TimerState::idle(&config)
        });

        let mut engine = Self {
            store,
            config,
            state,
            ticker,
            host,
            active_tick: None,
            todos_at_start: Vec::new(),
            completed_todos: Vec::new(),
            clock,
        };

        if engine.state.is_running {
            msg_info!(Message::StaleSessionStopped);
            engine.stop();
        } else {
            engine.set_badge_color(engine.state.badge_color());
            engine.update_badge_text();
        }
        engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// True while a tick source is installed.
    pub fn is_ticking(&self) -> bool {
        self.active_tick.is_some()
    }

    /// Ids of the todos completed since the session started.
    pub fn completed_todos(&self) -> &[String] {
        &self.completed_todos
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::Stop => self.stop(),
        }
    }

    /// Starts a work phase. A tick source left from an earlier start is
    /// cancelled first, so ticks never double up.
    pub fn start(&mut self) {
        if let Some(id) = self.active_tick.take() {
            self.ticker.cancel(id);
        }

        self.state.is_running = true;
        self.state.is_break = false;
        self.state.is_long_break = false;
        self.state.remaining_millis = self.config.work_duration_millis;

        self.todos_at_start = self.read_todos();
        self.completed_todos.clear();

        self.block_sites();
        self.persist_state();
        self.set_badge_color(WORK_COLOR);
        self.update_badge_text();

        self.active_tick = Some(self.ticker.schedule_every(TICK_INTERVAL));
        msg_info!(Message::TimerStarted(format_remaining(self.state.remaining_millis)));
    }

    /// Stops the session and resets the timer.
    ///
    /// The tick source is cancelled before anything else, so no tick is
    /// applied after this returns. A session with at least one pomodoro, or
    /// any ultra focus session, is added to the history.
    pub fn stop(&mut self) {
        if let Some(id) = self.active_tick.take() {
            self.ticker.cancel(id);
        }

        let was_running = self.state.is_running;
        if was_running && (self.state.pomodoro_count >= 1 || self.state.ultra_focus_mode) {
            self.record_history();
        }

        self.state.remaining_millis = self.config.work_duration_millis;
        self.state.is_running = false;
        self.state.is_break = false;
        self.state.is_long_break = false;
        self.state.pomodoro_count = 0;
        self.todos_at_start.clear();
        self.completed_todos.clear();

        self.unblock_sites();
        self.stop_music();
        self.set_badge_color(WORK_COLOR);
        self.update_badge_text();
        self.persist_state();

        if was_running {
            msg_info!(Message::TimerStopped);
        }
    }

    /// Advances the timer by one tick. Ticks from a cancelled or unknown
    /// source are ignored.
    pub fn tick(&mut self, id: TickId) {
        if self.active_tick != Some(id) {
            msg_debug!(Message::StaleTickIgnored(id.0));
            return;
        }

        self.state.remaining_millis = self.state.remaining_millis.saturating_sub(TICK_MILLIS);
        if self.state.remaining_millis > 0 {
            self.persist_time();
        } else {
            self.end_phase();
        }
        self.update_badge_text();
    }

    /// Applies a settings change made while the engine runs.
    ///
    /// New durations take effect at the next phase boundary. While running,
    /// a new todo list updates the completed-todo count and new site lists
    /// are installed at once if a work phase is active.
    pub fn apply_config_patch(&mut self, patch: ConfigPatch) {
        if patch.is_empty() {
            return;
        }

        if let (Some(todos), true) = (&patch.todos, self.state.is_running) {
            self.completed_todos = todo::newly_completed(&self.todos_at_start, todos);
        }

        let sites_changed = patch.blocked_sites.is_some() || patch.allowed_urls.is_some();
        self.config.apply(&patch);

        if let Some(ultra) = patch.ultra_focus_mode {
            self.state.ultra_focus_mode = ultra;
        }

        if sites_changed && self.state.is_running && !self.state.is_break {
            self.block_sites();
        }

        if patch.work_time.is_some() && !self.state.is_running {
            self.state.remaining_millis = self.config.work_duration_millis;
            self.persist_time();
            self.update_badge_text();
        }
    }

    fn end_phase(&mut self) {
        self.play_sound();

        if self.state.ultra_focus_mode {
            self.state.pomodoro_count += 1;
            self.stop();
            self.show_notification(&SESSION_ENDED_NOTIFICATION);
            return;
        }

        if !self.state.is_break {
            self.state.pomodoro_count += 1;
        }
        self.state.is_break = !self.state.is_break;
        self.state.is_long_break = self.state.is_break && self.state.pomodoro_count % LONG_BREAK_EVERY == 0;

        let (duration, notification) = match (self.state.is_break, self.state.is_long_break) {
            (true, true) => (self.config.long_break_duration_millis, LONG_BREAK_NOTIFICATION),
            (true, false) => (self.config.break_duration_millis, SHORT_BREAK_NOTIFICATION),
            (false, _) => (self.config.work_duration_millis, FOCUS_NOTIFICATION),
        };
        self.state.remaining_millis = duration;

        if self.state.is_break {
            self.unblock_sites();
            self.stop_music();
        } else {
            self.block_sites();
            self.play_music();
        }

        self.notify(&notification);
        self.set_badge_color(self.state.badge_color());
        self.persist_state();
        msg_info!(Message::PhaseChanged(self.state.phase().to_string(), format_remaining(duration)));
    }

    fn record_history(&mut self) {
        let session = SessionRecord::from_session((self.clock)(), &self.state, &self.config, self.completed_todos.len() as u32);
        let summary = Message::HistoryRecorded {
            pomodoros: session.total_pomodoros,
            todos: session.completed_todos,
            minutes: session.total_work_time,
        };
        match history::record(&self.store, session) {
            Ok(_) => msg_debug!(summary),
            Err(e) => msg_warning!(Message::StoreWriteFailed(e.to_string())),
        }
    }

    fn read_todos(&self) -> Vec<Todo> {
        match self.store.get::<Vec<Todo>>(keys::TODOS) {
            Ok(todos) => todos.unwrap_or_default(),
            Err(e) => {
                msg_warning!(Message::StoreReadFailed(e.to_string()));
                Vec::new()
            }
        }
    }

    fn block_sites(&mut self) {
        let rules = RuleSet::build(&self.config.blocked_sites, &self.config.allowed_urls);
        if let Err(e) = self.host.rules.set_rules(&rules) {
            msg_warning!(Message::RuleInstallFailed(e.to_string()));
        }
    }

    fn unblock_sites(&mut self) {
        if let Err(e) = self.host.rules.clear_rules() {
            msg_warning!(Message::RuleRemovalFailed(e.to_string()));
        }
    }

    fn play_sound(&mut self) {
        if !self.config.sound_enabled || self.config.selected_sound.is_empty() {
            return;
        }
        if let Err(e) = self.host.audio.play_sound(&self.config.selected_sound, self.config.sound_volume) {
            msg_warning!(Message::AudioFailed(e.to_string()));
        }
    }

    fn play_music(&mut self) {
        if !self.config.music_enabled || self.config.selected_music.is_empty() {
            return;
        }
        if let Err(e) = self.host.audio.play_music(&self.config.selected_music, self.config.music_volume, true) {
            msg_warning!(Message::AudioFailed(e.to_string()));
        }
    }

    fn stop_music(&mut self) {
        if let Err(e) = self.host.audio.stop_music() {
            msg_warning!(Message::AudioFailed(e.to_string()));
        }
    }

    fn notify(&mut self, notification: &Notification) {
        if self.config.notifications_enabled {
            self.show_notification(notification);
        }
    }

    /// Shows `notification` whatever the notification setting says.
    fn show_notification(&mut self, notification: &Notification) {
        if let Err(e) = self.host.notifier.show(notification) {
            msg_warning!(Message::NotificationFailed(e.to_string()));
        }
    }

    fn set_badge_color(&mut self, color: &str) {
        if let Err(e) = self.host.badge.set_color(color) {
            msg_warning!(Message::BadgeUpdateFailed(e.to_string()));
        }
    }

    fn update_badge_text(&mut self) {
        let text = format_badge(self.state.remaining_millis);
        if let Err(e) = self.host.badge.set_text(&text) {
            msg_warning!(Message::BadgeUpdateFailed(e.to_string()));
        }
    }

    fn persist_state(&self) {
        if let Err(e) = self.state.save(&self.store) {
            msg_warning!(Message::StoreWriteFailed(e.to_string()));
        }
    }

    /// Written on every tick, so it must not wait on a busy store.
    fn persist_time(&self) {
        match self.store.set_deferred(keys::TIME, &self.state.remaining_millis) {
            Ok(true) => {}
            Ok(false) => msg_debug!(Message::StoreWriteDeferred(keys::TIME.to_string())),
            Err(e) => msg_warning!(Message::StoreWriteFailed(e.to_string())),
        }
    }
}
