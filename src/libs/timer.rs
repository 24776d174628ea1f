//! Timer state and phases.
//!
//! [`TimerState`] is the engine's in-memory view of the current session. It
//! is mirrored to the store under the `time`, `isRunning`, `isBreak` and
//! `isLongBreak` keys so the CLI can display it. The ultra focus flag is a
//! setting and is only read.

use crate::db::keys;
use crate::db::store::{Store, StoreError};
use crate::libs::config::Config;
use serde_json::json;
use std::fmt;
use std::time::Duration;

/// Period of the engine's tick source.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);
pub const TICK_MILLIS: u64 = 1000;

/// Completed pomodoros per long break.
pub const LONG_BREAK_EVERY: u32 = 4;

/// Badge background while working or idle.
pub const WORK_COLOR: &str = "#40A662";
/// Badge background during breaks.
pub const BREAK_COLOR: &str = "#ffccd5";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Working,
    OnBreak(BreakKind),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "Idle",
            Phase::Working => "Focus",
            Phase::OnBreak(BreakKind::Short) => "Short break",
            Phase::OnBreak(BreakKind::Long) => "Long break",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    pub is_running: bool,
    pub is_break: bool,
    pub is_long_break: bool,
    pub ultra_focus_mode: bool,
    pub remaining_millis: u64,
    /// Work phases completed since the last stop. Never persisted.
    pub pomodoro_count: u32,
}

impl TimerState {
    pub fn idle(config: &Config) -> Self {
        Self {
            is_running: false,
            is_break: false,
            is_long_break: false,
            ultra_focus_mode: false,
            remaining_millis: config.work_duration_millis,
            pomodoro_count: 0,
        }
    }

    /// Reads the mirrored state, defaulting every absent field to the idle
    /// state for `config`.
    pub fn load(store: &Store, config: &Config) -> Result<Self, StoreError> {
        let idle = Self::idle(config);
        Ok(Self {
            is_running: store.get(keys::IS_RUNNING)?.unwrap_or(idle.is_running),
            is_break: store.get(keys::IS_BREAK)?.unwrap_or(idle.is_break),
            is_long_break: store.get(keys::IS_LONG_BREAK)?.unwrap_or(idle.is_long_break),
            ultra_focus_mode: store.get(keys::ULTRA_FOCUS_MODE)?.unwrap_or(idle.ultra_focus_mode),
            remaining_millis: store.get(keys::TIME)?.unwrap_or(idle.remaining_millis),
            pomodoro_count: 0,
        })
    }

    /// Mirrors the engine-owned fields to the store.
    pub fn save(&self, store: &Store) -> Result<(), StoreError> {
        store.set_many(&[
            (keys::TIME, json!(self.remaining_millis)),
            (keys::IS_RUNNING, json!(self.is_running)),
            (keys::IS_BREAK, json!(self.is_break)),
            (keys::IS_LONG_BREAK, json!(self.is_long_break)),
        ])
    }

    pub fn phase(&self) -> Phase {
        match (self.is_running, self.is_break, self.is_long_break) {
            (false, _, _) => Phase::Idle,
            (true, false, _) => Phase::Working,
            (true, true, false) => Phase::OnBreak(BreakKind::Short),
            (true, true, true) => Phase::OnBreak(BreakKind::Long),
        }
    }

    pub fn badge_color(&self) -> &'static str {
        if self.is_break {
            BREAK_COLOR
        } else {
            WORK_COLOR
        }
    }
}
