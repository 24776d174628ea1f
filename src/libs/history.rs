//! Per-day pomodoro history.
//!
//! Each stopped session produces one [`SessionRecord`]. Sessions are folded
//! into the stored history by calendar day (local time): a day appears at
//! most once, its counters are the sums of every session that day, and days
//! keep the order in which they were first seen. Only the latest
//! [`HISTORY_LIMIT`] days are kept.
//!
//! ```rust
//! use chrono::{Local, TimeZone};
//! use pomodoro_grande::libs::history::{aggregate, SessionRecord};
//!
//! let at = Local.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap();
//! let first = aggregate(Vec::new(), SessionRecord::new(at, 2, 1, 50.0));
//! let merged = aggregate(first, SessionRecord::new(at, 1, 0, 25.0));
//!
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].total_pomodoros, 3);
//! assert_eq!(merged[0].total_work_time, 75.0);
//! ```

use crate::db::keys;
use crate::db::store::{Store, StoreError};
use crate::libs::config::{Config, ONE_MINUTE_MS};
use crate::libs::messages::Message;
use crate::libs::timer::TimerState;
use crate::msg_warning;
use chrono::{DateTime, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Number of days kept in the history.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroHistoryRecord {
    #[serde(rename = "createdAt")]
    pub date: NaiveDate,
    pub total_pomodoros: u32,
    pub completed_todos: u32,
    /// Minutes, unrounded.
    pub total_work_time: f64,
}

/// What a single session contributes to the history.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub created_at: DateTime<Local>,
    pub total_pomodoros: u32,
    pub completed_todos: u32,
    pub total_work_time: f64,
}

impl SessionRecord {
    pub fn new(created_at: DateTime<Local>, total_pomodoros: u32, completed_todos: u32, total_work_time: f64) -> Self {
        Self {
            created_at,
            total_pomodoros,
            completed_todos,
            total_work_time,
        }
    }

    /// The record for the session described by `state` as it stops.
    pub fn from_session(created_at: DateTime<Local>, state: &TimerState, config: &Config, completed_todos: u32) -> Self {
        Self::new(created_at, state.pomodoro_count, completed_todos, total_work_minutes(state, config))
    }
}

/// Minutes worked in a session.
///
/// An ultra focus session counts the time actually elapsed, even when it was
/// stopped early. A regular session counts full work phases only.
pub fn total_work_minutes(state: &TimerState, config: &Config) -> f64 {
    let worked_millis = if state.ultra_focus_mode {
        config.work_duration_millis.saturating_sub(state.remaining_millis)
    } else {
        u64::from(state.pomodoro_count) * config.work_duration_millis
    };
    worked_millis as f64 / ONE_MINUTE_MS as f64
}

/// Folds `session` into `history`, merging by day and keeping the latest
/// [`HISTORY_LIMIT`] days.
pub fn aggregate(history: Vec<PomodoroHistoryRecord>, session: SessionRecord) -> Vec<PomodoroHistoryRecord> {
    let new_record = PomodoroHistoryRecord {
        date: session.created_at.date_naive(),
        total_pomodoros: session.total_pomodoros,
        completed_todos: session.completed_todos,
        total_work_time: session.total_work_time,
    };

    let mut merged: Vec<PomodoroHistoryRecord> = Vec::with_capacity(history.len() + 1);
    let mut index_by_date: HashMap<NaiveDate, usize> = HashMap::new();

    for record in history.into_iter().chain(std::iter::once(new_record)) {
        match index_by_date.get(&record.date) {
            Some(&index) => {
                let day = &mut merged[index];
                day.total_pomodoros += record.total_pomodoros;
                day.completed_todos += record.completed_todos;
                day.total_work_time += record.total_work_time;
            }
            None => {
                index_by_date.insert(record.date, merged.len());
                merged.push(record);
            }
        }
    }

    if merged.len() > HISTORY_LIMIT {
        merged.drain(..merged.len() - HISTORY_LIMIT);
    }
    merged
}

/// Reads the stored history.
///
/// Entries that do not decode are logged and skipped, and anything other than
/// a list reads as an empty history, so the next [`record`] replaces them.
pub fn load(store: &Store) -> Result<Vec<PomodoroHistoryRecord>, StoreError> {
    let entries = match store.get_raw(keys::POMODORO_HISTORY)? {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            msg_warning!(Message::InvalidStoredValue(
                keys::POMODORO_HISTORY.to_string(),
                format!("expected a list, found {}", other)
            ));
            return Ok(Vec::new());
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                msg_warning!(Message::InvalidStoredValue(keys::POMODORO_HISTORY.to_string(), e.to_string()));
                None
            }
        })
        .collect())
}

/// Adds `session` to the stored history and replaces the stored list.
pub fn record(store: &Store, session: SessionRecord) -> Result<Vec<PomodoroHistoryRecord>, StoreError> {
    let history = aggregate(load(store)?, session);
    store.set(keys::POMODORO_HISTORY, &history)?;
    Ok(history)
}

/// Days from `today - days` up to `today`, inclusive.
pub fn recent(history: &[PomodoroHistoryRecord], today: NaiveDate, days: u64) -> Vec<PomodoroHistoryRecord> {
    let since = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
    history
        .iter()
        .filter(|record| record.date >= since && record.date <= today)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryTotals {
    pub days: usize,
    pub total_pomodoros: u32,
    pub completed_todos: u32,
    pub total_work_time: f64,
}

pub fn totals(history: &[PomodoroHistoryRecord]) -> HistoryTotals {
    history.iter().fold(
        HistoryTotals {
            days: history.len(),
            ..Default::default()
        },
        |mut acc, record| {
            acc.total_pomodoros += record.total_pomodoros;
            acc.completed_todos += record.completed_todos;
            acc.total_work_time += record.total_work_time;
            acc
        },
    )
}
