//! Timer, sound, notification and site-blocking settings.
//!
//! Settings are not kept in a single document: each one lives under its own
//! store key (see [`keys`]) so that the CLI can change one setting while the
//! engine is running and the engine sees exactly that change.
//!
//! ## Reading and writing
//!
//! - [`Config::load`] rebuilds the settings from every stored entry, falling
//!   back to defaults for anything absent or unreadable.
//! - [`ConfigPatch`] is the typed form of a partial update. The engine builds
//!   one from store changes with [`ConfigPatch::from_changes`]; the CLI
//!   builds one from its arguments and writes it with [`ConfigPatch::save`].
//! - [`Config::install_defaults`] seeds a fresh store on first run.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pomodoro_grande::db::store::Store;
//! use pomodoro_grande::libs::config::{Config, ConfigPatch, ONE_MINUTE_MS};
//!
//! let store = Store::new()?;
//! Config::install_defaults(&store)?;
//!
//! let patch = ConfigPatch {
//!     work_time: Some(50 * ONE_MINUTE_MS),
//!     ..Default::default()
//! };
//! patch.save(&store)?;
//!
//! let config = Config::load(&store);
//! assert_eq!(config.work_duration_millis, 50 * ONE_MINUTE_MS);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::keys;
use crate::db::store::{Change, Store};
use crate::libs::messages::Message;
use crate::libs::todo::Todo;
use crate::{msg_debug, msg_warning};
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub const ONE_MINUTE_MS: u64 = 60_000;

pub const DEFAULT_WORK_TIME: u64 = 25 * ONE_MINUTE_MS;
pub const DEFAULT_BREAK_TIME: u64 = 5 * ONE_MINUTE_MS;
pub const DEFAULT_LONG_BREAK_TIME: u64 = 15 * ONE_MINUTE_MS;
pub const DEFAULT_SOUND: &str = "clock.mp3";
pub const DEFAULT_MUSIC: &str = "lofi.mp3";
pub const DEFAULT_VOLUME: f64 = 0.5;

/// Sites blocked out of the box.
pub const DEFAULT_BLOCKED_SITES: [&str; 8] = [
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "x.com",
    "youtube.com",
    "reddit.com",
    "netflix.com",
    "tiktok.com",
];

/// Settings the engine reads at every phase boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub work_duration_millis: u64,
    pub break_duration_millis: u64,
    pub long_break_duration_millis: u64,

    pub sound_enabled: bool,
    pub selected_sound: String,
    /// Always within `0.0..=1.0`.
    pub sound_volume: f64,

    pub music_enabled: bool,
    pub selected_music: String,
    /// Always within `0.0..=1.0`.
    pub music_volume: f64,

    pub notifications_enabled: bool,

    /// Domains whose pages are blocked during work phases.
    pub blocked_sites: Vec<String>,
    /// URL prefixes that stay reachable even on a blocked domain.
    pub allowed_urls: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_duration_millis: DEFAULT_WORK_TIME,
            break_duration_millis: DEFAULT_BREAK_TIME,
            long_break_duration_millis: DEFAULT_LONG_BREAK_TIME,
            sound_enabled: true,
            selected_sound: DEFAULT_SOUND.to_string(),
            sound_volume: DEFAULT_VOLUME,
            music_enabled: true,
            selected_music: DEFAULT_MUSIC.to_string(),
            music_volume: DEFAULT_VOLUME,
            notifications_enabled: true,
            blocked_sites: DEFAULT_BLOCKED_SITES.iter().map(|site| site.to_string()).collect(),
            allowed_urls: Vec::new(),
        }
    }
}

impl Config {
    /// Reads the settings from the store.
    ///
    /// A store that cannot be read yields the defaults; the failure is
    /// reported but never propagated.
    pub fn load(store: &Store) -> Self {
        let mut config = Config::default();
        match store.changes_since(0) {
            Ok(entries) => config.apply(&ConfigPatch::from_changes(&entries)),
            Err(e) => msg_warning!(Message::StoreReadFailed(e.to_string())),
        }
        config
    }

    /// Applies every field present in `patch`. Zero durations are ignored and
    /// volumes are clamped into `0.0..=1.0`.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(work) = patch.work_time.filter(|ms| *ms > 0) {
            self.work_duration_millis = work;
        }
        if let Some(short) = patch.break_time.filter(|ms| *ms > 0) {
            self.break_duration_millis = short;
        }
        if let Some(long) = patch.long_break.filter(|ms| *ms > 0) {
            self.long_break_duration_millis = long;
        }

        if let Some(enabled) = patch.sound_enabled {
            self.sound_enabled = enabled;
        }
        if let Some(sound) = patch.selected_sound.as_ref().filter(|s| !s.is_empty()) {
            self.selected_sound = sound.clone();
        }
        if let Some(volume) = patch.sound_volume {
            self.sound_volume = clamp_volume(volume);
        }

        if let Some(enabled) = patch.music_enabled {
            self.music_enabled = enabled;
        }
        if let Some(music) = patch.selected_music.as_ref().filter(|s| !s.is_empty()) {
            self.selected_music = music.clone();
        }
        if let Some(volume) = patch.music_volume {
            self.music_volume = clamp_volume(volume);
        }

        if let Some(enabled) = patch.notifications_enabled {
            self.notifications_enabled = enabled;
        }
        if let Some(sites) = &patch.blocked_sites {
            self.blocked_sites = sites.clone();
        }
        if let Some(urls) = &patch.allowed_urls {
            self.allowed_urls = urls.clone();
        }
    }

    /// Writes the default value of every setting that is not stored yet,
    /// together with the idle timer time. Existing values are kept.
    pub fn install_defaults(store: &Store) -> Result<()> {
        let defaults = Config::default();
        let mut entries = defaults.entries();
        entries.push((keys::TIME, json!(defaults.work_duration_millis)));
        entries.push((keys::ULTRA_FOCUS_MODE, json!(false)));

        let mut missing = Vec::new();
        for (key, value) in entries {
            if !store.contains(key)? {
                missing.push((key, value));
            }
        }
        store.set_many(&missing)?;
        Ok(())
    }

    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            (keys::WORK_TIME, json!(self.work_duration_millis)),
            (keys::BREAK_TIME, json!(self.break_duration_millis)),
            (keys::LONG_BREAK, json!(self.long_break_duration_millis)),
            (keys::IS_SOUND_ENABLED, json!(self.sound_enabled)),
            (keys::SELECTED_SOUND, json!(self.selected_sound)),
            (keys::SOUND_VOLUME, json!(self.sound_volume)),
            (keys::IS_MUSIC_ENABLED, json!(self.music_enabled)),
            (keys::SELECTED_MUSIC, json!(self.selected_music)),
            (keys::MUSIC_VOLUME, json!(self.music_volume)),
            (keys::IS_NOTIFICATION_ENABLED, json!(self.notifications_enabled)),
            (keys::BLOCKED_SITES, json!(self.blocked_sites)),
            (keys::ALLOWED_URLS, json!(self.allowed_urls)),
        ]
    }
}

fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        DEFAULT_VOLUME
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// A partial settings update. `None` fields are left untouched.
///
/// Besides settings, a patch carries the two inputs the engine reacts to
/// while running: the ultra focus toggle and the todo list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub work_time: Option<u64>,
    pub break_time: Option<u64>,
    pub long_break: Option<u64>,
    pub sound_enabled: Option<bool>,
    pub selected_sound: Option<String>,
    pub sound_volume: Option<f64>,
    pub music_enabled: Option<bool>,
    pub selected_music: Option<String>,
    pub music_volume: Option<f64>,
    pub notifications_enabled: Option<bool>,
    pub ultra_focus_mode: Option<bool>,
    pub blocked_sites: Option<Vec<String>>,
    pub allowed_urls: Option<Vec<String>>,
    pub todos: Option<Vec<Todo>>,
}

impl ConfigPatch {
    /// Builds a patch from store entries.
    ///
    /// Only recognized keys are read. Keys owned by the engine are skipped,
    /// unknown keys are reported at debug level and dropped, and a value of
    /// the wrong shape is reported and dropped without affecting the rest.
    pub fn from_changes(changes: &[Change]) -> Self {
        let mut patch = ConfigPatch::default();
        for change in changes {
            let key = change.key.as_str();
            let value = &change.value;
            match key {
                keys::WORK_TIME => patch.work_time = decode(key, value),
                keys::BREAK_TIME => patch.break_time = decode(key, value),
                keys::LONG_BREAK => patch.long_break = decode(key, value),
                keys::IS_SOUND_ENABLED => patch.sound_enabled = decode(key, value),
                keys::SELECTED_SOUND => patch.selected_sound = decode(key, value),
                keys::SOUND_VOLUME => patch.sound_volume = decode(key, value),
                keys::IS_MUSIC_ENABLED => patch.music_enabled = decode(key, value),
                keys::SELECTED_MUSIC => patch.selected_music = decode(key, value),
                keys::MUSIC_VOLUME => patch.music_volume = decode(key, value),
                keys::IS_NOTIFICATION_ENABLED => patch.notifications_enabled = decode(key, value),
                keys::ULTRA_FOCUS_MODE => patch.ultra_focus_mode = decode(key, value),
                keys::BLOCKED_SITES => patch.blocked_sites = decode(key, value),
                keys::ALLOWED_URLS => patch.allowed_urls = decode(key, value),
                keys::TODOS => patch.todos = decode(key, value),
                owned if keys::ENGINE_OWNED.contains(&owned) => {}
                unknown => msg_debug!(Message::UnknownStoreKey(unknown.to_string())),
            }
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        *self == ConfigPatch::default()
    }

    /// True when the patch changes any phase duration.
    pub fn changes_durations(&self) -> bool {
        self.work_time.is_some() || self.break_time.is_some() || self.long_break.is_some()
    }

    /// Writes every present field to its store key in one transaction.
    pub fn save(&self, store: &Store) -> Result<()> {
        let mut entries: Vec<(&str, Value)> = Vec::new();
        let mut push = |key, value: Option<Value>| {
            if let Some(value) = value {
                entries.push((key, value));
            }
        };
        push(keys::WORK_TIME, self.work_time.map(|v| json!(v)));
        push(keys::BREAK_TIME, self.break_time.map(|v| json!(v)));
        push(keys::LONG_BREAK, self.long_break.map(|v| json!(v)));
        push(keys::IS_SOUND_ENABLED, self.sound_enabled.map(|v| json!(v)));
        push(keys::SELECTED_SOUND, self.selected_sound.as_ref().map(|v| json!(v)));
        push(keys::SOUND_VOLUME, self.sound_volume.map(|v| json!(clamp_volume(v))));
        push(keys::IS_MUSIC_ENABLED, self.music_enabled.map(|v| json!(v)));
        push(keys::SELECTED_MUSIC, self.selected_music.as_ref().map(|v| json!(v)));
        push(keys::MUSIC_VOLUME, self.music_volume.map(|v| json!(clamp_volume(v))));
        push(keys::IS_NOTIFICATION_ENABLED, self.notifications_enabled.map(|v| json!(v)));
        push(keys::ULTRA_FOCUS_MODE, self.ultra_focus_mode.map(|v| json!(v)));
        push(keys::BLOCKED_SITES, self.blocked_sites.as_ref().map(|v| json!(v)));
        push(keys::ALLOWED_URLS, self.allowed_urls.as_ref().map(|v| json!(v)));
        push(keys::TODOS, self.todos.as_ref().map(|v| json!(v)));

        store.set_many(&entries)?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            msg_warning!(Message::InvalidStoredValue(key.to_string(), e.to_string()));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(key: &str, value: Value) -> Change {
        Change {
            key: key.to_string(),
            value,
            revision: 1,
        }
    }

    #[test]
    fn patch_reads_only_recognized_keys() {
        let patch = ConfigPatch::from_changes(&[
            change(keys::WORK_TIME, json!(50 * ONE_MINUTE_MS)),
            change(keys::TIME, json!(1000)),
            change("themeColor", json!("dark")),
            change(keys::IS_SOUND_ENABLED, json!(false)),
        ]);

        assert_eq!(
            patch,
            ConfigPatch {
                work_time: Some(50 * ONE_MINUTE_MS),
                sound_enabled: Some(false),
                ..Default::default()
            }
        );
    }

    #[test]
    fn malformed_value_is_dropped() {
        let patch = ConfigPatch::from_changes(&[change(keys::BREAK_TIME, json!("five minutes"))]);
        assert!(patch.is_empty());
    }

    #[test]
    fn apply_ignores_zero_durations_and_clamps_volume() {
        let mut config = Config::default();
        config.apply(&ConfigPatch {
            work_time: Some(0),
            sound_volume: Some(3.5),
            music_volume: Some(-1.0),
            ..Default::default()
        });

        assert_eq!(config.work_duration_millis, DEFAULT_WORK_TIME);
        assert_eq!(config.sound_volume, 1.0);
        assert_eq!(config.music_volume, 0.0);
    }
}
