//! Names of the entries in the key-value store.
//!
//! The engine and the CLI only ever talk to each other through these keys,
//! so both sides take them from here.

// Timer state, written by the engine.
pub const TIME: &str = "time";
pub const IS_RUNNING: &str = "isRunning";
pub const IS_BREAK: &str = "isBreak";
pub const IS_LONG_BREAK: &str = "isLongBreak";

// Settings, written by the CLI.
pub const ULTRA_FOCUS_MODE: &str = "ultraFocusMode";
pub const WORK_TIME: &str = "workTime";
pub const BREAK_TIME: &str = "breakTime";
pub const LONG_BREAK: &str = "longBreak";
pub const SELECTED_SOUND: &str = "selectedSound";
pub const IS_SOUND_ENABLED: &str = "isSoundEnabled";
pub const SOUND_VOLUME: &str = "soundVolume";
pub const SELECTED_MUSIC: &str = "selectedMusic";
pub const IS_MUSIC_ENABLED: &str = "isMusicEnabled";
pub const MUSIC_VOLUME: &str = "musicVolume";
pub const IS_NOTIFICATION_ENABLED: &str = "isNotificationEnabled";
pub const BLOCKED_SITES: &str = "blockedSites";
pub const ALLOWED_URLS: &str = "allowedUrls";

// Shared data.
pub const TODOS: &str = "todos";
pub const POMODORO_HISTORY: &str = "pomodoroHistory";

// Outputs of the engine's collaborators.
pub const BADGE_TEXT: &str = "badgeText";
pub const BADGE_COLOR: &str = "badgeColor";
pub const BLOCKING_RULES: &str = "blockingRules";

/// Keys owned by the engine. Changes to them never feed back into a
/// configuration patch.
pub const ENGINE_OWNED: &[&str] = &[TIME, IS_RUNNING, IS_BREAK, IS_LONG_BREAK, POMODORO_HISTORY, BADGE_TEXT, BADGE_COLOR, BLOCKING_RULES];
