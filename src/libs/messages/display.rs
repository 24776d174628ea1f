use super::types::Message;
use crate::libs::formatter::format_minutes;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TIMER MESSAGES ===
            Message::TimerStarted(remaining) => format!("Focus session started, {} to go", remaining),
            Message::TimerStopped => "Timer stopped".to_string(),
            Message::PhaseChanged(phase, remaining) => format!("{} started ({})", phase, remaining),
            Message::StaleSessionStopped => "Found a session left running by a previous watcher, stopping it".to_string(),
            Message::StaleTickIgnored(id) => format!("Ignoring tick from cancelled source {}", id),
            Message::UnknownEngineCommand(name) => format!("Unknown engine command: {}", name),
            Message::HistoryRecorded { pomodoros, todos, minutes } => format!(
                "Session recorded: {} pomodoro(s), {} todo(s) completed, {} of focus",
                pomodoros,
                todos,
                format_minutes(*minutes)
            ),

            // === COLLABORATOR MESSAGES ===
            Message::SoundPlayed(sound, volume) => format!("Playing sound {} at volume {:.2}", sound, volume),
            Message::MusicStarted(music, volume, looped) => {
                format!("Playing music {} at volume {:.2}{}", music, volume, if *looped { " (loop)" } else { "" })
            }
            Message::MusicStopped(music) => format!("Stopped music {}", music),
            Message::Notification(title, message) => format!("🔔 {} {}", title, message),
            Message::NotificationDismissed(title) => format!("Notification dismissed: {}", title),
            Message::AudioFailed(error) => format!("Audio playback failed: {}", error),
            Message::NotificationFailed(error) => format!("Failed to show notification: {}", error),
            Message::BadgeUpdateFailed(error) => format!("Failed to update badge: {}", error),
            Message::RuleInstallFailed(error) => format!("Failed to install blocking rules: {}", error),
            Message::RuleRemovalFailed(error) => format!("Failed to remove blocking rules: {}", error),

            // === STORE MESSAGES ===
            Message::StoreReadFailed(error) => format!("Failed to read stored state, using defaults: {}", error),
            Message::StoreWriteFailed(error) => format!("Failed to save state: {}", error),
            Message::StoreWriteDeferred(key) => format!("Store is busy, '{}' will be saved later", key),
            Message::InvalidStoredValue(key, error) => format!("Ignoring invalid value for '{}': {}", key, error),
            Message::UnknownStoreKey(key) => format!("Ignoring unknown setting '{}'", key),

            // === WATCHER MESSAGES ===
            Message::WatcherStarted => "Watcher is running. Use `start` and `stop` from another terminal.".to_string(),
            Message::WatcherShuttingDown => "Watcher shutting down".to_string(),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down gracefully...".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down gracefully...".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down gracefully...".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
            Message::FailedToCreateSigtermHandler => "Failed to create SIGTERM handler".to_string(),
            Message::FailedToCreateSigintHandler => "Failed to create SIGINT handler".to_string(),

            // === COMMAND MESSAGES ===
            Message::CommandQueued(name) => format!("Sent '{}' to the watcher", name),
            Message::StatusHeader => "Timer status".to_string(),
            Message::ConfigHeader => "Settings".to_string(),
            Message::ConfigSaved => "Settings saved".to_string(),
            Message::ConfigNothingToChange => "Nothing to change. Pass at least one option, see --help.".to_string(),
            Message::DurationsLockedWhileRunning => "Durations cannot be changed while the timer is running. Stop it first.".to_string(),

            // === TODO MESSAGES ===
            Message::TodoAdded(id, title) => format!("Added todo #{}: {}", id, title),
            Message::TodoCompleted(title) => format!("Completed: {}", title),
            Message::TodoReopened(title) => format!("Reopened: {}", title),
            Message::TodoRemoved(title) => format!("Removed: {}", title),
            Message::TodoNotFound(id) => format!("No todo with id {}", id),
            Message::TodoTitleEmpty => "A todo needs a title".to_string(),
            Message::NoTodos => "No todos yet. Add one with `todo add`.".to_string(),

            // === SITE MESSAGES ===
            Message::SiteBlocked(site) => format!("Blocking {} during focus sessions", site),
            Message::SiteUnblocked(site) => format!("{} is no longer blocked", site),
            Message::SiteAlreadyBlocked(site) => format!("{} is already blocked", site),
            Message::SiteNotBlocked(site) => format!("{} is not in the block list", site),
            Message::UrlAllowed(url) => format!("{} stays reachable during focus sessions", url),
            Message::UrlDisallowed(url) => format!("{} removed from the allow list", url),
            Message::UrlAlreadyAllowed(url) => format!("{} is already allowed", url),
            Message::UrlNotAllowed(url) => format!("{} is not in the allow list", url),
            Message::UrlIsBlocked(url) => format!("{} is blocked right now", url),
            Message::UrlIsNotBlocked(url) => format!("{} is not blocked right now", url),
            Message::InvalidSite(error) => format!("Invalid site: {}", error),
            Message::NoBlockedSites => "No blocked sites".to_string(),
            Message::NoAllowedUrls => "No allowed URLs".to_string(),

            // === HISTORY MESSAGES ===
            Message::HistoryHeader(days) => format!("Focus history, last {} days", days),
            Message::NoHistory => "No sessions recorded yet".to_string(),
        };
        write!(f, "{}", text)
    }
}
