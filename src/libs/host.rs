//! Outward-facing collaborators of the engine.
//!
//! The engine plays sounds, shows notifications, updates the badge and
//! installs blocking rules only through the traits below. Every call is a
//! single best-effort attempt: an `Err` is reported by the engine and the
//! session carries on.
//!
//! The implementations in this module back the `watch` command: sounds and
//! notifications go to the terminal, while the badge and the rule list are
//! published to the store where `status` and `sites check` read them.

use crate::db::keys;
use crate::db::store::Store;
use crate::libs::blocker::RuleSet;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_print};
use anyhow::Result;
use std::time::Duration;

/// How long a notification stays on screen.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub title: &'static str,
    pub message: &'static str,
}

pub const LONG_BREAK_NOTIFICATION: Notification = Notification {
    title: "Long Break! ✨",
    message: "Fantastic work session! Time for a proper recharge!",
};
pub const SHORT_BREAK_NOTIFICATION: Notification = Notification {
    title: "Quick break! ☀️",
    message: "Take a break and recharge.",
};
pub const FOCUS_NOTIFICATION: Notification = Notification {
    title: "Focus time! ⚡",
    message: "Let's get to work!",
};
pub const SESSION_ENDED_NOTIFICATION: Notification = Notification {
    title: "Session ended! 🎉",
    message: "You have completed your ultra focus session!",
};

pub trait Audio {
    fn play_sound(&mut self, sound: &str, volume: f64) -> Result<()>;
    fn play_music(&mut self, music: &str, volume: f64, looped: bool) -> Result<()>;
    fn stop_music(&mut self) -> Result<()>;
}

pub trait Notifier {
    /// Shows `notification`; it dismisses itself after [`NOTIFICATION_TIMEOUT`].
    fn show(&mut self, notification: &Notification) -> Result<()>;
}

pub trait Badge {
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn set_color(&mut self, color: &str) -> Result<()>;
}

pub trait RuleSink {
    /// Replaces every installed rule with `rules`.
    fn set_rules(&mut self, rules: &RuleSet) -> Result<()>;
    /// Removes every installed rule.
    fn clear_rules(&mut self) -> Result<()>;
}

/// The full set of collaborators handed to the engine.
pub struct Host {
    pub audio: Box<dyn Audio>,
    pub notifier: Box<dyn Notifier>,
    pub badge: Box<dyn Badge>,
    pub rules: Box<dyn RuleSink>,
}

impl Host {
    /// Collaborators used by the `watch` command.
    pub fn console(store: Store) -> Self {
        Self {
            audio: Box::new(TerminalAudio::default()),
            notifier: Box::new(TerminalNotifier),
            badge: Box::new(StoreBadge::new(store.clone())),
            rules: Box::new(StoreRuleSink::new(store)),
        }
    }
}

/// Rings the terminal bell for sounds and tracks which music would play.
#[derive(Default)]
pub struct TerminalAudio {
    music: Option<String>,
}

impl Audio for TerminalAudio {
    fn play_sound(&mut self, sound: &str, volume: f64) -> Result<()> {
        print!("\x07");
        msg_debug!(Message::SoundPlayed(sound.to_string(), volume));
        Ok(())
    }

    fn play_music(&mut self, music: &str, volume: f64, looped: bool) -> Result<()> {
        self.music = Some(music.to_string());
        msg_debug!(Message::MusicStarted(music.to_string(), volume, looped));
        Ok(())
    }

    fn stop_music(&mut self) -> Result<()> {
        if let Some(music) = self.music.take() {
            msg_debug!(Message::MusicStopped(music));
        }
        Ok(())
    }
}

/// Prints notifications and logs their dismissal once the timeout passes.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn show(&mut self, notification: &Notification) -> Result<()> {
        msg_print!(Message::Notification(notification.title.to_string(), notification.message.to_string()));

        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let title = notification.title;
            runtime.spawn(async move {
                tokio::time::sleep(NOTIFICATION_TIMEOUT).await;
                msg_debug!(Message::NotificationDismissed(title.to_string()));
            });
        }
        Ok(())
    }
}

/// Publishes the badge under the `badgeText` and `badgeColor` keys.
pub struct StoreBadge {
    store: Store,
}

impl StoreBadge {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Badge for StoreBadge {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if !self.store.set_deferred(keys::BADGE_TEXT, text)? {
            msg_debug!(Message::StoreWriteDeferred(keys::BADGE_TEXT.to_string()));
        }
        Ok(())
    }

    fn set_color(&mut self, color: &str) -> Result<()> {
        self.store.set(keys::BADGE_COLOR, color)?;
        Ok(())
    }
}

/// Publishes the installed rule list under the `blockingRules` key.
pub struct StoreRuleSink {
    store: Store,
}

impl StoreRuleSink {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The rules currently installed, empty when none are.
    pub fn installed(store: &Store) -> Result<RuleSet> {
        Ok(store.get(keys::BLOCKING_RULES)?.unwrap_or_default())
    }
}

impl RuleSink for StoreRuleSink {
    fn set_rules(&mut self, rules: &RuleSet) -> Result<()> {
        self.store.set(keys::BLOCKING_RULES, rules)?;
        Ok(())
    }

    fn clear_rules(&mut self) -> Result<()> {
        self.store.set(keys::BLOCKING_RULES, &RuleSet::default())?;
        Ok(())
    }
}
