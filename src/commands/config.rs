use crate::{
    db::{keys, store::Store},
    libs::{
        config::{Config, ConfigPatch, ONE_MINUTE_MS},
        messages::Message,
        view::View,
    },
    msg_bail_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{builder::BoolishValueParser, Args, Subcommand};

/// Longest phase the CLI accepts, in minutes.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Show the current settings
    Show,
    /// Change one or more settings
    Set(SetArgs),
}

#[derive(Debug, Default, Args)]
pub struct SetArgs {
    /// Work phase length in minutes
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_DURATION_MINUTES as u64))]
    pub work: Option<u64>,
    /// Short break length in minutes
    #[arg(long = "break", value_parser = clap::value_parser!(u64).range(1..=MAX_DURATION_MINUTES as u64))]
    pub short_break: Option<u64>,
    /// Long break length in minutes
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_DURATION_MINUTES as u64))]
    pub long_break: Option<u64>,
    /// Play a sound at the end of each phase (on/off)
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub sound: Option<bool>,
    /// Sound to play at the end of each phase
    #[arg(long)]
    pub sound_id: Option<String>,
    /// Sound volume between 0 and 1
    #[arg(long)]
    pub sound_volume: Option<f64>,
    /// Play music during work phases (on/off)
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub music: Option<bool>,
    /// Music to play during work phases
    #[arg(long)]
    pub music_id: Option<String>,
    /// Music volume between 0 and 1
    #[arg(long)]
    pub music_volume: Option<f64>,
    /// Show notifications at phase changes (on/off)
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub notifications: Option<bool>,
    /// One long work session without breaks (on/off)
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub ultra: Option<bool>,
}

impl SetArgs {
    pub fn to_patch(&self) -> ConfigPatch {
        ConfigPatch {
            work_time: self.work.map(minutes_to_millis),
            break_time: self.short_break.map(minutes_to_millis),
            long_break: self.long_break.map(minutes_to_millis),
            sound_enabled: self.sound,
            selected_sound: self.sound_id.clone(),
            sound_volume: self.sound_volume,
            music_enabled: self.music,
            selected_music: self.music_id.clone(),
            music_volume: self.music_volume,
            notifications_enabled: self.notifications,
            ultra_focus_mode: self.ultra,
            ..Default::default()
        }
    }
}

fn minutes_to_millis(minutes: u64) -> u64 {
    minutes.saturating_mul(ONE_MINUTE_MS)
}

pub fn cmd(args: ConfigArgs) -> Result<()> {
    let store = Store::new()?;
    match args.command {
        Some(ConfigCommand::Set(set)) => {
            set_config(&store, &set)?;
            Ok(())
        }
        Some(ConfigCommand::Show) | None => show(&store),
    }
}

fn show(store: &Store) -> Result<()> {
    let config = Config::load(store);
    let ultra: bool = store.get(keys::ULTRA_FOCUS_MODE)?.unwrap_or(false);

    msg_print!(Message::ConfigHeader, true);
    View::config(&config, ultra)?;
    Ok(())
}

/// Saves the settings in `args`. Returns whether anything was written.
///
/// Durations are refused with an error while a session runs, so a phase
/// never changes length under the user's feet.
pub fn set_config(store: &Store, args: &SetArgs) -> Result<bool> {
    let patch = args.to_patch();
    if patch.is_empty() {
        msg_info!(Message::ConfigNothingToChange);
        return Ok(false);
    }

    let is_running: bool = store.get(keys::IS_RUNNING)?.unwrap_or(false);
    if is_running && patch.changes_durations() {
        msg_bail_anyhow!(Message::DurationsLockedWhileRunning);
    }

    patch.save(store)?;
    msg_success!(Message::ConfigSaved);
    Ok(true)
}
