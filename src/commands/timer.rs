use crate::{
    db::{keys, store::Store},
    libs::{
        config::Config,
        engine::Command,
        host::StoreRuleSink,
        messages::Message,
        timer::TimerState,
        view::View,
    },
    msg_print, msg_success,
};
use anyhow::Result;

pub fn start() -> Result<()> {
    send(&Store::new()?, Command::Start)
}

pub fn stop() -> Result<()> {
    send(&Store::new()?, Command::Stop)
}

pub fn status() -> Result<()> {
    let store = Store::new()?;
    let config = Config::load(&store);
    let state = TimerState::load(&store, &config)?;
    let badge_text: Option<String> = store.get(keys::BADGE_TEXT)?;
    let rules = StoreRuleSink::installed(&store)?;

    msg_print!(Message::StatusHeader, true);
    View::status(&state, &config, badge_text.as_deref(), rules.rules.len())?;
    Ok(())
}

/// Queues `command` for the watcher.
pub fn send(store: &Store, command: Command) -> Result<()> {
    store.push_command(command.as_str())?;
    msg_success!(Message::CommandQueued(command.as_str().to_string()));
    Ok(())
}
