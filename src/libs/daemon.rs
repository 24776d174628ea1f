//! The background watcher behind the `watch` command.
//!
//! The watcher owns the [`Engine`] and is the only process that runs the
//! timer. Other invocations of the CLI talk to it through the store: they
//! edit settings and todos, and queue `start-timer` / `stop-timer` commands.
//! The watcher loop multiplexes three event sources:
//!
//! ```text
//!  ticks (TokioTicker) ──┐
//!  store poll (250 ms) ──┼──▶ select! ──▶ Engine
//!  shutdown signal ──────┘
//! ```
//!
//! On shutdown the running session is stopped, so the blocking rules are
//! removed and the session lands in the history.

use crate::db::store::{Store, StoreError};
use crate::libs::config::{Config, ConfigPatch};
use crate::libs::engine::{Command, Engine};
use crate::libs::host::Host;
use crate::libs::messages::Message;
use crate::libs::scheduler::TokioTicker;
use crate::{msg_debug, msg_error, msg_info, msg_warning};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;

/// How often the store is checked for changes and queued commands.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Runs the watcher until SIGTERM, SIGINT or Ctrl+C.
pub async fn run_with_signal_handling() -> Result<()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(_) => {
                    msg_error!(Message::FailedToCreateSigtermHandler);
                    return;
                }
            };
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(sigint) => sigint,
                Err(_) => {
                    msg_error!(Message::FailedToCreateSigintHandler);
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => {
                    msg_info!(Message::WatcherReceivedSigterm);
                }
                _ = sigint.recv() => {
                    msg_info!(Message::WatcherReceivedSigint);
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    msg_info!(Message::WatcherReceivedCtrlC);
                }
                Err(e) => {
                    msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
        // Keep the sender alive so the watcher is not shut down at once.
        std::mem::forget(shutdown_tx);
    }

    run(Store::new()?, shutdown_rx).await
}

/// Runs the watcher on `store` until `shutdown` resolves.
pub async fn run(store: Store, mut shutdown: oneshot::Receiver<()>) -> Result<()> {
    Config::install_defaults(&store)?;

    let (ticker, mut ticks) = TokioTicker::new();
    let mut engine = Engine::new(store.clone(), Box::new(ticker), Host::console(store.clone()));
    let mut watcher = StoreWatcher::new(store.clone())?;

    let mut poll = tokio::time::interval(POLL_INTERVAL);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    msg_info!(Message::WatcherStarted);
    loop {
        tokio::select! {
            Some(id) = ticks.recv() => engine.tick(id),
            _ = poll.tick() => {
                if let Err(e) = store.flush_pending() {
                    msg_warning!(Message::StoreWriteFailed(e.to_string()));
                }
                if let Err(e) = watcher.poll(&mut engine) {
                    msg_warning!(Message::StoreReadFailed(e.to_string()));
                }
            }
            _ = &mut shutdown => break,
        }
    }

    msg_info!(Message::WatcherShuttingDown);
    engine.stop();
    if let Err(e) = store.flush_pending() {
        msg_warning!(Message::StoreWriteFailed(e.to_string()));
    }
    Ok(())
}

/// Feeds store changes and queued commands to the engine.
pub struct StoreWatcher {
    store: Store,
    revision: i64,
}

impl StoreWatcher {
    /// Starts watching from the store's current revision. Entries written
    /// before this point are expected to be loaded by the engine already.
    pub fn new(store: Store) -> Result<Self, StoreError> {
        let revision = store.revision()?;
        Ok(Self { store, revision })
    }

    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Applies every change since the previous poll, then every queued
    /// command in order. Settings go first so that a `start` queued right
    /// after a settings edit sees the new values.
    pub fn poll(&mut self, engine: &mut Engine) -> Result<(), StoreError> {
        let changes = self.store.changes_since(self.revision)?;
        if let Some(last) = changes.last() {
            self.revision = last.revision;
            let patch = ConfigPatch::from_changes(&changes);
            if !patch.is_empty() {
                msg_debug!(format!("applying {} store change(s)", changes.len()));
                engine.apply_config_patch(patch);
            }
        }

        for name in self.store.take_commands()? {
            match name.parse::<Command>() {
                Ok(command) => engine.handle(command),
                Err(_) => msg_warning!(Message::UnknownEngineCommand(name)),
            }
        }
        Ok(())
    }
}
