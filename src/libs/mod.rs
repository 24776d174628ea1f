//! Core library modules of the timer.
//!
//! - **Timer**: [`engine`], [`timer`], [`scheduler`]
//! - **Settings and data**: [`config`], [`todo`], [`history`], [`data_storage`]
//! - **Site blocking**: [`blocker`]
//! - **Side effects**: [`host`] (sounds, notifications, badge, rule installation)
//! - **Watcher**: [`daemon`]
//! - **Console output**: [`messages`], [`formatter`], [`view`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pomodoro_grande::db::store::Store;
//! use pomodoro_grande::libs::engine::Engine;
//! use pomodoro_grande::libs::host::Host;
//! use pomodoro_grande::libs::scheduler::TokioTicker;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store = Store::new()?;
//! let (ticker, mut ticks) = TokioTicker::new();
//! let mut engine = Engine::new(store.clone(), Box::new(ticker), Host::console(store));
//!
//! engine.start();
//! while let Some(id) = ticks.recv().await {
//!     engine.tick(id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod blocker;
pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod engine;
pub mod formatter;
pub mod history;
pub mod host;
pub mod messages;
pub mod scheduler;
pub mod timer;
pub mod todo;
pub mod view;
