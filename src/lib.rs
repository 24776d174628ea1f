//! # Pomodoro Grande
//!
//! A Pomodoro timer with a site blocker, driven from the command line.
//!
//! ## Features
//!
//! - **Focus sessions**: work and break phases with a long break after every
//!   fourth pomodoro, or a single ultra focus session without breaks
//! - **Site blocking**: distracting domains are blocked during work phases,
//!   with an allow list for specific pages
//! - **Todos**: completed todos are counted per session
//! - **History**: per-day pomodoro, todo and focus-time statistics
//!
//! A long-running `watch` process owns the timer. Every other command
//! talks to it through the shared store.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pomodoro_grande::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
