//! Persistence layer built on SQLite.
//!
//! Everything the timer keeps between runs lives in one key-value store.
//! The background watcher and every CLI invocation open the same database
//! file and communicate only through it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pomodoro_grande::db::{store::Store, todos::Todos};
//!
//! let store = Store::new()?;
//! let todos = Todos::new(store.clone());
//! todos.insert("Write the weekly report")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Database connection management.
pub mod db;

/// Names of the stored entries.
pub mod keys;

/// Key-value store with change tracking and the command queue.
pub mod store;

/// Todo list operations on top of the store.
pub mod todos;
