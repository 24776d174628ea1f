//! User-facing messages.
//!
//! Every text the application prints or logs is a [`Message`] variant; the
//! wording lives in one `Display` impl and the `msg_*!` macros decide whether
//! it goes to the console or to `tracing`.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
