use crate::libs::daemon;
use anyhow::Result;

/// Runs the timer engine until interrupted.
pub async fn cmd() -> Result<()> {
    daemon::run_with_signal_handling().await
}
