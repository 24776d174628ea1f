use pomodoro_grande::commands::Cli;
use pomodoro_grande::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pomodoro_grande=debug")))
            .with_target(false)
            .init();
    }

    Cli::menu().await
}
