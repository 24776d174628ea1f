pub mod config;
pub mod history;
pub mod sites;
pub mod timer;
pub mod todo;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the timer in the foreground")]
    Watch,
    #[command(about = "Start a focus session")]
    Start,
    #[command(about = "Stop the current session")]
    Stop,
    #[command(about = "Show the timer status")]
    Status,
    #[command(about = "Show or change settings")]
    Config(config::ConfigArgs),
    #[command(about = "Manage the todo list")]
    Todo(todo::TodoArgs),
    #[command(about = "Manage blocked sites and allowed URLs")]
    Sites(sites::SitesArgs),
    #[command(about = "Show focus history")]
    History(history::HistoryArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Watch => watch::cmd().await,
            Commands::Start => timer::start(),
            Commands::Stop => timer::stop(),
            Commands::Status => timer::status(),
            Commands::Config(args) => config::cmd(args),
            Commands::Todo(args) => todo::cmd(args),
            Commands::Sites(args) => sites::cmd(args),
            Commands::History(args) => history::cmd(args),
        }
    }
}
