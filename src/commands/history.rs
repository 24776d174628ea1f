use crate::{
    db::store::Store,
    libs::{
        history::{self, recent, totals},
        messages::Message,
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of past days to show
    #[arg(short, long, default_value_t = 7)]
    days: u64,
}

pub fn cmd(args: HistoryArgs) -> Result<()> {
    let store = Store::new()?;
    let records = recent(&history::load(&store)?, Local::now().date_naive(), args.days);

    if records.is_empty() {
        msg_info!(Message::NoHistory);
        return Ok(());
    }

    msg_print!(Message::HistoryHeader(args.days), true);
    View::history(&records, &totals(&records))?;
    Ok(())
}
