//! Alarm history commands

use anyhow::Result;
use aodh_client::Client;
use clap::Subcommand;

use crate::alarm::PaginationArgs;
use crate::output::{list2cols, render_list, OutputFormat};

/// Columns of `alarm-history search`
pub const SEARCH_COLS: [&str; 4] = ["alarm_id", "timestamp", "type", "detail"];

/// Columns of `alarm-history show`
pub const SHOW_COLS: [&str; 3] = ["timestamp", "type", "detail"];

#[derive(Subcommand)]
pub enum AlarmHistoryCommands {
    /// Show history for all alarms based on query
    #[command(about = "Show history for all alarms based on query")]
    Search {
        /// Complex query expression, e.g. '{"=": {"type": "deletion"}}'
        #[arg(long)]
        query: Option<String>,

        #[command(flatten)]
        pagination: PaginationArgs,
    },

    /// Show history for an alarm
    #[command(about = "Show history for an alarm")]
    Show {
        /// ID of an alarm
        alarm_id: String,

        #[command(flatten)]
        pagination: PaginationArgs,
    },
}

pub async fn handle_command(
    cmd: AlarmHistoryCommands,
    client: &Client,
    format: OutputFormat,
) -> Result<()> {
    let history = client.alarm_history();

    let (cols, rows) = match cmd {
        AlarmHistoryCommands::Search { query, pagination } => {
            let rows = history
                .search(query.as_deref(), &pagination.options())
                .await?;
            (&SEARCH_COLS[..], rows)
        },
        AlarmHistoryCommands::Show {
            alarm_id,
            pagination,
        } => {
            let rows = history.get(&alarm_id, &pagination.options()).await?;
            (&SHOW_COLS[..], rows)
        },
    };

    println!("{}", render_list(&list2cols(cols, &rows), format)?);
    Ok(())
}
