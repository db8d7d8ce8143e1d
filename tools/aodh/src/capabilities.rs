//! Capabilities command

use anyhow::Result;
use aodh_client::Client;
use clap::Subcommand;
use serde_json::Value;

use crate::output::{render_object, OutputFormat};

#[derive(Subcommand)]
pub enum CapabilitiesCommands {
    /// List capabilities of the alarming service
    List,
}

pub async fn handle_command(
    cmd: CapabilitiesCommands,
    client: &Client,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        CapabilitiesCommands::List => {
            let capabilities = match client.capabilities().list().await? {
                Value::Object(map) => map,
                other => anyhow::bail!("unexpected capabilities response: {}", other),
            };
            println!("{}", render_object(&capabilities, format)?);
        },
    }
    Ok(())
}
