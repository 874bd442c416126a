use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use queue_utilization::Config;

use super::build_pipeline;

#[derive(Args)]
pub struct MembersCommands {
    /// Print members as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_members_command(config: &Config, args: MembersCommands) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let token = pipeline
        .token_cache()
        .get_token()
        .await
        .context("Authentication failed")?;
    let members = pipeline
        .member_lister()
        .list_members(&token)
        .await
        .context("Could not list queue members")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&members)?);
        return Ok(());
    }

    println!(
        "👥 {} members in queue {}",
        members.len().to_string().bold(),
        config.queue_label().cyan()
    );
    for member in &members {
        println!(
            "  {}  {}",
            member.name,
            member.id.as_deref().unwrap_or("(no id)").dimmed()
        );
    }

    Ok(())
}
