use super::commands::{MembersCommands, ReportCommands, WatchCommands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "queue-utilization")]
#[command(about = "Per-agent channel capacity report for a Genesys Cloud routing queue")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Queue id, overriding config and environment
    #[arg(long, global = true)]
    pub queue: Option<String>,

    /// Utilization requests in flight at once
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Log to stderr instead of queue-utilization.log
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the report once and print it
    Report(ReportCommands),
    /// Rebuild the report on a fixed interval until interrupted
    Watch(WatchCommands),
    /// List the queue's members
    Members(MembersCommands),
}
