use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;

use cli::commands::{handle_members_command, handle_report_command, handle_watch_command};
use cli::{Cli, Commands};
use queue_utilization::Config;

fn init_logging(to_stderr: bool) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if !to_stderr {
        // Log to file (truncated on each run) so the table output stays clean
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open("queue-utilization.log")?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_stderr)?;
    info!("Starting queue-utilization");

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(queue) = cli.queue {
        config.queue_id = Some(queue);
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }

    match cli.command {
        Commands::Report(args) => handle_report_command(&config, args).await,
        Commands::Watch(args) => handle_watch_command(&config, args).await,
        Commands::Members(args) => handle_members_command(&config, args).await,
    }
}
