use anyhow::Result;
use chrono::Local;
use clap::Args;
use colored::*;
use queue_utilization::Config;
use queue_utilization::PipelineError;
use queue_utilization::report::{ErrorData, ReportData, render_data_table};
use std::ops::ControlFlow;
use std::time::Duration;

use super::{build_pipeline, metrics_line};

#[derive(Args)]
pub struct WatchCommands {
    /// Seconds between refreshes (defaults to refresh_interval_secs)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Print one JSON document per refresh instead of a table
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_watch_command(config: &Config, args: WatchCommands) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let interval = match args.interval {
        Some(0) => anyhow::bail!("--interval must be at least 1 second"),
        Some(secs) => Duration::from_secs(secs),
        None => config.refresh_interval(),
    };

    log::info!("Watching queue {} every {:?}", pipeline.queue_id(), interval);
    if !args.json {
        println!(
            "👀 Watching queue {} every {}s, Ctrl-C to stop",
            config.queue_label().cyan().bold(),
            interval.as_secs()
        );
    }

    let json = args.json;
    let cycle = pipeline.watch(interval, |result| {
        if json {
            print_json(result);
        } else {
            print_table(config, result, &metrics_line(&pipeline.metrics()));
        }
        ControlFlow::Continue(())
    });

    tokio::select! {
        _ = cycle => {}
        _ = tokio::signal::ctrl_c() => {
            log::info!("Interrupted, stopping watch");
            if !json {
                println!();
                println!("{}", "Stopped.".dimmed());
            }
        }
    }

    Ok(())
}

fn print_json(result: Result<ReportData, PipelineError>) {
    let line = match &result {
        Ok(data) => serde_json::to_string(data),
        Err(err) => serde_json::to_string(&ErrorData::from(err)),
    };
    match line {
        Ok(line) => println!("{}", line),
        Err(err) => log::error!("Failed to serialize refresh: {}", err),
    }
}

fn print_table(config: &Config, result: Result<ReportData, PipelineError>, metrics: &str) {
    println!();
    match result {
        Ok(data) => {
            print!("{}", render_data_table(&data, true));
            println!(
                "Last updated: {}  {}",
                data.generated_at.with_timezone(&Local).format("%H:%M:%S"),
                metrics
            );
        }
        Err(err) => {
            eprintln!(
                "❌ {} refresh failed for queue {}: {}",
                Local::now().format("%H:%M:%S"),
                config.queue_label(),
                err
            );
        }
    }
}
