use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use queue_utilization::Config;
use queue_utilization::report::{ReportData, render_table};

use super::{build_pipeline, metrics_line};

#[derive(Args)]
pub struct ReportCommands {
    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Pretty print JSON output
    #[arg(short, long, requires = "json")]
    pub pretty: bool,
}

pub async fn handle_report_command(config: &Config, args: ReportCommands) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let report = pipeline.run().await.context("Report generation failed")?;

    if report.is_empty() {
        anyhow::bail!("No members found in queue {}", config.queue_label());
    }

    if args.json {
        let data = ReportData::from_report(pipeline.queue_id(), &report);
        let json = if args.pretty {
            serde_json::to_string_pretty(&data)?
        } else {
            serde_json::to_string(&data)?
        };
        println!("{}", json);
        return Ok(());
    }

    println!(
        "📊 Utilization for queue {}",
        config.queue_label().cyan().bold()
    );
    println!();
    print!("{}", render_table(&report, true));
    println!();

    if report.failed_count() > 0 {
        println!(
            "⚠️  {} of {} agents could not be fetched (shown as -)",
            report.failed_count().to_string().yellow(),
            report.rows().len()
        );
    }
    println!("{}", metrics_line(&pipeline.metrics()));

    Ok(())
}
