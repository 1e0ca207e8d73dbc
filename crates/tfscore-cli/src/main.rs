use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tfscore_core::config::{GradeConfig, MissingSlotPolicy};
use tfscore_core::report::{model::ToolInfo, render};

mod args;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = args::Args::parse();

    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let config = GradeConfig {
        missing_slot: if args.lenient {
            MissingSlotPolicy::ScoreAsFailing
        } else {
            MissingSlotPolicy::Reject
        },
        state_file: args.state_file.clone(),
        ..GradeConfig::default()
    };

    let report = tfscore_core::run(&args.directory, tool, &config)?;

    let output = match args.format {
        args::OutputFormat::Csv => render::render_csv(&report.leaderboard),
        args::OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        args::OutputFormat::Text => render::render_text(&report),
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), rows = report.leaderboard.len(), "report written");
        }
        None => print!("{output}"),
    }

    Ok(())
}
