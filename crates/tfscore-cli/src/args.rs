use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "tfscore",
    version,
    about = "Grade per-subject Terraform state snapshots and rank them"
)]
pub struct Args {
    /// Directory holding one subdirectory per subject
    #[arg(short, long)]
    pub directory: PathBuf,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "csv")]
    pub format: OutputFormat,

    /// Score missing resources as failing checks instead of skipping the subject
    #[arg(long)]
    pub lenient: bool,

    /// State file name looked up in each subject directory
    #[arg(long, default_value = tfscore_core::config::DEFAULT_STATE_FILE)]
    pub state_file: String,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Text,
}
