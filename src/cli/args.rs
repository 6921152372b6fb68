use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "climate-features")]
#[command(about = "Annual county climate features from daily NOAA observations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

/// Overrides layered on top of the loaded configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    #[arg(short, long, help = "Root directory holding one sub-directory per county")]
    pub input_dir: Option<PathBuf>,

    #[arg(long)]
    pub start_year: Option<i32>,

    #[arg(long)]
    pub end_year: Option<i32>,

    #[arg(long)]
    pub max_workers: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize, fill gaps and write the feature table
    Process {
        #[command(flatten)]
        options: RunOptions,

        #[arg(
            short,
            long,
            help = "Output file; a .parquet extension writes Parquet, anything else CSV"
        )]
        output_file: Option<PathBuf>,

        #[arg(short = 'k', long, help = "Neighbours used for gap filling")]
        neighbors: Option<usize>,

        #[arg(short, long, help = "Parquet compression (snappy, gzip, lz4, zstd, none)")]
        compression: Option<String>,

        #[arg(long, help = "Write the missing-data and imputation report as JSON")]
        report_file: Option<PathBuf>,
    },

    /// Write the annual table without gap filling
    Summarize {
        #[command(flatten)]
        options: RunOptions,

        #[arg(short, long)]
        output_file: Option<PathBuf>,

        #[arg(short, long)]
        compression: Option<String>,

        #[arg(long, help = "Write the missing-data report as JSON")]
        report_file: Option<PathBuf>,
    },

    /// Check which county-years have usable source files, writing nothing
    Validate {
        #[command(flatten)]
        options: RunOptions,
    },
}
