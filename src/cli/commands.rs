use crate::cli::args::{Cli, Commands, RunOptions};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::processors::ClimatePipeline;
use crate::readers::CountyScanner;
use crate::utils::progress::ProgressReporter;
use crate::writers::{write_report_json, write_table, OutputFormat, ParquetWriter};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Process {
            options,
            output_file,
            neighbors,
            compression,
            report_file,
        } => {
            let mut config = apply_overrides(load_config(cli.config.as_deref())?, &options);
            if let Some(path) = output_file {
                config.output_file = path;
            }
            if let Some(k) = neighbors {
                config.neighbors = k;
            }
            if let Some(c) = compression {
                config.compression = c;
            }
            let config = config.validated()?;

            println!("Building climate features...");
            print_run_header(&config);
            println!("Output file: {}", config.output_file.display());
            println!("Neighbours: {}", config.neighbors);

            let progress = ProgressReporter::new_spinner("Processing data...", false);
            let pipeline = ClimatePipeline::new(config);
            let (records, report) = pipeline.run(Some(&progress))?;

            println!("\n{}", report.generate_summary());

            let config = pipeline.config();
            let format = write_table(&records, &config.output_file, &config.compression)?;
            print_output_details(&config.output_file, format, records.len())?;

            if let Some(path) = report_file {
                write_report_json(&report, &path)?;
                println!("Report written to {}", path.display());
            }

            println!("Processing complete!");
        }

        Commands::Summarize {
            options,
            output_file,
            compression,
            report_file,
        } => {
            let mut config = apply_overrides(load_config(cli.config.as_deref())?, &options);
            if let Some(path) = output_file {
                config.output_file = path;
            }
            if let Some(c) = compression {
                config.compression = c;
            }
            let config = config.validated()?;

            println!("Summarizing daily observations (no gap filling)...");
            print_run_header(&config);

            let progress = ProgressReporter::new_spinner("Summarizing data...", false);
            let pipeline = ClimatePipeline::new(config);
            let outcome = pipeline.summarize(Some(&progress))?;
            progress.finish_with_message(&format!("Summarized {} county-year rows", outcome.rows.len()));

            println!("\n{}", outcome.missing.generate_summary());

            let config = pipeline.config();
            let format = write_table(&outcome.rows, &config.output_file, &config.compression)?;
            print_output_details(&config.output_file, format, outcome.rows.len())?;

            if let Some(path) = report_file {
                write_report_json(&outcome.missing, &path)?;
                println!("Report written to {}", path.display());
            }
        }

        Commands::Validate { options } => {
            let config =
                apply_overrides(load_config(cli.config.as_deref())?, &options).validated()?;

            println!("Validating observation tree...");
            print_run_header(&config);

            for county in CountyScanner::discover_counties(&config.input_dir)? {
                let inventory = CountyScanner::inventory(&config.input_dir, &county, config.years())?;
                println!(
                    "  {}: {}/{} years present",
                    inventory.county,
                    inventory.years_present.len(),
                    config.year_count()
                );
                for file in &inventory.ignored_files {
                    println!("    ignored file: {}", file);
                }
            }

            let progress = ProgressReporter::new_spinner("Reading source files...", false);
            let outcome = ClimatePipeline::new(config).summarize(Some(&progress))?;
            progress.finish_with_message("Validation complete");

            println!("\n{}", outcome.missing.generate_summary());

            if outcome.missing.is_empty() {
                println!("✅ Every county-year has a readable source file");
            } else {
                println!(
                    "⚠️  {} county-years without data ({} unreadable)",
                    outcome.missing.len(),
                    outcome.missing.unreadable_count()
                );
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = PipelineConfig::load(path)?;
    if let Some(path) = path {
        info!("Loaded configuration from {}", path.display());
    }
    Ok(config)
}

/// Overrides shared by every subcommand; unset flags keep the loaded value.
pub fn apply_overrides(mut config: PipelineConfig, options: &RunOptions) -> PipelineConfig {
    if let Some(dir) = &options.input_dir {
        config.input_dir = PathBuf::from(dir);
    }
    if let Some(year) = options.start_year {
        config.start_year = year;
    }
    if let Some(year) = options.end_year {
        config.end_year = year;
    }
    if let Some(workers) = options.max_workers {
        config.max_workers = workers;
    }
    config
}

fn print_run_header(config: &PipelineConfig) {
    println!("Input directory: {}", config.input_dir.display());
    println!(
        "Years: {}-{}, Workers: {}",
        config.start_year, config.end_year, config.max_workers
    );
}

fn print_output_details(path: &Path, format: OutputFormat, rows: usize) -> Result<()> {
    println!("Wrote {} rows to {}", rows, path.display());
    if format == OutputFormat::Parquet {
        let file_info = ParquetWriter::new().get_file_info(path)?;
        println!("\n{}", file_info.summary());
    }
    Ok(())
}
