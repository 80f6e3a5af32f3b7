use clap::{Parser, Subcommand};
use gmslicer::commands::{self, SliceOptions};
use gmslicer::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gmslicer")]
#[command(about = "Turns simulated magnetic domains into stepper-motor command tables")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice a model snapshot into a command table
    Slice {
        /// Model snapshot exported from the simulation (JSON)
        #[arg(short, long)]
        model: PathBuf,

        /// Config file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Command table output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a JSON run report here
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Linear travel per motor revolution (meters)
        #[arg(long)]
        distance_per_rev: Option<f64>,

        /// Motor steps per revolution
        #[arg(long)]
        steps_per_rev: Option<i64>,

        /// Head rotation per motor step (degrees)
        #[arg(long)]
        degrees_per_step: Option<f64>,

        /// Group Z values within this distance (meters) into one layer
        #[arg(long)]
        layer_tolerance: Option<f64>,

        /// Exit with an error if anything was skipped
        #[arg(long)]
        strict: bool,
    },
    /// Summarize the moves in a command table
    Inspect {
        /// Command table CSV
        table: PathBuf,
    },
    /// Write a config file with default settings
    InitConfig {
        /// Destination (.toml or .json)
        path: PathBuf,

        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Slice {
            model,
            config,
            output,
            report,
            distance_per_rev,
            steps_per_rev,
            degrees_per_step,
            layer_tolerance,
            strict,
        } => {
            let options = SliceOptions {
                model,
                config,
                output,
                report,
                distance_per_rev,
                steps_per_rev,
                degrees_per_step,
                layer_tolerance,
            };
            let report = commands::slice(&options)?;
            println!("{} rows written ({} layers)", report.rows_written, report.layer_count);
            if strict && !report.is_clean() {
                eprintln!("{} issue(s) found, see log for details", report.issue_count());
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Inspect { table } => {
            let summary = commands::inspect(&table)?;
            print!("{}", summary);
        }
        Commands::InitConfig { path, force } => {
            commands::init_config(&path, force)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
