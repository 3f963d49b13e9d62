//! CLI for segscore — objective scores for predicted segmentations.

mod commands;
mod io;
mod labeling;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "segscore")]
#[command(about = "segscore — score predicted segmentations against ground truth")]
#[command(version = segscore_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep a threshold range and print the best F-score
    Best {
        /// Ground-truth image file or slice directory
        gt: PathBuf,

        /// Proposal probability image file or slice directory
        proposal: PathBuf,

        /// Lowest threshold (inclusive)
        #[arg(long, default_value = "0.0")]
        min: f64,

        /// Highest threshold (inclusive)
        #[arg(long, default_value = "1.0")]
        max: f64,

        /// Threshold increment
        #[arg(long, default_value = "0.1")]
        step: f64,

        /// Metric family
        #[arg(long, default_value = "rand", value_parser = ["rand", "vi"])]
        metric: String,

        /// Exclude ground-truth background from the comparison denominator
        #[arg(long)]
        foreground_restricted: bool,

        /// Compare thinned boundary placement instead of region overlap
        #[arg(long)]
        thin: bool,

        /// Pixel connectivity for component labeling
        #[arg(long, default_value = "4", value_parser = ["4", "8"])]
        connectivity: String,

        /// Worker threads (default: host parallelism)
        #[arg(long)]
        threads: Option<usize>,

        /// Write the full sweep as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Print full per-slice statistics at a fixed threshold
    Stats {
        /// Ground-truth image file or slice directory
        gt: PathBuf,

        /// Proposal probability image file or slice directory
        proposal: PathBuf,

        /// Binarization threshold for the proposal
        #[arg(long, default_value = "0.5")]
        threshold: f64,

        /// Metric family
        #[arg(long, default_value = "rand", value_parser = ["rand", "vi"])]
        metric: String,

        /// Exclude ground-truth background from the comparison denominator
        #[arg(long)]
        foreground_restricted: bool,

        /// Compare thinned boundary placement instead of region overlap
        #[arg(long)]
        thin: bool,

        /// Pixel connectivity for component labeling
        #[arg(long, default_value = "4", value_parser = ["4", "8"])]
        connectivity: String,

        /// Worker threads (default: host parallelism)
        #[arg(long)]
        threads: Option<usize>,

        /// Also pool one contingency matrix over the whole stack (rand only)
        #[arg(long)]
        micro: bool,

        /// Write the statistics as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Print a per-slice score table at a fixed threshold
    Slices {
        /// Ground-truth image file or slice directory
        gt: PathBuf,

        /// Proposal probability image file or slice directory
        proposal: PathBuf,

        /// Binarization threshold for the proposal
        #[arg(long, default_value = "0.5")]
        threshold: f64,

        /// Metric family
        #[arg(long, default_value = "rand", value_parser = ["rand", "vi"])]
        metric: String,

        /// Exclude ground-truth background from the comparison denominator
        #[arg(long)]
        foreground_restricted: bool,

        /// Compare thinned boundary placement instead of region overlap
        #[arg(long)]
        thin: bool,

        /// Pixel connectivity for component labeling
        #[arg(long, default_value = "4", value_parser = ["4", "8"])]
        connectivity: String,

        /// Worker threads (default: host parallelism)
        #[arg(long)]
        threads: Option<usize>,

        /// Write the score table as JSON
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Best {
            gt,
            proposal,
            min,
            max,
            step,
            metric,
            foreground_restricted,
            thin,
            connectivity,
            threads,
            output,
        } => commands::best::run(commands::best::BestCommandConfig {
            gt: &gt,
            proposal: &proposal,
            min,
            max,
            step,
            metric: &metric,
            foreground_restricted,
            thin,
            connectivity: &connectivity,
            threads,
            output: output.as_deref(),
        }),
        Commands::Stats {
            gt,
            proposal,
            threshold,
            metric,
            foreground_restricted,
            thin,
            connectivity,
            threads,
            micro,
            output,
        } => commands::stats::run(commands::stats::StatsCommandConfig {
            gt: &gt,
            proposal: &proposal,
            threshold,
            metric: &metric,
            foreground_restricted,
            thin,
            connectivity: &connectivity,
            threads,
            micro,
            output: output.as_deref(),
        }),
        Commands::Slices {
            gt,
            proposal,
            threshold,
            metric,
            foreground_restricted,
            thin,
            connectivity,
            threads,
            output,
        } => commands::slices::run(commands::slices::SlicesCommandConfig {
            gt: &gt,
            proposal: &proposal,
            threshold,
            metric: &metric,
            foreground_restricted,
            thin,
            connectivity: &connectivity,
            threads,
            output: output.as_deref(),
        }),
    }
}
