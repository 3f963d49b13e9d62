//! CLI subcommands and shared helpers.

pub mod best;
pub mod slices;
pub mod stats;

use std::path::Path;

use segscore_core::{Connectivity, EvaluationConfig, MetricFamily, Normalization, ProbabilityMap};
use serde::Serialize;

use crate::io::load_stack;

/// Assemble the immutable evaluation configuration from CLI flags.
pub(crate) fn build_config(
    metric: &str,
    foreground_restricted: bool,
    thin: bool,
    connectivity: &str,
    threads: Option<usize>,
) -> EvaluationConfig {
    EvaluationConfig {
        family: match metric {
            "vi" => MetricFamily::VariationOfInformation,
            _ => MetricFamily::Rand,
        },
        normalization: if foreground_restricted {
            Normalization::ForegroundRestricted
        } else {
            Normalization::Standard
        },
        thin,
        connectivity: match connectivity {
            "8" => Connectivity::Eight,
            _ => Connectivity::Four,
        },
        threads,
    }
}

/// Load the ground-truth and proposal stacks, exiting on failure.
pub(crate) fn load_stacks_or_exit(
    gt: &Path,
    proposal: &Path,
) -> (Vec<ProbabilityMap>, Vec<ProbabilityMap>) {
    let gt_stack = match load_stack(gt) {
        Ok(stack) => stack,
        Err(e) => {
            eprintln!("Failed to load ground truth: {e}");
            std::process::exit(1);
        }
    };
    let proposal_stack = match load_stack(proposal) {
        Ok(stack) => stack,
        Err(e) => {
            eprintln!("Failed to load proposal: {e}");
            std::process::exit(1);
        }
    };
    (gt_stack, proposal_stack)
}

/// Write a JSON report, exiting on failure.
pub(crate) fn write_json_or_exit<T: Serialize>(path: &str, report: &T) {
    let json = match serde_json::to_string_pretty(report) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialize report: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(path, json) {
        eprintln!("Failed to write {path}: {e}");
        std::process::exit(1);
    }
    println!("Report written to {path}");
}
