//! `slices` — per-slice score table at a fixed threshold.

use std::path::Path;

use segscore_core::{PairEvaluation, per_slice_statistics};
use serde::Serialize;

use crate::labeling::GridLabeling;

pub struct SlicesCommandConfig<'a> {
    pub gt: &'a Path,
    pub proposal: &'a Path,
    pub threshold: f64,
    pub metric: &'a str,
    pub foreground_restricted: bool,
    pub thin: bool,
    pub connectivity: &'a str,
    pub threads: Option<usize>,
    pub output: Option<&'a str>,
}

#[derive(Serialize)]
struct SlicesReport {
    metric: String,
    threshold: f64,
    slices: Vec<Option<PairEvaluation>>,
}

pub fn run(cfg: SlicesCommandConfig<'_>) {
    if !(0.0..=1.0).contains(&cfg.threshold) {
        eprintln!("Invalid threshold {} (expected 0..=1)", cfg.threshold);
        std::process::exit(1);
    }

    let (gt, proposal) = super::load_stacks_or_exit(cfg.gt, cfg.proposal);
    let config = super::build_config(
        cfg.metric,
        cfg.foreground_restricted,
        cfg.thin,
        cfg.connectivity,
        cfg.threads,
    );

    let slices = match per_slice_statistics(&gt, &proposal, cfg.threshold, &config, &GridLabeling)
    {
        Ok(slices) => slices,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    println!(
        "{:>6} {:>12} {:>10} {:>10} {:>10}",
        "Slice", "Metric", "Precision", "Recall", "F-score"
    );
    println!("{}", "-".repeat(52));
    for (i, slice) in slices.iter().enumerate() {
        match slice {
            Some(eval) => {
                let (p, r) = match eval {
                    PairEvaluation::Rand(s) => (s.precision, s.recall),
                    PairEvaluation::Information(s) => (s.precision(), s.recall()),
                };
                println!(
                    "{i:>6} {:>12.6} {p:>10.4} {r:>10.4} {:>10.4}",
                    eval.metric_value(),
                    eval.f_score()
                );
            }
            None => println!("{i:>6} {:>12}", "failed"),
        }
    }

    if let Some(path) = cfg.output {
        let report = SlicesReport {
            metric: config.family.to_string(),
            threshold: cfg.threshold,
            slices,
        };
        super::write_json_or_exit(path, &report);
    }
}
