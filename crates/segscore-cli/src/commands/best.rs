//! `best` — sweep a threshold range and report the best F-score.

use std::path::Path;

use segscore_core::{ThresholdRange, ThresholdScore, sweep};
use serde::Serialize;

use crate::labeling::GridLabeling;

pub struct BestCommandConfig<'a> {
    pub gt: &'a Path,
    pub proposal: &'a Path,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub metric: &'a str,
    pub foreground_restricted: bool,
    pub thin: bool,
    pub connectivity: &'a str,
    pub threads: Option<usize>,
    pub output: Option<&'a str>,
}

#[derive(Serialize)]
struct BestReport<'a> {
    metric: &'a str,
    foreground_restricted: bool,
    thinned: bool,
    range: ThresholdRange,
    scores: &'a [ThresholdScore],
    best: ThresholdScore,
}

pub fn run(cfg: BestCommandConfig<'_>) {
    let range = ThresholdRange::new(cfg.min, cfg.max, cfg.step);
    if !range.is_valid() {
        eprintln!(
            "Invalid threshold range: --min {} --max {} --step {}",
            cfg.min, cfg.max, cfg.step
        );
        eprintln!("Usage: segscore best <GT> <PROPOSAL> --min M --max X --step S (0 <= M <= X <= 1, S > 0)");
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

    println!(
        "Sweeping {} slice(s), metric {} ({}{})...\n",
        gt.len(),
        config.family,
        config.normalization,
        if config.thin { ", thinned" } else { "" }
    );

    let Some(result) = sweep(&gt, &proposal, &range, &config, &GridLabeling) else {
        eprintln!("Sweep failed; see log output for details.");
        std::process::exit(1);
    };

    println!("{:>10} {:>10} {:>8}", "Threshold", "F-score", "Failed");
    println!("{}", "-".repeat(30));
    for s in result.scores() {
        println!("{:>10.4} {:>10.6} {:>8}", s.threshold, s.score, s.failed_slices);
    }

    let best = result.best();
    println!(
        "\nBest F-score {:.6} at threshold {:.4}",
        best.score, best.threshold
    );

    if let Some(path) = cfg.output {
        let report = BestReport {
            metric: cfg.metric,
            foreground_restricted: cfg.foreground_restricted,
            thinned: cfg.thin,
            range,
            scores: result.scores(),
            best,
        };
        super::write_json_or_exit(path, &report);
    }
}
