//! `stats` — full statistics at a fixed threshold.

use std::path::Path;

use segscore_core::{
    ClassificationStatistics, LabelMap, MetricFamily, PairEvaluation, SliceAverage, labeled_pair,
    macro_average_score, per_slice_statistics, pooled_rand_statistics,
};
use serde::Serialize;

use crate::labeling::GridLabeling;

pub struct StatsCommandConfig<'a> {
    pub gt: &'a Path,
    pub proposal: &'a Path,
    pub threshold: f64,
    pub metric: &'a str,
    pub foreground_restricted: bool,
    pub thin: bool,
    pub connectivity: &'a str,
    pub threads: Option<usize>,
    /// Also derive one pooled statistic across the whole stack.
    pub micro: bool,
    pub output: Option<&'a str>,
}

#[derive(Serialize)]
struct StatsReport {
    metric: String,
    foreground_restricted: bool,
    thinned: bool,
    threshold: f64,
    slices: Vec<Option<PairEvaluation>>,
    macro_average: SliceAverage,
    #[serde(skip_serializing_if = "Option::is_none")]
    micro: Option<ClassificationStatistics>,
}

pub fn run(cfg: StatsCommandConfig<'_>) {
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
    let macro_average =
        match macro_average_score(&gt, &proposal, cfg.threshold, &config, &GridLabeling) {
            Ok(avg) => avg,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        };

    println!(
        "Threshold {:.4}, metric {} ({}{}), {} slice(s)\n",
        cfg.threshold,
        config.family,
        config.normalization,
        if config.thin { ", thinned" } else { "" },
        gt.len()
    );

    for (i, slice) in slices.iter().enumerate() {
        match slice {
            Some(PairEvaluation::Rand(s)) => {
                println!(
                    "slice {i:>3}: rand {:.6}  tp {:.0} tn {:.0} fp {:.0} fn {:.0}  p {:.4} r {:.4} f {:.4}",
                    s.metric_value,
                    s.true_positives,
                    s.true_negatives,
                    s.false_positives,
                    s.false_negatives,
                    s.precision,
                    s.recall,
                    s.f_score
                );
            }
            Some(PairEvaluation::Information(s)) => {
                println!(
                    "slice {i:>3}: vi {:.6}  H(A) {:.4} H(B) {:.4} H(A|B) {:.4} H(B|A) {:.4}  p {:.4} r {:.4} f {:.4}",
                    s.variation_of_information,
                    s.entropy_a,
                    s.entropy_b,
                    s.conditional_a_given_b,
                    s.conditional_b_given_a,
                    s.precision(),
                    s.recall(),
                    s.f_score()
                );
            }
            None => println!("slice {i:>3}: failed"),
        }
    }

    println!(
        "\nMacro-averaged F-score: {:.6} ({} of {} slices failed)",
        macro_average.value, macro_average.failed_slices, macro_average.slice_count
    );

    let micro = if cfg.micro {
        if config.family != MetricFamily::Rand {
            eprintln!("--micro applies to the rand metric only, skipping");
            None
        } else {
            match pooled_stats(&gt, &proposal, cfg.threshold, &config) {
                Ok(stats) => {
                    println!(
                        "Micro (pooled) rand: {:.6}  p {:.4} r {:.4} f {:.4}",
                        stats.metric_value, stats.precision, stats.recall, stats.f_score
                    );
                    Some(stats)
                }
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
    } else {
        None
    };

    if let Some(path) = cfg.output {
        let report = StatsReport {
            metric: config.family.to_string(),
            foreground_restricted: cfg.foreground_restricted,
            thinned: cfg.thin,
            threshold: cfg.threshold,
            slices,
            macro_average,
            micro,
        };
        super::write_json_or_exit(path, &report);
    }
}

/// Label every slice pair, then pool one contingency matrix over the stack.
fn pooled_stats(
    gt: &[segscore_core::ProbabilityMap],
    proposal: &[segscore_core::ProbabilityMap],
    threshold: f64,
    config: &segscore_core::EvaluationConfig,
) -> segscore_core::MetricResult<ClassificationStatistics> {
    let mut gt_labels: Vec<LabelMap> = Vec::with_capacity(gt.len());
    let mut proposal_labels: Vec<LabelMap> = Vec::with_capacity(proposal.len());
    for (a, b) in gt.iter().zip(proposal) {
        let (la, lb) = labeled_pair(
            a,
            b,
            threshold,
            config.thin,
            config.connectivity,
            &GridLabeling,
        )?;
        gt_labels.push(la);
        proposal_labels.push(lb);
    }
    pooled_rand_statistics(
        &gt_labels,
        &proposal_labels,
        config.normalization,
        config.threads,
    )
}
