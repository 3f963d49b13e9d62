//! Integration tests for segscore-core.
//!
//! These tests verify the full scoring pipeline: probability maps →
//! binarize + label → contingency → statistics → sweep/orchestrator.

use segscore_core::{
    Connectivity, ContingencyMatrix, EvaluationConfig, LabelMap, Labeling, MetricFamily,
    Normalization, PairEvaluation, ProbabilityMap, ThresholdRange, approximate_rand_stats,
    evaluate_pair, per_slice_statistics, pooled_rand_statistics, sweep,
};

/// Minimal collaborator for pipeline tests: binary foreground keeps label 1
/// and thinning passes through.
struct FlatLabeling;

impl Labeling for FlatLabeling {
    fn label_components(&self, binary: &LabelMap, _c: Connectivity) -> LabelMap {
        binary.clone()
    }
    fn thin_borders(&self, binary: &LabelMap, _c: Connectivity) -> LabelMap {
        binary.clone()
    }
}

#[test]
fn identical_pair_is_perfect_under_both_families() {
    let m = LabelMap::from_rows(&[&[1, 1], &[0, 2]]);
    for family in [MetricFamily::Rand, MetricFamily::VariationOfInformation] {
        for normalization in [Normalization::Standard, Normalization::ForegroundRestricted] {
            let config = EvaluationConfig {
                family,
                normalization,
                ..EvaluationConfig::default()
            };
            let eval = evaluate_pair(&m, &m, &config).unwrap();
            assert!(
                (eval.f_score() - 1.0).abs() < 1e-12,
                "{family}/{normalization} f-score"
            );
            let expected = match family {
                MetricFamily::Rand => 1.0,
                MetricFamily::VariationOfInformation => 0.0,
            };
            assert!((eval.metric_value() - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn sweep_end_to_end_over_a_stack() {
    let gt: Vec<ProbabilityMap> = (0..3)
        .map(|_| ProbabilityMap::from_rows(&[&[1.0, 1.0, 0.0, 0.0], &[1.0, 1.0, 0.0, 0.0]]))
        .collect();
    let proposal: Vec<ProbabilityMap> = (0..3)
        .map(|_| ProbabilityMap::from_rows(&[&[0.9, 0.8, 0.2, 0.1], &[0.9, 0.8, 0.2, 0.1]]))
        .collect();

    let config = EvaluationConfig {
        threads: Some(2),
        ..EvaluationConfig::default()
    };
    let result = sweep(
        &gt,
        &proposal,
        &ThresholdRange::new(0.0, 1.0, 0.25),
        &config,
        &FlatLabeling,
    )
    .unwrap();

    assert_eq!(result.scores().len(), 5);
    let best = result.best();
    // Any threshold in (0.2, 0.8) separates the halves perfectly; the first
    // one visited wins.
    assert!((best.threshold - 0.25).abs() < 1e-12);
    assert!((best.score - 1.0).abs() < 1e-12);
    assert_eq!(best.failed_slices, 0);
}

#[test]
fn micro_average_differs_from_macro_average() {
    // Heterogeneous per-slice cluster sizes: slice 1 agrees perfectly,
    // slice 2 merges two ground-truth clusters.
    let gt = vec![
        LabelMap::from_rows(&[&[1, 1], &[1, 1]]),
        LabelMap::from_rows(&[&[1, 1], &[2, 2]]),
    ];
    let proposal = vec![
        LabelMap::from_rows(&[&[1, 1], &[1, 1]]),
        LabelMap::from_rows(&[&[1, 1], &[1, 1]]),
    ];

    // Macro: average the independently derived per-slice Rand values.
    let mut macro_sum = 0.0;
    for (a, b) in gt.iter().zip(&proposal) {
        let cm = ContingencyMatrix::build(a, b, false).unwrap();
        macro_sum += approximate_rand_stats(&cm).metric_value;
    }
    let macro_value = macro_sum / gt.len() as f64;

    // Micro: one pooled contingency matrix across the stack.
    let micro = pooled_rand_statistics(&gt, &proposal, Normalization::Standard, Some(2)).unwrap();

    assert!((macro_value - 0.75).abs() < 1e-12);
    assert!((micro.metric_value - 0.625).abs() < 1e-12);
    // The two aggregations are distinct metrics: equality is not required,
    // and on this stack they genuinely diverge.
    assert!((macro_value - micro.metric_value).abs() > 1e-6);
}

#[test]
fn per_slice_statistics_retain_full_detail() {
    let gt = vec![
        ProbabilityMap::from_rows(&[&[1.0, 0.0], &[1.0, 0.0]]),
        ProbabilityMap::from_rows(&[&[1.0, 1.0], &[0.0, 0.0]]),
    ];
    let proposal = gt.clone();

    let config = EvaluationConfig {
        threads: Some(2),
        ..EvaluationConfig::default()
    };
    let results = per_slice_statistics(&gt, &proposal, 0.5, &config, &FlatLabeling).unwrap();
    assert_eq!(results.len(), 2);
    for r in &results {
        match r {
            Some(PairEvaluation::Rand(s)) => assert!((s.metric_value - 1.0).abs() < 1e-12),
            other => panic!("unexpected slice result: {other:?}"),
        }
    }
}

#[test]
fn mismatched_stacks_are_rejected_up_front() {
    let gt = vec![ProbabilityMap::from_rows(&[&[1.0, 0.0]])];
    let proposal = vec![
        ProbabilityMap::from_rows(&[&[1.0, 0.0]]),
        ProbabilityMap::from_rows(&[&[1.0, 0.0]]),
    ];
    let config = EvaluationConfig::default();
    assert!(per_slice_statistics(&gt, &proposal, 0.5, &config, &FlatLabeling).is_err());

    // Depth mismatch inside a sweep is logged and answered with None.
    assert!(
        sweep(
            &gt,
            &proposal,
            &ThresholdRange::new(0.0, 1.0, 0.5),
            &config,
            &FlatLabeling,
        )
        .is_none()
    );
}

#[test]
fn foreground_restriction_matches_standard_on_full_coverage() {
    // No background anywhere: the restricted denominator equals the full
    // pixel count and both variants must agree.
    let gt = LabelMap::from_rows(&[&[1, 1, 2, 2], &[1, 1, 2, 2]]);
    let proposal = LabelMap::from_rows(&[&[1, 1, 2, 2], &[1, 2, 2, 2]]);
    for family in [MetricFamily::Rand, MetricFamily::VariationOfInformation] {
        let standard = evaluate_pair(
            &gt,
            &proposal,
            &EvaluationConfig {
                family,
                normalization: Normalization::Standard,
                ..EvaluationConfig::default()
            },
        )
        .unwrap();
        let restricted = evaluate_pair(
            &gt,
            &proposal,
            &EvaluationConfig {
                family,
                normalization: Normalization::ForegroundRestricted,
                ..EvaluationConfig::default()
            },
        )
        .unwrap();
        assert!(
            (standard.metric_value() - restricted.metric_value()).abs() < 1e-12,
            "{family} diverged"
        );
    }
}
