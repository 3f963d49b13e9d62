//! Pair-counting Rand engine.
//!
//! Two interchangeable formulations over the same contingency matrix:
//!
//! - the exact form counts unordered pixel pairs with `C(x,2)` sums and
//!   reports the classic Rand index `(tp+tn)/C(n,2)`;
//! - the approximate N² form replaces every `C(x,2)` sum with `Σx²`, making
//!   probabilities the unit of computation. It reports `1 − (fp+fn)/n²`.
//!
//! The two agree to within `O(1/n)` on large images. Under foreground
//! restriction they differ in how proposal-background pixels are normalized:
//! the exact form keeps the background cell's co-located pairs inside the
//! agreement counts, the N² form treats each such pixel as a singleton
//! cluster via the matrix `aux` term.

use crate::contingency::ContingencyMatrix;
use crate::statistics::ClassificationStatistics;

/// Unordered pairs among `x` items: `x(x-1)/2`.
#[inline]
fn pairs(x: f64) -> f64 {
    x * (x - 1.0) / 2.0
}

/// Classic Rand index from exact pair counting.
///
/// The restricted variant drops ground-truth background from the pair
/// universe and from the row/column sums, but co-located pairs in a
/// proposal-background cell still count as agreement.
pub fn classic_rand_stats(cm: &ContingencyMatrix) -> ClassificationStatistics {
    let start = cm.marginal_start();
    let n_pairs_total = pairs(cm.n());

    let mut true_positives = 0.0;
    let mut n_pos_true = 0.0;
    for i in start..cm.rows() {
        let mut row = 0.0;
        for j in 0..cm.cols() {
            let c = cm.count(i, j) as f64;
            true_positives += pairs(c);
            row += c;
        }
        n_pos_true += pairs(row);
    }

    let mut n_pos_actual = 0.0;
    for j in start..cm.cols() {
        let col: f64 = (start..cm.rows()).map(|i| cm.count(i, j) as f64).sum();
        n_pos_actual += pairs(col);
    }

    let true_negatives = n_pairs_total + true_positives - n_pos_true - n_pos_actual;
    let false_positives = n_pos_actual - true_positives;
    let false_negatives = (n_pairs_total - n_pos_actual) - true_negatives;
    let metric_value = if n_pairs_total > 0.0 {
        (true_positives + true_negatives) / n_pairs_total
    } else {
        1.0
    };

    ClassificationStatistics::from_pair_counts(
        true_positives,
        true_negatives,
        false_positives,
        false_negatives,
        metric_value,
    )
}

/// Approximate Rand statistics in the N² form.
///
/// Squared-sum error terms stand in for pair counts, so the work is done in
/// probabilities. The restricted variant adds `aux/n` to the proposal and
/// joint sums, which treats every ground-truth-foreground pixel the proposal
/// left as background as its own singleton cluster.
pub fn approximate_rand_stats(cm: &ContingencyMatrix) -> ClassificationStatistics {
    let n = cm.n();
    if n == 0.0 {
        return ClassificationStatistics::from_pair_counts(0.0, 0.0, 0.0, 0.0, 1.0);
    }
    let start = cm.marginal_start();

    let mut sum_a2 = 0.0;
    let mut sum_b2 = 0.0;
    let mut sum_ab2 = 0.0;
    for i in start..cm.rows() {
        let a = cm.a(i);
        sum_a2 += a * a;
        for j in start..cm.cols() {
            let p = cm.p(i, j);
            sum_ab2 += p * p;
        }
    }
    for j in start..cm.cols() {
        let b = cm.b(j);
        sum_b2 += b * b;
    }
    if cm.restricted() {
        sum_b2 += cm.aux() / n;
        sum_ab2 += cm.aux() / n;
    }

    let n2 = n * n;
    let true_positives = n2 * sum_ab2;
    let false_positives = n2 * sum_b2 - true_positives;
    let false_negatives = n2 * sum_a2 - true_positives;
    let true_negatives = n2 - true_positives - false_positives - false_negatives;
    let rand_error = (false_positives + false_negatives) / n2;

    ClassificationStatistics::from_pair_counts(
        true_positives,
        true_negatives,
        false_positives,
        false_negatives,
        1.0 - rand_error,
    )
}

/// Chance-corrected (adjusted) Rand index.
///
/// `(Σ C(n_ij,2) − E) / (½(Σ C(a_i,2) + Σ C(b_j,2)) − E)` with
/// `E = Σ C(a_i,2)·Σ C(b_j,2)/C(n,2)`. A zero denominator yields 0.
pub fn adjusted_rand_index(cm: &ContingencyMatrix) -> f64 {
    let start = cm.marginal_start();
    let n_pairs_total = pairs(cm.n());
    if n_pairs_total == 0.0 {
        return 0.0;
    }

    let mut sum_joint = 0.0;
    let mut sum_rows = 0.0;
    for i in start..cm.rows() {
        let mut row = 0.0;
        for j in 0..cm.cols() {
            let c = cm.count(i, j) as f64;
            sum_joint += pairs(c);
            row += c;
        }
        sum_rows += pairs(row);
    }
    let mut sum_cols = 0.0;
    for j in start..cm.cols() {
        let col: f64 = (start..cm.rows()).map(|i| cm.count(i, j) as f64).sum();
        sum_cols += pairs(col);
    }

    let expected = sum_rows * sum_cols / n_pairs_total;
    let denominator = 0.5 * (sum_rows + sum_cols) - expected;
    if denominator == 0.0 {
        0.0
    } else {
        (sum_joint - expected) / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelMap;

    fn matrix(gt: &LabelMap, prop: &LabelMap, restricted: bool) -> ContingencyMatrix {
        ContingencyMatrix::build(gt, prop, restricted).unwrap()
    }

    /// Independent oracle: iterate every unordered pixel pair.
    fn brute_force_rand(a: &LabelMap, b: &LabelMap) -> f64 {
        let pa = a.pixels();
        let pb = b.pixels();
        let mut agree = 0u64;
        let mut total = 0u64;
        for i in 0..pa.len() {
            for j in (i + 1)..pa.len() {
                let same_a = pa[i] == pa[j];
                let same_b = pb[i] == pb[j];
                if same_a == same_b {
                    agree += 1;
                }
                total += 1;
            }
        }
        agree as f64 / total as f64
    }

    // -----------------------------------------------------------------------
    // Exact form
    // -----------------------------------------------------------------------

    #[test]
    fn identical_maps_score_one() {
        let m = LabelMap::from_rows(&[&[1, 1], &[0, 2]]);
        let stats = classic_rand_stats(&matrix(&m, &m, false));
        assert_eq!(stats.metric_value, 1.0);
        assert_eq!(stats.false_positives, 0.0);
        assert_eq!(stats.false_negatives, 0.0);
        assert_eq!(stats.f_score, 1.0);
    }

    #[test]
    fn standard_rand_is_symmetric() {
        let a = LabelMap::from_rows(&[&[1, 1, 2], &[0, 2, 2], &[3, 3, 0]]);
        let b = LabelMap::from_rows(&[&[1, 2, 2], &[1, 0, 2], &[3, 0, 3]]);
        let ab = classic_rand_stats(&matrix(&a, &b, false));
        let ba = classic_rand_stats(&matrix(&b, &a, false));
        assert!((ab.metric_value - ba.metric_value).abs() < 1e-12);
    }

    #[test]
    fn exact_matches_pairwise_oracle() {
        let a = LabelMap::from_rows(&[&[1, 1, 2, 2], &[1, 0, 0, 2], &[3, 3, 2, 2]]);
        let b = LabelMap::from_rows(&[&[1, 1, 1, 2], &[1, 0, 2, 2], &[3, 0, 2, 2]]);
        let stats = classic_rand_stats(&matrix(&a, &b, false));
        assert!((stats.metric_value - brute_force_rand(&a, &b)).abs() < 1e-12);
    }

    #[test]
    fn one_cluster_versus_all_singletons() {
        // Every pair is joined by A and split by B: zero agreement.
        let a = LabelMap::from_rows(&[&[1, 1], &[1, 1]]);
        let b = LabelMap::from_rows(&[&[1, 2], &[3, 4]]);
        let stats = classic_rand_stats(&matrix(&a, &b, false));
        assert_eq!(stats.metric_value, 0.0);
        assert_eq!(stats.true_positives, 0.0);
        assert_eq!(stats.false_negatives, 6.0);
    }

    #[test]
    fn pair_count_invariant_holds() {
        let a = LabelMap::from_rows(&[&[1, 1, 2], &[0, 2, 2]]);
        let b = LabelMap::from_rows(&[&[1, 2, 2], &[0, 0, 2]]);
        let stats = classic_rand_stats(&matrix(&a, &b, false));
        let total = stats.true_positives
            + stats.true_negatives
            + stats.false_positives
            + stats.false_negatives;
        assert!((total - pairs(6.0)).abs() < 1e-12);
    }

    // -----------------------------------------------------------------------
    // N² form
    // -----------------------------------------------------------------------

    #[test]
    fn n2_identical_maps_score_one() {
        let m = LabelMap::from_rows(&[&[1, 1], &[0, 2]]);
        let stats = approximate_rand_stats(&matrix(&m, &m, false));
        assert!((stats.metric_value - 1.0).abs() < 1e-12);
        assert!(stats.false_positives.abs() < 1e-9);
        assert!(stats.false_negatives.abs() < 1e-9);
    }

    #[test]
    fn n2_one_cluster_versus_all_singletons_by_hand() {
        // n = 4, every joint cell holds one pixel: tp = n²·(4/16) = 4,
        // fp = 0, fn = 16 − 4 = 12, so the reported value is 4/16.
        let a = LabelMap::from_rows(&[&[1, 1], &[1, 1]]);
        let b = LabelMap::from_rows(&[&[1, 2], &[3, 4]]);
        let stats = approximate_rand_stats(&matrix(&a, &b, false));
        assert!((stats.true_positives - 4.0).abs() < 1e-9);
        assert!(stats.false_positives.abs() < 1e-9);
        assert!((stats.false_negatives - 12.0).abs() < 1e-9);
        assert!((stats.metric_value - 0.25).abs() < 1e-12);
    }

    #[test]
    fn n2_tracks_exact_form_on_4x4_grid() {
        // Two half-image clusters with a one-pixel defect.
        let a = LabelMap::from_rows(&[
            &[1, 1, 2, 2],
            &[1, 1, 2, 2],
            &[1, 1, 2, 2],
            &[1, 1, 2, 2],
        ]);
        let b = LabelMap::from_rows(&[
            &[1, 1, 2, 2],
            &[1, 2, 2, 2],
            &[1, 1, 2, 2],
            &[1, 1, 2, 2],
        ]);
        let exact = classic_rand_stats(&matrix(&a, &b, false));
        let approx = approximate_rand_stats(&matrix(&a, &b, false));
        assert!((exact.metric_value - brute_force_rand(&a, &b)).abs() < 1e-12);
        // n = 16: the two normalizations differ by O(1/n).
        assert!((exact.metric_value - approx.metric_value).abs() < 0.1);
    }

    #[test]
    fn n2_converges_to_exact_on_larger_grids() {
        let side = 32usize;
        let mut a = LabelMap::new(side, side);
        let mut b = LabelMap::new(side, side);
        for y in 0..side {
            for x in 0..side {
                a.set(x, y, if x < side / 2 { 1 } else { 2 });
                // Proposal shifts the boundary by one column.
                b.set(x, y, if x < side / 2 + 1 { 1 } else { 2 });
            }
        }
        let exact = classic_rand_stats(&matrix(&a, &b, false));
        let approx = approximate_rand_stats(&matrix(&a, &b, false));
        assert!((exact.metric_value - approx.metric_value).abs() < 1e-2);
    }

    // -----------------------------------------------------------------------
    // Foreground restriction
    // -----------------------------------------------------------------------

    #[test]
    fn restricted_equals_standard_without_background() {
        let a = LabelMap::from_rows(&[&[1, 1, 2], &[1, 2, 2]]);
        let b = LabelMap::from_rows(&[&[1, 2, 2], &[1, 1, 2]]);
        let std_exact = classic_rand_stats(&matrix(&a, &b, false));
        let fg_exact = classic_rand_stats(&matrix(&a, &b, true));
        assert!((std_exact.metric_value - fg_exact.metric_value).abs() < 1e-12);
        let std_n2 = approximate_rand_stats(&matrix(&a, &b, false));
        let fg_n2 = approximate_rand_stats(&matrix(&a, &b, true));
        assert!((std_n2.metric_value - fg_n2.metric_value).abs() < 1e-12);
    }

    #[test]
    fn restricted_ignores_ground_truth_background_pixels() {
        // The proposal disagrees only where the ground truth is unlabeled.
        let gt = LabelMap::from_rows(&[&[1, 1, 0, 0]]);
        let clean = LabelMap::from_rows(&[&[1, 1, 0, 0]]);
        let noisy = LabelMap::from_rows(&[&[1, 1, 2, 2]]);
        let s_clean = classic_rand_stats(&matrix(&gt, &clean, true));
        let s_noisy = classic_rand_stats(&matrix(&gt, &noisy, true));
        assert_eq!(s_clean.metric_value, s_noisy.metric_value);
        assert_eq!(s_noisy.metric_value, 1.0);
    }

    #[test]
    fn restricted_singleton_penalty_in_n2_form() {
        // One foreground pixel labeled background by the proposal: the aux
        // term keeps it as a singleton instead of a cluster of its own.
        let gt = LabelMap::from_rows(&[&[1, 1, 1, 1]]);
        let prop = LabelMap::from_rows(&[&[1, 1, 1, 0]]);
        let stats = approximate_rand_stats(&matrix(&gt, &prop, true));
        // sumAB2 = 9/16 + 1/16, sumA2 = 1, sumB2 = 9/16 + 1/16.
        assert!((stats.true_positives - 10.0).abs() < 1e-9);
        assert!(stats.false_positives.abs() < 1e-9);
        assert!((stats.false_negatives - 6.0).abs() < 1e-9);
        assert!((stats.metric_value - (1.0 - 6.0 / 16.0)).abs() < 1e-12);
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let a = LabelMap::from_rows(&[&[1, 1, 2, 3], &[0, 2, 2, 3]]);
        let b = LabelMap::from_rows(&[&[1, 2, 2, 2], &[0, 0, 3, 3]]);
        for restricted in [false, true] {
            let cm = matrix(&a, &b, restricted);
            for stats in [classic_rand_stats(&cm), approximate_rand_stats(&cm)] {
                for v in [stats.precision, stats.recall, stats.f_score] {
                    assert!((0.0..=1.0).contains(&v), "out of range: {v}");
                }
            }
        }
    }

    #[test]
    fn empty_restricted_base_is_degenerate_not_nan() {
        let gt = LabelMap::new(2, 2);
        let prop = LabelMap::from_rows(&[&[1, 1], &[1, 1]]);
        let cm = matrix(&gt, &prop, true);
        for stats in [classic_rand_stats(&cm), approximate_rand_stats(&cm)] {
            assert!(!stats.metric_value.is_nan());
            assert!(!stats.precision.is_nan());
            assert!(!stats.f_score.is_nan());
        }
    }

    // -----------------------------------------------------------------------
    // Adjusted form
    // -----------------------------------------------------------------------

    #[test]
    fn adjusted_rand_of_permuted_labels_is_one() {
        let a = LabelMap::from_rows(&[&[1, 1, 2], &[2, 2, 3]]);
        let b = LabelMap::from_rows(&[&[3, 3, 1], &[1, 1, 2]]);
        let ari = adjusted_rand_index(&matrix(&a, &b, false));
        assert!((ari - 1.0).abs() < 1e-12);
    }

    #[test]
    fn adjusted_rand_of_singletons_against_one_cluster_is_zero() {
        // Joint and column pair sums are both zero, so the numerator is the
        // negated expectation 6·0/6 = 0 over a denominator of 3.
        let a = LabelMap::from_rows(&[&[1, 1], &[1, 1]]);
        let b = LabelMap::from_rows(&[&[1, 2], &[3, 4]]);
        let ari = adjusted_rand_index(&matrix(&a, &b, false));
        assert_eq!(ari, 0.0);
    }
}
