//! Information-theoretic VI engine.
//!
//! Derives cluster entropies, conditional entropies, and the variation of
//! information from a contingency matrix. Zero-probability terms are skipped
//! in every entropy sum (the `!= 0` guard); this is the entropy-side
//! NaN-suppression policy, distinct from the `is_nan` guard the slice
//! orchestrator applies to whole-slice scores.

use crate::contingency::ContingencyMatrix;
use crate::statistics::InformationStatistics;

/// `x·ln(x)` with the zero term skipped.
#[inline]
fn x_ln_x(x: f64) -> f64 {
    if x != 0.0 { x * x.ln() } else { 0.0 }
}

/// Entropy and variation-of-information statistics for a contingency matrix.
///
/// The restricted variant subtracts `aux·ln(n)` from the proposal and joint
/// sums, which scores the ground-truth foreground mass the proposal left as
/// background as per-pixel singleton clusters.
pub fn information_statistics(cm: &ContingencyMatrix) -> InformationStatistics {
    let n = cm.n();
    if n == 0.0 {
        return InformationStatistics {
            entropy_a: 0.0,
            entropy_b: 0.0,
            conditional_a_given_b: 0.0,
            conditional_b_given_a: 0.0,
            variation_of_information: 0.0,
        };
    }
    let start = cm.marginal_start();

    let mut sum_a = 0.0;
    let mut sum_b = 0.0;
    let mut sum_ab = 0.0;
    for i in start..cm.rows() {
        sum_a += x_ln_x(cm.a(i));
        for j in start..cm.cols() {
            sum_ab += x_ln_x(cm.p(i, j));
        }
    }
    for j in start..cm.cols() {
        sum_b += x_ln_x(cm.b(j));
    }
    if cm.restricted() {
        let correction = cm.aux() * n.ln();
        sum_b -= correction;
        sum_ab -= correction;
    }

    InformationStatistics {
        entropy_a: -sum_a,
        entropy_b: -sum_b,
        conditional_a_given_b: sum_b - sum_ab,
        conditional_b_given_a: sum_a - sum_ab,
        variation_of_information: sum_a + sum_b - 2.0 * sum_ab,
    }
}
