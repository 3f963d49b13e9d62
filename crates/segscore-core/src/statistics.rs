//! Statistics value records shared by the pair-counting and
//! information-theoretic engines.
//!
//! Both records are plain value objects: created once per (slice, threshold)
//! evaluation, never mutated afterwards. Degenerate denominators are resolved
//! by explicit conventions at construction time so no field ever holds NaN or
//! an infinity.

use serde::Serialize;

/// Pair-counting agreement statistics between two label maps.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ClassificationStatistics {
    /// Pairs placed in the same cluster by both maps.
    pub true_positives: f64,
    /// Pairs placed in different clusters by both maps.
    pub true_negatives: f64,
    /// Pairs joined by the proposal but split by the ground truth.
    pub false_positives: f64,
    /// Pairs split by the proposal but joined by the ground truth.
    pub false_negatives: f64,
    /// The agreement metric itself (Rand index, or 1 − Rand error).
    pub metric_value: f64,
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
}

impl ClassificationStatistics {
    /// Assemble a record from raw pair counts plus the reported metric value.
    ///
    /// `tp+fp = 0` defines precision as 0 and `tp+fn = 0` defines recall as 0;
    /// `precision+recall = 0` defines the F-score as 0.
    pub fn from_pair_counts(
        true_positives: f64,
        true_negatives: f64,
        false_positives: f64,
        false_negatives: f64,
        metric_value: f64,
    ) -> Self {
        let precision = if true_positives + false_positives > 0.0 {
            (true_positives / (true_positives + false_positives)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let recall = if true_positives + false_negatives > 0.0 {
            (true_positives / (true_positives + false_negatives)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            true_positives,
            true_negatives,
            false_positives,
            false_negatives,
            metric_value,
            precision,
            recall,
            f_score: harmonic_f_score(precision, recall),
        }
    }
}

/// Information-theoretic divergence statistics between two label maps.
///
/// All entropies are natural-log based. The variation of information is the
/// sum of the two conditional entropies.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct InformationStatistics {
    /// Ground-truth cluster entropy H(A).
    pub entropy_a: f64,
    /// Proposal cluster entropy H(B).
    pub entropy_b: f64,
    /// H(A|B).
    pub conditional_a_given_b: f64,
    /// H(B|A).
    pub conditional_b_given_a: f64,
    /// H(A|B) + H(B|A).
    pub variation_of_information: f64,
}

impl InformationStatistics {
    /// Information-theoretic precision: mutual information over H(A).
    ///
    /// A zero-entropy ground truth defines precision as 0; a zero-entropy
    /// proposal defines it as 1.
    pub fn precision(&self) -> f64 {
        if self.entropy_a == 0.0 {
            return 0.0;
        }
        if self.entropy_b == 0.0 {
            return 1.0;
        }
        ((self.entropy_a - self.conditional_a_given_b) / self.entropy_a).clamp(0.0, 1.0)
    }

    /// Information-theoretic recall: mutual information over H(B).
    ///
    /// A zero-entropy ground truth defines recall as 1; a zero-entropy
    /// proposal defines it as 0.
    pub fn recall(&self) -> f64 {
        if self.entropy_a == 0.0 {
            return 1.0;
        }
        if self.entropy_b == 0.0 {
            return 0.0;
        }
        ((self.entropy_b - self.conditional_b_given_a) / self.entropy_b).clamp(0.0, 1.0)
    }

    /// Harmonic mean of the information-theoretic precision and recall.
    pub fn f_score(&self) -> f64 {
        harmonic_f_score(self.precision(), self.recall())
    }
}

/// `2pr/(p+r)`, defined as 0 when both terms are 0.
pub(crate) fn harmonic_f_score(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}
