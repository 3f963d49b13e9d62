//! Metric variant selection and pure-function dispatch.
//!
//! Every metric variant is a value: a [`MetricFamily`] and [`Normalization`]
//! tag pair inside an immutable [`EvaluationConfig`], dispatched by pattern
//! match to a pure `(LabelMap, LabelMap) -> statistics` function. No global
//! flags, no inheritance.

use serde::Serialize;

use crate::contingency::ContingencyMatrix;
use crate::error::MetricResult;
use crate::information::information_statistics;
use crate::label::{Connectivity, LabelMap, ProbabilityMap};
use crate::labeling::{Labeling, labeled_pair};
use crate::rand_index::approximate_rand_stats;
use crate::statistics::{ClassificationStatistics, InformationStatistics};

/// Which metric family scores a pair of label maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricFamily {
    /// Pair-counting agreement (Rand index family).
    Rand,
    /// Information-theoretic divergence (variation of information family).
    VariationOfInformation,
}

impl std::fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rand => write!(f, "rand"),
            Self::VariationOfInformation => write!(f, "vi"),
        }
    }
}

/// How the comparison denominator treats ground-truth background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Normalization {
    /// Background is an ordinary cluster.
    #[default]
    Standard,
    /// Ground-truth background is excluded from the denominator.
    ForegroundRestricted,
}

impl std::fmt::Display for Normalization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::ForegroundRestricted => write!(f, "foreground-restricted"),
        }
    }
}

/// Immutable per-call evaluation configuration.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationConfig {
    pub family: MetricFamily,
    pub normalization: Normalization,
    /// Compare thinned boundary placement instead of region overlap.
    pub thin: bool,
    pub connectivity: Connectivity,
    /// Worker threads for multi-slice calls; `None` = host parallelism.
    pub threads: Option<usize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            family: MetricFamily::Rand,
            normalization: Normalization::Standard,
            thin: false,
            connectivity: Connectivity::Four,
            threads: None,
        }
    }
}

impl EvaluationConfig {
    pub(crate) fn restricted(&self) -> bool {
        self.normalization == Normalization::ForegroundRestricted
    }
}

/// Statistics for one evaluated pair, tagged by family.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum PairEvaluation {
    Rand(ClassificationStatistics),
    Information(InformationStatistics),
}

impl PairEvaluation {
    /// The family's raw metric: Rand index, or variation of information.
    pub fn metric_value(&self) -> f64 {
        match self {
            Self::Rand(s) => s.metric_value,
            Self::Information(s) => s.variation_of_information,
        }
    }

    /// The family's F-score, the quantity threshold sweeps maximize.
    pub fn f_score(&self) -> f64 {
        match self {
            Self::Rand(s) => s.f_score,
            Self::Information(s) => s.f_score(),
        }
    }
}

/// Evaluate one pair of label maps under the configured variant.
pub fn evaluate_pair(
    gt: &LabelMap,
    proposal: &LabelMap,
    config: &EvaluationConfig,
) -> MetricResult<PairEvaluation> {
    let cm = ContingencyMatrix::build(gt, proposal, config.restricted())?;
    Ok(match config.family {
        MetricFamily::Rand => PairEvaluation::Rand(approximate_rand_stats(&cm)),
        MetricFamily::VariationOfInformation => {
            PairEvaluation::Information(information_statistics(&cm))
        }
    })
}

/// Binarize, label, and evaluate one probability-map pair at a threshold.
pub fn evaluate_at_threshold(
    gt: &ProbabilityMap,
    proposal: &ProbabilityMap,
    threshold: f64,
    config: &EvaluationConfig,
    labeling: &dyn Labeling,
) -> MetricResult<PairEvaluation> {
    let (gt_labels, proposal_labels) = labeled_pair(
        gt,
        proposal,
        threshold,
        config.thin,
        config.connectivity,
        labeling,
    )?;
    evaluate_pair(&gt_labels, &proposal_labels, config)
}
