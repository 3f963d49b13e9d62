//! # segscore-core
//!
//! **Objective scores for predicted segmentations.**
//!
//! `segscore-core` compares a predicted segmentation against a ground-truth
//! labeling and produces scalar and per-slice quality scores: the Rand-index
//! family (pair-counting agreement) and the variation-of-information family
//! (information-theoretic divergence), each in a standard and a
//! foreground-restricted variant, each exposed as a raw metric, a
//! precision/recall/F-score, and a threshold-sweep optimizer.
//!
//! ## Quick Start
//!
//! ```
//! use segscore_core::{ContingencyMatrix, LabelMap, classic_rand_stats};
//!
//! let gt = LabelMap::from_rows(&[&[1, 1], &[0, 2]]);
//! let proposal = LabelMap::from_rows(&[&[1, 1], &[0, 2]]);
//!
//! let cm = ContingencyMatrix::build(&gt, &proposal, false).unwrap();
//! let stats = classic_rand_stats(&cm);
//! assert_eq!(stats.metric_value, 1.0);
//! ```
//!
//! ## Architecture
//!
//! Probability maps → binarize + label (external collaborators) →
//! contingency matrix → {Rand engine, VI engine} → statistics →
//! threshold sweep and/or slice orchestrator.
//!
//! Connected-component labeling and watershed border thinning are consumed
//! through the [`Labeling`] trait; the engine never labels pixels itself.
//! Multi-slice calls fan out over a scoped worker pool that is torn down on
//! every exit path; failed slices are logged, counted, and skipped, and the
//! macro-average result reports how many were lost.

pub mod contingency;
pub mod error;
pub mod information;
pub mod label;
pub mod labeling;
pub mod metric;
pub mod rand_index;
pub mod stack;
pub mod statistics;
pub mod sweep;

pub use contingency::{ContingencyAccumulator, ContingencyMatrix};
pub use error::{MetricError, MetricResult};
pub use information::information_statistics;
pub use label::{Connectivity, LabelMap, ProbabilityMap};
pub use labeling::{Labeling, MASK_THRESHOLD, labeled_pair};
pub use metric::{
    EvaluationConfig, MetricFamily, Normalization, PairEvaluation, evaluate_at_threshold,
    evaluate_pair,
};
pub use rand_index::{adjusted_rand_index, approximate_rand_stats, classic_rand_stats};
pub use stack::{
    SliceAverage, average_slice_scores, macro_average_score, per_slice_results,
    per_slice_statistics, pooled_rand_statistics, thread_count,
};
pub use statistics::{ClassificationStatistics, InformationStatistics};
pub use sweep::{SweepResult, ThresholdRange, ThresholdScore, sweep};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
