//! Slice concurrency orchestrator.
//!
//! Three aggregation patterns over 3D stacks, each owning a scoped worker
//! pool that is joined on every exit path:
//!
//! 1. per-slice fan-out with macro-averaging: workers claim slice indices
//!    from an atomic counter, failed slices are logged and counted, and the
//!    sum of completed scores is divided by the *total* slice count — a
//!    failing slice therefore biases the average, which is why the result
//!    carries `failed_slices` alongside the value;
//! 2. chunked range-claiming into a preallocated per-slice results vector,
//!    retaining full per-slice detail with positional determinism;
//! 3. micro-averaging: one pooled contingency matrix accumulated across
//!    every slice before a single statistic is derived. Macro and micro
//!    values are distinct metrics and are not interchangeable.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use crate::contingency::ContingencyAccumulator;
use crate::error::MetricResult;
use crate::label::{LabelMap, ProbabilityMap};
use crate::labeling::Labeling;
use crate::metric::{EvaluationConfig, Normalization, PairEvaluation, evaluate_at_threshold};
use crate::rand_index::approximate_rand_stats;
use crate::statistics::ClassificationStatistics;

/// Macro-averaged score over a stack, with failure accounting.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SliceAverage {
    /// Sum of completed slice scores divided by the total slice count.
    pub value: f64,
    /// Slices that panicked, errored, or produced NaN.
    pub failed_slices: usize,
    pub slice_count: usize,
}

/// Resolve a requested worker count against host parallelism and depth.
pub fn thread_count(requested: Option<usize>, depth: usize) -> usize {
    let available = requested
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |p| p.get()));
    available.max(1).min(depth.max(1))
}

// ---------------------------------------------------------------------------
// Pattern 1: per-slice fan-out, macro-average
// ---------------------------------------------------------------------------

/// Fan one score task per slice over a bounded worker pool and macro-average.
///
/// `score_slice` runs once per slice index; a panic or NaN return is logged
/// under `batch_label` and skipped, and the final sum is still divided by
/// `depth`.
pub fn average_slice_scores<F>(
    batch_label: &str,
    depth: usize,
    threads: usize,
    score_slice: F,
) -> SliceAverage
where
    F: Fn(usize) -> f64 + Sync,
{
    if depth == 0 {
        return SliceAverage {
            value: 0.0,
            failed_slices: 0,
            slice_count: 0,
        };
    }

    let next = AtomicUsize::new(0);
    let totals: Mutex<(f64, usize)> = Mutex::new((0.0, 0));

    std::thread::scope(|s| {
        for _ in 0..threads.min(depth) {
            s.spawn(|| {
                let mut sum = 0.0;
                let mut failures = 0usize;
                loop {
                    let i = next.fetch_add(1, Ordering::Relaxed);
                    if i >= depth {
                        break;
                    }
                    match catch_unwind(AssertUnwindSafe(|| score_slice(i))) {
                        Ok(score) if !score.is_nan() => sum += score,
                        Ok(_) => {
                            log::warn!("{batch_label}: slice {i} produced NaN, skipped");
                            failures += 1;
                        }
                        Err(_) => {
                            log::warn!("{batch_label}: slice {i} failed, skipped");
                            failures += 1;
                        }
                    }
                }
                let mut totals = totals.lock().unwrap();
                totals.0 += sum;
                totals.1 += failures;
            });
        }
    });

    let (sum, failed_slices) = totals.into_inner().unwrap();
    SliceAverage {
        value: sum / depth as f64,
        failed_slices,
        slice_count: depth,
    }
}

/// Macro-averaged F-score of a probability stack pair at one threshold.
pub fn macro_average_score(
    gt: &[ProbabilityMap],
    proposal: &[ProbabilityMap],
    threshold: f64,
    config: &EvaluationConfig,
    labeling: &dyn Labeling,
) -> MetricResult<SliceAverage> {
    let depth = validate_probability_stacks(gt, proposal)?;
    let threads = thread_count(config.threads, depth);
    Ok(average_slice_scores(
        "macro-average",
        depth,
        threads,
        |i| match evaluate_at_threshold(&gt[i], &proposal[i], threshold, config, labeling) {
            Ok(eval) => eval.f_score(),
            Err(_) => f64::NAN,
        },
    ))
}

// ---------------------------------------------------------------------------
// Pattern 2: chunked range-claiming, per-slice detail
// ---------------------------------------------------------------------------

/// Compute one result per slice with a fixed chunk partition.
///
/// `threads` workers claim chunk indices from an atomic counter until every
/// chunk of `ceil(depth/threads)` slices is taken, computing their ranges
/// sequentially. Each result lands at its slice index regardless of
/// completion order; a panicking or erroring slice leaves `None`.
pub fn per_slice_results<T, F>(
    batch_label: &str,
    depth: usize,
    threads: usize,
    task: F,
) -> Vec<Option<T>>
where
    T: Send,
    F: Fn(usize) -> Option<T> + Sync,
{
    if depth == 0 {
        return Vec::new();
    }

    let chunk_size = depth.div_ceil(threads.max(1));
    let n_chunks = depth.div_ceil(chunk_size);
    let next_chunk = AtomicUsize::new(0);
    let results: Mutex<Vec<Option<T>>> = Mutex::new((0..depth).map(|_| None).collect());

    std::thread::scope(|s| {
        for _ in 0..threads.min(n_chunks) {
            s.spawn(|| {
                loop {
                    let k = next_chunk.fetch_add(1, Ordering::Relaxed);
                    if k >= n_chunks {
                        break;
                    }
                    let start = k * chunk_size;
                    let end = (start + chunk_size).min(depth);
                    let mut chunk: Vec<Option<T>> = Vec::with_capacity(end - start);
                    for i in start..end {
                        let value = match catch_unwind(AssertUnwindSafe(|| task(i))) {
                            Ok(v) => v,
                            Err(_) => {
                                log::warn!("{batch_label}: slice {i} failed, result dropped");
                                None
                            }
                        };
                        chunk.push(value);
                    }
                    let mut results = results.lock().unwrap();
                    for (offset, value) in chunk.into_iter().enumerate() {
                        results[start + offset] = value;
                    }
                }
            });
        }
    });

    results.into_inner().unwrap()
}

/// Per-slice statistics of a probability stack pair at one threshold.
pub fn per_slice_statistics(
    gt: &[ProbabilityMap],
    proposal: &[ProbabilityMap],
    threshold: f64,
    config: &EvaluationConfig,
    labeling: &dyn Labeling,
) -> MetricResult<Vec<Option<PairEvaluation>>> {
    let depth = validate_probability_stacks(gt, proposal)?;
    let threads = thread_count(config.threads, depth);
    Ok(per_slice_results("per-slice", depth, threads, |i| {
        evaluate_at_threshold(&gt[i], &proposal[i], threshold, config, labeling).ok()
    }))
}

// ---------------------------------------------------------------------------
// Pattern 3: micro-average (pooled contingency)
// ---------------------------------------------------------------------------

/// Pair-counting statistics from one contingency matrix pooled across every
/// slice of a label stack.
///
/// This micro-average weighs every pixel pair equally across the stack and
/// generally differs from macro-averaging the per-slice values.
pub fn pooled_rand_statistics(
    gt: &[LabelMap],
    proposal: &[LabelMap],
    normalization: Normalization,
    threads: Option<usize>,
) -> MetricResult<ClassificationStatistics> {
    let depth = validate_label_stacks(gt, proposal)?;
    let restricted = normalization == Normalization::ForegroundRestricted;
    let threads = thread_count(threads, depth);

    let chunk_size = depth.max(1).div_ceil(threads);
    let n_chunks = depth.div_ceil(chunk_size.max(1));
    let next_chunk = AtomicUsize::new(0);
    let pooled: Mutex<ContingencyAccumulator> = Mutex::new(ContingencyAccumulator::new(restricted));
    let first_error: Mutex<Option<crate::error::MetricError>> = Mutex::new(None);

    std::thread::scope(|s| {
        for _ in 0..threads.min(n_chunks.max(1)) {
            s.spawn(|| {
                let mut local = ContingencyAccumulator::new(restricted);
                loop {
                    let k = next_chunk.fetch_add(1, Ordering::Relaxed);
                    if k >= n_chunks {
                        break;
                    }
                    let start = k * chunk_size;
                    let end = (start + chunk_size).min(depth);
                    for i in start..end {
                        if let Err(e) = local.add_pair(&gt[i], &proposal[i]) {
                            first_error.lock().unwrap().get_or_insert(e);
                        }
                    }
                }
                pooled.lock().unwrap().merge(&local);
            });
        }
    });

    if let Some(e) = first_error.into_inner().unwrap() {
        return Err(e);
    }
    let matrix = pooled.into_inner().unwrap().finish();
    Ok(approximate_rand_stats(&matrix))
}

// ---------------------------------------------------------------------------
// Stack validation
// ---------------------------------------------------------------------------

fn validate_probability_stacks(
    gt: &[ProbabilityMap],
    proposal: &[ProbabilityMap],
) -> MetricResult<usize> {
    if gt.len() != proposal.len() {
        return Err(crate::error::MetricError::DepthMismatch {
            depth_a: gt.len(),
            depth_b: proposal.len(),
        });
    }
    for (a, b) in gt.iter().zip(proposal) {
        if !a.same_shape(b) {
            return Err(crate::error::MetricError::ShapeMismatch {
                width_a: a.width(),
                height_a: a.height(),
                width_b: b.width(),
                height_b: b.height(),
            });
        }
    }
    Ok(gt.len())
}

fn validate_label_stacks(gt: &[LabelMap], proposal: &[LabelMap]) -> MetricResult<usize> {
    if gt.len() != proposal.len() {
        return Err(crate::error::MetricError::DepthMismatch {
            depth_a: gt.len(),
            depth_b: proposal.len(),
        });
    }
    for (a, b) in gt.iter().zip(proposal) {
        if !a.same_shape(b) {
            return Err(a.shape_mismatch(b));
        }
    }
    Ok(gt.len())
}
