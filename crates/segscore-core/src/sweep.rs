//! Threshold sweep optimizer.
//!
//! Re-binarizes the proposal at each threshold of an inclusive range,
//! scores the stack under the configured metric variant, and tracks the best
//! F-score. An invalid range is logged and answered with `None` — no
//! computation is performed.

use serde::Serialize;

use crate::label::ProbabilityMap;
use crate::labeling::Labeling;
use crate::metric::EvaluationConfig;
use crate::stack::macro_average_score;

/// Inclusive threshold range with a positive step.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ThresholdRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ThresholdRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Contract: `0 ≤ min ≤ max ≤ 1`, and `step > 0` unless the range is a
    /// single point.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.min)
            && self.min <= self.max
            && self.max <= 1.0
            && (self.step > 0.0 || self.min == self.max)
    }

    /// Thresholds visited, lowest first. Empty when the range is invalid.
    pub fn thresholds(&self) -> Vec<f64> {
        if !self.is_valid() {
            return Vec::new();
        }
        if self.step <= 0.0 {
            return vec![self.min];
        }
        let mut out = Vec::new();
        let mut k = 0u32;
        loop {
            let th = self.min + f64::from(k) * self.step;
            // Half-step slack absorbs accumulated floating-point error at
            // the inclusive upper bound.
            if th > self.max + self.step * 0.5 {
                break;
            }
            out.push(th.min(self.max));
            k += 1;
        }
        out
    }
}

/// Score of one visited threshold.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ThresholdScore {
    pub threshold: f64,
    pub score: f64,
    /// Slices that failed while scoring this threshold.
    pub failed_slices: usize,
}

/// Full per-threshold score list from one sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    scores: Vec<ThresholdScore>,
}

impl SweepResult {
    /// Every visited threshold, lowest first.
    pub fn scores(&self) -> &[ThresholdScore] {
        &self.scores
    }

    /// The single best score. Strict `>` comparison: the first (lowest)
    /// threshold achieving the maximum wins ties.
    pub fn best(&self) -> ThresholdScore {
        let mut best = self.scores[0];
        for s in &self.scores[1..] {
            if s.score > best.score {
                best = *s;
            }
        }
        best
    }
}

/// Sweep a probability stack pair over a threshold range.
///
/// Returns `None` without computing anything when the range violates its
/// contract or the stacks do not line up; both cases are logged.
pub fn sweep(
    gt: &[ProbabilityMap],
    proposal: &[ProbabilityMap],
    range: &ThresholdRange,
    config: &EvaluationConfig,
    labeling: &dyn Labeling,
) -> Option<SweepResult> {
    if !range.is_valid() {
        log::error!(
            "invalid threshold range: min {} max {} step {}",
            range.min,
            range.max,
            range.step
        );
        return None;
    }

    let mut scores = Vec::new();
    for th in range.thresholds() {
        let average = match macro_average_score(gt, proposal, th, config, labeling) {
            Ok(avg) => avg,
            Err(e) => {
                log::error!("threshold sweep aborted: {e}");
                return None;
            }
        };
        log::debug!("threshold {th:.4} -> {:.6}", average.value);
        scores.push(ThresholdScore {
            threshold: th,
            score: average.value,
            failed_slices: average.failed_slices,
        });
    }
    Some(SweepResult { scores })
}
