//! Label-overlap (contingency) distribution between two label maps.
//!
//! One pass over paired pixels produces the joint count table; probabilities
//! and marginals are derived against a normalization base `n` that is either
//! the full pixel count (standard) or the ground-truth foreground count
//! (foreground-restricted). Under restriction the ground truth's unlabeled
//! region is treated as don't-care: row 0 and column 0 are excluded from the
//! marginals, while the `aux` term records the ground-truth foreground mass
//! the proposal left as background so later entropy/Rand sums can correct
//! for it.

use crate::error::MetricResult;
use crate::label::LabelMap;

/// Joint pixel-count distribution between a ground-truth map A and a
/// proposal map B.
///
/// Value object: built once per (slice, threshold) evaluation, never mutated.
#[derive(Debug, Clone)]
pub struct ContingencyMatrix {
    rows: usize,
    cols: usize,
    counts: Vec<u64>,
    /// Normalization base: all pixels, or ground-truth foreground pixels.
    n: f64,
    /// Row marginals as probabilities; row 0 zeroed when restricted.
    a: Vec<f64>,
    /// Column marginals as probabilities; column 0 zeroed when restricted.
    b: Vec<f64>,
    /// Ground-truth foreground mass labeled background by the proposal.
    aux: f64,
    restricted: bool,
}

impl ContingencyMatrix {
    /// Cross-tabulate two equal-shaped label maps.
    pub fn build(gt: &LabelMap, proposal: &LabelMap, restricted: bool) -> MetricResult<Self> {
        if !gt.same_shape(proposal) {
            return Err(gt.shape_mismatch(proposal));
        }
        let rows = gt.max_label() as usize + 1;
        let cols = proposal.max_label() as usize + 1;
        let mut counts = vec![0u64; rows * cols];
        for (&la, &lb) in gt.pixels().iter().zip(proposal.pixels()) {
            counts[la as usize * cols + lb as usize] += 1;
        }
        Ok(Self::from_counts(rows, cols, counts, restricted))
    }

    /// Derive marginals, the normalization base, and the `aux` correction
    /// from a raw count table.
    pub fn from_counts(rows: usize, cols: usize, counts: Vec<u64>, restricted: bool) -> Self {
        debug_assert_eq!(counts.len(), rows * cols);
        let total: u64 = counts.iter().sum();
        let background: u64 = if rows > 0 {
            counts[..cols].iter().sum()
        } else {
            0
        };
        let base = if restricted { total - background } else { total };
        let n = base as f64;

        let start = usize::from(restricted);
        let mut a = vec![0.0; rows];
        let mut b = vec![0.0; cols];
        let mut aux_count = 0u64;
        if n > 0.0 {
            for i in start..rows {
                let row = &counts[i * cols..(i + 1) * cols];
                a[i] = row.iter().sum::<u64>() as f64 / n;
                for (j, &c) in row.iter().enumerate().skip(start) {
                    b[j] += c as f64 / n;
                }
                if restricted {
                    aux_count += row[0];
                }
            }
        }
        let aux = if n > 0.0 { aux_count as f64 / n } else { 0.0 };

        Self {
            rows,
            cols,
            counts,
            n,
            a,
            b,
            aux,
            restricted,
        }
    }

    /// Number of ground-truth label rows (max label + 1).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of proposal label columns (max label + 1).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Raw pixel count for ground-truth label `i` and proposal label `j`.
    #[inline]
    pub fn count(&self, i: usize, j: usize) -> u64 {
        self.counts[i * self.cols + j]
    }

    /// Joint probability `counts[i][j] / n`; 0 when the base is empty.
    #[inline]
    pub fn p(&self, i: usize, j: usize) -> f64 {
        if self.n > 0.0 {
            self.count(i, j) as f64 / self.n
        } else {
            0.0
        }
    }

    /// Row marginal probability for ground-truth label `i`.
    #[inline]
    pub fn a(&self, i: usize) -> f64 {
        self.a[i]
    }

    /// Column marginal probability for proposal label `j`.
    #[inline]
    pub fn b(&self, j: usize) -> f64 {
        self.b[j]
    }

    /// Normalization base as a float pixel count.
    pub fn n(&self) -> f64 {
        self.n
    }

    /// Ground-truth foreground mass labeled background by the proposal.
    /// Always 0 in the standard variant.
    pub fn aux(&self) -> f64 {
        self.aux
    }

    pub fn restricted(&self) -> bool {
        self.restricted
    }

    /// First row/column index participating in marginal sums: 1 when
    /// restricted, 0 otherwise.
    pub fn marginal_start(&self) -> usize {
        usize::from(self.restricted)
    }
}

// ---------------------------------------------------------------------------
// Accumulation across slices
// ---------------------------------------------------------------------------

/// Growable count table used to pool the contingency distribution of an
/// entire stack before deriving one statistic (micro-averaging).
#[derive(Debug, Clone)]
pub struct ContingencyAccumulator {
    rows: usize,
    cols: usize,
    counts: Vec<u64>,
    restricted: bool,
}

impl ContingencyAccumulator {
    pub fn new(restricted: bool) -> Self {
        Self {
            rows: 0,
            cols: 0,
            counts: Vec::new(),
            restricted,
        }
    }

    /// Add one slice pair's cross-tabulation to the pooled table.
    pub fn add_pair(&mut self, gt: &LabelMap, proposal: &LabelMap) -> MetricResult<()> {
        if !gt.same_shape(proposal) {
            return Err(gt.shape_mismatch(proposal));
        }
        let rows = gt.max_label() as usize + 1;
        let cols = proposal.max_label() as usize + 1;
        self.grow(rows, cols);
        for (&la, &lb) in gt.pixels().iter().zip(proposal.pixels()) {
            self.counts[la as usize * self.cols + lb as usize] += 1;
        }
        Ok(())
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &ContingencyAccumulator) {
        self.grow(other.rows, other.cols);
        for i in 0..other.rows {
            for j in 0..other.cols {
                self.counts[i * self.cols + j] += other.counts[i * other.cols + j];
            }
        }
    }

    /// Finish accumulation and derive the pooled matrix.
    pub fn finish(self) -> ContingencyMatrix {
        ContingencyMatrix::from_counts(self.rows, self.cols, self.counts, self.restricted)
    }

    fn grow(&mut self, rows: usize, cols: usize) {
        let new_rows = self.rows.max(rows);
        let new_cols = self.cols.max(cols);
        if new_rows == self.rows && new_cols == self.cols {
            return;
        }
        let mut grown = vec![0u64; new_rows * new_cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                grown[i * new_cols + j] = self.counts[i * self.cols + j];
            }
        }
        self.rows = new_rows;
        self.cols = new_cols;
        self.counts = grown;
    }
}
