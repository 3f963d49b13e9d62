//! Label maps, probability maps, and binarization.
//!
//! A [`LabelMap`] is a 2D grid of non-negative integer labels where 0 means
//! background/unassigned. A [`ProbabilityMap`] is a 2D grid of per-pixel
//! foreground probabilities in `[0, 1]`. Stacks are plain slices of maps; a
//! 2D input is a one-element stack.

use crate::error::{MetricError, MetricResult};

/// Pixel neighborhood used when labeling components or thinning borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    /// Edge-adjacent neighbors only.
    #[default]
    Four,
    /// Edge- and corner-adjacent neighbors.
    Eight,
}

impl std::fmt::Display for Connectivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Four => write!(f, "4-connected"),
            Self::Eight => write!(f, "8-connected"),
        }
    }
}

/// A 2D segmentation image: one `u32` label per pixel, 0 = background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl LabelMap {
    /// Create an all-background map.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Wrap an existing row-major pixel buffer.
    pub fn from_raw(width: usize, height: usize, data: Vec<u32>) -> MetricResult<Self> {
        if data.len() != width * height {
            return Err(MetricError::BufferSizeMismatch {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a map from nested rows, for small hand-written grids.
    pub fn from_rows(rows: &[&[u32]]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(width * height);
        for row in rows {
            data.extend_from_slice(row);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, label: u32) {
        self.data[y * self.width + x] = label;
    }

    /// Row-major pixel buffer.
    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    /// Largest label present, 0 for an all-background map.
    pub fn max_label(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Whether another map has identical width and height.
    pub fn same_shape(&self, other: &LabelMap) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub(crate) fn shape_mismatch(&self, other: &LabelMap) -> MetricError {
        MetricError::ShapeMismatch {
            width_a: self.width,
            height_a: self.height,
            width_b: other.width,
            height_b: other.height,
        }
    }
}

/// A 2D grid of per-pixel foreground probabilities in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ProbabilityMap {
    /// Wrap an existing row-major probability buffer.
    pub fn from_raw(width: usize, height: usize, data: Vec<f32>) -> MetricResult<Self> {
        if data.len() != width * height {
            return Err(MetricError::BufferSizeMismatch {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a map from nested rows, for small hand-written grids.
    pub fn from_rows(rows: &[&[f32]]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(width * height);
        for row in rows {
            data.extend_from_slice(row);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Row-major probability buffer.
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Threshold into a binary map: `p > threshold` becomes 1, else 0.
    pub fn binarize(&self, threshold: f64) -> LabelMap {
        LabelMap {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .map(|&p| u32::from(f64::from(p) > threshold))
                .collect(),
        }
    }

    /// Inverted threshold: `p > threshold` becomes 0, else 1.
    ///
    /// Used by the border-thinning path, where object interiors must be white
    /// so the thinning transform can reduce them to boundary lines.
    pub fn binarize_inverted(&self, threshold: f64) -> LabelMap {
        LabelMap {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .map(|&p| u32::from(f64::from(p) <= threshold))
                .collect(),
        }
    }

    /// Whether another map has identical width and height.
    pub fn same_shape(&self, other: &ProbabilityMap) -> bool {
        self.width == other.width && self.height == other.height
    }
}
