//! Error type for segmentation-comparison operations.

use thiserror::Error;

/// The error type for `segscore` operations.
///
/// Shape and depth mismatches are the only hard failures: every other
/// exceptional condition (invalid threshold ranges, degenerate statistics,
/// failing slices) is handled by sentinel returns and documented overrides so
/// that batch evaluation never aborts mid-run.
#[derive(Error, Debug)]
pub enum MetricError {
    /// Two maps being compared do not share the same width/height.
    #[error("label maps differ in shape: {width_a}x{height_a} vs {width_b}x{height_b}")]
    ShapeMismatch {
        width_a: usize,
        height_a: usize,
        width_b: usize,
        height_b: usize,
    },

    /// Two stacks being compared do not share the same slice count.
    #[error("stacks differ in depth: {depth_a} vs {depth_b}")]
    DepthMismatch { depth_a: usize, depth_b: usize },

    /// A pixel buffer does not match the declared map dimensions.
    #[error("pixel buffer length {len} does not match {width}x{height}")]
    BufferSizeMismatch {
        len: usize,
        width: usize,
        height: usize,
    },
}

/// A specialized `Result` type for `segscore` operations.
pub type MetricResult<T> = Result<T, MetricError>;
