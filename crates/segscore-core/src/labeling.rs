//! Collaborator seam for connected-component labeling and border thinning.
//!
//! The metrics engine never labels pixels itself: binarized images are handed
//! to a [`Labeling`] implementation, which is assumed correct. The shipped
//! CLI provides a union-find labeler and an influence-zone thinner; tests use
//! small mock implementations.

use crate::error::MetricResult;
use crate::label::{Connectivity, LabelMap, ProbabilityMap};

/// Fixed threshold at which a ground-truth mask is binarized before
/// component labeling.
pub const MASK_THRESHOLD: f64 = 0.5;

/// External segmentation collaborators consumed by the engine.
pub trait Labeling: Send + Sync {
    /// Assign label 0 to background pixels and a distinct positive integer
    /// per connected foreground component.
    fn label_components(&self, binary: &LabelMap, connectivity: Connectivity) -> LabelMap;

    /// Reduce white regions to a 1-pixel-wide boundary labeling via
    /// watershed-style morphological thinning: zone pixels keep a positive
    /// label, boundary pixels become 0.
    fn thin_borders(&self, binary: &LabelMap, connectivity: Connectivity) -> LabelMap;
}

/// Binarize and label a probability-map pair for one threshold.
///
/// The ground truth is binarized at [`MASK_THRESHOLD`] and component-labeled.
/// The proposal is binarized at `threshold`; with `thin` set, the proposal
/// binarization is inverted first (threshold-exceeding pixels become
/// background) so object interiors are white, then thinned to boundary
/// lines — turning the comparison from region overlap into boundary
/// placement.
pub fn labeled_pair(
    gt: &ProbabilityMap,
    proposal: &ProbabilityMap,
    threshold: f64,
    thin: bool,
    connectivity: Connectivity,
    labeling: &dyn Labeling,
) -> MetricResult<(LabelMap, LabelMap)> {
    let gt_labels = labeling.label_components(&gt.binarize(MASK_THRESHOLD), connectivity);
    let proposal_labels = if thin {
        labeling.thin_borders(&proposal.binarize_inverted(threshold), connectivity)
    } else {
        labeling.label_components(&proposal.binarize(threshold), connectivity)
    };
    Ok((gt_labels, proposal_labels))
}
