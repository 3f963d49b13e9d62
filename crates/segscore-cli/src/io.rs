//! Probability-map loading for the CLI.
//!
//! A path naming a file loads as a single-slice stack; a directory loads as
//! an ordered stack, one slice per contained image file sorted by name.
//! Grayscale pixel values map to probabilities as `v/255`.

use std::path::{Path, PathBuf};

use segscore_core::ProbabilityMap;

/// Load a probability stack from an image file or a directory of slices.
pub fn load_stack(path: &Path) -> Result<Vec<ProbabilityMap>, String> {
    if path.is_dir() {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
            .map_err(|e| format!("{}: {e}", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        entries.sort();
        if entries.is_empty() {
            return Err(format!("{}: directory contains no slices", path.display()));
        }
        entries.iter().map(|p| load_slice(p)).collect()
    } else {
        Ok(vec![load_slice(path)?])
    }
}

fn load_slice(path: &Path) -> Result<ProbabilityMap, String> {
    let image = image::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    let values: Vec<f32> = gray
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect();
    ProbabilityMap::from_raw(width as usize, height as usize, values)
        .map_err(|e| format!("{}: {e}", path.display()))
}
