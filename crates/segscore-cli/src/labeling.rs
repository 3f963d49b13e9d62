//! Default segmentation collaborators.
//!
//! [`GridLabeling`] implements the [`Labeling`] seam the metrics engine
//! consumes: two-pass union-find connected-component labeling, and
//! influence-zone (SKIZ) border thinning that reduces the gaps between white
//! regions to 1-pixel-wide boundary lines.

use std::collections::VecDeque;

use segscore_core::{Connectivity, LabelMap, Labeling};

/// Union-find labeler and influence-zone thinner over pixel grids.
pub struct GridLabeling;

impl Labeling for GridLabeling {
    fn label_components(&self, binary: &LabelMap, connectivity: Connectivity) -> LabelMap {
        label_components(binary, connectivity)
    }

    fn thin_borders(&self, binary: &LabelMap, connectivity: Connectivity) -> LabelMap {
        thin_borders(binary, connectivity)
    }
}

/// Neighbor offsets already visited in a row-major scan.
fn scan_neighbors(connectivity: Connectivity) -> &'static [(i64, i64)] {
    match connectivity {
        Connectivity::Four => &[(-1, 0), (0, -1)],
        Connectivity::Eight => &[(-1, 0), (-1, -1), (0, -1), (1, -1)],
    }
}

/// Full neighborhood offsets.
fn all_neighbors(connectivity: Connectivity) -> &'static [(i64, i64)] {
    match connectivity {
        Connectivity::Four => &[(-1, 0), (1, 0), (0, -1), (0, 1)],
        Connectivity::Eight => &[
            (-1, 0),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ],
    }
}

fn find(parent: &mut [u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        let grandparent = parent[parent[x as usize] as usize];
        parent[x as usize] = grandparent;
        x = grandparent;
    }
    x
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // Keep the smaller root so final labels follow scan order.
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[hi as usize] = lo;
    }
}

/// Two-pass connected-component labeling.
///
/// Background (label 0) stays 0; every connected run of nonzero pixels gets
/// a distinct positive label, compacted in scan order.
pub fn label_components(binary: &LabelMap, connectivity: Connectivity) -> LabelMap {
    let (width, height) = (binary.width(), binary.height());
    let mut labels = LabelMap::new(width, height);
    // parent[0] is reserved for background and never unioned.
    let mut parent: Vec<u32> = vec![0];

    for y in 0..height {
        for x in 0..width {
            if binary.get(x, y) == 0 {
                continue;
            }
            let mut assigned = 0u32;
            for &(dx, dy) in scan_neighbors(connectivity) {
                let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let neighbor = labels.get(nx as usize, ny as usize);
                if neighbor == 0 {
                    continue;
                }
                if assigned == 0 {
                    assigned = neighbor;
                } else {
                    union(&mut parent, assigned, neighbor);
                }
            }
            if assigned == 0 {
                assigned = parent.len() as u32;
                parent.push(assigned);
            }
            labels.set(x, y, assigned);
        }
    }

    // Second pass: resolve roots and compact to 1..k in scan order.
    let mut compact: Vec<u32> = vec![0; parent.len()];
    let mut next = 0u32;
    let mut out = LabelMap::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let provisional = labels.get(x, y);
            if provisional == 0 {
                continue;
            }
            let root = find(&mut parent, provisional);
            if compact[root as usize] == 0 {
                next += 1;
                compact[root as usize] = next;
            }
            out.set(x, y, compact[root as usize]);
        }
    }
    out
}

/// Influence-zone (SKIZ) thinning.
///
/// White regions become labeled zones that grow outward breadth-first over
/// the background; pixels where two different zones collide stay 0, leaving
/// a 1-pixel-wide separating boundary.
pub fn thin_borders(binary: &LabelMap, connectivity: Connectivity) -> LabelMap {
    let (width, height) = (binary.width(), binary.height());
    let zones = label_components(binary, connectivity);

    let mut label: Vec<u32> = zones.pixels().to_vec();
    let mut dist: Vec<u32> = vec![u32::MAX; width * height];
    let mut boundary: Vec<bool> = vec![false; width * height];
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if zones.get(x, y) != 0 {
                dist[y * width + x] = 0;
                queue.push_back((x, y));
            }
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let here = y * width + x;
        for &(dx, dy) in all_neighbors(connectivity) {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            let there = ny as usize * width + nx as usize;
            if label[there] == 0 {
                label[there] = label[here];
                dist[there] = dist[here] + 1;
                queue.push_back((nx as usize, ny as usize));
            } else if label[there] != label[here]
                && (dist[there] > dist[here] || (dist[there] == dist[here] && label[there] > label[here]))
            {
                // Two wavefronts met: the farther pixel becomes the watershed
                // line, the higher-numbered zone ceding on exact ties.
                boundary[there] = true;
            }
        }
    }

    let data: Vec<u32> = label
        .into_iter()
        .zip(&boundary)
        .map(|(l, &b)| if b { 0 } else { l })
        .collect();
    // Buffer length matches by construction.
    LabelMap::from_raw(width, height, data).unwrap_or_else(|_| LabelMap::new(width, height))
}
