//! Cost-aware A* and the organic biased walk used for carving.

use crate::error::WorldError;
use crate::grid::Grid;
use rand::rngs::StdRng;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::trace;

/// Unit for point-to-point distance queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    /// Rounded Euclidean distance between pixel coordinates.
    Pixels,
    /// Pixel distance divided by the cell size (integer).
    Cells,
}

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    /// Total estimated cost.
    f: f64,
    /// Cost so far.
    g: f64,
    /// Insertion sequence, breaks exact cost ties deterministically.
    seq: u64,
    idx: u32,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the smallest (f, g, seq) pops first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.total_cmp(&self.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn heuristic(grid: &Grid, a: u32, b: u32) -> f64 {
    let ca = &grid.cells()[a as usize];
    let cb = &grid.cells()[b as usize];
    let dx = (ca.x - cb.x) as f64;
    let dy = (ca.y - cb.y) as f64;
    dx.hypot(dy)
}

/// Cost-aware A* over the adjacency graph.
///
/// Step cost is `cost_out(current) + cost_in(next)`; the heuristic is the
/// Euclidean pixel distance, which weights the search strongly toward the
/// goal. Returns the path from `start` to `goal` inclusive plus its total
/// cost, or [`WorldError::NoPathFound`] when the endpoints are disconnected.
pub fn astar(grid: &Grid, start: u32, goal: u32) -> Result<(Vec<u32>, f64), WorldError> {
    if start == goal {
        return Ok((vec![start], 0.0));
    }

    let no_path = || WorldError::NoPathFound {
        from: grid.cells()[start as usize].designation.clone(),
        to: grid.cells()[goal as usize].designation.clone(),
    };

    if !grid.cells()[goal as usize].passable() {
        return Err(no_path());
    }

    let mut open = BinaryHeap::new();
    let mut seq = 0u64;
    open.push(OpenNode {
        f: heuristic(grid, start, goal),
        g: 0.0,
        seq,
        idx: start,
    });

    let mut came_from: HashMap<u32, u32> = HashMap::new();
    let mut g_score: HashMap<u32, f64> = HashMap::from([(start, 0.0)]);
    let mut closed: HashSet<u32> = HashSet::new();

    while let Some(node) = open.pop() {
        if !closed.insert(node.idx) {
            continue;
        }
        if node.idx == goal {
            let mut path = vec![goal];
            let mut cursor = goal;
            while let Some(&prev) = came_from.get(&cursor) {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            trace!(steps = path.len(), cost = node.g, "path found");
            return Ok((path, node.g));
        }

        let current = &grid.cells()[node.idx as usize];
        for neighbor in current.neighbors() {
            if closed.contains(&neighbor) {
                continue;
            }
            let next = &grid.cells()[neighbor as usize];
            if !next.passable() {
                continue;
            }
            let step = current.cost_out + next.cost_in;
            if !step.is_finite() {
                continue;
            }
            let tentative = node.g + step;
            let better = match g_score.get(&neighbor) {
                Some(&existing) => tentative < existing,
                None => true,
            };
            if better {
                g_score.insert(neighbor, tentative);
                came_from.insert(neighbor, node.idx);
                seq += 1;
                open.push(OpenNode {
                    f: tentative + heuristic(grid, neighbor, goal),
                    g: tentative,
                    seq,
                    idx: neighbor,
                });
            }
        }
    }

    Err(no_path())
}

/// Organic walk biased toward `end`.
///
/// Steps to a random unvisited passable neighbor, rotating through the
/// candidates up to eight times while the step would drift more than two
/// cells beyond the current distance to the goal. Backtracks one step when
/// boxed in, and stops within one cell of the goal or after `max_steps`
/// cells, so the result may fall short of `end`.
pub fn walk(
    grid: &Grid,
    rng: &mut StdRng,
    start: u32,
    end: u32,
    max_steps: usize,
) -> Vec<u32> {
    let mut path = vec![start];
    if start == end {
        return path;
    }
    let mut visited: HashSet<u32> = HashSet::from([start]);
    let mut current_distance = grid.distance_cells(start, end);

    while current_distance > 1 && path.len() < max_steps {
        let cur = match path.last() {
            Some(&idx) => idx,
            None => break,
        };
        let candidates: Vec<u32> = grid.cells()[cur as usize]
            .neighbors()
            .filter(|&n| grid.cells()[n as usize].passable() && !visited.contains(&n))
            .collect();

        if candidates.is_empty() {
            path.pop();
            if path.is_empty() {
                path.push(start);
                break;
            }
            continue;
        }

        let mut pick = rng.gen_range(0..candidates.len());
        let mut rotations = 0;
        while grid.distance_cells(candidates[pick], end) > current_distance + 2 && rotations < 8 {
            pick = (pick + 1) % candidates.len();
            rotations += 1;
        }

        let next = candidates[pick];
        visited.insert(next);
        path.push(next);
        current_distance = grid.distance_cells(next, end);
    }

    path
}
