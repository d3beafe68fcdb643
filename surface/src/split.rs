//! Splitting a trajectory along a raster's coverage.

use crate::coverage::{Clipped, Coverage};
use geo::geometry::{Coord, LineString, MultiLineString};
use log::debug;

/// A trajectory partitioned by a [`Coverage`].
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// The intersection of the trajectory with the coverage.
    pub covered: MultiLineString<f64>,

    /// Whatever of the trajectory is not in `covered`.
    ///
    /// Points where the trajectory crosses the coverage edge belong
    /// to both `covered` and `remaining`.
    pub remaining: MultiLineString<f64>,
}

impl Split {
    /// Returns the vertices of every covered sub-path, in trajectory
    /// order.
    pub fn covered_coords(&self) -> Vec<Coord<f64>> {
        flatten(&self.covered)
    }

    /// Returns the vertices of every remaining sub-path, in
    /// trajectory order.
    pub fn remaining_coords(&self) -> Vec<Coord<f64>> {
        flatten(&self.remaining)
    }
}

fn flatten(lines: &MultiLineString<f64>) -> Vec<Coord<f64>> {
    lines.iter().flat_map(|line| line.0.iter().copied()).collect()
}

/// Splits `trajectory` into the sub-paths inside `coverage` and the
/// sub-paths outside of it.
///
/// Sub-paths keep the direction and relative order of `trajectory`.
/// Each crossing of the coverage edge ends one sub-path and starts
/// the next at the crossing point. Zero-length segments are dropped,
/// so a trajectory that only touches a corner of the coverage leaves
/// `covered` empty.
pub fn split(trajectory: &LineString<f64>, coverage: &Coverage) -> Split {
    let mut pieces = Pieces::default();

    for segment in trajectory.0.windows(2) {
        let (a, b) = (segment[0], segment[1]);
        if a == b {
            continue;
        }
        match coverage.clip(a, b) {
            None => pieces.push(false, a, b),
            Some(Clipped {
                t0,
                t1,
                entry,
                exit,
            }) => {
                if t0 > 0.0 {
                    pieces.push(false, a, entry);
                }
                if t1 > t0 {
                    pieces.push(true, entry, exit);
                }
                if t1 < 1.0 {
                    pieces.push(false, exit, b);
                }
            }
        }
    }

    // A single point, or a path that never moves.
    if pieces.is_empty() {
        if let Some(&coord) = trajectory.0.first() {
            pieces.start(coverage.contains(coord), coord);
        }
    }

    let split = pieces.finish();
    debug!(
        "split; covered: {} path(s), remaining: {} path(s)",
        split.covered.0.len(),
        split.remaining.0.len()
    );
    split
}

#[derive(Default)]
struct Pieces {
    covered: Vec<LineString<f64>>,
    remaining: Vec<LineString<f64>>,
    current: Vec<Coord<f64>>,
    inside: bool,
}

impl Pieces {
    fn is_empty(&self) -> bool {
        self.current.is_empty() && self.covered.is_empty() && self.remaining.is_empty()
    }

    fn start(&mut self, inside: bool, from: Coord<f64>) {
        self.flush();
        self.inside = inside;
        self.current.push(from);
    }

    /// Appends `from → to` to the open sub-path, or starts a new one
    /// if the side changed.
    fn push(&mut self, inside: bool, from: Coord<f64>, to: Coord<f64>) {
        if self.current.is_empty() || self.inside != inside {
            self.start(inside, from);
        } else if self.current.last() != Some(&from) {
            self.current.push(from);
        }
        self.current.push(to);
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let line = LineString::new(std::mem::take(&mut self.current));
        if self.inside {
            self.covered.push(line);
        } else {
            self.remaining.push(line);
        }
    }

    fn finish(mut self) -> Split {
        self.flush();
        Split {
            covered: MultiLineString::new(self.covered),
            remaining: MultiLineString::new(self.remaining),
        }
    }
}
