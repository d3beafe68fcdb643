//! Rectangular raster coverage.

use crate::SurfaceError;
use geo::{
    geometry::{Coord, Polygon},
    polygon, Intersects,
};
use raster::Bounds;

/// The closed, axis-aligned extent of a raster dataset.
///
/// ```text
///  p2 ------- p3
///  |           |
///  |           |
///  p1 ------- p4
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    bounds: Bounds,
    polygon: Polygon<f64>,
}

impl Coverage {
    pub fn new(bounds: Bounds) -> Result<Self, SurfaceError> {
        let Bounds {
            left,
            bottom,
            right,
            top,
        } = bounds;
        // Also rejects NaN edges.
        if !(left < right && bottom < top) {
            return Err(SurfaceError::Coverage(bounds));
        }
        let polygon = polygon![
            (x: left, y: bottom),
            (x: left, y: top),
            (x: right, y: top),
            (x: right, y: bottom),
            (x: left, y: bottom),
        ];
        Ok(Self { bounds, polygon })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Returns true if `coord` is inside or on the edge of this
    /// coverage.
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        self.polygon.intersects(&coord)
    }

    /// Clips segment `a → b` to this coverage.
    ///
    /// Liang–Barsky clipping over `a + t * (b - a)`, `t ∈ [0, 1]`.
    /// Returns `None` if the segment misses the coverage entirely.
    pub(crate) fn clip(&self, a: Coord<f64>, b: Coord<f64>) -> Option<Clipped> {
        let Bounds {
            left,
            bottom,
            right,
            top,
        } = self.bounds;
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let edges = [
            (Edge::Left, -dx, a.x - left),
            (Edge::Right, dx, right - a.x),
            (Edge::Bottom, -dy, a.y - bottom),
            (Edge::Top, dy, top - a.y),
        ];

        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        let (mut entry_edge, mut exit_edge) = (None, None);
        for (edge, p, q) in edges {
            if p == 0.0 {
                // Parallel to this edge.
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    if r > t1 {
                        return None;
                    }
                    if r > t0 {
                        t0 = r;
                        entry_edge = Some(edge);
                    }
                } else {
                    if r < t0 {
                        return None;
                    }
                    if r < t1 {
                        t1 = r;
                        exit_edge = Some(edge);
                    }
                }
            }
        }

        Some(Clipped {
            t0,
            t1,
            entry: self.crossing(a, b, t0, entry_edge),
            exit: self.crossing(a, b, t1, exit_edge),
        })
    }

    /// Point at `t` along `a → b`.
    ///
    /// Segment ends are returned as-is. Interior points are placed
    /// exactly on `edge` and inside the coverage.
    fn crossing(&self, a: Coord<f64>, b: Coord<f64>, t: f64, edge: Option<Edge>) -> Coord<f64> {
        if t <= 0.0 {
            return a;
        }
        if t >= 1.0 {
            return b;
        }
        let Bounds {
            left,
            bottom,
            right,
            top,
        } = self.bounds;
        let mut coord = a + (b - a) * t;
        match edge {
            Some(Edge::Left) => coord.x = left,
            Some(Edge::Right) => coord.x = right,
            Some(Edge::Bottom) => coord.y = bottom,
            Some(Edge::Top) => coord.y = top,
            None => (),
        }
        Coord {
            x: coord.x.clamp(left, right),
            y: coord.y.clamp(bottom, top),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

/// The part of a segment inside a [`Coverage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Clipped {
    /// Segment parameter where the segment enters the coverage.
    pub t0: f64,

    /// Segment parameter where the segment leaves the coverage.
    pub t1: f64,

    pub entry: Coord<f64>,

    pub exit: Coord<f64>,
}
