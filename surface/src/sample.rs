use geo::geometry::Coord;
use serde::Serialize;

/// Elevation, in meters, at a projected `(x, y)` location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElevationSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ElevationSample {
    pub fn new(Coord { x, y }: Coord<f64>, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

/// A sample tagged with the position of its source point in the
/// sampled sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IndexedSample {
    pub sequence_index: usize,
    pub sample: ElevationSample,
}

impl From<IndexedSample> for ElevationSample {
    fn from(IndexedSample { sample, .. }: IndexedSample) -> Self {
        sample
    }
}
