use crate::sample::ElevationSample;
use serde::Serialize;

/// Elevation samples along a trajectory.
///
/// Raster samples come first, then remote samples, each in the order
/// they were sampled. Samples are not re-sorted along the trajectory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Profile {
    pub samples: Vec<ElevationSample>,
}

impl Profile {
    /// Concatenates `raster` and `remote` samples.
    pub fn merge(raster: Vec<ElevationSample>, remote: Vec<ElevationSample>) -> Self {
        let mut samples = raster;
        samples.extend(remote);
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ElevationSample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a Profile {
    type Item = &'a ElevationSample;
    type IntoIter = std::slice::Iter<'a, ElevationSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
