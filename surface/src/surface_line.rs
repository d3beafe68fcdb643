use crate::{
    coverage::Coverage,
    profile::Profile,
    sampler::{sample_raster, RemoteSampler},
    split::{split, Split},
    wms::Transport,
    SurfaceError,
};
use geo::geometry::{Coord, LineString};
use log::debug;
use raster::Dataset;

/// Elevation profile of a trajectory, sampled from a local raster
/// where it has coverage and from the AHN service elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLine {
    /// The trajectory divided along the raster's coverage, if a
    /// raster was used.
    pub split: Option<Split>,

    pub profile: Profile,
}

impl SurfaceLine {
    pub fn builder<'a>() -> SurfaceLineBuilder<'a> {
        SurfaceLineBuilder {
            trajectory: None,
            raster: None,
        }
    }
}

pub struct SurfaceLineBuilder<'a> {
    trajectory: Option<LineString<f64>>,

    /// Preferred elevation source where it has coverage.
    raster: Option<&'a Dataset>,
}

impl<'a> SurfaceLineBuilder<'a> {
    pub fn trajectory(mut self, trajectory: LineString<f64>) -> Self {
        self.trajectory = Some(trajectory);
        self
    }

    pub fn raster(mut self, dataset: &'a Dataset) -> Self {
        self.raster = Some(dataset);
        self
    }

    /// Samples the trajectory, querying `remote` for every point
    /// outside the raster.
    ///
    /// Raster and remote sampling run in parallel. Any sampling error
    /// fails the whole build.
    pub fn build<T: Transport>(&self, remote: &RemoteSampler<T>) -> Result<SurfaceLine, SurfaceError> {
        let trajectory = self.trajectory.as_ref().ok_or(SurfaceError::Builder)?;
        let now = std::time::Instant::now();

        let Some(dataset) = self.raster else {
            let coords: Vec<Coord<f64>> = trajectory.coords().copied().collect();
            let samples = remote.sample_coords(&coords)?;
            debug!(
                "surface line; raster: none, remote: {}/{}, exec: {:?}",
                samples.len(),
                coords.len(),
                now.elapsed()
            );
            return Ok(SurfaceLine {
                split: None,
                profile: Profile::merge(Vec::new(), samples),
            });
        };

        let coverage = Coverage::new(dataset.bounds())?;
        let split = split(trajectory, &coverage);
        let covered = split.covered_coords();
        let remaining = split.remaining_coords();
        let (raster_samples, remote_samples) = rayon::join(
            || sample_raster(&covered, dataset),
            || remote.sample_coords(&remaining),
        );
        let (raster_samples, remote_samples) = (raster_samples?, remote_samples?);

        debug!(
            "surface line; raster: {}/{}, remote: {}/{}, exec: {:?}",
            raster_samples.len(),
            covered.len(),
            remote_samples.len(),
            remaining.len(),
            now.elapsed()
        );
        Ok(SurfaceLine {
            split: Some(split),
            profile: Profile::merge(raster_samples, remote_samples),
        })
    }
}
