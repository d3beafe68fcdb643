//! Elevation samplers.
//!
//! Both produce [`ElevationSample`](crate::ElevationSample)s in the
//! order of the points they were given, dropping points without a
//! valid elevation.

mod raster;
mod remote;

pub use self::{
    raster::{sample_raster, NODATA_THRESHOLD},
    remote::{
        RemoteSampler, RemoteSamplerBuilder, DEFAULT_MAX_CONCURRENCY, MAX_ALLOWED_ELEVATION,
        MIN_ALLOWED_ELEVATION,
    },
};
