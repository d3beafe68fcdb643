//! Elevation profiles ("surface lines") along a trajectory, stitched
//! together from a local raster and the Dutch AHN elevation service.
//!
//! ```no_run
//! use surface::{geo::line_string, RemoteSampler, SurfaceLine};
//!
//! let remote = RemoteSampler::builder().build()?;
//! let dataset = raster::Dataset::open("bathymetry.tif")?;
//! let surface_line = SurfaceLine::builder()
//!     .trajectory(line_string![(x: 126_990.0, y: 502_060.0), (x: 127_010.0, y: 502_060.0)])
//!     .raster(&dataset)
//!     .build(&remote)?;
//! for sample in &surface_line.profile {
//!     println!("{},{},{}", sample.x, sample.y, sample.z);
//! }
//! # Ok::<(), surface::SurfaceError>(())
//! ```

mod coverage;
mod error;
pub mod math;
mod profile;
mod sample;
mod sampler;
mod split;
mod surface_line;
mod trajectory;
pub mod wms;

pub use crate::{
    coverage::Coverage,
    error::SurfaceError,
    profile::Profile,
    sample::ElevationSample,
    sampler::{
        sample_raster, RemoteSampler, RemoteSamplerBuilder, DEFAULT_MAX_CONCURRENCY,
        MAX_ALLOWED_ELEVATION, MIN_ALLOWED_ELEVATION, NODATA_THRESHOLD,
    },
    split::{split, Split},
    surface_line::{SurfaceLine, SurfaceLineBuilder},
    trajectory::coords_from_rows,
    wms::{Ahn, DataType},
};
pub use geo;
pub use raster;
