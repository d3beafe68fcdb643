use raster::{Bounds, RasterError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("missing required parameters")]
    Builder,

    /// Input is not a flat sequence of `(x, y)` pairs.
    #[error("trajectory should be of shape (:, 2) but is of shape {0}")]
    Shape(String),

    /// The elevation service did not answer successfully.
    #[error("connection with {url} was not successful: {reason}")]
    Connectivity { url: String, reason: String },

    /// The elevation service answered with an unusable payload.
    #[error("response from {url} was not in the correct format: {reason}")]
    Format { url: String, reason: String },

    /// A point inside the raster coverage has no cell in the grid.
    #[error("({x}, {y}) resolves to cell ({row}, {col}) outside a {rows}x{cols} raster")]
    CoordinateResolution {
        x: f64,
        y: f64,
        row: isize,
        col: isize,
        rows: usize,
        cols: usize,
    },

    #[error("raster coverage {0:?} is empty")]
    Coverage(Bounds),

    #[error("unknown {kind} '{value}'")]
    Unknown { kind: &'static str, value: String },

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("{0}")]
    Raster(#[from] RasterError),
}
