use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("no georeferencing tags in {0}")]
    Georeference(PathBuf),

    #[error("degenerate affine transform, determinant {0}")]
    Transform(f64),

    #[error("band {0} does not exist, dataset has {1} band(s)")]
    Band(usize, usize),

    #[error("expected {expected} samples for a {rows}x{cols} band, got {actual}")]
    BandLen {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{rows}x{cols} band with {bands} band(s) per pixel is too large")]
    TooLarge {
        rows: usize,
        cols: usize,
        bands: usize,
    },

    #[error("dataset needs at least one band, all of the same dimensions")]
    Dimensions,
}
