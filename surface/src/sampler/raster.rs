use crate::{sample::ElevationSample, SurfaceError};
use geo::geometry::Coord;
use log::debug;
use raster::Dataset;

/// Raster values at or below this are nodata sentinels (e.g. `-9999`).
pub const NODATA_THRESHOLD: f64 = -1000.0;

/// The only band read from elevation rasters.
const ELEVATION_BAND: usize = 1;

/// Returns the raster elevation at each of `coords`, in order.
///
/// Each coordinate is mapped to its `(row, col)` cell and then read
/// one row up and one column left of it. Negative indices that result
/// count back from the last row or column. Nodata and non-finite
/// cells are skipped, so the output may be shorter than `coords`.
///
/// # Errors
///
/// [`SurfaceError::CoordinateResolution`] if a coordinate falls
/// outside the grid; callers are expected to only pass coordinates
/// inside the dataset's bounds.
pub fn sample_raster(
    coords: &[Coord<f64>],
    dataset: &Dataset,
) -> Result<Vec<ElevationSample>, SurfaceError> {
    let band = dataset.band(ELEVATION_BAND)?;
    let (rows, cols) = band.dimensions();
    let now = std::time::Instant::now();

    let mut samples = Vec::with_capacity(coords.len());
    for &coord in coords {
        let (row, col) = dataset.index(coord);
        let (row, col) = (row - 1, col - 1);
        let elevation = wrap(row, rows)
            .zip(wrap(col, cols))
            .and_then(|(row, col)| band.get(row, col))
            .ok_or(SurfaceError::CoordinateResolution {
                x: coord.x,
                y: coord.y,
                row,
                col,
                rows,
                cols,
            })?;
        if elevation.is_finite() && elevation > NODATA_THRESHOLD {
            samples.push(ElevationSample::new(coord, elevation));
        }
    }

    debug!(
        "raster samples; points: {}, kept: {}, exec: {:?}",
        coords.len(),
        samples.len(),
        now.elapsed()
    );
    Ok(samples)
}

/// Resolves `index` into `0..len`, counting negative indices back
/// from `len`.
fn wrap(index: isize, len: usize) -> Option<usize> {
    let len = isize::try_from(len).ok()?;
    let index = if index < 0 { index + len } else { index };
    (0..len).contains(&index).then_some(index as usize)
}
