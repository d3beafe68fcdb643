use crate::SurfaceError;
use geo::geometry::Coord;

/// Returns `rows` as coordinates if every row is an `[x, y]` pair.
///
/// # Errors
///
/// [`SurfaceError::Shape`] naming the shape `rows` has instead:
/// `(n, k)` for `n` rows of `k` values, `(n,)` if row lengths differ,
/// and `(0,)` if there are no rows at all.
pub fn coords_from_rows<P: AsRef<[f64]>>(rows: &[P]) -> Result<Vec<Coord<f64>>, SurfaceError> {
    let mut widths = rows.iter().map(|row| row.as_ref().len());
    let width = widths.next();
    let uniform = widths.all(|other| Some(other) == width);
    let shape = match width {
        Some(2) if uniform => {
            return Ok(rows
                .iter()
                .map(|row| {
                    let row = row.as_ref();
                    Coord { x: row[0], y: row[1] }
                })
                .collect())
        }
        Some(width) if uniform => format!("({}, {width})", rows.len()),
        _ => format!("({},)", rows.len()),
    };
    Err(SurfaceError::Shape(shape))
}
