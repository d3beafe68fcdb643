use crate::{RasterError, C};
use geo::geometry::Coord;

/// Affine map from pixel `(col, row)` to world `(x, y)`.
///
/// Coefficients follow the rasterio/`affine` convention:
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    forward: [C; 6],
    inverse: [C; 6],
}

impl Affine {
    pub fn new(a: C, b: C, c: C, d: C, e: C, f: C) -> Result<Self, RasterError> {
        let determinant = a * e - b * d;
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(RasterError::Transform(determinant));
        }
        let ia = e / determinant;
        let ib = -b / determinant;
        let id = -d / determinant;
        let ie = a / determinant;
        let inverse = [ia, ib, -c * ia - f * ib, id, ie, -c * id - f * ie];
        Ok(Self {
            forward: [a, b, c, d, e, f],
            inverse,
        })
    }

    /// North-up transform with its upper left corner at `(west, north)`.
    pub fn from_origin(west: C, north: C, xsize: C, ysize: C) -> Result<Self, RasterError> {
        Self::new(xsize, 0.0, west, 0.0, -ysize, north)
    }

    /// Returns the world coordinate of pixel corner `(col, row)`.
    pub fn apply(&self, col: C, row: C) -> Coord<C> {
        let [a, b, c, d, e, f] = self.forward;
        Coord {
            x: a * col + b * row + c,
            y: d * col + e * row + f,
        }
    }

    /// Returns the fractional `(col, row)` position of `coord`.
    pub fn invert(&self, coord: Coord<C>) -> (C, C) {
        let [a, b, c, d, e, f] = self.inverse;
        (
            a * coord.x + b * coord.y + c,
            d * coord.x + e * coord.y + f,
        )
    }

    /// Returns the `(row, col)` of the cell containing `coord`.
    ///
    /// Cells are half-open: a coordinate exactly on the edge between
    /// two cells belongs to the one with the larger index, so the
    /// right and bottom dataset edges resolve to `cols` and `rows`.
    pub fn rowcol(&self, coord: Coord<C>) -> (isize, isize) {
        let (col, row) = self.invert(coord);
        #[allow(clippy::cast_possible_truncation)]
        (row.floor() as isize, col.floor() as isize)
    }

    pub fn coefficients(&self) -> [C; 6] {
        self.forward
    }
}

#[cfg(test)]
mod tests {
    use super::{Affine, Coord};
    use approx::assert_relative_eq;

    #[test]
    fn test_degenerate_transform() {
        assert!(Affine::new(1.0, 2.0, 0.0, 2.0, 4.0, 0.0).is_err());
        assert!(Affine::from_origin(0.0, 0.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_rowcol() {
        let transform = Affine::from_origin(126_990.0, 502_070.0, 0.5, 0.5).unwrap();
        assert_eq!(transform.rowcol(Coord { x: 126_990.0, y: 502_070.0 }), (0, 0));
        assert_eq!(transform.rowcol(Coord { x: 126_990.6, y: 502_069.9 }), (0, 1));
        assert_eq!(transform.rowcol(Coord { x: 126_991.2, y: 502_068.8 }), (2, 2));
        assert_eq!(transform.rowcol(Coord { x: 126_989.9, y: 502_070.1 }), (-1, -1));
    }

    #[test]
    fn test_invert_roundtrip() {
        let transform = Affine::new(2.0, 0.5, 100.0, 0.25, -3.0, 900.0).unwrap();
        let coord = transform.apply(12.5, 7.25);
        let (col, row) = transform.invert(coord);
        assert_relative_eq!(col, 12.5, epsilon = 1e-9);
        assert_relative_eq!(row, 7.25, epsilon = 1e-9);
    }
}
