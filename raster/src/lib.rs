//! Georeferenced elevation rasters.
//!
//! A [`Dataset`] is a stack of equally sized [`Band`]s placed in the
//! world by an [`Affine`] transform, the same model GDAL and rasterio
//! expose. Datasets are built in memory or decoded from single-image
//! GeoTIFF files.
//!
//! # References
//!
//! 1. [GeoTIFF standard](https://docs.ogc.org/is/19-008r4/19-008r4.html)
//! 1. [rasterio georeferencing](https://rasterio.readthedocs.io/en/stable/topics/georeferencing.html)

mod affine;
mod error;
mod geotiff;

pub use crate::{affine::Affine, error::RasterError};
use geo::geometry::Coord;
use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::{Path, PathBuf},
};

/// Floating point type used for samples and coordinates.
pub type C = f64;

/// Spatial extent of a dataset, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: C,
    pub bottom: C,
    pub right: C,
    pub top: C,
}

/// A single grid of samples, stored row-major from the top row down.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// Number of (rows, columns) in this band.
    dimensions: (usize, usize),

    samples: Box<[C]>,
}

impl Band {
    pub fn new(rows: usize, cols: usize, samples: Vec<C>) -> Result<Self, RasterError> {
        let expected = sample_count(rows, cols, 1)?;
        if samples.len() != expected {
            return Err(RasterError::BandLen {
                rows,
                cols,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            dimensions: (rows, cols),
            samples: samples.into_boxed_slice(),
        })
    }

    /// Returns the number of (rows, columns) in this band.
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns the sample at `(row, col)`, if inside the band.
    pub fn get(&self, row: usize, col: usize) -> Option<C> {
        let (rows, cols) = self.dimensions;
        if row < rows && col < cols {
            Some(self.samples[row * cols + col])
        } else {
            None
        }
    }
}

/// Returns `rows * cols * bands`, failing instead of overflowing.
pub(crate) fn sample_count(rows: usize, cols: usize, bands: usize) -> Result<usize, RasterError> {
    rows.checked_mul(cols)
        .and_then(|n| n.checked_mul(bands))
        .ok_or(RasterError::TooLarge { rows, cols, bands })
}

pub struct Dataset {
    transform: Affine,

    /// Number of (rows, columns) shared by every band.
    dimensions: (usize, usize),

    bands: Vec<Band>,

    /// Where this dataset was read from, if anywhere.
    path: Option<PathBuf>,
}

impl Dataset {
    /// Returns an in-memory dataset.
    pub fn new(transform: Affine, bands: Vec<Band>) -> Result<Self, RasterError> {
        let dimensions = bands
            .first()
            .map(Band::dimensions)
            .ok_or(RasterError::Dimensions)?;
        if bands.iter().any(|band| band.dimensions() != dimensions) {
            return Err(RasterError::Dimensions);
        }
        Ok(Self {
            transform,
            dimensions,
            bands,
            path: None,
        })
    }

    /// Returns a dataset decoded from the GeoTIFF file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RasterError> {
        let path = path.as_ref().to_owned();
        let file = BufReader::new(File::open(&path)?);
        let mut dataset = Self::from_reader(file, path.clone())?;
        dataset.path = Some(path);
        Ok(dataset)
    }

    /// Returns a dataset decoded from GeoTIFF bytes.
    ///
    /// `origin` only names the source in error messages.
    pub fn from_reader<R: Read + Seek>(reader: R, origin: PathBuf) -> Result<Self, RasterError> {
        let (transform, bands) = geotiff::decode(reader, origin)?;
        Self::new(transform, bands)
    }

    pub fn transform(&self) -> &Affine {
        &self.transform
    }

    /// Returns the number of (rows, columns) in this dataset.
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Returns band `index`, counting from 1.
    pub fn band(&self, index: usize) -> Result<&Band, RasterError> {
        index
            .checked_sub(1)
            .and_then(|i| self.bands.get(i))
            .ok_or(RasterError::Band(index, self.bands.len()))
    }

    /// Returns the `(row, col)` of the cell containing `coord`.
    ///
    /// The result is not bounds checked.
    pub fn index(&self, coord: Coord<C>) -> (isize, isize) {
        self.transform.rowcol(coord)
    }

    /// Returns the extent covered by this dataset's outer cell edges.
    pub fn bounds(&self) -> Bounds {
        let (rows, cols) = self.dimensions;
        #[allow(clippy::cast_precision_loss)]
        let (rows, cols) = (rows as C, cols as C);
        let corners = [
            self.transform.apply(0.0, 0.0),
            self.transform.apply(cols, 0.0),
            self.transform.apply(cols, rows),
            self.transform.apply(0.0, rows),
        ];
        let mut bounds = Bounds {
            left: C::INFINITY,
            bottom: C::INFINITY,
            right: C::NEG_INFINITY,
            top: C::NEG_INFINITY,
        };
        for Coord { x, y } in corners {
            bounds.left = bounds.left.min(x);
            bounds.right = bounds.right.max(x);
            bounds.bottom = bounds.bottom.min(y);
            bounds.top = bounds.top.max(y);
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::{sample_count, Affine, Band, Bounds, Coord, Dataset, RasterError};
    use std::{io::Cursor, path::PathBuf};
    use tiff::{
        encoder::{colortype, TiffEncoder},
        tags::Tag,
    };

    fn grid() -> Dataset {
        let transform = Affine::from_origin(1000.0, 2000.0, 10.0, 10.0).unwrap();
        let samples = (0..6).map(f64::from).collect();
        Dataset::new(transform, vec![Band::new(2, 3, samples).unwrap()]).unwrap()
    }

    #[test]
    fn test_bounds() {
        assert_eq!(
            grid().bounds(),
            Bounds {
                left: 1000.0,
                bottom: 1980.0,
                right: 1030.0,
                top: 2000.0,
            }
        );
    }

    #[test]
    fn test_band_is_one_based() {
        let dataset = grid();
        assert!(dataset.band(1).is_ok());
        assert!(matches!(dataset.band(0), Err(RasterError::Band(0, 1))));
        assert!(matches!(dataset.band(2), Err(RasterError::Band(2, 1))));
    }

    #[test]
    fn test_band_index() {
        let dataset = grid();
        let band = dataset.band(1).unwrap();
        assert_eq!(band.get(0, 0), Some(0.0));
        assert_eq!(band.get(1, 2), Some(5.0));
        assert_eq!(band.get(2, 0), None);
        assert_eq!(dataset.index(Coord { x: 1025.0, y: 1985.0 }), (1, 2));
    }

    #[test]
    fn test_mismatched_bands() {
        let transform = Affine::from_origin(0.0, 0.0, 1.0, 1.0).unwrap();
        let bands = vec![
            Band::new(1, 2, vec![0.0, 0.0]).unwrap(),
            Band::new(2, 1, vec![0.0, 0.0]).unwrap(),
        ];
        assert!(matches!(
            Dataset::new(transform, bands),
            Err(RasterError::Dimensions)
        ));
        assert!(matches!(
            Band::new(2, 2, vec![0.0]),
            Err(RasterError::BandLen { expected: 4, .. })
        ));
    }

    #[test]
    fn test_oversized_band() {
        assert!(matches!(
            Band::new(usize::MAX, 2, Vec::new()),
            Err(RasterError::TooLarge { cols: 2, .. })
        ));
        assert!(matches!(
            sample_count(usize::MAX / 2, 1, 3),
            Err(RasterError::TooLarge { bands: 3, .. })
        ));
        assert_eq!(sample_count(3, 4, 2).unwrap(), 24);
    }

    #[test]
    fn test_decode_geotiff() {
        let samples: Vec<f32> = vec![1.5, 2.5, -9999.0, 4.0, 5.0, 6.0];
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut bytes).unwrap();
            let mut image = encoder.new_image::<colortype::Gray32Float>(3, 2).unwrap();
            image
                .encoder()
                .write_tag(Tag::ModelPixelScaleTag, &[0.5_f64, 0.5, 0.0][..])
                .unwrap();
            image
                .encoder()
                .write_tag(
                    Tag::ModelTiepointTag,
                    &[0.0_f64, 0.0, 0.0, 126_990.0, 502_070.0, 0.0][..],
                )
                .unwrap();
            image.write_data(&samples).unwrap();
        }
        bytes.set_position(0);

        let dataset = Dataset::from_reader(bytes, PathBuf::from("memory.tif")).unwrap();
        assert_eq!(dataset.dimensions(), (2, 3));
        assert_eq!(
            dataset.bounds(),
            Bounds {
                left: 126_990.0,
                bottom: 502_069.0,
                right: 126_991.5,
                top: 502_070.0,
            }
        );
        let band = dataset.band(1).unwrap();
        assert_eq!(band.get(0, 2), Some(-9999.0));
        assert_eq!(band.get(1, 0), Some(4.0));
    }

    #[test]
    fn test_decode_without_georeference() {
        let mut bytes = Cursor::new(Vec::new());
        TiffEncoder::new(&mut bytes)
            .unwrap()
            .write_image::<colortype::Gray16>(2, 1, &[1_u16, 2])
            .unwrap();
        bytes.set_position(0);
        assert!(matches!(
            Dataset::from_reader(bytes, PathBuf::from("plain.tif")),
            Err(RasterError::Georeference(_))
        ));
    }
}
