//! The AHN (Actueel Hoogtebestand Nederland) WMS point-query
//! service hosted at `service.pdok.nl`.
//!
//! Every elevation is one `GetFeatureInfo` request for the center
//! pixel of a 4000x4000 pixel map spanning 2km around the point.
//!
//! # References
//!
//! 1. [PDOK AHN](https://www.pdok.nl/introductie/-/article/actueel-hoogtebestand-nederland-ahn)
//! 1. [OGC WMS 1.3.0](https://www.ogc.org/standard/wms/)

mod response;
mod transport;

pub use self::transport::{HttpTransport, Reply, Transport};
pub(crate) use self::response::parse_elevation;
use crate::SurfaceError;
use geo::geometry::Coord;
use std::{fmt, str::FromStr};

/// CRS of query and response coordinates unless configured otherwise.
pub const DEFAULT_CRS: &str = "EPSG:28992";

/// Half the side of the map requested around each point, in meters.
const HALF_EXTENT: f64 = 1000.0;

/// Map size in pixels; the queried pixel sits at its center.
const MAP_PIXELS: &str = "4000";
const CENTER_PIXEL: &str = "2000";

/// AHN release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ahn {
    Ahn2,
    #[default]
    Ahn3,
}

impl fmt::Display for Ahn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ahn2 => "ahn2",
            Self::Ahn3 => "ahn3",
        })
    }
}

impl FromStr for Ahn {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ahn2" => Ok(Self::Ahn2),
            "ahn3" => Ok(Self::Ahn3),
            _ => Err(SurfaceError::Unknown {
                kind: "AHN release",
                value: s.to_owned(),
            }),
        }
    }
}

/// Elevation model served by a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// Digital terrain model: ground level.
    #[default]
    Dtm,

    /// Digital surface model: ground level plus buildings and
    /// vegetation.
    Dsm,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dtm => "dtm",
            Self::Dsm => "dsm",
        })
    }
}

impl FromStr for DataType {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dtm" => Ok(Self::Dtm),
            "dsm" => Ok(Self::Dsm),
            _ => Err(SurfaceError::Unknown {
                kind: "data type",
                value: s.to_owned(),
            }),
        }
    }
}

/// Endpoint and fixed query parameters for one AHN layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub url: String,
    pub ahn: Ahn,
    pub data_type: DataType,
    pub crs: String,
    pub response_crs: String,
}

impl Service {
    pub fn new(ahn: Ahn, data_type: DataType) -> Self {
        Self {
            url: format!("https://service.pdok.nl/rws/{ahn}/wms/v1_0"),
            ahn,
            data_type,
            crs: DEFAULT_CRS.to_owned(),
            response_crs: DEFAULT_CRS.to_owned(),
        }
    }

    /// Returns the layer queried by this service.
    ///
    /// AHN2 publishes a single 5m layer regardless of data type.
    pub fn layer(&self) -> String {
        match self.ahn {
            Ahn::Ahn2 => format!("{}_5m", self.ahn),
            Ahn::Ahn3 => format!("{}_05m_{}", self.ahn, self.data_type),
        }
    }

    /// Returns the `GetFeatureInfo` query for the pixel at `coord`.
    pub fn query(&self, coord: Coord<f64>) -> Vec<(&'static str, String)> {
        let layer = self.layer();
        vec![
            ("request", "GetFeatureInfo".to_owned()),
            ("service", "WMS".to_owned()),
            ("version", "1.3.0".to_owned()),
            ("crs", self.crs.clone()),
            ("response_crs", self.response_crs.clone()),
            ("width", MAP_PIXELS.to_owned()),
            ("height", MAP_PIXELS.to_owned()),
            ("i", CENTER_PIXEL.to_owned()),
            ("j", CENTER_PIXEL.to_owned()),
            ("info_format", "application/json".to_owned()),
            ("layers", layer.clone()),
            ("query_layers", layer),
            ("data_type", self.data_type.to_string()),
            ("bbox", bbox(coord)),
        ]
    }
}

impl Default for Service {
    fn default() -> Self {
        Self::new(Ahn::default(), DataType::default())
    }
}

fn bbox(Coord { x, y }: Coord<f64>) -> String {
    format!(
        "{}, {}, {}, {}",
        x - HALF_EXTENT,
        y - HALF_EXTENT,
        x + HALF_EXTENT,
        y + HALF_EXTENT
    )
}
