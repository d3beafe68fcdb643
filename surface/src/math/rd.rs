//! Conversion between WGS84 and the Dutch Rijksdriehoek (RD New,
//! EPSG:28992) grid.
//!
//! Uses the polynomial approximations by Schreutelkamp and Strang
//! van Hees, accurate to well under a meter inside the Netherlands.
//! Coordinates outside that area convert, but meaninglessly.

use geo::geometry::Coord;

/// RD coordinates of the Amersfoort reference point.
const X0: f64 = 155_000.0;
const Y0: f64 = 463_000.0;

/// WGS84 latitude and longitude of the Amersfoort reference point.
const PHI0: f64 = 52.155_174_40;
const LAM0: f64 = 5.387_206_21;

/// `(p, q, R)` terms of `x = X0 + Σ R * dφ^p * dλ^q`.
const R: [(i32, i32, f64); 9] = [
    (0, 1, 190_094.945),
    (1, 1, -11_832.228),
    (2, 1, -114.221),
    (0, 3, -32.391),
    (1, 0, -0.705),
    (3, 1, -2.340),
    (1, 3, -0.608),
    (0, 2, -0.008),
    (2, 3, 0.148),
];

/// `(p, q, S)` terms of `y = Y0 + Σ S * dφ^p * dλ^q`.
const S: [(i32, i32, f64); 10] = [
    (1, 0, 309_056.544),
    (0, 2, 3_638.893),
    (2, 0, 73.077),
    (1, 2, -157.984),
    (3, 0, 59.788),
    (0, 1, 0.433),
    (2, 2, -6.439),
    (1, 1, -0.032),
    (0, 4, 0.092),
    (1, 4, -0.054),
];

/// `(p, q, K)` terms of `φ = φ0 + Σ K * dx^p * dy^q / 3600`.
const K: [(i32, i32, f64); 11] = [
    (0, 1, 3_235.653_89),
    (2, 0, -32.582_97),
    (0, 2, -0.247_50),
    (2, 1, -0.849_78),
    (0, 3, -0.065_50),
    (2, 2, -0.017_09),
    (1, 0, -0.007_38),
    (4, 0, 0.005_30),
    (2, 3, -0.000_39),
    (4, 1, 0.000_33),
    (1, 1, -0.000_12),
];

/// `(p, q, L)` terms of `λ = λ0 + Σ L * dx^p * dy^q / 3600`.
const L: [(i32, i32, f64); 12] = [
    (1, 0, 5_260.529_16),
    (1, 1, 105.946_84),
    (1, 2, 2.456_56),
    (3, 0, -0.818_85),
    (1, 3, 0.055_94),
    (3, 1, -0.056_07),
    (0, 1, 0.011_99),
    (3, 2, -0.002_56),
    (1, 4, 0.001_28),
    (0, 2, 0.000_22),
    (2, 0, -0.000_22),
    (5, 0, 0.000_26),
];

fn series(terms: &[(i32, i32, f64)], u: f64, v: f64) -> f64 {
    terms
        .iter()
        .map(|&(p, q, coef)| coef * u.powi(p) * v.powi(q))
        .sum()
}

/// Converts a WGS84 `(x: longitude, y: latitude)` in degrees to RD.
pub fn to_rd(Coord { x: lon, y: lat }: Coord<f64>) -> Coord<f64> {
    let dphi = 0.36 * (lat - PHI0);
    let dlam = 0.36 * (lon - LAM0);
    Coord {
        x: X0 + series(&R, dphi, dlam),
        y: Y0 + series(&S, dphi, dlam),
    }
}

/// Converts an RD coordinate to WGS84 `(x: longitude, y: latitude)`
/// in degrees.
pub fn to_wgs84(Coord { x, y }: Coord<f64>) -> Coord<f64> {
    let dx = (x - X0) * 1e-5;
    let dy = (y - Y0) * 1e-5;
    Coord {
        x: LAM0 + series(&L, dx, dy) / 3600.0,
        y: PHI0 + series(&K, dx, dy) / 3600.0,
    }
}
