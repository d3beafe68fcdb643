use anyhow::{anyhow, Context, Error as AnyError};
use std::{ffi::OsStr, fs, path::Path};
use surface::{
    coords_from_rows,
    geo::geometry::LineString,
    math::rd,
};

/// Reads a trajectory in RD New coordinates from `path`.
///
/// With `wgs84`, the file holds "lon,lat" pairs which are converted
/// to RD.
pub fn read_trajectory(path: &Path, wgs84: bool) -> Result<LineString<f64>, AnyError> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let rows = match path.extension().and_then(OsStr::to_str) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        _ => parse_csv(&text).with_context(|| format!("parsing {}", path.display()))?,
    };
    let coords = coords_from_rows(&rows)?;
    Ok(coords
        .into_iter()
        .map(|coord| if wgs84 { rd::to_rd(coord) } else { coord })
        .collect())
}

/// Parses comma separated rows, skipping `#` comments and a header
/// line.
fn parse_csv(text: &str) -> Result<Vec<Vec<f64>>, AnyError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        match record.deserialize::<Vec<f64>>(None) {
            Ok(row) => rows.push(row),
            Err(_) if rows.is_empty() && record.iter().any(|f| f.chars().any(char::is_alphabetic)) => {}
            Err(e) => return Err(anyhow!("line {line}: {e}")),
        }
    }
    Ok(rows)
}
