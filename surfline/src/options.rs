use clap::{Parser, Subcommand};
use std::{path::PathBuf, str::FromStr};
use surface::{Ahn, DataType, DEFAULT_MAX_CONCURRENCY};

/// Sample an elevation profile along a trajectory.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    /// Trajectory file with one "x,y" pair per line, or a JSON array
    /// of [x, y] pairs if it ends in `.json`.
    pub trajectory: PathBuf,

    /// Trajectory is WGS84 "lon,lat" instead of RD New.
    #[arg(long, default_value_t = false)]
    pub wgs84: bool,

    /// GeoTIFF elevation raster, sampled wherever it has coverage.
    #[arg(short, long)]
    pub raster: Option<PathBuf>,

    /// AHN release: "ahn2" or "ahn3".
    #[arg(long, default_value = "ahn3", value_parser = parse_option::<Ahn>)]
    pub ahn: Ahn,

    /// Elevation model: "dtm" or "dsm".
    #[arg(long, default_value = "dtm", value_parser = parse_option::<DataType>)]
    pub data_type: DataType,

    /// Most requests in flight to the AHN service.
    #[arg(short, long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-request timeout, in seconds.
    #[arg(short, long)]
    pub timeout: Option<f64>,

    /// Stop requesting points after the first failure.
    #[arg(long, default_value_t = false)]
    pub fail_fast: bool,

    /// AHN WMS endpoint replacing the PDOK one.
    #[arg(long)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

fn parse_option<T>(s: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: ToString,
{
    s.parse().map_err(|e: T::Err| e.to_string())
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print "x,y,z" samples to stdout.
    Csv,

    /// Print samples to stdout as JSON.
    Json,

    /// Plot to terminal.
    Plot,
}
