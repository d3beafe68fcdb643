mod input;
mod options;

use anyhow::{anyhow, Error as AnyError};
use clap::Parser;
use itertools::{Itertools, MinMaxResult};
use options::{Cli, Command as CliCmd};
use raster::Dataset;
use std::{io::Write, time::Duration};
use surface::{Profile, RemoteSampler, SurfaceLine};
use textplots::{Chart, Plot, Shape};

fn main() -> Result<(), AnyError> {
    let Cli {
        trajectory,
        wgs84,
        raster,
        ahn,
        data_type,
        max_concurrency,
        timeout,
        fail_fast,
        base_url,
        cmd,
    } = Cli::parse();

    env_logger::init();

    let trajectory = input::read_trajectory(&trajectory, wgs84)?;
    let dataset = raster.as_deref().map(Dataset::open).transpose()?;

    let mut remote = RemoteSampler::builder()
        .ahn(ahn)
        .data_type(data_type)
        .max_concurrency(max_concurrency)
        .fail_fast(fail_fast);
    if let Some(secs) = timeout {
        let timeout = Duration::try_from_secs_f64(secs)
            .map_err(|e| anyhow!("invalid timeout {secs}: {e}"))?;
        remote = remote.timeout(timeout);
    }
    if let Some(url) = base_url {
        remote = remote.base_url(url);
    }
    let remote = remote.build()?;

    let mut builder = SurfaceLine::builder().trajectory(trajectory);
    if let Some(dataset) = &dataset {
        builder = builder.raster(dataset);
    }
    let SurfaceLine { split, profile } = builder.build(&remote)?;

    if let Some(split) = split {
        eprintln!(
            "raster covers {} of {} sub-path(s)",
            split.covered.0.len(),
            split.covered.0.len() + split.remaining.0.len()
        );
    }
    match profile.iter().map(|sample| sample.z).minmax() {
        MinMaxResult::NoElements => eprintln!("no samples"),
        MinMaxResult::OneElement(z) => eprintln!("1 sample, z: {z}"),
        MinMaxResult::MinMax(lo, hi) => eprintln!("{} samples, z: {lo}..{hi}", profile.len()),
    }

    match cmd {
        CliCmd::Csv => print_csv(&profile)?,
        CliCmd::Json => print_json(&profile)?,
        CliCmd::Plot => plot_ascii(&profile),
    };
    Ok(())
}

fn print_csv(profile: &Profile) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "x,y,z")?;
    for sample in profile {
        writeln!(stdout, "{},{},{}", sample.x, sample.y, sample.z)?;
    }
    Ok(())
}

fn print_json(profile: &Profile) -> Result<(), AnyError> {
    let json = serde_json::to_string(profile)?;
    println!("{json}");
    Ok(())
}

/// Plots elevation by sample index; raster samples come first.
fn plot_ascii(profile: &Profile) {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let plot_data: Vec<(f32, f32)> = profile
        .iter()
        .enumerate()
        .map(|(idx, sample)| (idx as f32, sample.z as f32))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    Chart::new(300, 150, 0.0, plot_data.len() as f32)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
}
