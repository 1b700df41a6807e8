//! Benchmark binary for the featurizers.
//!
//! Usage:
//!     featurizer_bench <data_file> <iterations>
//!
//! The data file is JSON of the form
//! `{"values": [1.0, null, ...], "grains": [["store", "item"], ...]}`.
//! Outputs a JSON array of benchmark results to stdout. Set `FZ_LOG` to a
//! level name (`debug`, `trace`, ...) for lifecycle logging on stderr.

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;

use fz_components::prelude::*;
use fz_core::annotation::create_annotation_maps;
use fz_core::estimator::Estimator;
use fz_core::pipeline::train;
use fz_core::transformer::Transformer;
use fz_featurizers::prelude::*;

#[derive(Debug, Deserialize)]
struct BenchData {
    values: Vec<Option<f64>>,
    #[serde(default)]
    grains: Vec<Grain>,
}

#[derive(Debug, Serialize)]
struct BenchmarkResult {
    name: String,
    rows: usize,
    iterations: usize,
    total_time_ms: f64,
    avg_time_ms: f64,
    min_time_ms: f64,
    max_time_ms: f64,
    throughput_rows_per_sec: f64,
}

/// Input rows with nulls mapped to NaN and a grain per row.
struct Rows {
    values: Vec<f64>,
    grains: Vec<Grain>,
}

fn load_rows(path: &str) -> Result<Rows, Box<dyn Error>> {
    let reader = BufReader::new(File::open(path)?);
    let data: BenchData = serde_json::from_reader(reader)?;

    let grains = if data.grains.is_empty() {
        vec![vec!["all".to_string()]; data.values.len()]
    } else if data.grains.len() == data.values.len() {
        data.grains
    } else {
        return Err(format!(
            "{} grains for {} values",
            data.grains.len(),
            data.values.len()
        )
        .into());
    };

    Ok(Rows {
        values: data.values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
        grains,
    })
}

fn benchmark<F>(name: &str, iterations: usize, rows: usize, mut f: F) -> Result<BenchmarkResult, Box<dyn Error>>
where
    F: FnMut() -> fz_core::Result<()>,
{
    info!(name, "running");
    let mut times = Vec::with_capacity(iterations);

    for _ in 0..iterations {
        let start = Instant::now();
        f()?;
        times.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    let total_time: f64 = times.iter().sum();
    let avg_time = total_time / iterations as f64;
    let min_time = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max_time = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let throughput = if avg_time > 0.0 {
        (rows as f64 / avg_time) * 1000.0
    } else {
        0.0
    };

    Ok(BenchmarkResult {
        name: name.to_string(),
        rows,
        iterations,
        total_time_ms: total_time,
        avg_time_ms: avg_time,
        min_time_ms: min_time,
        max_time_ms: max_time,
        throughput_rows_per_sec: throughput,
    })
}

fn rolling(rows: &Rows, config: RollingWindowConfig) -> fz_core::Result<()> {
    let mut transformer = RollingWindowTransformer::new(config)?;
    let mut input = (Vec::new(), 0.0);
    for (grain, value) in rows.grains.iter().zip(&rows.values) {
        input.0.clone_from(grain);
        input.1 = *value;
        transformer.execute(&input, &mut |_| {})?;
    }
    transformer.flush(&mut |_| {})
}

fn run(data_file: &str, iterations: usize) -> Result<Vec<BenchmarkResult>, Box<dyn Error>> {
    let rows = load_rows(data_file)?;
    let n = rows.values.len();
    info!(rows = n, "loaded data");

    let mut results = Vec::new();

    results.push(benchmark("MedianEstimator", iterations, n, || {
        let mut estimator: MedianEstimator<f64> =
            Estimator::new(MedianPolicy::new(), create_annotation_maps(1), 0)?;
        train(&mut estimator, &rows.values).map(|_| ())
    })?);

    results.push(benchmark("MedianImputer", iterations, n, || {
        let maps = create_annotation_maps(1);
        let mut median: MedianEstimator<f64> = Estimator::new(MedianPolicy::new(), maps.clone(), 0)?;
        train(&mut median, &rows.values)?;

        let mut imputer = MedianImputerPolicy::<f64>::estimator(maps, 0)?;
        train(&mut imputer, &rows.values)?;
        let mut transformer = imputer.create_transformer()?;
        for value in &rows.values {
            transformer.execute(value, &mut |_| {})?;
        }
        transformer.flush(&mut |_| {})
    })?);

    for (label, calculation) in [
        ("RollingWindow(Mean, 7)", RollingCalculation::Mean),
        ("RollingWindow(Max, 7)", RollingCalculation::Max),
        ("RollingWindow(Median, 7)", RollingCalculation::Median),
    ] {
        let config = RollingWindowConfig::new(7, calculation).with_min_periods(1);
        results.push(benchmark(label, iterations, n, || rolling(&rows, config))?);
    }

    results.push(benchmark("ShortGrainDropper", iterations, n, || {
        let config = ShortGrainDropperConfig::new(vec![1, 7]).with_max_horizon(7);
        let mut estimator = ShortGrainDropperPolicy::estimator(create_annotation_maps(1), 0, config)?;
        train(&mut estimator, &rows.grains)?;

        let transformer = estimator.create_transformer()?;
        let mut restored = ShortGrainDropperTransformer::from_bytes(&transformer.to_bytes()?)?;
        for grain in &rows.grains {
            restored.execute(grain, &mut |_| {})?;
        }
        restored.flush(&mut |_| {})
    })?);

    Ok(results)
}

fn main() {
    let log_level = env::var("FZ_LOG")
        .ok()
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <data_file> <iterations>", args[0]);
        std::process::exit(1);
    }

    let iterations = match args[2].parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            error!(value = %args[2], "iterations must be a positive integer");
            std::process::exit(1);
        }
    };

    let results = match run(&args[1], iterations) {
        Ok(results) => results,
        Err(err) => {
            error!(%err, "benchmark failed");
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&results) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            error!(%err, "failed to encode results");
            std::process::exit(1);
        }
    }
}
