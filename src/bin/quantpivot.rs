//! Command-line runner: fit a pivot index on a ds2 dataset, answer a ds2
//! query file and write the neighbor ids and distances as ds2 files.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use quantpivot::data_format::Matrix;
use quantpivot::distance_measures::ExactKernel;
use quantpivot::io::{read_matrix, write_matrix};
use quantpivot::simd::simd_support_level;
use quantpivot::{FitConfig, PredictConfig, QuantPivotIndex, Real};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Number of row pairs compared by `--check-kernel`.
const KERNEL_CHECK_PAIRS: usize = 10;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Precision {
    #[value(name = "32")]
    F32,
    #[value(name = "64")]
    F64,
}

#[derive(Debug, Parser)]
#[command(name = "quantpivot")]
#[command(about = "Approximate k-nearest-neighbor search with a quantized pivot index")]
struct Args {
    /// Dataset file (ds2)
    dataset: PathBuf,

    /// Query file (ds2)
    queries: PathBuf,

    /// Number of pivots
    #[arg(short = 'p', long = "pivots", value_parser = clap::value_parser!(u32).range(1..))]
    pivots: u32,

    /// Number of neighbors per query
    #[arg(short, value_parser = clap::value_parser!(u32).range(1..))]
    k: u32,

    /// Coordinates kept per sketch
    #[arg(short = 'x', long = "quant-level", value_parser = clap::value_parser!(u32).range(1..))]
    quant_level: u32,

    /// Floating-point precision of the input files
    #[arg(long, value_enum, default_value = "32")]
    precision: Precision,

    /// Exact distance kernel used for refinement
    #[arg(long, default_value = "scalar")]
    kernel: ExactKernel,

    /// Run fit and predict on a single thread
    #[arg(long)]
    sequential: bool,

    /// Only print timings
    #[arg(long)]
    silent: bool,

    /// Output file for neighbor ids
    #[arg(long, default_value = "out_idnn.ds2")]
    out_ids: PathBuf,

    /// Output file for neighbor distances
    #[arg(long, default_value = "out_distnn.ds2")]
    out_dists: PathBuf,

    /// Compare the SIMD and scalar Euclidean kernels before fitting
    #[arg(long)]
    check_kernel: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.silent { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let outcome = match args.precision {
        Precision::F32 => run::<f32>(&args),
        Precision::F64 => run::<f64>(&args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run<T: Real>(args: &Args) -> quantpivot::Result<()> {
    let dataset: Matrix<T> = read_matrix(&args.dataset)?;
    let queries: Matrix<T> = read_matrix(&args.queries)?;

    if !args.silent {
        info!(
            dataset = %args.dataset.display(),
            rows = dataset.rows(),
            dim = dataset.cols(),
            queries = queries.rows(),
            simd = ?simd_support_level(),
            "inputs loaded"
        );
    }

    if args.check_kernel {
        check_kernel(&dataset, &queries)?;
    }

    let fit_config = FitConfig::new(args.pivots as usize, args.quant_level as usize)
        .with_silent(args.silent)
        .with_parallel(!args.sequential)
        .with_kernel(args.kernel);
    let predict_config = PredictConfig::new(args.k as usize)
        .with_silent(args.silent)
        .with_parallel(!args.sequential);

    let start = Instant::now();
    let index = QuantPivotIndex::fit(dataset, &fit_config)?;
    report_time("FIT", start.elapsed().as_secs_f64(), args.silent);

    let start = Instant::now();
    let result = index.predict(&queries, &predict_config)?;
    report_time("PREDICT", start.elapsed().as_secs_f64(), args.silent);

    if !args.silent {
        print_neighbors(&result.ids, &result.distances);
        info!(pruned = result.total_pruned(), "pruning summary");
    }

    write_matrix(&args.out_ids, &result.ids)?;
    write_matrix(&args.out_dists, &result.distances)?;
    Ok(())
}

fn check_kernel<T: Real>(dataset: &Matrix<T>, queries: &Matrix<T>) -> quantpivot::Result<()> {
    let report = ExactKernel::conformance(dataset, queries, KERNEL_CHECK_PAIRS, T::KERNEL_TOLERANCE)?;
    println!(
        "Kernel check: {}/{} pairs within {} (max diff {})",
        report.passed,
        report.pairs,
        T::KERNEL_TOLERANCE,
        report.max_abs_diff
    );
    Ok(())
}

fn report_time(phase: &str, secs: f64, silent: bool) {
    if silent {
        println!("{:.3}", secs);
    } else {
        println!("{} time = {:.5} secs", phase, secs);
    }
}

fn print_neighbors<T: Real>(ids: &Matrix<i32>, distances: &Matrix<T>) {
    println!("# KNN ids");
    for row in ids.iter_rows() {
        let line: Vec<String> = row.iter().map(|id| id.to_string()).collect();
        println!("{}", line.join(" "));
    }

    println!("# KNN distances");
    for row in distances.iter_rows() {
        let line: Vec<String> = row.iter().map(|d| format!("{:.6}", d)).collect();
        println!("{}", line.join(" "));
    }
}
