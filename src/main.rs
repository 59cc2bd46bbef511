use clap::Parser as _;
use rand::SeedableRng;

use mergesort_engine::{data, error::SortError};

mod battery;
mod cli;

/// Errors reported by the command line frontend
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Sort(#[from] SortError),

    #[error("failed to write samples to {}", .path.display())]
    Output {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} checks failed")]
    ChecksFailed { failed: usize, total: usize },

    #[error("{algorithm} produced an unsorted result for {size} elements")]
    Unsorted { algorithm: String, size: usize },
}

/// Program entry point
fn main() -> std::process::ExitCode {
    // Logs go to stderr, stdout is reserved for results
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli::Args { command } = cli::Args::parse();

    let result = match command {
        cli::Command::Sort { algorithm, values } => sort_values(algorithm, values),
        cli::Command::Test { algorithm } => run_battery(algorithm),
        cli::Command::Measure {
            algorithm,
            data,
            runs,
            size,
            seed,
            output,
        } => measure(algorithm, data, runs, size, seed, output),
        cli::Command::Complexity {
            algorithm,
            sizes,
            seed,
        } => count_comparisons(algorithm, &sizes, seed),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "command failed");
            std::process::ExitCode::FAILURE
        }
    }
}

/// Sort `values` and print them before and after
fn sort_values(algorithm: cli::Algorithm, mut values: Vec<i64>) -> Result<(), AppError> {
    println!("Before: {values:?}");
    algorithm.sort(&mut values)?;
    println!("After:  {values:?}");

    Ok(())
}

/// Run the check battery against `algorithm`, or every algorithm if `None`
fn run_battery(algorithm: Option<cli::Algorithm>) -> Result<(), AppError> {
    let algorithms = match algorithm {
        Some(algorithm) => vec![algorithm],
        None => cli::Algorithm::ALL.to_vec(),
    };

    let mut total = 0;
    let mut failed = 0;

    for algorithm in algorithms {
        println!("Running {algorithm} mergesort checks...");

        for result in battery::run(algorithm) {
            total += 1;

            match result.failure {
                None => println!("  ✓ {}", result.name),
                Some(failure) => {
                    failed += 1;
                    println!("  ✗ {}: {failure}", result.name);
                }
            }
        }
    }

    if failed == 0 {
        println!("✓ All tests passed");
        Ok(())
    } else {
        Err(AppError::ChecksFailed { failed, total })
    }
}

/// Create the rng, either from `seed` or the system rng
fn create_rng(seed: Option<u64>) -> rand::rngs::StdRng {
    match seed {
        Some(partial_seed) => rand::rngs::StdRng::seed_from_u64(partial_seed),
        None => {
            tracing::info!("No seed provided, generating one using system rng");
            rand::rngs::StdRng::from_os_rng()
        }
    }
}

/// Run the timing experiment and report it
fn measure(
    algorithm: cli::Algorithm,
    data: cli::DataType,
    runs: usize,
    size: usize,
    seed: Option<u64>,
    output: Option<std::path::PathBuf>,
) -> Result<(), AppError> {
    println!(
        "Running measurements for the following algorithm:\n{algorithm} (stable: {stable})",
        stable = algorithm.is_stable(),
    );
    println!("Runs: {runs}, Slice size: {size}, Data type: {data}");

    let mut rng = create_rng(seed);

    let (samples, stats) = cli::with_match_type!(data; T, D => {
        perform_experiment::<T, D>(algorithm, runs, size, &mut rng)?
    });

    println!("Stats: {stats:?}");

    #[cfg(feature = "counters")]
    {
        use mergesort_engine::algorithms::merging::{
            ALLOC_COUNTER, COMPARISON_COUNTER, MERGE_SLICE_COUNTER,
        };

        // Includes the discarded warm-up run
        let sorts = runs as u64 + 1;
        println!(
            "Per sort: comparisons {comparisons}, merged elements {merged}, \
             allocated elements {allocated}",
            comparisons = COMPARISON_COUNTER.take() / sorts,
            merged = MERGE_SLICE_COUNTER.take() / sorts,
            allocated = ALLOC_COUNTER.take() / sorts,
        );
    }

    if let Some(path) = output {
        let contents: String = samples
            .iter()
            .map(|sample| format!("{}\n", sample.as_nanos()))
            .collect();

        std::fs::write(&path, contents).map_err(|source| AppError::Output { path, source })?;
    }

    Ok(())
}

/// Perform a time sampling experiment on the given sorting algorithm
///
/// - runs: The number of samples to measure
/// - size: The size of the slices to sort
/// - rng: The rng used for sampling the data
fn perform_experiment<T: Ord + Send + std::fmt::Debug, D: data::Data<T>>(
    algorithm: cli::Algorithm,
    runs: usize,
    size: usize,
    rng: &mut rand::rngs::StdRng,
) -> Result<(Vec<std::time::Duration>, rolling_stats::Stats<f64>), AppError> {
    let mut samples = Vec::with_capacity(runs);

    let mut stats: rolling_stats::Stats<f64> = rolling_stats::Stats::new();

    let bar = indicatif::ProgressBar::new(runs as u64);

    for run in 0..=runs {
        let mut data = D::initialize(size, rng);

        let now = std::time::Instant::now();
        algorithm.sort(std::hint::black_box(&mut data))?;
        let elapsed = now.elapsed();

        if !data.is_sorted() {
            return Err(AppError::Unsorted {
                algorithm: algorithm.to_string(),
                size,
            });
        }

        // NOTE: Skip first sample as warm-up
        if run != 0 {
            samples.push(elapsed);
            stats.update(elapsed.as_secs_f64() * 1_000.0);

            bar.inc(1);
        }
    }

    bar.finish();

    Ok((samples, stats))
}

/// Count the comparisons `algorithm` needs for random permutations of each size
fn count_comparisons(
    algorithm: cli::Algorithm,
    sizes: &[usize],
    seed: Option<u64>,
) -> Result<(), AppError> {
    use data::Data as _;
    use std::sync::atomic::{AtomicU64, Ordering};

    let mut rng = create_rng(seed);

    println!("Comparison counts for {algorithm}:");
    println!("{:>12} {:>16} {:>12}", "n", "comparisons", "c");

    for &size in sizes {
        let mut values = data::PermutationData::<u64>::initialize(size, &mut rng);
        let comparisons = AtomicU64::new(0);

        algorithm.sort_by(&mut values, |a, b| {
            comparisons.fetch_add(1, Ordering::Relaxed);
            a.cmp(b)
        })?;

        if !values.is_sorted() {
            return Err(AppError::Unsorted {
                algorithm: algorithm.to_string(),
                size,
            });
        }

        let comparisons = comparisons.into_inner();
        // c in `comparisons = c * n * log2(n)`, undefined below two elements
        let n_log_n = size as f64 * (size as f64).log2();
        if n_log_n > 0.0 {
            let ratio = comparisons as f64 / n_log_n;
            println!("{size:>12} {comparisons:>16} {ratio:>12.4}");
        } else {
            println!("{size:>12} {comparisons:>16} {:>12}", "-");
        }
    }

    Ok(())
}
