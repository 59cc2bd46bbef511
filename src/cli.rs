//! Command line input handling

use std::cmp::Ordering;

use mergesort_engine::{
    SortError,
    algorithms::{Sort as _, merging, mergesort, parallel},
};

/// Command line arguments
#[derive(clap::Parser)]
#[command(
    author,
    version,
    about,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Sort the given values and print them before and after sorting
    Sort {
        /// The sorting algorithm to use
        #[arg(short, long, default_value_t = Algorithm::TopDown)]
        algorithm: Algorithm,
        /// The values to sort
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i64>,
    },
    /// Run a fixed battery of correctness checks, exits with a failure code if any check fails
    Test {
        /// Only check this algorithm instead of all of them
        #[arg(short, long)]
        algorithm: Option<Algorithm>,
    },
    /// Measure the running time of an algorithm on generated data
    Measure {
        /// The sorting algorithm to run
        #[arg()]
        algorithm: Algorithm,
        /// The data type to use for sorting
        #[arg()]
        data: DataType,
        /// The number of runs to do
        #[arg(short, long, default_value_t = 1_000)]
        runs: usize,
        /// The size of the slices to sort
        #[arg(short, long, default_value_t = 1_000_000)]
        size: usize,
        /// Seed for the rng
        #[arg(long)]
        seed: Option<u64>,
        /// The output file to write the samples to, one duration in nanoseconds per line
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Count comparisons on random permutations and relate them to `n log2(n)`
    Complexity {
        /// The sorting algorithm to run
        #[arg(short, long, default_value_t = Algorithm::TopDown)]
        algorithm: Algorithm,
        /// The slice sizes to measure
        #[arg(long, value_delimiter = ',', default_values_t = [1_000, 10_000, 100_000])]
        sizes: Vec<usize>,
        /// Seed for the rng
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// The different sorting algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// Recursive mergesort allocating buffers for each merge
    TopDown,
    /// Recursive mergesort reusing one preallocated buffer
    TopDownPooled,
    /// Iterative mergesort allocating buffers for each merge
    BottomUp,
    /// Iterative mergesort reusing one preallocated buffer
    BottomUpPooled,
    /// Recursive mergesort sorting halves in parallel
    Parallel,
    /// The stable sort in [`std`], for reference
    Std,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match clap::ValueEnum::to_possible_value(self) {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{self:?}"),
        }
    }
}

impl Algorithm {
    /// Every selectable algorithm
    pub const ALL: [Algorithm; 6] = [
        Algorithm::TopDown,
        Algorithm::TopDownPooled,
        Algorithm::BottomUp,
        Algorithm::BottomUpPooled,
        Algorithm::Parallel,
        Algorithm::Std,
    ];

    /// Return whether the sort is stable
    pub fn is_stable(self) -> bool {
        match self {
            Algorithm::TopDown => mergesort::TopDownMergeSort::<merging::Scoped>::IS_STABLE,
            Algorithm::TopDownPooled => mergesort::TopDownMergeSort::<merging::Pooled>::IS_STABLE,
            Algorithm::BottomUp => mergesort::BottomUpMergeSort::<merging::Scoped>::IS_STABLE,
            Algorithm::BottomUpPooled => {
                mergesort::BottomUpMergeSort::<merging::Pooled>::IS_STABLE
            }
            Algorithm::Parallel | Algorithm::Std => true,
        }
    }

    /// Sort `slice` by `compare` with this algorithm
    pub fn sort_by<T, F>(self, slice: &mut [T], compare: F) -> Result<(), SortError>
    where
        T: Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        match self {
            Algorithm::TopDown => {
                mergesort::TopDownMergeSort::<merging::Scoped>::try_sort_by(slice, compare)
            }
            Algorithm::TopDownPooled => {
                mergesort::TopDownMergeSort::<merging::Pooled>::try_sort_by(slice, compare)
            }
            Algorithm::BottomUp => {
                mergesort::BottomUpMergeSort::<merging::Scoped>::try_sort_by(slice, compare)
            }
            Algorithm::BottomUpPooled => {
                mergesort::BottomUpMergeSort::<merging::Pooled>::try_sort_by(slice, compare)
            }
            Algorithm::Parallel => parallel::ParallelMergeSort::<
                { parallel::DEFAULT_THRESHOLD },
            >::try_sort_by(slice, compare),
            Algorithm::Std => {
                slice.sort_by(compare);
                Ok(())
            }
        }
    }

    /// Sort `slice` by the natural order of `T` with this algorithm
    pub fn sort<T: Ord + Send>(self, slice: &mut [T]) -> Result<(), SortError> {
        self.sort_by(slice, T::cmp)
    }
}

/// Available data types for sorting
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DataType {
    PermutationU32,
    UniformU32,
    PermutationU64,
    UniformU64,
    FewUniqueU64,
    ZipfU64,
    UniformI64,
}

/// A hacky macro to dynamically "match" on type (:
///
/// Binds `$t` to the element type and `$d` to the [`mergesort_engine::data::Data`] generator
/// of the given [`DataType`] inside `$code`.
macro_rules! with_match_type {
    ($arg:expr; $t:ident, $d:ident => $code:block) => {
        $crate::cli::with_match_type! {
            @arms $arg; $t, $d => $code;
            PermutationU32: u32, mergesort_engine::data::PermutationData<u32>,
            UniformU32: u32, mergesort_engine::data::UniformData<u32>,
            PermutationU64: u64, mergesort_engine::data::PermutationData<u64>,
            UniformU64: u64, mergesort_engine::data::UniformData<u64>,
            FewUniqueU64: u64, mergesort_engine::data::FewUniqueData<u64>,
            ZipfU64: u64, mergesort_engine::data::ZipfData<u64>,
            UniformI64: i64, mergesort_engine::data::UniformData<i64>,
        }
    };
    (@arms $arg:expr; $t:ident, $d:ident => $code:block; $($name:ident : $type:ty, $d_type:ty),* $(,)?) => {
        match $arg {
            $(
                crate::cli::DataType::$name => {
                    type $t = $type;
                    type $d = $d_type;

                    $code
                }
            ),*
        }
    };
}

pub(crate) use with_match_type;

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match clap::ValueEnum::to_possible_value(self) {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{self:?}"),
        }
    }
}
