//! Input generation for experiments and instrumentation counters

use std::{
    fmt,
    marker::PhantomData,
    sync::atomic::{AtomicU64, Ordering},
};

use rand::{Rng as _, distr::Distribution, rngs::StdRng, seq::SliceRandom as _};

/// A trait for generalizing sorting data creation
pub trait Data<T: Sized + Ord + fmt::Debug> {
    /// Initialize a vector of the given size
    fn initialize(size: usize, rng: &mut StdRng) -> Vec<T>;
}

/// Uniformly distributed values over the whole range of the type
#[derive(Debug)]
pub struct UniformData<T>(PhantomData<T>);

/// A random permutation of `0..size`
#[derive(Debug)]
pub struct PermutationData<T>(PhantomData<T>);

/// Roughly `sqrt(size)` distinct values, each repeated many times
#[derive(Debug)]
pub struct FewUniqueData<T>(PhantomData<T>);

/// Zipf distributed values, a few values are very frequent
#[derive(Debug)]
pub struct ZipfData<T>(PhantomData<T>);

/// The exponent used by [`ZipfData`]
pub const ZIPF_EXPONENT: f64 = 1.1;

macro_rules! impl_for_integers {
    ($($type:ty),*) => {
        $(
            impl_for_integers!(@single $type);
        )*
    };
    (@single $type:ty) => {
        impl Data<$type> for UniformData<$type> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                std::iter::repeat_with(|| rng.random_range(<$type>::MIN..=<$type>::MAX))
                    .take(size)
                    .collect()
            }
        }

        impl Data<$type> for PermutationData<$type> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                // Sizes beyond the type range wrap around and produce duplicates
                let mut values: Vec<$type> = (0..size).map(|value| value as $type).collect();
                values.shuffle(rng);
                values
            }
        }

        impl Data<$type> for FewUniqueData<$type> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                let distinct = std::cmp::max(size.isqrt(), 1);
                let distinct = <$type>::try_from(distinct).unwrap_or(<$type>::MAX);

                std::iter::repeat_with(|| rng.random_range(0..distinct))
                    .take(size)
                    .collect()
            }
        }

        impl Data<$type> for ZipfData<$type> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                let Ok(zipf) = rand_distr::Zipf::new(std::cmp::max(size, 1) as f64, ZIPF_EXPONENT)
                else {
                    unreachable!("Zipf parameters are always valid");
                };

                zipf.sample_iter(rng)
                    .take(size)
                    .map(|value: f64| value as $type)
                    .collect()
            }
        }
    }
}

// Implement the Data traits for the default integer types
impl_for_integers!(u16, u32, u64, i64);

/// A global counter, used with the `counters` feature
#[derive(Debug)]
pub struct GlobalCounter(AtomicU64);

impl GlobalCounter {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Add `amount` to the counter
    pub fn increase(&self, amount: u64) {
        self.0.fetch_add(amount, Ordering::Relaxed);
    }

    /// Read the counter and reset it to zero
    pub fn take(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}

impl Default for GlobalCounter {
    fn default() -> Self {
        Self::new()
    }
}
