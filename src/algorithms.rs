//! The sorting engines

use std::cmp::Ordering;

use crate::error::SortError;

pub mod merging;
pub mod mergesort;
pub mod parallel;

/// A stable sorting algorithm over a caller-supplied total order
pub trait Sort {
    /// Whether the sort keeps equal elements in their original order
    const IS_STABLE: bool;

    /// String representation of this sort
    fn display() -> String;

    /// Sort `slice` by `compare`, which has to describe a total order.
    ///
    /// # Errors
    ///
    /// Returns [`SortError::Allocation`] if a merge buffer could not be obtained, `slice` is then
    /// left as a permutation of its original elements.
    fn try_sort_by<T, F>(slice: &mut [T], compare: F) -> Result<(), SortError>
    where
        F: FnMut(&T, &T) -> Ordering;

    /// Sort `slice` by the natural order of `T`
    fn try_sort<T: Ord>(slice: &mut [T]) -> Result<(), SortError> {
        Self::try_sort_by(slice, T::cmp)
    }

    /// Sort `slice` by the natural order of the keys extracted with `key`
    fn try_sort_by_key<T, K: Ord, F>(slice: &mut [T], mut key: F) -> Result<(), SortError>
    where
        F: FnMut(&T) -> K,
    {
        Self::try_sort_by(slice, |a, b| key(a).cmp(&key(b)))
    }
}

/// The engine used by [`sort`]
pub type DefaultSort = mergesort::TopDownMergeSort;

/// Stably sort `slice` with the [`DefaultSort`]
pub fn sort<T: Ord>(slice: &mut [T]) -> Result<(), SortError> {
    DefaultSort::try_sort(slice)
}

/// Stably sort `slice` by the IEEE 754 total order
///
/// Negative NaNs sort before everything and positive NaNs after everything, `-0.0` sorts before
/// `0.0`.
pub fn sort_floats(slice: &mut [f64]) -> Result<(), SortError> {
    DefaultSort::try_sort_by(slice, f64::total_cmp)
}
