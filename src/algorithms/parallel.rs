//! A fork-join variant of the top-down mergesort

use std::cmp::Ordering;

use super::merging::{self, Scratch as _};
use crate::error::SortError;

/// The default `THRESHOLD` to use
pub const DEFAULT_THRESHOLD: usize = 4096;

/// Top-down mergesort sorting both halves on the [`rayon`] thread pool
///
/// Ranges of at most `THRESHOLD` elements are sorted sequentially with
/// [`super::mergesort::TopDownMergeSort`]. Merging is always sequential and uses per-merge
/// buffers, so concurrent merges never share memory.
pub struct ParallelMergeSort<const THRESHOLD: usize = DEFAULT_THRESHOLD>;

impl<const THRESHOLD: usize> ParallelMergeSort<THRESHOLD> {
    /// String representation of this sort
    pub fn display() -> String {
        format!("parallel (THRESHOLD = {THRESHOLD})")
    }

    /// Sort `slice` by `compare`, see [`super::Sort::try_sort_by`]
    pub fn try_sort_by<T, F>(slice: &mut [T], compare: F) -> Result<(), SortError>
    where
        T: Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        if slice.len() < 2 {
            return Ok(());
        }

        tracing::debug!(len = slice.len(), sort = %Self::display(), "sorting");

        Self::parallel_mergesort(slice, &compare)
    }

    /// Sort `slice` by the natural order of `T`
    pub fn try_sort<T: Ord + Send>(slice: &mut [T]) -> Result<(), SortError> {
        Self::try_sort_by(slice, T::cmp)
    }

    fn parallel_mergesort<T, F>(slice: &mut [T], compare: &F) -> Result<(), SortError>
    where
        T: Send,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        if slice.len() <= std::cmp::max(THRESHOLD, 1) {
            return <super::mergesort::TopDownMergeSort as super::Sort>::try_sort_by(
                slice, compare,
            );
        }

        let mid = slice.len() / 2;
        let (left, right) = slice.split_at_mut(mid);

        let (left_result, right_result) = rayon::join(
            || Self::parallel_mergesort(left, compare),
            || Self::parallel_mergesort(right, compare),
        );
        left_result?;
        right_result?;

        let mut scratch = merging::ScopedScratch::<T>::try_for_len(slice.len())?;
        merging::merge_runs(slice, mid, &mut scratch, &mut |a: &T, b: &T| compare(a, b))
    }
}
