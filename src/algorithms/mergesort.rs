//! The sequential mergesort implementations

use std::{cmp::Ordering, ops::Range};

use super::merging::{self, Scratch};
use crate::error::SortError;

/// The default [`merging::ScratchFactory`] to use
pub type DefaultScratchFactory = merging::Scoped;

/// The default `CHECK_SORTED` to use
pub const DEFAULT_CHECK_SORTED: bool = false;

/// The Top-Down Mergesort [`super::Sort`]
///
/// With `CHECK_SORTED` a merge is skipped if both halves are already in order.
pub struct TopDownMergeSort<
    S: merging::ScratchFactory = DefaultScratchFactory,
    const CHECK_SORTED: bool = DEFAULT_CHECK_SORTED,
>(std::marker::PhantomData<S>);

impl<S: merging::ScratchFactory, const CHECK_SORTED: bool> super::Sort
    for TopDownMergeSort<S, CHECK_SORTED>
{
    const IS_STABLE: bool = true;

    fn display() -> String {
        format!(
            "top-down ({scratch}, CHECK_SORTED = {CHECK_SORTED})",
            scratch = S::display()
        )
    }

    fn try_sort_by<T, F>(slice: &mut [T], mut compare: F) -> Result<(), SortError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if slice.len() < 2 {
            return Ok(());
        }

        tracing::debug!(len = slice.len(), sort = %Self::display(), "sorting");

        let mut scratch = <S::Scratch<T> as Scratch<T>>::try_for_len(slice.len())?;

        // Delegate to helper function
        Self::sort_range(slice, 0..slice.len(), &mut scratch, &mut compare)
    }
}

impl<S: merging::ScratchFactory, const CHECK_SORTED: bool> TopDownMergeSort<S, CHECK_SORTED> {
    /// Sort `slice[range]`, leaving the rest of `slice` untouched
    fn sort_range<T, F>(
        slice: &mut [T],
        range: Range<usize>,
        scratch: &mut S::Scratch<T>,
        compare: &mut F,
    ) -> Result<(), SortError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if range.len() <= 1 {
            return Ok(());
        }

        let Range { start, end } = range;
        let mid = start + (end - start) / 2;

        Self::sort_range(slice, start..mid, scratch, compare)?;
        Self::sort_range(slice, mid..end, scratch, compare)?;

        if CHECK_SORTED && compare(&slice[mid - 1], &slice[mid]) != Ordering::Greater {
            return Ok(());
        }

        merging::merge(slice, start, mid, end, scratch, compare)
    }
}

/// The Bottom-Up Mergesort [`super::Sort`]
///
/// Merges runs of width 1, 2, 4, ... without recursion.
pub struct BottomUpMergeSort<
    S: merging::ScratchFactory = DefaultScratchFactory,
    const CHECK_SORTED: bool = DEFAULT_CHECK_SORTED,
>(std::marker::PhantomData<S>);

impl<S: merging::ScratchFactory, const CHECK_SORTED: bool> super::Sort
    for BottomUpMergeSort<S, CHECK_SORTED>
{
    const IS_STABLE: bool = true;

    fn display() -> String {
        format!(
            "bottom-up ({scratch}, CHECK_SORTED = {CHECK_SORTED})",
            scratch = S::display()
        )
    }

    fn try_sort_by<T, F>(slice: &mut [T], mut compare: F) -> Result<(), SortError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if slice.len() < 2 {
            return Ok(());
        }

        tracing::debug!(len = slice.len(), sort = %Self::display(), "sorting");

        let mut scratch = <S::Scratch<T> as Scratch<T>>::try_for_len(slice.len())?;

        let len = slice.len();
        let mut width = 1;
        while width < len {
            let mut start = 0;

            // Only pairs with a non-empty right run need merging
            while start < len - width {
                let mid = start + width;
                let end = std::cmp::min(mid + width, len);

                if !CHECK_SORTED || compare(&slice[mid - 1], &slice[mid]) == Ordering::Greater {
                    merging::merge(slice, start, mid, end, &mut scratch, &mut compare)?;
                }

                start = end;
            }

            // Saturating, otherwise this overflows for slices longer than `usize::MAX / 2`
            width = width.saturating_mul(2);
        }

        Ok(())
    }
}
