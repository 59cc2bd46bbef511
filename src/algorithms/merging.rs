//! The merge step shared by all mergesort variants, and the strategies providing its
//! temporary buffers.

use std::{cmp::Ordering, marker::PhantomData, mem::MaybeUninit};

use crate::error::SortError;

pub static ALLOC_COUNTER: crate::data::GlobalCounter = crate::data::GlobalCounter::new();
pub static MERGE_SLICE_COUNTER: crate::data::GlobalCounter = crate::data::GlobalCounter::new();
pub static COMPARISON_COUNTER: crate::data::GlobalCounter = crate::data::GlobalCounter::new();

/// Temporary space handed to the merge step
pub trait Scratch<T>: Sized {
    /// Prepare scratch space for sorting a slice of length `len`
    fn try_for_len(len: usize) -> Result<Self, SortError>;

    /// Call `f` with two disjoint uninitialized buffers holding at least `left` and `right`
    /// elements respectively.
    fn with_halves<R>(
        &mut self,
        left: usize,
        right: usize,
        f: impl FnOnce(&mut [MaybeUninit<T>], &mut [MaybeUninit<T>]) -> R,
    ) -> Result<R, SortError>;
}

/// Names a [`Scratch`] strategy independently of the element type
pub trait ScratchFactory {
    type Scratch<T>: Scratch<T>;

    /// String representation of this strategy
    fn display() -> String;
}

/// Every merge reserves exactly the space it needs and frees it before returning
#[derive(Debug, Clone, Copy)]
pub struct Scoped;

impl ScratchFactory for Scoped {
    type Scratch<T> = ScopedScratch<T>;

    fn display() -> String {
        "scoped".to_string()
    }
}

/// See [`Scoped`]
#[derive(Debug)]
pub struct ScopedScratch<T>(PhantomData<fn() -> T>);

impl<T> Scratch<T> for ScopedScratch<T> {
    fn try_for_len(_len: usize) -> Result<Self, SortError> {
        Ok(Self(PhantomData))
    }

    fn with_halves<R>(
        &mut self,
        left: usize,
        right: usize,
        f: impl FnOnce(&mut [MaybeUninit<T>], &mut [MaybeUninit<T>]) -> R,
    ) -> Result<R, SortError> {
        let mut left_buffer = reserve::<T>(left)?;
        let mut right_buffer = reserve::<T>(right)?;

        // Both vectors keep a length of zero, so dropping them never drops elements
        Ok(f(
            &mut left_buffer.spare_capacity_mut()[..left],
            &mut right_buffer.spare_capacity_mut()[..right],
        ))
    }
}

/// One buffer, big enough for the largest merge, is reserved before sorting starts and reused
/// by every merge
#[derive(Debug, Clone, Copy)]
pub struct Pooled;

impl ScratchFactory for Pooled {
    type Scratch<T> = PooledScratch<T>;

    fn display() -> String {
        "pooled".to_string()
    }
}

/// See [`Pooled`]
#[derive(Debug)]
pub struct PooledScratch<T>(Vec<T>);

impl<T> Scratch<T> for PooledScratch<T> {
    fn try_for_len(len: usize) -> Result<Self, SortError> {
        reserve(len).map(Self)
    }

    fn with_halves<R>(
        &mut self,
        left: usize,
        right: usize,
        f: impl FnOnce(&mut [MaybeUninit<T>], &mut [MaybeUninit<T>]) -> R,
    ) -> Result<R, SortError> {
        let total = left + right;
        if self.0.capacity() < total {
            self.0
                .try_reserve_exact(total)
                .map_err(|source| SortError::allocation(total, source))?;
        }

        let (left_buffer, rest) = self.0.spare_capacity_mut().split_at_mut(left);

        Ok(f(left_buffer, &mut rest[..right]))
    }
}

/// Reserve an empty [`Vec`] with room for exactly `capacity` elements
fn reserve<T>(capacity: usize) -> Result<Vec<T>, SortError> {
    #[cfg(feature = "counters")]
    ALLOC_COUNTER.increase(capacity as u64);

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|source| SortError::allocation(capacity, source))?;

    Ok(buffer)
}

/// Merge the sorted ranges `slice[left..mid]` and `slice[mid..right]` so that `slice[left..right]`
/// ends up sorted.
///
/// Equal elements from `slice[left..mid]` are placed before those from `slice[mid..right]`.
/// If either range is not sorted the result is some permutation of `slice[left..right]`.
pub fn merge<T, S, F>(
    slice: &mut [T],
    left: usize,
    mid: usize,
    right: usize,
    scratch: &mut S,
    compare: &mut F,
) -> Result<(), SortError>
where
    S: Scratch<T>,
    F: FnMut(&T, &T) -> Ordering,
{
    assert!(
        left <= mid && mid <= right && right <= slice.len(),
        "Merge range {left}..{mid}..{right} out of bounds for length {len}",
        len = slice.len(),
    );

    merge_runs(&mut slice[left..right], mid - left, scratch, compare)
}

/// Merge the two sorted runs `slice[..run_length]` and `slice[run_length..]`
pub fn merge_runs<T, S, F>(
    slice: &mut [T],
    run_length: usize,
    scratch: &mut S,
    compare: &mut F,
) -> Result<(), SortError>
where
    S: Scratch<T>,
    F: FnMut(&T, &T) -> Ordering,
{
    let right_length = slice.len() - run_length;
    // Zero-sized elements are indistinguishable, there is nothing to move
    if run_length == 0 || right_length == 0 || std::mem::size_of::<T>() == 0 {
        return Ok(());
    }

    #[cfg(feature = "counters")]
    MERGE_SLICE_COUNTER.increase(slice.len() as u64);

    scratch.with_halves(run_length, right_length, |left_buffer, right_buffer| {
        merge_with_buffers(slice, run_length, left_buffer, right_buffer, compare)
    })
}

/// Copy both runs of `slice` into the buffers and merge them back into `slice`
fn merge_with_buffers<T, F>(
    slice: &mut [T],
    run_length: usize,
    left_buffer: &mut [MaybeUninit<T>],
    right_buffer: &mut [MaybeUninit<T>],
    compare: &mut F,
) where
    F: FnMut(&T, &T) -> Ordering,
{
    let right_length = slice.len() - run_length;
    assert!(
        left_buffer.len() >= run_length && right_buffer.len() >= right_length,
        "Buffers need to hold both runs"
    );

    let output = slice.as_mut_ptr();
    let left = left_buffer.as_mut_ptr() as *mut T;
    let right = right_buffer.as_mut_ptr() as *mut T;

    // SAFETY: The buffers are disjoint from `slice` and large enough for their run.
    // MaybeUninit<T> has the same layout as T, so the copies produce valid elements in the
    // buffers. From then on `hole` owns every element that has not been written back yet, and
    // each element is written back exactly once: either by the loop or by the drop of `hole`,
    // which also runs if `compare` panics. `slice` therefore always ends up a permutation of
    // its original contents.
    unsafe {
        std::ptr::copy_nonoverlapping(output as *const T, left, run_length);
        std::ptr::copy_nonoverlapping(output.add(run_length) as *const T, right, right_length);

        let mut hole = MergeHole {
            left,
            left_end: left.add(run_length),
            right,
            right_end: right.add(right_length),
            output,
        };

        while hole.left < hole.left_end && hole.right < hole.right_end {
            #[cfg(feature = "counters")]
            COMPARISON_COUNTER.increase(1);

            // Taking the left element on ties keeps the merge stable
            let source = if compare(&*hole.left, &*hole.right) != Ordering::Greater {
                hole.take_left()
            } else {
                hole.take_right()
            };

            std::ptr::copy_nonoverlapping(source, hole.output, 1);
            hole.output = hole.output.add(1);
        }

        // Dropping `hole` copies the rest of the non-empty run
    }
}

/// The unconsumed parts of both runs and the next output position
struct MergeHole<T> {
    left: *const T,
    left_end: *const T,
    right: *const T,
    right_end: *const T,
    output: *mut T,
}

impl<T> MergeHole<T> {
    /// # Safety
    ///
    /// The left run must not be empty
    unsafe fn take_left(&mut self) -> *const T {
        let element = self.left;
        // SAFETY: Caller guarantees `left < left_end`
        self.left = unsafe { self.left.add(1) };
        element
    }

    /// # Safety
    ///
    /// The right run must not be empty
    unsafe fn take_right(&mut self) -> *const T {
        let element = self.right;
        // SAFETY: Caller guarantees `right < right_end`
        self.right = unsafe { self.right.add(1) };
        element
    }
}

impl<T> Drop for MergeHole<T> {
    fn drop(&mut self) {
        // SAFETY: The remaining elements of both runs are initialized and their count equals the
        // number of output positions not written yet.
        unsafe {
            let left_remaining = self.left_end.offset_from(self.left) as usize;
            let right_remaining = self.right_end.offset_from(self.right) as usize;

            std::ptr::copy_nonoverlapping(self.left, self.output, left_remaining);
            std::ptr::copy_nonoverlapping(
                self.right,
                self.output.add(left_remaining),
                right_remaining,
            );
        }
    }
}
