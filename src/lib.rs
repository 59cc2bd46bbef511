//! Stable mergesort engines over caller-supplied total orders
//!
//! [`sort`] covers the common case. The engines in [`algorithms::mergesort`] and
//! [`algorithms::parallel`] expose the recursive, iterative and fork-join variants, each
//! parameterized over how merge buffers are provided (see [`algorithms::merging`]).

pub mod algorithms;
pub mod data;
pub mod error;

#[cfg(test)]
mod test;

pub use algorithms::{Sort, sort, sort_floats};
pub use error::SortError;
