//! Errors reported by the sorting engines

/// The ways a sort can fail
///
/// Sorting itself cannot fail for a total order, the only failure is not being able to obtain
/// the temporary merge buffers.
#[derive(Debug, thiserror::Error)]
pub enum SortError {
    /// Reserving a merge buffer of `requested` elements failed
    #[error("failed to allocate a merge buffer for {requested} elements")]
    Allocation {
        requested: usize,
        #[source]
        source: std::collections::TryReserveError,
    },
}

impl SortError {
    /// Wrap a failed reservation of `requested` elements
    pub fn allocation(requested: usize, source: std::collections::TryReserveError) -> Self {
        tracing::warn!(requested, "merge buffer reservation failed");

        Self::Allocation { requested, source }
    }
}

