//! Batcher - Fixed-size partitioning of an ordered sequence

use std::num::NonZeroUsize;

/// Divide `items` into consecutive batches of `size`; the last may be short
///
/// Empty input yields no batches.
pub fn batch<T: Clone>(items: &[T], size: NonZeroUsize) -> Vec<Vec<T>> {
    items.chunks(size.get()).map(<[T]>::to_vec).collect()
}
