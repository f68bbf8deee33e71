//! # Scan Windows
//!
//! [`BlockRange`] bounds a sub-range of ledger history. The indexer
//! never queries a provider with more blocks than its per-request limit
//! allows; [`BlockRange::windows`] partitions a range into consecutive
//! chunks that cover it exactly — no gaps, no overlaps.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An inclusive range of ledger blocks, `from_block ≤ to_block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    from_block: u64,
    to_block: u64,
}

impl BlockRange {
    /// Construct a range, enforcing `from_block ≤ to_block`.
    pub fn new(from_block: u64, to_block: u64) -> Result<Self, ValidationError> {
        if from_block > to_block {
            return Err(ValidationError::InvalidRange {
                from_block,
                to_block,
            });
        }
        Ok(Self {
            from_block,
            to_block,
        })
    }

    /// A single-block range.
    pub fn single(block: u64) -> Self {
        Self {
            from_block: block,
            to_block: block,
        }
    }

    /// Inclusive lower bound.
    pub fn from_block(&self) -> u64 {
        self.from_block
    }

    /// Inclusive upper bound.
    pub fn to_block(&self) -> u64 {
        self.to_block
    }

    /// Number of blocks covered.
    pub fn len(&self) -> u64 {
        self.to_block - self.from_block + 1
    }

    /// Always false — a valid range covers at least one block.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of windows a partition with `chunk_size` produces.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn window_count(&self, chunk_size: u64) -> u64 {
        assert!(chunk_size > 0, "chunk_size must be positive");
        self.len().div_ceil(chunk_size)
    }

    /// Partition into consecutive windows of at most `chunk_size`
    /// blocks, in increasing block order. The windows cover the range
    /// exactly; the last window may be shorter.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn windows(&self, chunk_size: u64) -> Windows {
        assert!(chunk_size > 0, "chunk_size must be positive");
        Windows {
            next: Some(self.from_block),
            to_block: self.to_block,
            chunk_size,
        }
    }
}

impl std::fmt::Display for BlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.from_block, self.to_block)
    }
}

/// Iterator over the windows of a partitioned [`BlockRange`].
#[derive(Debug, Clone)]
pub struct Windows {
    next: Option<u64>,
    to_block: u64,
    chunk_size: u64,
}

impl Iterator for Windows {
    type Item = BlockRange;

    fn next(&mut self) -> Option<BlockRange> {
        let from = self.next?;
        let to = from
            .saturating_add(self.chunk_size - 1)
            .min(self.to_block);
        self.next = if to < self.to_block {
            Some(to + 1)
        } else {
            None
        };
        Some(BlockRange {
            from_block: from,
            to_block: to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_inverted_bounds() {
        let err = BlockRange::new(1005, 1000).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidRange {
                from_block: 1005,
                to_block: 1000
            }
        );
    }

    #[test]
    fn single_block_range() {
        let r = BlockRange::single(42);
        assert_eq!(r.len(), 1);
        assert_eq!(r.from_block(), 42);
        assert_eq!(r.to_block(), 42);
    }

    #[test]
    fn range_within_one_chunk_yields_one_window() {
        let r = BlockRange::new(1000, 1005).unwrap();
        let windows: Vec<_> = r.windows(10).collect();
        assert_eq!(windows, vec![BlockRange::new(1000, 1005).unwrap()]);
        assert_eq!(r.window_count(10), 1);
    }

    #[test]
    fn range_spanning_chunks_partitions_exactly() {
        let r = BlockRange::new(1000, 1025).unwrap();
        let windows: Vec<_> = r.windows(10).collect();
        assert_eq!(
            windows,
            vec![
                BlockRange::new(1000, 1009).unwrap(),
                BlockRange::new(1010, 1019).unwrap(),
                BlockRange::new(1020, 1025).unwrap(),
            ]
        );
        assert_eq!(r.window_count(10), 3);
    }

    #[test]
    fn exact_multiple_has_no_trailing_sliver() {
        let r = BlockRange::new(0, 19).unwrap();
        let windows: Vec<_> = r.windows(10).collect();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1], BlockRange::new(10, 19).unwrap());
    }

    #[test]
    fn chunk_of_one_visits_every_block() {
        let r = BlockRange::new(5, 8).unwrap();
        let windows: Vec<_> = r.windows(1).collect();
        assert_eq!(windows.len(), 4);
        assert!(windows.iter().all(|w| w.len() == 1));
    }

    #[test]
    #[should_panic(expected = "chunk_size must be positive")]
    fn zero_chunk_size_panics() {
        let _ = BlockRange::new(0, 10).unwrap().windows(0);
    }

    proptest! {
        /// Windows partition the range with no gaps and no overlaps,
        /// and their count matches `window_count`.
        #[test]
        fn windows_partition_without_gaps_or_overlaps(
            from in 0u64..100_000,
            span in 0u64..5_000,
            chunk in 1u64..64,
        ) {
            let range = BlockRange::new(from, from + span).unwrap();
            let windows: Vec<_> = range.windows(chunk).collect();

            prop_assert_eq!(windows.len() as u64, range.window_count(chunk));
            prop_assert_eq!(windows.first().unwrap().from_block(), range.from_block());
            prop_assert_eq!(windows.last().unwrap().to_block(), range.to_block());
            for pair in windows.windows(2) {
                // Consecutive: next window starts exactly one past the
                // previous end.
                prop_assert_eq!(pair[1].from_block(), pair[0].to_block() + 1);
            }
            for w in &windows {
                prop_assert!(w.len() <= chunk);
            }
        }
    }
}
