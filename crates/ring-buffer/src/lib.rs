//! Fixed-Capacity Ring Buffer
//!
//! Provides a bounded FIFO window over per-frame samples. Pushing into a
//! full buffer evicts the oldest sample in O(1).

mod buffer;

pub use buffer::{Iter, RingBuffer};

use thiserror::Error;

/// Ring buffer construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// A window must hold at least one sample
    #[error("Ring buffer capacity must be greater than zero")]
    ZeroCapacity,
}
