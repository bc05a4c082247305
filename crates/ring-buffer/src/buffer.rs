//! Ring Buffer Implementation

use crate::BufferError;

/// Fixed-capacity FIFO ring buffer.
///
/// Storage is allocated once at construction. `head` is the next write
/// slot; the oldest sample sits `len` slots behind it.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Pre-allocated storage
    storage: Box<[T]>,
    /// Next write position
    head: usize,
    /// Number of valid samples
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create a new ring buffer with given capacity
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        Ok(Self {
            storage: vec![T::default(); capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        })
    }

    /// Push a sample, returning the evicted oldest sample if the buffer was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let capacity = self.capacity();
        let evicted = if self.len == capacity {
            // The oldest sample occupies the slot about to be overwritten.
            Some(self.storage[self.head])
        } else {
            self.len += 1;
            None
        };

        self.storage[self.head] = item;
        self.head = (self.head + 1) % capacity;
        evicted
    }
}

impl<T> RingBuffer<T> {
    /// Get the number of samples currently in the buffer
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer holds `capacity` samples
    pub fn is_full(&self) -> bool {
        self.len == self.storage.len()
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            offset: 0,
        }
    }

    /// Clear the buffer. Storage is kept; stale slots are unreachable.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    fn start(&self) -> usize {
        let capacity = self.capacity();
        (self.head + capacity - self.len) % capacity
    }
}

/// FIFO iterator over a [`RingBuffer`]
pub struct Iter<'a, T> {
    buffer: &'a RingBuffer<T>,
    offset: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.buffer.len {
            return None;
        }
        let idx = (self.buffer.start() + self.offset) % self.buffer.capacity();
        self.offset += 1;
        Some(&self.buffer.storage[idx])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len - self.offset;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
