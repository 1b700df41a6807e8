//! Circular buffer and iterator for lag and window features.
//!
//! [`CircularBuffer`] keeps the most recent `capacity` values. Iteration
//! goes through [`CircularIterator`], which walks a slice with a wrapping
//! position and a fixed number of remaining steps.

use core::ptr;

use crate::error::{FeaturizerError, Result};

/// Iterator over a slice that wraps around its end.
///
/// Yields `data[(start_offset + steps_taken) % data.len()]` until
/// `steps_remaining` reaches zero. An iterator with no remaining steps is an
/// end sentinel. Two iterators are equal when they walk the same slice, sit
/// at the same position, and have the same number of steps remaining.
///
/// # Example
///
/// ```rust
/// use fz_core::CircularIterator;
///
/// let data = [1, 2, 3];
/// let values: Vec<i32> = CircularIterator::new(&data, 5, 1).copied().collect();
/// assert_eq!(values, vec![2, 3, 1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct CircularIterator<'a, T> {
    data: Option<&'a [T]>,
    steps_taken: usize,
    steps_remaining: usize,
    start_offset: usize,
}

impl<'a, T> Clone for CircularIterator<'a, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            steps_taken: self.steps_taken,
            steps_remaining: self.steps_remaining,
            start_offset: self.start_offset,
        }
    }
}

impl<'a, T> Default for CircularIterator<'a, T> {
    fn default() -> Self {
        Self {
            data: None,
            steps_taken: 0,
            steps_remaining: 0,
            start_offset: 0,
        }
    }
}

impl<'a, T> CircularIterator<'a, T> {
    /// Create an iterator yielding `steps` items starting at `start_offset`.
    #[must_use]
    pub fn new(data: &'a [T], steps: usize, start_offset: usize) -> Self {
        Self {
            data: Some(data),
            steps_taken: 0,
            steps_remaining: steps,
            start_offset,
        }
    }

    /// Current index into the backing slice, or `None` if it is empty.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self.data {
            Some(data) if !data.is_empty() => Some((self.start_offset + self.steps_taken) % data.len()),
            _ => None,
        }
    }

    /// Element at the current position, without advancing.
    #[must_use]
    pub fn current(&self) -> Option<&'a T> {
        if self.steps_remaining == 0 {
            return None;
        }
        let data = self.data?;
        self.position().map(|index| &data[index])
    }

    /// Steps left before this iterator becomes an end sentinel.
    #[must_use]
    pub fn steps_remaining(&self) -> usize {
        self.steps_remaining
    }

    /// Returns `true` once no steps remain.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.steps_remaining == 0
    }
}

impl<'a, T> Iterator for CircularIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current()?;
        self.steps_taken += 1;
        self.steps_remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.position().is_some() {
            self.steps_remaining
        } else {
            0
        };
        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for CircularIterator<'a, T> {}

impl<'a, T> PartialEq for CircularIterator<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        let same_data = match (self.data, other.data) {
            (Some(a), Some(b)) => ptr::eq(a.as_ptr(), b.as_ptr()) && a.len() == b.len(),
            (None, None) => true,
            _ => false,
        };

        same_data
            && self.position() == other.position()
            && self.steps_remaining == other.steps_remaining
    }
}

impl<'a, T> Eq for CircularIterator<'a, T> {}

/// A fixed-capacity buffer that overwrites its oldest value when full.
///
/// # Example
///
/// ```rust
/// use fz_core::CircularBuffer;
///
/// let mut buffer = CircularBuffer::new(3).unwrap();
/// for v in 1..=4 {
///     buffer.push(v);
/// }
///
/// assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
/// let (start, _end) = buffer.range(2);
/// assert_eq!(start.copied().collect::<Vec<_>>(), vec![3, 4]);
/// ```
#[derive(Clone, Debug)]
pub struct CircularBuffer<T> {
    /// Stored values; grows up to `capacity`.
    data: Vec<T>,
    /// Index of the oldest value once the buffer is full.
    start: usize,
    capacity: usize,
}

impl<T> CircularBuffer<T> {
    /// Create an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(FeaturizerError::invalid_argument(
                "circular buffer capacity must be greater than 0",
            ));
        }

        Ok(Self {
            data: Vec::with_capacity(capacity),
            start: 0,
            capacity,
        })
    }

    /// Append a value, returning the value it displaced once full.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.data.len() < self.capacity {
            self.data.push(value);
            return None;
        }

        let old = core::mem::replace(&mut self.data[self.start], value);
        self.start = (self.start + 1) % self.capacity;
        Some(old)
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been pushed since creation or `clear`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maximum number of stored values.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` once `capacity` values are stored.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Value by age (0 = oldest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.data.len() {
            return None;
        }
        Some(&self.data[(self.start + index) % self.data.len()])
    }

    /// Oldest stored value.
    #[must_use]
    pub fn oldest(&self) -> Option<&T> {
        self.get(0)
    }

    /// Most recently pushed value.
    #[must_use]
    pub fn newest(&self) -> Option<&T> {
        self.data.len().checked_sub(1).and_then(|last| self.get(last))
    }

    /// Remove every value.
    pub fn clear(&mut self) {
        self.data.clear();
        self.start = 0;
    }

    /// Iterator over all stored values, oldest first.
    #[must_use]
    pub fn iter(&self) -> CircularIterator<'_, T> {
        self.begin()
    }

    /// Iterator positioned at the oldest value.
    #[must_use]
    pub fn begin(&self) -> CircularIterator<'_, T> {
        CircularIterator::new(&self.data, self.data.len(), self.start)
    }

    /// End sentinel matching [`CircularBuffer::begin`] after `len()` steps.
    #[must_use]
    pub fn end(&self) -> CircularIterator<'_, T> {
        CircularIterator::new(&self.data, 0, self.start + self.data.len())
    }

    /// `(start, end)` over the `min(n, len())` most recent values, oldest
    /// first.
    #[must_use]
    pub fn range(&self, n: usize) -> (CircularIterator<'_, T>, CircularIterator<'_, T>) {
        let count = self.data.len();
        let take = n.min(count);
        let start = CircularIterator::new(&self.data, take, self.start + count - take);
        (start, self.end())
    }
}

impl<'a, T> IntoIterator for &'a CircularBuffer<T> {
    type Item = &'a T;
    type IntoIter = CircularIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps_until_end<T>(mut iter: CircularIterator<'_, T>, end: &CircularIterator<'_, T>) -> usize {
        let mut count = 0;
        while iter != *end {
            iter.next();
            count += 1;
        }
        count
    }

    // ========================================================================
    // CircularIterator
    // ========================================================================

    #[test]
    fn test_iterator_loops() {
        let v: Vec<i16> = vec![1, 2, 3, 4, 5];
        let values: Vec<i16> = CircularIterator::new(&v, 10, 0).copied().collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_iterator_comparison() {
        let v: Vec<i16> = vec![1, 2, 3, 4, 5];
        let mut iter1 = CircularIterator::new(&v, 20, 0);
        let mut iter2 = CircularIterator::new(&v, 20, 0);
        assert_eq!(iter1, iter2);

        iter2.next();
        assert_ne!(iter1, iter2);

        iter1.next();
        assert_eq!(iter1, iter2);

        // Same array position after a full loop, but fewer steps remaining.
        for _ in 0..5 {
            iter1.next();
        }
        assert_eq!(iter1.position(), iter2.position());
        assert_ne!(iter1, iter2);
    }

    #[test]
    fn test_iterator_current_and_next() {
        let v = vec![String::from("1"), String::from("2"), String::from("3")];
        let mut iter = CircularIterator::new(&v, 5, 0);

        assert_eq!(iter.current().map(String::as_str), Some("1"));
        assert_eq!(iter.next().map(String::as_str), Some("1"));
        assert_eq!(iter.current().map(String::as_str), Some("2"));
        iter.next();
        assert_eq!(iter.current().map(String::len), Some(1));
        assert_eq!(iter.len(), 3);
    }

    #[test]
    fn test_iterator_single_value() {
        let v = [1i16];
        let mut iter1 = CircularIterator::new(&v, 2, 0);
        let mut iter2 = CircularIterator::new(&v, 2, 0);
        assert_eq!(iter1, iter2);

        iter1.next();
        assert_ne!(iter1, iter2);
        iter2.next();
        assert_eq!(iter1, iter2);
        assert_eq!(iter1.current(), Some(&1));
    }

    #[test]
    fn test_iterator_start_offset() {
        let v: Vec<i16> = vec![1, 2, 3, 4, 5];
        let iter1 = CircularIterator::new(&v, 5, 2);
        let mut iter2 = CircularIterator::new(&v, 7, 0);
        assert_ne!(iter1, iter2);
        assert_eq!(iter1.current(), Some(&3));

        iter2.next();
        iter2.next();
        assert_eq!(iter1, iter2);
    }

    #[test]
    fn test_iterator_end_sentinel() {
        let v: Vec<i16> = vec![1, 2, 3, 4, 5];
        let mut iter = CircularIterator::new(&v, 1, 2);
        let end = CircularIterator::new(&v, 0, 3);

        assert_ne!(iter, end);
        assert_eq!(iter.current(), Some(&3));
        iter.next();
        assert_eq!(iter, end);
        assert!(iter.is_end());
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_iterator_loop_until_end() {
        let v: Vec<i16> = vec![1, 2, 3, 4, 5];
        let iter = CircularIterator::new(&v, v.len(), 0);
        let end = CircularIterator::new(&v, 0, 0);
        assert_ne!(iter, end);
        assert_eq!(steps_until_end(iter, &end), 5);
    }

    #[test]
    fn test_iterator_different_slices() {
        let a = [1, 2, 3];
        let b = [1, 2, 3];
        assert_ne!(CircularIterator::new(&a, 3, 0), CircularIterator::new(&b, 3, 0));
        assert_ne!(CircularIterator::new(&a[..2], 3, 0), CircularIterator::new(&a, 3, 0));
    }

    #[test]
    fn test_iterator_default() {
        let iter1: CircularIterator<'_, String> = CircularIterator::default();
        let iter2: CircularIterator<'_, String> = CircularIterator::default();
        assert_eq!(iter1, iter2);
        assert!(iter1.position().is_none());
        assert_eq!(iter1.count(), 0);
    }

    // ========================================================================
    // CircularBuffer
    // ========================================================================

    #[test]
    fn test_zero_capacity() {
        assert!(matches!(
            CircularBuffer::<i32>::new(0),
            Err(FeaturizerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_buffer() {
        let buffer: CircularBuffer<String> = CircularBuffer::new(5).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.begin(), buffer.end());
        assert!(buffer.oldest().is_none());
        assert!(buffer.newest().is_none());
    }

    #[test]
    fn test_push_single() {
        let mut buffer = CircularBuffer::new(5).unwrap();
        assert_eq!(buffer.push(String::from("1")), None);

        let mut start = buffer.begin();
        let end = buffer.end();
        assert_ne!(start, end);
        assert_eq!(start.current().map(String::as_str), Some("1"));

        start.next();
        assert_eq!(start, end);
    }

    #[test]
    fn test_circular_push() {
        let mut buffer = CircularBuffer::new(5).unwrap();
        for v in 1..=5 {
            assert_eq!(buffer.push(v.to_string()), None);
        }
        assert_eq!(buffer.push(String::from("6")), Some(String::from("1")));
        assert!(buffer.is_full());

        let start = buffer.begin();
        assert_eq!(start.current().map(String::as_str), Some("2"));
        assert_eq!(steps_until_end(start.clone(), &buffer.end()), 5);

        let values: Vec<&str> = buffer.iter().map(String::as_str).collect();
        assert_eq!(values, vec!["2", "3", "4", "5", "6"]);
        assert_eq!(buffer.oldest().map(String::as_str), Some("2"));
        assert_eq!(buffer.newest().map(String::as_str), Some("6"));
    }

    #[test]
    fn test_range_partial_buffer() {
        let mut buffer = CircularBuffer::new(5).unwrap();
        for v in 1i16..=3 {
            buffer.push(v);
        }

        let (start, end) = buffer.range(2);
        assert_eq!(steps_until_end(start.clone(), &end), 2);
        assert_eq!(start.copied().collect::<Vec<_>>(), vec![2, 3]);

        let (start, end) = buffer.range(4);
        assert_eq!(steps_until_end(start.clone(), &end), 3);
        assert_eq!(start.copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_range_wrapped_buffer() {
        let mut buffer = CircularBuffer::new(3).unwrap();
        for v in 1..=7 {
            buffer.push(v);
        }

        let (start, end) = buffer.range(2);
        assert_eq!(start.copied().collect::<Vec<_>>(), vec![6, 7]);
        assert_eq!(steps_until_end(buffer.range(2).0, &end), 2);
        assert_eq!(buffer.range(0).0, buffer.end());
    }

    #[test]
    fn test_get_and_clear() {
        let mut buffer = CircularBuffer::new(2).unwrap();
        buffer.push(1.0f64);
        buffer.push(2.0);
        buffer.push(3.0);

        assert_eq!(buffer.get(0), Some(&2.0));
        assert_eq!(buffer.get(1), Some(&3.0));
        assert_eq!(buffer.get(2), None);

        buffer.clear();
        assert!(buffer.is_empty());
        buffer.push(9.0);
        assert_eq!((&buffer).into_iter().copied().collect::<Vec<_>>(), vec![9.0]);
    }
}
