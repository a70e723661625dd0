//! Adapters that the standard library does not provide with the semantics
//! an [`Iterchain`](crate::Iterchain) needs.
//!
//! Each adapter owns its upstream source and pulls from it only when it is
//! itself pulled. The buffering ones ([`Cycle`], [`Sorted`] and everything in
//! [`combinatorics`]) say so on their type.

use std::cmp::Ordering;

pub mod combinatorics;

/// Values that can act as a keep/drop selector for [`Compress`].
pub trait Truthy {
    /// Whether the selector keeps its element.
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

macro_rules! truthy_numbers {
    ($zero:expr => $($t:ty),*) => {
        $(
            impl Truthy for $t {
                fn is_truthy(&self) -> bool {
                    *self != $zero
                }
            }
        )*
    };
}

truthy_numbers!(0 => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
truthy_numbers!(0.0 => f32, f64);

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for [T] {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

/// Pairs every element with a running index starting at an arbitrary offset.
#[derive(Debug, Clone)]
pub struct Enumerate<I> {
    source: I,
    index: usize,
}

impl<I> Enumerate<I> {
    pub fn new(source: I, start: usize) -> Self {
        Self {
            source,
            index: start,
        }
    }
}

impl<I: Iterator> Iterator for Enumerate<I> {
    type Item = (usize, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.source.next()?;
        let index = self.index;
        self.index += 1;
        Some((index, item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

/// Yields the elements at positions `start, start + step, ...` below `stop`.
///
/// The stop bound is checked before pulling, so the source is never pulled
/// past the last element the slice yields.
#[derive(Debug, Clone)]
pub struct Slice<I> {
    source: I,
    /// Position the source will report next
    position: usize,
    /// Position of the next element to yield
    wanted: usize,
    stop: Option<usize>,
    step: usize,
}

impl<I> Slice<I> {
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn new(source: I, start: usize, stop: Option<usize>, step: usize) -> Self {
        assert!(step != 0, "slice step must not be zero");
        Self {
            source,
            position: 0,
            wanted: start,
            stop,
            step,
        }
    }
}

impl<I: Iterator> Iterator for Slice<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.stop, Some(stop) if self.wanted >= stop) {
            return None;
        }

        while self.position < self.wanted {
            self.source.next()?;
            self.position += 1;
        }

        let item = self.source.next()?;
        self.position += 1;
        self.wanted = self.wanted.saturating_add(self.step);
        Some(item)
    }
}

/// Replays a sequence forever.
///
/// The first pass is forwarded while every element is copied into a buffer;
/// once the source is exhausted the buffer is replayed in order. Memory grows
/// with the length of the source.
#[derive(Debug, Clone)]
pub struct Cycle<I: Iterator> {
    source: Option<I>,
    buffer: Vec<I::Item>,
    position: usize,
}

impl<I: Iterator> Cycle<I> {
    pub fn new(source: I) -> Self {
        Self {
            source: Some(source),
            buffer: Vec::new(),
            position: 0,
        }
    }
}

impl<I> Iterator for Cycle<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = self.source.as_mut() {
            match source.next() {
                Some(item) => {
                    self.buffer.push(item.clone());
                    return Some(item);
                }
                None => self.source = None,
            }
        }

        if self.buffer.is_empty() {
            return None;
        }

        let item = self.buffer[self.position].clone();
        self.position = (self.position + 1) % self.buffer.len();
        Some(item)
    }
}

/// Keeps an element iff the selector pulled alongside it is truthy.
///
/// Stops as soon as either sequence is exhausted.
#[derive(Debug, Clone)]
pub struct Compress<I, S> {
    source: I,
    selectors: S,
}

impl<I, S: Iterator> Compress<I, S> {
    pub fn new<T>(source: I, selectors: T) -> Self
    where
        T: IntoIterator<IntoIter = S>,
    {
        Self {
            source,
            selectors: selectors.into_iter(),
        }
    }
}

impl<I, S> Iterator for Compress<I, S>
where
    I: Iterator,
    S: Iterator,
    S::Item: Truthy,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.source.next()?;
            let selector = self.selectors.next()?;
            if selector.is_truthy() {
                return Some(item);
            }
        }
    }
}

/// Sorts the whole sequence on the first pull, then yields it in order.
pub struct Sorted<I: Iterator, F> {
    source: Option<I>,
    compare: F,
    sorted: std::vec::IntoIter<I::Item>,
}

impl<I: Iterator, F> Sorted<I, F> {
    pub fn new(source: I, compare: F) -> Self {
        Self {
            source: Some(source),
            compare,
            sorted: Vec::new().into_iter(),
        }
    }
}

impl<I, F> Iterator for Sorted<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = self.source.take() {
            let mut items: Vec<I::Item> = source.collect();
            items.sort_by(&mut self.compare);
            self.sorted = items.into_iter();
        }
        self.sorted.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.source {
            Some(source) => source.size_hint(),
            None => self.sorted.size_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_offset() {
        let items: Vec<_> = Enumerate::new(vec!["x", "y"].into_iter(), 10).collect();
        assert_eq!(items, vec![(10, "x"), (11, "y")]);
    }

    #[test]
    fn test_slice_with_step_and_stop() {
        let items: Vec<_> = Slice::new(0..20, 2, Some(9), 3).collect();
        assert_eq!(items, vec![2, 5, 8]);
    }

    #[test]
    fn test_slice_without_stop() {
        let items: Vec<_> = Slice::new(0..7, 4, None, 1).collect();
        assert_eq!(items, vec![4, 5, 6]);
    }

    #[test]
    fn test_slice_stops_pulling_at_bound() {
        let mut pulled = 0;
        let source = (0..).inspect(|_| pulled += 1);
        let items: Vec<_> = Slice::new(source, 1, Some(4), 2).collect();
        assert_eq!(items, vec![1, 3]);
        assert_eq!(pulled, 4);
    }

    #[test]
    fn test_slice_start_past_end() {
        assert_eq!(Slice::new(0..3, 5, None, 1).count(), 0);
    }

    #[test]
    #[should_panic(expected = "slice step must not be zero")]
    fn test_slice_zero_step_panics() {
        let _ = Slice::new(0..3, 0, None, 0);
    }

    #[test]
    fn test_cycle_replays_buffer() {
        let items: Vec<_> = Cycle::new(vec![1, 2, 3].into_iter()).take(11).collect();
        assert_eq!(items, vec![1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_cycle_of_empty_is_empty() {
        let mut cycle = Cycle::new(std::iter::empty::<u8>());
        assert_eq!(cycle.next(), None);
        assert_eq!(cycle.next(), None);
    }

    #[test]
    fn test_compress_selectors() {
        let items: Vec<_> = Compress::new("abcdef".chars(), vec![1, 0, 1, 0, 1, 1]).collect();
        assert_eq!(items, vec!['a', 'c', 'e', 'f']);
    }

    #[test]
    fn test_compress_stops_at_shorter() {
        let items: Vec<_> = Compress::new(1..10, vec![true, true]).collect();
        assert_eq!(items, vec![1, 2]);

        let items: Vec<_> = Compress::new(1..3, std::iter::repeat(Some(()))).collect();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_truthy_values() {
        assert!(!0_i64.is_truthy());
        assert!(3_u8.is_truthy());
        assert!(!0.0_f64.is_truthy());
        assert!(!"".is_truthy());
        assert!("x".to_string().is_truthy());
        assert!(!Vec::<u8>::new().is_truthy());
        assert!(!None::<u8>.is_truthy());
    }

    #[test]
    fn test_sorted_is_stable() {
        let pairs = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        let by_key = |a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0);
        let items: Vec<_> = Sorted::new(pairs.into_iter(), by_key).collect();
        assert_eq!(items, vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }
}
