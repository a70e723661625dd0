//! The chainable sequence wrapper.
//!
//! [`Iterchain`] holds exactly one pull source and is itself a pull source,
//! so wrappers can be nested and re-wrapped transparently. Every
//! transformation consumes the wrapper and returns a new one owning the
//! composed source; nothing is pulled until a terminal operation (or a
//! manual `next()`) asks for an element.
//!
//! A wrapper has exactly one consumer. Ownership enforces this within a
//! thread; sharing one wrapper between threads is not supported.

use std::cmp::Ordering;
use std::iter::{self, FusedIterator, Product as ProductOf};

use crate::adapters::combinatorics::{
    Combinations, CombinationsWithReplacement, Permutations, Product, ProductAll, ProductRepeat,
};
use crate::adapters::{Compress, Cycle, Enumerate, Slice, Sorted, Truthy};
use crate::error::{Error, Result};

/// Wrap any iterable in an [`Iterchain`].
///
/// This is the canonical entry point; it is equivalent to [`Iterchain::new`].
///
/// # Examples
///
/// ```rust
/// use iterchain::iterchain;
///
/// let squares = iterchain(vec![1, 2, 3]).map(|x| x * x).to_list();
/// assert_eq!(squares, vec![1, 4, 9]);
/// ```
pub fn iterchain<S: IntoIterator>(source: S) -> Iterchain<S::IntoIter> {
    Iterchain::new(source)
}

/// A lazy, chainable wrapper around a single pull source.
///
/// Once the source reports exhaustion it is dropped, and every later pull
/// returns `None`.
#[derive(Debug, Clone)]
#[must_use = "iterchains are lazy and do nothing unless consumed"]
pub struct Iterchain<I> {
    source: Option<I>,
}

impl<I: Iterator> Iterchain<I> {
    /// Wrap an iterable.
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            source: Some(source.into_iter()),
        }
    }

    /// Whether the source has already reported exhaustion.
    pub fn is_exhausted(&self) -> bool {
        self.source.is_none()
    }

    // ---- transformations -------------------------------------------------

    /// Lazily apply `f` to every element.
    pub fn map<B, F>(self, f: F) -> Iterchain<iter::Map<Self, F>>
    where
        F: FnMut(I::Item) -> B,
    {
        Iterchain::new(Iterator::map(self, f))
    }

    /// Keep only the elements for which `predicate` holds.
    pub fn filter<P>(self, predicate: P) -> Iterchain<iter::Filter<Self, P>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        Iterchain::new(Iterator::filter(self, predicate))
    }

    /// Map and filter in one step, keeping the `Some` results.
    pub fn filter_map<B, F>(self, f: F) -> Iterchain<iter::FilterMap<Self, F>>
    where
        F: FnMut(I::Item) -> Option<B>,
    {
        Iterchain::new(Iterator::filter_map(self, f))
    }

    /// Map every element to a sequence and concatenate the results in order.
    pub fn flat_map<U, F>(self, f: F) -> Iterchain<iter::FlatMap<Self, U, F>>
    where
        U: IntoIterator,
        F: FnMut(I::Item) -> U,
    {
        Iterchain::new(Iterator::flat_map(self, f))
    }

    /// Remove exactly one level of nesting.
    pub fn flatten(self) -> Iterchain<iter::Flatten<Self>>
    where
        I::Item: IntoIterator,
    {
        Iterchain::new(Iterator::flatten(self))
    }

    /// Pair every element with a running index beginning at `start`.
    pub fn enumerate(self, start: usize) -> Iterchain<Enumerate<Self>> {
        Iterchain::new(Enumerate::new(self, start))
    }

    /// Yield at most `n` elements, never pulling past the `n`th.
    pub fn take(self, n: usize) -> Iterchain<iter::Take<Self>> {
        Iterchain::new(Iterator::take(self, n))
    }

    /// Yield the elements at `start, start + step, ...` below `stop`.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn slice(self, start: usize, stop: Option<usize>, step: usize) -> Iterchain<Slice<Self>> {
        Iterchain::new(Slice::new(self, start, stop, step))
    }

    /// Yield every `step`th element, starting with the first.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn step_by(self, step: usize) -> Iterchain<iter::StepBy<Self>> {
        Iterchain::new(Iterator::step_by(self, step))
    }

    /// Yield elements until `predicate` first fails, then stop for good.
    pub fn take_while<P>(self, predicate: P) -> Iterchain<iter::TakeWhile<Self, P>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        Iterchain::new(Iterator::take_while(self, predicate))
    }

    /// Discard the first `n` elements.
    ///
    /// The discarding happens on the first pull, not here. A source shorter
    /// than `n` yields nothing.
    pub fn skip(self, n: usize) -> Iterchain<iter::Skip<Self>> {
        Iterchain::new(Iterator::skip(self, n))
    }

    /// Discard elements while `predicate` holds, then yield everything left.
    pub fn skip_while<P>(self, predicate: P) -> Iterchain<iter::SkipWhile<Self, P>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        Iterchain::new(Iterator::skip_while(self, predicate))
    }

    /// Call `f` on every element as it is pulled, passing it through unchanged.
    pub fn inspect<F>(self, f: F) -> Iterchain<iter::Inspect<Self, F>>
    where
        F: FnMut(&I::Item),
    {
        Iterchain::new(Iterator::inspect(self, f))
    }

    /// Yield all of `self`, then all of `other`.
    pub fn chain<U>(self, other: U) -> Iterchain<iter::Chain<Self, U::IntoIter>>
    where
        U: IntoIterator<Item = I::Item>,
    {
        Iterchain::new(Iterator::chain(self, other))
    }

    /// Yield all of `self`, then each of `others` in order.
    pub fn chain_all<O, U>(self, others: O) -> Iterchain<iter::Chain<Self, iter::Flatten<O::IntoIter>>>
    where
        O: IntoIterator<Item = U>,
        U: IntoIterator<Item = I::Item>,
    {
        Iterchain::new(Iterator::chain(self, others.into_iter().flatten()))
    }

    /// Pair up elements with `other`, stopping at the shorter sequence.
    pub fn zip<U>(self, other: U) -> Iterchain<iter::Zip<Self, U::IntoIter>>
    where
        U: IntoIterator,
    {
        Iterchain::new(Iterator::zip(self, other))
    }

    /// Replay the sequence forever.
    ///
    /// Every element of the first pass is buffered, so memory grows with the
    /// length of the source. An infinite source is never replayed; an empty
    /// source stays empty.
    pub fn cycle(self) -> Iterchain<Cycle<Self>>
    where
        I::Item: Clone,
    {
        Iterchain::new(Cycle::new(self))
    }

    /// Keep each element whose matching selector is truthy.
    pub fn compress<S>(self, selectors: S) -> Iterchain<Compress<Self, S::IntoIter>>
    where
        S: IntoIterator,
        S::Item: Truthy,
    {
        Iterchain::new(Compress::new(self, selectors))
    }

    /// Cartesian product with `other`.
    ///
    /// `other` is buffered in full on the first pull; `self` is streamed.
    pub fn product<U>(self, other: U) -> Iterchain<Product<Self, U::IntoIter>>
    where
        I::Item: Clone,
        U: IntoIterator,
        U::Item: Clone,
    {
        Iterchain::new(Product::new(self, other.into_iter()))
    }

    /// Cartesian product of the sequence with itself, `repeat` times.
    ///
    /// Buffers the whole source on the first pull.
    pub fn product_repeat(self, repeat: usize) -> Iterchain<ProductRepeat<Self>>
    where
        I::Item: Clone,
    {
        Iterchain::new(ProductRepeat::new(self, repeat))
    }

    /// Cartesian product with every sequence in `others`, the whole group
    /// repeated `repeat` times.
    ///
    /// Each combination is a `Vec` ordered as `self, others..` per
    /// repetition, with the rightmost position advancing fastest. All inputs
    /// are buffered on the first pull.
    ///
    /// ```rust
    /// use iterchain::iterchain;
    ///
    /// let rows = iterchain(vec![0, 1]).product_all([vec![5]], 2).to_list();
    /// assert_eq!(rows[0], vec![0, 5, 0, 5]);
    /// assert_eq!(rows[1], vec![0, 5, 1, 5]);
    /// assert_eq!(rows.len(), 4);
    /// ```
    pub fn product_all<O>(
        self,
        others: O,
        repeat: usize,
    ) -> Iterchain<ProductAll<Self, <O::Item as IntoIterator>::IntoIter>>
    where
        I::Item: Clone,
        O: IntoIterator,
        O::Item: IntoIterator<Item = I::Item>,
    {
        let others = others.into_iter().map(IntoIterator::into_iter).collect();
        Iterchain::new(ProductAll::new(self, others, repeat))
    }

    /// All `r`-length orderings of the elements.
    ///
    /// Buffers the whole source on the first pull.
    pub fn permutations(self, r: usize) -> Iterchain<Permutations<Self>>
    where
        I::Item: Clone,
    {
        Iterchain::new(Permutations::new(self, r))
    }

    /// All `r`-length subsequences, in source order.
    ///
    /// Buffers the whole source on the first pull.
    pub fn combinations(self, r: usize) -> Iterchain<Combinations<Self>>
    where
        I::Item: Clone,
    {
        Iterchain::new(Combinations::new(self, r))
    }

    /// All `r`-length subsequences allowing individual elements to repeat.
    ///
    /// Buffers the whole source on the first pull.
    pub fn combinations_with_replacement(
        self,
        r: usize,
    ) -> Iterchain<CombinationsWithReplacement<Self>>
    where
        I::Item: Clone,
    {
        Iterchain::new(CombinationsWithReplacement::new(self, r))
    }

    /// Sort the sequence.
    ///
    /// The whole source is buffered on the first pull.
    pub fn sorted(self) -> Iterchain<Sorted<Self, impl FnMut(&I::Item, &I::Item) -> Ordering>>
    where
        I::Item: Ord,
    {
        self.sorted_by(|a, b| a.cmp(b))
    }

    /// Stable sort with a comparator. Buffers the whole source.
    pub fn sorted_by<F>(self, compare: F) -> Iterchain<Sorted<Self, F>>
    where
        F: FnMut(&I::Item, &I::Item) -> Ordering,
    {
        Iterchain::new(Sorted::new(self, compare))
    }

    /// Stable sort by a key. Buffers the whole source.
    pub fn sorted_by_key<K, F>(
        self,
        mut key: F,
    ) -> Iterchain<Sorted<Self, impl FnMut(&I::Item, &I::Item) -> Ordering>>
    where
        K: Ord,
        F: FnMut(&I::Item) -> K,
    {
        self.sorted_by(move |a, b| key(a).cmp(&key(b)))
    }

    /// Reverse a double-ended sequence.
    pub fn rev(self) -> Iterchain<iter::Rev<Self>>
    where
        I: DoubleEndedIterator,
    {
        Iterchain::new(Iterator::rev(self))
    }

    /// Build a lazy stage from any function of the chain.
    ///
    /// The returned iterable is wrapped in a fresh `Iterchain`, so custom
    /// operations written as plain functions or extension traits compose like
    /// the built-in ones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use iterchain::{iterchain, Iterchain};
    ///
    /// fn plus<I: Iterator<Item = i32>>(chain: Iterchain<I>, amount: i32) -> impl Iterator<Item = i32> {
    ///     chain.map(move |x| x + amount)
    /// }
    ///
    /// let items = iterchain(vec![1, 2, 3]).apply(|chain| plus(chain, 1)).to_list();
    /// assert_eq!(items, vec![2, 3, 4]);
    /// ```
    pub fn apply<S, F>(self, f: F) -> Iterchain<S::IntoIter>
    where
        F: FnOnce(Self) -> S,
        S: IntoIterator,
    {
        Iterchain::new(f(self))
    }

    /// Erase the source type.
    pub fn boxed<'a>(self) -> Iterchain<Box<dyn Iterator<Item = I::Item> + 'a>>
    where
        I: 'a,
    {
        Iterchain::new(Box::new(self) as Box<dyn Iterator<Item = I::Item> + 'a>)
    }

    // ---- terminal operations ---------------------------------------------

    /// Left fold. An empty sequence returns `initial` unchanged.
    pub fn reduce<B, F>(self, initial: B, f: F) -> B
    where
        F: FnMut(B, I::Item) -> B,
    {
        Iterator::fold(self, initial, f)
    }

    /// Drain the sequence into a `Vec`.
    pub fn to_list(self) -> Vec<I::Item> {
        Iterator::collect(self)
    }

    /// Drain the sequence for its side effects only.
    pub fn consume(self) {
        Iterator::for_each(self, drop)
    }

    /// Pull the next element. Same as `next`.
    pub fn first(&mut self) -> Option<I::Item> {
        self.next()
    }

    /// Multiply all elements together.
    ///
    /// Named apart from [`Iterchain::product`], which is the cartesian product.
    pub fn product_of<P>(self) -> P
    where
        P: ProductOf<I::Item>,
    {
        Iterator::product(self)
    }

    /// Run an eager custom operation, passing its result through unchanged.
    pub fn finish<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T: 'static> Iterchain<std::vec::IntoIter<T>> {
    /// Wrap a dynamically typed value.
    ///
    /// Fails with [`Error::InvalidSource`] unless `value` holds a `Vec<T>`.
    /// No element is produced before the check.
    pub fn try_from_any(value: Box<dyn std::any::Any>) -> Result<Self> {
        value
            .downcast::<Vec<T>>()
            .map(|items| Iterchain::new(*items))
            .map_err(|_| Error::invalid_source::<Vec<T>>())
    }
}

impl<I: Iterator> Iterator for Iterchain<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.source.as_mut()?.next();
        if item.is_none() {
            self.source = None;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.source {
            Some(source) => source.size_hint(),
            None => (0, Some(0)),
        }
    }
}

impl<I: DoubleEndedIterator> DoubleEndedIterator for Iterchain<I> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.source.as_mut()?.next_back();
        if item.is_none() {
            self.source = None;
        }
        item
    }
}

impl<I: ExactSizeIterator> ExactSizeIterator for Iterchain<I> {}

impl<I: Iterator> FusedIterator for Iterchain<I> {}

impl<I: Iterator> From<I> for Iterchain<I> {
    fn from(source: I) -> Self {
        Iterchain::new(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_map_squares() {
        assert_eq!(iterchain(vec![1, 2, 3]).map(|x| x * x).to_list(), vec![1, 4, 9]);
    }

    #[test]
    fn test_exhaustion_is_permanent() {
        // A source that resumes after reporting None must not leak through.
        let mut calls = 0;
        let mut chain = iterchain(iter::from_fn(move || {
            calls += 1;
            match calls {
                1 => Some(1),
                2 => Some(2),
                3 => None,
                _ => Some(3),
            }
        }));
        assert_eq!(chain.next(), Some(1));
        assert_eq!(chain.next(), Some(2));
        assert_eq!(chain.next(), None);
        assert!(chain.is_exhausted());
        assert_eq!(chain.next(), None);
    }

    #[test]
    fn test_nothing_is_pulled_before_consumption() {
        let pulled = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&pulled);
        let chain = iterchain(1..=5)
            .inspect(move |x| log.borrow_mut().push(*x))
            .map(|x| x * 10)
            .skip(2);
        assert!(pulled.borrow().is_empty());

        assert_eq!(chain.take(1).to_list(), vec![30]);
        assert_eq!(*pulled.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_take_does_not_over_pull() {
        let pulled = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&pulled);
        let items = iterchain(0..)
            .inspect(move |_| *counter.borrow_mut() += 1)
            .take(3)
            .to_list();
        assert_eq!(items, vec![0, 1, 2]);
        assert_eq!(*pulled.borrow(), 3);
    }

    #[test]
    fn test_take_while_never_resumes() {
        let items = iterchain(vec![1, 2, 5, 1, 2]).take_while(|x| *x < 3).to_list();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_skip_while_yields_rest_unconditionally() {
        let items = iterchain(vec![1, 2, 5, 1, 2]).skip_while(|x| *x < 3).to_list();
        assert_eq!(items, vec![5, 1, 2]);
    }

    #[test]
    fn test_skip_past_end_is_empty() {
        assert!(iterchain(vec![1, 2]).skip(5).to_list().is_empty());
    }

    #[test]
    fn test_enumerate_from_start() {
        let items = iterchain(vec!['a', 'b']).enumerate(5).to_list();
        assert_eq!(items, vec![(5, 'a'), (6, 'b')]);
    }

    #[test]
    fn test_flatten_reduces_one_level() {
        let nested = vec![vec![vec![1], vec![2]], vec![vec![3]]];
        let items = iterchain(nested).flatten().to_list();
        assert_eq!(items, vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn test_flat_map_preserves_order() {
        let items = iterchain(1..4).flat_map(|x| iter::repeat(x).take(x)).to_list();
        assert_eq!(items, vec![1, 2, 2, 3, 3, 3]);
    }

    #[test]
    fn test_chain_all_in_argument_order() {
        let items = iterchain(vec![1])
            .chain_all(vec![vec![2, 3], vec![], vec![4]])
            .to_list();
        assert_eq!(items, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_reduce_empty_returns_initial() {
        let total = iterchain(Vec::<i32>::new()).reduce(7, |acc, x| acc + x);
        assert_eq!(total, 7);
        assert_eq!(iterchain(1..=4).reduce(0, |acc, x| acc - x), -10);
    }

    #[test]
    fn test_consume_runs_side_effects() {
        let seen = RefCell::new(Vec::new());
        iterchain(vec![3, 1, 2])
            .inspect(|x| seen.borrow_mut().push(*x))
            .consume();
        assert_eq!(seen.into_inner(), vec![3, 1, 2]);
    }

    #[test]
    fn test_sorted_and_rev() {
        assert_eq!(iterchain(vec![3, 1, 2]).sorted().to_list(), vec![1, 2, 3]);
        assert_eq!(iterchain(vec![1, 2, 3]).rev().to_list(), vec![3, 2, 1]);
        let words = iterchain(vec!["ccc", "a", "bb"]).sorted_by_key(|w| w.len()).to_list();
        assert_eq!(words, vec!["a", "bb", "ccc"]);
    }

    #[test]
    fn test_product_of_and_std_terminals() {
        assert_eq!(iterchain(1..=5).product_of::<i32>(), 120);
        assert_eq!(iterchain(1..=4).sum::<i32>(), 10);
        assert!(iterchain(vec![2, 4]).all(|x| x % 2 == 0));
        assert_eq!(iterchain(vec![5, 9, 1]).max(), Some(9));
        assert_eq!(iterchain(vec![5, 9, 1]).position(|x| x == 1), Some(2));
    }

    #[test]
    fn test_apply_and_finish() {
        let doubled = iterchain(1..4).apply(|chain| chain.map(|x| x * 2)).to_list();
        assert_eq!(doubled, vec![2, 4, 6]);

        let length = iterchain(1..4).finish(|chain| chain.count());
        assert_eq!(length, 3);
    }

    #[test]
    fn test_try_from_any() {
        let chain = Iterchain::<std::vec::IntoIter<i32>>::try_from_any(Box::new(vec![1, 2]));
        assert_eq!(chain.unwrap().to_list(), vec![1, 2]);

        let error = Iterchain::<std::vec::IntoIter<i32>>::try_from_any(Box::new(42_u8)).unwrap_err();
        assert!(matches!(error, Error::InvalidSource { .. }));
    }

    #[test]
    fn test_rewrapping_is_transparent() {
        let inner = iterchain(vec![1, 2, 3]).map(|x| x + 1);
        assert_eq!(iterchain(inner).to_list(), vec![2, 3, 4]);
    }
}
