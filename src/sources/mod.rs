//! Generators that start a chain without an existing collection.
//!
//! `count` is the only fallible one: its parameters are validated when the
//! generator is built, never at the first pull.

use std::fmt::Debug;
use std::ops::Range;

use num_traits::Num;

use crate::chain::Iterchain;
use crate::error::{Error, Result};

/// Numbers [`count`] can step through.
///
/// Integer steps that would leave the type's range end the sequence instead
/// of overflowing.
pub trait Step: Num + PartialOrd + Copy + Debug {
    /// `self + step`, or `None` when the sum is not representable.
    fn checked_step(self, step: Self) -> Option<Self>;
}

macro_rules! step_integers {
    ($($t:ty),*) => {
        $(impl Step for $t {
            fn checked_step(self, step: Self) -> Option<Self> {
                self.checked_add(step)
            }
        })*
    };
}

step_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Step for f32 {
    fn checked_step(self, step: Self) -> Option<Self> {
        Some(self + step)
    }
}

impl Step for f64 {
    fn checked_step(self, step: Self) -> Option<Self> {
        Some(self + step)
    }
}

/// Parameters for [`count`], with the usual defaults (`start = 0`,
/// unbounded, `step = 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountConfig<N> {
    /// First value produced
    pub start: N,
    /// Exclusive bound, or `None` for an unbounded sequence
    pub stop: Option<N>,
    /// Distance between consecutive values, never zero
    pub step: N,
}

impl<N: Num> Default for CountConfig<N> {
    fn default() -> Self {
        Self {
            start: N::zero(),
            stop: None,
            step: N::one(),
        }
    }
}

impl<N: Step> CountConfig<N> {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first value
    pub fn start(mut self, start: N) -> Self {
        self.start = start;
        self
    }

    /// Set the exclusive bound
    pub fn stop(mut self, stop: N) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Set the step
    pub fn step(mut self, step: N) -> Self {
        self.step = step;
        self
    }

    /// Check that the step is non-zero and the stop lies in its direction.
    pub fn validate(&self) -> Result<()> {
        let zero = N::zero();
        if self.step == zero {
            return Err(self.reject("step must not be zero"));
        }
        if !(self.step > zero || self.step < zero) {
            return Err(self.reject("step must be ordered against zero"));
        }
        if self.start.partial_cmp(&self.start).is_none() {
            return Err(self.reject("start must be a comparable number"));
        }
        if let Some(stop) = self.stop {
            let reachable = (self.step > zero && stop >= self.start)
                || (self.step < zero && stop <= self.start);
            if !reachable {
                return Err(self.reject("stop is unreachable from start in the direction of step"));
            }
        }
        Ok(())
    }

    /// Validate and build the generator.
    pub fn build(self) -> Result<Iterchain<Count<N>>> {
        self.validate()?;
        Ok(Iterchain::new(Count {
            next: Some(self.start),
            stop: self.stop,
            step: self.step,
        }))
    }

    fn reject(&self, reason: &'static str) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            start = ?self.start,
            stop = ?self.stop,
            step = ?self.step,
            reason,
            "rejected count parameters"
        );
        Error::invalid_generator(self.start, self.stop, self.step, reason)
    }
}

/// Evenly spaced values from `start`, stepping by `step`, until `stop`.
///
/// Fails with [`Error::InvalidGeneratorParameters`] if `step` is zero or
/// `stop` lies on the wrong side of `start`, or if a float parameter is NaN.
/// Without a `stop` the sequence is unbounded; an integer sequence ends at
/// the last value its type can represent.
///
/// # Examples
///
/// ```rust
/// use iterchain::count;
///
/// let values = count(2, Some(-2), -1).unwrap().to_list();
/// assert_eq!(values, vec![2, 1, 0, -1]);
///
/// assert!(count(0, None, 0).is_err());
/// assert!(count(0, Some(10), -1).is_err());
/// ```
pub fn count<N: Step>(start: N, stop: Option<N>, step: N) -> Result<Iterchain<Count<N>>> {
    CountConfig { start, stop, step }.build()
}

/// Generator behind [`count`].
#[derive(Debug, Clone)]
pub struct Count<N> {
    next: Option<N>,
    stop: Option<N>,
    step: N,
}

impl<N: Step> Iterator for Count<N> {
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if let Some(stop) = self.stop {
            let zero = N::zero();
            let reached =
                (self.step > zero && current >= stop) || (self.step < zero && current <= stop);
            if reached {
                self.next = None;
                return None;
            }
        }
        self.next = current.checked_step(self.step);
        Some(current)
    }
}

/// Wrap a half-open range.
pub fn range<N>(range: Range<N>) -> Iterchain<Range<N>>
where
    Range<N>: Iterator<Item = N>,
{
    Iterchain::new(range)
}

/// A generator that repeats a single value
#[derive(Debug, Clone)]
pub struct Repeat<T> {
    value: T,
    remaining: Option<usize>,
}

impl<T: Clone> Iterator for Repeat<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(ref mut remaining) = self.remaining {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        Some(self.value.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(remaining) => (remaining, Some(remaining)),
            None => (usize::MAX, None),
        }
    }
}

/// Repeat `value` indefinitely.
pub fn repeat<T: Clone>(value: T) -> Iterchain<Repeat<T>> {
    Iterchain::new(Repeat {
        value,
        remaining: None,
    })
}

/// Repeat `value` exactly `times` times.
pub fn repeat_n<T: Clone>(value: T, times: usize) -> Iterchain<Repeat<T>> {
    Iterchain::new(Repeat {
        value,
        remaining: Some(times),
    })
}

/// Each element is computed from the previous one until `next` returns `None`.
pub fn successors<T, F>(first: Option<T>, next: F) -> Iterchain<std::iter::Successors<T, F>>
where
    F: FnMut(&T) -> Option<T>,
{
    Iterchain::new(std::iter::successors(first, next))
}

/// Pull elements from a closure until it returns `None`.
pub fn from_fn<T, F>(f: F) -> Iterchain<std::iter::FromFn<F>>
where
    F: FnMut() -> Option<T>,
{
    Iterchain::new(std::iter::from_fn(f))
}

/// A single element.
pub fn once<T>(value: T) -> Iterchain<std::iter::Once<T>> {
    Iterchain::new(std::iter::once(value))
}

/// No elements at all.
pub fn empty<T>() -> Iterchain<std::iter::Empty<T>> {
    Iterchain::new(std::iter::empty())
}
