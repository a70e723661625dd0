//! Bridge from a chain to a `futures::Stream`.
//!
//! Pulls stay synchronous: each poll pulls one element from the chain and is
//! immediately ready. This only lets a chain feed code that consumes streams.

use futures::stream::{self, Iter};

use crate::chain::Iterchain;

impl<I: Iterator> Iterchain<I> {
    /// Expose the chain as an always-ready stream.
    pub fn into_stream(self) -> Iter<Self> {
        stream::iter(self)
    }
}
