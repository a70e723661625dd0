//! # Lazy, chainable iterator pipelines
//!
//! This crate wraps any iterable in an [`Iterchain`], a pull source that
//! exposes composable transformations, generators and reductions. Every
//! transformation builds a new stage and defers all work until a terminal
//! operation pulls from it.
//!
//! ## Core Concepts
//!
//! - **Iterchain**: owns exactly one pull source and is itself a pull source
//! - **Transformations**: `map`, `filter`, `flat_map`, `take`, `skip`,
//!   `chain`, `cycle`, `product`, ... each consume a chain and return a new one
//! - **Terminal operations**: `reduce`, `to_list`, `collect`, `consume`, ...
//!   drain some or all of a chain and return a plain value
//! - **Generators**: `count`, `range`, `repeat`, ... start a chain from scratch
//! - **Operation registry**: named operations added at runtime, with a
//!   declared laziness contract and first-wins registration
//!
//! Exhaustion is never an error. Once a chain reports `None` it keeps
//! reporting `None`.
//!
//! ## Example
//!
//! ```rust
//! use iterchain::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let evens = count(0, None, 1)?
//!         .filter(|x| x % 2 == 0)
//!         .map(|x| x * x)
//!         .take(4)
//!         .to_list();
//!     assert_eq!(evens, vec![0, 4, 16, 36]);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod chain;
pub mod error;
pub mod registry;
pub mod sources;

#[cfg(feature = "stream")]
pub mod stream;

// Re-export commonly used items
pub mod prelude {
    pub use crate::adapters::Truthy;
    pub use crate::chain::{iterchain, Iterchain};
    pub use crate::error::{Error, Result};
    pub use crate::registry::{DynChain, Laziness, Operation, OperationRegistry};
    pub use crate::sources::{
        count, empty, from_fn, once, range, repeat, repeat_n, successors, CountConfig, Step,
    };
}

pub use chain::{iterchain, Iterchain};
pub use error::{Error, Result};
pub use sources::{count, range, repeat, repeat_n};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
