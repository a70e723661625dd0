//! Error types for chain construction and operation registration.
//!
//! Exhaustion of a sequence is never an error: pulls report it as `None`.
//! Everything in this module is raised at construction or registration time,
//! before any element flows.

use std::fmt;

use thiserror::Error;

use crate::registry::Laziness;

/// The main error type for the iterchain library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A dynamically supplied value cannot be turned into a pull source
    #[error("invalid source: expected a value of type `{expected}`")]
    InvalidSource { expected: &'static str },

    /// `count` was given a zero step or a stop it can never reach
    #[error("invalid generator parameters (start: {start}, stop: {stop}, step: {step}): {reason}")]
    InvalidGeneratorParameters {
        start: String,
        stop: String,
        step: String,
        reason: &'static str,
    },

    /// An operation with this name already exists
    #[error("operation `{0}` is already registered")]
    DuplicateOperation(String),

    /// No operation with this name has been registered
    #[error("no operation named `{0}` is registered")]
    UnknownOperation(String),

    /// The operation was registered with the other laziness contract
    #[error("operation `{name}` is registered as {registered} but was called as {requested}")]
    LazinessMismatch {
        name: String,
        registered: Laziness,
        requested: Laziness,
    },

    /// Element, argument or result types differ from the registered handler's
    #[error("operation `{name}` was registered with signature `{registered}`")]
    SignatureMismatch {
        name: String,
        registered: &'static str,
    },
}

// Convenience constructors
impl Error {
    /// Create an invalid source error naming the expected type
    pub fn invalid_source<T: ?Sized>() -> Self {
        Error::InvalidSource {
            expected: std::any::type_name::<T>(),
        }
    }

    /// Create a generator parameter error
    pub fn invalid_generator<N: fmt::Debug>(
        start: N,
        stop: Option<N>,
        step: N,
        reason: &'static str,
    ) -> Self {
        Error::InvalidGeneratorParameters {
            start: format!("{:?}", start),
            stop: match stop {
                Some(stop) => format!("{:?}", stop),
                None => "unbounded".to_string(),
            },
            step: format!("{:?}", step),
            reason,
        }
    }

    /// Create a duplicate operation error
    pub fn duplicate<S: Into<String>>(name: S) -> Self {
        Error::DuplicateOperation(name.into())
    }

    /// Create an unknown operation error
    pub fn unknown<S: Into<String>>(name: S) -> Self {
        Error::UnknownOperation(name.into())
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;
