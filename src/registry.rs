//! Runtime registry of named chain operations.
//!
//! Static composition through [`Iterchain::apply`] and [`Iterchain::finish`]
//! covers most custom operations. The registry is for plugin-style code that
//! only knows an operation by name: a handler is registered once under a
//! unique name together with its laziness contract, and any chain can later
//! call it by that name.
//!
//! Handlers are typed. A lookup whose element, argument or result types
//! differ from the registered handler's fails with
//! [`Error::SignatureMismatch`] instead of misbehaving.
//!
//! # Examples
//!
//! ```rust
//! use iterchain::prelude::*;
//!
//! let registry = OperationRegistry::new();
//! registry
//!     .register(
//!         "plus",
//!         Operation::lazy(|chain: DynChain<i32>, amount: i32| chain.map(move |x| x + amount)),
//!     )
//!     .unwrap();
//!
//! let items = iterchain(vec![1, 2, 3])
//!     .invoke_in::<i32, i32>(&registry, "plus", 1)
//!     .unwrap()
//!     .to_list();
//! assert_eq!(items, vec![2, 3, 4]);
//!
//! let again = registry.register("plus", Operation::eager(|chain: DynChain<i32>, _: ()| chain.count()));
//! assert!(matches!(again, Err(Error::DuplicateOperation(_))));
//! ```

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::chain::Iterchain;
use crate::error::{Error, Result};

/// A type-erased iterator, as handed to and returned from registered handlers.
pub type BoxedIter<T> = Box<dyn Iterator<Item = T>>;

/// A chain over a type-erased iterator.
pub type DynChain<T> = Iterchain<BoxedIter<T>>;

type LazyHandler<T, A, U> = dyn Fn(DynChain<T>, A) -> BoxedIter<U> + Send + Sync;
type EagerHandler<T, A, R> = dyn Fn(DynChain<T>, A) -> R + Send + Sync;

/// Names of the built-in chain methods, including the std terminals a
/// chain is commonly finished with. Registering any of them fails the same
/// way a second registration would.
pub const BUILTIN_OPERATIONS: &[&str] = &[
    "new",
    "next",
    "is_exhausted",
    "try_from_any",
    "map",
    "filter",
    "filter_map",
    "flat_map",
    "flatten",
    "enumerate",
    "take",
    "slice",
    "step_by",
    "take_while",
    "skip",
    "skip_while",
    "inspect",
    "chain",
    "chain_all",
    "zip",
    "cycle",
    "compress",
    "product",
    "product_repeat",
    "product_all",
    "permutations",
    "combinations",
    "combinations_with_replacement",
    "sorted",
    "sorted_by",
    "sorted_by_key",
    "rev",
    "apply",
    "boxed",
    "reduce",
    "to_list",
    "collect",
    "consume",
    "first",
    "last",
    "nth",
    "all",
    "any",
    "min",
    "max",
    "sum",
    "count",
    "product_of",
    "for_each",
    "partition",
    "find",
    "position",
    "finish",
    "into_stream",
    "invoke",
    "invoke_in",
    "evaluate",
    "evaluate_in",
];

/// Whether an operation yields another chain or a plain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Laziness {
    /// The handler's sequence is wrapped in a fresh chain
    Lazy,
    /// The handler's value is returned unchanged
    Eager,
}

impl fmt::Display for Laziness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Laziness::Lazy => write!(f, "lazy"),
            Laziness::Eager => write!(f, "eager"),
        }
    }
}

/// A handler plus its laziness contract, ready to be registered.
#[derive(Clone)]
pub struct Operation {
    laziness: Laziness,
    signature: &'static str,
    handler: Arc<dyn Any + Send + Sync>,
}

impl Operation {
    /// An operation that returns another sequence.
    ///
    /// The handler receives the chain and the call arguments and may return
    /// any iterable; it is wrapped into a fresh [`Iterchain`] for the caller.
    pub fn lazy<T, A, U, S, F>(handler: F) -> Self
    where
        T: 'static,
        A: 'static,
        U: 'static,
        S: IntoIterator<Item = U>,
        S::IntoIter: 'static,
        F: Fn(DynChain<T>, A) -> S + Send + Sync + 'static,
    {
        let erased: Arc<LazyHandler<T, A, U>> =
            Arc::new(move |chain: DynChain<T>, args: A| -> BoxedIter<U> {
                Box::new(handler(chain, args).into_iter())
            });
        Self {
            laziness: Laziness::Lazy,
            signature: type_name::<fn(DynChain<T>, A) -> DynChain<U>>(),
            handler: Arc::new(erased),
        }
    }

    /// An operation that returns a plain value, passed through unchanged.
    pub fn eager<T, A, R, F>(handler: F) -> Self
    where
        T: 'static,
        A: 'static,
        R: 'static,
        F: Fn(DynChain<T>, A) -> R + Send + Sync + 'static,
    {
        let erased: Arc<EagerHandler<T, A, R>> = Arc::new(handler);
        Self {
            laziness: Laziness::Eager,
            signature: type_name::<fn(DynChain<T>, A) -> R>(),
            handler: Arc::new(erased),
        }
    }

    /// Whether the operation is called through `invoke` or `evaluate`.
    pub fn laziness(&self) -> Laziness {
        self.laziness
    }

    /// Rendered handler signature, for diagnostics.
    pub fn signature(&self) -> &'static str {
        self.signature
    }

    fn downcast<H: ?Sized + 'static>(&self, name: &str) -> Result<Arc<H>> {
        self.handler
            .downcast_ref::<Arc<H>>()
            .cloned()
            .ok_or_else(|| Error::SignatureMismatch {
                name: name.to_string(),
                registered: self.signature,
            })
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("laziness", &self.laziness)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Mapping from operation name to handler.
///
/// Registration is first-wins: a name can be bound once and is never
/// silently replaced.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    operations: DashMap<String, Operation>,
}

impl OperationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `operation`.
    ///
    /// Fails with [`Error::DuplicateOperation`] if the name is taken, either
    /// by an earlier registration or by a built-in chain method. The earlier
    /// binding stays in place.
    pub fn register<S: Into<String>>(&self, name: S, operation: Operation) -> Result<()> {
        let name = name.into();
        if BUILTIN_OPERATIONS.contains(&name.as_str()) {
            #[cfg(feature = "tracing")]
            tracing::warn!(operation = %name, "refused to shadow a built-in operation");
            return Err(Error::duplicate(name));
        }

        match self.operations.entry(name) {
            Entry::Occupied(entry) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(operation = %entry.key(), "operation is already registered");
                Err(Error::duplicate(entry.key().as_str()))
            }
            Entry::Vacant(entry) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    operation = %entry.key(),
                    laziness = %operation.laziness,
                    signature = operation.signature,
                    "registered operation"
                );
                entry.insert(operation);
                Ok(())
            }
        }
    }

    /// Whether `name` has been registered.
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// The laziness contract of `name`, if registered.
    pub fn laziness(&self, name: &str) -> Option<Laziness> {
        self.operations.get(name).map(|operation| operation.laziness)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .operations
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Run the lazy operation `name` on `chain`.
    pub fn invoke<T, A, U>(&self, name: &str, chain: DynChain<T>, args: A) -> Result<DynChain<U>>
    where
        T: 'static,
        A: 'static,
        U: 'static,
    {
        let handler = self
            .lookup(name, Laziness::Lazy)?
            .downcast::<LazyHandler<T, A, U>>(name)?;
        Ok(Iterchain::new(handler(chain, args)))
    }

    /// Run the eager operation `name` on `chain`.
    pub fn evaluate<T, A, R>(&self, name: &str, chain: DynChain<T>, args: A) -> Result<R>
    where
        T: 'static,
        A: 'static,
        R: 'static,
    {
        let handler = self
            .lookup(name, Laziness::Eager)?
            .downcast::<EagerHandler<T, A, R>>(name)?;
        Ok(handler(chain, args))
    }

    // Clones the entry out so no shard lock is held while the handler runs;
    // handlers may themselves use the registry.
    fn lookup(&self, name: &str, requested: Laziness) -> Result<Operation> {
        let operation = self
            .operations
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::unknown(name))?;

        if operation.laziness != requested {
            return Err(Error::LazinessMismatch {
                name: name.to_string(),
                registered: operation.laziness,
                requested,
            });
        }
        Ok(operation)
    }
}

static GLOBAL: Lazy<OperationRegistry> = Lazy::new(OperationRegistry::new);

/// The process-wide registry used by [`Iterchain::invoke`] and
/// [`Iterchain::evaluate`]. Entries live until the process exits.
pub fn global() -> &'static OperationRegistry {
    &GLOBAL
}

/// Register an operation in the process-wide registry.
pub fn register<S: Into<String>>(name: S, operation: Operation) -> Result<()> {
    global().register(name, operation)
}

impl<I> Iterchain<I>
where
    I: Iterator + 'static,
    I::Item: 'static,
{
    /// Call a lazy operation from the global registry by name.
    pub fn invoke<A: 'static, U: 'static>(self, name: &str, args: A) -> Result<DynChain<U>> {
        self.invoke_in(global(), name, args)
    }

    /// Call a lazy operation from `registry` by name.
    pub fn invoke_in<A: 'static, U: 'static>(
        self,
        registry: &OperationRegistry,
        name: &str,
        args: A,
    ) -> Result<DynChain<U>> {
        registry.invoke(name, self.boxed(), args)
    }

    /// Call an eager operation from the global registry by name.
    pub fn evaluate<A: 'static, R: 'static>(self, name: &str, args: A) -> Result<R> {
        self.evaluate_in(global(), name, args)
    }

    /// Call an eager operation from `registry` by name.
    pub fn evaluate_in<A: 'static, R: 'static>(
        self,
        registry: &OperationRegistry,
        name: &str,
        args: A,
    ) -> Result<R> {
        registry.evaluate(name, self.boxed(), args)
    }
}
