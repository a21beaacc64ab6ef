//! Equality and conflict-resolution bundles threaded through every operation.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::hasher;

/// Equality predicate.
pub type EqFn<T> = dyn Fn(&T, &T) -> bool + Send + Sync;

/// Seeded hash function. The seed is the reseed generation (0, 1, ...).
pub type HashFn<T> = dyn Fn(&T, u64) -> u64 + Send + Sync;

/// Conflict resolution: `merge(existing, incoming) -> kept`.
pub type MergeFn<T> = dyn Fn(&T, &T) -> T + Send + Sync;

/// Equality predicate plus seeded hash, used by read and compare paths.
///
/// The hash must be deterministic and consistent with the predicate. Poor
/// hashes are tolerated: elements that collide on every hash generation end
/// up in a twig and are told apart by the predicate alone.
pub struct Equality<T> {
    eq: Arc<EqFn<T>>,
    hash: Arc<HashFn<T>>,
}

impl<T> Equality<T> {
    /// Creates a bundle from an equality predicate and a seeded hash.
    #[must_use]
    pub fn new<E, H>(eq: E, hash: H) -> Self
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
        H: Fn(&T, u64) -> u64 + Send + Sync + 'static,
    {
        Self {
            eq: Arc::new(eq),
            hash: Arc::new(hash),
        }
    }

    /// Returns `true` if `a` and `b` are the same element.
    #[inline]
    #[must_use]
    pub fn equal(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }

    /// Hashes `value` for the given reseed generation.
    #[inline]
    #[must_use]
    pub fn hash(&self, value: &T, seed: u64) -> u64 {
        (self.hash)(value, seed)
    }
}

impl<T: Hash + Eq + 'static> Equality<T> {
    /// `Eq` plus [`hash_one`](hasher::hash_one).
    #[must_use]
    pub fn standard() -> Self {
        Self::new(|a: &T, b: &T| a == b, hasher::hash_one::<T>)
    }
}

impl<T: 'static> Equality<T> {
    /// Compares and hashes elements by a projected key only.
    ///
    /// This is how map-shaped elements (`(key, value)` pairs) are stored.
    #[must_use]
    pub fn keyed<K: Hash + Eq + 'static>(key: fn(&T) -> &K) -> Self {
        Self::new(
            move |a: &T, b: &T| key(a) == key(b),
            move |v: &T, seed| hasher::hash_one(key(v), seed),
        )
    }
}

impl<T> Clone for Equality<T> {
    fn clone(&self) -> Self {
        Self {
            eq: Arc::clone(&self.eq),
            hash: Arc::clone(&self.hash),
        }
    }
}

impl<T> fmt::Debug for Equality<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equality").finish_non_exhaustive()
    }
}

/// Equality, hash and conflict resolution for merge-family operations.
///
/// When two equal elements meet, the kept element is always
/// `merge(left, right)` where `left` comes from the receiver of the
/// top-level call. The recursion commutes its arguments freely and uses the
/// [`flipped`](Self::flipped) counterpart to keep that orientation, so the
/// result does not depend on which side was folded into which or on
/// parallel scheduling order.
pub struct Resolver<T> {
    equality: Equality<T>,
    merge: Arc<MergeFn<T>>,
    flipped: bool,
}

impl<T> Resolver<T> {
    /// Creates a resolver from an equality bundle and a merge function.
    #[must_use]
    pub fn new<M>(equality: Equality<T>, merge: M) -> Self
    where
        M: Fn(&T, &T) -> T + Send + Sync + 'static,
    {
        Self {
            equality,
            merge: Arc::new(merge),
            flipped: false,
        }
    }

    /// Starts a resolver whose strategies are supplied piecemeal.
    #[must_use]
    pub fn builder() -> ResolverBuilder<T> {
        ResolverBuilder::default()
    }

    /// Returns the equality bundle.
    #[must_use]
    pub const fn equality(&self) -> &Equality<T> {
        &self.equality
    }

    /// Merges two equal elements.
    #[inline]
    #[must_use]
    pub fn resolve(&self, existing: &T, incoming: &T) -> T {
        if self.flipped {
            (self.merge)(incoming, existing)
        } else {
            (self.merge)(existing, incoming)
        }
    }

    /// Returns the commuted counterpart: `resolve(a, b)` on the result
    /// equals `resolve(b, a)` on `self`.
    ///
    /// Shares the underlying closures; nothing is re-allocated.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            equality: self.equality.clone(),
            merge: Arc::clone(&self.merge),
            flipped: !self.flipped,
        }
    }

    /// Returns `true` for a commuted counterpart.
    #[must_use]
    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }
}

impl<T: Hash + Eq + Clone + 'static> Resolver<T> {
    /// Standard equality; on conflict the existing element is kept.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Equality::standard(), |existing: &T, _: &T| existing.clone())
    }
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self {
            equality: self.equality.clone(),
            merge: Arc::clone(&self.merge),
            flipped: self.flipped,
        }
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("flipped", &self.flipped)
            .finish_non_exhaustive()
    }
}

/// Piecewise [`Resolver`] construction.
///
/// Rejects element types without an equality or hash strategy at
/// [`build`](Self::build), before any trie is constructed.
pub struct ResolverBuilder<T> {
    eq: Option<Arc<EqFn<T>>>,
    hash: Option<Arc<HashFn<T>>>,
    merge: Option<Arc<MergeFn<T>>>,
}

impl<T> Default for ResolverBuilder<T> {
    fn default() -> Self {
        Self {
            eq: None,
            hash: None,
            merge: None,
        }
    }
}

impl<T> ResolverBuilder<T> {
    /// Sets the equality predicate.
    #[must_use]
    pub fn equality<E>(mut self, eq: E) -> Self
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.eq = Some(Arc::new(eq));
        self
    }

    /// Sets the seeded hash function.
    #[must_use]
    pub fn hash<H>(mut self, hash: H) -> Self
    where
        H: Fn(&T, u64) -> u64 + Send + Sync + 'static,
    {
        self.hash = Some(Arc::new(hash));
        self
    }

    /// Sets the conflict-resolution function.
    #[must_use]
    pub fn merge<M>(mut self, merge: M) -> Self
    where
        M: Fn(&T, &T) -> T + Send + Sync + 'static,
    {
        self.merge = Some(Arc::new(merge));
        self
    }
}

impl<T: Clone + 'static> ResolverBuilder<T> {
    /// Finishes the resolver. Without a merge function the existing element
    /// wins conflicts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedKey`] if no equality predicate or no hash
    /// function was supplied.
    pub fn build(self) -> Result<Resolver<T>> {
        let eq = self
            .eq
            .ok_or(Error::UnsupportedKey("no equality predicate supplied"))?;
        let hash = self
            .hash
            .ok_or(Error::UnsupportedKey("no hash function supplied"))?;
        let merge: Arc<MergeFn<T>> = match self.merge {
            Some(merge) => merge,
            None => Arc::new(|existing: &T, _: &T| existing.clone()),
        };
        Ok(Resolver {
            equality: Equality { eq, hash },
            merge,
            flipped: false,
        })
    }
}
