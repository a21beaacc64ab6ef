//! Persistent set handle.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::{debug, error};

use crate::builder::Builder;
use crate::config::config;
use crate::error::{Error, Result};
use crate::gauge::Gauge;
use crate::hasher::Hasher;
use crate::iter::{Iter, OrderedIter};
use crate::node::Node;
use crate::ops;
use crate::resolver::{Equality, Resolver};
use crate::vet;

/// Persistent hash-trie set.
///
/// Every operation returns a new tree and leaves the receiver untouched;
/// unchanged subtrees are shared between versions. The same elements always
/// produce the same trie shape, whatever order they were added in.
///
/// Equality, hashing and conflict resolution are supplied per call through
/// an [`Equality`] or [`Resolver`], so one element type can live in trees
/// with different identities (for example keyed `(key, value)` pairs).
pub struct Tree<T> {
    root: Arc<Node<T>>,
    count: usize,
}

// ---------------------------------------------------------------------------
// Construction & accessors, no trait bounds
// ---------------------------------------------------------------------------

impl<T> Tree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Arc::new(Node::Empty), 0)
    }

    pub(crate) const fn from_parts(root: Arc<Node<T>>, count: usize) -> Self {
        Self { root, count }
    }

    pub(crate) const fn root(&self) -> &Arc<Node<T>> {
        &self.root
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if the tree holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if both trees are the same version, sharing one root.
    #[must_use]
    pub fn shares_root(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Iterates over the elements in trie order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }

    /// Returns the `limit` smallest elements under `less`, ascending.
    ///
    /// Pass `usize::MAX` for a full sort.
    #[must_use]
    pub fn ordered_iter<F>(&self, less: F, limit: usize) -> OrderedIter<'_, T>
    where
        F: Fn(&T, &T) -> bool,
    {
        OrderedIter::new(self.iter(), less, limit)
    }

    /// Returns an arbitrary element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the tree is empty.
    pub fn any(&self) -> Result<&T> {
        self.iter().next().ok_or(Error::Empty("any() on an empty tree"))
    }

    /// Returns the element equal to `value`, if present.
    #[must_use]
    pub fn get(&self, value: &T, equality: &Equality<T>) -> Option<&T> {
        ops::get::get(&self.root, value, Hasher::new(value, equality, 0), equality)
    }

    /// Returns `true` if an element equal to `value` is present.
    #[must_use]
    pub fn has(&self, value: &T, equality: &Equality<T>) -> bool {
        self.get(value, equality).is_some()
    }

    /// Checks every structural invariant of the trie and returns the
    /// element count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invariant`] describing the first inconsistent node.
    pub fn vet(&self, equality: &Equality<T>) -> Result<usize> {
        self.vet_with(Some(equality))
    }

    fn vet_with(&self, equality: Option<&Equality<T>>) -> Result<usize> {
        let counted = vet::vet(&self.root, 0, &mut Vec::new(), equality)?;
        if counted != self.count {
            return Err(Error::Invariant {
                depth: 0,
                detail: format!("tree records {} elements but {counted} are reachable", self.count),
            });
        }
        Ok(counted)
    }

    /// Vets a freshly built tree when `SPRIG_VET` is on.
    ///
    /// # Panics
    ///
    /// Panics if the tree is inconsistent: an operation produced a corrupt
    /// trie and carrying on would spread it.
    pub(crate) fn checked(self, equality: Option<&Equality<T>>) -> Self {
        if config().vet
            && let Err(err) = self.vet_with(equality)
        {
            error!(%err, "post-operation check failed");
            panic!("{err}");
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Single-element updates
// ---------------------------------------------------------------------------

impl<T: Clone> Tree<T> {
    /// Returns a tree that also contains `value`.
    ///
    /// If an equal element is present it is replaced by
    /// `resolver.resolve(existing, value)`.
    #[must_use]
    pub fn with(&self, value: T, resolver: &Resolver<T>) -> Self {
        let mut root = Arc::clone(&self.root);
        let mut hasher = Hasher::new(&value, resolver.equality(), 0);
        let outcome = ops::with::insert(&mut root, value, &mut hasher, 0, resolver);
        Self::from_parts(root, self.count + outcome.added()).checked(Some(resolver.equality()))
    }

    /// Returns a tree without the element equal to `value`.
    ///
    /// A missing element yields a tree sharing this one's root.
    #[must_use]
    pub fn without(&self, value: &T, equality: &Equality<T>) -> Self {
        let mut hasher = Hasher::new(value, equality, 0);
        if ops::get::get(&self.root, value, hasher, equality).is_none() {
            return self.clone();
        }
        let mut root = Arc::clone(&self.root);
        ops::without::remove(&mut root, value, &mut hasher, equality);
        Self::from_parts(root, self.count - 1).checked(Some(equality))
    }

    /// Builds a tree from `items`, resolving duplicates with `resolver`.
    pub fn from_iter_with<I>(items: I, resolver: &Resolver<T>) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut builder = Builder::new(resolver.clone());
        builder.extend(items);
        builder.finish()
    }
}

// ---------------------------------------------------------------------------
// Whole-tree operations
// ---------------------------------------------------------------------------

impl<T: Clone + Send + Sync> Tree<T> {
    /// Union. Elements present in both are merged as
    /// `resolver.resolve(from_self, from_other)`.
    #[must_use]
    pub fn combine(&self, other: &Self, resolver: &Resolver<T>) -> Self {
        let gauge = Gauge::for_count(self.count + other.count);
        let (root, matches) =
            gauge.install(|| ops::combine::combine(&self.root, &other.root, 0, resolver, gauge));
        debug!(left = self.count, right = other.count, matches, "combine");
        Self::from_parts(root, self.count + other.count - matches)
            .checked(Some(resolver.equality()))
    }

    /// Alias for [`combine`](Self::combine).
    #[must_use]
    pub fn union(&self, other: &Self, resolver: &Resolver<T>) -> Self {
        self.combine(other, resolver)
    }

    /// Elements of `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self, equality: &Equality<T>) -> Self {
        let gauge = Gauge::for_count(self.count);
        let (root, removed) = gauge.install(|| {
            ops::difference::difference(&self.root, &other.root, 0, equality, gauge)
        });
        debug!(left = self.count, right = other.count, removed, "difference");
        Self::from_parts(root, self.count - removed).checked(Some(equality))
    }

    /// Elements present in both trees, merged as
    /// `resolver.resolve(from_self, from_other)`.
    #[must_use]
    pub fn intersection(&self, other: &Self, resolver: &Resolver<T>) -> Self {
        let gauge = Gauge::for_count(self.count.min(other.count));
        let (root, kept) = gauge.install(|| {
            ops::intersection::intersection(&self.root, &other.root, 0, resolver, gauge)
        });
        debug!(left = self.count, right = other.count, kept, "intersection");
        Self::from_parts(root, kept).checked(Some(resolver.equality()))
    }

    /// Elements in exactly one of the two trees.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self, resolver: &Resolver<T>) -> Self {
        let equality = resolver.equality();
        self.difference(other, equality)
            .combine(&other.difference(self, equality), resolver)
    }

    /// Returns `true` if every element of `self` is in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self, equality: &Equality<T>) -> bool {
        let gauge = Gauge::for_count(self.count);
        gauge.install(|| ops::subset::is_subset(&self.root, &other.root, 0, equality, gauge))
    }

    /// Returns `true` if both trees hold the same elements.
    #[must_use]
    pub fn equal_set(&self, other: &Self, equality: &Equality<T>) -> bool {
        self.count == other.count && self.is_subset_of(other, equality)
    }

    /// Elements satisfying `predicate`.
    #[must_use]
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Sync,
    {
        let gauge = Gauge::for_count(self.count);
        let (root, kept) = gauge.install(|| ops::filter::filter(&self.root, &predicate, 0, gauge));
        Self::from_parts(root, kept).checked(None)
    }

    /// Applies `f` to every element. Results that compare equal under
    /// `resolver` are merged, so the output may be smaller.
    #[must_use]
    pub fn map<U, F>(&self, f: F, resolver: &Resolver<U>) -> Tree<U>
    where
        U: Clone + Send + Sync,
        F: Fn(&T) -> U + Sync,
    {
        let gauge = Gauge::for_count(self.count);
        let (root, count) = gauge.install(|| ops::map::map(&self.root, &f, 0, resolver, gauge));
        Tree::from_parts(root, count).checked(Some(resolver.equality()))
    }

    /// Folds all elements with an associative `f`; `None` when empty.
    #[must_use]
    pub fn reduce<F>(&self, f: F) -> Option<T>
    where
        F: Fn(T, T) -> T + Sync,
    {
        let gauge = Gauge::for_count(self.count);
        gauge.install(|| ops::reduce::reduce(&self.root, &f, 0, gauge))
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<T> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            count: self.count,
        }
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<T: Hash + Eq + Clone + 'static> FromIterator<T> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with(iter, &Resolver::standard())
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
