//! Mutable staging area for batches of updates.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use crate::hasher::Hasher;
use crate::node::Node;
use crate::ops;
use crate::ops::without::RemoveOutcome;
use crate::resolver::Resolver;
use crate::tree::Tree;

/// Mutable handle for building a [`Tree`] with many updates.
///
/// Shares the trie algorithms of [`Tree`], but nodes it owns exclusively are
/// updated in place instead of path-copied. Nodes still shared with a
/// published tree are copied on first write, so [`from_tree`](Self::from_tree)
/// never disturbs the source.
///
/// [`finish`](Self::finish) publishes the current contents and resets the
/// builder to empty.
pub struct Builder<T> {
    root: Arc<Node<T>>,
    count: usize,
    resolver: Resolver<T>,
}

impl<T> Builder<T> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(resolver: Resolver<T>) -> Self {
        Self {
            root: Arc::new(Node::Empty),
            count: 0,
            resolver,
        }
    }

    /// Starts from the contents of `tree`, sharing its nodes until they are
    /// written.
    #[must_use]
    pub fn from_tree(tree: &Tree<T>, resolver: Resolver<T>) -> Self {
        Self {
            root: Arc::clone(tree.root()),
            count: tree.count(),
            resolver,
        }
    }

    /// Returns the number of staged elements.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if nothing is staged.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the resolver used for staged updates.
    #[must_use]
    pub const fn resolver(&self) -> &Resolver<T> {
        &self.resolver
    }

    /// Returns the staged element equal to `value`, if any.
    #[must_use]
    pub fn get(&self, value: &T) -> Option<&T> {
        let equality = self.resolver.equality();
        ops::get::get(&self.root, value, Hasher::new(value, equality, 0), equality)
    }

    /// Returns `true` if an element equal to `value` is staged.
    #[must_use]
    pub fn has(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Publishes the staged contents as a [`Tree`] and empties the builder.
    pub fn finish(&mut self) -> Tree<T> {
        let root = std::mem::replace(&mut self.root, Arc::new(Node::Empty));
        let count = std::mem::take(&mut self.count);
        debug!(count, "builder finished");
        Tree::from_parts(root, count).checked(Some(self.resolver.equality()))
    }
}

impl<T: Clone> Builder<T> {
    /// Stages `value`. Returns `true` if it was new; an equal element is
    /// replaced by `resolve(existing, value)`.
    pub fn add(&mut self, value: T) -> bool {
        let mut hasher = Hasher::new(&value, self.resolver.equality(), 0);
        let outcome = ops::with::insert(&mut self.root, value, &mut hasher, 0, &self.resolver);
        self.count += outcome.added();
        outcome.added() == 1
    }

    /// Removes the staged element equal to `value`. Returns `true` if one
    /// was present.
    pub fn remove(&mut self, value: &T) -> bool {
        let equality = self.resolver.equality();
        let mut hasher = Hasher::new(value, equality, 0);
        if ops::get::get(&self.root, value, hasher, equality).is_none() {
            return false;
        }
        let outcome = ops::without::remove(&mut self.root, value, &mut hasher, equality);
        let removed = outcome == RemoveOutcome::Removed;
        self.count -= usize::from(removed);
        removed
    }
}

impl<T: Clone> Extend<T> for Builder<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T: Hash + Eq + Clone + 'static> Default for Builder<T> {
    fn default() -> Self {
        Self::new(Resolver::standard())
    }
}

impl<T> fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}
