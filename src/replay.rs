//! Recorded operation logs for reproducing and minimizing failures.
//!
//! A [`Recorder`] keeps every applied [`Op`] in an append-only arena, tagged
//! with the call site that issued it. Replaying the log against both a
//! persistent [`Tree`] and a [`Builder`] and vetting each step finds the
//! first operation where the trie went wrong;
//! [`minimize`](Recorder::minimize) then rolls the arena back to just past
//! that operation.

use std::fmt;
use std::panic::Location;

use safe_bump::{Checkpoint, Idx, SharedArena};
use tracing::{trace, warn};

use crate::builder::Builder;
use crate::config::config;
use crate::error::{Error, Result};
use crate::resolver::{Equality, Resolver};
use crate::tree::Tree;

/// One recorded tree operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op<T> {
    /// [`Tree::with`].
    With(T),
    /// [`Tree::without`].
    Without(T),
    /// [`Tree::combine`] with a tree built from the elements.
    Combine(Vec<T>),
    /// [`Tree::difference`] with a tree built from the elements.
    Difference(Vec<T>),
    /// [`Tree::intersection`] with a tree built from the elements.
    Intersection(Vec<T>),
}

impl<T> Op<T> {
    /// Elements the operation touches.
    #[must_use]
    pub fn elements(&self) -> &[T] {
        match self {
            Self::With(value) | Self::Without(value) => std::slice::from_ref(value),
            Self::Combine(items) | Self::Difference(items) | Self::Intersection(items) => items,
        }
    }

    /// Short operation name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::With(_) => "with",
            Self::Without(_) => "without",
            Self::Combine(_) => "combine",
            Self::Difference(_) => "difference",
            Self::Intersection(_) => "intersection",
        }
    }
}

impl<T: Clone + Send + Sync> Op<T> {
    /// Applies the operation to `tree` through the persistent API.
    #[must_use]
    pub fn apply(&self, tree: &Tree<T>, resolver: &Resolver<T>) -> Tree<T> {
        match self {
            Self::With(value) => tree.with(value.clone(), resolver),
            Self::Without(value) => tree.without(value, resolver.equality()),
            Self::Combine(items) => tree.combine(&operand(items, resolver), resolver),
            Self::Difference(items) => {
                tree.difference(&operand(items, resolver), resolver.equality())
            }
            Self::Intersection(items) => tree.intersection(&operand(items, resolver), resolver),
        }
    }

    /// Applies the operation to `builder` through the in-place API only.
    pub fn stage(&self, builder: &mut Builder<T>) {
        match self {
            Self::With(value) => {
                builder.add(value.clone());
            }
            Self::Without(value) => {
                builder.remove(value);
            }
            Self::Combine(items) => builder.extend(items.iter().cloned()),
            Self::Difference(items) => {
                for item in items {
                    builder.remove(item);
                }
            }
            Self::Intersection(items) => {
                let resolver = builder.resolver().clone();
                let mut kept = Builder::new(resolver.clone());
                for item in items {
                    if let Some(existing) = builder.get(item) {
                        kept.add(resolver.resolve(existing, item));
                    }
                }
                *builder = kept;
            }
        }
    }
}

fn operand<T: Clone>(items: &[T], resolver: &Resolver<T>) -> Tree<T> {
    Tree::from_iter_with(items.iter().cloned(), resolver)
}

/// Where a replay went wrong.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayMarker {
    /// Position of the operation in the log.
    pub index: usize,
    /// Call site that recorded the operation.
    pub location: &'static Location<'static>,
    /// Rendered operation.
    pub signature: String,
}

impl fmt::Display for ReplayMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operation #{} `{}` recorded at {}",
            self.index, self.signature, self.location
        )
    }
}

struct Record<T> {
    op: Idx<Op<T>>,
    before: Checkpoint<Op<T>>,
    location: &'static Location<'static>,
}

/// Append-only log of tree operations.
///
/// Disabled recorders accept calls and store nothing, so call sites need no
/// conditionals. [`Recorder::new`] follows `SPRIG_REPLAY`.
pub struct Recorder<T> {
    ops: SharedArena<Op<T>>,
    log: Vec<Record<T>>,
    enabled: bool,
}

impl<T> Recorder<T> {
    /// Creates a recorder that is enabled when `SPRIG_REPLAY` is set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_enabled(config().replay)
    }

    /// Creates a recorder that always records.
    #[must_use]
    pub fn enabled() -> Self {
        Self::with_enabled(true)
    }

    fn with_enabled(enabled: bool) -> Self {
        Self {
            ops: SharedArena::new(),
            log: Vec::new(),
            enabled,
        }
    }

    /// Returns `true` if operations are being stored.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Appends `op`, tagged with the caller's location. Returns its index,
    /// or `None` when recording is off.
    #[track_caller]
    pub fn record(&mut self, op: Op<T>) -> Option<usize> {
        if !self.enabled {
            return None;
        }
        let before = self.ops.checkpoint();
        let op = self.ops.alloc(op);
        self.log.push(Record {
            op,
            before,
            location: Location::caller(),
        });
        Some(self.log.len() - 1)
    }

    /// Returns the operation at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Op<T>> {
        self.log.get(index).map(|record| self.ops.get(record.op))
    }

    /// Iterates the recorded operations in order.
    pub fn iter(&self) -> impl Iterator<Item = &Op<T>> {
        self.log.iter().map(|record| self.ops.get(record.op))
    }

    /// Drops every operation from `len` on, releasing their arena space.
    pub fn truncate(&mut self, len: usize) {
        if let Some(record) = self.log.get(len) {
            self.ops.rollback(record.before);
            self.log.truncate(len);
        }
    }
}

impl<T: Clone + Send + Sync> Recorder<T> {
    /// Applies `op` to `tree` and records it.
    #[track_caller]
    pub fn apply(&mut self, tree: &Tree<T>, op: Op<T>, resolver: &Resolver<T>) -> Tree<T> {
        let next = op.apply(tree, resolver);
        self.record(op);
        next
    }

    /// Rebuilds the tree produced by the first `len` operations.
    #[must_use]
    pub fn replay_to(&self, len: usize, resolver: &Resolver<T>) -> Tree<T> {
        self.iter()
            .take(len)
            .fold(Tree::new(), |tree, op| op.apply(&tree, resolver))
    }
}

impl<T: Clone + Send + Sync + fmt::Debug> Recorder<T> {
    /// Replays the log and returns the first operation after which the
    /// trie fails a check.
    ///
    /// Each step is vetted, compared against a [`Builder`] fed the same
    /// operations, and then handed to `check` with its index.
    pub fn first_divergence<C>(&self, resolver: &Resolver<T>, mut check: C) -> Option<ReplayMarker>
    where
        C: FnMut(usize, &Tree<T>) -> Result<()>,
    {
        let equality = resolver.equality();
        let mut tree = Tree::new();
        let mut builder = Builder::new(resolver.clone());
        for (index, record) in self.log.iter().enumerate() {
            let op = self.ops.get(record.op);
            trace!(index, ?op, "replaying");
            tree = op.apply(&tree, resolver);
            op.stage(&mut builder);
            let verdict = agree(op, &tree, &builder, equality).and_then(|()| check(index, &tree));
            if let Err(err) = verdict {
                let marker = ReplayMarker {
                    index,
                    location: record.location,
                    signature: format!("{op:?}"),
                };
                warn!(%marker, %err, "replay diverged");
                return Some(marker);
            }
        }
        None
    }

    /// Finds the first divergence and drops every later operation.
    pub fn minimize<C>(&mut self, resolver: &Resolver<T>, check: C) -> Option<ReplayMarker>
    where
        C: FnMut(usize, &Tree<T>) -> Result<()>,
    {
        let marker = self.first_divergence(resolver, check)?;
        self.truncate(marker.index + 1);
        Some(marker)
    }
}

/// The persistent and staged views of one replay step agree.
fn agree<T: fmt::Debug>(
    op: &Op<T>,
    tree: &Tree<T>,
    builder: &Builder<T>,
    equality: &Equality<T>,
) -> Result<()> {
    tree.vet(equality)?;
    if builder.count() != tree.count() {
        return Err(Error::Invariant {
            depth: 0,
            detail: format!(
                "builder stages {} elements, tree holds {}",
                builder.count(),
                tree.count()
            ),
        });
    }
    for item in op.elements() {
        if builder.has(item) != tree.has(item, equality) {
            return Err(Error::Invariant {
                depth: 0,
                detail: format!("builder and tree disagree on {item:?} after {}", op.name()),
            });
        }
    }
    Ok(())
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Recorder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("enabled", &self.enabled)
            .field("len", &self.log.len())
            .finish_non_exhaustive()
    }
}
