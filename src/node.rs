//! Trie node variants and canonical construction.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::hasher::{self, FANOUT, MAX_DEPTH};
use crate::packer::Packer;
use crate::resolver::Equality;

/// Most elements a leaf holds before it splits into a branch.
pub const LEAF_CAPACITY: usize = 2;

/// Hash-trie node.
///
/// Canonical form, for a subtree of `n` elements at depth `d`:
/// - [`Empty`](Self::Empty): `n == 0`; only ever a root
/// - [`Leaf1`](Self::Leaf1) / [`Leaf2`](Self::Leaf2): `1 <= n <= LEAF_CAPACITY`
/// - [`Twig`](Self::Twig): `n > LEAF_CAPACITY` and `d == MAX_DEPTH`
/// - [`Branch`](Self::Branch): everything else
///
/// The shape depends only on the contents, never on the order of updates.
#[derive(Clone)]
pub enum Node<T> {
    /// No elements.
    Empty,
    /// A single element.
    Leaf1(T),
    /// Two distinct elements.
    Leaf2([T; 2]),
    /// Overflow bucket for elements whose hashes agree on every fragment.
    ///
    /// Invariant: `len > LEAF_CAPACITY`, members distinct.
    Twig(Vec<T>),
    /// Sparse fan-out node.
    Branch(Branch<T>),
}

/// Branch payload: packed children plus the cached element count.
#[derive(Clone)]
pub struct Branch<T> {
    /// Children by hash fragment.
    pub packer: Packer<T>,
    /// Elements reachable from this branch. Invariant: `> LEAF_CAPACITY`.
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl<T> Node<T> {
    /// Returns the number of elements in this subtree.
    #[inline]
    pub const fn count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Leaf1(_) => 1,
            Self::Leaf2(_) => 2,
            Self::Twig(items) => items.len(),
            Self::Branch(branch) => branch.count,
        }
    }

    /// Returns `true` for [`Node::Empty`].
    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Elements held directly by a leaf or twig; empty for other variants.
    #[inline]
    pub fn elements(&self) -> &[T] {
        match self {
            Self::Leaf1(item) => std::slice::from_ref(item),
            Self::Leaf2(pair) => pair.as_slice(),
            Self::Twig(items) => items.as_slice(),
            Self::Empty | Self::Branch(_) => &[],
        }
    }

    /// Mutable view of the elements held directly by a leaf or twig.
    #[inline]
    pub fn elements_mut(&mut self) -> &mut [T] {
        match self {
            Self::Leaf1(item) => std::slice::from_mut(item),
            Self::Leaf2(pair) => pair.as_mut_slice(),
            Self::Twig(items) => items.as_mut_slice(),
            Self::Empty | Self::Branch(_) => &mut [],
        }
    }

    /// Moves out the elements held directly by a leaf or twig.
    pub fn into_elements(self) -> Vec<T> {
        match self {
            Self::Leaf1(item) => vec![item],
            Self::Leaf2(pair) => Vec::from(pair),
            Self::Twig(items) => items,
            Self::Empty | Self::Branch(_) => Vec::new(),
        }
    }

    /// Index of `value` among this leaf's or twig's elements.
    #[inline]
    pub fn position(&self, value: &T, equality: &Equality<T>) -> Option<usize> {
        self.elements()
            .iter()
            .position(|item| equality.equal(item, value))
    }
}

// ---------------------------------------------------------------------------
// Canonical construction
// ---------------------------------------------------------------------------

impl<T> Node<T> {
    /// Packs a small element list without splitting.
    ///
    /// More than [`LEAF_CAPACITY`] elements yield a twig, which is only
    /// canonical at [`MAX_DEPTH`]; shrinking operations rely on this because
    /// a subset of a leaf or twig stays within the same bound.
    pub fn collapse(mut items: Vec<T>) -> Self {
        match items.len() {
            0 => Self::Empty,
            1 => items.pop().map_or(Self::Empty, Self::Leaf1),
            2 => match <[T; 2]>::try_from(items) {
                Ok(pair) => Self::Leaf2(pair),
                Err(items) => Self::Twig(items),
            },
            _ => Self::Twig(items),
        }
    }

    /// Builds the canonical node for distinct `items` sitting at `depth`.
    ///
    /// Splits by hash fragment while the list exceeds [`LEAF_CAPACITY`];
    /// at [`MAX_DEPTH`] the remainder degrades to a twig.
    pub fn from_elements(items: Vec<T>, depth: usize, equality: &Equality<T>) -> Self {
        if items.len() <= LEAF_CAPACITY {
            return Self::collapse(items);
        }
        if depth >= MAX_DEPTH {
            trace!(len = items.len(), "hash fragments exhausted, degrading to twig");
            return Self::Twig(items);
        }

        let count = items.len();
        let mut buckets: [Vec<T>; FANOUT] = std::array::from_fn(|_| Vec::new());
        for item in items {
            let slot = hasher::fragment_at(&item, equality, depth);
            buckets[slot].push(item);
        }
        let packer = Packer::from_slots(
            buckets
                .into_iter()
                .enumerate()
                .filter(|(_, bucket)| !bucket.is_empty())
                .map(|(slot, bucket)| {
                    (slot, Arc::new(Self::from_elements(bucket, depth + 1, equality)))
                }),
        );
        Self::Branch(Branch { packer, count })
    }
}

impl<T: Clone> Node<T> {
    /// Re-canonicalizes a branch whose children were rebuilt.
    ///
    /// `children` are `(slot, child)` pairs in ascending slot order; empty
    /// children are dropped. A total at or below [`LEAF_CAPACITY`] collapses
    /// into a leaf.
    pub fn rebuild(children: Vec<(usize, Arc<Self>)>) -> Self {
        let count: usize = children.iter().map(|(_, child)| child.count()).sum();
        if count <= LEAF_CAPACITY {
            let mut items = Vec::with_capacity(count);
            for (_, child) in &children {
                child.clone_into_vec(&mut items);
            }
            return Self::collapse(items);
        }
        Self::Branch(Branch {
            packer: Packer::from_slots(children),
            count,
        })
    }

    /// Clones every element of this subtree into `out`.
    pub fn clone_into_vec(&self, out: &mut Vec<T>) {
        match self {
            Self::Branch(branch) => {
                for child in branch.packer.children() {
                    child.clone_into_vec(out);
                }
            }
            other => out.extend_from_slice(other.elements()),
        }
    }
}

// ---------------------------------------------------------------------------
// Structural rendering. Elements are not printed, so no `T: Debug` bound.
// ---------------------------------------------------------------------------

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Leaf1(_) => f.write_str("Leaf1"),
            Self::Leaf2(_) => f.write_str("Leaf2"),
            Self::Twig(items) => f.debug_struct("Twig").field("len", &items.len()).finish(),
            Self::Branch(branch) => f
                .debug_struct("Branch")
                .field("mask", &branch.packer.mask())
                .field("count", &branch.count)
                .field("children", &branch.packer.children().collect::<Vec<_>>())
                .finish(),
        }
    }
}
