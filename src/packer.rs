//! Slot bitmask and densely packed child array.

use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::sync::Arc;

use rayon::prelude::*;

use crate::hasher::FANOUT;
use crate::node::Node;

/// Occupied child slots of a branch, one bit per slot in `0..FANOUT`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Mask(u16);

impl Mask {
    /// No slots occupied.
    pub const EMPTY: Self = Self(0);

    /// Returns `true` if `slot` is occupied.
    #[inline]
    #[must_use]
    pub const fn contains(self, slot: usize) -> bool {
        self.0 & (1 << slot) != 0
    }

    /// Returns the mask with `slot` occupied.
    #[inline]
    #[must_use]
    pub const fn with(self, slot: usize) -> Self {
        Self(self.0 | (1 << slot))
    }

    /// Returns the mask with `slot` cleared.
    #[inline]
    #[must_use]
    pub const fn without(self, slot: usize) -> Self {
        Self(self.0 & !(1 << slot))
    }

    /// Number of occupied slots.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Position of `slot` in the packed array: the number of occupied slots
    /// below it.
    #[inline]
    #[must_use]
    pub const fn offset(self, slot: usize) -> usize {
        (self.0 & ((1 << slot) - 1)).count_ones() as usize
    }

    /// Returns `true` if every slot of `self` is also in `other`.
    #[inline]
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterates occupied slots in ascending order.
    #[must_use]
    pub const fn slots(self) -> Slots {
        Slots(self.0)
    }
}

impl BitOr for Mask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Mask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018b}", self.0)
    }
}

/// Ascending iterator over the occupied slots of a [`Mask`].
#[derive(Clone, Debug)]
pub struct Slots(u16);

impl Iterator for Slots {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let slot = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Slots {}

/// Children of a branch: only occupied slots are stored.
///
/// Invariant: `children.len() == mask.len()`, and no child is
/// [`Node::Empty`].
pub struct Packer<T> {
    mask: Mask,
    children: Vec<Arc<Node<T>>>,
}

impl<T> Packer<T> {
    /// Creates a packer with no children.
    pub const fn new() -> Self {
        Self {
            mask: Mask::EMPTY,
            children: Vec::new(),
        }
    }

    /// Builds a packer from `(slot, child)` pairs in ascending slot order.
    /// Empty children are dropped.
    pub fn from_slots<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, Arc<Node<T>>)>,
    {
        let mut packer = Self::new();
        for (slot, child) in pairs {
            if !child.is_empty() {
                debug_assert!(!packer.mask.contains(slot) && slot < FANOUT);
                packer.mask = packer.mask.with(slot);
                packer.children.push(child);
            }
        }
        packer
    }

    /// Occupied slots.
    pub const fn mask(&self) -> Mask {
        self.mask
    }

    /// Number of children.
    pub const fn len(&self) -> usize {
        self.children.len()
    }

    /// Child in `slot`, `None` for an empty slot.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<&Arc<Node<T>>> {
        if self.mask.contains(slot) {
            Some(&self.children[self.mask.offset(slot)])
        } else {
            None
        }
    }

    /// Mutable child in `slot`, `None` for an empty slot.
    #[inline]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Arc<Node<T>>> {
        if self.mask.contains(slot) {
            Some(&mut self.children[self.mask.offset(slot)])
        } else {
            None
        }
    }

    /// Mutable handle to the child in `slot`.
    ///
    /// An empty slot is first filled with an [`Node::Empty`] placeholder;
    /// the caller must store a non-empty node there or
    /// [`clear`](Self::clear) the slot again.
    pub fn entry(&mut self, slot: usize) -> &mut Arc<Node<T>> {
        let pos = self.mask.offset(slot);
        if !self.mask.contains(slot) {
            self.mask = self.mask.with(slot);
            self.children.insert(pos, Arc::new(Node::Empty));
        }
        &mut self.children[pos]
    }

    /// Empties `slot`.
    pub fn clear(&mut self, slot: usize) {
        if self.mask.contains(slot) {
            self.children.remove(self.mask.offset(slot));
            self.mask = self.mask.without(slot);
        }
    }

    /// Iterates `(slot, child)` pairs in ascending slot order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, &Arc<Node<T>>)> {
        self.mask.slots().zip(self.children.iter())
    }

    /// Iterates children in ascending slot order.
    pub fn children(&self) -> std::slice::Iter<'_, Arc<Node<T>>> {
        self.children.iter()
    }
}

impl<T> Clone for Packer<T> {
    fn clone(&self) -> Self {
        Self {
            mask: self.mask,
            children: self.children.clone(),
        }
    }
}

/// Applies `f` to every slot of `mask`, in parallel when `parallel` is set.
///
/// Output is in ascending slot order either way.
pub fn fan_out<R, F>(mask: Mask, parallel: bool, f: F) -> Vec<(usize, R)>
where
    R: Send,
    F: Fn(usize) -> R + Sync + Send,
{
    if parallel {
        let slots: Vec<usize> = mask.slots().collect();
        slots.into_par_iter().map(|slot| (slot, f(slot))).collect()
    } else {
        mask.slots().map(|slot| (slot, f(slot))).collect()
    }
}

/// Returns `true` if `f` holds for every slot of `mask`. Stops at the first
/// failure.
pub fn fan_all<F>(mask: Mask, parallel: bool, f: F) -> bool
where
    F: Fn(usize) -> bool + Sync + Send,
{
    if parallel {
        let slots: Vec<usize> = mask.slots().collect();
        slots.into_par_iter().all(f)
    } else {
        mask.slots().all(f)
    }
}
