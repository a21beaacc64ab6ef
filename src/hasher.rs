//! Hash derivation and per-level fragment supply.
//!
//! A key is hashed once per generation. Each trie level consumes one
//! [`FANOUT_BITS`]-wide fragment; when a generation's 64 bits are spent the
//! hasher reseeds by re-hashing `(key, seed + 1)`. Two generations are used,
//! after which colliding keys share a twig and are told apart by equality.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher as _};

use crate::resolver::Equality;

/// Hash bits consumed per trie level (4 → 16-way branching).
pub const FANOUT_BITS: u32 = 4;

/// Child slots per branch.
pub const FANOUT: usize = 1 << FANOUT_BITS;

/// Fragments supplied by one 64-bit hash generation.
pub const FRAGMENTS_PER_HASH: usize = (u64::BITS / FANOUT_BITS) as usize;

/// Deepest trie level. Nodes here are leaves or twigs, never branches.
pub const MAX_DEPTH: usize = 2 * FRAGMENTS_PER_HASH;

const FRAGMENT_MASK: u64 = (1 << FANOUT_BITS) - 1;

/// Computes the seeded 64-bit hash of a value using the standard hasher.
#[must_use]
pub fn hash_one<T: Hash + ?Sized>(value: &T, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    value.hash(&mut hasher);
    hasher.finish()
}

/// Fragment cursor for one key.
///
/// The key itself is passed to [`next_fragment`](Self::next_fragment)
/// rather than stored, so a hasher can travel alongside an element that is
/// being moved into the trie.
pub struct Hasher<'a, T> {
    equality: &'a Equality<T>,
    bits: u64,
    seed: u64,
    used: usize,
}

impl<'a, T> Hasher<'a, T> {
    /// Hashes `key` and positions the cursor at `depth`.
    ///
    /// `Hasher::new(k, eq, d)` yields the same fragments as a depth-0 hasher
    /// advanced `d` times.
    #[must_use]
    pub fn new(key: &T, equality: &'a Equality<T>, depth: usize) -> Self {
        let seed = (depth / FRAGMENTS_PER_HASH) as u64;
        let used = depth % FRAGMENTS_PER_HASH;
        let bits = equality.hash(key, seed) >> (used as u32 * FANOUT_BITS);
        Self {
            equality,
            bits,
            seed,
            used,
        }
    }

    /// Returns the fragment for the current depth and advances one level.
    #[inline]
    pub fn next_fragment(&mut self, key: &T) -> usize {
        if self.used == FRAGMENTS_PER_HASH {
            self.seed += 1;
            self.bits = self.equality.hash(key, self.seed);
            self.used = 0;
        }
        let frag = (self.bits & FRAGMENT_MASK) as usize;
        self.bits >>= FANOUT_BITS;
        self.used += 1;
        frag
    }

    /// Depth of the next fragment to be returned.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.seed as usize * FRAGMENTS_PER_HASH + self.used
    }
}

/// Returns the fragment of `key` at `depth`.
#[inline]
#[must_use]
pub fn fragment_at<T>(key: &T, equality: &Equality<T>, depth: usize) -> usize {
    Hasher::new(key, equality, depth).next_fragment(key)
}

// Manual impls avoid a false `T: Clone` bound.

impl<T> Clone for Hasher<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Hasher<'_, T> {}

impl<T> fmt::Debug for Hasher<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("depth", &self.depth())
            .field("bits", &format_args!("{:#018x}", self.bits))
            .finish_non_exhaustive()
    }
}
