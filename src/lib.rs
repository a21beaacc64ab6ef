//! Persistent hash-trie sets.
//!
//! A [`Tree`] is an immutable set stored as a 16-way hash-array mapped trie.
//! Updates return new trees that share every untouched subtree with the
//! old one; a [`Builder`] applies batches in place where it owns the nodes.
//!
//! # Key properties
//!
//! - **Canonical form**: the same elements always produce the same trie,
//!   whatever order they arrived in
//! - **Structural set algebra**: union, difference, intersection and subset
//!   tests recurse over both tries at once, skipping shared subtrees
//! - **Bounded parallelism**: large operations fan out over the top trie
//!   levels on a [`rayon`] pool sized by [`Config::concurrency`]
//! - **Pluggable identity**: equality, hashing and conflict resolution are
//!   supplied per call through [`Equality`] and [`Resolver`]
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # Example
//!
//! ```
//! use sprig::{Resolver, Tree};
//!
//! let resolver = Resolver::standard();
//! let evens: Tree<u32> = (0..10).filter(|n| n % 2 == 0).collect();
//! let small: Tree<u32> = (0..5).collect();
//!
//! let both = evens.intersection(&small, &resolver);
//! assert_eq!(both.count(), 3);
//! assert!(both.has(&4, resolver.equality()));
//! ```
//!
//! # References
//!
//! - Bagwell, 2001. "Ideal Hash Trees"
//! - Steindorfer & Vinju, 2015. "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod gauge;
pub mod hasher;
pub mod iter;
pub mod replay;
pub mod resolver;

mod builder;
mod node;
mod ops;
mod packer;
mod tree;
mod vet;

#[cfg(test)]
mod tests;

pub use builder::Builder;
pub use config::{Concurrency, Config, config};
pub use error::{Error, Result};
pub use gauge::Gauge;
pub use iter::{Iter, OrderedIter};
pub use replay::{Op, Recorder, ReplayMarker};
pub use resolver::{Equality, Resolver, ResolverBuilder};
pub use tree::Tree;
