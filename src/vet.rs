//! Structural consistency checks.
//!
//! Walks a trie and reports the first node that breaks canonical form:
//! misplaced or duplicate elements, a wrong cached count, an empty child,
//! a leaf or twig that should have been split, or a branch that should
//! have collapsed.

use std::fmt;

use crate::error::{Error, Result};
use crate::hasher::{FRAGMENTS_PER_HASH, Hasher, MAX_DEPTH};
use crate::node::{LEAF_CAPACITY, Node};
use crate::resolver::Equality;

/// Checks the subtree at `depth`, reached through the hash fragments in
/// `path`, and returns its element count.
///
/// Without `equality` only the shape is checked: hash placement and
/// distinctness need the element strategies.
pub fn vet<T>(
    node: &Node<T>,
    depth: usize,
    path: &mut Vec<usize>,
    equality: Option<&Equality<T>>,
) -> Result<usize> {
    match node {
        Node::Empty if depth == 0 => Ok(0),
        Node::Empty => Err(violation(node, depth, "empty node below the root")),
        Node::Branch(branch) => {
            if depth >= MAX_DEPTH {
                return Err(violation(node, depth, "branch at maximum depth"));
            }
            if branch.packer.len() != branch.packer.mask().len() {
                return Err(violation(node, depth, "child array disagrees with mask"));
            }
            let mut total = 0;
            for (slot, child) in branch.packer.iter() {
                path.push(slot);
                total += vet(child, depth + 1, path, equality)?;
                path.pop();
            }
            if total != branch.count {
                return Err(violation(
                    node,
                    depth,
                    format_args!("cached count {} but {total} reachable", branch.count),
                ));
            }
            if total <= LEAF_CAPACITY {
                return Err(violation(node, depth, "branch small enough to be a leaf"));
            }
            Ok(total)
        }
        Node::Twig(items) => {
            if depth != MAX_DEPTH {
                return Err(violation(node, depth, "twig above maximum depth"));
            }
            if items.len() <= LEAF_CAPACITY {
                return Err(violation(node, depth, "twig small enough to be a leaf"));
            }
            if let Some(equality) = equality {
                check_members(node, depth, path, equality)?;
                check_collision(node, items, depth, equality)?;
            }
            Ok(items.len())
        }
        leaf => {
            if let Some(equality) = equality {
                check_members(leaf, depth, path, equality)?;
            }
            Ok(leaf.count())
        }
    }
}

/// Every element is distinct and hashes along `path`.
fn check_members<T>(
    node: &Node<T>,
    depth: usize,
    path: &[usize],
    equality: &Equality<T>,
) -> Result<()> {
    let items = node.elements();
    for (i, item) in items.iter().enumerate() {
        if items[..i].iter().any(|other| equality.equal(other, item)) {
            return Err(violation(node, depth, format_args!("duplicate element at index {i}")));
        }
        let mut hasher = Hasher::new(item, equality, 0);
        for (level, &slot) in path.iter().enumerate() {
            let frag = hasher.next_fragment(item);
            if frag != slot {
                return Err(violation(
                    node,
                    depth,
                    format_args!(
                        "element {i} hashes to slot {frag} at level {level}, stored under {slot}"
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Twig members agree on every hash generation.
fn check_collision<T>(
    node: &Node<T>,
    items: &[T],
    depth: usize,
    equality: &Equality<T>,
) -> Result<()> {
    let generations = (MAX_DEPTH / FRAGMENTS_PER_HASH) as u64;
    let Some(first) = items.first() else {
        return Ok(());
    };
    for seed in 0..generations {
        let expected = equality.hash(first, seed);
        if items.iter().any(|item| equality.hash(item, seed) != expected) {
            return Err(violation(
                node,
                depth,
                format_args!("twig members disagree on hash generation {seed}"),
            ));
        }
    }
    Ok(())
}

fn violation<T>(node: &Node<T>, depth: usize, what: impl fmt::Display) -> Error {
    Error::Invariant {
        depth,
        detail: format!("{what}: {node:?}"),
    }
}
