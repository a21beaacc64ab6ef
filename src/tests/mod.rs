mod basic;
mod builder;
mod collision;
mod config;
mod gauge;
mod persistence;

use crate::{Resolver, Tree};

/// Tree of `items` under the standard resolver.
fn tree_of<I: IntoIterator<Item = u32>>(items: I) -> Tree<u32> {
    Tree::from_iter_with(items, &Resolver::standard())
}

/// Elements of `tree`, sorted.
fn sorted(tree: &Tree<u32>) -> Vec<u32> {
    let mut items: Vec<u32> = tree.iter().copied().collect();
    items.sort_unstable();
    items
}

/// Structural rendering of the trie behind `tree`.
fn shape<T>(tree: &Tree<T>) -> String {
    format!("{:?}", tree.root())
}
