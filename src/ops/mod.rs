//! Recursive trie algorithms.
//!
//! Every function here works on a subtree at a given depth and returns the
//! rebuilt subtree together with the element count it needs to report
//! upward. Nothing below this module knows about [`Tree`](crate::Tree).

pub mod combine;
pub mod difference;
pub mod filter;
pub mod get;
pub mod intersection;
pub mod map;
pub mod reduce;
pub mod subset;
pub mod with;
pub mod without;

use std::sync::Arc;

use crate::node::Node;

/// A rebuilt subtree plus the count its caller folds into the parent.
pub type Rebuilt<T> = (Arc<Node<T>>, usize);

/// Splits fan-out results into `(slot, child)` pairs and the summed counts.
pub fn unzip_slots<T>(results: Vec<(usize, Rebuilt<T>)>) -> (Vec<(usize, Arc<Node<T>>)>, usize) {
    let mut total = 0;
    let children = results
        .into_iter()
        .map(|(slot, (child, n))| {
            total += n;
            (slot, child)
        })
        .collect();
    (children, total)
}

/// Keeps the elements of a leaf or twig that satisfy `keep`.
///
/// Returns the node itself when nothing was dropped. The kept count is
/// reported alongside.
pub fn retain<T, F>(node: &Arc<Node<T>>, keep: F) -> Rebuilt<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let kept: Vec<T> = node.elements().iter().filter(|item| keep(item)).cloned().collect();
    let n = kept.len();
    if n == node.count() {
        return (Arc::clone(node), n);
    }
    (Arc::new(Node::collapse(kept)), n)
}
