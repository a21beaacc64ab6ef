//! Fold of all elements with an associative function.

use crate::gauge::Gauge;
use crate::node::Node;
use crate::packer::fan_out;

/// Combines every element of `a` with `f`, or `None` for an empty subtree.
///
/// Partial results are combined in ascending slot order, so `f` needs to be
/// associative but not commutative for the result to be deterministic.
pub fn reduce<T, F>(a: &Node<T>, f: &F, depth: usize, gauge: Gauge) -> Option<T>
where
    T: Clone + Send + Sync,
    F: Fn(T, T) -> T + Sync,
{
    match a {
        Node::Branch(branch) => fan_out(branch.packer.mask(), gauge.parallel_at(depth), |slot| {
            branch
                .packer
                .get(slot)
                .and_then(|child| reduce(child, f, depth + 1, gauge))
        })
        .into_iter()
        .filter_map(|(_, partial)| partial)
        .reduce(f),
        leaf => leaf.elements().iter().cloned().reduce(f),
    }
}
