//! Predicate filtering.

use std::sync::Arc;

use crate::gauge::Gauge;
use crate::node::Node;
use crate::packer::fan_out;

use super::{Rebuilt, retain, unzip_slots};

/// Keeps the elements satisfying `predicate`.
///
/// Returns the rebuilt subtree and its element count; a subtree where every
/// element survives is shared unchanged.
pub fn filter<T, F>(a: &Arc<Node<T>>, predicate: &F, depth: usize, gauge: Gauge) -> Rebuilt<T>
where
    T: Clone + Send + Sync,
    F: Fn(&T) -> bool + Sync,
{
    match &**a {
        Node::Empty => (Arc::clone(a), 0),
        Node::Branch(branch) => {
            let results = fan_out(branch.packer.mask(), gauge.parallel_at(depth), |slot| {
                match branch.packer.get(slot) {
                    Some(child) => filter(child, predicate, depth + 1, gauge),
                    None => (Arc::new(Node::Empty), 0),
                }
            });
            let (children, surviving) = unzip_slots(results);
            if surviving == branch.count {
                return (Arc::clone(a), surviving);
            }
            (Arc::new(Node::rebuild(children)), surviving)
        }
        _ => retain(a, predicate),
    }
}
