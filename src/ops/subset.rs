//! Subset test.

use std::sync::Arc;

use crate::gauge::Gauge;
use crate::node::Node;
use crate::packer::fan_all;
use crate::resolver::Equality;

use super::get::lookup;

/// Returns `true` if every element of `a` occurs in `b`.
///
/// Shared subtrees, element counts and slot masks short-circuit before any
/// element is compared.
pub fn is_subset<T>(
    a: &Arc<Node<T>>,
    b: &Arc<Node<T>>,
    depth: usize,
    equality: &Equality<T>,
    gauge: Gauge,
) -> bool
where
    T: Send + Sync,
{
    if Arc::ptr_eq(a, b) {
        return true;
    }
    if a.count() > b.count() {
        return false;
    }
    match (&**a, &**b) {
        (Node::Empty, _) => true,
        (Node::Branch(left), Node::Branch(right)) => {
            let mask = left.packer.mask();
            mask.is_subset(right.packer.mask())
                && fan_all(mask, gauge.parallel_at(depth), |slot| {
                    match (left.packer.get(slot), right.packer.get(slot)) {
                        (Some(l), Some(r)) => is_subset(l, r, depth + 1, equality, gauge),
                        _ => false,
                    }
                })
        }
        (Node::Branch(_), _) => false,
        _ => a
            .elements()
            .iter()
            .all(|item| lookup(b, item, depth, equality).is_some()),
    }
}
