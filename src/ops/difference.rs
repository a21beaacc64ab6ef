//! Set difference.

use std::sync::Arc;

use crate::gauge::Gauge;
use crate::hasher::Hasher;
use crate::node::Node;
use crate::packer::fan_out;
use crate::resolver::Equality;

use super::get::{get, lookup};
use super::without::{RemoveOutcome, remove};
use super::{Rebuilt, retain, unzip_slots};

/// Removes from `a` every element that also occurs in `b`.
///
/// Returns the rebuilt subtree and the number of elements removed. A
/// subtree that loses nothing is returned as is.
pub fn difference<T>(
    a: &Arc<Node<T>>,
    b: &Arc<Node<T>>,
    depth: usize,
    equality: &Equality<T>,
    gauge: Gauge,
) -> Rebuilt<T>
where
    T: Clone + Send + Sync,
{
    if Arc::ptr_eq(a, b) {
        return (Arc::new(Node::Empty), a.count());
    }
    match (&**a, &**b) {
        (Node::Empty, _) | (_, Node::Empty) => (Arc::clone(a), 0),
        (Node::Branch(left), Node::Branch(right)) => {
            let results = fan_out(left.packer.mask(), gauge.parallel_at(depth), |slot| {
                match (left.packer.get(slot), right.packer.get(slot)) {
                    (Some(l), Some(r)) => difference(l, r, depth + 1, equality, gauge),
                    (Some(l), None) => (Arc::clone(l), 0),
                    (None, _) => (Arc::new(Node::Empty), 0),
                }
            });
            let (children, removed) = unzip_slots(results);
            if removed == 0 {
                return (Arc::clone(a), 0);
            }
            (Arc::new(Node::rebuild(children)), removed)
        }
        (Node::Branch(_), _) => {
            let mut out = Arc::clone(a);
            let mut removed = 0;
            for item in b.elements() {
                let mut hasher = Hasher::new(item, equality, depth);
                if get(&out, item, hasher, equality).is_some()
                    && remove(&mut out, item, &mut hasher, equality) == RemoveOutcome::Removed
                {
                    removed += 1;
                }
            }
            (out, removed)
        }
        _ => {
            let (out, kept) = retain(a, |item| lookup(b, item, depth, equality).is_none());
            (out, a.count() - kept)
        }
    }
}
