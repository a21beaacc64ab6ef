//! Set intersection with conflict resolution.

use std::sync::Arc;

use crate::gauge::Gauge;
use crate::node::Node;
use crate::packer::fan_out;
use crate::resolver::Resolver;

use super::get::lookup;
use super::{Rebuilt, unzip_slots};

/// Keeps the elements present in both subtrees.
///
/// Each kept element is `resolver.resolve(from_a, from_b)`. Returns the
/// rebuilt subtree and its element count.
pub fn intersection<T>(
    a: &Arc<Node<T>>,
    b: &Arc<Node<T>>,
    depth: usize,
    resolver: &Resolver<T>,
    gauge: Gauge,
) -> Rebuilt<T>
where
    T: Clone + Send + Sync,
{
    let equality = resolver.equality();
    match (&**a, &**b) {
        (Node::Empty, _) | (_, Node::Empty) => (Arc::new(Node::Empty), 0),
        (Node::Branch(left), Node::Branch(right)) => {
            let mask = left.packer.mask() & right.packer.mask();
            let results = fan_out(mask, gauge.parallel_at(depth), |slot| {
                match (left.packer.get(slot), right.packer.get(slot)) {
                    (Some(l), Some(r)) => intersection(l, r, depth + 1, resolver, gauge),
                    _ => (Arc::new(Node::Empty), 0),
                }
            });
            let (children, kept) = unzip_slots(results);
            (Arc::new(Node::rebuild(children)), kept)
        }
        (Node::Branch(_), _) => pick(b.elements(), |item| {
            lookup(a, item, depth, equality).map(|found| resolver.resolve(found, item))
        }),
        _ => pick(a.elements(), |item| {
            lookup(b, item, depth, equality).map(|found| resolver.resolve(item, found))
        }),
    }
}

/// Collects the resolved matches of a leaf's or twig's elements. A subset
/// of such a node never needs splitting.
fn pick<T, F>(items: &[T], matched: F) -> Rebuilt<T>
where
    F: Fn(&T) -> Option<T>,
{
    let kept: Vec<T> = items.iter().filter_map(matched).collect();
    let n = kept.len();
    (Arc::new(Node::collapse(kept)), n)
}
