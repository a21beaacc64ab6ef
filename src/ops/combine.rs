//! Union with conflict resolution.

use std::sync::Arc;

use crate::gauge::Gauge;
use crate::hasher::Hasher;
use crate::node::Node;
use crate::packer::fan_out;
use crate::resolver::Resolver;

use super::with::insert;
use super::{Rebuilt, unzip_slots};

/// Unions two subtrees at `depth`.
///
/// Returns the merged subtree and the number of element pairs that matched
/// (and were resolved into one). Subtrees present on only one side are
/// shared, not copied.
pub fn combine<T>(
    a: &Arc<Node<T>>,
    b: &Arc<Node<T>>,
    depth: usize,
    resolver: &Resolver<T>,
    gauge: Gauge,
) -> Rebuilt<T>
where
    T: Clone + Send + Sync,
{
    match (&**a, &**b) {
        (Node::Empty, _) => (Arc::clone(b), 0),
        (_, Node::Empty) => (Arc::clone(a), 0),
        (Node::Branch(left), Node::Branch(right)) => {
            let mask = left.packer.mask() | right.packer.mask();
            let merged = fan_out(mask, gauge.parallel_at(depth), |slot| {
                match (left.packer.get(slot), right.packer.get(slot)) {
                    (Some(l), Some(r)) => combine(l, r, depth + 1, resolver, gauge),
                    (Some(only), None) | (None, Some(only)) => (Arc::clone(only), 0),
                    (None, None) => (Arc::new(Node::Empty), 0),
                }
            });
            let (children, matches) = unzip_slots(merged);
            (Arc::new(Node::rebuild(children)), matches)
        }
        // The small side is folded into the branch; the flipped resolver
        // keeps `a`'s elements on the left of every merge.
        (_, Node::Branch(_)) => fold(b, a.elements(), depth, &resolver.flipped()),
        _ => fold(a, b.elements(), depth, resolver),
    }
}

/// Inserts each of `items` into a copy-on-write handle of `into`.
fn fold<T: Clone>(
    into: &Arc<Node<T>>,
    items: &[T],
    depth: usize,
    resolver: &Resolver<T>,
) -> Rebuilt<T> {
    let mut out = Arc::clone(into);
    let mut matches = 0;
    for item in items {
        let mut hasher = Hasher::new(item, resolver.equality(), depth);
        matches += insert(&mut out, item.clone(), &mut hasher, depth, resolver).merged();
    }
    (out, matches)
}
