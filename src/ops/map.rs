//! Element transformation.

use std::sync::Arc;

use crate::gauge::Gauge;
use crate::hasher::Hasher;
use crate::node::Node;
use crate::packer::fan_out;
use crate::resolver::Resolver;

use super::Rebuilt;
use super::combine::combine;
use super::with::insert;

/// Applies `f` to every element of `a`, building a root-level trie of the
/// results.
///
/// Mapped elements land wherever their own hashes put them, so each input
/// child yields an independent output trie; those are unioned in ascending
/// slot order. Outputs that compare equal are merged with `resolver`.
/// Returns the output trie and its distinct element count.
pub fn map<T, U, F>(
    a: &Node<T>,
    f: &F,
    depth: usize,
    resolver: &Resolver<U>,
    gauge: Gauge,
) -> Rebuilt<U>
where
    T: Send + Sync,
    U: Clone + Send + Sync,
    F: Fn(&T) -> U + Sync,
{
    match a {
        Node::Branch(branch) => {
            let mapped = fan_out(branch.packer.mask(), gauge.parallel_at(depth), |slot| {
                match branch.packer.get(slot) {
                    Some(child) => map(child, f, depth + 1, resolver, gauge),
                    None => (Arc::new(Node::Empty), 0),
                }
            });
            let mut out = Arc::new(Node::Empty);
            let mut total = 0;
            for (_, (part, count)) in mapped {
                let (merged, matches) = combine(&out, &part, 0, resolver, gauge);
                out = merged;
                total += count - matches;
            }
            (out, total)
        }
        leaf => {
            let mut out = Arc::new(Node::Empty);
            let mut total = 0;
            for item in leaf.elements() {
                let value = f(item);
                let mut hasher = Hasher::new(&value, resolver.equality(), 0);
                total += insert(&mut out, value, &mut hasher, 0, resolver).added();
            }
            (out, total)
        }
    }
}
