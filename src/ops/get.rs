//! Lookup: walks one hash path down to a leaf or twig.

use crate::hasher::Hasher;
use crate::node::Node;
use crate::resolver::Equality;

/// Searches the subtree rooted at `node` for an element equal to `value`.
///
/// `hasher` must be positioned at the depth of `node`.
pub fn get<'a, T>(
    node: &'a Node<T>,
    value: &T,
    mut hasher: Hasher<'_, T>,
    equality: &Equality<T>,
) -> Option<&'a T> {
    let mut node = node;
    loop {
        match node {
            Node::Branch(branch) => {
                let slot = hasher.next_fragment(value);
                node = branch.packer.get(slot)?.as_ref();
            }
            leaf => {
                return leaf.elements().iter().find(|item| equality.equal(item, value));
            }
        }
    }
}

/// [`get`] starting from a subtree at `depth`.
#[inline]
pub fn lookup<'a, T>(
    node: &'a Node<T>,
    value: &T,
    depth: usize,
    equality: &Equality<T>,
) -> Option<&'a T> {
    get(node, value, Hasher::new(value, equality, depth), equality)
}
