//! Removal: copy-on-write path update with canonical collapse.

use std::sync::Arc;

use crate::hasher::Hasher;
use crate::node::{LEAF_CAPACITY, Node};
use crate::resolver::Equality;

/// Outcome of a recursive remove.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// No equal element was found.
    NotFound,
    /// One element was removed.
    Removed,
}

/// Removes the element equal to `value` from the subtree.
///
/// The path is made unique before the search, so callers that must not
/// copy anything on a miss check presence with [`get`](super::get::get)
/// first. A branch that drops to [`LEAF_CAPACITY`] elements collapses into
/// a leaf; an emptied child slot is cleared.
pub fn remove<T: Clone>(
    node: &mut Arc<Node<T>>,
    value: &T,
    hasher: &mut Hasher<'_, T>,
    equality: &Equality<T>,
) -> RemoveOutcome {
    let target = Arc::make_mut(node);
    match &mut *target {
        Node::Branch(branch) => {
            let slot = hasher.next_fragment(value);
            let Some(child) = branch.packer.get_mut(slot) else {
                return RemoveOutcome::NotFound;
            };
            if remove(child, value, hasher, equality) == RemoveOutcome::NotFound {
                return RemoveOutcome::NotFound;
            }
            if child.is_empty() {
                branch.packer.clear(slot);
            }
            branch.count -= 1;
        }
        _ => {
            let Some(pos) = target.position(value, equality) else {
                return RemoveOutcome::NotFound;
            };
            let mut items = std::mem::replace(target, Node::Empty).into_elements();
            items.swap_remove(pos);
            *target = Node::collapse(items);
            return RemoveOutcome::Removed;
        }
    }

    if target.count() <= LEAF_CAPACITY {
        let mut items = Vec::with_capacity(LEAF_CAPACITY);
        target.clone_into_vec(&mut items);
        *target = Node::collapse(items);
    }
    RemoveOutcome::Removed
}
