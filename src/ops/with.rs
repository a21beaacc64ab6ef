//! Insertion: copy-on-write path update with canonical splitting.

use std::sync::Arc;

use crate::hasher::Hasher;
use crate::node::Node;
use crate::resolver::Resolver;

/// Outcome of a recursive insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The element was new; the subtree grew by one.
    Added,
    /// An equal element was present and was replaced by the merge result.
    Merged,
}

impl InsertOutcome {
    /// Growth of the subtree: 1 for [`Added`](Self::Added), else 0.
    #[must_use]
    pub fn added(self) -> usize {
        usize::from(self == Self::Added)
    }

    /// Matches found: 1 for [`Merged`](Self::Merged), else 0.
    #[must_use]
    pub fn merged(self) -> usize {
        usize::from(self == Self::Merged)
    }
}

/// Inserts `value` into the subtree at `depth`.
///
/// Nodes are cloned only where shared (`Arc::make_mut`), so a uniquely owned
/// path is updated in place and a shared one is path-copied. On a conflict
/// the stored element becomes `resolver.resolve(existing, value)`.
///
/// `hasher` must be positioned at `depth`.
pub fn insert<T: Clone>(
    node: &mut Arc<Node<T>>,
    value: T,
    hasher: &mut Hasher<'_, T>,
    depth: usize,
    resolver: &Resolver<T>,
) -> InsertOutcome {
    let target = Arc::make_mut(node);
    match &mut *target {
        Node::Branch(branch) => {
            let slot = hasher.next_fragment(&value);
            let outcome = insert(branch.packer.entry(slot), value, hasher, depth + 1, resolver);
            branch.count += outcome.added();
            outcome
        }
        _ => {
            let equality = resolver.equality();
            if let Some(pos) = target.position(&value, equality) {
                let existing = &mut target.elements_mut()[pos];
                *existing = resolver.resolve(existing, &value);
                return InsertOutcome::Merged;
            }
            let mut items = std::mem::replace(target, Node::Empty).into_elements();
            items.push(value);
            *target = Node::from_elements(items, depth, equality);
            InsertOutcome::Added
        }
    }
}
