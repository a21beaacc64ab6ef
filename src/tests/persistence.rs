use std::sync::Arc;

use crate::node::Node;
use crate::{Equality, Resolver};

use super::{shape, sorted, tree_of};

/// Deriving new versions never disturbs the old one.
#[test]
fn old_versions_survive_updates() {
    let resolver = Resolver::standard();
    let eq = resolver.equality();
    let v1 = tree_of(0..200);
    let v1_shape = shape(&v1);

    let v2 = v1.with(1000, &resolver);
    let v3 = v2.without(&5, eq);
    let v4 = v3.combine(&tree_of(500..600), &resolver);
    let v5 = v4.difference(&tree_of(0..100), eq);

    assert_eq!(shape(&v1), v1_shape);
    assert_eq!(sorted(&v1), (0..200).collect::<Vec<_>>());
    assert_eq!(v2.count(), 201);
    assert_eq!(v3.count(), 200);
    assert_eq!(v4.count(), 300);
    assert_eq!(v5.count(), 201);
    assert_eq!(v5.vet(eq).unwrap(), 201);
    assert!(v3.has(&1000, eq) && !v3.has(&5, eq));
}

/// A single update copies one root-to-leaf path and shares everything else.
#[test]
fn with_shares_untouched_children() {
    let resolver = Resolver::standard();
    let before = tree_of(0..1000);
    let after = before.with(5000, &resolver);

    let (Node::Branch(old), Node::Branch(new)) = (&**before.root(), &**after.root()) else {
        panic!("expected branch roots");
    };
    assert_eq!(old.packer.mask(), new.packer.mask());
    let shared = old
        .packer
        .children()
        .zip(new.packer.children())
        .filter(|(a, b)| Arc::ptr_eq(a, b))
        .count();
    assert_eq!(shared, 15);
}

#[test]
fn unchanged_results_share_the_root() {
    let resolver = Resolver::standard();
    let eq = resolver.equality();
    let tree = tree_of(0..500);

    assert!(tree.without(&9999, eq).shares_root(&tree));
    assert!(tree.difference(&tree_of(1000..1500), eq).shares_root(&tree));
    assert!(tree.difference(&tree_of([9999]), eq).shares_root(&tree));
    assert!(tree.filter(|_| true).shares_root(&tree));
    assert!(tree.clone().shares_root(&tree));
    assert!(!tree.with(9999, &resolver).shares_root(&tree));
}

/// Copies of a tree can be read from many threads at once.
#[test]
fn concurrent_readers() {
    let eq = Equality::standard();
    let tree = tree_of(0..5000);
    std::thread::scope(|scope| {
        for t in 0..4_u32 {
            let tree = tree.clone();
            let eq = &eq;
            scope.spawn(move || {
                for i in (t..5000).step_by(4) {
                    assert!(tree.has(&i, eq));
                }
            });
        }
    });
}
