use crate::{Builder, Equality, Resolver, Tree};

use super::{shape, sorted, tree_of};

#[test]
fn builder_add_and_finish() {
    let mut builder = Builder::new(Resolver::standard());
    for i in 0..500_u32 {
        assert!(builder.add(i));
    }
    assert!(!builder.add(7), "duplicate add reports no growth");
    assert_eq!(builder.count(), 500);
    assert!(builder.has(&499));

    let tree = builder.finish();
    assert_eq!(tree.count(), 500);
    assert_eq!(tree.vet(&Equality::standard()).unwrap(), 500);
    assert!(builder.is_empty(), "finish resets the builder");
    assert_eq!(builder.get(&1), None);
}

#[test]
fn builder_remove() {
    let mut builder = Builder::default();
    builder.extend(0..100_u32);
    assert!(builder.remove(&10));
    assert!(!builder.remove(&10));
    assert!(!builder.remove(&1000));
    assert_eq!(builder.count(), 99);

    let tree = builder.finish();
    assert!(!tree.has(&10, &Equality::standard()));
    assert_eq!(tree.vet(&Equality::standard()).unwrap(), 99);
}

/// Editing a builder seeded from a tree leaves the tree untouched.
#[test]
fn builder_from_tree_copies_on_write() {
    let eq = Equality::standard();
    let source = tree_of(0..300);
    let before = shape(&source);

    let mut builder = Builder::from_tree(&source, Resolver::standard());
    builder.extend(300..600);
    for i in 0..150 {
        builder.remove(&i);
    }
    let edited = builder.finish();

    assert_eq!(source.count(), 300);
    assert_eq!(shape(&source), before);
    assert_eq!(sorted(&source), (0..300).collect::<Vec<_>>());
    assert_eq!(source.vet(&eq).unwrap(), 300);

    assert_eq!(edited.count(), 450);
    assert_eq!(sorted(&edited), (150..600).collect::<Vec<_>>());
    assert_eq!(edited.vet(&eq).unwrap(), 450);
}

/// Builder and persistent updates reach the same trie.
#[test]
fn builder_matches_tree_shape() {
    let resolver = Resolver::standard();
    let mut tree = Tree::new();
    let mut builder = Builder::new(resolver.clone());
    for i in (0..2000_u32).map(|n| n.wrapping_mul(2_654_435_761) % 5000) {
        tree = tree.with(i, &resolver);
        builder.add(i);
    }
    for i in (0..5000_u32).step_by(3) {
        tree = tree.without(&i, resolver.equality());
        builder.remove(&i);
    }
    assert_eq!(builder.count(), tree.count());
    assert_eq!(shape(&builder.finish()), shape(&tree));
}

#[test]
fn builder_resolves_conflicts() {
    let resolver = Resolver::new(Equality::standard(), |old: &u32, _: &u32| *old);
    let mut builder = Builder::new(resolver);
    builder.add(1_u32);
    assert!(!builder.add(1));
    assert_eq!(builder.count(), 1);
    assert!(!builder.resolver().is_flipped());
}
