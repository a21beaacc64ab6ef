use crate::{Builder, Equality, Resolver, Tree};

use super::shape;

/// Only a hundred distinct hash codes, whatever the seed.
fn bad_hash() -> Resolver<u32> {
    Resolver::new(
        Equality::new(|a: &u32, b: &u32| a == b, |v: &u32, _seed| u64::from(*v % 100)),
        |old: &u32, _: &u32| *old,
    )
}

/// Every element hashes the same.
fn constant_hash() -> Resolver<u32> {
    Resolver::new(
        Equality::new(|a: &u32, b: &u32| a == b, |_: &u32, _seed| 0xDEAD_BEEF),
        |old: &u32, _: &u32| *old,
    )
}

/// Ten thousand values over a hundred hash codes stay correct.
#[test]
fn bad_hash_ten_thousand() {
    let resolver = bad_hash();
    let eq = resolver.equality();
    let mut builder = Builder::new(resolver.clone());
    builder.extend(0..10_000);
    let tree = builder.finish();

    assert_eq!(tree.count(), 10_000);
    assert_eq!(tree.vet(eq).unwrap(), 10_000);
    for v in 0..10_000 {
        assert!(tree.has(&v, eq), "missing {v}");
    }
    assert!(!tree.has(&10_000, eq));

    let mut shrinking = tree;
    for v in (0..10_000).step_by(2) {
        shrinking = shrinking.without(&v, eq);
    }
    assert_eq!(shrinking.count(), 5000);
    assert_eq!(shrinking.vet(eq).unwrap(), 5000);
}

/// Multiples of ten over a hundred hash codes: every inserted value is
/// found and every value in between is absent.
#[test]
fn bad_hash_multiples_of_ten() {
    let resolver = bad_hash();
    let eq = resolver.equality();
    let mut builder = Builder::new(resolver.clone());
    builder.extend((0..10_000).map(|v| v * 10));
    let tree = builder.finish();

    assert_eq!(tree.count(), 10_000);
    assert_eq!(tree.vet(eq).unwrap(), 10_000);
    for v in 0..100_010 {
        assert_eq!(tree.has(&v, eq), v % 10 == 0 && v < 100_000, "value {v}");
    }
}

#[test]
fn two_colliding_elements_share_a_leaf() {
    let resolver = constant_hash();
    let tree = Tree::new().with(1, &resolver).with(2, &resolver);
    assert_eq!(shape(&tree), "Leaf2");
}

/// Three fully colliding elements sink to a twig at the bottom of the trie.
#[test]
fn three_colliding_elements_form_a_twig() {
    let resolver = constant_hash();
    let eq = resolver.equality();
    let tree = Tree::from_iter_with(0..3, &resolver);
    assert!(shape(&tree).contains("Twig { len: 3 }"));
    assert_eq!(tree.vet(eq).unwrap(), 3);

    let shrunk = tree.without(&1, eq);
    assert_eq!(shape(&shrunk), "Leaf2");
    assert!(shrunk.has(&0, eq) && shrunk.has(&2, eq));
}

#[test]
fn colliding_set_algebra() {
    let resolver = bad_hash();
    let eq = resolver.equality();
    let a = Tree::from_iter_with(0..3000, &resolver);
    let b = Tree::from_iter_with(2000..5000, &resolver);

    let union = a.combine(&b, &resolver);
    assert_eq!(union.count(), 5000);
    assert_eq!(union.vet(eq).unwrap(), 5000);

    let both = a.intersection(&b, &resolver);
    assert_eq!(both.count(), 1000);
    assert_eq!(both.vet(eq).unwrap(), 1000);

    let only_a = a.difference(&b, eq);
    assert_eq!(only_a.count(), 2000);
    assert_eq!(only_a.vet(eq).unwrap(), 2000);

    assert!(both.is_subset_of(&a, eq));
    assert!(!a.is_subset_of(&both, eq));
}
