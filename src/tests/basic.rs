use crate::{Equality, Error, Resolver, Tree};

use super::{sorted, tree_of};

#[test]
fn empty_tree() {
    let tree: Tree<u32> = Tree::new();
    assert_eq!(tree.count(), 0);
    assert!(tree.is_empty());
    assert_eq!(tree.iter().count(), 0);
    assert_eq!(tree.vet(&Equality::standard()).unwrap(), 0);
}

#[test]
fn with_one() {
    let resolver = Resolver::standard();
    let tree = Tree::new().with(7_u32, &resolver);
    assert_eq!(tree.count(), 1);
    assert!(!tree.is_empty());
    assert_eq!(tree.get(&7, resolver.equality()), Some(&7));
}

#[test]
fn get_missing() {
    let eq = Equality::standard();
    let tree = tree_of([1, 2, 3]);
    assert_eq!(tree.get(&4, &eq), None);
    assert!(!tree.has(&4, &eq));
}

#[test]
fn with_many() {
    let eq = Equality::standard();
    let tree = tree_of(0..1000);
    assert_eq!(tree.count(), 1000);
    for i in 0..1000 {
        assert!(tree.has(&i, &eq), "missing {i}");
    }
    assert_eq!(tree.vet(&eq).unwrap(), 1000);
}

/// Adding an element that is already present leaves the count alone.
#[test]
fn with_existing_is_idempotent() {
    let resolver = Resolver::standard();
    let tree = tree_of(0..50);
    let again = tree.with(10, &resolver);
    assert_eq!(again.count(), 50);
    assert_eq!(sorted(&again), sorted(&tree));
}

#[test]
fn without_present() {
    let eq = Equality::standard();
    let tree = tree_of(0..100);
    let smaller = tree.without(&42, &eq);
    assert_eq!(smaller.count(), 99);
    assert!(!smaller.has(&42, &eq));
    assert_eq!(smaller.vet(&eq).unwrap(), 99);
}

#[test]
fn without_everything() {
    let eq = Equality::standard();
    let mut tree = tree_of(0..300);
    for i in 0..300 {
        tree = tree.without(&i, &eq);
        assert_eq!(tree.count(), 299 - i as usize);
    }
    assert!(tree.is_empty());
    assert_eq!(tree.vet(&eq).unwrap(), 0);
}

#[test]
fn any_on_empty_is_an_error() {
    let tree: Tree<u32> = Tree::new();
    assert!(matches!(tree.any(), Err(Error::Empty(_))));
}

#[test]
fn any_returns_a_member() {
    let tree = tree_of([5, 9]);
    let found = *tree.any().unwrap();
    assert!(found == 5 || found == 9);
}

fn key(pair: &(u32, String)) -> &u32 {
    &pair.0
}

/// Keyed equality stores map-shaped elements; the merge decides which
/// payload survives.
#[test]
fn keyed_elements_merge_payloads() {
    let resolver = Resolver::new(Equality::keyed(key), |old: &(u32, String), new: &(u32, String)| {
        (old.0, format!("{}{}", old.1, new.1))
    });
    let tree = Tree::new()
        .with((1, "a".to_string()), &resolver)
        .with((2, "x".to_string()), &resolver)
        .with((1, "b".to_string()), &resolver);

    assert_eq!(tree.count(), 2);
    let probe = (1, String::new());
    assert_eq!(tree.get(&probe, resolver.equality()).map(|p| p.1.as_str()), Some("ab"));
}

#[test]
fn filter_keeps_matching() {
    let eq = Equality::standard();
    let evens = tree_of(0..200).filter(|n| n % 2 == 0);
    assert_eq!(evens.count(), 100);
    assert!(evens.iter().all(|n| n % 2 == 0));
    assert_eq!(evens.vet(&eq).unwrap(), 100);
}

#[test]
fn filter_nothing_survives() {
    let none = tree_of(0..200).filter(|_| false);
    assert!(none.is_empty());
}

/// Map can merge distinct inputs into one output.
#[test]
fn map_collapses_equal_results() {
    let resolver = Resolver::standard();
    let tens = tree_of(0..1000).map(|n| n / 10, &resolver);
    assert_eq!(tens.count(), 100);
    assert_eq!(sorted(&tens), (0..100).collect::<Vec<_>>());
    assert_eq!(tens.vet(resolver.equality()).unwrap(), 100);
}

#[test]
fn map_changes_type() {
    let resolver: Resolver<String> = Resolver::standard();
    let words = tree_of(0..20).map(u32::to_string, &resolver);
    assert_eq!(words.count(), 20);
    assert!(words.has(&"17".to_string(), resolver.equality()));
}

#[test]
fn reduce_sums() {
    assert_eq!(tree_of(1..=100).reduce(|a, b| a + b), Some(5050));
    assert_eq!(tree_of([]).reduce(|a, b| a + b), None);
    assert_eq!(tree_of([4]).reduce(|a, b| a + b), Some(4));
}
