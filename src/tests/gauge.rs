use crate::Gauge;
use crate::ops;
use crate::resolver::Equality;

use super::{shape, tree_of};

#[test]
fn sequential_below_three_levels() {
    assert_eq!(Gauge::new(0, 8).parallel_depth(), 0);
    assert_eq!(Gauge::new(1000, 8).parallel_depth(), 0);
    assert_eq!(Gauge::new(4095, 8).parallel_depth(), 0);
    assert_eq!(Gauge::new(4096, 8).parallel_depth(), 1);
}

#[test]
fn sequential_without_threads() {
    assert_eq!(Gauge::new(1 << 30, 1), Gauge::sequential());
    assert_eq!(Gauge::new(1 << 30, 0), Gauge::sequential());
}

/// Depth grows with the thread ceiling, but never past the trie height.
#[test]
fn depth_bounded_by_ceiling_and_height() {
    assert_eq!(Gauge::new(1 << 20, 2).parallel_depth(), 2);
    assert_eq!(Gauge::new(1 << 20, 16).parallel_depth(), 2);
    assert_eq!(Gauge::new(1 << 20, 17).parallel_depth(), 3);
    assert_eq!(Gauge::new(1 << 20, 64).parallel_depth(), 3);
    assert_eq!(Gauge::new(1 << 20, 4096).parallel_depth(), 3);
    assert_eq!(Gauge::new(1 << 16, 4096).parallel_depth(), 2);
}

#[test]
fn parallel_at_depth() {
    let gauge = Gauge::new(1 << 20, 64);
    assert!(gauge.parallel_at(0));
    assert!(gauge.parallel_at(2));
    assert!(!gauge.parallel_at(3));
    assert!(!Gauge::sequential().parallel_at(0));
}

/// Fan-out scheduling never changes a result.
#[test]
fn parallel_matches_sequential() {
    let resolver = crate::Resolver::standard();
    let eq: &Equality<u32> = resolver.equality();
    let a = tree_of(0..20_000);
    let b = tree_of(10_000..30_000);
    let wide = Gauge::new(1 << 20, 64);
    let narrow = Gauge::sequential();

    let (par, par_matches) =
        wide.install(|| ops::combine::combine(a.root(), b.root(), 0, &resolver, wide));
    let (seq, seq_matches) = ops::combine::combine(a.root(), b.root(), 0, &resolver, narrow);
    assert_eq!(par_matches, 10_000);
    assert_eq!(par_matches, seq_matches);
    assert_eq!(format!("{par:?}"), format!("{seq:?}"));

    let (par, kept) = ops::intersection::intersection(a.root(), b.root(), 0, &resolver, wide);
    let (seq, _) = ops::intersection::intersection(a.root(), b.root(), 0, &resolver, narrow);
    assert_eq!(kept, 10_000);
    assert_eq!(format!("{par:?}"), format!("{seq:?}"));

    let (par, removed) = ops::difference::difference(a.root(), b.root(), 0, eq, wide);
    let (seq, _) = ops::difference::difference(a.root(), b.root(), 0, eq, narrow);
    assert_eq!(removed, 10_000);
    assert_eq!(format!("{par:?}"), format!("{seq:?}"));

    assert!(ops::subset::is_subset(a.root(), a.root(), 0, eq, wide));
    assert!(!ops::subset::is_subset(a.root(), b.root(), 0, eq, wide));

    let odd = |n: &u32| n % 2 == 1;
    let (par, surviving) = ops::filter::filter(a.root(), &odd, 0, wide);
    let (seq, _) = ops::filter::filter(a.root(), &odd, 0, narrow);
    assert_eq!(surviving, 10_000);
    assert_eq!(format!("{par:?}"), format!("{seq:?}"));

    let halve = |n: &u32| n / 2;
    let (par, distinct) = ops::map::map(a.root(), &halve, 0, &resolver, wide);
    let (seq, _) = ops::map::map(a.root(), &halve, 0, &resolver, narrow);
    assert_eq!(distinct, 10_000);
    assert_eq!(format!("{par:?}"), format!("{seq:?}"));

    let sum = |x: u32, y: u32| x.wrapping_add(y);
    assert_eq!(
        ops::reduce::reduce(a.root(), &sum, 0, wide),
        ops::reduce::reduce(a.root(), &sum, 0, narrow)
    );
}

#[test]
fn tree_operations_agree_with_fresh_builds() {
    let resolver = crate::Resolver::standard();
    let a = tree_of(0..50_000);
    let b = tree_of(25_000..75_000);
    assert_eq!(shape(&a.combine(&b, &resolver)), shape(&tree_of(0..75_000)));
}
