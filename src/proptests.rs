// Copyright 2020 Graydon Hoare <graydon@pobox.com>
// Licensed under the MIT and Apache-2.0 licenses.

use crate::testlattices::*;
use crate::*;
use proptest::prelude::*;
use proptest::sample;

// Proptest stuff

fn prop_bounds<V: AbstractDomain>(case: &str, a: &V) -> Result<(), TestCaseError> {
    println!("bottom <= {:?} <= top for {}", a, case);
    prop_assert!(V::bottom().leq(a));
    prop_assert!(a.leq(&V::top()));
    prop_assert!(V::top().join(a).equals(&V::top()));
    prop_assert!(V::bottom().meet(a).equals(&V::bottom()));
    prop_assert_eq!(a.leq(&V::bottom()), a.equals(&V::bottom()));
    prop_assert_eq!(a.is_bottom(), a.equals(&V::bottom()));
    prop_assert_eq!(a.is_top(), a.equals(&V::top()));
    Ok(())
}

fn prop_order<V: AbstractDomain>(case: &str, a: &V, b: &V, c: &V) -> Result<(), TestCaseError> {
    println!("partial order on {:?}, {:?}, {:?} for {}", a, b, c, case);
    prop_assert!(a.leq(a));
    if a.leq(b) && b.leq(a) {
        prop_assert!(a.equals(b));
    }
    if a.leq(b) && b.leq(c) {
        prop_assert!(a.leq(c));
    }
    Ok(())
}

fn prop_bounds_are_least<V: AbstractDomain>(
    case: &str,
    a: &V,
    b: &V,
    c: &V,
) -> Result<(), TestCaseError> {
    let join = a.join(b);
    let meet = a.meet(b);
    println!(
        "{:?} join {:?} == {:?}, meet == {:?} for {}",
        a, b, join, meet, case
    );
    prop_assert!(a.leq(&join));
    prop_assert!(b.leq(&join));
    if a.leq(c) && b.leq(c) {
        prop_assert!(join.leq(c));
    }
    prop_assert!(meet.leq(a));
    prop_assert!(meet.leq(b));
    if c.leq(a) && c.leq(b) {
        prop_assert!(c.leq(&meet));
    }
    Ok(())
}

fn prop_algebra<V: AbstractDomain>(case: &str, a: &V, b: &V, c: &V) -> Result<(), TestCaseError> {
    println!("join/meet algebra on {:?}, {:?}, {:?} for {}", a, b, c, case);
    prop_assert!(a.join(b).equals(&b.join(a)));
    prop_assert!(a.meet(b).equals(&b.meet(a)));
    prop_assert!(a.join(&b.join(c)).equals(&a.join(b).join(c)));
    prop_assert!(a.meet(&b.meet(c)).equals(&a.meet(b).meet(c)));
    prop_assert!(a.join(a).equals(a));
    prop_assert!(a.meet(a).equals(a));
    prop_assert!(a.widening(b).equals(&a.join(b)));
    prop_assert!(a.narrowing(b).equals(&a.meet(b)));

    let mut x = a.clone();
    x.join_with(b);
    prop_assert!(x.equals(&a.join(b)));
    let mut x = a.clone();
    x.meet_with(b);
    prop_assert!(x.equals(&a.meet(b)));
    Ok(())
}

fn all_props<V: AbstractDomain>(case: &str, a: &V, b: &V, c: &V) -> Result<(), TestCaseError> {
    prop_bounds(case, a)?;
    prop_bounds(case, b)?;
    prop_bounds(case, c)?;

    prop_order(case, a, b, c)?;
    prop_order(case, b, c, a)?;
    prop_order(case, c, a, b)?;

    prop_bounds_are_least(case, a, b, c)?;
    prop_bounds_are_least(case, b, c, a)?;
    prop_bounds_are_least(case, c, a, b)?;

    prop_algebra(case, a, b, c)?;
    prop_algebra(case, c, b, a)?;
    Ok(())
}

fn prop_normalized(v: &Product) -> Result<(), TestCaseError> {
    match v.components() {
        None => prop_assert!(v.is_bottom()),
        Some(components) => {
            prop_assert!(!components.any_bottom());
            prop_assert!(!(components.1.element() == A && components.2.element() == C));
        }
    }
    Ok(())
}

fn arb_elt<L: FiniteLatticeDef>() -> impl Strategy<Value = FiniteDomain<L>> {
    sample::select(L::lattice().elements().to_vec()).prop_map(FiniteDomain::<L>::new)
}

prop_compose! {
    fn arb_triple()
        (a in arb_elt::<Lattice0>(),
         b in arb_elt::<Lattice1>(),
         c in arb_elt::<Lattice2>())
         -> (D0, D1, D2)
    {
        (a, b, c)
    }
}

prop_compose! {
    // Mostly non-bottom products: component 0 is bottom half the time, so
    // weight it towards top.
    fn arb_product()
        (t in arb_triple(), keep in prop::bool::weighted(0.2))
         -> Product
    {
        let (a, b, c) = t;
        let a = if keep { a } else { D0::top() };
        Product::from_components((a, b, c))
    }
}

proptest! {
    #[test]
    fn proptest_two_point(a in arb_elt::<Lattice0>(),
                          b in arb_elt::<Lattice0>(),
                          c in arb_elt::<Lattice0>())
    {
        all_props("two-point lattice", &a, &b, &c)?;
    }

    #[test]
    fn proptest_diamond(a in arb_elt::<Lattice1>(),
                        b in arb_elt::<Lattice1>(),
                        c in arb_elt::<Lattice1>())
    {
        all_props("diamond", &a, &b, &c)?;
    }

    #[test]
    fn proptest_diamond_over_point(a in arb_elt::<Lattice2>(),
                                   b in arb_elt::<Lattice2>(),
                                   c in arb_elt::<Lattice2>())
    {
        all_props("diamond over a point", &a, &b, &c)?;
    }

    #[test]
    fn proptest_divisors(a in arb_elt::<Divisors60>(),
                         b in arb_elt::<Divisors60>(),
                         c in arb_elt::<Divisors60>())
    {
        all_props("divisors of 60", &a, &b, &c)?;
        let (x, y) = (a.element(), b.element());
        prop_assert_eq!(a.meet(&b).element(), gcd(x, y));
        prop_assert_eq!(a.join(&b).element(), x * y / gcd(x, y));
        prop_assert_eq!(a.leq(&b), y % x == 0);
    }

    #[test]
    fn proptest_encoding(a in arb_elt::<Divisors60>(), b in arb_elt::<Divisors60>()) {
        let lattice = Divisors60::lattice();
        prop_assert_eq!(a.leq(&b), a.code() & b.code() == a.code());
        prop_assert_eq!(lattice.decode(a.code() & b.code()), Some(a.meet(&b).element()));
        prop_assert_eq!(lattice.decode(a.code() | b.code()), Some(a.join(&b).element()));
    }

    #[test]
    fn proptest_reduced_product(a in arb_product(), b in arb_product(), c in arb_product()) {
        all_props("reduced product", &a, &b, &c)?;
        prop_normalized(&a.join(&b))?;
        prop_normalized(&a.meet(&b))?;
        prop_normalized(&a.widening(&c))?;
        prop_normalized(&a.narrowing(&c))?;
    }

    #[test]
    fn proptest_reduce(raw in arb_triple()) {
        let v = Product::from_components(raw.clone());
        prop_normalized(&v)?;

        let mut again = v.clone();
        again.reduce();
        prop_assert!(again.equals(&v));

        // Reduction only moves down from the raw tuple.
        match v.components() {
            None => prop_assert!(raw.any_bottom() || (raw.1.element() == A && raw.2.element() == C)),
            Some(components) => {
                prop_assert!(components.leq(&raw));
                prop_assert!(components.equals(&raw));
            }
        }
    }

    #[test]
    fn proptest_apply(v in arb_product(), b in arb_elt::<Lattice1>()) {
        prop_assume!(!v.is_bottom());
        let mut w = v.clone();
        w.apply::<1>(|component| *component = b);
        prop_normalized(&w)?;
        if !w.is_bottom() {
            prop_assert_eq!(*w.get::<1>(), b);
            prop_assert!(w.get::<0>().equals(v.get::<0>()));
            prop_assert!(w.get::<2>().equals(v.get::<2>()));
        }
    }
}
