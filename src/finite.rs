// Copyright 2020 Graydon Hoare <graydon@pobox.com>
// Licensed under the MIT and Apache-2.0 licenses.

use crate::bitvec::{BitVectorLattice, Element, LatticeCode};
use crate::domain::AbstractDomain;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::ptr;

/// Implement this trait on a vacuous type to name one specific finite lattice.
/// The lattice itself is built once and lives for the rest of the process;
/// `lattice` hands out the shared instance. The `finite_lattice!` macro writes
/// the usual implementation.
pub trait FiniteLatticeDef: 'static {
    type Element: Element;
    type Code: LatticeCode;
    fn lattice() -> &'static BitVectorLattice<Self::Element, Self::Code>;
}

/// A value of the finite abstract domain over the lattice named by `D`: one
/// encoded element plus a reference to the lattice it was encoded against.
pub struct FiniteDomain<D: FiniteLatticeDef> {
    code: D::Code,
    lattice: &'static BitVectorLattice<D::Element, D::Code>,
}

impl<D: FiniteLatticeDef> FiniteDomain<D> {
    /// Panics if `elt` is not one of the lattice's elements.
    pub fn new(elt: D::Element) -> Self {
        let lattice = D::lattice();
        match lattice.encode(&elt) {
            Some(code) => FiniteDomain { code, lattice },
            None => panic!("{:?} is not an element of {}", elt, std::any::type_name::<D>()),
        }
    }

    pub fn element(&self) -> D::Element {
        self.lattice.element_of(self.code)
    }

    pub fn code(&self) -> D::Code {
        self.code
    }

    pub fn lattice(&self) -> &'static BitVectorLattice<D::Element, D::Code> {
        self.lattice
    }

    fn same_lattice(&self, other: &Self) {
        assert!(
            ptr::eq(self.lattice, other.lattice),
            "combined values built from different instances of {}",
            std::any::type_name::<D>()
        );
    }
}

impl<D: FiniteLatticeDef> AbstractDomain for FiniteDomain<D> {
    fn bottom() -> Self {
        let lattice = D::lattice();
        FiniteDomain {
            code: lattice.bottom_code(),
            lattice,
        }
    }

    fn top() -> Self {
        let lattice = D::lattice();
        FiniteDomain {
            code: lattice.top_code(),
            lattice,
        }
    }

    fn is_bottom(&self) -> bool {
        self.code == self.lattice.bottom_code()
    }

    fn is_top(&self) -> bool {
        self.code == self.lattice.top_code()
    }

    fn leq(&self, other: &Self) -> bool {
        self.same_lattice(other);
        self.lattice.leq_codes(self.code, other.code)
    }

    fn equals(&self, other: &Self) -> bool {
        self.same_lattice(other);
        self.code == other.code
    }

    fn join_with(&mut self, other: &Self) {
        self.same_lattice(other);
        self.code = self.lattice.join_codes(self.code, other.code);
    }

    fn meet_with(&mut self, other: &Self) {
        self.same_lattice(other);
        self.code = self.lattice.meet_codes(self.code, other.code);
    }

    // Every chain in a finite lattice is finite, so plain join and meet
    // already terminate.
    fn widen_with(&mut self, other: &Self) {
        self.join_with(other)
    }

    fn narrow_with(&mut self, other: &Self) {
        self.meet_with(other)
    }
}

impl<D: FiniteLatticeDef> Clone for FiniteDomain<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: FiniteLatticeDef> Copy for FiniteDomain<D> {}

impl<D: FiniteLatticeDef> fmt::Debug for FiniteDomain<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.element())
    }
}

impl<D: FiniteLatticeDef> fmt::Display for FiniteDomain<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.element())
    }
}

impl<D: FiniteLatticeDef> PartialEq for FiniteDomain<D> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<D: FiniteLatticeDef> Eq for FiniteDomain<D> {}

impl<D: FiniteLatticeDef> Hash for FiniteDomain<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state)
    }
}

impl<D: FiniteLatticeDef> PartialOrd for FiniteDomain<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.leq(other), other.leq(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl<D: FiniteLatticeDef> Add<FiniteDomain<D>> for FiniteDomain<D> {
    type Output = FiniteDomain<D>;
    fn add(self, other: Self) -> Self {
        AbstractDomain::join(&self, &other)
    }
}

impl<'lhs, 'rhs, D: FiniteLatticeDef> Add<&'rhs FiniteDomain<D>> for &'lhs FiniteDomain<D> {
    type Output = FiniteDomain<D>;
    fn add(self, other: &'rhs FiniteDomain<D>) -> FiniteDomain<D> {
        AbstractDomain::join(self, other)
    }
}

/// Declares a vacuous type implementing `FiniteLatticeDef` for a lattice
/// given by its elements and covering edges:
///
/// ```
/// use hasse::{finite_lattice, AbstractDomain, FiniteDomain};
///
/// #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// enum Sign { Bot, Neg, Zero, Pos, Top }
/// use Sign::*;
///
/// finite_lattice! {
///     struct SignLattice: Sign as u8 {
///         elements: [Bot, Neg, Zero, Pos, Top],
///         covers: [(Bot, Neg), (Bot, Zero), (Bot, Pos),
///                  (Neg, Top), (Zero, Top), (Pos, Top)],
///     }
/// }
///
/// let neg = FiniteDomain::<SignLattice>::new(Neg);
/// let pos = FiniteDomain::<SignLattice>::new(Pos);
/// assert!((neg + pos).is_top());
/// ```
///
/// The lattice is built on first use. A definition that is not a lattice
/// panics there with the construction error, so a test touching each
/// declared lattice is enough to catch malformed definitions.
#[macro_export]
macro_rules! finite_lattice {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident : $elt:ty as $code:ty {
            elements: [$($e:expr),+ $(,)?],
            covers: [$(($lo:expr, $hi:expr)),* $(,)?] $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug)]
        $vis struct $name;

        impl $crate::FiniteLatticeDef for $name {
            type Element = $elt;
            type Code = $code;
            fn lattice() -> &'static $crate::BitVectorLattice<$elt, $code> {
                static LATTICE: ::std::sync::OnceLock<$crate::BitVectorLattice<$elt, $code>> =
                    ::std::sync::OnceLock::new();
                LATTICE.get_or_init(|| {
                    match $crate::BitVectorLattice::new(&[$($e),+], &[$(($lo, $hi)),*]) {
                        Ok(lattice) => lattice,
                        Err(err) => panic!("{} is not a lattice: {}", stringify!($name), err),
                    }
                })
            }
        }
    };
}
