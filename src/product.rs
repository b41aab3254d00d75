// Copyright 2020 Graydon Hoare <graydon@pobox.com>
// Licensed under the MIT and Apache-2.0 licenses.

use crate::domain::AbstractDomain;
use log::trace;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

/// A tuple of abstract domains, combined pointwise. Implemented for tuples of
/// one to six components.
pub trait DomainTuple: Clone {
    const ARITY: usize;

    fn top() -> Self;
    fn any_bottom(&self) -> bool;
    fn all_top(&self) -> bool;
    fn leq(&self, other: &Self) -> bool;
    fn equals(&self, other: &Self) -> bool;
    fn join_with(&mut self, other: &Self);
    fn meet_with(&mut self, other: &Self);
    fn widen_with(&mut self, other: &Self);
    fn narrow_with(&mut self, other: &Self);

    /// Writes `(c0, c1, ...)`.
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    /// Writes the rendering of a tuple of component bottoms.
    fn render_bottom(f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Positional access to component `I` of a domain tuple. Indices past the
/// arity have no impl, so they are rejected at compile time.
pub trait TupleComponent<const I: usize>: DomainTuple {
    type Component: AbstractDomain;
    fn component(&self) -> &Self::Component;
    fn component_mut(&mut self) -> &mut Self::Component;
}

/// Implement this trait on a vacuous type to define a reduced product: the
/// component domains, and the reduction that removes combinations of
/// component values that cannot hold together.
///
/// `reduce` runs once after every operation that changes a product. It may
/// only lower components (typically setting one to bottom when the tuple is
/// infeasible), must be idempotent, and has to iterate internally if one of
/// its rules can enable another: it is not rerun to a fixpoint.
pub trait ProductDef: 'static {
    type Components: DomainTuple;

    fn reduce(_components: &mut Self::Components) {}
}

/// A value of the reduced product defined by `D`. Either the distinguished
/// bottom, or a tuple in which no component is bottom: any operation that
/// drives a component to bottom collapses the whole value.
pub struct ReducedProduct<D: ProductDef> {
    components: Option<D::Components>,
}

impl<D: ProductDef> ReducedProduct<D> {
    pub fn from_components(components: D::Components) -> Self {
        let mut res = ReducedProduct {
            components: Some(components),
        };
        res.reduce();
        res
    }

    /// The component tuple, or `None` for bottom.
    pub fn components(&self) -> Option<&D::Components> {
        self.components.as_ref()
    }

    /// Panics on bottom: check `is_bottom` first.
    pub fn get<const I: usize>(&self) -> &<D::Components as TupleComponent<I>>::Component
    where
        D::Components: TupleComponent<I>,
    {
        match &self.components {
            Some(components) => components.component(),
            None => panic!("get::<{}>() on a bottom {}", I, std::any::type_name::<D>()),
        }
    }

    /// Mutates component `I` in place, then reduces and normalizes the whole
    /// product. Panics on bottom.
    pub fn apply<const I: usize>(
        &mut self,
        mutate: impl FnOnce(&mut <D::Components as TupleComponent<I>>::Component),
    ) where
        D::Components: TupleComponent<I>,
    {
        match &mut self.components {
            Some(components) => mutate(components.component_mut()),
            None => panic!("apply::<{}>() on a bottom {}", I, std::any::type_name::<D>()),
        }
        self.reduce();
    }

    /// Runs the reduction hook, then collapses to bottom if any component
    /// has become bottom.
    pub fn reduce(&mut self) {
        if let Some(components) = &mut self.components {
            D::reduce(components);
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        if let Some(components) = &self.components {
            if components.any_bottom() {
                trace!("{} collapsed to bottom", std::any::type_name::<D>());
                self.components = None;
            }
        }
    }
}

impl<D: ProductDef> AbstractDomain for ReducedProduct<D> {
    fn bottom() -> Self {
        ReducedProduct { components: None }
    }

    fn top() -> Self {
        let mut res = ReducedProduct {
            components: Some(<D::Components as DomainTuple>::top()),
        };
        // Only a one-point component can make top bottom.
        res.normalize();
        res
    }

    fn is_bottom(&self) -> bool {
        self.components.is_none()
    }

    fn is_top(&self) -> bool {
        match &self.components {
            Some(components) => components.all_top(),
            None => false,
        }
    }

    fn leq(&self, other: &Self) -> bool {
        match (&self.components, &other.components) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(lhs), Some(rhs)) => lhs.leq(rhs),
        }
    }

    fn equals(&self, other: &Self) -> bool {
        match (&self.components, &other.components) {
            (None, None) => true,
            (Some(lhs), Some(rhs)) => lhs.equals(rhs),
            _ => false,
        }
    }

    fn join_with(&mut self, other: &Self) {
        match (&mut self.components, &other.components) {
            (_, None) => (),
            (None, Some(_)) => *self = other.clone(),
            (Some(lhs), Some(rhs)) => {
                lhs.join_with(rhs);
                self.reduce();
            }
        }
    }

    fn meet_with(&mut self, other: &Self) {
        match (&mut self.components, &other.components) {
            (None, _) => (),
            (Some(_), None) => self.components = None,
            (Some(lhs), Some(rhs)) => {
                lhs.meet_with(rhs);
                self.reduce();
            }
        }
    }

    fn widen_with(&mut self, other: &Self) {
        match (&mut self.components, &other.components) {
            (_, None) => (),
            (None, Some(_)) => *self = other.clone(),
            (Some(lhs), Some(rhs)) => {
                lhs.widen_with(rhs);
                self.reduce();
            }
        }
    }

    fn narrow_with(&mut self, other: &Self) {
        match (&mut self.components, &other.components) {
            (None, _) => (),
            (Some(_), None) => self.components = None,
            (Some(lhs), Some(rhs)) => {
                lhs.narrow_with(rhs);
                self.reduce();
            }
        }
    }

    fn set_to_bottom(&mut self) {
        self.components = None;
    }
}

impl<D: ProductDef> Clone for ReducedProduct<D> {
    fn clone(&self) -> Self {
        ReducedProduct {
            components: self.components.clone(),
        }
    }
}

impl<D: ProductDef> fmt::Debug for ReducedProduct<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.components {
            Some(components) => components.render(f),
            None => <D::Components as DomainTuple>::render_bottom(f),
        }
    }
}

impl<D: ProductDef> fmt::Display for ReducedProduct<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl<D: ProductDef> PartialEq for ReducedProduct<D> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<D: ProductDef> PartialOrd for ReducedProduct<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.leq(other), other.leq(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl<'lhs, 'rhs, D: ProductDef> Add<&'rhs ReducedProduct<D>> for &'lhs ReducedProduct<D> {
    type Output = ReducedProduct<D>;
    fn add(self, other: &'rhs ReducedProduct<D>) -> ReducedProduct<D> {
        AbstractDomain::join(self, other)
    }
}

fn render_list(f: &mut fmt::Formatter<'_>, items: &[&dyn fmt::Debug]) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{:?}", item)?;
    }
    f.write_str(")")
}

macro_rules! domain_tuple {
    ($arity:expr; $all:tt; $(($idx:tt, $T:ident)),+) => {
        impl<$($T: AbstractDomain),+> DomainTuple for ($($T,)+) {
            const ARITY: usize = $arity;

            fn top() -> Self {
                ($($T::top(),)+)
            }
            fn any_bottom(&self) -> bool {
                false $(|| self.$idx.is_bottom())+
            }
            fn all_top(&self) -> bool {
                true $(&& self.$idx.is_top())+
            }
            fn leq(&self, other: &Self) -> bool {
                true $(&& self.$idx.leq(&other.$idx))+
            }
            fn equals(&self, other: &Self) -> bool {
                true $(&& self.$idx.equals(&other.$idx))+
            }
            fn join_with(&mut self, other: &Self) {
                $(self.$idx.join_with(&other.$idx);)+
            }
            fn meet_with(&mut self, other: &Self) {
                $(self.$idx.meet_with(&other.$idx);)+
            }
            fn widen_with(&mut self, other: &Self) {
                $(self.$idx.widen_with(&other.$idx);)+
            }
            fn narrow_with(&mut self, other: &Self) {
                $(self.$idx.narrow_with(&other.$idx);)+
            }
            fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                render_list(f, &[$(&self.$idx as &dyn fmt::Debug),+])
            }
            fn render_bottom(f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let bottoms = ($($T::bottom(),)+);
                render_list(f, &[$(&bottoms.$idx as &dyn fmt::Debug),+])
            }
        }

        $(tuple_component!($all; $idx, $T);)+
    };
}

macro_rules! tuple_component {
    ([$($All:ident),+]; $idx:tt, $T:ident) => {
        impl<$($All: AbstractDomain),+> TupleComponent<$idx> for ($($All,)+) {
            type Component = $T;
            fn component(&self) -> &$T {
                &self.$idx
            }
            fn component_mut(&mut self) -> &mut $T {
                &mut self.$idx
            }
        }
    };
}

domain_tuple!(1; [A]; (0, A));
domain_tuple!(2; [A, B]; (0, A), (1, B));
domain_tuple!(3; [A, B, C]; (0, A), (1, B), (2, C));
domain_tuple!(4; [A, B, C, D]; (0, A), (1, B), (2, C), (3, D));
domain_tuple!(5; [A, B, C, D, E]; (0, A), (1, B), (2, C), (3, D), (4, E));
domain_tuple!(6; [A, B, C, D, E, F]; (0, A), (1, B), (2, C), (3, D), (4, E), (5, F));
