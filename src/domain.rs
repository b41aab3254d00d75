// Copyright 2020 Graydon Hoare <graydon@pobox.com>
// Licensed under the MIT and Apache-2.0 licenses.

use std::fmt::Debug;

/// The operations a fixpoint driver needs from an abstract domain value.
///
/// Implementors provide the in-place operators; the pure `join`, `meet`,
/// `widening` and `narrowing` are derived from them. All of these are total:
/// once a domain is well-formed nothing here can fail.
pub trait AbstractDomain: Clone + Debug {
    fn bottom() -> Self;
    fn top() -> Self;

    fn is_bottom(&self) -> bool;
    fn is_top(&self) -> bool;

    fn leq(&self, other: &Self) -> bool;
    fn equals(&self, other: &Self) -> bool;

    fn join_with(&mut self, other: &Self);
    fn meet_with(&mut self, other: &Self);
    fn widen_with(&mut self, other: &Self);
    fn narrow_with(&mut self, other: &Self);

    fn set_to_bottom(&mut self) {
        *self = Self::bottom();
    }

    fn set_to_top(&mut self) {
        *self = Self::top();
    }

    fn join(&self, other: &Self) -> Self {
        let mut res = self.clone();
        res.join_with(other);
        res
    }

    fn meet(&self, other: &Self) -> Self {
        let mut res = self.clone();
        res.meet_with(other);
        res
    }

    fn widening(&self, other: &Self) -> Self {
        let mut res = self.clone();
        res.widen_with(other);
        res
    }

    fn narrowing(&self, other: &Self) -> Self {
        let mut res = self.clone();
        res.narrow_with(other);
        res
    }
}
