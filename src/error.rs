// Copyright 2020 Graydon Hoare <graydon@pobox.com>
// Licensed under the MIT and Apache-2.0 licenses.

use std::fmt::Debug;
use thiserror::Error;

/// Reasons a set of elements and covering edges fails to describe a finite
/// lattice. These are construction-time failures: a lattice that builds
/// successfully never produces an error afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError<E: Debug> {
    #[error("a lattice needs at least one element")]
    Empty,

    #[error("{count} elements do not fit in a {width}-bit code")]
    TooManyElements { count: usize, width: usize },

    #[error("element {0:?} is listed more than once")]
    DuplicateElement(E),

    #[error("covering edge mentions unknown element {0:?}")]
    UnknownElement(E),

    #[error("elements {0:?} and {1:?} are each below the other")]
    Cycle(E, E),

    #[error("no unique bottom element (minimal elements: {0:?})")]
    NoBottom(Vec<E>),

    #[error("no unique top element (maximal elements: {0:?})")]
    NoTop(Vec<E>),

    #[error("elements {0:?} and {1:?} have no least upper bound")]
    NoJoin(E, E),

    #[error("elements {0:?} and {1:?} have no greatest lower bound")]
    NoMeet(E, E),
}
