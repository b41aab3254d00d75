// Copyright 2020 Graydon Hoare <graydon@pobox.com>
// Licensed under the MIT and Apache-2.0 licenses.

use crate::error::LatticeError;
use bit_set::BitSet;
use log::{debug, trace};
use num_traits::PrimInt;
use std::collections::hash_map::{Entry, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

/// Anything usable as a lattice element: typically a fieldless enum, but any
/// small copyable token works.
pub trait Element: Copy + Eq + Hash + Debug + Send + Sync + 'static {}
impl<T: Copy + Eq + Hash + Debug + Send + Sync + 'static> Element for T {}

/// The fixed-width integer an element's down-set is packed into. One bit per
/// element, so the width bounds the size of the lattice.
pub trait LatticeCode: PrimInt + Hash + Debug + Send + Sync + 'static {
    fn width() -> usize {
        Self::zero().count_zeros() as usize
    }
    fn bit(i: usize) -> Self {
        Self::one() << i
    }
}
impl<T: PrimInt + Hash + Debug + Send + Sync + 'static> LatticeCode for T {}

/// A lattice written down as data: its elements and the covering edges of its
/// Hasse diagram, each `(lower, upper)` with `upper` immediately above `lower`.
/// With the `serde` feature this is the form lattices are loaded from
/// configuration in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HasseDiagram<E> {
    pub elements: Vec<E>,
    pub covers: Vec<(E, E)>,
}

impl<E: Element> HasseDiagram<E> {
    pub fn new(elements: Vec<E>, covers: Vec<(E, E)>) -> Self {
        HasseDiagram { elements, covers }
    }

    pub fn build<C: LatticeCode>(&self) -> Result<BitVectorLattice<E, C>, LatticeError<E>> {
        BitVectorLattice::new(&self.elements, &self.covers)
    }
}

/// A finite lattice in which every element is encoded as the bit pattern of
/// its down-set (all the elements below or equal to it).
///
/// With that encoding `x <= y` is a subset test and the meet of two elements
/// is exactly the bitwise AND of their codes. The bitwise OR of two down-sets
/// is usually not itself a down-set (in a diamond, `A | B` misses the top), so
/// the reverse map is keyed by every pairwise union as well as every element
/// code, and resolves a union to the least element above it. Every pattern a
/// join or meet of two element codes can produce is in the map, so all three
/// queries are constant time.
///
/// Construction validates that the covering relation really does describe a
/// lattice; once built the structure is immutable and can be shared freely.
#[derive(Debug, Clone)]
pub struct BitVectorLattice<E, C = u64> {
    elements: Vec<E>,
    index: HashMap<E, usize>,
    codes: Vec<C>,
    decode: HashMap<C, usize>,
    bottom: usize,
    top: usize,
}

impl<E: Element, C: LatticeCode> BitVectorLattice<E, C> {
    pub fn new(elements: &[E], covers: &[(E, E)]) -> Result<Self, LatticeError<E>> {
        let n = elements.len();
        if n == 0 {
            return Err(LatticeError::Empty);
        }
        if n > C::width() {
            return Err(LatticeError::TooManyElements {
                count: n,
                width: C::width(),
            });
        }
        let mut index = HashMap::with_capacity(n);
        for (i, elt) in elements.iter().enumerate() {
            if index.insert(*elt, i).is_some() {
                return Err(LatticeError::DuplicateElement(*elt));
            }
        }

        let below = down_sets(elements, &index, covers)?;

        let minimal: Vec<usize> = (0..n).filter(|&i| below[i].len() == 1).collect();
        let maximal: Vec<usize> = (0..n)
            .filter(|&i| (0..n).all(|j| j == i || !below[j].contains(i)))
            .collect();
        let bottom = match minimal.as_slice() {
            [b] => *b,
            _ => return Err(LatticeError::NoBottom(pick(elements, &minimal))),
        };
        let top = match maximal.as_slice() {
            [t] => *t,
            _ => return Err(LatticeError::NoTop(pick(elements, &maximal))),
        };

        let codes: Vec<C> = below
            .iter()
            .map(|set| set.iter().fold(C::zero(), |code, j| code | C::bit(j)))
            .collect();
        for (elt, code) in elements.iter().zip(codes.iter()) {
            trace!("{:?} encoded as {:?}", elt, code);
        }

        // Antisymmetry makes the down-sets pairwise distinct, so element codes
        // never collide.
        let mut decode = HashMap::with_capacity(n * (n + 1) / 2);
        for (i, code) in codes.iter().enumerate() {
            decode.insert(*code, i);
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (elements[i], elements[j]);
                let join = least_upper_bound(&below, i, j).ok_or(LatticeError::NoJoin(a, b))?;
                let meet =
                    greatest_lower_bound(&below, i, j).ok_or(LatticeError::NoMeet(a, b))?;
                if codes[i] & codes[j] != codes[meet] {
                    return Err(LatticeError::NoMeet(a, b));
                }
                match decode.entry(codes[i] | codes[j]) {
                    Entry::Vacant(slot) => {
                        slot.insert(join);
                    }
                    Entry::Occupied(slot) => {
                        if *slot.get() != join {
                            return Err(LatticeError::NoJoin(a, b));
                        }
                    }
                }
            }
        }

        debug!(
            "built {}-element lattice: bottom {:?}, top {:?}, {} decode entries",
            n,
            elements[bottom],
            elements[top],
            decode.len()
        );
        Ok(BitVectorLattice {
            elements: elements.to_vec(),
            index,
            codes,
            decode,
            bottom,
            top,
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false: construction rejects an empty element set.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    pub fn contains(&self, elt: &E) -> bool {
        self.index.contains_key(elt)
    }

    pub fn bottom(&self) -> E {
        self.elements[self.bottom]
    }

    pub fn top(&self) -> E {
        self.elements[self.top]
    }

    pub fn bottom_code(&self) -> C {
        self.codes[self.bottom]
    }

    pub fn top_code(&self) -> C {
        self.codes[self.top]
    }

    pub fn encode(&self, elt: &E) -> Option<C> {
        self.index.get(elt).map(|&i| self.codes[i])
    }

    /// Maps an element code, or the union of two element codes, back to its
    /// element.
    pub fn decode(&self, code: C) -> Option<E> {
        self.decode.get(&code).map(|&i| self.elements[i])
    }

    /// Like `decode`, but for codes known to belong to this lattice.
    pub fn element_of(&self, code: C) -> E {
        self.elements[self.lookup(code)]
    }

    pub fn leq(&self, lhs: &E, rhs: &E) -> bool {
        self.leq_codes(self.code_of(lhs), self.code_of(rhs))
    }

    pub fn join(&self, lhs: &E, rhs: &E) -> E {
        let code = self.code_of(lhs) | self.code_of(rhs);
        self.elements[self.lookup(code)]
    }

    pub fn meet(&self, lhs: &E, rhs: &E) -> E {
        let code = self.code_of(lhs) & self.code_of(rhs);
        self.elements[self.lookup(code)]
    }

    pub fn leq_codes(&self, lhs: C, rhs: C) -> bool {
        lhs & rhs == lhs
    }

    pub fn join_codes(&self, lhs: C, rhs: C) -> C {
        self.codes[self.lookup(lhs | rhs)]
    }

    pub fn meet_codes(&self, lhs: C, rhs: C) -> C {
        let code = lhs & rhs;
        debug_assert!(self.decode.contains_key(&code));
        code
    }

    fn code_of(&self, elt: &E) -> C {
        match self.index.get(elt) {
            Some(&i) => self.codes[i],
            None => panic!("{:?} is not an element of this lattice", elt),
        }
    }

    fn lookup(&self, code: C) -> usize {
        match self.decode.get(&code) {
            Some(&i) => i,
            None => panic!("{:?} is not a code produced by this lattice", code),
        }
    }
}

fn pick<E: Copy>(elements: &[E], which: &[usize]) -> Vec<E> {
    which.iter().map(|&i| elements[i]).collect()
}

/// Reflexive-transitive closure of the covering edges: `below[i]` holds every
/// `j` with `elements[j] <= elements[i]`.
fn down_sets<E: Element>(
    elements: &[E],
    index: &HashMap<E, usize>,
    covers: &[(E, E)],
) -> Result<Vec<BitSet>, LatticeError<E>> {
    let n = elements.len();
    let mut below: Vec<BitSet> = (0..n)
        .map(|i| {
            let mut set = BitSet::with_capacity(n);
            set.insert(i);
            set
        })
        .collect();
    for (lo, hi) in covers {
        let l = *index.get(lo).ok_or(LatticeError::UnknownElement(*lo))?;
        let h = *index.get(hi).ok_or(LatticeError::UnknownElement(*hi))?;
        below[h].insert(l);
    }
    for k in 0..n {
        let row = below[k].clone();
        for set in below.iter_mut() {
            if set.contains(k) {
                set.union_with(&row);
            }
        }
    }
    trace!("closure of {} covering edges: {:?}", covers.len(), below);
    for (i, set) in below.iter().enumerate() {
        for j in set.iter() {
            if j != i && below[j].contains(i) {
                return Err(LatticeError::Cycle(elements[j], elements[i]));
            }
        }
    }
    Ok(below)
}

fn least_upper_bound(below: &[BitSet], i: usize, j: usize) -> Option<usize> {
    let upper: Vec<usize> = (0..below.len())
        .filter(|&k| below[k].contains(i) && below[k].contains(j))
        .collect();
    upper
        .iter()
        .copied()
        .find(|&k| upper.iter().all(|&u| below[u].contains(k)))
}

fn greatest_lower_bound(below: &[BitSet], i: usize, j: usize) -> Option<usize> {
    let lower: BitSet = below[i].intersection(&below[j]).collect();
    lower.iter().find(|&k| lower.is_subset(&below[k]))
}
