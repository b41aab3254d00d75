/*!

This is a small crate for the abstract domains that dataflow analyses over
bytecode are built from: finite lattices given by their Hasse diagrams, and
reduced products that bundle several such domains into one.

As with plain lattice libraries, each domain is defined in two pieces: a
_definition_ trait implemented on a (typically vacuous) type, and a _value_
struct parameterized by that definition which carries the operators.

  - `FiniteLatticeDef` names a finite lattice. The lattice is built once from
    its elements and covering edges into a `BitVectorLattice`, which encodes
    each element as the bit pattern of its down-set so that order, join and
    meet are all a bitwise operation plus at most one table lookup.
    `FiniteDomain<D>` is a value in it. The `finite_lattice!` macro writes the
    definition for you.

  - `ProductDef` names a reduced product: a tuple of component domains plus a
    `reduce` hook that spots combinations of component values that cannot hold
    together. `ReducedProduct<D>` is a value in it, and is either bottom or a
    tuple with no bottom component: after every change the hook runs, and a
    bottom component collapses the whole value.

Both value types implement `AbstractDomain`, the interface a fixpoint driver
works through (`join_with` at merge points, `widen_with` at loop heads and so
on), so products can themselves be components of products.

Building a lattice is the only thing that can fail, and it fails with a
`LatticeError` naming the elements at fault. Everything afterwards is total,
apart from contract violations (reading a component of bottom, say), which
panic.

*/

mod bitvec;
mod domain;
mod error;
mod finite;
mod product;

pub use bitvec::{BitVectorLattice, Element, HasseDiagram, LatticeCode};
pub use domain::AbstractDomain;
pub use error::LatticeError;
pub use finite::{FiniteDomain, FiniteLatticeDef};
pub use product::{DomainTuple, ProductDef, ReducedProduct, TupleComponent};



#[cfg(test)]
mod proptests;
