#![allow(non_snake_case)]

use crate::algebra::FloatT;
use enum_dispatch::*;

//primitive cone types
mod expcone;
mod nonnegativecone;
mod powcone;
mod psdtrianglecone;
mod socone;
mod zerocone;

//the supported cone wrapper type for primitives
//and the composite cone
mod compositecone;
mod supportedcone;

//flatten all cone implementations to appear in this module
pub use compositecone::*;
pub use expcone::*;
pub use nonnegativecone::*;
pub use powcone::*;
pub use psdtrianglecone::*;
pub use socone::*;
pub use supportedcone::*;
pub use zerocone::*;

// marker for primal / dual distinctions
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
pub enum PrimalOrDualCone {
    PrimalCone,
    DualCone,
}

#[enum_dispatch]
pub trait Cone<T>
where
    T: FloatT,
{
    // number of rows occupied by the cone
    fn numel(&self) -> usize;

    // converts an elementwise scaling into
    // a scaling that preserves cone membership.
    // Writes multiplicative corrections into δ
    // and returns true if any are not one
    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool;

    // Euclidean projection onto the cone, in place
    fn project(&mut self, x: &mut [T]);

    // Euclidean projection onto the dual cone, in place
    fn project_dual(&mut self, x: &mut [T]);
}

// uniform scaling of a block by the mean of its
// elementwise scalings
pub(crate) fn rectify_to_mean<T: FloatT>(δ: &mut [T], e: &[T]) -> bool {
    use crate::algebra::VectorMath;
    δ.copy_from(e).recip().scale(e.mean());
    true
}

// Moreau decomposition for 3 dimensional cones :
// Π_K*(v) = v + Π_K(-v)
pub(crate) fn moreau_dual3<T: FloatT>(x: &mut [T], project: impl FnOnce(&mut [T; 3])) {
    let mut w = [-x[0], -x[1], -x[2]];
    project(&mut w);
    for (xi, wi) in x.iter_mut().zip(w) {
        *xi += wi;
    }
}
