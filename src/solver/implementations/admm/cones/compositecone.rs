use super::*;
use crate::algebra::VectorMath;
use crate::solver::core::ConeBlock;
use std::iter::zip;
use std::ops::Range;

// -------------------------------------
// composite cone type
// -------------------------------------

/// The product of the cones of a problem, in row order.
pub struct CompositeCone<T: FloatT = f64> {
    cones: Vec<SupportedCone<T>>,

    //overall size of the composite cone
    pub(crate) numel: usize,

    //ranges for the indices of the constituent cones
    pub(crate) rng_cones: Vec<Range<usize>>,
}

impl<T> CompositeCone<T>
where
    T: FloatT,
{
    pub fn new(blocks: &[ConeBlock]) -> Self {
        let cones: Vec<SupportedCone<T>> = blocks.iter().map(make_cone).collect();

        let numel = cones.iter().map(|c| c.numel()).sum();
        let rng_cones = _make_rng_cones(&cones);

        Self {
            cones,
            numel,
            rng_cones,
        }
    }

    pub fn len(&self) -> usize {
        self.cones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cones.is_empty()
    }

    pub fn numel(&self) -> usize {
        self.numel
    }

    /// Writes into `δ` the corrections needed so that `e.*δ` is
    /// uniform on every cone that can't be scaled elementwise.
    /// Returns true if any correction is not one.
    pub fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool {
        let mut any_changed = false;

        //we will update e <- δ .* e using return values
        //from this function.  default is to do nothing at all
        δ.set(T::one());

        for (cone, rng) in zip(&self.cones, &self.rng_cones) {
            let δi = &mut δ[rng.clone()];
            let ei = &e[rng.clone()];
            any_changed |= cone.rectify_equilibration(δi, ei);
        }
        any_changed
    }

    pub fn project(&mut self, x: &mut [T]) {
        for (cone, rng) in zip(&mut self.cones, &self.rng_cones) {
            cone.project(&mut x[rng.clone()]);
        }
    }

    pub fn project_dual(&mut self, x: &mut [T]) {
        for (cone, rng) in zip(&mut self.cones, &self.rng_cones) {
            cone.project_dual(&mut x[rng.clone()]);
        }
    }
}

fn _make_rng_cones<T>(cones: &[SupportedCone<T>]) -> Vec<Range<usize>>
where
    T: FloatT,
{
    let mut rngs = Vec::with_capacity(cones.len());

    let mut start = 0;
    for cone in cones {
        let stop = start + cone.numel();
        rngs.push(start..stop);
        start = stop;
    }
    rngs
}

#[test]
fn test_composite_cone() {
    let blocks = [
        ConeBlock::Zero(1),
        ConeBlock::Nonneg(2),
        ConeBlock::Soc(3),
        ConeBlock::Psd(2),
        ConeBlock::Exp,
        ConeBlock::Power(-0.5),
    ];
    let mut K = CompositeCone::<f64>::new(&blocks);
    assert_eq!(K.len(), 6);
    assert_eq!(K.numel(), 1 + 2 + 3 + 3 + 3 + 3);
    assert_eq!(K.rng_cones[2], 3..6);

    let mut x = vec![1.; K.numel()];
    x[1] = -1.;
    K.project(&mut x);
    assert_eq!(&x[0..3], &[0., 0., 1.]);

    // uniform corrections on the non-separable cones
    let mut e = vec![1.; K.numel()];
    e[3] = 2.;
    let mut δ = vec![0.; K.numel()];
    assert!(K.rectify_equilibration(&mut δ, &e));
    assert_eq!(&δ[0..3], &[1., 1., 1.]);
    let mut scaled = e.clone();
    scaled.hadamard(&δ);
    assert!(scaled[3..6].norm_inf_diff(&[4. / 3.; 3]) < 1e-14);
}
