use super::{rectify_to_mean, Cone};
use crate::algebra::*;
use core::marker::PhantomData;

// -------------------------------------
// Second order Cone
// -------------------------------------

pub struct SecondOrderCone<T: FloatT = f64> {
    dim: usize,
    phantom: PhantomData<T>,
}

impl<T> SecondOrderCone<T>
where
    T: FloatT,
{
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for SecondOrderCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool {
        rectify_to_mean(δ, e)
    }

    fn project(&mut self, x: &mut [T]) {
        _soc_project(x);
    }

    fn project_dual(&mut self, x: &mut [T]) {
        // self dual
        _soc_project(x);
    }
}

// ---------------------------------------------
// operations supported by second order cones
// ---------------------------------------------

fn _soc_project<T: FloatT>(x: &mut [T]) {
    if x.is_empty() {
        return;
    }
    let t = x[0];
    let z = &mut x[1..];
    let nz = z.norm();

    if nz <= t {
        // in the cone already
    } else if nz <= -t {
        // in the polar cone
        x.set(T::zero());
    } else {
        let α = (t + nz) * (0.5).as_T();
        z.scale(α / nz);
        x[0] = α;
    }
}

#[test]
fn test_soc_projection() {
    let mut K = SecondOrderCone::<f64>::new(3);

    // interior point is unchanged
    let mut x = vec![2., 1., 1.];
    K.project(&mut x);
    assert_eq!(x, vec![2., 1., 1.]);

    // polar point maps to zero
    let mut x = vec![-2., 1., 1.];
    K.project(&mut x);
    assert_eq!(x, vec![0., 0., 0.]);

    // general point lands on the boundary
    let mut x = vec![0., 3., 4.];
    K.project(&mut x);
    assert!(x.norm_inf_diff(&[2.5, 1.5, 2.]) < 1e-14);
}
