use super::Cone;
use crate::algebra::*;
use core::marker::PhantomData;

// -------------------------------------
// Nonnegative Cone
// -------------------------------------

pub struct NonnegativeCone<T: FloatT = f64> {
    dim: usize,
    phantom: PhantomData<T>,
}

impl<T> NonnegativeCone<T>
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

impl<T> Cone<T> for NonnegativeCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    fn rectify_equilibration(&self, δ: &mut [T], _e: &[T]) -> bool {
        δ.set(T::one());
        false
    }

    fn project(&mut self, x: &mut [T]) {
        x.scalarop(|v| T::max(v, T::zero()));
    }

    fn project_dual(&mut self, x: &mut [T]) {
        // self dual
        self.project(x);
    }
}

#[test]
fn test_nonneg_projection() {
    let mut K = NonnegativeCone::<f64>::new(3);
    let mut x = vec![-1., 0., 2.];
    K.project(&mut x);
    assert_eq!(x, vec![0., 0., 2.]);
}
