#![allow(non_snake_case)]

use crate::algebra::{DenseFactorizationError, FloatT, Matrix, ShapedMatrix};

/// Dense Cholesky factorization `A = L*L'` of a symmetric positive
/// definite matrix.
#[derive(Debug, Clone)]
pub struct CholeskyEngine<T> {
    /// lower triangular factor (stored as square dense)
    pub L: Matrix<T>,
}

impl<T> CholeskyEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        let L = Matrix::<T>::zeros((n, n));
        Self { L }
    }

    /// Factor `A`, looking only at its lower triangle.
    pub fn cholesky(&mut self, A: &Matrix<T>) -> Result<(), DenseFactorizationError> {
        if A.size() != self.L.size() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        let n = self.L.nrows();
        let L = &mut self.L;
        L.data.fill(T::zero());

        for j in 0..n {
            let mut d = A[(j, j)];
            for k in 0..j {
                d -= L[(j, k)] * L[(j, k)];
            }
            if !(d > T::zero()) {
                return Err(DenseFactorizationError::Cholesky(j));
            }
            let ljj = d.sqrt();
            L[(j, j)] = ljj;

            for i in (j + 1)..n {
                let mut v = A[(i, j)];
                for k in 0..j {
                    v -= L[(i, k)] * L[(j, k)];
                }
                L[(i, j)] = v / ljj;
            }
        }
        Ok(())
    }

    /// Solve `A*x = b` in place using the computed factor.
    pub fn solve(&self, b: &mut [T]) {
        let L = &self.L;
        let n = L.nrows();
        assert_eq!(b.len(), n);

        // forward solve L*z = b
        for i in 0..n {
            let mut v = b[i];
            for k in 0..i {
                v -= L[(i, k)] * b[k];
            }
            b[i] = v / L[(i, i)];
        }
        // backward solve L'*x = z
        for i in (0..n).rev() {
            let mut v = b[i];
            for k in (i + 1)..n {
                v -= L[(k, i)] * b[k];
            }
            b[i] = v / L[(i, i)];
        }
    }
}

#[test]
fn test_cholesky() {
    use crate::algebra::{MatrixVectorMultiply, VectorMath};

    #[rustfmt::skip]
    let S = Matrix::from(
        &[[ 8., -2., 4.],
          [-2., 12., 2.],
          [ 4.,  2., 6.]]);

    let mut eng = CholeskyEngine::<f64>::new(3);
    assert!(eng.cholesky(&S).is_ok());

    let xtrue = vec![1., -2., 3.];
    let mut b = vec![0.; 3];
    S.gemv(&mut b, &xtrue, 1.0, 0.0);
    eng.solve(&mut b);
    assert!(b.norm_inf_diff(&xtrue) < 1e-10);

    #[rustfmt::skip]
    let N = Matrix::from(
        &[[ 1., 2.],
          [ 2., 1.]]);
    let mut eng = CholeskyEngine::<f64>::new(2);
    assert_eq!(
        eng.cholesky(&N),
        Err(DenseFactorizationError::Cholesky(1))
    );
}
