#![allow(non_snake_case)]

use crate::algebra::{DenseFactorizationError, FloatT, Matrix, ShapedMatrix};

/// Symmetric eigendecomposition by cyclic Jacobi rotations.
///
/// The matrices handled here are the small blocks of positive
/// semidefinite cones, so an O(n³)-per-sweep method without
/// BLAS/LAPACK support is adequate.
#[derive(Debug, Clone)]
pub struct EigEngine<T> {
    /// Computed eigenvalues (unordered)
    pub λ: Vec<T>,

    /// Computed eigenvectors, stored by column
    pub V: Matrix<T>,
}

impl<T> EigEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        Self {
            λ: vec![T::zero(); n],
            V: Matrix::identity(n),
        }
    }

    /// Decompose the symmetric matrix `A`.  `A` is overwritten with a
    /// (nearly) diagonal matrix.
    pub fn eigen(&mut self, A: &mut Matrix<T>) -> Result<(), DenseFactorizationError> {
        let n = self.λ.len();
        if !A.is_square() || A.nrows() != n {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        self.V.set_identity();
        let V = &mut self.V;

        let tol = T::epsilon() * T::epsilon();
        let two = T::one() + T::one();
        const MAX_SWEEPS: usize = 64;

        for _ in 0..MAX_SWEEPS {
            let mut conv = true;

            for i in 0..n {
                for j in (i + 1)..n {
                    let a = A[(i, i)];
                    let b = A[(j, j)];
                    let d = A[(i, j)];

                    if (d * d > tol * a.abs() * b.abs()) && (d * d > tol) {
                        conv = false;

                        let ζ = (b - a) / (two * d);
                        let t = if ζ > T::zero() {
                            T::one() / (ζ + (T::one() + ζ * ζ).sqrt())
                        } else {
                            -T::one() / (-ζ + (T::one() + ζ * ζ).sqrt())
                        };
                        let c = (T::one() + t * t).sqrt().recip();
                        let s = c * t;

                        // two-sided rotation A <- G'AG
                        for k in 0..n {
                            let xi = A[(k, i)];
                            let xj = A[(k, j)];
                            A[(k, i)] = c * xi - s * xj;
                            A[(k, j)] = s * xi + c * xj;
                        }
                        for k in 0..n {
                            let xi = A[(i, k)];
                            let xj = A[(j, k)];
                            A[(i, k)] = c * xi - s * xj;
                            A[(j, k)] = s * xi + c * xj;
                        }
                        for k in 0..n {
                            let zi = V[(k, i)];
                            let zj = V[(k, j)];
                            V[(k, i)] = c * zi - s * zj;
                            V[(k, j)] = s * zi + c * zj;
                        }
                        A[(i, j)] = T::zero();
                        A[(j, i)] = T::zero();
                    }
                }
            }
            if conv {
                break;
            }
        }

        for i in 0..n {
            self.λ[i] = A[(i, i)];
        }
        Ok(())
    }
}

#[test]
fn test_eigen() {
    use crate::algebra::VectorMath;

    #[rustfmt::skip]
    let mut S = Matrix::from(
        &[[ 2., 1., 0.],
          [ 1., 2., 0.],
          [ 0., 0., 5.]]);

    let mut eng = EigEngine::<f64>::new(3);
    assert!(eng.eigen(&mut S).is_ok());

    let mut λ = eng.λ.clone();
    λ.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!(λ.norm_inf_diff(&[1., 3., 5.]) < 1e-12);

    // eigenvectors are orthonormal
    for i in 0..3 {
        for j in 0..3 {
            let d = eng.V.col_slice(i).dot(eng.V.col_slice(j));
            let expected = if i == j { 1. } else { 0. };
            assert!((d - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn test_eigen_engine_reuse() {
    use crate::algebra::VectorMath;

    let mut eng = EigEngine::<f64>::new(2);

    #[rustfmt::skip]
    let mut S = Matrix::from(
        &[[ 0., 1.],
          [ 1., 0.]]);
    assert!(eng.eigen(&mut S).is_ok());
    let vptr = eng.V.data.as_ptr();

    // a diagonal matrix needs no rotations, so V must come back as the
    // identity rather than the previous eigenvectors
    #[rustfmt::skip]
    let mut D = Matrix::from(
        &[[ 4., 0.],
          [ 0., 7.]]);
    assert!(eng.eigen(&mut D).is_ok());

    assert!(eng.λ.norm_inf_diff(&[4., 7.]) < 1e-14);
    assert!(eng.V.data.norm_inf_diff(&[1., 0., 0., 1.]) < 1e-14);
    assert_eq!(eng.V.data.as_ptr(), vptr);
}
