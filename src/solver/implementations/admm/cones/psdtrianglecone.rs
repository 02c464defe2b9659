use super::{rectify_to_mean, Cone};
use crate::algebra::*;

// ------------------------------------
// Positive Semidefinite Cone (Scaled triangular form)
// ------------------------------------

pub struct PSDConeData<T> {
    Eig: EigEngine<T>,
    workmat: Matrix<T>,
}

/// Positive semidefinite cone of `k×k` matrices, stored as the lower
/// triangle by columns with off-diagonal entries scaled by √2.
pub struct PSDTriangleCone<T: FloatT = f64> {
    k: usize,
    numel: usize,
    // Boxed so that the PSDTriangleCone enum_dispatch variant isn't huge
    data: Box<PSDConeData<T>>,
}

impl<T> PSDTriangleCone<T>
where
    T: FloatT,
{
    pub fn new(k: usize) -> Self {
        Self {
            k,
            numel: triangular_number(k),
            data: Box::new(PSDConeData {
                Eig: EigEngine::new(k),
                workmat: Matrix::zeros((k, k)),
            }),
        }
    }
}

impl<T> Cone<T> for PSDTriangleCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.numel
    }

    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool {
        rectify_to_mean(δ, e)
    }

    fn project(&mut self, x: &mut [T]) {
        match self.k {
            0 => {}
            1 => x[0] = T::max(x[0], T::zero()),
            _ => self._project_eig(x),
        }
    }

    fn project_dual(&mut self, x: &mut [T]) {
        // self dual
        self.project(x);
    }
}

impl<T> PSDTriangleCone<T>
where
    T: FloatT,
{
    fn _project_eig(&mut self, x: &mut [T]) {
        let k = self.k;
        let data = &mut *self.data;
        let X = &mut data.workmat;

        svec_to_mat(X, x);

        if data.Eig.eigen(X).is_err() {
            // dimensions are fixed at construction
            unreachable!("PSD workspace has mismatched dimensions");
        }

        // X = V*max(λ,0)*V'
        let (λ, V) = (&data.Eig.λ, &data.Eig.V);
        X.data.fill(T::zero());
        for (l, &λl) in λ.iter().enumerate() {
            if λl <= T::zero() {
                continue;
            }
            let v = V.col_slice(l);
            for j in 0..k {
                let vj = λl * v[j];
                for i in j..k {
                    X[(i, j)] += v[i] * vj;
                }
            }
        }

        mat_to_svec(x, X);
    }
}

// unpack the scaled lower triangle into a full symmetric matrix
fn svec_to_mat<T: FloatT>(M: &mut Matrix<T>, x: &[T]) {
    let k = M.nrows();
    let isqrt2 = T::FRAC_1_SQRT_2();
    let mut idx = 0;
    for j in 0..k {
        for i in j..k {
            let v = if i == j { x[idx] } else { x[idx] * isqrt2 };
            M[(i, j)] = v;
            M[(j, i)] = v;
            idx += 1;
        }
    }
}

// pack the lower triangle of M, scaling off diagonals
fn mat_to_svec<T: FloatT>(x: &mut [T], M: &Matrix<T>) {
    let k = M.nrows();
    let sqrt2 = T::SQRT_2();
    let mut idx = 0;
    for j in 0..k {
        for i in j..k {
            x[idx] = if i == j { M[(i, j)] } else { M[(i, j)] * sqrt2 };
            idx += 1;
        }
    }
}

#[test]
fn test_psd_projection() {
    let mut K = PSDTriangleCone::<f64>::new(2);

    // [[1, 2], [2, 1]] has eigenvalues 3 and -1.  The projection
    // keeps the λ = 3 part, i.e. 1.5*[[1, 1], [1, 1]]
    let s2 = f64::sqrt(2.);
    let mut x = vec![1., 2. * s2, 1.];
    K.project(&mut x);
    assert!(x.norm_inf_diff(&[1.5, 1.5 * s2, 1.5]) < 1e-10);

    // PSD points are fixed
    let mut x = vec![2., 0.5 * s2, 3.];
    let x0 = x.clone();
    K.project(&mut x);
    assert!(x.norm_inf_diff(&x0) < 1e-10);

    // negative definite points map to zero
    let mut x = vec![-1., 0., -2.];
    K.project(&mut x);
    assert!(x.norm_inf() < 1e-12);
}
