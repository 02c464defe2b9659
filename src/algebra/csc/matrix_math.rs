use crate::algebra::*;
use std::iter::zip;

impl<T: FloatT> MatrixVectorMultiply for CscMatrix<T> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_N(self, y, x, a, b);
    }
}

impl<T: FloatT> MatrixVectorMultiply for Adjoint<'_, CscMatrix<T>> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_T(self.src, y, x, a, b);
    }
}

impl<T: FloatT> MatrixMath for CscMatrix<T> {
    type T = T;

    fn scale(&mut self, c: T) {
        self.nzval.scale(c);
    }

    fn col_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.colptr.len() - 1);
        norms.fill(T::zero());

        for (i, v) in norms.iter_mut().enumerate() {
            *v = self.nzval[self.colptr[i]..self.colptr[i + 1]]
                .iter()
                .fold(*v, |m, &nzval| T::max(m, T::abs(nzval)));
        }
    }

    fn row_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.m);
        norms.fill(T::zero());

        for (row, val) in zip(&self.rowval, &self.nzval) {
            norms[*row] = T::max(norms[*row], T::abs(*val));
        }
    }

    fn col_norms_two(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.n);

        for (i, v) in norms.iter_mut().enumerate() {
            *v = self.nzval[self.colptr[i]..self.colptr[i + 1]].norm();
        }
    }

    fn lrscale(&mut self, l: &[T], r: &[T]) {
        assert_eq!(self.nzval.len(), self.nnz());

        for (col, &ri) in r.iter().enumerate() {
            let (first, last) = (self.colptr[col], self.colptr[col + 1]);
            let vals = &mut self.nzval[first..last];
            let rows = &self.rowval[first..last];

            for (val, row) in zip(vals, rows) {
                *val *= l[*row] * ri;
            }
        }
    }
}

// sparse matrix-vector multiply, no transpose
#[allow(non_snake_case)]
fn _csc_axpby_N<T: FloatT>(A: &CscMatrix<T>, y: &mut [T], x: &[T], a: T, b: T) {
    //first do the b*y part
    if b == T::zero() {
        y.fill(T::zero());
    } else if b == T::one() {
    } else if b == -T::one() {
        y.negate();
    } else {
        y.scale(b);
    }

    // if a is zero, we're done
    if a == T::zero() {
        return;
    }

    assert_eq!(A.nzval.len(), A.nnz());
    assert_eq!(x.len(), A.n);
    assert_eq!(y.len(), A.m);

    //y += A*x
    if a == T::one() {
        for (j, xj) in x.iter().enumerate().take(A.n) {
            for i in A.colptr[j]..A.colptr[j + 1] {
                y[A.rowval[i]] += A.nzval[i] * *xj;
            }
        }
    } else if a == -T::one() {
        for (j, xj) in x.iter().enumerate().take(A.n) {
            for i in A.colptr[j]..A.colptr[j + 1] {
                y[A.rowval[i]] -= A.nzval[i] * *xj;
            }
        }
    } else {
        for (j, xj) in x.iter().enumerate().take(A.n) {
            for i in A.colptr[j]..A.colptr[j + 1] {
                y[A.rowval[i]] += a * A.nzval[i] * *xj;
            }
        }
    }
}

// sparse matrix-vector multiply, transposed
#[allow(non_snake_case)]
fn _csc_axpby_T<T: FloatT>(A: &CscMatrix<T>, y: &mut [T], x: &[T], a: T, b: T) {
    //first do the b*y part
    if b == T::zero() {
        y.fill(T::zero());
    } else if b == T::one() {
    } else if b == -T::one() {
        y.negate();
    } else {
        y.scale(b);
    }

    // if a is zero, we're done
    if a == T::zero() {
        return;
    }

    assert_eq!(A.nzval.len(), A.nnz());
    assert_eq!(x.len(), A.m);
    assert_eq!(y.len(), A.n);

    //y += A'*x
    for (j, yj) in y.iter_mut().enumerate().take(A.n) {
        let mut acc = T::zero();
        for k in A.colptr[j]..A.colptr[j + 1] {
            acc += A.nzval[k] * x[A.rowval[k]];
        }
        *yj += a * acc;
    }
}

#[test]
fn test_csc_gemv() {
    // A = [1 2; 0 3; 4 0]
    let A = CscMatrix::new(
        3,
        2,
        vec![0, 2, 4],
        vec![0, 2, 0, 1],
        vec![1., 4., 2., 3.],
    );
    let x = vec![1., -1.];
    let mut y = vec![1., 1., 1.];
    A.gemv(&mut y, &x, 2.0, 1.0);
    assert_eq!(y, vec![-1., -5., 9.]);

    let z = vec![1., 1., 1.];
    let mut w = vec![0.; 2];
    A.t().gemv(&mut w, &z, -1.0, 0.0);
    assert_eq!(w, vec![-5., -5.]);
}

#[test]
fn test_csc_norms_and_scaling() {
    let mut A = CscMatrix::new(
        3,
        2,
        vec![0, 2, 4],
        vec![0, 2, 0, 1],
        vec![1., -4., 2., 3.],
    );
    let mut cn = vec![0.; 2];
    let mut rn = vec![0.; 3];
    A.col_norms(&mut cn);
    A.row_norms(&mut rn);
    assert_eq!(cn, vec![4., 3.]);
    assert_eq!(rn, vec![2., 3., 4.]);

    A.lrscale(&[1., 2., 3.], &[1., 0.5]);
    assert_eq!(A.nzval, vec![1., -12., 1., 3.]);
}
