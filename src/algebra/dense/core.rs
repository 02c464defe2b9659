#![allow(non_snake_case)]

use crate::algebra::*;
use std::ops::{Index, IndexMut};

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    /// overwrite a square matrix with the identity, in place
    pub fn set_identity(&mut self) {
        assert!(self.is_square());
        self.data.fill(T::zero());
        for i in 0..self.n {
            self[(i, i)] = T::one();
        }
    }

    /// column `col` as a slice
    pub fn col_slice(&self, col: usize) -> &[T] {
        &self.data[col * self.m..(col + 1) * self.m]
    }

    #[inline]
    fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }
}

impl<T> ShapedMatrix for Matrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

impl<T: FloatT> Index<(usize, usize)> for Matrix<T> {
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data[self.index_linear(idx)]
    }
}

impl<T: FloatT> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

impl<T: FloatT> MatrixVectorMultiply for Matrix<T> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        assert_eq!(y.len(), self.m);
        y.scale(b);
        for (j, &xj) in x.iter().enumerate() {
            y.axpby(a * xj, self.col_slice(j), T::one());
        }
    }
}

impl<T: FloatT, const N: usize> From<&[[T; N]]> for Matrix<T> {
    #[rustfmt::skip]
    fn from(rows: &[[T; N]]) -> Matrix<T> {
        let m = rows.len();
        let mut mat = Matrix::zeros((m, N));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                mat[(i, j)] = v;
            }
        }
        mat
    }
}

impl<T: FloatT, const M: usize, const N: usize> From<&[[T; N]; M]> for Matrix<T> {
    fn from(rows: &[[T; N]; M]) -> Matrix<T> {
        Matrix::from(&rows[..])
    }
}

#[test]
fn test_dense_gemv() {
    #[rustfmt::skip]
    let A = Matrix::from(
        &[[1., 2.],
          [3., 4.],
          [5., 6.]]);
    let mut y = vec![0.; 3];
    A.gemv(&mut y, &[1., 1.], 1.0, 0.0);
    assert_eq!(y, vec![3., 7., 11.]);
    assert_eq!(A.size(), (3, 2));
}
