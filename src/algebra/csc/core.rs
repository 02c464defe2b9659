#![allow(non_snake_case)]

use crate::algebra::{Adjoint, CscMatrix, FloatT, Matrix, ShapedMatrix, SparseFormatError};

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use conicache::algebra::CscMatrix;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 //colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        //rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], //nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
///
/// ```
///
impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// `CscMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.   This constructor does __not__
    /// ensure that rows indices are all in bounds or that data is arranged
    /// such that entries within each column appear in order of increasing
    /// row index.   Use [`check_format`](CscMatrix::check_format) for that.
    ///
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// Assemble an `m x n` matrix from triplets `(I[k], J[k], V[k])`.
    ///
    /// Entries sharing a (row, col) pair are summed, and the result is
    /// sorted by row index within each column.
    pub fn new_from_triplets(
        m: usize,
        n: usize,
        I: &[usize],
        J: &[usize],
        V: &[T],
    ) -> Result<Self, SparseFormatError> {
        if I.len() != J.len() || I.len() != V.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if I.iter().any(|&r| r >= m) {
            return Err(SparseFormatError::BadRowval);
        }
        if J.iter().any(|&c| c >= n) {
            return Err(SparseFormatError::BadColptr);
        }

        // bucket by column, then sort and merge each column
        let mut order: Vec<usize> = (0..V.len()).collect();
        order.sort_by_key(|&k| (J[k], I[k]));

        let mut colptr = vec![0usize; n + 1];
        let mut rowval = Vec::with_capacity(V.len());
        let mut nzval: Vec<T> = Vec::with_capacity(V.len());
        let mut last: Option<(usize, usize)> = None;

        for k in order {
            let key = (J[k], I[k]);
            if last == Some(key) {
                if let Some(v) = nzval.last_mut() {
                    *v += V[k];
                }
            } else {
                rowval.push(I[k]);
                nzval.push(V[k]);
                colptr[J[k] + 1] += 1;
                last = Some(key);
            }
        }
        for col in 0..n {
            colptr[col + 1] += colptr[col];
        }

        Ok(CscMatrix::new(m, n, colptr, rowval, nzval))
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// transpose
    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty()
            || (self.colptr.len() - 1) != self.n
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr[0] != 0 {
            return Err(SparseFormatError::BadColptr);
        }

        //check for colptr monotonicity
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        //check for row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        //check for rowval monotonicity within each column
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }

        Ok(())
    }

    /// Forms the dense Gram matrix `AᵀA + σI`.
    pub fn gram_plus_diag(&self, σ: T) -> Matrix<T> {
        let n = self.n;
        let mut G = Matrix::zeros((n, n));

        // scatter each column into a dense work vector and
        // take inner products against the later columns
        let mut work = vec![T::zero(); self.m];
        for j in 0..n {
            for k in self.colptr[j]..self.colptr[j + 1] {
                work[self.rowval[k]] = self.nzval[k];
            }
            for i in j..n {
                let mut acc = T::zero();
                for k in self.colptr[i]..self.colptr[i + 1] {
                    acc += work[self.rowval[k]] * self.nzval[k];
                }
                G[(i, j)] = acc;
                G[(j, i)] = acc;
            }
            for k in self.colptr[j]..self.colptr[j + 1] {
                work[self.rowval[k]] = T::zero();
            }
            G[(j, j)] += σ;
        }
        G
    }

}

impl<T> ShapedMatrix for CscMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
    fn size(&self) -> (usize, usize) {
        (self.m, self.n)
    }
    fn is_square(&self) -> bool {
        self.m == self.n
    }
}

#[test]
fn test_csc_from_triplets() {
    // duplicates are summed, output is sorted
    let I = vec![2, 0, 1, 0];
    let J = vec![0, 1, 0, 1];
    let V = vec![3., 1., 2., 4.];
    let A = CscMatrix::new_from_triplets(3, 2, &I, &J, &V).unwrap();

    assert_eq!(A.colptr, vec![0, 2, 3]);
    assert_eq!(A.rowval, vec![1, 2, 0]);
    assert_eq!(A.nzval, vec![2., 3., 5.]);
    assert!(A.check_format().is_ok());

    assert_eq!(
        CscMatrix::new_from_triplets(2, 2, &[3], &[0], &[1.]),
        Err(SparseFormatError::BadRowval)
    );
}

#[test]
fn test_csc_check_format() {
    let mut A = CscMatrix::<f64>::identity(3);
    assert!(A.check_format().is_ok());

    A.rowval[1] = 5;
    assert_eq!(A.check_format(), Err(SparseFormatError::BadRowval));

    let A = CscMatrix::new(3, 1, vec![0, 2], vec![2, 1], vec![1., 1.]);
    assert_eq!(A.check_format(), Err(SparseFormatError::BadRowOrdering));
}

#[test]
fn test_csc_gram() {
    // A = [1 2; 0 3]
    let A = CscMatrix::new(2, 2, vec![0, 1, 3], vec![0, 0, 1], vec![1., 2., 3.]);
    let G = A.gram_plus_diag(0.5);
    assert_eq!(G.data, vec![1.5, 2., 2., 13.5]);
}
