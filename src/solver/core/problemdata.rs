#![allow(non_snake_case)]

use crate::algebra::{CscMatrix, SparseFormatError};
use crate::solver::core::cones::ConeSpec;
use crate::solver::core::error::{Error, Result};
use crate::solver::core::inputs::*;
use std::fmt;
use std::sync::Arc;

/// Non-fatal coercions applied while preparing problem data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataWarning {
    /// The matrix was converted from the given layout to CSC
    ConvertedToCsc(SparseLayout),
    /// Index and pointer arrays of the given type were widened to int64
    ConvertedIndices(Dtype),
    /// Matrix values of the given type were converted to float64
    ConvertedValues(Dtype),
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::ConvertedToCsc(layout) => write!(
                f,
                "converting A from {} to CSC (compressed sparse column); may take a while",
                layout
            ),
            DataWarning::ConvertedIndices(dtype) => write!(
                f,
                "converting A index and pointer arrays from {} to int64",
                dtype
            ),
            DataWarning::ConvertedValues(dtype) => {
                write!(f, "converting A values from {} to float64", dtype)
            }
        }
    }
}

/// Validated problem data in the canonical format required by a backend.
///
/// The matrix is CSC with `int64` index arrays and `float64` values, and
/// `b`, `c` are `float64` vectors of matching length.  Where the caller's
/// data was already canonical the same shared objects are held; otherwise
/// new ones were created and the caller's objects left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemData {
    A: Arc<SparseMatrix>,
    b: Arc<DenseArray>,
    c: Arc<DenseArray>,
    warnings: Vec<DataWarning>,
}

impl ProblemData {
    /// Validate and coerce `data` against `cone`.
    pub fn prepare(data: &ProblemInput, cone: &ConeSpec) -> Result<ProblemData> {
        let A = data.a.as_ref().ok_or(Error::MissingField("A"))?;
        let b = data.b.as_ref().ok_or(Error::MissingField("b"))?;
        let c = data.c.as_ref().ok_or(Error::MissingField("c"))?;

        let A = match A {
            MatrixInput::Sparse(A) => A,
            MatrixInput::Dense(_) => {
                return Err(Error::TypeMismatch {
                    field: "A",
                    found: "a dense array",
                })
            }
        };

        let mut warnings = Vec::new();
        let mut emit = |w: DataWarning| {
            log::warn!("{}", w);
            warnings.push(w);
        };

        // layout conversion first, so that shapes are known
        let A = if A.layout() == SparseLayout::Csc {
            Arc::clone(A)
        } else {
            emit(DataWarning::ConvertedToCsc(A.layout()));
            Arc::new(to_canonical_csc(A)?)
        };

        check_vectors(b, c, A.nrows, A.ncols)?;

        let A = match coerce_csc_types(&A, &mut emit) {
            Some(newA) => Arc::new(newA),
            None => A,
        };

        check_csc_format(&A)?;

        let dim = cone.dimension()?;
        if dim == 0 || dim != A.nrows {
            return Err(Error::ConeRowMismatch {
                cone_rows: dim,
                matrix_rows: A.nrows,
            });
        }

        Ok(ProblemData {
            A,
            b: Arc::clone(b),
            c: Arc::clone(c),
            warnings,
        })
    }

    /// Number of rows of `A`
    pub fn m(&self) -> usize {
        self.A.nrows
    }

    /// Number of columns of `A`
    pub fn n(&self) -> usize {
        self.A.ncols
    }

    /// The canonical matrix object
    pub fn a(&self) -> &Arc<SparseMatrix> {
        &self.A
    }

    /// The `b` vector object
    pub fn b(&self) -> &Arc<DenseArray> {
        &self.b
    }

    /// The `c` vector object
    pub fn c(&self) -> &Arc<DenseArray> {
        &self.c
    }

    /// Coercions applied by [`prepare`](ProblemData::prepare)
    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    /// Borrowed view of the canonical matrix
    pub fn csc(&self) -> CscView<'_> {
        match self.A.as_csc_view() {
            Some(view) => view,
            None => unreachable!("prepared problem data always holds canonical CSC"),
        }
    }

    pub fn b_values(&self) -> &[f64] {
        float64_values(&self.b)
    }

    pub fn c_values(&self) -> &[f64] {
        float64_values(&self.c)
    }

    /// Replace `b` and/or `c`.  Both replacements are validated before
    /// either is applied.
    pub(crate) fn replace_vectors(
        &mut self,
        b: Option<&Arc<DenseArray>>,
        c: Option<&Arc<DenseArray>>,
    ) -> Result<()> {
        if let Some(b) = b {
            check_vector("b", b, self.m())?;
        }
        if let Some(c) = c {
            check_vector("c", c, self.n())?;
        }
        if let Some(b) = b {
            self.b = Arc::clone(b);
        }
        if let Some(c) = c {
            self.c = Arc::clone(c);
        }
        Ok(())
    }
}

impl From<&ProblemData> for ProblemInput {
    fn from(data: &ProblemData) -> Self {
        ProblemInput {
            a: Some(MatrixInput::Sparse(Arc::clone(&data.A))),
            b: Some(Arc::clone(&data.b)),
            c: Some(Arc::clone(&data.c)),
        }
    }
}

fn float64_values(v: &DenseArray) -> &[f64] {
    match v.as_f64() {
        Some(values) => values,
        None => unreachable!("prepared problem data always holds float64 vectors"),
    }
}

// ---------------------------------------------------------
// vector checks
// ---------------------------------------------------------

/// Check that `v` is a rank-1 `float64` array of length `len`.
pub fn check_vector(field: &'static str, v: &DenseArray, len: usize) -> Result<()> {
    check_vector_shape(field, v, len)?;
    check_vector_dtype(field, v)
}

/// Check `b` and `c` against an `m × n` matrix.  Shapes are checked
/// before element types.
pub fn check_vectors(b: &DenseArray, c: &DenseArray, m: usize, n: usize) -> Result<()> {
    check_vector_shape("b", b, m)?;
    check_vector_shape("c", c, n)?;
    check_vector_dtype("b", b)?;
    check_vector_dtype("c", c)
}

fn check_vector_shape(field: &'static str, v: &DenseArray, len: usize) -> Result<()> {
    if v.ndim() != 1 || v.len() != len {
        return Err(Error::ShapeMismatch {
            field,
            expected: len,
            found: v.shape.clone(),
        });
    }
    Ok(())
}

fn check_vector_dtype(field: &'static str, v: &DenseArray) -> Result<()> {
    if v.dtype() != Dtype::Float64 {
        return Err(Error::DtypeMismatch {
            field,
            found: v.dtype(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------
// matrix coercions
// ---------------------------------------------------------

// Returns a new matrix if the index or value arrays of a CSC
// matrix need widening, or None if it is already canonical
fn coerce_csc_types(
    A: &SparseMatrix,
    emit: &mut impl FnMut(DataWarning),
) -> Option<SparseMatrix> {
    let SparseStorage::Csc {
        colptr,
        rowval,
        nzval,
    } = &A.storage
    else {
        return None;
    };

    let fix_indices = colptr.dtype() != Dtype::Int64 || rowval.dtype() != Dtype::Int64;
    let fix_values = nzval.dtype() != Dtype::Float64;

    if !fix_indices && !fix_values {
        return None;
    }

    if fix_indices {
        let from = if colptr.dtype() != Dtype::Int64 {
            colptr.dtype()
        } else {
            rowval.dtype()
        };
        emit(DataWarning::ConvertedIndices(from));
    }
    if fix_values {
        emit(DataWarning::ConvertedValues(nzval.dtype()));
    }

    Some(SparseMatrix::csc(
        A.nrows,
        A.ncols,
        colptr.to_i64_vec(),
        rowval.to_i64_vec(),
        nzval.to_f64_vec(),
    ))
}

fn to_index(
    i: i64,
    bound: usize,
    err: SparseFormatError,
) -> std::result::Result<usize, SparseFormatError> {
    usize::try_from(i).ok().filter(|&i| i < bound).ok_or(err)
}

// convert a compressed pointer array into per-entry major indices
fn expand_pointers(
    ptr: &[i64],
    nmajor: usize,
    nnz: usize,
) -> std::result::Result<Vec<usize>, SparseFormatError> {
    if ptr.len() != nmajor + 1 {
        return Err(SparseFormatError::IncompatibleDimension);
    }
    if ptr[0] != 0 || ptr.windows(2).any(|p| p[0] > p[1]) || ptr[nmajor] != nnz as i64 {
        return Err(SparseFormatError::BadColptr);
    }
    let mut major = Vec::with_capacity(nnz);
    for (k, p) in ptr.windows(2).enumerate() {
        major.extend(std::iter::repeat(k).take((p[1] - p[0]) as usize));
    }
    Ok(major)
}

// CSR or COO to CSC with int64 indices and float64 values.  Duplicate
// entries are summed and rows are sorted within each column.
fn to_canonical_csc(A: &SparseMatrix) -> Result<SparseMatrix> {
    let (m, n) = (A.nrows, A.ncols);

    let (I, J, V) = match &A.storage {
        SparseStorage::Csr {
            rowptr,
            colval,
            nzval,
        } => {
            if colval.len() != nzval.len() {
                return Err(SparseFormatError::IncompatibleDimension.into());
            }
            let I = expand_pointers(&rowptr.to_i64_vec(), m, nzval.len())?;
            let J = colval
                .to_i64_vec()
                .into_iter()
                .map(|j| to_index(j, n, SparseFormatError::BadColptr))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            (I, J, nzval.to_f64_vec())
        }
        SparseStorage::Coo { rows, cols, vals } => {
            if rows.len() != vals.len() || cols.len() != vals.len() {
                return Err(SparseFormatError::IncompatibleDimension.into());
            }
            let I = rows
                .to_i64_vec()
                .into_iter()
                .map(|i| to_index(i, m, SparseFormatError::BadRowval))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let J = cols
                .to_i64_vec()
                .into_iter()
                .map(|j| to_index(j, n, SparseFormatError::BadColptr))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            (I, J, vals.to_f64_vec())
        }
        SparseStorage::Csc { .. } => return Ok(A.clone()),
    };

    let csc = CscMatrix::new_from_triplets(m, n, &I, &J, &V)?;

    Ok(SparseMatrix::csc(
        m,
        n,
        csc.colptr.iter().map(|&p| p as i64).collect::<Vec<i64>>(),
        csc.rowval.iter().map(|&r| r as i64).collect::<Vec<i64>>(),
        csc.nzval,
    ))
}

/// Structural check of a canonical CSC matrix: pointer array of length
/// `n+1` starting at zero and non-decreasing up to `nnz`, row indices in
/// range and strictly increasing within each column.
pub fn check_csc_format(A: &SparseMatrix) -> std::result::Result<(), SparseFormatError> {
    let Some(A) = A.as_csc_view() else {
        return Err(SparseFormatError::IncompatibleDimension);
    };

    if A.rowval.len() != A.nzval.len() || A.colptr.len() != A.n + 1 {
        return Err(SparseFormatError::IncompatibleDimension);
    }
    if A.colptr[0] != 0
        || A.colptr.windows(2).any(|c| c[0] > c[1])
        || A.colptr[A.n] != A.nzval.len() as i64
    {
        return Err(SparseFormatError::BadColptr);
    }
    if A.rowval.iter().any(|&r| r < 0 || r >= A.m as i64) {
        return Err(SparseFormatError::BadRowval);
    }
    for col in 0..A.n {
        let rng = (A.colptr[col] as usize)..(A.colptr[col + 1] as usize);
        if A.rowval[rng].windows(2).any(|r| r[0] >= r[1]) {
            return Err(SparseFormatError::BadRowOrdering);
        }
    }
    Ok(())
}
