//! Loosely typed caller-facing containers.
//!
//! These types model the data a dynamically typed caller hands over: numeric
//! arrays of several element types, sparse matrices in CSC, CSR or COO
//! layout with 32- or 64-bit index arrays, and dense n-dimensional arrays.
//! Validation in [`ProblemData::prepare`](crate::solver::ProblemData::prepare)
//! turns them into the canonical form required by a backend.

#![allow(non_snake_case)]

use std::fmt;
use std::sync::Arc;

/// Element type of a numeric array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dtype {
    Float64,
    Float32,
    Int64,
    Int32,
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dtype::Float64 => "float64",
            Dtype::Float32 => "float32",
            Dtype::Int64 => "int64",
            Dtype::Int32 => "int32",
        };
        f.write_str(s)
    }
}

/// A flat numeric array of any supported element type
#[derive(Debug, Clone, PartialEq)]
pub enum NumericVec {
    F64(Vec<f64>),
    F32(Vec<f32>),
    I64(Vec<i64>),
    I32(Vec<i32>),
}

impl NumericVec {
    pub fn len(&self) -> usize {
        match self {
            NumericVec::F64(v) => v.len(),
            NumericVec::F32(v) => v.len(),
            NumericVec::I64(v) => v.len(),
            NumericVec::I32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            NumericVec::F64(_) => Dtype::Float64,
            NumericVec::F32(_) => Dtype::Float32,
            NumericVec::I64(_) => Dtype::Int64,
            NumericVec::I32(_) => Dtype::Int32,
        }
    }

    /// Borrow the data if it is already `float64`
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            NumericVec::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Element-wise copy into a new `float64` vector
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            NumericVec::F64(v) => v.clone(),
            NumericVec::F32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            NumericVec::I64(v) => v.iter().map(|&x| x as f64).collect(),
            NumericVec::I32(v) => v.iter().map(|&x| f64::from(x)).collect(),
        }
    }

    /// Copy element-wise into `dst`, converting to `float64`.
    ///
    /// # Panics
    /// Panics if the lengths differ.
    pub fn copy_into_f64(&self, dst: &mut [f64]) {
        assert_eq!(self.len(), dst.len());
        match self {
            NumericVec::F64(v) => dst.copy_from_slice(v),
            NumericVec::F32(v) => dst.iter_mut().zip(v).for_each(|(d, &x)| *d = f64::from(x)),
            NumericVec::I64(v) => dst.iter_mut().zip(v).for_each(|(d, &x)| *d = x as f64),
            NumericVec::I32(v) => dst.iter_mut().zip(v).for_each(|(d, &x)| *d = f64::from(x)),
        }
    }
}

macro_rules! impl_numeric_from {
    ($ty:ty, $variant:ident) => {
        impl From<Vec<$ty>> for NumericVec {
            fn from(v: Vec<$ty>) -> Self {
                NumericVec::$variant(v)
            }
        }
        impl From<&[$ty]> for NumericVec {
            fn from(v: &[$ty]) -> Self {
                NumericVec::$variant(v.to_vec())
            }
        }
    };
}
impl_numeric_from!(f64, F64);
impl_numeric_from!(f32, F32);
impl_numeric_from!(i64, I64);
impl_numeric_from!(i32, I32);

/// Index or pointer array of a sparse matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexVec {
    I64(Vec<i64>),
    I32(Vec<i32>),
}

impl IndexVec {
    pub fn len(&self) -> usize {
        match self {
            IndexVec::I64(v) => v.len(),
            IndexVec::I32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            IndexVec::I64(_) => Dtype::Int64,
            IndexVec::I32(_) => Dtype::Int32,
        }
    }

    /// Borrow the data if it is already `int64`
    pub fn as_i64(&self) -> Option<&[i64]> {
        match self {
            IndexVec::I64(v) => Some(v),
            IndexVec::I32(_) => None,
        }
    }

    pub fn to_i64_vec(&self) -> Vec<i64> {
        match self {
            IndexVec::I64(v) => v.clone(),
            IndexVec::I32(v) => v.iter().map(|&x| i64::from(x)).collect(),
        }
    }
}

impl From<Vec<i64>> for IndexVec {
    fn from(v: Vec<i64>) -> Self {
        IndexVec::I64(v)
    }
}
impl From<Vec<i32>> for IndexVec {
    fn from(v: Vec<i32>) -> Self {
        IndexVec::I32(v)
    }
}

/// A dense n-dimensional array stored in row major order
#[derive(Debug, Clone, PartialEq)]
pub struct DenseArray {
    pub shape: Vec<usize>,
    pub data: NumericVec,
}

impl DenseArray {
    /// An n-dimensional array.
    ///
    /// # Panics
    /// Panics if the product of `shape` does not match the data length.
    pub fn new(shape: Vec<usize>, data: impl Into<NumericVec>) -> Self {
        let data = data.into();
        assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { shape, data }
    }

    /// A rank-1 array holding `data`
    pub fn vector(data: impl Into<NumericVec>) -> Self {
        let data = data.into();
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> Dtype {
        self.data.dtype()
    }

    /// Borrow the values if the array is `float64`
    pub fn as_f64(&self) -> Option<&[f64]> {
        self.data.as_f64()
    }
}

impl From<Vec<f64>> for DenseArray {
    fn from(v: Vec<f64>) -> Self {
        DenseArray::vector(v)
    }
}

/// Storage layout of a caller supplied sparse matrix
#[derive(Debug, Clone, PartialEq)]
pub enum SparseStorage {
    /// compressed sparse column
    Csc {
        colptr: IndexVec,
        rowval: IndexVec,
        nzval: NumericVec,
    },
    /// compressed sparse row
    Csr {
        rowptr: IndexVec,
        colval: IndexVec,
        nzval: NumericVec,
    },
    /// coordinate triplets
    Coo {
        rows: IndexVec,
        cols: IndexVec,
        vals: NumericVec,
    },
}

/// Sparse layout tag, for messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseLayout {
    Csc,
    Csr,
    Coo,
}

impl fmt::Display for SparseLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SparseLayout::Csc => "CSC",
            SparseLayout::Csr => "CSR",
            SparseLayout::Coo => "COO",
        };
        f.write_str(s)
    }
}

/// A caller supplied sparse matrix of dimension `nrows × ncols`
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    pub nrows: usize,
    pub ncols: usize,
    pub storage: SparseStorage,
}

impl SparseMatrix {
    pub fn csc(
        nrows: usize,
        ncols: usize,
        colptr: impl Into<IndexVec>,
        rowval: impl Into<IndexVec>,
        nzval: impl Into<NumericVec>,
    ) -> Self {
        Self {
            nrows,
            ncols,
            storage: SparseStorage::Csc {
                colptr: colptr.into(),
                rowval: rowval.into(),
                nzval: nzval.into(),
            },
        }
    }

    pub fn csr(
        nrows: usize,
        ncols: usize,
        rowptr: impl Into<IndexVec>,
        colval: impl Into<IndexVec>,
        nzval: impl Into<NumericVec>,
    ) -> Self {
        Self {
            nrows,
            ncols,
            storage: SparseStorage::Csr {
                rowptr: rowptr.into(),
                colval: colval.into(),
                nzval: nzval.into(),
            },
        }
    }

    pub fn coo(
        nrows: usize,
        ncols: usize,
        rows: impl Into<IndexVec>,
        cols: impl Into<IndexVec>,
        vals: impl Into<NumericVec>,
    ) -> Self {
        Self {
            nrows,
            ncols,
            storage: SparseStorage::Coo {
                rows: rows.into(),
                cols: cols.into(),
                vals: vals.into(),
            },
        }
    }

    pub fn layout(&self) -> SparseLayout {
        match self.storage {
            SparseStorage::Csc { .. } => SparseLayout::Csc,
            SparseStorage::Csr { .. } => SparseLayout::Csr,
            SparseStorage::Coo { .. } => SparseLayout::Coo,
        }
    }

    pub fn nnz(&self) -> usize {
        match &self.storage {
            SparseStorage::Csc { nzval, .. } => nzval.len(),
            SparseStorage::Csr { nzval, .. } => nzval.len(),
            SparseStorage::Coo { vals, .. } => vals.len(),
        }
    }

    /// Borrowed view of the matrix if it is CSC with `int64` indices
    /// and `float64` values.  This is the only format a backend accepts.
    pub fn as_csc_view(&self) -> Option<CscView<'_>> {
        match &self.storage {
            SparseStorage::Csc {
                colptr,
                rowval,
                nzval,
            } => Some(CscView {
                m: self.nrows,
                n: self.ncols,
                colptr: colptr.as_i64()?,
                rowval: rowval.as_i64()?,
                nzval: nzval.as_f64()?,
            }),
            _ => None,
        }
    }
}

/// Borrowed canonical CSC data: `int64` index arrays and `float64` values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CscView<'a> {
    pub m: usize,
    pub n: usize,
    pub colptr: &'a [i64],
    pub rowval: &'a [i64],
    pub nzval: &'a [f64],
}

impl CscView<'_> {
    pub fn nnz(&self) -> usize {
        self.nzval.len()
    }
}

/// The constraint matrix as supplied by a caller
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixInput {
    Sparse(Arc<SparseMatrix>),
    Dense(Arc<DenseArray>),
}

impl From<SparseMatrix> for MatrixInput {
    fn from(A: SparseMatrix) -> Self {
        MatrixInput::Sparse(Arc::new(A))
    }
}
impl From<Arc<SparseMatrix>> for MatrixInput {
    fn from(A: Arc<SparseMatrix>) -> Self {
        MatrixInput::Sparse(A)
    }
}
impl From<DenseArray> for MatrixInput {
    fn from(A: DenseArray) -> Self {
        MatrixInput::Dense(Arc::new(A))
    }
}
impl From<Arc<DenseArray>> for MatrixInput {
    fn from(A: Arc<DenseArray>) -> Self {
        MatrixInput::Dense(A)
    }
}

/// Problem data `(A, b, c)` as supplied by a caller.  Any field may be
/// absent; [`ProblemData::prepare`](crate::solver::ProblemData::prepare)
/// reports which.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProblemInput {
    pub a: Option<MatrixInput>,
    pub b: Option<Arc<DenseArray>>,
    pub c: Option<Arc<DenseArray>>,
}

impl ProblemInput {
    pub fn new(
        a: impl Into<MatrixInput>,
        b: impl Into<DenseArray>,
        c: impl Into<DenseArray>,
    ) -> Self {
        Self {
            a: Some(a.into()),
            b: Some(Arc::new(b.into())),
            c: Some(Arc::new(c.into())),
        }
    }
}

/// A single value of a raw cone description
#[derive(Debug, Clone, PartialEq)]
pub enum ConeValue {
    Int(i64),
    Float(f64),
    Seq(NumericVec),
}

macro_rules! impl_cone_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConeValue {
                fn from(v: $ty) -> Self {
                    ConeValue::Int(v as i64)
                }
            }
        )*
    };
}
impl_cone_value_from_int!(i64, i32, u32, usize);

impl From<f64> for ConeValue {
    fn from(v: f64) -> Self {
        ConeValue::Float(v)
    }
}

impl<T> From<Vec<T>> for ConeValue
where
    Vec<T>: Into<NumericVec>,
{
    fn from(v: Vec<T>) -> Self {
        ConeValue::Seq(v.into())
    }
}

impl From<NumericVec> for ConeValue {
    fn from(v: NumericVec) -> Self {
        ConeValue::Seq(v)
    }
}

/// A loosely typed cone description: an ordered list of tag / value pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCone {
    pub entries: Vec<(String, ConeValue)>,
}

impl RawCone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, returning the extended description
    pub fn with(mut self, tag: impl Into<String>, value: impl Into<ConeValue>) -> Self {
        self.entries.push((tag.into(), value.into()));
        self
    }
}

impl<K, V> FromIterator<(K, V)> for RawCone
where
    K: Into<String>,
    V: Into<ConeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { entries }
    }
}
