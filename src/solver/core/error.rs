use crate::algebra::SparseFormatError;
use crate::solver::core::inputs::Dtype;
use crate::solver::core::traits::BackendError;
use thiserror::Error;

/// Error type returned by validation, session management and backend setup.
///
/// All variants other than [`Backend`](Error::Backend) are raised before
/// any backend work is done.  Non-success solver outcomes (infeasible,
/// unbounded, iteration limit) are not errors; they are reported in the
/// returned [`SolveInfo`](crate::solver::SolveInfo).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required problem field was not supplied
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The constraint matrix is not a sparse type
    #[error("field `{field}` must be a sparse matrix, got {found}")]
    TypeMismatch {
        field: &'static str,
        found: &'static str,
    },

    /// A vector has the wrong rank or length
    #[error("field `{field}` must be a vector of length {expected}, got shape {found:?}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        found: Vec<usize>,
    },

    /// A vector has an element type other than float64
    #[error("field `{field}` must have dtype float64, got {found}")]
    DtypeMismatch { field: &'static str, found: Dtype },

    /// A cone description entry is malformed
    #[error("invalid cone entry `{tag}`: {reason}")]
    InvalidCone { tag: String, reason: String },

    /// Cone dimension is zero or disagrees with the row count of A
    #[error("cone dimension {cone_rows} does not match the {matrix_rows} rows of A")]
    ConeRowMismatch { cone_rows: usize, matrix_rows: usize },

    /// A warm start must provide all of x, y and s
    #[error("warm start is missing `{0}`; x, y and s must all be supplied")]
    IncompleteWarmStart(&'static str),

    /// A fixed setting differs from its value at workspace creation
    #[error("setting `{key}` was {fixed} at workspace creation and cannot change to {requested}")]
    FixedSettingChanged {
        key: &'static str,
        fixed: String,
        requested: String,
    },

    /// The workspace has been released
    #[error("workspace has been released")]
    WorkspaceReleased,

    /// A setting override has the wrong type or an out-of-range value
    #[error("invalid value for setting `{key}`: {reason}")]
    InvalidSetting { key: String, reason: String },

    /// The canonical matrix is structurally malformed
    #[error("malformed sparse matrix: {0}")]
    BadSparseFormat(#[from] SparseFormatError),

    /// The backend rejected the problem during setup
    #[error("backend failure: {0}")]
    Backend(#[from] BackendError),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
