//! __conicache__ is a validation and warm-session layer for iterative conic
//! solvers.  Problems take the form
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & c^T x\\\\\[2ex\]
//!  \text{subject to} & Ax + s = b \\\\\[1ex\]
//!         & s \in \mathcal{K}
//!  \end{array}
//! $$
//!
//! with a sparse constraint matrix $A \in \mathbb{R}^{m \times n}$, dense
//! vectors $b \in \mathbb{R}^m$ and $c \in \mathbb{R}^n$, and a cone
//! $\mathcal{K}$ that is a product of zero, nonnegative, second order,
//! positive semidefinite, exponential and power cones.
//!
//! ## Features
//!
//! * __Validation__: loosely typed inputs (CSC, CSR or COO matrices with 32
//!   or 64 bit indices, arrays of several element types, cone descriptions
//!   with short aliases) are checked and converted to the canonical format
//!   before any numerical work starts.  Caller data is never modified.
//!
//! * __Warm sessions__: a [`Workspace`](solver::Workspace) caches the
//!   backend's equilibration and factorization of $A$ across repeated solves
//!   with new $b$, $c$, settings and warm starts, and refuses changes to the
//!   settings that the cached state depends on.
//!
//! * __Pluggable backends__: the numerical solver sits behind the
//!   [`ConicBackend`](solver::ConicBackend) trait.  A reference ADMM backend
//!   is included.
//!
//! ## Example
//!
//! ```no_run
//! use conicache::solver::*;
//!
//! // minimize x0 + x1 subject to x0 >= 1, x1 >= 2
//! let A = SparseMatrix::csc(2, 2, vec![0i64, 1, 2], vec![0i64, 1], vec![-1.0, -1.0]);
//! let data = ProblemInput::new(A, vec![-1.0, -2.0], vec![1.0, 1.0]);
//! let cone = RawCone::new().with("l", 2);
//!
//! let settings = SettingsOverrides::new().set("eps", 1e-6).set("verbose", false);
//! let sol = solve(&data, &cone, None, &settings).unwrap();
//! println!("{}: x = {:?}", sol.info.status, sol.x);
//! ```

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod solver;
pub mod timers;

pub use crate::solver::core::{Error, Result};

/// Version of this crate.  The backend version is reported separately by
/// [`ConicBackend::version`](solver::ConicBackend::version).
pub fn version() -> &'static str {
    VERSION
}

#[test]
fn test_version() {
    assert_eq!(version(), env!("CARGO_PKG_VERSION"));
}
