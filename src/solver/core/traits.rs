//! The boundary between the validation layer and a numerical solver.
//!
//! A backend implements [`ConicBackend`] for problems of the form
//!
//! ```text
//! minimize    c'x
//! subject to  Ax + s = b,  s ∈ K
//! ```
//!
//! All data crossing this boundary is canonical: CSC with `int64` indices
//! and `float64` values, and dense `float64` vectors.  Validation has
//! already been done by the time any method here is called.
//!
//! The crate ships one implementation,
//! [`AdmmBackend`](crate::solver::implementations::admm::AdmmBackend).

#![allow(non_snake_case)]

use crate::algebra::DenseFactorizationError;
use crate::solver::core::cones::ConeSpec;
use crate::solver::core::inputs::CscView;
use crate::solver::core::settings::Settings;
use crate::solver::core::solution::SolutionBuffers;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Status of solver at termination

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SolverStatus {
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved,
    /// Solver terminated with a solution.
    Solved,
    /// Iteration limit reached with all residuals within ten times the tolerance
    SolvedInaccurate,
    /// Problem is primal infeasible.  Solution returned is a certificate of primal infeasibility.
    Infeasible,
    /// Problem is unbounded.  Solution returned is a certificate of dual infeasibility.
    Unbounded,
    /// Iteration limit reached, or numerical failure
    Failed,
}

impl SolverStatus {
    pub fn is_solved(&self) -> bool {
        matches!(*self, SolverStatus::Solved | SolverStatus::SolvedInaccurate)
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(*self, SolverStatus::Infeasible)
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(*self, SolverStatus::Unbounded)
    }

    pub fn is_errored(&self) -> bool {
        matches!(*self, SolverStatus::Failed)
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolverStatus::Unsolved => "Unsolved",
            SolverStatus::Solved => "Solved",
            SolverStatus::SolvedInaccurate => "Solved/Inaccurate",
            SolverStatus::Infeasible => "Infeasible",
            SolverStatus::Unbounded => "Unbounded",
            SolverStatus::Failed => "Failed",
        };
        f.write_str(s)
    }
}

/// Status record returned by a backend solve
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SolveInfo {
    pub status: SolverStatus,
    /// iterations taken
    pub iter: u32,
    /// primal objective c'x
    pub pobj: f64,
    /// dual objective -b'y
    pub dobj: f64,
    /// primal residual ‖Ax+s-b‖
    pub res_pri: f64,
    /// dual residual ‖A'y+c‖
    pub res_dual: f64,
    /// relative duality gap
    pub rel_gap: f64,
    /// backend setup time (ms)
    pub setup_time: f64,
    /// backend solve time (ms)
    pub solve_time: f64,
}

/// Failure reported by a backend during setup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("linear system factorization failed: {0}")]
    Factorization(#[from] DenseFactorizationError),
    #[error("unsupported problem: {0}")]
    Unsupported(String),
}

/// Call contract of a numerical conic solver.
pub trait ConicBackend {
    /// Cached solver state (scaled data, factorizations, work vectors)
    /// produced by [`setup`](ConicBackend::setup).  Dropping it releases
    /// the state.
    type Handle;

    /// Build cached state for the matrix `A` and the given cones.
    fn setup(
        &self,
        cone: &ConeSpec,
        A: CscView<'_>,
        settings: &Settings,
    ) -> Result<Self::Handle, BackendError>;

    /// Solve using cached state.  `buffers` hold the initial iterate on
    /// entry and the result on exit.
    fn solve(
        &self,
        handle: &mut Self::Handle,
        b: &[f64],
        c: &[f64],
        cone: &ConeSpec,
        buffers: &mut SolutionBuffers,
        settings: &Settings,
    ) -> SolveInfo;

    /// Setup, solve and teardown in a single call.
    #[allow(clippy::too_many_arguments)]
    fn solve_once(
        &self,
        cone: &ConeSpec,
        A: CscView<'_>,
        b: &[f64],
        c: &[f64],
        buffers: &mut SolutionBuffers,
        settings: &Settings,
    ) -> Result<SolveInfo, BackendError> {
        let mut handle = self.setup(cone, A, settings)?;
        Ok(self.solve(&mut handle, b, c, cone, buffers, settings))
    }

    /// Version of the backend, separate from the version of this crate
    fn version(&self) -> String;
}
