//! Reference backend: a first-order operator splitting (ADMM) solver.
//!
//! Solves
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & c^T x\\\\\[2ex\]
//!  \text{subject to} & Ax + s = b \\\\\[1ex\]
//!         & s \in \mathcal{K}
//!  \end{array}
//! $$
//!
//! with over-relaxed ADMM iterations on a Ruiz-equilibrated copy of the
//! data.  The linear system in each iteration is solved either by a dense
//! Cholesky factorization computed once at setup (direct method) or by
//! Jacobi preconditioned conjugate gradients (indirect method).

#![allow(non_snake_case)]

mod cones;
mod equilibration;
mod linsys;
mod solver;

pub use solver::AdmmWorkspace;

use crate::solver::core::inputs::CscView;
use crate::solver::core::traits::{BackendError, ConicBackend, SolveInfo};
use crate::solver::core::{ConeSpec, Settings, SolutionBuffers};

/// Version of the ADMM backend, reported separately from the crate version
pub const VERSION: &str = "1.0.0";

/// The reference ADMM implementation of [`ConicBackend`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmmBackend;

impl ConicBackend for AdmmBackend {
    type Handle = AdmmWorkspace;

    fn setup(
        &self,
        cone: &ConeSpec,
        A: CscView<'_>,
        settings: &Settings,
    ) -> Result<AdmmWorkspace, BackendError> {
        AdmmWorkspace::new(cone, A, settings)
    }

    fn solve(
        &self,
        handle: &mut AdmmWorkspace,
        b: &[f64],
        c: &[f64],
        _cone: &ConeSpec,
        buffers: &mut SolutionBuffers,
        settings: &Settings,
    ) -> SolveInfo {
        handle.solve(b, c, buffers, settings)
    }

    fn version(&self) -> String {
        VERSION.to_string()
    }
}
