//! Validation layer, workspace sessions and solver backends.
//!
//! Problems are described by a [`ProblemInput`] (constraint matrix `A` and
//! vectors `b`, `c`) and a cone description ([`ConeSpec`] or [`RawCone`]).
//! They are solved either once with [`solve`] or repeatedly with a
//! [`Workspace`], which keeps the backend's factorization of `A` between
//! solves.
//!
//! The numerical work is done by a [`ConicBackend`](traits::ConicBackend).
//! The crate provides a reference [ADMM implementation](implementations::admm).

// internal module structure
pub(crate) mod core;
pub mod implementations;

//Here we expose only part of the solver internals
//and rearrange public modules a bit to give a more
//user friendly API

pub use crate::solver::core::inputs;
pub use crate::solver::core::inputs::*;
pub use crate::solver::core::traits;
pub use crate::solver::core::traits::{BackendError, ConicBackend, SolveInfo, SolverStatus};

pub use crate::solver::core::*;

pub use crate::solver::implementations::admm;
pub use crate::solver::implementations::admm::AdmmBackend;
