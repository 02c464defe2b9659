use crate::solver::core::cones::ConeDescription;
use crate::solver::core::error::Result;
use crate::solver::core::inputs::ProblemInput;
use crate::solver::core::problemdata::ProblemData;
use crate::solver::core::settings::{SettingsOverrides, DEFAULT_SETTINGS};
use crate::solver::core::solution::{Solution, SolutionBuffers, WarmStart};
use crate::solver::core::traits::ConicBackend;
use crate::solver::implementations::admm::AdmmBackend;

/// Solve a conic problem once with the reference ADMM backend.
///
/// ```no_run
/// use conicache::solver::*;
///
/// // minimize -x subject to x <= 1
/// let A = SparseMatrix::csc(1, 1, vec![0i64, 1], vec![0i64], vec![1.0]);
/// let data = ProblemInput::new(A, vec![1.0], vec![-1.0]);
/// let cone = RawCone::new().with("l", 1);
///
/// let sol = solve(&data, &cone, None, &SettingsOverrides::new().set("eps", 1e-6)).unwrap();
/// assert!(sol.info.status.is_solved());
/// ```
pub fn solve<C>(
    data: &ProblemInput,
    cone: &C,
    warm_start: Option<&WarmStart>,
    overrides: &SettingsOverrides,
) -> Result<Solution>
where
    C: ConeDescription + ?Sized,
{
    solve_with(&AdmmBackend::default(), data, cone, warm_start, overrides)
}

/// Solve a conic problem once with the given backend.
///
/// The caller's data is never modified; the result vectors are freshly
/// allocated and any warm start is copied into them.
pub fn solve_with<B, C>(
    backend: &B,
    data: &ProblemInput,
    cone: &C,
    warm_start: Option<&WarmStart>,
    overrides: &SettingsOverrides,
) -> Result<Solution>
where
    B: ConicBackend + ?Sized,
    C: ConeDescription + ?Sized,
{
    let settings = DEFAULT_SETTINGS.merged(overrides)?;
    let cone = cone.to_cone_spec()?;
    let data = ProblemData::prepare(data, &cone)?;

    let mut buffers = SolutionBuffers::allocate(data.m(), data.n());
    if let Some(warm) = warm_start {
        buffers.apply_warm_start(warm)?;
    }
    buffers.check_dims(data.m(), data.n())?;

    let info = backend.solve_once(
        &cone,
        data.csc(),
        data.b_values(),
        data.c_values(),
        &mut buffers,
        &settings,
    )?;

    Ok(Solution::new(buffers, info))
}
