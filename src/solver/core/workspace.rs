#![allow(non_snake_case)]

use crate::solver::core::cones::{ConeDescription, ConeSpec};
use crate::solver::core::error::{Error, Result};
use crate::solver::core::inputs::{DenseArray, ProblemInput};
use crate::solver::core::problemdata::ProblemData;
use crate::solver::core::settings::{
    FixedSettings, SettingValue, Settings, SettingsOverrides, DEFAULT_SETTINGS,
};
use crate::solver::core::solution::{Solution, SolutionBuffers, WarmStart};
use crate::solver::core::traits::{ConicBackend, SolveInfo};
use crate::solver::implementations::admm::AdmmBackend;
use std::sync::Arc;

/// Arguments of a single [`Workspace::solve`] call.  Every part is
/// optional; the default request re-solves with the stored data.
#[derive(Debug, Clone, Default)]
pub struct SolveRequest {
    pub b: Option<Arc<DenseArray>>,
    pub c: Option<Arc<DenseArray>>,
    pub warm_start: Option<WarmStart>,
    pub overrides: SettingsOverrides,
}

impl SolveRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `b` for this and all later solves
    pub fn with_b(mut self, b: impl Into<Arc<DenseArray>>) -> Self {
        self.b = Some(b.into());
        self
    }

    /// Replace `c` for this and all later solves
    pub fn with_c(mut self, c: impl Into<Arc<DenseArray>>) -> Self {
        self.c = Some(c.into());
        self
    }

    pub fn with_warm_start(mut self, warm_start: WarmStart) -> Self {
        self.warm_start = Some(warm_start);
        self
    }

    /// Override a setting for this and all later solves
    pub fn with_setting(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.overrides = self.overrides.set(key, value);
        self
    }

    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// A solver session that caches the backend's factorization of `A`
/// across repeated solves.
///
/// The matrix and cones are fixed at construction.  Each
/// [`solve`](Workspace::solve) may replace `b` and `c`, change the mutable
/// settings and supply a warm start.  The settings in
/// [`FixedSettings`] may not change.
///
/// The cached state is released by [`release`](Workspace::release) or when
/// the workspace is dropped; after release every call fails with
/// [`Error::WorkspaceReleased`].  Solving takes `&mut self`, so sharing a
/// workspace between threads requires a lock such as `Mutex`.
///
/// ```no_run
/// use conicache::solver::*;
///
/// let A = SparseMatrix::csc(2, 1, vec![0i64, 2], vec![0i64, 1], vec![1.0, -1.0]);
/// let data = ProblemInput::new(A, vec![1.0, 1.0], vec![-1.0]);
/// let cone = ConeSpec::default().with_nonneg(2);
///
/// let mut work = Workspace::with_defaults(&data, &cone, &SettingsOverrides::new()).unwrap();
/// let sol = work.solve(SolveRequest::new()).unwrap();
/// let again = work
///     .solve(SolveRequest::new().with_warm_start(WarmStart::from(&sol)))
///     .unwrap();
/// println!("{} after {} iterations", again.info.status, again.info.iter);
/// ```
pub struct Workspace<B: ConicBackend = AdmmBackend> {
    backend: B,
    cone: ConeSpec,
    data: ProblemData,
    settings: Settings,
    fixed: FixedSettings,
    info: Option<SolveInfo>,
    // None once released
    handle: Option<B::Handle>,
}

impl Workspace<AdmmBackend> {
    /// Create a workspace using the reference ADMM backend
    pub fn with_defaults<C>(
        data: &ProblemInput,
        cone: &C,
        overrides: &SettingsOverrides,
    ) -> Result<Self>
    where
        C: ConeDescription + ?Sized,
    {
        Workspace::new(AdmmBackend::default(), data, cone, overrides)
    }
}

impl<B> Workspace<B>
where
    B: ConicBackend,
{
    /// Validate the problem, merge `overrides` onto the default settings
    /// and run the backend setup.
    pub fn new<C>(
        backend: B,
        data: &ProblemInput,
        cone: &C,
        overrides: &SettingsOverrides,
    ) -> Result<Self>
    where
        C: ConeDescription + ?Sized,
    {
        let settings = DEFAULT_SETTINGS.merged(overrides)?;
        Self::with_settings(backend, data, cone, settings)
    }

    /// As [`new`](Workspace::new), with a complete settings object
    pub fn with_settings<C>(
        backend: B,
        data: &ProblemInput,
        cone: &C,
        settings: Settings,
    ) -> Result<Self>
    where
        C: ConeDescription + ?Sized,
    {
        settings.validate()?;
        let fixed = FixedSettings::from(&settings);
        let cone = cone.to_cone_spec()?;
        let data = ProblemData::prepare(data, &cone)?;

        let handle = backend.setup(&cone, data.csc(), &settings)?;

        log::debug!(
            "workspace ready: {} x {} with {} nonzeros, backend {}",
            data.m(),
            data.n(),
            data.csc().nnz(),
            backend.version()
        );

        Ok(Self {
            backend,
            cone,
            data,
            settings,
            fixed,
            info: None,
            handle: Some(handle),
        })
    }

    fn check_live(&self) -> Result<()> {
        if self.handle.is_none() {
            return Err(Error::WorkspaceReleased);
        }
        Ok(())
    }

    /// Solve using the cached backend state.
    ///
    /// Setting overrides are merged and checked against the fixed settings
    /// before anything else; on failure the live settings are unchanged.
    /// Replacement vectors persist for later solves.
    pub fn solve(&mut self, request: SolveRequest) -> Result<Solution> {
        self.check_live()?;

        let settings = self.settings.merged(&request.overrides)?;
        self.fixed.check(&settings)?;
        self.settings = settings;

        self.data
            .replace_vectors(request.b.as_ref(), request.c.as_ref())?;

        let mut buffers = SolutionBuffers::allocate(self.data.m(), self.data.n());
        if let Some(warm) = &request.warm_start {
            buffers.apply_warm_start(warm)?;
        }
        buffers.check_dims(self.data.b_values().len(), self.data.c_values().len())?;

        let handle = self.handle.as_mut().ok_or(Error::WorkspaceReleased)?;
        let info = self.backend.solve(
            handle,
            self.data.b_values(),
            self.data.c_values(),
            &self.cone,
            &mut buffers,
            &self.settings,
        );

        log::debug!(
            "workspace solve: {} after {} iterations",
            info.status,
            info.iter
        );

        self.info = Some(info.clone());
        Ok(Solution::new(buffers, info))
    }

    /// Release the backend state.  Further calls fail with
    /// [`Error::WorkspaceReleased`].  Releasing twice is harmless.
    pub fn release(&mut self) {
        if self.handle.take().is_some() {
            log::debug!("workspace released");
        }
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    /// Current problem data, including the latest `b` and `c`
    pub fn data(&self) -> Result<&ProblemData> {
        self.check_live()?;
        Ok(&self.data)
    }

    /// Live settings.  Verifies the fixed settings first.
    pub fn settings(&self) -> Result<&Settings> {
        self.check_live()?;
        self.fixed.check(&self.settings)?;
        Ok(&self.settings)
    }

    /// A copy of the settings fixed at construction
    pub fn fixed(&self) -> Result<FixedSettings> {
        self.check_live()?;
        Ok(self.fixed.clone())
    }

    /// Status record of the most recent solve, if any
    pub fn info(&self) -> Result<Option<&SolveInfo>> {
        self.check_live()?;
        Ok(self.info.as_ref())
    }

    pub fn cone(&self) -> Result<&ConeSpec> {
        self.check_live()?;
        Ok(&self.cone)
    }

    /// Problem dimensions `(m, n)`
    pub fn dims(&self) -> Result<(usize, usize)> {
        self.check_live()?;
        Ok((self.data.m(), self.data.n()))
    }

    /// The backend this workspace was built with
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
