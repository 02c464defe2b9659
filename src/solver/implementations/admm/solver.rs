#![allow(non_snake_case)]

use super::cones::CompositeCone;
use super::equilibration::EquilibrationData;
use super::linsys::{LinearSolver, LinearSystem};
use crate::algebra::*;
use crate::solver::core::inputs::CscView;
use crate::solver::core::traits::{BackendError, SolveInfo, SolverStatus};
use crate::solver::core::{ConeSpec, Settings, SolutionBuffers};
use crate::timers::*;

// iterations between progress lines when verbose
const PROGRESS_INTERVAL: u32 = 100;

// residuals of an approximate solution are accepted at the
// iteration limit if within this multiple of eps
const INACCURATE_FACTOR: f64 = 10.0;

/// Cached state of the ADMM backend for one constraint matrix and
/// cone.  Holds the equilibrated matrix, the linear system solver,
/// the scaled iterates and work vectors.
pub struct AdmmWorkspace {
    m: usize,
    n: usize,

    // equilibrated constraint matrix Â = E*A*D
    A: CscMatrix<f64>,
    cones: CompositeCone<f64>,
    equil: EquilibrationData<f64>,
    linsys: LinearSystem<f64>,
    ρx: f64,

    // scaled problem vectors
    b: Vec<f64>,
    c: Vec<f64>,

    // scaled iterates.  u is the scaled dual variable
    x: Vec<f64>,
    s: Vec<f64>,
    u: Vec<f64>,
    x_prev: Vec<f64>,
    u_prev: Vec<f64>,

    // work vectors
    work_n1: Vec<f64>,
    work_n2: Vec<f64>,
    work_m1: Vec<f64>,
    work_m2: Vec<f64>,
    work_m3: Vec<f64>,

    timers: Timers,
}

/// Residuals of the unscaled problem at the current iterate
#[derive(Debug, Clone, Copy, Default)]
struct Residuals {
    res_pri: f64,
    res_dual: f64,
    gap: f64,
    ctx: f64,
    bty: f64,
}

impl Residuals {
    fn is_finite(&self) -> bool {
        [self.res_pri, self.res_dual, self.gap].is_finite()
    }

    fn rel_gap(&self) -> f64 {
        self.gap / (1.0 + self.ctx.abs() + self.bty.abs())
    }
}

// tolerances for the residuals, given norms of b and c
#[derive(Debug, Clone, Copy)]
struct Tolerances {
    pri: f64,
    dual: f64,
    eps: f64,
}

impl Tolerances {
    fn new(eps: f64, nb: f64, nc: f64) -> Self {
        Self {
            pri: eps * (1.0 + nb),
            dual: eps * (1.0 + nc),
            eps,
        }
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            pri: self.pri * factor,
            dual: self.dual * factor,
            eps: self.eps * factor,
        }
    }

    fn accepts(&self, r: &Residuals) -> bool {
        r.res_pri <= self.pri
            && r.res_dual <= self.dual
            && r.gap <= self.eps * (1.0 + r.ctx.abs() + r.bty.abs())
    }
}

enum Certificate {
    Infeasible,
    Unbounded,
}

impl AdmmWorkspace {
    pub fn new(cone: &ConeSpec, A: CscView<'_>, settings: &Settings) -> Result<Self, BackendError> {
        let mut timers = Timers::default();

        let work;
        timeit! {timers => "setup"; {
            work = Self::build(cone, A, settings);
        }}
        let mut work = work?;
        work.timers = timers;

        if settings.verbose {
            log::info!(
                "ADMM setup: {} variables, {} constraints, {} nonzeros, {} method, {:.3} ms",
                work.n,
                work.m,
                work.A.nnz(),
                if work.linsys.is_direct() { "direct" } else { "indirect" },
                work.timers.elapsed_ms("setup"),
            );
        }
        Ok(work)
    }

    fn build(cone: &ConeSpec, A: CscView<'_>, settings: &Settings) -> Result<Self, BackendError> {
        let mut A = csc_from_view(A)?;
        let (m, n) = (A.m, A.n);

        let blocks = cone
            .blocks()
            .map_err(|e| BackendError::Unsupported(e.to_string()))?;
        let cones = CompositeCone::new(&blocks);
        if cones.numel() != m {
            return Err(BackendError::Unsupported(format!(
                "cones span {} rows but the matrix has {}",
                cones.numel(),
                m
            )));
        }

        let mut equil = EquilibrationData::new(n, m);
        if settings.normalize {
            equil.equilibrate(&mut A, &cones, settings.scale);
        }

        let ρx = settings.primal_regularization;
        let linsys = LinearSystem::new(&A, ρx, settings.use_indirect_method)?;

        Ok(Self {
            m,
            n,
            A,
            cones,
            equil,
            linsys,
            ρx,
            b: vec![0.0; m],
            c: vec![0.0; n],
            x: vec![0.0; n],
            s: vec![0.0; m],
            u: vec![0.0; m],
            x_prev: vec![0.0; n],
            u_prev: vec![0.0; m],
            work_n1: vec![0.0; n],
            work_n2: vec![0.0; n],
            work_m1: vec![0.0; m],
            work_m2: vec![0.0; m],
            work_m3: vec![0.0; m],
            timers: Timers::default(),
        })
    }

    /// Solve for the given `b` and `c`, starting from and writing
    /// the result to `buffers`.
    pub fn solve(
        &mut self,
        b: &[f64],
        c: &[f64],
        buffers: &mut SolutionBuffers,
        settings: &Settings,
    ) -> SolveInfo {
        let mut timers = std::mem::take(&mut self.timers);
        timers.reset_timer("solve");

        let mut info;
        timeit! {timers => "solve"; {
            info = self.iterate(b, c, buffers, settings);
        }}

        info.setup_time = timers.elapsed_ms("setup");
        info.solve_time = timers.elapsed_ms("solve");
        timers.log();
        self.timers = timers;

        if settings.verbose {
            log::info!(
                "ADMM finished: {} after {} iterations, primal objective {:.6e}, solve time {:.3} ms",
                info.status,
                info.iter,
                info.pobj,
                info.solve_time,
            );
        }
        info
    }

    fn iterate(
        &mut self,
        b: &[f64],
        c: &[f64],
        buffers: &mut SolutionBuffers,
        settings: &Settings,
    ) -> SolveInfo {
        self.load(b, c, buffers);

        let tol = Tolerances::new(settings.eps, b.norm(), c.norm());
        let α = settings.alpha;

        if settings.verbose {
            log::info!(
                "ADMM solve: eps = {:.1e}, alpha = {:.2}, max_iters = {}",
                settings.eps,
                α,
                settings.max_iters
            );
        }

        let mut status = SolverStatus::Unsolved;
        let mut res: Residuals;
        let mut iter = 0u32;

        loop {
            res = self.residuals(c);

            log::trace!(
                "iter {:>6}  pri {:.3e}  dual {:.3e}  gap {:.3e}",
                iter,
                res.res_pri,
                res.res_dual,
                res.gap
            );
            if settings.verbose && iter % PROGRESS_INTERVAL == 0 {
                log::info!(
                    "iter {:>6}  pri res {:.2e}  dual res {:.2e}  gap {:.2e}  pobj {:+.4e}",
                    iter,
                    res.res_pri,
                    res.res_dual,
                    res.gap,
                    res.ctx
                );
            }

            if !res.is_finite() || !self.x.is_finite() || !self.u.is_finite() {
                status = SolverStatus::Failed;
                break;
            }

            // the starting point is only accepted if it is in the cones
            if tol.accepts(&res) && (iter > 0 || self.start_in_cones(tol.eps)) {
                status = SolverStatus::Solved;
                break;
            }

            if iter > 0 {
                match self.certificate(b, c, &res, &tol) {
                    Some(Certificate::Infeasible) => {
                        status = SolverStatus::Infeasible;
                        break;
                    }
                    Some(Certificate::Unbounded) => {
                        status = SolverStatus::Unbounded;
                        break;
                    }
                    None => {}
                }
            }

            if iter >= settings.max_iters {
                break;
            }

            self.admm_step(α, iter, settings.cg_rate);
            iter += 1;
        }

        if status == SolverStatus::Unsolved {
            // iteration limit
            status = if tol.scaled(INACCURATE_FACTOR).accepts(&res) {
                SolverStatus::SolvedInaccurate
            } else {
                SolverStatus::Failed
            };
        }

        let mut info = SolveInfo {
            status,
            iter,
            res_pri: res.res_pri,
            res_dual: res.res_dual,
            rel_gap: res.rel_gap(),
            ..SolveInfo::default()
        };

        match status {
            SolverStatus::Infeasible => {
                self.unload_infeasible(buffers);
                info.pobj = f64::INFINITY;
                info.dobj = f64::INFINITY;
            }
            SolverStatus::Unbounded => {
                self.unload_unbounded(buffers);
                info.pobj = f64::NEG_INFINITY;
                info.dobj = f64::NEG_INFINITY;
            }
            _ => {
                self.unload(buffers);
                info.pobj = res.ctx;
                info.dobj = -res.bty;
            }
        }
        info
    }

    // scale the problem vectors and the initial iterate
    fn load(&mut self, b: &[f64], c: &[f64], buffers: &SolutionBuffers) {
        let equil = &self.equil;
        let σ = equil.σ;

        // b̂ = E*b, ĉ = σ*D*c
        self.b.copy_from(b).hadamard(&equil.e);
        self.c.copy_from(c).hadamard(&equil.d).scale(σ);

        // x̂ = D⁻¹x, ŝ = E*s, û = σ*E⁻¹*y
        self.x.copy_from(&buffers.x).hadamard(&equil.dinv);
        self.s.copy_from(&buffers.s).hadamard(&equil.e);
        self.u.copy_from(&buffers.y).hadamard(&equil.einv).scale(σ);
    }

    // x = D*x̂, s = E⁻¹*ŝ, y = E*û/σ
    fn unload(&self, buffers: &mut SolutionBuffers) {
        let equil = &self.equil;
        buffers.x.copy_from(&self.x).hadamard(&equil.d);
        buffers.s.copy_from(&self.s).hadamard(&equil.einv);
        buffers.y.copy_from(&self.u).hadamard(&equil.e).scale(equil.σ.recip());
    }

    // certificate y is held in work_m1
    fn unload_infeasible(&self, buffers: &mut SolutionBuffers) {
        buffers.x.set(f64::NAN);
        buffers.s.set(f64::NAN);
        buffers.y.copy_from(&self.work_m1);
    }

    // certificate x is held in work_n1, with s = -Ax in work_m1
    fn unload_unbounded(&self, buffers: &mut SolutionBuffers) {
        buffers.x.copy_from(&self.work_n1);
        buffers.s.copy_from(&self.work_m1);
        buffers.y.set(f64::NAN);
    }

    // residuals of the unscaled problem at the current iterate
    fn residuals(&mut self, c: &[f64]) -> Residuals {
        let equil = &self.equil;
        let σ = equil.σ;

        // Ax + s - b = E⁻¹(Âx̂ + ŝ - b̂)
        let r = &mut self.work_m1;
        r.waxpby(1.0, &self.s, -1.0, &self.b);
        self.A.gemv(r, &self.x, 1.0, 1.0);
        r.hadamard(&equil.einv);
        let res_pri = r.norm();

        // A'y + c = D⁻¹Â'û/σ + c
        let rd = &mut self.work_n1;
        self.A.t().gemv(rd, &self.u, 1.0, 0.0);
        rd.hadamard(&equil.dinv).scale(σ.recip());
        rd.axpby(1.0, c, 1.0);
        let res_dual = rd.norm();

        // c'x = ĉ'x̂/σ, b'y = b̂'û/σ
        let ctx = self.c.dot(&self.x) / σ;
        let bty = self.b.dot(&self.u) / σ;

        Residuals {
            res_pri,
            res_dual,
            gap: (ctx + bty).abs(),
            ctx,
            bty,
        }
    }

    // true if the current s and y lie in K and K* respectively
    fn start_in_cones(&mut self, eps: f64) -> bool {
        let equil = &self.equil;

        let s = &mut self.work_m1;
        let ps = &mut self.work_m2;
        s.copy_from(&self.s).hadamard(&equil.einv);
        ps.copy_from(s);
        self.cones.project(ps);
        let s_ok = s.dist(ps) <= eps * (1.0 + s.norm());

        let y = &mut self.work_m1;
        let py = &mut self.work_m2;
        y.copy_from(&self.u).hadamard(&equil.e);
        py.copy_from(y);
        self.cones.project_dual(py);
        let y_ok = y.dist(py) <= eps * (1.0 + y.norm());

        s_ok && y_ok
    }

    // Checks for infeasibility or unboundedness certificates in the
    // differences of successive iterates.  Certificates are normalized
    // so that b'y = -1 or c'x = -1, and left in the work vectors.
    fn certificate(
        &mut self,
        b: &[f64],
        c: &[f64],
        res: &Residuals,
        tol: &Tolerances,
    ) -> Option<Certificate> {
        let equil = &self.equil;

        // primal infeasibility : δy with A'δy = 0, δy ∈ K*, b'δy < 0
        if res.res_pri > tol.pri {
            let dy = &mut self.work_m1;
            dy.waxpby(1.0, &self.u, -1.0, &self.u_prev);
            dy.hadamard(&equil.e);
            let bdy = b.dot(dy);

            if bdy < 0.0 {
                dy.scale(-bdy.recip());

                // A'y = D⁻¹Â'E⁻¹y
                let w = &mut self.work_m2;
                w.copy_from(dy).hadamard(&equil.einv);
                let aty = &mut self.work_n2;
                self.A.t().gemv(aty, w, 1.0, 0.0);
                aty.hadamard(&equil.dinv);

                if aty.norm() <= tol.eps {
                    let py = &mut self.work_m3;
                    py.copy_from(dy);
                    self.cones.project_dual(py);
                    if dy.dist(py) <= tol.eps {
                        return Some(Certificate::Infeasible);
                    }
                }
            }
        }

        // dual infeasibility : δx with -Aδx ∈ K, c'δx < 0
        if res.res_dual > tol.dual {
            let dx = &mut self.work_n1;
            dx.waxpby(1.0, &self.x, -1.0, &self.x_prev);
            dx.hadamard(&equil.d);
            let cdx = c.dot(dx);

            if cdx < 0.0 {
                dx.scale(-cdx.recip());

                // s = -Ax = -E⁻¹ÂD⁻¹x
                let w = &mut self.work_n2;
                w.copy_from(dx).hadamard(&equil.dinv);
                let s = &mut self.work_m1;
                self.A.gemv(s, w, -1.0, 0.0);
                s.hadamard(&equil.einv);

                let ps = &mut self.work_m3;
                ps.copy_from(s);
                self.cones.project(ps);
                if s.dist(ps) <= tol.eps {
                    return Some(Certificate::Unbounded);
                }
            }
        }
        None
    }

    // one over-relaxed ADMM iteration on the scaled problem
    fn admm_step(&mut self, α: f64, iter: u32, cg_rate: f64) {
        self.x_prev.copy_from(&self.x);
        self.u_prev.copy_from(&self.u);

        // x = (ρx*I + Â'Â)⁻¹(ρx*x - ĉ - Â'(ŝ - b̂ + û))
        let w = &mut self.work_m1;
        w.waxpby(1.0, &self.s, -1.0, &self.b);
        w.axpby(1.0, &self.u, 1.0);
        let rhs = &mut self.work_n1;
        rhs.waxpby(self.ρx, &self.x, -1.0, &self.c);
        self.A.t().gemv(rhs, w, -1.0, 1.0);
        self.linsys.solve(&self.A, &mut self.x, rhs, iter, cg_rate);

        // h = α*Âx + (1-α)*(b̂ - ŝ)
        let h = &mut self.work_m2;
        h.waxpby(1.0 - α, &self.b, α - 1.0, &self.s);
        self.A.gemv(h, &self.x, α, 1.0);

        // ŝ = Π_K(b̂ - h - û)
        self.s.waxpby(1.0, &self.b, -1.0, h);
        self.s.axpby(-1.0, &self.u, 1.0);
        self.cones.project(&mut self.s);

        // û = û + h + ŝ - b̂
        self.u.axpby(1.0, h, 1.0);
        self.u.axpby(1.0, &self.s, 1.0);
        self.u.axpby(-1.0, &self.b, 1.0);
    }
}

// convert the boundary's int64 CSC arrays to native indices,
// rejecting anything malformed
fn csc_from_view(A: CscView<'_>) -> Result<CscMatrix<f64>, BackendError> {
    let to_usize = |v: &[i64]| -> Result<Vec<usize>, BackendError> {
        v.iter()
            .map(|&i| {
                usize::try_from(i).map_err(|_| {
                    BackendError::Unsupported(format!("negative index {} in CSC matrix", i))
                })
            })
            .collect()
    };

    let M = CscMatrix {
        m: A.m,
        n: A.n,
        colptr: to_usize(A.colptr)?,
        rowval: to_usize(A.rowval)?,
        nzval: A.nzval.to_vec(),
    };
    M.check_format()
        .map_err(|e| BackendError::Unsupported(e.to_string()))?;
    Ok(M)
}
