#![allow(non_snake_case)]

use crate::algebra::*;
use enum_dispatch::*;

// Solvers for the linear system (ρx*I + ÂᵀÂ)*x = rhs appearing in
// every ADMM iteration.  The matrix is fixed for the lifetime of a
// workspace, so the direct solver factors it once at setup.

// tolerance bounds for conjugate gradients, relative to the rhs
const CG_BEST_TOL: f64 = 1e-12;
const CG_MIN_TOL: f64 = 1e-1;

#[enum_dispatch]
pub trait LinearSolver<T>
where
    T: FloatT,
{
    /// Solve the system for the right hand side `rhs`.  On entry `x`
    /// holds the previous solution.  `iter` is the outer ADMM
    /// iteration count, used to tighten inexact solves.  Returns the
    /// number of inner iterations.
    fn solve(&mut self, A: &CscMatrix<T>, x: &mut [T], rhs: &[T], iter: u32, cg_rate: T)
        -> usize;

    fn is_direct(&self) -> bool;
}

#[enum_dispatch(LinearSolver<T>)]
pub enum LinearSystem<T>
where
    T: FloatT,
{
    DirectSolver(DirectSolver<T>),
    IndirectSolver(IndirectSolver<T>),
}

impl<T> LinearSystem<T>
where
    T: FloatT,
{
    pub fn new(A: &CscMatrix<T>, ρx: T, use_indirect: bool) -> Result<Self, DenseFactorizationError> {
        if use_indirect {
            Ok(IndirectSolver::new(A, ρx).into())
        } else {
            Ok(DirectSolver::new(A, ρx)?.into())
        }
    }
}

// -------------------------------------
// direct method: dense Cholesky of the Gram matrix
// -------------------------------------

pub struct DirectSolver<T> {
    chol: CholeskyEngine<T>,
}

impl<T> DirectSolver<T>
where
    T: FloatT,
{
    pub fn new(A: &CscMatrix<T>, ρx: T) -> Result<Self, DenseFactorizationError> {
        let M = A.gram_plus_diag(ρx);
        let mut chol = CholeskyEngine::new(A.n);
        chol.cholesky(&M)?;
        Ok(Self { chol })
    }
}

impl<T> LinearSolver<T> for DirectSolver<T>
where
    T: FloatT,
{
    fn solve(&mut self, _A: &CscMatrix<T>, x: &mut [T], rhs: &[T], _iter: u32, _cg_rate: T) -> usize {
        x.copy_from(rhs);
        self.chol.solve(x);
        0
    }

    fn is_direct(&self) -> bool {
        true
    }
}

// -------------------------------------
// indirect method: Jacobi preconditioned conjugate gradients
// -------------------------------------

pub struct IndirectSolver<T> {
    ρx: T,
    // inverse of the diagonal of ρx*I + ÂᵀÂ
    precond: Vec<T>,

    // work vectors
    r: Vec<T>,
    z: Vec<T>,
    p: Vec<T>,
    Mp: Vec<T>,
    work_m: Vec<T>,
}

impl<T> IndirectSolver<T>
where
    T: FloatT,
{
    pub fn new(A: &CscMatrix<T>, ρx: T) -> Self {
        let n = A.n;
        let mut precond = vec![T::zero(); n];
        A.col_norms_two(&mut precond);
        precond.scalarop(|v| T::recip(ρx + v * v));

        Self {
            ρx,
            precond,
            r: vec![T::zero(); n],
            z: vec![T::zero(); n],
            p: vec![T::zero(); n],
            Mp: vec![T::zero(); n],
            work_m: vec![T::zero(); A.m],
        }
    }
}

// y = (ρx*I + AᵀA)*x
fn _gram_mul<T: FloatT>(A: &CscMatrix<T>, ρx: T, y: &mut [T], x: &[T], work_m: &mut [T]) {
    A.gemv(work_m, x, T::one(), T::zero());
    A.t().gemv(y, work_m, T::one(), T::zero());
    y.axpby(ρx, x, T::one());
}

impl<T> LinearSolver<T> for IndirectSolver<T>
where
    T: FloatT,
{
    fn solve(&mut self, A: &CscMatrix<T>, x: &mut [T], rhs: &[T], iter: u32, cg_rate: T) -> usize {
        let (r, z, p, Mp) = (&mut self.r, &mut self.z, &mut self.p, &mut self.Mp);
        let work_m = &mut self.work_m;
        let ρx = self.ρx;

        let k: T = (iter as f64 + 1.0).as_T();
        let mintol: T = CG_MIN_TOL.as_T();
        let reltol = T::max(CG_BEST_TOL.as_T(), mintol / T::powf(k, cg_rate));
        let tol = reltol * T::max(rhs.norm(), T::one());

        // r = rhs - M*x, warm started at the previous solution
        _gram_mul(A, ρx, r, x, work_m);
        r.axpby(T::one(), rhs, -T::one());
        if r.norm() <= tol {
            return 0;
        }

        z.copy_from(r).hadamard(&self.precond);
        p.copy_from(z);
        let mut rz = r.dot(z);

        let maxiter = 2 * x.len() + 10;
        for i in 0..maxiter {
            _gram_mul(A, ρx, Mp, p, work_m);
            let α = rz / p.dot(Mp);
            x.axpby(α, p, T::one());
            r.axpby(-α, Mp, T::one());

            if r.norm() <= tol {
                return i + 1;
            }

            z.copy_from(r).hadamard(&self.precond);
            let rz_new = r.dot(z);
            let β = rz_new / rz;
            p.axpby(T::one(), z, β);
            rz = rz_new;
        }
        maxiter
    }

    fn is_direct(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_matrix() -> CscMatrix<f64> {
        // 3 x 2
        CscMatrix::new(
            3,
            2,
            vec![0, 2, 4],
            vec![0, 2, 1, 2],
            vec![1., -2., 3., 1.],
        )
    }

    #[test]
    fn test_direct_and_indirect_agree() {
        let A = test_matrix();
        let ρx = 1e-3;

        let xtrue = vec![1., -2.];
        let mut rhs = vec![0.; 2];
        let mut work = vec![0.; 3];
        _gram_mul(&A, ρx, &mut rhs, &xtrue, &mut work);

        let mut direct = LinearSystem::new(&A, ρx, false).unwrap();
        let mut x = vec![0.; 2];
        direct.solve(&A, &mut x, &rhs, 0, 2.0);
        assert!(direct.is_direct());
        assert!(x.norm_inf_diff(&xtrue) < 1e-10);

        let mut indirect = LinearSystem::new(&A, ρx, true).unwrap();
        let mut x = vec![0.; 2];
        // late outer iteration, so a tight tolerance
        indirect.solve(&A, &mut x, &rhs, 100_000, 2.0);
        assert!(!indirect.is_direct());
        assert!(x.norm_inf_diff(&xtrue) < 1e-6);
    }
}
