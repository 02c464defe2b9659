use super::{moreau_dual3, rectify_to_mean, Cone, PrimalOrDualCone};
use crate::algebra::*;
use core::marker::PhantomData;

// -------------------------------------
// Exponential Cone
// -------------------------------------

/// The exponential cone `cl{(r,s,t) | s > 0, s·exp(r/s) ≤ t}`, or its dual.
pub struct ExponentialCone<T: FloatT = f64> {
    pd: PrimalOrDualCone,
    phantom: PhantomData<T>,
}

impl<T> ExponentialCone<T>
where
    T: FloatT,
{
    pub fn new(pd: PrimalOrDualCone) -> Self {
        Self {
            pd,
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for ExponentialCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        3
    }

    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool {
        rectify_to_mean(δ, e)
    }

    fn project(&mut self, x: &mut [T]) {
        match self.pd {
            PrimalOrDualCone::PrimalCone => _exp_project_slice(x),
            PrimalOrDualCone::DualCone => moreau_dual3(x, _exp_project),
        }
    }

    fn project_dual(&mut self, x: &mut [T]) {
        match self.pd {
            PrimalOrDualCone::PrimalCone => moreau_dual3(x, _exp_project),
            PrimalOrDualCone::DualCone => _exp_project_slice(x),
        }
    }
}

// ---------------------------------------------
// primal exponential cone projection
// ---------------------------------------------

// bounds and resolution of the search over boundary rays
const RAY_SEARCH_BOUND: f64 = 40.0;
const RAY_SEARCH_STEP: f64 = 0.5;
const RAY_REFINE_TOL: f64 = 1e-13;

fn _exp_project_slice<T: FloatT>(x: &mut [T]) {
    let mut v = [x[0], x[1], x[2]];
    _exp_project(&mut v);
    x[..3].copy_from_slice(&v);
}

fn _exp_project<T: FloatT>(v: &mut [T; 3]) {
    let (r, s, t) = (v[0], v[1], v[2]);
    let zero = T::zero();

    // v in K
    if (s > zero && s * T::exp(r / s) <= t) || (r <= zero && s == zero && t >= zero) {
        return;
    }

    // v in the polar cone -K*
    if (r > zero && r * T::exp(s / r) <= -T::E() * t) || (r == zero && s <= zero && t <= zero) {
        *v = [zero; 3];
        return;
    }

    // analytical case
    if r < zero && s < zero {
        *v = [r, zero, T::max(t, zero)];
        return;
    }

    // The projection lies on the boundary of K.  The curved part of
    // the boundary is the set of rays s·(ρ, 1, exp(ρ)), s > 0, so
    // search over ρ for the ray closest to v, and compare against
    // the flat part {(r, 0, t) | r ≤ 0, t ≥ 0}.
    let ρ = _exp_best_ray(v);
    let d = [ρ, T::one(), T::exp(ρ)];
    let β = T::max(_dot3(v, &d) / _dot3(&d, &d), zero);
    let ray = [β * d[0], β * d[1], β * d[2]];

    let flat = [T::min(r, zero), zero, T::max(t, zero)];

    *v = if _dist3(v, &ray) <= _dist3(v, &flat) {
        ray
    } else {
        flat
    };
}

// squared length of the projection of v onto the ray with parameter ρ.
// Maximizing this minimizes the distance from v to the ray.
fn _exp_ray_gain<T: FloatT>(v: &[T; 3], ρ: T) -> T {
    let d = [ρ, T::one(), T::exp(ρ)];
    let p = T::max(_dot3(v, &d), T::zero());
    p * p / _dot3(&d, &d)
}

fn _exp_best_ray<T: FloatT>(v: &[T; 3]) -> T {
    let bound: T = RAY_SEARCH_BOUND.as_T();
    let step: T = RAY_SEARCH_STEP.as_T();

    // coarse grid search
    let npts = (2.0 * RAY_SEARCH_BOUND / RAY_SEARCH_STEP) as usize;
    let mut best = -bound;
    let mut gbest = _exp_ray_gain(v, best);
    for i in 1..=npts {
        let ρ = -bound + step * i.as_T();
        let g = _exp_ray_gain(v, ρ);
        if g > gbest {
            (best, gbest) = (ρ, g);
        }
    }

    // golden section refinement around the best grid point
    let φ: T = (0.5 * (f64::sqrt(5.0) - 1.0)).as_T();
    let (mut a, mut b) = (best - step, best + step);
    let mut c = b - φ * (b - a);
    let mut d = a + φ * (b - a);
    let (mut gc, mut gd) = (_exp_ray_gain(v, c), _exp_ray_gain(v, d));

    while b - a > RAY_REFINE_TOL.as_T() {
        if gc > gd {
            (b, d, gd) = (d, c, gc);
            c = b - φ * (b - a);
            gc = _exp_ray_gain(v, c);
        } else {
            (a, c, gc) = (c, d, gd);
            d = a + φ * (b - a);
            gd = _exp_ray_gain(v, d);
        }
    }
    (a + b) * (0.5).as_T()
}

#[inline]
fn _dot3<T: FloatT>(a: &[T; 3], b: &[T; 3]) -> T {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn _dist3<T: FloatT>(a: &[T; 3], b: &[T; 3]) -> T {
    let d = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    _dot3(&d, &d)
}

// ---------------------------------------------
// tests
// ---------------------------------------------
