use super::{moreau_dual3, rectify_to_mean, Cone, PrimalOrDualCone};
use crate::algebra::*;

// -------------------------------------
// Power Cone
// -------------------------------------

/// The power cone `{(x,y,z) | x^α·y^(1-α) ≥ |z|, x,y ≥ 0}` for
/// `0 < α < 1`, or its dual.
pub struct PowerCone<T: FloatT = f64> {
    α: T,
    pd: PrimalOrDualCone,
}

impl<T> PowerCone<T>
where
    T: FloatT,
{
    pub fn new(α: T, pd: PrimalOrDualCone) -> Self {
        assert!(α > T::zero() && α < T::one());
        Self { α, pd }
    }
}

impl<T> Cone<T> for PowerCone<T>
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
        let α = self.α;
        match self.pd {
            PrimalOrDualCone::PrimalCone => _pow_project_slice(x, α),
            PrimalOrDualCone::DualCone => moreau_dual3(x, |v| _pow_project(v, α)),
        }
    }

    fn project_dual(&mut self, x: &mut [T]) {
        let α = self.α;
        match self.pd {
            PrimalOrDualCone::PrimalCone => moreau_dual3(x, |v| _pow_project(v, α)),
            PrimalOrDualCone::DualCone => _pow_project_slice(x, α),
        }
    }
}

// ---------------------------------------------
// primal power cone projection
// ---------------------------------------------

const POW_NEWTON_MAX_ITERS: usize = 100;
const POW_NEWTON_TOL: f64 = 1e-13;

fn _pow_project_slice<T: FloatT>(x: &mut [T], α: T) {
    let mut v = [x[0], x[1], x[2]];
    _pow_project(&mut v, α);
    x[..3].copy_from_slice(&v);
}

fn _pow_project<T: FloatT>(v: &mut [T; 3], α: T) {
    let (xh, yh, zh) = (v[0], v[1], v[2]);
    let rh = T::abs(zh);
    let zero = T::zero();
    let β = T::one() - α;

    // v in K
    if xh >= zero && yh >= zero && T::powf(xh, α) * T::powf(yh, β) >= rh {
        return;
    }

    // v in the polar cone -K*
    if xh <= zero
        && yh <= zero
        && T::powf(-xh, α) * T::powf(-yh, β) >= rh * T::powf(α, α) * T::powf(β, β)
    {
        *v = [zero; 3];
        return;
    }

    // Newton iteration on the radius r = |z| of the projection.  For
    // fixed r the optimal x and y have closed forms; find the r that
    // puts (x, y, r) on the boundary of K.
    let mut r = rh * (0.5).as_T();
    let (mut x, mut y) = (zero, zero);
    for _ in 0..POW_NEWTON_MAX_ITERS {
        x = _pow_calc_x(r, xh, rh, α);
        y = _pow_calc_x(r, yh, rh, β);

        let g = T::powf(x, α) * T::powf(y, β);
        let f = g - r;
        if T::abs(f) < POW_NEWTON_TOL.as_T() {
            break;
        }

        let dxdr = _pow_calc_dxdr(x, xh, rh, r, α);
        let dydr = _pow_calc_dxdr(y, yh, rh, r, β);
        let fp = g * (α * dxdr / x + β * dydr / y) - T::one();

        r = T::min(T::max(r - f / fp, zero), rh);
    }

    *v = [x, y, if zh < zero { -r } else { r }];
}

fn _pow_calc_x<T: FloatT>(r: T, xh: T, rh: T, α: T) -> T {
    let four: T = (4.0).as_T();
    let x = (xh + T::sqrt(xh * xh + four * α * (rh - r) * r)) * (0.5).as_T();
    T::max(x, (1e-12).as_T())
}

fn _pow_calc_dxdr<T: FloatT>(x: T, xh: T, rh: T, r: T, α: T) -> T {
    let two: T = (2.0).as_T();
    α * (rh - two * r) / (two * x - xh)
}

// ---------------------------------------------
// tests
// ---------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pow_projection_cases() {
        let mut K = PowerCone::<f64>::new(0.3, PrimalOrDualCone::PrimalCone);

        // in the cone
        let mut x = vec![1., 1., 0.5];
        K.project(&mut x);
        assert_eq!(x, vec![1., 1., 0.5]);

        // in the polar cone
        let mut x = vec![-1., -1., 0.1];
        K.project(&mut x);
        assert_eq!(x, vec![0., 0., 0.]);
    }

    #[test]
    fn test_pow_projection_optimality() {
        let α = 0.3;
        let mut K = PowerCone::<f64>::new(α, PrimalOrDualCone::PrimalCone);

        for v in [[1., 1., 3.], [-1., 2., 1.], [0.5, 0.2, -2.]] {
            let mut p = v.to_vec();
            K.project(&mut p);

            // p on the boundary of K
            let g = p[0].powf(α) * p[1].powf(1. - α);
            assert!(p[0] >= 0. && p[1] >= 0.);
            assert!((g - p[2].abs()).abs() < 1e-6);

            // p - v orthogonal to p
            let w: Vec<f64> = p.iter().zip(v).map(|(pi, vi)| pi - vi).collect();
            assert!(p.dot(&w).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dual_pow_projection() {
        let α = 0.4;
        let mut K = PowerCone::<f64>::new(α, PrimalOrDualCone::DualCone);

        let v = [0.2, 0.3, 2.];
        let mut p = v.to_vec();
        K.project(&mut p);

        // p in the dual cone
        let g = (p[0] / α).powf(α) * (p[1] / (1. - α)).powf(1. - α);
        assert!(g >= p[2].abs() - 1e-6);
    }
}
