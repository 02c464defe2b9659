#![allow(non_snake_case)]
use super::cones::CompositeCone;
use crate::algebra::*;

// ---------------
// equilibration data
// ---------------

// number of Ruiz passes and bounds on the scaling terms
const EQUILIBRATE_MAX_ITER: usize = 10;
const EQUILIBRATE_MIN_SCALING: f64 = 1e-4;
const EQUILIBRATE_MAX_SCALING: f64 = 1e4;

/// Data from the Ruiz equilibration procedure.
///
/// The scaled matrix is `Â = E*A*D`.  Problem vectors map as
/// `b̂ = E*b` and `ĉ = σ*D*c`, and solutions map back as `x = D*x̂`,
/// `s = E⁻¹*ŝ` and `y = E*ŷ/σ`.
pub struct EquilibrationData<T> {
    /// Vector of variable scaling terms
    pub d: Vec<T>,
    /// Vector of inverse variable scaling terms
    pub dinv: Vec<T>,
    /// Vector of constraint scaling terms
    pub e: Vec<T>,
    /// Vector of inverse constraint scaling terms
    pub einv: Vec<T>,
    /// overall scaling for objective function
    pub σ: T,
}

impl<T> EquilibrationData<T>
where
    T: FloatT,
{
    /// creates an identity scaling
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            d: vec![T::one(); n],
            dinv: vec![T::one(); n],
            e: vec![T::one(); m],
            einv: vec![T::one(); m],
            σ: T::one(),
        }
    }

    /// Scale `A` in place and record the scaling terms.  `σ` is the
    /// objective scaling to apply alongside.
    pub fn equilibrate(&mut self, A: &mut CscMatrix<T>, cones: &CompositeCone<T>, σ: T) {
        let (d, e) = (&mut self.d, &mut self.e);

        // use the inverse scalings as work vectors
        let dwork = &mut self.dinv;
        let ework = &mut self.einv;

        let scale_min: T = EQUILIBRATE_MIN_SCALING.as_T();
        let scale_max: T = EQUILIBRATE_MAX_SCALING.as_T();

        // perform scaling operations for a fixed number of steps
        for _ in 0..EQUILIBRATE_MAX_ITER {
            A.col_norms(dwork);
            A.row_norms(ework);

            dwork.scalarop(|x| limit_scaling(x, scale_min, scale_max));
            ework.scalarop(|x| limit_scaling(x, scale_min, scale_max));

            dwork.rsqrt();
            ework.rsqrt();

            A.lrscale(ework, dwork);
            d.hadamard(dwork);
            e.hadamard(ework);
        }

        // fix scalings in cones for which elementwise
        // scaling can't be applied
        if cones.rectify_equilibration(ework, e) {
            dwork.set(T::one());
            A.lrscale(ework, dwork);
            e.hadamard(ework);
        }

        // update the inverse scaling data
        self.dinv.scalarop_from(T::recip, d);
        self.einv.scalarop_from(T::recip, e);
        self.σ = σ;
    }
}

// scaling terms outside the limits are replaced by one
// below and clipped above
fn limit_scaling<T: FloatT>(s: T, minval: T, maxval: T) -> T {
    if s < minval {
        T::one()
    } else if s > maxval {
        maxval
    } else {
        s
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::core::ConeBlock;

    #[test]
    fn test_equilibrate_soc_rows_uniform() {
        // rows 1..3 form a second order cone and must share a scale
        let mut A = CscMatrix::new(
            3,
            2,
            vec![0, 2, 4],
            vec![0, 1, 1, 2],
            vec![100., 1., 2., 0.01],
        );
        let A0 = A.clone();
        let cones = CompositeCone::<f64>::new(&[ConeBlock::Nonneg(1), ConeBlock::Soc(2)]);

        let mut equil = EquilibrationData::new(2, 3);
        equil.equilibrate(&mut A, &cones, 1.0);

        assert!((equil.e[1] - equil.e[2]).abs() < 1e-14);
        assert!(equil.d.is_finite() && equil.e.is_finite());

        // Â = E*A*D
        for col in 0..2 {
            for k in A.colptr[col]..A.colptr[col + 1] {
                let row = A.rowval[k];
                let expected = equil.e[row] * A0.nzval[k] * equil.d[col];
                assert!((A.nzval[k] - expected).abs() < 1e-12);
            }
        }
    }
}
