use crate::solver::core::error::{Error, Result};
use crate::solver::core::inputs::NumericVec;
use crate::solver::core::traits::SolveInfo;

/// Initial iterate supplied by a caller.  All three vectors must be present
/// when it is applied; values of any numeric type are accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarmStart {
    pub x: Option<NumericVec>,
    pub y: Option<NumericVec>,
    pub s: Option<NumericVec>,
}

impl WarmStart {
    pub fn new(
        x: impl Into<NumericVec>,
        y: impl Into<NumericVec>,
        s: impl Into<NumericVec>,
    ) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
            s: Some(s.into()),
        }
    }
}

impl From<&Solution> for WarmStart {
    fn from(sol: &Solution) -> Self {
        WarmStart::new(sol.x.clone(), sol.y.clone(), sol.s.clone())
    }
}

/// Result vectors handed to a backend: `x` of length `n`, `y` and `s` of
/// length `m`.  Always freshly allocated; warm start values are copied in.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionBuffers {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub s: Vec<f64>,
}

impl SolutionBuffers {
    /// Zero filled buffers for an `m × n` problem
    pub fn allocate(m: usize, n: usize) -> Self {
        Self {
            x: vec![0.0; n],
            y: vec![0.0; m],
            s: vec![0.0; m],
        }
    }

    /// Copy a warm start into the buffers, converting to `float64`.
    /// Nothing is copied unless every vector is present with the right
    /// length.
    pub fn apply_warm_start(&mut self, warm: &WarmStart) -> Result<()> {
        let x = warm.x.as_ref().ok_or(Error::IncompleteWarmStart("x"))?;
        let y = warm.y.as_ref().ok_or(Error::IncompleteWarmStart("y"))?;
        let s = warm.s.as_ref().ok_or(Error::IncompleteWarmStart("s"))?;

        for (field, v, buf) in [("x", x, &self.x), ("y", y, &self.y), ("s", s, &self.s)] {
            if v.len() != buf.len() {
                return Err(Error::ShapeMismatch {
                    field,
                    expected: buf.len(),
                    found: vec![v.len()],
                });
            }
        }

        x.copy_into_f64(&mut self.x);
        y.copy_into_f64(&mut self.y);
        s.copy_into_f64(&mut self.s);
        Ok(())
    }

    /// Check buffer lengths against an `m × n` problem
    pub fn check_dims(&self, m: usize, n: usize) -> Result<()> {
        for (field, len, expected) in [
            ("x", self.x.len(), n),
            ("y", self.y.len(), m),
            ("s", self.s.len(), m),
        ] {
            if len != expected {
                return Err(Error::ShapeMismatch {
                    field,
                    expected,
                    found: vec![len],
                });
            }
        }
        Ok(())
    }
}

/// Primal, dual and slack vectors with the solver's status record
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub s: Vec<f64>,
    pub info: SolveInfo,
}

impl Solution {
    pub(crate) fn new(buffers: SolutionBuffers, info: SolveInfo) -> Self {
        let SolutionBuffers { x, y, s } = buffers;
        Self { x, y, s, info }
    }
}
