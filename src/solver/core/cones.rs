use crate::algebra::triangular_number;
use crate::solver::core::error::{Error, Result};
use crate::solver::core::inputs::{ConeValue, NumericVec, RawCone};
use std::fmt;

/// Recognized cone tags.  Rows of `A`, `b`, `s` and `y` are laid out in the
/// order in which the tags are declared here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConeTag {
    /// equality rows
    Zero,
    /// linear inequality rows
    Nonneg,
    /// second order cones
    Soc,
    /// positive semidefinite cones
    Psd,
    /// primal exponential cones
    Exp,
    /// dual exponential cones
    DualExp,
    /// primal or dual power cones
    Power,
}

impl ConeTag {
    pub fn name(&self) -> &'static str {
        match self {
            ConeTag::Zero => "zero",
            ConeTag::Nonneg => "nonneg",
            ConeTag::Soc => "soc",
            ConeTag::Psd => "psd",
            ConeTag::Exp => "exp",
            ConeTag::DualExp => "dual_exp",
            ConeTag::Power => "power",
        }
    }

    /// Resolve a tag name or one of its short aliases
    pub fn from_name(name: &str) -> Option<Self> {
        let tag = match name {
            "zero" | "f" => ConeTag::Zero,
            "nonneg" | "l" => ConeTag::Nonneg,
            "soc" | "q" => ConeTag::Soc,
            "psd" | "s" => ConeTag::Psd,
            "exp" | "ep" => ConeTag::Exp,
            "dual_exp" | "ed" => ConeTag::DualExp,
            "power" | "p" => ConeTag::Power,
            _ => return None,
        };
        Some(tag)
    }
}

impl fmt::Display for ConeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cone block of a validated [`ConeSpec`], in row order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConeBlock {
    Zero(usize),
    Nonneg(usize),
    Soc(usize),
    /// side length `k` of a `k×k` matrix, occupying `k(k+1)/2` rows
    Psd(usize),
    Exp,
    DualExp,
    /// exponent; negative values select the dual cone
    Power(f64),
}

impl ConeBlock {
    /// number of rows occupied by the block
    pub fn numel(&self) -> usize {
        match *self {
            ConeBlock::Zero(n) | ConeBlock::Nonneg(n) | ConeBlock::Soc(n) => n,
            ConeBlock::Psd(k) => triangular_number(k),
            ConeBlock::Exp | ConeBlock::DualExp | ConeBlock::Power(_) => 3,
        }
    }

    /// true if every row can be scaled independently without
    /// changing the cone
    pub fn is_separable(&self) -> bool {
        matches!(self, ConeBlock::Zero(_) | ConeBlock::Nonneg(_))
    }
}

/// Canonical cone description.
///
/// Only non-trivial entries are stored: a scalar tag with value zero or a
/// sequence tag with no elements is absent.  Values are deep copies of the
/// caller's data.  Construction does not check signs or exponent ranges;
/// [`validate`](ConeSpec::validate) and [`dimension`](ConeSpec::dimension)
/// do.
///
/// ```
/// use conicache::solver::ConeSpec;
///
/// let cone = ConeSpec::default().with_nonneg(4).with_soc(vec![3]);
/// assert_eq!(cone.dimension().unwrap(), 7);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConeSpec {
    zero: Option<i64>,
    nonneg: Option<i64>,
    exp: Option<i64>,
    dual_exp: Option<i64>,
    soc: Option<Vec<i64>>,
    psd: Option<Vec<i64>>,
    power: Option<Vec<f64>>,
}

impl ConeSpec {
    /// Canonicalize a loosely typed cone description.
    ///
    /// Aliases are resolved, unknown tags are dropped with a warning, and
    /// scalar zeros and empty sequences are omitted.  If a tag appears more
    /// than once (e.g. as `l` and `nonneg`) the last entry wins.
    pub fn normalize(raw: &RawCone) -> Result<ConeSpec> {
        let mut spec = ConeSpec::default();

        for (key, value) in raw.entries.iter() {
            let Some(tag) = ConeTag::from_name(key) else {
                log::warn!("ignoring unrecognized cone tag `{}`", key);
                continue;
            };

            match tag {
                ConeTag::Zero => spec.zero = nonzero(scalar_count(tag, value)?),
                ConeTag::Nonneg => spec.nonneg = nonzero(scalar_count(tag, value)?),
                ConeTag::Exp => spec.exp = nonzero(scalar_count(tag, value)?),
                ConeTag::DualExp => spec.dual_exp = nonzero(scalar_count(tag, value)?),
                ConeTag::Soc => spec.soc = nonempty(integer_sequence(tag, value)?),
                ConeTag::Psd => spec.psd = nonempty(integer_sequence(tag, value)?),
                ConeTag::Power => spec.power = nonempty(float_sequence(tag, value)?),
            }
        }
        Ok(spec)
    }

    /// Add `n` equality rows
    pub fn with_zero(mut self, n: usize) -> Self {
        self.zero = nonzero(n as i64);
        self
    }

    /// Add `n` linear inequality rows
    pub fn with_nonneg(mut self, n: usize) -> Self {
        self.nonneg = nonzero(n as i64);
        self
    }

    /// Add `n` primal exponential cones
    pub fn with_exp(mut self, n: usize) -> Self {
        self.exp = nonzero(n as i64);
        self
    }

    /// Add `n` dual exponential cones
    pub fn with_dual_exp(mut self, n: usize) -> Self {
        self.dual_exp = nonzero(n as i64);
        self
    }

    /// Set the second order cone dimensions
    pub fn with_soc(mut self, dims: Vec<usize>) -> Self {
        self.soc = nonempty(dims.into_iter().map(|d| d as i64).collect());
        self
    }

    /// Set the positive semidefinite cone side lengths
    pub fn with_psd(mut self, dims: Vec<usize>) -> Self {
        self.psd = nonempty(dims.into_iter().map(|d| d as i64).collect());
        self
    }

    /// Set the power cone exponents
    pub fn with_power(mut self, exponents: Vec<f64>) -> Self {
        self.power = nonempty(exponents);
        self
    }

    pub fn zero(&self) -> i64 {
        self.zero.unwrap_or(0)
    }
    pub fn nonneg(&self) -> i64 {
        self.nonneg.unwrap_or(0)
    }
    pub fn exp(&self) -> i64 {
        self.exp.unwrap_or(0)
    }
    pub fn dual_exp(&self) -> i64 {
        self.dual_exp.unwrap_or(0)
    }
    pub fn soc(&self) -> &[i64] {
        self.soc.as_deref().unwrap_or(&[])
    }
    pub fn psd(&self) -> &[i64] {
        self.psd.as_deref().unwrap_or(&[])
    }
    pub fn power(&self) -> &[f64] {
        self.power.as_deref().unwrap_or(&[])
    }

    /// Tags stored in canonical form, in row order
    pub fn tags(&self) -> Vec<ConeTag> {
        let present = [
            (ConeTag::Zero, self.zero.is_some()),
            (ConeTag::Nonneg, self.nonneg.is_some()),
            (ConeTag::Soc, self.soc.is_some()),
            (ConeTag::Psd, self.psd.is_some()),
            (ConeTag::Exp, self.exp.is_some()),
            (ConeTag::DualExp, self.dual_exp.is_some()),
            (ConeTag::Power, self.power.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(tag, is_present)| is_present.then_some(tag))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tags().is_empty()
    }

    /// Check signs of all counts and the range of all power exponents.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            (ConeTag::Zero, self.zero()),
            (ConeTag::Nonneg, self.nonneg()),
            (ConeTag::Exp, self.exp()),
            (ConeTag::DualExp, self.dual_exp()),
        ];
        for (tag, v) in scalars {
            if v < 0 {
                return Err(invalid(tag, format!("count {} is negative", v)));
            }
        }

        for (tag, dims) in [(ConeTag::Soc, self.soc()), (ConeTag::Psd, self.psd())] {
            if let Some(d) = dims.iter().find(|&&d| d < 0) {
                return Err(invalid(tag, format!("dimension {} is negative", d)));
            }
        }

        for &a in self.power() {
            if !a.is_finite() || a <= -1.0 || a >= 1.0 || a == 0.0 {
                return Err(invalid(
                    ConeTag::Power,
                    format!("exponent {} is outside (-1,1)\\{{0}}", a),
                ));
            }
        }
        Ok(())
    }

    /// Total number of rows spanned by the cones.
    pub fn dimension(&self) -> Result<usize> {
        self.validate()?;

        let overflow = || Error::InvalidCone {
            tag: "cone".to_string(),
            reason: "dimension overflows".to_string(),
        };

        let psd_rows = self.psd().iter().try_fold(0i64, |acc, &k| {
            k.checked_add(1)
                .and_then(|k1| k.checked_mul(k1))
                .and_then(|kk| acc.checked_add(kk / 2))
        });
        let soc_rows = self.soc().iter().try_fold(0i64, |acc, &d| acc.checked_add(d));
        let power_rows = i64::try_from(self.power().len())
            .ok()
            .and_then(|n| n.checked_mul(3));

        let terms = [
            Some(self.zero()),
            Some(self.nonneg()),
            self.exp().checked_mul(3),
            self.dual_exp().checked_mul(3),
            soc_rows,
            psd_rows,
            power_rows,
        ];
        let total = terms
            .into_iter()
            .try_fold(0i64, |acc, t| t.and_then(|t| acc.checked_add(t)))
            .ok_or_else(overflow)?;

        usize::try_from(total).map_err(|_| overflow())
    }

    /// The cone blocks in row order.
    pub fn blocks(&self) -> Result<Vec<ConeBlock>> {
        self.validate()?;

        let mut blocks = Vec::new();
        if self.zero() > 0 {
            blocks.push(ConeBlock::Zero(self.zero() as usize));
        }
        if self.nonneg() > 0 {
            blocks.push(ConeBlock::Nonneg(self.nonneg() as usize));
        }
        blocks.extend(self.soc().iter().map(|&d| ConeBlock::Soc(d as usize)));
        blocks.extend(self.psd().iter().map(|&k| ConeBlock::Psd(k as usize)));
        blocks.extend((0..self.exp()).map(|_| ConeBlock::Exp));
        blocks.extend((0..self.dual_exp()).map(|_| ConeBlock::DualExp));
        blocks.extend(self.power().iter().map(|&a| ConeBlock::Power(a)));

        Ok(blocks)
    }
}

/// A cone description accepted by [`Workspace`](crate::solver::Workspace)
/// and the one-shot [`solve`](crate::solver::solve): either an already
/// canonical [`ConeSpec`] or a loosely typed [`RawCone`].
pub trait ConeDescription {
    /// A fresh canonical copy of the description
    fn to_cone_spec(&self) -> Result<ConeSpec>;
}

impl ConeDescription for ConeSpec {
    fn to_cone_spec(&self) -> Result<ConeSpec> {
        Ok(self.clone())
    }
}

impl ConeDescription for RawCone {
    fn to_cone_spec(&self) -> Result<ConeSpec> {
        ConeSpec::normalize(self)
    }
}

// ---------------------------------------------------------
// coercion helpers for raw cone values
// ---------------------------------------------------------

fn invalid(tag: ConeTag, reason: impl Into<String>) -> Error {
    Error::InvalidCone {
        tag: tag.name().to_string(),
        reason: reason.into(),
    }
}

fn nonzero(v: i64) -> Option<i64> {
    (v != 0).then_some(v)
}

fn nonempty<T>(v: Vec<T>) -> Option<Vec<T>> {
    (!v.is_empty()).then_some(v)
}

fn integral(tag: ConeTag, v: f64) -> Result<i64> {
    if v.is_finite() && v.fract() == 0.0 {
        Ok(v as i64)
    } else {
        Err(invalid(tag, format!("expected an integer, got {}", v)))
    }
}

fn scalar_count(tag: ConeTag, value: &ConeValue) -> Result<i64> {
    match value {
        ConeValue::Int(i) => Ok(*i),
        ConeValue::Float(f) => integral(tag, *f),
        ConeValue::Seq(_) => Err(invalid(tag, "expected a scalar count, got a sequence")),
    }
}

fn integer_sequence(tag: ConeTag, value: &ConeValue) -> Result<Vec<i64>> {
    match value {
        ConeValue::Seq(NumericVec::I64(v)) => Ok(v.clone()),
        ConeValue::Seq(NumericVec::I32(v)) => Ok(v.iter().map(|&x| i64::from(x)).collect()),
        ConeValue::Seq(NumericVec::F64(v)) => v.iter().map(|&x| integral(tag, x)).collect(),
        ConeValue::Seq(NumericVec::F32(v)) => v
            .iter()
            .map(|&x| integral(tag, f64::from(x)))
            .collect(),
        _ => Err(invalid(tag, "expected a sequence, got a scalar")),
    }
}

fn float_sequence(tag: ConeTag, value: &ConeValue) -> Result<Vec<f64>> {
    match value {
        ConeValue::Seq(v) => Ok(v.to_f64_vec()),
        _ => Err(invalid(tag, "expected a sequence, got a scalar")),
    }
}
