use crate::solver::core::error::{Error, Result};
use derive_builder::Builder;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::collections::BTreeMap;
#[cfg(feature = "serde")]
use std::{fs::File, io, io::Read, io::Write};

/// Default values for every setting.  This is an immutable constant;
/// overrides are merged functionally onto a copy.
pub const DEFAULT_SETTINGS: Settings = Settings {
    normalize: true,
    scale: 1.0,
    primal_regularization: 1e-3,
    max_iters: 2500,
    eps: 1e-3,
    alpha: 1.5,
    cg_rate: 2.0,
    verbose: true,
    use_indirect_method: false,
};

/// Solver settings.
///
/// The first four fields (`use_indirect_method`, `primal_regularization`,
/// `normalize`, `scale`) determine the cached state of a
/// [`Workspace`](crate::solver::Workspace) and are fixed for its lifetime.
/// The rest may change between solves.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    ///solve linear systems with conjugate gradients instead of a factorization
    #[builder(default = "DEFAULT_SETTINGS.use_indirect_method")]
    #[cfg_attr(feature = "serde", serde(alias = "use_indirect"))]
    pub use_indirect_method: bool,

    ///diagonal regularization of the linear system (`rho_x`)
    #[builder(default = "DEFAULT_SETTINGS.primal_regularization")]
    #[cfg_attr(feature = "serde", serde(alias = "rho_x"))]
    pub primal_regularization: f64,

    ///enable data equilibration
    #[builder(default = "DEFAULT_SETTINGS.normalize")]
    pub normalize: bool,

    ///objective scaling applied together with equilibration
    #[builder(default = "DEFAULT_SETTINGS.scale")]
    pub scale: f64,

    ///maximum number of iterations
    #[builder(default = "DEFAULT_SETTINGS.max_iters")]
    pub max_iters: u32,

    ///convergence tolerance
    #[builder(default = "DEFAULT_SETTINGS.eps")]
    pub eps: f64,

    ///over-relaxation parameter
    #[builder(default = "DEFAULT_SETTINGS.alpha")]
    pub alpha: f64,

    ///conjugate gradient tolerance decay rate (indirect method only)
    #[builder(default = "DEFAULT_SETTINGS.cg_rate")]
    pub cg_rate: f64,

    ///log progress at `info` level
    #[builder(default = "DEFAULT_SETTINGS.verbose")]
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Settings {
        DEFAULT_SETTINGS
    }
}

/// Names of all settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    UseIndirectMethod,
    PrimalRegularization,
    Normalize,
    Scale,
    MaxIters,
    Eps,
    Alpha,
    CgRate,
    Verbose,
}

impl SettingKey {
    pub fn name(&self) -> &'static str {
        match self {
            SettingKey::UseIndirectMethod => "use_indirect_method",
            SettingKey::PrimalRegularization => "primal_regularization",
            SettingKey::Normalize => "normalize",
            SettingKey::Scale => "scale",
            SettingKey::MaxIters => "max_iters",
            SettingKey::Eps => "eps",
            SettingKey::Alpha => "alpha",
            SettingKey::CgRate => "cg_rate",
            SettingKey::Verbose => "verbose",
        }
    }

    /// Resolve a setting name or alias
    pub fn from_name(name: &str) -> Option<SettingKey> {
        SETTING_NAMES.get(name).copied()
    }
}

lazy_static! {
    static ref SETTING_NAMES: HashMap<&'static str, SettingKey> = {
        let mut names = HashMap::new();
        for key in [
            SettingKey::UseIndirectMethod,
            SettingKey::PrimalRegularization,
            SettingKey::Normalize,
            SettingKey::Scale,
            SettingKey::MaxIters,
            SettingKey::Eps,
            SettingKey::Alpha,
            SettingKey::CgRate,
            SettingKey::Verbose,
        ] {
            names.insert(key.name(), key);
        }
        names.insert("use_indirect", SettingKey::UseIndirectMethod);
        names.insert("rho_x", SettingKey::PrimalRegularization);
        names
    };
}

/// A loosely typed setting value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(v) => write!(f, "{}", v),
            SettingValue::Int(v) => write!(f, "{}", v),
            SettingValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}
impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}
impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        SettingValue::Int(i64::from(v))
    }
}
impl From<u32> for SettingValue {
    fn from(v: u32) -> Self {
        SettingValue::Int(i64::from(v))
    }
}
impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        SettingValue::Float(v)
    }
}

/// An ordered set of `key = value` setting overrides.
///
/// Keys may be canonical names or aliases; unrecognized keys are dropped
/// with a warning when merged.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "BTreeMap<String, SettingValue>"))]
pub struct SettingsOverrides {
    entries: Vec<(String, SettingValue)>,
}

impl SettingsOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an override, returning the extended set
    pub fn set(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse overrides from a JSON object
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<K, V> FromIterator<(K, V)> for SettingsOverrides
where
    K: Into<String>,
    V: Into<SettingValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { entries }
    }
}

#[cfg(feature = "serde")]
impl From<BTreeMap<String, SettingValue>> for SettingsOverrides {
    fn from(map: BTreeMap<String, SettingValue>) -> Self {
        map.into_iter().collect()
    }
}

// ---------------------------------------------------------
// merging and validation
// ---------------------------------------------------------

fn invalid(key: &str, reason: impl Into<String>) -> Error {
    Error::InvalidSetting {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn as_bool(key: &str, v: &SettingValue) -> Result<bool> {
    match v {
        SettingValue::Bool(b) => Ok(*b),
        _ => Err(invalid(key, format!("expected a boolean, got {}", v))),
    }
}

fn as_float(key: &str, v: &SettingValue) -> Result<f64> {
    match v {
        SettingValue::Float(f) => Ok(*f),
        SettingValue::Int(i) => Ok(*i as f64),
        SettingValue::Bool(_) => Err(invalid(key, format!("expected a number, got {}", v))),
    }
}

fn as_count(key: &str, v: &SettingValue) -> Result<u32> {
    let i = match v {
        SettingValue::Int(i) => *i,
        SettingValue::Float(f) if f.is_finite() && f.fract() == 0.0 => *f as i64,
        _ => return Err(invalid(key, format!("expected an integer, got {}", v))),
    };
    u32::try_from(i).map_err(|_| invalid(key, format!("{} is not in 0..={}", i, u32::MAX)))
}

impl Settings {
    /// Returns a copy of `self` with `overrides` applied and validated.
    /// `self` is never modified, so a failed merge leaves no trace.
    pub fn merged(&self, overrides: &SettingsOverrides) -> Result<Settings> {
        let mut out = self.clone();

        for (name, value) in overrides.iter() {
            let Some(key) = SettingKey::from_name(name) else {
                log::warn!("ignoring unrecognized setting `{}`", name);
                continue;
            };
            match key {
                SettingKey::UseIndirectMethod => out.use_indirect_method = as_bool(name, value)?,
                SettingKey::PrimalRegularization => {
                    out.primal_regularization = as_float(name, value)?
                }
                SettingKey::Normalize => out.normalize = as_bool(name, value)?,
                SettingKey::Scale => out.scale = as_float(name, value)?,
                SettingKey::MaxIters => out.max_iters = as_count(name, value)?,
                SettingKey::Eps => out.eps = as_float(name, value)?,
                SettingKey::Alpha => out.alpha = as_float(name, value)?,
                SettingKey::CgRate => out.cg_rate = as_float(name, value)?,
                SettingKey::Verbose => out.verbose = as_bool(name, value)?,
            }
        }

        out.validate()?;
        Ok(out)
    }

    /// Checks that all numerical values are in range.
    pub fn validate(&self) -> Result<()> {
        validate_positive("primal_regularization", self.primal_regularization)?;
        validate_positive("scale", self.scale)?;
        validate_positive("eps", self.eps)?;
        validate_alpha(self.alpha)?;
        validate_positive("cg_rate", self.cg_rate)?;
        Ok(())
    }

    /// The current value of `key`
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::UseIndirectMethod => self.use_indirect_method.into(),
            SettingKey::PrimalRegularization => self.primal_regularization.into(),
            SettingKey::Normalize => self.normalize.into(),
            SettingKey::Scale => self.scale.into(),
            SettingKey::MaxIters => self.max_iters.into(),
            SettingKey::Eps => self.eps.into(),
            SettingKey::Alpha => self.alpha.into(),
            SettingKey::CgRate => self.cg_rate.into(),
            SettingKey::Verbose => self.verbose.into(),
        }
    }
}

#[cfg(feature = "serde")]
impl Settings {
    /// Write the settings to a JSON file
    pub fn write_to_file(&self, file: &mut File) -> std::result::Result<(), io::Error> {
        let json = serde_json::to_string_pretty(self)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Read settings from a JSON file.  Missing fields take their
    /// default values.
    pub fn read_from_file(file: &mut File) -> std::result::Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let settings: Settings = serde_json::from_str(&buffer)?;
        settings
            .validate()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        Ok(settings)
    }
}

fn validate_positive(key: &str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(key, format!("{} must be positive and finite", v)))
    }
}

fn validate_alpha(v: f64) -> Result<()> {
    if v > 0.0 && v < 2.0 {
        Ok(())
    } else {
        Err(invalid("alpha", format!("{} is not in (0,2)", v)))
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<Error> for SettingsBuilderError {
    fn from(e: Error) -> Self {
        SettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl SettingsBuilder {
    pub fn validate(&self) -> Result<()> {
        if let Some(v) = self.primal_regularization {
            validate_positive("primal_regularization", v)?;
        }
        if let Some(v) = self.scale {
            validate_positive("scale", v)?;
        }
        if let Some(v) = self.eps {
            validate_positive("eps", v)?;
        }
        if let Some(v) = self.alpha {
            validate_alpha(v)?;
        }
        if let Some(v) = self.cg_rate {
            validate_positive("cg_rate", v)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// fixed partition
// ---------------------------------------------------------

/// Snapshot of the settings that are fixed at workspace creation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedSettings {
    pub use_indirect_method: bool,
    pub primal_regularization: f64,
    pub normalize: bool,
    pub scale: f64,
}

impl From<&Settings> for FixedSettings {
    fn from(s: &Settings) -> Self {
        Self {
            use_indirect_method: s.use_indirect_method,
            primal_regularization: s.primal_regularization,
            normalize: s.normalize,
            scale: s.scale,
        }
    }
}

macro_rules! check_immutable_setting {
    ($self:expr, $live:expr, $field:ident) => {
        if $self.$field != $live.$field {
            return Err(Error::FixedSettingChanged {
                key: stringify!($field),
                fixed: $self.$field.to_string(),
                requested: $live.$field.to_string(),
            });
        }
    };
}

impl FixedSettings {
    /// Check that every fixed key of `live` still equals the snapshot
    pub fn check(&self, live: &Settings) -> Result<()> {
        check_immutable_setting!(self, live, use_indirect_method);
        check_immutable_setting!(self, live, primal_regularization);
        check_immutable_setting!(self, live, normalize);
        check_immutable_setting!(self, live, scale);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s, SettingsBuilder::default().build().unwrap());
        assert!(s.normalize);
        assert_eq!(s.scale, 1.0);
        assert_eq!(s.primal_regularization, 1e-3);
        assert_eq!(s.max_iters, 2500);
        assert_eq!(s.eps, 1e-3);
        assert_eq!(s.alpha, 1.5);
        assert_eq!(s.cg_rate, 2.0);
        assert!(s.verbose);
        assert!(!s.use_indirect_method);
    }

    #[test]
    fn test_merge_aliases_and_unknown_keys() {
        let ovr = SettingsOverrides::new()
            .set("rho_x", 1e-4)
            .set("use_indirect", true)
            .set("max_iters", 100)
            .set("warm_start", true);

        let s = DEFAULT_SETTINGS.merged(&ovr).unwrap();
        assert_eq!(s.primal_regularization, 1e-4);
        assert!(s.use_indirect_method);
        assert_eq!(s.max_iters, 100);
        // defaults untouched
        assert_eq!(Settings::default().max_iters, 2500);
    }

    #[test]
    fn test_merge_rejects_bad_values() {
        let bad = [
            SettingsOverrides::new().set("eps", -1.0),
            SettingsOverrides::new().set("alpha", 2.0),
            SettingsOverrides::new().set("normalize", 1.0),
            SettingsOverrides::new().set("max_iters", -1),
            SettingsOverrides::new().set("max_iters", 2.5),
            SettingsOverrides::new().set("scale", true),
        ];
        for ovr in bad {
            assert!(matches!(
                Settings::default().merged(&ovr),
                Err(Error::InvalidSetting { .. })
            ));
        }
        // integers are accepted for float settings
        let s = Settings::default()
            .merged(&SettingsOverrides::new().set("scale", 5))
            .unwrap();
        assert_eq!(s.scale, 5.0);
    }

    #[test]
    fn test_builder_validation() {
        assert!(SettingsBuilder::default().eps(0.0).build().is_err());
        assert!(SettingsBuilder::default().alpha(1.8).build().is_ok());
    }

    #[test]
    fn test_fixed_check() {
        let s = Settings::default();
        let fixed = FixedSettings::from(&s);
        assert!(fixed.check(&s).is_ok());

        let mut live = s.clone();
        live.eps = 1e-8;
        assert!(fixed.check(&live).is_ok());

        live.scale = 2.0;
        match fixed.check(&live) {
            Err(Error::FixedSettingChanged { key, .. }) => assert_eq!(key, "scale"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_setting_key_lookup() {
        assert_eq!(
            SettingKey::from_name("rho_x"),
            Some(SettingKey::PrimalRegularization)
        );
        assert_eq!(SettingKey::from_name("nope"), None);
        assert_eq!(
            Settings::default().get(SettingKey::MaxIters),
            SettingValue::Int(2500)
        );
    }
}
