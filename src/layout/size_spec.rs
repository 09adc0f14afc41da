//! Size requests for columns and rows and their resolution to pixels.
//!
//! A request is one of three shapes: a fixed extent, the natural size reported
//! by the host's measurement callback, or a proportional share of whatever
//! space is left after the other two kinds are placed.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Nominal size request for a column or row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SizeSpec {
    /// Exact pixel extent (still clamped to min/max).
    Fixed(f32),
    /// Natural size from the measurement callback.
    #[default]
    Auto,
    /// Weighted share of the remaining space ("star" sizing).
    Proportional(f32),
}

/// Outcome of resolving a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Final pixel size.
    Resolved(f32),
    /// Proportional request waiting for the star pass; carries the weight.
    Deferred(f32),
}

impl SizeSpec {
    /// Reject requests that can never produce a size.
    pub fn validate(&self) -> Result<()> {
        match *self {
            SizeSpec::Fixed(v) if v.is_nan() || v < 0.0 => {
                Err(GridError::InvalidSize(format!("fixed size {v}")))
            }
            SizeSpec::Proportional(w) if !w.is_finite() || w <= 0.0 => {
                Err(GridError::InvalidSize(format!("proportional weight {w}")))
            }
            _ => Ok(()),
        }
    }

    pub fn is_proportional(&self) -> bool {
        matches!(self, SizeSpec::Proportional(_))
    }

    /// True when resolving this request may call the measurement callback
    /// for the given available extent.
    pub fn needs_measure(&self, available: f32) -> bool {
        match self {
            SizeSpec::Fixed(_) => false,
            SizeSpec::Auto => true,
            SizeSpec::Proportional(_) => !available.is_finite(),
        }
    }

    /// Resolve against `available` space.
    ///
    /// `measure` receives the constraint (the max bound) and returns the
    /// natural size. It is called at most once, and never for `Fixed`.
    /// Proportional requests in finite space are deferred to the star pass;
    /// in unconstrained space they resolve exactly like `Auto`.
    pub fn resolve<F>(self, available: f32, constraints: SizeConstraints, measure: F) -> Resolution
    where
        F: FnOnce(f32) -> f32,
    {
        match self {
            SizeSpec::Fixed(v) => Resolution::Resolved(constraints.clamp(v)),
            SizeSpec::Proportional(weight) if available.is_finite() => Resolution::Deferred(weight),
            SizeSpec::Auto | SizeSpec::Proportional(_) => {
                Resolution::Resolved(constraints.clamp(measure(constraints.max)))
            }
        }
    }
}

/// Inclusive min/max bounds on a resolved size. `max` may be infinite.
///
/// In JSON an absent `max` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct SizeConstraints {
    min: f32,
    max: f32,
}

#[derive(Serialize, Deserialize)]
struct RawBounds {
    #[serde(default)]
    min: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f32>,
}

impl TryFrom<RawBounds> for SizeConstraints {
    type Error = GridError;

    fn try_from(raw: RawBounds) -> Result<Self> {
        SizeConstraints::new(raw.min, raw.max.unwrap_or(f32::INFINITY))
    }
}

impl From<SizeConstraints> for RawBounds {
    fn from(c: SizeConstraints) -> Self {
        RawBounds {
            min: c.min,
            max: c.max.is_finite().then_some(c.max),
        }
    }
}

impl Default for SizeConstraints {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl SizeConstraints {
    pub const UNBOUNDED: SizeConstraints = SizeConstraints {
        min: 0.0,
        max: f32::INFINITY,
    };

    /// Validated bounds. NaN, negative values and `max < min` are caller bugs
    /// and are reported rather than repaired.
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if min.is_nan() || max.is_nan() || min < 0.0 || max < 0.0 || max < min || min.is_infinite() {
            return Err(GridError::InvalidConstraint { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Same bounds with a different minimum, raising max if needed.
    pub fn with_min(self, min: f32) -> Self {
        let min = if min.is_finite() { min.max(0.0) } else { 0.0 };
        Self {
            min,
            max: self.max.max(min),
        }
    }

    /// Clamp into `[min, max]`. NaN input collapses to `min`.
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }

    /// Whether `value` already lies inside the bounds.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn bounds(min: f32, max: f32) -> SizeConstraints {
        SizeConstraints::new(min, max).unwrap()
    }

    #[test]
    fn fixed_clamps_without_measuring() {
        let calls = Cell::new(0);
        let r = SizeSpec::Fixed(500.0).resolve(300.0, bounds(10.0, 200.0), |_| {
            calls.set(calls.get() + 1);
            0.0
        });
        assert_eq!(r, Resolution::Resolved(200.0));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn auto_measures_at_max_constraint() {
        let seen = Cell::new(0.0);
        let r = SizeSpec::Auto.resolve(300.0, bounds(30.0, 120.0), |c| {
            seen.set(c);
            10.0
        });
        assert_eq!(seen.get(), 120.0);
        assert_eq!(r, Resolution::Resolved(30.0));
    }

    #[test]
    fn proportional_defers_in_finite_space() {
        let r = SizeSpec::Proportional(2.0).resolve(300.0, SizeConstraints::UNBOUNDED, |_| 80.0);
        assert_eq!(r, Resolution::Deferred(2.0));
    }

    #[test]
    fn proportional_degrades_to_auto_when_unconstrained() {
        let r = SizeSpec::Proportional(2.0).resolve(f32::INFINITY, SizeConstraints::UNBOUNDED, |_| 80.0);
        assert_eq!(r, Resolution::Resolved(80.0));
    }

    #[test]
    fn rejects_bad_constraints() {
        assert!(SizeConstraints::new(10.0, 5.0).is_err());
        assert!(SizeConstraints::new(-1.0, 5.0).is_err());
        assert!(SizeConstraints::new(f32::NAN, 5.0).is_err());
        assert!(SizeConstraints::new(0.0, f32::NAN).is_err());
        assert!(SizeConstraints::new(0.0, f32::INFINITY).is_ok());
    }

    #[test]
    fn rejects_bad_specs() {
        assert!(SizeSpec::Fixed(-3.0).validate().is_err());
        assert!(SizeSpec::Fixed(f32::NAN).validate().is_err());
        assert!(SizeSpec::Proportional(0.0).validate().is_err());
        assert!(SizeSpec::Proportional(1.5).validate().is_ok());
        assert!(SizeSpec::Auto.validate().is_ok());
    }

    #[test]
    fn spec_json_shape() {
        let spec: SizeSpec = serde_json::from_str(r#"{"kind":"fixed","value":50}"#).unwrap();
        assert_eq!(spec, SizeSpec::Fixed(50.0));
        let spec: SizeSpec = serde_json::from_str(r#"{"kind":"auto"}"#).unwrap();
        assert_eq!(spec, SizeSpec::Auto);
    }

    #[test]
    fn constraints_json_validates() {
        let c: SizeConstraints = serde_json::from_str(r#"{"min":20}"#).unwrap();
        assert_eq!(c.max(), f32::INFINITY);
        assert!(serde_json::from_str::<SizeConstraints>(r#"{"min":20,"max":10}"#).is_err());
    }
}
