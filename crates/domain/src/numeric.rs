//! Numeric field schemas and constraint checking
//!
//! Every numeric field on a sheet (attributes, combat stats) is described by
//! a [`NumericSchema`]: value type, bounds, step, and default. The schema
//! decides acceptance of candidate values and computes effective `[min, max]`
//! bounds for input widgets.
//!
//! A `maximum` of the string sentinel `"dynamic"` means the cap is the live
//! value of a paired field, supplied at evaluation time by the caller.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Largest integer exactly representable in an f64; unconstrained widget
/// bounds default to +/- this value.
pub const MAX_WIDGET_BOUND: f64 = 9_007_199_254_740_991.0; // 2^53 - 1

/// Gap used to narrow an exclusive real bound to an inclusive widget bound.
const REAL_BOUND_EPSILON: f64 = 1e-9;

/// Whether a field holds whole numbers or reals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Integer,
    Real,
}

/// The `"dynamic"` sentinel in a maximum position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamicMarker {
    #[serde(rename = "dynamic")]
    Dynamic,
}

/// Upper bound of a numeric schema: a concrete number, or capped by a paired
/// field's live value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaximumBound {
    Dynamic(DynamicMarker),
    Value(f64),
}

impl MaximumBound {
    pub fn dynamic() -> Self {
        Self::Dynamic(DynamicMarker::Dynamic)
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }

    /// The concrete bound, if this is not the dynamic sentinel.
    pub fn as_value(&self) -> Option<f64> {
        match self {
            Self::Value(value) => Some(*value),
            Self::Dynamic(_) => None,
        }
    }
}

/// Effective inclusive bounds for an input widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Legal values for one numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericSchema {
    /// integer or real
    pub value_type: ValueType,
    /// Inclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive upper bound, or the "dynamic" sentinel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<MaximumBound>,
    /// Strict lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    /// Strict upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    /// Value must be an integer multiple of this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Used when a record lacks this field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
}

impl NumericSchema {
    /// Schema for an unbounded integer field; builder methods refine it.
    pub fn integer() -> Self {
        Self {
            value_type: ValueType::Integer,
            minimum: None,
            maximum: None,
            exclusive_minimum: None,
            exclusive_maximum: None,
            step: None,
            default: None,
        }
    }

    /// Schema for an unbounded real field.
    pub fn real() -> Self {
        Self {
            value_type: ValueType::Real,
            ..Self::integer()
        }
    }

    /// Builder: inclusive lower bound
    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Builder: inclusive upper bound
    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(MaximumBound::Value(maximum));
        self
    }

    /// Builder: dynamic upper bound (capped by a paired field)
    pub fn with_dynamic_maximum(mut self) -> Self {
        self.maximum = Some(MaximumBound::dynamic());
        self
    }

    /// Builder: strict lower bound
    pub fn with_exclusive_minimum(mut self, bound: f64) -> Self {
        self.exclusive_minimum = Some(bound);
        self
    }

    /// Builder: strict upper bound
    pub fn with_exclusive_maximum(mut self, bound: f64) -> Self {
        self.exclusive_maximum = Some(bound);
        self
    }

    /// Builder: step constraint
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Builder: default value
    pub fn with_default(mut self, default: f64) -> Self {
        self.default = Some(default);
        self
    }

    /// True if the upper bound is the dynamic sentinel.
    pub fn has_dynamic_maximum(&self) -> bool {
        self.maximum.map(|m| m.is_dynamic()).unwrap_or(false)
    }

    /// The value used when a record lacks this field.
    pub fn default_value(&self) -> f64 {
        self.default.unwrap_or(0.0)
    }

    /// Decide whether `value` is acceptable under this schema.
    ///
    /// `dynamic_cap` is the paired field's live value; when the maximum is
    /// dynamic and no cap is supplied, the upper bound is not enforced.
    /// Inclusive and exclusive bounds on the same side are both enforced
    /// independently, so the stricter one wins.
    pub fn accepts(&self, value: f64, dynamic_cap: Option<f64>) -> bool {
        if !value.is_finite() {
            return false;
        }
        if self.value_type == ValueType::Integer && value.fract() != 0.0 {
            return false;
        }
        if let Some(minimum) = self.minimum {
            if value < minimum {
                return false;
            }
        }
        match self.maximum {
            Some(MaximumBound::Value(maximum)) => {
                if value > maximum {
                    return false;
                }
            }
            Some(MaximumBound::Dynamic(_)) => {
                if let Some(cap) = dynamic_cap {
                    if value > cap {
                        return false;
                    }
                }
            }
            None => {}
        }
        if let Some(bound) = self.exclusive_minimum {
            if value <= bound {
                return false;
            }
        }
        if let Some(bound) = self.exclusive_maximum {
            if value >= bound {
                return false;
            }
        }
        if let Some(step) = self.step {
            if !is_multiple_of(value, step) {
                return false;
            }
        }
        true
    }

    /// Effective inclusive `[min, max]` for input widgets.
    ///
    /// Exclusive bounds are narrowed to the nearest legal inclusive value
    /// (integer: +/-1, real: +/- epsilon); unconstrained sides fall back to
    /// the representable integer extremes.
    pub fn effective_bounds(&self, dynamic_cap: Option<f64>) -> Bounds {
        let narrow = match self.value_type {
            ValueType::Integer => 1.0,
            ValueType::Real => REAL_BOUND_EPSILON,
        };

        let mut min = -MAX_WIDGET_BOUND;
        if let Some(minimum) = self.minimum {
            min = min.max(minimum);
        }
        if let Some(bound) = self.exclusive_minimum {
            min = min.max(bound + narrow);
        }

        let mut max = MAX_WIDGET_BOUND;
        match self.maximum {
            Some(MaximumBound::Value(maximum)) => max = max.min(maximum),
            Some(MaximumBound::Dynamic(_)) => {
                if let Some(cap) = dynamic_cap {
                    max = max.min(cap);
                }
            }
            None => {}
        }
        if let Some(bound) = self.exclusive_maximum {
            max = max.min(bound - narrow);
        }

        Bounds { min, max }
    }

    /// Intra-schema invariants, reported at `path` within `document`.
    pub(crate) fn check_invariants(&self, document: &str, path: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let (Some(minimum), Some(MaximumBound::Value(maximum))) = (self.minimum, self.maximum) {
            if minimum > maximum {
                errors.push(ValidationError::new(
                    document,
                    path,
                    format!("minimum {} exceeds maximum {}", minimum, maximum),
                ));
            }
        }
        if let (Some(lower), Some(upper)) = (self.exclusive_minimum, self.exclusive_maximum) {
            if lower >= upper {
                errors.push(ValidationError::new(
                    document,
                    path,
                    format!(
                        "exclusiveMinimum {} must be less than exclusiveMaximum {}",
                        lower, upper
                    ),
                ));
            }
        }
        if let Some(step) = self.step {
            if step <= 0.0 {
                errors.push(ValidationError::new(
                    document,
                    path,
                    format!("step must be positive, got {}", step),
                ));
            }
        }
        errors
    }
}

/// Epsilon-tolerant "value is an integer multiple of step".
fn is_multiple_of(value: f64, step: f64) -> bool {
    if step == 0.0 {
        return false;
    }
    let ratio = value / step;
    (ratio - ratio.round()).abs() < 1e-9
}
