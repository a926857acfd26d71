//! Parameter metadata types.
//!
//! - [`ParameterInfo`] - Complete parameter description (id, name, kind, flags)
//! - [`ParameterFlags`] - Behavioral flags (automation, meter, bypass)
//! - [`ParameterKind`] - Closed set of value kinds with their range rules

use crate::types::ParameterValue;

/// Value kind of a parameter.
///
/// Every format adapter switches on this tag instead of inspecting concrete
/// parameter types, so the set of behaviours per kind lives in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterKind {
    /// Continuous value in `min..=max`. `skew` of 1.0 is linear; values below
    /// 1.0 spend more of the normalized range near `min`.
    Float { min: f64, max: f64, skew: f64 },
    /// Whole numbers in `min..=max`.
    Int { min: i32, max: i32 },
    /// On/off switch.
    Bool,
    /// One of a fixed list of named choices.
    Choice { choices: &'static [&'static str] },
    /// Raw normalized value with no plain-unit interpretation.
    Generic,
}

impl ParameterKind {
    /// Linear float range.
    pub const fn float(min: f64, max: f64) -> Self {
        ParameterKind::Float { min, max, skew: 1.0 }
    }

    /// Lowest plain value.
    pub fn min_plain(&self) -> f64 {
        match *self {
            ParameterKind::Float { min, .. } => min,
            ParameterKind::Int { min, .. } => min as f64,
            ParameterKind::Bool | ParameterKind::Choice { .. } | ParameterKind::Generic => 0.0,
        }
    }

    /// Highest plain value.
    pub fn max_plain(&self) -> f64 {
        match *self {
            ParameterKind::Float { max, .. } => max,
            ParameterKind::Int { max, .. } => max as f64,
            ParameterKind::Bool | ParameterKind::Generic => 1.0,
            ParameterKind::Choice { choices } => choices.len().saturating_sub(1) as f64,
        }
    }

    /// Number of discrete steps, 0 for continuous kinds.
    pub fn step_count(&self) -> i32 {
        match *self {
            ParameterKind::Float { .. } | ParameterKind::Generic => 0,
            ParameterKind::Int { min, max } => (max - min).max(0),
            ParameterKind::Bool => 1,
            ParameterKind::Choice { choices } => choices.len().saturating_sub(1) as i32,
        }
    }

    /// Map a normalized value to plain units.
    pub fn normalized_to_plain(&self, normalized: ParameterValue) -> f64 {
        let v = normalized.clamp(0.0, 1.0);
        match *self {
            ParameterKind::Float { min, max, skew } => {
                let shaped = if skew != 1.0 && v > 0.0 {
                    (v.ln() / skew).exp()
                } else {
                    v
                };
                min + (max - min) * shaped
            }
            ParameterKind::Int { min, max } => (min as f64 + (max - min) as f64 * v).round(),
            ParameterKind::Bool => {
                if v >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            ParameterKind::Choice { .. } => (v * self.max_plain()).round(),
            ParameterKind::Generic => v,
        }
    }

    /// Map a plain value to the normalized range.
    pub fn plain_to_normalized(&self, plain: f64) -> ParameterValue {
        let (min, max) = (self.min_plain(), self.max_plain());
        if max <= min {
            return 0.0;
        }
        let linear = ((plain - min) / (max - min)).clamp(0.0, 1.0);
        match *self {
            ParameterKind::Float { skew, .. } if skew != 1.0 && linear > 0.0 => {
                (skew * linear.ln()).exp()
            }
            _ => linear,
        }
    }
}

/// Flags controlling parameter behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterFlags {
    /// Parameter can be automated by the host.
    pub can_automate: bool,
    /// Parameter reports a level and is never written by the host.
    pub is_meter: bool,
    /// Parameter is the bypass switch.
    pub is_bypass: bool,
}

impl Default for ParameterFlags {
    fn default() -> Self {
        Self {
            can_automate: true,
            is_meter: false,
            is_bypass: false,
        }
    }
}

/// Complete description of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterInfo {
    /// Stable string identifier, used in saved state and descriptor symbols.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Unit label (e.g., "dB", "Hz").
    pub label: &'static str,
    pub kind: ParameterKind,
    /// Default value, normalized.
    pub default_normalized: ParameterValue,
    pub flags: ParameterFlags,
    /// Decimal places used when rendering float values as text.
    pub precision: usize,
}

impl ParameterInfo {
    /// Create parameter info with a plain default value.
    pub fn new(id: &'static str, name: &'static str, kind: ParameterKind, default_plain: f64) -> Self {
        Self {
            id,
            name,
            label: "",
            kind,
            default_normalized: kind.plain_to_normalized(default_plain),
            flags: ParameterFlags::default(),
            precision: 2,
        }
    }

    pub const fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub const fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub const fn with_flags(mut self, flags: ParameterFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark as not automatable.
    pub const fn non_automatable(mut self) -> Self {
        self.flags.can_automate = false;
        self
    }

    /// Mark as a bypass switch.
    pub const fn bypass(mut self) -> Self {
        self.flags.is_bypass = true;
        self
    }

    /// Mark as a read-only meter.
    pub const fn meter(mut self) -> Self {
        self.flags.is_meter = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_linear_mapping() {
        let kind = ParameterKind::float(-60.0, 12.0);
        assert_eq!(kind.normalized_to_plain(0.0), -60.0);
        assert_eq!(kind.normalized_to_plain(1.0), 12.0);
        assert!((kind.plain_to_normalized(0.0) - 60.0 / 72.0).abs() < 1e-12);
    }

    #[test]
    fn test_float_skewed_round_trip() {
        let kind = ParameterKind::Float {
            min: 20.0,
            max: 20000.0,
            skew: 0.3,
        };
        let plain = kind.normalized_to_plain(0.5);
        assert!(plain < 10010.0);
        assert!((kind.plain_to_normalized(plain) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_int_rounds() {
        let kind = ParameterKind::Int { min: 1, max: 4 };
        assert_eq!(kind.normalized_to_plain(0.5), 3.0);
        assert_eq!(kind.step_count(), 3);
    }

    #[test]
    fn test_choice_range() {
        let kind = ParameterKind::Choice {
            choices: &["Sine", "Saw", "Square"],
        };
        assert_eq!(kind.max_plain(), 2.0);
        assert_eq!(kind.normalized_to_plain(0.74), 1.0);
        assert_eq!(kind.plain_to_normalized(2.0), 1.0);
    }

    #[test]
    fn test_default_flags() {
        let info = ParameterInfo::new("mix", "Mix", ParameterKind::Generic, 0.5);
        assert!(info.flags.can_automate);
        assert!(!info.flags.is_meter);
        assert_eq!(info.default_normalized, 0.5);
        assert!(!info.non_automatable().flags.can_automate);
    }
}
