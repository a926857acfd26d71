//! Parameters with encapsulated atomic storage.
//!
//! A [`Parameter`] pairs immutable [`ParameterInfo`] with an atomic normalized
//! value, so hosts can read and write it from any thread (including the audio
//! thread) without locks or allocation. A [`ParameterSet`] is the ordered,
//! index-addressed collection exposed to hosts.
//!
//! # Example
//!
//! ```ignore
//! use duplex_core::parameter::{Parameter, ParameterSet};
//! use duplex_core::parameter_info::{ParameterInfo, ParameterKind};
//!
//! let parameters = ParameterSet::new(vec![
//!     Parameter::new(ParameterInfo::new("gain", "Gain", ParameterKind::float(-60.0, 12.0), 0.0)
//!         .with_label("dB")),
//!     Parameter::new(ParameterInfo::new("mute", "Mute", ParameterKind::Bool, 0.0)),
//! ]);
//!
//! parameters.by_index(0).unwrap().set_plain(-6.0);
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::parameter_info::{ParameterInfo, ParameterKind};
use crate::types::{ParameterIndex, ParameterValue};

/// A single host-visible parameter.
#[derive(Debug)]
pub struct Parameter {
    info: ParameterInfo,
    /// Normalized value stored as `f64` bits.
    value: AtomicU64,
}

impl Parameter {
    /// Create a parameter at its default value.
    pub fn new(info: ParameterInfo) -> Self {
        Self {
            value: AtomicU64::new(info.default_normalized.clamp(0.0, 1.0).to_bits()),
            info,
        }
    }

    #[inline]
    pub fn info(&self) -> &ParameterInfo {
        &self.info
    }

    #[inline]
    pub fn id(&self) -> &'static str {
        self.info.id
    }

    #[inline]
    pub fn kind(&self) -> &ParameterKind {
        &self.info.kind
    }

    /// Unit label (e.g. "dB").
    #[inline]
    pub fn label(&self) -> &'static str {
        self.info.label
    }

    /// Display name truncated to `max_chars` characters.
    pub fn name(&self, max_chars: usize) -> &'static str {
        truncate_chars(self.info.name, max_chars)
    }

    #[inline]
    pub fn default_normalized(&self) -> ParameterValue {
        self.info.default_normalized
    }

    /// Whether a host may automate this parameter. Meters never are.
    pub fn is_automatable(&self) -> bool {
        self.info.flags.can_automate && !self.info.flags.is_meter
    }

    #[inline]
    pub fn is_bypass(&self) -> bool {
        self.info.flags.is_bypass
    }

    /// Current normalized value.
    #[inline]
    pub fn get_normalized(&self) -> ParameterValue {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Store a normalized value, clamped to `0.0..=1.0`.
    #[inline]
    pub fn set_normalized(&self, value: ParameterValue) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Current value in plain units.
    #[inline]
    pub fn plain(&self) -> f64 {
        self.info.kind.normalized_to_plain(self.get_normalized())
    }

    /// Store a plain value.
    #[inline]
    pub fn set_plain(&self, plain: f64) {
        self.set_normalized(self.info.kind.plain_to_normalized(plain));
    }

    /// Reset to the default value.
    pub fn reset(&self) {
        self.set_normalized(self.info.default_normalized);
    }

    /// Text for a normalized value (without the unit label).
    pub fn text_for(&self, normalized: ParameterValue) -> String {
        let plain = self.info.kind.normalized_to_plain(normalized);
        match self.info.kind {
            ParameterKind::Float { .. } => format!("{:.*}", self.info.precision, plain),
            ParameterKind::Int { .. } => format!("{}", plain as i64),
            ParameterKind::Bool => {
                if plain >= 0.5 {
                    "On".to_string()
                } else {
                    "Off".to_string()
                }
            }
            ParameterKind::Choice { choices } => choices
                .get(plain as usize)
                .map(|c| c.to_string())
                .unwrap_or_default(),
            ParameterKind::Generic => format!("{:.*}", self.info.precision, normalized),
        }
    }

    /// Text for the current value.
    pub fn text(&self) -> String {
        self.text_for(self.get_normalized())
    }

    /// Parse user text into a normalized value.
    ///
    /// Accepts the strings produced by [`text_for`](Self::text_for), with or
    /// without the unit label. Returns `None` when the text is not a value of
    /// this parameter.
    pub fn value_for_text(&self, text: &str) -> Option<ParameterValue> {
        let trimmed = text.trim();
        let trimmed = trimmed
            .strip_suffix(self.info.label)
            .filter(|_| !self.info.label.is_empty())
            .unwrap_or(trimmed)
            .trim();

        match self.info.kind {
            ParameterKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "on" | "true" | "yes" | "1" => Some(1.0),
                "off" | "false" | "no" | "0" => Some(0.0),
                _ => None,
            },
            ParameterKind::Choice { choices } => {
                if let Some(index) = choices.iter().position(|c| c.eq_ignore_ascii_case(trimmed)) {
                    return Some(self.info.kind.plain_to_normalized(index as f64));
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .map(|index| self.info.kind.plain_to_normalized(index))
            }
            ParameterKind::Generic => trimmed.parse::<f64>().ok().map(|v| v.clamp(0.0, 1.0)),
            ParameterKind::Float { .. } | ParameterKind::Int { .. } => trimmed
                .parse::<f64>()
                .ok()
                .map(|plain| self.info.kind.plain_to_normalized(plain)),
        }
    }
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}

/// Ordered collection of parameters addressed by host index.
#[derive(Debug, Default)]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
}

impl ParameterSet {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    /// An empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Parameter at a host index, `None` when out of range.
    #[inline]
    pub fn by_index(&self, index: ParameterIndex) -> Option<&Parameter> {
        self.parameters.get(index)
    }

    /// Parameter with the given string id.
    pub fn by_id(&self, id: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id() == id)
    }

    /// Host index of a parameter id.
    pub fn index_of(&self, id: &str) -> Option<ParameterIndex> {
        self.parameters.iter().position(|p| p.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> + '_ {
        self.parameters.iter()
    }

    /// The parameter flagged as bypass switch, if any.
    pub fn bypass(&self) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.is_bypass())
    }

    /// Normalized values keyed by parameter id.
    pub fn snapshot(&self) -> BTreeMap<String, ParameterValue> {
        self.parameters
            .iter()
            .map(|p| (p.id().to_string(), p.get_normalized()))
            .collect()
    }

    /// Apply values from [`snapshot`](Self::snapshot). Unknown ids are ignored
    /// and parameters missing from the map keep their current value.
    pub fn restore(&self, values: &BTreeMap<String, ParameterValue>) {
        for parameter in &self.parameters {
            if let Some(value) = values.get(parameter.id()) {
                parameter.set_normalized(*value);
            }
        }
        for id in values.keys().filter(|id| self.by_id(id).is_none()) {
            log::debug!("Ignoring state for unknown parameter '{}'", id);
        }
    }

    /// Reset every parameter to its default.
    pub fn reset_all(&self) {
        for parameter in &self.parameters {
            parameter.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter_info::ParameterInfo;

    fn gain() -> Parameter {
        Parameter::new(
            ParameterInfo::new("gain", "Output Gain", ParameterKind::float(-60.0, 12.0), 0.0)
                .with_label("dB")
                .with_precision(1),
        )
    }

    #[test]
    fn test_default_value() {
        let p = gain();
        assert!((p.plain() - 0.0).abs() < 1e-9);
        assert_eq!(p.text(), "0.0");
    }

    #[test]
    fn test_set_normalized_clamps() {
        let p = gain();
        p.set_normalized(1.5);
        assert_eq!(p.get_normalized(), 1.0);
        p.set_normalized(-0.5);
        assert_eq!(p.get_normalized(), 0.0);
        p.set_normalized(f64::NAN);
        assert_eq!(p.get_normalized(), 0.0);
    }

    #[test]
    fn test_value_for_text_strips_label() {
        let p = gain();
        let v = p.value_for_text("-6.0 dB").unwrap();
        assert!((p.kind().normalized_to_plain(v) + 6.0).abs() < 1e-9);
        assert!(p.value_for_text("loud").is_none());
    }

    #[test]
    fn test_choice_text_round_trip() {
        let p = Parameter::new(ParameterInfo::new(
            "wave",
            "Wave",
            ParameterKind::Choice {
                choices: &["Sine", "Saw", "Square"],
            },
            1.0,
        ));
        assert_eq!(p.text(), "Saw");
        let v = p.value_for_text("square").unwrap();
        assert_eq!(p.text_for(v), "Square");
    }

    #[test]
    fn test_bool_text() {
        let p = Parameter::new(ParameterInfo::new("mute", "Mute", ParameterKind::Bool, 0.0));
        assert_eq!(p.text(), "Off");
        p.set_normalized(p.value_for_text("On").unwrap());
        assert_eq!(p.text(), "On");
    }

    #[test]
    fn test_name_truncation() {
        let p = gain();
        assert_eq!(p.name(6), "Output");
        assert_eq!(p.name(64), "Output Gain");
    }

    #[test]
    fn test_meter_not_automatable() {
        let p = Parameter::new(
            ParameterInfo::new("level", "Level", ParameterKind::Generic, 0.0).meter(),
        );
        assert!(!p.is_automatable());
    }

    #[test]
    fn test_snapshot_restore() {
        let set = ParameterSet::new(vec![gain()]);
        set.by_id("gain").unwrap().set_plain(12.0);
        let snapshot = set.snapshot();
        set.reset_all();
        assert!((set.by_index(0).unwrap().plain() - 0.0).abs() < 1e-9);
        set.restore(&snapshot);
        assert!((set.by_index(0).unwrap().plain() - 12.0).abs() < 1e-9);
    }
}
