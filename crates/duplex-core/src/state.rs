//! Default plugin state format.
//!
//! Processors that don't serialize their own state get this one: the current
//! program index plus every parameter's normalized value keyed by id, written
//! as JSON. Keys are sorted, so identical state always produces identical
//! bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PluginError, PluginResult};
use crate::parameter::ParameterSet;
use crate::types::ParameterValue;

/// Current state format version.
pub const STATE_VERSION: u32 = 1;

/// Serializable snapshot of a processor's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub version: u32,
    #[serde(default)]
    pub program: usize,
    pub parameters: BTreeMap<String, ParameterValue>,
}

impl StateSnapshot {
    /// Capture the current parameter values.
    pub fn capture(parameters: &ParameterSet, program: usize) -> Self {
        Self {
            version: STATE_VERSION,
            program,
            parameters: parameters.snapshot(),
        }
    }

    /// Write the captured values back.
    pub fn apply(&self, parameters: &ParameterSet) {
        parameters.restore(&self.parameters);
    }

    pub fn to_bytes(&self) -> PluginResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse bytes produced by [`to_bytes`](Self::to_bytes).
    ///
    /// Snapshots written by a newer format version are rejected.
    pub fn from_bytes(data: &[u8]) -> PluginResult<Self> {
        let snapshot: Self = serde_json::from_slice(data)?;
        if snapshot.version > STATE_VERSION {
            return Err(PluginError::StateError(format!(
                "state version {} is newer than supported version {}",
                snapshot.version, STATE_VERSION
            )));
        }
        Ok(snapshot)
    }

    /// Human-readable form used for string state.
    pub fn to_text(&self) -> PluginResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_text(text: &str) -> PluginResult<Self> {
        Self::from_bytes(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameter;
    use crate::parameter_info::{ParameterInfo, ParameterKind};

    fn parameters() -> ParameterSet {
        ParameterSet::new(vec![
            Parameter::new(ParameterInfo::new("gain", "Gain", ParameterKind::float(-60.0, 12.0), 0.0)),
            Parameter::new(ParameterInfo::new("steps", "Steps", ParameterKind::Int { min: 1, max: 8 }, 4.0)),
            Parameter::new(ParameterInfo::new("on", "On", ParameterKind::Bool, 1.0)),
        ])
    }

    #[test]
    fn test_round_trip_extremes_and_defaults() {
        let source = parameters();
        source.by_id("gain").unwrap().set_normalized(0.0);
        source.by_id("steps").unwrap().set_normalized(1.0);
        let bytes = StateSnapshot::capture(&source, 2).to_bytes().unwrap();

        let target = parameters();
        target.by_id("on").unwrap().set_normalized(0.0);
        let snapshot = StateSnapshot::from_bytes(&bytes).unwrap();
        snapshot.apply(&target);

        assert_eq!(snapshot.program, 2);
        for (a, b) in source.iter().zip(target.iter()) {
            assert_eq!(a.get_normalized(), b.get_normalized(), "{}", a.id());
        }
        assert_eq!(target.by_id("gain").unwrap().plain(), -60.0);
        assert_eq!(target.by_id("steps").unwrap().plain(), 8.0);
        assert_eq!(target.by_id("on").unwrap().plain(), 1.0);
    }

    #[test]
    fn test_text_round_trip() {
        let source = parameters();
        let text = StateSnapshot::capture(&source, 0).to_text().unwrap();
        assert!(text.contains("\"gain\""));
        let snapshot = StateSnapshot::from_text(&text).unwrap();
        assert_eq!(snapshot, StateSnapshot::capture(&source, 0));
    }

    #[test]
    fn test_rejects_garbage_and_newer_versions() {
        assert!(matches!(
            StateSnapshot::from_bytes(b"not json"),
            Err(PluginError::Serialization(_))
        ));
        let newer = br#"{"version": 99, "parameters": {}}"#;
        assert!(matches!(
            StateSnapshot::from_bytes(newer),
            Err(PluginError::StateError(_))
        ));
    }
}
