//! Program (factory preset) support.
//!
//! A program is a named, possibly sparse, set of plain parameter values.
//! Selecting a program only touches the parameters it lists; the others keep
//! their current values.
//!
//! # Example
//!
//! ```ignore
//! use duplex_core::program::{ProgramList, ProgramValue};
//!
//! static QUIET: &[ProgramValue] = &[ProgramValue::new("gain", -12.0)];
//! let programs = ProgramList::new(&[("Unity", &[]), ("Quiet", QUIET)]);
//! ```

use crate::parameter::ParameterSet;

/// A single parameter value within a program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramValue {
    /// Parameter string id.
    pub id: &'static str,
    /// Plain value in natural units (e.g., dB, Hz, ms).
    pub plain_value: f64,
}

impl ProgramValue {
    pub const fn new(id: &'static str, plain_value: f64) -> Self {
        Self { id, plain_value }
    }
}

/// A named program. The name can be changed by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    pub values: &'static [ProgramValue],
}

/// Ordered program list with a current selection.
#[derive(Debug, Clone, Default)]
pub struct ProgramList {
    programs: Vec<Program>,
    current: usize,
}

impl ProgramList {
    pub fn new(programs: &[(&str, &'static [ProgramValue])]) -> Self {
        Self {
            programs: programs
                .iter()
                .map(|&(name, values)| Program {
                    name: name.to_string(),
                    values,
                })
                .collect(),
            current: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Index of the current program (0 when the list is empty).
    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn get(&self, index: usize) -> Option<&Program> {
        self.programs.get(index)
    }

    /// Name of program `index`, `None` when out of range.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.programs.get(index).map(|p| p.name.as_str())
    }

    /// Make `index` current and return its values.
    ///
    /// Out-of-range indices leave the selection unchanged and return `None`.
    pub fn select(&mut self, index: usize) -> Option<&'static [ProgramValue]> {
        let values = self.programs.get(index)?.values;
        self.current = index;
        Some(values)
    }

    /// Rename program `index`. Out-of-range indices are ignored.
    pub fn rename(&mut self, index: usize, name: &str) {
        if let Some(program) = self.programs.get_mut(index) {
            program.name = name.to_string();
        }
    }
}

impl ParameterSet {
    /// Apply the plain values of a program. Unknown ids are skipped.
    pub fn apply_program(&self, values: &[ProgramValue]) {
        for value in values {
            if let Some(parameter) = self.by_id(value.id) {
                parameter.set_plain(value.plain_value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameter;
    use crate::parameter_info::{ParameterInfo, ParameterKind};

    static QUIET: &[ProgramValue] = &[ProgramValue::new("gain", -12.0)];
    static LOUD: &[ProgramValue] = &[
        ProgramValue::new("gain", 6.0),
        ProgramValue::new("missing", 1.0),
    ];

    fn programs() -> ProgramList {
        ProgramList::new(&[("Unity", &[]), ("Quiet", QUIET), ("Loud", LOUD)])
    }

    #[test]
    fn test_select_in_range() {
        let mut list = programs();
        let values = list.select(1).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(list.current(), 1);
    }

    #[test]
    fn test_select_out_of_range_is_noop() {
        let mut list = programs();
        list.select(2);
        assert!(list.select(3).is_none());
        assert!(list.select(usize::MAX).is_none());
        assert_eq!(list.current(), 2);
    }

    #[test]
    fn test_rename() {
        let mut list = programs();
        list.rename(0, "Init");
        list.rename(10, "Ignored");
        assert_eq!(list.name(0), Some("Init"));
        assert_eq!(list.name(10), None);
    }

    #[test]
    fn test_apply_program_is_sparse() {
        let parameters = ParameterSet::new(vec![
            Parameter::new(ParameterInfo::new("gain", "Gain", ParameterKind::float(-60.0, 12.0), 0.0)),
            Parameter::new(ParameterInfo::new("mix", "Mix", ParameterKind::Generic, 0.5)),
        ]);
        parameters.by_id("mix").unwrap().set_normalized(0.25);
        parameters.apply_program(LOUD);
        assert!((parameters.by_id("gain").unwrap().plain() - 6.0).abs() < 1e-9);
        assert_eq!(parameters.by_id("mix").unwrap().get_normalized(), 0.25);
    }
}
