//! Control port values per parameter kind.
//!
//! LV2 control ports carry plain values, so every parameter kind needs the
//! same small set of conversions. They are collected in one [`KindOps`]
//! table per kind.

use duplex_core::{Parameter, ParameterKind};

/// Port property class of a control port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortClass {
    Float,
    Int,
    Bool,
    Choice,
    Generic,
}

/// Conversions between a parameter and its control port.
pub struct KindOps {
    pub class: PortClass,
    /// Current value in port units.
    pub value: fn(&Parameter) -> f32,
    /// Store a value written to the port.
    pub set_value: fn(&Parameter, f32),
    pub default: fn(&Parameter) -> f32,
    pub minimum: fn(&Parameter) -> f32,
    pub maximum: fn(&Parameter) -> f32,
    /// Map a normalized value to port units.
    pub convert_from_0to1: fn(&Parameter, f32) -> f32,
}

fn plain(parameter: &Parameter) -> f32 {
    parameter.plain() as f32
}

fn min_plain(parameter: &Parameter) -> f32 {
    parameter.kind().min_plain() as f32
}

fn max_plain(parameter: &Parameter) -> f32 {
    parameter.kind().max_plain() as f32
}

fn converted_default(parameter: &Parameter) -> f32 {
    (ops(parameter.kind()).convert_from_0to1)(parameter, parameter.default_normalized() as f32)
}

/// Bool ports treat any positive value as on.
fn toggle(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else {
        0.0
    }
}

const FLOAT: KindOps = KindOps {
    class: PortClass::Float,
    value: plain,
    set_value: |p, v| p.set_plain(v as f64),
    default: converted_default,
    minimum: min_plain,
    maximum: max_plain,
    convert_from_0to1: |p, v| p.kind().normalized_to_plain(v as f64) as f32,
};

const INT: KindOps = KindOps {
    class: PortClass::Int,
    value: plain,
    set_value: |p, v| p.set_plain(v.round() as f64),
    default: converted_default,
    minimum: min_plain,
    maximum: max_plain,
    convert_from_0to1: |p, v| {
        let (min, max) = (min_plain(p), max_plain(p));
        (min + (max - min) * v).round()
    },
};

const BOOL: KindOps = KindOps {
    class: PortClass::Bool,
    value: plain,
    set_value: |p, v| p.set_normalized(toggle(v) as f64),
    default: |p| if p.default_normalized() >= 0.5 { 1.0 } else { 0.0 },
    minimum: |_| 0.0,
    maximum: |_| 1.0,
    convert_from_0to1: |_, v| toggle(v),
};

const CHOICE: KindOps = KindOps {
    class: PortClass::Choice,
    value: plain,
    set_value: |p, v| p.set_plain(v.round() as f64),
    default: converted_default,
    minimum: |_| 0.0,
    maximum: max_plain,
    convert_from_0to1: |p, v| (v * max_plain(p)).round(),
};

const GENERIC: KindOps = KindOps {
    class: PortClass::Generic,
    value: |p| p.get_normalized() as f32,
    set_value: |p, v| {
        if v as f64 != p.get_normalized() {
            p.set_normalized(v as f64);
        }
    },
    default: |p| p.default_normalized() as f32,
    minimum: |_| 0.0,
    maximum: |_| 1.0,
    convert_from_0to1: |_, v| v,
};

/// Operation table for a parameter kind.
pub fn ops(kind: &ParameterKind) -> &'static KindOps {
    match kind {
        ParameterKind::Float { .. } => &FLOAT,
        ParameterKind::Int { .. } => &INT,
        ParameterKind::Bool => &BOOL,
        ParameterKind::Choice { .. } => &CHOICE,
        ParameterKind::Generic => &GENERIC,
    }
}

/// A parameter seen as an LV2 control port.
#[derive(Clone, Copy)]
pub struct ControlPort<'a> {
    parameter: &'a Parameter,
    ops: &'static KindOps,
}

impl<'a> ControlPort<'a> {
    pub fn new(parameter: &'a Parameter) -> Self {
        Self {
            parameter,
            ops: ops(parameter.kind()),
        }
    }

    pub fn parameter(&self) -> &'a Parameter {
        self.parameter
    }

    pub fn class(&self) -> PortClass {
        self.ops.class
    }

    pub fn value(&self) -> f32 {
        (self.ops.value)(self.parameter)
    }

    pub fn set_value(&self, value: f32) {
        (self.ops.set_value)(self.parameter, value)
    }

    pub fn default(&self) -> f32 {
        (self.ops.default)(self.parameter)
    }

    pub fn minimum(&self) -> f32 {
        (self.ops.minimum)(self.parameter)
    }

    pub fn maximum(&self) -> f32 {
        (self.ops.maximum)(self.parameter)
    }

    pub fn convert_from_0to1(&self, normalized: f32) -> f32 {
        (self.ops.convert_from_0to1)(self.parameter, normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_core::ParameterInfo;

    fn parameter(kind: ParameterKind, default_plain: f64) -> Parameter {
        Parameter::new(ParameterInfo::new("p", "P", kind, default_plain))
    }

    #[test]
    fn test_float_port_uses_plain_range() {
        let p = parameter(ParameterKind::float(-60.0, 12.0), 0.0);
        let port = ControlPort::new(&p);
        assert_eq!(port.class(), PortClass::Float);
        assert_eq!((port.minimum(), port.maximum()), (-60.0, 12.0));
        assert!(port.default().abs() < 1e-4);
        assert_eq!(port.convert_from_0to1(1.0), 12.0);

        port.set_value(-24.0);
        assert!((port.value() + 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_int_port_rounds() {
        let p = parameter(ParameterKind::Int { min: 1, max: 8 }, 4.0);
        let port = ControlPort::new(&p);
        assert_eq!(port.default(), 4.0);
        assert_eq!(port.convert_from_0to1(0.5), 5.0);
        port.set_value(6.4);
        assert_eq!(port.value(), 6.0);
    }

    #[test]
    fn test_bool_port_thresholds() {
        let p = parameter(ParameterKind::Bool, 0.0);
        let port = ControlPort::new(&p);
        // Any positive value switches on.
        assert_eq!(port.convert_from_0to1(0.01), 1.0);
        assert_eq!(port.convert_from_0to1(0.0), 0.0);
        port.set_value(0.2);
        assert_eq!(port.value(), 1.0);
        // The default still uses the halfway point.
        assert_eq!(port.default(), 0.0);
        assert_eq!(ControlPort::new(&parameter(ParameterKind::Bool, 1.0)).default(), 1.0);
    }

    #[test]
    fn test_choice_port_indices() {
        static CHOICES: [&str; 4] = ["Sine", "Saw", "Square", "Noise"];
        let p = parameter(ParameterKind::Choice { choices: &CHOICES }, 2.0);
        let port = ControlPort::new(&p);
        assert_eq!((port.minimum(), port.maximum()), (0.0, 3.0));
        assert_eq!(port.default(), 2.0);
        assert_eq!(port.convert_from_0to1(0.7), 2.0);
        port.set_value(0.6);
        assert_eq!(port.value(), 1.0);
    }

    #[test]
    fn test_generic_port_is_normalized() {
        let p = parameter(ParameterKind::Generic, 0.25);
        let port = ControlPort::new(&p);
        assert_eq!(port.default(), 0.25);
        assert_eq!(port.convert_from_0to1(0.8), 0.8);
        port.set_value(0.75);
        assert_eq!(port.value(), 0.75);
    }
}
