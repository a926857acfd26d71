//! Shared primitive types and limits.

/// Normalized parameter value (0.0 to 1.0).
pub type ParameterValue = f64;

/// Index of a parameter inside a [`ParameterSet`](crate::parameter::ParameterSet).
pub type ParameterIndex = usize;

/// Maximum number of channels per bus.
///
/// Hosts are asked for at most this many channels when a bus reports its
/// largest supported layout.
pub const MAX_CHANNELS: usize = 64;

/// Maximum number of buses per direction.
pub const MAX_BUSES: usize = 16;

/// Width and height of an editor window in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Rectangle in editor coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Rect {
    /// Rectangle anchored at the origin with the given size.
    pub const fn from_size(size: Size) -> Self {
        Self {
            top: 0,
            left: 0,
            bottom: size.height as i32,
            right: size.width as i32,
        }
    }
}
