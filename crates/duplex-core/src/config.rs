//! Plugin configuration.
//!
//! Shared metadata used by every format adapter. Format-specific settings
//! live next to their adapter (`Vst2Config`, `Lv2Config`) and are built the
//! same way: a `const fn new` followed by chained `const fn with_*` calls, so
//! a plugin declares its whole identity in `static` items.
//!
//! # Example
//!
//! ```ignore
//! use duplex_core::config::{Category, PluginConfig};
//!
//! pub static CONFIG: PluginConfig = PluginConfig::new("My Plugin", Category::Effect, "Mfgr", "plgn")
//!     .with_vendor("My Company")
//!     .with_version("1.2.3");
//! ```

// =========================================================================
// FourCharCode
// =========================================================================

/// Four-character code (FourCC).
///
/// Used for the manufacturer code and the plugin code. The legacy binary
/// protocol identifies a plugin by the big-endian `u32` of its plugin code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourCharCode(pub [u8; 4]);

impl FourCharCode {
    /// Create a new FourCharCode from a 4-byte array.
    ///
    /// # Panics
    /// Debug builds will panic if any byte is not ASCII.
    pub const fn new(bytes: &[u8; 4]) -> Self {
        debug_assert!(bytes[0].is_ascii(), "FourCC bytes must be ASCII");
        debug_assert!(bytes[1].is_ascii(), "FourCC bytes must be ASCII");
        debug_assert!(bytes[2].is_ascii(), "FourCC bytes must be ASCII");
        debug_assert!(bytes[3].is_ascii(), "FourCC bytes must be ASCII");
        Self(*bytes)
    }

    /// The code as a big-endian 32-bit value.
    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl std::fmt::Display for FourCharCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Create a [`FourCharCode`] at compile time with validation.
///
/// ```ignore
/// const ID: FourCharCode = fourcc!(b"Dgan");
/// ```
#[macro_export]
macro_rules! fourcc {
    ($s:literal) => {{
        const BYTES: &[u8] = $s;
        const _: () = assert!(BYTES.len() == 4, "FourCC must be exactly 4 bytes");
        const _: () = assert!(BYTES[0].is_ascii(), "FourCC byte 0 must be ASCII");
        const _: () = assert!(BYTES[1].is_ascii(), "FourCC byte 1 must be ASCII");
        const _: () = assert!(BYTES[2].is_ascii(), "FourCC byte 2 must be ASCII");
        const _: () = assert!(BYTES[3].is_ascii(), "FourCC byte 3 must be ASCII");
        $crate::config::FourCharCode::new(&[BYTES[0], BYTES[1], BYTES[2], BYTES[3]])
    }};
}

// =========================================================================
// Category
// =========================================================================

/// Plugin type - determines how hosts categorize and use the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Audio effect (EQ, compressor, reverb, delay)
    Effect,
    /// Virtual instrument (synth, sampler, drum machine)
    Instrument,
    /// MIDI processor with no audio (arpeggiator, chord generator)
    MidiEffect,
    /// Audio generator (test tones, noise, file player)
    Generator,
}

impl Category {
    /// Whether this type accepts MIDI input by default.
    pub const fn accepts_midi(&self) -> bool {
        matches!(self, Category::Instrument | Category::MidiEffect)
    }

    /// Whether this type produces MIDI output by default.
    pub const fn produces_midi(&self) -> bool {
        matches!(self, Category::MidiEffect)
    }

    pub const fn is_instrument(&self) -> bool {
        matches!(self, Category::Instrument)
    }
}

// =========================================================================
// PluginConfig
// =========================================================================

/// Shared plugin configuration.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Plugin name displayed in the host.
    pub name: &'static str,

    pub category: Category,

    /// Vendor/company name.
    pub vendor: &'static str,

    /// Vendor URL.
    pub url: &'static str,

    /// Vendor email.
    pub email: &'static str,

    /// Version string ("major.minor.bugfix").
    pub version: &'static str,

    /// Version packed as `0xMMmmbb` (one byte per component).
    pub version_code: u32,

    /// Manufacturer code (4-character identifier for your company/brand).
    pub manufacturer: FourCharCode,

    /// Plugin code (4-character identifier for this specific plugin).
    pub plugin_code: FourCharCode,

    /// Whether the processor provides an editor.
    pub has_editor: bool,

    pub wants_midi_input: bool,

    pub produces_midi_output: bool,

    /// Whether the editor wants keyboard focus from the host.
    pub wants_keyboard_focus: bool,

    /// Preferred `(inputs, outputs)` channel configurations. When non-empty,
    /// the largest entry in each direction is advertised instead of the bus
    /// layout query.
    pub channel_configurations: &'static [(u16, u16)],
}

/// Helper to convert a string literal to a 4-byte array at compile time.
const fn str_to_four_bytes(s: &str) -> [u8; 4] {
    let bytes = s.as_bytes();
    assert!(bytes.len() == 4, "FourCC string must be exactly 4 bytes");
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

/// Pack "major.minor.bugfix" into `0xMMmmbb`.
///
/// Missing components count as zero and anything after the third component
/// is ignored. Each component saturates at 255.
pub const fn parse_version_code(version: &str) -> u32 {
    let bytes = version.as_bytes();
    let mut parts = [0u32; 3];
    let mut part = 0;
    let mut i = 0;
    while i < bytes.len() && part < 3 {
        let c = bytes[i];
        if c == b'.' {
            part += 1;
        } else if c.is_ascii_digit() {
            let next = parts[part] * 10 + (c - b'0') as u32;
            parts[part] = if next > 255 { 255 } else { next };
        } else {
            break;
        }
        i += 1;
    }
    (parts[0] << 16) | (parts[1] << 8) | parts[2]
}

impl PluginConfig {
    /// Create a new plugin configuration.
    ///
    /// # Arguments
    ///
    /// * `name` - Plugin name displayed in the host
    /// * `category` - Plugin category (effect, instrument, etc.)
    /// * `manufacturer_code` - 4-character manufacturer code (e.g., "Dplx")
    /// * `plugin_code` - 4-character plugin code (e.g., "gain")
    ///
    /// # Panics
    /// Panics at compile time if either code is not exactly 4 characters.
    pub const fn new(
        name: &'static str,
        category: Category,
        manufacturer_code: &str,
        plugin_code: &str,
    ) -> Self {
        Self {
            name,
            category,
            vendor: "Unknown Vendor",
            url: "",
            email: "",
            version: "1.0.0",
            version_code: 0x010000,
            manufacturer: FourCharCode::new(&str_to_four_bytes(manufacturer_code)),
            plugin_code: FourCharCode::new(&str_to_four_bytes(plugin_code)),
            has_editor: false,
            wants_midi_input: category.accepts_midi(),
            produces_midi_output: category.produces_midi(),
            wants_keyboard_focus: false,
            channel_configurations: &[],
        }
    }

    pub const fn with_vendor(mut self, vendor: &'static str) -> Self {
        self.vendor = vendor;
        self
    }

    pub const fn with_url(mut self, url: &'static str) -> Self {
        self.url = url;
        self
    }

    pub const fn with_email(mut self, email: &'static str) -> Self {
        self.email = email;
        self
    }

    /// Set the version string. Also updates the packed version code.
    pub const fn with_version(mut self, version: &'static str) -> Self {
        self.version = version;
        self.version_code = parse_version_code(version);
        self
    }

    /// Override the packed version code.
    pub const fn with_version_code(mut self, code: u32) -> Self {
        self.version_code = code;
        self
    }

    pub const fn with_editor(mut self) -> Self {
        self.has_editor = true;
        self
    }

    pub const fn with_midi_input(mut self, enabled: bool) -> Self {
        self.wants_midi_input = enabled;
        self
    }

    pub const fn with_midi_output(mut self, enabled: bool) -> Self {
        self.produces_midi_output = enabled;
        self
    }

    pub const fn with_keyboard_focus(mut self) -> Self {
        self.wants_keyboard_focus = true;
        self
    }

    pub const fn with_channel_configurations(mut self, configs: &'static [(u16, u16)]) -> Self {
        self.channel_configurations = configs;
        self
    }

    pub const fn is_instrument(&self) -> bool {
        self.category.is_instrument()
    }

    pub const fn is_midi_effect(&self) -> bool {
        matches!(self.category, Category::MidiEffect)
    }

    /// Largest `(inputs, outputs)` among the preferred channel configurations,
    /// or `None` when none are declared.
    pub fn preferred_max_channels(&self) -> Option<(usize, usize)> {
        if self.channel_configurations.is_empty() {
            return None;
        }
        Some(
            self.channel_configurations
                .iter()
                .fold((0, 0), |(ins, outs), &(i, o)| {
                    (ins.max(i as usize), outs.max(o as usize))
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc_as_u32() {
        let code = FourCharCode::new(b"NvEf");
        assert_eq!(code.as_u32(), 0x4E764566);
        assert_eq!(code.as_str(), "NvEf");
    }

    #[test]
    fn test_parse_version_code() {
        assert_eq!(parse_version_code("1.2.3"), 0x010203);
        assert_eq!(parse_version_code("2"), 0x020000);
        assert_eq!(parse_version_code("0.9.10"), 0x00090a);
        assert_eq!(parse_version_code("1.0.0-beta"), 0x010000);
    }

    #[test]
    fn test_midi_defaults_follow_category() {
        const SYNTH: PluginConfig = PluginConfig::new("Synth", Category::Instrument, "Dplx", "syn1");
        assert!(SYNTH.wants_midi_input);
        assert!(!SYNTH.produces_midi_output);

        const FX: PluginConfig = PluginConfig::new("Fx", Category::Effect, "Dplx", "fx01")
            .with_version("2.1.0")
            .with_midi_input(true);
        assert!(FX.wants_midi_input);
        assert_eq!(FX.version_code, 0x020100);
    }

    #[test]
    fn test_preferred_max_channels() {
        const CONFIG: PluginConfig = PluginConfig::new("Fx", Category::Effect, "Dplx", "fx01")
            .with_channel_configurations(&[(1, 1), (2, 2), (0, 6)]);
        assert_eq!(CONFIG.preferred_max_channels(), Some((2, 6)));

        const NONE: PluginConfig = PluginConfig::new("Fx", Category::Effect, "Dplx", "fx01");
        assert_eq!(NONE.preferred_max_channels(), None);
    }
}
