//! VST2-specific plugin configuration.
//!
//! Complements the shared [`duplex_core::PluginConfig`] with the values only
//! the legacy format needs.

use duplex_core::{Category, PluginConfig};

use crate::abi::PlugCategory;

/// Default number of MIDI channels reported per direction.
pub const DEFAULT_MIDI_CHANNELS: i32 = 16;

/// VST2-specific plugin configuration.
///
/// # Example
///
/// ```ignore
/// use duplex_core::{Category, PluginConfig};
/// use duplex_vst2::Vst2Config;
///
/// pub static CONFIG: PluginConfig = PluginConfig::new("Duplex Gain", Category::Effect, "Dplx", "gain")
///     .with_vendor("Duplex Audio");
///
/// pub static VST2_CONFIG: Vst2Config = Vst2Config::new("DxGn");
///
/// export_vst2!(CONFIG, VST2_CONFIG, GainPlugin);
/// ```
#[derive(Debug, Clone)]
pub struct Vst2Config {
    /// Four-character unique id registered for the plugin.
    pub unique_id: i32,

    /// Reported in `AEffect::version` instead of the version code when set.
    /// Bump it when the state chunk format changes incompatibly.
    pub chunk_version: Option<i32>,

    /// Category override. Derived from the shared category when `None`.
    pub category: Option<PlugCategory>,

    /// MIDI input channels reported when the plugin accepts MIDI.
    pub midi_input_channels: i32,

    /// MIDI output channels reported when the plugin produces MIDI.
    pub midi_output_channels: i32,
}

impl Vst2Config {
    /// Create a configuration from a four-character unique id.
    ///
    /// # Panics
    /// Panics at compile time if `unique_id` is not exactly 4 bytes.
    pub const fn new(unique_id: &str) -> Self {
        let bytes = unique_id.as_bytes();
        assert!(bytes.len() == 4, "VST2 unique id must be exactly 4 bytes");
        Self {
            unique_id: i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            chunk_version: None,
            category: None,
            midi_input_channels: DEFAULT_MIDI_CHANNELS,
            midi_output_channels: DEFAULT_MIDI_CHANNELS,
        }
    }

    pub const fn with_chunk_version(mut self, version: i32) -> Self {
        self.chunk_version = Some(version);
        self
    }

    pub const fn with_category(mut self, category: PlugCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub const fn with_midi_channels(mut self, inputs: i32, outputs: i32) -> Self {
        self.midi_input_channels = inputs;
        self.midi_output_channels = outputs;
        self
    }

    /// Category reported to the host.
    pub fn plug_category(&self, config: &PluginConfig) -> PlugCategory {
        self.category.unwrap_or(match config.category {
            Category::Instrument => PlugCategory::Synth,
            Category::Generator => PlugCategory::Generator,
            Category::Effect | Category::MidiEffect => PlugCategory::Effect,
        })
    }

    /// Value stored in `AEffect::version`.
    pub fn effect_version(&self, config: &PluginConfig) -> i32 {
        self.chunk_version.unwrap_or(config.version_code as i32)
    }
}

/// Convert a packed `0xMMmmbb` version code to the number hosts display.
///
/// Versions below 1.0 use `major*1000 + minor*100 + bugfix*10`, majors above
/// 100 use `major*10000000 + minor*100000 + bugfix*1000`, and everything in
/// between is reported as the raw packed value.
pub fn vendor_version(version_code: u32) -> i32 {
    let major = ((version_code >> 16) & 0xff) as i32;
    let minor = ((version_code >> 8) & 0xff) as i32;
    let bugfix = (version_code & 0xff) as i32;

    if major < 1 {
        return major * 1000 + minor * 100 + bugfix * 10;
    }
    if major > 100 {
        return major * 10_000_000 + minor * 100_000 + bugfix * 1000;
    }
    version_code as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_id_is_big_endian() {
        let config = Vst2Config::new("DxGn");
        assert_eq!(config.unique_id, 0x4478_476e);
    }

    #[test]
    fn test_vendor_version_encodings() {
        assert_eq!(vendor_version(0x00_02_03), 230);
        assert_eq!(vendor_version(0x01_02_03), 0x01_02_03);
        assert_eq!(vendor_version(0x64_00_00), 0x64_00_00);
        assert_eq!(vendor_version(0x65_02_03), 101 * 10_000_000 + 2 * 100_000 + 3 * 1000);
    }

    #[test]
    fn test_category_and_version_defaults() {
        let config = PluginConfig::new("Synth", Category::Instrument, "Dplx", "syn1")
            .with_version("2.1.0");
        let vst2 = Vst2Config::new("Syn1");
        assert_eq!(vst2.plug_category(&config), PlugCategory::Synth);
        assert_eq!(vst2.effect_version(&config), 0x02_01_00);

        let vst2 = vst2.with_category(PlugCategory::Analysis).with_chunk_version(7);
        assert_eq!(vst2.plug_category(&config), PlugCategory::Analysis);
        assert_eq!(vst2.effect_version(&config), 7);
    }
}
