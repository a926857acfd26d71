//! LV2-specific plugin configuration.

use duplex_core::PluginConfig;

/// LV2-specific plugin configuration.
///
/// # Example
///
/// ```ignore
/// use duplex_lv2::Lv2Config;
///
/// pub static LV2_CONFIG: Lv2Config = Lv2Config::new("urn:duplex:gain")
///     .with_category("AmplifierPlugin");
/// ```
#[derive(Debug, Clone)]
pub struct Lv2Config {
    /// Plugin URI, the subject of every generated description.
    pub uri: &'static str,

    /// LV2 plugin class without the `lv2:` prefix (e.g. `"DelayPlugin"`).
    /// Instruments fall back to `InstrumentPlugin` when `None`.
    pub category: Option<&'static str>,

    /// Export one preset per program.
    pub presets: bool,

    /// Advertise the state interface and embed state in presets.
    pub state: bool,

    /// Embed state as text instead of a base64 chunk.
    pub state_string: bool,

    /// Add a latency reporting port.
    pub latency: bool,

    /// Accept time position events on the events input.
    pub time_position: bool,

    /// Require a fixed block length from the host.
    pub fixed_block_size: bool,
}

impl Lv2Config {
    pub const fn new(uri: &'static str) -> Self {
        Self {
            uri,
            category: None,
            presets: true,
            state: true,
            state_string: false,
            latency: true,
            time_position: false,
            fixed_block_size: false,
        }
    }

    pub const fn with_category(mut self, category: &'static str) -> Self {
        self.category = Some(category);
        self
    }

    pub const fn with_presets(mut self, enabled: bool) -> Self {
        self.presets = enabled;
        self
    }

    pub const fn with_state(mut self, enabled: bool) -> Self {
        self.state = enabled;
        self
    }

    pub const fn with_state_string(mut self) -> Self {
        self.state_string = true;
        self
    }

    pub const fn with_latency(mut self, enabled: bool) -> Self {
        self.latency = enabled;
        self
    }

    pub const fn with_time_position(mut self) -> Self {
        self.time_position = true;
        self
    }

    pub const fn with_fixed_block_size(mut self) -> Self {
        self.fixed_block_size = true;
        self
    }

    /// Classes for the plugin's `a` line.
    pub fn plugin_type(&self, config: &PluginConfig) -> String {
        match self.category {
            Some(category) => format!("lv2:{}, lv2:Plugin", category),
            None if config.is_instrument() => "lv2:InstrumentPlugin, lv2:Plugin".to_string(),
            None => "lv2:Plugin".to_string(),
        }
    }

    /// URI of the preset for program `index` (zero-based).
    ///
    /// Presets are numbered from 001. The separator is `#` unless the plugin
    /// URI already contains one, in which case `:` is used.
    pub fn preset_uri(&self, index: usize) -> String {
        let separator = if self.uri.contains('#') { ':' } else { '#' };
        format!("{}{}preset{:03}", self.uri, separator, index + 1)
    }
}
