//! # Duplex
//!
//! Audio plugin framework for Rust targeting the legacy VST 2.x binary
//! interface and LV2 bundles from one plugin implementation.
//!
//! ## Architecture
//!
//! ```text
//! Your Plugin (implements Plugin trait)
//!        ↓                         ↓
//! Vst2Wrapper<P>              TtlGenerator
//!        ↓                         ↓
//! AEffect + host callback     manifest.ttl / <name>.ttl / presets.ttl
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use duplex::prelude::*;
//!
//! struct MyGain { parameters: ParameterSet }
//!
//! impl AudioProcessor for MyGain {
//!     fn prepare(&mut self, _: f64, _: usize) {}
//!     fn process(&mut self, buffer: &mut ChannelBuffer<f32>, _midi: &mut MidiBuffer) {
//!         // Your DSP here
//!     }
//! }
//!
//! impl Plugin for MyGain {
//!     fn create() -> Self { Self { parameters: ParameterSet::empty() } }
//!     fn parameters(&self) -> &ParameterSet { &self.parameters }
//! }
//!
//! static CONFIG: PluginConfig = PluginConfig::new("MyGain", Category::Effect, "Mfgr", "mygn");
//! static VST2_CONFIG: Vst2Config = Vst2Config::new("MyGn");
//! static LV2_CONFIG: Lv2Config = Lv2Config::new("urn:mfgr:mygain");
//!
//! export_vst2!(CONFIG, VST2_CONFIG, MyGain);
//! export_lv2!(CONFIG, LV2_CONFIG, MyGain);
//! ```

pub use duplex_core as core;

#[cfg(feature = "vst2")]
pub use duplex_vst2 as vst2_impl;

#[cfg(feature = "lv2")]
pub use duplex_lv2 as lv2_impl;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use duplex::prelude::*;
/// ```
pub mod prelude {
    pub use duplex_core::{
        // Traits
        AudioProcessor, Editor, HostContext, Plugin,
        // Buffers and samples
        ChannelBuffer, Sample,
        // Buses and layouts
        BusInfo, BusType, ChannelLayout, ChannelRole,
        // Parameters
        Parameter, ParameterFlags, ParameterInfo, ParameterKind, ParameterSet,
        // Programs
        Program, ProgramList, ProgramValue,
        // Configuration
        Category, FourCharCode, PluginConfig,
        // Errors
        PluginError, PluginResult,
        // MIDI
        MidiBuffer, MidiEvent,
        // Transport
        FrameRate, Transport,
        // Geometry
        Rect, Size,
        // Helpers
        db_to_gain,
    };

    #[cfg(feature = "vst2")]
    pub use duplex_vst2::{export_vst2, Vst2Config};

    #[cfg(feature = "lv2")]
    pub use duplex_lv2::{export_lv2, Lv2Config};
}
