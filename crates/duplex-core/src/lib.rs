//! Core abstractions shared by the Duplex format adapters.
//!
//! Nothing in this crate knows about a plugin format. Engines implement
//! [`Plugin`] against these types and the adapters in `duplex-vst2` and
//! `duplex-lv2` translate them for hosts.

pub mod buffer;
pub mod bus_config;
pub mod channel_layout;
pub mod config;
pub mod editor;
pub mod error;
pub mod midi;
pub mod parameter;
pub mod parameter_info;
pub mod processor;
pub mod program;
pub mod sample;
pub mod state;
pub mod transport;
pub mod types;

pub use buffer::{ChannelBuffer, ChannelPointers};
pub use bus_config::{BusInfo, BusType, CachedBusConfig, CachedBusInfo};
pub use channel_layout::{ChannelLayout, ChannelRole};
pub use config::{Category, FourCharCode, PluginConfig};
pub use editor::{Editor, HostContext};
pub use error::{PluginError, PluginResult};
pub use midi::{MidiBuffer, MidiEvent, MIDI_INPUT_CAPACITY, MIDI_OUTPUT_CAPACITY};
pub use parameter::{Parameter, ParameterSet};
pub use parameter_info::{ParameterFlags, ParameterInfo, ParameterKind};
pub use processor::{AudioProcessor, Plugin};
pub use program::{Program, ProgramList, ProgramValue};
pub use sample::Sample;
pub use state::StateSnapshot;
pub use transport::{FrameRate, Transport};
pub use types::{ParameterIndex, ParameterValue, Rect, Size, MAX_BUSES, MAX_CHANNELS};

/// Convert decibels to linear gain.
#[inline]
pub fn db_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}
