//! # duplex-vst2
//!
//! Legacy VST 2.x adapter for the Duplex framework.
//!
//! Wraps any [`duplex_core::Plugin`] in the flat C interface VST2 hosts load:
//!
//! - The effect struct and its callbacks ([`Vst2Wrapper`])
//! - Opcode dispatch, one handler per opcode
//! - Audio buffer marshaling with scratch channels for aliased host buffers
//! - Speaker arrangement mapping to and from [`duplex_core::ChannelLayout`]
//! - Platform entry points ([`export_vst2!`])
//!
//! ## Architecture
//!
//! ```text
//! User Plugin (implements duplex_core::Plugin)
//!        ↓
//! Vst2Wrapper<P> (opcode table, buffers, state chunks)
//!        ↓
//! AEffect + host callback (VST 2.4 binary interface)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use duplex_core::{Category, PluginConfig};
//! use duplex_vst2::{export_vst2, Vst2Config};
//!
//! static CONFIG: PluginConfig = PluginConfig::new("My Plugin", Category::Effect, "Mfgr", "plgn");
//! static VST2_CONFIG: Vst2Config = Vst2Config::new("MyPl");
//!
//! export_vst2!(CONFIG, VST2_CONFIG, MyGain);
//! ```

#![allow(non_snake_case)]

pub mod abi;
pub mod buffers;
pub mod chunk;
pub mod config;
pub mod events;
pub mod export;
pub mod host;
pub mod registry;
pub mod speaker;
pub mod transport;
pub mod util;
pub mod wrapper;

pub use buffers::AudioMarshaler;
pub use config::{vendor_version, Vst2Config};
pub use host::Host;
pub use registry::ACTIVE_INSTANCES;
pub use speaker::{arrangement_from_layout, layout_from_arrangement};
pub use wrapper::{OpcodeArgs, Vst2Wrapper};

pub use duplex_core::PluginConfig;
