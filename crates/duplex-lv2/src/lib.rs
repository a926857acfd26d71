//! # duplex-lv2
//!
//! LV2 bundle description for the Duplex framework.
//!
//! LV2 hosts discover plugins through Turtle documents shipped next to the
//! binary. This crate generates them from a live plugin instance:
//!
//! - Port symbols normalized and deduplicated ([`SymbolRegistry`])
//! - Control port values per parameter kind ([`ControlPort`])
//! - `manifest.ttl`, the plugin description and `presets.ttl` ([`TtlGenerator`])
//! - The `lv2_generate_ttl` entry point the bundler calls ([`export_lv2!`])
//!
//! ```text
//! User Plugin (implements duplex_core::Plugin)
//!        ↓
//! TtlGenerator (ports, presets, state)
//!        ↓
//! manifest.ttl / <name>.ttl / presets.ttl
//! ```

pub mod config;
pub mod export;
pub mod generator;
pub mod params;
pub mod symbol;
pub mod ttl;
pub mod uris;

pub use config::Lv2Config;
pub use export::generate_ttl_entry;
pub use generator::{max_total_channels, write_lv2_files, write_lv2_files_in};
pub use params::{ControlPort, PortClass};
pub use symbol::SymbolRegistry;
pub use ttl::TtlGenerator;
