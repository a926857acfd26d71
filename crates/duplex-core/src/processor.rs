//! Processor traits implemented by plugin engines.
//!
//! [`AudioProcessor`] covers the DSP side: buses, lifecycle and the
//! real-time process calls. [`Plugin`] adds everything the host sees besides
//! audio: parameters, programs, state and the editor. Format adapters are
//! generic over `P: Plugin` and never know the concrete engine type.
//!
//! # Example
//!
//! ```ignore
//! use duplex_core::*;
//!
//! pub struct Gain {
//!     parameters: ParameterSet,
//! }
//!
//! impl AudioProcessor for Gain {
//!     fn prepare(&mut self, _sample_rate: f64, _max_block_size: usize) {}
//!
//!     fn process(&mut self, buffer: &mut ChannelBuffer<f32>, _midi: &mut MidiBuffer) {
//!         let gain = self.parameters.by_index(0).map(|p| p.plain()).unwrap_or(0.0);
//!         buffer.apply_gain(db_to_gain(gain) as f32);
//!     }
//! }
//!
//! impl Plugin for Gain {
//!     fn create() -> Self {
//!         Self { parameters: ParameterSet::new(vec![/* ... */]) }
//!     }
//!
//!     fn parameters(&self) -> &ParameterSet {
//!         &self.parameters
//!     }
//! }
//! ```

use std::ffi::c_void;
use std::sync::Arc;

use crate::buffer::ChannelBuffer;
use crate::bus_config::BusInfo;
use crate::channel_layout::ChannelLayout;
use crate::editor::{Editor, HostContext};
use crate::error::PluginResult;
use crate::midi::MidiBuffer;
use crate::parameter::ParameterSet;
use crate::program::ProgramList;
use crate::state::StateSnapshot;
use crate::transport::Transport;

/// Audio processing half of a plugin.
///
/// The `process*` methods run on the audio thread and must be real-time
/// safe: no allocations, no locks, no unbounded loops.
pub trait AudioProcessor: Send {
    /// Called before processing starts, whenever the sample rate or maximum
    /// block size changes.
    fn prepare(&mut self, sample_rate: f64, max_block_size: usize);

    /// Called when processing stops. Free anything `prepare` allocated.
    fn release(&mut self) {}

    /// Switch between real-time and offline (bounce) rendering.
    fn set_non_realtime(&mut self, _non_realtime: bool) {}

    /// Process a block in single precision.
    ///
    /// Processing is in place. On entry channel `i` holds input `i`, or
    /// silence for channels without an input. `midi` holds the incoming events
    /// for this block and, on return, the events to send to the host.
    fn process(&mut self, buffer: &mut ChannelBuffer<f32>, midi: &mut MidiBuffer);

    /// Process a block in double precision.
    ///
    /// Only called when [`supports_double_precision`](Self::supports_double_precision)
    /// returns `true`.
    fn process_f64(&mut self, _buffer: &mut ChannelBuffer<f64>, _midi: &mut MidiBuffer) {}

    /// Process while bypassed. The default passes audio through unchanged.
    fn process_bypassed(&mut self, _buffer: &mut ChannelBuffer<f32>, _midi: &mut MidiBuffer) {}

    fn process_bypassed_f64(&mut self, _buffer: &mut ChannelBuffer<f64>, _midi: &mut MidiBuffer) {}

    fn supports_double_precision(&self) -> bool {
        false
    }

    /// Tail length in seconds. `f64::INFINITY` means the tail never ends.
    fn tail_seconds(&self) -> f64 {
        0.0
    }

    /// Processing latency in samples.
    fn latency_samples(&self) -> u32 {
        0
    }

    /// Whether the adapter should fetch host transport before every block.
    fn wants_transport(&self) -> bool {
        false
    }

    /// Transport at the start of the next block.
    ///
    /// Called on the audio thread right before `process` when
    /// [`wants_transport`](Self::wants_transport) returns `true`. Fields the
    /// host did not report are `None`.
    fn set_transport(&mut self, _transport: &Transport) {}

    // =========================================================================
    // Bus Configuration
    // =========================================================================

    /// Number of buses in one direction. Default is a single main bus.
    fn bus_count(&self, _is_input: bool) -> usize {
        1
    }

    /// Current description of a bus. Default is a stereo main bus.
    fn bus_info(&self, is_input: bool, index: usize) -> Option<BusInfo> {
        match (index, is_input) {
            (0, true) => Some(BusInfo::stereo("Input")),
            (0, false) => Some(BusInfo::stereo("Output")),
            _ => None,
        }
    }

    /// Largest channel count a bus accepts. Default is its current count.
    fn max_supported_channels(&self, is_input: bool, index: usize) -> usize {
        self.bus_info(is_input, index)
            .map(|bus| bus.channel_count())
            .unwrap_or(0)
    }

    /// Ask the processor to switch to new layouts (one per bus).
    ///
    /// Returns `false` when the combination is unsupported, in which case the
    /// previous layouts stay in effect. The default only accepts the layouts
    /// already in use.
    fn apply_bus_layouts(&mut self, inputs: &[ChannelLayout], outputs: &[ChannelLayout]) -> bool {
        let matches = |is_input: bool, layouts: &[ChannelLayout]| {
            layouts.len() == self.bus_count(is_input)
                && layouts.iter().enumerate().all(|(i, layout)| {
                    self.bus_info(is_input, i)
                        .is_some_and(|bus| bus.layout == *layout)
                })
        };
        matches(true, inputs) && matches(false, outputs)
    }
}

/// Host-facing half of a plugin.
pub trait Plugin: AudioProcessor {
    /// Create an instance with default state.
    fn create() -> Self
    where
        Self: Sized;

    fn parameters(&self) -> &ParameterSet;

    // =========================================================================
    // Programs
    // =========================================================================

    fn programs(&self) -> Option<&ProgramList> {
        None
    }

    fn programs_mut(&mut self) -> Option<&mut ProgramList> {
        None
    }

    fn num_programs(&self) -> usize {
        self.programs().map(ProgramList::len).unwrap_or(0)
    }

    fn current_program(&self) -> usize {
        self.programs().map(ProgramList::current).unwrap_or(0)
    }

    /// Select a program. Out-of-range indices are ignored.
    fn set_current_program(&mut self, index: usize) {
        if let Some(values) = self.programs_mut().and_then(|p| p.select(index)) {
            self.parameters().apply_program(values);
        }
    }

    fn program_name(&self, index: usize) -> String {
        self.programs()
            .and_then(|p| p.name(index))
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn change_program_name(&mut self, index: usize, name: &str) {
        if let Some(programs) = self.programs_mut() {
            programs.rename(index, name);
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Full state as opaque bytes.
    fn state(&self) -> PluginResult<Vec<u8>> {
        StateSnapshot::capture(self.parameters(), self.current_program()).to_bytes()
    }

    /// Restore bytes produced by [`state`](Self::state).
    fn set_state(&mut self, data: &[u8]) -> PluginResult<()> {
        let snapshot = StateSnapshot::from_bytes(data)?;
        snapshot.apply(self.parameters());
        Ok(())
    }

    /// State of the current program only. Defaults to the full state.
    fn program_state(&self) -> PluginResult<Vec<u8>> {
        self.state()
    }

    fn set_program_state(&mut self, data: &[u8]) -> PluginResult<()> {
        self.set_state(data)
    }

    /// Full state as text, for formats that store human-readable presets.
    fn state_string(&self) -> PluginResult<String> {
        StateSnapshot::capture(self.parameters(), self.current_program()).to_text()
    }

    fn set_state_string(&mut self, text: &str) -> PluginResult<()> {
        let snapshot = StateSnapshot::from_text(text)?;
        snapshot.apply(self.parameters());
        Ok(())
    }

    // =========================================================================
    // Editor and extensions
    // =========================================================================

    fn has_editor(&self) -> bool {
        false
    }

    /// Create the editor. `host` receives the editor's parameter gestures.
    fn create_editor(&mut self, _host: Arc<dyn HostContext>) -> Option<Box<dyn Editor>> {
        None
    }

    /// Whether the plugin handles MPE input.
    fn supports_mpe(&self) -> bool {
        false
    }

    /// Answer a capability query the adapter doesn't know itself.
    ///
    /// Returns 1 for yes, -1 for no and 0 for "don't know".
    fn can_do(&mut self, _capability: &str) -> isize {
        0
    }

    /// Raw vendor-specific extension call from a legacy host.
    fn vendor_specific(&mut self, _index: i32, _value: isize, _ptr: *mut c_void, _opt: f32) -> isize {
        0
    }
}
