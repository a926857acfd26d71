//! Generic VST2 wrapper around a [`Plugin`].
//!
//! One [`Vst2Wrapper`] is created per host instance. The host only ever sees
//! the embedded [`AEffect`]; its `object` field points back at the wrapper,
//! and every callback recovers the wrapper from there.
//!
//! Dispatcher opcodes are routed through a table built at compile time, one
//! handler per known opcode. Unknown opcodes, and every opcode after
//! shutdown, answer 0.
//!
//! # Threading
//!
//! Hosts call the dispatcher from their UI thread and the process callbacks
//! from the audio thread, and never call `process` concurrently with opcodes
//! that change the processing setup (sample rate, block size, suspend/resume,
//! precision, layouts). Parameter values are atomics and safe from any thread.

use std::ffi::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::sync::Arc;
use std::time::Instant;

use duplex_core::{
    AudioProcessor, CachedBusConfig, ChannelBuffer, ChannelLayout, Editor, MidiBuffer, Plugin,
    PluginConfig, Sample, MIDI_INPUT_CAPACITY,
};

use crate::abi::{
    effect_flags, effect_opcodes, AEffect, ERect, HostCallback, PinProperties, SpeakerArrangement,
    EFFECT_MAGIC, MAX_PIN_LABEL, MAX_PIN_SHORT_LABEL, PIN_IS_ACTIVE, PIN_IS_STEREO,
    PIN_USE_SPEAKER, PROCESS_PRECISION_64, VST_VERSION,
};
use crate::buffers::{clear_outputs, host_channels, AccumulatingOutputs, AudioMarshaler};
use crate::chunk::ChunkCache;
use crate::config::{vendor_version, Vst2Config};
use crate::events::{read_events, OutgoingEvents};
use crate::host::Host;
use crate::registry::ACTIVE_INSTANCES;
use crate::speaker::{arrangement_from_layout, layout_from_arrangement, read_arrangement, ArrangementBuffer};
use crate::transport::{transport_from_time_info, TRANSPORT_REQUEST};
use crate::util::{copy_str_to_char_array, read_c_string, write_c_string};

/// Text limits (without terminator) of the classic string opcodes.
const MAX_PROGRAM_NAME: usize = 24;
const MAX_PARAM_LABEL: usize = 24;
const MAX_PARAM_NAME: usize = 32;
const MAX_PRODUCT_NAME: usize = 64;
/// Buffer size hosts provide for the Cockos parameter text extension.
const MAX_COCKOS_TEXT: usize = 1023;

/// Reply to `IDENTIFY`.
const IDENTIFY_REPLY: isize = i32::from_be_bytes(*b"NvEf") as isize;
/// Vendor-specific index/value pair announcing a content scale factor.
const SCALE_FACTOR_INDEX: i32 = i32::from_be_bytes(*b"PreS");
const SCALE_FACTOR_VALUE: isize = i32::from_be_bytes(*b"AeCs") as isize;
/// Magic reply for the Cockos extensions.
const COCKOS_REPLY: isize = 0xbeef;
const COCKOS_EXTENSIONS: isize = 0xbeef_0000;

/// Arguments of one dispatcher call.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeArgs {
    pub index: i32,
    pub value: isize,
    pub ptr: *mut c_void,
    pub opt: f32,
}

type Handler<P> = fn(&mut Vst2Wrapper<P>, &OpcodeArgs) -> isize;

// =============================================================================
// Precision dispatch
// =============================================================================

/// Scratch storage for both precisions.
#[derive(Default)]
struct Marshalers {
    single: AudioMarshaler<f32>,
    double: AudioMarshaler<f64>,
}

impl Marshalers {
    /// Hosts may call either process callback regardless of the precision
    /// they negotiated, so single precision is always ready.
    fn allocate(&mut self, with_double: bool, num_channels: usize, block_size: usize) {
        self.single.allocate(num_channels, block_size);
        if with_double {
            self.double.allocate(num_channels, block_size);
        } else {
            self.double.release();
        }
    }

    fn release(&mut self) {
        self.single.release();
        self.double.release();
    }
}

/// Sample types the host can process in.
trait HostSample: Sample {
    fn marshaler(marshalers: &mut Marshalers) -> &mut AudioMarshaler<Self>;

    fn run<P: Plugin>(plugin: &mut P, buffer: &mut ChannelBuffer<'_, Self>, midi: &mut MidiBuffer, bypassed: bool);
}

impl HostSample for f32 {
    fn marshaler(marshalers: &mut Marshalers) -> &mut AudioMarshaler<Self> {
        &mut marshalers.single
    }

    fn run<P: Plugin>(plugin: &mut P, buffer: &mut ChannelBuffer<'_, Self>, midi: &mut MidiBuffer, bypassed: bool) {
        if bypassed {
            plugin.process_bypassed(buffer, midi);
        } else {
            plugin.process(buffer, midi);
        }
    }
}

impl HostSample for f64 {
    fn marshaler(marshalers: &mut Marshalers) -> &mut AudioMarshaler<Self> {
        &mut marshalers.double
    }

    fn run<P: Plugin>(plugin: &mut P, buffer: &mut ChannelBuffer<'_, Self>, midi: &mut MidiBuffer, bypassed: bool) {
        if bypassed {
            plugin.process_bypassed_f64(buffer, midi);
        } else {
            plugin.process_f64(buffer, midi);
        }
    }
}

// =============================================================================
// Wrapper
// =============================================================================

/// VST2 instance wrapping one plugin.
pub struct Vst2Wrapper<P: Plugin> {
    effect: AEffect,
    plugin: P,
    config: &'static PluginConfig,
    vst2_config: &'static Vst2Config,
    host: Host,

    sample_rate: f64,
    block_size: usize,
    is_processing: bool,
    is_bypassed: bool,
    first_process_call: bool,
    use_double_precision: bool,
    has_shutdown: bool,

    bus_config: CachedBusConfig,
    marshalers: Marshalers,
    accumulator: AccumulatingOutputs<f32>,
    midi: MidiBuffer,
    outgoing: Option<OutgoingEvents>,

    editor: Option<Box<dyn Editor>>,
    editor_rect: ERect,
    editor_scale: f32,
    should_delete_editor: bool,

    chunk: ChunkCache,
    input_arrangement: ArrangementBuffer,
    output_arrangement: ArrangementBuffer,
}

impl<P: Plugin> Vst2Wrapper<P> {
    /// Opcode handlers indexed by opcode.
    const DISPATCH: [Option<Handler<P>>; effect_opcodes::COUNT] = {
        use effect_opcodes::*;
        let mut table: [Option<Handler<P>>; COUNT] = [None; COUNT];
        table[OPEN as usize] = Some(Self::handle_open);
        table[CLOSE as usize] = Some(Self::handle_close);
        table[SET_PROGRAM as usize] = Some(Self::handle_set_program);
        table[GET_PROGRAM as usize] = Some(Self::handle_get_program);
        table[SET_PROGRAM_NAME as usize] = Some(Self::handle_set_program_name);
        table[GET_PROGRAM_NAME as usize] = Some(Self::handle_get_program_name);
        table[GET_PARAM_LABEL as usize] = Some(Self::handle_get_param_label);
        table[GET_PARAM_DISPLAY as usize] = Some(Self::handle_get_param_display);
        table[GET_PARAM_NAME as usize] = Some(Self::handle_get_param_name);
        table[SET_SAMPLE_RATE as usize] = Some(Self::handle_set_sample_rate);
        table[SET_BLOCK_SIZE as usize] = Some(Self::handle_set_block_size);
        table[MAINS_CHANGED as usize] = Some(Self::handle_mains_changed);
        table[EDIT_GET_RECT as usize] = Some(Self::handle_edit_get_rect);
        table[EDIT_OPEN as usize] = Some(Self::handle_edit_open);
        table[EDIT_CLOSE as usize] = Some(Self::handle_edit_close);
        table[EDIT_IDLE as usize] = Some(Self::handle_edit_idle);
        table[IDENTIFY as usize] = Some(Self::handle_identify);
        table[GET_CHUNK as usize] = Some(Self::handle_get_chunk);
        table[SET_CHUNK as usize] = Some(Self::handle_set_chunk);
        table[PROCESS_EVENTS as usize] = Some(Self::handle_process_events);
        table[CAN_BE_AUTOMATED as usize] = Some(Self::handle_can_be_automated);
        table[STRING_TO_PARAMETER as usize] = Some(Self::handle_string_to_parameter);
        table[GET_PROGRAM_NAME_INDEXED as usize] = Some(Self::handle_get_program_name_indexed);
        table[GET_INPUT_PROPERTIES as usize] = Some(Self::handle_get_input_properties);
        table[GET_OUTPUT_PROPERTIES as usize] = Some(Self::handle_get_output_properties);
        table[GET_PLUG_CATEGORY as usize] = Some(Self::handle_get_plug_category);
        table[SET_SPEAKER_ARRANGEMENT as usize] = Some(Self::handle_set_speaker_arrangement);
        table[SET_BYPASS as usize] = Some(Self::handle_set_bypass);
        table[GET_EFFECT_NAME as usize] = Some(Self::handle_get_effect_name);
        table[GET_VENDOR_STRING as usize] = Some(Self::handle_get_vendor_string);
        table[GET_PRODUCT_STRING as usize] = Some(Self::handle_get_effect_name);
        table[GET_VENDOR_VERSION as usize] = Some(Self::handle_get_vendor_version);
        table[VENDOR_SPECIFIC as usize] = Some(Self::handle_vendor_specific);
        table[CAN_DO as usize] = Some(Self::handle_can_do);
        table[GET_TAIL_SIZE as usize] = Some(Self::handle_get_tail_size);
        table[KEYS_REQUIRED as usize] = Some(Self::handle_keys_required);
        table[GET_VST_VERSION as usize] = Some(Self::handle_get_vst_version);
        table[GET_CURRENT_MIDI_PROGRAM as usize] = Some(Self::handle_get_current_midi_program);
        table[GET_SPEAKER_ARRANGEMENT as usize] = Some(Self::handle_get_speaker_arrangement);
        table[SET_TOTAL_SAMPLES_TO_PROCESS as usize] = Some(Self::handle_set_total_samples);
        table[SET_PROCESS_PRECISION as usize] = Some(Self::handle_set_process_precision);
        table[GET_NUM_MIDI_INPUT_CHANNELS as usize] = Some(Self::handle_get_num_midi_inputs);
        table[GET_NUM_MIDI_OUTPUT_CHANNELS as usize] = Some(Self::handle_get_num_midi_outputs);
        table
    };

    fn new(
        plugin: P,
        host: Host,
        config: &'static PluginConfig,
        vst2_config: &'static Vst2Config,
    ) -> Self {
        let bus_config = CachedBusConfig::from_processor(&plugin);
        if let Err(msg) = bus_config.validate() {
            log::warn!("Plugin bus configuration exceeds limits: {}", msg);
        }

        let (num_inputs, num_outputs) = if config.is_midi_effect() {
            (2, 2)
        } else {
            config
                .preferred_max_channels()
                .unwrap_or_else(|| bus_config.max_total_channels())
        };

        let mut flags = effect_flags::CAN_REPLACING | effect_flags::PROGRAM_CHUNKS;
        if config.has_editor || plugin.has_editor() {
            flags |= effect_flags::HAS_EDITOR;
        }
        if plugin.supports_double_precision() {
            flags |= effect_flags::CAN_DOUBLE_REPLACING;
        }
        if config.is_instrument() {
            flags |= effect_flags::IS_SYNTH;
        }

        let effect = AEffect {
            magic: EFFECT_MAGIC,
            dispatcher: Self::dispatch_callback,
            process: Self::process_callback,
            set_parameter: Self::set_parameter_callback,
            get_parameter: Self::get_parameter_callback,
            num_programs: plugin.num_programs().max(1) as i32,
            num_params: plugin.parameters().len() as i32,
            num_inputs: num_inputs as i32,
            num_outputs: num_outputs as i32,
            flags,
            reserved1: 0,
            reserved2: 0,
            initial_delay: plugin.latency_samples() as i32,
            real_qualities: 0,
            off_qualities: 0,
            io_ratio: 1.0,
            object: ptr::null_mut(),
            user: ptr::null_mut(),
            unique_id: vst2_config.unique_id,
            version: vst2_config.effect_version(config),
            process_replacing: Self::process_replacing_callback,
            process_double_replacing: Self::process_double_replacing_callback,
            future: [0; 56],
        };

        Self {
            effect,
            plugin,
            config,
            vst2_config,
            host,
            sample_rate: 44100.0,
            block_size: 1024,
            is_processing: false,
            is_bypassed: false,
            first_process_call: true,
            use_double_precision: false,
            has_shutdown: false,
            bus_config,
            marshalers: Marshalers::default(),
            accumulator: AccumulatingOutputs::new(),
            midi: MidiBuffer::with_capacity(MIDI_INPUT_CAPACITY),
            outgoing: None,
            editor: None,
            editor_rect: ERect::default(),
            editor_scale: 1.0,
            should_delete_editor: false,
            chunk: ChunkCache::new(),
            input_arrangement: ArrangementBuffer::empty(),
            output_arrangement: ArrangementBuffer::empty(),
        }
    }

    /// Create a wrapper for the host and return the effect it should use.
    ///
    /// Returns null when the host does not answer the version query or the
    /// plugin panics during construction.
    pub fn instantiate(
        callback: Option<HostCallback>,
        config: &'static PluginConfig,
        vst2_config: &'static Vst2Config,
    ) -> *mut AEffect {
        let result = catch_unwind(AssertUnwindSafe(|| {
            let host = Host::new(callback);
            if host.version() == 0 {
                log::warn!("Host did not report a version, refusing to load");
                return ptr::null_mut();
            }

            let raw = Box::into_raw(Box::new(Self::new(P::create(), host, config, vst2_config)));
            // SAFETY: `raw` was just created from a live box and is not
            // shared yet.
            let effect = unsafe {
                (*raw).effect.object = raw as *mut c_void;
                let effect = ptr::addr_of_mut!((*raw).effect);
                (*raw).host.bind(effect);
                effect
            };
            ACTIVE_INSTANCES.register(raw as usize);
            log::debug!("Created VST2 instance of '{}'", config.name);
            effect
        }));

        result.unwrap_or_else(|_| {
            log::error!("Panic while creating VST2 instance of '{}'", config.name);
            ptr::null_mut()
        })
    }

    /// Recover the wrapper from an effect pointer.
    ///
    /// # Safety
    ///
    /// `effect` must be null or an effect returned by [`instantiate`](Self::instantiate)
    /// that has not been closed.
    unsafe fn from_effect<'a>(effect: *mut AEffect) -> Option<&'a mut Self> {
        if effect.is_null() {
            return None;
        }
        // SAFETY: caller contract.
        let object = unsafe { (*effect).object } as *mut Self;
        if object.is_null() {
            return None;
        }
        // SAFETY: `object` was set from a live box in `instantiate`.
        Some(unsafe { &mut *object })
    }

    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    pub fn effect(&self) -> &AEffect {
        &self.effect
    }

    /// Route one opcode through the dispatch table.
    pub fn dispatch(&mut self, opcode: i32, args: &OpcodeArgs) -> isize {
        if self.has_shutdown {
            return 0;
        }
        self.housekeeping();

        let handler = usize::try_from(opcode)
            .ok()
            .and_then(|op| Self::DISPATCH.get(op).copied().flatten());
        let result = match handler {
            Some(handler) => handler(self, args),
            None => 0,
        };

        // Expired after the handler: SET_CHUNK may be reading the cached chunk.
        self.chunk.tick(Instant::now());
        result
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Host channels the engine processes as `(inputs, outputs)`: the
    /// current bus totals, capped at what the effect declared.
    fn active_channels(&self) -> (usize, usize) {
        if self.config.is_midi_effect() {
            return (0, 0);
        }
        let declared = |count: i32| count.max(0) as usize;
        (
            self.bus_config.total_input_channels().min(declared(self.effect.num_inputs)),
            self.bus_config.total_output_channels().min(declared(self.effect.num_outputs)),
        )
    }

    fn num_channel_slots(&self) -> usize {
        let (inputs, outputs) = self.active_channels();
        inputs.max(outputs)
    }

    fn allocate_buffers(&mut self) {
        let slots = self.num_channel_slots();
        let with_double = self.plugin.supports_double_precision();
        self.marshalers.allocate(with_double, slots, self.block_size);
        self.accumulator
            .allocate(self.effect.num_outputs.max(0) as usize, self.block_size);
    }

    fn accepts_midi(&self) -> bool {
        self.config.wants_midi_input || self.config.is_midi_effect()
    }

    fn produces_midi(&self) -> bool {
        self.config.produces_midi_output || self.config.is_midi_effect()
    }

    fn resume(&mut self) {
        self.is_processing = true;
        self.first_process_call = true;
        self.plugin.set_non_realtime(self.host.is_offline());

        self.allocate_buffers();

        self.plugin.prepare(self.sample_rate, self.block_size);
        self.midi = MidiBuffer::with_capacity(MIDI_INPUT_CAPACITY);
        self.refresh_latency(false);

        if self.config.is_instrument() || self.accepts_midi() {
            self.host.want_midi();
        }
        if self.produces_midi() {
            self.outgoing = Some(OutgoingEvents::new());
        }

        log::debug!(
            "Resumed at {} Hz, {} samples, {} precision",
            self.sample_rate,
            self.block_size,
            if self.use_double_precision { "double" } else { "single" }
        );
    }

    fn suspend(&mut self) {
        if !self.is_processing {
            return;
        }
        self.plugin.release();
        self.outgoing = None;
        self.is_processing = false;
        self.marshalers.release();
        self.accumulator.release();
        log::debug!("Suspended");
    }

    /// Copy the plugin's latency into the effect, telling the host when it
    /// changed.
    fn refresh_latency(&mut self, notify: bool) {
        let latency = self.plugin.latency_samples() as i32;
        if latency != self.effect.initial_delay {
            self.effect.initial_delay = latency;
            if notify {
                self.host.io_changed();
            }
        }
    }

    /// Deferred editor teardown and latency updates.
    fn housekeeping(&mut self) {
        if self.should_delete_editor {
            self.should_delete_editor = false;
            self.delete_editor(false);
        }
        self.refresh_latency(true);
    }

    // =========================================================================
    // Editor
    // =========================================================================

    fn create_editor_if_needed(&mut self) {
        if self.has_shutdown || self.editor.is_some() {
            return;
        }
        let host: Arc<Host> = Arc::new(self.host);
        match self.plugin.create_editor(host) {
            Some(mut editor) => {
                self.effect.flags |= effect_flags::HAS_EDITOR;
                editor.set_scale_factor(self.editor_scale);
                self.editor = Some(editor);
            }
            None => {
                self.effect.flags &= !effect_flags::HAS_EDITOR;
            }
        }
    }

    /// Drop the editor. With `allow_defer`, a modal editor is asked to close
    /// its dialog and dropped on the next housekeeping tick instead.
    fn delete_editor(&mut self, allow_defer: bool) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        if editor.is_modal() {
            editor.dismiss_modal();
            if allow_defer {
                self.should_delete_editor = true;
                return;
            }
        }
        editor.detach();
        self.editor = None;
        self.should_delete_editor = false;
    }

    // =========================================================================
    // Processing
    // =========================================================================

    /// Resume lazily for hosts that start processing without `MAINS_CHANGED`.
    fn begin_block(&mut self) {
        if self.first_process_call {
            self.first_process_call = false;
            if !self.is_processing {
                self.resume();
            }
            self.plugin.set_non_realtime(self.host.is_offline());
        }
    }

    fn process_replacing<S: HostSample>(&mut self, inputs: *mut *mut S, outputs: *mut *mut S, frames: i32) {
        let num_samples = frames.max(0) as usize;
        self.begin_block();

        // SAFETY: the host passes `num_outputs` channel pointers (or null).
        let outputs = unsafe { host_channels(outputs as *const *mut S, self.effect.num_outputs) };
        // SAFETY: as above for inputs.
        let inputs = unsafe { host_channels(inputs as *const *const S, self.effect.num_inputs) };

        let (num_inputs, num_outputs) = self.active_channels();
        let ready = S::marshaler(&mut self.marshalers).num_slots() >= num_inputs.max(num_outputs);
        if !self.is_processing || !ready {
            // SAFETY: host outputs are writable for `num_samples`.
            unsafe { clear_outputs(outputs, num_samples) };
            self.midi.clear();
            return;
        }

        if self.plugin.wants_transport() {
            let transport = self
                .host
                .time_info(TRANSPORT_REQUEST)
                .map(|info| transport_from_time_info(&info))
                .unwrap_or_default();
            self.plugin.set_transport(&transport);
        }

        let (active_outputs, unused_outputs) = outputs.split_at(num_outputs.min(outputs.len()));
        let active_inputs = &inputs[..num_inputs.min(inputs.len())];

        let bypassed = self.is_bypassed;
        let plugin = &mut self.plugin;
        let midi = &mut self.midi;
        let marshaler = S::marshaler(&mut self.marshalers);
        // SAFETY: host channel pointers are valid for `num_samples` during
        // this callback.
        unsafe {
            marshaler.process(active_inputs, active_outputs, num_samples, |buffer| {
                S::run(plugin, buffer, midi, bypassed);
            });
        }

        // Outputs past the active layout are silent. Cleared after
        // processing since they may share memory with active inputs.
        for &output in unused_outputs {
            if !active_outputs.contains(&output) {
                // SAFETY: as above.
                unsafe { clear_outputs(&[output], num_samples) };
            }
        }

        if !self.midi.is_empty() && self.produces_midi() {
            if let Some(outgoing) = self.outgoing.as_mut() {
                outgoing.fill(&self.midi);
                self.host.process_events(outgoing.as_mut_ptr());
                outgoing.clear();
            }
        }
        self.midi.clear();
    }

    /// Legacy accumulating process: the result is added to the outputs.
    fn process_accumulating(&mut self, inputs: *mut *mut f32, outputs: *mut *mut f32, frames: i32) {
        let num_samples = frames.max(0) as usize;
        self.begin_block();

        if !self.is_processing {
            return;
        }

        let num_outputs = self.effect.num_outputs.max(0) as usize;
        let rendered = self.accumulator.prepare(num_outputs, num_samples);
        self.process_replacing::<f32>(inputs, rendered, frames);

        // SAFETY: the host passes `num_outputs` channel pointers (or null).
        let outputs = unsafe { host_channels(outputs as *const *mut f32, self.effect.num_outputs) };
        // SAFETY: host outputs are readable and writable for `num_samples`.
        unsafe { self.accumulator.add_into(outputs, num_samples) };
    }

    // =========================================================================
    // Host callbacks
    // =========================================================================

    extern "C" fn dispatch_callback(
        effect: *mut AEffect,
        opcode: i32,
        index: i32,
        value: isize,
        ptr: *mut c_void,
        opt: f32,
    ) -> isize {
        let result = catch_unwind(AssertUnwindSafe(|| {
            // SAFETY: the host passes back the effect we created.
            let Some(wrapper) = (unsafe { Self::from_effect(effect) }) else {
                return 0;
            };
            let args = OpcodeArgs { index, value, ptr, opt };

            if opcode == effect_opcodes::CLOSE {
                wrapper.dispatch(opcode, &args);
                // SAFETY: created by `Box::into_raw` in `instantiate`; the host
                // never uses the effect after closing it.
                drop(unsafe { Box::from_raw(wrapper as *mut Self) });
                return 1;
            }

            wrapper.dispatch(opcode, &args)
        }));

        result.unwrap_or_else(|_| {
            log::error!("Panic in VST2 dispatcher (opcode {})", opcode);
            0
        })
    }

    extern "C" fn process_callback(effect: *mut AEffect, inputs: *mut *mut f32, outputs: *mut *mut f32, frames: i32) {
        let result = catch_unwind(AssertUnwindSafe(|| {
            // SAFETY: the host passes back the effect we created.
            if let Some(wrapper) = unsafe { Self::from_effect(effect) } {
                wrapper.process_accumulating(inputs, outputs, frames);
            }
        }));
        if result.is_err() {
            log::error!("Panic in VST2 accumulating process callback");
        }
    }

    extern "C" fn process_replacing_callback(
        effect: *mut AEffect,
        inputs: *mut *mut f32,
        outputs: *mut *mut f32,
        frames: i32,
    ) {
        let result = catch_unwind(AssertUnwindSafe(|| {
            // SAFETY: the host passes back the effect we created.
            if let Some(wrapper) = unsafe { Self::from_effect(effect) } {
                wrapper.process_replacing::<f32>(inputs, outputs, frames);
            }
        }));
        if result.is_err() {
            log::error!("Panic in VST2 process callback");
        }
    }

    extern "C" fn process_double_replacing_callback(
        effect: *mut AEffect,
        inputs: *mut *mut f64,
        outputs: *mut *mut f64,
        frames: i32,
    ) {
        let result = catch_unwind(AssertUnwindSafe(|| {
            // SAFETY: the host passes back the effect we created.
            if let Some(wrapper) = unsafe { Self::from_effect(effect) } {
                wrapper.process_replacing::<f64>(inputs, outputs, frames);
            }
        }));
        if result.is_err() {
            log::error!("Panic in VST2 double process callback");
        }
    }

    extern "C" fn get_parameter_callback(effect: *mut AEffect, index: i32) -> f32 {
        catch_unwind(AssertUnwindSafe(|| {
            // SAFETY: the host passes back the effect we created.
            let wrapper = unsafe { Self::from_effect(effect) }?;
            let parameter = wrapper.plugin.parameters().by_index(usize::try_from(index).ok()?)?;
            Some(parameter.get_normalized() as f32)
        }))
        .ok()
        .flatten()
        .unwrap_or(0.0)
    }

    /// Host-side change: stored without echoing an automation event back.
    extern "C" fn set_parameter_callback(effect: *mut AEffect, index: i32, value: f32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            // SAFETY: the host passes back the effect we created.
            let Some(wrapper) = (unsafe { Self::from_effect(effect) }) else {
                return;
            };
            let parameter = usize::try_from(index)
                .ok()
                .and_then(|i| wrapper.plugin.parameters().by_index(i));
            if let Some(parameter) = parameter {
                parameter.set_normalized(value as f64);
            }
        }));
    }

    // =========================================================================
    // Opcode handlers
    // =========================================================================

    fn handle_open(&mut self, _args: &OpcodeArgs) -> isize {
        if self.config.has_editor || self.plugin.has_editor() {
            self.effect.flags |= effect_flags::HAS_EDITOR;
        } else {
            self.effect.flags &= !effect_flags::HAS_EDITOR;
        }
        0
    }

    fn handle_close(&mut self, _args: &OpcodeArgs) -> isize {
        self.delete_editor(false);
        0
    }

    fn handle_set_program(&mut self, args: &OpcodeArgs) -> isize {
        if let Ok(index) = usize::try_from(args.value) {
            if index < self.plugin.num_programs() {
                self.plugin.set_current_program(index);
            }
        }
        0
    }

    fn handle_get_program(&mut self, _args: &OpcodeArgs) -> isize {
        if self.plugin.num_programs() > 0 {
            self.plugin.current_program() as isize
        } else {
            0
        }
    }

    fn handle_set_program_name(&mut self, args: &OpcodeArgs) -> isize {
        // SAFETY: the host passes a null-terminated name.
        if let Some(name) = unsafe { read_c_string(args.ptr) } {
            let current = self.plugin.current_program();
            self.plugin.change_program_name(current, &name);
        }
        0
    }

    fn handle_get_program_name(&mut self, args: &OpcodeArgs) -> isize {
        let name = self.plugin.program_name(self.plugin.current_program());
        // SAFETY: hosts provide room for the program name limit.
        unsafe { write_c_string(args.ptr, &name, MAX_PROGRAM_NAME) };
        0
    }

    fn handle_get_param_label(&mut self, args: &OpcodeArgs) -> isize {
        if let Some(parameter) = self.parameter_at(args.index) {
            // SAFETY: hosts provide room for the label limit.
            unsafe { write_c_string(args.ptr, parameter.label(), MAX_PARAM_LABEL) };
        }
        0
    }

    fn handle_get_param_display(&mut self, args: &OpcodeArgs) -> isize {
        if let Some(parameter) = self.parameter_at(args.index) {
            // SAFETY: hosts provide room for the label limit.
            unsafe { write_c_string(args.ptr, &parameter.text(), MAX_PARAM_LABEL) };
        }
        0
    }

    fn handle_get_param_name(&mut self, args: &OpcodeArgs) -> isize {
        if let Some(parameter) = self.parameter_at(args.index) {
            // SAFETY: hosts provide room for the name limit.
            unsafe { write_c_string(args.ptr, parameter.name(MAX_PARAM_NAME), MAX_PARAM_NAME) };
        }
        0
    }

    fn handle_set_sample_rate(&mut self, args: &OpcodeArgs) -> isize {
        if args.opt > 0.0 {
            self.sample_rate = args.opt as f64;
        }
        0
    }

    fn handle_set_block_size(&mut self, args: &OpcodeArgs) -> isize {
        if args.value > 0 {
            self.block_size = args.value as usize;
        }
        0
    }

    fn handle_mains_changed(&mut self, args: &OpcodeArgs) -> isize {
        if args.value != 0 {
            self.resume();
        } else {
            self.suspend();
        }
        0
    }

    fn handle_edit_get_rect(&mut self, args: &OpcodeArgs) -> isize {
        self.create_editor_if_needed();
        let Some(editor) = self.editor.as_ref() else {
            return 0;
        };
        let size = editor.size();
        let scale = self.editor_scale.max(0.1);
        self.editor_rect = ERect {
            top: 0,
            left: 0,
            bottom: (size.height as f32 * scale).round().min(i16::MAX as f32) as i16,
            right: (size.width as f32 * scale).round().min(i16::MAX as f32) as i16,
        };

        let rect = ptr::addr_of_mut!(self.editor_rect);
        if !args.ptr.is_null() {
            // SAFETY: the host passes a location for the rect pointer.
            unsafe { *(args.ptr as *mut *mut ERect) = rect };
        }
        rect as isize
    }

    fn handle_edit_open(&mut self, args: &OpcodeArgs) -> isize {
        self.delete_editor(true);
        if self.should_delete_editor {
            // Still closing a modal dialog: keep the editor and move it to
            // the new parent.
            self.should_delete_editor = false;
            if let Some(editor) = self.editor.as_mut() {
                editor.detach();
            }
        }
        self.create_editor_if_needed();
        let attached = match self.editor.as_mut() {
            Some(editor) => editor.attach(args.ptr),
            None => false,
        };
        if !attached {
            self.editor = None;
            return 0;
        }
        1
    }

    fn handle_edit_close(&mut self, _args: &OpcodeArgs) -> isize {
        self.delete_editor(true);
        0
    }

    fn handle_edit_idle(&mut self, _args: &OpcodeArgs) -> isize {
        if let Some(editor) = self.editor.as_mut() {
            editor.idle();
        }
        0
    }

    fn handle_identify(&mut self, _args: &OpcodeArgs) -> isize {
        IDENTIFY_REPLY
    }

    fn handle_get_chunk(&mut self, args: &OpcodeArgs) -> isize {
        if args.ptr.is_null() {
            return 0;
        }
        let state = if args.index != 0 {
            self.plugin.program_state()
        } else {
            self.plugin.state()
        };
        match state {
            Ok(bytes) => {
                let (data, len) = self.chunk.store(bytes, Instant::now());
                // SAFETY: the host passes a location for the data pointer.
                unsafe { *(args.ptr as *mut *mut c_void) = data as *mut c_void };
                len as isize
            }
            Err(err) => {
                log::warn!("Failed to save plugin state: {}", err);
                0
            }
        }
    }

    fn handle_set_chunk(&mut self, args: &OpcodeArgs) -> isize {
        if args.value <= 0 || args.ptr.is_null() {
            self.chunk.clear();
            return 0;
        }
        // Copied first: hosts may pass back the cached chunk itself.
        // SAFETY: the host passes `value` readable bytes.
        let data = unsafe { std::slice::from_raw_parts(args.ptr as *const u8, args.value as usize) }.to_vec();
        self.chunk.clear();

        let result = if args.index != 0 {
            self.plugin.set_program_state(&data)
        } else {
            self.plugin.set_state(&data)
        };
        if let Err(err) = result {
            log::warn!("Failed to restore plugin state: {}", err);
        }
        0
    }

    fn handle_process_events(&mut self, args: &OpcodeArgs) -> isize {
        if !self.accepts_midi() {
            return 0;
        }
        // SAFETY: the host passes a valid event list.
        unsafe { read_events(args.ptr as *const _, &mut self.midi) };
        1
    }

    fn handle_can_be_automated(&mut self, args: &OpcodeArgs) -> isize {
        self.parameter_at(args.index)
            .map(|p| p.is_automatable() as isize)
            .unwrap_or(0)
    }

    /// Plugin-side change: the host is told about it.
    fn handle_string_to_parameter(&mut self, args: &OpcodeArgs) -> isize {
        let Some(index) = usize::try_from(args.index).ok() else {
            return 0;
        };
        // SAFETY: the host passes a null-terminated string.
        let Some(text) = (unsafe { read_c_string(args.ptr) }) else {
            return 0;
        };
        let Some(parameter) = self.plugin.parameters().by_index(index) else {
            return 0;
        };
        match parameter.value_for_text(&text) {
            Some(value) => {
                parameter.set_normalized(value);
                self.host.automate(index, parameter.get_normalized() as f32);
                1
            }
            None => 0,
        }
    }

    fn handle_get_program_name_indexed(&mut self, args: &OpcodeArgs) -> isize {
        match usize::try_from(args.index) {
            Ok(index) if index < self.plugin.num_programs() => {
                let name = self.plugin.program_name(index);
                // SAFETY: hosts provide room for the program name limit.
                unsafe { write_c_string(args.ptr, &name, MAX_PROGRAM_NAME) };
                1
            }
            _ => 0,
        }
    }

    fn handle_get_input_properties(&mut self, args: &OpcodeArgs) -> isize {
        self.pin_properties(true, args) as isize
    }

    fn handle_get_output_properties(&mut self, args: &OpcodeArgs) -> isize {
        self.pin_properties(false, args) as isize
    }

    fn pin_properties(&self, is_input: bool, args: &OpcodeArgs) -> bool {
        if self.config.is_midi_effect() || args.ptr.is_null() {
            return false;
        }
        let Ok(mut channel) = usize::try_from(args.index) else {
            return false;
        };

        // SAFETY: the host passes a pin properties struct.
        let properties = unsafe { &mut *(args.ptr as *mut PinProperties) };
        properties.flags = 0;
        properties.label[0] = 0;
        properties.short_label[0] = 0;
        properties.arrangement_type = crate::speaker::arrangement::EMPTY;

        for bus_index in 0..self.plugin.bus_count(is_input) {
            let Some(bus) = self.plugin.bus_info(is_input, bus_index) else {
                continue;
            };
            let count = bus.channel_count();
            if channel >= count {
                channel -= count;
                continue;
            }

            let role = bus.layout.role(channel);
            properties.flags = PIN_IS_ACTIVE | PIN_USE_SPEAKER;
            if role.is_left_side() {
                properties.flags |= PIN_IS_STEREO;
            }
            properties.arrangement_type = arrangement_from_layout(&bus.layout);

            let label = if !self.config.channel_configurations.is_empty() {
                format!("{} {}", bus.name, channel)
            } else if count > 1 {
                format!("{} {}", bus.name, role.abbreviation())
            } else {
                bus.name.to_string()
            };
            copy_str_to_char_array(&label, &mut properties.label[..MAX_PIN_LABEL]);
            copy_str_to_char_array(&label, &mut properties.short_label[..MAX_PIN_SHORT_LABEL]);
            return true;
        }
        false
    }

    fn handle_get_plug_category(&mut self, _args: &OpcodeArgs) -> isize {
        self.vst2_config.plug_category(self.config) as isize
    }

    fn handle_set_speaker_arrangement(&mut self, args: &OpcodeArgs) -> isize {
        if self.config.is_midi_effect() {
            return 0;
        }
        // SAFETY: the host passes arrangement pointers (or null) in value and ptr.
        let input = unsafe { read_arrangement(args.value as *const SpeakerArrangement) };
        // SAFETY: as above.
        let output = unsafe { read_arrangement(args.ptr as *const SpeakerArrangement) };

        let consistent = |side: Option<(i32, i32)>| match side {
            Some((arrangement_type, num_channels)) if arrangement_type >= 0 => {
                layout_from_arrangement(arrangement_type, num_channels.max(0) as usize).len() as i32
                    == num_channels
            }
            _ => true,
        };
        if !consistent(input) || !consistent(output) {
            log::warn!("Rejecting inconsistent speaker arrangement {:?} -> {:?}", input, output);
            return 0;
        }

        let num_input_buses = self.plugin.bus_count(true);
        let num_output_buses = self.plugin.bus_count(false);
        let has_channels = |side: Option<(i32, i32)>| side.is_some_and(|(_, n)| n > 0);
        if (has_channels(input) && num_input_buses == 0) || (has_channels(output) && num_output_buses == 0) {
            return 0;
        }

        let current = |is_input: bool, count: usize| -> Vec<ChannelLayout> {
            (0..count)
                .map(|i| {
                    self.plugin
                        .bus_info(is_input, i)
                        .map(|bus| bus.layout)
                        .unwrap_or_default()
                })
                .collect()
        };
        let mut inputs = current(true, num_input_buses);
        let mut outputs = current(false, num_output_buses);

        let requested = |side: Option<(i32, i32)>| {
            side.filter(|&(_, n)| n >= 0)
                .map(|(t, n)| layout_from_arrangement(t, n as usize))
        };
        if let (Some(layout), Some(main)) = (requested(input), inputs.first_mut()) {
            *main = layout;
        }
        if let (Some(layout), Some(main)) = (requested(output), outputs.first_mut()) {
            *main = layout;
        }

        if !self.config.channel_configurations.is_empty() {
            let main_in = inputs.first().map(ChannelLayout::len).unwrap_or(0);
            let main_out = outputs.first().map(ChannelLayout::len).unwrap_or(0);
            let listed = self
                .config
                .channel_configurations
                .iter()
                .any(|&(i, o)| i as usize == main_in && o as usize == main_out);
            if !listed {
                return 0;
            }
        }

        if !self.plugin.apply_bus_layouts(&inputs, &outputs) {
            return 0;
        }
        self.bus_config = CachedBusConfig::from_processor(&self.plugin);
        if self.is_processing {
            self.allocate_buffers();
        }
        log::debug!(
            "Bus layout changed to {} in / {} out",
            self.bus_config.total_input_channels(),
            self.bus_config.total_output_channels()
        );
        1
    }

    fn handle_set_bypass(&mut self, args: &OpcodeArgs) -> isize {
        self.is_bypassed = args.value != 0;
        let parameters = self.plugin.parameters();
        if let Some(index) = parameters.iter().position(|p| p.is_bypass()) {
            let value = if self.is_bypassed { 1.0 } else { 0.0 };
            if let Some(parameter) = parameters.by_index(index) {
                parameter.set_normalized(value);
            }
            self.host.automate(index, value as f32);
        }
        1
    }

    fn handle_get_effect_name(&mut self, args: &OpcodeArgs) -> isize {
        // SAFETY: hosts provide room for the product name limit.
        unsafe { write_c_string(args.ptr, self.config.name, MAX_PRODUCT_NAME) };
        1
    }

    fn handle_get_vendor_string(&mut self, args: &OpcodeArgs) -> isize {
        // SAFETY: hosts provide room for the vendor name limit.
        unsafe { write_c_string(args.ptr, self.config.vendor, MAX_PRODUCT_NAME) };
        1
    }

    fn handle_get_vendor_version(&mut self, _args: &OpcodeArgs) -> isize {
        vendor_version(self.config.version_code) as isize
    }

    fn handle_vendor_specific(&mut self, args: &OpcodeArgs) -> isize {
        if args.index == SCALE_FACTOR_INDEX && args.value == SCALE_FACTOR_VALUE {
            if (args.opt - self.editor_scale).abs() > f32::EPSILON {
                self.editor_scale = args.opt;
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_scale_factor(args.opt);
                }
            }
            return 1;
        }

        if args.index == effect_opcodes::GET_PARAM_DISPLAY {
            return self.cockos_parameter_text(args);
        }

        self.plugin.vendor_specific(args.index, args.value, args.ptr, args.opt)
    }

    /// Text for an arbitrary value of a parameter (`value` = index,
    /// `opt` = normalized value).
    fn cockos_parameter_text(&self, args: &OpcodeArgs) -> isize {
        if args.ptr.is_null() {
            return 0;
        }
        let Some(parameter) = usize::try_from(args.value)
            .ok()
            .and_then(|i| self.plugin.parameters().by_index(i))
        else {
            return 0;
        };
        let text = parameter.text_for(args.opt as f64);
        // SAFETY: the extension's text buffer holds 1024 bytes.
        unsafe { write_c_string(args.ptr, &text, MAX_COCKOS_TEXT) };
        COCKOS_REPLY
    }

    fn handle_can_do(&mut self, args: &OpcodeArgs) -> isize {
        // SAFETY: the host passes a null-terminated capability string.
        let Some(capability) = (unsafe { read_c_string(args.ptr) }) else {
            return 0;
        };
        let yes_no = |enabled: bool| if enabled { 1 } else { -1 };

        match capability.as_str() {
            "receiveVstEvents" | "receiveVstMidiEvent" | "receiveVstMidiEvents" => {
                yes_no(self.accepts_midi())
            }
            "sendVstEvents" | "sendVstMidiEvent" | "sendVstMidiEvents" => yes_no(self.produces_midi()),
            "receiveVstTimeInfo" | "conformsToWindowRules" | "supportsViewDpiScaling" | "bypass" => 1,
            "openCloseAnyThread" => -1,
            "MPE" => self.plugin.supports_mpe() as isize,
            "hasCockosExtensions" => COCKOS_EXTENSIONS,
            other => self.plugin.can_do(other),
        }
    }

    fn handle_get_tail_size(&mut self, _args: &OpcodeArgs) -> isize {
        let tail = self.plugin.tail_seconds();
        if tail.is_infinite() {
            i32::MAX as isize
        } else {
            (tail * self.sample_rate) as i32 as isize
        }
    }

    fn handle_keys_required(&mut self, _args: &OpcodeArgs) -> isize {
        self.config.wants_keyboard_focus as isize
    }

    fn handle_get_vst_version(&mut self, _args: &OpcodeArgs) -> isize {
        VST_VERSION
    }

    fn handle_get_current_midi_program(&mut self, _args: &OpcodeArgs) -> isize {
        -1
    }

    fn handle_get_speaker_arrangement(&mut self, args: &OpcodeArgs) -> isize {
        if self.bus_config.has_aux_buses() || self.config.is_midi_effect() {
            return 0;
        }
        if args.value == 0 || args.ptr.is_null() {
            return 0;
        }

        let main_layout = |is_input: bool| {
            self.plugin
                .bus_info(is_input, 0)
                .map(|bus| bus.layout)
                .unwrap_or_default()
        };
        self.input_arrangement = ArrangementBuffer::from_layout(&main_layout(true));
        self.output_arrangement = ArrangementBuffer::from_layout(&main_layout(false));

        // SAFETY: the host passes locations for both arrangement pointers.
        unsafe {
            *(args.value as *mut *mut SpeakerArrangement) = self.input_arrangement.as_mut_ptr();
            *(args.ptr as *mut *mut SpeakerArrangement) = self.output_arrangement.as_mut_ptr();
        }
        1
    }

    fn handle_set_total_samples(&mut self, args: &OpcodeArgs) -> isize {
        args.value
    }

    fn handle_set_process_precision(&mut self, args: &OpcodeArgs) -> isize {
        if self.is_processing {
            return 0;
        }
        self.use_double_precision =
            args.value == PROCESS_PRECISION_64 && self.plugin.supports_double_precision();
        1
    }

    fn handle_get_num_midi_inputs(&mut self, _args: &OpcodeArgs) -> isize {
        if self.accepts_midi() {
            self.vst2_config.midi_input_channels as isize
        } else {
            0
        }
    }

    fn handle_get_num_midi_outputs(&mut self, _args: &OpcodeArgs) -> isize {
        if self.produces_midi() {
            self.vst2_config.midi_output_channels as isize
        } else {
            0
        }
    }

    fn parameter_at(&self, index: i32) -> Option<&duplex_core::Parameter> {
        self.plugin.parameters().by_index(usize::try_from(index).ok()?)
    }
}

impl<P: Plugin> Drop for Vst2Wrapper<P> {
    fn drop(&mut self) {
        self.delete_editor(false);
        self.has_shutdown = true;
        if self.is_processing {
            self.plugin.release();
            self.is_processing = false;
        }
        self.marshalers.release();
        self.accumulator.release();

        if ACTIVE_INSTANCES.unregister(self as *mut Self as usize) {
            log::debug!("Last VST2 instance of '{}' closed", self.config.name);
        }
    }
}
