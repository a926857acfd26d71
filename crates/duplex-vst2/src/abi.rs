//! Binary layout of the VST 2.x plugin interface.
//!
//! Only the pieces the wrapper needs are declared here: the effect struct the
//! host holds on to, the opcodes exchanged in both directions, and the
//! auxiliary structs passed through `ptr` arguments. Layouts follow the
//! 2.4 interface with natural C alignment.

use std::ffi::{c_char, c_void};

/// `'VstP'`, stored in [`AEffect::magic`].
pub const EFFECT_MAGIC: i32 = i32::from_be_bytes(*b"VstP");

/// Interface version reported for `getVstVersion`.
pub const VST_VERSION: isize = 2400;

/// Host callback signature.
pub type HostCallback = extern "C" fn(
    effect: *mut AEffect,
    opcode: i32,
    index: i32,
    value: isize,
    ptr: *mut c_void,
    opt: f32,
) -> isize;

pub type DispatcherProc = extern "C" fn(
    effect: *mut AEffect,
    opcode: i32,
    index: i32,
    value: isize,
    ptr: *mut c_void,
    opt: f32,
) -> isize;

pub type ProcessProc =
    extern "C" fn(effect: *mut AEffect, inputs: *mut *mut f32, outputs: *mut *mut f32, frames: i32);

pub type ProcessDoubleProc =
    extern "C" fn(effect: *mut AEffect, inputs: *mut *mut f64, outputs: *mut *mut f64, frames: i32);

pub type SetParameterProc = extern "C" fn(effect: *mut AEffect, index: i32, value: f32);

pub type GetParameterProc = extern "C" fn(effect: *mut AEffect, index: i32) -> f32;

/// The effect struct handed to the host.
///
/// `object` points back at the owning wrapper.
#[repr(C)]
pub struct AEffect {
    pub magic: i32,
    pub dispatcher: DispatcherProc,
    /// Accumulating process call, unused since 2.4.
    pub process: ProcessProc,
    pub set_parameter: SetParameterProc,
    pub get_parameter: GetParameterProc,
    pub num_programs: i32,
    pub num_params: i32,
    pub num_inputs: i32,
    pub num_outputs: i32,
    pub flags: i32,
    pub reserved1: isize,
    pub reserved2: isize,
    pub initial_delay: i32,
    pub real_qualities: i32,
    pub off_qualities: i32,
    pub io_ratio: f32,
    pub object: *mut c_void,
    pub user: *mut c_void,
    pub unique_id: i32,
    pub version: i32,
    pub process_replacing: ProcessProc,
    pub process_double_replacing: ProcessDoubleProc,
    pub future: [u8; 56],
}

/// Flags stored in [`AEffect::flags`].
pub mod effect_flags {
    pub const HAS_EDITOR: i32 = 1 << 0;
    pub const CAN_REPLACING: i32 = 1 << 4;
    pub const PROGRAM_CHUNKS: i32 = 1 << 5;
    pub const IS_SYNTH: i32 = 1 << 8;
    pub const NO_SOUND_IN_STOP: i32 = 1 << 9;
    pub const CAN_DOUBLE_REPLACING: i32 = 1 << 12;
}

/// Opcodes the host sends to the plugin dispatcher.
pub mod effect_opcodes {
    pub const OPEN: i32 = 0;
    pub const CLOSE: i32 = 1;
    pub const SET_PROGRAM: i32 = 2;
    pub const GET_PROGRAM: i32 = 3;
    pub const SET_PROGRAM_NAME: i32 = 4;
    pub const GET_PROGRAM_NAME: i32 = 5;
    pub const GET_PARAM_LABEL: i32 = 6;
    pub const GET_PARAM_DISPLAY: i32 = 7;
    pub const GET_PARAM_NAME: i32 = 8;
    pub const SET_SAMPLE_RATE: i32 = 10;
    pub const SET_BLOCK_SIZE: i32 = 11;
    pub const MAINS_CHANGED: i32 = 12;
    pub const EDIT_GET_RECT: i32 = 13;
    pub const EDIT_OPEN: i32 = 14;
    pub const EDIT_CLOSE: i32 = 15;
    pub const EDIT_IDLE: i32 = 19;
    pub const IDENTIFY: i32 = 22;
    pub const GET_CHUNK: i32 = 23;
    pub const SET_CHUNK: i32 = 24;
    pub const PROCESS_EVENTS: i32 = 25;
    pub const CAN_BE_AUTOMATED: i32 = 26;
    pub const STRING_TO_PARAMETER: i32 = 27;
    pub const GET_PROGRAM_NAME_INDEXED: i32 = 29;
    pub const GET_INPUT_PROPERTIES: i32 = 33;
    pub const GET_OUTPUT_PROPERTIES: i32 = 34;
    pub const GET_PLUG_CATEGORY: i32 = 35;
    pub const SET_SPEAKER_ARRANGEMENT: i32 = 42;
    pub const SET_BYPASS: i32 = 44;
    pub const GET_EFFECT_NAME: i32 = 45;
    pub const GET_VENDOR_STRING: i32 = 47;
    pub const GET_PRODUCT_STRING: i32 = 48;
    pub const GET_VENDOR_VERSION: i32 = 49;
    pub const VENDOR_SPECIFIC: i32 = 50;
    pub const CAN_DO: i32 = 51;
    pub const GET_TAIL_SIZE: i32 = 52;
    pub const KEYS_REQUIRED: i32 = 57;
    pub const GET_VST_VERSION: i32 = 58;
    pub const GET_CURRENT_MIDI_PROGRAM: i32 = 63;
    pub const GET_SPEAKER_ARRANGEMENT: i32 = 69;
    pub const START_PROCESS: i32 = 71;
    pub const STOP_PROCESS: i32 = 72;
    pub const SET_TOTAL_SAMPLES_TO_PROCESS: i32 = 73;
    pub const SET_PROCESS_PRECISION: i32 = 77;
    pub const GET_NUM_MIDI_INPUT_CHANNELS: i32 = 78;
    pub const GET_NUM_MIDI_OUTPUT_CHANNELS: i32 = 79;

    /// Size of the dispatch table (one past the highest opcode).
    pub const COUNT: usize = 80;
}

/// Opcodes the plugin sends to the host callback.
pub mod host_opcodes {
    pub const AUTOMATE: i32 = 0;
    pub const VERSION: i32 = 1;
    pub const CURRENT_ID: i32 = 2;
    pub const IDLE: i32 = 3;
    pub const WANT_MIDI: i32 = 6;
    pub const GET_TIME: i32 = 7;
    pub const PROCESS_EVENTS: i32 = 8;
    pub const IO_CHANGED: i32 = 13;
    pub const SIZE_WINDOW: i32 = 15;
    pub const GET_CURRENT_PROCESS_LEVEL: i32 = 23;
    pub const UPDATE_DISPLAY: i32 = 42;
    pub const BEGIN_EDIT: i32 = 43;
    pub const END_EDIT: i32 = 44;
}

/// Value of `GET_CURRENT_PROCESS_LEVEL` while the host renders offline.
pub const PROCESS_LEVEL_OFFLINE: isize = 4;

/// `SET_PROCESS_PRECISION` value requesting double precision.
pub const PROCESS_PRECISION_64: isize = 1;

/// Plugin categories reported by `GET_PLUG_CATEGORY`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlugCategory {
    Unknown = 0,
    Effect = 1,
    Synth = 2,
    Analysis = 3,
    Mastering = 4,
    Spacializer = 5,
    RoomFx = 6,
    SurroundFx = 7,
    Restoration = 8,
    OfflineProcess = 9,
    Shell = 10,
    Generator = 11,
}

/// Editor bounds in the host's 16-bit coordinate space.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ERect {
    pub top: i16,
    pub left: i16,
    pub bottom: i16,
    pub right: i16,
}

pub const PIN_IS_ACTIVE: i32 = 1 << 0;
pub const PIN_IS_STEREO: i32 = 1 << 1;
pub const PIN_USE_SPEAKER: i32 = 1 << 2;

/// Text limit of [`PinProperties::label`], terminator included.
pub const MAX_PIN_LABEL: usize = 64;
/// Text limit of [`PinProperties::short_label`], terminator included.
pub const MAX_PIN_SHORT_LABEL: usize = 8;

#[repr(C)]
pub struct PinProperties {
    pub label: [c_char; MAX_PIN_LABEL],
    pub flags: i32,
    pub arrangement_type: i32,
    pub short_label: [c_char; MAX_PIN_SHORT_LABEL],
    pub future: [u8; 48],
}

/// One speaker of a [`SpeakerArrangement`].
#[repr(C)]
#[derive(Clone, Copy)]
pub struct SpeakerProperties {
    pub azimuth: f32,
    pub elevation: f32,
    pub radius: f32,
    pub reserved: f32,
    pub name: [c_char; 64],
    pub speaker_type: i32,
    pub future: [u8; 28],
}

impl Default for SpeakerProperties {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            radius: 0.0,
            reserved: 0.0,
            name: [0; 64],
            speaker_type: 0,
            future: [0; 28],
        }
    }
}

/// Speakers declared inline in [`SpeakerArrangement`]. Larger arrangements
/// extend past the end of the struct.
pub const INLINE_SPEAKERS: usize = 8;

/// Speaker arrangement header. `num_channels` entries follow in `speakers`,
/// of which the first [`INLINE_SPEAKERS`] are part of the declared struct.
#[repr(C)]
pub struct SpeakerArrangement {
    pub arrangement_type: i32,
    pub num_channels: i32,
    pub speakers: [SpeakerProperties; INLINE_SPEAKERS],
}

pub const EVENT_TYPE_MIDI: i32 = 1;
pub const EVENT_TYPE_SYSEX: i32 = 6;

/// Generic event header; concrete events share its first fields.
#[repr(C)]
pub struct Event {
    pub event_type: i32,
    pub byte_size: i32,
    pub delta_frames: i32,
    pub flags: i32,
    pub data: [u8; 16],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct MidiEvent {
    pub event_type: i32,
    pub byte_size: i32,
    pub delta_frames: i32,
    pub flags: i32,
    pub note_length: i32,
    pub note_offset: i32,
    pub midi_data: [u8; 4],
    pub detune: i8,
    pub note_off_velocity: u8,
    pub reserved1: u8,
    pub reserved2: u8,
}

/// Host timing snapshot returned by `GET_TIME`.
///
/// Only the sample position and rate are always valid; the rest depends on
/// `flags` (see [`time_info_flags`]).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeInfo {
    pub sample_pos: f64,
    pub sample_rate: f64,
    pub nano_seconds: f64,
    /// Musical position in quarter notes.
    pub ppq_pos: f64,
    pub tempo: f64,
    /// Start of the last bar in quarter notes.
    pub bar_start_pos: f64,
    pub cycle_start_pos: f64,
    pub cycle_end_pos: f64,
    pub time_sig_numerator: i32,
    pub time_sig_denominator: i32,
    /// SMPTE offset in subframes.
    pub smpte_offset: i32,
    /// One of the [`smpte_rates`] codes.
    pub smpte_frame_rate: i32,
    pub samples_to_next_clock: i32,
    pub flags: i32,
}

pub mod time_info_flags {
    pub const TRANSPORT_CHANGED: i32 = 1;
    pub const TRANSPORT_PLAYING: i32 = 1 << 1;
    pub const TRANSPORT_CYCLE_ACTIVE: i32 = 1 << 2;
    pub const TRANSPORT_RECORDING: i32 = 1 << 3;
    pub const NANOS_VALID: i32 = 1 << 8;
    pub const PPQ_POS_VALID: i32 = 1 << 9;
    pub const TEMPO_VALID: i32 = 1 << 10;
    pub const BARS_VALID: i32 = 1 << 11;
    pub const CYCLE_POS_VALID: i32 = 1 << 12;
    pub const TIME_SIG_VALID: i32 = 1 << 13;
    pub const SMPTE_VALID: i32 = 1 << 14;
    pub const CLOCK_VALID: i32 = 1 << 15;
}

pub mod smpte_rates {
    pub const FPS_24: i32 = 0;
    pub const FPS_25: i32 = 1;
    pub const FPS_2997: i32 = 2;
    pub const FPS_30: i32 = 3;
    pub const FPS_2997_DROP: i32 = 4;
    pub const FPS_30_DROP: i32 = 5;
    pub const FPS_23976: i32 = 10;
    pub const FPS_24975: i32 = 11;
    pub const FPS_5994: i32 = 12;
    pub const FPS_60: i32 = 13;
}

/// Event list header. `num_events` pointers follow in `events`.
#[repr(C)]
pub struct Events {
    pub num_events: i32,
    pub reserved: isize,
    pub events: [*mut Event; 2],
}
