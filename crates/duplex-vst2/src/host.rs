//! Calls from the plugin back into the host.

use std::ffi::c_void;
use std::ptr;

use duplex_core::{HostContext, ParameterIndex, ParameterValue, Size};

use crate::abi::{host_opcodes, AEffect, Events, HostCallback, TimeInfo, PROCESS_LEVEL_OFFLINE};

/// The host callback bound to one effect.
///
/// Every call is a no-op returning 0 when the host passed no callback.
#[derive(Clone, Copy)]
pub struct Host {
    callback: Option<HostCallback>,
    effect: *mut AEffect,
}

impl Host {
    pub fn new(callback: Option<HostCallback>) -> Self {
        Self {
            callback,
            effect: ptr::null_mut(),
        }
    }

    /// Bind to the effect struct once it has a stable address.
    pub fn bind(&mut self, effect: *mut AEffect) {
        self.effect = effect;
    }

    pub fn is_connected(&self) -> bool {
        self.callback.is_some()
    }

    fn call(&self, opcode: i32, index: i32, value: isize, ptr: *mut c_void, opt: f32) -> isize {
        match self.callback {
            Some(callback) => callback(self.effect, opcode, index, value, ptr, opt),
            None => 0,
        }
    }

    /// Host version, 0 when unknown.
    pub fn version(&self) -> isize {
        self.call(host_opcodes::VERSION, 0, 0, ptr::null_mut(), 0.0)
    }

    /// Report a plugin-side parameter change.
    pub fn automate(&self, index: ParameterIndex, normalized: f32) {
        self.call(host_opcodes::AUTOMATE, index as i32, 0, ptr::null_mut(), normalized);
    }

    pub fn begin_edit(&self, index: ParameterIndex) {
        self.call(host_opcodes::BEGIN_EDIT, index as i32, 0, ptr::null_mut(), 0.0);
    }

    pub fn end_edit(&self, index: ParameterIndex) {
        self.call(host_opcodes::END_EDIT, index as i32, 0, ptr::null_mut(), 0.0);
    }

    /// Tell the host this plugin wants MIDI input.
    pub fn want_midi(&self) {
        self.call(host_opcodes::WANT_MIDI, 0, 1, ptr::null_mut(), 0.0);
    }

    /// Whether the host is rendering offline.
    pub fn is_offline(&self) -> bool {
        self.call(host_opcodes::GET_CURRENT_PROCESS_LEVEL, 0, 0, ptr::null_mut(), 0.0)
            == PROCESS_LEVEL_OFFLINE
    }

    /// Copy of the host's current timing, `None` when it has none.
    ///
    /// `request` is a mask of the `time_info_flags` validity bits wanted.
    pub fn time_info(&self, request: i32) -> Option<TimeInfo> {
        let info = self.call(host_opcodes::GET_TIME, 0, request as isize, ptr::null_mut(), 0.0)
            as *const TimeInfo;
        if info.is_null() {
            return None;
        }
        // SAFETY: a non-null reply points at a host-owned struct that stays
        // valid until the next call into the host.
        Some(unsafe { *info })
    }

    /// Hand outgoing events to the host.
    pub fn process_events(&self, events: *mut Events) {
        self.call(host_opcodes::PROCESS_EVENTS, 0, 0, events as *mut c_void, 0.0);
    }

    /// Latency or channel counts changed.
    pub fn io_changed(&self) {
        self.call(host_opcodes::UPDATE_DISPLAY, 0, 0, ptr::null_mut(), 0.0);
        self.call(host_opcodes::IO_CHANGED, 0, 0, ptr::null_mut(), 0.0);
    }

    pub fn size_window(&self, size: Size) -> bool {
        self.call(
            host_opcodes::SIZE_WINDOW,
            size.width as i32,
            size.height as isize,
            ptr::null_mut(),
            0.0,
        ) != 0
    }

    pub fn idle(&self) {
        self.call(host_opcodes::IDLE, 0, 0, ptr::null_mut(), 0.0);
    }
}

// SAFETY: the callback is a plain function pointer and the effect pointer is
// only passed back to the host, which accepts calls from its UI and audio
// threads.
unsafe impl Send for Host {}
// SAFETY: see above; `Host` has no interior mutability.
unsafe impl Sync for Host {}

impl HostContext for Host {
    fn begin_edit(&self, index: ParameterIndex) {
        Host::begin_edit(self, index);
    }

    fn perform_edit(&self, index: ParameterIndex, normalized: ParameterValue) {
        self.automate(index, normalized as f32);
    }

    fn end_edit(&self, index: ParameterIndex) {
        Host::end_edit(self, index);
    }

    fn request_resize(&self, size: Size) -> bool {
        self.size_window(size)
    }

    fn io_changed(&self) {
        Host::io_changed(self);
    }
}
