//! Editor (plugin window) traits.

use std::ffi::c_void;

use crate::types::{ParameterIndex, ParameterValue, Size};

/// Notifications an editor sends back to the host.
///
/// Handed to [`Plugin::create_editor`](crate::Plugin::create_editor). The
/// editor changes parameter values itself and then reports the change here
/// so the host can record automation.
pub trait HostContext: Send + Sync {
    /// A user gesture on the parameter started.
    fn begin_edit(&self, index: ParameterIndex);

    /// The parameter now holds `normalized`.
    fn perform_edit(&self, index: ParameterIndex, normalized: ParameterValue);

    /// The gesture ended.
    fn end_edit(&self, index: ParameterIndex);

    /// Ask the host to resize the editor window. Returns `true` if it did.
    fn request_resize(&self, _size: Size) -> bool {
        false
    }

    /// Latency or channel configuration changed.
    fn io_changed(&self) {}
}

/// A plugin editor embedded into a host-provided parent window.
///
/// Adapters create the editor lazily (on the first size query or open
/// request) and drop it when the host closes the window.
pub trait Editor {
    /// Current size in logical pixels.
    fn size(&self) -> Size;

    /// Embed into the native parent window handle.
    ///
    /// Returns `false` when the editor could not be attached.
    fn attach(&mut self, parent: *mut c_void) -> bool;

    /// Remove from the parent window.
    fn detach(&mut self) {}

    /// Whether a modal dialog owned by the editor is currently open.
    ///
    /// A modal editor cannot be torn down immediately; the adapter dismisses
    /// the dialog and drops the editor on its next housekeeping tick.
    fn is_modal(&self) -> bool {
        false
    }

    /// Ask any open modal dialog to close.
    fn dismiss_modal(&mut self) {}

    /// Host-provided content scale factor.
    fn set_scale_factor(&mut self, _scale: f32) {}

    /// Periodic idle call from the host's UI thread.
    fn idle(&mut self) {}

    /// Key press forwarded by the host. Returns `true` when consumed.
    fn key_pressed(&mut self, _character: char, _virtual_key: i32, _modifiers: i32) -> bool {
        false
    }
}
