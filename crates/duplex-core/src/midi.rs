//! Short MIDI messages and the pre-allocated buffer that carries them.
//!
//! One [`MidiBuffer`] is handed to the processor per block. Before the call it
//! holds the host's incoming events; whatever it holds afterwards is sent back
//! to the host when the plugin produces MIDI.

/// Incoming event capacity reserved per instance.
pub const MIDI_INPUT_CAPACITY: usize = 2048;

/// Outgoing event capacity reserved for the host event list.
pub const MIDI_OUTPUT_CAPACITY: usize = 512;

/// A short (at most 4 byte) MIDI message with its position in the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MidiEvent {
    /// Sample offset from the start of the current block.
    pub sample_offset: u32,
    /// Raw message bytes. Only the first `len` are meaningful.
    pub data: [u8; 4],
    pub len: u8,
}

impl MidiEvent {
    /// Build an event from raw bytes, keeping at most four.
    pub fn new(sample_offset: u32, bytes: &[u8]) -> Self {
        let len = bytes.len().min(4);
        let mut data = [0u8; 4];
        data[..len].copy_from_slice(&bytes[..len]);
        Self {
            sample_offset,
            data,
            len: len as u8,
        }
    }

    pub fn note_on(sample_offset: u32, channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(sample_offset, &[0x90 | (channel & 0x0f), note & 0x7f, velocity & 0x7f])
    }

    pub fn note_off(sample_offset: u32, channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(sample_offset, &[0x80 | (channel & 0x0f), note & 0x7f, velocity & 0x7f])
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Status byte, or 0 for an empty event.
    #[inline]
    pub fn status(&self) -> u8 {
        if self.len == 0 {
            0
        } else {
            self.data[0]
        }
    }

    /// Zero-based MIDI channel of a channel voice message.
    #[inline]
    pub fn channel(&self) -> u8 {
        self.status() & 0x0f
    }
}

/// Fixed-capacity event list.
///
/// Capacity is reserved up front; [`push`](Self::push) refuses events once
/// full instead of growing, so it is safe to use on the audio thread.
#[derive(Debug, Clone)]
pub struct MidiBuffer {
    events: Vec<MidiEvent>,
    limit: usize,
}

impl MidiBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            limit: capacity,
        }
    }

    /// Append an event. Returns `false` (dropping the event) when full.
    #[inline]
    pub fn push(&mut self, event: MidiEvent) -> bool {
        if self.events.len() >= self.limit {
            return false;
        }
        self.events.push(event);
        true
    }

    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.limit
    }

    pub fn iter(&self) -> impl Iterator<Item = &MidiEvent> + '_ {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[MidiEvent] {
        &self.events
    }

    /// Keep only the events matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&MidiEvent) -> bool) {
        self.events.retain(keep);
    }
}

impl Default for MidiBuffer {
    fn default() -> Self {
        Self::with_capacity(MIDI_INPUT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_respects_capacity() {
        let mut buffer = MidiBuffer::with_capacity(2);
        assert!(buffer.push(MidiEvent::note_on(0, 0, 60, 100)));
        assert!(buffer.push(MidiEvent::note_off(10, 0, 60, 0)));
        assert!(!buffer.push(MidiEvent::note_on(20, 0, 62, 100)));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn test_event_bytes() {
        let event = MidiEvent::note_on(5, 3, 64, 127);
        assert_eq!(event.bytes(), &[0x93, 64, 127]);
        assert_eq!(event.channel(), 3);

        let long = MidiEvent::new(0, &[1, 2, 3, 4, 5]);
        assert_eq!(long.len, 4);
        assert_eq!(MidiEvent::default().status(), 0);
    }
}
