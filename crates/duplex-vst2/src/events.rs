//! MIDI event lists exchanged with the host.

use std::mem;
use std::ptr;

use duplex_core::{MidiBuffer, MidiEvent, MIDI_OUTPUT_CAPACITY};

use crate::abi::{self, EVENT_TYPE_MIDI};

/// Bytes in a short message given its status byte.
fn message_length(status: u8) -> usize {
    match status & 0xf0 {
        0x80 | 0x90 | 0xa0 | 0xb0 | 0xe0 => 3,
        0xc0 | 0xd0 => 2,
        0xf0 => match status {
            0xf1 | 0xf3 => 2,
            0xf2 => 3,
            _ => 1,
        },
        _ => 1,
    }
}

/// Append the MIDI events of a host event list to `into`.
///
/// Non-MIDI events (SysEx and friends) are skipped. Returns the number of
/// events appended; events past the buffer's capacity are dropped.
///
/// # Safety
///
/// `events` must be null or point to a valid event list whose `num_events`
/// entries are valid event pointers.
pub unsafe fn read_events(events: *const abi::Events, into: &mut MidiBuffer) -> usize {
    if events.is_null() {
        return 0;
    }

    // SAFETY: non-null and valid per the caller's contract.
    let num_events = unsafe { (*events).num_events }.max(0) as usize;
    // SAFETY: the pointer array extends past the declared two entries.
    let list = unsafe { ptr::addr_of!((*events).events) } as *const *const abi::Event;

    let mut added = 0;
    for i in 0..num_events {
        // SAFETY: `i < num_events`.
        let event = unsafe { *list.add(i) };
        if event.is_null() {
            continue;
        }
        // SAFETY: every listed event starts with the common header.
        if unsafe { (*event).event_type } != EVENT_TYPE_MIDI {
            continue;
        }
        // SAFETY: type tag says this is a MIDI event.
        let midi = unsafe { &*(event as *const abi::MidiEvent) };
        let len = message_length(midi.midi_data[0]);
        let offset = midi.delta_frames.max(0) as u32;
        if into.push(MidiEvent::new(offset, &midi.midi_data[..len])) {
            added += 1;
        }
    }
    added
}

/// Header plus pointer array in the shape hosts expect.
#[repr(C)]
struct EventList {
    num_events: i32,
    reserved: isize,
    events: [*mut abi::Event; MIDI_OUTPUT_CAPACITY],
}

/// Pre-sized outgoing event list.
///
/// Holds [`MIDI_OUTPUT_CAPACITY`] events, allocated once.
pub struct OutgoingEvents {
    list: Box<EventList>,
    midi: Vec<abi::MidiEvent>,
}

impl OutgoingEvents {
    pub fn new() -> Self {
        Self {
            list: Box::new(EventList {
                num_events: 0,
                reserved: 0,
                events: [ptr::null_mut(); MIDI_OUTPUT_CAPACITY],
            }),
            midi: vec![abi::MidiEvent::default(); MIDI_OUTPUT_CAPACITY],
        }
    }

    /// Load events from `buffer`, keeping at most the list capacity.
    pub fn fill(&mut self, buffer: &MidiBuffer) -> usize {
        let mut count = 0;
        for (slot, event) in self.midi.iter_mut().zip(buffer.iter()) {
            *slot = abi::MidiEvent {
                event_type: EVENT_TYPE_MIDI,
                byte_size: mem::size_of::<abi::MidiEvent>() as i32,
                delta_frames: event.sample_offset as i32,
                midi_data: event.data,
                ..abi::MidiEvent::default()
            };
            self.list.events[count] = slot as *mut abi::MidiEvent as *mut abi::Event;
            count += 1;
        }
        self.list.num_events = count as i32;
        count
    }

    pub fn len(&self) -> usize {
        self.list.num_events as usize
    }

    pub fn is_empty(&self) -> bool {
        self.list.num_events == 0
    }

    pub fn clear(&mut self) {
        self.list.num_events = 0;
    }

    /// Pointer passed to the host's process-events callback.
    pub fn as_mut_ptr(&mut self) -> *mut abi::Events {
        &mut *self.list as *mut EventList as *mut abi::Events
    }
}

impl Default for OutgoingEvents {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: the raw pointers only refer into `midi`, owned by the same value.
unsafe impl Send for OutgoingEvents {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_length() {
        assert_eq!(message_length(0x90), 3);
        assert_eq!(message_length(0xc5), 2);
        assert_eq!(message_length(0xf8), 1);
        assert_eq!(message_length(0xf2), 3);
    }

    #[test]
    fn test_outgoing_list_is_readable_by_hosts() {
        let mut buffer = MidiBuffer::with_capacity(8);
        buffer.push(MidiEvent::note_on(3, 1, 60, 100));
        buffer.push(MidiEvent::new(7, &[0xc0, 5]));

        let mut outgoing = OutgoingEvents::new();
        assert_eq!(outgoing.fill(&buffer), 2);
        assert_eq!(outgoing.len(), 2);

        let mut incoming = MidiBuffer::with_capacity(8);
        // SAFETY: the list was just filled and outlives the call.
        let added = unsafe { read_events(outgoing.as_mut_ptr(), &mut incoming) };
        assert_eq!(added, 2);
        assert_eq!(incoming.as_slice()[0].bytes(), &[0x91, 60, 100]);
        assert_eq!(incoming.as_slice()[1].sample_offset, 7);
        assert_eq!(incoming.as_slice()[1].bytes(), &[0xc0, 5]);

        outgoing.clear();
        assert!(outgoing.is_empty());
    }

    #[test]
    fn test_sysex_and_null_lists_are_skipped() {
        let mut sysex = abi::Event {
            event_type: abi::EVENT_TYPE_SYSEX,
            byte_size: 0,
            delta_frames: 0,
            flags: 0,
            data: [0; 16],
        };
        let mut list = abi::Events {
            num_events: 1,
            reserved: 0,
            events: [&mut sysex as *mut abi::Event, ptr::null_mut()],
        };

        let mut incoming = MidiBuffer::with_capacity(4);
        // SAFETY: `list` and `sysex` outlive the calls.
        unsafe {
            assert_eq!(read_events(&mut list, &mut incoming), 0);
            assert_eq!(read_events(ptr::null(), &mut incoming), 0);
        }
        assert!(incoming.is_empty());
    }
}
