//! Channel buffers handed to the processor.
//!
//! Format adapters collect one pointer per channel into a [`ChannelPointers`]
//! (capacity reserved once, outside the audio thread) and lend the processor a
//! [`ChannelBuffer`] view for the duration of a single call. Processing is in
//! place: on entry channel `i` holds input `i` (or silence), on return it holds
//! output `i`.

use std::marker::PhantomData;
use std::slice;

use crate::sample::Sample;

/// Pre-allocated channel pointer storage.
///
/// # Real-Time Safety
///
/// - `clear()` only resets the length
/// - `push()` never grows past the reserved capacity
#[derive(Debug)]
pub struct ChannelPointers<S: Sample> {
    pointers: Vec<*mut S>,
    limit: usize,
}

impl<S: Sample> ChannelPointers<S> {
    pub fn with_capacity(channels: usize) -> Self {
        Self {
            pointers: Vec::with_capacity(channels),
            limit: channels,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.pointers.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.limit
    }

    /// Push a channel pointer. Ignored once capacity is reached.
    ///
    /// # Safety
    ///
    /// The pointer must be valid for the duration of the current process call.
    #[inline]
    pub unsafe fn push(&mut self, ptr: *mut S) {
        if self.pointers.len() < self.limit {
            self.pointers.push(ptr);
        }
    }

    /// Pointer of channel `index`, if collected.
    #[inline]
    pub fn get(&self, index: usize) -> Option<*mut S> {
        self.pointers.get(index).copied()
    }

    /// Borrow the collected pointers as a channel buffer.
    ///
    /// # Safety
    ///
    /// - Every pointer must be valid for reads and writes of `num_samples`
    ///   samples for the lifetime of the returned buffer
    /// - No two pointers may refer to overlapping memory
    #[inline]
    pub unsafe fn as_buffer(&mut self, num_samples: usize) -> ChannelBuffer<'_, S> {
        ChannelBuffer {
            channels: &self.pointers,
            num_samples,
            _marker: PhantomData,
        }
    }
}

// SAFETY: the pointers are only dereferenced through `ChannelBuffer`, whose
// construction is unsafe and bounded to a single process call.
unsafe impl<S: Sample> Send for ChannelPointers<S> {}

/// Mutable view over `num_channels` non-overlapping channels.
pub struct ChannelBuffer<'a, S: Sample> {
    channels: &'a [*mut S],
    num_samples: usize,
    _marker: PhantomData<&'a mut S>,
}

impl<'a, S: Sample> ChannelBuffer<'a, S> {
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Read-only channel, `None` when out of range.
    #[inline]
    pub fn channel(&self, index: usize) -> Option<&[S]> {
        self.channels.get(index).map(|&ptr| {
            // SAFETY: `as_buffer` guarantees `ptr` is valid for `num_samples`.
            unsafe { slice::from_raw_parts(ptr, self.num_samples) }
        })
    }

    /// Mutable channel, `None` when out of range.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [S]> {
        self.channels.get(index).map(|&ptr| {
            // SAFETY: `as_buffer` guarantees `ptr` is valid for `num_samples`
            // and `&mut self` prevents a second live borrow of the same channel.
            unsafe { slice::from_raw_parts_mut(ptr, self.num_samples) }
        })
    }

    /// Iterate over all channels mutably.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [S]> + '_ {
        let num_samples = self.num_samples;
        self.channels.iter().map(move |&ptr| {
            // SAFETY: channels never overlap, so the yielded slices are disjoint.
            unsafe { slice::from_raw_parts_mut(ptr, num_samples) }
        })
    }

    /// Fill every channel with silence.
    pub fn clear(&mut self) {
        for channel in self.channels_mut() {
            channel.fill(S::ZERO);
        }
    }

    /// Multiply every sample by `gain`.
    pub fn apply_gain(&mut self, gain: S) {
        for channel in self.channels_mut() {
            for sample in channel.iter_mut() {
                *sample = *sample * gain;
            }
        }
    }
}
