//! Host channel arrays to in-place processor buffers.
//!
//! Legacy hosts pass separate input and output pointer arrays. Output
//! pointers may be null or repeat an earlier output, and an output may be the
//! same memory as its input. The processor, on the other hand, expects one
//! distinct channel per slot that holds the input on entry. This module
//! bridges the two using scratch channels allocated when processing resumes.
//!
//! # Real-Time Safety
//!
//! Scratch memory is only allocated by [`AudioMarshaler::allocate`] and, with
//! a warning, when a host sends a block larger than announced.

use std::ptr;

use duplex_core::{ChannelBuffer, ChannelPointers, Sample};

/// Per-precision scratch storage and channel pointer assembly.
pub struct AudioMarshaler<S: Sample> {
    scratch: Vec<Vec<S>>,
    scratch_len: usize,
    /// Whether slot `i` was routed through scratch during the current call.
    uses_scratch: Vec<bool>,
    pointers: ChannelPointers<S>,
}

impl<S: Sample> AudioMarshaler<S> {
    /// An empty marshaler. Call [`allocate`](Self::allocate) before use.
    pub fn new() -> Self {
        Self {
            scratch: Vec::new(),
            scratch_len: 0,
            uses_scratch: Vec::new(),
            pointers: ChannelPointers::with_capacity(0),
        }
    }

    /// Reserve scratch for `num_channels` slots of `block_size * 2` samples.
    pub fn allocate(&mut self, num_channels: usize, block_size: usize) {
        self.scratch_len = block_size.max(1) * 2;
        self.scratch = (0..num_channels)
            .map(|_| vec![S::ZERO; self.scratch_len])
            .collect();
        self.uses_scratch = vec![false; num_channels];
        self.pointers = ChannelPointers::with_capacity(num_channels);
    }

    /// Free all scratch memory.
    pub fn release(&mut self) {
        self.scratch = Vec::new();
        self.scratch_len = 0;
        self.uses_scratch = Vec::new();
        self.pointers = ChannelPointers::with_capacity(0);
    }

    /// Number of channel slots with scratch storage.
    pub fn num_slots(&self) -> usize {
        self.scratch.len()
    }

    pub fn is_allocated(&self) -> bool {
        !self.scratch.is_empty()
    }

    fn ensure_block(&mut self, num_samples: usize) {
        if num_samples <= self.scratch_len {
            return;
        }
        log::warn!(
            "Host block of {} samples exceeds announced size, growing scratch buffers",
            num_samples
        );
        let slots = self.scratch.len();
        self.allocate(slots, num_samples);
    }

    /// Assemble the processor buffer, run `process` on it, and copy the
    /// result back to the host.
    ///
    /// Channels past the allocated slot count are ignored.
    ///
    /// # Safety
    ///
    /// Every non-null pointer in `inputs` must be readable and every non-null
    /// pointer in `outputs` writable for `num_samples` samples for the
    /// duration of the call.
    pub unsafe fn process<F>(
        &mut self,
        inputs: &[*const S],
        outputs: &[*mut S],
        num_samples: usize,
        process: F,
    ) where
        F: FnOnce(&mut ChannelBuffer<'_, S>),
    {
        self.ensure_block(num_samples);

        let slots = self.scratch.len();
        let num_outputs = outputs.len().min(slots);
        let num_inputs = inputs.len().min(slots);

        self.pointers.clear();

        for i in 0..num_outputs {
            let host = outputs[i];
            let reused = outputs[..i].contains(&host);
            let use_scratch = host.is_null() || reused;
            self.uses_scratch[i] = use_scratch;

            let channel = if use_scratch {
                self.scratch[i].as_mut_ptr()
            } else {
                host
            };

            let input = inputs.get(i).copied().unwrap_or(ptr::null());
            if i < num_inputs && !input.is_null() {
                if input != channel as *const S {
                    // SAFETY: both pointers are valid for `num_samples`
                    // (caller contract, scratch sized by `ensure_block`).
                    unsafe { ptr::copy(input, channel, num_samples) };
                }
            } else {
                // SAFETY: as above.
                unsafe { ptr::write_bytes(channel, 0, num_samples) };
            }

            // SAFETY: valid for the duration of this call.
            unsafe { self.pointers.push(channel) };
        }

        // Input-only slots are copied so no two slices alias.
        for i in num_outputs..num_inputs {
            self.uses_scratch[i] = false;
            let channel = self.scratch[i].as_mut_ptr();
            let input = inputs[i];
            if input.is_null() {
                // SAFETY: scratch holds at least `num_samples` samples.
                unsafe { ptr::write_bytes(channel, 0, num_samples) };
            } else {
                // SAFETY: input readable per caller contract, scratch is
                // distinct memory.
                unsafe { ptr::copy_nonoverlapping(input, channel, num_samples) };
            }
            // SAFETY: valid for the duration of this call.
            unsafe { self.pointers.push(channel) };
        }

        {
            // SAFETY: each pointer is either a distinct host output or a
            // distinct scratch channel, all valid for `num_samples`.
            let mut buffer = unsafe { self.pointers.as_buffer(num_samples) };
            process(&mut buffer);
        }

        for i in 0..num_outputs {
            let host = outputs[i];
            if self.uses_scratch[i] && !host.is_null() {
                // SAFETY: host output writable per caller contract; scratch
                // is separate memory.
                unsafe { ptr::copy_nonoverlapping(self.scratch[i].as_ptr(), host, num_samples) };
            }
        }
    }
}

impl<S: Sample> Default for AudioMarshaler<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Render target for the accumulating `process` callback.
///
/// The plugin renders into these channels as if replacing, then the result
/// is added onto whatever the host already has in its outputs.
pub struct AccumulatingOutputs<S: Sample> {
    channels: Vec<Vec<S>>,
    pointers: Vec<*mut S>,
}

impl<S: Sample> AccumulatingOutputs<S> {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            pointers: Vec::new(),
        }
    }

    pub fn allocate(&mut self, num_channels: usize, block_size: usize) {
        let len = block_size.max(1);
        self.channels = (0..num_channels).map(|_| vec![S::ZERO; len]).collect();
        self.pointers = Vec::with_capacity(num_channels);
    }

    pub fn release(&mut self) {
        self.channels = Vec::new();
        self.pointers = Vec::new();
    }

    /// Pointer array of `num_channels` zeroed channels of `num_samples`.
    ///
    /// The pointers stay valid until the next call to any `&mut` method.
    pub fn prepare(&mut self, num_channels: usize, num_samples: usize) -> *mut *mut S {
        let too_short = self.channels.first().is_some_and(|c| c.len() < num_samples);
        if self.channels.len() < num_channels || too_short {
            log::warn!(
                "Accumulating process call with {} channels of {} samples exceeds allocation",
                num_channels,
                num_samples
            );
            let block_size = num_samples.max(self.channels.first().map_or(0, Vec::len));
            self.allocate(num_channels.max(self.channels.len()), block_size);
        }

        self.pointers.clear();
        for channel in self.channels.iter_mut().take(num_channels) {
            channel[..num_samples].fill(S::ZERO);
            self.pointers.push(channel.as_mut_ptr());
        }
        self.pointers.as_mut_ptr()
    }

    /// Add the first `num_samples` rendered samples onto `outputs`.
    ///
    /// # Safety
    ///
    /// Non-null pointers in `outputs` must be readable and writable for
    /// `num_samples` samples.
    pub unsafe fn add_into(&self, outputs: &[*mut S], num_samples: usize) {
        for (&output, channel) in outputs.iter().zip(&self.channels) {
            if output.is_null() {
                continue;
            }
            // SAFETY: caller contract; the rendered channel is separate memory.
            let host = unsafe { std::slice::from_raw_parts_mut(output, num_samples) };
            for (out, &rendered) in host.iter_mut().zip(&channel[..num_samples]) {
                *out = *out + rendered;
            }
        }
    }
}

// SAFETY: the pointers only ever address `channels`, which the struct owns.
unsafe impl<S: Sample> Send for AccumulatingOutputs<S> {}

impl<S: Sample> Default for AccumulatingOutputs<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero every non-null output for `num_samples` samples.
///
/// # Safety
///
/// Non-null pointers must be writable for `num_samples` samples.
pub unsafe fn clear_outputs<S: Sample>(outputs: &[*mut S], num_samples: usize) {
    for &output in outputs {
        if !output.is_null() {
            // SAFETY: caller contract.
            unsafe { ptr::write_bytes(output, 0, num_samples) };
        }
    }
}

/// Borrow a host pointer array as a slice, treating null as empty.
///
/// # Safety
///
/// A non-null `array` must point to `count` readable pointers.
pub unsafe fn host_channels<'a, T>(array: *const T, count: i32) -> &'a [T] {
    if array.is_null() || count <= 0 {
        return &[];
    }
    // SAFETY: caller contract.
    unsafe { std::slice::from_raw_parts(array, count as usize) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliased_outputs_get_their_own_channel() {
        let input_left = vec![1.0f32; 8];
        let input_right = vec![2.0f32; 8];
        let mut shared = vec![-1.0f32; 8];

        let mut marshaler = AudioMarshaler::<f32>::new();
        marshaler.allocate(2, 4);

        let inputs = [input_left.as_ptr(), input_right.as_ptr()];
        let outputs = [shared.as_mut_ptr(), shared.as_mut_ptr()];

        let mut seen = Vec::new();
        // SAFETY: all vectors outlive the call and hold 8 samples.
        unsafe {
            marshaler.process(&inputs, &outputs, 4, |buffer| {
                assert_eq!(buffer.num_channels(), 2);
                for i in 0..2 {
                    seen.push(buffer.channel(i).unwrap().to_vec());
                }
                buffer.channel_mut(1).unwrap().fill(7.0);
            });
        }

        assert_eq!(seen[0], vec![1.0; 4]);
        assert_eq!(seen[1], vec![2.0; 4]);
        // Second slot went through scratch and was copied back last.
        assert_eq!(&shared[..4], &[7.0; 4]);
        assert_eq!(&shared[4..], &[-1.0; 4]);
    }

    #[test]
    fn test_never_writes_past_num_samples() {
        let input = vec![0.5f64; 16];
        let mut output = vec![9.0f64; 16];

        let mut marshaler = AudioMarshaler::<f64>::new();
        marshaler.allocate(1, 16);

        let inputs = [input.as_ptr()];
        let outputs = [output.as_mut_ptr()];
        // SAFETY: both vectors outlive the call.
        unsafe {
            marshaler.process(&inputs, &outputs, 5, |buffer| buffer.apply_gain(2.0));
        }

        assert_eq!(&output[..5], &[1.0; 5]);
        assert!(output[5..].iter().all(|&s| s == 9.0));
    }

    #[test]
    fn test_null_output_and_missing_input() {
        let input = vec![3.0f32; 4];
        let mut first = vec![0.0f32; 4];
        let mut third = vec![5.0f32; 4];

        let mut marshaler = AudioMarshaler::<f32>::new();
        marshaler.allocate(3, 4);

        let inputs = [input.as_ptr()];
        let outputs = [first.as_mut_ptr(), ptr::null_mut(), third.as_mut_ptr()];
        let mut seen = Vec::new();
        // SAFETY: all vectors outlive the call.
        unsafe {
            marshaler.process(&inputs, &outputs, 4, |buffer| {
                for i in 0..buffer.num_channels() {
                    seen.push(buffer.channel(i).unwrap()[0]);
                }
            });
        }

        assert_eq!(seen, vec![3.0, 0.0, 0.0]);
        assert_eq!(first, vec![3.0; 4]);
        assert_eq!(third, vec![0.0; 4]);
    }

    #[test]
    fn test_in_place_and_input_only_channels() {
        let mut in_place = vec![4.0f32; 4];
        let sidechain = vec![6.0f32; 4];

        let mut marshaler = AudioMarshaler::<f32>::new();
        marshaler.allocate(2, 4);

        let inputs = [in_place.as_ptr(), sidechain.as_ptr()];
        let outputs = [in_place.as_mut_ptr()];
        let mut seen = Vec::new();
        // SAFETY: all vectors outlive the call.
        unsafe {
            marshaler.process(&inputs, &outputs, 4, |buffer| {
                seen.push(buffer.channel(0).unwrap()[0]);
                seen.push(buffer.channel(1).unwrap()[0]);
                buffer.channel_mut(1).unwrap().fill(0.0);
            });
        }

        assert_eq!(seen, vec![4.0, 6.0]);
        assert_eq!(sidechain, vec![6.0; 4]);
    }

    #[test]
    fn test_oversize_block_grows_scratch() {
        let mut output = vec![1.0f32; 32];
        let mut marshaler = AudioMarshaler::<f32>::new();
        marshaler.allocate(1, 4);

        let outputs = [output.as_mut_ptr()];
        // SAFETY: vector outlives the call.
        unsafe {
            marshaler.process(&[], &outputs, 32, |buffer| buffer.channel_mut(0).unwrap().fill(2.0));
        }
        assert_eq!(output, vec![2.0; 32]);
        assert!(marshaler.is_allocated());
    }

    #[test]
    fn test_clear_outputs_skips_null() {
        let mut output = vec![1.0f32; 4];
        let outputs = [output.as_mut_ptr(), ptr::null_mut()];
        // SAFETY: vector outlives the call.
        unsafe { clear_outputs(&outputs, 3) };
        assert_eq!(output, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_accumulating_outputs_add_onto_host() {
        let mut host = vec![1.0f32; 6];
        let mut accumulator = AccumulatingOutputs::<f32>::new();
        accumulator.allocate(1, 4);

        let rendered = accumulator.prepare(1, 4);
        // SAFETY: `prepare` returned one channel of at least 4 samples.
        unsafe {
            let channel = *rendered;
            for i in 0..4 {
                *channel.add(i) = 0.25 * i as f32;
            }
            accumulator.add_into(&[host.as_mut_ptr(), ptr::null_mut()], 4);
        }

        assert_eq!(&host[..4], &[1.0, 1.25, 1.5, 1.75]);
        assert_eq!(&host[4..], &[1.0, 1.0]);
    }

    #[test]
    fn test_accumulating_outputs_grow_and_rezero() {
        let mut accumulator = AccumulatingOutputs::<f32>::new();
        accumulator.allocate(1, 2);

        let rendered = accumulator.prepare(2, 8);
        // SAFETY: two channels of 8 samples after growing.
        unsafe {
            (*rendered.add(1)).write(3.0);
        }
        let rendered = accumulator.prepare(2, 8);
        // SAFETY: as above.
        let second = unsafe { std::slice::from_raw_parts(*rendered.add(1), 8) };
        assert!(second.iter().all(|&s| s == 0.0));
    }
}
