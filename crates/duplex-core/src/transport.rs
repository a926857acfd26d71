//! Host transport and timing information.
//!
//! Hosts report only the fields they know. Everything that may be missing is
//! an `Option`; the play/record/cycle flags are always valid.

/// SMPTE frame rate reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRate {
    Fps23976,
    Fps24,
    Fps24975,
    Fps25,
    Fps2997,
    Fps2997Drop,
    Fps30,
    Fps30Drop,
    Fps5994,
    Fps60,
}

impl FrameRate {
    /// Frames per second.
    pub fn fps(self) -> f64 {
        match self {
            Self::Fps23976 => 24_000.0 / 1001.0,
            Self::Fps24 => 24.0,
            Self::Fps24975 => 24.975,
            Self::Fps25 => 25.0,
            Self::Fps2997 | Self::Fps2997Drop => 30_000.0 / 1001.0,
            Self::Fps30 | Self::Fps30Drop => 30.0,
            Self::Fps5994 => 60_000.0 / 1001.0,
            Self::Fps60 => 60.0,
        }
    }

    pub fn is_drop_frame(self) -> bool {
        matches!(self, Self::Fps2997Drop | Self::Fps30Drop)
    }
}

/// Playback position and tempo at the start of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transport {
    /// Tempo in beats per minute.
    pub tempo: Option<f64>,
    pub time_sig_numerator: Option<i32>,
    pub time_sig_denominator: Option<i32>,

    /// Position in samples from the project start.
    pub project_time_samples: Option<i64>,
    /// Position in quarter notes from the project start.
    pub project_time_beats: Option<f64>,
    /// Start of the current bar in quarter notes.
    pub bar_position_beats: Option<f64>,

    pub cycle_start_beats: Option<f64>,
    pub cycle_end_beats: Option<f64>,

    pub is_playing: bool,
    pub is_recording: bool,
    pub is_cycle_active: bool,

    /// Host system time in nanoseconds.
    pub system_time_ns: Option<i64>,
    /// Samples until the next 24 ppq MIDI clock.
    pub samples_to_next_clock: Option<i32>,

    /// SMPTE offset in subframes (80 per frame).
    pub smpte_offset_subframes: Option<i32>,
    pub frame_rate: Option<FrameRate>,
}

impl Transport {
    /// Time signature as `(numerator, denominator)` when both are known.
    pub fn time_signature(&self) -> Option<(i32, i32)> {
        Some((self.time_sig_numerator?, self.time_sig_denominator?))
    }

    /// Position in seconds, derived from the sample position.
    pub fn project_time_seconds(&self, sample_rate: f64) -> Option<f64> {
        if sample_rate <= 0.0 {
            return None;
        }
        self.project_time_samples.map(|samples| samples as f64 / sample_rate)
    }

    /// Whether a loop is active and its bounds are known.
    pub fn cycle_range(&self) -> Option<(f64, f64)> {
        if !self.is_cycle_active {
            return None;
        }
        Some((self.cycle_start_beats?, self.cycle_end_beats?))
    }
}
