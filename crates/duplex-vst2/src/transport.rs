//! Host timing to [`Transport`].

use duplex_core::{FrameRate, Transport};

use crate::abi::{smpte_rates, time_info_flags::*, TimeInfo};

/// Validity bits requested from the host before each block.
pub const TRANSPORT_REQUEST: i32 = NANOS_VALID
    | PPQ_POS_VALID
    | TEMPO_VALID
    | BARS_VALID
    | CYCLE_POS_VALID
    | TIME_SIG_VALID
    | SMPTE_VALID
    | CLOCK_VALID;

macro_rules! valid_if {
    ($flags:expr, $flag:expr, $value:expr) => {
        if $flags & $flag != 0 {
            Some($value)
        } else {
            None
        }
    };
}

fn frame_rate(code: i32) -> Option<FrameRate> {
    match code {
        smpte_rates::FPS_24 => Some(FrameRate::Fps24),
        smpte_rates::FPS_25 => Some(FrameRate::Fps25),
        smpte_rates::FPS_2997 => Some(FrameRate::Fps2997),
        smpte_rates::FPS_30 => Some(FrameRate::Fps30),
        smpte_rates::FPS_2997_DROP => Some(FrameRate::Fps2997Drop),
        smpte_rates::FPS_30_DROP => Some(FrameRate::Fps30Drop),
        smpte_rates::FPS_23976 => Some(FrameRate::Fps23976),
        smpte_rates::FPS_24975 => Some(FrameRate::Fps24975),
        smpte_rates::FPS_5994 => Some(FrameRate::Fps5994),
        smpte_rates::FPS_60 => Some(FrameRate::Fps60),
        _ => None,
    }
}

/// Convert the host's timing struct, dropping fields it marked invalid.
pub fn transport_from_time_info(info: &TimeInfo) -> Transport {
    let flags = info.flags;

    Transport {
        tempo: valid_if!(flags, TEMPO_VALID, info.tempo),
        time_sig_numerator: valid_if!(flags, TIME_SIG_VALID, info.time_sig_numerator),
        time_sig_denominator: valid_if!(flags, TIME_SIG_VALID, info.time_sig_denominator),

        project_time_samples: Some(info.sample_pos as i64),
        project_time_beats: valid_if!(flags, PPQ_POS_VALID, info.ppq_pos),
        bar_position_beats: valid_if!(flags, BARS_VALID, info.bar_start_pos),

        cycle_start_beats: valid_if!(flags, CYCLE_POS_VALID, info.cycle_start_pos),
        cycle_end_beats: valid_if!(flags, CYCLE_POS_VALID, info.cycle_end_pos),

        is_playing: flags & TRANSPORT_PLAYING != 0,
        is_recording: flags & TRANSPORT_RECORDING != 0,
        is_cycle_active: flags & TRANSPORT_CYCLE_ACTIVE != 0,

        system_time_ns: valid_if!(flags, NANOS_VALID, info.nano_seconds as i64),
        samples_to_next_clock: valid_if!(flags, CLOCK_VALID, info.samples_to_next_clock),

        smpte_offset_subframes: valid_if!(flags, SMPTE_VALID, info.smpte_offset),
        frame_rate: if flags & SMPTE_VALID != 0 {
            frame_rate(info.smpte_frame_rate)
        } else {
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_flagged_fields_survive() {
        let info = TimeInfo {
            sample_pos: 44100.0,
            sample_rate: 44100.0,
            ppq_pos: 2.5,
            tempo: 128.0,
            bar_start_pos: 2.0,
            time_sig_numerator: 3,
            time_sig_denominator: 4,
            flags: TEMPO_VALID | PPQ_POS_VALID | TRANSPORT_PLAYING,
            ..Default::default()
        };

        let transport = transport_from_time_info(&info);
        assert_eq!(transport.tempo, Some(128.0));
        assert_eq!(transport.project_time_beats, Some(2.5));
        assert_eq!(transport.project_time_samples, Some(44100));
        assert_eq!(transport.bar_position_beats, None);
        assert_eq!(transport.time_signature(), None);
        assert!(transport.is_playing);
        assert!(!transport.is_recording);
        assert_eq!(transport.frame_rate, None);
    }

    #[test]
    fn test_cycle_and_smpte() {
        let info = TimeInfo {
            cycle_start_pos: 8.0,
            cycle_end_pos: 16.0,
            smpte_offset: 40,
            smpte_frame_rate: smpte_rates::FPS_2997_DROP,
            flags: CYCLE_POS_VALID | TRANSPORT_CYCLE_ACTIVE | SMPTE_VALID,
            ..Default::default()
        };

        let transport = transport_from_time_info(&info);
        assert_eq!(transport.cycle_range(), Some((8.0, 16.0)));
        assert_eq!(transport.smpte_offset_subframes, Some(40));
        assert_eq!(transport.frame_rate, Some(FrameRate::Fps2997Drop));

        let unknown = TimeInfo { smpte_frame_rate: 7, ..info };
        assert_eq!(transport_from_time_info(&unknown).frame_rate, None);
    }
}
