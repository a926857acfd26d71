//! Mapping between channel layouts and legacy speaker arrangements.
//!
//! A layout is looked up in three passes: the named layouts first, then the
//! extended table (matched by exact ordered role sequence), then the lossy
//! fallback (`USER` one way, discrete channels the other way). Named layouts
//! are checked first in both directions, so every enumerated arrangement
//! type survives a round trip through [`layout_from_arrangement`] and
//! [`arrangement_from_layout`].

use std::mem;
use std::ptr;

use duplex_core::{ChannelLayout, ChannelRole};

use crate::abi::{SpeakerArrangement, SpeakerProperties, INLINE_SPEAKERS};

/// Arrangement type codes.
pub mod arrangement {
    pub const USER: i32 = -2;
    pub const EMPTY: i32 = -1;
    pub const MONO: i32 = 0;
    pub const LR: i32 = 1;
    pub const LS_RS: i32 = 2;
    pub const LC_RC: i32 = 3;
    pub const SL_SR: i32 = 4;
    pub const C_LFE: i32 = 5;
    pub const LRC: i32 = 6;
    pub const LRS: i32 = 7;
    pub const LRC_LFE: i32 = 8;
    pub const LR_LFE_S: i32 = 9;
    pub const LRCS: i32 = 10;
    pub const LR_LS_RS: i32 = 11;
    pub const LRC_LFE_S: i32 = 12;
    pub const LR_LFE_LS_RS: i32 = 13;
    pub const LRC_LS_RS: i32 = 14;
    pub const LRC_LFE_LS_RS: i32 = 15;
    pub const LRC_LS_RS_CS: i32 = 16;
    pub const LR_LS_RS_SL_SR: i32 = 17;
    pub const LRC_LFE_LS_RS_CS: i32 = 18;
    pub const LR_LFE_LS_RS_SL_SR: i32 = 19;
    pub const LRC_LS_RS_LC_RC: i32 = 20;
    pub const LRC_LS_RS_SL_SR: i32 = 21;
    pub const LRC_LFE_LS_RS_LC_RC: i32 = 22;
    pub const LRC_LFE_LS_RS_SL_SR: i32 = 23;
    pub const LRC_LS_RS_LC_RC_CS: i32 = 24;
    pub const LRC_LS_RS_CS_SL_SR: i32 = 25;
    pub const LRC_LFE_LS_RS_LC_RC_CS: i32 = 26;
    pub const LRC_LFE_LS_RS_CS_SL_SR: i32 = 27;
    pub const LRC_LFE_LS_RS_TFL_TFC_TFR_TRL_TRR_LFE2: i32 = 28;
}

/// Individual speaker type codes.
pub mod speaker {
    pub const UNDEFINED: i32 = 0;
    pub const LEFT: i32 = 1;
    pub const RIGHT: i32 = 2;
    pub const CENTRE: i32 = 3;
    pub const LFE: i32 = 4;
    pub const LEFT_SURROUND: i32 = 5;
    pub const RIGHT_SURROUND: i32 = 6;
    pub const LEFT_CENTRE: i32 = 7;
    pub const RIGHT_CENTRE: i32 = 8;
    pub const SURROUND: i32 = 9;
    pub const LEFT_REAR_SURROUND: i32 = 10;
    pub const RIGHT_REAR_SURROUND: i32 = 11;
    pub const TOP_MIDDLE: i32 = 12;
    pub const TOP_FRONT_LEFT: i32 = 13;
    pub const TOP_FRONT_CENTRE: i32 = 14;
    pub const TOP_FRONT_RIGHT: i32 = 15;
    pub const TOP_REAR_LEFT: i32 = 16;
    pub const TOP_REAR_CENTRE: i32 = 17;
    pub const TOP_REAR_RIGHT: i32 = 18;
    pub const LFE2: i32 = 19;
}

/// Named layouts with a dedicated arrangement type.
const NAMED_LAYOUTS: [(i32, fn() -> ChannelLayout); 17] = [
    (arrangement::EMPTY, ChannelLayout::disabled),
    (arrangement::MONO, ChannelLayout::mono),
    (arrangement::LR, ChannelLayout::stereo),
    (arrangement::LRC, ChannelLayout::lcr),
    (arrangement::LRS, ChannelLayout::lrs),
    (arrangement::LRCS, ChannelLayout::lcrs),
    (arrangement::LRC_LS_RS, ChannelLayout::surround_5_0),
    (arrangement::LRC_LFE_LS_RS, ChannelLayout::surround_5_1),
    (arrangement::LRC_LS_RS_CS, ChannelLayout::surround_6_0),
    (arrangement::LRC_LFE_LS_RS_CS, ChannelLayout::surround_6_1),
    (arrangement::LR_LS_RS_SL_SR, ChannelLayout::surround_6_0_music),
    (arrangement::LR_LFE_LS_RS_SL_SR, ChannelLayout::surround_6_1_music),
    (arrangement::LRC_LS_RS_SL_SR, ChannelLayout::surround_7_0),
    (arrangement::LRC_LS_RS_LC_RC, ChannelLayout::surround_7_0_sdds),
    (arrangement::LRC_LFE_LS_RS_SL_SR, ChannelLayout::surround_7_1),
    (arrangement::LRC_LFE_LS_RS_LC_RC, ChannelLayout::surround_7_1_sdds),
    (arrangement::LR_LS_RS, ChannelLayout::quadraphonic),
];

use ChannelRole::{
    Centre as C, Left as L, LeftCentre as Lc, LeftSurround as Ls, LeftSurroundRear as Sl,
    Lfe, Lfe2, Right as R, RightCentre as Rc, RightSurround as Rs, RightSurroundRear as Sr,
    Surround as S, TopFrontCentre as Tfc, TopFrontLeft as Tfl, TopFrontRight as Tfr,
    TopRearLeft as Trl, TopRearRight as Trr,
};

/// Extended table, matched by exact ordered role sequence.
///
/// The two 7-channel "cine" entries use top front speakers where the named
/// SDDS layouts use left/right centre. Named layouts win in both directions.
const EXTENDED_LAYOUTS: [(i32, &[ChannelRole]); 29] = [
    (arrangement::MONO, &[C]),
    (arrangement::LR, &[L, R]),
    (arrangement::LS_RS, &[Ls, Rs]),
    (arrangement::LC_RC, &[Lc, Rc]),
    (arrangement::SL_SR, &[Sl, Sr]),
    (arrangement::C_LFE, &[C, Lfe]),
    (arrangement::LRC, &[L, R, C]),
    (arrangement::LRS, &[L, R, S]),
    (arrangement::LRC_LFE, &[L, R, C, Lfe]),
    (arrangement::LR_LFE_S, &[L, R, Lfe, S]),
    (arrangement::LRCS, &[L, R, C, S]),
    (arrangement::LR_LS_RS, &[L, R, Ls, Rs]),
    (arrangement::LRC_LFE_S, &[L, R, C, Lfe, S]),
    (arrangement::LR_LFE_LS_RS, &[L, R, Lfe, Ls, Rs]),
    (arrangement::LRC_LS_RS, &[L, R, C, Ls, Rs]),
    (arrangement::LRC_LFE_LS_RS, &[L, R, C, Lfe, Ls, Rs]),
    (arrangement::LRC_LS_RS_CS, &[L, R, C, Ls, Rs, S]),
    (arrangement::LR_LS_RS_SL_SR, &[L, R, Ls, Rs, Sl, Sr]),
    (arrangement::LRC_LFE_LS_RS_CS, &[L, R, C, Lfe, Ls, Rs, S]),
    (arrangement::LR_LFE_LS_RS_SL_SR, &[L, R, Lfe, Ls, Rs, Sl, Sr]),
    (arrangement::LRC_LS_RS_LC_RC, &[L, R, C, Ls, Rs, Tfl, Tfr]),
    (arrangement::LRC_LS_RS_SL_SR, &[L, R, C, Ls, Rs, Sl, Sr]),
    (arrangement::LRC_LFE_LS_RS_LC_RC, &[L, R, C, Lfe, Ls, Rs, Tfl, Tfr]),
    (arrangement::LRC_LFE_LS_RS_SL_SR, &[L, R, C, Lfe, Ls, Rs, Sl, Sr]),
    (arrangement::LRC_LS_RS_LC_RC_CS, &[L, R, C, Ls, Rs, Tfl, Tfr, S]),
    (arrangement::LRC_LS_RS_CS_SL_SR, &[L, R, C, Ls, Rs, S, Sl, Sr]),
    (arrangement::LRC_LFE_LS_RS_LC_RC_CS, &[L, R, C, Lfe, Ls, Rs, Tfl, Tfr, S]),
    (arrangement::LRC_LFE_LS_RS_CS_SL_SR, &[L, R, C, Lfe, Ls, Rs, S, Sl, Sr]),
    (
        arrangement::LRC_LFE_LS_RS_TFL_TFC_TFR_TRL_TRR_LFE2,
        &[L, R, C, Lfe, Ls, Rs, Tfl, Tfc, Tfr, Trl, Trr, Lfe2],
    ),
];

/// Layout for an arrangement type.
///
/// Types with no named or tabled layout become `fallback_channels` discrete
/// channels.
pub fn layout_from_arrangement(arrangement_type: i32, fallback_channels: usize) -> ChannelLayout {
    if let Some((_, make)) = NAMED_LAYOUTS.iter().find(|(t, _)| *t == arrangement_type) {
        return make();
    }
    if let Some((_, roles)) = EXTENDED_LAYOUTS.iter().find(|(t, _)| *t == arrangement_type) {
        return ChannelLayout::from_roles(roles);
    }
    ChannelLayout::discrete(fallback_channels)
}

/// Arrangement type for a layout, or [`arrangement::USER`] when nothing matches.
pub fn arrangement_from_layout(layout: &ChannelLayout) -> i32 {
    if let Some((t, _)) = NAMED_LAYOUTS.iter().find(|(_, make)| make() == *layout) {
        return *t;
    }
    EXTENDED_LAYOUTS
        .iter()
        .find(|(_, roles)| *roles == layout.roles())
        .map(|(t, _)| *t)
        .unwrap_or(arrangement::USER)
}

/// Speaker type of a single role. Roles without a speaker type map to
/// [`speaker::UNDEFINED`].
pub fn speaker_type(role: ChannelRole) -> i32 {
    match role {
        ChannelRole::Left => speaker::LEFT,
        ChannelRole::Right => speaker::RIGHT,
        ChannelRole::Centre => speaker::CENTRE,
        ChannelRole::Lfe => speaker::LFE,
        ChannelRole::LeftSurround => speaker::LEFT_SURROUND,
        ChannelRole::RightSurround => speaker::RIGHT_SURROUND,
        ChannelRole::LeftCentre => speaker::LEFT_CENTRE,
        ChannelRole::RightCentre => speaker::RIGHT_CENTRE,
        ChannelRole::Surround => speaker::SURROUND,
        ChannelRole::LeftSurroundRear => speaker::LEFT_REAR_SURROUND,
        ChannelRole::RightSurroundRear => speaker::RIGHT_REAR_SURROUND,
        ChannelRole::TopMiddle => speaker::TOP_MIDDLE,
        ChannelRole::TopFrontLeft => speaker::TOP_FRONT_LEFT,
        ChannelRole::TopFrontCentre => speaker::TOP_FRONT_CENTRE,
        ChannelRole::TopFrontRight => speaker::TOP_FRONT_RIGHT,
        ChannelRole::TopRearLeft => speaker::TOP_REAR_LEFT,
        ChannelRole::TopRearCentre => speaker::TOP_REAR_CENTRE,
        ChannelRole::TopRearRight => speaker::TOP_REAR_RIGHT,
        ChannelRole::Lfe2 => speaker::LFE2,
        _ => speaker::UNDEFINED,
    }
}

/// Role of a single speaker type, [`ChannelRole::Unknown`] for anything else.
pub fn role_from_speaker_type(speaker_type: i32) -> ChannelRole {
    match speaker_type {
        speaker::LEFT => ChannelRole::Left,
        speaker::RIGHT => ChannelRole::Right,
        speaker::CENTRE => ChannelRole::Centre,
        speaker::LFE => ChannelRole::Lfe,
        speaker::LEFT_SURROUND => ChannelRole::LeftSurround,
        speaker::RIGHT_SURROUND => ChannelRole::RightSurround,
        speaker::LEFT_CENTRE => ChannelRole::LeftCentre,
        speaker::RIGHT_CENTRE => ChannelRole::RightCentre,
        speaker::SURROUND => ChannelRole::Surround,
        speaker::LEFT_REAR_SURROUND => ChannelRole::LeftSurroundRear,
        speaker::RIGHT_REAR_SURROUND => ChannelRole::RightSurroundRear,
        speaker::TOP_MIDDLE => ChannelRole::TopMiddle,
        speaker::TOP_FRONT_LEFT => ChannelRole::TopFrontLeft,
        speaker::TOP_FRONT_CENTRE => ChannelRole::TopFrontCentre,
        speaker::TOP_FRONT_RIGHT => ChannelRole::TopFrontRight,
        speaker::TOP_REAR_LEFT => ChannelRole::TopRearLeft,
        speaker::TOP_REAR_CENTRE => ChannelRole::TopRearCentre,
        speaker::TOP_REAR_RIGHT => ChannelRole::TopRearRight,
        speaker::LFE2 => ChannelRole::Lfe2,
        _ => ChannelRole::Unknown,
    }
}

// =============================================================================
// Heap-held arrangement
// =============================================================================

impl SpeakerArrangement {
    fn empty() -> Self {
        Self {
            arrangement_type: arrangement::EMPTY,
            num_channels: 0,
            speakers: [SpeakerProperties::default(); INLINE_SPEAKERS],
        }
    }
}

/// Owned speaker arrangement with room for any number of speakers.
///
/// The struct declares eight speakers inline; larger arrangements extend past
/// its end, so storage is sized for `max(8, n)` speakers. The pointer handed
/// to the host stays valid until the buffer is replaced or dropped.
pub struct ArrangementBuffer {
    storage: Vec<SpeakerArrangement>,
}

impl ArrangementBuffer {
    /// Arrangement with no channels.
    pub fn empty() -> Self {
        Self {
            storage: vec![SpeakerArrangement::empty()],
        }
    }

    /// Build the arrangement describing `layout`.
    pub fn from_layout(layout: &ChannelLayout) -> Self {
        let num_channels = layout.len();
        let mut buffer = Self::with_speakers(num_channels);
        let base = buffer.storage.as_mut_ptr();

        // SAFETY: `with_speakers` sized the allocation for `num_channels`
        // speakers past the header; all writes stay inside it.
        unsafe {
            (*base).arrangement_type = arrangement_from_layout(layout);
            (*base).num_channels = num_channels as i32;
            let speakers = ptr::addr_of_mut!((*base).speakers) as *mut SpeakerProperties;
            for (i, role) in layout.roles().iter().enumerate() {
                speakers.add(i).write(SpeakerProperties {
                    speaker_type: speaker_type(*role),
                    ..SpeakerProperties::default()
                });
            }
        }
        buffer
    }

    fn with_speakers(num_speakers: usize) -> Self {
        let extra = num_speakers.saturating_sub(INLINE_SPEAKERS) * mem::size_of::<SpeakerProperties>();
        let bytes = mem::size_of::<SpeakerArrangement>() + extra;
        let count = bytes.div_ceil(mem::size_of::<SpeakerArrangement>());
        Self {
            storage: (0..count).map(|_| SpeakerArrangement::empty()).collect(),
        }
    }

    pub fn arrangement_type(&self) -> i32 {
        self.storage[0].arrangement_type
    }

    pub fn num_channels(&self) -> usize {
        self.storage[0].num_channels.max(0) as usize
    }

    /// Speaker type of channel `index`.
    pub fn speaker_type(&self, index: usize) -> Option<i32> {
        if index >= self.num_channels() {
            return None;
        }
        let base = self.storage.as_ptr();
        // SAFETY: `index < num_channels` and the allocation holds that many
        // speakers.
        unsafe {
            let speakers = ptr::addr_of!((*base).speakers) as *const SpeakerProperties;
            Some((*speakers.add(index)).speaker_type)
        }
    }

    /// Pointer handed to the host.
    pub fn as_mut_ptr(&mut self) -> *mut SpeakerArrangement {
        self.storage.as_mut_ptr()
    }
}

impl Default for ArrangementBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

/// Read the type and channel count of a host-provided arrangement.
///
/// # Safety
///
/// `arrangement` must be null or point to a valid arrangement header.
pub unsafe fn read_arrangement(arrangement: *const SpeakerArrangement) -> Option<(i32, i32)> {
    if arrangement.is_null() {
        return None;
    }
    // SAFETY: non-null and valid per the caller's contract.
    let header = unsafe { &*arrangement };
    Some((header.arrangement_type, header.num_channels))
}
