//! Ordered channel role lists describing what an audio bus carries.
//!
//! A [`ChannelLayout`] is the format-neutral description of a bus: an ordered
//! list of [`ChannelRole`] tags. Format adapters translate it to and from
//! their own arrangement enumerations (see the speaker mapper in
//! `duplex-vst2`).
//!
//! # Example
//!
//! ```ignore
//! use duplex_core::channel_layout::{ChannelLayout, ChannelRole};
//!
//! let layout = ChannelLayout::surround_5_1();
//! assert_eq!(layout.len(), 6);
//! assert_eq!(layout.role(3), ChannelRole::Lfe);
//! ```

/// Role of a single channel within a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    Left,
    Right,
    Centre,
    Lfe,
    LeftSurround,
    RightSurround,
    LeftCentre,
    RightCentre,
    /// Centre surround (also called rear centre).
    Surround,
    LeftSurroundSide,
    RightSurroundSide,
    LeftSurroundRear,
    RightSurroundRear,
    TopMiddle,
    TopFrontLeft,
    TopFrontCentre,
    TopFrontRight,
    TopRearLeft,
    TopRearCentre,
    TopRearRight,
    Lfe2,
    WideLeft,
    WideRight,
    /// Anonymous channel with a zero-based position.
    Discrete(u32),
    Unknown,
}

impl ChannelRole {
    /// Short display name used in pin labels.
    pub fn abbreviation(&self) -> String {
        let name = match self {
            ChannelRole::Left => "L",
            ChannelRole::Right => "R",
            ChannelRole::Centre => "C",
            ChannelRole::Lfe => "Lfe",
            ChannelRole::LeftSurround => "Ls",
            ChannelRole::RightSurround => "Rs",
            ChannelRole::LeftCentre => "Lc",
            ChannelRole::RightCentre => "Rc",
            ChannelRole::Surround => "Cs",
            ChannelRole::LeftSurroundSide => "Lss",
            ChannelRole::RightSurroundSide => "Rss",
            ChannelRole::LeftSurroundRear => "Lrs",
            ChannelRole::RightSurroundRear => "Rrs",
            ChannelRole::TopMiddle => "Tm",
            ChannelRole::TopFrontLeft => "Tfl",
            ChannelRole::TopFrontCentre => "Tfc",
            ChannelRole::TopFrontRight => "Tfr",
            ChannelRole::TopRearLeft => "Trl",
            ChannelRole::TopRearCentre => "Trc",
            ChannelRole::TopRearRight => "Trr",
            ChannelRole::Lfe2 => "Lfe2",
            ChannelRole::WideLeft => "Wl",
            ChannelRole::WideRight => "Wr",
            ChannelRole::Discrete(n) => return (n + 1).to_string(),
            ChannelRole::Unknown => "",
        };
        name.to_string()
    }

    /// Whether this role is the left member of a stereo pair.
    pub const fn is_left_side(&self) -> bool {
        matches!(
            self,
            ChannelRole::Left
                | ChannelRole::LeftSurround
                | ChannelRole::LeftCentre
                | ChannelRole::LeftSurroundSide
                | ChannelRole::TopFrontLeft
                | ChannelRole::TopRearLeft
                | ChannelRole::LeftSurroundRear
                | ChannelRole::WideLeft
        )
    }
}

/// Ordered list of channel roles.
///
/// An empty layout means the bus is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ChannelLayout {
    roles: Vec<ChannelRole>,
}

impl ChannelLayout {
    /// Build a layout from an explicit role sequence.
    pub fn from_roles(roles: &[ChannelRole]) -> Self {
        Self {
            roles: roles.to_vec(),
        }
    }

    /// A bus with no channels.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// `n` anonymous channels.
    pub fn discrete(n: usize) -> Self {
        Self {
            roles: (0..n as u32).map(ChannelRole::Discrete).collect(),
        }
    }

    pub fn mono() -> Self {
        Self::from_roles(&[ChannelRole::Centre])
    }

    pub fn stereo() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[Left, Right])
    }

    pub fn lcr() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[Left, Right, Centre])
    }

    pub fn lrs() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[Left, Right, Surround])
    }

    pub fn lcrs() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[Left, Right, Centre, Surround])
    }

    pub fn quadraphonic() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[Left, Right, LeftSurround, RightSurround])
    }

    pub fn surround_5_0() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[Left, Right, Centre, LeftSurround, RightSurround])
    }

    pub fn surround_5_1() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[Left, Right, Centre, Lfe, LeftSurround, RightSurround])
    }

    pub fn surround_6_0() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[Left, Right, Centre, LeftSurround, RightSurround, Surround])
    }

    pub fn surround_6_1() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[Left, Right, Centre, Lfe, LeftSurround, RightSurround, Surround])
    }

    pub fn surround_6_0_music() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[
            Left,
            Right,
            LeftSurround,
            RightSurround,
            LeftSurroundRear,
            RightSurroundRear,
        ])
    }

    pub fn surround_6_1_music() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[
            Left,
            Right,
            Lfe,
            LeftSurround,
            RightSurround,
            LeftSurroundRear,
            RightSurroundRear,
        ])
    }

    pub fn surround_7_0() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[
            Left,
            Right,
            Centre,
            LeftSurround,
            RightSurround,
            LeftSurroundRear,
            RightSurroundRear,
        ])
    }

    /// 7.0 with left/right centre speakers instead of rear surrounds.
    pub fn surround_7_0_sdds() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[
            Left,
            Right,
            Centre,
            LeftSurround,
            RightSurround,
            LeftCentre,
            RightCentre,
        ])
    }

    pub fn surround_7_1() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[
            Left,
            Right,
            Centre,
            Lfe,
            LeftSurround,
            RightSurround,
            LeftSurroundRear,
            RightSurroundRear,
        ])
    }

    /// 7.1 with left/right centre speakers instead of rear surrounds.
    pub fn surround_7_1_sdds() -> Self {
        use ChannelRole::*;
        Self::from_roles(&[
            Left,
            Right,
            Centre,
            Lfe,
            LeftSurround,
            RightSurround,
            LeftCentre,
            RightCentre,
        ])
    }

    /// Number of channels.
    #[inline]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Whether this is the disabled (empty) layout.
    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.roles.is_empty()
    }

    /// Role of channel `index`, or [`ChannelRole::Unknown`] when out of range.
    pub fn role(&self, index: usize) -> ChannelRole {
        self.roles.get(index).copied().unwrap_or(ChannelRole::Unknown)
    }

    /// All roles in channel order.
    pub fn roles(&self) -> &[ChannelRole] {
        &self.roles
    }

    /// Whether every channel is anonymous.
    pub fn is_discrete(&self) -> bool {
        !self.roles.is_empty() && self.roles.iter().all(|r| matches!(r, ChannelRole::Discrete(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_layout_sizes() {
        assert_eq!(ChannelLayout::disabled().len(), 0);
        assert_eq!(ChannelLayout::mono().len(), 1);
        assert_eq!(ChannelLayout::stereo().len(), 2);
        assert_eq!(ChannelLayout::surround_5_1().len(), 6);
        assert_eq!(ChannelLayout::surround_7_1_sdds().len(), 8);
    }

    #[test]
    fn test_discrete_layout() {
        let layout = ChannelLayout::discrete(3);
        assert!(layout.is_discrete());
        assert_eq!(layout.role(2), ChannelRole::Discrete(2));
        assert_eq!(layout.role(3), ChannelRole::Unknown);
        assert!(!ChannelLayout::stereo().is_discrete());
        assert!(!ChannelLayout::disabled().is_discrete());
    }

    #[test]
    fn test_left_side_roles() {
        assert!(ChannelRole::Left.is_left_side());
        assert!(ChannelRole::TopRearLeft.is_left_side());
        assert!(!ChannelRole::Right.is_left_side());
        assert!(!ChannelRole::Centre.is_left_side());
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(ChannelRole::LeftSurround.abbreviation(), "Ls");
        assert_eq!(ChannelRole::Discrete(0).abbreviation(), "1");
    }
}
