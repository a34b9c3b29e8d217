//! Container rotation tags and playback compensation.

/// Clockwise rotation in quarter turns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// 90 degrees clockwise.
    Deg90,
    /// 180 degrees.
    Deg180,
    /// 270 degrees clockwise (90 counter-clockwise).
    Deg270,
}

impl Rotation {
    /// Normalize a rotation tag in degrees. Negative tags count
    /// counter-clockwise (`-90` is `Deg270`). Returns `None` for angles that
    /// are not a multiple of 90.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Angle in degrees (0, 90, 180 or 270).
    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Whether playback swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// Which rotations make the resolver size against swapped dimensions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RotationCompensation {
    /// Swap for tags of exactly 90 or 180. Established behavior: 270 is not
    /// swapped, while 180 is, even though it doesn't change the frame shape.
    /// Tags are compared as stored, so `-180` or `450` never swap.
    #[default]
    Legacy,
    /// Swap exactly when playback swaps axes. Tags are normalized first, so
    /// `-90`, `270` and `450` all count.
    QuarterTurns,
}

impl RotationCompensation {
    /// Whether a source with rotation tag `degrees` is sized as if already
    /// rotated.
    pub fn applies(self, degrees: i32) -> bool {
        match self {
            Self::Legacy => matches!(degrees, 90 | 180),
            Self::QuarterTurns => {
                Rotation::from_degrees(degrees).is_some_and(Rotation::swaps_axes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_degrees_normalizes() {
        assert_eq!(Rotation::from_degrees(0), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(90), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(-180), Some(Rotation::Deg180));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn degrees_roundtrip() {
        for r in [
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270,
        ] {
            assert_eq!(Rotation::from_degrees(r.degrees() as i32), Some(r));
        }
    }

    #[test]
    fn legacy_compensates_90_and_180() {
        let c = RotationCompensation::Legacy;
        assert!(!c.applies(0));
        assert!(c.applies(90));
        assert!(c.applies(180));
        assert!(!c.applies(270));
    }

    #[test]
    fn legacy_matches_tag_as_stored() {
        let c = RotationCompensation::Legacy;
        for deg in [-90, -180, -270, 450, 540, 45] {
            assert!(!c.applies(deg), "{deg}");
        }
    }

    #[test]
    fn quarter_turns_compensates_axis_swaps() {
        let c = RotationCompensation::QuarterTurns;
        assert!(!c.applies(0));
        assert!(c.applies(90));
        assert!(!c.applies(180));
        assert!(c.applies(270));
        assert!(c.applies(-90));
        assert!(c.applies(450));
        assert!(!c.applies(-180));
        assert!(!c.applies(45));
    }
}
