use crate::kinematic_traits::Joints;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Flags that can be set on AnnotatedJoints in the output
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PathFlags: u32 {
        const NONE = 0b0000_0000;

        /// Joint vector reaches a waypoint given in the input (the last frame of a segment).
        const WAYPOINT =            0b0000_0001;

        /// Joint vector lies between two waypoints and was produced by interpolation.
        const INTERPOLATED =        0b0000_0010;

        /// The waypoint of this segment could not be reached. The arm stays at the
        /// previous joint positions for the duration of the segment.
        const HOLD =                0b0000_0100;

        /// Pick and place: the object is attached to the end effector.
        const CARRYING =            0b0000_1000;

        /// Keyframe of a predefined pose sequence.
        const KEYFRAME =            0b0001_0000;
    }
}

/// Joint vector of a trajectory frame together with what the frame represents.
#[derive(Clone, PartialEq)]
pub struct AnnotatedJoints {
    pub joints: Joints,
    pub flags: PathFlags,
}

impl AnnotatedJoints {
    pub fn new(joints: Joints, flags: PathFlags) -> Self {
        AnnotatedJoints { joints, flags }
    }

    /// Joint vector at fraction `p` of the way to `other`. Flags are taken from the
    /// closer of the two.
    pub(crate) fn interpolate(&self, other: &AnnotatedJoints, p: f64) -> AnnotatedJoints {
        assert!((0.0..=1.0).contains(&p));
        let joints = self
            .joints
            .iter()
            .zip(&other.joints)
            .map(|(a, b)| a + p * (b - a))
            .collect();
        AnnotatedJoints {
            joints,
            flags: if p < 0.5 { self.flags } else { other.flags },
        }
    }
}

fn flag_representation(flags: &PathFlags) -> String {
    const FLAG_MAP: &[(PathFlags, &str)] = &[
        (PathFlags::WAYPOINT, "WAYPOINT"),
        (PathFlags::INTERPOLATED, "INTERPOLATED"),
        (PathFlags::HOLD, "HOLD"),
        // Task flags
        (PathFlags::CARRYING, "CARRYING"),
        (PathFlags::KEYFRAME, "KEYFRAME"),
    ];

    FLAG_MAP
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join(" | ")
}

impl fmt::Debug for PathFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag_string = flag_representation(self);
        write!(f, "{}", flag_string)
    }
}

impl fmt::Debug for AnnotatedJoints {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degrees: Vec<String> = self
            .joints
            .iter()
            .map(|angle| format!("{:.2}", angle.to_degrees()))
            .collect();
        write!(formatter, "{}: {}", flag_representation(&self.flags), degrees.join(", "))
    }
}
