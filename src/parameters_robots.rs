//! Hardcoded parameters for a few arms

pub mod planar_arm {
    use crate::constraints::Constraints;
    use crate::parameters::planar_arm::Parameters;
    use crate::redundancy::ExtraJoints;
    use nalgebra::Point2;

    impl Parameters {
        /// Arm with the given links, standing at the origin, without joint limits.
        /// Joints beyond the second one are held at zero (stretched).
        pub fn new(link_lengths: Vec<f64>) -> Self {
            let extra = link_lengths.len().saturating_sub(2);
            Parameters {
                link_lengths,
                base: Point2::origin(),
                constraints: None,
                extra_joints: ExtraJoints::Fixed(vec![0.0; extra]),
            }
        }

        pub fn two_link(l1: f64, l2: f64) -> Self {
            Self::new(vec![l1, l2])
        }

        /// The pick-and-place cell arm: 3 m upper arm, 2 m forearm.
        pub fn pick_and_place() -> Self {
            Self::two_link(3.0, 2.0)
        }

        /// Three link demo arm, 4.5 m total reach.
        pub fn three_link() -> Self {
            Self::new(vec![2.0, 1.5, 1.0])
        }

        /// Backhoe excavator arm: boom, stick and bucket, mounted 2 m above the ground.
        /// The bucket joint is held at its home angle unless the caller chooses otherwise.
        pub fn excavator() -> Self {
            Parameters {
                link_lengths: vec![3.5, 2.8, 1.5],
                base: Point2::new(0.0, 2.0),
                constraints: Some(Constraints::new(
                    vec![-1.57, -2.5, -0.8],
                    vec![1.57, 0.5, 2.5],
                )),
                extra_joints: ExtraJoints::Fixed(vec![1.2]),
            }
        }
    }
}
