//! Defines the planar arm parameter data structure

pub mod planar_arm {
    use crate::constraints::Constraints;
    use crate::kinematic_traits::Position;
    use crate::redundancy::ExtraJoints;
    use crate::utils::deg;

    /// Parameters for the robot. See [parameters_robots.rs](parameters_robots.rs) for examples
    /// of concrete arms.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Parameters {
        /// Link lengths in meters, from the base outwards. The number of links is the
        /// number of joints.
        pub link_lengths: Vec<f64>,

        /// Position of the first joint. The origin for most arms, but an excavator boom
        /// is mounted above the ground.
        pub base: Position,

        /// Optional joint limits. Solutions outside them are not returned by the inverse
        /// kinematics.
        pub constraints: Option<Constraints>,

        /// What the inverse kinematics does with joints beyond the second one.
        pub extra_joints: ExtraJoints,
    }

    impl Parameters {
        /// Convert to string yaml representation (quick viewing, etc).
        pub fn to_yaml(&self) -> String {
            fn list(values: &[f64], format: fn(&f64) -> String) -> String {
                values.iter().map(format).collect::<Vec<_>>().join(", ")
            }
            fn plain(x: &f64) -> String {
                x.to_string()
            }

            let mut yaml = format!(
                "planar_arm:\n  \
                  link_lengths: [{}]\n  \
                  base: [{}, {}]\n",
                list(&self.link_lengths, plain),
                self.base.x,
                self.base.y
            );

            if let Some(constraints) = &self.constraints {
                yaml.push_str(&format!(
                    "  joint_limits:\n    \
                        from: [{}]\n    \
                        to: [{}]\n",
                    list(&constraints.from, deg),
                    list(&constraints.to, deg)
                ));
            }

            match &self.extra_joints {
                ExtraJoints::Fixed(offsets) if offsets.is_empty() => {}
                ExtraJoints::Fixed(offsets) => {
                    yaml.push_str(&format!(
                        "  extra_joints:\n    fixed: [{}]\n",
                        list(offsets, deg)
                    ));
                }
                ExtraJoints::Approach { angle, offsets } => {
                    yaml.push_str(&format!(
                        "  extra_joints:\n    approach: {}\n    offsets: [{}]\n",
                        deg(angle),
                        list(offsets, deg)
                    ));
                }
            }
            yaml
        }
    }
}
