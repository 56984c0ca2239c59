#[cfg(test)]
mod tests {
    extern crate rand;

    use crate::jacobian::manipulability;
    use crate::kinematic_traits::{ElbowConfig, Kinematics, Position};
    use crate::kinematics_impl::{forward_kinematics, PlanarKinematics};
    use crate::parameters::planar_arm::Parameters;
    use crate::utils::normalize_angle;
    use crate::two_link::{inverse_kinematics_2link, inverse_kinematics_2link_with, reach_limits};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    const CASES: usize = 2000;

    /// Random arm and a random target inside its annulus.
    fn generate(rng: &mut StdRng) -> (f64, f64, f64, f64) {
        let l1: f64 = rng.gen_range(0.1..5.0);
        let l2: f64 = rng.gen_range(0.1..5.0);
        let (min_reach, max_reach) = reach_limits(l1, l2);
        let d = rng.gen_range(min_reach..=max_reach);
        let phi = rng.gen_range(-PI..PI);
        (l1, l2, d * phi.cos(), d * phi.sin())
    }

    #[test]
    fn test_fk_of_ik_reaches_target() {
        let mut rng = StdRng::seed_from_u64(42);
        for case in 0..CASES {
            let (l1, l2, x, y) = generate(&mut rng);
            let scale = l1 + l2;
            for elbow in ElbowConfig::both() {
                let (theta1, theta2) = inverse_kinematics_2link_with(l1, l2, x, y, elbow)
                    .unwrap_or_else(|| {
                        panic!("case {}: ({}, {}) with {}, {} not solved", case, x, y, l1, l2)
                    });
                let (end, _) = forward_kinematics(&[l1, l2], &[theta1, theta2]);
                assert!(
                    (end.x - x).abs() < 1e-9 * scale && (end.y - y).abs() < 1e-9 * scale,
                    "case {}: {:?} instead of ({}, {})",
                    case,
                    end,
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_unreachable_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..CASES {
            let l1: f64 = rng.gen_range(0.1..5.0);
            let l2: f64 = rng.gen_range(0.1..5.0);
            let (min_reach, max_reach) = reach_limits(l1, l2);
            let phi = rng.gen_range(-PI..PI);

            let outside = max_reach * rng.gen_range(1.001..3.0);
            let (x, y) = (outside * phi.cos(), outside * phi.sin());
            assert!(inverse_kinematics_2link(l1, l2, x, y).is_none());

            if min_reach > 1e-3 {
                let inside = min_reach * rng.gen_range(0.0..0.999);
                let (x, y) = (inside * phi.cos(), inside * phi.sin());
                assert!(inverse_kinematics_2link(l1, l2, x, y).is_none());
            }
        }
    }

    #[test]
    fn test_ik_of_fk_on_random_joints() {
        let robot = PlanarKinematics::new(Parameters::pick_and_place()).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..CASES {
            let joints = [rng.gen_range(-PI..PI), rng.gen_range(-PI..PI)];
            let target: Position = robot.forward(&joints);
            let solutions = robot.inverse_continuing(&target, &joints);
            assert!(!solutions.is_empty(), "{:?} has no solution", target);
            // The original configuration is one of the solutions, and the closest
            let best = &solutions[0];
            let d0 = normalize_angle(best[0] - joints[0]).abs();
            let d1 = normalize_angle(best[1] - joints[1]).abs();
            assert!(d0 < 1e-6 && d1 < 1e-6, "{:?} differs from {:?}", best, joints);
        }
    }

    #[test]
    fn test_manipulability_never_negative() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..CASES {
            let theta1 = rng.gen_range(-2.0 * PI..2.0 * PI);
            let theta2 = rng.gen_range(-2.0 * PI..2.0 * PI);
            assert!(manipulability(3.0, 2.0, theta1, theta2) >= 0.0);
        }
        for theta2 in [0.0, PI, -PI, 2.0 * PI] {
            let value = manipulability(3.0, 2.0, 0.3, theta2);
            assert!(value >= 0.0 && value < 1e-6, "{} at {}", value, theta2);
        }
    }
}
