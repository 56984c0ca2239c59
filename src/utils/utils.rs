//! Helper functions

use crate::kinematic_traits::{Joints, Position, Solutions};
use std::f64::consts::PI;

/// Checks if all elements in the array are finite
pub fn is_valid(qs: &[f64]) -> bool {
    qs.iter().all(|&q| q.is_finite())
}

/// Wraps the angle into [-π, π).
pub fn normalize_angle(angle: f64) -> f64 {
    let two_pi = 2.0 * PI;
    (angle + PI).rem_euclid(two_pi) - PI
}

/// Formats joint values converting radians to degrees, like `[45.00 30.00]`.
pub fn format_joints(joints: &[f64]) -> String {
    let row: Vec<String> = joints
        .iter()
        .map(|q| format!("{:6.2}", q.to_degrees()))
        .collect();
    format!("[{}]", row.join(" "))
}

/// Print joint values for all solutions, converting radians to degrees.
pub fn dump_solutions(solutions: &Solutions) {
    if solutions.is_empty() {
        println!("No solutions");
    }
    for joints in solutions {
        println!("{}", format_joints(joints));
    }
}

/// Print joint values, converting radians to degrees.
pub fn dump_joints(joints: &[f64]) {
    println!("{}", format_joints(joints));
}

/// Print positions of the base, joints and the end effector.
pub fn dump_positions(positions: &[Position]) {
    for (i, position) in positions.iter().enumerate() {
        let label = if i == 0 {
            "base".to_string()
        } else if i == positions.len() - 1 {
            "end effector".to_string()
        } else {
            format!("joint {}", i + 1)
        };
        println!("{:>13}: ({:8.4}, {:8.4})", label, position.x, position.y);
    }
}

/// Allows to specify joint values in degrees (converts to radians)
pub fn as_radians(degrees: &[f64]) -> Joints {
    degrees.iter().map(|d| d.to_radians()).collect()
}

/// formatting for YAML output
pub(crate) fn deg(x: &f64) -> String {
    if *x == 0.0 {
        return "0".to_string();
    }
    format!("deg({:.4})", x.to_degrees())
}

/// Sum of absolute joint differences between two configurations, used to pick the
/// solution closest to where the arm already is. Each difference is taken the short way
/// round, so 179° and -179° are 2° apart.
pub fn transition_costs(from: &[f64], to: &[f64]) -> f64 {
    from.iter().zip(to).map(|(a, b)| normalize_angle(a - b).abs()).sum()
}

/// Shifts every angle of `joints` by a multiple of 2π so it is as close as possible to the
/// matching angle of `reference`. Forward kinematics is not affected.
pub fn unwrap_near(joints: &[f64], reference: &[f64]) -> Joints {
    joints
        .iter()
        .zip(reference)
        .map(|(q, r)| r + normalize_angle(q - r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_with_all_finite() {
        let qs = [0.0, 1.0, -1.0, 0.5, -0.5, PI];
        assert!(is_valid(&qs));
    }

    #[test]
    fn test_is_valid_with_nan() {
        let qs = [0.0, f64::NAN, 1.0];
        assert!(!is_valid(&qs));
    }

    #[test]
    fn test_is_valid_with_infinity() {
        let qs = [0.0, f64::INFINITY];
        assert!(!is_valid(&qs));
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(0.25) - 0.25).abs() < 1e-12);
        assert!((normalize_angle(PI) + PI).abs() < 1e-12);
    }

    #[test]
    fn test_deg() {
        assert_eq!(deg(&0.0), "0");
        assert_eq!(deg(&PI), "deg(180.0000)");
    }

    #[test]
    fn test_format_joints() {
        assert_eq!(format_joints(&[PI / 4.0, -PI / 6.0]), "[ 45.00 -30.00]");
    }

    #[test]
    fn test_transition_costs() {
        assert!((transition_costs(&[0.0, 1.0], &[0.5, -1.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_transition_costs_across_pi() {
        let near_pi = [PI - 0.05, -1.3];
        let across = [-PI + 0.05, -1.3];
        assert!((transition_costs(&near_pi, &across) - 0.1).abs() < 1e-12);
        assert!(transition_costs(&near_pi, &across) < transition_costs(&near_pi, &[2.3, 1.3]));
    }

    #[test]
    fn test_unwrap_near() {
        let unwrapped = unwrap_near(&[-PI + 0.05, 0.4], &[PI - 0.05, 0.3]);
        assert!((unwrapped[0] - (PI + 0.05)).abs() < 1e-12);
        assert!((unwrapped[1] - 0.4).abs() < 1e-12);

        let unwrapped = unwrap_near(&[0.2], &[4.0 * PI]);
        assert!((unwrapped[0] - (4.0 * PI + 0.2)).abs() < 1e-12);
    }
}
