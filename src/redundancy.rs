//! Inverse kinematics for arms with more than two links, reduced to the two-link
//! closed form solution.
//!
//! A planar arm with more than two joints is redundant for position-only targets: infinitely
//! many configurations reach the same point. This module does not attempt to choose among them.
//! The caller decides what happens with the joints beyond the second one:
//!
//! - [ExtraJoints::Fixed] holds them at the given relative angles (as an operator would set a
//!   slider). The distal links then move rigidly with link 2 and the pair acts as one virtual
//!   link, so the two-link solver applies directly.
//! - [ExtraJoints::Approach] fixes the absolute orientation of link 3 (for instance, a bucket
//!   held level) and places the wrist so that the tail ends at the target.
//!
//! A true redundancy-resolving solver is available separately in [crate::dls].

use crate::kinematic_traits::{ElbowConfig, Joints};
use crate::kinematics_error::ChainError;
use crate::kinematics_impl::forward_kinematics;
use crate::two_link::inverse_kinematics_2link_with;
use crate::utils::normalize_angle;
use nalgebra::Vector2;

#[derive(Debug, Clone, PartialEq)]
pub enum ExtraJoints {
    /// Relative angles for joints 3..N, in radians. Empty for the two-link arm.
    Fixed(Vec<f64>),

    /// Absolute orientation of link 3 (radians from the x axis) and relative angles of
    /// joints 4..N.
    Approach { angle: f64, offsets: Vec<f64> },
}

impl Default for ExtraJoints {
    fn default() -> Self {
        ExtraJoints::Fixed(Vec::new())
    }
}

impl ExtraJoints {
    /// Checks that the settings cover exactly the joints beyond the second for an arm
    /// with `dof` links.
    pub fn check(&self, dof: usize) -> Result<(), ChainError> {
        let (expected, found) = match self {
            ExtraJoints::Fixed(offsets) => (dof.saturating_sub(2), offsets.len()),
            ExtraJoints::Approach { offsets, .. } => {
                if dof < 3 {
                    // Approach angle needs a third link to act on
                    return Err(ChainError::InvalidChainLength { expected: 3, found: dof });
                }
                (dof - 3, offsets.len())
            }
        };
        if expected != found {
            return Err(ChainError::InvalidChainLength { expected, found });
        }
        Ok(())
    }
}

/// Solves the chain for the target given relative to the base. Returns `None` if the target
/// cannot be reached with the extra joints set as requested.
pub(crate) fn solve(
    link_lengths: &[f64],
    extra: &ExtraJoints,
    target: &Vector2<f64>,
    elbow: ElbowConfig,
) -> Option<Joints> {
    match (link_lengths.len(), extra) {
        (0, _) => None,
        (1, _) => solve_single(link_lengths[0], target),
        (_, ExtraJoints::Fixed(offsets)) => solve_fixed(link_lengths, offsets, target, elbow),
        (_, ExtraJoints::Approach { angle, offsets }) => {
            solve_approach(link_lengths, *angle, offsets, target, elbow)
        }
    }
}

/// One link only reaches its own circle.
fn solve_single(length: f64, target: &Vector2<f64>) -> Option<Joints> {
    if (target.norm() - length).abs() > 1e-9 * length.max(1.0) {
        return None;
    }
    Some(vec![target.y.atan2(target.x)])
}

fn solve_fixed(
    link_lengths: &[f64],
    offsets: &[f64],
    target: &Vector2<f64>,
    elbow: ElbowConfig,
) -> Option<Joints> {
    // Link 2 and everything after it, in the frame of link 2 (x axis along the link)
    let mut tail_angles = Vec::with_capacity(offsets.len() + 1);
    tail_angles.push(0.0);
    tail_angles.extend_from_slice(offsets);
    let (virtual_tip, _) = forward_kinematics(&link_lengths[1..], &tail_angles);

    let virtual_length = virtual_tip.coords.norm();
    if virtual_length < 1e-12 {
        // The tail folds back onto joint 2, only the first link positions the tip
        let first = solve_single(link_lengths[0], target)?;
        let mut joints = first;
        joints.push(0.0);
        joints.extend_from_slice(offsets);
        return Some(joints);
    }
    let virtual_offset = virtual_tip.y.atan2(virtual_tip.x);

    let (theta1, phi) =
        inverse_kinematics_2link_with(link_lengths[0], virtual_length, target.x, target.y, elbow)?;

    let mut joints = Vec::with_capacity(link_lengths.len());
    joints.push(theta1);
    joints.push(phi - virtual_offset);
    joints.extend_from_slice(offsets);
    Some(joints)
}

fn solve_approach(
    link_lengths: &[f64],
    angle: f64,
    offsets: &[f64],
    target: &Vector2<f64>,
    elbow: ElbowConfig,
) -> Option<Joints> {
    // Tail from the wrist (joint 3) to the end effector, in the base frame
    let mut tail_angles = Vec::with_capacity(offsets.len() + 1);
    tail_angles.push(angle);
    tail_angles.extend_from_slice(offsets);
    let (tail, _) = forward_kinematics(&link_lengths[2..], &tail_angles);

    let wrist = target - tail.coords;
    let (theta1, theta2) =
        inverse_kinematics_2link_with(link_lengths[0], link_lengths[1], wrist.x, wrist.y, elbow)?;

    let mut joints = Vec::with_capacity(link_lengths.len());
    joints.push(theta1);
    joints.push(theta2);
    joints.push(normalize_angle(angle - theta1 - theta2));
    joints.extend_from_slice(offsets);
    Some(joints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const SMALL: f64 = 1e-9;

    fn reaches(link_lengths: &[f64], joints: &[f64], target: &Vector2<f64>) -> bool {
        let (end, _) = forward_kinematics(link_lengths, joints);
        (end.coords - target).norm() < SMALL
    }

    #[test]
    fn test_two_links_match_closed_form() {
        let target = Vector2::new(3.0, 2.0);
        let joints = solve(&[3.0, 2.0], &ExtraJoints::default(), &target, ElbowConfig::Up).unwrap();
        let expected = inverse_kinematics_2link_with(3.0, 2.0, 3.0, 2.0, ElbowConfig::Up).unwrap();
        assert_eq!(joints, vec![expected.0, expected.1]);
    }

    #[test]
    fn test_fixed_extra_joint() {
        let lengths = [3.5, 2.8, 1.5];
        let extra = ExtraJoints::Fixed(vec![1.2]);
        let target = Vector2::new(4.0, -1.0);
        for elbow in ElbowConfig::both() {
            let joints = solve(&lengths, &extra, &target, elbow).unwrap();
            assert_eq!(joints.len(), 3);
            assert_eq!(joints[2], 1.2, "fixed joint must keep its angle");
            assert!(reaches(&lengths, &joints, &target));
        }
    }

    #[test]
    fn test_fixed_four_links() {
        let lengths = [2.0, 1.5, 1.0, 0.5];
        let extra = ExtraJoints::Fixed(vec![-0.4, 0.9]);
        let target = Vector2::new(1.5, 2.5);
        let joints = solve(&lengths, &extra, &target, ElbowConfig::Down).unwrap();
        assert_eq!(&joints[2..], &[-0.4, 0.9]);
        assert!(reaches(&lengths, &joints, &target));
    }

    #[test]
    fn test_fixed_unreachable() {
        let extra = ExtraJoints::Fixed(vec![0.0]);
        let beyond = Vector2::new(4.6, 0.0);
        assert!(solve(&[2.0, 1.5, 1.0], &extra, &beyond, ElbowConfig::Up).is_none());
    }

    #[test]
    fn test_approach_keeps_orientation() {
        let lengths = [3.5, 2.8, 1.5];
        let extra = ExtraJoints::Approach { angle: -FRAC_PI_2, offsets: vec![] };
        let target = Vector2::new(4.0, 0.5);
        let joints = solve(&lengths, &extra, &target, ElbowConfig::Up).unwrap();
        assert!(reaches(&lengths, &joints, &target));
        let absolute: f64 = joints.iter().sum();
        assert!(normalize_angle(absolute + FRAC_PI_2).abs() < SMALL);
    }

    #[test]
    fn test_single_link() {
        let target = Vector2::new(0.0, 2.0);
        let joints = solve(&[2.0], &ExtraJoints::default(), &target, ElbowConfig::Up).unwrap();
        assert!((joints[0] - FRAC_PI_2).abs() < SMALL);
        let target = Vector2::new(1.0, 0.0);
        assert!(solve(&[2.0], &ExtraJoints::default(), &target, ElbowConfig::Up).is_none());
    }

    #[test]
    fn test_check() {
        assert!(ExtraJoints::default().check(2).is_ok());
        assert!(ExtraJoints::Fixed(vec![0.0]).check(3).is_ok());
        assert!(ExtraJoints::default().check(3).is_err());
        assert!(ExtraJoints::Approach { angle: 0.0, offsets: vec![] }.check(3).is_ok());
        assert!(ExtraJoints::Approach { angle: 0.0, offsets: vec![] }.check(2).is_err());
    }
}
