//! The link chain: fixed link lengths and the current joint angles of one planar arm.
//!
//! The chain is plain state owned by the caller. Nothing in this crate keeps a chain
//! behind the scenes, so several arms can coexist in one scene, each with its own chain.

use crate::annotations::AnnotatedJoints;
use crate::kinematic_traits::{JointPositions, Joints, Position};
use crate::kinematics_error::ChainError;
use crate::kinematics_impl::forward_kinematics;

#[derive(Debug, Clone, PartialEq)]
pub struct LinkChain {
    /// Link lengths in meters, base link first. Never changes after construction.
    link_lengths: Vec<f64>,

    /// Joint angles in radians, always the same length as `link_lengths`.
    joint_angles: Joints,
}

/// Checks that the chain has at least one link and all links have positive finite length.
pub fn validate_link_lengths(link_lengths: &[f64]) -> Result<(), ChainError> {
    if link_lengths.is_empty() {
        return Err(ChainError::EmptyChain);
    }
    for (index, &length) in link_lengths.iter().enumerate() {
        if !(length.is_finite() && length > 0.0) {
            return Err(ChainError::InvalidLinkLength { index, length });
        }
    }
    Ok(())
}

/// Checks that the angle vector matches a chain with `dof` links.
pub fn check_angles(dof: usize, joint_angles: &[f64]) -> Result<(), ChainError> {
    if joint_angles.len() != dof {
        return Err(ChainError::InvalidChainLength {
            expected: dof,
            found: joint_angles.len(),
        });
    }
    Ok(())
}

impl LinkChain {
    /// Creates the chain with all joints at zero (arm stretched along the x axis).
    pub fn new(link_lengths: Vec<f64>) -> Result<Self, ChainError> {
        let joint_angles = vec![0.0; link_lengths.len()];
        Self::with_angles(link_lengths, joint_angles)
    }

    pub fn with_angles(link_lengths: Vec<f64>, joint_angles: Joints) -> Result<Self, ChainError> {
        validate_link_lengths(&link_lengths)?;
        check_angles(link_lengths.len(), &joint_angles)?;
        Ok(LinkChain {
            link_lengths,
            joint_angles,
        })
    }

    pub fn link_lengths(&self) -> &[f64] {
        &self.link_lengths
    }

    pub fn joint_angles(&self) -> &[f64] {
        &self.joint_angles
    }

    pub fn dof(&self) -> usize {
        self.link_lengths.len()
    }

    /// Replaces all joint angles. The chain is left unchanged if the length does not match.
    pub fn set_joint_angles(&mut self, joint_angles: &[f64]) -> Result<(), ChainError> {
        check_angles(self.dof(), joint_angles)?;
        self.joint_angles.copy_from_slice(joint_angles);
        Ok(())
    }

    /// Sets a single joint, as a slider in an interactive front-end would.
    pub fn set_joint_angle(&mut self, index: usize, angle: f64) -> Result<(), ChainError> {
        let dof = self.dof();
        let joint = self
            .joint_angles
            .get_mut(index)
            .ok_or(ChainError::NoSuchJoint { index, dof })?;
        *joint = angle;
        Ok(())
    }

    /// Sets the angles from a trajectory frame, as a playback loop does once per frame.
    pub fn apply(&mut self, frame: &AnnotatedJoints) -> Result<(), ChainError> {
        self.set_joint_angles(&frame.joints)
    }

    /// End effector and all joint positions for the stored angles.
    pub fn forward(&self) -> (Position, JointPositions) {
        forward_kinematics(&self.link_lengths, &self.joint_angles)
    }

    /// End effector and all joint positions for the given angles. The stored angles
    /// are not touched.
    pub fn forward_with(
        &self,
        joint_angles: &[f64],
    ) -> Result<(Position, JointPositions), ChainError> {
        check_angles(self.dof(), joint_angles)?;
        Ok(forward_kinematics(&self.link_lengths, joint_angles))
    }

    pub fn end_effector(&self) -> Position {
        self.forward().0
    }

    /// Distance from the base to the end effector with the arm fully stretched.
    pub fn max_reach(&self) -> f64 {
        self.link_lengths.iter().sum()
    }

    /// Radius of the hole in the middle of the workspace. Zero unless one link is longer
    /// than all others together; `|l1 - l2|` for the two-link arm.
    pub fn min_reach(&self) -> f64 {
        let longest = self.link_lengths.iter().cloned().fold(0.0, f64::max);
        (2.0 * longest - self.max_reach()).max(0.0)
    }
}
