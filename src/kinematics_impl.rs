use crate::kinematic_traits::{ElbowConfig, JointPositions, Joints, Kinematics, Position, Solutions};
use crate::kinematics_error::ChainError;
use crate::link_chain::validate_link_lengths;
use crate::parameters::planar_arm::Parameters;
use crate::redundancy;
use crate::utils::{is_valid, normalize_angle, transition_costs};
use nalgebra::{Point2, Vector2};
use tracing::debug;

/// Forward kinematics of a planar serial chain with the base at the origin.
///
/// The absolute orientation of link i is the sum of the relative joint angles 0..=i. Returns
/// the end effector position and the positions of the base, every joint and the end effector
/// (N + 1 entries).
///
/// # Panics
/// If `joint_angles` and `link_lengths` differ in length. Use [crate::link_chain::LinkChain]
/// for a checked interface.
pub fn forward_kinematics(
    link_lengths: &[f64],
    joint_angles: &[f64],
) -> (Position, JointPositions) {
    forward_kinematics_from(&Point2::origin(), link_lengths, joint_angles)
}

/// Same as [forward_kinematics], with the base of the arm at `base`.
pub fn forward_kinematics_from(
    base: &Position,
    link_lengths: &[f64],
    joint_angles: &[f64],
) -> (Position, JointPositions) {
    assert_eq!(
        link_lengths.len(),
        joint_angles.len(),
        "Invalid chain length: {} links but {} joint angles",
        link_lengths.len(),
        joint_angles.len()
    );

    let mut positions = Vec::with_capacity(link_lengths.len() + 1);
    let mut current = *base;
    let mut cumulative: f64 = 0.0;
    positions.push(current);

    for (length, angle) in link_lengths.iter().zip(joint_angles) {
        cumulative += angle;
        current += Vector2::new(cumulative.cos(), cumulative.sin()) * *length;
        positions.push(current);
    }

    (current, positions)
}

/// Planar arm standing on a base, with optional joint limits and a strategy for the joints
/// beyond the first two.
#[derive(Debug, Clone)]
pub struct PlanarKinematics {
    parameters: Parameters,
}

impl PlanarKinematics {
    /// Validates the parameters: positive link lengths, extra joint settings and joint
    /// limits matching the number of links.
    pub fn new(parameters: Parameters) -> Result<Self, ChainError> {
        validate_link_lengths(&parameters.link_lengths)?;
        let dof = parameters.link_lengths.len();
        parameters.extra_joints.check(dof)?;
        if let Some(constraints) = &parameters.constraints {
            if constraints.dof() != dof {
                return Err(ChainError::InvalidChainLength {
                    expected: dof,
                    found: constraints.dof(),
                });
            }
        }
        Ok(PlanarKinematics { parameters })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn link_lengths(&self) -> &[f64] {
        &self.parameters.link_lengths
    }

    pub fn max_reach(&self) -> f64 {
        self.link_lengths().iter().sum()
    }

    /// Single solution on the requested elbow branch, or `None` if the target is
    /// unreachable or the solution violates the joint limits. Angles are normalized
    /// to [-π, π).
    pub fn inverse_branch(&self, target: &Position, elbow: ElbowConfig) -> Option<Joints> {
        let relative = target - self.parameters.base;
        let joints = redundancy::solve(
            self.link_lengths(),
            &self.parameters.extra_joints,
            &relative,
            elbow,
        )?;
        let joints: Joints = joints.into_iter().map(normalize_angle).collect();

        if !is_valid(&joints) {
            return None;
        }

        // Cross-check with forward kinematics
        let reached = self.forward(&joints);
        let tolerance = 1e-7 * self.max_reach().max(1.0);
        let miss = (reached - target).norm();
        if miss > tolerance {
            debug!("Rejecting {:?} solution, misses the target by {:e}", elbow, miss);
            return None;
        }

        if let Some(constraints) = &self.parameters.constraints {
            if !constraints.compliant(&joints) {
                debug!("{:?} solution {:?} is outside joint limits", elbow, joints);
                return None;
            }
        }
        Some(joints)
    }
}

impl Kinematics for PlanarKinematics {
    fn dof(&self) -> usize {
        self.parameters.link_lengths.len()
    }

    fn inverse(&self, target: &Position) -> Solutions {
        let mut solutions: Solutions = Vec::with_capacity(2);
        for elbow in ElbowConfig::both() {
            if let Some(joints) = self.inverse_branch(target, elbow) {
                // At the workspace boundary both branches collapse into one
                let duplicate = solutions
                    .iter()
                    .any(|existing| transition_costs(existing, &joints) < 1e-12);
                if !duplicate {
                    solutions.push(joints);
                }
            }
        }
        solutions
    }

    fn inverse_continuing(&self, target: &Position, previous: &[f64]) -> Solutions {
        let mut solutions = self.inverse(target);
        solutions.sort_by(|a, b| {
            transition_costs(a, previous).total_cmp(&transition_costs(b, previous))
        });
        solutions
    }

    fn forward(&self, joints: &[f64]) -> Position {
        forward_kinematics_from(&self.parameters.base, self.link_lengths(), joints).0
    }

    fn forward_with_joint_positions(&self, joints: &[f64]) -> JointPositions {
        forward_kinematics_from(&self.parameters.base, self.link_lengths(), joints).1
    }
}
