//! Joint space trajectories.
//!
//! A [Trajectory] is a finite, fully materialized sequence of annotated joint vectors. It can
//! be iterated any number of times, for instance once per animation loop. Trajectories are
//! produced by interpolating between two configurations ([interpolate]) or by solving
//! inverse kinematics for a sequence of Cartesian waypoints ([plan_waypoints],
//! [cartesian_line]).
//!
//! Unreachable waypoints are handled as the [UnreachablePolicy] says: either the arm holds
//! its previous configuration for the duration of the segment (frames flagged
//! [PathFlags::HOLD]) or the planning fails with [TrajectoryError::Unreachable].

use crate::annotations::{AnnotatedJoints, PathFlags};
use crate::kinematic_traits::{JointPositions, Joints, Kinematics, Position};
use crate::kinematics_error::{ChainError, TrajectoryError};
use crate::link_chain::{check_angles, LinkChain};
use crate::utils::unwrap_near;
use std::f64::consts::PI;
use std::slice::Iter;
use tracing::{debug, warn};

/// Maps the normalized time t in [0, 1] to the fraction of the motion completed.
/// All easings map 0 to 0 and 1 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant joint velocity.
    #[default]
    Linear,
    /// `3t² - 2t³`, zero velocity at both ends.
    SmoothStep,
    /// `(1 - cos πt) / 2`, zero velocity at both ends.
    Cosine,
}

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
            Easing::Cosine => 0.5 * (1.0 - (PI * t).cos()),
        }
    }
}

/// What to do when inverse kinematics has no solution for a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnreachablePolicy {
    /// Stay at the previous configuration, frames are flagged [PathFlags::HOLD].
    #[default]
    Hold,
    /// Stop planning and report the waypoint.
    Fail,
}

/// Cartesian target of the end effector, reached in `steps` frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub target: Position,
    pub steps: usize,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, steps: usize) -> Self {
        Waypoint {
            target: Position::new(x, y),
            steps,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    frames: Vec<AnnotatedJoints>,
}

impl Trajectory {
    pub fn new() -> Self {
        Trajectory { frames: Vec::new() }
    }

    pub fn from_frames(frames: Vec<AnnotatedJoints>) -> Self {
        Trajectory { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[AnnotatedJoints] {
        &self.frames
    }

    pub fn iter(&self) -> Iter<'_, AnnotatedJoints> {
        self.frames.iter()
    }

    pub fn first(&self) -> Option<&AnnotatedJoints> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&AnnotatedJoints> {
        self.frames.last()
    }

    /// Joint vectors without annotations.
    pub fn joints(&self) -> Vec<Joints> {
        self.frames.iter().map(|frame| frame.joints.clone()).collect()
    }

    /// Appends all frames of `other`.
    pub fn append(&mut self, other: Trajectory) {
        self.frames.extend(other.frames);
    }

    /// Adds `flags` to every frame.
    pub fn mark(&mut self, flags: PathFlags) {
        for frame in &mut self.frames {
            frame.flags |= flags;
        }
    }

    /// End effector position for every frame.
    pub fn end_effector_path(&self, kinematics: &impl Kinematics) -> Vec<Position> {
        self.frames.iter().map(|frame| kinematics.forward(&frame.joints)).collect()
    }

    /// Positions of all joints for every frame, as needed to draw the arm.
    pub fn joint_positions(&self, kinematics: &impl Kinematics) -> Vec<JointPositions> {
        self.frames
            .iter()
            .map(|frame| kinematics.forward_with_joint_positions(&frame.joints))
            .collect()
    }

    fn push(&mut self, joints: Joints, flags: PathFlags) {
        self.frames.push(AnnotatedJoints { joints, flags });
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a AnnotatedJoints;
    type IntoIter = Iter<'a, AnnotatedJoints>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl IntoIterator for Trajectory {
    type Item = AnnotatedJoints;
    type IntoIter = std::vec::IntoIter<AnnotatedJoints>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

/// Interpolates between two joint configurations in `steps` frames, `t = i / (steps - 1)`.
/// The first frame equals `start`, the last one equals `end`. With a single step the only
/// frame is `end`. The last frame is flagged [PathFlags::WAYPOINT], all others
/// [PathFlags::INTERPOLATED].
///
/// # Panics
/// If `steps` is zero or the configurations differ in length.
pub fn interpolate(start: &[f64], end: &[f64], steps: usize, easing: Easing) -> Trajectory {
    assert!(steps >= 1, "At least one step is required for interpolation.");
    assert_eq!(
        start.len(),
        end.len(),
        "Invalid chain length: start has {} joint angles but end has {}",
        start.len(),
        end.len()
    );

    let mut trajectory = Trajectory {
        frames: Vec::with_capacity(steps),
    };
    let last = steps - 1;
    for i in 0..steps {
        if i == last {
            trajectory.push(end.to_vec(), PathFlags::WAYPOINT);
            break;
        }
        let s = easing.apply(i as f64 / last as f64);
        let joints = start.iter().zip(end).map(|(a, b)| a + s * (b - a)).collect();
        trajectory.push(joints, PathFlags::INTERPOLATED);
    }
    trajectory
}

/// Plans through a sequence of Cartesian waypoints starting from the `start` configuration.
///
/// Each waypoint is solved with inverse kinematics, taking the solution closest to the
/// current configuration so the arm does not flip between elbow branches, and reached by
/// joint space interpolation in `waypoint.steps` frames. Each segment starts with the
/// configuration the previous one ended with. Solutions are shifted by whole turns to the
/// angles nearest the current ones, so joints may leave [-π, π) but never swing the long
/// way round.
///
/// # Panics
/// If some waypoint has zero steps.
pub fn plan_waypoints(
    kinematics: &impl Kinematics,
    start: &[f64],
    waypoints: &[Waypoint],
    easing: Easing,
    policy: UnreachablePolicy,
) -> Result<Trajectory, TrajectoryError> {
    check_angles(kinematics.dof(), start)?;
    let mut current = start.to_vec();
    let mut trajectory = Trajectory::new();

    for (index, waypoint) in waypoints.iter().enumerate() {
        let solutions = kinematics.inverse_continuing(&waypoint.target, &current);
        match solutions.first() {
            Some(solution) => {
                let solution = unwrap_near(solution, &current);
                debug!(
                    "Waypoint {} ({:.3}, {:.3}) reached with {:?}",
                    index, waypoint.target.x, waypoint.target.y, solution
                );
                trajectory.append(interpolate(&current, &solution, waypoint.steps, easing));
                current = solution;
            }
            None => {
                let (target, steps) = (&waypoint.target, waypoint.steps);
                hold_or_fail(&mut trajectory, &current, index, target, steps, policy)?;
            }
        }
    }
    Ok(trajectory)
}

/// Moves the end effector along the straight line from its position at `start` to `target`.
/// Every frame is solved separately with inverse kinematics, keeping the branch closest to
/// the previous frame. The first frame is `start` itself. Unreachable intermediate points
/// are handled as `policy` says, one frame at a time; the reported index is the frame index.
///
/// # Panics
/// If `steps` is zero.
pub fn cartesian_line(
    kinematics: &impl Kinematics,
    start: &[f64],
    target: &Position,
    steps: usize,
    easing: Easing,
    policy: UnreachablePolicy,
) -> Result<Trajectory, TrajectoryError> {
    assert!(steps >= 1, "At least one step is required for interpolation.");
    check_angles(kinematics.dof(), start)?;

    let from = kinematics.forward(start);
    let mut current = start.to_vec();
    let mut trajectory = Trajectory {
        frames: Vec::with_capacity(steps),
    };

    let last = steps - 1;
    for i in 0..steps {
        if i == 0 && last > 0 {
            trajectory.push(current.clone(), PathFlags::INTERPOLATED);
            continue;
        }
        let t = if last == 0 { 1.0 } else { i as f64 / last as f64 };
        let point = from + (target - from) * easing.apply(t);
        let flags = if i == last { PathFlags::WAYPOINT } else { PathFlags::INTERPOLATED };

        match kinematics.inverse_continuing(&point, &current).first() {
            Some(solution) => {
                let solution = unwrap_near(solution, &current);
                trajectory.push(solution.clone(), flags);
                current = solution;
            }
            None => hold_or_fail(&mut trajectory, &current, i, &point, 1, policy)?,
        }
    }
    Ok(trajectory)
}

fn hold_or_fail(
    trajectory: &mut Trajectory,
    current: &[f64],
    index: usize,
    target: &Position,
    steps: usize,
    policy: UnreachablePolicy,
) -> Result<(), TrajectoryError> {
    match policy {
        UnreachablePolicy::Hold => {
            warn!(
                "Target {} ({:.3}, {:.3}) is unreachable, holding the previous configuration",
                index, target.x, target.y
            );
            for _ in 0..steps {
                trajectory.push(current.to_vec(), PathFlags::HOLD);
            }
            Ok(())
        }
        UnreachablePolicy::Fail => Err(TrajectoryError::Unreachable {
            index,
            x: target.x,
            y: target.y,
        }),
    }
}

/// Plans a joint space move of the chain to the Cartesian `target` and stores the final
/// configuration into the chain. If the target is unreachable, the chain is not changed.
pub fn move_to(
    chain: &mut LinkChain,
    kinematics: &impl Kinematics,
    target: &Position,
    steps: usize,
    easing: Easing,
) -> Result<Trajectory, TrajectoryError> {
    if chain.dof() != kinematics.dof() {
        return Err(ChainError::InvalidChainLength {
            expected: kinematics.dof(),
            found: chain.dof(),
        }
        .into());
    }
    let waypoint = Waypoint {
        target: *target,
        steps,
    };
    let trajectory = plan_waypoints(
        kinematics,
        chain.joint_angles(),
        &[waypoint],
        easing,
        UnreachablePolicy::Fail,
    )?;
    if let Some(last) = trajectory.last() {
        chain.apply(last)?;
    }
    Ok(trajectory)
}
