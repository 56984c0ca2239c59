//! Pick and place: home, pick location, place location and back home, each reached with a
//! joint space move planned by inverse kinematics.

use crate::annotations::PathFlags;
use crate::kinematic_traits::{Kinematics, Position};
use crate::kinematics_error::TrajectoryError;
use crate::link_chain::LinkChain;
use crate::trajectory::{move_to, Easing, Trajectory};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ToHome,
    ToPick,
    /// Moving with the object attached, frames are flagged [PathFlags::CARRYING].
    ToPlace,
    Return,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Phase::ToHome => "Moving to home position",
            Phase::ToPick => "Moving to pick location",
            Phase::ToPlace => "Moving to place location",
            Phase::Return => "Returning to home position",
        };
        write!(f, "{}", name)
    }
}

/// One move of the task.
#[derive(Debug, Clone)]
pub struct Segment {
    pub phase: Phase,
    pub target: Position,
    pub trajectory: Trajectory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickPlace {
    pub home: Position,
    pub pick: Position,
    pub place: Position,

    /// Frames per move.
    pub steps: usize,
    pub easing: Easing,
}

impl Default for PickPlace {
    /// Locations used with the 3.0 / 2.0 demonstration arm.
    fn default() -> Self {
        PickPlace::new(Position::new(2.0, 3.0), Position::new(4.0, 1.0), Position::new(-3.0, 2.0))
    }
}

impl PickPlace {
    pub fn new(home: Position, pick: Position, place: Position) -> Self {
        PickPlace {
            home,
            pick,
            place,
            steps: 50,
            easing: Easing::Linear,
        }
    }

    pub fn with_steps(self, steps: usize) -> Self {
        PickPlace { steps, ..self }
    }

    pub fn with_easing(self, easing: Easing) -> Self {
        PickPlace { easing, ..self }
    }

    /// The moves of the task in execution order.
    pub fn moves(&self) -> [(Phase, Position); 4] {
        [
            (Phase::ToHome, self.home),
            (Phase::ToPick, self.pick),
            (Phase::ToPlace, self.place),
            (Phase::Return, self.home),
        ]
    }

    /// Whether the arm can reach the target of every move.
    pub fn reachability(&self, kinematics: &impl Kinematics) -> Vec<(Phase, bool)> {
        self.moves()
            .iter()
            .map(|(phase, target)| (*phase, !kinematics.inverse(target).is_empty()))
            .collect()
    }

    /// Plans all moves starting from the current angles of the chain. The chain follows the
    /// plan and ends at the home position.
    ///
    /// If some location is unreachable, planning stops with the index of the failed move.
    /// The chain is then left where the last successful move ended.
    pub fn plan(
        &self,
        chain: &mut LinkChain,
        kinematics: &impl Kinematics,
    ) -> Result<Vec<Segment>, TrajectoryError> {
        let mut segments = Vec::with_capacity(4);
        for (index, (phase, target)) in self.moves().into_iter().enumerate() {
            info!("{} ({:.2}, {:.2})", phase, target.x, target.y);
            let mut trajectory = move_to(chain, kinematics, &target, self.steps, self.easing)
                .map_err(|err| match err {
                    TrajectoryError::Unreachable { x, y, .. } => {
                        TrajectoryError::Unreachable { index, x, y }
                    }
                    other => other,
                })?;
            if phase == Phase::ToPlace {
                trajectory.mark(PathFlags::CARRYING);
            }
            segments.push(Segment {
                phase,
                target,
                trajectory,
            });
        }
        Ok(segments)
    }
}

/// Joins the segments into a single trajectory for playback.
pub fn concatenate(segments: Vec<Segment>) -> Trajectory {
    let mut trajectory = Trajectory::new();
    for segment in segments {
        trajectory.append(segment.trajectory);
    }
    trajectory
}
