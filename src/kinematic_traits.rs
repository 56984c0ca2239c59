//! Common types and the kinematics trait shared by all planar arm solvers

use nalgebra::Point2;

/// Joint angles in radians, one per link. Each angle is relative to the orientation
/// of the preceding link (the first one is relative to the x axis of the base).
pub type Joints = Vec<f64>;

/// Position of a joint or of the end effector in the plane of the arm.
pub type Position = Point2<f64>;

/// Positions of the base, every intermediate joint and the end effector (N + 1 entries for
/// an arm with N links). The first entry is the base, the last one is the end effector.
pub type JointPositions = Vec<Position>;

/// Inverse kinematics may return more than one solution (elbow up and elbow down
/// for the two-link arm). An empty vector means the target is not reachable.
pub type Solutions = Vec<Joints>;

/// Solution branch of the two link (or two-link-equivalent) closed form solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElbowConfig {
    /// Non-negative second joint angle (the acos branch).
    #[default]
    Up,
    /// Mirrored solution with the negated second joint angle.
    Down,
}

impl ElbowConfig {
    pub fn both() -> [ElbowConfig; 2] {
        [ElbowConfig::Up, ElbowConfig::Down]
    }
}

pub trait Kinematics {
    /// Number of links, and hence joints, of this arm.
    fn dof(&self) -> usize;

    /// Find inverse kinematics (joint angles) for the end effector at the given position.
    /// All returned solutions are valid, cross-checked with forward kinematics and
    /// compliant with constraints if the arm has any. An empty vector means that the
    /// position cannot be reached.
    fn inverse(&self, target: &Position) -> Solutions;

    /// Same as [Kinematics::inverse], but the solutions are sorted by proximity to the
    /// previous joint positions (closest first). This keeps trajectories from jumping
    /// between elbow branches.
    fn inverse_continuing(&self, target: &Position, previous: &[f64]) -> Solutions;

    /// Find the position of the end effector for the given joint angles.
    fn forward(&self, joints: &[f64]) -> Position;

    /// Positions of the base, all joints and the end effector.
    fn forward_with_joint_positions(&self, joints: &[f64]) -> JointPositions;
}
