//! Errors reported by the chain model, the solvers and the trajectory planners.
//!
//! Unreachable targets in the closed form solver are not errors: they are reported as
//! `None` or an empty solution list. The errors below are only used where the caller
//! must be told why an operation did not happen.

use std::fmt;

/// The chain description or the angle vector does not match the chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainError {
    /// Joint angle vector length differs from the number of links.
    InvalidChainLength { expected: usize, found: usize },
    /// Link lengths must be positive and finite.
    InvalidLinkLength { index: usize, length: f64 },
    /// A chain must have at least one link.
    EmptyChain,
    /// Joint index out of range.
    NoSuchJoint { index: usize, dof: usize },
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ChainError::InvalidChainLength { expected, found } =>
                write!(
                    f,
                    "Invalid chain length: expected {} joint angles, found {}",
                    expected, found
                ),
            ChainError::InvalidLinkLength { index, length } =>
                write!(
                    f,
                    "Link {} has invalid length {} (must be positive and finite)",
                    index, length
                ),
            ChainError::EmptyChain =>
                write!(f, "Chain must have at least one link"),
            ChainError::NoSuchJoint { index, dof } =>
                write!(f, "Joint {} does not exist, the chain has {} joints", index, dof),
        }
    }
}

impl std::error::Error for ChainError {}

/// Failures of the numerical inverse kinematics solver and of the solvers that must
/// return a single configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum IkError {
    /// The target lies outside the annulus the arm can reach.
    Unreachable { x: f64, y: f64 },
    /// Iteration budget exhausted, the remaining end effector error is reported.
    NotConverged { residual: f64 },
    /// The damped normal matrix could not be inverted.
    InverseMatrixError,
    /// Initial guess does not match the chain.
    Chain(ChainError),
}

impl From<ChainError> for IkError {
    fn from(err: ChainError) -> IkError {
        IkError::Chain(err)
    }
}

impl fmt::Display for IkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            IkError::Unreachable { x, y } =>
                write!(f, "Target ({:.4}, {:.4}) is unreachable", x, y),
            IkError::NotConverged { residual } =>
                write!(f, "IK did not converge, residual error {:.3e}", residual),
            IkError::InverseMatrixError =>
                write!(f, "IK failed to invert the damped Jacobian"),
            IkError::Chain(ref err) =>
                write!(f, "IK precondition not met: {}", err),
        }
    }
}

impl std::error::Error for IkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IkError::Chain(err) => Some(err),
            _ => None,
        }
    }
}

/// Failure to produce a trajectory.
#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// Waypoint (or Cartesian step) with the given index has no IK solution.
    Unreachable { index: usize, x: f64, y: f64 },
    Chain(ChainError),
}

impl From<ChainError> for TrajectoryError {
    fn from(err: ChainError) -> TrajectoryError {
        TrajectoryError::Chain(err)
    }
}

impl fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TrajectoryError::Unreachable { index, x, y } =>
                write!(f, "Waypoint {} at ({:.2}, {:.2}) is unreachable", index, x, y),
            TrajectoryError::Chain(ref err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TrajectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrajectoryError::Chain(err) => Some(err),
            _ => None,
        }
    }
}
