//! Forward and inverse kinematics, trajectories and workspace analysis for planar serial arms
//! (a chain of rigid links joined by revolute joints, all moving in one plane).
//!
//! # Features
//!
//! - Forward kinematics for any number of links, returning the position of every joint.
//! - Closed form inverse kinematics of the two-link arm with both elbow branches exposed.
//!   Unreachable targets are reported as data (`None` or empty solution list), never as panics.
//! - Arms with more than two links are solved by holding the extra joints at fixed offsets or
//!   by keeping the last link at a given approach angle. A damped least squares solver is
//!   available separately for fully redundant use.
//! - All returned solutions are valid and cross-checked with forward kinematics. Joint angles
//!   can be checked against constraints, ensuring only compliant solutions are returned.
//! - If the previous joint positions are provided, the solutions are sorted by proximity to
//!   them (closest first) so trajectories do not jump between elbow branches.
//! - Trajectories: joint space interpolation with linear, smoothstep and cosine easing,
//!   Cartesian waypoints, straight line moves and a pick and place task.
//! - Workspace analysis: joint space sampling, reachability grid, Jacobian, manipulability
//!   index and summary statistics.
//!
//! # Parameters
//!
//! An arm is described by its link lengths (base link first), the position of its base and,
//! optionally, joint limits. Every joint angle is relative to the preceding link, the first
//! one to the x axis. With all joints at zero the arm is stretched along the x axis.
//!
//! To use the library, fill out a `planar_arm::Parameters` data structure or take one of the
//! predefined arms, and create `PlanarKinematics` from it.
//!
//! ## Examples
//!
//! - **basic.rs**: forward and inverse kinematics, both elbow branches, reach limits.
//! - **workspace.rs**: workspace statistics and reachability grid.
//! - **excavator.rs**: three link backhoe with joint limits and a keyframe demo sequence.
//! - **pick_and_place.rs**: planned pick and place motion.

pub mod parameters;
pub mod parameters_robots;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;

#[path = "utils/utils.rs"]
pub mod utils;
pub mod kinematic_traits;
pub mod kinematics_impl;
pub mod kinematics_error;

pub mod link_chain;

pub mod two_link;

pub mod redundancy;

pub mod dls;

pub mod constraints;

pub mod jacobian;

#[cfg(feature = "allow_filesystem")]
pub mod parameter_error;

pub mod annotations;

pub mod trajectory;

pub mod interpolator;

pub mod task;

pub mod workspace;

#[cfg(test)]
mod tests;
