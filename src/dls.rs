//! Numerical inverse kinematics for chains with any number of links.
//!
//! Damped least squares: every iteration moves the joints by
//! `dq = J^T (J J^T + λ² I)^-1 e`, where `e` is the remaining end effector error. Damping
//! keeps the steps bounded near singularities where the plain pseudoinverse would explode.
//! The solver is separate from the closed form solutions and is only used when called
//! explicitly. It returns one of the infinitely many solutions of a redundant arm, the one the
//! iteration happens to reach from the initial guess.

use crate::jacobian::planar_jacobian;
use crate::kinematic_traits::{Joints, Position};
use crate::kinematics_error::IkError;
use crate::kinematics_impl::forward_kinematics_from;
use crate::link_chain::{check_angles, validate_link_lengths, LinkChain};
use crate::utils::normalize_angle;
use nalgebra::{DMatrix, DVector, Point2};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct DampedLeastSquares {
    /// Damping factor λ. Larger values are more robust near singularities but converge slower.
    pub damping: f64,

    /// Distance from the target at which the solution is accepted, in meters.
    pub allowable_target_distance: f64,

    pub num_max_try: usize,

    /// Upper bound on the joint change of one iteration (Euclidean norm, radians).
    pub max_step: f64,
}

impl Default for DampedLeastSquares {
    fn default() -> Self {
        DampedLeastSquaresBuilder::new().finalize()
    }
}

impl DampedLeastSquares {
    /// Solves for the end effector at `target` starting from `initial` joint angles.
    /// The arm base is at `base`.
    pub fn solve(
        &self,
        link_lengths: &[f64],
        base: &Position,
        target: &Position,
        initial: &[f64],
    ) -> Result<Joints, IkError> {
        validate_link_lengths(link_lengths)?;
        check_angles(link_lengths.len(), initial)?;

        let distance = (target - base).norm();
        let max_reach: f64 = link_lengths.iter().sum();
        let longest = link_lengths.iter().cloned().fold(0.0, f64::max);
        let min_reach = (2.0 * longest - max_reach).max(0.0);
        if distance > max_reach || distance < min_reach {
            return Err(IkError::Unreachable { x: target.x, y: target.y });
        }

        let damping_squared = self.damping * self.damping;
        let mut joints = initial.to_vec();
        let mut residual = f64::INFINITY;

        for iteration in 0..self.num_max_try {
            let (reached, _) = forward_kinematics_from(base, link_lengths, &joints);
            let error = target - reached;
            residual = error.norm();
            trace!("DLS iteration {}: residual {:e}", iteration, residual);

            if residual < self.allowable_target_distance {
                debug!("DLS converged after {} iterations", iteration);
                return Ok(joints.into_iter().map(normalize_angle).collect());
            }

            let j = planar_jacobian(link_lengths, &joints);
            let damped = &j * j.transpose() + DMatrix::identity(2, 2) * damping_squared;
            let inverse = damped.try_inverse().ok_or(IkError::InverseMatrixError)?;
            let e = DVector::from_column_slice(error.as_slice());
            let mut step = j.transpose() * inverse * e;

            let step_norm = step.norm();
            if step_norm > self.max_step {
                step *= self.max_step / step_norm;
            }
            for (q, dq) in joints.iter_mut().zip(step.iter()) {
                *q += dq;
            }
        }

        debug!("DLS did not converge, residual {:e}", residual);
        Err(IkError::NotConverged { residual })
    }

    /// Solves starting from the current angles of the chain (base at the origin) and stores
    /// the solution into the chain. On failure the chain keeps its angles.
    pub fn solve_chain(&self, chain: &mut LinkChain, target: &Position) -> Result<(), IkError> {
        let base = Point2::origin();
        let solution = self.solve(chain.link_lengths(), &base, target, chain.joint_angles())?;
        chain.set_joint_angles(&solution)?;
        Ok(())
    }
}

/// Build `DampedLeastSquares`
///
/// This builder allows initialization of `DampedLeastSquares` without any parameters.
pub struct DampedLeastSquaresBuilder {
    pub damping: f64,
    pub allowable_target_distance: f64,
    pub num_max_try: usize,
    pub max_step: f64,
}

impl DampedLeastSquaresBuilder {
    pub fn new() -> Self {
        DampedLeastSquaresBuilder {
            damping: 0.05,
            allowable_target_distance: 1e-9,
            num_max_try: 500,
            max_step: 0.5,
        }
    }
    pub fn damping(&mut self, damping: f64) -> &mut Self {
        self.damping = damping;
        self
    }
    pub fn allowable_target_distance(&mut self, allowable_diff: f64) -> &mut Self {
        self.allowable_target_distance = allowable_diff;
        self
    }
    pub fn num_max_try(&mut self, max_try: usize) -> &mut Self {
        self.num_max_try = max_try;
        self
    }
    pub fn max_step(&mut self, max_step: f64) -> &mut Self {
        self.max_step = max_step;
        self
    }
    pub fn finalize(&self) -> DampedLeastSquares {
        DampedLeastSquares {
            damping: self.damping,
            allowable_target_distance: self.allowable_target_distance,
            num_max_try: self.num_max_try,
            max_step: self.max_step,
        }
    }
}

impl Default for DampedLeastSquaresBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics_error::ChainError;
    use crate::kinematics_impl::forward_kinematics;

    #[test]
    fn test_three_link_converges() {
        let solver = DampedLeastSquares::default();
        let lengths = [2.0, 1.5, 1.0];
        let target = Point2::new(2.0, 2.5);
        let joints = solver
            .solve(&lengths, &Point2::origin(), &target, &[0.3, 0.3, 0.3])
            .expect("target is well inside the workspace");
        let (end, _) = forward_kinematics(&lengths, &joints);
        assert!((end - target).norm() < 1e-8);
    }

    #[test]
    fn test_from_singular_start() {
        // Stretched arm is singular, damping still lets it fold towards the target
        let solver = DampedLeastSquaresBuilder::new().num_max_try(2000).finalize();
        let lengths = [2.0, 1.5, 1.0];
        let target = Point2::new(1.0, 1.0);
        let joints = solver
            .solve(&lengths, &Point2::origin(), &target, &[0.0, 0.0, 0.0])
            .unwrap();
        let (end, _) = forward_kinematics(&lengths, &joints);
        assert!((end - target).norm() < 1e-8);
    }

    #[test]
    fn test_with_base() {
        let solver = DampedLeastSquaresBuilder::new().damping(0.1).finalize();
        let base = Point2::new(0.0, 2.0);
        let target = Point2::new(4.0, 1.0);
        let lengths = [3.5, 2.8, 1.5];
        let joints = solver.solve(&lengths, &base, &target, &[0.3, -0.8, 1.2]).unwrap();
        let (end, _) = forward_kinematics_from(&base, &lengths, &joints);
        assert!((end - target).norm() < 1e-8);
    }

    #[test]
    fn test_unreachable() {
        let solver = DampedLeastSquares::default();
        let result = solver.solve(
            &[2.0, 1.5, 1.0],
            &Point2::origin(),
            &Point2::new(5.0, 0.0),
            &[0.1, 0.1, 0.1],
        );
        assert_eq!(result, Err(IkError::Unreachable { x: 5.0, y: 0.0 }));
    }

    #[test]
    fn test_not_converged_with_tiny_budget() {
        let solver = DampedLeastSquaresBuilder::new().num_max_try(1).finalize();
        let result = solver.solve(
            &[2.0, 1.5, 1.0],
            &Point2::origin(),
            &Point2::new(-1.0, 2.0),
            &[0.1, 0.1, 0.1],
        );
        assert!(matches!(result, Err(IkError::NotConverged { .. })));
    }

    #[test]
    fn test_bad_initial_guess() {
        let solver = DampedLeastSquares::default();
        let result = solver.solve(&[2.0, 1.5], &Point2::origin(), &Point2::new(1.0, 1.0), &[0.0]);
        assert_eq!(
            result,
            Err(IkError::Chain(ChainError::InvalidChainLength { expected: 2, found: 1 }))
        );
    }

    #[test]
    fn test_solve_chain_updates_angles() {
        let mut chain = LinkChain::with_angles(vec![2.0, 1.5, 1.0], vec![0.2, 0.4, 0.4]).unwrap();
        let target = Point2::new(-1.0, 3.0);
        DampedLeastSquares::default().solve_chain(&mut chain, &target).unwrap();
        assert!((chain.end_effector() - target).norm() < 1e-8);

        let before = chain.joint_angles().to_vec();
        let far = Point2::new(9.0, 0.0);
        assert!(DampedLeastSquares::default().solve_chain(&mut chain, &far).is_err());
        assert_eq!(chain.joint_angles(), before.as_slice());
    }
}
