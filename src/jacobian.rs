use crate::kinematic_traits::{Joints, Kinematics};
use nalgebra::linalg::SVD;
use nalgebra::{DMatrix, DVector, Matrix2, Vector2};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Analytic Jacobian of the two-link arm: partial derivatives of the end effector (x, y)
/// with respect to (theta1, theta2).
pub fn jacobian(l1: f64, l2: f64, theta1: f64, theta2: f64) -> Matrix2<f64> {
    let s1 = theta1.sin();
    let c1 = theta1.cos();
    let s12 = (theta1 + theta2).sin();
    let c12 = (theta1 + theta2).cos();

    Matrix2::new(
        -l1 * s1 - l2 * s12, -l2 * s12,
        l1 * c1 + l2 * c12, l2 * c12,
    )
}

/// Manipulability index `sqrt(det(J * J^T))` of the two-link arm. Zero at singular
/// configurations (stretched or folded arm), never negative.
pub fn manipulability(l1: f64, l2: f64, theta1: f64, theta2: f64) -> f64 {
    let j = jacobian(l1, l2, theta1, theta2);
    yoshikawa((j * j.transpose()).determinant())
}

/// Manipulability index of any 2xN planar Jacobian.
pub fn manipulability_of(j: &DMatrix<f64>) -> f64 {
    yoshikawa((j * j.transpose()).determinant())
}

// Rounding may push the determinant of a singular J * J^T slightly below zero
fn yoshikawa(determinant: f64) -> f64 {
    if determinant > 0.0 { determinant.sqrt() } else { 0.0 }
}

/// Analytic 2xN Jacobian of a planar chain with any number of links. Column i holds the
/// velocity of the end effector when joint i turns at unit speed, which is the
/// perpendicular of the vector from joint i to the end effector.
///
/// # Panics
/// If the angle and link vectors differ in length.
pub fn planar_jacobian(link_lengths: &[f64], joints: &[f64]) -> DMatrix<f64> {
    assert_eq!(
        link_lengths.len(),
        joints.len(),
        "Invalid chain length: {} links but {} joint angles",
        link_lengths.len(),
        joints.len()
    );
    let n = link_lengths.len();

    // Contribution of every link to the end effector
    let mut cumulative: f64 = 0.0;
    let links: Vec<Vector2<f64>> = link_lengths
        .iter()
        .zip(joints)
        .map(|(length, angle)| {
            cumulative += angle;
            Vector2::new(cumulative.cos(), cumulative.sin()) * *length
        })
        .collect();

    let mut matrix = DMatrix::zeros(2, n);
    let mut tail = Vector2::zeros();
    for i in (0..n).rev() {
        tail += links[i];
        matrix[(0, i)] = -tail.y;
        matrix[(1, i)] = tail.x;
    }
    matrix
}

/// Jacobian of the planar chain at one configuration.
pub struct Jacobian {
    /// A 2xN matrix mapping the joint velocities to the end effector velocity.
    matrix: DMatrix<f64>,

    /// Singular values below this are treated as zero by the pseudoinverse
    epsilon: f64,
}

impl Jacobian {
    /// Analytic Jacobian of the chain with the given link lengths and joint angles.
    pub fn new(link_lengths: &[f64], joints: &[f64], epsilon: f64) -> Self {
        Jacobian {
            matrix: planar_jacobian(link_lengths, joints),
            epsilon,
        }
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn manipulability(&self) -> f64 {
        manipulability_of(&self.matrix)
    }

    /// Computes the joint velocities required to achieve a desired end effector velocity
    ///
    /// Uses the inverse of the Jacobian for the two-link arm when its determinant exceeds
    /// `epsilon`. Otherwise (redundant arm, singular or nearly singular configuration) falls
    /// back to the pseudoinverse, which gives the smallest joint velocities that achieve the
    /// end effector velocity, or the closest achievable one near a singularity.
    pub fn velocities(
        &self,
        desired_end_effector_velocity: &Vector2<f64>,
    ) -> Result<Joints, &'static str> {
        let desired = DVector::from_column_slice(desired_end_effector_velocity.as_slice());
        if self.matrix.is_square() && self.matrix.determinant().abs() > self.epsilon {
            if let Some(inverse) = self.matrix.clone().try_inverse() {
                return Ok((inverse * desired).iter().cloned().collect());
            }
        }
        let svd = SVD::new(self.matrix.clone(), true, true);
        let pseudoinverse = svd
            .pseudo_inverse(self.epsilon)
            .map_err(|_| "Unable to compute the pseudoinverse of the Jacobian matrix")?;
        Ok((pseudoinverse * desired).iter().cloned().collect())
    }
}

/// Numerical Jacobian of any planar kinematics by finite differences. Used to check the
/// analytic forms and for arms where no analytic form is available.
pub fn compute_jacobian(
    robot: &(impl Kinematics + Sync),
    joints: &[f64],
    epsilon: f64,
) -> DMatrix<f64> {
    let n = joints.len();
    let current = robot.forward(joints);

    let column = |i: usize| {
        let mut perturbed = joints.to_vec();
        perturbed[i] += epsilon;
        (robot.forward(&perturbed) - current) / epsilon
    };

    #[cfg(feature = "parallel")]
    let columns: Vec<Vector2<f64>> = (0..n).into_par_iter().map(column).collect();
    #[cfg(not(feature = "parallel"))]
    let columns: Vec<Vector2<f64>> = (0..n).map(column).collect();

    let mut matrix = DMatrix::zeros(2, n);
    for (i, delta) in columns.into_iter().enumerate() {
        matrix[(0, i)] = delta.x;
        matrix[(1, i)] = delta.y;
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics_impl::PlanarKinematics;
    use crate::parameters::planar_arm::Parameters;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-6;

    fn assert_matrix_approx_eq(left: &DMatrix<f64>, right: &DMatrix<f64>, epsilon: f64) {
        assert_eq!(left.shape(), right.shape());
        for i in 0..left.nrows() {
            for j in 0..left.ncols() {
                assert!(
                    (left[(i, j)] - right[(i, j)]).abs() < epsilon,
                    "left[{0},{1}] = {2} is not approximately equal to right[{0},{1}] = {3}",
                    i, j, left[(i, j)], right[(i, j)]
                );
            }
        }
    }

    #[test]
    fn test_two_link_formula() {
        let j = jacobian(3.0, 2.0, 0.0, FRAC_PI_2);
        // Forearm points along y: moving theta1 swings the tip in -x and +y
        assert!((j[(0, 0)] + 2.0).abs() < 1e-12);
        assert!((j[(0, 1)] + 2.0).abs() < 1e-12);
        assert!((j[(1, 0)] - 3.0).abs() < 1e-12);
        assert!(j[(1, 1)].abs() < 1e-12);
    }

    #[test]
    fn test_planar_matches_two_link() {
        let general = planar_jacobian(&[3.0, 2.0], &[0.5, 0.5]);
        let two = jacobian(3.0, 2.0, 0.5, 0.5);
        let two = DMatrix::from_column_slice(2, 2, two.as_slice());
        assert_matrix_approx_eq(&general, &two, 1e-12);
    }

    #[test]
    fn test_analytic_matches_numerical() {
        let robot = PlanarKinematics::new(Parameters::three_link()).unwrap();
        let joints = [0.3, -0.7, 1.1];
        let analytic = planar_jacobian(&[2.0, 1.5, 1.0], &joints);
        let numerical = compute_jacobian(&robot, &joints, 1e-7);
        assert_matrix_approx_eq(&analytic, &numerical, 1e-5);
    }

    #[test]
    fn test_manipulability_singular() {
        assert!(manipulability(3.0, 2.0, 0.0, 0.0).abs() < 1e-12);
        assert!(manipulability(3.0, 2.0, 0.7, PI) >= 0.0);
        // Rounding in the determinant leaves a residue far below any useful index
        assert!(manipulability(3.0, 2.0, 0.7, PI) < 1e-6);
    }

    #[test]
    fn test_manipulability_is_l1_l2_sin() {
        for &theta2 in &[0.3, 1.0, FRAC_PI_2, 2.5, -1.2] {
            let expected = 3.0 * 2.0 * f64::sin(theta2).abs();
            assert!((manipulability(3.0, 2.0, 0.4, theta2) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_velocities_two_link() {
        let j = Jacobian::new(&[3.0, 2.0], &[0.0, FRAC_PI_2], EPSILON);
        let desired = Vector2::new(0.0, 1.0);
        let velocities = j.velocities(&desired).unwrap();
        let achieved = j.matrix() * DVector::from_vec(velocities);
        assert!((achieved[0] - desired.x).abs() < 1e-9);
        assert!((achieved[1] - desired.y).abs() < 1e-9);
    }

    #[test]
    fn test_velocities_redundant() {
        let j = Jacobian::new(&[2.0, 1.5, 1.0], &[0.3, 0.4, 0.5], EPSILON);
        let desired = Vector2::new(0.2, -0.4);
        let velocities = j.velocities(&desired).unwrap();
        assert_eq!(velocities.len(), 3);
        let achieved = j.matrix() * DVector::from_vec(velocities);
        assert!((achieved[0] - desired.x).abs() < 1e-9);
        assert!((achieved[1] - desired.y).abs() < 1e-9);
    }

    #[test]
    fn test_velocities_at_singularity() {
        // Stretched arm cannot move along its own axis, the result is still finite
        let j = Jacobian::new(&[3.0, 2.0], &[0.0, 0.0], EPSILON);
        let velocities = j.velocities(&Vector2::new(1.0, 1.0)).unwrap();
        assert!(velocities.iter().all(|v| v.is_finite()));
        assert_eq!(j.manipulability(), 0.0);
    }

    #[test]
    fn test_velocities_folded_arm() {
        // sin(PI) is not exactly zero, the determinant is tiny but not zero
        let j = Jacobian::new(&[3.0, 2.0], &[0.3, PI], EPSILON);
        let desired = Vector2::new(1.0, 1.0);
        let velocities = j.velocities(&desired).unwrap();
        assert!(velocities.iter().all(|v| v.is_finite() && v.abs() < 10.0), "{:?}", velocities);

        // The achievable part of the motion is along the common direction of both links
        let achieved = j.matrix() * DVector::from_vec(velocities);
        let achieved = Vector2::new(achieved[0], achieved[1]);
        let direction = Vector2::new(-(0.3_f64).sin(), (0.3_f64).cos());
        let expected = direction * direction.dot(&desired);
        assert!((achieved - expected).norm() < 1e-6, "{:?}", achieved);
    }
}
