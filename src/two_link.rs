//! Closed form inverse kinematics of the two-link planar arm.
//!
//! This is the primitive every other solver of the crate builds on. The elbow angle comes
//! from the law of cosines, the shoulder angle from the direction to the target corrected by
//! the angle the forearm adds. No iteration is involved, so results are deterministic and
//! forward kinematics of a returned solution lands on the target to floating point precision.

use crate::kinematic_traits::ElbowConfig;

/// Inner and outer radius of the annulus the two-link arm can reach.
pub fn reach_limits(l1: f64, l2: f64) -> (f64, f64) {
    ((l1 - l2).abs(), l1 + l2)
}

/// True if (x, y) lies in the closed annulus `|l1 - l2| <= d <= l1 + l2`.
pub fn is_reachable(l1: f64, l2: f64, x: f64, y: f64) -> bool {
    let d = (x * x + y * y).sqrt();
    let (min_reach, max_reach) = reach_limits(l1, l2);
    d >= min_reach && d <= max_reach
}

/// Elbow-up solution `(theta1, theta2)` with `theta2 >= 0`, or `None` if the target cannot
/// be reached.
///
/// ```
/// use planar_arm_kinematics::two_link::inverse_kinematics_2link;
/// use planar_arm_kinematics::kinematics_impl::forward_kinematics;
///
/// let (theta1, theta2) = inverse_kinematics_2link(3.0, 2.0, 4.9, 0.0).unwrap();
/// let (end, _) = forward_kinematics(&[3.0, 2.0], &[theta1, theta2]);
/// assert!((end.x - 4.9).abs() < 1e-9 && end.y.abs() < 1e-9);
///
/// assert!(inverse_kinematics_2link(3.0, 2.0, 6.0, 0.0).is_none());
/// ```
pub fn inverse_kinematics_2link(l1: f64, l2: f64, x: f64, y: f64) -> Option<(f64, f64)> {
    inverse_kinematics_2link_with(l1, l2, x, y, ElbowConfig::Up)
}

/// Same as [inverse_kinematics_2link] but the solution branch is chosen by the caller.
/// The elbow-down branch mirrors the arm over the line from the base to the target.
pub fn inverse_kinematics_2link_with(
    l1: f64,
    l2: f64,
    x: f64,
    y: f64,
    elbow: ElbowConfig,
) -> Option<(f64, f64)> {
    if !is_reachable(l1, l2, x, y) {
        return None;
    }

    // Clipping absorbs floating point overshoot at the boundary of the workspace
    let cos_theta2 = ((x * x + y * y - l1 * l1 - l2 * l2) / (2.0 * l1 * l2)).clamp(-1.0, 1.0);
    let theta2 = match elbow {
        ElbowConfig::Up => cos_theta2.acos(),
        ElbowConfig::Down => -cos_theta2.acos(),
    };

    let k1 = l1 + l2 * theta2.cos();
    let k2 = l2 * theta2.sin();
    let theta1 = y.atan2(x) - k2.atan2(k1);

    Some((theta1, theta2))
}
