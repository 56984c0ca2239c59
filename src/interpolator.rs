use crate::annotations::{AnnotatedJoints, PathFlags};
use crate::trajectory::{Easing, Trajectory};

/// Structure representing the interpolator with the key poses of a predefined motion
/// (a digging cycle, a demo sequence). Every segment between two key poses takes the
/// same share of the normalized time.
pub struct Interpolator {
    steps: Vec<AnnotatedJoints>, // The key points along the trajectory
    easing: Easing,
}

impl Interpolator {
    /// Create a new interpolator with given key poses, eased within every segment.
    ///
    /// # Panics
    /// If less than two poses are given or the poses differ in length.
    pub fn new(steps: Vec<AnnotatedJoints>, easing: Easing) -> Self {
        assert!(steps.len() >= 2, "At least two steps are required for interpolation.");
        let dof = steps[0].joints.len();
        assert!(
            steps.iter().all(|step| step.joints.len() == dof),
            "Invalid chain length: all key poses must have {} joint angles",
            dof
        );
        Interpolator { steps, easing }
    }

    /// Key poses given as plain joint vectors, flagged [PathFlags::KEYFRAME].
    pub fn from_poses(poses: &[&[f64]], easing: Easing) -> Self {
        let steps = poses
            .iter()
            .map(|pose| AnnotatedJoints::new(pose.to_vec(), PathFlags::KEYFRAME))
            .collect();
        Self::new(steps, easing)
    }

    pub fn key_poses(&self) -> &[AnnotatedJoints] {
        &self.steps
    }

    /// Map `t` (0.0 to 1.0) onto the correct segment and compute the interpolation
    pub fn interpolate(&self, t: f64) -> AnnotatedJoints {
        assert!((0.0..=1.0).contains(&t), "t must be in the range [0.0, 1.0].");

        let num_segments = self.steps.len() - 1; // One less than the number of points
        let segment_length = 1.0 / num_segments as f64; // Normalize segments to [0,1]

        // Determine which segment `t` falls into
        let segment_index = (t / segment_length).floor() as usize;
        let clamped_index = segment_index.min(num_segments - 1); // Clamp index to valid range

        // Get the local `t` within the segment [0, 1] range
        let t_local =
            ((t - clamped_index as f64 * segment_length) / segment_length).clamp(0.0, 1.0);

        let start = &self.steps[clamped_index];
        let end = &self.steps[clamped_index + 1];
        let mut interpolated = start.interpolate(end, self.easing.apply(t_local));
        if t_local > 0.0 && t_local < 1.0 {
            interpolated.flags = PathFlags::INTERPOLATED;
        }
        interpolated
    }

    /// Samples the whole motion in `frames` evenly spaced instants, first and last key
    /// pose included.
    ///
    /// # Panics
    /// If `frames` is less than 2.
    pub fn sample(&self, frames: usize) -> Trajectory {
        assert!(frames >= 2, "At least two frames are required to sample the motion.");
        let last = (frames - 1) as f64;
        Trajectory::from_frames((0..frames).map(|i| self.interpolate(i as f64 / last)).collect())
    }
}
