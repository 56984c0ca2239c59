//! Workspace analysis of the two-link arm: dense joint space sampling, the Cartesian
//! reachability grid, Jacobian based manipulability and summary statistics.
//!
//! Nothing here fails for a valid arm. Singular configurations give zero manipulability and
//! points outside the annulus give unreachable grid cells.

use crate::jacobian;
use crate::kinematics_error::ChainError;
use crate::kinematics_impl::forward_kinematics;
use crate::link_chain::validate_link_lengths;
use crate::two_link::{inverse_kinematics_2link, reach_limits};
use nalgebra::{DMatrix, Matrix2};
use rand::Rng;
use std::f64::consts::PI;
use std::fmt;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Joint space resolution used by [WorkspaceAnalyzer::workspace_statistics].
pub const THETA1_RESOLUTION: usize = 100;
pub const THETA2_RESOLUTION: usize = 50;

/// End effector position of one sampled configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkspaceSample {
    pub x: f64,
    pub y: f64,
    pub theta1: f64,
    pub theta2: f64,
}

impl WorkspaceSample {
    /// Distance from the base.
    pub fn distance(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Cartesian grid of reachability flags. Row index follows y, column index follows x.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachabilityGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub cells: DMatrix<bool>,
}

impl ReachabilityGrid {
    pub fn is_reachable(&self, row: usize, column: usize) -> bool {
        self.cells[(row, column)]
    }

    pub fn reachable_count(&self) -> usize {
        self.cells.iter().filter(|reachable| **reachable).count()
    }

    /// Reachable cell count times the area of one cell.
    pub fn reachable_area(&self, resolution: f64) -> f64 {
        self.reachable_count() as f64 * resolution * resolution
    }
}

impl fmt::Display for ReachabilityGrid {
    /// Text rendering, highest y on top: `#` reachable, `.` unreachable.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in (0..self.cells.nrows()).rev() {
            let line: String = (0..self.cells.ncols())
                .map(|column| if self.cells[(row, column)] { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Mean, population standard deviation and range of a series.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// All zero for an empty series.
    pub fn of(values: &[f64]) -> Summary {
        if values.is_empty() {
            return Summary::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Summary {
            mean,
            std: variance.sqrt(),
            min: values.iter().cloned().fold(f64::INFINITY, f64::min),
            max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceStatistics {
    pub l1: f64,
    pub l2: f64,
    pub max_reach: f64,
    pub min_reach: f64,
    pub theoretical_area: f64,
    pub samples: usize,
    pub distance: Summary,
    pub manipulability: Summary,
}

impl fmt::Display for WorkspaceStatistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Link 1 Length: {:.2}", self.l1)?;
        writeln!(f, "Link 2 Length: {:.2}", self.l2)?;
        writeln!(f, "Maximum Reach: {:.2}", self.max_reach)?;
        writeln!(f, "Minimum Reach: {:.2}", self.min_reach)?;
        writeln!(f, "Theoretical Workspace Area: {:.2} square units", self.theoretical_area)?;
        writeln!(f, "Workspace points: {}", self.samples)?;
        writeln!(f, "Distance Statistics:")?;
        writeln!(f, "  Mean distance: {:.2}", self.distance.mean)?;
        writeln!(f, "  Std deviation: {:.2}", self.distance.std)?;
        writeln!(f, "  Min distance: {:.2}", self.distance.min)?;
        writeln!(f, "  Max distance: {:.2}", self.distance.max)?;
        writeln!(f, "Manipulability Statistics:")?;
        writeln!(f, "  Mean manipulability: {:.4}", self.manipulability.mean)?;
        writeln!(f, "  Std deviation: {:.4}", self.manipulability.std)?;
        write!(f, "  Max manipulability: {:.4}", self.manipulability.max)
    }
}

/// Distance histogram with equal width bins between the smallest and the largest value.
/// The last bin includes its upper edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Histogram {
        assert!(bins > 0, "Histogram needs at least one bin.");
        let (mut low, mut high) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        if values.is_empty() {
            (low, high) = (0.0, 1.0);
        } else if low == high {
            (low, high) = (low - 0.5, high + 0.5);
        }

        let width = (high - low) / bins as f64;
        let edges = (0..=bins).map(|i| low + width * i as f64).collect();
        let mut counts = vec![0; bins];
        for v in values {
            let bin = (((v - low) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }
        Histogram { edges, counts }
    }
}

/// Count of samples per quadrant, counterclockwise from the one with x >= 0 and y >= 0.
/// Points on the axes go to the quadrant on the non-negative side.
pub fn quadrant_counts(samples: &[WorkspaceSample]) -> [usize; 4] {
    let mut counts = [0; 4];
    for s in samples {
        let quadrant = match (s.x >= 0.0, s.y >= 0.0) {
            (true, true) => 0,
            (false, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        };
        counts[quadrant] += 1;
    }
    counts
}

pub fn distance_histogram(samples: &[WorkspaceSample], bins: usize) -> Histogram {
    let distances: Vec<f64> = samples.iter().map(WorkspaceSample::distance).collect();
    Histogram::new(&distances, bins)
}

/// Grid coordinates from `min` to `max` inclusive in steps of `resolution`.
fn axis(range: (f64, f64), resolution: f64) -> Vec<f64> {
    let (min, max) = range;
    if max < min {
        return Vec::new();
    }
    // Tolerance keeps the upper end when the span is a multiple of the resolution
    let count = ((max - min) / resolution + 1e-9).floor() as usize + 1;
    (0..count).map(|i| min + resolution * i as f64).collect()
}

/// Analyzer of the two-link arm with link lengths `l1` and `l2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkspaceAnalyzer {
    l1: f64,
    l2: f64,
}

impl WorkspaceAnalyzer {
    pub fn new(l1: f64, l2: f64) -> Result<Self, ChainError> {
        validate_link_lengths(&[l1, l2])?;
        Ok(WorkspaceAnalyzer { l1, l2 })
    }

    pub fn link_lengths(&self) -> (f64, f64) {
        (self.l1, self.l2)
    }

    fn sample(&self, theta1: f64, theta2: f64) -> WorkspaceSample {
        let (end, _) = forward_kinematics(&[self.l1, self.l2], &[theta1, theta2]);
        WorkspaceSample {
            x: end.x,
            y: end.y,
            theta1,
            theta2,
        }
    }

    /// Forward kinematics on the uniform grid over `[0, 2π) x [-π, π)`, exactly
    /// `theta1_resolution * theta2_resolution` samples, theta1 major. The order is the same
    /// with and without parallel sampling.
    pub fn sample_workspace(
        &self,
        theta1_resolution: usize,
        theta2_resolution: usize,
    ) -> Vec<WorkspaceSample> {
        let total = theta1_resolution * theta2_resolution;
        debug!("Sampling {} configurations", total);
        let step1 = 2.0 * PI / theta1_resolution.max(1) as f64;
        let step2 = 2.0 * PI / theta2_resolution.max(1) as f64;

        let at = |k: usize| {
            let (i, j) = (k / theta2_resolution, k % theta2_resolution);
            self.sample(step1 * i as f64, -PI + step2 * j as f64)
        };

        #[cfg(feature = "parallel")]
        let samples: Vec<WorkspaceSample> = (0..total).into_par_iter().map(at).collect();
        #[cfg(not(feature = "parallel"))]
        let samples: Vec<WorkspaceSample> = (0..total).map(at).collect();
        samples
    }

    /// Attempts inverse kinematics for every grid point of the bounding box, `min` and `max`
    /// included. Row index follows y, column index follows x.
    ///
    /// # Panics
    /// If `resolution` is not positive.
    pub fn reachability_grid(
        &self,
        x_range: (f64, f64),
        y_range: (f64, f64),
        resolution: f64,
    ) -> ReachabilityGrid {
        assert!(resolution > 0.0, "Grid resolution must be positive, not {}", resolution);
        let xs = axis(x_range, resolution);
        let ys = axis(y_range, resolution);
        let cells = DMatrix::from_fn(ys.len(), xs.len(), |row, column| {
            inverse_kinematics_2link(self.l1, self.l2, xs[column], ys[row]).is_some()
        });
        ReachabilityGrid { xs, ys, cells }
    }

    pub fn jacobian(&self, theta1: f64, theta2: f64) -> Matrix2<f64> {
        jacobian::jacobian(self.l1, self.l2, theta1, theta2)
    }

    pub fn manipulability(&self, theta1: f64, theta2: f64) -> f64 {
        jacobian::manipulability(self.l1, self.l2, theta1, theta2)
    }

    pub fn manipulabilities(&self, samples: &[WorkspaceSample]) -> Vec<f64> {
        let index = |s: &WorkspaceSample| self.manipulability(s.theta1, s.theta2);

        #[cfg(feature = "parallel")]
        let values: Vec<f64> = samples.par_iter().map(index).collect();
        #[cfg(not(feature = "parallel"))]
        let values: Vec<f64> = samples.iter().map(index).collect();
        values
    }

    /// Area of the annulus between the minimum and maximum reach.
    pub fn theoretical_area(&self) -> f64 {
        let (min_reach, max_reach) = reach_limits(self.l1, self.l2);
        PI * (max_reach * max_reach - min_reach * min_reach)
    }

    /// Monte Carlo estimate of the reachable area from `samples` uniform points in the
    /// square circumscribing the outer circle.
    pub fn estimate_area<R: Rng>(&self, samples: usize, rng: &mut R) -> f64 {
        if samples == 0 {
            return 0.0;
        }
        let (_, max_reach) = reach_limits(self.l1, self.l2);
        let hits = (0..samples)
            .filter(|_| {
                let x = rng.gen_range(-max_reach..=max_reach);
                let y = rng.gen_range(-max_reach..=max_reach);
                inverse_kinematics_2link(self.l1, self.l2, x, y).is_some()
            })
            .count();
        let square = 4.0 * max_reach * max_reach;
        square * hits as f64 / samples as f64
    }

    /// Statistics over the default joint space sample.
    pub fn workspace_statistics(&self) -> WorkspaceStatistics {
        let samples = self.sample_workspace(THETA1_RESOLUTION, THETA2_RESOLUTION);
        self.statistics(&samples)
    }

    /// Statistics over the given sample.
    pub fn statistics(&self, samples: &[WorkspaceSample]) -> WorkspaceStatistics {
        let (min_reach, max_reach) = reach_limits(self.l1, self.l2);
        let distances: Vec<f64> = samples.iter().map(WorkspaceSample::distance).collect();
        WorkspaceStatistics {
            l1: self.l1,
            l2: self.l2,
            max_reach,
            min_reach,
            theoretical_area: self.theoretical_area(),
            samples: samples.len(),
            distance: Summary::of(&distances),
            manipulability: Summary::of(&self.manipulabilities(samples)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn analyzer() -> WorkspaceAnalyzer {
        WorkspaceAnalyzer::new(3.0, 2.0).unwrap()
    }

    #[test]
    fn test_sample_count_and_order() {
        let samples = analyzer().sample_workspace(8, 4);
        assert_eq!(samples.len(), 32);
        assert_eq!((samples[0].theta1, samples[0].theta2), (0.0, -PI));
        assert_eq!(samples[1].theta1, 0.0);
        assert!((samples[1].theta2 + PI / 2.0).abs() < 1e-12);
        assert!((samples[4].theta1 - PI / 4.0).abs() < 1e-12);
        // Half open: the upper ends are never sampled
        assert!(samples.iter().all(|s| s.theta1 < 2.0 * PI && s.theta2 < PI));
    }

    #[test]
    fn test_samples_match_nested_loop() {
        let a = analyzer();
        let samples = a.sample_workspace(13, 7);
        let mut k = 0;
        for i in 0..13 {
            for j in 0..7 {
                let theta1 = 2.0 * PI / 13.0 * i as f64;
                let theta2 = -PI + 2.0 * PI / 7.0 * j as f64;
                let expected = a.sample(theta1, theta2);
                assert_eq!(samples[k], expected);
                k += 1;
            }
        }
    }

    #[test]
    fn test_empty_sample() {
        assert!(analyzer().sample_workspace(0, 10).is_empty());
        let stats = analyzer().statistics(&[]);
        assert_eq!(stats.samples, 0);
        assert_eq!(stats.distance, Summary::default());
    }

    #[test]
    fn test_grid_axes_inclusive() {
        let grid = analyzer().reachability_grid((-6.0, 6.0), (-6.0, 6.0), 0.2);
        assert_eq!(grid.xs.len(), 61);
        assert!((grid.xs[60] - 6.0).abs() < 1e-9);
        assert_eq!(grid.cells.shape(), (61, 61));
    }

    #[test]
    fn test_grid_rows_follow_y() {
        let grid = analyzer().reachability_grid((0.0, 1.0), (-5.0, 4.5), 0.5);
        assert_eq!(grid.ys.len(), 20);
        assert_eq!(grid.xs.len(), 3);
        let last = grid.ys.len() - 1;
        assert!(grid.is_reachable(last, 0));
        assert!(grid.is_reachable(0, 0));
        // (0, -0.5) lies in the hole
        let hole = grid.ys.iter().position(|y| (y + 0.5).abs() < 1e-9).unwrap();
        assert!(!grid.is_reachable(hole, 0));
        assert!(grid.is_reachable(hole - 2, 0));
    }

    #[test]
    fn test_grid_reachable_count() {
        let grid = analyzer().reachability_grid((-6.0, 6.0), (-6.0, 6.0), 0.1);
        let area = grid.reachable_area(0.1);
        let expected = analyzer().theoretical_area();
        assert!((area - expected).abs() / expected < 0.02, "{} vs {}", area, expected);
        assert!(!grid.is_reachable(60, 60));
    }

    #[test]
    fn test_grid_display() {
        let grid = analyzer().reachability_grid((4.0, 6.0), (0.0, 0.0), 1.0);
        assert_eq!(grid.to_string(), "##.\n");
    }

    #[test]
    fn test_statistics() {
        let stats = analyzer().workspace_statistics();
        assert_eq!(stats.samples, 5000);
        assert!(stats.distance.min >= 1.0 - 1e-9);
        assert!(stats.distance.max <= 5.0 + 1e-9);
        // theta2 = -π is sampled: the folded arm sits on the inner circle
        assert!((stats.distance.min - 1.0).abs() < 1e-9);
        assert!((stats.distance.max - 5.0).abs() < 1e-9);
        assert!(stats.manipulability.min >= 0.0);
        assert!(stats.manipulability.max <= 6.0 + 1e-9);
        assert!((stats.theoretical_area - 24.0 * PI).abs() < 1e-9);
        assert!(stats.to_string().contains("Maximum Reach: 5.00"));
    }

    #[test]
    fn test_summary_population_std() {
        let summary = Summary::of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.std, 2.0);
        assert_eq!((summary.min, summary.max), (2.0, 9.0));
    }

    #[test]
    fn test_estimate_area() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = analyzer();
        let estimate = a.estimate_area(20_000, &mut rng);
        let expected = a.theoretical_area();
        assert!((estimate - expected).abs() / expected < 0.05, "{} vs {}", estimate, expected);
    }

    #[test]
    fn test_quadrants_and_histogram() {
        let samples = analyzer().sample_workspace(40, 20);
        let quadrants = quadrant_counts(&samples);
        assert_eq!(quadrants.iter().sum::<usize>(), 800);
        assert!(quadrants.iter().all(|q| *q > 100));

        let histogram = distance_histogram(&samples, 50);
        assert_eq!(histogram.edges.len(), 51);
        assert_eq!(histogram.counts.iter().sum::<usize>(), 800);
        assert!((histogram.edges[0] - 1.0).abs() < 1e-9);
        assert!((histogram.edges[50] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_value_histogram() {
        let histogram = Histogram::new(&[3.0, 3.0], 4);
        assert_eq!(histogram.counts.iter().sum::<usize>(), 2);
        assert_eq!(histogram.edges[0], 2.5);
    }

    #[test]
    fn test_invalid_links() {
        assert!(WorkspaceAnalyzer::new(3.0, 0.0).is_err());
    }
}
