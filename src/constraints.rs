use std::f64::consts::PI;

/// Joint limits. Each joint may rotate from `from` to `to`; ranges may wrap around
/// through zero (from 300° to 60° is a valid 120° range).
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    /// Normalized lower limit. If more than upper limit, the range wraps-around through 0
    pub from: Vec<f64>,

    /// Normalized upper limit. If less than lower limit, the range wraps-around through 0
    pub to: Vec<f64>,
}

fn normalize(angle: f64) -> f64 {
    let two_pi = 2.0 * PI;
    ((angle % two_pi) + two_pi) % two_pi
}

impl Constraints {
    /// # Panics
    /// If `from` and `to` have different lengths.
    pub fn new(from: Vec<f64>, to: Vec<f64>) -> Self {
        assert_eq!(from.len(), to.len(), "Joint limits must have the same length");
        Constraints {
            from: from.into_iter().map(normalize).collect(),
            to: to.into_iter().map(normalize).collect(),
        }
    }

    /// Number of joints the limits are given for.
    pub fn dof(&self) -> usize {
        self.from.len()
    }

    pub fn compliant(&self, angles: &[f64]) -> bool {
        if angles.len() != self.dof() {
            return false;
        }
        for i in 0..self.dof() {
            if self.from[i] == self.to[i] {
                continue; // Joint without constraints, from == to
            }
            let angle = normalize(angles[i]);
            if self.from[i] <= self.to[i] {
                if !(angle >= self.from[i] && angle <= self.to[i]) {
                    return false;
                }
            } else if !(angle >= self.from[i] || angle <= self.to[i]) {
                return false;
            }
        }
        true
    }
}
