use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A closed parameter interval `[t0, t1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub t0: f64,
    pub t1: f64,
}

impl Interval {
    pub fn new(t0: f64, t1: f64) -> Self {
        Self { t0, t1 }
    }

    pub fn min(&self) -> f64 {
        self.t0.min(self.t1)
    }

    pub fn max(&self) -> f64 {
        self.t0.max(self.t1)
    }

    pub fn length(&self) -> f64 {
        self.t1 - self.t0
    }

    pub fn contains(&self, t: f64) -> bool {
        self.min() <= t && t <= self.max()
    }

    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.min(), self.max())
    }

    /// Maps a normalized parameter in `[0, 1]` into the interval.
    pub fn parameter_at(&self, normalized: f64) -> f64 {
        self.t0 + normalized * (self.t1 - self.t0)
    }

    /// Maps `t` to its normalized position, `0` at `t0` and `1` at `t1`.
    pub fn normalized_at(&self, t: f64) -> f64 {
        let length = self.length();
        if length == 0.0 {
            0.0
        } else {
            (t - self.t0) / length
        }
    }

    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        let t0 = self.min().max(other.min());
        let t1 = self.max().min(other.max());
        (t0 < t1).then(|| Interval::new(t0, t1))
    }

    /// Clamps `t` when it lies at most `slack` outside the interval; anything
    /// further out (or NaN) is an [`GeometryError::OutOfDomain`].
    pub fn checked_clamp(&self, t: f64, slack: f64) -> Result<f64, GeometryError> {
        if t.is_nan() || t < self.min() - slack || t > self.max() + slack {
            return Err(GeometryError::OutOfDomain {
                parameter: t,
                min: self.min(),
                max: self.max(),
            });
        }
        Ok(self.clamp(t))
    }
}
