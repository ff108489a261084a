//! Tuning knobs for the projection and intersection algorithms.
//!
//! Both configs deserialize with `#[serde(default)]`, so a driver may supply
//! only the fields it wants to override.

use serde::{Deserialize, Serialize};

use crate::Tolerance;

/// Settings for point-on-surface and point-on-curve projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Model-space distance below which the projected point coincides with
    /// the query point, and minimum Newton step length in model space.
    pub tolerance: f64,
    /// Upper bound on the cosine between the residual and each tangent for
    /// the residual to count as orthogonal to the surface.
    pub cosine_tolerance: f64,
    /// Newton iteration limit.
    pub max_iterations: usize,
    /// Seed grid subdivisions per non-empty knot span and direction.
    pub samples_per_span: usize,
    /// Chord deviation of the polyline that seeds curve projection.
    pub flatness: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            cosine_tolerance: 1e-8,
            max_iterations: 50,
            samples_per_span: 8,
            flatness: 1e-3,
        }
    }
}

impl ProjectionConfig {
    /// Coarser seed grid and fewer iterations for interactive use.
    pub fn fast() -> Self {
        Self {
            max_iterations: 20,
            samples_per_span: 4,
            ..Self::default()
        }
    }

    /// Denser seed grid for surfaces with strong curvature inside a span.
    pub fn robust() -> Self {
        Self {
            max_iterations: 100,
            samples_per_span: 16,
            flatness: 1e-4,
            ..Self::default()
        }
    }
}

/// Settings for the curve-grid intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionConfig {
    /// Root precision and the distance under which two parameters merge.
    pub tolerance: f64,
    /// Also report the curve's own interior knots.
    pub include_curve_knots: bool,
    /// Sample intervals per curve span; `None` uses `2 * (degree + 1)`.
    pub samples_per_span: Option<usize>,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default().coincidence,
            include_curve_knots: false,
            samples_per_span: None,
        }
    }
}

impl IntersectionConfig {
    pub fn with_curve_knots() -> Self {
        Self {
            include_curve_knots: true,
            ..Self::default()
        }
    }

    /// Sample count for a curve of the given degree, at least one.
    pub fn samples_for_degree(&self, degree: usize) -> usize {
        self.samples_per_span.unwrap_or(2 * (degree + 1)).max(1)
    }
}
