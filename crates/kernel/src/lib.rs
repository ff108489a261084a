//! NURBS evaluation, closest-point projection and curve-grid intersection
//! for isogeometric analysis.

pub mod config;
pub mod error;
pub mod geometry;
pub mod intersection;
pub mod model;
pub mod projection;

// Re-export key types at crate root for convenience.
pub use config::{IntersectionConfig, ProjectionConfig};
pub use error::GeometryError;
pub use geometry::{CurveEval, SurfaceEval};
pub use intersection::{curve_span_intersection, curve_span_intersection_with};
pub use model::{GeometryId, Model};
pub use projection::{PointOnCurveProjection, PointOnSurfaceProjection, ProjectionResult};

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident (model units).
    pub coincidence: f64,
    /// Parameter-space tolerance for curve/surface evaluations.
    pub parametric: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-7,
            parametric: 1e-9,
        }
    }
}
