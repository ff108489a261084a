//! Closest-point queries on curves and surfaces.
//!
//! Surface projection runs in two phases: a [`SeedGrid`] picks the nearest
//! precomputed sample, then Newton iteration refines it. Non-convergence is
//! reported through [`ProjectionResult::success`], never as an error.

pub mod curve;
pub mod seed;
pub mod surface;

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point3d;

pub use curve::PointOnCurveProjection;
pub use seed::SeedGrid;
pub use surface::PointOnSurfaceProjection;

/// Outcome of a point-on-surface projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Whether `(u, v)` is a local closest point to the requested tolerance.
    /// On failure the remaining fields hold the best point found.
    pub success: bool,
    pub u: f64,
    pub v: f64,
    pub point: Point3d,
    /// Distance from the query point to `point`.
    pub distance: f64,
    pub iterations: usize,
}

/// Outcome of a point-on-curve projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveProjectionResult<P> {
    pub parameter: f64,
    pub point: P,
    pub distance: f64,
}
