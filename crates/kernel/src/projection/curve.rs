use tracing::{debug, instrument, trace};

use super::CurveProjectionResult;
use crate::config::ProjectionConfig;
use crate::geometry::CurveEval;
use crate::geometry::point::Position;
use crate::geometry::tessellation::{CurvePolyline, tessellate_curve};
use crate::geometry::vector::VectorSpace;

/// Closest point on a curve, seeded from an adaptive polyline.
#[derive(Debug, Clone)]
pub struct PointOnCurveProjection<C: CurveEval> {
    curve: C,
    config: ProjectionConfig,
    polyline: CurvePolyline<C::Point>,
}

impl<C: CurveEval> PointOnCurveProjection<C> {
    pub fn new(curve: C) -> Self {
        Self::with_config(curve, ProjectionConfig::default())
    }

    #[instrument(skip(curve))]
    pub fn with_config(curve: C, config: ProjectionConfig) -> Self {
        let polyline = tessellate_curve(&curve, config.flatness);
        Self {
            curve,
            config,
            polyline,
        }
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn polyline(&self) -> &CurvePolyline<C::Point> {
        &self.polyline
    }

    /// Project `sample` onto the curve.
    ///
    /// Newton stops once the point coincides or the residual is orthogonal
    /// to the tangent within `5 * tolerance`. A domain end closer than the
    /// Newton result wins.
    #[instrument(skip(self, sample))]
    pub fn get(&self, sample: &C::Point) -> CurveProjectionResult<C::Point> {
        let domain = self.curve.domain();
        let tolerance = self.config.tolerance;
        let cosine_tolerance = 5.0 * tolerance;

        let mut t = self
            .polyline
            .closest_point(sample)
            .map_or(domain.t0, |(t, _)| t);

        for iteration in 0..self.config.max_iterations {
            let ders = self.curve.evaluate_derivatives(t, 2);
            let r = ders[0] - sample.to_vector();
            let distance = r.length();
            let tangent_dot = ders[1].dot(&r);
            let denominator = ders[1].length() * distance;
            let cosine = if denominator == 0.0 {
                0.0
            } else {
                tangent_dot.abs() / denominator
            };

            if distance < tolerance || cosine < cosine_tolerance {
                break;
            }

            let delta = tangent_dot / (ders[2].dot(&r) + ders[1].length_squared());
            if !delta.is_finite() {
                debug!(t, "degenerate curve derivative");
                break;
            }
            let next = domain.clamp(t - delta);
            trace!(iteration, t, distance, "newton step");
            if next == t {
                break;
            }
            t = next;
        }

        let mut best = CurveProjectionResult {
            parameter: t,
            point: self.curve.evaluate(t),
            distance: 0.0,
        };
        best.distance = best.point.distance_to(sample);

        for end in [domain.t0, domain.t1] {
            let point = self.curve.evaluate(end);
            let distance = point.distance_to(sample);
            if distance < best.distance {
                best = CurveProjectionResult {
                    parameter: end,
                    point,
                    distance,
                };
            }
        }
        best
    }
}
