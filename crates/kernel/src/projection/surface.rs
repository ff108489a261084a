use nalgebra::{Matrix2, Vector2};
use tracing::{debug, instrument, trace};

use super::ProjectionResult;
use super::seed::SeedGrid;
use crate::config::ProjectionConfig;
use crate::geometry::SurfaceEval;
use crate::geometry::interval::Interval;
use crate::geometry::point::Point3d;

/// Closest point on a surface to arbitrary query points.
///
/// The seed grid is sampled once on construction; each query is then a
/// grid lookup followed by Newton iteration on the orthogonality conditions
/// `(S - P) . S_u = 0` and `(S - P) . S_v = 0`.
#[derive(Debug, Clone)]
pub struct PointOnSurfaceProjection<S> {
    surface: S,
    config: ProjectionConfig,
    seeds: SeedGrid,
}

const MAX_STEP_HALVINGS: usize = 10;

/// True when `t` sits on a domain end and the distance gradient along the
/// parameter points out of the domain, so the constraint is active.
fn pinned(t: f64, gradient: f64, domain: &Interval) -> bool {
    (t <= domain.t0 && gradient >= 0.0) || (t >= domain.t1 && gradient <= 0.0)
}

/// `|a . b| / (|a| |b|)` from precomputed parts; 0 for a zero vector.
fn cosine(dot: f64, length_a: f64, length_b: f64) -> f64 {
    let denominator = length_a * length_b;
    if denominator == 0.0 {
        0.0
    } else {
        dot.abs() / denominator
    }
}

/// 1D Newton step `-gradient / curvature`, `None` when the curvature vanishes.
fn newton_step_1d(gradient: f64, curvature: f64) -> Option<f64> {
    let step = -gradient / curvature;
    step.is_finite().then_some(step)
}

impl<S: SurfaceEval> PointOnSurfaceProjection<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, ProjectionConfig::default())
    }

    #[instrument(skip(surface))]
    pub fn with_config(surface: S, config: ProjectionConfig) -> Self {
        let seeds = SeedGrid::new(&surface, config.samples_per_span);
        Self {
            surface,
            config,
            seeds,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn seeds(&self) -> &SeedGrid {
        &self.seeds
    }

    /// Parameters of the grid sample closest to `point`.
    pub fn seed(&self, point: &Point3d) -> (f64, f64) {
        match self.seeds.closest(point) {
            Some(sample) => (sample.u, sample.v),
            None => (self.surface.domain_u().t0, self.surface.domain_v().t0),
        }
    }

    /// Project `point` onto the surface: seed search, then refinement.
    #[instrument(skip(self, point), fields(point = ?[point.x, point.y, point.z]))]
    pub fn get(&self, point: &Point3d) -> ProjectionResult {
        let (u, v) = self.seed(point);
        self.refine(point, u, v)
    }

    /// Newton refinement from `(u, v)`.
    ///
    /// Steps are clamped to the domain and halved while they increase the
    /// distance. While an iterate sits on a domain edge with the gradient
    /// pointing outward, only the free parameter is updated. Returns the best
    /// point found when the iteration fails.
    pub fn refine(&self, point: &Point3d, u: f64, v: f64) -> ProjectionResult {
        let tolerance = self.config.tolerance;
        let cosine_tolerance = self.config.cosine_tolerance;
        let domain_u = self.surface.domain_u();
        let domain_v = self.surface.domain_v();

        let mut u = domain_u.clamp(u);
        let mut v = domain_v.clamp(v);
        let mut stalled = false;
        let mut best = ProjectionResult {
            success: false,
            u,
            v,
            point: *point,
            distance: f64::INFINITY,
            iterations: 0,
        };

        for iteration in 0..=self.config.max_iterations {
            let ders = self.surface.evaluate_derivatives(u, v, 2, 2);
            let s = ders.point();
            let r = s - *point;
            let distance = r.length();
            let current = ProjectionResult {
                success: false,
                u,
                v,
                point: s,
                distance,
                iterations: iteration,
            };
            if distance < best.distance {
                best = current;
            }

            if distance < tolerance {
                return ProjectionResult {
                    success: true,
                    ..current
                };
            }

            let su = ders.get(1, 0);
            let sv = ders.get(0, 1);
            let f = r.dot(&su);
            let g = r.dot(&sv);

            let pinned_u = pinned(u, f, &domain_u);
            let pinned_v = pinned(v, g, &domain_v);
            let orthogonal_u = pinned_u || cosine(f, distance, su.length()) < cosine_tolerance;
            let orthogonal_v = pinned_v || cosine(g, distance, sv.length()) < cosine_tolerance;

            if orthogonal_u && orthogonal_v {
                return ProjectionResult {
                    success: true,
                    ..current
                };
            }

            if stalled || iteration == self.config.max_iterations {
                break;
            }

            // Newton solves for any stationary point of the distance. When its
            // step does not descend, use the Gauss-Newton matrix instead; it
            // drops the curvature terms and is positive semi-definite.
            let solve = |juu: f64, juv: f64, jvv: f64| {
                if pinned_u {
                    newton_step_1d(g, jvv).map(|dv| (0.0, dv))
                } else if pinned_v {
                    newton_step_1d(f, juu).map(|du| (du, 0.0))
                } else {
                    Matrix2::new(juu, juv, juv, jvv)
                        .lu()
                        .solve(&Vector2::new(-f, -g))
                        .filter(|delta| delta.iter().all(|d| d.is_finite()))
                        .map(|delta| (delta[0], delta[1]))
                }
            };
            if pinned_u || pinned_v {
                debug!(u, v, pinned_u, pinned_v, "newton restricted to boundary");
            }

            let (guu, guv, gvv) = (su.dot(&su), su.dot(&sv), sv.dot(&sv));
            let step = solve(
                guu + r.dot(&ders.get(2, 0)),
                guv + r.dot(&ders.get(1, 1)),
                gvv + r.dot(&ders.get(0, 2)),
            )
            .filter(|&(du, dv)| f * du + g * dv < 0.0)
            .or_else(|| {
                trace!(iteration, u, v, "newton step does not descend");
                solve(guu, guv, gvv)
            });

            let Some((du, dv)) = step else {
                debug!(u, v, "singular newton system");
                break;
            };

            // Backtrack towards (u, v) while the step moves uphill.
            let mut next_u = domain_u.clamp(u + du);
            let mut next_v = domain_v.clamp(v + dv);
            for _ in 0..MAX_STEP_HALVINGS {
                let trial = self.surface.evaluate(next_u, next_v).distance_to(point);
                if trial <= distance + tolerance {
                    break;
                }
                next_u = 0.5 * (u + next_u);
                next_v = 0.5 * (v + next_v);
            }

            let model_step = (su * (next_u - u) + sv * (next_v - v)).length();
            trace!(iteration, u, v, distance, model_step, "newton step");

            stalled = model_step < tolerance;
            u = next_u;
            v = next_v;
        }

        debug!(
            u = best.u,
            v = best.v,
            distance = best.distance,
            "projection did not converge"
        );
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::nurbs::NurbsSurfaceGeometry;
    use approx::assert_relative_eq;

    /// Paraboloid-like bump over [0, 1] x [0, 1].
    fn dome() -> NurbsSurfaceGeometry {
        let mut poles = Vec::new();
        for i in 0..3 {
            for j in 0..3 {
                let z = if (i, j) == (1, 1) { 1.0 } else { 0.0 };
                poles.push(Point3d::new(i as f64 * 0.5, j as f64 * 0.5, z));
            }
        }
        NurbsSurfaceGeometry::new(
            2,
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            3,
            3,
            poles,
        )
        .unwrap()
    }

    #[test]
    fn test_point_on_surface_round_trip() {
        let surface = dome();
        let projection = PointOnSurfaceProjection::new(&surface);
        for &(u0, v0) in &[(0.3, 0.6), (0.05, 0.9), (0.5, 0.5), (0.99, 0.01)] {
            let target = surface.evaluate(u0, v0);
            let result = projection.get(&target);
            assert!(result.success, "failed at ({u0}, {v0})");
            assert_relative_eq!(result.u, u0, epsilon = 1e-7);
            assert_relative_eq!(result.v, v0, epsilon = 1e-7);
            assert!(result.distance < 1e-9);
        }
    }

    #[test]
    fn test_point_above_surface_is_orthogonal() {
        let surface = dome();
        let projection = PointOnSurfaceProjection::new(&surface);
        let result = projection.get(&Point3d::new(0.5, 0.5, 3.0));
        assert!(result.success);
        assert_relative_eq!(result.u, 0.5, epsilon = 1e-7);
        assert_relative_eq!(result.v, 0.5, epsilon = 1e-7);
        assert_relative_eq!(result.distance, 2.75, epsilon = 1e-9);
    }

    #[test]
    fn test_point_beyond_corner_clamps() {
        let surface = dome();
        let projection = PointOnSurfaceProjection::new(&surface);
        let result = projection.get(&Point3d::new(-5.0, -5.0, -1.0));
        assert!(result.success);
        assert_eq!((result.u, result.v), (0.0, 0.0));
        assert!(result.point.distance_to(&Point3d::ORIGIN) < 1e-12);
    }

    #[test]
    fn test_point_beyond_edge_slides_along_boundary() {
        let surface = dome();
        let projection = PointOnSurfaceProjection::new(&surface);
        // Beyond the u = 0 edge, which is the straight line x = 0, z = 0.
        let result = projection.get(&Point3d::new(-3.0, 0.3, 0.0));
        assert!(result.success);
        assert_eq!(result.u, 0.0);
        assert!((result.point.y - 0.3).abs() < 1e-7);
    }

    #[test]
    fn test_refine_from_poor_seed() {
        let surface = dome();
        let projection = PointOnSurfaceProjection::new(&surface);
        let target = surface.evaluate(0.4, 0.45);
        let result = projection.refine(&target, 0.5, 0.5);
        assert!(result.success);
        assert!(result.iterations > 0);
        assert_relative_eq!(result.u, 0.4, epsilon = 1e-7);
    }

    #[test]
    fn test_failure_reports_best_point() {
        let surface = dome();
        let config = ProjectionConfig {
            max_iterations: 0,
            ..ProjectionConfig::default()
        };
        let projection = PointOnSurfaceProjection::with_config(&surface, config);
        let target = Point3d::new(0.37, 0.61, 0.2);
        let (u, v) = projection.seed(&target);
        let result = projection.refine(&target, u + 0.01, v);
        assert!(!result.success);
        assert_eq!(result.iterations, 0);
        assert!(result.distance.is_finite());
    }

    #[test]
    fn test_point_below_dome_leaves_the_crest() {
        // Far below the dome the distance Hessian is indefinite and a plain
        // Newton step from near the crest climbs onto it.
        let surface = dome();
        let projection = PointOnSurfaceProjection::new(&surface);
        let target = Point3d::new(0.5, 0.5, -50.0);
        let result = projection.refine(&target, 0.45, 0.5);
        assert!(result.success);
        assert_eq!(result.u, 0.0);
        assert_relative_eq!(result.v, 0.5, epsilon = 1e-7);
        assert_relative_eq!(result.distance, (0.25_f64 + 2500.0).sqrt(), epsilon = 1e-9);
    }
}
