use serde::{Deserialize, Serialize};

use super::basis::{BasisFunctions, SurfaceBasisFunctions};
use super::interval::Interval;
use super::knots::KnotVector;
use super::point::{Point2d, Point3d, Position, VectorOf};
use super::surfaces::SurfaceDerivatives;
use super::vector::{Vec3, VectorSpace};
use super::{CurveEval, SurfaceEval};
use crate::error::GeometryError;

fn check_finite_poles<P: Position>(poles: &[P]) -> Result<(), GeometryError> {
    let finite = poles.iter().all(|pole| {
        let v = pole.to_vector();
        (0..<VectorOf<P> as VectorSpace>::DIMENSION).all(|axis| v.component(axis).is_finite())
    });
    if finite {
        Ok(())
    } else {
        Err(GeometryError::NonFinite { context: "poles" })
    }
}

fn check_weights(weights: &[f64], expected: usize) -> Result<(), GeometryError> {
    if weights.len() != expected {
        return Err(GeometryError::WeightCount {
            expected,
            actual: weights.len(),
        });
    }
    if let Some((index, &weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w <= 0.0)
    {
        if !weight.is_finite() {
            return Err(GeometryError::NonFinite { context: "weights" });
        }
        return Err(GeometryError::NonPositiveWeight { index, weight });
    }
    Ok(())
}

/// A NURBS (Non-Uniform Rational B-Spline) curve with 2D or 3D poles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsCurveGeometry<P> {
    knots: KnotVector,
    poles: Vec<P>,
    /// `None` for a plain B-spline.
    weights: Option<Vec<f64>>,
}

pub type NurbsCurveGeometry2d = NurbsCurveGeometry<Point2d>;
pub type NurbsCurveGeometry3d = NurbsCurveGeometry<Point3d>;

impl<P: Position> NurbsCurveGeometry<P> {
    /// Create a non-rational B-spline curve. `knots` may use the full
    /// (`n + p + 1`) or the reduced (`n + p - 1`) convention.
    pub fn new(degree: usize, knots: Vec<f64>, poles: Vec<P>) -> Result<Self, GeometryError> {
        let knots = KnotVector::new(degree, poles.len(), knots)?;
        check_finite_poles(&poles)?;
        Ok(Self {
            knots,
            poles,
            weights: None,
        })
    }

    pub fn rational(
        degree: usize,
        knots: Vec<f64>,
        poles: Vec<P>,
        weights: Vec<f64>,
    ) -> Result<Self, GeometryError> {
        let mut curve = Self::new(degree, knots, poles)?;
        check_weights(&weights, curve.poles.len())?;
        curve.weights = Some(weights);
        Ok(curve)
    }

    /// Build from `(pole, weight)` pairs; rational only if some weight is not 1.
    pub fn from_control_points(
        degree: usize,
        knots: Vec<f64>,
        control_points: Vec<(P, f64)>,
    ) -> Result<Self, GeometryError> {
        let (poles, weights): (Vec<P>, Vec<f64>) = control_points.into_iter().unzip();
        if weights.iter().all(|&w| w == 1.0) {
            Self::new(degree, knots, poles)
        } else {
            Self::rational(degree, knots, poles, weights)
        }
    }

    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    pub fn nb_poles(&self) -> usize {
        self.poles.len()
    }

    pub fn poles(&self) -> &[P] {
        &self.poles
    }

    pub fn pole(&self, index: usize) -> P {
        self.poles[index]
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[index])
    }

    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }

    /// Parameter domain `[t_min, t_max]`.
    pub fn domain(&self) -> Interval {
        self.knots.domain()
    }

    pub fn spans(&self) -> Vec<Interval> {
        self.knots.spans()
    }

    /// Active pole indices with their (rational) basis values and
    /// derivatives up to `order`; `t` is clamped to the domain.
    pub fn shape_functions_at(&self, t: f64, order: usize) -> BasisFunctions {
        let t = self.domain().clamp(t);
        let mut basis = BasisFunctions::compute(&self.knots, t, order);
        if let Some(weights) = &self.weights {
            basis.rationalize(weights);
        }
        basis
    }

    /// Like `shape_functions_at`, but always on the knot span containing
    /// `span`; `t` is clamped to `span`.
    pub fn shape_functions_on_span(
        &self,
        span: &Interval,
        t: f64,
        order: usize,
    ) -> BasisFunctions {
        let index = self.knots.find_span(span.parameter_at(0.5));
        let mut basis =
            BasisFunctions::compute_at_span(&self.knots, index, span.clamp(t), order);
        if let Some(weights) = &self.weights {
            basis.rationalize(weights);
        }
        basis
    }

    pub fn evaluate_derivatives(&self, t: f64, order: usize) -> Vec<VectorOf<P>> {
        self.combine(&self.shape_functions_at(t, order), order)
    }

    pub fn evaluate_derivatives_on_span(
        &self,
        span: &Interval,
        t: f64,
        order: usize,
    ) -> Vec<VectorOf<P>> {
        self.combine(&self.shape_functions_on_span(span, t, order), order)
    }

    fn combine(&self, basis: &BasisFunctions, order: usize) -> Vec<VectorOf<P>> {
        (0..=order)
            .map(|k| {
                let mut sum = <VectorOf<P> as VectorSpace>::ZERO;
                for (local, index) in basis.nonzero_pole_indices().enumerate() {
                    sum += self.poles[index].to_vector() * basis.value(k, local);
                }
                sum
            })
            .collect()
    }

    pub fn evaluate(&self, t: f64) -> P {
        P::from_vector(self.evaluate_derivatives(t, 0)[0])
    }
}

impl<P: Position> CurveEval for NurbsCurveGeometry<P> {
    type Point = P;

    fn degree(&self) -> usize {
        NurbsCurveGeometry::degree(self)
    }

    fn domain(&self) -> Interval {
        NurbsCurveGeometry::domain(self)
    }

    fn spans(&self) -> Vec<Interval> {
        NurbsCurveGeometry::spans(self)
    }

    fn evaluate_derivatives(&self, t: f64, order: usize) -> Vec<VectorOf<P>> {
        NurbsCurveGeometry::evaluate_derivatives(self, t, order)
    }

    fn evaluate_derivatives_on_span(
        &self,
        span: &Interval,
        t: f64,
        order: usize,
    ) -> Vec<VectorOf<P>> {
        NurbsCurveGeometry::evaluate_derivatives_on_span(self, span, t, order)
    }
}

/// A tensor-product NURBS surface in 3D.
///
/// Poles are stored row-major: pole `(i, j)` (`i` along u) lives at
/// `i * nb_poles_v + j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsSurfaceGeometry {
    knots_u: KnotVector,
    knots_v: KnotVector,
    nb_poles_u: usize,
    nb_poles_v: usize,
    poles: Vec<Point3d>,
    weights: Option<Vec<f64>>,
}

impl NurbsSurfaceGeometry {
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        nb_poles_u: usize,
        nb_poles_v: usize,
        poles: Vec<Point3d>,
    ) -> Result<Self, GeometryError> {
        let knots_u = KnotVector::new(degree_u, nb_poles_u, knots_u)?;
        let knots_v = KnotVector::new(degree_v, nb_poles_v, knots_v)?;
        if poles.len() != nb_poles_u * nb_poles_v {
            return Err(GeometryError::PoleGrid {
                nb_poles_u,
                nb_poles_v,
                actual: poles.len(),
            });
        }
        check_finite_poles(&poles)?;
        Ok(Self {
            knots_u,
            knots_v,
            nb_poles_u,
            nb_poles_v,
            poles,
            weights: None,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rational(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        nb_poles_u: usize,
        nb_poles_v: usize,
        poles: Vec<Point3d>,
        weights: Vec<f64>,
    ) -> Result<Self, GeometryError> {
        let mut surface = Self::new(
            degree_u, degree_v, knots_u, knots_v, nb_poles_u, nb_poles_v, poles,
        )?;
        check_weights(&weights, surface.poles.len())?;
        surface.weights = Some(weights);
        Ok(surface)
    }

    pub fn degree_u(&self) -> usize {
        self.knots_u.degree()
    }

    pub fn degree_v(&self) -> usize {
        self.knots_v.degree()
    }

    pub fn knots_u(&self) -> &KnotVector {
        &self.knots_u
    }

    pub fn knots_v(&self) -> &KnotVector {
        &self.knots_v
    }

    pub fn nb_poles_u(&self) -> usize {
        self.nb_poles_u
    }

    pub fn nb_poles_v(&self) -> usize {
        self.nb_poles_v
    }

    pub fn poles(&self) -> &[Point3d] {
        &self.poles
    }

    pub fn pole(&self, index_u: usize, index_v: usize) -> Point3d {
        self.poles[index_u * self.nb_poles_v + index_v]
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn weight(&self, index_u: usize, index_v: usize) -> f64 {
        self.weights
            .as_ref()
            .map_or(1.0, |w| w[index_u * self.nb_poles_v + index_v])
    }

    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }

    pub fn domain_u(&self) -> Interval {
        self.knots_u.domain()
    }

    pub fn domain_v(&self) -> Interval {
        self.knots_v.domain()
    }

    pub fn spans_u(&self) -> Vec<Interval> {
        self.knots_u.spans()
    }

    pub fn spans_v(&self) -> Vec<Interval> {
        self.knots_v.spans()
    }

    /// Tensor-product shape functions at `(u, v)`, clamped to the domain.
    pub fn shape_functions_at(
        &self,
        u: f64,
        v: f64,
        order_u: usize,
        order_v: usize,
    ) -> SurfaceBasisFunctions {
        let u = self.domain_u().clamp(u);
        let v = self.domain_v().clamp(v);
        let mut basis =
            SurfaceBasisFunctions::compute(&self.knots_u, &self.knots_v, u, v, order_u, order_v);
        if let Some(weights) = &self.weights {
            basis.rationalize(weights, self.nb_poles_v);
        }
        basis
    }

    pub fn evaluate_derivatives(
        &self,
        u: f64,
        v: f64,
        order_u: usize,
        order_v: usize,
    ) -> SurfaceDerivatives {
        let basis = self.shape_functions_at(u, v, order_u, order_v);
        let indices = basis.nonzero_pole_indices();
        let mut values = Vec::with_capacity((order_u + 1) * (order_v + 1));
        for k in 0..=order_u {
            for l in 0..=order_v {
                let mut sum = Vec3::ZERO;
                for (local, &(i, j)) in indices.iter().enumerate() {
                    sum += self.pole(i, j).to_vec3() * basis.value(k, l, local);
                }
                values.push(sum);
            }
        }
        SurfaceDerivatives::new(order_u, order_v, values)
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        self.evaluate_derivatives(u, v, 0, 0).point()
    }
}

impl SurfaceEval for NurbsSurfaceGeometry {
    fn degree_u(&self) -> usize {
        NurbsSurfaceGeometry::degree_u(self)
    }

    fn degree_v(&self) -> usize {
        NurbsSurfaceGeometry::degree_v(self)
    }

    fn domain_u(&self) -> Interval {
        NurbsSurfaceGeometry::domain_u(self)
    }

    fn domain_v(&self) -> Interval {
        NurbsSurfaceGeometry::domain_v(self)
    }

    fn spans_u(&self) -> Vec<Interval> {
        NurbsSurfaceGeometry::spans_u(self)
    }

    fn spans_v(&self) -> Vec<Interval> {
        NurbsSurfaceGeometry::spans_v(self)
    }

    fn evaluate_derivatives(
        &self,
        u: f64,
        v: f64,
        order_u: usize,
        order_v: usize,
    ) -> SurfaceDerivatives {
        NurbsSurfaceGeometry::evaluate_derivatives(self, u, v, order_u, order_v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_line_as_nurbs() -> NurbsCurveGeometry3d {
        // A degree-1 NURBS from (0,0,0) to (10,0,0)
        NurbsCurveGeometry::new(
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![Point3d::new(0.0, 0.0, 0.0), Point3d::new(10.0, 0.0, 0.0)],
        )
        .unwrap()
    }

    fn make_patch() -> NurbsSurfaceGeometry {
        let mut poles = Vec::new();
        let mut weights = Vec::new();
        for i in 0..3 {
            for j in 0..4 {
                let z = if (i, j) == (1, 2) { 1.5 } else { 0.2 * j as f64 };
                poles.push(Point3d::new(i as f64, j as f64, z));
                weights.push(1.0 + 0.1 * ((i + 2 * j) % 3) as f64);
            }
        }
        NurbsSurfaceGeometry::rational(
            2,
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0],
            3,
            4,
            poles,
            weights,
        )
        .unwrap()
    }

    #[test]
    fn test_nurbs_line_evaluate() {
        let c = make_line_as_nurbs();
        let p = c.evaluate(0.5);
        assert!((p.x - 5.0).abs() < 1e-10);
        assert!(p.y.abs() < 1e-10);
    }

    #[test]
    fn test_nurbs_line_endpoints() {
        let c = make_line_as_nurbs();
        let domain = c.domain();
        let p0 = c.evaluate(domain.t0);
        let p1 = c.evaluate(domain.t1);
        assert!(p0.distance_to(&Point3d::ORIGIN) < 1e-10);
        assert!((p1.x - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_nurbs_quadratic_curve() {
        // Degree-2 curve: a parabolic arc
        let c = NurbsCurveGeometry::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(5.0, 10.0, 0.0),
                Point3d::new(10.0, 0.0, 0.0),
            ],
        )
        .unwrap();
        let mid = c.evaluate(0.5);
        assert!((mid.x - 5.0).abs() < 1e-10);
        assert!((mid.y - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_nurbs_circle_via_rational() {
        // Quarter circle using rational NURBS (degree 2)
        let w = std::f64::consts::FRAC_1_SQRT_2;
        let c = NurbsCurveGeometry::rational(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![
                Point2d::new(1.0, 0.0),
                Point2d::new(1.0, 1.0),
                Point2d::new(0.0, 1.0),
            ],
            vec![1.0, w, 1.0],
        )
        .unwrap();

        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let ders = c.evaluate_derivatives(t, 1);
            let r = ders[0].length();
            assert!(
                (r - 1.0).abs() < 1e-12,
                "Point at t={} has radius {}, expected 1.0",
                t,
                r
            );
            // Tangent is perpendicular to the radius on a circle.
            assert!(ders[0].dot(&ders[1]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_reduced_knots_degree_four_curve() {
        let knots = vec![
            0.0,
            0.0,
            0.0,
            0.0,
            32.9731425998736,
            65.9462851997473,
            98.9194277996209,
            131.892570399495,
            131.892570399495,
            131.892570399495,
            131.892570399495,
        ];
        let poles = vec![
            Point3d::new(0.0, -25.0, -5.0),
            Point3d::new(-15.0, -15.0, 0.0),
            Point3d::new(5.0, -5.0, -3.0),
            Point3d::new(15.0, -15.0, 3.0),
            Point3d::new(25.0, 0.0, 6.0),
            Point3d::new(15.0, 15.0, 6.0),
            Point3d::new(-5.0, -5.0, -3.0),
            Point3d::new(-25.0, 15.0, 4.0),
        ];
        let curve = NurbsCurveGeometry::new(4, knots, poles).unwrap();
        let p = curve.point_at(65.9462851997).unwrap();
        assert_relative_eq!(p.x, 18.8888888889, epsilon = 1e-7);
        assert_relative_eq!(p.y, -6.1111111111, epsilon = 1e-7);
        assert_relative_eq!(p.z, 4.1666666667, epsilon = 1e-7);
    }

    #[test]
    fn test_curve_derivatives_match_finite_difference() {
        let c = NurbsCurveGeometry::rational(
            3,
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0, 2.0],
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 2.0, 0.5),
                Point3d::new(2.0, -1.0, 1.0),
                Point3d::new(3.0, 1.0, -0.5),
                Point3d::new(4.0, 0.0, 0.0),
            ],
            vec![1.0, 0.6, 1.8, 0.9, 1.0],
        )
        .unwrap();
        let h = 1e-6;
        let t = 1.3;
        let ders = c.evaluate_derivatives(t, 2);
        let plus = c.evaluate_derivatives(t + h, 1);
        let minus = c.evaluate_derivatives(t - h, 1);
        let fd1 = (plus[0] - minus[0]) / (2.0 * h);
        let fd2 = (plus[1] - minus[1]) / (2.0 * h);
        assert!((ders[1] - fd1).length() < 1e-6);
        assert!((ders[2] - fd2).length() < 1e-5);
    }

    #[test]
    fn test_span_derivatives_are_one_sided_at_c0_knot() {
        let c = NurbsCurveGeometry::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 2.0],
            vec![
                Point2d::new(0.0, 0.0),
                Point2d::new(1.0, 1.0),
                Point2d::new(2.0, 0.947),
                Point2d::new(3.0, 2.0),
                Point2d::new(4.0, 3.0),
            ],
        )
        .unwrap();
        let spans = c.spans();
        let left = c.evaluate_derivatives_on_span(&spans[0], 1.0, 1);
        let right = c.evaluate_derivatives_on_span(&spans[1], 1.0, 1);

        assert_relative_eq!(left[0].y, 0.947, epsilon = 1e-12);
        assert_relative_eq!(right[0].y, 0.947, epsilon = 1e-12);
        assert_relative_eq!(left[1].y, -0.106, epsilon = 1e-12);
        assert_relative_eq!(right[1].y, 2.106, epsilon = 1e-12);
        // The knot itself belongs to the later span.
        assert_eq!(c.evaluate_derivatives(1.0, 1), right);
    }

    #[test]
    fn test_point_at_rejects_out_of_domain() {
        let c = make_line_as_nurbs();
        assert!(matches!(
            c.point_at(1.5),
            Err(GeometryError::OutOfDomain { .. })
        ));
        assert!(c.point_at(1.0 + 1e-12).is_ok());
        assert!(c.derivatives_at(f64::NAN, 1).is_err());
    }

    #[test]
    fn test_construction_rejects_bad_input() {
        let poles = vec![Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0)];
        assert!(matches!(
            NurbsCurveGeometry::rational(1, vec![0.0, 0.0, 1.0, 1.0], poles.clone(), vec![1.0]),
            Err(GeometryError::WeightCount { .. })
        ));
        assert!(matches!(
            NurbsCurveGeometry::rational(1, vec![0.0, 0.0, 1.0, 1.0], poles.clone(), vec![1.0, 0.0]),
            Err(GeometryError::NonPositiveWeight { index: 1, .. })
        ));
        assert!(matches!(
            NurbsCurveGeometry::new(1, vec![0.0, 0.0, 1.0, 1.0], vec![Point2d::new(f64::INFINITY, 0.0), Point2d::new(1.0, 0.0)]),
            Err(GeometryError::NonFinite { .. })
        ));
        assert!(matches!(
            NurbsCurveGeometry::new(2, vec![0.0, 0.0, 1.0, 1.0], poles),
            Err(GeometryError::InvalidDegree { .. })
        ));
    }

    #[test]
    fn test_from_control_points_detects_rational() {
        let knots = vec![0.0, 0.0, 1.0, 1.0];
        let plain = NurbsCurveGeometry::from_control_points(
            1,
            knots.clone(),
            vec![(Point2d::new(0.0, 0.0), 1.0), (Point2d::new(1.0, 0.0), 1.0)],
        )
        .unwrap();
        assert!(!plain.is_rational());
        let weighted = NurbsCurveGeometry::from_control_points(
            1,
            knots,
            vec![(Point2d::new(0.0, 0.0), 1.0), (Point2d::new(1.0, 0.0), 3.0)],
        )
        .unwrap();
        assert!(weighted.is_rational());
        assert_eq!(weighted.weight(1), 3.0);
    }

    #[test]
    fn test_shape_functions_reproduce_point() {
        let c = make_line_as_nurbs();
        let basis = c.shape_functions_at(0.25, 1);
        assert_eq!(basis.nonzero_pole_indices(), 0..2);
        assert_relative_eq!(basis.value(0, 0), 0.75);
        assert_relative_eq!(basis.value(1, 1), 1.0);
    }

    #[test]
    fn test_surface_corners_interpolate_poles() {
        let s = make_patch();
        assert!(s.evaluate(0.0, 0.0).distance_to(&s.pole(0, 0)) < 1e-12);
        assert!(s.evaluate(1.0, 1.0).distance_to(&s.pole(2, 3)) < 1e-12);
        assert!(s.evaluate(0.0, 1.0).distance_to(&s.pole(0, 3)) < 1e-12);
    }

    #[test]
    fn test_surface_derivatives_match_finite_difference() {
        let s = make_patch();
        let (u, v) = (0.4, 0.7);
        let h = 1e-6;
        let ders = s.evaluate_derivatives(u, v, 2, 2);
        let su = (s.evaluate(u + h, v) - s.evaluate(u - h, v)) / (2.0 * h);
        let sv = (s.evaluate(u, v + h) - s.evaluate(u, v - h)) / (2.0 * h);
        assert!((ders.get(1, 0) - su).length() < 1e-6);
        assert!((ders.get(0, 1) - sv).length() < 1e-6);

        let suu = (s.evaluate_derivatives(u + h, v, 1, 0).get(1, 0)
            - s.evaluate_derivatives(u - h, v, 1, 0).get(1, 0))
            / (2.0 * h);
        let suv = (s.evaluate_derivatives(u, v + h, 1, 0).get(1, 0)
            - s.evaluate_derivatives(u, v - h, 1, 0).get(1, 0))
            / (2.0 * h);
        assert!((ders.get(2, 0) - suu).length() < 1e-5);
        assert!((ders.get(1, 1) - suv).length() < 1e-5);
    }

    #[test]
    fn test_surface_normal() {
        let flat = NurbsSurfaceGeometry::new(
            1,
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            2,
            2,
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(1.0, 1.0, 0.0),
            ],
        )
        .unwrap();
        let n = flat.normal_at(0.5, 0.5).unwrap().unwrap();
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-12);
        assert!(flat.normal_at(2.0, 0.5).is_err());
    }

    #[test]
    fn test_surface_rejects_pole_grid() {
        let err = NurbsSurfaceGeometry::new(
            1,
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            2,
            2,
            vec![Point3d::ORIGIN; 3],
        )
        .unwrap_err();
        assert_eq!(
            err,
            GeometryError::PoleGrid {
                nb_poles_u: 2,
                nb_poles_v: 2,
                actual: 3
            }
        );
    }
}
