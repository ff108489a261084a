pub mod basis;
pub mod curves;
pub mod interval;
pub mod knots;
pub mod nurbs;
pub mod point;
pub mod surfaces;
pub mod tessellation;
pub mod vector;

use crate::Tolerance;
use crate::error::GeometryError;
use interval::Interval;
use point::{Position, VectorOf};
use surfaces::SurfaceDerivatives;
use vector::Vec3;

/// How far outside a domain a parameter may lie and still be clamped.
pub(crate) fn parameter_slack(domain: &Interval) -> f64 {
    Tolerance::default().parametric * domain.length().abs().max(1.0)
}

/// Point and derivative evaluation of a parametric curve.
///
/// Implementors provide the clamped core (`evaluate_derivatives`); the
/// checked `point_at`/`derivatives_at` reject parameters outside the domain.
pub trait CurveEval: Send + Sync {
    type Point: Position;

    fn degree(&self) -> usize;

    fn domain(&self) -> Interval;

    /// Non-empty knot spans inside the domain.
    fn spans(&self) -> Vec<Interval>;

    /// Position and derivatives up to `order` at `t`, clamped to the domain.
    /// Index 0 holds the position as a vector from the origin.
    fn evaluate_derivatives(&self, t: f64, order: usize) -> Vec<VectorOf<Self::Point>>;

    /// Derivatives of the polynomial piece on `span`, one of `spans()`.
    /// Both closed ends use that piece, so at a knot this gives the one-sided
    /// derivatives of the span ending or starting there.
    fn evaluate_derivatives_on_span(
        &self,
        span: &Interval,
        t: f64,
        order: usize,
    ) -> Vec<VectorOf<Self::Point>>;

    fn evaluate(&self, t: f64) -> Self::Point {
        Self::Point::from_vector(self.evaluate_derivatives(t, 0)[0])
    }

    fn point_at(&self, t: f64) -> Result<Self::Point, GeometryError> {
        let domain = self.domain();
        let t = domain.checked_clamp(t, parameter_slack(&domain))?;
        Ok(self.evaluate(t))
    }

    fn derivatives_at(
        &self,
        t: f64,
        order: usize,
    ) -> Result<Vec<VectorOf<Self::Point>>, GeometryError> {
        let domain = self.domain();
        let t = domain.checked_clamp(t, parameter_slack(&domain))?;
        Ok(self.evaluate_derivatives(t, order))
    }
}

/// Point and derivative evaluation of a parametric surface in 3D.
pub trait SurfaceEval: Send + Sync {
    fn degree_u(&self) -> usize;

    fn degree_v(&self) -> usize;

    fn domain_u(&self) -> Interval;

    fn domain_v(&self) -> Interval;

    fn spans_u(&self) -> Vec<Interval>;

    fn spans_v(&self) -> Vec<Interval>;

    /// Mixed partials up to `(order_u, order_v)` at `(u, v)`, clamped to the
    /// domain.
    fn evaluate_derivatives(
        &self,
        u: f64,
        v: f64,
        order_u: usize,
        order_v: usize,
    ) -> SurfaceDerivatives;

    fn evaluate(&self, u: f64, v: f64) -> point::Point3d {
        self.evaluate_derivatives(u, v, 0, 0).point()
    }

    fn point_at(&self, u: f64, v: f64) -> Result<point::Point3d, GeometryError> {
        let (u, v) = self.checked_parameters(u, v)?;
        Ok(self.evaluate(u, v))
    }

    fn derivatives_at(
        &self,
        u: f64,
        v: f64,
        order_u: usize,
        order_v: usize,
    ) -> Result<SurfaceDerivatives, GeometryError> {
        let (u, v) = self.checked_parameters(u, v)?;
        Ok(self.evaluate_derivatives(u, v, order_u, order_v))
    }

    /// Unit normal `S_u x S_v`, `None` where the surface is degenerate.
    fn normal_at(&self, u: f64, v: f64) -> Result<Option<Vec3>, GeometryError> {
        let ders = self.derivatives_at(u, v, 1, 1)?;
        Ok(ders.get(1, 0).cross(&ders.get(0, 1)).normalized())
    }

    fn checked_parameters(&self, u: f64, v: f64) -> Result<(f64, f64), GeometryError> {
        let (du, dv) = (self.domain_u(), self.domain_v());
        Ok((
            du.checked_clamp(u, parameter_slack(&du))?,
            dv.checked_clamp(v, parameter_slack(&dv))?,
        ))
    }
}

impl<T: CurveEval + ?Sized> CurveEval for &T {
    type Point = T::Point;

    fn degree(&self) -> usize {
        (**self).degree()
    }

    fn domain(&self) -> Interval {
        (**self).domain()
    }

    fn spans(&self) -> Vec<Interval> {
        (**self).spans()
    }

    fn evaluate_derivatives(&self, t: f64, order: usize) -> Vec<VectorOf<Self::Point>> {
        (**self).evaluate_derivatives(t, order)
    }

    fn evaluate_derivatives_on_span(
        &self,
        span: &Interval,
        t: f64,
        order: usize,
    ) -> Vec<VectorOf<Self::Point>> {
        (**self).evaluate_derivatives_on_span(span, t, order)
    }
}

impl<T: SurfaceEval + ?Sized> SurfaceEval for &T {
    fn degree_u(&self) -> usize {
        (**self).degree_u()
    }

    fn degree_v(&self) -> usize {
        (**self).degree_v()
    }

    fn domain_u(&self) -> Interval {
        (**self).domain_u()
    }

    fn domain_v(&self) -> Interval {
        (**self).domain_v()
    }

    fn spans_u(&self) -> Vec<Interval> {
        (**self).spans_u()
    }

    fn spans_v(&self) -> Vec<Interval> {
        (**self).spans_v()
    }

    fn evaluate_derivatives(
        &self,
        u: f64,
        v: f64,
        order_u: usize,
        order_v: usize,
    ) -> SurfaceDerivatives {
        (**self).evaluate_derivatives(u, v, order_u, order_v)
    }
}
