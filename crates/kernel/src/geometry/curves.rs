use std::sync::Arc;

use super::CurveEval;
use super::interval::Interval;
use super::nurbs::NurbsCurveGeometry;
use super::point::{Point2d, Point3d, Position, VectorOf};
use super::surfaces::{check_sub_domain, clip_spans};
use crate::error::GeometryError;

/// A NURBS curve restricted to a sub-interval of its parameter domain.
///
/// Several views may share one geometry; the view only narrows the domain
/// that evaluation clamps to and that `spans` reports.
#[derive(Debug, Clone)]
pub struct Curve<P> {
    geometry: Arc<NurbsCurveGeometry<P>>,
    domain: Interval,
}

pub type Curve2d = Curve<Point2d>;
pub type Curve3d = Curve<Point3d>;

impl<P: Position> Curve<P> {
    /// View over the full domain.
    pub fn new(geometry: Arc<NurbsCurveGeometry<P>>) -> Self {
        let domain = geometry.domain();
        Self { geometry, domain }
    }

    pub fn with_domain(
        geometry: Arc<NurbsCurveGeometry<P>>,
        domain: Interval,
    ) -> Result<Self, GeometryError> {
        check_sub_domain(&geometry.domain(), &domain)?;
        Ok(Self { geometry, domain })
    }

    pub fn geometry(&self) -> &Arc<NurbsCurveGeometry<P>> {
        &self.geometry
    }
}

impl<P: Position> CurveEval for Curve<P> {
    type Point = P;

    fn degree(&self) -> usize {
        self.geometry.degree()
    }

    fn domain(&self) -> Interval {
        self.domain
    }

    fn spans(&self) -> Vec<Interval> {
        clip_spans(self.geometry.spans(), &self.domain)
    }

    fn evaluate_derivatives(&self, t: f64, order: usize) -> Vec<VectorOf<P>> {
        self.geometry
            .evaluate_derivatives(self.domain.clamp(t), order)
    }

    fn evaluate_derivatives_on_span(
        &self,
        span: &Interval,
        t: f64,
        order: usize,
    ) -> Vec<VectorOf<P>> {
        self.geometry
            .evaluate_derivatives_on_span(span, self.domain.clamp(t), order)
    }
}
