use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::SurfaceEval;
use super::interval::Interval;
use super::nurbs::NurbsSurfaceGeometry;
use super::point::Point3d;
use super::vector::Vec3;
use crate::error::GeometryError;

/// Mixed partial derivatives `d^(k+l) S / du^k dv^l` for `k <= order_u`,
/// `l <= order_v`. Entry `(0, 0)` is the position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDerivatives {
    order_u: usize,
    order_v: usize,
    values: Vec<Vec3>,
}

impl SurfaceDerivatives {
    pub(crate) fn new(order_u: usize, order_v: usize, values: Vec<Vec3>) -> Self {
        debug_assert_eq!(values.len(), (order_u + 1) * (order_v + 1));
        Self {
            order_u,
            order_v,
            values,
        }
    }

    pub fn order_u(&self) -> usize {
        self.order_u
    }

    pub fn order_v(&self) -> usize {
        self.order_v
    }

    pub fn get(&self, k: usize, l: usize) -> Vec3 {
        self.values[k * (self.order_v + 1) + l]
    }

    pub fn point(&self) -> Point3d {
        let p = self.values[0];
        Point3d::new(p.x, p.y, p.z)
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.values
    }
}

/// A NURBS surface restricted to a rectangle of its parameter domain.
#[derive(Debug, Clone)]
pub struct Surface {
    geometry: Arc<NurbsSurfaceGeometry>,
    domain_u: Interval,
    domain_v: Interval,
}

impl Surface {
    /// View over the full domain.
    pub fn new(geometry: Arc<NurbsSurfaceGeometry>) -> Self {
        let domain_u = geometry.domain_u();
        let domain_v = geometry.domain_v();
        Self {
            geometry,
            domain_u,
            domain_v,
        }
    }

    pub fn with_domain(
        geometry: Arc<NurbsSurfaceGeometry>,
        domain_u: Interval,
        domain_v: Interval,
    ) -> Result<Self, GeometryError> {
        check_sub_domain(&geometry.domain_u(), &domain_u)?;
        check_sub_domain(&geometry.domain_v(), &domain_v)?;
        Ok(Self {
            geometry,
            domain_u,
            domain_v,
        })
    }

    pub fn geometry(&self) -> &Arc<NurbsSurfaceGeometry> {
        &self.geometry
    }
}

/// `domain` must be a non-empty, increasing interval inside `outer`.
pub(crate) fn check_sub_domain(outer: &Interval, domain: &Interval) -> Result<(), GeometryError> {
    let inside = domain.t0.is_finite()
        && domain.t1.is_finite()
        && domain.t0 < domain.t1
        && outer.contains(domain.t0)
        && outer.contains(domain.t1);
    if inside {
        Ok(())
    } else {
        Err(GeometryError::InvalidSubDomain {
            t0: domain.t0,
            t1: domain.t1,
            min: outer.min(),
            max: outer.max(),
        })
    }
}

pub(crate) fn clip_spans(spans: Vec<Interval>, domain: &Interval) -> Vec<Interval> {
    spans
        .iter()
        .filter_map(|span| span.intersection(domain))
        .collect()
}

impl SurfaceEval for Surface {
    fn degree_u(&self) -> usize {
        self.geometry.degree_u()
    }

    fn degree_v(&self) -> usize {
        self.geometry.degree_v()
    }

    fn domain_u(&self) -> Interval {
        self.domain_u
    }

    fn domain_v(&self) -> Interval {
        self.domain_v
    }

    fn spans_u(&self) -> Vec<Interval> {
        clip_spans(self.geometry.spans_u(), &self.domain_u)
    }

    fn spans_v(&self) -> Vec<Interval> {
        clip_spans(self.geometry.spans_v(), &self.domain_v)
    }

    fn evaluate_derivatives(
        &self,
        u: f64,
        v: f64,
        order_u: usize,
        order_v: usize,
    ) -> SurfaceDerivatives {
        let u = self.domain_u.clamp(u);
        let v = self.domain_v.clamp(v);
        self.geometry.evaluate_derivatives(u, v, order_u, order_v)
    }
}
