use tracing::{debug, instrument};

use super::CurveEval;
use super::point::{Position, VectorOf};
use super::vector::VectorSpace;

/// Bisection depth limit per initial segment.
const MAX_DEPTH: usize = 16;

/// A polyline approximating a curve, with the curve parameter of each vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePolyline<P> {
    pub parameters: Vec<f64>,
    pub points: Vec<P>,
}

impl<P: Position> CurvePolyline<P> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closest point on the polyline to `sample`, as `(parameter, point)`.
    /// The parameter is interpolated linearly along the closest segment.
    pub fn closest_point(&self, sample: &P) -> Option<(f64, P)> {
        let mut best: Option<(f64, P, f64)> = None;
        for i in 1..self.points.len() {
            let (ratio, point) = closest_on_segment(sample, &self.points[i - 1], &self.points[i]);
            let distance = point.distance_squared_to(sample);
            if best.is_none_or(|(_, _, d)| distance < d) {
                let (t0, t1) = (self.parameters[i - 1], self.parameters[i]);
                best = Some((t0 + (t1 - t0) * ratio, point, distance));
            }
        }
        if best.is_none() && self.points.len() == 1 {
            return Some((self.parameters[0], self.points[0]));
        }
        best.map(|(t, point, _)| (t, point))
    }
}

/// Closest point to `sample` on the segment `[a, b]`, as the ratio along the
/// segment in `[0, 1]` and the point itself.
pub fn closest_on_segment<P: Position>(sample: &P, a: &P, b: &P) -> (f64, P) {
    let dir: VectorOf<P> = b.to_vector() - a.to_vector();
    let length_squared = dir.length_squared();
    if length_squared < 1e-14 {
        return (0.0, *a);
    }
    let ratio = (sample.to_vector() - a.to_vector()).dot(&dir) / length_squared;
    if ratio <= 0.0 {
        (0.0, *a)
    } else if ratio >= 1.0 {
        (1.0, *b)
    } else {
        (ratio, P::from_vector(a.to_vector() + dir * ratio))
    }
}

/// Adaptive polyline through the curve: every span is cut into `degree + 1`
/// segments, each bisected until its midpoint is within `flatness` of the
/// chord.
#[instrument(skip(curve), fields(degree = curve.degree()))]
pub fn tessellate_curve<C: CurveEval>(curve: &C, flatness: f64) -> CurvePolyline<C::Point> {
    let domain = curve.domain();
    let mut parameters = vec![domain.t0];
    let mut points = vec![curve.evaluate(domain.t0)];

    let segments = curve.degree() + 1;
    for span in curve.spans() {
        for i in 0..segments {
            let a = span.parameter_at(i as f64 / segments as f64);
            let b = span.parameter_at((i + 1) as f64 / segments as f64);
            let point_a = curve.evaluate(a);
            let point_b = curve.evaluate(b);
            subdivide(curve, flatness, (a, point_a), (b, point_b), 0, &mut parameters, &mut points);
        }
    }

    debug!(vertices = points.len(), "Tessellated curve");
    CurvePolyline { parameters, points }
}

/// Appends the vertices after `start` up to and including `end`.
fn subdivide<C: CurveEval>(
    curve: &C,
    flatness: f64,
    start: (f64, C::Point),
    end: (f64, C::Point),
    depth: usize,
    parameters: &mut Vec<f64>,
    points: &mut Vec<C::Point>,
) {
    let t_mid = 0.5 * (start.0 + end.0);
    let mid = curve.evaluate(t_mid);
    let (_, on_chord) = closest_on_segment(&mid, &start.1, &end.1);

    if depth >= MAX_DEPTH || mid.distance_to(&on_chord) <= flatness {
        parameters.push(end.0);
        points.push(end.1);
        return;
    }

    subdivide(curve, flatness, start, (t_mid, mid), depth + 1, parameters, points);
    subdivide(curve, flatness, (t_mid, mid), end, depth + 1, parameters, points);
}
