//! Parameters at which a planar curve crosses an axis-aligned grid.
//!
//! The grid is given by two knot vectors: `knots_u` defines the lines
//! `x = const`, `knots_v` the lines `y = const`. Every curve span is sampled,
//! sign changes of `coordinate - line` are refined with a safeguarded
//! Newton-bisection, and coordinate extrema between samples are located so
//! that tangential contacts and double crossings inside one sample interval
//! are not lost.

pub mod root;

use tracing::{debug, info, instrument};

use crate::config::IntersectionConfig;
use crate::geometry::CurveEval;
use crate::geometry::interval::Interval;
use crate::geometry::point::Point2d;
use crate::geometry::vector::{Vec2, VectorSpace};
use root::{newton_bisection, newton_polish};

/// Root precision relative to the merge tolerance.
const ROOT_PRECISION: f64 = 1e-3;

/// Distinct, sorted line positions of a grid knot vector.
pub fn grid_lines(knots: &[f64]) -> Vec<f64> {
    let mut lines: Vec<f64> = knots.iter().copied().filter(|k| k.is_finite()).collect();
    lines.sort_by(f64::total_cmp);
    lines.dedup();
    lines
}

/// Sorted curve parameters of all grid crossings plus the domain ends.
///
/// `tolerance` is both the root precision and the distance under which two
/// parameters are reported once. With `include_curve_knots` the curve's own
/// interior knots are added.
pub fn curve_span_intersection<C>(
    curve: &C,
    knots_u: &[f64],
    knots_v: &[f64],
    tolerance: f64,
    include_curve_knots: bool,
) -> Vec<f64>
where
    C: CurveEval<Point = Point2d>,
{
    let config = IntersectionConfig {
        tolerance,
        include_curve_knots,
        ..IntersectionConfig::default()
    };
    curve_span_intersection_with(curve, knots_u, knots_v, &config)
}

#[instrument(skip(curve, knots_u, knots_v), fields(nb_knots_u = knots_u.len(), nb_knots_v = knots_v.len()))]
pub fn curve_span_intersection_with<C>(
    curve: &C,
    knots_u: &[f64],
    knots_v: &[f64],
    config: &IntersectionConfig,
) -> Vec<f64>
where
    C: CurveEval<Point = Point2d>,
{
    let tolerance = config.tolerance;
    let samples = config.samples_for_degree(curve.degree());
    let lines = [grid_lines(knots_u), grid_lines(knots_v)];
    let spans = curve.spans();

    let mut candidates = Vec::new();
    for span in &spans {
        let sampled = SampledSpan::new(curve, span, samples);
        for (axis, axis_lines) in lines.iter().enumerate() {
            sampled.crossings(curve, axis, axis_lines, tolerance, &mut candidates);
        }
    }
    debug!(crossings = candidates.len(), "located grid crossings");

    if config.include_curve_knots {
        candidates.extend(spans.iter().skip(1).map(|span| span.t0));
    }

    let parameters = merge_parameters(&curve.domain(), candidates, tolerance);
    info!(
        spans = spans.len(),
        parameters = parameters.len(),
        "curve span intersection complete"
    );
    parameters
}

/// Samples of one curve span with the first and second derivatives needed
/// for crossing and extremum location. All values come from the span's own
/// polynomial piece, so the closing sample sees the derivative from inside
/// the span even at a C0 knot.
struct SampledSpan {
    span: Interval,
    parameters: Vec<f64>,
    derivatives: Vec<Vec<Vec2>>,
}

impl SampledSpan {
    fn new<C: CurveEval<Point = Point2d>>(curve: &C, span: &Interval, samples: usize) -> Self {
        let mut parameters: Vec<f64> = (0..samples)
            .map(|i| span.parameter_at(i as f64 / samples as f64))
            .collect();
        parameters.push(span.t1);
        let derivatives = parameters
            .iter()
            .map(|&t| curve.evaluate_derivatives_on_span(span, t, 2))
            .collect();
        Self {
            span: *span,
            parameters,
            derivatives,
        }
    }

    fn coordinate(&self, index: usize, axis: usize, order: usize) -> f64 {
        self.derivatives[index][order].component(axis)
    }

    /// Appends every parameter where the `axis` coordinate meets one of
    /// `lines` within `tolerance`.
    fn crossings<C: CurveEval<Point = Point2d>>(
        &self,
        curve: &C,
        axis: usize,
        lines: &[f64],
        tolerance: f64,
        out: &mut Vec<f64>,
    ) {
        let x_tolerance = tolerance * ROOT_PRECISION;
        let last = self.parameters.len() - 1;
        let value = |t: f64| {
            let ders = curve.evaluate_derivatives_on_span(&self.span, t, 1);
            (ders[0].component(axis), ders[1].component(axis))
        };
        let slope = |t: f64| {
            let ders = curve.evaluate_derivatives_on_span(&self.span, t, 2);
            (ders[1].component(axis), ders[2].component(axis))
        };

        // Coordinate extrema strictly inside each sample interval.
        let extrema: Vec<Option<(f64, f64)>> = (0..last)
            .map(|i| {
                let (ga, gb) = (self.coordinate(i, axis, 1), self.coordinate(i + 1, axis, 1));
                if ga == 0.0 || gb == 0.0 || (ga < 0.0) == (gb < 0.0) {
                    return None;
                }
                let (ta, tb) = (self.parameters[i], self.parameters[i + 1]);
                let te = newton_bisection(slope, ta, tb, x_tolerance);
                Some((te, value(te).0))
            })
            .collect();

        for &line in lines {
            let offset = |t: f64| {
                let (c, dc) = value(t);
                (c - line, dc)
            };
            let polish = |start: f64, low: f64, high: f64| {
                newton_polish(offset, start, low, high, x_tolerance)
            };

            // Samples within tolerance of the line. A run of them means the
            // curve lies along the line there; only its ends are crossings.
            let hits: Vec<bool> = (0..=last)
                .map(|i| (self.coordinate(i, axis, 0) - line).abs() <= tolerance)
                .collect();
            let mut i = 0;
            while i <= last {
                if !hits[i] {
                    i += 1;
                    continue;
                }
                let mut j = i;
                while j < last && hits[j + 1] {
                    j += 1;
                }
                let before = self.parameters[i.saturating_sub(1)];
                let after = self.parameters[(j + 1).min(last)];
                if i == j {
                    out.push(polish(self.parameters[i], before, after));
                } else {
                    out.push(polish(self.parameters[i], before, self.parameters[i]));
                    out.push(polish(self.parameters[j], self.parameters[j], after));
                }
                i = j + 1;
            }

            for (i, extremum) in extrema.iter().enumerate() {
                let start = (self.parameters[i], self.coordinate(i, axis, 0) - line);
                let end = (self.parameters[i + 1], self.coordinate(i + 1, axis, 0) - line);

                let pieces = match *extremum {
                    Some((te, ce)) => {
                        let middle = (te, ce - line);
                        if middle.1.abs() <= tolerance {
                            out.push(te);
                            continue;
                        }
                        vec![(start, middle), (middle, end)]
                    }
                    None => vec![(start, end)],
                };

                for ((ta, fa), (tb, fb)) in pieces {
                    if fa.abs() > tolerance && fb.abs() > tolerance && (fa < 0.0) != (fb < 0.0) {
                        out.push(newton_bisection(offset, ta, tb, x_tolerance));
                    }
                }
            }
        }
    }
}

/// Domain ends plus the candidates inside the domain, sorted, with values
/// closer than `tolerance` to the previously kept one dropped. Candidates
/// near a domain end yield to the end itself.
fn merge_parameters(domain: &Interval, candidates: Vec<f64>, tolerance: f64) -> Vec<f64> {
    let mut values: Vec<f64> = candidates
        .into_iter()
        .filter(|&t| {
            t.is_finite()
                && t > domain.t0 + tolerance
                && t < domain.t1 - tolerance
        })
        .collect();
    values.push(domain.t0);
    values.push(domain.t1);
    values.sort_by(f64::total_cmp);

    let mut merged: Vec<f64> = Vec::with_capacity(values.len());
    for t in values {
        if merged.last().is_none_or(|&last| t - last > tolerance) {
            merged.push(t);
        }
    }
    merged
}
