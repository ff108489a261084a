#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::geometry::SurfaceEval;
use crate::geometry::interval::Interval;
use crate::geometry::point::Point3d;

/// One surface sample of the seed grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedSample {
    pub u: f64,
    pub v: f64,
    pub point: Point3d,
}

/// Precomputed samples of a surface on a knot-aware grid, used to pick the
/// Newton start for a projection.
#[derive(Debug, Clone)]
pub struct SeedGrid {
    samples: Vec<SeedSample>,
}

/// Parameters that split every span into `per_span` equal parts, including
/// both domain ends.
pub(crate) fn span_parameters(spans: &[Interval], per_span: usize) -> Vec<f64> {
    let per_span = per_span.max(1);
    let mut parameters = Vec::with_capacity(spans.len() * per_span + 1);
    for span in spans {
        for i in 0..per_span {
            parameters.push(span.parameter_at(i as f64 / per_span as f64));
        }
    }
    if let Some(last) = spans.last() {
        parameters.push(last.t1);
    }
    parameters
}

impl SeedGrid {
    #[instrument(skip(surface))]
    pub fn new<S: SurfaceEval>(surface: &S, samples_per_span: usize) -> Self {
        let us = span_parameters(&surface.spans_u(), samples_per_span);
        let vs = span_parameters(&surface.spans_v(), samples_per_span);
        let parameters: Vec<(f64, f64)> = us
            .iter()
            .flat_map(|&u| vs.iter().map(move |&v| (u, v)))
            .collect();
        let samples = evaluate_samples(surface, parameters);
        debug!(nb_u = us.len(), nb_v = vs.len(), "Built seed grid");
        Self { samples }
    }

    pub fn samples(&self) -> &[SeedSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample closest to `point`. Equal distances resolve to the sample
    /// generated first, so the result does not depend on threading.
    pub fn closest(&self, point: &Point3d) -> Option<&SeedSample> {
        let distances = sample_distances(&self.samples, point);
        distances
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1).then(a.0.cmp(&b.0)))
            .map(|(index, _)| &self.samples[index])
    }
}

#[cfg(feature = "parallel")]
fn evaluate_samples<S: SurfaceEval>(surface: &S, parameters: Vec<(f64, f64)>) -> Vec<SeedSample> {
    parameters
        .into_par_iter()
        .map(|(u, v)| SeedSample {
            u,
            v,
            point: surface.evaluate(u, v),
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_samples<S: SurfaceEval>(surface: &S, parameters: Vec<(f64, f64)>) -> Vec<SeedSample> {
    parameters
        .into_iter()
        .map(|(u, v)| SeedSample {
            u,
            v,
            point: surface.evaluate(u, v),
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn sample_distances(samples: &[SeedSample], point: &Point3d) -> Vec<f64> {
    samples
        .par_iter()
        .map(|sample| sample.point.distance_squared_to(point))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn sample_distances(samples: &[SeedSample], point: &Point3d) -> Vec<f64> {
    samples
        .iter()
        .map(|sample| sample.point.distance_squared_to(point))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::nurbs::NurbsSurfaceGeometry;

    fn plane() -> NurbsSurfaceGeometry {
        NurbsSurfaceGeometry::new(
            1,
            1,
            vec![0.0, 0.0, 1.0, 2.0, 2.0],
            vec![0.0, 0.0, 1.0, 1.0],
            3,
            2,
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(1.0, 1.0, 0.0),
                Point3d::new(2.0, 0.0, 0.0),
                Point3d::new(2.0, 1.0, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_span_parameters() {
        let spans = [Interval::new(0.0, 1.0), Interval::new(1.0, 3.0)];
        assert_eq!(
            span_parameters(&spans, 2),
            vec![0.0, 0.5, 1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn test_grid_size() {
        let grid = SeedGrid::new(&plane(), 4);
        // u: 2 spans * 4 + 1, v: 1 span * 4 + 1
        assert_eq!(grid.len(), 9 * 5);
    }

    #[test]
    fn test_closest_sample() {
        let grid = SeedGrid::new(&plane(), 4);
        let seed = grid.closest(&Point3d::new(1.3, 0.7, 5.0)).unwrap();
        assert_eq!(seed.u, 1.25);
        assert_eq!(seed.v, 0.75);
    }

    #[test]
    fn test_ties_pick_first_sample() {
        let grid = SeedGrid::new(&plane(), 1);
        // Equidistant from (0, 0) and (1, 0) and (0, 1) and (1, 1).
        let seed = grid.closest(&Point3d::new(0.5, 0.5, 0.0)).unwrap();
        assert_eq!((seed.u, seed.v), (0.0, 0.0));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_grid_matches_serial_order() {
        let surface = &plane();
        let grid = SeedGrid::new(surface, 4);

        let us = span_parameters(&surface.spans_u(), 4);
        let vs = span_parameters(&surface.spans_v(), 4);
        let serial: Vec<SeedSample> = us
            .iter()
            .flat_map(|&u| {
                vs.iter().map(move |&v| SeedSample {
                    u,
                    v,
                    point: surface.evaluate(u, v),
                })
            })
            .collect();
        assert_eq!(grid.samples(), serial.as_slice());

        let queries = [
            Point3d::new(1.3, 0.7, 5.0),
            Point3d::new(0.25, 0.5, 0.0),
            Point3d::new(-3.0, 2.0, 1.0),
        ];
        for query in &queries {
            let expected = serial
                .iter()
                .min_by(|a, b| {
                    a.point
                        .distance_squared_to(query)
                        .total_cmp(&b.point.distance_squared_to(query))
                })
                .unwrap();
            assert_eq!(grid.closest(query), Some(expected));
        }

        // Ties still resolve to the first sample.
        let coarse = SeedGrid::new(surface, 1);
        let seed = coarse.closest(&Point3d::new(0.5, 0.5, 0.0)).unwrap();
        assert_eq!((seed.u, seed.v), (0.0, 0.0));
    }
}
