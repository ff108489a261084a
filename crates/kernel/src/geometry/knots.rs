use serde::{Deserialize, Serialize};

use super::interval::Interval;
use crate::error::GeometryError;

/// A validated, clamped-span knot vector for a spline of a given degree.
///
/// Stored in the full convention with `nb_poles + degree + 1` knots. The
/// reduced convention (`nb_poles + degree - 1` knots, outermost knots
/// omitted) is accepted on construction and padded by repeating the first
/// and last knot; the outermost knots never influence the basis inside the
/// domain, so both forms describe the same spline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnotVector {
    degree: usize,
    knots: Vec<f64>,
}

impl KnotVector {
    pub fn new(degree: usize, nb_poles: usize, knots: Vec<f64>) -> Result<Self, GeometryError> {
        if degree == 0 || nb_poles <= degree {
            return Err(GeometryError::InvalidDegree { degree, nb_poles });
        }

        let full = nb_poles + degree + 1;
        let reduced = nb_poles + degree - 1;

        let knots = if knots.len() == full {
            knots
        } else if knots.len() == reduced {
            let mut padded = Vec::with_capacity(full);
            padded.push(knots[0]);
            padded.extend_from_slice(&knots);
            padded.push(knots[reduced - 1]);
            padded
        } else {
            return Err(GeometryError::KnotCount {
                expected: full,
                actual: knots.len(),
            });
        };

        if knots.iter().any(|k| !k.is_finite()) {
            return Err(GeometryError::NonFinite {
                context: "knot vector",
            });
        }

        for (index, pair) in knots.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(GeometryError::DecreasingKnots {
                    index: index + 1,
                    value: pair[1],
                    previous: pair[0],
                });
            }
        }

        let mut start = 0;
        while start < knots.len() {
            let value = knots[start];
            let end = start + knots[start..].iter().take_while(|&&k| k == value).count();
            let multiplicity = end - start;
            let at_end = start == 0 || end == knots.len();
            let max = if at_end { degree + 1 } else { degree };
            if multiplicity > max {
                return Err(GeometryError::KnotMultiplicity {
                    value,
                    multiplicity,
                    max,
                });
            }
            start = end;
        }

        if knots[degree] >= knots[nb_poles] {
            return Err(GeometryError::EmptyDomain);
        }

        Ok(Self { degree, knots })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn nb_poles(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.knots
    }

    pub fn knot(&self, index: usize) -> f64 {
        self.knots[index]
    }

    /// Parameter domain `[knots[p], knots[n]]`.
    pub fn domain(&self) -> Interval {
        Interval::new(self.knots[self.degree], self.knots[self.nb_poles()])
    }

    /// Find the knot span index for parameter t using binary search.
    ///
    /// Returns `span` with `knots[span] <= t < knots[span + 1]`; a parameter at
    /// (or beyond) the end of the domain maps to the last non-empty span, one
    /// at (or before) the start to the first non-empty span.
    pub fn find_span(&self, t: f64) -> usize {
        let p = self.degree;
        let n = self.nb_poles() - 1;

        if t >= self.knots[n + 1] {
            return (p..=n)
                .rev()
                .find(|&s| self.knots[s] < self.knots[s + 1])
                .unwrap_or(n);
        }
        if t <= self.knots[p] {
            return (p..=n)
                .find(|&s| self.knots[s] < self.knots[s + 1])
                .unwrap_or(p);
        }

        let mut low = p;
        let mut high = n + 1;
        let mut mid = (low + high) / 2;
        while t < self.knots[mid] || t >= self.knots[mid + 1] {
            if t < self.knots[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }
        mid
    }

    /// Non-empty knot spans inside the domain, in increasing order.
    pub fn spans(&self) -> Vec<Interval> {
        let p = self.degree;
        let n = self.nb_poles() - 1;
        (p..=n)
            .filter(|&s| self.knots[s] < self.knots[s + 1])
            .map(|s| Interval::new(self.knots[s], self.knots[s + 1]))
            .collect()
    }

    /// Distinct knot values strictly inside the domain.
    pub fn interior_knots(&self) -> Vec<f64> {
        let spans = self.spans();
        spans.iter().skip(1).map(|span| span.t0).collect()
    }

    pub fn multiplicity(&self, value: f64) -> usize {
        self.knots.iter().filter(|&&k| k == value).count()
    }
}
