use thiserror::Error;

/// Errors raised while building or querying spline geometry.
///
/// Every variant except [`GeometryError::OutOfDomain`] is raised at
/// construction time and means the object was never created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Degree {degree} is invalid for {nb_poles} poles")]
    InvalidDegree { degree: usize, nb_poles: usize },

    #[error("Knot vector has {actual} knots, expected {expected}")]
    KnotCount { expected: usize, actual: usize },

    #[error("Knots must be non-decreasing: knot {index} ({value}) is less than {previous}")]
    DecreasingKnots {
        index: usize,
        value: f64,
        previous: f64,
    },

    #[error("Knot {value} has multiplicity {multiplicity}, at most {max} allowed")]
    KnotMultiplicity {
        value: f64,
        multiplicity: usize,
        max: usize,
    },

    #[error("Knot vector spans an empty domain")]
    EmptyDomain,

    #[error("Non-finite value in {context}")]
    NonFinite { context: &'static str },

    #[error("{actual} weights given for {expected} poles")]
    WeightCount { expected: usize, actual: usize },

    #[error("Weight {index} must be positive, got {weight}")]
    NonPositiveWeight { index: usize, weight: f64 },

    #[error("Pole grid has {actual} poles, expected {nb_poles_u} x {nb_poles_v}")]
    PoleGrid {
        nb_poles_u: usize,
        nb_poles_v: usize,
        actual: usize,
    },

    #[error("Sub-domain [{t0}, {t1}] is not inside [{min}, {max}]")]
    InvalidSubDomain { t0: f64, t1: f64, min: f64, max: f64 },

    #[error("Parameter {parameter} is outside the domain [{min}, {max}]")]
    OutOfDomain { parameter: f64, min: f64, max: f64 },
}

impl GeometryError {
    /// True for evaluation-time errors the caller can recover from.
    pub fn is_domain_error(&self) -> bool {
        matches!(self, GeometryError::OutOfDomain { .. })
    }
}
