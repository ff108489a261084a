use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Add, Sub};

use super::vector::{Vec2, Vec3, VectorSpace};

/// A location that spline evaluation can treat as a vector from the origin.
///
/// Implemented by [`Point2d`] (planar and parameter-space curves) and
/// [`Point3d`] (space curves and surfaces).
pub trait Position: Copy + Debug + PartialEq + Send + Sync {
    type Vector: VectorSpace;

    fn to_vector(&self) -> Self::Vector;

    fn from_vector(v: Self::Vector) -> Self;

    fn distance_to(&self, other: &Self) -> f64 {
        (self.to_vector() - other.to_vector()).length()
    }

    fn distance_squared_to(&self, other: &Self) -> f64 {
        (self.to_vector() - other.to_vector()).length_squared()
    }
}

/// Shorthand for the vector type paired with a point type.
pub type VectorOf<P> = <P as Position>::Vector;

/// A point in 3D Euclidean space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl Position for Point3d {
    type Vector = Vec3;

    fn to_vector(&self) -> Vec3 {
        self.to_vec3()
    }

    fn from_vector(v: Vec3) -> Self {
        Point3d::new(v.x, v.y, v.z)
    }
}

impl Add<Vec3> for Point3d {
    type Output = Point3d;
    fn add(self, rhs: Vec3) -> Self::Output {
        Point3d::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3d {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// A point in 2D space (planar curves, surface parameter space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Position for Point2d {
    type Vector = Vec2;

    fn to_vector(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn from_vector(v: Vec2) -> Self {
        Point2d::new(v.x, v.y)
    }
}

impl Add<Vec2> for Point2d {
    type Output = Point2d;
    fn add(self, rhs: Vec2) -> Self::Output {
        Point2d::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2d {
    type Output = Vec2;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}
