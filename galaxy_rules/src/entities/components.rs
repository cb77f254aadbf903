//! Geometry components shared by everything that has a place in a system.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A position or velocity in a system's local frame, in distance units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from the origin.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// A heading in degrees. Zero points "up" (negative y), angles grow clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Angle {
    pub degrees: f64,
}

impl Angle {
    /// Create an angle, normalized into `[0, 360)`.
    pub fn new(degrees: f64) -> Self {
        Self {
            degrees: degrees.rem_euclid(360.0),
        }
    }

    /// A uniformly random heading over the full turn.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self::new(rng.gen::<f64>() * 360.0)
    }

    /// Unit vector pointing along this heading.
    pub fn unit(&self) -> Point {
        let radians = self.degrees.to_radians();
        Point::new(radians.sin(), -radians.cos())
    }
}
