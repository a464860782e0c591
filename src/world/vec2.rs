//! Planar vector math.
//!
//! Heading convention: 0 rad points along +X (east) and angles grow
//! counter-clockwise, so "left" turns are positive.

use std::f64::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector used for positions and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Unit vector pointing along `angle` radians, scaled by `length`.
    pub fn from_angle(angle: f64, length: f64) -> Self {
        Vec2 {
            x: angle.cos() * length,
            y: angle.sin() * length,
        }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_to(self, other: Vec2) -> f64 {
        (other - self).length()
    }

    /// Absolute angle of the vector from `self` to `other`, in `(-π, π]`.
    pub fn bearing_to(self, other: Vec2) -> f64 {
        let d = other - self;
        d.y.atan2(d.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Normalizes an angle into `[0, 2π)`.
///
/// `rem_euclid` can round up to exactly `TAU` for tiny negative inputs, which
/// would escape the half-open range, so that case folds back to zero.
pub fn normalize_heading(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Wraps an angular difference into `(-π, π]`.
pub fn wrap_signed(angle: f64) -> f64 {
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}
