use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Squared magnitudes at or below this are treated as the zero vector.
pub const ZERO_EPSILON: f64 = 1e-12;

/// A real-valued 2D vector with value semantics.
///
/// Every operation that would divide by a length (`normalize`,
/// `set_magnitude`, `limit`, `angle_between`) short-circuits on a
/// zero-length input instead of producing NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians from the +x axis.
    #[must_use]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    #[must_use]
    pub fn magnitude_squared(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).magnitude()
    }

    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.magnitude_squared() <= ZERO_EPSILON
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    #[must_use]
    pub fn normalize(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        self / self.magnitude()
    }

    /// Same direction, magnitude `magnitude`. A zero vector stays zero.
    #[must_use]
    pub fn set_magnitude(self, magnitude: f64) -> Self {
        self.normalize().scale(magnitude)
    }

    /// Clamps the magnitude to at most `max`.
    #[must_use]
    pub fn limit(self, max: f64) -> Self {
        if max <= 0.0 {
            return Self::ZERO;
        }
        let mag_sq = self.magnitude_squared();
        if mag_sq <= max * max {
            return self;
        }
        self.scale(max / mag_sq.sqrt())
    }

    /// Heading angle in radians, in (-PI, PI].
    #[must_use]
    pub fn heading(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Unsigned angle in radians between `self` and `other`, in [0, PI].
    ///
    /// Returns `None` when either vector has no direction.
    #[must_use]
    pub fn angle_between(self, other: Self) -> Option<f64> {
        if self.is_zero() || other.is_zero() {
            return None;
        }
        let cos = self.dot(other) / (self.magnitude() * other.magnitude());
        Some(cos.clamp(-1.0, 1.0).acos())
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Div<f64> for Vector2 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}
