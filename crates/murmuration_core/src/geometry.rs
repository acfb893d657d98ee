//! Range shapes used by the spatial index.
//!
//! All tests use closed intervals: a point on an edge is inside, and shapes
//! that touch intersect. The quadtree relies on this so that an agent lying
//! exactly on the world boundary is never dropped.

use murmuration_data::Vector2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle described by its center and full extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rectangle {
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle covering `[0, width] x [0, height]`.
    #[must_use]
    pub fn from_extent(width: f64, height: f64) -> Self {
        Self::new(width * 0.5, height * 0.5, width, height)
    }

    /// Rectangle spanning the corners `min` (top-left) and `max` (bottom-right).
    #[must_use]
    pub fn from_corners(min: Vector2, max: Vector2) -> Self {
        Self::new(
            (min.x + max.x) * 0.5,
            (min.y + max.y) * 0.5,
            max.x - min.x,
            max.y - min.y,
        )
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x - self.w * 0.5
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w * 0.5
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y - self.h * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h * 0.5
    }

    #[inline]
    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn contains(&self, point: Vector2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    pub fn intersects(&self, shape: &Shape) -> bool {
        match shape {
            Shape::Rectangle(other) => self.intersects_rect(other),
            Shape::Circle(circle) => self.intersects_circle(circle),
        }
    }

    /// Separating-axis test; touching edges count as intersecting.
    pub fn intersects_rect(&self, other: &Rectangle) -> bool {
        !(self.left() > other.right()
            || self.right() < other.left()
            || self.top() > other.bottom()
            || self.bottom() < other.top())
    }

    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        let closest = self.closest_point(circle.center());
        let dx = circle.x - closest.x;
        let dy = circle.y - closest.y;
        dx * dx + dy * dy <= circle.radius * circle.radius
    }

    /// Nearest point of the (filled) rectangle to `point`.
    pub fn closest_point(&self, point: Vector2) -> Vector2 {
        Vector2::new(
            point.x.clamp(self.left(), self.right()),
            point.y.clamp(self.top(), self.bottom()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Circle {
    #[must_use]
    pub const fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    #[must_use]
    pub fn around(center: Vector2, radius: f64) -> Self {
        Self::new(center.x, center.y, radius)
    }

    #[inline]
    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn contains(&self, point: Vector2) -> bool {
        let dx = point.x - self.x;
        let dy = point.y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    pub fn intersects(&self, shape: &Shape) -> bool {
        match shape {
            Shape::Rectangle(rect) => rect.intersects_circle(self),
            Shape::Circle(other) => {
                let reach = self.radius + other.radius;
                self.center().distance(other.center()) <= reach
            }
        }
    }
}

/// A query range. Only these two shapes exist, so dispatch is a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
}

impl Shape {
    #[inline]
    pub fn contains(&self, point: Vector2) -> bool {
        match self {
            Shape::Rectangle(rect) => rect.contains(point),
            Shape::Circle(circle) => circle.contains(point),
        }
    }

    pub fn intersects(&self, other: &Shape) -> bool {
        match self {
            Shape::Rectangle(rect) => rect.intersects(other),
            Shape::Circle(circle) => circle.intersects(other),
        }
    }
}

impl From<Rectangle> for Shape {
    fn from(rect: Rectangle) -> Self {
        Shape::Rectangle(rect)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}
