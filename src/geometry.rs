//! Fundamental coordinate types for world space and screen space.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Position in three dimensional model space measured in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Distance along the global X axis.
    pub x: f64,
    /// Distance along the global Y axis.
    pub y: f64,
    /// Distance along the global Z axis (vertical).
    pub z: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Return the coordinate along `axis` (0 = X, 1 = Y, 2 = Z).
    #[must_use]
    pub fn axis(self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Return a copy with the coordinate along `axis` shifted by `delta`.
    #[must_use]
    pub fn offset_axis(self, axis: usize, delta: f64) -> Self {
        let mut vector = self.to_vector();
        vector[axis.min(2)] += delta;
        vector.into()
    }
}

impl From<Vector3<f64>> for Point {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Point> for Vector3<f64> {
    fn from(value: Point) -> Self {
        value.to_vector()
    }
}

/// Position on the drawing surface in pixels, y growing downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate.
    pub x: f64,
    /// Vertical pixel coordinate.
    pub y: f64,
}

impl ScreenPoint {
    /// Create a [`ScreenPoint`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }
}

impl From<Vector2<f64>> for ScreenPoint {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<ScreenPoint> for Vector2<f64> {
    fn from(value: ScreenPoint) -> Self {
        value.to_vector()
    }
}

/// Axis-aligned screen rectangle spanned by a set of projected points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Smallest corner.
    pub min: ScreenPoint,
    /// Largest corner.
    pub max: ScreenPoint,
}

impl Bounds {
    /// Grow a bounding box over `points`; `None` when the iterator is empty.
    pub fn enclosing<I: IntoIterator<Item = ScreenPoint>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in points {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(
            0.5 * (self.min.x + self.max.x),
            0.5 * (self.min.y + self.max.y),
        )
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use framex::point;
///
/// let origin = point(0.0, 0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

/// Convenience helper for creating [`ScreenPoint`] instances.
///
/// # Examples
/// ```
/// use framex::screen;
///
/// let center = screen(50.0, 50.0);
/// assert_eq!(center.y, 50.0);
/// ```
#[must_use]
pub const fn screen(x: f64, y: f64) -> ScreenPoint {
    ScreenPoint::new(x, y)
}
