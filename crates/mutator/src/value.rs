//! The arithmetic capability set interpolated values must provide.

use kurbo::{Point, Vec2};

/// Vector-space arithmetic over an interpolated value.
///
/// The engine only ever adds, subtracts, and scales values; `divide` is part
/// of the capability set for callers that average instances. All operations
/// take `&self` and return a fresh value, so implementations never mutate
/// shared state and a built mutator can be evaluated from many threads.
///
/// `scale_split` applies an anisotropic factor pair. Values with a notion of
/// horizontal and vertical parts (points, vectors, outlines) scale each part
/// by its own factor; plain scalars have no vertical part and take the
/// horizontal factor, which is what the default does.
pub trait Interpolable: Clone {
    fn add(&self, other: &Self) -> Self;

    fn subtract(&self, other: &Self) -> Self;

    fn scale(&self, factor: f64) -> Self;

    fn divide(&self, divisor: f64) -> Self {
        self.scale(1.0 / divisor)
    }

    fn scale_split(&self, horizontal: f64, vertical: f64) -> Self {
        let _ = vertical;
        self.scale(horizontal)
    }

    /// The additive identity shaped like `self`. Shaped matters: a point
    /// list zeroes element-wise and keeps its length.
    fn zeroed(&self) -> Self {
        self.scale(0.0)
    }
}

impl Interpolable for f64 {
    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn subtract(&self, other: &Self) -> Self {
        self - other
    }

    fn scale(&self, factor: f64) -> Self {
        self * factor
    }
}

impl Interpolable for f32 {
    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn subtract(&self, other: &Self) -> Self {
        self - other
    }

    fn scale(&self, factor: f64) -> Self {
        (f64::from(*self) * factor) as f32
    }
}

impl Interpolable for Vec2 {
    fn add(&self, other: &Self) -> Self {
        *self + *other
    }

    fn subtract(&self, other: &Self) -> Self {
        *self - *other
    }

    fn scale(&self, factor: f64) -> Self {
        *self * factor
    }

    fn scale_split(&self, horizontal: f64, vertical: f64) -> Self {
        Vec2::new(self.x * horizontal, self.y * vertical)
    }
}

impl Interpolable for Point {
    fn add(&self, other: &Self) -> Self {
        Point::new(self.x + other.x, self.y + other.y)
    }

    fn subtract(&self, other: &Self) -> Self {
        Point::new(self.x - other.x, self.y - other.y)
    }

    fn scale(&self, factor: f64) -> Self {
        Point::new(self.x * factor, self.y * factor)
    }

    fn scale_split(&self, horizontal: f64, vertical: f64) -> Self {
        Point::new(self.x * horizontal, self.y * vertical)
    }
}

/// Element-wise arithmetic for point-list payloads (e.g. glyph outlines).
///
/// Masters must be element-count compatible; checking that is the caller's
/// responsibility, the way a font pipeline verifies point counts before
/// interpolating.
impl<V: Interpolable> Interpolable for Vec<V> {
    fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len());
        self.iter().zip(other).map(|(a, b)| a.add(b)).collect()
    }

    fn subtract(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len());
        self.iter().zip(other).map(|(a, b)| a.subtract(b)).collect()
    }

    fn scale(&self, factor: f64) -> Self {
        self.iter().map(|v| v.scale(factor)).collect()
    }

    fn scale_split(&self, horizontal: f64, vertical: f64) -> Self {
        self.iter().map(|v| v.scale_split(horizontal, vertical)).collect()
    }
}
