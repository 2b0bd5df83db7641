//! Small fixed-size vectors used for joint translations and world positions.

use std::{
    fmt::Debug,
    ops::{Add, Div, Mul, Sub},
};

use crate::matrix::Matrix;

/// A two dimensional offset/position.
#[derive(Default, Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Vector2 {
    /// The x-axis component of this vector.
    pub x: f32,
    /// The y-axis component of this vector.
    pub y: f32,
}

impl Vector2 {
    /// Returns a new vector from the x and y values.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the magnitude of this vector.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns the Euclidean distance between `self` and `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).magnitude()
    }

    /// Returns the result of mapping `x` and `y` to `f`.
    #[must_use]
    pub fn map(self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self {
            x: f(self.x),
            y: f(self.y),
        }
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        self.map(|c| c * rhs)
    }
}

impl Div<f32> for Vector2 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        self.map(|c| c / rhs)
    }
}

/// A three dimensional offset/position.
#[derive(Default, Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Vector3 {
    /// The x-axis component of this vector.
    pub x: f32,
    /// The y-axis component of this vector.
    pub y: f32,
    /// The z-axis component of this vector.
    pub z: f32,
}

impl Vector3 {
    /// Returns a new vector from the x, y and z values.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns the magnitude of this vector.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Returns the Euclidean distance between `self` and `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).magnitude()
    }

    /// Returns the result of mapping each component to `f`.
    #[must_use]
    pub fn map(self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }

    /// Returns the dot product of `self` and `other`.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the cross product of `self` and `other`.
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Returns this vector scaled to a length of 1, or the zero vector if it
    /// has no length.
    #[must_use]
    pub fn normalized(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude > 0. {
            self / magnitude
        } else {
            Self::default()
        }
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        self.map(|c| c * rhs)
    }
}

impl Div<f32> for Vector3 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        self.map(|c| c / rhs)
    }
}

impl From<Vector2> for Vector3 {
    fn from(value: Vector2) -> Self {
        Self::new(value.x, value.y, 0.)
    }
}

/// A position type a [`Skeleton`](crate::Skeleton) can be solved in.
pub trait Coordinate:
    Copy
    + Default
    + PartialEq
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
{
    /// The number of components in this vector.
    const COMPONENTS: usize;

    /// Returns a vector of `length` along the local x-axis.
    fn along_x(length: f32) -> Self;

    /// Returns the Euclidean distance between `self` and `other`.
    fn distance(self, other: Self) -> f32;

    /// Converts this vector into a single-column matrix.
    fn to_column(self) -> Matrix;

    /// Reads the first [`Self::COMPONENTS`] rows of the first column of
    /// `matrix`. Missing rows read as zero.
    fn from_column(matrix: &Matrix) -> Self;

    /// Converts this vector into three dimensions, using 0 for any missing
    /// component.
    fn to_vector3(self) -> Vector3;
}

impl Coordinate for Vector2 {
    const COMPONENTS: usize = 2;

    fn along_x(length: f32) -> Self {
        Self::new(length, 0.)
    }

    fn distance(self, other: Self) -> f32 {
        Vector2::distance(self, other)
    }

    fn to_column(self) -> Matrix {
        Matrix::column(&[self.x, self.y])
    }

    fn from_column(matrix: &Matrix) -> Self {
        Self::new(matrix.get_or_zero(1, 1), matrix.get_or_zero(2, 1))
    }

    fn to_vector3(self) -> Vector3 {
        Vector3::from(self)
    }
}

impl Coordinate for Vector3 {
    const COMPONENTS: usize = 3;

    fn along_x(length: f32) -> Self {
        Self::new(length, 0., 0.)
    }

    fn distance(self, other: Self) -> f32 {
        Vector3::distance(self, other)
    }

    fn to_column(self) -> Matrix {
        Matrix::column(&[self.x, self.y, self.z])
    }

    fn from_column(matrix: &Matrix) -> Self {
        Self::new(
            matrix.get_or_zero(1, 1),
            matrix.get_or_zero(2, 1),
            matrix.get_or_zero(3, 1),
        )
    }

    fn to_vector3(self) -> Vector3 {
        self
    }
}

#[test]
fn distance() {
    let a = Vector2::new(1., 2.);
    let b = Vector2::new(4., 6.);
    assert_eq!(a.distance(b), 5.);
    assert_eq!(b.distance(a), 5.);
    assert_eq!(a.distance(a), 0.);

    // Mixing the y and x components would produce sqrt(9 + 4 * 3) here.
    let c = Vector2::new(2., 1.);
    let d = Vector2::new(5., 5.);
    assert_eq!(c.distance(d), 5.);

    let e = Vector3::new(1., 2., 3.);
    let f = Vector3::new(3., 5., 9.);
    assert_eq!(e.distance(f), 7.);
}

#[test]
fn arithmetic() {
    let a = Vector2::new(1., 2.);
    let b = Vector2::new(3., -4.);
    assert_eq!(a + b, Vector2::new(4., -2.));
    assert_eq!(a - b, Vector2::new(-2., 6.));
    assert_eq!(b / 2., Vector2::new(1.5, -2.));
    assert_eq!(Vector3::new(1., 2., 3.) * 2., Vector3::new(2., 4., 6.));
}

#[test]
fn column_conversion() {
    let v = Vector3::new(1., 2., 3.);
    assert_eq!(Vector3::from_column(&v.to_column()), v);
    // A 2-row column reads as a planar vector, and pads when read as 3D.
    let planar = Vector2::new(4., 5.).to_column();
    assert_eq!(Vector2::from_column(&planar), Vector2::new(4., 5.));
    assert_eq!(Vector3::from_column(&planar), Vector3::new(4., 5., 0.));
}
