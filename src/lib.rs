#![doc = include_str!(".crate-docs.md")]

use std::{
    fmt::{Debug, Display},
    ops::{Add, Neg, Sub},
};

pub mod config;
pub mod context;
#[cfg(feature = "cushy")]
pub mod cushy;
pub mod frame;
pub mod matrix;
pub mod planar;
pub mod session;
pub mod skeleton;
pub mod spatial;
pub mod vector;
pub mod viewport;

pub use config::{ChainConfig, ConfigError, SticklerConfig};
pub use context::{ChainContext, ChainControls};
pub use frame::{Color, DrawCommand, Frame};
pub use matrix::{Matrix, MatrixError};
pub use planar::PlanarStickler;
pub use session::{Key, MenuOption, Mode, Session, SessionFrame};
pub use skeleton::{
    Bone, BoneId, Dimension, Joint, JointId, Planar, Skeleton, Solution, SolvedBone, SolvedJoint,
    Spatial,
};
pub use spatial::{Orientation, RotationAxis, SpatialStickler};
pub use vector::{Coordinate, Vector2, Vector3};
pub use viewport::{Perspective, Projection, Viewport};

const FULL_TURN: f32 = 360.;

/// A rotation between no rotation and a full rotation, stored in degrees.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Rotation {
    degrees: f32,
}

impl Rotation {
    /// The minimum rotation represented by this type.
    pub const MIN: Self = Self { degrees: 0. };

    /// Returns a rotation representing the given degrees.
    #[must_use]
    pub fn degrees(degrees: f32) -> Self {
        Self { degrees }.normalized()
    }

    /// Returns a rotation representing the given radians.
    #[must_use]
    pub fn radians(radians: f32) -> Self {
        Self::degrees(radians.to_degrees())
    }

    /// Returns this rotation represented in degrees.
    ///
    /// This value will always be greater than or equal to 0 and will always be
    /// less than 360.0.
    #[must_use]
    pub const fn to_degrees(self) -> f32 {
        self.degrees
    }

    /// Returns this rotation represented in radians.
    ///
    /// This value will always be greater than or equal to 0 and will always be
    /// less than `2π`.
    #[must_use]
    pub fn to_radians(self) -> f32 {
        self.degrees.to_radians()
    }

    /// Returns this rotation advanced by `degrees`, wrapped into `[0, 360)`.
    #[must_use]
    pub fn rotated_by(self, degrees: f32) -> Self {
        Self::degrees(self.degrees + degrees)
    }

    fn normalized(mut self) -> Self {
        self.degrees = self.degrees.rem_euclid(FULL_TURN);
        // rem_euclid can round up to exactly 360 for tiny negative inputs.
        if self.degrees >= FULL_TURN || self.degrees.is_nan() {
            self.degrees = 0.;
        }
        self
    }
}

impl Debug for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.to_degrees())
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::MIN
    }
}

impl Add for Rotation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::degrees(self.degrees + rhs.degrees)
    }
}

impl Sub for Rotation {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::degrees(self.degrees - rhs.degrees)
    }
}

impl Neg for Rotation {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::degrees(-self.degrees)
    }
}

#[test]
#[allow(clippy::cast_possible_truncation)]
fn rotation() {
    assert_eq!(
        (Rotation::degrees(90.) + Rotation::degrees(180.))
            .to_degrees()
            .round() as i32,
        270,
    );
    assert_eq!(
        (Rotation::degrees(90.) + Rotation::degrees(-180.))
            .to_degrees()
            .round() as i32,
        270,
    );
    assert_eq!(Rotation::degrees(350.).rotated_by(20.).to_degrees(), 10.);
    assert_eq!(Rotation::degrees(10.).rotated_by(-30.).to_degrees(), 340.);
    assert_eq!(Rotation::degrees(360.).to_degrees(), 0.);
    assert_eq!(Rotation::degrees(-720.).to_degrees(), 0.);
    assert_eq!((-Rotation::degrees(90.)).to_degrees(), 270.);
}

#[test]
fn rotation_stays_in_range() {
    let mut rotation = Rotation::default();
    for step in [10., -30., 355., -1e-6, 720.5, -1000., 0.25] {
        rotation = rotation.rotated_by(step);
        let degrees = rotation.to_degrees();
        assert!((0. ..360.).contains(&degrees), "{degrees} out of range");
    }
}
