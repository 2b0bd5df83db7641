//! Projection parameters configured by
//! [`ChainControls::initialize_viewport`](crate::ChainControls::initialize_viewport).

use crate::{Rotation, Vector2, Vector3};

/// The margin left of and below the 2D world origin, in world units.
pub const PLANAR_MARGIN: f32 = 20.;

/// The window a chain is displayed in, and how world positions map onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    projection: Projection,
}

/// How world positions are mapped into a [`Viewport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// A 2D projection with the world y-axis pointing up.
    Orthographic {
        /// The world x coordinate at the left edge of the window.
        left: f32,
        /// The world x coordinate at the right edge of the window.
        right: f32,
        /// The world y coordinate at the bottom edge of the window.
        bottom: f32,
        /// The world y coordinate at the top edge of the window.
        top: f32,
    },
    /// A 3D perspective projection.
    Perspective(Perspective),
}

/// The camera used by [`Projection::Perspective`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    /// The vertical field of view.
    pub fov_y: Rotation,
    /// The width of the window divided by its height.
    pub aspect: f32,
    /// The distance to the near clipping plane.
    pub near: f32,
    /// The distance to the far clipping plane.
    pub far: f32,
    /// The position of the camera.
    pub eye: Vector3,
    /// The position the camera looks at.
    pub target: Vector3,
    /// The up direction of the camera.
    pub up: Vector3,
    /// A translation applied to every point before it is viewed.
    pub model_offset: Vector3,
}

impl Viewport {
    /// Returns the 2D viewport for a window of `width` x `height` pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn orthographic(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            projection: Projection::Orthographic {
                left: -PLANAR_MARGIN,
                right: width as f32,
                bottom: -PLANAR_MARGIN,
                top: height as f32,
            },
        }
    }

    /// Returns the 3D viewport for a window of `width` x `height` pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn perspective(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            projection: Projection::Perspective(Perspective {
                fov_y: Rotation::degrees(40.),
                aspect: width as f32 / height.max(1) as f32,
                near: 0.,
                far: 200.,
                eye: Vector3::new(0., 0., 100.),
                target: Vector3::default(),
                up: Vector3::new(0., 1., 0.),
                model_offset: Vector3::new(-35., -25., 0.),
            }),
        }
    }

    /// Returns the width of the window in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the window in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the projection of this viewport.
    #[must_use]
    pub const fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Returns the window position of `point`, measured in pixels from the
    /// top-left corner.
    ///
    /// Returns `None` if `point` is not in front of a perspective camera.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn project(&self, point: Vector3) -> Option<Vector2> {
        let size = Vector2::new(self.width as f32, self.height as f32);
        match self.projection {
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
            } => Some(Vector2::new(
                (point.x - left) / (right - left) * size.x,
                (top - point.y) / (top - bottom) * size.y,
            )),
            Projection::Perspective(camera) => {
                let forward = (camera.target - camera.eye).normalized();
                let side = forward.cross(camera.up).normalized();
                let up = side.cross(forward);

                let relative = point + camera.model_offset - camera.eye;
                let depth = relative.dot(forward);
                if depth <= camera.near.max(f32::EPSILON) || depth > camera.far {
                    return None;
                }

                let focal = 1. / (camera.fov_y.to_radians() / 2.).tan();
                let x = relative.dot(side) * focal / camera.aspect / depth;
                let y = relative.dot(up) * focal / depth;
                Some(Vector2::new((x + 1.) / 2. * size.x, (1. - y) / 2. * size.y))
            }
        }
    }

    /// Returns the 2D world position under the window position `screen`.
    ///
    /// Returns `None` for perspective viewports.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn screen_to_world(&self, screen: Vector2) -> Option<Vector2> {
        match self.projection {
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
            } => Some(Vector2::new(
                left + screen.x / self.width.max(1) as f32 * (right - left),
                top - screen.y / self.height.max(1) as f32 * (top - bottom),
            )),
            Projection::Perspective(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(actual: Vector2, expected: Vector2) {
        assert!(
            actual.distance(expected) < 1e-3,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn orthographic_corners() {
        let viewport = Viewport::orthographic(400, 300);
        assert_eq!(
            viewport.project(Vector3::new(-20., -20., 0.)),
            Some(Vector2::new(0., 300.))
        );
        assert_eq!(
            viewport.project(Vector3::new(400., 300., 0.)),
            Some(Vector2::new(400., 0.))
        );
    }

    #[test]
    fn screen_to_world_inverts_projection() {
        let viewport = Viewport::orthographic(1280, 720);
        let world = Vector2::new(150., 250.);
        let screen = viewport.project(world.into()).unwrap();
        assert_near(viewport.screen_to_world(screen).unwrap(), world);
        assert_eq!(
            viewport.screen_to_world(Vector2::new(0., 720.)),
            Some(Vector2::new(-20., -20.))
        );
    }

    #[test]
    fn perspective_centers_the_model_offset() {
        let viewport = Viewport::perspective(800, 600);
        assert_near(
            viewport.project(Vector3::new(35., 25., 0.)).unwrap(),
            Vector2::new(400., 300.),
        );

        // Further right in the world is further right on screen, and up is up.
        let right = viewport.project(Vector3::new(45., 25., 0.)).unwrap();
        assert!(right.x > 400.);
        let up = viewport.project(Vector3::new(35., 35., 0.)).unwrap();
        assert!(up.y < 300.);

        // Behind the camera.
        assert_eq!(viewport.project(Vector3::new(35., 25., 150.)), None);
        assert_eq!(viewport.screen_to_world(Vector2::new(1., 1.)), None);
    }
}
