//! The 3D kinematics context.

use crate::{
    config::ChainConfig,
    context::{ChainContext, ChainControls},
    frame::Frame,
    skeleton::{Skeleton, Spatial},
    vector::Vector3,
    viewport::Viewport,
    Rotation,
};

/// The length of the world axes drawn in 3D.
pub const WORLD_AXIS_LENGTH: f32 = 20.;

/// An axis a 3D joint can rotate around.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum RotationAxis {
    /// The x-axis.
    X,
    /// The y-axis.
    Y,
    /// The z-axis.
    #[default]
    Z,
}

impl From<char> for RotationAxis {
    /// Maps `x`, `y`, and `z` (in either case) to their axis. Any other
    /// character selects [`RotationAxis::Z`].
    fn from(value: char) -> Self {
        match value.to_ascii_lowercase() {
            'x' => Self::X,
            'y' => Self::Y,
            _ => Self::Z,
        }
    }
}

/// The rotation of a 3D joint around each axis.
///
/// The rotations are combined as `Rx * Ry * Rz`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Orientation {
    /// The rotation around the x-axis.
    pub x: Rotation,
    /// The rotation around the y-axis.
    pub y: Rotation,
    /// The rotation around the z-axis.
    pub z: Rotation,
}

impl Orientation {
    /// Returns the rotation around `axis`.
    #[must_use]
    pub const fn get(&self, axis: RotationAxis) -> Rotation {
        match axis {
            RotationAxis::X => self.x,
            RotationAxis::Y => self.y,
            RotationAxis::Z => self.z,
        }
    }

    /// Returns this orientation with `degrees` added to the rotation around
    /// `axis`.
    #[must_use]
    pub fn rotated(mut self, axis: RotationAxis, degrees: f32) -> Self {
        let rotation = match axis {
            RotationAxis::X => &mut self.x,
            RotationAxis::Y => &mut self.y,
            RotationAxis::Z => &mut self.z,
        };
        *rotation = rotation.rotated_by(degrees);
        self
    }
}

/// A 3D chain rotated around one selectable axis at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialStickler {
    skeleton: Skeleton<Spatial>,
    axis: RotationAxis,
    viewport: Option<Viewport>,
}

impl SpatialStickler {
    /// Returns a context for the chain described by `config`.
    #[must_use]
    pub fn new(config: &ChainConfig<Vector3>) -> Self {
        Self::from_skeleton(Skeleton::from_config(config))
    }

    /// Returns a context for an existing skeleton.
    #[must_use]
    pub fn from_skeleton(skeleton: Skeleton<Spatial>) -> Self {
        Self {
            skeleton,
            axis: RotationAxis::default(),
            viewport: None,
        }
    }

    /// Returns the chain.
    #[must_use]
    pub const fn skeleton(&self) -> &Skeleton<Spatial> {
        &self.skeleton
    }

    /// Returns the chain for modification.
    pub fn skeleton_mut(&mut self) -> &mut Skeleton<Spatial> {
        &mut self.skeleton
    }

    /// Returns the axis the active joint is rotated around.
    #[must_use]
    pub const fn rotation_axis(&self) -> RotationAxis {
        self.axis
    }
}

impl Default for SpatialStickler {
    fn default() -> Self {
        Self::new(&ChainConfig::default())
    }
}

impl ChainControls for SpatialStickler {
    fn initialize_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some(Viewport::perspective(width, height));
    }

    fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    fn select_previous_joint(&mut self) {
        self.skeleton.select_previous_joint();
    }

    fn select_next_joint(&mut self) {
        self.skeleton.select_next_joint();
    }

    fn rotate_active_joint(&mut self, degrees: f32) {
        let active = self.skeleton.active_joint();
        let joint = &mut self.skeleton[active];
        joint.set_orientation(joint.orientation().rotated(self.axis, degrees));
    }

    fn select_rotation_axis(&mut self, axis: RotationAxis) {
        log::debug!("rotating around {axis:?}");
        self.axis = axis;
    }
}

impl ChainContext for SpatialStickler {
    type Vector = Vector3;

    fn solve_and_emit_frame(&mut self) -> Frame<Vector3> {
        Frame::from_solution(&self.skeleton.solve(), WORLD_AXIS_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawCommand, SolvedJoint};

    #[test]
    fn axis_from_char() {
        assert_eq!(RotationAxis::from('x'), RotationAxis::X);
        assert_eq!(RotationAxis::from('Y'), RotationAxis::Y);
        assert_eq!(RotationAxis::from('z'), RotationAxis::Z);
        assert_eq!(RotationAxis::from('q'), RotationAxis::Z);
        assert_eq!(RotationAxis::default(), RotationAxis::Z);
    }

    #[test]
    fn rotates_around_the_selected_axis() {
        let mut context = SpatialStickler::default();
        context.rotate_active_joint(10.);
        context.select_rotation_axis(RotationAxis::X);
        context.rotate_active_joint(-20.);
        context.select_rotation_axis(RotationAxis::Y);
        context.rotate_active_joint(370.);

        let root = context.skeleton().root();
        let orientation = context.skeleton()[root].orientation();
        assert_eq!(orientation.get(RotationAxis::X).to_degrees(), 340.);
        assert_eq!(orientation.get(RotationAxis::Y).to_degrees(), 10.);
        assert_eq!(orientation.get(RotationAxis::Z).to_degrees(), 10.);
    }

    #[test]
    fn rotation_composes_x_then_y() {
        let mut context = SpatialStickler::new(&ChainConfig {
            origin: Vector3::default(),
            segment_length: 10.,
            segments: 1,
        });
        context.select_rotation_axis(RotationAxis::X);
        context.rotate_active_joint(90.);
        context.select_rotation_axis(RotationAxis::Y);
        context.rotate_active_joint(90.);

        let solution = context.skeleton().solve();
        let tip = solution.joints()[1].position();
        // Ry sends the x-axis to -z, which Rx then sends to y.
        assert!(tip.distance(Vector3::new(0., 10., 0.)) < 1e-4, "{tip:?}");
    }

    #[test]
    fn points_are_not_attached() {
        let mut context = SpatialStickler::default();
        context.insert_point(30., 10.);
        let frame = context.solve_and_emit_frame();
        let vertices = frame
            .filter(|command| matches!(command, DrawCommand::Vertex { .. }))
            .count();
        assert_eq!(vertices, context.skeleton().joints().len());
        assert!(context
            .skeleton()
            .bones()
            .iter()
            .all(|bone| bone.attachments().is_empty()));
    }

    #[test]
    fn frames_are_repeatable() {
        let mut context = SpatialStickler::default();
        context.select_next_joint();
        context.select_rotation_axis(RotationAxis::Y);
        context.rotate_active_joint(40.);

        let first = context.solve_and_emit_frame().collect::<Vec<_>>();
        let second = context.solve_and_emit_frame().collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn reference_chain() {
        let mut context = SpatialStickler::default();
        context.initialize_viewport(800, 600);
        assert!(matches!(
            context.viewport().map(Viewport::projection),
            Some(crate::Projection::Perspective(_))
        ));

        let positions = context
            .skeleton()
            .solve()
            .joints()
            .iter()
            .map(SolvedJoint::position)
            .collect::<Vec<_>>();
        assert_eq!(
            positions,
            [
                Vector3::new(10., 10., 10.),
                Vector3::new(30., 10., 10.),
                Vector3::new(50., 10., 10.),
                Vector3::new(70., 10., 10.),
            ]
        );
        let mut frame = context.solve_and_emit_frame();
        assert_eq!(frame.next(), Some(DrawCommand::WorldAxes { length: 20. }));
    }
}
