//! The operations a rendering and input shell can perform on a chain.

use crate::{frame::Frame, spatial::RotationAxis, vector::Coordinate, viewport::Viewport};

/// Input-driven operations shared by every kind of chain.
///
/// Operations that only apply to one kind of chain do nothing by default.
pub trait ChainControls {
    /// Configures the projection for a window of `width` x `height` pixels.
    fn initialize_viewport(&mut self, width: u32, height: u32);

    /// Returns the viewport configured by
    /// [`initialize_viewport`](Self::initialize_viewport), if any.
    fn viewport(&self) -> Option<&Viewport>;

    /// Selects the parent of the active joint. Does nothing at the root.
    fn select_previous_joint(&mut self);

    /// Selects the child of the active joint. Does nothing at the tip.
    fn select_next_joint(&mut self);

    /// Rotates the active joint by `degrees`, keeping its angle within
    /// `[0, 360)`.
    fn rotate_active_joint(&mut self, degrees: f32);

    /// Queues the world position (`x`, `y`) to be attached to the nearest
    /// bone during the next frame.
    fn insert_point(&mut self, x: f32, y: f32) {
        let _ = (x, y);
    }

    /// Chooses which axis [`rotate_active_joint`](Self::rotate_active_joint)
    /// rotates around.
    fn select_rotation_axis(&mut self, axis: RotationAxis) {
        let _ = axis;
    }
}

/// A chain that can be solved and drawn.
pub trait ChainContext: ChainControls {
    /// The position type of the emitted draw commands.
    type Vector: Coordinate;

    /// Solves the chain and returns the commands needed to draw it.
    fn solve_and_emit_frame(&mut self) -> Frame<Self::Vector>;
}
