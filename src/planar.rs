//! The 2D kinematics context.

use crate::{
    config::ChainConfig,
    context::{ChainContext, ChainControls},
    frame::Frame,
    skeleton::{Planar, Skeleton, Solution},
    vector::Vector2,
    viewport::Viewport,
};

/// The length of the world axes drawn in 2D.
pub const WORLD_AXIS_LENGTH: f32 = 500.;

/// A 2D chain whose bones can have points attached to them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarStickler {
    skeleton: Skeleton<Planar>,
    pending: Vec<Vector2>,
    viewport: Option<Viewport>,
}

impl PlanarStickler {
    /// Returns a context for the chain described by `config`.
    #[must_use]
    pub fn new(config: &ChainConfig<Vector2>) -> Self {
        Self::from_skeleton(Skeleton::from_config(config))
    }

    /// Returns a context for an existing skeleton.
    #[must_use]
    pub fn from_skeleton(skeleton: Skeleton<Planar>) -> Self {
        Self {
            skeleton,
            pending: Vec::new(),
            viewport: None,
        }
    }

    /// Returns the chain.
    #[must_use]
    pub const fn skeleton(&self) -> &Skeleton<Planar> {
        &self.skeleton
    }

    /// Returns the chain for modification.
    pub fn skeleton_mut(&mut self) -> &mut Skeleton<Planar> {
        &mut self.skeleton
    }

    /// Returns the points waiting to be attached, oldest first.
    #[must_use]
    pub fn pending_points(&self) -> &[Vector2] {
        &self.pending
    }

    /// Attaches every pending point to its nearest bone, most recently
    /// inserted first.
    fn resolve_pending(&mut self, solution: &Solution<Planar>) {
        while let Some(point) = self.pending.pop() {
            if self.skeleton.attach_nearest(point, solution).is_none() {
                log::warn!("discarding {point:?}: the chain has no bones");
            }
        }
    }
}

impl Default for PlanarStickler {
    fn default() -> Self {
        Self::new(&ChainConfig::default())
    }
}

impl ChainControls for PlanarStickler {
    fn initialize_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some(Viewport::orthographic(width, height));
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
        joint.set_orientation(joint.orientation().rotated_by(degrees));
    }

    fn insert_point(&mut self, x: f32, y: f32) {
        self.pending.push(Vector2::new(x, y));
    }
}

impl ChainContext for PlanarStickler {
    type Vector = Vector2;

    fn solve_and_emit_frame(&mut self) -> Frame<Vector2> {
        let solution = self.skeleton.solve();
        let frame = Frame::from_solution(&solution, WORLD_AXIS_LENGTH);
        self.resolve_pending(&solution);
        frame
    }
}
