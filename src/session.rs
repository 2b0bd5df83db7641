//! Window, keyboard, and mouse state shared by both kinematics contexts.

use std::ops::ControlFlow;

use crate::{
    config::SticklerConfig,
    context::{ChainContext, ChainControls},
    frame::Frame,
    matrix::Matrix,
    planar::PlanarStickler,
    spatial::{RotationAxis, SpatialStickler},
    vector::{Vector2, Vector3},
    viewport::Viewport,
    Rotation,
};

/// The rotation applied to the 3D view per mouse movement while dragging.
pub const ORBIT_STEP: f32 = 1.;

/// The context a [`Session`] is displaying.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Mode {
    /// The 2D chain, which points can be attached to.
    #[default]
    Planar,
    /// The 3D chain.
    Spatial,
}

/// A key press a [`Session`] reacts to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Key {
    /// Rotates the active joint forward.
    Up,
    /// Rotates the active joint backward.
    Down,
    /// Selects the previous joint.
    Left,
    /// Selects the next joint.
    Right,
    /// Requests that the application exits.
    Escape,
    /// Any other character. In 3D, `x`, `y`, and `z` select the rotation
    /// axis.
    Character(char),
}

/// An entry of the application menu.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum MenuOption {
    /// Displays the 2D chain.
    SwitchToPlanar,
    /// Displays the 3D chain.
    SwitchToSpatial,
    /// Attaches a point at the mouse position to the 2D chain.
    AddVertex,
}

/// The draw commands of whichever context a [`Session`] is displaying.
#[derive(Debug)]
pub enum SessionFrame {
    /// A frame of the 2D chain.
    Planar(Frame<Vector2>),
    /// A frame of the 3D chain.
    Spatial(Frame<Vector3>),
}

/// Routes window events to the active kinematics context.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    planar: PlanarStickler,
    spatial: SpatialStickler,
    mode: Mode,
    width: u32,
    height: u32,
    cursor: Vector2,
    dragging: bool,
    orbit: Matrix,
    rotation_step: f32,
}

impl Session {
    /// Returns a session displaying the 2D chain in a window of `width` x
    /// `height` pixels.
    #[must_use]
    pub fn new(config: &SticklerConfig, width: u32, height: u32) -> Self {
        let mut session = Self {
            planar: PlanarStickler::new(&config.planar),
            spatial: SpatialStickler::new(&config.spatial),
            mode: Mode::Planar,
            width,
            height,
            cursor: Vector2::default(),
            dragging: false,
            orbit: Matrix::identity(3),
            rotation_step: config.rotation_step,
        };
        session.controls().initialize_viewport(width, height);
        session
    }

    /// Returns the context being displayed.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the 2D context.
    #[must_use]
    pub const fn planar(&self) -> &PlanarStickler {
        &self.planar
    }

    /// Returns the 3D context.
    #[must_use]
    pub const fn spatial(&self) -> &SpatialStickler {
        &self.spatial
    }

    /// Returns the accumulated rotation of the 3D view.
    #[must_use]
    pub const fn orbit(&self) -> &Matrix {
        &self.orbit
    }

    /// Returns the last known mouse position, in pixels from the top-left
    /// corner of the window.
    #[must_use]
    pub const fn cursor(&self) -> Vector2 {
        self.cursor
    }

    /// Returns the viewport of the context being displayed.
    #[must_use]
    pub fn viewport(&self) -> Option<&Viewport> {
        match self.mode {
            Mode::Planar => self.planar.viewport(),
            Mode::Spatial => self.spatial.viewport(),
        }
    }

    fn controls(&mut self) -> &mut dyn ChainControls {
        match self.mode {
            Mode::Planar => &mut self.planar,
            Mode::Spatial => &mut self.spatial,
        }
    }

    /// Applies a key press. Returns [`ControlFlow::Break`] when the
    /// application should exit.
    pub fn handle_key(&mut self, key: Key) -> ControlFlow<()> {
        let step = self.rotation_step;
        match key {
            Key::Up => self.controls().rotate_active_joint(step),
            Key::Down => self.controls().rotate_active_joint(-step),
            Key::Left => self.controls().select_previous_joint(),
            Key::Right => self.controls().select_next_joint(),
            Key::Escape => return ControlFlow::Break(()),
            Key::Character(ch @ ('x' | 'y' | 'z')) if self.mode == Mode::Spatial => {
                self.controls().select_rotation_axis(RotationAxis::from(ch));
            }
            Key::Character(_) => {}
        }
        ControlFlow::Continue(())
    }

    /// Applies a menu selection.
    pub fn select_menu(&mut self, option: MenuOption) {
        match option {
            MenuOption::SwitchToPlanar => self.switch_to(Mode::Planar),
            MenuOption::SwitchToSpatial => self.switch_to(Mode::Spatial),
            MenuOption::AddVertex => {
                if self.mode != Mode::Planar {
                    return;
                }
                let world = self
                    .planar
                    .viewport()
                    .and_then(|viewport| viewport.screen_to_world(self.cursor));
                if let Some(world) = world {
                    self.planar.insert_point(world.x, world.y);
                }
            }
        }
    }

    fn switch_to(&mut self, mode: Mode) {
        log::debug!("switching from {:?} to {mode:?}", self.mode);
        self.mode = mode;
        self.orbit = Matrix::identity(3);
        let (width, height) = (self.width, self.height);
        self.controls().initialize_viewport(width, height);
    }

    /// Records whether the primary mouse button is held down.
    pub fn mouse_button(&mut self, pressed: bool) {
        self.dragging = pressed;
    }

    /// Records the mouse position. While dragging in 3D, the view is rotated
    /// around the axis perpendicular to the movement.
    pub fn mouse_moved(&mut self, x: f32, y: f32) {
        let position = Vector2::new(x, y);
        if self.dragging && self.mode == Mode::Spatial {
            let delta = position - self.cursor;
            let step = Matrix::rotation_about(
                Vector3::new(delta.y, delta.x, 0.),
                Rotation::degrees(ORBIT_STEP),
            );
            self.orbit = self.orbit.product(&step);
        }
        self.cursor = position;
    }

    /// Records the new window size and updates the displayed context's
    /// viewport.
    pub fn reshape(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.controls().initialize_viewport(width, height);
    }

    /// Solves the displayed context and returns its draw commands.
    pub fn display(&mut self) -> SessionFrame {
        match self.mode {
            Mode::Planar => SessionFrame::Planar(self.planar.solve_and_emit_frame()),
            Mode::Spatial => SessionFrame::Spatial(self.spatial.solve_and_emit_frame()),
        }
    }

    /// Returns the window position of the world position `point`, including
    /// the 3D view rotation.
    #[must_use]
    pub fn project(&self, point: Vector3) -> Option<Vector2> {
        let point = match self.mode {
            Mode::Planar => point,
            Mode::Spatial => self.orbit.transform(point),
        };
        self.viewport()?.project(point)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&SticklerConfig::default(), 640, 480)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, DrawCommand, Projection};

    #[test]
    fn starts_in_planar_mode() {
        let mut session = Session::default();
        assert_eq!(session.mode(), Mode::Planar);
        assert!(matches!(
            session.viewport().map(Viewport::projection),
            Some(Projection::Orthographic { .. })
        ));
        assert!(matches!(session.display(), SessionFrame::Planar(_)));
    }

    #[test]
    fn keys_drive_the_active_context() {
        let mut session = Session::default();
        assert_eq!(session.handle_key(Key::Right), ControlFlow::Continue(()));
        assert_eq!(session.handle_key(Key::Up), ControlFlow::Continue(()));
        assert_eq!(session.handle_key(Key::Up), ControlFlow::Continue(()));
        assert_eq!(session.handle_key(Key::Down), ControlFlow::Continue(()));

        let skeleton = session.planar().skeleton();
        let active = skeleton.active_joint();
        assert_eq!(skeleton[active].orientation().to_degrees(), 10.);
        assert_eq!(skeleton[active].parent(), Some(skeleton.root()));

        session.handle_key(Key::Left);
        session.handle_key(Key::Left);
        assert_eq!(
            session.planar().skeleton().active_joint(),
            session.planar().skeleton().root()
        );
        assert_eq!(session.handle_key(Key::Escape), ControlFlow::Break(()));
    }

    #[test]
    fn axis_keys_only_apply_in_3d() {
        let mut session = Session::default();
        session.handle_key(Key::Character('x'));
        assert_eq!(session.spatial().rotation_axis(), RotationAxis::Z);

        session.select_menu(MenuOption::SwitchToSpatial);
        session.handle_key(Key::Character('x'));
        assert_eq!(session.spatial().rotation_axis(), RotationAxis::X);
        session.handle_key(Key::Character('q'));
        assert_eq!(session.spatial().rotation_axis(), RotationAxis::X);

        session.handle_key(Key::Down);
        let skeleton = session.spatial().skeleton();
        let orientation = skeleton[skeleton.root()].orientation();
        assert_eq!(orientation.get(RotationAxis::X).to_degrees(), 350.);
        assert_eq!(orientation.get(RotationAxis::Z).to_degrees(), 0.);
    }

    #[test]
    fn switching_modes_keeps_each_chain() {
        let mut session = Session::default();
        session.handle_key(Key::Up);
        session.select_menu(MenuOption::SwitchToSpatial);
        assert_eq!(session.mode(), Mode::Spatial);
        assert!(matches!(session.display(), SessionFrame::Spatial(_)));
        assert!(matches!(
            session.viewport().map(Viewport::projection),
            Some(Projection::Perspective(_))
        ));

        session.select_menu(MenuOption::SwitchToPlanar);
        let skeleton = session.planar().skeleton();
        assert_eq!(skeleton[skeleton.root()].orientation().to_degrees(), 10.);
    }

    #[test]
    fn add_vertex_uses_the_cursor() {
        let mut session = Session::new(&SticklerConfig::default(), 620, 420);
        // The window center, past the 20 unit margin.
        session.mouse_moved(310., 210.);
        session.select_menu(MenuOption::AddVertex);
        assert_eq!(session.planar().pending_points(), [Vector2::new(300., 200.)]);

        let SessionFrame::Planar(_) = session.display() else {
            unreachable!()
        };
        assert!(session.planar().pending_points().is_empty());
        assert_eq!(
            session.planar().skeleton().bones()[1].attachments(),
            [Vector2::new(50., 50.)]
        );

        session.select_menu(MenuOption::SwitchToSpatial);
        session.select_menu(MenuOption::AddVertex);
        session.select_menu(MenuOption::SwitchToPlanar);
        assert!(session.planar().pending_points().is_empty());
    }

    #[test]
    fn dragging_orbits_only_in_3d() {
        let mut session = Session::default();
        session.mouse_button(true);
        session.mouse_moved(10., 10.);
        session.mouse_moved(20., 10.);
        assert_eq!(session.orbit(), &Matrix::identity(3));

        session.select_menu(MenuOption::SwitchToSpatial);
        session.mouse_moved(30., 10.);
        let expected = Matrix::rotation_about(Vector3::new(0., 10., 0.), Rotation::degrees(1.));
        assert_eq!(session.orbit(), &expected);

        session.mouse_button(false);
        session.mouse_moved(80., 40.);
        assert_eq!(session.orbit(), &expected);
        assert_eq!(session.cursor(), Vector2::new(80., 40.));
    }

    #[test]
    fn oversized_chains_do_not_end_the_session() {
        let mut config = SticklerConfig::default();
        config.planar.segments = 300;
        config.spatial.segments = 1000;
        let mut session = Session::new(&config, 640, 480);
        assert_eq!(session.planar().skeleton().bones().len(), 255);
        assert_eq!(session.spatial().skeleton().bones().len(), 255);
        assert!(matches!(session.display(), SessionFrame::Planar(_)));
    }

    #[test]
    fn reshape_updates_the_viewport() {
        let mut session = Session::default();
        session.reshape(1024, 768);
        let viewport = session.viewport().unwrap();
        assert_eq!((viewport.width(), viewport.height()), (1024, 768));

        session.select_menu(MenuOption::SwitchToSpatial);
        let viewport = session.viewport().unwrap();
        assert_eq!((viewport.width(), viewport.height()), (1024, 768));
    }

    #[test]
    fn projection_follows_the_mode() {
        let mut session = Session::new(&SticklerConfig::default(), 620, 420);
        assert_eq!(
            session.project(Vector2::new(300., 200.).to_vector3()),
            Some(Vector2::new(310., 210.))
        );
        let SessionFrame::Planar(frame) = session.display() else {
            unreachable!()
        };
        let first_vertex = frame
            .filter_map(|command| match command {
                DrawCommand::Vertex { position, .. } => Some(position),
                _ => None,
            })
            .next();
        assert_eq!(first_vertex, Some(Vector2::new(150., 150.)));

        session.select_menu(MenuOption::SwitchToSpatial);
        assert!(session.project(Vector3::new(10., 10., 10.)).is_some());
    }
}
