#![allow(missing_docs)]

use crate::{
    frame, Coordinate, DrawCommand, Key, MenuOption, Session, SessionFrame, Vector2, Vector3,
};
use cushy::{
    context::{EventContext, GraphicsContext, LayoutContext},
    figures::{
        units::{Px, UPx},
        FloatConversion, IntoComponents, Point, Size,
    },
    kludgine::{
        app::winit::{
            event::{KeyEvent, MouseButton},
            keyboard::{Key as WinitKey, NamedKey},
            window::CursorIcon,
        },
        shapes::{PathBuilder, Shape, StrokeOptions},
        DrawableExt, Origin,
    },
    styles::Color,
    value::Dynamic,
    widget::{Callback, EventHandling, Widget, HANDLED, IGNORED},
    window::DeviceId,
    ConstraintLimit,
};

const PLANAR_BACKGROUND: Color = Color::new(217, 217, 204, 255);
const SPATIAL_BACKGROUND: Color = Color::new(0, 0, 26, 255);
const WORLD_AXIS_THICKNESS: f32 = 3.;

#[derive(Debug)]
pub struct SticklerCanvas {
    session: Dynamic<Session>,
    on_exit: Option<Callback<()>>,
}

impl SticklerCanvas {
    #[must_use]
    pub fn new(session: Dynamic<Session>) -> Self {
        Self {
            session,
            on_exit: None,
        }
    }

    /// Invokes `on_exit` when escape is pressed.
    #[must_use]
    pub fn on_exit<F>(mut self, on_exit: F) -> Self
    where
        F: FnMut(()) + Send + 'static,
    {
        self.on_exit = Some(Callback::new(on_exit));
        self
    }
}

struct Painter<'a> {
    session: &'a Session,
    vertex_color: Color,
}

impl Painter<'_> {
    fn point(&self, position: Vector3) -> Option<Point<Px>> {
        self.session
            .project(position)
            .map(|screen| screen.to_vec::<Point<f32>>().map(Px::from))
    }

    fn line(
        &self,
        context: &mut GraphicsContext<'_, '_, '_, '_>,
        start: Vector3,
        end: Vector3,
        thickness: f32,
        color: Color,
    ) {
        let (Some(start), Some(end)) = (self.point(start), self.point(end)) else {
            return;
        };
        let path = PathBuilder::new(start).line_to(end).build();
        let stroke = StrokeOptions::px_wide(Px::from(thickness)).colored(color);
        context.gfx.draw_shape(&path.stroke(stroke));
    }

    fn vertex(
        &self,
        context: &mut GraphicsContext<'_, '_, '_, '_>,
        position: Vector3,
        radius: f32,
        highlight: bool,
    ) {
        let Some(center) = self.point(position) else {
            return;
        };
        // Measured on screen so that 3D vertices shrink with distance.
        let radius = self
            .point(position + Vector3::new(radius, 0., 0.))
            .map_or(Px::from(radius), |edge| {
                let delta = (edge - center).map(FloatConversion::into_float);
                Px::from(delta.x.hypot(delta.y).max(1.))
            });
        let color = if highlight {
            Color::MAGENTA
        } else {
            self.vertex_color
        };
        context
            .gfx
            .draw_shape(Shape::filled_circle(radius, color, Origin::Center).translate_by(center));
    }

    fn paint<V: Coordinate>(
        &self,
        context: &mut GraphicsContext<'_, '_, '_, '_>,
        commands: impl Iterator<Item = DrawCommand<V>>,
        world_axes: &[(Vector3, frame::Color)],
    ) {
        for command in commands {
            match command {
                DrawCommand::WorldAxes { length } => {
                    for &(axis, color) in world_axes {
                        self.line(
                            context,
                            Vector3::default(),
                            axis * length,
                            WORLD_AXIS_THICKNESS,
                            color_of(color),
                        );
                    }
                }
                DrawCommand::Vertex {
                    position,
                    radius,
                    highlight,
                } => self.vertex(context, position.to_vector3(), radius, highlight),
                DrawCommand::Line {
                    start,
                    end,
                    thickness,
                    color,
                } => self.line(
                    context,
                    start.to_vector3(),
                    end.to_vector3(),
                    thickness,
                    color_of(color),
                ),
            }
        }
    }
}

fn color_of(color: frame::Color) -> Color {
    match color {
        frame::Color::Black => Color::BLACK,
        frame::Color::White => Color::WHITE,
        frame::Color::Red => Color::RED,
        frame::Color::Green => Color::GREEN,
        frame::Color::Blue => Color::BLUE,
    }
}

const PLANAR_AXES: [(Vector3, frame::Color); 2] = [
    (Vector3::new(1., 0., 0.), frame::Color::Red),
    (Vector3::new(0., 1., 0.), frame::Color::Blue),
];

const SPATIAL_AXES: [(Vector3, frame::Color); 3] = [
    (Vector3::new(1., 0., 0.), frame::Color::Red),
    (Vector3::new(0., 1., 0.), frame::Color::Blue),
    (Vector3::new(0., 0., 1.), frame::Color::Green),
];

impl Widget for SticklerCanvas {
    fn redraw(&mut self, context: &mut GraphicsContext<'_, '_, '_, '_>) {
        context.redraw_when_changed(&self.session);
        let size = context.gfx.size();
        let mut session = self.session.lock();
        session.prevent_notifications();
        let current = session
            .viewport()
            .map(|viewport| (viewport.width(), viewport.height()));
        if current != Some((size.width.get(), size.height.get())) {
            session.reshape(size.width.get(), size.height.get());
        }

        let drawn = session.display();
        let (background, vertex_color) = match &drawn {
            SessionFrame::Planar(_) => (PLANAR_BACKGROUND, Color::BLACK),
            SessionFrame::Spatial(_) => (SPATIAL_BACKGROUND, Color::WHITE),
        };
        context.gfx.fill(background);

        let painter = Painter {
            session: &*session,
            vertex_color,
        };
        match drawn {
            SessionFrame::Planar(commands) => painter.paint(context, commands, &PLANAR_AXES),
            SessionFrame::Spatial(commands) => painter.paint(context, commands, &SPATIAL_AXES),
        }
    }

    fn layout(
        &mut self,
        available_space: Size<ConstraintLimit>,
        _context: &mut LayoutContext<'_, '_, '_, '_>,
    ) -> Size<UPx> {
        available_space.map(ConstraintLimit::max)
    }

    fn accept_focus(&mut self, _context: &mut EventContext<'_>) -> bool {
        true
    }

    fn hover(&mut self, location: Point<Px>, _context: &mut EventContext<'_>) -> Option<CursorIcon> {
        let location = to_vector(location);
        let mut session = self.session.lock();
        session.prevent_notifications();
        session.mouse_moved(location.x, location.y);
        None
    }

    fn mouse_down(
        &mut self,
        location: Point<Px>,
        _device_id: DeviceId,
        button: MouseButton,
        context: &mut EventContext<'_>,
    ) -> EventHandling {
        let location = to_vector(location);
        let mut session = self.session.lock();
        session.mouse_moved(location.x, location.y);
        match button {
            MouseButton::Left => {
                context.focus();
                session.mouse_button(true);
                HANDLED
            }
            MouseButton::Right => {
                session.select_menu(MenuOption::AddVertex);
                HANDLED
            }
            _ => IGNORED,
        }
    }

    fn mouse_drag(
        &mut self,
        location: Point<Px>,
        _device_id: DeviceId,
        _button: MouseButton,
        _context: &mut EventContext<'_>,
    ) {
        let location = to_vector(location);
        self.session.lock().mouse_moved(location.x, location.y);
    }

    fn mouse_up(
        &mut self,
        _location: Option<Point<Px>>,
        _device_id: DeviceId,
        button: MouseButton,
        _context: &mut EventContext<'_>,
    ) {
        if button == MouseButton::Left {
            self.session.lock().mouse_button(false);
        }
    }

    fn keyboard_input(
        &mut self,
        _device_id: DeviceId,
        input: KeyEvent,
        _is_synthetic: bool,
        _context: &mut EventContext<'_>,
    ) -> EventHandling {
        if !input.state.is_pressed() {
            return IGNORED;
        }
        let key = match &input.logical_key {
            WinitKey::Named(NamedKey::ArrowUp) => Key::Up,
            WinitKey::Named(NamedKey::ArrowDown) => Key::Down,
            WinitKey::Named(NamedKey::ArrowLeft) => Key::Left,
            WinitKey::Named(NamedKey::ArrowRight) => Key::Right,
            WinitKey::Named(NamedKey::Escape) => Key::Escape,
            WinitKey::Character(text) => match text.chars().next() {
                Some(ch) => Key::Character(ch),
                None => return IGNORED,
            },
            _ => return IGNORED,
        };

        let flow = self.session.lock().handle_key(key);
        if flow.is_break() {
            if let Some(on_exit) = &mut self.on_exit {
                on_exit.invoke(());
            }
        }
        HANDLED
    }

    fn hit_test(&mut self, _location: Point<Px>, _context: &mut EventContext<'_>) -> bool {
        true
    }
}

fn to_vector(location: Point<Px>) -> Vector2 {
    location
        .map(FloatConversion::into_float)
        .to_vec::<Vector2>()
}

#[test]
fn colors() {
    assert_eq!(color_of(frame::Color::Red), Color::RED);
    assert_eq!(color_of(frame::Color::Black), Color::BLACK);
    let axes = PLANAR_AXES.iter().chain(&SPATIAL_AXES);
    assert!(axes.all(|(axis, _)| axis.magnitude() == 1.));
}
