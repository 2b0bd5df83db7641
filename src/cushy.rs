//! A widget that displays and controls a [`Session`](crate::Session).

use crate::Vector2;

pub mod stickler_canvas;

impl cushy::figures::IntoComponents<f32> for Vector2 {
    fn into_components(self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl cushy::figures::FromComponents<f32> for Vector2 {
    fn from_components(components: (f32, f32)) -> Self {
        Self::new(components.0, components.1)
    }
}
