//! Draw commands produced for a renderer each frame.

use std::{iter::FusedIterator, vec};

use crate::skeleton::{Dimension, Solution};

/// The thickness of the line connecting a joint to its parent.
pub const LINK_THICKNESS: f32 = 2.;
/// The thickness of a joint's local axis lines.
pub const AXIS_THICKNESS: f32 = 3.;
/// The radius of the vertex drawn for an attached point.
pub const ATTACHMENT_RADIUS: f32 = 2.;

/// A color a [`DrawCommand`] can be drawn in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum Color {
    /// Black.
    Black,
    /// White.
    White,
    /// Red. Used for x-axes.
    Red,
    /// Green. Used for z-axes.
    Green,
    /// Blue. Used for y-axes.
    Blue,
}

/// A single primitive to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum DrawCommand<V> {
    /// The world coordinate axes, drawn from the origin.
    WorldAxes {
        /// The length of each axis.
        length: f32,
    },
    /// A filled circle (or sphere) at a position.
    Vertex {
        /// The world position of the vertex.
        position: V,
        /// The radius of the vertex.
        radius: f32,
        /// True if this vertex is the active joint.
        highlight: bool,
    },
    /// A line segment between two points.
    Line {
        /// The world position the line starts at.
        start: V,
        /// The world position the line ends at.
        end: V,
        /// The thickness of the line.
        thickness: f32,
        /// The color of the line.
        color: Color,
    },
}

/// The draw commands for a single frame.
///
/// A frame can only be iterated once.
#[derive(Debug)]
#[must_use]
pub struct Frame<V> {
    commands: vec::IntoIter<DrawCommand<V>>,
}

impl<V: Copy> Frame<V> {
    /// Returns the draw commands that visualize `solution`, preceded by the
    /// world axes.
    pub fn from_solution<D>(solution: &Solution<D>, world_axis_length: f32) -> Self
    where
        D: Dimension<Vector = V>,
    {
        let mut commands = vec![DrawCommand::WorldAxes {
            length: world_axis_length,
        }];
        for joint in solution.joints() {
            let position = joint.position();
            commands.push(DrawCommand::Vertex {
                position,
                radius: D::JOINT_RADIUS,
                highlight: joint.is_active(),
            });

            if let Some(parent) = joint.parent_position() {
                commands.push(DrawCommand::Line {
                    start: parent,
                    end: position,
                    thickness: LINK_THICKNESS,
                    color: D::LINK_COLOR,
                });
            }

            for bone in joint.bones() {
                commands.extend(bone.attachments().iter().map(|&position| {
                    DrawCommand::Vertex {
                        position,
                        radius: ATTACHMENT_RADIUS,
                        highlight: false,
                    }
                }));
            }

            commands.extend(joint.axes().iter().map(|&(end, color)| DrawCommand::Line {
                start: position,
                end,
                thickness: AXIS_THICKNESS,
                color,
            }));
        }

        Self {
            commands: commands.into_iter(),
        }
    }
}

impl<V> Iterator for Frame<V> {
    type Item = DrawCommand<V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.commands.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.commands.size_hint()
    }
}

impl<V> ExactSizeIterator for Frame<V> {}

impl<V> FusedIterator for Frame<V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChainConfig, Planar, Skeleton, Spatial, Vector2, Vector3};

    #[test]
    fn planar_frame_layout() {
        let mut skeleton = Skeleton::<Planar>::new(Vector2::new(1., 1.));
        skeleton.push_joint(skeleton.root(), Vector2::new(10., 0.));
        let commands = Frame::from_solution(&skeleton.solve(), 500.).collect::<Vec<_>>();
        assert_eq!(
            commands,
            [
                DrawCommand::WorldAxes { length: 500. },
                DrawCommand::Vertex {
                    position: Vector2::new(1., 1.),
                    radius: 5.,
                    highlight: true,
                },
                DrawCommand::Line {
                    start: Vector2::new(1., 1.),
                    end: Vector2::new(51., 1.),
                    thickness: 3.,
                    color: Color::Red,
                },
                DrawCommand::Line {
                    start: Vector2::new(1., 1.),
                    end: Vector2::new(1., 51.),
                    thickness: 3.,
                    color: Color::Blue,
                },
                DrawCommand::Vertex {
                    position: Vector2::new(11., 1.),
                    radius: 5.,
                    highlight: false,
                },
                DrawCommand::Line {
                    start: Vector2::new(1., 1.),
                    end: Vector2::new(11., 1.),
                    thickness: 2.,
                    color: Color::Black,
                },
                DrawCommand::Line {
                    start: Vector2::new(11., 1.),
                    end: Vector2::new(61., 1.),
                    thickness: 3.,
                    color: Color::Red,
                },
                DrawCommand::Line {
                    start: Vector2::new(11., 1.),
                    end: Vector2::new(11., 51.),
                    thickness: 3.,
                    color: Color::Blue,
                },
            ]
        );
    }

    #[test]
    fn spatial_frame_counts() {
        let skeleton = Skeleton::<Spatial>::from_config(&ChainConfig::<Vector3>::default());
        let frame = Frame::from_solution(&skeleton.solve(), 20.);
        // World axes, then per joint: vertex and three axes, plus a link for
        // every joint but the root.
        assert_eq!(frame.len(), 1 + 4 * 4 + 3);
        let links = frame
            .filter(|command| {
                matches!(
                    command,
                    DrawCommand::Line {
                        color: Color::White,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(links, 3);
    }
}
