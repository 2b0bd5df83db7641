//! Joints, bones, and the forward-kinematics solver.
//!
//! A [`Skeleton`] stores its joints and bones in arenas addressed by
//! [`JointId`] and [`BoneId`]. Each joint has a translation that is fixed
//! relative to its parent and an orientation that can change at runtime.
//! [`Skeleton::solve`] walks the joints from the root and accumulates the
//! parent rotations to produce world-space positions:
//!
//! ```text
//! P[n] = P[n-1] + S[n-1] (T[n] + R[n] local)
//! S[n] = S[n-1] R[n]
//! ```

use std::{
    fmt::Debug,
    ops::{Index, IndexMut},
};

use crate::{
    config::{ChainConfig, MAX_SEGMENTS},
    frame::Color,
    matrix::Matrix,
    spatial::Orientation,
    vector::{Coordinate, Vector2, Vector3},
    Rotation,
};

/// The space a [`Skeleton`] is solved in.
pub trait Dimension: Debug + Clone + Copy + PartialEq + Default + 'static {
    /// The position type of this space.
    type Vector: Coordinate;
    /// The rotation state of a single joint.
    type Orientation: Copy + Default + Debug + PartialEq;

    /// Local axis endpoints drawn for every joint, along with their colors.
    const LOCAL_AXES: &'static [(Self::Vector, Color)];
    /// The color of the line connecting a joint to its parent.
    const LINK_COLOR: Color;
    /// The radius of the vertex drawn at each joint.
    const JOINT_RADIUS: f32;

    /// Returns the rotation matrix for `orientation`.
    fn rotation_matrix(orientation: &Self::Orientation) -> Matrix;
}

/// Two dimensional skeletons, with a single rotation angle per joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Planar;

impl Dimension for Planar {
    type Vector = Vector2;
    type Orientation = Rotation;

    const LOCAL_AXES: &'static [(Vector2, Color)] = &[
        (Vector2::new(50., 0.), Color::Red),
        (Vector2::new(0., 50.), Color::Blue),
    ];
    const LINK_COLOR: Color = Color::Black;
    const JOINT_RADIUS: f32 = 5.;

    fn rotation_matrix(orientation: &Rotation) -> Matrix {
        Matrix::rotation(*orientation)
    }
}

/// Three dimensional skeletons, with pitch, yaw, and roll per joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spatial;

impl Dimension for Spatial {
    type Vector = Vector3;
    type Orientation = Orientation;

    const LOCAL_AXES: &'static [(Vector3, Color)] = &[
        (Vector3::new(10., 0., 0.), Color::Red),
        (Vector3::new(0., 10., 0.), Color::Blue),
        (Vector3::new(0., 0., 10.), Color::Green),
    ];
    const LINK_COLOR: Color = Color::White;
    const JOINT_RADIUS: f32 = 1.;

    /// Returns `Rx * Ry * Rz`. This order is not interchangeable.
    fn rotation_matrix(orientation: &Orientation) -> Matrix {
        Matrix::rotation_x(orientation.x)
            .product(&Matrix::rotation_y(orientation.y))
            .product(&Matrix::rotation_z(orientation.z))
    }
}

/// A chain of [`Joint`]s connected by [`Bone`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton<D: Dimension> {
    joints: Vec<Joint<D>>,
    bones: Vec<Bone<D>>,
    active: JointId,
}

impl<D: Dimension> Skeleton<D> {
    /// Returns a skeleton containing only a root joint at `translation`.
    #[must_use]
    pub fn new(translation: D::Vector) -> Self {
        Self {
            joints: vec![Joint::new(translation, None)],
            bones: Vec::new(),
            active: JointId(0),
        }
    }

    /// Returns a straight chain of `config.segments` bones extending along
    /// the x-axis from `config.origin`.
    ///
    /// At most [`MAX_SEGMENTS`] bones are created.
    #[must_use]
    pub fn from_config(config: &ChainConfig<D::Vector>) -> Self {
        let segments = if config.segments > MAX_SEGMENTS {
            log::warn!(
                "limiting chain of {} segments to {MAX_SEGMENTS}",
                config.segments
            );
            MAX_SEGMENTS
        } else {
            config.segments
        };
        let mut skeleton = Self::new(config.origin);
        let mut tip = skeleton.root();
        for _ in 0..segments {
            tip = skeleton.push_joint(tip, D::Vector::along_x(config.segment_length));
        }
        skeleton
    }

    /// Creates a new [`Joint`] connected to `parent` by a new [`Bone`].
    /// Returns the unique id of the created joint.
    ///
    /// `translation` is the joint's offset in its parent's local frame.
    pub fn push_joint(&mut self, parent: JointId, translation: D::Vector) -> JointId {
        let id = JointId(u8::try_from(self.joints.len()).expect("too many joints"));
        let bone = BoneId(u8::try_from(self.bones.len()).expect("too many bones"));
        self.joints.push(Joint::new(translation, Some(parent)));
        self.bones.push(Bone {
            length: translation.distance(D::Vector::default()),
            center: translation / 2.,
            connection: (parent, id),
            attachments: Vec::new(),
        });
        let parent = &mut self[parent];
        parent.children.push(id);
        parent.bones.push(bone);
        id
    }

    /// Returns the id of the root joint.
    #[must_use]
    pub const fn root(&self) -> JointId {
        JointId(0)
    }

    /// Returns the list of joints in this skeleton.
    #[must_use]
    pub fn joints(&self) -> &[Joint<D>] {
        &self.joints
    }

    /// Returns the list of bones in this skeleton.
    #[must_use]
    pub fn bones(&self) -> &[Bone<D>] {
        &self.bones
    }

    /// Returns the joint currently selected for manipulation.
    #[must_use]
    pub const fn active_joint(&self) -> JointId {
        self.active
    }

    /// Selects `joint` for manipulation.
    pub fn set_active_joint(&mut self, joint: JointId) {
        assert!(usize::from(joint.0) < self.joints.len(), "unknown joint");
        self.active = joint;
    }

    /// Moves the active joint one step towards the root. Does nothing when the
    /// root is active.
    pub fn select_previous_joint(&mut self) {
        if let Some(parent) = self[self.active].parent {
            self.active = parent;
        }
    }

    /// Moves the active joint one step towards the tip. Does nothing when the
    /// active joint has no children.
    pub fn select_next_joint(&mut self) {
        if let Some(&child) = self[self.active].children.first() {
            self.active = child;
        }
    }

    /// Computes the world-space geometry of every joint and bone.
    ///
    /// Joints are visited depth-first starting at the root. The skeleton is
    /// not modified.
    #[must_use]
    pub fn solve(&self) -> Solution<D> {
        let mut solved = Vec::with_capacity(self.joints.len());
        let mut to_solve = vec![(
            self.root(),
            None,
            Matrix::identity(<D::Vector as Coordinate>::COMPONENTS),
        )];
        while let Some((id, parent_position, parent_rotation)) = to_solve.pop() {
            let joint = &self[id];
            let rotation = D::rotation_matrix(&joint.orientation);
            let frame = LocalFrame {
                parent_position: parent_position.unwrap_or_default(),
                parent_rotation: &parent_rotation,
                translation: joint.translation,
                rotation: &rotation,
            };

            let position = frame.to_world(D::Vector::default());
            let axes = D::LOCAL_AXES
                .iter()
                .map(|&(axis, color)| (frame.to_world(axis), color))
                .collect();
            let bones = joint
                .bones
                .iter()
                .map(|&bone_id| {
                    let bone = &self[bone_id];
                    SolvedBone {
                        id: bone_id,
                        center: frame.to_world(bone.center),
                        attachments: bone
                            .attachments
                            .iter()
                            .map(|&point| frame.to_world(point))
                            .collect(),
                    }
                })
                .collect();

            let total_rotation = parent_rotation.product(&rotation);
            // Reversed so that the first child is solved first.
            for &child in joint.children.iter().rev() {
                to_solve.push((child, Some(position), total_rotation.clone()));
            }

            solved.push(SolvedJoint {
                id,
                position,
                parent_position,
                axes,
                active: id == self.active,
                bones,
            });
        }

        log::trace!("solved {} joints", solved.len());
        Solution { joints: solved }
    }

    /// Attaches `point` to the bone whose solved center is closest to it.
    ///
    /// The point is stored relative to the bone by subtracting the bone's
    /// world center and adding its local center. When several centers are
    /// equally close, the first one in `solution` wins. Returns `None` if the
    /// solution contains no bones.
    pub fn attach_nearest(&mut self, point: D::Vector, solution: &Solution<D>) -> Option<BoneId> {
        let mut nearest: Option<(&SolvedBone<D>, f32)> = None;
        for bone in solution.bones() {
            let distance = point.distance(bone.center);
            if nearest.map_or(true, |(_, closest)| distance < closest) {
                nearest = Some((bone, distance));
            }
        }

        let (solved, _) = nearest?;
        let bone = &mut self[solved.id];
        let local = point - solved.center + bone.center;
        bone.attachments.push(local);
        log::debug!("attached {point:?} to {:?} at {local:?}", solved.id);
        Some(solved.id)
    }
}

struct LocalFrame<'a, V> {
    parent_position: V,
    parent_rotation: &'a Matrix,
    translation: V,
    rotation: &'a Matrix,
}

impl<V: Coordinate> LocalFrame<'_, V> {
    fn to_world(&self, local: V) -> V {
        self.parent_position
            + self
                .parent_rotation
                .transform(self.translation + self.rotation.transform(local))
    }
}

impl<D: Dimension> Index<JointId> for Skeleton<D> {
    type Output = Joint<D>;

    fn index(&self, index: JointId) -> &Self::Output {
        &self.joints[usize::from(index.0)]
    }
}

impl<D: Dimension> IndexMut<JointId> for Skeleton<D> {
    fn index_mut(&mut self, index: JointId) -> &mut Self::Output {
        &mut self.joints[usize::from(index.0)]
    }
}

impl<D: Dimension> Index<BoneId> for Skeleton<D> {
    type Output = Bone<D>;

    fn index(&self, index: BoneId) -> &Self::Output {
        &self.bones[usize::from(index.0)]
    }
}

impl<D: Dimension> IndexMut<BoneId> for Skeleton<D> {
    fn index_mut(&mut self, index: BoneId) -> &mut Self::Output {
        &mut self.bones[usize::from(index.0)]
    }
}

/// A point in a [`Skeleton`] that can rotate relative to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint<D: Dimension> {
    translation: D::Vector,
    orientation: D::Orientation,
    parent: Option<JointId>,
    children: Vec<JointId>,
    bones: Vec<BoneId>,
}

impl<D: Dimension> Joint<D> {
    fn new(translation: D::Vector, parent: Option<JointId>) -> Self {
        Self {
            translation,
            orientation: D::Orientation::default(),
            parent,
            children: Vec::new(),
            bones: Vec::new(),
        }
    }

    /// Returns this joint's offset from its parent, in the parent's frame.
    ///
    /// For the root joint this is the skeleton's world offset.
    #[must_use]
    pub const fn translation(&self) -> D::Vector {
        self.translation
    }

    /// Returns the current rotation of this joint relative to its parent.
    #[must_use]
    pub const fn orientation(&self) -> D::Orientation {
        self.orientation
    }

    /// Sets the rotation of this joint relative to its parent.
    pub fn set_orientation(&mut self, orientation: D::Orientation) {
        self.orientation = orientation;
    }

    /// Returns the parent of this joint, or `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<JointId> {
        self.parent
    }

    /// Returns the children of this joint.
    #[must_use]
    pub fn children(&self) -> &[JointId] {
        &self.children
    }

    /// Returns the bones connecting this joint to each of its children.
    #[must_use]
    pub fn bones(&self) -> &[BoneId] {
        &self.bones
    }
}

/// A rigid connection between a joint and one of its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone<D: Dimension> {
    length: f32,
    center: D::Vector,
    connection: (JointId, JointId),
    attachments: Vec<D::Vector>,
}

impl<D: Dimension> Bone<D> {
    /// Returns the length of this bone.
    #[must_use]
    pub const fn length(&self) -> f32 {
        self.length
    }

    /// Returns the origin used when attaching points to this bone: half of
    /// the child joint's translation.
    #[must_use]
    pub const fn center(&self) -> D::Vector {
        self.center
    }

    /// Returns the joint this bone starts at.
    #[must_use]
    pub const fn parent(&self) -> JointId {
        self.connection.0
    }

    /// Returns the joint this bone ends at.
    #[must_use]
    pub const fn child(&self) -> JointId {
        self.connection.1
    }

    /// Returns the points attached to this bone, in the parent joint's local
    /// frame.
    #[must_use]
    pub fn attachments(&self) -> &[D::Vector] {
        &self.attachments
    }
}

/// The unique ID of a [`Joint`] in a [`Skeleton`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct JointId(u8);

/// The unique ID of a [`Bone`] in a [`Skeleton`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct BoneId(u8);

/// The world-space geometry of a [`Skeleton`] produced by
/// [`Skeleton::solve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<D: Dimension> {
    joints: Vec<SolvedJoint<D>>,
}

impl<D: Dimension> Solution<D> {
    /// Returns the solved joints in the order they were visited.
    #[must_use]
    pub fn joints(&self) -> &[SolvedJoint<D>] {
        &self.joints
    }

    /// Returns the solved joint for `id`.
    #[must_use]
    pub fn joint(&self, id: JointId) -> Option<&SolvedJoint<D>> {
        self.joints.iter().find(|joint| joint.id == id)
    }

    /// Returns every solved bone, in visiting order.
    pub fn bones(&self) -> impl Iterator<Item = &SolvedBone<D>> {
        self.joints.iter().flat_map(|joint| &joint.bones)
    }
}

/// The world-space geometry of a single [`Joint`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedJoint<D: Dimension> {
    id: JointId,
    position: D::Vector,
    parent_position: Option<D::Vector>,
    axes: Vec<(D::Vector, Color)>,
    active: bool,
    bones: Vec<SolvedBone<D>>,
}

impl<D: Dimension> SolvedJoint<D> {
    /// Returns the id of the joint.
    #[must_use]
    pub const fn id(&self) -> JointId {
        self.id
    }

    /// Returns the world position of the joint.
    #[must_use]
    pub const fn position(&self) -> D::Vector {
        self.position
    }

    /// Returns the world position of the parent joint, or `None` for the
    /// root.
    #[must_use]
    pub const fn parent_position(&self) -> Option<D::Vector> {
        self.parent_position
    }

    /// Returns the world endpoints of this joint's local axes.
    #[must_use]
    pub fn axes(&self) -> &[(D::Vector, Color)] {
        &self.axes
    }

    /// Returns true if this joint was the active joint when solved.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the bones owned by this joint.
    #[must_use]
    pub fn bones(&self) -> &[SolvedBone<D>] {
        &self.bones
    }
}

/// The world-space geometry of a single [`Bone`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedBone<D: Dimension> {
    id: BoneId,
    center: D::Vector,
    attachments: Vec<D::Vector>,
}

impl<D: Dimension> SolvedBone<D> {
    /// Returns the id of the bone.
    #[must_use]
    pub const fn id(&self) -> BoneId {
        self.id
    }

    /// Returns the world position of the bone's center.
    #[must_use]
    pub const fn center(&self) -> D::Vector {
        self.center
    }

    /// Returns the world positions of the points attached to the bone.
    #[must_use]
    pub fn attachments(&self) -> &[D::Vector] {
        &self.attachments
    }
}
