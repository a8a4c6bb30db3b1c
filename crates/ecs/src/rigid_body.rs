use glam::Mat4;
use omelette_common::Vector3;
use omelette_physics::RigidBody;
use tracing::trace;

use crate::component::{Component, ComponentHandle, ComponentKind};
use crate::mesh::MeshData;

/// How a rigid body's motion reaches mesh geometry.
///
/// A body uses exactly one strategy. Owned vertices are shifted by each
/// tick's displacement; a linked mesh is transformed by a translation built
/// from the body's absolute position.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MeshAttachment {
    #[default]
    Detached,
    Owned(MeshData),
    Linked(ComponentHandle),
}

/// Kinematic state plus an optional mesh attachment.
#[derive(Debug, Clone)]
pub struct RigidBodyComponent {
    body: RigidBody,
    attachment: MeshAttachment,
}

impl RigidBodyComponent {
    pub fn new(position: Vector3, velocity: Vector3, acceleration: Vector3, mass: f32) -> Self {
        RigidBody::new(position, velocity, acceleration, mass).into()
    }

    /// A body carrying its own copy of the geometry.
    pub fn with_vertices(body: RigidBody, vertices: Vec<Vector3>, indices: Vec<u32>) -> Self {
        Self {
            body,
            attachment: MeshAttachment::Owned(MeshData::new(vertices, indices)),
        }
    }

    /// A body driving a mesh stored elsewhere in the registry.
    pub fn linked_to(body: RigidBody, mesh: ComponentHandle) -> Self {
        Self {
            body,
            attachment: MeshAttachment::Linked(mesh),
        }
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.body
    }

    pub fn position(&self) -> Vector3 {
        self.body.position
    }

    pub fn velocity(&self) -> Vector3 {
        self.body.velocity
    }

    pub fn acceleration(&self) -> Vector3 {
        self.body.acceleration
    }

    pub fn mass(&self) -> f32 {
        self.body.mass
    }

    pub fn attachment(&self) -> &MeshAttachment {
        &self.attachment
    }

    pub fn apply_force(&mut self, force: Vector3) {
        self.body.apply_force(force);
    }

    /// Geometry owned by this body, if any.
    pub fn owned_mesh(&self) -> Option<&MeshData> {
        match &self.attachment {
            MeshAttachment::Owned(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn owned_mesh_mut(&mut self) -> Option<&mut MeshData> {
        match &mut self.attachment {
            MeshAttachment::Owned(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn linked_mesh(&self) -> Option<ComponentHandle> {
        match self.attachment {
            MeshAttachment::Linked(handle) => Some(handle),
            _ => None,
        }
    }

    /// The transform to push onto a linked mesh after integration: a pure
    /// translation by the absolute position.
    pub fn mesh_transform(&self) -> Option<(ComponentHandle, Mat4)> {
        self.linked_mesh()
            .map(|handle| (handle, Mat4::from_translation(self.body.position.into())))
    }
}

impl From<RigidBody> for RigidBodyComponent {
    fn from(body: RigidBody) -> Self {
        Self {
            body,
            attachment: MeshAttachment::Detached,
        }
    }
}

impl Component for RigidBodyComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::RigidBody
    }

    /// Integrate one tick. Owned vertices follow the displacement; a linked
    /// mesh is left for the registry to resolve.
    fn update(&mut self, delta_time: f32) {
        let displacement = self.body.update(delta_time);
        if let MeshAttachment::Owned(mesh) = &mut self.attachment {
            mesh.translate(displacement);
        }
        trace!(
            position = ?self.body.position,
            velocity = ?self.body.velocity,
            "rigid body integrated"
        );
    }
}
