use glam::Mat4;
use omelette_common::Vector3;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell, RefMut};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::component::{Component, ComponentKind};

/// Raw triangle-list geometry.
///
/// `indices` has stride 3 with counter-clockwise front faces. Every index must
/// be `< vertices.len()`; this is not checked here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Vector3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vector3>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Mean vertex position, or zero for an empty mesh.
    pub fn centroid(&self) -> Vector3 {
        if self.vertices.is_empty() {
            return Vector3::ZERO;
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::ZERO, |acc, &v| acc + v);
        sum / self.vertices.len() as f32
    }

    /// Shift every vertex by `offset`.
    pub fn translate(&mut self, offset: Vector3) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }

    /// Replace every vertex `v` with `(matrix * (v, 1)).xyz`.
    pub fn transform(&mut self, matrix: &Mat4) {
        for vertex in &mut self.vertices {
            let v = glam::Vec3::from(*vertex).extend(1.0);
            *vertex = (*matrix * v).truncate().into();
        }
    }
}

/// Geometry owned outside the registry, e.g. a renderer's staging copy.
pub type SharedMesh = Rc<RefCell<MeshData>>;

#[derive(Debug, Clone)]
enum MeshStorage {
    Owned(MeshData),
    Shared(SharedMesh),
}

/// Vertex and index buffers attached to an entity.
///
/// Geometry either lives in the component or is shared with an external
/// owner. Cloning an owned mesh copies its buffers; cloning a shared mesh
/// yields a second view of the same buffers.
#[derive(Debug, Clone)]
pub struct MeshComponent {
    storage: MeshStorage,
}

impl MeshComponent {
    /// A mesh owning the given buffers.
    pub fn new(vertices: Vec<Vector3>, indices: Vec<u32>) -> Self {
        Self::owned(MeshData::new(vertices, indices))
    }

    pub fn owned(data: MeshData) -> Self {
        Self {
            storage: MeshStorage::Owned(data),
        }
    }

    /// A mesh viewing buffers owned elsewhere.
    pub fn shared(data: SharedMesh) -> Self {
        Self {
            storage: MeshStorage::Shared(data),
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self.storage, MeshStorage::Shared(_))
    }

    /// Read access to the geometry.
    ///
    /// # Panics
    /// For a shared mesh, if the buffers are currently mutably borrowed.
    pub fn data(&self) -> MeshRef<'_> {
        match &self.storage {
            MeshStorage::Owned(data) => MeshRef::Owned(data),
            MeshStorage::Shared(data) => MeshRef::Shared(data.borrow()),
        }
    }

    /// Write access to the geometry.
    ///
    /// # Panics
    /// For a shared mesh, if the buffers are currently borrowed.
    pub fn data_mut(&mut self) -> MeshMut<'_> {
        match &mut self.storage {
            MeshStorage::Owned(data) => MeshMut::Owned(data),
            MeshStorage::Shared(data) => MeshMut::Shared(data.borrow_mut()),
        }
    }

    /// Apply a homogeneous transform to every vertex in place.
    pub fn transform(&mut self, matrix: &Mat4) {
        self.data_mut().transform(matrix);
    }
}

impl Component for MeshComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Mesh
    }

    /// Meshes are moved by `transform` or by a rigid body, never by time.
    fn update(&mut self, _delta_time: f32) {}
}

/// Borrowed view of a mesh's geometry.
pub enum MeshRef<'a> {
    Owned(&'a MeshData),
    Shared(Ref<'a, MeshData>),
}

impl Deref for MeshRef<'_> {
    type Target = MeshData;

    fn deref(&self) -> &MeshData {
        match self {
            Self::Owned(data) => *data,
            Self::Shared(data) => &**data,
        }
    }
}

/// Mutably borrowed view of a mesh's geometry.
pub enum MeshMut<'a> {
    Owned(&'a mut MeshData),
    Shared(RefMut<'a, MeshData>),
}

impl Deref for MeshMut<'_> {
    type Target = MeshData;

    fn deref(&self) -> &MeshData {
        match self {
            Self::Owned(data) => &**data,
            Self::Shared(data) => &**data,
        }
    }
}

impl DerefMut for MeshMut<'_> {
    fn deref_mut(&mut self) -> &mut MeshData {
        match self {
            Self::Owned(data) => &mut **data,
            Self::Shared(data) => &mut **data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        MeshData::new(
            vec![
                Vector3::new(-0.5, 0.0, -0.5),
                Vector3::new(0.5, 0.0, -0.5),
                Vector3::new(0.5, 0.0, 0.5),
                Vector3::new(-0.5, 0.0, 0.5),
            ],
            vec![0, 1, 2, 2, 3, 0],
        )
    }

    #[test]
    fn accessors() {
        let mesh = MeshComponent::owned(quad());
        assert_eq!(mesh.data().vertices.len(), 4);
        assert_eq!(mesh.data().triangle_count(), 2);
        assert_eq!(mesh.data().centroid(), Vector3::ZERO);
        assert!(!mesh.is_shared());
        assert_eq!(MeshData::default().centroid(), Vector3::ZERO);
    }

    #[test]
    fn translation_moves_every_vertex() {
        let mut mesh = MeshComponent::owned(quad());
        mesh.transform(&Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0)));
        let data = mesh.data();
        assert_eq!(data.vertices[0], Vector3::new(0.5, 2.0, 2.5));
        assert_eq!(data.vertices[2], Vector3::new(1.5, 2.0, 3.5));
        assert_eq!(data.centroid(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(data.indices, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn rotation_keeps_order() {
        let mut mesh = MeshComponent::new(
            vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)],
            vec![],
        );
        mesh.transform(&Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let data = mesh.data();
        assert!((data.vertices[0] - Vector3::new(0.0, 1.0, 0.0)).magnitude() < 1e-6);
        assert!((data.vertices[1] - Vector3::new(-1.0, 0.0, 0.0)).magnitude() < 1e-6);
    }

    #[test]
    fn update_is_a_no_op() {
        let mut mesh = MeshComponent::owned(quad());
        mesh.update(1.0);
        mesh.update(-3.0);
        assert_eq!(*mesh.data(), quad());
    }

    #[test]
    fn owned_clone_is_independent() {
        let original = MeshComponent::owned(quad());
        let mut copy = original.clone();
        copy.data_mut().translate(Vector3::new(10.0, 0.0, 0.0));
        assert_eq!(*original.data(), quad());
        assert_ne!(*copy.data(), quad());
    }

    #[test]
    fn shared_clone_sees_same_buffers() {
        let buffers: SharedMesh = Rc::new(RefCell::new(quad()));
        let original = MeshComponent::shared(Rc::clone(&buffers));
        let mut copy = original.clone();
        assert!(copy.is_shared());

        copy.transform(&Mat4::from_translation(glam::Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(original.data().centroid(), Vector3::new(0.0, 5.0, 0.0));
        assert_eq!(buffers.borrow().centroid(), Vector3::new(0.0, 5.0, 0.0));
    }
}
