use omelette_common::Entity;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mesh::MeshComponent;
use crate::rigid_body::RigidBodyComponent;

/// Per-entity state that can be copied and advanced by one tick.
///
/// `Clone` deep-copies owned buffers and shares referenced ones.
pub trait Component: Clone + fmt::Debug {
    fn kind(&self) -> ComponentKind;

    /// Advance by `delta_time`. Negative values are plain multipliers.
    fn update(&mut self, delta_time: f32);
}

/// A concrete component type that can be recovered from an [`AnyComponent`].
pub trait ComponentVariant: Component + Into<AnyComponent> {
    const KIND: ComponentKind;

    fn from_any(component: &AnyComponent) -> Option<&Self>;
    fn from_any_mut(component: &mut AnyComponent) -> Option<&mut Self>;
}

/// Discriminant of a component variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Mesh,
    RigidBody,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mesh => "mesh",
            Self::RigidBody => "rigid body",
        })
    }
}

/// Registry-wide unique component id. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

/// Non-owning reference to a component stored in a [`Registry`](crate::Registry).
///
/// Resolved by lookup; once the component is removed the handle no longer
/// resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentHandle {
    pub entity: Entity,
    pub id: ComponentId,
}

impl fmt::Display for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/component#{}", self.entity, self.id.0)
    }
}

/// Type-erased component as stored by the registry.
#[derive(Debug, Clone)]
pub enum AnyComponent {
    Mesh(MeshComponent),
    RigidBody(RigidBodyComponent),
}

impl AnyComponent {
    /// Recover a concrete variant. `None` if this is a different variant.
    pub fn downcast_ref<T: ComponentVariant>(&self) -> Option<&T> {
        T::from_any(self)
    }

    pub fn downcast_mut<T: ComponentVariant>(&mut self) -> Option<&mut T> {
        T::from_any_mut(self)
    }

    pub fn is<T: ComponentVariant>(&self) -> bool {
        self.kind() == T::KIND
    }

    pub fn as_mesh(&self) -> Option<&MeshComponent> {
        self.downcast_ref()
    }

    pub fn as_rigid_body(&self) -> Option<&RigidBodyComponent> {
        self.downcast_ref()
    }

    pub fn as_rigid_body_mut(&mut self) -> Option<&mut RigidBodyComponent> {
        self.downcast_mut()
    }
}

impl Component for AnyComponent {
    fn kind(&self) -> ComponentKind {
        match self {
            Self::Mesh(_) => ComponentKind::Mesh,
            Self::RigidBody(_) => ComponentKind::RigidBody,
        }
    }

    fn update(&mut self, delta_time: f32) {
        match self {
            Self::Mesh(mesh) => mesh.update(delta_time),
            Self::RigidBody(body) => body.update(delta_time),
        }
    }
}

impl From<MeshComponent> for AnyComponent {
    fn from(mesh: MeshComponent) -> Self {
        Self::Mesh(mesh)
    }
}

impl From<RigidBodyComponent> for AnyComponent {
    fn from(body: RigidBodyComponent) -> Self {
        Self::RigidBody(body)
    }
}

impl ComponentVariant for MeshComponent {
    const KIND: ComponentKind = ComponentKind::Mesh;

    fn from_any(component: &AnyComponent) -> Option<&Self> {
        match component {
            AnyComponent::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    fn from_any_mut(component: &mut AnyComponent) -> Option<&mut Self> {
        match component {
            AnyComponent::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

impl ComponentVariant for RigidBodyComponent {
    const KIND: ComponentKind = ComponentKind::RigidBody;

    fn from_any(component: &AnyComponent) -> Option<&Self> {
        match component {
            AnyComponent::RigidBody(body) => Some(body),
            _ => None,
        }
    }

    fn from_any_mut(component: &mut AnyComponent) -> Option<&mut Self> {
        match component {
            AnyComponent::RigidBody(body) => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omelette_common::Vector3;

    fn mesh() -> AnyComponent {
        MeshComponent::new(vec![Vector3::new(1.0, 0.0, 0.0)], vec![0, 0, 0]).into()
    }

    fn body() -> AnyComponent {
        RigidBodyComponent::new(Vector3::ZERO, Vector3::ZERO, Vector3::ZERO, 1.0).into()
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(mesh().kind(), ComponentKind::Mesh);
        assert_eq!(body().kind(), ComponentKind::RigidBody);
        assert!(mesh().is::<MeshComponent>());
        assert!(!mesh().is::<RigidBodyComponent>());
    }

    #[test]
    fn wrong_variant_is_none_not_a_crash() {
        assert!(mesh().as_rigid_body().is_none());
        assert!(body().as_mesh().is_none());
        assert!(mesh().downcast_ref::<MeshComponent>().is_some());
    }

    #[test]
    fn update_dispatches_to_variant() {
        let mut c = body();
        c.as_rigid_body_mut()
            .unwrap()
            .apply_force(Vector3::new(0.0, 4.0, 0.0));
        c.update(0.5);
        let rb = c.as_rigid_body().unwrap();
        assert_eq!(rb.velocity(), Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(rb.acceleration(), Vector3::ZERO);
    }

    #[test]
    fn handle_display() {
        let handle = ComponentHandle {
            entity: Entity::new(3),
            id: ComponentId(9),
        };
        assert_eq!(handle.to_string(), "entity#3/component#9");
        assert_eq!(ComponentKind::RigidBody.to_string(), "rigid body");
    }
}
