//! Entity-component registry for rigid meshes.
//!
//! Components form a closed set ([`AnyComponent`]) so the registry can clone,
//! update and discriminate them without runtime type identity. A rigid body
//! drives mesh geometry either through vertices it owns or through a
//! [`ComponentHandle`] to a mesh stored in the registry, never both.
//!
//! # Invariants
//! - The registry is the sole owner of every entity and component it stores.
//! - Component lists keep attachment order.
//! - Component ids are never reused; a handle to a removed component stays
//!   invalid.
//! - The registry never schedules work on its own. Callers drive every tick.

pub mod component;
pub mod mesh;
pub mod registry;
pub mod rigid_body;

pub use component::{
    AnyComponent, Component, ComponentHandle, ComponentId, ComponentKind, ComponentVariant,
};
pub use mesh::{MeshComponent, MeshData, MeshMut, MeshRef, SharedMesh};
pub use registry::{EcsError, Registry, RegistryEvent};
pub use rigid_body::{MeshAttachment, RigidBodyComponent};

pub fn crate_info() -> &'static str {
    concat!("omelette-ecs v", env!("CARGO_PKG_VERSION"))
}
