use glam::Mat4;
use omelette_common::{Entity, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

use crate::component::{
    AnyComponent, Component, ComponentHandle, ComponentId, ComponentKind, ComponentVariant,
};
use crate::mesh::MeshComponent;
use crate::rigid_body::RigidBodyComponent;

/// Errors from structural registry operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EcsError {
    #[error("unknown entity: {0}")]
    UnknownEntity(Entity),
    #[error("component handle no longer resolves: {0}")]
    StaleHandle(ComponentHandle),
    #[error("component {handle} is a {actual}, expected a {expected}")]
    WrongVariant {
        handle: ComponentHandle,
        expected: ComponentKind,
        actual: ComponentKind,
    },
}

/// Events produced by structural registry mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegistryEvent {
    EntityAdded { entity: Entity },
    ComponentAttached { handle: ComponentHandle, kind: ComponentKind },
    ComponentRemoved { handle: ComponentHandle, kind: ComponentKind },
    EntityRemoved { entity: Entity, components: usize },
}

/// One entity's components, in attachment order, with their ids.
#[derive(Debug, Default)]
struct ComponentList {
    ids: Vec<ComponentId>,
    components: Vec<AnyComponent>,
}

impl ComponentList {
    fn position(&self, id: ComponentId) -> Option<usize> {
        self.ids.iter().position(|&candidate| candidate == id)
    }
}

/// Owning store of entities and their components.
///
/// Component lists are kept in a BTreeMap keyed by entity id so aggregate
/// queries iterate in a stable order. The registry is passive: it only
/// updates components when a caller asks it to.
#[derive(Debug, Default)]
pub struct Registry {
    entities: Vec<Entity>,
    components: BTreeMap<Entity, ComponentList>,
    next_component_id: u64,
    events: Vec<RegistryEvent>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return all pending registry events.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Total components stored across all entities.
    pub fn component_count(&self) -> usize {
        self.components.values().map(|list| list.components.len()).sum()
    }

    /// Take ownership of an entity. Id uniqueness is the caller's concern.
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
        self.events.push(RegistryEvent::EntityAdded { entity });
        debug!(%entity, "entity added");
    }

    /// Append a component to `entity`'s list and return a handle to it.
    ///
    /// The entity does not have to be added first; attaching creates the
    /// association on its own.
    pub fn add_component(
        &mut self,
        entity: Entity,
        component: impl Into<AnyComponent>,
    ) -> ComponentHandle {
        let component = component.into();
        let kind = component.kind();
        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;

        let list = self.components.entry(entity).or_default();
        list.ids.push(id);
        list.components.push(component);

        let handle = ComponentHandle { entity, id };
        self.events
            .push(RegistryEvent::ComponentAttached { handle, kind });
        debug!(%handle, %kind, "component attached");
        handle
    }

    /// All entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// `entity`'s components in attachment order. Empty if it has none.
    pub fn components_for(&self, entity: Entity) -> &[AnyComponent] {
        self.components
            .get(&entity)
            .map(|list| list.components.as_slice())
            .unwrap_or_default()
    }

    pub fn components_for_mut(&mut self, entity: Entity) -> &mut [AnyComponent] {
        self.components
            .get_mut(&entity)
            .map(|list| list.components.as_mut_slice())
            .unwrap_or_default()
    }

    /// A fresh clone of every stored component.
    ///
    /// Costs one clone per component on every call; keep it off per-frame
    /// paths. Entities come in id order, each entity's components in
    /// attachment order.
    pub fn components(&self) -> Vec<AnyComponent> {
        self.components
            .values()
            .flat_map(|list| list.components.iter().cloned())
            .collect()
    }

    /// Every entity holding at least one `T`, in id order.
    pub fn entities_with<T: ComponentVariant>(&self) -> Vec<Entity> {
        self.components
            .iter()
            .filter(|(_, list)| list.components.iter().any(AnyComponent::is::<T>))
            .map(|(&entity, _)| entity)
            .collect()
    }

    pub fn get_any(&self, handle: ComponentHandle) -> Option<&AnyComponent> {
        let list = self.components.get(&handle.entity)?;
        list.position(handle.id).map(|i| &list.components[i])
    }

    pub fn get_any_mut(&mut self, handle: ComponentHandle) -> Option<&mut AnyComponent> {
        let list = self.components.get_mut(&handle.entity)?;
        list.position(handle.id).map(|i| &mut list.components[i])
    }

    /// Typed lookup. `None` if the handle is stale or names another variant.
    pub fn get<T: ComponentVariant>(&self, handle: ComponentHandle) -> Option<&T> {
        self.get_any(handle).and_then(T::from_any)
    }

    pub fn get_mut<T: ComponentVariant>(&mut self, handle: ComponentHandle) -> Option<&mut T> {
        self.get_any_mut(handle).and_then(T::from_any_mut)
    }

    /// Apply a force to the rigid body behind `handle`.
    pub fn apply_force(&mut self, handle: ComponentHandle, force: Vector3) -> Result<(), EcsError> {
        let component = self
            .get_any_mut(handle)
            .ok_or(EcsError::StaleHandle(handle))?;
        let actual = component.kind();
        let body = component
            .as_rigid_body_mut()
            .ok_or(EcsError::WrongVariant {
                handle,
                expected: ComponentKind::RigidBody,
                actual,
            })?;
        body.apply_force(force);
        Ok(())
    }

    /// Update `entity`'s components in attachment order, then push linked
    /// rigid-body transforms onto their meshes.
    pub fn update_entity(&mut self, entity: Entity, delta_time: f32) {
        let mut links = Vec::new();
        for component in self.components_for_mut(entity) {
            component.update(delta_time);
            collect_link(component, &mut links);
        }
        self.propagate(links);
    }

    /// Update every stored component, then push linked rigid-body transforms
    /// onto their meshes.
    pub fn update(&mut self, delta_time: f32) {
        let mut links = Vec::new();
        for list in self.components.values_mut() {
            for component in &mut list.components {
                component.update(delta_time);
                collect_link(component, &mut links);
            }
        }
        trace!(delta_time, linked = links.len(), "registry updated");
        self.propagate(links);
    }

    fn propagate(&mut self, links: Vec<(ComponentHandle, Mat4)>) {
        for (handle, matrix) in links {
            match self.get_mut::<MeshComponent>(handle) {
                Some(mesh) => mesh.transform(&matrix),
                None => warn!(%handle, "linked mesh does not resolve; skipping"),
            }
        }
    }

    /// Detach and return one component. The handle is invalid afterwards.
    pub fn remove_component(&mut self, handle: ComponentHandle) -> Result<AnyComponent, EcsError> {
        let list = self
            .components
            .get_mut(&handle.entity)
            .ok_or(EcsError::StaleHandle(handle))?;
        let index = list.position(handle.id).ok_or(EcsError::StaleHandle(handle))?;
        list.ids.remove(index);
        let removed = list.components.remove(index);

        let kind = removed.kind();
        self.events
            .push(RegistryEvent::ComponentRemoved { handle, kind });
        debug!(%handle, %kind, "component removed");
        Ok(removed)
    }

    /// Remove an entity and all of its components, returning the components
    /// in attachment order. Every handle into the entity becomes invalid.
    pub fn remove_entity(&mut self, entity: Entity) -> Result<Vec<AnyComponent>, EcsError> {
        let known = self.entities.contains(&entity);
        let list = self.components.remove(&entity);
        if !known && list.is_none() {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.entities.retain(|&e| e != entity);

        let removed = list.map(|list| list.components).unwrap_or_default();
        self.events.push(RegistryEvent::EntityRemoved {
            entity,
            components: removed.len(),
        });
        debug!(%entity, components = removed.len(), "entity removed");
        Ok(removed)
    }
}

fn collect_link(component: &AnyComponent, links: &mut Vec<(ComponentHandle, Mat4)>) {
    if let Some(link) = component
        .as_rigid_body()
        .and_then(RigidBodyComponent::mesh_transform)
    {
        links.push(link);
    }
}
