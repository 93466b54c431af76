//! Logical world: actors, components, and reflection
//!
//! The world owns every actor and ticks them in creation order. Components
//! attached to an actor run in attachment order and can reach their enabled
//! siblings through [`OwnerScope`]. Property paths (`component.property`)
//! give scripts and tools typed access without knowing concrete component
//! types.

pub mod actor;
pub mod component;
pub mod components;
pub mod definition;
pub mod property;
#[allow(clippy::module_inception)]
pub mod world;

pub use actor::Actor;
pub use component::{Component, ComponentSlot, OwnerHandle, OwnerScope, ResourceError};
pub use definition::{
    ActorDefinition, ComponentDefinition, DefinitionError, WorldDefinition,
};
pub use property::{
    BindingError, MethodDescriptor, PropertyAccess, PropertyAccessKind, PropertyDescriptor,
    PropertyKind, PropertyValue,
};
pub use world::World;

slotmap::new_key_type! {
    /// Stable handle to an actor in a [`World`]
    pub struct ActorId;
}
