//! Actors: named, ordered bundles of components

use crate::world::component::{
    find_slot, find_slot_mut, Component, ComponentSlot, OwnerHandle, OwnerScope,
};
use crate::world::property::{split_path, BindingError, PropertyAccess, PropertyValue};
use crate::world::ActorId;

/// A named simulation object owning components in attach order
///
/// Actors carry no behavior of their own; everything they do happens inside
/// their components. The attach order is the tick order and never changes
/// after spawn.
pub struct Actor {
    id: ActorId,
    name: String,
    components: Vec<ComponentSlot>,
}

impl Actor {
    pub(crate) fn new(id: ActorId, name: String) -> Self {
        Self {
            id,
            name,
            components: Vec::new(),
        }
    }

    /// Stable id of this actor
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Name given at spawn
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn attach(&mut self, component: Box<dyn Component>) {
        self.components.push(ComponentSlot::new(component));
    }

    /// All component slots in attach order, including disabled ones
    pub fn components(&self) -> &[ComponentSlot] {
        &self.components
    }

    /// First enabled component of the given concrete type
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.components
            .iter()
            .filter(|slot| slot.enabled)
            .find_map(|slot| slot.component.as_any().downcast_ref::<T>())
    }

    /// First enabled component of the given concrete type, mutably
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .filter(|slot| slot.enabled)
            .find_map(|slot| slot.component.as_any_mut().downcast_mut::<T>())
    }

    /// Bind resource data for every component, in attach order
    ///
    /// Runs exactly once per spawn. A component that reports an error is
    /// disabled and logged; the actor itself stays alive.
    pub(crate) fn post_load_all(&mut self) {
        let Self {
            id,
            name,
            components,
        } = self;
        for slot in components.iter_mut() {
            let owner = OwnerHandle::new(*id, name.as_str());
            if let Err(error) = slot.component.post_load_resource(owner) {
                log::warn!(
                    "actor '{}': component '{}' failed resource binding, disabling it: {}",
                    name,
                    slot.component.type_name(),
                    error
                );
                slot.enabled = false;
            }
        }
    }

    /// Tick every enabled component once, in attach order
    pub(crate) fn tick(&mut self, delta_time: f32) {
        for index in 0..self.components.len() {
            if !self.components[index].enabled {
                continue;
            }
            let (before, rest) = self.components.split_at_mut(index);
            let Some((slot, after)) = rest.split_first_mut() else {
                continue;
            };
            let mut scope = OwnerScope {
                id: self.id,
                name: &self.name,
                before,
                after,
            };
            slot.component.tick(delta_time, &mut scope);
        }
    }
}

impl PropertyAccess for Actor {
    fn get(&self, path: &str) -> Result<PropertyValue, BindingError> {
        let (component, property) = split_path(path)?;
        let slot = find_slot(self.components.iter(), component)?;
        slot.component.property(property)
    }

    fn set(&mut self, path: &str, value: PropertyValue) -> Result<(), BindingError> {
        let (component, property) = split_path(path)?;
        let slot = find_slot_mut(self.components.iter_mut(), component)?;
        slot.component.set_property(property, value)
    }

    fn invoke(&mut self, path: &str) -> Result<(), BindingError> {
        let (component, method) = split_path(path)?;
        let slot = find_slot_mut(self.components.iter_mut(), component)?;
        slot.component.invoke(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::component::tests::Counter;
    use crate::world::component::ResourceError;
    use crate::world::property::PropertyValue;
    use std::any::Any;
    use std::sync::{Arc, Mutex};

    /// Component that records tick order into a shared journal.
    struct Journal {
        label: &'static str,
        journal: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Component for Journal {
        fn type_name(&self) -> &'static str {
            "journal"
        }

        fn tick(&mut self, _delta_time: f32, _owner: &mut OwnerScope<'_>) {
            self.journal.lock().unwrap().push(self.label);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// Component whose resource binding always fails.
    struct Broken;

    impl Component for Broken {
        fn type_name(&self) -> &'static str {
            "broken"
        }

        fn post_load_resource(&mut self, _owner: OwnerHandle<'_>) -> Result<(), ResourceError> {
            Err(ResourceError::Missing("no data".to_string()))
        }

        fn tick(&mut self, _delta_time: f32, _owner: &mut OwnerScope<'_>) {
            panic!("disabled component must not tick");
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn actor_with(components: Vec<Box<dyn Component>>) -> Actor {
        let mut actor = Actor::new(ActorId::default(), "test".to_string());
        for component in components {
            actor.attach(component);
        }
        actor
    }

    #[test]
    fn components_tick_in_attach_order() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut actor = actor_with(vec![
            Box::new(Journal {
                label: "first",
                journal: Arc::clone(&journal),
            }),
            Box::new(Journal {
                label: "second",
                journal: Arc::clone(&journal),
            }),
            Box::new(Journal {
                label: "third",
                journal: Arc::clone(&journal),
            }),
        ]);

        actor.tick(0.016);
        actor.tick(0.016);

        let seen = journal.lock().unwrap();
        assert_eq!(
            *seen,
            vec!["first", "second", "third", "first", "second", "third"]
        );
    }

    #[test]
    fn failed_binding_disables_the_slot_but_keeps_the_actor() {
        let mut actor = actor_with(vec![Box::new(Broken), Box::new(Counter::new())]);
        actor.post_load_all();

        assert!(!actor.components()[0].is_enabled());
        assert!(actor.components()[1].is_enabled());

        // Broken::tick panics if ever reached.
        actor.tick(0.016);
        assert_eq!(actor.component::<Counter>().unwrap().ticks, 1);
    }

    #[test]
    fn typed_lookup_skips_disabled_slots() {
        let mut actor = actor_with(vec![Box::new(Broken), Box::new(Counter::new())]);
        actor.post_load_all();

        assert!(actor.component::<Broken>().is_none());
        assert!(actor.component::<Counter>().is_some());
    }

    #[test]
    fn property_paths_resolve_through_the_actor() {
        let mut actor = actor_with(vec![Box::new(Counter::new())]);
        actor.set("counter.value", PropertyValue::Float(4.0)).unwrap();
        assert_eq!(actor.get("counter.value").unwrap(), PropertyValue::Float(4.0));

        actor.invoke("counter.reset").unwrap();
        assert_eq!(actor.get("counter.value").unwrap(), PropertyValue::Float(0.0));

        assert!(matches!(
            actor.get("missing.value"),
            Err(BindingError::UnknownComponent { .. })
        ));
    }
}
