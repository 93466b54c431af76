//! Component contract and per-tick owner scope
//!
//! Components are the only unit of simulation behavior. An actor owns an
//! ordered list of them; the world drives that list once per logical frame.
//! While one component ticks it can reach its siblings through an
//! [`OwnerScope`], which exposes the rest of the actor without aliasing the
//! component currently running.

use std::any::Any;

use thiserror::Error;

use crate::animation::ClipError;
use crate::scripting::CompileError;
use crate::world::property::{
    split_path, BindingError, MethodDescriptor, PropertyAccess, PropertyDescriptor, PropertyValue,
};
use crate::world::ActorId;

/// Errors a component can report while binding its resource data
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Animation clip data failed validation
    #[error("animation clip error: {0}")]
    Clip(#[from] ClipError),

    /// Script source failed to compile
    #[error("script error: {0}")]
    Script(#[from] CompileError),

    /// Resource data the component requires was absent
    #[error("missing resource: {0}")]
    Missing(String),

    /// Resource data was present but unusable
    #[error("invalid resource data: {0}")]
    Invalid(String),
}

/// Identity of the actor a component is attached to
///
/// Handed to components during resource binding so they can remember their
/// owner without holding a reference into the world.
#[derive(Debug, Clone, Copy)]
pub struct OwnerHandle<'a> {
    id: ActorId,
    name: &'a str,
}

impl<'a> OwnerHandle<'a> {
    pub(crate) fn new(id: ActorId, name: &'a str) -> Self {
        Self { id, name }
    }

    /// Stable id of the owning actor
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Name of the owning actor
    pub fn name(&self) -> &str {
        self.name
    }
}

/// A unit of per-actor simulation behavior
///
/// Implementations hold their own state and advance it in [`Component::tick`].
/// The trait is object safe; actors store components as boxed trait objects
/// in attach order.
pub trait Component: Send + 'static {
    /// Short name used to address this component in property paths
    fn type_name(&self) -> &'static str;

    /// Bind resource data after construction, before the first tick
    ///
    /// Called exactly once per attached component when the owning actor is
    /// spawned. A component that fails here is disabled rather than ticked
    /// with half-bound state.
    fn post_load_resource(&mut self, _owner: OwnerHandle<'_>) -> Result<(), ResourceError> {
        Ok(())
    }

    /// Advance this component by `delta_time` seconds
    fn tick(&mut self, _delta_time: f32, _owner: &mut OwnerScope<'_>) {}

    /// Properties this component exposes to name-based access
    fn properties(&self) -> &'static [PropertyDescriptor] {
        &[]
    }

    /// Zero-argument methods this component exposes to name-based access
    fn methods(&self) -> &'static [MethodDescriptor] {
        &[]
    }

    /// Read a property by name
    fn property(&self, name: &str) -> Result<PropertyValue, BindingError> {
        Err(BindingError::UnknownProperty {
            component: self.type_name().to_string(),
            property: name.to_string(),
        })
    }

    /// Write a property by name
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), BindingError> {
        let _ = value;
        Err(BindingError::UnknownProperty {
            component: self.type_name().to_string(),
            property: name.to_string(),
        })
    }

    /// Invoke a zero-argument method by name
    fn invoke(&mut self, name: &str) -> Result<(), BindingError> {
        Err(BindingError::UnknownMethod {
            component: self.type_name().to_string(),
            method: name.to_string(),
        })
    }

    /// Upcast for typed downcasting
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed downcasting, mutably
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// One attached component plus its enabled flag
///
/// A slot starts enabled and is switched off permanently if resource binding
/// fails. Disabled slots keep their position so sibling ordering stays
/// stable, but they are skipped by ticking and invisible to name-based
/// access.
pub struct ComponentSlot {
    pub(crate) component: Box<dyn Component>,
    pub(crate) enabled: bool,
}

impl ComponentSlot {
    pub(crate) fn new(component: Box<dyn Component>) -> Self {
        Self {
            component,
            enabled: true,
        }
    }

    /// The component stored in this slot
    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }

    /// Short name of the stored component
    pub fn type_name(&self) -> &'static str {
        self.component.type_name()
    }

    /// Whether the slot still participates in ticking and access
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// View of an actor handed to a component during its tick
///
/// Splits the actor's slot list around the running component, so siblings on
/// either side are reachable while the running component stays exclusively
/// borrowed by its own `tick` call.
pub struct OwnerScope<'a> {
    pub(crate) id: ActorId,
    pub(crate) name: &'a str,
    pub(crate) before: &'a mut [ComponentSlot],
    pub(crate) after: &'a mut [ComponentSlot],
}

impl OwnerScope<'_> {
    /// Stable id of the owning actor
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Name of the owning actor
    pub fn name(&self) -> &str {
        self.name
    }

    /// First enabled sibling of the given concrete type
    pub fn sibling<T: Component>(&self) -> Option<&T> {
        self.before
            .iter()
            .chain(self.after.iter())
            .filter(|slot| slot.enabled)
            .find_map(|slot| slot.component.as_any().downcast_ref::<T>())
    }

    /// First enabled sibling of the given concrete type, mutably
    pub fn sibling_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .filter(|slot| slot.enabled)
            .find_map(|slot| slot.component.as_any_mut().downcast_mut::<T>())
    }
}

impl PropertyAccess for OwnerScope<'_> {
    fn get(&self, path: &str) -> Result<PropertyValue, BindingError> {
        let (component, property) = split_path(path)?;
        let slot = find_slot(self.before.iter().chain(self.after.iter()), component)?;
        slot.component.property(property)
    }

    fn set(&mut self, path: &str, value: PropertyValue) -> Result<(), BindingError> {
        let (component, property) = split_path(path)?;
        let slot = find_slot_mut(self.before.iter_mut().chain(self.after.iter_mut()), component)?;
        slot.component.set_property(property, value)
    }

    fn invoke(&mut self, path: &str) -> Result<(), BindingError> {
        let (component, method) = split_path(path)?;
        let slot = find_slot_mut(self.before.iter_mut().chain(self.after.iter_mut()), component)?;
        slot.component.invoke(method)
    }
}

/// Resolve a component name to the first enabled slot carrying it
pub(crate) fn find_slot<'s>(
    slots: impl Iterator<Item = &'s ComponentSlot>,
    component: &str,
) -> Result<&'s ComponentSlot, BindingError> {
    slots
        .filter(|slot| slot.enabled)
        .find(|slot| slot.component.type_name() == component)
        .ok_or_else(|| BindingError::UnknownComponent {
            component: component.to_string(),
        })
}

/// Mutable variant of [`find_slot`]
pub(crate) fn find_slot_mut<'s>(
    slots: impl Iterator<Item = &'s mut ComponentSlot>,
    component: &str,
) -> Result<&'s mut ComponentSlot, BindingError> {
    slots
        .filter(|slot| slot.enabled)
        .find(|slot| slot.component.type_name() == component)
        .ok_or_else(|| BindingError::UnknownComponent {
            component: component.to_string(),
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::world::property::{PropertyAccessKind, PropertyKind};

    /// Minimal component used across world tests.
    pub(crate) struct Counter {
        pub ticks: u32,
        pub value: f32,
    }

    impl Counter {
        pub fn new() -> Self {
            Self { ticks: 0, value: 0.0 }
        }
    }

    impl Component for Counter {
        fn type_name(&self) -> &'static str {
            "counter"
        }

        fn tick(&mut self, _delta_time: f32, _owner: &mut OwnerScope<'_>) {
            self.ticks += 1;
        }

        fn properties(&self) -> &'static [PropertyDescriptor] {
            &[PropertyDescriptor {
                name: "value",
                kind: PropertyKind::Float,
                access: PropertyAccessKind::ReadWrite,
            }]
        }

        fn methods(&self) -> &'static [MethodDescriptor] {
            &[MethodDescriptor { name: "reset" }]
        }

        fn property(&self, name: &str) -> Result<PropertyValue, BindingError> {
            match name {
                "value" => Ok(PropertyValue::Float(self.value)),
                _ => Err(BindingError::UnknownProperty {
                    component: self.type_name().to_string(),
                    property: name.to_string(),
                }),
            }
        }

        fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), BindingError> {
            match name {
                "value" => {
                    self.value = value.as_float(name)?;
                    Ok(())
                }
                _ => Err(BindingError::UnknownProperty {
                    component: self.type_name().to_string(),
                    property: name.to_string(),
                }),
            }
        }

        fn invoke(&mut self, name: &str) -> Result<(), BindingError> {
            match name {
                "reset" => {
                    self.value = 0.0;
                    self.ticks = 0;
                    Ok(())
                }
                _ => Err(BindingError::UnknownMethod {
                    component: self.type_name().to_string(),
                    method: name.to_string(),
                }),
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn scope<'a>(
        name: &'a str,
        before: &'a mut [ComponentSlot],
        after: &'a mut [ComponentSlot],
    ) -> OwnerScope<'a> {
        OwnerScope {
            id: ActorId::default(),
            name,
            before,
            after,
        }
    }

    #[test]
    fn scope_reaches_siblings_on_both_sides() {
        let mut before = vec![ComponentSlot::new(Box::new(Counter::new()))];
        let mut after = vec![ComponentSlot::new(Box::new(Counter::new()))];
        before[0]
            .component
            .set_property("value", PropertyValue::Float(1.5))
            .unwrap();

        let scope = scope("probe", &mut before, &mut after);
        assert_eq!(scope.get("counter.value").unwrap(), PropertyValue::Float(1.5));
        assert!(scope.sibling::<Counter>().is_some());
    }

    #[test]
    fn scope_writes_resolve_in_slot_order() {
        let mut before: Vec<ComponentSlot> = Vec::new();
        let mut after = vec![
            ComponentSlot::new(Box::new(Counter::new())),
            ComponentSlot::new(Box::new(Counter::new())),
        ];

        let mut scope = scope("probe", &mut before, &mut after);
        scope.set("counter.value", PropertyValue::Float(2.0)).unwrap();

        // The first slot in order took the write.
        assert_eq!(
            after[0].component.property("value").unwrap(),
            PropertyValue::Float(2.0)
        );
        assert_eq!(
            after[1].component.property("value").unwrap(),
            PropertyValue::Float(0.0)
        );
    }

    #[test]
    fn disabled_slots_are_invisible_to_bindings() {
        let mut before = vec![ComponentSlot::new(Box::new(Counter::new()))];
        before[0].enabled = false;
        let mut after: Vec<ComponentSlot> = Vec::new();

        let scope = scope("probe", &mut before, &mut after);
        assert!(matches!(
            scope.get("counter.value"),
            Err(BindingError::UnknownComponent { .. })
        ));
        assert!(scope.sibling::<Counter>().is_none());
    }

    #[test]
    fn write_with_wrong_kind_is_rejected() {
        let mut before: Vec<ComponentSlot> = Vec::new();
        let mut after = vec![ComponentSlot::new(Box::new(Counter::new()))];

        let mut scope = scope("probe", &mut before, &mut after);
        let error = scope
            .set("counter.value", PropertyValue::Bool(true))
            .unwrap_err();
        assert!(matches!(error, BindingError::TypeMismatch { .. }));

        // The stored value is untouched after the failed write.
        assert_eq!(scope.get("counter.value").unwrap(), PropertyValue::Float(0.0));
    }

    #[test]
    fn invoking_an_unknown_method_is_reported() {
        let mut before: Vec<ComponentSlot> = Vec::new();
        let mut after = vec![ComponentSlot::new(Box::new(Counter::new()))];

        let mut scope = scope("probe", &mut before, &mut after);
        assert!(matches!(
            scope.invoke("counter.launch"),
            Err(BindingError::UnknownMethod { .. })
        ));
    }
}
