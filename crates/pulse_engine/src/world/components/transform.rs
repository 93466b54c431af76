//! Spatial state component

use std::any::Any;

use crate::foundation::math::{Quat, Transform, Vec3};
use crate::world::component::Component;
use crate::world::property::{
    BindingError, PropertyAccessKind, PropertyDescriptor, PropertyKind, PropertyValue,
};

/// Position, rotation, and scale of an actor
///
/// Most other components anchor themselves to this one: cameras derive their
/// view from it, the render hand-off snapshots it, and the character
/// controller writes into it.
pub struct TransformComponent {
    transform: Transform,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::new(Transform::identity())
    }
}

impl TransformComponent {
    const PROPERTIES: &'static [PropertyDescriptor] = &[
        PropertyDescriptor {
            name: "position",
            kind: PropertyKind::Vec3,
            access: PropertyAccessKind::ReadWrite,
        },
        PropertyDescriptor {
            name: "position.x",
            kind: PropertyKind::Float,
            access: PropertyAccessKind::ReadWrite,
        },
        PropertyDescriptor {
            name: "position.y",
            kind: PropertyKind::Float,
            access: PropertyAccessKind::ReadWrite,
        },
        PropertyDescriptor {
            name: "position.z",
            kind: PropertyKind::Float,
            access: PropertyAccessKind::ReadWrite,
        },
        PropertyDescriptor {
            name: "rotation",
            kind: PropertyKind::Quat,
            access: PropertyAccessKind::ReadWrite,
        },
        PropertyDescriptor {
            name: "scale",
            kind: PropertyKind::Vec3,
            access: PropertyAccessKind::ReadWrite,
        },
    ];

    /// Create the component from an initial transform
    pub fn new(transform: Transform) -> Self {
        Self { transform }
    }

    /// Current transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Current rotation
    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    /// Replace the position
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Replace the rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }
}

impl Component for TransformComponent {
    fn type_name(&self) -> &'static str {
        "transform"
    }

    fn properties(&self) -> &'static [PropertyDescriptor] {
        Self::PROPERTIES
    }

    fn property(&self, name: &str) -> Result<PropertyValue, BindingError> {
        match name {
            "position" => Ok(PropertyValue::Vec3(self.transform.position)),
            "position.x" => Ok(PropertyValue::Float(self.transform.position.x)),
            "position.y" => Ok(PropertyValue::Float(self.transform.position.y)),
            "position.z" => Ok(PropertyValue::Float(self.transform.position.z)),
            "rotation" => Ok(PropertyValue::Quat(self.transform.rotation)),
            "scale" => Ok(PropertyValue::Vec3(self.transform.scale)),
            _ => Err(BindingError::UnknownProperty {
                component: self.type_name().to_string(),
                property: name.to_string(),
            }),
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), BindingError> {
        match name {
            "position" => self.transform.position = value.as_vec3(name)?,
            "position.x" => self.transform.position.x = value.as_float(name)?,
            "position.y" => self.transform.position.y = value.as_float(name)?,
            "position.z" => self.transform.position.z = value.as_float(name)?,
            "rotation" => self.transform.rotation = value.as_quat(name)?,
            "scale" => self.transform.scale = value.as_vec3(name)?,
            _ => {
                return Err(BindingError::UnknownProperty {
                    component: self.type_name().to_string(),
                    property: name.to_string(),
                })
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn descriptor_table_matches_the_accessors() {
        let component = TransformComponent::default();
        for descriptor in component.properties() {
            let value = component.property(descriptor.name).unwrap();
            assert_eq!(value.kind(), descriptor.kind, "property {}", descriptor.name);
        }
    }

    #[test]
    fn leaf_writes_land_in_the_vector() {
        let mut component = TransformComponent::default();
        component
            .set_property("position.y", PropertyValue::Float(2.5))
            .unwrap();
        assert_relative_eq!(component.position(), Vec3::new(0.0, 2.5, 0.0));
    }

    #[test]
    fn whole_vector_writes_replace_the_value() {
        let mut component = TransformComponent::default();
        component
            .set_property("position", PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        assert_relative_eq!(component.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn kind_mismatches_leave_state_untouched() {
        let mut component = TransformComponent::default();
        let error = component
            .set_property("position", PropertyValue::Float(1.0))
            .unwrap_err();
        assert!(matches!(error, BindingError::TypeMismatch { .. }));
        assert_relative_eq!(component.position(), Vec3::zeros());
    }
}
