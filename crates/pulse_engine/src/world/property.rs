//! Typed property access for component state
//!
//! Components expose selected fields and zero-argument methods by name so
//! scripts, tools, and other components can reach them without knowing the
//! concrete type. Every failure mode is reported through [`BindingError`];
//! values are never silently coerced between kinds.

use std::fmt;

use thiserror::Error;

use crate::foundation::math::{Quat, Vec3};

/// A dynamically typed property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f32),
    /// 3D vector value
    Vec3(Vec3),
    /// Rotation value
    Quat(Quat),
    /// String value
    Str(String),
}

impl PropertyValue {
    /// The kind tag of this value
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Bool(_) => PropertyKind::Bool,
            Self::Int(_) => PropertyKind::Int,
            Self::Float(_) => PropertyKind::Float,
            Self::Vec3(_) => PropertyKind::Vec3,
            Self::Quat(_) => PropertyKind::Quat,
            Self::Str(_) => PropertyKind::Str,
        }
    }

    /// Extract a float, reporting a mismatch for any other kind
    pub fn as_float(&self, property: &str) -> Result<f32, BindingError> {
        match self {
            Self::Float(value) => Ok(*value),
            other => Err(BindingError::TypeMismatch {
                property: property.to_string(),
                expected: PropertyKind::Float,
                actual: other.kind(),
            }),
        }
    }

    /// Extract a vector, reporting a mismatch for any other kind
    pub fn as_vec3(&self, property: &str) -> Result<Vec3, BindingError> {
        match self {
            Self::Vec3(value) => Ok(*value),
            other => Err(BindingError::TypeMismatch {
                property: property.to_string(),
                expected: PropertyKind::Vec3,
                actual: other.kind(),
            }),
        }
    }

    /// Extract a rotation, reporting a mismatch for any other kind
    pub fn as_quat(&self, property: &str) -> Result<Quat, BindingError> {
        match self {
            Self::Quat(value) => Ok(*value),
            other => Err(BindingError::TypeMismatch {
                property: property.to_string(),
                expected: PropertyKind::Quat,
                actual: other.kind(),
            }),
        }
    }
}

/// The kind of a property, without its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Boolean
    Bool,
    /// Integer
    Int,
    /// Floating point
    Float,
    /// 3D vector
    Vec3,
    /// Rotation
    Quat,
    /// String
    Str,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Vec3 => "vec3",
            Self::Quat => "quat",
            Self::Str => "str",
        };
        f.write_str(name)
    }
}

/// Whether a property can be written through the binding layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAccessKind {
    /// Readable only
    ReadOnly,
    /// Readable and writable
    ReadWrite,
}

/// Static description of one named property a component exposes
///
/// Each component variant declares its descriptor table as a `'static` slice
/// so inspection tooling can enumerate names and kinds without instantiating
/// anything.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor {
    /// Name used to address the property
    pub name: &'static str,
    /// Kind of value stored behind the name
    pub kind: PropertyKind,
    /// Read-only or read-write
    pub access: PropertyAccessKind,
}

/// Static description of one zero-argument method a component exposes
#[derive(Debug, Clone, Copy)]
pub struct MethodDescriptor {
    /// Name used to invoke the method
    pub name: &'static str,
}

/// Errors reported by name-based property and method access
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    /// The addressed component does not exist on the actor
    #[error("actor has no component '{component}'")]
    UnknownComponent {
        /// Component name that failed to resolve
        component: String,
    },

    /// The component exposes no property under this name
    #[error("component '{component}' has no property '{property}'")]
    UnknownProperty {
        /// Component the lookup ran against
        component: String,
        /// Property name that failed to resolve
        property: String,
    },

    /// The component exposes no method under this name
    #[error("component '{component}' has no method '{method}'")]
    UnknownMethod {
        /// Component the lookup ran against
        component: String,
        /// Method name that failed to resolve
        method: String,
    },

    /// A value of the wrong kind was supplied for a property
    #[error("type mismatch for '{property}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Property the write targeted
        property: String,
        /// Kind the property stores
        expected: PropertyKind,
        /// Kind that was supplied
        actual: PropertyKind,
    },

    /// The property cannot be written
    #[error("property '{property}' is read-only")]
    ReadOnly {
        /// Property the write targeted
        property: String,
    },

    /// A property path did not have the `component.property` shape
    #[error("malformed property path '{path}'")]
    MalformedPath {
        /// Path as supplied by the caller
        path: String,
    },

    /// The addressed actor no longer exists
    #[error("actor is no longer alive")]
    DeadActor,
}

/// Name-based access to component state behind some scope
///
/// Paths have the shape `component.property`, where the property part may
/// itself be dotted (for example `transform.position.x`). Implemented by
/// actor-level scopes; consumed by the script interpreter and tools.
pub trait PropertyAccess {
    /// Read a property by path
    fn get(&self, path: &str) -> Result<PropertyValue, BindingError>;

    /// Write a property by path
    fn set(&mut self, path: &str, value: PropertyValue) -> Result<(), BindingError>;

    /// Invoke a zero-argument method by path
    fn invoke(&mut self, path: &str) -> Result<(), BindingError>;
}

/// Split a `component.property` path into its two parts
///
/// Only the first dot separates; the property part keeps any further dots.
pub(crate) fn split_path(path: &str) -> Result<(&str, &str), BindingError> {
    match path.split_once('.') {
        Some((component, property)) if !component.is_empty() && !property.is_empty() => {
            Ok((component, property))
        }
        _ => Err(BindingError::MalformedPath {
            path: path.to_string(),
        }),
    }
}
