//! Script host component

use std::any::Any;

use crate::scripting::{ScriptContext, ScriptProgram, ScriptStatus};
use crate::world::component::{Component, OwnerHandle, OwnerScope, ResourceError};
use crate::world::property::{
    BindingError, MethodDescriptor, PropertyAccessKind, PropertyDescriptor, PropertyKind,
    PropertyValue,
};

/// Runs one compiled script against the owning actor
///
/// The source compiles during resource binding; a compile error disables the
/// component under the usual degrade policy. At runtime the script sees the
/// actor through the same property layer as everything else, and a script
/// that hits a binding error stops for good without taking the frame down.
pub struct ScriptComponent {
    source: String,
    context: Option<ScriptContext>,
    fault_logged: bool,
}

impl ScriptComponent {
    const PROPERTIES: &'static [PropertyDescriptor] = &[PropertyDescriptor {
        name: "status",
        kind: PropertyKind::Str,
        access: PropertyAccessKind::ReadOnly,
    }];

    const METHODS: &'static [MethodDescriptor] = &[MethodDescriptor { name: "restart" }];

    /// Create a host for the given source
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            context: None,
            fault_logged: false,
        }
    }

    /// Source text this component was created with
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Execution status, or `None` before resources are bound
    pub fn status(&self) -> Option<ScriptStatus> {
        self.context.as_ref().map(ScriptContext::status)
    }

    fn status_str(&self) -> &'static str {
        match self.status() {
            None => "unbound",
            Some(ScriptStatus::Running) => "running",
            Some(ScriptStatus::Waiting) => "waiting",
            Some(ScriptStatus::Finished) => "finished",
            Some(ScriptStatus::Faulted) => "faulted",
        }
    }
}

impl Component for ScriptComponent {
    fn type_name(&self) -> &'static str {
        "script"
    }

    fn post_load_resource(&mut self, _owner: OwnerHandle<'_>) -> Result<(), ResourceError> {
        let program = ScriptProgram::compile(&self.source)?;
        self.context = Some(ScriptContext::new(program));
        Ok(())
    }

    fn tick(&mut self, delta_time: f32, owner: &mut OwnerScope<'_>) {
        let Some(context) = self.context.as_mut() else {
            return;
        };
        if let Err(error) = context.step(delta_time, owner) {
            if !self.fault_logged {
                log::warn!("actor '{}': script stopped: {}", owner.name(), error);
                self.fault_logged = true;
            }
        }
    }

    fn properties(&self) -> &'static [PropertyDescriptor] {
        Self::PROPERTIES
    }

    fn methods(&self) -> &'static [MethodDescriptor] {
        Self::METHODS
    }

    fn property(&self, name: &str) -> Result<PropertyValue, BindingError> {
        match name {
            "status" => Ok(PropertyValue::Str(self.status_str().to_string())),
            _ => Err(BindingError::UnknownProperty {
                component: self.type_name().to_string(),
                property: name.to_string(),
            }),
        }
    }

    fn invoke(&mut self, name: &str) -> Result<(), BindingError> {
        match name {
            "restart" => {
                if let Some(context) = self.context.as_mut() {
                    context.restart();
                }
                self.fault_logged = false;
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
