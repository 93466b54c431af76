//! Clip playback component

use std::any::Any;

use crate::animation::{AnimationClip, AnimationResult, Skeleton};
use crate::world::component::{Component, OwnerHandle, OwnerScope, ResourceError};
use crate::world::property::{
    BindingError, MethodDescriptor, PropertyAccessKind, PropertyDescriptor, PropertyKind,
    PropertyValue,
};

/// Plays one looping clip and exposes the evaluated pose
///
/// Playback position is tracked as a normalized ratio in `[0, 1)` so the
/// clip loops seamlessly regardless of its duration. The evaluated pose and
/// the skeleton topology are read-only outputs; the render hand-off
/// snapshots the pose every frame.
pub struct AnimationComponent {
    clip: AnimationClip,
    skeleton: Option<Skeleton>,
    ratio: f32,
    result: AnimationResult,
}

impl AnimationComponent {
    const PROPERTIES: &'static [PropertyDescriptor] = &[
        PropertyDescriptor {
            name: "ratio",
            kind: PropertyKind::Float,
            access: PropertyAccessKind::ReadWrite,
        },
        PropertyDescriptor {
            name: "clip",
            kind: PropertyKind::Str,
            access: PropertyAccessKind::ReadOnly,
        },
        PropertyDescriptor {
            name: "duration",
            kind: PropertyKind::Float,
            access: PropertyAccessKind::ReadOnly,
        },
    ];

    const METHODS: &'static [MethodDescriptor] = &[MethodDescriptor { name: "rewind" }];

    /// Create a player for the given clip
    ///
    /// The clip is validated when the owning actor spawns, not here.
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            skeleton: None,
            ratio: 0.0,
            result: AnimationResult::default(),
        }
    }

    /// The clip being played
    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Bone hierarchy, available once resources are bound
    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }

    /// Pose evaluated by the most recent tick
    pub fn result(&self) -> &AnimationResult {
        &self.result
    }

    /// Normalized playback position in `[0, 1)`
    pub fn ratio(&self) -> f32 {
        self.ratio
    }
}

impl Component for AnimationComponent {
    fn type_name(&self) -> &'static str {
        "animation"
    }

    fn post_load_resource(&mut self, _owner: OwnerHandle<'_>) -> Result<(), ResourceError> {
        self.clip.validate()?;
        self.skeleton = Some(Skeleton::from_clip(&self.clip));
        self.result = self.clip.evaluate(0.0);
        Ok(())
    }

    fn tick(&mut self, delta_time: f32, _owner: &mut OwnerScope<'_>) {
        self.ratio = (self.ratio + delta_time / self.clip.duration).fract();
        self.result = self.clip.evaluate(self.ratio * self.clip.duration);
    }

    fn properties(&self) -> &'static [PropertyDescriptor] {
        Self::PROPERTIES
    }

    fn methods(&self) -> &'static [MethodDescriptor] {
        Self::METHODS
    }

    fn property(&self, name: &str) -> Result<PropertyValue, BindingError> {
        match name {
            "ratio" => Ok(PropertyValue::Float(self.ratio)),
            "clip" => Ok(PropertyValue::Str(self.clip.name.clone())),
            "duration" => Ok(PropertyValue::Float(self.clip.duration)),
            _ => Err(BindingError::UnknownProperty {
                component: self.type_name().to_string(),
                property: name.to_string(),
            }),
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), BindingError> {
        match name {
            "ratio" => {
                self.ratio = value.as_float(name)?.rem_euclid(1.0);
                Ok(())
            }
            "clip" | "duration" => Err(BindingError::ReadOnly {
                property: name.to_string(),
            }),
            _ => Err(BindingError::UnknownProperty {
                component: self.type_name().to_string(),
                property: name.to_string(),
            }),
        }
    }

    fn invoke(&mut self, name: &str) -> Result<(), BindingError> {
        match name {
            "rewind" => {
                self.ratio = 0.0;
                self.result = self.clip.evaluate(0.0);
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
