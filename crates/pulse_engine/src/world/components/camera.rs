//! View camera component
//!
//! The camera derives its view from the owning actor's transform according
//! to the active mode, and smooths every mode change through a fixed-length
//! blend. Free mode detaches the view from the owner entirely; the
//! character controller uses that for its free-camera toggle.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Quat, QuatExt, Vec3};
use crate::world::component::{Component, OwnerHandle, OwnerScope, ResourceError};
use crate::world::components::transform::TransformComponent;
use crate::world::property::{
    BindingError, MethodDescriptor, PropertyAccessKind, PropertyDescriptor, PropertyKind,
    PropertyValue,
};

/// Seconds a camera takes to settle after a mode change.
pub const CAMERA_BLEND_TIME: f32 = 0.3;

/// How the camera follows its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Eye-level view from the owner's position
    FirstPerson,
    /// Trailing view behind the owner
    ThirdPerson,
    /// Detached view that ignores the owner
    Free,
}

impl CameraMode {
    /// Stable name used by the `mode` property
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstPerson => "first_person",
            Self::ThirdPerson => "third_person",
            Self::Free => "free",
        }
    }
}

/// Progress of the transition started by the last mode change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBlend {
    duration: f32,
    elapsed: f32,
}

impl CameraBlend {
    fn settled() -> Self {
        Self {
            duration: CAMERA_BLEND_TIME,
            elapsed: CAMERA_BLEND_TIME,
        }
    }

    fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    fn advance(&mut self, delta_time: f32) {
        self.elapsed = (self.elapsed + delta_time).min(self.duration);
    }

    /// Interpolation factor in `[0, 1]`
    pub fn factor(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Whether the transition has fully settled
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// The camera's resolved pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// Eye position in world space
    pub position: Vec3,
    /// View orientation
    pub rotation: Quat,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

/// Snapshot of mode and blend progress, restorable bit for bit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Mode at snapshot time
    pub mode: CameraMode,
    /// Blend progress at snapshot time
    pub blend: CameraBlend,
}

/// Camera attached to an actor
pub struct CameraComponent {
    mode: CameraMode,
    fov_degrees: f32,
    eye_height: f32,
    follow_distance: f32,
    blend: CameraBlend,
    blend_from: CameraView,
    view: CameraView,
}

impl CameraComponent {
    const PROPERTIES: &'static [PropertyDescriptor] = &[
        PropertyDescriptor {
            name: "mode",
            kind: PropertyKind::Str,
            access: PropertyAccessKind::ReadOnly,
        },
        PropertyDescriptor {
            name: "fov_degrees",
            kind: PropertyKind::Float,
            access: PropertyAccessKind::ReadWrite,
        },
        PropertyDescriptor {
            name: "eye_height",
            kind: PropertyKind::Float,
            access: PropertyAccessKind::ReadWrite,
        },
        PropertyDescriptor {
            name: "follow_distance",
            kind: PropertyKind::Float,
            access: PropertyAccessKind::ReadWrite,
        },
        PropertyDescriptor {
            name: "view.position",
            kind: PropertyKind::Vec3,
            access: PropertyAccessKind::ReadOnly,
        },
        PropertyDescriptor {
            name: "view.rotation",
            kind: PropertyKind::Quat,
            access: PropertyAccessKind::ReadOnly,
        },
    ];

    const METHODS: &'static [MethodDescriptor] = &[MethodDescriptor {
        name: "reset_blend",
    }];

    /// Create a camera in the given mode with default framing
    pub fn new(mode: CameraMode) -> Self {
        Self {
            mode,
            fov_degrees: 75.0,
            eye_height: 1.6,
            follow_distance: 4.0,
            blend: CameraBlend::settled(),
            blend_from: CameraView::default(),
            view: CameraView::default(),
        }
    }

    /// Override the vertical field of view, in degrees
    pub fn with_fov_degrees(mut self, fov_degrees: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self
    }

    /// Override the eye height above the owner's origin
    pub fn with_eye_height(mut self, eye_height: f32) -> Self {
        self.eye_height = eye_height;
        self
    }

    /// Override the third-person trailing distance
    pub fn with_follow_distance(mut self, follow_distance: f32) -> Self {
        self.follow_distance = follow_distance;
        self
    }

    /// Active mode
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Vertical field of view in degrees
    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Resolved view pose as of the last tick
    pub fn view(&self) -> CameraView {
        self.view
    }

    /// Blend progress for the current transition
    pub fn blend(&self) -> CameraBlend {
        self.blend
    }

    /// Switch modes, restarting the transition blend
    ///
    /// Setting the mode that is already active does nothing.
    pub fn set_mode(&mut self, mode: CameraMode) {
        if mode == self.mode {
            return;
        }
        self.blend_from = self.view;
        self.mode = mode;
        self.blend.restart();
    }

    /// Capture mode and blend progress for a later exact restore
    pub fn snapshot_state(&self) -> CameraState {
        CameraState {
            mode: self.mode,
            blend: self.blend,
        }
    }

    /// Restore a snapshot exactly, without restarting the blend
    pub fn restore_state(&mut self, state: CameraState) {
        self.mode = state.mode;
        self.blend = state.blend;
    }

    fn target_view(&self, owner: &OwnerScope<'_>) -> CameraView {
        let Some(transform) = owner.sibling::<TransformComponent>() else {
            // No spatial anchor; hold the current pose.
            return self.view;
        };
        let rotation = transform.rotation();
        let eye = transform.position() + Vec3::y() * self.eye_height;
        match self.mode {
            CameraMode::FirstPerson => CameraView {
                position: eye,
                rotation,
            },
            CameraMode::ThirdPerson => CameraView {
                position: eye - rotation.forward() * self.follow_distance,
                rotation,
            },
            CameraMode::Free => self.view,
        }
    }
}

impl Component for CameraComponent {
    fn type_name(&self) -> &'static str {
        "camera"
    }

    fn post_load_resource(&mut self, _owner: OwnerHandle<'_>) -> Result<(), ResourceError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ResourceError::Invalid(format!(
                "camera fov {} degrees is outside (0, 180)",
                self.fov_degrees
            )));
        }
        Ok(())
    }

    fn tick(&mut self, delta_time: f32, owner: &mut OwnerScope<'_>) {
        self.blend.advance(delta_time);
        let target = self.target_view(owner);
        let factor = self.blend.factor();
        // Opposed orientations have no unique interpolation path; snap to the
        // target instead of panicking inside the slerp.
        let rotation = self
            .blend_from
            .rotation
            .try_slerp(&target.rotation, factor, 1.0e-6)
            .unwrap_or(target.rotation);
        self.view = CameraView {
            position: self.blend_from.position.lerp(&target.position, factor),
            rotation,
        };
    }

    fn properties(&self) -> &'static [PropertyDescriptor] {
        Self::PROPERTIES
    }

    fn methods(&self) -> &'static [MethodDescriptor] {
        Self::METHODS
    }

    fn property(&self, name: &str) -> Result<PropertyValue, BindingError> {
        match name {
            "mode" => Ok(PropertyValue::Str(self.mode.as_str().to_string())),
            "fov_degrees" => Ok(PropertyValue::Float(self.fov_degrees)),
            "eye_height" => Ok(PropertyValue::Float(self.eye_height)),
            "follow_distance" => Ok(PropertyValue::Float(self.follow_distance)),
            "view.position" => Ok(PropertyValue::Vec3(self.view.position)),
            "view.rotation" => Ok(PropertyValue::Quat(self.view.rotation)),
            _ => Err(BindingError::UnknownProperty {
                component: self.type_name().to_string(),
                property: name.to_string(),
            }),
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), BindingError> {
        match name {
            "fov_degrees" => self.fov_degrees = value.as_float(name)?,
            "eye_height" => self.eye_height = value.as_float(name)?,
            "follow_distance" => self.follow_distance = value.as_float(name)?,
            "mode" | "view.position" | "view.rotation" => {
                return Err(BindingError::ReadOnly {
                    property: name.to_string(),
                })
            }
            _ => {
                return Err(BindingError::UnknownProperty {
                    component: self.type_name().to_string(),
                    property: name.to_string(),
                })
            }
        }
        Ok(())
    }

    fn invoke(&mut self, name: &str) -> Result<(), BindingError> {
        match name {
            "reset_blend" => {
                // Snap the current transition to its end.
                self.blend.elapsed = self.blend.duration;
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
