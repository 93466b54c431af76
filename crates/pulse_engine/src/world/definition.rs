//! Serde descriptions of spawnable actors
//!
//! World files are RON. Each actor is a name plus a list of component
//! descriptions; [`ComponentDefinition::into_component`] turns a description
//! into the live component the world attaches.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationClip;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::world::component::Component;
use crate::world::components::{
    AnimationComponent, CameraComponent, CameraMode, ScriptComponent, TransformComponent,
};

/// Definition file errors
#[derive(thiserror::Error, Debug)]
pub enum DefinitionError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Everything a world file describes
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldDefinition {
    /// Actors to spawn, in spawn order
    #[serde(default)]
    pub actors: Vec<ActorDefinition>,
}

impl WorldDefinition {
    /// Load a world description from a RON file
    pub fn load_from_file(path: &str) -> Result<Self, DefinitionError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a world description from RON text
    pub fn from_ron(contents: &str) -> Result<Self, DefinitionError> {
        ron::from_str(contents).map_err(|error| DefinitionError::Parse(error.to_string()))
    }
}

/// One actor: a name plus its components in attach order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorDefinition {
    /// Actor name
    pub name: String,
    /// Components, in attach order
    #[serde(default)]
    pub components: Vec<ComponentDefinition>,
}

/// Serializable description of one component
///
/// The closed set of shippable components. Omitted fields fall back to the
/// component's own defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ComponentDefinition {
    /// Spatial state
    Transform {
        /// Position in world units
        #[serde(default)]
        position: [f32; 3],
        /// Rotation as degrees about the x, y, and z axes
        #[serde(default)]
        rotation_euler_degrees: [f32; 3],
        /// Per-axis scale
        #[serde(default = "unit_scale")]
        scale: [f32; 3],
    },
    /// View camera
    Camera {
        /// Starting camera mode
        mode: CameraMode,
        /// Vertical field of view in degrees
        #[serde(default)]
        fov_degrees: Option<f32>,
        /// First-person eye height above the actor origin
        #[serde(default)]
        eye_height: Option<f32>,
        /// Third-person distance behind the actor
        #[serde(default)]
        follow_distance: Option<f32>,
    },
    /// Skeletal animation playback
    Animation {
        /// Clip data, validated at spawn
        clip: AnimationClip,
    },
    /// Scripted behavior
    Script {
        /// Script source text, compiled at spawn
        source: String,
    },
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl ComponentDefinition {
    /// Build the live component this definition describes
    pub fn into_component(self) -> Box<dyn Component> {
        match self {
            Self::Transform {
                position,
                rotation_euler_degrees,
                scale,
            } => {
                let rotation = Quat::from_euler_angles(
                    rotation_euler_degrees[0].to_radians(),
                    rotation_euler_degrees[1].to_radians(),
                    rotation_euler_degrees[2].to_radians(),
                );
                Box::new(TransformComponent::new(Transform {
                    position: Vec3::from(position),
                    rotation,
                    scale: Vec3::from(scale),
                }))
            }
            Self::Camera {
                mode,
                fov_degrees,
                eye_height,
                follow_distance,
            } => {
                let mut camera = CameraComponent::new(mode);
                if let Some(fov_degrees) = fov_degrees {
                    camera = camera.with_fov_degrees(fov_degrees);
                }
                if let Some(eye_height) = eye_height {
                    camera = camera.with_eye_height(eye_height);
                }
                if let Some(follow_distance) = follow_distance {
                    camera = camera.with_follow_distance(follow_distance);
                }
                Box::new(camera)
            }
            Self::Animation { clip } => Box::new(AnimationComponent::new(clip)),
            Self::Script { source } => Box::new(ScriptComponent::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WORLD_RON: &str = r#"(
        actors: [
            (
                name: "player",
                components: [
                    Transform(
                        position: (0.0, 0.0, 5.0),
                        rotation_euler_degrees: (0.0, 90.0, 0.0),
                    ),
                    Camera(
                        mode: third_person,
                        fov_degrees: Some(60.0),
                    ),
                ],
            ),
            (
                name: "sign",
                components: [
                    Script(source: "set transform.position.y 2 # float up"),
                ],
            ),
        ],
    )"#;

    #[test]
    fn world_files_parse_with_defaults_applied() {
        let definition = WorldDefinition::from_ron(WORLD_RON).unwrap();
        assert_eq!(definition.actors.len(), 2);
        assert_eq!(definition.actors[0].name, "player");
        assert_eq!(definition.actors[0].components.len(), 2);

        match &definition.actors[0].components[0] {
            ComponentDefinition::Transform { scale, .. } => {
                assert_eq!(*scale, [1.0, 1.0, 1.0]);
            }
            other => panic!("expected a transform, got {other:?}"),
        }
        match &definition.actors[0].components[1] {
            ComponentDefinition::Camera {
                mode, eye_height, ..
            } => {
                assert_eq!(*mode, CameraMode::ThirdPerson);
                assert_eq!(*eye_height, None);
            }
            other => panic!("expected a camera, got {other:?}"),
        }
    }

    #[test]
    fn transform_definitions_build_rotated_components() {
        let definition = ComponentDefinition::Transform {
            position: [1.0, 2.0, 3.0],
            rotation_euler_degrees: [0.0, 90.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        };

        let component = definition.into_component();
        let transform = component
            .as_any()
            .downcast_ref::<TransformComponent>()
            .unwrap();
        assert_relative_eq!(transform.position(), Vec3::new(1.0, 2.0, 3.0));
        // 90 degrees of yaw turns -Z into -X.
        assert_relative_eq!(
            transform.rotation() * -Vec3::z(),
            -Vec3::x(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn camera_definitions_respect_omitted_fields() {
        let with_override = ComponentDefinition::Camera {
            mode: CameraMode::FirstPerson,
            fov_degrees: Some(60.0),
            eye_height: None,
            follow_distance: None,
        };
        let component = with_override.into_component();
        let camera = component.as_any().downcast_ref::<CameraComponent>().unwrap();
        assert_relative_eq!(camera.fov_degrees(), 60.0);

        let bare = ComponentDefinition::Camera {
            mode: CameraMode::FirstPerson,
            fov_degrees: None,
            eye_height: None,
            follow_distance: None,
        };
        let component = bare.into_component();
        let camera = component.as_any().downcast_ref::<CameraComponent>().unwrap();
        assert_relative_eq!(camera.fov_degrees(), 75.0);
    }

    #[test]
    fn malformed_ron_reports_a_parse_error() {
        let result = WorldDefinition::from_ron("(actors: [(name: )])");
        assert!(matches!(result, Err(DefinitionError::Parse(_))));
    }
}
