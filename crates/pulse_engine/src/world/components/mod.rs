//! Built-in component types
//!
//! The engine ships four concrete components; applications add their own by
//! implementing [`Component`](crate::world::component::Component).

pub mod animation;
pub mod camera;
pub mod script;
pub mod transform;

pub use animation::AnimationComponent;
pub use camera::{CameraComponent, CameraMode, CameraState, CameraView, CAMERA_BLEND_TIME};
pub use script::ScriptComponent;
pub use transform::TransformComponent;
