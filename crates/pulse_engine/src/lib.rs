//! # Pulse Engine
//!
//! The runtime core of an interactive real-time 3D application: a frame
//! scheduler with a fixed per-frame stage order, a world of actors composed
//! from components, and a double-buffered hand-off that gives the render
//! stage one immutable snapshot per frame.
//!
//! ## What lives here
//!
//! - **Frame scheduler**: the [`Engine`] loop and its eight-stage frame
//! - **World dispatch**: actors tick in creation order, components in
//!   attach order, with typed property access for scripts and tooling
//! - **Logic/render exchange**: the staging/visible snapshot pair behind
//!   [`render::RenderSwapContext`]
//! - **Character controller**: command-driven movement with a deferred
//!   rotation commit and a free-camera toggle
//!
//! Windowing, rendering, and physics are collaborators behind traits;
//! headless implementations ship for tests and server-side runs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pulse_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut world = World::new();
//!     world.spawn("prop", vec![Box::new(TransformComponent::default())]);
//!
//!     let context = RuntimeContext::builder()
//!         .with_window(HeadlessWindow::with_frame_budget(60))
//!         .with_renderer(HeadlessRenderSystem::new())
//!         .with_world(world)
//!         .with_title("Demo")
//!         .build()?;
//!     Engine::new(context).run()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod animation;
pub mod character;
pub mod config;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod scripting;
pub mod world;

mod context;
mod engine;

pub use context::{RuntimeContext, RuntimeContextBuilder};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        character::Character,
        config::{Config, EngineSettings},
        foundation::math::{Quat, Transform, Vec3},
        foundation::time::{FpsCounter, FrameTimer},
        input::{GameCommand, InputEvent, InputSystem, KeyCode, MouseButton},
        render::{HeadlessRenderSystem, HeadlessWindow, RenderSystem, WindowSystem},
        world::components::{
            AnimationComponent, CameraComponent, CameraMode, ScriptComponent, TransformComponent,
        },
        world::{Actor, ActorId, Component, World, WorldDefinition},
        Engine, EngineError, RuntimeContext,
    };
}
