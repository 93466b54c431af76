//! Runtime context: everything the frame scheduler drives
//!
//! The bootstrap assembles the context explicitly and hands it to the
//! engine. Construction fails without the mandatory collaborators, so a
//! scheduler that exists always has a window and a renderer to drive.

use crate::engine::EngineError;
use crate::input::InputSystem;
use crate::physics::PhysicsSystem;
use crate::render::swap_context::RenderSwapContext;
use crate::render::system::RenderSystem;
use crate::render::window::WindowSystem;
use crate::world::World;

/// Collaborators and state owned by the frame scheduler
pub struct RuntimeContext {
    pub(crate) world: World,
    pub(crate) input: InputSystem,
    pub(crate) swap: RenderSwapContext,
    pub(crate) window: Box<dyn WindowSystem>,
    pub(crate) renderer: Box<dyn RenderSystem>,
    pub(crate) physics: Option<Box<dyn PhysicsSystem>>,
    pub(crate) title: String,
}

impl RuntimeContext {
    /// Start assembling a context
    pub fn builder() -> RuntimeContextBuilder {
        RuntimeContextBuilder::default()
    }

    /// The simulation world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The simulation world, mutably
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Base title the status line is built from
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether a physics backend is registered
    pub fn has_physics(&self) -> bool {
        self.physics.is_some()
    }
}

/// Builder for [`RuntimeContext`]
///
/// A window system and a render system are mandatory; everything else has a
/// sensible empty default.
#[derive(Default)]
pub struct RuntimeContextBuilder {
    world: Option<World>,
    window: Option<Box<dyn WindowSystem>>,
    renderer: Option<Box<dyn RenderSystem>>,
    physics: Option<Box<dyn PhysicsSystem>>,
    title: Option<String>,
}

impl RuntimeContextBuilder {
    /// Use this window system
    pub fn with_window(mut self, window: impl WindowSystem + 'static) -> Self {
        self.window = Some(Box::new(window));
        self
    }

    /// Use this render system
    pub fn with_renderer(mut self, renderer: impl RenderSystem + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Register a physics backend for the debug overlay
    pub fn with_physics(mut self, physics: impl PhysicsSystem + 'static) -> Self {
        self.physics = Some(Box::new(physics));
        self
    }

    /// Start from a prepared world instead of an empty one
    pub fn with_world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Base window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Assemble the context
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingSubsystem`] when no window or no renderer was
    /// provided.
    pub fn build(self) -> Result<RuntimeContext, EngineError> {
        let window = self.window.ok_or(EngineError::MissingSubsystem("window"))?;
        let renderer = self
            .renderer
            .ok_or(EngineError::MissingSubsystem("renderer"))?;
        Ok(RuntimeContext {
            world: self.world.unwrap_or_default(),
            input: InputSystem::new(),
            swap: RenderSwapContext::new(),
            window,
            renderer,
            physics: self.physics,
            title: self.title.unwrap_or_else(|| "Pulse".to_string()),
        })
    }
}
