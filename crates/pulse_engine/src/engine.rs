//! Frame scheduler
//!
//! [`Engine`] drives the whole runtime: one `tick_one_frame` call per frame,
//! with a fixed stage order the rest of the crate is built around. The
//! logical tick mutates the world and fills the staging snapshot; the swap
//! publishes it; the render tick draws it; the window pump feeds the next
//! frame's input.

use thiserror::Error;

use crate::context::RuntimeContext;
use crate::foundation::time::{FpsCounter, FrameTimer};
use crate::render::system::RenderError;
use crate::world::World;

/// Fatal engine failures
#[derive(Error, Debug)]
pub enum EngineError {
    /// A mandatory collaborator was not provided to the context builder
    #[error("missing mandatory subsystem: {0}")]
    MissingSubsystem(&'static str),

    /// The render backend failed a frame
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// The frame scheduler
///
/// Owns the runtime context and the frame clock. Construction cannot happen
/// without a window and a renderer, so the loop always has collaborators to
/// drive.
pub struct Engine {
    context: RuntimeContext,
    timer: FrameTimer,
    fps: FpsCounter,
}

impl Engine {
    /// Wrap a fully built context in a scheduler
    pub fn new(context: RuntimeContext) -> Self {
        log::info!("engine start");
        Self {
            context,
            timer: FrameTimer::new(),
            fps: FpsCounter::new(),
        }
    }

    /// The simulation world
    pub fn world(&self) -> &World {
        self.context.world()
    }

    /// The simulation world, mutably
    pub fn world_mut(&mut self) -> &mut World {
        self.context.world_mut()
    }

    /// Smoothed frames per second, derived from the running average
    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Drive frames until the window asks to close
    pub fn run(&mut self) -> Result<(), EngineError> {
        while !self.context.window.should_close() {
            let delta_time = self.calculate_delta_time();
            if !self.tick_one_frame(delta_time)? {
                break;
            }
        }
        log::info!("engine shutdown");
        Ok(())
    }

    /// Seconds since the previous call, clamped against stalls
    ///
    /// The first call measures from scheduler construction.
    pub fn calculate_delta_time(&mut self) -> f32 {
        self.timer.tick()
    }

    /// Advance the runtime by exactly one frame
    ///
    /// Stage order is fixed: logical tick, FPS bookkeeping, snapshot swap,
    /// render tick, optional physics overlay, event pump, title update,
    /// close check. Returns `Ok(false)` when the window wants to stop.
    ///
    /// # Errors
    ///
    /// Render backend failures abort the frame and surface here.
    pub fn tick_one_frame(&mut self, delta_time: f32) -> Result<bool, EngineError> {
        self.logical_tick(delta_time);
        self.fps.sample(delta_time);

        // The single hand-off point between the logic and render stages.
        self.context.swap.swap_logic_render_data();

        self.context
            .renderer
            .tick(delta_time, self.context.swap.visible())?;

        #[cfg(feature = "physics-debug")]
        if let Some(physics) = self.context.physics.as_mut() {
            physics.render_physics_world(delta_time);
        }

        self.context.window.poll_events();
        for event in self.context.window.drain_events() {
            self.context.input.handle_event(event);
        }

        let title = format!("{} - {} FPS", self.context.title, self.fps.fps());
        self.context.window.set_title(&title);

        Ok(!self.context.window.should_close())
    }

    /// Simulation update plus input sampling, all on the same delta
    ///
    /// The world tick reads this frame's input state; the staging snapshot
    /// is gathered from the ticked world; the input system then retires its
    /// per-frame edges so the next pump starts clean.
    fn logical_tick(&mut self, delta_time: f32) {
        self.context
            .world
            .tick(delta_time, self.context.input.state());
        self.context
            .world
            .gather_render_data(self.context.swap.staging_mut());
        self.context.input.tick();
    }
}
