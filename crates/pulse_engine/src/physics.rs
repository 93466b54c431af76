//! Physics collaborator interface
//!
//! The core never steps physics itself. A registered backend only gets a
//! debug-overlay callback, and only in builds with the `physics-debug`
//! feature enabled.

use std::sync::{Arc, Mutex};

/// Debug-overlay hook for an external physics backend
pub trait PhysicsSystem {
    /// Draw the physics world's debug view for this frame
    fn render_physics_world(&mut self, delta_time: f32);
}

/// Backend that counts overlay calls, for tests and headless runs
///
/// Clones share one counter, so a handle kept outside the engine observes
/// the calls the engine's copy received.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPhysicsSystem {
    overlay_calls: Arc<Mutex<u64>>,
}

impl HeadlessPhysicsSystem {
    /// Create a backend with no calls recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of overlay passes requested so far
    pub fn overlay_calls(&self) -> u64 {
        *self.overlay_calls.lock().unwrap()
    }
}

impl PhysicsSystem for HeadlessPhysicsSystem {
    fn render_physics_world(&mut self, _delta_time: f32) {
        *self.overlay_calls.lock().unwrap() += 1;
    }
}
