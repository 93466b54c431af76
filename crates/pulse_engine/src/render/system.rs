//! Renderer contract

use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::swap_context::RenderSwapData;

/// Errors a render backend can report during its tick
#[derive(Error, Debug)]
pub enum RenderError {
    /// The backend failed in a way the engine cannot recover from
    #[error("render backend failure: {0}")]
    Backend(String),
}

/// A renderer driven once per frame with the visible snapshot
///
/// The snapshot is immutable for the whole call; backends draw from it and
/// nothing else. Errors are treated as fatal by the frame loop.
pub trait RenderSystem {
    /// Draw one frame from the given snapshot
    fn tick(&mut self, delta_time: f32, snapshot: &RenderSwapData) -> Result<(), RenderError>;
}

#[derive(Debug, Default)]
struct RenderRecord {
    frames: u64,
    last_frame_index: u64,
    last_object_count: usize,
}

/// Renderer that records what it was asked to draw
///
/// Stands in for a real backend in tests and server-side runs. Clones share
/// one record, so a handle kept outside the engine reads what the engine's
/// copy drew.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderSystem {
    record: Arc<Mutex<RenderRecord>>,
}

impl HeadlessRenderSystem {
    /// Create a recorder with nothing drawn yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of render ticks performed
    pub fn frames(&self) -> u64 {
        self.record.lock().unwrap().frames
    }

    /// Frame stamp of the last snapshot drawn
    pub fn last_frame_index(&self) -> u64 {
        self.record.lock().unwrap().last_frame_index
    }

    /// Object count of the last snapshot drawn
    pub fn last_object_count(&self) -> usize {
        self.record.lock().unwrap().last_object_count
    }
}

impl RenderSystem for HeadlessRenderSystem {
    fn tick(&mut self, _delta_time: f32, snapshot: &RenderSwapData) -> Result<(), RenderError> {
        let mut record = self.record.lock().unwrap();
        record.frames += 1;
        record.last_frame_index = snapshot.frame_index;
        record.last_object_count = snapshot.objects.len();
        Ok(())
    }
}
