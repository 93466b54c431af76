//! Logic-to-render data hand-off
//!
//! Two snapshot buffers alternate roles. The logical tick fills the staging
//! buffer; the per-frame swap then makes it the visible buffer the renderer
//! reads for the rest of the frame. The renderer never observes a partially
//! written snapshot, and logic never writes into the one being drawn.

use std::mem;

use crate::animation::AnimationResult;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::world::components::camera::CameraMode;
use crate::world::ActorId;

/// One renderable actor captured at the end of its logical tick
#[derive(Debug, Clone, PartialEq)]
pub struct RenderObject {
    /// Actor this entry was captured from
    pub actor: ActorId,
    /// World transform at capture time
    pub transform: Transform,
    /// Evaluated pose, when the actor animates
    pub pose: Option<AnimationResult>,
}

/// Camera parameters captured for the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRenderData {
    /// Eye position in world space
    pub position: Vec3,
    /// View orientation
    pub rotation: Quat,
    /// Mode the camera was in
    pub mode: CameraMode,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderSwapData {
    /// Logical frame this snapshot was captured from
    pub frame_index: u64,
    /// Active camera, if any actor carries one
    pub camera: Option<CameraRenderData>,
    /// Renderable actors in world tick order
    pub objects: Vec<RenderObject>,
}

impl RenderSwapData {
    /// Empty the snapshot while keeping its allocations
    pub fn clear(&mut self) {
        self.frame_index = 0;
        self.camera = None;
        self.objects.clear();
    }
}

/// Owner of the two snapshot buffers and their per-frame exchange
#[derive(Debug, Default)]
pub struct RenderSwapContext {
    staging: RenderSwapData,
    visible: RenderSwapData,
    swap_count: u64,
}

impl RenderSwapContext {
    /// Create a context with two empty snapshots
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer the current logical tick writes into
    pub fn staging_mut(&mut self) -> &mut RenderSwapData {
        &mut self.staging
    }

    /// The buffer the current logical tick has written so far
    pub fn staging(&self) -> &RenderSwapData {
        &self.staging
    }

    /// The complete snapshot the renderer reads this frame
    pub fn visible(&self) -> &RenderSwapData {
        &self.visible
    }

    /// Publish the staging snapshot and recycle the old visible one
    ///
    /// Called exactly once per frame, after the logical tick and before the
    /// render tick. The previous visible buffer becomes the next staging
    /// buffer, cleared but with its allocations intact.
    pub fn swap_logic_render_data(&mut self) {
        mem::swap(&mut self.staging, &mut self.visible);
        self.staging.clear();
        self.swap_count += 1;
    }

    /// Number of swaps performed so far
    pub fn swap_count(&self) -> u64 {
        self.swap_count
    }
}
