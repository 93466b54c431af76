//! Render-facing surfaces of the runtime
//!
//! The engine core does not render anything itself. It produces an immutable
//! per-frame snapshot through [`swap_context`], and drives whatever
//! [`system::RenderSystem`] and [`window::WindowSystem`] the application
//! plugged in. A GLFW-backed window ships behind the `glfw-window` feature;
//! everything else here is backend-agnostic.

pub mod swap_context;
pub mod system;
pub mod window;

#[cfg(feature = "glfw-window")]
pub mod window_glfw;

pub use swap_context::{CameraRenderData, RenderObject, RenderSwapContext, RenderSwapData};
pub use system::{HeadlessRenderSystem, RenderError, RenderSystem};
pub use window::{HeadlessWindow, WindowError, WindowSystem};

#[cfg(feature = "glfw-window")]
pub use window_glfw::GlfwWindow;
