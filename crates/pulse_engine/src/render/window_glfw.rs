//! GLFW-backed window system
//!
//! Wraps a desktop window and translates its events into the engine's input
//! vocabulary. No graphics context is created; rendering backends bring
//! their own surface plumbing.

use super::window::{WindowError, WindowSystem};
use crate::input::{InputEvent, KeyCode, MouseButton};

/// Desktop window driven by GLFW
pub struct GlfwWindow {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    pending: Vec<InputEvent>,
}

impl GlfwWindow {
    /// Create a visible window with the given title and size
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, WindowError> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|error| WindowError::InitializationFailed(error.to_string()))?;

        // No GL context; a render backend attaches its own surface.
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;

        window.set_key_polling(true);
        window.set_mouse_button_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_close_polling(true);

        Ok(Self {
            glfw,
            window,
            events,
            pending: Vec::new(),
        })
    }
}

impl WindowSystem for GlfwWindow {
    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn poll_events(&mut self) {
        self.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&self.events) {
            if let Some(translated) = translate_event(&event) {
                self.pending.push(translated);
            }
        }
    }

    fn drain_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}

fn translate_event(event: &glfw::WindowEvent) -> Option<InputEvent> {
    match event {
        glfw::WindowEvent::Key(key, _, action, _) => {
            let pressed = match action {
                glfw::Action::Press => true,
                glfw::Action::Release => false,
                glfw::Action::Repeat => return None,
            };
            translate_key(*key).map(|key| InputEvent::Key { key, pressed })
        }
        glfw::WindowEvent::MouseButton(button, action, _) => {
            let pressed = match action {
                glfw::Action::Press => true,
                glfw::Action::Release => false,
                glfw::Action::Repeat => return None,
            };
            translate_button(*button).map(|button| InputEvent::MouseButton { button, pressed })
        }
        glfw::WindowEvent::CursorPos(x, y) => Some(InputEvent::CursorMoved { x: *x, y: *y }),
        _ => None,
    }
}

fn translate_key(key: glfw::Key) -> Option<KeyCode> {
    match key {
        glfw::Key::A => Some(KeyCode::A),
        glfw::Key::D => Some(KeyCode::D),
        glfw::Key::F => Some(KeyCode::F),
        glfw::Key::S => Some(KeyCode::S),
        glfw::Key::W => Some(KeyCode::W),
        glfw::Key::Space => Some(KeyCode::Space),
        glfw::Key::Enter => Some(KeyCode::Enter),
        glfw::Key::Escape => Some(KeyCode::Escape),
        glfw::Key::LeftShift => Some(KeyCode::LeftShift),
        glfw::Key::LeftControl => Some(KeyCode::LeftControl),
        glfw::Key::Up => Some(KeyCode::Up),
        glfw::Key::Down => Some(KeyCode::Down),
        glfw::Key::Left => Some(KeyCode::Left),
        glfw::Key::Right => Some(KeyCode::Right),
        _ => None,
    }
}

fn translate_button(button: glfw::MouseButton) -> Option<MouseButton> {
    match button {
        glfw::MouseButton::Button1 => Some(MouseButton::Left),
        glfw::MouseButton::Button2 => Some(MouseButton::Right),
        glfw::MouseButton::Button3 => Some(MouseButton::Middle),
        _ => None,
    }
}
