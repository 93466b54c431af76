//! Input management system
//!
//! Window backends translate their native events into [`InputEvent`]s and
//! hand them to the [`InputSystem`], which folds them into a per-frame
//! [`InputState`]: the set of game commands currently held, the commands
//! newly pressed this frame, and the cursor movement. Simulation code reads
//! the state during the logical tick; the system clears the per-frame parts
//! right after.

use bitflags::bitflags;

use crate::foundation::math::Vec2;

bitflags! {
    /// Abstract game commands composed from raw device input
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GameCommand: u32 {
        /// Move toward facing
        const FORWARD = 1 << 0;
        /// Move away from facing
        const BACKWARD = 1 << 1;
        /// Strafe left
        const LEFT = 1 << 2;
        /// Strafe right
        const RIGHT = 1 << 3;
        /// Jump
        const JUMP = 1 << 4;
        /// Crouch
        const SQUAT = 1 << 5;
        /// Move at sprint speed
        const SPRINT = 1 << 6;
        /// Primary action
        const FIRE = 1 << 7;
        /// Toggle the free camera
        const FREE_CAMERA = 1 << 8;
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// F key
    F,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Left shift key
    LeftShift,
    /// Left control key
    LeftControl,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// A device event delivered by a window backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key changed state
    Key {
        /// Which key
        key: KeyCode,
        /// `true` on press, `false` on release
        pressed: bool,
    },
    /// A mouse button changed state
    MouseButton {
        /// Which button
        button: MouseButton,
        /// `true` on press, `false` on release
        pressed: bool,
    },
    /// The cursor moved to a new window position
    CursorMoved {
        /// Horizontal position in window coordinates
        x: f64,
        /// Vertical position in window coordinates
        y: f64,
    },
}

/// Input snapshot consumed by simulation code during a logical tick
#[derive(Debug, Clone, Copy)]
pub struct InputState {
    command: GameCommand,
    pressed: GameCommand,
    cursor_delta: Vec2,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            command: GameCommand::empty(),
            pressed: GameCommand::empty(),
            cursor_delta: Vec2::zeros(),
        }
    }
}

impl InputState {
    /// Commands currently held down
    pub fn command(&self) -> GameCommand {
        self.command
    }

    /// Whether every bit of `command` is currently held
    pub fn is_down(&self, command: GameCommand) -> bool {
        self.command.contains(command)
    }

    /// Whether any bit of `command` was newly pressed this frame
    pub fn was_pressed(&self, command: GameCommand) -> bool {
        self.pressed.intersects(command)
    }

    /// Cursor movement accumulated since the previous frame
    pub fn cursor_delta(&self) -> Vec2 {
        self.cursor_delta
    }
}

/// Translates device events into game commands
#[derive(Debug, Default)]
pub struct InputSystem {
    state: InputState,
    cursor_position: Option<(f64, f64)>,
}

impl InputSystem {
    /// Create a system with no input held
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame's input snapshot
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Fold one device event into the pending state
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { key, pressed } => {
                if let Some(command) = command_for_key(key) {
                    self.apply_command(command, pressed);
                }
            }
            InputEvent::MouseButton { button, pressed } => {
                if let Some(command) = command_for_button(button) {
                    self.apply_command(command, pressed);
                }
            }
            InputEvent::CursorMoved { x, y } => {
                if let Some((last_x, last_y)) = self.cursor_position {
                    self.state.cursor_delta +=
                        Vec2::new((x - last_x) as f32, (y - last_y) as f32);
                }
                self.cursor_position = Some((x, y));
            }
        }
    }

    /// Close out the frame: drop press edges and cursor movement
    ///
    /// Held commands persist until their release event arrives.
    pub fn tick(&mut self) {
        self.state.pressed = GameCommand::empty();
        self.state.cursor_delta = Vec2::zeros();
    }

    fn apply_command(&mut self, command: GameCommand, pressed: bool) {
        if pressed {
            self.state.command.insert(command);
            self.state.pressed.insert(command);
        } else {
            self.state.command.remove(command);
        }
    }
}

fn command_for_key(key: KeyCode) -> Option<GameCommand> {
    match key {
        KeyCode::W | KeyCode::Up => Some(GameCommand::FORWARD),
        KeyCode::S | KeyCode::Down => Some(GameCommand::BACKWARD),
        KeyCode::A | KeyCode::Left => Some(GameCommand::LEFT),
        KeyCode::D | KeyCode::Right => Some(GameCommand::RIGHT),
        KeyCode::Space => Some(GameCommand::JUMP),
        KeyCode::LeftControl => Some(GameCommand::SQUAT),
        KeyCode::LeftShift => Some(GameCommand::SPRINT),
        KeyCode::F => Some(GameCommand::FREE_CAMERA),
        KeyCode::Enter | KeyCode::Escape => None,
    }
}

fn command_for_button(button: MouseButton) -> Option<GameCommand> {
    match button {
        MouseButton::Left => Some(GameCommand::FIRE),
        MouseButton::Right | MouseButton::Middle => None,
    }
}
