// Input state tracking for keyboard and mouse
// Abstracts winit events into a queryable per-frame snapshot

use std::collections::HashSet;
use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Held-input actions the camera reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    RotateLeft,
    RotateRight,
    Sprint,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::MoveLeft,
        Action::MoveRight,
        Action::RotateLeft,
        Action::RotateRight,
        Action::Sprint,
    ];

    /// Default key bindings. Any bound key held means the action is pressed.
    pub fn keys(self) -> &'static [KeyCode] {
        match self {
            Action::MoveForward => &[KeyCode::KeyW, KeyCode::ArrowUp],
            Action::MoveBack    => &[KeyCode::KeyS, KeyCode::ArrowDown],
            Action::MoveLeft    => &[KeyCode::KeyA, KeyCode::ArrowLeft],
            Action::MoveRight   => &[KeyCode::KeyD, KeyCode::ArrowRight],
            Action::RotateLeft  => &[KeyCode::KeyQ],
            Action::RotateRight => &[KeyCode::KeyE],
            Action::Sprint      => &[KeyCode::ShiftLeft],
        }
    }
}

/// Polled input as seen by the camera. Implemented by `InputState`, and by
/// scripted fakes in tests.
pub trait ActionSource {
    fn is_pressed(&self, action: Action) -> bool;

    /// Vertical scroll accumulated this frame, in lines. Positive = away from user.
    fn scroll_delta(&self) -> f32;
}

/// What the primary (left) mouse button did this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub held: bool,
    /// Went down at least once since the last `end_frame()`.
    pub pressed: bool,
    /// Went up at least once since the last `end_frame()`.
    pub released: bool,
}

pub struct InputState {
    // Keyboard
    keys_held: HashSet<KeyCode>,

    // Mouse
    pub mouse_position: Vec2,
    primary: ButtonState,

    // Scroll: accumulated vertical scroll this frame, reset in end_frame()
    scroll_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
            mouse_position: Vec2::ZERO,
            primary: ButtonState::default(),
            scroll_delta: 0.0,
        }
    }

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event before the game's own event handling.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => { self.keys_held.insert(key); }
                        ElementState::Released => { self.keys_held.remove(&key); }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                self.set_primary(*state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.scroll_delta += y;
            }
            // Keys held while focus leaves would otherwise stay stuck down
            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                if self.primary.held {
                    self.set_primary(false);
                }
            }
            _ => {}
        }
    }

    /// Like `process_event`, but drops presses and scrolls the overlay already
    /// consumed. Releases always get through so a drag that ends over the
    /// overlay does not leave the button stuck down.
    pub fn process_event_behind_overlay(&mut self, event: &WindowEvent, overlay_consumed: bool) {
        let captured = overlay_consumed
            && matches!(
                event,
                WindowEvent::MouseInput { state: ElementState::Pressed, .. }
                    | WindowEvent::MouseWheel { .. }
            );
        if !captured {
            self.process_event(event);
        }
    }

    fn set_primary(&mut self, down: bool) {
        if down && !self.primary.held {
            self.primary.pressed = true;
        }
        if !down && self.primary.held {
            self.primary.released = true;
        }
        self.primary.held = down;
    }

    /// Call once per frame after update() and render() have consumed input.
    /// Resets per-frame accumulators.
    pub fn end_frame(&mut self) {
        self.scroll_delta = 0.0;
        self.primary.pressed = false;
        self.primary.released = false;
    }

    pub fn primary_button(&self) -> ButtonState {
        self.primary
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionSource for InputState {
    fn is_pressed(&self, action: Action) -> bool {
        action.keys().iter().any(|k| self.keys_held.contains(k))
    }

    fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }
}
