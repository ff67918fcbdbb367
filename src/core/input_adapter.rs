use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};
use super::gizmo::TransformMode;
use super::input::{InputEvent, InputQueue};

/// Translates winit window events into [`InputEvent`]s.
///
/// Keys act on release, and a click is the left button's release at the last
/// known cursor position.
#[derive(Debug, Clone, Default)]
pub struct WinitInputAdapter {
    pressed_keys: HashSet<Button>,
    pressed_vec: Vec<Button>,
    cursor: Option<(f32, f32)>,
}

impl WinitInputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update button state and queue any resulting events
    pub fn process_event(&mut self, event: &WindowEvent, queue: &mut InputQueue) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        if let Some(ev) = self.update_button(button, event.state) {
                            queue.push(ev);
                        }
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    if let Some(ev) = self.update_button(btn, *state) {
                        queue.push(ev);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.cursor = Some((x, y));
                queue.push(InputEvent::PointerMoved { x, y });
            }
            WindowEvent::Resized(size) => {
                queue.push(InputEvent::Resize {
                    width: size.width,
                    height: size.height,
                });
            }
            _ => {}
        }
    }

    fn update_button(&mut self, button: Button, state: ElementState) -> Option<InputEvent> {
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(button) {
                    self.pressed_vec.push(button);
                }
                None
            }
            ElementState::Released => {
                // Releases without a matching press (focus changes) are ignored
                if !self.pressed_keys.remove(&button) {
                    return None;
                }
                self.pressed_vec.retain(|&b| b != button);
                self.release_event(button)
            }
        }
    }

    /// Event produced when `button` is released
    pub fn release_event(&self, button: Button) -> Option<InputEvent> {
        match button {
            Button::Space => Some(InputEvent::ToggleSelectMode),
            Button::KeyR => Some(InputEvent::SetTransformMode {
                mode: TransformMode::Rotate,
            }),
            Button::KeyT => Some(InputEvent::SetTransformMode {
                mode: TransformMode::Translate,
            }),
            Button::MouseLeft => self.cursor.map(|(x, y)| InputEvent::Click { x, y }),
        }
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Map Winit KeyCode to Button
    pub fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::Space => Some(Button::Space),
            KeyCode::KeyR => Some(Button::KeyR),
            KeyCode::KeyT => Some(Button::KeyT),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    pub fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            _ => None,
        }
    }
}

impl Controller for WinitInputAdapter {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}
