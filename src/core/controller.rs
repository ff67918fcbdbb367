/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Toggles select mode
    Space,
    /// Rotate gizmo mode
    KeyR,
    /// Translate gizmo mode
    KeyT,
    MouseLeft,
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_button_variants_unique() {
        let all_buttons = [
            Button::Space,
            Button::KeyR,
            Button::KeyT,
            Button::MouseLeft,
        ];

        let set: HashSet<_> = all_buttons.iter().collect();
        assert_eq!(set.len(), 4);
    }

    struct MockController {
        pressed: Vec<Button>,
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn get_down_keys(&self) -> &[Button] {
            &self.pressed
        }
    }

    #[test]
    fn test_controller_is_down() {
        let controller = MockController {
            pressed: vec![Button::KeyR, Button::MouseLeft],
        };

        assert!(controller.is_down(Button::KeyR));
        assert!(controller.is_down(Button::MouseLeft));
        assert!(!controller.is_down(Button::Space));
        assert_eq!(controller.get_down_keys().len(), 2);
    }
}
