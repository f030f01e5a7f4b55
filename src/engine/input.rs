use glutin::dpi::PhysicalSize;
use glutin::event::{ElementState, KeyboardInput, VirtualKeyCode};

/// True when the key event should close the window: Escape, on press.
pub fn is_close_key(input: &KeyboardInput) -> bool {
    input.state == ElementState::Pressed && input.virtual_keycode == Some(VirtualKeyCode::Escape)
}

/// Viewport extent for a new framebuffer size, or `None` while minimized.
pub fn viewport_for(size: PhysicalSize<u32>) -> Option<(i32, i32)> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    let width = i32::try_from(size.width).unwrap_or(i32::MAX);
    let height = i32::try_from(size.height).unwrap_or(i32::MAX);
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glutin::event::ModifiersState;

    #[allow(deprecated)]
    fn key(state: ElementState, keycode: Option<VirtualKeyCode>) -> KeyboardInput {
        KeyboardInput {
            scancode: 0,
            state,
            virtual_keycode: keycode,
            modifiers: ModifiersState::empty(),
        }
    }

    #[test]
    fn escape_press_closes() {
        assert!(is_close_key(&key(ElementState::Pressed, Some(VirtualKeyCode::Escape))));
    }

    #[test]
    fn escape_release_is_ignored() {
        assert!(!is_close_key(&key(ElementState::Released, Some(VirtualKeyCode::Escape))));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert!(!is_close_key(&key(ElementState::Pressed, Some(VirtualKeyCode::Q))));
        assert!(!is_close_key(&key(ElementState::Pressed, None)));
    }

    #[test]
    fn resize_forwards_full_framebuffer() {
        assert_eq!(viewport_for(PhysicalSize::new(800, 600)), Some((800, 600)));
        assert_eq!(viewport_for(PhysicalSize::new(1920, 1080)), Some((1920, 1080)));
    }

    #[test]
    fn minimized_window_has_no_viewport() {
        assert_eq!(viewport_for(PhysicalSize::new(0, 0)), None);
        assert_eq!(viewport_for(PhysicalSize::new(800, 0)), None);
    }

    #[test]
    fn oversized_extent_saturates() {
        assert_eq!(
            viewport_for(PhysicalSize::new(u32::MAX, 10)),
            Some((i32::MAX, 10))
        );
    }
}
