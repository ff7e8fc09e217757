//! Input event vocabulary and conversion from the host windowing library.
//!
//! The library owns its event types so embedding applications never import
//! `winit`. Conversion keeps a simplified subset: quit, keyboard, pointer,
//! scroll, and focus — enough to drive visualization-style interaction.

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key as WinitKey, NamedKey};

/// Keys reported by keyboard events.
///
/// This is a simplified subset of the host library's key space; unmapped
/// keys are dropped at conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key.
    Tab,
    /// Space bar.
    Space,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
}

/// Events dispatched to window and area event hooks.
///
/// Pointer coordinates are physical screen-space pixels, matching the
/// placement rectangles of window and areas.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The host requested the window to close (window button, Alt-F4, ...).
    ///
    /// The GUI loop reacts by clearing the run flag; hooks observe the event
    /// as well.
    CloseRequested,

    /// A key went down.
    KeyPressed {
        /// Which key.
        key: Key,
    },

    /// A key went up.
    KeyReleased {
        /// Which key.
        key: Key,
    },

    /// Mouse button pressed at the last known cursor position.
    MouseDown {
        /// Cursor x in screen space.
        x: f64,
        /// Cursor y in screen space.
        y: f64,
        /// Which button.
        button: MouseButton,
    },

    /// Mouse button released at the last known cursor position.
    MouseUp {
        /// Cursor x in screen space.
        x: f64,
        /// Cursor y in screen space.
        y: f64,
        /// Which button.
        button: MouseButton,
    },

    /// The cursor moved.
    MouseMoved {
        /// Cursor x in screen space.
        x: f64,
        /// Cursor y in screen space.
        y: f64,
    },

    /// Scroll wheel movement, in lines.
    Scroll {
        /// Horizontal scroll amount.
        dx: f32,
        /// Vertical scroll amount.
        dy: f32,
    },

    /// The window gained input focus.
    FocusGained,

    /// The window lost input focus.
    FocusLost,
}

impl Event {
    /// Screen position carried by pointer events.
    pub const fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::MouseDown { x, y, .. }
            | Self::MouseUp { x, y, .. }
            | Self::MouseMoved { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}

/// Convert a host window event, tracking the cursor position across calls.
///
/// `cursor` is updated on cursor movement so button events can carry a
/// position (the host reports buttons without one).
pub(crate) fn convert_window_event(
    event: &WindowEvent,
    cursor: &mut (f64, f64),
) -> Option<Event> {
    match event {
        WindowEvent::CloseRequested => Some(Event::CloseRequested),

        WindowEvent::KeyboardInput { event, .. } => {
            let key = convert_key(&event.logical_key)?;
            Some(match event.state {
                ElementState::Pressed => Event::KeyPressed { key },
                ElementState::Released => Event::KeyReleased { key },
            })
        }

        WindowEvent::CursorMoved { position, .. } => {
            *cursor = (position.x, position.y);
            Some(Event::MouseMoved {
                x: position.x,
                y: position.y,
            })
        }

        WindowEvent::MouseInput { state, button, .. } => {
            let button = convert_button(*button)?;
            let (x, y) = *cursor;
            Some(match state {
                ElementState::Pressed => Event::MouseDown { x, y, button },
                ElementState::Released => Event::MouseUp { x, y, button },
            })
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                // Pixel deltas are normalized to roughly one line per 40 px.
                MouseScrollDelta::PixelDelta(p) => ((p.x / 40.0) as f32, (p.y / 40.0) as f32),
            };
            Some(Event::Scroll { dx, dy })
        }

        WindowEvent::Focused(true) => Some(Event::FocusGained),
        WindowEvent::Focused(false) => Some(Event::FocusLost),

        _ => None,
    }
}

/// Convert a host logical key to the simplified key set.
pub(crate) fn convert_key(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Character(s) => {
            let mut chars = s.chars();
            let c = chars.next()?;
            // Multi-char sequences (IME output) are dropped.
            chars.next().is_none().then_some(Key::Char(c))
        }
        WinitKey::Named(named) => Some(match named {
            NamedKey::Enter => Key::Enter,
            NamedKey::Escape => Key::Escape,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Delete => Key::Delete,
            NamedKey::Tab => Key::Tab,
            NamedKey::Space => Key::Space,
            NamedKey::ArrowLeft => Key::Left,
            NamedKey::ArrowRight => Key::Right,
            NamedKey::ArrowUp => Key::Up,
            NamedKey::ArrowDown => Key::Down,
            NamedKey::Home => Key::Home,
            NamedKey::End => Key::End,
            NamedKey::PageUp => Key::PageUp,
            NamedKey::PageDown => Key::PageDown,
            _ => return None,
        }),
        _ => None,
    }
}

/// Convert a host mouse button.
pub(crate) const fn convert_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    Some(match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_named_keys() {
        assert_eq!(
            convert_key(&WinitKey::Named(NamedKey::Enter)),
            Some(Key::Enter)
        );
        assert_eq!(
            convert_key(&WinitKey::Named(NamedKey::ArrowLeft)),
            Some(Key::Left)
        );
        // Unmapped named keys are dropped.
        assert_eq!(convert_key(&WinitKey::Named(NamedKey::CapsLock)), None);
    }

    #[test]
    fn test_convert_character_keys() {
        assert_eq!(
            convert_key(&WinitKey::Character("a".into())),
            Some(Key::Char('a'))
        );
        assert_eq!(convert_key(&WinitKey::Character("ab".into())), None);
    }

    #[test]
    fn test_convert_buttons() {
        assert_eq!(
            convert_button(winit::event::MouseButton::Left),
            Some(MouseButton::Left)
        );
        assert_eq!(convert_button(winit::event::MouseButton::Back), None);
    }

    #[test]
    fn test_event_position() {
        let down = Event::MouseDown {
            x: 3.0,
            y: 4.0,
            button: MouseButton::Left,
        };
        assert_eq!(down.position(), Some((3.0, 4.0)));
        assert_eq!(Event::CloseRequested.position(), None);
    }
}
