use crate::coords::Vec2;

/// Keyboard key identifier.
///
/// Only the keys a backbuffer application commonly binds are named; anything
/// else arrives as `Unknown` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab,
    Backspace,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    /// Letter or digit key, uppercase (`'A'..='Z'`, `'0'..='9'`).
    Char(char),

    F(u8),

    Unknown(u32),
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer position, normalized to the window.
    PointerMoved(Vec2),

    /// Pointer left the window surface.
    PointerLeft,

    Button { button: MouseButton, state: ButtonState },

    Key { key: Key, state: ButtonState, repeat: bool },

    Focused(bool),
}
