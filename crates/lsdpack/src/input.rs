//! Virtual keypad state polled by the emulation core.
use bitflags::bitflags;

use crate::emulator::InputSource;

bitflags! {
    /// Game Boy joypad buttons, one bit per button.
    ///
    /// Any combination is accepted, including ones a physical pad cannot
    /// produce, and the empty set means "no keys held".
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Keys: u8 {
        const A = 0x01;
        const B = 0x02;
        const SELECT = 0x04;
        const START = 0x08;
        const RIGHT = 0x10;
        const LEFT = 0x20;
        const UP = 0x40;
        const DOWN = 0x80;
    }
}

/// Holds the currently pressed keys.
///
/// The pipeline only calls [`Keypad::set`] between frames, so the core sees
/// one consistent state for the whole frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keypad {
    keys: Keys,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held keys. `Keys::empty()` releases everything.
    pub fn set(&mut self, keys: Keys) {
        self.keys = keys;
    }

    pub fn held(&self) -> Keys {
        self.keys
    }
}

impl InputSource for Keypad {
    fn keys(&self) -> Keys {
        self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypad_accepts_any_combination() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.keys(), Keys::empty());

        keypad.set(Keys::UP | Keys::DOWN | Keys::LEFT | Keys::RIGHT);
        assert_eq!(keypad.keys().bits(), 0xF0);

        keypad.set(Keys::empty());
        assert!(keypad.held().is_empty());
    }
}
