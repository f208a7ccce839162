//! Keypad (joypad) register and button state.

use crate::mmu::BusComponent;

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

pub struct Pad {
    down: bool,
    up: bool,
    left: bool,
    right: bool,
    start: bool,
    select: bool,
    b: bool,
    a: bool,
    selection: PadSelection,
    int_pad: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PadSelection {
    Action,
    Direction,
    Both,
    None,
}

#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PadKey {
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
    A,
    B,
}

impl Pad {
    pub fn new() -> Self {
        Self {
            down: false,
            up: false,
            left: false,
            right: false,
            start: false,
            select: false,
            b: false,
            a: false,
            selection: PadSelection::Both,
            int_pad: false,
        }
    }

    pub fn reset(&mut self) {
        self.down = false;
        self.up = false;
        self.left = false;
        self.right = false;
        self.start = false;
        self.select = false;
        self.b = false;
        self.a = false;
        self.selection = PadSelection::Both;
        self.int_pad = false;
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr & 0x00ff {
            0x0000 => {
                let mut value = 0x0f;
                if matches!(self.selection, PadSelection::Action | PadSelection::Both) {
                    value &= !(if self.a { 0x01 } else { 0x00 }
                        | if self.b { 0x02 } else { 0x00 }
                        | if self.select { 0x04 } else { 0x00 }
                        | if self.start { 0x08 } else { 0x00 });
                }
                if matches!(self.selection, PadSelection::Direction | PadSelection::Both) {
                    value &= !(if self.right { 0x01 } else { 0x00 }
                        | if self.left { 0x02 } else { 0x00 }
                        | if self.up { 0x04 } else { 0x00 }
                        | if self.down { 0x08 } else { 0x00 });
                }
                value |= match self.selection {
                    PadSelection::Direction => 0x20,
                    PadSelection::Action => 0x10,
                    PadSelection::Both => 0x00,
                    PadSelection::None => 0x30,
                };
                value | 0xc0
            }
            addr => {
                crate::warnln!("Reading from unknown Pad location 0x{:04x}", addr);
                0xff
            }
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr & 0x00ff {
            0x0000 => {
                let action = value & 0x20 == 0x00;
                let direction = value & 0x10 == 0x00;
                self.selection = match (action, direction) {
                    (true, true) => PadSelection::Both,
                    (true, false) => PadSelection::Action,
                    (false, true) => PadSelection::Direction,
                    (false, false) => PadSelection::None,
                };
            }
            addr => crate::warnln!("Writing to unknown Pad location 0x{:04x}", addr),
        }
    }

    /// Presses the given key, clearing its directional opposite
    /// (if any) so that up/down and left/right stay mutually exclusive.
    /// Requests the joypad interrupt on a 1-to-0 transition.
    pub fn key_press(&mut self, key: PadKey) {
        let was_pressed = self.is_pressed(key);
        match key {
            PadKey::Up => {
                self.up = true;
                self.down = false;
            }
            PadKey::Down => {
                self.down = true;
                self.up = false;
            }
            PadKey::Left => {
                self.left = true;
                self.right = false;
            }
            PadKey::Right => {
                self.right = true;
                self.left = false;
            }
            PadKey::Start => self.start = true,
            PadKey::Select => self.select = true,
            PadKey::A => self.a = true,
            PadKey::B => self.b = true,
        }
        if !was_pressed {
            self.set_int_pad(true);
        }
    }

    pub fn key_lift(&mut self, key: PadKey) {
        match key {
            PadKey::Up => self.up = false,
            PadKey::Down => self.down = false,
            PadKey::Left => self.left = false,
            PadKey::Right => self.right = false,
            PadKey::Start => self.start = false,
            PadKey::Select => self.select = false,
            PadKey::A => self.a = false,
            PadKey::B => self.b = false,
        }
    }

    fn is_pressed(&self, key: PadKey) -> bool {
        match key {
            PadKey::Up => self.up,
            PadKey::Down => self.down,
            PadKey::Left => self.left,
            PadKey::Right => self.right,
            PadKey::Start => self.start,
            PadKey::Select => self.select,
            PadKey::A => self.a,
            PadKey::B => self.b,
        }
    }

    #[inline(always)]
    pub fn int_pad(&self) -> bool {
        self.int_pad
    }

    #[inline(always)]
    pub fn set_int_pad(&mut self, value: bool) {
        self.int_pad = value;
    }

    #[inline(always)]
    pub fn ack_pad(&mut self) {
        self.set_int_pad(false);
    }
}

impl BusComponent for Pad {
    fn read(&self, addr: u16) -> u8 {
        self.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}

impl Default for Pad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Pad, PadKey};

    #[test]
    fn test_opposite_direction_exclusivity() {
        let mut pad = Pad::new();
        pad.key_press(PadKey::Left);
        assert!(pad.is_pressed(PadKey::Left));
        pad.key_press(PadKey::Right);
        assert!(pad.is_pressed(PadKey::Right));
        assert!(!pad.is_pressed(PadKey::Left));
    }

    #[test]
    fn test_int_pad_on_transition() {
        let mut pad = Pad::new();
        assert!(!pad.int_pad());
        pad.key_press(PadKey::A);
        assert!(pad.int_pad());
        pad.ack_pad();
        assert!(!pad.int_pad());
        // already pressed, no new transition
        pad.key_press(PadKey::A);
        assert!(!pad.int_pad());
    }

    #[test]
    fn test_selection_byte() {
        let mut pad = Pad::new();
        pad.write(0x0000, 0x10);
        pad.key_press(PadKey::A);
        let value = pad.read(0x0000);
        assert_eq!(value & 0x01, 0x00);
    }
}
