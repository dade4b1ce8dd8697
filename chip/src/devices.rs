use crate::definitions::{display, keyboard};

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will clear the display
    fn clear_display(&mut self);
    /// Will display all from the pixels, row by row
    fn display(&mut self, pixels: &[[bool; display::WIDTH]]);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for writing the keyboard data
pub trait KeyboardCommands {
    /// Will return the current state of every key
    fn get_keyboard(&mut self) -> [bool; keyboard::SIZE];
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the sound output
pub trait SoundCommands {
    /// Will be called every frame with the current sound level
    fn set_sound(&mut self, active: bool);
}

/// The internal keyboard snapshot of the chipset
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; keyboard::SIZE],
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    pub(crate) fn reset(&mut self) {
        self.keys = [false; keyboard::SIZE];
    }

    /// Will toggle the given key, keys outside of the keyboard are ignored
    pub fn toggle_key(&mut self, key: usize) {
        if let Some(entry) = self.keys.get_mut(key) {
            *entry = !*entry;
        }
    }

    /// Will set the given key, keys outside of the keyboard are ignored
    pub fn set_key(&mut self, key: usize, to: bool) {
        if let Some(entry) = self.keys.get_mut(key) {
            *entry = to;
        }
    }

    /// Will copy the keys given, surplus entries are ignored and
    /// missing ones keep their state.
    pub fn set_mult(&mut self, keys: &[bool]) {
        for (entry, key) in self.keys.iter_mut().zip(keys) {
            *entry = *key;
        }
    }

    pub fn get_keys(&self) -> &[bool; keyboard::SIZE] {
        &self.keys
    }

    /// Checks the given key, a key outside of the keyboard is never pressed.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Returns the lowest key currently pressed
    pub fn first_pressed(&self) -> Option<usize> {
        self.keys.iter().position(|&key| key)
    }
}
