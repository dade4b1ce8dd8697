use crate::{
    chip8::ChipSet,
    definitions::{cpu, timer},
    devices::{DisplayCommands, KeyboardCommands, SoundCommands},
    opcode::Operation,
    resources::Rom,
    RomError,
};

/// How the runner splits the emulation into frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// the amount of opcodes run between two timer ticks
    pub steps_per_frame: usize,
}

impl RunnerConfig {
    /// Calculates the steps per frame for a cpu running at the given rate, with one frame
    /// per timer tick. At least a single step is run every frame.
    pub fn from_hertz(hertz: u64) -> Self {
        Self {
            steps_per_frame: (hertz / timer::HERTZ).max(1) as usize,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::from_hertz(cpu::HERTZ)
    }
}

/// What happened during a single frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// the steps that were run
    pub steps: usize,
    /// whether the display was pushed to the backend
    pub redraw: bool,
    /// the sound level at the end of the frame
    pub sound: bool,
    /// whether the chipset is waiting for a key
    pub waiting: bool,
}

/// Drives a [`ChipSet`](ChipSet) and connects it to the backends of the host.
pub struct Runner<D, K, S> {
    chip: ChipSet,
    display: D,
    keyboard: K,
    sound: S,
    config: RunnerConfig,
}

impl<D, K, S> Runner<D, K, S>
where
    D: DisplayCommands,
    K: KeyboardCommands,
    S: SoundCommands,
{
    pub fn new(chip: ChipSet, display: D, keyboard: K, sound: S, config: RunnerConfig) -> Self {
        Self {
            chip,
            display,
            keyboard,
            sound,
            config,
        }
    }

    /// Will load the rom into the chipset and clear the display.
    pub fn load(&mut self, rom: &Rom) -> Result<(), RomError> {
        self.chip.load_rom(rom)?;
        log::info!("Loaded rom {}", rom.get_name());
        self.display.clear_display();
        Ok(())
    }

    /// Will run a single frame.
    ///
    /// Before every step the keyboard is refreshed. The frame ends early if the
    /// chipset is waiting for a key. Afterwards both timers are ticked once, the
    /// sound level is forwarded and, if any step changed the display, the display
    /// is redrawn.
    pub fn frame(&mut self) -> Frame {
        let mut frame = Frame::default();

        for _ in 0..self.config.steps_per_frame {
            let keys = self.keyboard.get_keyboard();
            self.chip.set_keyboard(&keys);

            frame.steps += 1;
            match self.chip.step() {
                Ok(Operation::Draw) => frame.redraw = true,
                Ok(Operation::Wait) => break,
                Ok(Operation::None) => {}
                Err(err) => {
                    log::warn!("Continuing after error: {}", err);
                    log::trace!("{}", self.chip);
                }
            }
        }

        self.chip.tick_timers();

        frame.sound = self.chip.is_sound_active();
        self.sound.set_sound(frame.sound);

        if frame.redraw {
            self.display.display(&self.chip.get_display()[..]);
        }

        frame.waiting = self.chip.is_waiting();
        frame
    }

    pub fn chip(&self) -> &ChipSet {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }

    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut K {
        &mut self.keyboard
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn config(&self) -> RunnerConfig {
        self.config
    }
}
