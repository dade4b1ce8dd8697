use {
    crate::{
        definitions::{cpu, display, memory, timer},
        devices::Keyboard,
        opcode::{ChipOpcodes, Instruction, Opcode, Operation, ProgramCounter, ProgramCounterStep},
        resources::Rom,
        timer::Timer,
        ProcessError, RomError,
    },
    rand::RngCore,
};

/// The framebuffer of the chipset, stored row by row.
pub type FrameBuffer = [[bool; display::WIDTH]; display::HEIGHT];

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// name of the loaded rom
    pub(super) name: String,
    /// all two bytes long and stored big-endian
    pub(super) opcode: Opcode,
    /// - `0x000-0x1FF` - Chip 8 interpreter (contains font set in emu)
    /// - `0x000-0x04F` - Used for the built in `4x5` pixel font set (`0-F`)
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: Box<[u8; memory::SIZE]>,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions; thus, it should be avoided. In an addition operation, `VF` is the carry flag,
    /// while in subtraction, it is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub(super) index_register: u16,
    /// The program counter is a CPU register in the computer processor which has the address of the
    /// next instruction to be executed from memory. Always kept inside of the memory.
    pub(super) program_counter: u16,
    /// The stack is only used to store return addresses when subroutines are called. The original
    /// [RCA 1802](https://de.wikipedia.org/wiki/RCA1802) version allocated `48` bytes for up to
    /// `12` levels of nesting; modern implementations usually have more.
    /// (here we are using `16`)
    pub(super) stack: [u16; cpu::stack::SIZE],
    /// Points to the next free stack entry
    pub(super) stack_pointer: usize,
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    pub(super) delay_timer: Timer,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound is made.
    pub(super) sound_timer: Timer,
    /// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
    /// `(64 x 32)`. This can easily be implemented using an array that hold the pixel state `(1 or 0)`:
    pub(super) display: FrameBuffer,
    pub(super) keyboard: Keyboard,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
    /// The register a pending `FX0A` will write the pressed key into.
    pub(super) waiting: Option<usize>,
}

impl Default for ChipSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ChipSet {
    /// will create a new chipset object in its reset state, using the os random source
    pub fn new() -> Self {
        Self::with_rng(Box::new(rand::rngs::OsRng))
    }

    /// will create a new chipset object with the given random number generator
    pub fn with_rng(rng: Box<dyn RngCore + Send>) -> Self {
        let mut chip = Self {
            name: String::new(),
            opcode: 0,
            memory: Box::new([0; memory::SIZE]),
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER as u16,
            stack: [0; cpu::stack::SIZE],
            stack_pointer: 0,
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            display: [[false; display::WIDTH]; display::HEIGHT],
            keyboard: Keyboard::new(),
            rng,
            waiting: None,
        };
        chip.reset();
        chip
    }

    /// Will bring the chipset back into the state it was in after the power on.
    pub fn reset(&mut self) {
        log::info!("Resetting the chipset");

        self.name.clear();
        self.opcode = 0;
        self.memory.fill(0);

        // load fonts
        let font = display::fontset::LOCATION;
        self.memory[font..(font + display::fontset::FONTSET.len())]
            .copy_from_slice(&display::fontset::FONTSET);

        self.registers = [0; cpu::register::SIZE];
        self.index_register = 0;
        self.program_counter = cpu::PROGRAM_COUNTER as u16;
        self.stack = [0; cpu::stack::SIZE];
        self.stack_pointer = 0;
        self.delay_timer.set_value(timer::DEFAULT);
        self.sound_timer.set_value(timer::DEFAULT);
        self.display = [[false; display::WIDTH]; display::HEIGHT];
        self.keyboard.reset();
        self.waiting = None;
    }

    /// Will reset the chipset and write the rom into the program memory.
    pub fn load_rom(&mut self, rom: &Rom) -> Result<(), RomError> {
        self.load_bytes(rom.get_data())?;
        self.name = rom.get_name().to_string();
        Ok(())
    }

    /// Will reset the chipset and write the data into the program memory.
    ///
    /// If the data doesn't fit, the chipset stays reset.
    pub fn load_bytes(&mut self, data: &[u8]) -> Result<(), RomError> {
        self.reset();

        let start = cpu::PROGRAM_COUNTER;
        let max = memory::SIZE - start;
        if data.len() > max {
            log::warn!("Rejecting a rom of {} bytes", data.len());
            return Err(RomError::TooLarge {
                size: data.len(),
                max,
            });
        }

        // write the rom data into memory
        self.memory[start..(start + data.len())].copy_from_slice(data);
        log::info!("Loaded {} bytes into memory", data.len());
        Ok(())
    }

    /// will advance the program by a single step
    ///
    /// While a key press is awaited, no opcode is fetched, instead the
    /// keyboard is checked once.
    pub fn step(&mut self) -> Result<Operation, ProcessError> {
        if let Some(register) = self.waiting {
            return Ok(self.resume(register));
        }

        // get next opcode
        self.opcode = self.fetch();

        let instruction = match Instruction::try_from(self.opcode) {
            Ok(instruction) => instruction,
            Err(err) => {
                log::warn!(
                    "Unknown opcode {:#06X} at {:#06X}",
                    self.opcode,
                    self.program_counter
                );
                self.advance(ProgramCounterStep::Next);
                return Err(err.into());
            }
        };

        log::debug!("{:#06X}: {}", self.program_counter, instruction);

        // run the opcode
        self.calc(instruction)
    }

    /// Will check if the awaited key was pressed and if so finish the `FX0A` opcode.
    fn resume(&mut self, register: usize) -> Operation {
        match self.keyboard.first_pressed() {
            Some(key) => {
                log::trace!("Key {:X} pressed, storing into V{:X}", key, register);
                self.registers[register] = key as u8;
                self.waiting = None;
                self.advance(ProgramCounterStep::Next);
                Operation::None
            }
            None => {
                log::trace!("Still waiting for a key");
                Operation::Wait
            }
        }
    }

    /// will read the opcode the program counter points to, reading
    /// over the end of the memory wraps around.
    fn fetch(&self) -> Opcode {
        let pc = self.program_counter as usize;
        let high = self.memory[pc & memory::ADDRESS_MASK];
        let low = self.memory[(pc + 1) & memory::ADDRESS_MASK];
        Opcode::from_be_bytes([high, low])
    }

    /// Will count both timers down by one.
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    /// Will write keyboard data into interncal keyboard representation.
    pub fn set_keyboard(&mut self, keys: &[bool]) {
        self.keyboard.set_mult(keys);
    }

    /// Will set the value of the given key
    pub fn set_key(&mut self, key: usize, to: bool) {
        self.keyboard.set_key(key, to)
    }

    /// Will toggle the given key
    pub fn toggle_key(&mut self, key: usize) {
        self.keyboard.toggle_key(key)
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    /// The sound is played for as long as the sound timer is running.
    pub fn is_sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    /// Checks if the chipset is blocked on a `FX0A` opcode.
    pub fn is_waiting(&self) -> bool {
        self.waiting.is_some()
    }

    /// Will return a immutable reference of the current display configuration
    pub fn get_display(&self) -> &FrameBuffer {
        &self.display
    }

    pub fn get_registers(&self) -> &[u8; cpu::register::SIZE] {
        &self.registers
    }

    pub fn get_program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn get_index_register(&self) -> u16 {
        self.index_register
    }

    pub fn get_memory(&self) -> &[u8] {
        &self.memory[..]
    }

    /// the name of the loaded rom
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// the last fetched opcode
    pub fn get_opcode(&self) -> Opcode {
        self.opcode
    }

    /// Will push the current pointer to the stack
    /// stack_pointer is always one bigger then the
    /// entry it points to
    pub(super) fn push_stack(&mut self, pointer: u16) -> Result<(), crate::StackError> {
        if self.stack_pointer == self.stack.len() {
            Err(crate::StackError::Full)
        } else {
            self.stack_pointer += 1;
            self.stack[self.stack_pointer - 1] = pointer;
            Ok(())
        }
    }

    /// Will pop from the counter
    /// stack_pointer is always one bigger then the entry
    /// it points to
    pub(super) fn pop_stack(&mut self) -> Result<u16, crate::StackError> {
        if self.stack_pointer == 0 {
            Err(crate::StackError::Empty)
        } else {
            self.stack_pointer -= 1;
            Ok(self.stack[self.stack_pointer])
        }
    }
}

impl ProgramCounter for ChipSet {
    fn advance(&mut self, step: ProgramCounterStep) {
        let pointer = if let ProgramCounterStep::Jump(pointer) = step {
            log::debug!("Jumping to {:#06X}", pointer);
            pointer
        } else {
            self.program_counter.wrapping_add(step.step())
        };
        self.program_counter = pointer & memory::ADDRESS_MASK as u16;
    }
}
