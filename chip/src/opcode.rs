//! Opcode abstractions, functionality and constants.
use std::fmt;

use crate::{definitions::memory, OpcodeError, ProcessError};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bytes
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bytes
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bytes
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bytes
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bytes
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bytes
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a single byte
const BYTE_SIZE: u16 = 0x8;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// this is an opcode extractor that will return the
    /// opcode number form any opcode
    /// - `T` is the opcode type
    fn t(&self) -> usize;

    /// this is an opcode extractor for the opcode type `TNNN`
    /// - `T` is the opcode type
    /// - `NNN` is an address
    fn nnn(&self) -> u16;

    /// this is an opcode extractor for the opcode type `TXNN`
    /// - `T` is the opcode type
    /// - `X` is a register index
    /// - `NN` is a constant
    fn xnn(&self) -> (usize, u8);

    /// this is an opcode extractor for the opcode type `TXYN`
    /// - `T` is the opcode type
    /// - `X` is a register index
    /// - `Y` is a register index
    /// - `N` is a opcode subtype or a constant
    fn xyn(&self) -> (usize, usize, usize);

    /// this is an opcode extractor for the opcode type `TXYT`
    /// - `T` is the opcode type
    /// - `X` is a register index
    /// - `Y` is a register index
    fn xy(&self) -> (usize, usize);

    /// this is an opcode extractor for the opcode type `TXTT`
    /// - `T` is the opcode type
    /// - `X` is a register index
    fn x(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1000);
    /// ```
    fn t(&self) -> usize {
        (self & OPCODE_MASK_F000) as usize
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> u16 {
        self & OPCODE_MASK_0FFF
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xnn(), (0xE, 0xDA));
    /// ```
    fn xnn(&self) -> (usize, u8) {
        let x = self.x();
        let nn = (self & OPCODE_MASK_00FF) as u8;
        (x, nn)
    }

    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
    /// ```
    fn xyn(&self) -> (usize, usize, usize) {
        let (x, y) = self.xy();
        let n = (self & OPCODE_MASK_000F) as usize;
        (x, y, n)
    }

    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xy(), (0xE, 0xD));
    /// ```
    fn xy(&self) -> (usize, usize) {
        let x = self.x();
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        const NIBBLE: u16 = BYTE_SIZE / 2;
        let y = ((self & MASK) >> NIBBLE) as usize;
        (x, y)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> BYTE_SIZE) as usize
    }
}

/// A fully decoded instruction, there is one variant for every opcode
/// form the chipset understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `0NNN` - Calls machine code routine at address `NNN`. Ignored.
    Sys { nnn: u16 },
    /// `00E0` - Clears the screen.
    ClearDisplay,
    /// `00EE` - Returns from a subroutine.
    Return,
    /// `1NNN` - Jumps to address `NNN`.
    Jump { nnn: u16 },
    /// `2NNN` - Calls subroutine at `NNN`.
    Call { nnn: u16 },
    /// `3XNN` - Skips the next instruction if `VX` equals `NN`.
    SkipEqual { x: usize, nn: u8 },
    /// `4XNN` - Skips the next instruction if `VX` doesn't equal `NN`.
    SkipNotEqual { x: usize, nn: u8 },
    /// `5XY0` - Skips the next instruction if `VX` equals `VY`.
    SkipEqualRegister { x: usize, y: usize },
    /// `6XNN` - Sets `VX` to `NN`.
    Load { x: usize, nn: u8 },
    /// `7XNN` - Adds `NN` to `VX`. (Carry flag is not changed)
    Add { x: usize, nn: u8 },
    /// `8XY0` - Sets `VX` to the value of `VY`.
    Move { x: usize, y: usize },
    /// `8XY1` - Sets `VX` to `VX` or `VY`.
    Or { x: usize, y: usize },
    /// `8XY2` - Sets `VX` to `VX` and `VY`.
    And { x: usize, y: usize },
    /// `8XY3` - Sets `VX` to `VX` xor `VY`.
    Xor { x: usize, y: usize },
    /// `8XY4` - Adds `VY` to `VX`. `VF` is set to `1` when there's a carry.
    AddRegister { x: usize, y: usize },
    /// `8XY5` - `VY` is subtracted from `VX`. `VF` is set to `0` when there's a borrow.
    Sub { x: usize, y: usize },
    /// `8XY6` - Stores the least significant bit of `VX` in `VF` and shifts `VX` right by `1`.
    ShiftRight { x: usize, y: usize },
    /// `8XY7` - Sets `VX` to `VY` minus `VX`. `VF` is set to `0` when there's a borrow.
    SubReverse { x: usize, y: usize },
    /// `8XYE` - Stores the most significant bit of `VX` in `VF` and shifts `VX` left by `1`.
    ShiftLeft { x: usize, y: usize },
    /// `9XY0` - Skips the next instruction if `VX` doesn't equal `VY`.
    SkipNotEqualRegister { x: usize, y: usize },
    /// `ANNN` - Sets `I` to the address `NNN`.
    LoadIndex { nnn: u16 },
    /// `BNNN` - Jumps to the address `NNN` plus `V0`.
    JumpOffset { nnn: u16 },
    /// `CXNN` - Sets `VX` to a random number and `NN`.
    Random { x: usize, nn: u8 },
    /// `DXYN` - Draws a sprite at coordinate `(VX, VY)` that is `N` pixels tall.
    Draw { x: usize, y: usize, n: u8 },
    /// `EX9E` - Skips the next instruction if the key stored in `VX` is pressed.
    SkipKeyPressed { x: usize },
    /// `EXA1` - Skips the next instruction if the key stored in `VX` isn't pressed.
    SkipKeyNotPressed { x: usize },
    /// `FX07` - Sets `VX` to the value of the delay timer.
    GetDelayTimer { x: usize },
    /// `FX0A` - A key press is awaited, and then stored in `VX`.
    AwaitKeyPress { x: usize },
    /// `FX15` - Sets the delay timer to `VX`.
    SetDelayTimer { x: usize },
    /// `FX18` - Sets the sound timer to `VX`.
    SetSoundTimer { x: usize },
    /// `FX1E` - Adds `VX` to `I`. `VF` is not affected.
    AddVxToI { x: usize },
    /// `FX29` - Sets `I` to the location of the sprite for the character in `VX`.
    SetIToSprite { x: usize },
    /// `FX33` - Stores the binary-coded decimal representation of `VX` at `I`, `I+1` and `I+2`.
    StoreBcd { x: usize },
    /// `FX55` - Stores `V0` to `VX` (including `VX`) in memory starting at address `I`.
    StoreV0ToVx { x: usize },
    /// `FX65` - Fills `V0` to `VX` (including `VX`) with values from memory starting at address `I`.
    FillV0ToVx { x: usize },
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        // Shiffing t here so that match can use a loopuptable instead of a 'if else' - blocks
        const SHIFT: usize = 4 * 3;
        let err = || OpcodeError::InvalidOpcode(value);

        let nnn = value.nnn();
        let (x, nn) = value.xnn();
        let (_, y, n) = value.xyn();

        let instruction = match value.t() >> SHIFT {
            0x0 => match value {
                0x00E0 => Instruction::ClearDisplay,
                0x00EE => Instruction::Return,
                _ => Instruction::Sys { nnn },
            },
            0x1 => Instruction::Jump { nnn },
            0x2 => Instruction::Call { nnn },
            0x3 => Instruction::SkipEqual { x, nn },
            0x4 => Instruction::SkipNotEqual { x, nn },
            0x5 if n == 0 => Instruction::SkipEqualRegister { x, y },
            0x6 => Instruction::Load { x, nn },
            0x7 => Instruction::Add { x, nn },
            0x8 => match n {
                0x0 => Instruction::Move { x, y },
                0x1 => Instruction::Or { x, y },
                0x2 => Instruction::And { x, y },
                0x3 => Instruction::Xor { x, y },
                0x4 => Instruction::AddRegister { x, y },
                0x5 => Instruction::Sub { x, y },
                0x6 => Instruction::ShiftRight { x, y },
                0x7 => Instruction::SubReverse { x, y },
                0xE => Instruction::ShiftLeft { x, y },
                _ => return Err(err()),
            },
            0x9 if n == 0 => Instruction::SkipNotEqualRegister { x, y },
            0xA => Instruction::LoadIndex { nnn },
            0xB => Instruction::JumpOffset { nnn },
            0xC => Instruction::Random { x, nn },
            0xD => Instruction::Draw { x, y, n: n as u8 },
            0xE => match nn {
                0x9E => Instruction::SkipKeyPressed { x },
                0xA1 => Instruction::SkipKeyNotPressed { x },
                _ => return Err(err()),
            },
            0xF => match nn {
                0x07 => Instruction::GetDelayTimer { x },
                0x0A => Instruction::AwaitKeyPress { x },
                0x15 => Instruction::SetDelayTimer { x },
                0x18 => Instruction::SetSoundTimer { x },
                0x1E => Instruction::AddVxToI { x },
                0x29 => Instruction::SetIToSprite { x },
                0x33 => Instruction::StoreBcd { x },
                0x55 => Instruction::StoreV0ToVx { x },
                0x65 => Instruction::FillV0ToVx { x },
                _ => return Err(err()),
            },
            _ => return Err(err()),
        };
        Ok(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Sys { nnn } => write!(f, "SYS {:#05X}", nnn),
            ClearDisplay => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { nnn } => write!(f, "JP {:#05X}", nnn),
            Call { nnn } => write!(f, "CALL {:#05X}", nnn),
            SkipEqual { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            SkipNotEqual { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            SkipEqualRegister { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Load { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            Add { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddRegister { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, .. } => write!(f, "SHR V{:X}", x),
            SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, .. } => write!(f, "SHL V{:X}", x),
            SkipNotEqualRegister { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex { nnn } => write!(f, "LD I, {:#05X}", nnn),
            JumpOffset { nnn } => write!(f, "JP V0, {:#05X}", nnn),
            Random { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            GetDelayTimer { x } => write!(f, "LD V{:X}, DT", x),
            AwaitKeyPress { x } => write!(f, "LD V{:X}, K", x),
            SetDelayTimer { x } => write!(f, "LD DT, V{:X}", x),
            SetSoundTimer { x } => write!(f, "LD ST, V{:X}", x),
            AddVxToI { x } => write!(f, "ADD I, V{:X}", x),
            SetIToSprite { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreV0ToVx { x } => write!(f, "LD [I], V{:X}", x),
            FillV0ToVx { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents the program steps that the chip
/// can take.
pub enum ProgramCounterStep {
    /// Will not change the program counter
    None,
    /// Will move the program counter to the next opcode
    Next,
    /// Will skip the next opcode
    Skip,
    /// Will simply move the program counter to the given location.
    Jump(u16),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Maps the [`ProgramCounterStep`](ProgramCounterStep) to the corresponding movement distanz,
    /// or in the case of a jump to the target address.
    #[inline]
    pub fn step(&self) -> u16 {
        const SIZE: u16 = memory::opcodes::SIZE as u16;
        match *self {
            ProgramCounterStep::Next => SIZE,
            ProgramCounterStep::Skip => 2 * SIZE,
            ProgramCounterStep::None => 0,
            ProgramCounterStep::Jump(pointer) => pointer,
        }
    }
}

/// Represents a step of the program counter
/// this requires the enum ProgramCounterStep
/// to work.
pub trait ProgramCounter {
    /// will move the program counter forward by a step.
    fn advance(&mut self, step: ProgramCounterStep);
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents a command from the interpreter up to the host.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// If the host shall, wait
    /// for the next key press
    Wait,
    /// A redraw command, the display changed
    Draw,
}

/// These are the traits that have to be full filled for a working opcode
/// table.
///
/// This trait requires the implementation of the [`ProgramCounter`](ProgramCounter) trait, as
/// the step returned by [`execute`](ChipOpcodes::execute) will be applied by it.
pub trait ChipOpcodes: ProgramCounter {
    /// will run a single decoded instruction and move the program counter
    ///
    /// If the instruction could not be executed the program counter is still moved to
    /// the next opcode, so that the chipset stays usable.
    fn calc(&mut self, instruction: Instruction) -> Result<Operation, ProcessError> {
        match self.execute(instruction) {
            Ok((step, operation)) => {
                self.advance(step);
                Ok(operation)
            }
            Err(err) => {
                self.advance(ProgramCounterStep::Next);
                Err(err)
            }
        }
    }

    /// Applies the effect of the instruction onto the chipset and returns how the
    /// program counter has to move, together with what the host has to do.
    fn execute(
        &mut self,
        instruction: Instruction,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryfrom_opcode_simple() {
        let value: Opcode = 0x00E0;
        let conv = Instruction::try_from(value);
        assert_eq!(conv, Ok(Instruction::ClearDisplay));
    }

    #[test]
    fn test_tryfrom_opcode_simple_fail() {
        let value: Opcode = 0x5121;
        let conv = Instruction::try_from(value);
        assert_eq!(conv, Err(OpcodeError::InvalidOpcode(value)));
    }

    #[test]
    fn test_tryfrom_opcode_multiple() {
        use Instruction::*;
        let tests = [
            // Zero
            (0x00E0, Ok(ClearDisplay)),
            (0x00EE, Ok(Return)),
            (0x0123, Ok(Sys { nnn: 0x123 })),
            // One
            (0x1919, Ok(Jump { nnn: 0x919 })),
            // Two
            (0x2222, Ok(Call { nnn: 0x222 })),
            // Three
            (0x3123, Ok(SkipEqual { x: 0x1, nn: 0x23 })),
            // Four
            (0x4123, Ok(SkipNotEqual { x: 0x1, nn: 0x23 })),
            // Five
            (0x5120, Ok(SkipEqualRegister { x: 0x1, y: 0x2 })),
            (0x5121, Err(())),
            (0x5FFF, Err(())),
            // Six
            (0x6123, Ok(Load { x: 0x1, nn: 0x23 })),
            // Seven
            (0x7123, Ok(Add { x: 0x1, nn: 0x23 })),
            // Eight
            (0x8120, Ok(Move { x: 0x1, y: 0x2 })),
            (0x8121, Ok(Or { x: 0x1, y: 0x2 })),
            (0x8122, Ok(And { x: 0x1, y: 0x2 })),
            (0x8123, Ok(Xor { x: 0x1, y: 0x2 })),
            (0x8124, Ok(AddRegister { x: 0x1, y: 0x2 })),
            (0x8125, Ok(Sub { x: 0x1, y: 0x2 })),
            (0x8126, Ok(ShiftRight { x: 0x1, y: 0x2 })),
            (0x8127, Ok(SubReverse { x: 0x1, y: 0x2 })),
            (0x812E, Ok(ShiftLeft { x: 0x1, y: 0x2 })),
            (0x8128, Err(())),
            (0x812F, Err(())),
            // Nine
            (0x9120, Ok(SkipNotEqualRegister { x: 0x1, y: 0x2 })),
            (0x9121, Err(())),
            // A
            (0xA222, Ok(LoadIndex { nnn: 0x222 })),
            // B
            (0xB222, Ok(JumpOffset { nnn: 0x222 })),
            // C
            (0xC123, Ok(Random { x: 0x1, nn: 0x23 })),
            // D
            (0xD123, Ok(Draw { x: 0x1, y: 0x2, n: 0x3 })),
            // E
            (0xE19E, Ok(SkipKeyPressed { x: 0x1 })),
            (0xE1A1, Ok(SkipKeyNotPressed { x: 0x1 })),
            (0xE111, Err(())),
            // F
            (0xF007, Ok(GetDelayTimer { x: 0x0 })),
            (0xF00A, Ok(AwaitKeyPress { x: 0x0 })),
            (0xF015, Ok(SetDelayTimer { x: 0x0 })),
            (0xF018, Ok(SetSoundTimer { x: 0x0 })),
            (0xF01E, Ok(AddVxToI { x: 0x0 })),
            (0xF029, Ok(SetIToSprite { x: 0x0 })),
            (0xF033, Ok(StoreBcd { x: 0x0 })),
            (0xF055, Ok(StoreV0ToVx { x: 0x0 })),
            (0xF065, Ok(FillV0ToVx { x: 0x0 })),
            (0xF0AA, Err(())),
        ];
        for (value, res) in tests {
            let conv = Instruction::try_from(value);
            assert_eq!(conv, res.map_err(|_| OpcodeError::InvalidOpcode(value)));
        }
    }

    #[test]
    fn test_instruction_mnemonics() {
        let tests = [
            (0x00E0, "CLS"),
            (0x00EE, "RET"),
            (0x1234, "JP 0x234"),
            (0x6123, "LD V1, 0x23"),
            (0x8AB4, "ADD VA, VB"),
            (0x8AB6, "SHR VA"),
            (0xB300, "JP V0, 0x300"),
            (0xD125, "DRW V1, V2, 5"),
            (0xE3A1, "SKNP V3"),
            (0xF40A, "LD V4, K"),
            (0xFF65, "LD VF, [I]"),
        ];
        for (opcode, expected) in tests {
            let instruction = Instruction::try_from(opcode).expect("valid opcode");
            assert_eq!(expected, instruction.to_string());
        }
    }

    #[test]
    fn test_program_counter_step() {
        assert_eq!(0, ProgramCounterStep::None.step());
        assert_eq!(2, ProgramCounterStep::Next.step());
        assert_eq!(4, ProgramCounterStep::Skip.step());
        assert_eq!(0x345, ProgramCounterStep::Jump(0x345).step());
    }
}
