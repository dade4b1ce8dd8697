use crate::{
    definitions::{cpu, display, memory},
    opcode::{ChipOpcodes, Instruction, Operation, ProgramCounterStep},
    ProcessError,
};

use super::ChipSet;

/// Reduces any address into the range of the memory.
#[inline]
fn wrap(address: usize) -> usize {
    address & memory::ADDRESS_MASK
}

impl ChipOpcodes for ChipSet {
    fn execute(
        &mut self,
        instruction: Instruction,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        use Instruction::*;

        let step = match instruction {
            Sys { nnn } => {
                // 0NNN
                // Calls machine code routine (RCA 1802 for COSMAC VIP) at address NNN. Not
                // necessary for most ROMs.
                log::debug!("Ignoring machine code routine at {:#05X}", nnn);
                ProgramCounterStep::Next
            }
            ClearDisplay => {
                // 00E0
                // clear display
                self.display = [[false; display::WIDTH]; display::HEIGHT];
                return Ok((ProgramCounterStep::Next, Operation::Draw));
            }
            Return => {
                // 00EE
                // Return from sub routine => pop from stack
                let pc = self.pop_stack().map_err(|err| {
                    log::warn!("Return at {:#06X} without a call", self.program_counter);
                    err
                })?;
                ProgramCounterStep::Jump(pc)
            }
            Jump { nnn } => {
                // 1NNN
                // Jumps to address NNN.
                ProgramCounterStep::Jump(nnn)
            }
            Call { nnn } => {
                // 2NNN
                // Calls subroutine at NNN
                // and set's the program counter to the next opcode after the given stack push
                let next = self
                    .program_counter
                    .wrapping_add(ProgramCounterStep::Next.step());
                self.push_stack(next).map_err(|err| {
                    log::warn!("Call at {:#06X} overflows the stack", self.program_counter);
                    err
                })?;
                ProgramCounterStep::Jump(nnn)
            }
            SkipEqual { x, nn } => {
                // 3XNN
                // Skips the next instruction if VX equals NN. (Usually the next instruction is a
                // jump to skip a code block)
                ProgramCounterStep::cond(self.registers[x] == nn)
            }
            SkipNotEqual { x, nn } => {
                // 4XNN
                // Skips the next instruction if VX doesn't equal NN.
                ProgramCounterStep::cond(self.registers[x] != nn)
            }
            SkipEqualRegister { x, y } => {
                // 5XY0
                ProgramCounterStep::cond(self.registers[x] == self.registers[y])
            }
            Load { x, nn } => {
                // 6XNN
                // Sets VX to NN.
                self.registers[x] = nn;
                ProgramCounterStep::Next
            }
            Add { x, nn } => {
                // 7XNN
                // Adds NN to VX. (Carry flag is not changed)
                self.registers[x] = self.registers[x].wrapping_add(nn);
                ProgramCounterStep::Next
            }
            Move { x, y } => {
                // 8XY0
                self.registers[x] = self.registers[y];
                ProgramCounterStep::Next
            }
            Or { x, y } => {
                // 8XY1
                self.registers[x] |= self.registers[y];
                ProgramCounterStep::Next
            }
            And { x, y } => {
                // 8XY2
                self.registers[x] &= self.registers[y];
                ProgramCounterStep::Next
            }
            Xor { x, y } => {
                // 8XY3
                self.registers[x] ^= self.registers[y];
                ProgramCounterStep::Next
            }
            AddRegister { x, y } => {
                // 8XY4
                // Adds VY to VX. VF is set to 1 when there's a carry, and to 0 when there isn't.
                let (res, carry) = self.registers[x].overflowing_add(self.registers[y]);
                self.set_with_flag(x, res, carry);
                ProgramCounterStep::Next
            }
            Sub { x, y } => {
                // 8XY5
                // VY is subtracted from VX. VF is set to 0 when there's a borrow, and 1 when
                // there isn't.
                let (left, right) = (self.registers[x], self.registers[y]);
                self.set_with_flag(x, left.wrapping_sub(right), left >= right);
                ProgramCounterStep::Next
            }
            ShiftRight { x, .. } => {
                // 8XY6
                // Stores the least significant bit of VX in VF and then shifts VX to the right
                // by 1.
                let value = self.registers[x];
                self.set_with_flag(x, value >> 1, value & 0x1 == 0x1);
                ProgramCounterStep::Next
            }
            SubReverse { x, y } => {
                // 8XY7
                // Sets VX to VY minus VX. VF is set to 0 when there's a borrow, and 1 when there
                // isn't.
                let (left, right) = (self.registers[y], self.registers[x]);
                self.set_with_flag(x, left.wrapping_sub(right), left >= right);
                ProgramCounterStep::Next
            }
            ShiftLeft { x, .. } => {
                // 8XYE
                // Stores the most significant bit of VX in VF and then shifts VX to the left by 1.
                let value = self.registers[x];
                self.set_with_flag(x, value << 1, value >> 7 == 0x1);
                ProgramCounterStep::Next
            }
            SkipNotEqualRegister { x, y } => {
                // 9XY0
                ProgramCounterStep::cond(self.registers[x] != self.registers[y])
            }
            LoadIndex { nnn } => {
                // ANNN
                // Sets I to the address NNN.
                self.index_register = nnn;
                ProgramCounterStep::Next
            }
            JumpOffset { nnn } => {
                // BNNN
                // Jumps to the address NNN plus V0.
                let pointer = nnn + self.registers[0] as u16;
                ProgramCounterStep::Jump(pointer & memory::ADDRESS_MASK as u16)
            }
            Random { x, nn } => {
                // CXNN
                // Sets VX to the result of a bitwise and operation on a random number (Typically:
                // 0 to 255) and NN.
                let mut random = [0u8; 1];
                self.rng.fill_bytes(&mut random);
                self.registers[x] = random[0] & nn;
                ProgramCounterStep::Next
            }
            Draw { x, y, n } => {
                self.draw(x, y, n);
                return Ok((ProgramCounterStep::Next, Operation::Draw));
            }
            SkipKeyPressed { x } => {
                // EX9E
                // Skips the next instruction if the key stored in VX is pressed.
                ProgramCounterStep::cond(self.keyboard.is_pressed(self.registers[x] as usize))
            }
            SkipKeyNotPressed { x } => {
                // EXA1
                ProgramCounterStep::cond(!self.keyboard.is_pressed(self.registers[x] as usize))
            }
            GetDelayTimer { x } => {
                // FX07
                self.registers[x] = self.delay_timer.get_value();
                ProgramCounterStep::Next
            }
            AwaitKeyPress { x } => {
                // FX0A
                // A key press is awaited, and then stored in VX. (Blocking Operation. All
                // instruction halted until next key event)
                // The program counter stays on this opcode until a key was observed.
                log::debug!("Waiting for a key press into V{:X}", x);
                self.waiting = Some(x);
                return Ok((ProgramCounterStep::None, Operation::Wait));
            }
            SetDelayTimer { x } => {
                // FX15
                self.delay_timer.set_value(self.registers[x]);
                ProgramCounterStep::Next
            }
            SetSoundTimer { x } => {
                // FX18
                self.sound_timer.set_value(self.registers[x]);
                ProgramCounterStep::Next
            }
            AddVxToI { x } => {
                // FX1E
                // Adds VX to I. VF is not affected.
                self.index_register = self.index_register.wrapping_add(self.registers[x] as u16);
                ProgramCounterStep::Next
            }
            SetIToSprite { x } => {
                // FX29
                // Sets I to the location of the sprite for the character in VX. Characters 0-F
                // (in hexadecimal) are represented by a 4x5 font.
                let character = (self.registers[x] & 0xF) as usize;
                let location =
                    display::fontset::LOCATION + display::fontset::GLYPH_SIZE * character;
                self.index_register = location as u16;
                ProgramCounterStep::Next
            }
            StoreBcd { x } => {
                // FX33
                // Stores the binary-coded decimal representation of VX, with the most
                // significant of three digits at the address in I, the middle digit at I plus 1,
                // and the least significant digit at I plus 2.
                let value = self.registers[x];
                let digits = [value / 100, (value / 10) % 10, value % 10];
                let index = self.index_register as usize;
                for (offset, digit) in digits.into_iter().enumerate() {
                    self.memory[wrap(index + offset)] = digit;
                }
                ProgramCounterStep::Next
            }
            StoreV0ToVx { x } => {
                // FX55
                // Stores V0 to VX (including VX) in memory starting at address I. The offset
                // from I is increased by 1 for each value written, but I itself is left
                // unmodified.
                let index = self.index_register as usize;
                for offset in 0..=x {
                    self.memory[wrap(index + offset)] = self.registers[offset];
                }
                ProgramCounterStep::Next
            }
            FillV0ToVx { x } => {
                // FX65
                // Fills V0 to VX (including VX) with values from memory starting at address I.
                let index = self.index_register as usize;
                for offset in 0..=x {
                    self.registers[offset] = self.memory[wrap(index + offset)];
                }
                ProgramCounterStep::Next
            }
        };

        Ok((step, Operation::None))
    }
}

impl ChipSet {
    /// Writes the result into VX and the flag into VF afterwards, so that
    /// the flag wins if X is F.
    fn set_with_flag(&mut self, x: usize, value: u8, flag: bool) {
        self.registers[x] = value;
        self.registers[cpu::register::LAST] = flag as u8;
    }

    /// DXYN
    ///
    /// Draws a sprite at coordinate (VX, VY) that has a width of 8 pixels and a height of N
    /// pixels. Each row of 8 pixels is read as bit-coded starting from memory location I; I
    /// value doesn’t change after the execution of this instruction. VF is set to 1 if
    /// any screen pixels are flipped from set to unset when the sprite is drawn, and to 0 if
    /// that doesn’t happen.
    ///
    /// Pixels that leave the screen are wrapped around to the other side.
    fn draw(&mut self, x: usize, y: usize, n: u8) {
        const SPRITE_WIDTH: usize = 8;

        let origin_x = self.registers[x] as usize % display::WIDTH;
        let origin_y = self.registers[y] as usize % display::HEIGHT;
        let index = self.index_register as usize;

        let mut collision = false;
        for row in 0..n as usize {
            let sprite = self.memory[wrap(index + row)];
            let pos_y = (origin_y + row) % display::HEIGHT;

            for column in 0..SPRITE_WIDTH {
                if sprite & (0x80 >> column) == 0 {
                    continue;
                }
                let pos_x = (origin_x + column) % display::WIDTH;
                let pixel = &mut self.display[pos_y][pos_x];
                collision |= *pixel;
                *pixel ^= true;
            }
        }

        self.registers[cpu::register::LAST] = collision as u8;
    }
}
