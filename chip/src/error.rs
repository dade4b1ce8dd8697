use thiserror::Error;

use crate::opcode::Opcode;

/// Everything that can go wrong while the chipset processes a single step.
///
/// None of these are fatal, by the time one is returned the chipset has
/// already moved on to the next instruction and can keep running.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid stack state '{0}'")]
    Stack(#[from] StackError),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Full,
    #[error("Stack is empty!")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum RomError {
    #[error("The rom is {size} bytes long, but only {max} bytes fit into memory")]
    TooLarge { size: usize, max: usize },
}
