//! An emulation core for the CHIP-8 virtual machine.
//!
//! The [`ChipSet`](chip8::ChipSet) runs a single opcode per [`step`](chip8::ChipSet::step)
//! and never talks to the outside world on its own, the [`Runner`](Runner) connects it to
//! the [`devices`] of a host.
pub mod chip8;
pub mod definitions;
pub mod devices;
pub mod opcode;
pub mod resources;
pub mod timer;
mod error;

// reexporting for convinience
mod runner;
pub use error::*;
pub use runner::*;
