pub use crate::chip8::{Chip8, StepOutcome};
pub use crate::constants::CLOCK_HZ;
pub use crate::fault::{Fault, LoadError};
pub use crate::quirks::Quirks;

mod chip8;
pub mod constants;
mod fault;
mod instruction;
mod opcode;
mod operations;
mod quirks;
pub mod state;
