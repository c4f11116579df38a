use std::time::Duration;

/// Total addressable memory in bytes.
pub const MEMORY_SIZE: usize = 4096;

/// Address where ROMs are installed and execution begins.
pub const PROGRAM_START: u16 = 0x200;

/// Largest ROM image that fits between `PROGRAM_START` and the end of memory.
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Base address of the builtin font.
pub const FONT_START: u16 = 0x050;

/// Bytes per font glyph.
pub const GLYPH_SIZE: u16 = 5;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Return-address slots available to nested subroutine calls.
pub const STACK_SIZE: usize = 16;

/// Instructions per second a driver should aim for.
pub const CLOCK_HZ: u32 = 650;

/// Rate at which the delay and sound timers decay.
pub const TIMER_HZ: u32 = 60;

/// Wall-clock interval between timer decrements.
pub const TIMER_PERIOD: Duration = Duration::from_micros(1_000_000 / TIMER_HZ as u64);

/// Sprites for the hexadecimal digits 0-F, five bytes per glyph.
///
/// Installed at `FONT_START` when the machine is constructed so ROMs can
/// point I at a digit with the glyph-address instruction.
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
