use std::time::Instant;

use log::{debug, warn};

use crate::constants::{MAX_ROM_SIZE, PROGRAM_START, TIMER_PERIOD};
use crate::fault::{Fault, LoadError};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::operations;
use crate::quirks::Quirks;
use crate::state::{FrameBuffer, State};

/// What a successful step did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction ran and the machine advanced.
    Executed,
    /// The current instruction is waiting on a keypress; no cycle was
    /// consumed and the program counter did not move.
    AwaitingKey,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
/// - the architectural `state`
/// - `pressed_keys` with public interfaces for manipulating them
/// - whether a program is installed and the machine may run
///
/// Supplies interfaces for:
/// - installing ROM images
/// - pressing and releasing keys
/// - executing one instruction at a time
/// - advancing its timers against the wall clock
/// - inspecting its frame buffer for rendering by some display
///
/// It never performs I/O of its own: ROM bytes, key events, and the
/// current time all come from the caller, and faults come back as values
/// rather than panics.
pub struct Chip8 {
    state: State,
    pressed_keys: [bool; 16],
    quirks: Quirks,
    loaded: bool,
    last_timer_decrement: Instant,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Chip8 {
            state: State::new(),
            pressed_keys: [false; 16],
            quirks,
            loaded: false,
            last_timer_decrement: Instant::now(),
        }
    }

    /// Install a ROM image at the program start address.
    ///
    /// A rejected image leaves the machine exactly as it was; an accepted
    /// one resets all state first so every load begins a fresh run.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        if rom.is_empty() {
            return Err(LoadError::EmptyRom);
        }
        if rom.len() > MAX_ROM_SIZE {
            return Err(LoadError::RomTooLarge { size: rom.len() });
        }
        self.state = State::new();
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        self.loaded = true;
        Ok(())
    }

    /// Whether a program is installed and no fatal fault has occurred
    /// since.
    pub fn is_running(&self) -> bool {
        self.loaded
    }

    /// Execute exactly one instruction.
    ///
    /// A fatal fault halts the machine: the error is returned and every
    /// later call fails with `Fault::NotLoaded` until the next successful
    /// `load_rom`.
    pub fn step(&mut self) -> Result<StepOutcome, Fault> {
        if !self.loaded {
            return Err(Fault::NotLoaded);
        }
        self.try_step().map_err(|fault| {
            self.loaded = false;
            fault
        })
    }

    fn try_step(&mut self) -> Result<StepOutcome, Fault> {
        let word = self.fetch()?;
        debug!(
            "{:04X} pc{:04X} i{:04X} v{:02X?}",
            word, self.state.pc, self.state.i, self.state.v
        );
        let instruction = Instruction::decode(Opcode(word));
        match operations::execute(instruction, &self.state, &self.pressed_keys, self.quirks)? {
            Some(next) => {
                self.state = next;
                Ok(StepOutcome::Executed)
            }
            None => Ok(StepOutcome::AwaitingKey),
        }
    }

    /// Memory holds bytes but opcodes are 16 bits, so combine two
    /// adjacent bytes. Both must be inside memory.
    fn fetch(&self) -> Result<u16, Fault> {
        let high = self.state.read_byte(self.state.pc)?;
        let low = self.state.read_byte(self.state.pc + 1)?;
        Ok(u16::from(high) << 8 | u16::from(low))
    }

    /// Set the pressed status of `key`.
    pub fn key_press(&mut self, key: u8) {
        self.set_key(key, true);
    }

    /// Unset the pressed status of `key`.
    pub fn key_release(&mut self, key: u8) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: u8, pressed: bool) {
        match self.pressed_keys.get_mut(key as usize) {
            Some(slot) => *slot = pressed,
            None => warn!("ignoring event for key {:#04X} outside the keypad", key),
        }
    }

    /// Decrement both timers once if at least one 60 Hz period has passed
    /// since the last decrement.
    ///
    /// Timer decay is gated on the caller-supplied wall clock, not on
    /// instruction count, so it is independent of execution speed.
    pub fn tick(&mut self, now: Instant) {
        if now.duration_since(self.last_timer_decrement) >= TIMER_PERIOD {
            if self.state.delay_timer > 0 {
                self.state.delay_timer -= 1;
            }
            if self.state.sound_timer > 0 {
                self.state.sound_timer -= 1;
            }
            self.last_timer_decrement = now;
        }
    }

    /// Read-only view of the display.
    pub fn display(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// The frame buffer, if it changed since the last take.
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    /// A driver may beep while this is non-zero; synthesizing the tone is
    /// its concern, not the machine's.
    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_combines_adjacent_bytes() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0xAA, 0xBB]).unwrap();
        assert_eq!(chip8.fetch().unwrap(), 0xAABB);
    }

    #[test]
    fn test_step_requires_a_loaded_rom() {
        let mut chip8 = Chip8::new();
        assert_eq!(chip8.step(), Err(Fault::NotLoaded));
    }

    #[test]
    fn test_load_rom_rejects_empty_images() {
        let mut chip8 = Chip8::new();
        assert_eq!(chip8.load_rom(&[]), Err(LoadError::EmptyRom));
        assert!(!chip8.is_running());
    }

    #[test]
    fn test_load_rom_rejects_oversized_images() {
        let mut chip8 = Chip8::new();
        let rom = vec![0; MAX_ROM_SIZE + 1];
        assert_eq!(
            chip8.load_rom(&rom),
            Err(LoadError::RomTooLarge { size: 3585 })
        );
        assert!(!chip8.is_running());
    }

    #[test]
    fn test_load_rom_accepts_a_single_byte_image() {
        let mut chip8 = Chip8::new();
        assert_eq!(chip8.load_rom(&[0xAA]), Ok(()));
        assert!(chip8.is_running());
        assert_eq!(chip8.state.memory[0x200], 0xAA);
    }

    #[test]
    fn test_load_rom_accepts_a_maximal_image() {
        let mut chip8 = Chip8::new();
        let rom = vec![0; MAX_ROM_SIZE];
        assert_eq!(chip8.load_rom(&rom), Ok(()));
        assert!(chip8.is_running());
    }

    #[test]
    fn test_load_rom_resets_the_machine() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_step_advances_past_one_instruction() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        assert_eq!(chip8.step(), Ok(StepOutcome::Executed));
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_fatal_fault_halts_the_machine() {
        let mut chip8 = Chip8::new();
        // A bare return underflows the stack
        chip8.load_rom(&[0x00, 0xEE]).unwrap();
        assert_eq!(chip8.step(), Err(Fault::StackUnderflow));
        assert!(!chip8.is_running());
        assert_eq!(chip8.step(), Err(Fault::NotLoaded));
    }

    #[test]
    fn test_jump_outside_memory_faults_on_fetch() {
        let mut chip8 = Chip8::new();
        // 0xFFF holds only one byte of the opcode
        chip8.load_rom(&[0x1F, 0xFF]).unwrap();
        chip8.step().unwrap();
        assert_eq!(
            chip8.step(),
            Err(Fault::MemoryOutOfBounds { address: 0x1000 })
        );
        assert!(!chip8.is_running());
    }

    #[test]
    fn test_step_awaits_and_resumes_on_key() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0xF1, 0x0A]).unwrap();
        assert_eq!(chip8.step(), Ok(StepOutcome::AwaitingKey));
        assert_eq!(chip8.step(), Ok(StepOutcome::AwaitingKey));
        assert_eq!(chip8.state.pc, 0x200);
        chip8.key_press(0xE);
        assert_eq!(chip8.step(), Ok(StepOutcome::Executed));
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.v[0x1], 0xE);
    }

    #[test]
    fn test_key_latch_tracks_press_and_release() {
        let mut chip8 = Chip8::new();
        chip8.key_press(0x5);
        assert!(chip8.pressed_keys[0x5]);
        chip8.key_release(0x5);
        assert!(!chip8.pressed_keys[0x5]);
    }

    #[test]
    fn test_key_events_outside_the_keypad_are_dropped() {
        let mut chip8 = Chip8::new();
        chip8.key_press(0x20);
        assert_eq!(chip8.pressed_keys, [false; 16]);
    }

    #[test]
    fn test_tick_decrements_once_per_period() {
        let mut chip8 = Chip8::new();
        chip8.state.delay_timer = 5;
        chip8.state.sound_timer = 3;
        let anchor = chip8.last_timer_decrement;
        chip8.tick(anchor + TIMER_PERIOD);
        assert_eq!(chip8.state.delay_timer, 4);
        assert_eq!(chip8.state.sound_timer, 2);
        // Same instant again: no period has elapsed since the decrement
        chip8.tick(anchor + TIMER_PERIOD);
        assert_eq!(chip8.state.delay_timer, 4);
        chip8.tick(anchor + TIMER_PERIOD * 2);
        assert_eq!(chip8.state.delay_timer, 3);
    }

    #[test]
    fn test_tick_ignores_partial_periods() {
        let mut chip8 = Chip8::new();
        chip8.state.delay_timer = 5;
        let anchor = chip8.last_timer_decrement;
        chip8.tick(anchor + TIMER_PERIOD / 2);
        assert_eq!(chip8.state.delay_timer, 5);
    }

    #[test]
    fn test_tick_never_underflows_timers() {
        let mut chip8 = Chip8::new();
        let anchor = chip8.last_timer_decrement;
        chip8.tick(anchor + TIMER_PERIOD);
        assert_eq!(chip8.state.delay_timer, 0);
        assert_eq!(chip8.state.sound_timer, 0);
    }

    #[test]
    fn test_take_frame_hands_off_once_per_draw() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        assert!(chip8.take_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.take_frame().is_some());
        assert!(chip8.take_frame().is_none());
    }
}
