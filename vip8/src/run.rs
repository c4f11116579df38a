use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{error, info};
use sdl2::event::Event;

use vip8_core::{Chip8, CLOCK_HZ};
use vip8_display::Display;

use crate::keymap::keymap;

pub fn run(rom: PathBuf) {
    let mut chip8: Chip8 = Chip8::new();

    let image = fs::read(&rom).expect("unable to open ROM file");
    if let Err(e) = chip8.load_rom(&image) {
        error!("refusing to start: {}", e);
        return;
    }
    info!("loaded {} byte ROM from {}", image.len(), rom.display());

    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init().unwrap();
    let mut display: Display = Display::new(&sdl);
    let mut events = sdl.event_pump().unwrap();

    // Set initial timing
    let cycle_time: Duration = Duration::from_secs(1) / CLOCK_HZ;
    let mut last_cycle: Instant = Instant::now();

    'event: loop {
        // If a draw happened since the last frame, render it
        if let Some(frame) = chip8.take_frame() {
            display.render(&frame);
        }

        // Latch input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    scancode: Some(key),
                    ..
                } => {
                    if let Some(index) = keymap(key) {
                        chip8.key_press(index);
                    }
                }
                Event::KeyUp {
                    scancode: Some(key),
                    ..
                } => {
                    if let Some(index) = keymap(key) {
                        chip8.key_release(index);
                    }
                }
                _ => continue,
            }
        }

        // Update state; a waiting machine still polls input and timers
        chip8.tick(Instant::now());
        if let Err(fault) = chip8.step() {
            error!("machine halted: {}", fault);
            break 'event;
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = current_time;
    }
}
