use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use log::{debug, error, info};
use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::EventPump;

use oct8_core::screen::blank;
use oct8_core::{Chip8, Config, KeyState, Variant};
use oct8_display::Display;

use crate::keymap::keymap;

/// How the driver loop presents and paces the interpreter
pub struct Settings {
    pub scale: u32,
    pub fps: u32,
    pub variant: Variant,
}

/// Runs `rom` until the window is closed or the program faults
///
/// Instructions run back to back; only a step that changed the screen is
/// followed by a render and a sleep to hold the redraw rate at `fps`.
pub fn run(rom: &[u8], settings: &Settings) -> Result<()> {
    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display: Display = Display::new(&sdl, settings.scale).map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let config = Config::new(settings.variant);
    let mut chip8 = Chip8::new(rom, blank(), KeyState::new(), config)?;
    info!(
        "running {} byte ROM with {} quirks at {} fps",
        rom.len(),
        settings.variant,
        settings.fps
    );

    let frame_time: Duration = Duration::from_secs(1) / settings.fps;

    'event: loop {
        // Handle input
        let mut backgrounded = false;
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'event,
                Event::AppWillEnterBackground { .. } => backgrounded = true,
                Event::KeyDown {
                    scancode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.keypad_mut().press(kc)
                    }
                }
                Event::KeyUp {
                    scancode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.keypad_mut().release(kc)
                    }
                }
                _ => continue,
            };
        }

        if backgrounded && !wait_for_foreground(&mut events) {
            break 'event;
        }

        // Update state
        if let Err(fault) = chip8.step() {
            error!("halting at pc {:04X}: {}", chip8.state().pc, fault);
            return Err(fault.into());
        }

        if !chip8.should_redraw() {
            continue;
        }

        // Render and hold the frame
        let start = Instant::now();
        display.render(chip8.screen()).map_err(|e| anyhow!(e))?;
        let elapsed = start.elapsed();
        debug!("rendered frame in {:?}", elapsed);
        if frame_time > elapsed {
            thread::sleep(frame_time - elapsed);
        }
    }

    info!("quit");
    Ok(())
}

/// Blocks while the app is in the background
/// Returns false if a quit arrived instead
fn wait_for_foreground(events: &mut EventPump) -> bool {
    debug!("paused in background");
    loop {
        match events.wait_event() {
            Event::Quit { .. } => return false,
            Event::AppWillEnterForeground { .. } | Event::AppDidEnterForeground { .. } => {
                debug!("resumed");
                return true;
            }
            _ => continue,
        }
    }
}
