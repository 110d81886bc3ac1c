use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use oct8_core::{Variant, FRAME_RATE};

mod keymap;
mod run;

/// A Chip-8 interpreter
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Size multiplier for each Chip-8 pixel
    #[arg(short, long, default_value_t = 15, value_parser = clap::value_parser!(u32).range(1..))]
    scale: u32,

    /// Maximum redraws per second
    #[arg(short, long, default_value_t = FRAME_RATE, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Quirks for 8XY6/8XYE and BNNN: original or modern
    #[arg(long, default_value_t = Variant::Modern)]
    variant: Variant,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = fs::read(&args.rom)
        .with_context(|| format!("unable to read ROM {}", args.rom.display()))?;

    let settings = run::Settings {
        scale: args.scale,
        fps: args.fps,
        variant: args.variant,
    };
    run::run(&rom, &settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["oct8", "pong.ch8"]).unwrap();
        assert_eq!(args.rom, PathBuf::from("pong.ch8"));
        assert_eq!(args.scale, 15);
        assert_eq!(args.fps, 60);
        assert_eq!(args.variant, Variant::Modern);
    }

    #[test]
    fn test_args_variant() {
        let args =
            Args::try_parse_from(["oct8", "--variant", "original", "pong.ch8"]).unwrap();
        assert_eq!(args.variant, Variant::Original);
    }

    #[test]
    fn test_args_require_rom() {
        assert!(Args::try_parse_from(["oct8"]).is_err());
    }

    #[test]
    fn test_args_reject_zero_fps() {
        assert!(Args::try_parse_from(["oct8", "--fps", "0", "pong.ch8"]).is_err());
    }
}
