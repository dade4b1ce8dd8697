//! A terminal frontend for the chip8 emulator.
//!
//! ```text
//! CHIP-8 Keypad    Keyboard
//! 1 2 3 C          1 2 3 4
//! 4 5 6 D          Q W E R
//! 7 8 9 E          A S D F
//! A 0 B F          Z X C V
//! ```
//!
//! Press **Escape** to exit. Logs are only written with `--log <FILE>`,
//! the terminal itself is taken by the emulator screen.
mod adapter;
mod definitions;
mod error;
mod terminal;

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use chip::{
    chip8::ChipSet,
    definitions::{cpu, timer},
    resources::Rom,
    Runner, RunnerConfig,
};
use clap::{error::ErrorKind, Parser};

use crate::{
    adapter::{DisplayAdapter, KeyboardAdapter, SoundAdapter},
    definitions::keyboard,
    error::HostError,
    terminal::TerminalGuard,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the rom that shall be run
    rom: PathBuf,

    /// Instructions per second
    #[arg(long, default_value_t = cpu::HERTZ)]
    hertz: u64,

    /// How many milliseconds a key counts as pressed after the terminal reported it
    #[arg(long, default_value_t = keyboard::HOLD.as_millis() as u64)]
    hold: u64,

    /// Write the log into this file, without it logging stays off unless `RUST_LOG` is set
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() {
    let code = match run() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}", err);
            err.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<(), HostError> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            if let Err(err) = err.print() {
                eprintln!("Unable to print the help: {}", err);
            }
            return Ok(());
        }
        Err(err) => return Err(HostError::Usage(err)),
    };
    init_logger(args.log.as_deref())?;

    let rom = load_rom(&args.rom)?;
    log::info!("Running {} at {} Hz", rom.get_name(), args.hertz);

    let _guard = TerminalGuard::enter().map_err(HostError::Terminal)?;
    let display = DisplayAdapter::new(rom.get_name())
        .context("Unable to set up the terminal display")
        .map_err(HostError::Terminal)?;

    let mut runner = Runner::new(
        ChipSet::new(),
        display,
        KeyboardAdapter::new(Duration::from_millis(args.hold)),
        SoundAdapter::new(io::stdout()),
        RunnerConfig::from_hertz(args.hertz),
    );
    runner.load(&rom)?;

    loop {
        let start = Instant::now();
        runner.frame();

        let failure = runner
            .keyboard_mut()
            .take_failure()
            .or_else(|| runner.display_mut().take_failure());
        if let Some(err) = failure {
            return Err(HostError::Terminal(
                anyhow::Error::new(err).context("Lost the connection to the terminal"),
            ));
        }

        if runner.keyboard().quit_requested() {
            log::info!("Quitting");
            return Ok(());
        }

        if let Some(rest) = timer::INTERVAL.checked_sub(start.elapsed()) {
            thread::sleep(rest);
        }
    }
}

/// The filter used when `RUST_LOG` isn't set.
///
/// Stderr shares the terminal with the emulator screen, so without a log
/// file nothing is logged by default.
fn default_filter(log_file: Option<&Path>) -> &'static str {
    match log_file {
        Some(_) => "warn",
        None => "off",
    }
}

fn init_logger(log_file: Option<&Path>) -> Result<(), HostError> {
    let env = env_logger::Env::default().default_filter_or(default_filter(log_file));
    let mut builder = env_logger::Builder::from_env(env);

    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| HostError::LogUnwritable {
            path: path.to_path_buf(),
            source,
        })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

/// Reads the rom from disk, the name is taken from the file name.
fn load_rom(path: &Path) -> Result<Rom, HostError> {
    let data = fs::read(path).map_err(|source| HostError::RomUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Rom::new(&name, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip::definitions::rom;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["chip8-term", "pong.ch8"]).expect("valid arguments");
        assert_eq!(PathBuf::from("pong.ch8"), args.rom);
        assert_eq!(cpu::HERTZ, args.hertz);
        assert_eq!(500, args.hold);
        assert_eq!(None, args.log);

        let args = Args::try_parse_from([
            "chip8-term",
            "--hertz",
            "700",
            "--hold",
            "300",
            "--log",
            "chip8.log",
            "pong.ch8",
        ])
        .expect("valid arguments");
        assert_eq!(700, args.hertz);
        assert_eq!(300, args.hold);
        assert_eq!(Some(PathBuf::from("chip8.log")), args.log);
    }

    #[test]
    fn test_logging_stays_off_screen() {
        assert_eq!("off", default_filter(None));
        assert_eq!("warn", default_filter(Some(Path::new("chip8.log"))));

        let dir = std::env::temp_dir().join(format!("chip8-term-log-{}", std::process::id()));
        let err = init_logger(Some(&dir.join("missing").join("chip8.log")))
            .expect_err("the directory doesn't exist");
        assert_eq!(1, err.exit_code());
    }

    #[test]
    fn test_bad_args() {
        let missing = Args::try_parse_from(["chip8-term"]).expect_err("the rom is missing");
        assert_eq!(ErrorKind::MissingRequiredArgument, missing.kind());
        assert_eq!(2, HostError::Usage(missing).exit_code());

        let bad = Args::try_parse_from(["chip8-term", "--hertz", "fast", "pong.ch8"])
            .expect_err("not a number");
        assert_eq!(ErrorKind::ValueValidation, bad.kind());
    }

    #[test]
    fn test_load_rom() {
        let dir = std::env::temp_dir().join(format!("chip8-term-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir is writable");

        let path = dir.join("PONG.ch8");
        fs::write(&path, [0x00u8, 0xE0, 0x12, 0x00]).expect("temp dir is writable");
        let rom = load_rom(&path).expect("readable rom");
        assert_eq!("PONG", rom.get_name());
        assert_eq!(&[0x00u8, 0xE0, 0x12, 0x00][..], rom.get_data());

        let large = dir.join("LARGE.ch8");
        fs::write(&large, vec![0u8; rom::MAX_SIZE + 1]).expect("temp dir is writable");
        let err = load_rom(&large).expect_err("too large");
        assert_eq!(3, err.exit_code());

        let err = load_rom(&dir.join("MISSING.ch8")).expect_err("missing");
        assert_eq!(1, err.exit_code());

        fs::remove_dir_all(&dir).expect("temp dir is removable");
    }
}
