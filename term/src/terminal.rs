use std::io;

use anyhow::Context;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Switches the terminal into raw mode on the alternate screen, and
/// back again when dropped.
pub(crate) struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("Unable to enable the raw mode")?;

        // from here on the drop restores what was already changed
        let guard = Self { _private: () };
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)
            .context("Unable to switch to the alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show) {
            log::error!("Unable to leave the alternate screen: {}", err);
        }
        if let Err(err) = terminal::disable_raw_mode() {
            log::error!("Unable to disable the raw mode: {}", err);
        }
    }
}
