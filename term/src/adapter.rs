use std::{
    collections::HashMap,
    io::{self, Stdout, Write},
    time::{Duration, Instant},
};

use chip::{
    definitions::{display as chip_display, keyboard as chip_keyboard},
    devices::{DisplayCommands, KeyboardCommands, SoundCommands},
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use once_cell::sync::Lazy;
use tui::{
    backend::CrosstermBackend,
    text::Spans,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::definitions::{display, keyboard, sound};

/// Renders the pixels as one string per row.
pub(crate) fn render_lines(pixels: &[[bool; chip_display::WIDTH]]) -> Vec<String> {
    pixels
        .iter()
        .map(|row| {
            row.iter()
                .map(|&pixel| if pixel { display::PIXEL_ON } else { display::PIXEL_OFF })
                .collect()
        })
        .collect()
}

/// Translates the internal display commands into terminal drawing.
pub(crate) struct DisplayAdapter {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    title: String,
    /// the last error, the display commands themselves can't fail
    failure: Option<io::Error>,
}

impl DisplayAdapter {
    pub fn new(title: &str) -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            title: title.to_string(),
            failure: None,
        })
    }

    fn draw(&mut self, pixels: &[[bool; chip_display::WIDTH]]) -> io::Result<()> {
        let lines: Vec<Spans> = render_lines(pixels).into_iter().map(Spans::from).collect();
        let title = self.title.as_str();

        self.terminal.draw(|f| {
            let block = Block::default().borders(Borders::ALL).title(title);
            let paragraph = Paragraph::new(lines).block(block);
            f.render_widget(paragraph, f.size());
        })?;
        Ok(())
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            log::error!("Unable to draw the display: {}", err);
            self.failure = Some(err);
        }
    }

    pub fn take_failure(&mut self) -> Option<io::Error> {
        self.failure.take()
    }
}

impl DisplayCommands for DisplayAdapter {
    fn clear_display(&mut self) {
        log::debug!("Clearing the display");
        let result = self.terminal.clear();
        self.record(result);
    }

    fn display(&mut self, pixels: &[[bool; chip_display::WIDTH]]) {
        log::debug!("Drawing the display");
        let result = self.draw(pixels);
        self.record(result);
    }
}

/// Reads the terminal events and keeps track of the pressed keys.
#[derive(Debug)]
pub(crate) struct KeyboardAdapter {
    /// when each key was last pressed
    pressed: [Option<Instant>; chip_keyboard::SIZE],
    /// how long a key counts as pressed after its last event
    hold: Duration,
    quit: bool,
    failure: Option<io::Error>,
}

impl KeyboardAdapter {
    /// Generates a new keyboard interface.
    pub fn new(hold: Duration) -> Self {
        Self {
            pressed: Default::default(),
            hold,
            quit: false,
            failure: None,
        }
    }

    /// maps the physical key to the chipset key
    pub fn map_key(key: char) -> Option<usize> {
        /// maps the external keyboard layout to the internaly given.
        static LAYOUT_MAP: Lazy<HashMap<char, usize>> = Lazy::new(|| {
            let mut map = HashMap::new();

            for (row, chip_row) in keyboard::TERMINAL_LAYOUT
                .iter()
                .zip(chip_keyboard::LAYOUT.iter())
            {
                for (&cell, &key) in row.iter().zip(chip_row.iter()) {
                    map.insert(cell, key);
                }
            }

            map
        });

        LAYOUT_MAP.get(&key.to_ascii_lowercase()).copied()
    }

    fn handle_key(&mut self, event: KeyEvent, now: Instant) {
        match event.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            KeyCode::Char(c) => match Self::map_key(c) {
                Some(key) => self.pressed[key] = Some(now),
                None => log::debug!("Unable to map {:?} to a chip key", c),
            },
            _ => {}
        }
    }

    /// the keys that are still held at the given time
    fn keys_at(&self, now: Instant) -> [bool; chip_keyboard::SIZE] {
        let mut keys = [false; chip_keyboard::SIZE];
        for (key, pressed) in keys.iter_mut().zip(self.pressed.iter()) {
            *key = pressed.map_or(false, |at| now.saturating_duration_since(at) < self.hold);
        }
        keys
    }

    fn poll(&mut self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key, Instant::now());
            }
        }
        Ok(())
    }

    /// whether the user asked to leave
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn take_failure(&mut self) -> Option<io::Error> {
        self.failure.take()
    }
}

impl KeyboardCommands for KeyboardAdapter {
    fn get_keyboard(&mut self) -> [bool; chip_keyboard::SIZE] {
        if let Err(err) = self.poll() {
            log::error!("Unable to read the terminal events: {}", err);
            self.failure = Some(err);
            self.quit = true;
        }
        self.keys_at(Instant::now())
    }
}

/// Rings the bell whenever the sound turns on.
pub(crate) struct SoundAdapter<W: Write> {
    out: W,
    active: bool,
}

impl<W: Write> SoundAdapter<W> {
    pub fn new(out: W) -> Self {
        Self { out, active: false }
    }

    fn ring(&mut self) -> io::Result<()> {
        self.out.write_all(sound::BELL)?;
        self.out.flush()
    }
}

impl<W: Write> SoundCommands for SoundAdapter<W> {
    fn set_sound(&mut self, active: bool) {
        if active && !self.active {
            if let Err(err) = self.ring() {
                log::warn!("Unable to ring the bell: {}", err);
            }
        }
        self.active = active;
    }
}
