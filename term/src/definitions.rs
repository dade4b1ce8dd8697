pub(crate) mod keyboard {
    use std::time::Duration;

    /// The physical keys, in the same positions as the chipset
    /// [`LAYOUT`](chip::definitions::keyboard::LAYOUT).
    pub const TERMINAL_LAYOUT: [[char; 4]; 4] = [
        ['1', '2', '3', '4'],
        ['q', 'w', 'e', 'r'],
        ['a', 's', 'd', 'f'],
        ['z', 'x', 'c', 'v'],
    ];

    /// Terminals only report key presses, so a key counts as pressed for this long.
    ///
    /// Has to outlast the auto-repeat delay, or a held key flickers until the
    /// first repeat arrives.
    pub const HOLD: Duration = Duration::from_millis(500);
}

pub(crate) mod display {
    /// What a single set pixel is rendered as, two cells wide to keep the aspect ratio.
    pub const PIXEL_ON: &str = "██";
    pub const PIXEL_OFF: &str = "  ";
}

pub(crate) mod sound {
    /// The terminal bell
    pub const BELL: &[u8] = b"\x07";
}
