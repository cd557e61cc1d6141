//! # Text-Mode Screen State
//!
//! The pure part of the console: cell encoding, cursor movement, and
//! scrolling over a borrowed cell array. Keeping this separate from the
//! memory-mapped buffer lets the arithmetic run under ordinary tests.

/// Screen width in character cells.
pub const WIDTH: usize = 80;

/// Screen height in character cells.
pub const HEIGHT: usize = 25;

/// Total cell count of the text buffer.
pub const CELLS: usize = WIDTH * HEIGHT;

/// Light grey on black, the firmware default.
pub const DEFAULT_ATTR: u8 = 0x07;

/// Encode one cell word: glyph in the low byte, attribute in the high.
#[must_use]
pub const fn cell(glyph: u8, attr: u8) -> u16 {
    ((attr as u16) << 8) | glyph as u16
}

/// Cursor-carrying view over a text-mode cell array.
pub struct Screen<'a> {
    cells: &'a mut [u16; CELLS],
    cursor: usize,
}

impl<'a> Screen<'a> {
    pub const fn new(cells: &'a mut [u16; CELLS], cursor: usize) -> Self {
        Self { cells, cursor }
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Write one byte at the cursor, handling control characters and
    /// scrolling. Non-printable bytes render as `?` rather than letting
    /// arbitrary glyph codes through.
    pub fn put(&mut self, byte: u8) {
        match byte {
            b'\n' => {
                self.cursor = (self.cursor / WIDTH + 1) * WIDTH;
            }
            b'\r' => {
                self.cursor = (self.cursor / WIDTH) * WIDTH;
            }
            byte => {
                let glyph = if (0x20..=0x7e).contains(&byte) {
                    byte
                } else {
                    b'?'
                };
                self.scroll_if_needed();
                self.cells[self.cursor] = cell(glyph, DEFAULT_ATTR);
                self.cursor += 1;
            }
        }
        self.scroll_if_needed();
    }

    /// Shift everything up one row once the cursor runs off the bottom.
    fn scroll_if_needed(&mut self) {
        while self.cursor >= CELLS {
            self.cells.copy_within(WIDTH.., 0);
            self.cells[CELLS - WIDTH..].fill(cell(b' ', DEFAULT_ATTR));
            self.cursor -= WIDTH;
        }
    }

    /// Blank the whole screen and home the cursor.
    pub fn clear(&mut self) {
        self.cells.fill(cell(b' ', DEFAULT_ATTR));
        self.cursor = 0;
    }
}
