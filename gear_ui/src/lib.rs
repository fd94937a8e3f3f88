#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! 16x2 character display model and the nine gear-display layouts.
//!
//! `CharDisplay` behaves like an HD44780-style module: writes land at a
//! cursor and overwrite what was there, nothing is erased unless the
//! surface is cleared, and text past the last column is dropped.

mod layout;

use core::fmt;

use gear_core::render::{Renderer, View};

pub const COLS: usize = 16;
pub const ROWS: usize = 2;

/// Custom 5x8 characters loaded into the display's CGRAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Greek sigma, labels the standard deviation.
    Sigma,
    /// "1:" squeezed into one cell.
    OneColon,
    /// "T:" squeezed into one cell.
    TColon,
    /// "4:" squeezed into one cell.
    FourColon,
}

impl Glyph {
    /// CGRAM slot the glyph is stored in.
    pub const fn slot(self) -> u8 {
        match self {
            Glyph::Sigma => 0,
            Glyph::OneColon => 1,
            Glyph::TColon => 2,
            Glyph::FourColon => 4,
        }
    }

    /// 5x8 bitmap, one row per byte, low five bits used.
    pub const fn bitmap(self) -> [u8; 8] {
        match self {
            Glyph::Sigma => [0x1F, 0x10, 0x08, 0x04, 0x08, 0x10, 0x1F, 0x00],
            Glyph::OneColon => [0x04, 0x0C, 0x05, 0x04, 0x04, 0x05, 0x0E, 0x00],
            Glyph::TColon => [0x1C, 0x08, 0x09, 0x08, 0x08, 0x09, 0x08, 0x00],
            Glyph::FourColon => [0x02, 0x06, 0x0B, 0x12, 0x1F, 0x03, 0x02, 0x00],
        }
    }

    /// Single character used when the surface is printed as text.
    pub const fn preview(self) -> char {
        match self {
            Glyph::Sigma => 'Σ',
            Glyph::OneColon => '¹',
            Glyph::TColon => 'ᵀ',
            Glyph::FourColon => '⁴',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Char(char),
    Glyph(Glyph),
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Char(' ')
    }
}

impl Cell {
    pub const fn preview(self) -> char {
        match self {
            Cell::Char(c) => c,
            Cell::Glyph(g) => g.preview(),
        }
    }
}

/// In-memory 16x2 character surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharDisplay {
    cells: [[Cell; COLS]; ROWS],
    col: usize,
    row: usize,
    /// Number of `render` calls that drew something.
    frames: u64,
}

impl Default for CharDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl CharDisplay {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::default(); COLS]; ROWS],
            col: 0,
            row: 0,
            frames: 0,
        }
    }

    pub fn set_cursor(&mut self, col: usize, row: usize) {
        self.col = col;
        self.row = row;
    }

    fn put(&mut self, cell: Cell) {
        if self.row < ROWS && self.col < COLS {
            self.cells[self.row][self.col] = cell;
        }
        self.col = self.col.saturating_add(1);
    }

    pub fn print(&mut self, text: &str) {
        for c in text.chars() {
            self.put(Cell::Char(c));
        }
    }

    pub fn write_glyph(&mut self, glyph: Glyph) {
        self.put(Cell::Glyph(glyph));
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Both rows as text, glyphs shown by their preview character.
    pub fn lines(&self) -> [String; ROWS] {
        self.cells
            .map(|row| row.iter().map(|c| c.preview()).collect::<String>())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn wipe(&mut self) {
        self.cells = [[Cell::default(); COLS]; ROWS];
        self.set_cursor(0, 0);
    }
}

impl Renderer for CharDisplay {
    fn clear(&mut self) {
        tracing::trace!("display cleared");
        self.wipe();
    }

    fn render(&mut self, view: &View) {
        if matches!(view, View::Blank) {
            return;
        }
        layout::draw(self, view);
        self.frames += 1;
        tracing::trace!(frame = self.frames, ?view, "display drawn");
    }
}

impl fmt::Display for CharDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [top, bottom] = self.lines();
        writeln!(f, "+{}+", "-".repeat(COLS))?;
        writeln!(f, "|{top}|")?;
        writeln!(f, "|{bottom}|")?;
        write!(f, "+{}+", "-".repeat(COLS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_clips_at_last_column() {
        let mut d = CharDisplay::new();
        d.set_cursor(12, 1);
        d.print("abcdefg");
        assert_eq!(d.lines()[1], "            abcd");
        assert_eq!(d.lines()[0], " ".repeat(COLS));
    }

    #[test]
    fn writes_overlay_until_cleared() {
        let mut d = CharDisplay::new();
        d.print("Neutral");
        d.set_cursor(0, 0);
        d.print("First");
        assert_eq!(&d.lines()[0][..7], "Firstal");
        d.clear();
        assert_eq!(d.lines()[0], " ".repeat(COLS));
    }

    #[test]
    fn glyph_slots_match_cgram_layout() {
        assert_eq!(Glyph::Sigma.slot(), 0);
        assert_eq!(Glyph::OneColon.slot(), 1);
        assert_eq!(Glyph::TColon.slot(), 2);
        assert_eq!(Glyph::FourColon.slot(), 4);
        assert!(Glyph::Sigma.bitmap().iter().all(|b| b & !0x1F == 0));
    }

    #[test]
    fn blank_view_leaves_surface_alone() {
        let mut d = CharDisplay::new();
        d.print("keep");
        d.render(&View::Blank);
        assert_eq!(&d.lines()[0][..4], "keep");
        assert_eq!(d.frames(), 0);
    }
}
