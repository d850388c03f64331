//! Matrix rain
//!
//! One drop per column. Every frame each drop draws a fresh katakana glyph at
//! its head and moves down a cell; older glyphs fade. A drop that has left
//! the bottom edge restarts at the top with a small probability per frame.

use rand::Rng;

/// First code point of the glyph range
pub const GLYPH_BASE: u32 = 0x30A0;
/// Number of glyphs in the range
pub const GLYPH_COUNT: u32 = 96;
/// Per-frame probability that an off-screen drop restarts
pub const RESTART_CHANCE: f64 = 0.025;
/// Brightness kept by every cell per frame
pub const FADE: f32 = 0.95;

const VISIBLE_THRESHOLD: f32 = 0.05;

/// A glyph and its remaining brightness (1.0 = just drawn)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainCell {
    /// Glyph
    pub glyph: char,
    /// Brightness in `0.0..=1.0`
    pub intensity: f32,
}

/// Glyph drawn at a drop head during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RainHead {
    /// Column index
    pub column: usize,
    /// Row index; may lie below the visible area
    pub row: usize,
    /// Glyph drawn
    pub glyph: char,
}

/// The rain field
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRain {
    columns: usize,
    rows: usize,
    drops: Vec<usize>,
    cells: Vec<Option<RainCell>>,
}

impl MatrixRain {
    /// Field of `columns` x `rows` cells; every drop starts on row 1
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            drops: vec![1; columns],
            cells: vec![None; columns * rows],
        }
    }

    /// Field covering a pixel canvas
    #[must_use]
    pub fn for_canvas(width: u32, height: u32, cell_size: u16) -> Self {
        let cell = u32::from(cell_size.max(1));
        Self::new((width / cell) as usize, (height / cell) as usize)
    }

    /// Resets the field to a new size
    pub fn resize(&mut self, columns: usize, rows: usize) {
        if (columns, rows) != (self.columns, self.rows) {
            *self = Self::new(columns, rows);
        }
    }

    /// Grid size (columns, rows)
    #[must_use]
    pub const fn size(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// Head row of every drop
    #[must_use]
    pub fn drops(&self) -> &[usize] {
        &self.drops
    }

    /// Visible cell at a position
    #[must_use]
    pub fn cell(&self, column: usize, row: usize) -> Option<RainCell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells[row * self.columns + column]
    }

    /// Draws one frame and returns the glyphs drawn at the drop heads
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<RainHead> {
        for slot in &mut self.cells {
            if let Some(cell) = slot {
                cell.intensity *= FADE;
                if cell.intensity < VISIBLE_THRESHOLD {
                    *slot = None;
                }
            }
        }

        let mut heads = Vec::with_capacity(self.columns);
        for column in 0..self.columns {
            let row = self.drops[column];
            let glyph = random_glyph(rng);
            if row < self.rows {
                self.cells[row * self.columns + column] = Some(RainCell {
                    glyph,
                    intensity: 1.0,
                });
            }
            heads.push(RainHead { column, row, glyph });

            let mut next = row;
            if row > self.rows && rng.gen::<f64>() < RESTART_CHANCE {
                next = 0;
            }
            self.drops[column] = next + 1;
        }
        heads
    }
}

/// A random katakana glyph from U+30A0..U+3100
pub fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    let offset = rng.gen_range(0..GLYPH_COUNT);
    char::from_u32(GLYPH_BASE + offset).unwrap_or('ア')
}
