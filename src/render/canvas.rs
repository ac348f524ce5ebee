use crate::geometry::{Cell, Size};

/// Fill character for empty cells.
pub const BLANK: char = ' ';

/// Fixed-size character grid. Writes outside the grid are ignored.
#[derive(Debug, Clone)]
pub struct Canvas {
    size: Size,
    rows: Vec<Vec<char>>,
}

impl Canvas {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            rows: vec![vec![BLANK; size.width as usize]; size.height as usize],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.size.contains(cell)
    }

    pub fn get(&self, cell: Cell) -> Option<char> {
        if !self.contains(cell) {
            return None;
        }
        Some(self.rows[cell.y as usize][cell.x as usize])
    }

    pub fn set(&mut self, cell: Cell, glyph: char) {
        if self.contains(cell) {
            self.rows[cell.y as usize][cell.x as usize] = glyph;
        }
    }

    /// In bounds and still blank.
    pub fn is_blank(&self, cell: Cell) -> bool {
        self.get(cell) == Some(BLANK)
    }

    /// Rows holding at least one glyph, each terminated by a newline.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            if row.iter().all(|glyph| *glyph == BLANK) {
                continue;
            }
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}
