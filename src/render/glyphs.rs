use crate::direction::Direction;
use crate::error::{MapperError, Result};
use crate::render::canvas::BLANK;
use crate::width::glyph_width;

/// Glyphs for one exit direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitGlyphs {
    /// Ordinary passage.
    pub regular: char,
    /// Target unknown, out of area, or the room cell beyond is taken.
    pub hidden: char,
    /// Target was already drawn somewhere else.
    pub marked: char,
}

impl ExitGlyphs {
    pub const fn new(regular: char, hidden: char, marked: char) -> Self {
        Self {
            regular,
            hidden,
            marked,
        }
    }

    pub const fn uniform(glyph: char) -> Self {
        Self::new(glyph, glyph, glyph)
    }
}

/// Every character the renderer may place on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSet {
    pub room: char,
    pub start: char,
    pub up: char,
    pub down: char,
    pub up_down: char,
    pub start_up: char,
    pub start_down: char,
    pub start_up_down: char,
    pub north: ExitGlyphs,
    pub south: ExitGlyphs,
    pub east: ExitGlyphs,
    pub west: ExitGlyphs,
    pub north_east: ExitGlyphs,
    pub south_east: ExitGlyphs,
    pub south_west: ExitGlyphs,
    pub north_west: ExitGlyphs,
}

impl GlyphSet {
    pub fn unicode() -> Self {
        Self {
            room: '█',
            start: '░',
            up: '▲',
            down: '▼',
            up_down: '◆',
            start_up: '▵',
            start_down: '▿',
            start_up_down: '◇',
            north: ExitGlyphs::new('│', '↑', '║'),
            south: ExitGlyphs::new('│', '↓', '║'),
            east: ExitGlyphs::new('─', '→', '═'),
            west: ExitGlyphs::new('─', '←', '═'),
            north_east: ExitGlyphs::uniform('/'),
            south_east: ExitGlyphs::uniform('\\'),
            south_west: ExitGlyphs::uniform('/'),
            north_west: ExitGlyphs::uniform('\\'),
        }
    }

    /// Plain 7-bit fallback for terminals without box drawing.
    pub fn ascii() -> Self {
        Self {
            room: '#',
            start: '@',
            up: '^',
            down: 'v',
            up_down: 'x',
            start_up: 'A',
            start_down: 'V',
            start_up_down: 'X',
            north: ExitGlyphs::new('|', ':', '!'),
            south: ExitGlyphs::new('|', ':', '!'),
            east: ExitGlyphs::new('-', '~', '='),
            west: ExitGlyphs::new('-', '~', '='),
            north_east: ExitGlyphs::uniform('/'),
            south_east: ExitGlyphs::uniform('\\'),
            south_west: ExitGlyphs::uniform('/'),
            north_west: ExitGlyphs::uniform('\\'),
        }
    }

    /// Glyphs for a horizontal or diagonal exit; vertical exits draw stairs.
    pub fn exit(&self, direction: Direction) -> Option<ExitGlyphs> {
        match direction {
            Direction::North => Some(self.north),
            Direction::South => Some(self.south),
            Direction::East => Some(self.east),
            Direction::West => Some(self.west),
            Direction::NorthEast => Some(self.north_east),
            Direction::SouthEast => Some(self.south_east),
            Direction::SouthWest => Some(self.south_west),
            Direction::NorthWest => Some(self.north_west),
            Direction::Up | Direction::Down => None,
        }
    }

    /// Stair glyph after adding a vertical exit to a cell currently showing
    /// `current`.
    pub fn stairs(&self, direction: Direction, current: Option<char>) -> char {
        let (same, opposite) = match direction {
            Direction::Down => (self.down, self.up),
            _ => (self.up, self.down),
        };
        match current {
            Some(glyph) if glyph == opposite || glyph == self.up_down => self.up_down,
            _ => same,
        }
    }

    /// Start-room overlay for whatever base glyph sits on the center cell.
    pub fn start_overlay(&self, base: Option<char>) -> char {
        match base {
            Some(glyph) if glyph == self.down => self.start_down,
            Some(glyph) if glyph == self.up => self.start_up,
            Some(glyph) if glyph == self.up_down => self.start_up_down,
            _ => self.start,
        }
    }

    /// Every glyph must fill exactly one terminal column and differ from the
    /// blank fill, or rows would misalign and occupied cells would look free.
    pub fn validate(&self) -> Result<()> {
        match self
            .all()
            .into_iter()
            .find(|glyph| *glyph == BLANK || glyph_width(*glyph) != 1)
        {
            Some(bad) => Err(MapperError::InvalidGlyph(bad)),
            None => Ok(()),
        }
    }

    fn all(&self) -> Vec<char> {
        let mut glyphs = vec![
            self.room,
            self.start,
            self.up,
            self.down,
            self.up_down,
            self.start_up,
            self.start_down,
            self.start_up_down,
        ];
        for exit in [
            self.north,
            self.south,
            self.east,
            self.west,
            self.north_east,
            self.south_east,
            self.south_west,
            self.north_west,
        ] {
            glyphs.extend([exit.regular, exit.hidden, exit.marked]);
        }
        glyphs
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self::unicode()
    }
}
