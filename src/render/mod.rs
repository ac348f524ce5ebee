//! Top-down map rendering.
//!
//! `core` walks the graph breadth-first from the current room and lays rooms
//! out on a [`Canvas`]; `glyphs` holds the character sets it draws with.

mod canvas;
mod core;
mod glyphs;

pub use canvas::{BLANK, Canvas};
pub use core::{MapRenderer, MapView, RenderOptions, terminal_size_or};
pub use glyphs::{ExitGlyphs, GlyphSet};
