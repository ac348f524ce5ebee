use std::collections::{HashMap, HashSet, VecDeque};

use crate::direction::label_direction;
use crate::display_width;
use crate::error::{MapperError, Result};
use crate::geometry::{Cell, Size};
use crate::graph::{MapStore, RoomId};
use crate::render::canvas::Canvas;
use crate::render::glyphs::GlyphSet;

/// Per-call render parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Terminal size; the bottom row stays free for the prompt.
    pub size: Size,
    /// Keep walking into rooms of other zones.
    pub draw_areas: bool,
}

impl RenderOptions {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            draw_areas: false,
        }
    }

    pub fn with_draw_areas(mut self, draw_areas: bool) -> Self {
        self.draw_areas = draw_areas;
        self
    }
}

/// Rendered map plus the layout the walk settled on.
#[derive(Debug, Clone, Default)]
pub struct MapView {
    pub text: String,
    placements: HashMap<RoomId, Cell>,
}

impl MapView {
    /// Cell a room was drawn at, relative to the top-left of the full grid.
    pub fn cell_of(&self, room: &RoomId) -> Option<Cell> {
        self.placements.get(room).copied()
    }

    pub fn rooms_drawn(&self) -> usize {
        self.placements.len()
    }

    /// Widest rendered row, in terminal columns.
    pub fn columns(&self) -> usize {
        self.text.lines().map(display_width).max().unwrap_or(0)
    }
}

/// Terminal size from the controlling terminal, or `fallback` when there is none.
pub fn terminal_size_or(fallback: Size) -> Size {
    crossterm::terminal::size()
        .map(|(width, height)| Size::new(width, height))
        .unwrap_or(fallback)
}

/// Breadth-first map layout.
///
/// Coordinates are never stored: each render re-walks the graph from the
/// current room, placing it at the grid center and every neighbour
/// `len + 1` cells away in its exit's direction.
#[derive(Debug, Clone)]
pub struct MapRenderer {
    glyphs: GlyphSet,
}

impl MapRenderer {
    pub fn new(glyphs: GlyphSet) -> Result<Self> {
        glyphs.validate()?;
        Ok(Self { glyphs })
    }

    pub fn glyphs(&self) -> &GlyphSet {
        &self.glyphs
    }

    pub fn render(
        &self,
        store: &MapStore,
        current: &RoomId,
        options: RenderOptions,
    ) -> Result<MapView> {
        let start = store
            .room(current)
            .ok_or_else(|| MapperError::room_not_found(current))?;
        let area = start.zone();
        if area.is_none() && !options.draw_areas {
            return Err(MapperError::MissingMetadata {
                room: current.clone(),
                field: "zone",
            });
        }

        let grid = Size::new(options.size.width, options.size.height.saturating_sub(1));
        if grid.is_empty() {
            return Ok(MapView::default());
        }
        let center = options.size.center();

        let mut layout = Layout {
            store,
            glyphs: &self.glyphs,
            canvas: Canvas::new(grid),
            area,
            draw_areas: options.draw_areas,
            visited: HashSet::new(),
            placements: HashMap::new(),
        };
        layout.walk(current, center);

        let base = layout.canvas.get(center);
        layout
            .canvas
            .set(center, self.glyphs.start_overlay(base));

        Ok(MapView {
            text: layout.canvas.to_text(),
            placements: layout.placements,
        })
    }
}

struct Layout<'a> {
    store: &'a MapStore,
    glyphs: &'a GlyphSet,
    canvas: Canvas,
    area: Option<&'a str>,
    draw_areas: bool,
    visited: HashSet<&'a RoomId>,
    placements: HashMap<RoomId, Cell>,
}

impl<'a> Layout<'a> {
    fn walk(&mut self, start: &'a RoomId, center: Cell) {
        let store = self.store;
        let mut queue: VecDeque<(Cell, &'a RoomId)> = VecDeque::new();
        queue.push_back((center, start));

        while let Some((cell, room)) = queue.pop_front() {
            // A room may be queued once per path that reaches it.
            if !self.visited.insert(room) {
                continue;
            }
            self.canvas.set(cell, self.glyphs.room);
            self.placements.insert(room.clone(), cell);

            for (label, exit) in store.room_exits(room) {
                let Some(direction) = label_direction(label) else {
                    continue;
                };
                let target = &exit.tgt;
                let exists = store.is_observed(target);
                let same_area =
                    self.draw_areas || store.room_data(target).zone.as_deref() == self.area;
                let exit_len = if exists && same_area {
                    self.span(exit.data.len())
                } else {
                    1
                };

                let (dx, dy) = direction.screen_step();
                let room_cell = cell.offset((dx * (exit_len + 1), dy * (exit_len + 1)));
                let marked = self.visited.contains(target)
                    && self.placements.get(target) != Some(&room_cell);

                let mut exit_cell = cell;
                for _ in 0..exit_len {
                    exit_cell = exit_cell.offset((dx, dy));
                    // Walked rooms sit on the grid, so a connector never re-enters it.
                    if !self.canvas.contains(exit_cell) {
                        break;
                    }
                    let glyph = match self.glyphs.exit(direction) {
                        None => self.glyphs.stairs(direction, self.canvas.get(cell)),
                        Some(glyphs) => {
                            let beyond = exit_cell.offset((dx, dy));
                            let free = !self.canvas.contains(beyond)
                                || self.canvas.is_blank(beyond)
                                || self.visited.contains(target);
                            if marked {
                                glyphs.marked
                            } else if free && exists && same_area {
                                glyphs.regular
                            } else {
                                glyphs.hidden
                            }
                        }
                    };
                    self.canvas.set(exit_cell, glyph);
                }

                let visit = exists
                    && !self.visited.contains(target)
                    && same_area
                    && !direction.is_vertical()
                    && self.canvas.is_blank(room_cell);
                if visit {
                    queue.push_back((room_cell, target));
                }
            }
        }
    }

    /// Connector cells for an exit of visual length `len`, capped at the grid
    /// extent.
    fn span(&self, len: u32) -> i32 {
        let size = self.canvas.size();
        let extent = i32::from(size.width.max(size.height));
        i32::try_from(len).unwrap_or(i32::MAX).clamp(1, extent.max(1))
    }
}
