use std::sync::{Arc, Mutex};

use crate::geometry::Size;
use crate::logging::Logger;
use crate::metrics::MapperMetrics;
use crate::render::GlyphSet;

/// Terminal size assumed when no view size is configured and the terminal
/// cannot be queried.
pub const FALLBACK_VIEW: Size = Size::new(21, 22);

/// Configuration knobs for a [`Mapper`](super::Mapper).
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// Keep drawing past zone boundaries.
    pub draw_areas: bool,
    /// Fixed view size. `None` follows the terminal.
    pub view_size: Option<Size>,
    /// Used when the terminal size is unavailable.
    pub fallback_view: Size,
    pub glyphs: GlyphSet,
    /// Auto-visit stops on arrival when movement points drop below this.
    pub auto_visit_min_moves: u32,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Metrics accumulator. `None` disables counting.
    pub metrics: Option<Arc<Mutex<MapperMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            draw_areas: false,
            view_size: None,
            fallback_view: FALLBACK_VIEW,
            glyphs: GlyphSet::unicode(),
            auto_visit_min_moves: 60,
            logger: None,
            metrics: None,
            metrics_target: "room_mapper::metrics".to_string(),
        }
    }
}

impl MapperConfig {
    pub fn with_draw_areas(mut self, draw_areas: bool) -> Self {
        self.draw_areas = draw_areas;
        self
    }

    pub fn with_view_size(mut self, size: Size) -> Self {
        self.view_size = Some(size);
        self
    }

    pub fn with_glyphs(mut self, glyphs: GlyphSet) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_auto_visit_min_moves(mut self, moves: u32) -> Self {
        self.auto_visit_min_moves = moves;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(MapperMetrics::new())));
        }
    }

    /// Disable metrics collection.
    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<MapperMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}
