//! Room graph mapper for text-based game clients.
//!
//! The crate keeps a directed graph of rooms and labeled exits built from
//! "room observed" events, answers shortest-path queries as compressed
//! command strings, and draws a top-down text map around the current room.
//! Hosts drive everything through [`Mapper`]; the lower layers are public for
//! tools that only need one piece (e.g. snapshot inspection or rendering).

pub mod compress;
pub mod direction;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod logging;
pub mod mapper;
pub mod metrics;
pub mod path;
pub mod render;
pub mod session;
pub mod width;

pub use compress::{assemble, command_lines};
pub use direction::Direction;
pub use error::{MapperError, Missing, Result};
pub use geometry::{Cell, Size};
pub use graph::{Exit, ExitData, Exits, LoadOutcome, MapStore, Room, RoomData, RoomId, RoomState};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, NullSink,
};
pub use mapper::{
    AutoVisitStep, AutoVisitStop, FALLBACK_VIEW, Mapper, MapperConfig, ObserveOutcome,
    PathOutcome, RoomObservation, RoomSummary, SessionReport, UnmappedFilter,
};
pub use metrics::{MapperMetrics, MetricSnapshot};
pub use path::find_path;
pub use render::{GlyphSet, MapRenderer, MapView, RenderOptions};
pub use session::Session;
pub use width::display_width;
