//! Room graph storage.
//!
//! `core` owns the mutable store, `types` the room/exit records, and
//! `snapshot` the JSON codec used by the persistence collaborator.

mod core;
mod snapshot;
mod types;

pub use core::{Bookmarks, MapData, MapStore, RoomState};
pub use snapshot::LoadOutcome;
pub use types::{Exit, ExitData, Exits, Room, RoomData, RoomId};
