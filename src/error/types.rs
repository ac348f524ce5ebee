use std::fmt;

use thiserror::Error;

use crate::graph::RoomId;

/// Unified result type for the mapper crate.
pub type Result<T> = std::result::Result<T, MapperError>;

/// The thing a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Room(RoomId),
    Exit { room: RoomId, label: String },
    Bookmark(String),
    CurrentRoom,
    CustomExit,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Room(id) => write!(f, "room `{id}`"),
            Missing::Exit { room, label } => write!(f, "exit `{label}` in room `{room}`"),
            Missing::Bookmark(name) => write!(f, "bookmark `{name}`"),
            Missing::CurrentRoom => write!(f, "current room"),
            Missing::CustomExit => write!(f, "pending custom exit"),
        }
    }
}

/// Errors surfaced by the mapper. None of them is fatal to the host process.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("no such {0}")]
    NotFound(Missing),
    #[error("no path from `{from}` to `{to}`")]
    NoPath { from: RoomId, to: RoomId },
    #[error("room `{room}` has no `{field}` metadata")]
    MissingMetadata { room: RoomId, field: &'static str },
    #[error("no unmapped rooms reachable")]
    NoUnmappedRooms,
    #[error("glyph {0:?} must be a single non-blank terminal column")]
    InvalidGlyph(char),
    #[error("snapshot codec error: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MapperError {
    pub fn room_not_found(id: &RoomId) -> Self {
        Self::NotFound(Missing::Room(id.clone()))
    }

    pub fn exit_not_found(room: &RoomId, label: &str) -> Self {
        Self::NotFound(Missing::Exit {
            room: room.clone(),
            label: label.to_string(),
        })
    }

    /// Short machine-friendly tag used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::NoPath { .. } => "no_path",
            Self::MissingMetadata { .. } => "missing_metadata",
            Self::NoUnmappedRooms => "no_unmapped_rooms",
            Self::InvalidGlyph(_) => "invalid_glyph",
            Self::Snapshot(_) => "snapshot",
            Self::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_name_the_missing_thing() {
        let err = MapperError::exit_not_found(&RoomId::from("12"), "ne");
        assert_eq!(err.to_string(), "no such exit `ne` in room `12`");
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn metadata_error_is_distinct_from_not_found() {
        let err = MapperError::MissingMetadata {
            room: RoomId::from(7),
            field: "zone",
        };
        assert_eq!(err.kind(), "missing_metadata");
        assert_eq!(err.to_string(), "room `7` has no `zone` metadata");
    }
}
