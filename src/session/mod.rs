//! Per-session exploration state.
//!
//! Everything here lives only as long as the host's connection: the room the
//! character stands in, the rooms entered today, the last known movement
//! points, an in-progress auto-visit and a pending custom exit.

use std::collections::HashSet;

use crate::graph::{Exits, RoomData, RoomId};

/// Where auto-visit is heading and which zone bounds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoVisit {
    pub area: Option<String>,
    pub target: RoomId,
}

/// A custom exit being recorded: the origin room as it looked when the
/// command was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingExit {
    pub command: String,
    pub from: RoomId,
    pub name: Option<String>,
    pub data: RoomData,
    pub exits: Exits,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<RoomId>,
    visited: HashSet<RoomId>,
    moves: Option<u32>,
    auto_visit: Option<AutoVisit>,
    pending_exit: Option<PendingExit>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the character now stands in `room`.
    pub fn enter(&mut self, room: RoomId) {
        self.visited.insert(room.clone());
        self.current = Some(room);
    }

    pub fn current(&self) -> Option<&RoomId> {
        self.current.as_ref()
    }

    pub fn has_visited(&self, room: &RoomId) -> bool {
        self.visited.contains(room)
    }

    pub fn visited(&self) -> &HashSet<RoomId> {
        &self.visited
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Latest movement points reported by the character vitals feed.
    pub fn set_moves(&mut self, moves: u32) {
        self.moves = Some(moves);
    }

    pub fn moves(&self) -> Option<u32> {
        self.moves
    }

    pub fn auto_visit(&self) -> Option<&AutoVisit> {
        self.auto_visit.as_ref()
    }

    pub fn set_auto_visit(&mut self, plan: AutoVisit) {
        self.auto_visit = Some(plan);
    }

    pub fn clear_auto_visit(&mut self) -> Option<AutoVisit> {
        self.auto_visit.take()
    }

    pub fn pending_exit(&self) -> Option<&PendingExit> {
        self.pending_exit.as_ref()
    }

    pub fn set_pending_exit(&mut self, pending: PendingExit) {
        self.pending_exit = Some(pending);
    }

    pub fn take_pending_exit(&mut self) -> Option<PendingExit> {
        self.pending_exit.take()
    }
}
