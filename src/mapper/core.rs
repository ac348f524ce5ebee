use std::fmt;
use std::io::{Read, Write};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;

use super::config::MapperConfig;
use crate::compress::{assemble, command_lines};
use crate::error::{MapperError, Missing, Result};
use crate::geometry::Size;
use crate::graph::{Bookmarks, Exits, MapData, MapStore, RoomData, RoomId};
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::metrics::{MapperMetrics, MetricSnapshot};
use crate::path::find_path;
use crate::render::{MapRenderer, RenderOptions, terminal_size_or};
use crate::session::Session;

pub(crate) const OBSERVE_TARGET: &str = "room_mapper::observe";
pub(crate) const PATH_TARGET: &str = "room_mapper::path";
pub(crate) const RENDER_TARGET: &str = "room_mapper::render";
pub(crate) const SNAPSHOT_TARGET: &str = "room_mapper::snapshot";
pub(crate) const EXPLORE_TARGET: &str = "room_mapper::explore";
pub(crate) const EXITS_TARGET: &str = "room_mapper::exits";

/// Result of a path query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    AlreadyThere,
    Found {
        commands: String,
        steps: usize,
        elapsed: Duration,
    },
}

impl PathOutcome {
    /// Lines to send to the game; empty when already there.
    pub fn lines(&self) -> Vec<String> {
        match self {
            PathOutcome::AlreadyThere => Vec::new(),
            PathOutcome::Found { commands, .. } => command_lines(commands),
        }
    }
}

/// Everything recorded about one room.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    pub num: RoomId,
    pub name: Option<String>,
    pub data: RoomData,
    pub exits: Exits,
}

impl fmt::Display for RoomSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&pretty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub visited_today: usize,
}

/// Query and command surface over one map and one play session.
///
/// Owns the graph, the session state and the renderer. All operations run
/// synchronously; the host serializes calls.
pub struct Mapper {
    pub(crate) store: MapStore,
    pub(crate) session: Session,
    pub(crate) config: MapperConfig,
    renderer: MapRenderer,
    saved: Option<blake3::Hash>,
}

impl Mapper {
    pub fn new(config: MapperConfig) -> Result<Self> {
        Self::with_store(MapStore::new(), config)
    }

    pub fn with_store(store: MapStore, config: MapperConfig) -> Result<Self> {
        let renderer = MapRenderer::new(config.glyphs.clone())?;
        Ok(Self {
            store,
            session: Session::new(),
            config,
            renderer,
            saved: None,
        })
    }

    pub fn store(&self) -> &MapStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MapStore {
        &mut self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Room the character stands in, as of the last observation.
    pub fn current(&self) -> Result<&RoomId> {
        self.session
            .current()
            .ok_or(MapperError::NotFound(Missing::CurrentRoom))
    }

    /// Upsert a room, replacing its exits wholesale. Observations go through
    /// [`Mapper::observe`], which merges instead.
    pub fn replace_room(
        &mut self,
        id: impl Into<RoomId>,
        name: Option<String>,
        data: RoomData,
        exits: Exits,
    ) {
        self.store.replace_room(id, name, data, exits);
    }

    /// Replace the map with a decoded snapshot. Missing or corrupt input
    /// yields a fresh map; the decode error is logged and returned.
    pub fn load<R: Read>(&mut self, reader: Option<R>) -> Option<MapperError> {
        let outcome = MapStore::load_or_default(reader);
        self.store = outcome.store;
        self.saved = self.store.fingerprint().ok();
        match &outcome.fallback {
            Some(err) => self.emit(
                LogLevel::Warn,
                SNAPSHOT_TARGET,
                "snapshot_unreadable_created_new_map",
                [json_kv("error", err.to_string())],
            ),
            None if self.store.is_empty() => {
                self.emit(
                    LogLevel::Info,
                    SNAPSHOT_TARGET,
                    "created_new_map",
                    [json_kv("rooms", 0)],
                )
            }
            None => self.emit(
                LogLevel::Info,
                SNAPSHOT_TARGET,
                "snapshot_loaded",
                [json_kv("rooms", self.store.len())],
            ),
        }
        outcome.fallback
    }

    pub fn save<W: Write>(&mut self, writer: W) -> Result<()> {
        if let Err(err) = self.store.write_snapshot(writer) {
            return Err(self.report(SNAPSHOT_TARGET, err));
        }
        self.saved = self.store.fingerprint().ok();
        self.emit(
            LogLevel::Info,
            SNAPSHOT_TARGET,
            "snapshot_saved",
            [json_kv("rooms", self.store.len())],
        );
        Ok(())
    }

    /// Whether the map changed since the last load or save.
    pub fn has_unsaved_changes(&self) -> bool {
        match (self.saved, self.store.fingerprint()) {
            (Some(saved), Ok(now)) => saved != now,
            _ => true,
        }
    }

    /// Bookmark name first, then a numeric room id, then a known text id.
    pub fn resolve_destination(&self, destination: &str) -> Result<RoomId> {
        if let Some(id) = self.store.bookmark(destination) {
            return Ok(id.clone());
        }
        if let Ok(num) = destination.trim().parse::<i64>() {
            return Ok(RoomId::from(num));
        }
        let id = RoomId::from(destination);
        if self.store.contains(&id) {
            return Ok(id);
        }
        Err(MapperError::NotFound(Missing::Bookmark(destination.to_string())))
    }

    /// Compressed path from the current room to a bookmark or room id.
    pub fn path_to(&mut self, destination: &str) -> Result<PathOutcome> {
        let target = self
            .resolve_destination(destination)
            .map_err(|err| self.report(PATH_TARGET, err))?;
        self.path_to_room(&target)
    }

    pub fn path_to_room(&mut self, target: &RoomId) -> Result<PathOutcome> {
        let here = self
            .current()
            .cloned()
            .map_err(|err| self.report(PATH_TARGET, err))?;
        self.path_between(&here, target)
    }

    pub fn path_between(&mut self, from: &RoomId, to: &RoomId) -> Result<PathOutcome> {
        if from == to {
            self.emit(LogLevel::Info, PATH_TARGET, "already_there", [json_kv("room", to.as_str())]);
            return Ok(PathOutcome::AlreadyThere);
        }

        let started = Instant::now();
        let raw = find_path(&self.store, from, to);
        let elapsed = started.elapsed();
        self.record(|metrics| metrics.record_path(raw.is_some()));

        match raw {
            Some(raw) => {
                let commands = assemble(&raw);
                self.emit(
                    LogLevel::Info,
                    PATH_TARGET,
                    "path_found",
                    [
                        json_kv("from", from.as_str()),
                        json_kv("to", to.as_str()),
                        json_kv("commands", commands.as_str()),
                        json_kv("elapsed_us", elapsed.as_micros() as u64),
                    ],
                );
                Ok(PathOutcome::Found {
                    commands,
                    steps: raw.len(),
                    elapsed,
                })
            }
            None => Err(self.report(
                PATH_TARGET,
                MapperError::NoPath {
                    from: from.clone(),
                    to: to.clone(),
                },
            )),
        }
    }

    /// Lines to send to walk to a bookmark or room id.
    pub fn go(&mut self, destination: &str) -> Result<Vec<String>> {
        self.path_to(destination).map(|outcome| outcome.lines())
    }

    pub fn go_to_room(&mut self, target: &RoomId) -> Result<Vec<String>> {
        self.path_to_room(target).map(|outcome| outcome.lines())
    }

    /// Draw the map around the current room. A missing dimension comes from
    /// the configured view size, else from the terminal.
    pub fn render_current_view(&mut self, width: Option<u16>, height: Option<u16>) -> Result<String> {
        let size = match (width, height) {
            (Some(width), Some(height)) => Size::new(width, height),
            (width, height) => {
                let base = self
                    .config
                    .view_size
                    .unwrap_or_else(|| terminal_size_or(self.config.fallback_view));
                Size::new(width.unwrap_or(base.width), height.unwrap_or(base.height))
            }
        };
        let current = self
            .current()
            .cloned()
            .map_err(|err| self.report(RENDER_TARGET, err))?;
        let options = RenderOptions::new(size).with_draw_areas(self.config.draw_areas);
        let view = self
            .renderer
            .render(&self.store, &current, options)
            .map_err(|err| self.report(RENDER_TARGET, err))?;

        self.record(|metrics| metrics.record_render(view.rooms_drawn()));
        self.emit(
            LogLevel::Debug,
            RENDER_TARGET,
            "map_rendered",
            [
                json_kv("room", current.as_str()),
                json_kv("rooms_drawn", view.rooms_drawn()),
                json_kv("columns", view.columns()),
                json_kv("width", size.width),
                json_kv("height", size.height),
            ],
        );
        Ok(view.text)
    }

    /// Name, metadata and exits of `room`, or of the current room.
    pub fn describe_room(&self, room: Option<&RoomId>) -> Result<RoomSummary> {
        let id = match room {
            Some(id) => id.clone(),
            None => self.current()?.clone(),
        };
        let stored = self
            .store
            .room(&id)
            .ok_or_else(|| MapperError::room_not_found(&id))?;
        Ok(RoomSummary {
            num: id,
            name: stored.name.clone(),
            data: stored.data.clone(),
            exits: stored.exits.clone(),
        })
    }

    /// Bookmark the current room under `name`, replacing any previous target.
    pub fn bookmark_current(&mut self, name: &str) -> Result<()> {
        let here = self.current()?.clone();
        self.store.set_bookmark(name, here.clone());
        self.emit(
            LogLevel::Info,
            PATH_TARGET,
            "bookmark_set",
            [json_kv("name", name), json_kv("room", here.as_str())],
        );
        Ok(())
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        self.store.bookmarks()
    }

    /// First room whose name contains `needle`.
    pub fn find_room(&self, needle: &str) -> Option<&RoomId> {
        self.store.find_room_by_name(needle)
    }

    /// World-wide map annotations.
    pub fn areas(&self) -> &MapData {
        self.store.map_data()
    }

    pub fn session_report(&self) -> SessionReport {
        SessionReport {
            visited_today: self.session.visited_count(),
        }
    }

    /// Save the map, emit a metrics snapshot and report today's exploration.
    pub fn finish_session<W: Write>(&mut self, writer: W) -> Result<SessionReport> {
        self.save(writer)?;
        self.emit_metrics();
        let report = self.session_report();
        self.emit(
            LogLevel::Info,
            EXPLORE_TARGET,
            "session_finished",
            [json_kv("visited_today", report.visited_today)],
        );
        Ok(report)
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let handle = self.config.metrics.as_ref()?;
        let guard = handle.lock().ok()?;
        Some(guard.snapshot(self.store.len()))
    }

    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot()) {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
        }
    }

    pub(crate) fn record(&self, update: impl FnOnce(&mut MapperMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut guard);
            }
        }
    }

    pub(crate) fn emit(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, target, message, fields);
            let _ = logger.log_event(event);
        }
    }

    /// Log `err` as a one-line diagnostic and hand it back.
    pub(crate) fn report(&self, target: &str, err: MapperError) -> MapperError {
        self.emit(
            LogLevel::Warn,
            target,
            &err.to_string(),
            [json_kv("kind", err.kind())],
        );
        err
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("rooms", &self.store.len())
            .field("current", &self.session.current())
            .field("draw_areas", &self.config.draw_areas)
            .finish_non_exhaustive()
    }
}
