use super::core::{EXITS_TARGET, Mapper, RoomSummary};
use crate::compress::command_lines;
use crate::direction::label_direction;
use crate::error::{MapperError, Missing, Result};
use crate::graph::{Exit, RoomId};
use crate::logging::{LogLevel, json_kv};
use crate::session::PendingExit;

/// Lock level applied when none is given.
pub const DEFAULT_LOCK_LEVEL: i64 = -1;

impl Mapper {
    /// Target of the current room's exit `label` (case-insensitive).
    pub fn room_by_direction(&self, label: &str) -> Result<RoomId> {
        let here = self.current()?;
        let exit = self.store.exit(here, &label.to_lowercase())?;
        Ok(exit.tgt.clone())
    }

    /// Mark an exit of the current room as locked. Locked exits are ignored
    /// by the unmapped search.
    pub fn lock_exit(&mut self, label: &str, level: Option<i64>) -> Result<RoomSummary> {
        let here = self
            .current()
            .cloned()
            .map_err(|err| self.report(EXITS_TARGET, err))?;
        let label = label.to_lowercase();
        let level = level.unwrap_or(DEFAULT_LOCK_LEVEL);
        let data = self
            .store
            .exit_data(&here, &label)
            .map(|data| data.clone().with_lock(level))
            .map_err(|err| self.report(EXITS_TARGET, err))?;
        self.store.set_exit_data(&here, &label, data)?;
        self.emit(
            LogLevel::Info,
            EXITS_TARGET,
            "exit_locked",
            [
                json_kv("room", here.as_str()),
                json_kv("label", label.as_str()),
                json_kv("level", level),
            ],
        );
        self.describe_room(Some(&here))
    }

    /// Stretch the exit `label` by two cells, on both sides of the passage.
    pub fn inc_exit(&mut self, label: &str) -> Result<u32> {
        self.adjust_exit_len(label, 2)
    }

    pub fn dec_exit(&mut self, label: &str) -> Result<u32> {
        self.adjust_exit_len(label, -2)
    }

    /// Shift the visual length of `label` and of the matching exit back.
    /// Lengths floor at 1. Returns the new length of `label`.
    pub fn adjust_exit_len(&mut self, label: &str, delta: i32) -> Result<u32> {
        let here = self
            .current()
            .cloned()
            .map_err(|err| self.report(EXITS_TARGET, err))?;
        let label = label.to_lowercase();
        let there = self
            .store
            .exit(&here, &label)
            .map(|exit| exit.tgt.clone())
            .map_err(|err| self.report(EXITS_TARGET, err))?;
        let direction = label_direction(&label);

        let forward: Vec<String> = self
            .store
            .room_exits(&here)
            .iter()
            .filter(|(other, exit)| {
                exit.tgt == there
                    && match direction {
                        Some(direction) => label_direction(other) == Some(direction),
                        None => **other == label,
                    }
            })
            .map(|(other, _)| other.clone())
            .collect();
        self.shift_lengths(&here, &forward, delta)?;

        if there != here {
            let back = self.store.room_exits(&there);
            let mut reverse: Vec<String> = back
                .iter()
                .filter(|(other, exit)| {
                    exit.tgt == here
                        && direction.is_some()
                        && label_direction(other) == direction.map(|d| d.opposite())
                })
                .map(|(other, _)| other.clone())
                .collect();
            if reverse.is_empty() {
                reverse.extend(
                    back.iter()
                        .find(|(_, exit)| exit.tgt == here)
                        .map(|(other, _)| other.clone()),
                );
            }
            self.shift_lengths(&there, &reverse, delta)?;
        }

        let len = self.store.exit_data(&here, &label)?.len();
        self.emit(
            LogLevel::Info,
            EXITS_TARGET,
            "exit_length_changed",
            [
                json_kv("room", here.as_str()),
                json_kv("label", label.as_str()),
                json_kv("len", len),
            ],
        );
        Ok(len)
    }

    fn shift_lengths(&mut self, room: &RoomId, labels: &[String], delta: i32) -> Result<()> {
        for label in labels {
            let mut data = self.store.exit_data(room, label)?.clone();
            data.adjust_len(delta);
            self.store.set_exit_data(room, label, data)?;
        }
        Ok(())
    }

    /// Remember the current room and send `command`; the next
    /// [`Mapper::finish_custom_exit`] links it to wherever it led.
    pub fn begin_custom_exit(&mut self, command: &str) -> Result<Vec<String>> {
        let here = self
            .current()
            .cloned()
            .map_err(|err| self.report(EXITS_TARGET, err))?;
        let pending = PendingExit {
            command: command.to_string(),
            from: here.clone(),
            name: self.store.room_name(&here).map(str::to_string),
            data: self.store.room_data(&here).clone(),
            exits: self.store.room_exits(&here).clone(),
        };
        self.session.set_pending_exit(pending);
        self.emit(
            LogLevel::Info,
            EXITS_TARGET,
            "custom_exit_started",
            [json_kv("room", here.as_str()), json_kv("command", command)],
        );
        Ok(command_lines(command))
    }

    /// Add the pending command as an exit from its origin to the current
    /// room. The origin is rewritten as it was recorded.
    pub fn finish_custom_exit(&mut self) -> Result<RoomSummary> {
        let here = self
            .current()
            .cloned()
            .map_err(|err| self.report(EXITS_TARGET, err))?;
        let PendingExit {
            command,
            from,
            name,
            data,
            mut exits,
        } = self
            .session
            .take_pending_exit()
            .ok_or(MapperError::NotFound(Missing::CustomExit))
            .map_err(|err| self.report(EXITS_TARGET, err))?;

        exits.insert(command.clone(), Exit::to(here.clone()));
        self.store.replace_room(from.clone(), name, data, exits);
        self.emit(
            LogLevel::Info,
            EXITS_TARGET,
            "custom_exit_added",
            [
                json_kv("from", from.as_str()),
                json_kv("to", here.as_str()),
                json_kv("command", command),
            ],
        );
        self.describe_room(Some(&from))
    }

    /// Drop the pending custom exit. Returns whether one was pending.
    pub fn abort_custom_exit(&mut self) -> bool {
        let aborted = self.session.take_pending_exit().is_some();
        if aborted {
            self.emit(LogLevel::Info, EXITS_TARGET, "custom_exit_aborted", [json_kv("aborted", true)]);
        }
        aborted
    }
}
