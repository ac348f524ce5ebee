use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::core::{Mapper, OBSERVE_TARGET};
use super::explore::AutoVisitStep;
use crate::direction::door_label;
use crate::error::Result;
use crate::graph::{Exit, Exits, RoomData, RoomId};
use crate::logging::{LogLevel, json_kv};

/// A "room observed" record from the game feed.
///
/// Exit labels arrive in whatever case the server uses; `exit_kw` maps a
/// direction to the keyword of the door blocking it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomObservation {
    pub num: RoomId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub terrain: Option<String>,
    #[serde(default)]
    pub exits: BTreeMap<String, RoomId>,
    #[serde(default)]
    pub exit_kw: BTreeMap<String, String>,
}

impl RoomObservation {
    pub fn new(num: impl Into<RoomId>, name: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            num: num.into(),
            name: name.into(),
            zone: Some(zone.into()),
            terrain: None,
            exits: BTreeMap::new(),
            exit_kw: BTreeMap::new(),
        }
    }

    pub fn with_terrain(mut self, terrain: impl Into<String>) -> Self {
        self.terrain = Some(terrain.into());
        self
    }

    pub fn with_exit(mut self, label: impl Into<String>, target: impl Into<RoomId>) -> Self {
        self.exits.insert(label.into(), target.into());
        self
    }

    pub fn with_door(mut self, direction: impl Into<String>, door: impl Into<String>) -> Self {
        self.exit_kw.insert(direction.into(), door.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserveOutcome {
    pub room: RoomId,
    pub stubs_created: usize,
    pub auto_visit: Option<AutoVisitStep>,
}

impl Mapper {
    /// Merge an observed room into the map and make it the current room.
    ///
    /// Unlike [`Mapper::replace_room`], exits recorded earlier survive:
    /// custom exits stay, and an observed exit that still leads to the same
    /// room keeps its data. Unknown targets get stubs so paths can run
    /// through them.
    pub fn observe(&mut self, observation: RoomObservation) -> Result<ObserveOutcome> {
        let RoomObservation {
            num: id,
            name,
            zone,
            terrain,
            exits: observed,
            exit_kw,
        } = observation;

        self.session.enter(id.clone());

        let mut exits = self.store.room_exits(&id).clone();
        let mut stubs_created = 0;
        for (label, target) in &observed {
            merge_exit(&mut exits, label.to_lowercase(), target);
            if *target != id && self.store.insert_stub(target) {
                stubs_created += 1;
            }
        }
        for (direction, door) in &exit_kw {
            let direction = direction.to_lowercase();
            let Some(target) = exits.get(&direction).map(|exit| exit.tgt.clone()) else {
                continue;
            };
            merge_exit(&mut exits, door_label(door, &direction), &target);
        }

        let mut data = self.store.room_data(&id).clone();
        data.zone = zone;
        data.terrain = terrain;
        let exit_count = exits.len();
        self.store.replace_room(id.clone(), Some(name), data, exits);

        self.record(|metrics| metrics.record_observation(stubs_created));
        self.emit(
            LogLevel::Debug,
            OBSERVE_TARGET,
            "room_observed",
            [
                json_kv("room", id.as_str()),
                json_kv("exits", exit_count),
                json_kv("stubs_created", stubs_created),
            ],
        );

        let auto_visit = self.advance_auto_visit(&id);
        Ok(ObserveOutcome {
            room: id,
            stubs_created,
            auto_visit,
        })
    }

    /// Replace the current room with an empty exit set, keeping its name and
    /// metadata.
    pub fn forget_exits(&mut self) -> Result<()> {
        let here = self.current()?.clone();
        let name = self.store.room_name(&here).map(str::to_string);
        let data: RoomData = self.store.room_data(&here).clone();
        self.store.replace_room(here.clone(), name, data, Exits::new());
        self.emit(
            LogLevel::Info,
            OBSERVE_TARGET,
            "exits_forgotten",
            [json_kv("room", here.as_str())],
        );
        Ok(())
    }
}

/// Observed exits win on target; data survives only while the target holds.
fn merge_exit(exits: &mut Exits, label: String, target: &RoomId) {
    match exits.get_mut(&label) {
        Some(existing) if existing.tgt == *target => {}
        Some(existing) => *existing = Exit::to(target.clone()),
        None => {
            exits.insert(label, Exit::to(target.clone()));
        }
    }
}
