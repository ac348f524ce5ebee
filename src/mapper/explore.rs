use std::collections::{HashSet, VecDeque};

use super::core::{EXPLORE_TARGET, Mapper};
use crate::error::{MapperError, Result};
use crate::graph::RoomId;
use crate::logging::{LogLevel, json_kv};
use crate::session::AutoVisit;

/// Which rooms count as unexplored and how far the search may roam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnmappedFilter {
    /// Also collect mapped rooms not entered this session.
    pub unvisited_only: bool,
    /// Stay inside the current room's zone.
    pub same_area_only: bool,
    /// Stop at the closest match.
    pub first_only: bool,
}

impl UnmappedFilter {
    /// Stubs reachable inside the current zone.
    pub fn unmapped() -> Self {
        Self {
            unvisited_only: false,
            same_area_only: true,
            first_only: false,
        }
    }

    /// Stubs plus rooms not entered today, inside the current zone.
    pub fn unvisited() -> Self {
        Self {
            unvisited_only: true,
            same_area_only: true,
            first_only: false,
        }
    }

    /// Closest stub inside the current zone.
    pub fn nearest() -> Self {
        Self {
            unvisited_only: false,
            same_area_only: true,
            first_only: true,
        }
    }
}

/// What auto-visit does after arriving at its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoVisitStep {
    Continue {
        target: RoomId,
        commands: Vec<String>,
    },
    Stopped(AutoVisitStop),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoVisitStop {
    LowMoves { moves: u32 },
    ChangedArea { expected: String, found: Option<String> },
    Exhausted,
    Failed(String),
}

impl Mapper {
    /// Rooms worth exploring, closest first.
    ///
    /// Walks outward from the current room over unlocked exits. Stubs are
    /// always collected; with `unvisited_only`, mapped rooms not entered this
    /// session are collected too instead of being walked through.
    pub fn unmapped(&self, filter: UnmappedFilter) -> Result<Vec<RoomId>> {
        let start = self.current()?.clone();
        let start_zone = if filter.same_area_only {
            Some(self.zone_of(&start)?)
        } else {
            None
        };

        let mut found: Vec<RoomId> = Vec::new();
        let mut walked: HashSet<RoomId> = HashSet::new();
        let mut queued: HashSet<RoomId> = HashSet::new();
        let mut queue: VecDeque<RoomId> = VecDeque::new();
        walked.insert(start.clone());
        queued.insert(start.clone());
        queue.push_back(start);

        while let Some(room) = queue.pop_front() {
            queued.remove(&room);
            walked.insert(room.clone());

            for exit in self.store.room_exits(&room).values() {
                if exit.data.is_locked() {
                    continue;
                }
                let target = &exit.tgt;
                if !self.store.is_observed(target) {
                    if filter.first_only {
                        return Ok(vec![target.clone()]);
                    }
                    found.push(target.clone());
                    continue;
                }

                let same_zone = match start_zone.as_deref() {
                    Some(zone) => self.store.room_data(target).zone.as_deref() == Some(zone),
                    None => true,
                };
                if filter.unvisited_only && same_zone && !self.session.has_visited(target) {
                    found.push(target.clone());
                } else if same_zone && !walked.contains(target) && !queued.contains(target) {
                    queued.insert(target.clone());
                    queue.push_back(target.clone());
                }
            }
        }

        let mut seen = HashSet::new();
        found.retain(|id| seen.insert(id.clone()));
        if filter.first_only {
            found.truncate(1);
        }
        Ok(found)
    }

    /// Walk to the closest stub in the current zone.
    pub fn go_unmapped(&mut self) -> Result<Vec<String>> {
        let target = self
            .unmapped(UnmappedFilter::nearest())
            .map_err(|err| self.report(EXPLORE_TARGET, err))?
            .into_iter()
            .next()
            .ok_or(MapperError::NoUnmappedRooms)
            .map_err(|err| self.report(EXPLORE_TARGET, err))?;
        self.go_to_room(&target)
    }

    /// Start visiting unmapped rooms one after another. Bounded runs stay in
    /// the current zone and stop when the character leaves it.
    pub fn auto_visit(&mut self, bounded: bool) -> Result<Vec<String>> {
        let area = if bounded {
            let here = self
                .current()
                .cloned()
                .map_err(|err| self.report(EXPLORE_TARGET, err))?;
            Some(
                self.zone_of(&here)
                    .map_err(|err| self.report(EXPLORE_TARGET, err))?,
            )
        } else {
            None
        };

        match self.plan_auto_visit(area) {
            Ok((target, commands)) => {
                self.emit(
                    LogLevel::Info,
                    EXPLORE_TARGET,
                    "auto_visit_started",
                    [json_kv("target", target.as_str()), json_kv("bounded", bounded)],
                );
                Ok(commands)
            }
            Err(err) => {
                self.session.clear_auto_visit();
                Err(self.report(EXPLORE_TARGET, err))
            }
        }
    }

    pub fn stop_auto_visit(&mut self) -> bool {
        self.session.clear_auto_visit().is_some()
    }

    /// Called after each observation. Returns `None` unless `arrived` is the
    /// current auto-visit target.
    pub(crate) fn advance_auto_visit(&mut self, arrived: &RoomId) -> Option<AutoVisitStep> {
        let plan = self.session.auto_visit()?.clone();
        if plan.target != *arrived {
            return None;
        }

        let stop = match (self.session.moves(), plan.area.as_ref()) {
            (Some(moves), _) if moves < self.config.auto_visit_min_moves => {
                Some(AutoVisitStop::LowMoves { moves })
            }
            (_, Some(expected)) => {
                let found = self.store.room_data(arrived).zone.clone();
                if found.as_deref() != Some(expected.as_str()) {
                    Some(AutoVisitStop::ChangedArea {
                        expected: expected.clone(),
                        found,
                    })
                } else {
                    None
                }
            }
            _ => None,
        };

        let step = match stop {
            Some(stop) => AutoVisitStep::Stopped(stop),
            None => match self.plan_auto_visit(plan.area) {
                Ok((target, commands)) => AutoVisitStep::Continue { target, commands },
                Err(MapperError::NoUnmappedRooms) => AutoVisitStep::Stopped(AutoVisitStop::Exhausted),
                Err(err) => AutoVisitStep::Stopped(AutoVisitStop::Failed(err.to_string())),
            },
        };

        match &step {
            AutoVisitStep::Continue { target, .. } => self.emit(
                LogLevel::Debug,
                EXPLORE_TARGET,
                "auto_visit_next",
                [json_kv("target", target.as_str())],
            ),
            AutoVisitStep::Stopped(reason) => {
                self.session.clear_auto_visit();
                self.emit(
                    LogLevel::Info,
                    EXPLORE_TARGET,
                    "auto_visit_stopped",
                    [json_kv("reason", format!("{reason:?}"))],
                );
            }
        }
        Some(step)
    }

    /// Pick the closest stub, remember it as the target and route there.
    fn plan_auto_visit(&mut self, area: Option<String>) -> Result<(RoomId, Vec<String>)> {
        let filter = UnmappedFilter {
            unvisited_only: false,
            same_area_only: area.is_some(),
            first_only: true,
        };
        let target = self
            .unmapped(filter)?
            .into_iter()
            .next()
            .ok_or(MapperError::NoUnmappedRooms)?;
        self.session.set_auto_visit(AutoVisit {
            area,
            target: target.clone(),
        });
        let commands = self.go_to_room(&target)?;
        Ok((target, commands))
    }

    fn zone_of(&self, room: &RoomId) -> Result<String> {
        self.store
            .room_data(room)
            .zone
            .clone()
            .ok_or_else(|| MapperError::MissingMetadata {
                room: room.clone(),
                field: "zone",
            })
    }
}
