use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Running counters for one mapper session.
#[derive(Debug, Default, Clone)]
pub struct MapperMetrics {
    observations: u64,
    stubs_created: u64,
    path_queries: u64,
    paths_found: u64,
    paths_missing: u64,
    renders: u64,
    rooms_drawn: u64,
}

impl MapperMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_observation(&mut self, stubs_created: usize) {
        self.observations = self.observations.saturating_add(1);
        self.stubs_created = self.stubs_created.saturating_add(stubs_created as u64);
    }

    pub fn record_path(&mut self, found: bool) {
        self.path_queries = self.path_queries.saturating_add(1);
        if found {
            self.paths_found = self.paths_found.saturating_add(1);
        } else {
            self.paths_missing = self.paths_missing.saturating_add(1);
        }
    }

    pub fn record_render(&mut self, rooms_drawn: usize) {
        self.renders = self.renders.saturating_add(1);
        self.rooms_drawn = self.rooms_drawn.saturating_add(rooms_drawn as u64);
    }

    pub fn snapshot(&self, rooms_known: usize) -> MetricSnapshot {
        MetricSnapshot {
            rooms_known: rooms_known as u64,
            observations: self.observations,
            stubs_created: self.stubs_created,
            path_queries: self.path_queries,
            paths_found: self.paths_found,
            paths_missing: self.paths_missing,
            renders: self.renders,
            rooms_drawn: self.rooms_drawn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub rooms_known: u64,
    pub observations: u64,
    pub stubs_created: u64,
    pub path_queries: u64,
    pub paths_found: u64,
    pub paths_missing: u64,
    pub renders: u64,
    pub rooms_drawn: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("rooms_known".to_string(), json!(self.rooms_known));
        map.insert("observations".to_string(), json!(self.observations));
        map.insert("stubs_created".to_string(), json!(self.stubs_created));
        map.insert("path_queries".to_string(), json!(self.path_queries));
        map.insert("paths_found".to_string(), json!(self.paths_found));
        map.insert("paths_missing".to_string(), json!(self.paths_missing));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("rooms_drawn".to_string(), json!(self.rooms_drawn));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "mapper_metrics", self.as_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_outcomes_are_split() {
        let mut metrics = MapperMetrics::new();
        metrics.record_path(true);
        metrics.record_path(false);
        metrics.record_path(true);
        let snapshot = metrics.snapshot(4);
        assert_eq!(snapshot.path_queries, 3);
        assert_eq!(snapshot.paths_found, 2);
        assert_eq!(snapshot.paths_missing, 1);
        assert_eq!(snapshot.rooms_known, 4);
    }

    #[test]
    fn snapshot_event_carries_counters() {
        let mut metrics = MapperMetrics::new();
        metrics.record_observation(2);
        metrics.record_render(5);
        let event = metrics.snapshot(3).to_log_event("room_mapper::metrics");
        assert_eq!(event.message, "mapper_metrics");
        assert_eq!(event.field("stubs_created"), Some(&json!(2)));
        assert_eq!(event.field("rooms_drawn"), Some(&json!(5)));
    }
}
