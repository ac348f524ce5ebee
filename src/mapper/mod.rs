//! The mapper: event intake, queries and exploration over one map.
//!
//! [`Mapper`] ties the graph store, the session state and the renderer
//! together and reports through the optional logger and metrics handles in
//! [`MapperConfig`].

mod config;
mod core;
mod exits;
mod explore;
mod observe;

pub use config::{FALLBACK_VIEW, MapperConfig};
pub use core::{Mapper, PathOutcome, RoomSummary, SessionReport};
pub use exits::DEFAULT_LOCK_LEVEL;
pub use explore::{AutoVisitStep, AutoVisitStop, UnmappedFilter};
pub use observe::{ObserveOutcome, RoomObservation};

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use super::*;
    use crate::error::{MapperError, Missing};
    use crate::geometry::Size;
    use crate::graph::{MapStore, RoomId};
    use crate::logging::{LogLevel, Logger, MemorySink};

    fn logged_mapper() -> (Mapper, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::from_shared(sink.clone());
        let mut config = MapperConfig::default()
            .with_logger(logger)
            .with_view_size(Size::new(11, 4));
        config.enable_metrics();
        (Mapper::new(config).unwrap(), sink)
    }

    fn walk_corridor(mapper: &mut Mapper) {
        mapper
            .observe(RoomObservation::new("3", "East", "z").with_exit("w", "2"))
            .unwrap();
        mapper
            .observe(RoomObservation::new("2", "Middle", "z").with_exit("w", "1").with_exit("e", "3"))
            .unwrap();
        mapper
            .observe(RoomObservation::new("1", "West", "z").with_exit("e", "2"))
            .unwrap();
    }

    #[test]
    fn paths_resolve_bookmarks_and_room_ids() {
        let (mut mapper, _) = logged_mapper();
        walk_corridor(&mut mapper);
        mapper.observe(RoomObservation::new("3", "East", "z").with_exit("w", "2")).unwrap();
        mapper.bookmark_current("inn").unwrap();
        mapper.observe(RoomObservation::new("1", "West", "z").with_exit("e", "2")).unwrap();

        assert_eq!(mapper.go("inn").unwrap(), vec!["run 2e".to_string()]);
        assert_eq!(mapper.go("2").unwrap(), vec!["e".to_string()]);
        assert_eq!(mapper.path_to("1").unwrap(), PathOutcome::AlreadyThere);
        assert!(mapper.go("1").unwrap().is_empty());
        assert!(matches!(
            mapper.go("nowhere"),
            Err(MapperError::NotFound(Missing::Bookmark(_)))
        ));
        assert!(matches!(mapper.go("77"), Err(MapperError::NoPath { .. })));
    }

    #[test]
    fn path_outcome_reports_steps() {
        let (mut mapper, _) = logged_mapper();
        walk_corridor(&mut mapper);
        match mapper.path_to("3").unwrap() {
            PathOutcome::Found { commands, steps, .. } => {
                assert_eq!(commands, "run 2e");
                assert_eq!(steps, 2);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn queries_need_a_current_room() {
        let (mut mapper, _) = logged_mapper();
        assert!(matches!(
            mapper.current(),
            Err(MapperError::NotFound(Missing::CurrentRoom))
        ));
        assert!(mapper.go("1").is_err());
        assert!(mapper.render_current_view(None, None).is_err());
        assert!(mapper.bookmark_current("x").is_err());
    }

    #[test]
    fn renders_the_corridor_around_the_current_room() {
        let (mut mapper, _) = logged_mapper();
        walk_corridor(&mut mapper);
        assert_eq!(mapper.render_current_view(None, None).unwrap(), "     ░─█─█ \n");
        assert_eq!(
            mapper.render_current_view(Some(11), Some(4)).unwrap(),
            "     ░─█─█ \n"
        );
    }

    #[test]
    fn a_single_dimension_overrides_only_that_side() {
        let (mut mapper, _) = logged_mapper();
        walk_corridor(&mut mapper);
        assert_eq!(mapper.render_current_view(Some(7), None).unwrap(), "   ░─█─\n");
        assert_eq!(mapper.render_current_view(None, Some(4)).unwrap(), "     ░─█─█ \n");
    }

    #[test]
    fn describe_and_find_rooms() {
        let (mut mapper, _) = logged_mapper();
        walk_corridor(&mut mapper);
        let here = mapper.describe_room(None).unwrap();
        assert_eq!(here.num, RoomId::from("1"));
        assert_eq!(here.name.as_deref(), Some("West"));
        assert!(here.to_string().contains("\"zone\": \"z\""));
        assert_eq!(mapper.find_room("Mid"), Some(&RoomId::from("2")));
        assert_eq!(mapper.find_room("Attic"), None);
        assert!(mapper.describe_room(Some(&"42".into())).is_err());
    }

    #[test]
    fn save_and_load_track_unsaved_changes() {
        let (mut mapper, sink) = logged_mapper();
        assert!(mapper.load(None::<Cursor<Vec<u8>>>).is_none());
        assert!(!mapper.has_unsaved_changes());

        walk_corridor(&mut mapper);
        assert!(mapper.has_unsaved_changes());

        let mut buffer = Vec::new();
        mapper.save(&mut buffer).unwrap();
        assert!(!mapper.has_unsaved_changes());

        let (mut other, _) = logged_mapper();
        assert!(other.load(Some(Cursor::new(buffer))).is_none());
        assert_eq!(other.store().len(), 3);
        assert!(!other.has_unsaved_changes());

        let messages = sink.messages();
        assert!(messages.iter().any(|m| m == "created_new_map"));
        assert!(messages.iter().any(|m| m == "snapshot_saved"));
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_an_empty_map() {
        let (mut mapper, sink) = logged_mapper();
        walk_corridor(&mut mapper);
        let fallback = mapper.load(Some(Cursor::new(b"{not json".to_vec())));
        assert!(matches!(fallback, Some(MapperError::Snapshot(_))));
        assert!(mapper.store().is_empty());
        let warned = sink
            .events()
            .into_iter()
            .any(|event| event.level == LogLevel::Warn && event.message == "snapshot_unreadable_created_new_map");
        assert!(warned);
    }

    #[test]
    fn failures_are_logged_with_their_kind() {
        let (mut mapper, sink) = logged_mapper();
        walk_corridor(&mut mapper);
        let _ = mapper.go("77");
        let event = sink
            .events()
            .into_iter()
            .find(|event| event.level == LogLevel::Warn)
            .unwrap();
        assert_eq!(event.target, "room_mapper::path");
        assert_eq!(event.field("kind").and_then(|v| v.as_str()), Some("no_path"));
    }

    #[test]
    fn finish_session_saves_and_reports_metrics() {
        let (mut mapper, sink) = logged_mapper();
        walk_corridor(&mut mapper);
        mapper.go("3").unwrap();
        mapper.render_current_view(None, None).unwrap();

        let mut buffer = Vec::new();
        let report = mapper.finish_session(&mut buffer).unwrap();
        assert_eq!(report.visited_today, 3);
        assert_eq!(MapStore::read_snapshot(buffer.as_slice()).unwrap().len(), 3);

        let snapshot = mapper.metrics_snapshot().unwrap();
        assert_eq!(snapshot.rooms_known, 3);
        assert!(sink.messages().iter().any(|m| m == "mapper_metrics"));
        assert!(sink.messages().iter().any(|m| m == "session_finished"));
    }
}
