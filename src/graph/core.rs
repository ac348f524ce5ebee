use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use super::types::{Exit, ExitData, Exits, Room, RoomData, RoomId};
use crate::error::{MapperError, Result};

/// Free-form, world-wide annotations.
pub type MapData = Map<String, Value>;

/// Bookmark name to room id.
pub type Bookmarks = BTreeMap<String, RoomId>;

static NO_EXITS: Exits = BTreeMap::new();
static NO_DATA: RoomData = RoomData::EMPTY;

/// How much the store knows about a room id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    /// Never referenced.
    Unknown,
    /// Referenced by an exit but never observed.
    Stub,
    Observed,
}

/// Rooms, exits, bookmarks and map metadata. Pure data access.
///
/// Rooms keep the position of their first insertion; replacing a room keeps
/// that position. Name searches walk rooms in this order.
#[derive(Debug, Clone, Default)]
pub struct MapStore {
    rooms: HashMap<RoomId, Room>,
    order: Vec<RoomId>,
    bookmarks: Bookmarks,
    data: MapData,
}

impl MapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a room, replacing any previous entry (exits included).
    pub fn replace_room(
        &mut self,
        id: impl Into<RoomId>,
        name: Option<String>,
        data: RoomData,
        exits: Exits,
    ) {
        self.insert(id.into(), Room::new(name, data, exits));
    }

    pub(crate) fn insert(&mut self, id: RoomId, room: Room) {
        if !self.rooms.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.rooms.insert(id, room);
    }

    /// Add a stub for `id` unless the id is already known. Returns whether a
    /// stub was created.
    pub fn insert_stub(&mut self, id: &RoomId) -> bool {
        if self.rooms.contains_key(id) {
            return false;
        }
        self.insert(id.clone(), Room::stub());
        true
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn room_state(&self, id: &RoomId) -> RoomState {
        match self.rooms.get(id) {
            None => RoomState::Unknown,
            Some(room) if room.is_stub() => RoomState::Stub,
            Some(_) => RoomState::Observed,
        }
    }

    /// Whether `id` was observed (known and not a stub).
    pub fn is_observed(&self, id: &RoomId) -> bool {
        self.room_state(id) == RoomState::Observed
    }

    pub fn contains(&self, id: &RoomId) -> bool {
        self.rooms.contains_key(id)
    }

    /// Exits of `id`, empty for unknown rooms.
    pub fn room_exits(&self, id: &RoomId) -> &Exits {
        self.rooms.get(id).map(|room| &room.exits).unwrap_or(&NO_EXITS)
    }

    /// Metadata of `id`, empty for unknown rooms.
    pub fn room_data(&self, id: &RoomId) -> &RoomData {
        self.rooms.get(id).map(|room| &room.data).unwrap_or(&NO_DATA)
    }

    pub fn room_name(&self, id: &RoomId) -> Option<&str> {
        self.rooms.get(id).and_then(|room| room.name.as_deref())
    }

    pub fn exit(&self, source: &RoomId, label: &str) -> Result<&Exit> {
        let room = self
            .rooms
            .get(source)
            .ok_or_else(|| MapperError::room_not_found(source))?;
        room.exits
            .get(label)
            .ok_or_else(|| MapperError::exit_not_found(source, label))
    }

    pub fn exit_data(&self, source: &RoomId, label: &str) -> Result<&ExitData> {
        self.exit(source, label).map(|exit| &exit.data)
    }

    /// Replace the data bag of one exit.
    pub fn set_exit_data(&mut self, source: &RoomId, label: &str, data: ExitData) -> Result<()> {
        let room = self
            .rooms
            .get_mut(source)
            .ok_or_else(|| MapperError::room_not_found(source))?;
        let exit = room
            .exits
            .get_mut(label)
            .ok_or_else(|| MapperError::exit_not_found(source, label))?;
        exit.data = data;
        Ok(())
    }

    /// First room, in insertion order, whose name contains `needle`. Not a
    /// ranked search: the first hit wins.
    pub fn find_room_by_name(&self, needle: &str) -> Option<&RoomId> {
        self.order.iter().find(|id| {
            self.rooms
                .get(*id)
                .and_then(|room| room.name.as_deref())
                .is_some_and(|name| name.contains(needle))
        })
    }

    /// Rooms in insertion order.
    pub fn rooms(&self) -> impl Iterator<Item = (&RoomId, &Room)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.rooms.get(id).map(|room| (id, room)))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        &self.bookmarks
    }

    pub fn bookmark(&self, name: &str) -> Option<&RoomId> {
        self.bookmarks.get(name)
    }

    pub fn set_bookmark(&mut self, name: impl Into<String>, id: impl Into<RoomId>) {
        self.bookmarks.insert(name.into(), id.into());
    }

    pub fn set_bookmarks(&mut self, bookmarks: Bookmarks) {
        self.bookmarks = bookmarks;
    }

    pub fn map_data(&self) -> &MapData {
        &self.data
    }

    pub fn set_map_data(&mut self, data: MapData) {
        self.data = data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(store: &mut MapStore, id: &str, name: &str) {
        store.replace_room(id, Some(name.to_string()), RoomData::new("1", "road"), Exits::new());
    }

    #[test]
    fn replace_room_drops_previous_exits() {
        let mut store = MapStore::new();
        let mut exits = Exits::new();
        exits.insert("n".into(), Exit::to("2"));
        store.replace_room("1", Some("Gate".into()), RoomData::default(), exits);
        assert_eq!(store.room_exits(&"1".into()).len(), 1);

        store.replace_room("1", Some("Gate".into()), RoomData::default(), Exits::new());
        assert!(store.room_exits(&"1".into()).is_empty());
    }

    #[test]
    fn stub_is_distinct_from_unknown() {
        let mut store = MapStore::new();
        let mut exits = Exits::new();
        exits.insert("e".into(), Exit::to("2"));
        store.replace_room("1", Some("Gate".into()), RoomData::new("1", "road"), exits);
        assert!(store.insert_stub(&"2".into()));
        assert!(!store.insert_stub(&"1".into()));

        store.replace_room("2", None, RoomData::default(), Exits::new());
        assert!(store.room(&"2".into()).is_some());
        assert_eq!(store.room_state(&"2".into()), RoomState::Stub);
        assert_eq!(store.room_state(&"3".into()), RoomState::Unknown);
        assert_eq!(store.room_state(&"1".into()), RoomState::Observed);
        assert!(store.room_exits(&"3".into()).is_empty());
        assert!(store.room_data(&"3".into()).is_empty());
    }

    #[test]
    fn exit_data_requires_existing_room_and_label() {
        let mut store = MapStore::new();
        let mut exits = Exits::new();
        exits.insert("s".into(), Exit::to("9"));
        store.replace_room("1", Some("Hall".into()), RoomData::default(), exits);

        store
            .set_exit_data(&"1".into(), "s", ExitData::default().with_lock(3))
            .unwrap();
        assert_eq!(store.exit_data(&"1".into(), "s").unwrap().lock, Some(3));

        let missing_label = store.set_exit_data(&"1".into(), "n", ExitData::default());
        assert!(matches!(missing_label, Err(MapperError::NotFound(_))));
        let missing_room = store.exit_data(&"5".into(), "s");
        assert!(matches!(missing_room, Err(MapperError::NotFound(_))));
    }

    #[test]
    fn find_by_name_returns_first_inserted_match() {
        let mut store = MapStore::new();
        named(&mut store, "30", "Dusty Road");
        store.insert_stub(&"31".into());
        named(&mut store, "10", "Road");
        named(&mut store, "20", "Old Road Inn");

        assert_eq!(store.find_room_by_name("Road"), Some(&RoomId::from("30")));
        assert_eq!(store.find_room_by_name("Inn"), Some(&RoomId::from("20")));
        assert_eq!(store.find_room_by_name("Castle"), None);

        // Replacing a room keeps its slot.
        named(&mut store, "30", "Dusty Road");
        assert_eq!(store.find_room_by_name("Road"), Some(&RoomId::from("30")));
    }

    #[test]
    fn bookmarks_and_map_data_replace_whole_values() {
        let mut store = MapStore::new();
        store.set_bookmark("inn", "20");
        store.set_bookmark("bank", "20");
        assert_eq!(store.bookmark("inn"), Some(&RoomId::from("20")));

        store.set_bookmarks(Bookmarks::new());
        assert!(store.bookmarks().is_empty());

        let mut data = MapData::new();
        data.insert("author".into(), Value::from("me"));
        store.set_map_data(data.clone());
        store.set_map_data(MapData::new());
        assert!(store.map_data().is_empty());
    }
}
