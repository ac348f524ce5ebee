//! Snapshot codec.
//!
//! Wire form: `{"data": {...}, "bookmarks": {name: id}, "rooms": {id: room}}`.
//! Room order in the `rooms` object is the store's insertion order, both ways.

use std::fmt;
use std::io::{Read, Write};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::core::{Bookmarks, MapData, MapStore};
use super::types::{Room, RoomId};
use crate::error::{MapperError, Result};

#[derive(Serialize)]
struct SnapshotRef<'a> {
    data: &'a MapData,
    bookmarks: &'a Bookmarks,
    rooms: RoomsInOrder<'a>,
}

struct RoomsInOrder<'a>(&'a MapStore);

impl Serialize for RoomsInOrder<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, room) in self.0.rooms() {
            map.serialize_entry(id, room)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct SnapshotOwned {
    #[serde(default)]
    data: MapData,
    #[serde(default)]
    bookmarks: Bookmarks,
    #[serde(default)]
    rooms: OrderedRooms,
}

#[derive(Default)]
struct OrderedRooms(Vec<(RoomId, Room)>);

impl<'de> Deserialize<'de> for OrderedRooms {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RoomsVisitor;

        impl<'de> Visitor<'de> for RoomsVisitor {
            type Value = OrderedRooms;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of room id to room")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rooms = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, room)) = access.next_entry::<RoomId, Room>()? {
                    rooms.push((id, room));
                }
                Ok(OrderedRooms(rooms))
            }
        }

        deserializer.deserialize_map(RoomsVisitor)
    }
}

/// Result of a lenient load: the store plus the reason a fresh one was used.
#[derive(Debug)]
pub struct LoadOutcome {
    pub store: MapStore,
    pub fallback: Option<MapperError>,
}

impl MapStore {
    pub fn to_snapshot_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot_ref())?)
    }

    pub fn from_snapshot_str(raw: &str) -> Result<Self> {
        let owned: SnapshotOwned = serde_json::from_str(raw)?;
        Ok(Self::from_owned(owned))
    }

    pub fn write_snapshot<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer(&mut writer, &self.snapshot_ref())?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_snapshot<R: Read>(mut reader: R) -> Result<Self> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        Self::from_snapshot_str(&raw)
    }

    /// Decode a snapshot, falling back to an empty store when the input is
    /// absent, unreadable or corrupt.
    pub fn load_or_default<R: Read>(reader: Option<R>) -> LoadOutcome {
        match reader.map(Self::read_snapshot) {
            None => LoadOutcome {
                store: Self::new(),
                fallback: None,
            },
            Some(Ok(store)) => LoadOutcome {
                store,
                fallback: None,
            },
            Some(Err(err)) => LoadOutcome {
                store: Self::new(),
                fallback: Some(err),
            },
        }
    }

    /// blake3 digest of the canonical snapshot encoding.
    pub fn fingerprint(&self) -> Result<blake3::Hash> {
        let encoded = self.to_snapshot_string()?;
        Ok(blake3::hash(encoded.as_bytes()))
    }

    fn snapshot_ref(&self) -> SnapshotRef<'_> {
        SnapshotRef {
            data: self.map_data(),
            bookmarks: self.bookmarks(),
            rooms: RoomsInOrder(self),
        }
    }

    fn from_owned(owned: SnapshotOwned) -> Self {
        let mut store = Self::new();
        for (id, room) in owned.rooms.0 {
            store.insert(id, room);
        }
        store.set_bookmarks(owned.bookmarks);
        store.set_map_data(owned.data);
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Exit, ExitData, Exits, RoomData, RoomState};
    use serde_json::{Value, json};

    fn sample() -> MapStore {
        let mut store = MapStore::new();
        let mut exits = Exits::new();
        exits.insert("e".into(), Exit::to("753").with_data(ExitData::default().with_len(3)));
        exits.insert("open door s;s".into(), Exit::to("114"));
        store.replace_room("752", Some("Church Entry".into()), RoomData::new("13", "Temperate Building"), exits);
        store.insert_stub(&"753".into());
        store.insert_stub(&"114".into());
        store.set_bookmark("church", "752");
        store
    }

    #[test]
    fn wire_form_has_three_top_level_fields() {
        let raw = sample().to_snapshot_string().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(value["bookmarks"]["church"], json!("752"));
        assert_eq!(value["rooms"]["752"]["exits"]["e"], json!({"tgt": "753", "data": {"len": 3}}));
        assert_eq!(value["rooms"]["753"], json!({"name": null, "data": {}, "exits": {}}));
    }

    #[test]
    fn decoding_keeps_room_order_and_stub_status() {
        let raw = r#"{"data": {}, "bookmarks": {},
            "rooms": {"9": {"name": "Zeta", "data": {"zone": "a"}, "exits": {}},
                      "1": {"name": null, "data": {}, "exits": {}},
                      "5": {"name": "Zeta Annex", "data": {"zone": "a"}, "exits": {}}}}"#;
        let store = MapStore::from_snapshot_str(raw).unwrap();
        let ids: Vec<&str> = store.rooms().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["9", "1", "5"]);
        assert_eq!(store.room_state(&"1".into()), RoomState::Stub);
        assert_eq!(store.find_room_by_name("Zeta"), Some(&RoomId::from("9")));
    }

    #[test]
    fn reencoding_a_decoded_snapshot_is_stable() {
        let original = sample();
        let raw = original.to_snapshot_string().unwrap();
        let decoded = MapStore::from_snapshot_str(&raw).unwrap();
        assert_eq!(
            original.fingerprint().unwrap(),
            decoded.fingerprint().unwrap()
        );
    }

    #[test]
    fn corrupt_or_missing_snapshot_falls_back_to_empty_store() {
        let outcome = MapStore::load_or_default(Some("{not json".as_bytes()));
        assert!(outcome.store.is_empty());
        assert!(matches!(outcome.fallback, Some(MapperError::Snapshot(_))));

        let outcome = MapStore::load_or_default(None::<&[u8]>);
        assert!(outcome.store.is_empty());
        assert!(outcome.fallback.is_none());
    }

    #[test]
    fn writer_and_reader_agree() {
        let mut buffer = Vec::new();
        sample().write_snapshot(&mut buffer).unwrap();
        let store = MapStore::read_snapshot(buffer.as_slice()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.exit_data(&"752".into(), "e").unwrap().len(), 3);
    }
}
