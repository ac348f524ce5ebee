use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Stable room key. Numeric ids from the event feed are stored as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RoomId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RoomId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RoomIdVisitor;

        impl Visitor<'_> for RoomIdVisitor {
            type Value = RoomId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a room id as string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RoomId, E> {
                Ok(RoomId::from(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<RoomId, E> {
                Ok(RoomId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RoomId, E> {
                Ok(RoomId::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RoomId, E> {
                Ok(RoomId(v.to_string()))
            }
        }

        deserializer.deserialize_any(RoomIdVisitor)
    }
}

/// Per-room metadata. Unknown keys survive a load/save cycle through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RoomData {
    pub(crate) const EMPTY: RoomData = RoomData {
        zone: None,
        terrain: None,
        extra: BTreeMap::new(),
    };

    pub fn new(zone: impl Into<String>, terrain: impl Into<String>) -> Self {
        Self {
            zone: Some(zone.into()),
            terrain: Some(terrain.into()),
            extra: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.zone.is_none() && self.terrain.is_none() && self.extra.is_empty()
    }
}

/// Per-exit attributes. `len` is a visual length and never drops below 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExitData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    len: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ExitData {
    pub fn is_empty(&self) -> bool {
        self.lock.is_none() && self.len.is_none() && self.extra.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    pub fn len(&self) -> u32 {
        self.len.unwrap_or(1).max(1)
    }

    pub fn set_len(&mut self, len: u32) {
        self.len = Some(len.max(1));
    }

    /// Shift the visual length by `delta`, flooring at 1.
    pub fn adjust_len(&mut self, delta: i32) {
        let next = (self.len() as i64 + delta as i64).clamp(1, u32::MAX as i64);
        self.len = Some(next as u32);
    }

    pub fn with_len(mut self, len: u32) -> Self {
        self.set_len(len);
        self
    }

    pub fn with_lock(mut self, level: i64) -> Self {
        self.lock = Some(level);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exit {
    pub tgt: RoomId,
    #[serde(default, skip_serializing_if = "ExitData::is_empty")]
    pub data: ExitData,
}

impl Exit {
    pub fn to(tgt: impl Into<RoomId>) -> Self {
        Self {
            tgt: tgt.into(),
            data: ExitData::default(),
        }
    }

    pub fn with_data(mut self, data: ExitData) -> Self {
        self.data = data;
        self
    }
}

/// Exits keyed by label. Lexicographic label order is the traversal tie-break.
pub type Exits = BTreeMap<String, Exit>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: RoomData,
    #[serde(default)]
    pub exits: Exits,
}

impl Room {
    pub fn new(name: Option<String>, data: RoomData, exits: Exits) -> Self {
        Self { name, data, exits }
    }

    /// Placeholder for a room known only through another room's exit.
    pub fn stub() -> Self {
        Self::default()
    }

    pub fn is_stub(&self) -> bool {
        self.name.is_none() && self.data.is_empty()
    }

    pub fn zone(&self) -> Option<&str> {
        self.data.zone.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn room_ids_accept_numbers_and_text() {
        let ids: Vec<RoomId> = serde_json::from_value(json!([752, -565511180, "Homes#1226"])).unwrap();
        assert_eq!(ids[0].as_str(), "752");
        assert_eq!(ids[1].as_str(), "-565511180");
        assert_eq!(ids[2].as_str(), "Homes#1226");
        assert_eq!(serde_json::to_value(&ids[0]).unwrap(), json!("752"));
    }

    #[test]
    fn exit_len_defaults_and_floors_at_one() {
        let mut data = ExitData::default();
        assert_eq!(data.len(), 1);
        data.adjust_len(2);
        assert_eq!(data.len(), 3);
        data.adjust_len(-2);
        assert_eq!(data.len(), 1);
        data.adjust_len(-2);
        assert_eq!(data.len(), 1);
        data.set_len(0);
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn room_data_keeps_unknown_keys() {
        let raw = json!({"zone": "13", "terrain": "Cave", "color": "red"});
        let data: RoomData = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(data.zone.as_deref(), Some("13"));
        assert_eq!(data.extra.get("color"), Some(&json!("red")));
        assert_eq!(serde_json::to_value(&data).unwrap(), raw);
    }

    #[test]
    fn exit_wire_form_omits_empty_data() {
        let exit = Exit::to("753");
        assert_eq!(serde_json::to_value(&exit).unwrap(), json!({"tgt": "753"}));
        let locked = Exit::to("753").with_data(ExitData::default().with_lock(-1));
        assert_eq!(
            serde_json::to_value(&locked).unwrap(),
            json!({"tgt": "753", "data": {"lock": -1}})
        );
    }

    #[test]
    fn stub_has_no_name_and_no_metadata() {
        assert!(Room::stub().is_stub());
        let named = Room::new(Some("Hall".into()), RoomData::default(), Exits::new());
        assert!(!named.is_stub());
    }
}
