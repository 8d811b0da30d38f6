//! Ordering of residents by room, so listings follow the building layout.
//!
//! Room labels look like `TKRA-0123-A1`: building, floor, unit. Residents are
//! ordered by building, then numeric floor, then unit. Labels that do not fit
//! the pattern are grouped by their first four characters and treated as
//! floor 999 of that group. Residents without a room come last.

use common::model::resident::StoredResident;
use regex::Regex;

const ROOM_PATTERN: &str = r"^([A-Z]+)-?(\d+)-?([A-Z]\d*)?$";

/// Floor given to labels the pattern cannot parse.
const UNPARSED_FLOOR: u64 = 999;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RoomKey {
    unassigned: bool,
    building: String,
    floor: u64,
    unit: String,
}

pub struct RoomOrder {
    pattern: Regex,
}

impl RoomOrder {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(ROOM_PATTERN)?,
        })
    }

    fn key(&self, room: Option<&str>) -> RoomKey {
        let room = room.map(|r| r.trim().to_uppercase()).unwrap_or_default();
        if room.is_empty() {
            return RoomKey {
                unassigned: true,
                building: String::new(),
                floor: u64::MAX,
                unit: String::new(),
            };
        }
        match self.pattern.captures(&room) {
            Some(caps) => RoomKey {
                unassigned: false,
                building: caps[1].to_string(),
                floor: caps[2].parse().unwrap_or(UNPARSED_FLOOR),
                unit: caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
            },
            None => RoomKey {
                unassigned: false,
                building: room.chars().take(4).collect(),
                floor: UNPARSED_FLOOR,
                unit: String::new(),
            },
        }
    }

    /// Stable sort by room.
    pub fn sort(&self, residents: &mut [StoredResident]) {
        residents.sort_by_cached_key(|r| self.key(r.room.as_deref()));
    }
}
