use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::accommodation::RoomType;
use crate::models::tourist::Tourist;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCounts {
    pub dbl: u32,
    pub twn: u32,
    pub sgl: u32,
    pub trpl: u32,
    pub total: u32,
}

impl RoomCounts {
    pub fn get(&self, room_type: RoomType) -> u32 {
        match room_type {
            RoomType::Dbl => self.dbl,
            RoomType::Twn => self.twn,
            RoomType::Sngl => self.sgl,
            RoomType::Trpl => self.trpl,
            RoomType::Pax => 0,
        }
    }
}

#[derive(Default)]
struct Bucket {
    assigned: HashSet<String>,
    unassigned: u32,
}

impl Bucket {
    fn rooms(&self, room_type: RoomType) -> u32 {
        self.assigned.len() as u32 + self.unassigned.div_ceil(room_type.capacity())
    }
}

/// Derives room counts from the rooming list.
///
/// Tourists sharing a room number inside the same accommodation group share a
/// room. Tourists without a room number are packed by room capacity. Tourists
/// whose room type cannot be recognised are left out.
pub fn allocate_rooms<'a, I>(tourists: I) -> RoomCounts
where
    I: IntoIterator<Item = &'a Tourist>,
{
    let mut buckets: HashMap<RoomType, Bucket> = HashMap::new();

    for tourist in tourists {
        let Some(room_type) = tourist.room_type() else {
            log::debug!("No room type for tourist {}", tourist.full_name);
            continue;
        };
        if room_type == RoomType::Pax {
            continue;
        }

        let bucket = buckets.entry(room_type).or_default();
        match tourist.assigned_room() {
            Some(number) => {
                bucket
                    .assigned
                    .insert(format!("{}::{}", tourist.group_key(), number.to_uppercase()));
            }
            None => bucket.unassigned += 1,
        }
    }

    let count = |room_type: RoomType| {
        buckets
            .get(&room_type)
            .map(|bucket| bucket.rooms(room_type))
            .unwrap_or(0)
    };

    let dbl = count(RoomType::Dbl);
    let twn = count(RoomType::Twn);
    let sgl = count(RoomType::Sngl);
    let trpl = count(RoomType::Trpl);

    RoomCounts {
        dbl,
        twn,
        sgl,
        trpl,
        total: dbl + twn + sgl + trpl,
    }
}
