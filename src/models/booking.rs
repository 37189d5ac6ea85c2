use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::services::date_math;

/// Tour types whose groups split into an Uzbekistan and a Turkmenistan party.
pub const SPLIT_TOUR_TYPES: &[&str] = &["ER"];

pub fn supports_turkmenistan_split(tour_type: &str) -> bool {
    SPLIT_TOUR_TYPES
        .iter()
        .any(|code| code.eq_ignore_ascii_case(tour_type.trim()))
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaxSplit {
    pub uzbekistan: u32,
    pub turkmenistan: u32,
}

impl PaxSplit {
    pub fn total(&self) -> u32 {
        self.uzbekistan + self.turkmenistan
    }

    pub fn has_split(&self) -> bool {
        self.turkmenistan > 0
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub booking_number: String,
    pub tour_type: String,
    /// Tour start; the group lands the next day
    pub departure_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub pax: u32,
    #[serde(default)]
    pub pax_uzbekistan: u32,
    #[serde(default)]
    pub pax_turkmenistan: u32,
}

impl Booking {
    pub fn arrival_date(&self) -> NaiveDate {
        date_math::arrival_date(self.departure_date)
    }

    pub fn has_turkmenistan_split(&self) -> bool {
        supports_turkmenistan_split(&self.tour_type)
    }

    pub fn pax_split(&self) -> PaxSplit {
        PaxSplit {
            uzbekistan: self.pax_uzbekistan,
            turkmenistan: self.pax_turkmenistan,
        }
    }

    /// Writes derived counts back, keeping `pax == uzbekistan + turkmenistan`.
    pub fn apply_pax(&mut self, split: PaxSplit) {
        self.pax_uzbekistan = split.uzbekistan;
        self.pax_turkmenistan = split.turkmenistan;
        self.pax = split.total();
    }
}
