use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One day of a tour type's program. `day_number` 1 is the arrival date.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub day_number: u32,
    /// Hotel name for the night, `None` on the last day or on night transfers
    #[serde(default)]
    pub accommodation: Option<String>,
}

impl ItineraryDay {
    pub fn new(day_number: u32, accommodation: Option<&str>) -> Self {
        Self {
            day_number,
            accommodation: accommodation.map(str::to_string),
        }
    }

    pub fn hotel_name(&self) -> Option<&str> {
        self.accommodation
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TourItinerary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tour_type: String,
    pub days: Vec<ItineraryDay>,
}
