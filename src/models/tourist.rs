use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::accommodation::RoomType;
use crate::services::date_math;
use crate::services::matching::{self, TouristGroup};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tourist {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<ObjectId>,
    pub full_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub room_preference: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    /// Free-text group label from the rooming list ("Uzbekistan", "Turkmenistan", ...)
    #[serde(default)]
    pub accommodation: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_date")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_loose_date")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(default)]
    pub hotel_name: Option<String>,
}

impl Tourist {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    /// Room number with surrounding whitespace removed, `None` when blank.
    pub fn assigned_room(&self) -> Option<&str> {
        self.room_number
            .as_deref()
            .map(str::trim)
            .filter(|number| !number.is_empty())
    }

    /// Room type taken from the `{TYPE}-{n}` room number, else from the preference.
    pub fn room_type(&self) -> Option<RoomType> {
        self.assigned_room()
            .and_then(|number| number.split('-').next())
            .and_then(RoomType::normalize)
            .or_else(|| self.room_preference.as_deref().and_then(RoomType::normalize))
    }

    pub fn group(&self) -> TouristGroup {
        matching::classify_group(self.accommodation.as_deref())
    }

    /// Dedup key for roommates: room numbers are only unique inside one group.
    pub fn group_key(&self) -> String {
        self.accommodation
            .as_deref()
            .map(|label| label.trim().to_lowercase())
            .unwrap_or_default()
    }
}

fn deserialize_loose_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        Some(serde_json::Value::String(raw)) => Ok(date_math::parse_date(&raw)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_type_prefers_room_number() {
        let tourist = Tourist {
            room_number: Some("TWN-3".into()),
            room_preference: Some("DBL".into()),
            ..Tourist::new("A")
        };
        assert_eq!(tourist.room_type(), Some(RoomType::Twn));
    }

    #[test]
    fn test_room_type_falls_back_to_preference() {
        let tourist = Tourist {
            room_number: Some("  ".into()),
            room_preference: Some("single".into()),
            ..Tourist::new("A")
        };
        assert_eq!(tourist.assigned_room(), None);
        assert_eq!(tourist.room_type(), Some(RoomType::Sngl));
    }

    #[test]
    fn test_loose_dates_from_json() {
        let tourist: Tourist = serde_json::from_str(
            r#"{
                "fullName": "Anna Weber",
                "checkInDate": "2024-05-02T00:00:00.000Z",
                "checkOutDate": "07.05.2024"
            }"#,
        )
        .unwrap();
        assert_eq!(tourist.check_in_date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(tourist.check_out_date, NaiveDate::from_ymd_opt(2024, 5, 7));
    }

    #[test]
    fn test_unparseable_date_is_dropped() {
        let tourist: Tourist =
            serde_json::from_str(r#"{"fullName":"Anna Weber","checkInDate":"soon"}"#).unwrap();
        assert_eq!(tourist.check_in_date, None);
    }
}
