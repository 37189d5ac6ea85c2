use std::fmt;

use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TourOpsError};
use crate::services::date_math;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoomType {
    Dbl,
    Twn,
    Sngl,
    Trpl,
    /// Per-person billing (guesthouses, yurt camps)
    Pax,
}

impl RoomType {
    pub const ROOMS: [RoomType; 4] = [RoomType::Dbl, RoomType::Twn, RoomType::Sngl, RoomType::Trpl];

    /// Maps the synonyms found in rooming lists and hotel price lists to a room type.
    pub fn normalize(raw: &str) -> Option<RoomType> {
        match raw.trim().to_uppercase().as_str() {
            "DBL" | "DOUBLE" | "DZ" => Some(RoomType::Dbl),
            "TWN" | "TWIN" => Some(RoomType::Twn),
            "SNGL" | "SGL" | "SINGLE" | "EZ" => Some(RoomType::Sngl),
            "TRPL" | "TRIPLE" | "TPL" => Some(RoomType::Trpl),
            "PAX" => Some(RoomType::Pax),
            _ => None,
        }
    }

    pub fn capacity(self) -> u32 {
        match self {
            RoomType::Dbl | RoomType::Twn => 2,
            RoomType::Trpl => 3,
            RoomType::Sngl | RoomType::Pax => 1,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            RoomType::Dbl => "DBL",
            RoomType::Twn => "TWN",
            RoomType::Sngl => "SNGL",
            RoomType::Trpl => "TRPL",
            RoomType::Pax => "PAX",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Uzs,
}

impl Currency {
    /// Lenient parse of currency labels; anything unknown is treated as missing.
    pub fn parse(raw: &str) -> Option<Currency> {
        match raw.trim().to_uppercase().as_str() {
            "USD" | "$" => Some(Currency::Usd),
            "EUR" | "€" => Some(Currency::Eur),
            "UZS" | "SUM" | "SOM" => Some(Currency::Uzs),
            _ => None,
        }
    }
}

fn deserialize_lenient_currency<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Currency>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(Currency::parse))
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_type_code: String,
    pub rooms_count: u32,
    pub guests_per_room: u32,
    /// Nightly rate with VAT and tourist tax already applied
    pub price_per_night: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_currency")]
    pub currency: Option<Currency>,
}

impl Room {
    pub fn room_type(&self) -> Option<RoomType> {
        RoomType::normalize(&self.room_type_code)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, deserialize_with = "deserialize_lenient_currency")]
    pub currency: Option<Currency>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<ObjectId>,
    pub hotel: HotelRef,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    #[serde(default)]
    pub nights: i64,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Accommodation {
    /// Checks the stay range and refreshes `nights` from the dates.
    pub fn validated(mut self) -> Result<Self> {
        date_math::validate_range(self.check_in_date, self.check_out_date)?;
        if self.hotel.name.trim().is_empty() {
            return Err(TourOpsError::Validation("Hotel name is required".to_string()));
        }
        self.nights = date_math::nights_between(self.check_in_date, self.check_out_date);
        Ok(self)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelRoomType {
    pub name: String,
    pub price: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_currency")]
    pub currency: Option<Currency>,
    /// VAT has to be added on top of `price`
    #[serde(default)]
    pub vat_applicable: bool,
    /// Tourist tax has to be added on top of `price`
    #[serde(default)]
    pub tourist_tax_applicable: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub city: String,
    /// Total room inventory, drives the tourist-tax tier
    #[serde(default)]
    pub total_rooms: u32,
    #[serde(default)]
    pub room_types: Vec<HotelRoomType>,
}

impl Hotel {
    pub fn room_type(&self, wanted: RoomType) -> Option<&HotelRoomType> {
        self.room_types
            .iter()
            .find(|room_type| RoomType::normalize(&room_type.name) == Some(wanted))
    }

    pub fn to_hotel_ref(&self) -> HotelRef {
        HotelRef {
            id: self.id,
            name: self.name.clone(),
            city: self.city.clone(),
            currency: self.room_types.iter().find_map(|room_type| room_type.currency),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_type_synonyms() {
        assert_eq!(RoomType::normalize("double"), Some(RoomType::Dbl));
        assert_eq!(RoomType::normalize(" DZ "), Some(RoomType::Dbl));
        assert_eq!(RoomType::normalize("Twin"), Some(RoomType::Twn));
        assert_eq!(RoomType::normalize("EZ"), Some(RoomType::Sngl));
        assert_eq!(RoomType::normalize("SINGLE"), Some(RoomType::Sngl));
        assert_eq!(RoomType::normalize("trpl"), Some(RoomType::Trpl));
        assert_eq!(RoomType::normalize("PAX"), Some(RoomType::Pax));
        assert_eq!(RoomType::normalize("suite"), None);
    }

    #[test]
    fn test_unknown_currency_is_none() {
        let room: Room = serde_json::from_str(
            r#"{
                "roomTypeCode": "DBL",
                "roomsCount": 1,
                "guestsPerRoom": 2,
                "pricePerNight": 80,
                "currency": "RUB"
            }"#,
        )
        .unwrap();
        assert_eq!(room.currency, None);
        assert_eq!(room.room_type(), Some(RoomType::Dbl));
    }

    #[test]
    fn test_validated_rejects_inverted_range() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
        let accommodation = Accommodation {
            id: None,
            booking_id: None,
            hotel: HotelRef {
                id: None,
                name: "Hotel Uzbekistan".into(),
                city: "Tashkent".into(),
                currency: None,
            },
            check_in_date: date,
            check_out_date: date,
            nights: 0,
            rooms: vec![],
        };
        assert!(matches!(
            accommodation.validated(),
            Err(TourOpsError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_validated_sets_nights() {
        let accommodation = Accommodation {
            id: None,
            booking_id: None,
            hotel: HotelRef {
                id: None,
                name: "Hotel Uzbekistan".into(),
                city: "Tashkent".into(),
                currency: None,
            },
            check_in_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
            nights: 0,
            rooms: vec![],
        };
        assert_eq!(accommodation.validated().unwrap().nights, 3);
    }
}
