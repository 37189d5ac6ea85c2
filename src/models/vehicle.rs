use std::collections::BTreeMap;
use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

/// Ground-transport vendor; each one serves its own region with its own catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Sevil,
    Xayrulla,
    Nosir,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Sevil, Provider::Xayrulla, Provider::Nosir];

    pub fn parse(raw: &str) -> Option<Provider> {
        match raw.trim().to_lowercase().as_str() {
            "sevil" => Some(Provider::Sevil),
            "xayrulla" => Some(Provider::Xayrulla),
            "nosir" => Some(Provider::Nosir),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Provider::Sevil => "sevil",
            Provider::Xayrulla => "xayrulla",
            Provider::Nosir => "nosir",
        }
    }

    /// Providers whose catalogs carry both a Yutong and a Sprinter for the same range.
    pub fn prefers_yutong(self) -> bool {
        matches!(self, Provider::Sevil | Provider::Xayrulla)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Tariff a leg is billed at. Each maps to one rate field on a catalog vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RateType {
    Tag,
    Vstrecha,
    Chimgan,
    CityTour,
    Urgench,
    Shovot,
    Margilan,
    Qoqon,
    Dostlik,
}

impl RateType {
    pub fn parse(raw: &str) -> Option<RateType> {
        match raw.trim().to_lowercase().as_str() {
            "tag" | "tagrate" => Some(RateType::Tag),
            "vstrecha" => Some(RateType::Vstrecha),
            "chimgan" => Some(RateType::Chimgan),
            "citytour" => Some(RateType::CityTour),
            "urgench" | "urgenchrate" => Some(RateType::Urgench),
            "shovot" | "shovotrate" => Some(RateType::Shovot),
            "margilan" => Some(RateType::Margilan),
            "qoqon" => Some(RateType::Qoqon),
            "dostlik" => Some(RateType::Dostlik),
            _ => None,
        }
    }

    /// Name of the price field on a catalog vehicle.
    pub fn rate_field(self) -> &'static str {
        match self {
            RateType::Tag => "tagRate",
            RateType::Vstrecha => "vstrecha",
            RateType::Chimgan => "chimgan",
            RateType::CityTour => "cityTour",
            RateType::Urgench => "urgenchRate",
            RateType::Shovot => "shovotRate",
            RateType::Margilan => "margilan",
            RateType::Qoqon => "qoqon",
            RateType::Dostlik => "dostlik",
        }
    }
}

/// Inclusive passenger range parsed from a `"min-max"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityRange {
    pub min: u32,
    pub max: u32,
}

impl CapacityRange {
    pub fn parse(raw: &str) -> Option<CapacityRange> {
        let (min, max) = match raw.split_once('-') {
            Some((min, max)) => (min.trim().parse().ok()?, max.trim().parse().ok()?),
            None => {
                let single = raw.trim().parse().ok()?;
                (single, single)
            }
        };
        (min <= max).then_some(CapacityRange { min, max })
    }

    pub fn contains(&self, pax: u32) -> bool {
        (self.min..=self.max).contains(&pax)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub seats: u32,
    /// Capacity range as `"min-max"`
    pub person: String,
    /// Price per rate field (`tagRate`, `vstrecha`, `chimgan`, ...)
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

impl Vehicle {
    pub fn capacity(&self) -> Option<CapacityRange> {
        CapacityRange::parse(&self.person)
    }

    pub fn rate(&self, rate: RateType) -> Option<f64> {
        self.rates.get(rate.rate_field()).copied()
    }
}

/// One vehicle list per provider.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct VehicleCatalogs {
    #[serde(default)]
    pub sevil: Vec<Vehicle>,
    #[serde(default)]
    pub xayrulla: Vec<Vehicle>,
    #[serde(default)]
    pub nosir: Vec<Vehicle>,
}

impl VehicleCatalogs {
    pub fn for_provider(&self, provider: Provider) -> &[Vehicle] {
        match provider {
            Provider::Sevil => &self.sevil,
            Provider::Xayrulla => &self.xayrulla,
            Provider::Nosir => &self.nosir,
        }
    }

    pub fn for_provider_mut(&mut self, provider: Provider) -> &mut Vec<Vehicle> {
        match provider {
            Provider::Sevil => &mut self.sevil,
            Provider::Xayrulla => &mut self.xayrulla,
            Provider::Nosir => &mut self.nosir,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sevil.is_empty() && self.xayrulla.is_empty() && self.nosir.is_empty()
    }
}

/// Unknown provider keys deserialize to `None` instead of failing the whole document.
pub fn deserialize_lenient_provider<'de, D>(deserializer: D) -> Result<Option<Provider>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(Provider::parse))
}

pub fn deserialize_lenient_rate<'de, D>(deserializer: D) -> Result<Option<RateType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(RateType::parse))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_range_parse() {
        assert_eq!(CapacityRange::parse("9-20"), Some(CapacityRange { min: 9, max: 20 }));
        assert_eq!(CapacityRange::parse(" 1 - 2 "), Some(CapacityRange { min: 1, max: 2 }));
        assert_eq!(CapacityRange::parse("4"), Some(CapacityRange { min: 4, max: 4 }));
        assert_eq!(CapacityRange::parse("20-9"), None);
        assert_eq!(CapacityRange::parse("many"), None);
    }

    #[test]
    fn test_capacity_range_is_inclusive() {
        let range = CapacityRange { min: 9, max: 16 };
        assert!(range.contains(9));
        assert!(range.contains(16));
        assert!(!range.contains(17));
        assert!(!range.contains(8));
    }

    #[test]
    fn test_rate_type_parse_accepts_field_names() {
        assert_eq!(RateType::parse("tagRate"), Some(RateType::Tag));
        assert_eq!(RateType::parse("cityTour"), Some(RateType::CityTour));
        assert_eq!(RateType::parse("urgenchRate"), Some(RateType::Urgench));
        assert_eq!(RateType::parse("excursion"), None);
    }

    #[test]
    fn test_provider_parse_is_case_insensitive() {
        assert_eq!(Provider::parse("Xayrulla"), Some(Provider::Xayrulla));
        assert_eq!(Provider::parse("unknown"), None);
    }
}
