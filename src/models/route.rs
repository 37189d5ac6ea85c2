use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::vehicle::{
    deserialize_lenient_provider, deserialize_lenient_rate, Provider, RateType,
};

/// One leg of the day-by-day transport itinerary.
///
/// Only `day_offset`, `city` and `route_name` are source data. Everything else is
/// derived and may be overwritten by any recompute pass, except a rate the user
/// picked by hand (`manual_rate`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<ObjectId>,
    /// Days after the tour's arrival date
    pub day_offset: i64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub city: String,
    pub route_name: String,
    /// Passenger count as stored for documents
    #[serde(default)]
    pub person: String,
    #[serde(default, deserialize_with = "deserialize_lenient_provider")]
    pub choice_tab: Option<Provider>,
    #[serde(default)]
    pub transport_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_rate")]
    pub choice_rate: Option<RateType>,
    #[serde(default)]
    pub manual_rate: bool,
    #[serde(default)]
    pub price: Option<f64>,
    /// Leg that only exists while the group is split
    #[serde(default)]
    pub split_leg: bool,
}

impl Route {
    pub fn from_leg(leg: &RouteTemplateLeg) -> Self {
        Self {
            id: None,
            booking_id: None,
            day_offset: leg.day_offset,
            date: None,
            city: leg.city.clone(),
            route_name: leg.route_name.clone(),
            person: String::new(),
            choice_tab: leg.provider,
            transport_type: None,
            choice_rate: None,
            manual_rate: false,
            price: None,
            split_leg: false,
        }
    }

    pub fn passengers(&self) -> Option<u32> {
        self.person.trim().parse().ok()
    }

    /// A leg the repair pass has to revisit.
    pub fn is_incomplete(&self) -> bool {
        self.transport_type
            .as_deref()
            .map_or(true, |name| name.trim().is_empty())
            || self.price.map_or(true, |price| price <= 0.0)
    }

    pub fn to_template_leg(&self) -> RouteTemplateLeg {
        RouteTemplateLeg {
            day_offset: self.day_offset,
            city: self.city.clone(),
            route_name: self.route_name.clone(),
            provider: self.choice_tab,
        }
    }
}

/// Skeleton entry of a tour type's transport itinerary.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteTemplateLeg {
    pub day_offset: i64,
    pub city: String,
    pub route_name: String,
    /// Provider hint overriding the city-based choice
    #[serde(default, deserialize_with = "deserialize_lenient_provider")]
    pub provider: Option<Provider>,
}

impl RouteTemplateLeg {
    pub fn new(day_offset: i64, city: &str, route_name: &str) -> Self {
        Self {
            day_offset,
            city: city.to_string(),
            route_name: route_name.to_string(),
            provider: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteTemplate {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tour_type: String,
    pub legs: Vec<RouteTemplateLeg>,
}
