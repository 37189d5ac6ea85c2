//! Provider vehicle tables and price lookup.
//!
//! Catalogs are loaded from the store. When that fails the caller passes in
//! [`default_catalogs`] explicitly; nothing here keeps a global copy.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::vehicle::{Provider, RateType, Vehicle, VehicleCatalogs};

pub struct DefaultVehicle {
    pub name: &'static str,
    pub seats: u32,
    pub person: &'static str,
    pub rates: &'static [(&'static str, f64)],
}

/// Sevil: Samarkand, Bukhara, Khiva and everything outside Tashkent and the
/// Fergana valley. Prices in USD.
pub const SEVIL_DEFAULTS: &[DefaultVehicle] = &[
    DefaultVehicle {
        name: "Sedan",
        seats: 3,
        person: "1-2",
        rates: &[
            ("tagRate", 45.0),
            ("vstrecha", 15.0),
            ("urgenchRate", 20.0),
            ("shovotRate", 35.0),
        ],
    },
    DefaultVehicle {
        name: "Starex",
        seats: 7,
        person: "3-8",
        rates: &[
            ("tagRate", 70.0),
            ("vstrecha", 25.0),
            ("urgenchRate", 30.0),
            ("shovotRate", 50.0),
        ],
    },
    DefaultVehicle {
        name: "Sprinter",
        seats: 16,
        person: "9-16",
        rates: &[
            ("tagRate", 120.0),
            ("vstrecha", 40.0),
            ("urgenchRate", 50.0),
            ("shovotRate", 80.0),
        ],
    },
    DefaultVehicle {
        name: "Yutong 33",
        seats: 33,
        person: "9-20",
        rates: &[
            ("tagRate", 160.0),
            ("vstrecha", 60.0),
            ("urgenchRate", 70.0),
            ("shovotRate", 110.0),
        ],
    },
    DefaultVehicle {
        name: "Yutong 45",
        seats: 45,
        person: "21-40",
        rates: &[
            ("tagRate", 210.0),
            ("vstrecha", 80.0),
            ("urgenchRate", 90.0),
            ("shovotRate", 140.0),
        ],
    },
];

/// Xayrulla: Tashkent and the Chimgan/Charvak mountains. Prices in USD.
pub const XAYRULLA_DEFAULTS: &[DefaultVehicle] = &[
    DefaultVehicle {
        name: "Sedan",
        seats: 3,
        person: "1-2",
        rates: &[("tagRate", 40.0), ("vstrecha", 15.0), ("chimgan", 60.0), ("cityTour", 35.0)],
    },
    DefaultVehicle {
        name: "Starex",
        seats: 7,
        person: "3-8",
        rates: &[("tagRate", 65.0), ("vstrecha", 25.0), ("chimgan", 90.0), ("cityTour", 55.0)],
    },
    DefaultVehicle {
        name: "Sprinter",
        seats: 16,
        person: "9-16",
        rates: &[("tagRate", 110.0), ("vstrecha", 40.0), ("chimgan", 140.0), ("cityTour", 90.0)],
    },
    DefaultVehicle {
        name: "Yutong 33",
        seats: 33,
        person: "9-20",
        rates: &[("tagRate", 150.0), ("vstrecha", 55.0), ("chimgan", 190.0), ("cityTour", 120.0)],
    },
    DefaultVehicle {
        name: "Yutong 45",
        seats: 45,
        person: "21-40",
        rates: &[("tagRate", 200.0), ("vstrecha", 75.0), ("chimgan", 250.0), ("cityTour", 160.0)],
    },
];

/// Nosir: the Fergana valley. Prices in USD.
pub const NOSIR_DEFAULTS: &[DefaultVehicle] = &[
    DefaultVehicle {
        name: "Sedan",
        seats: 3,
        person: "1-2",
        rates: &[
            ("tagRate", 40.0),
            ("vstrecha", 15.0),
            ("margilan", 35.0),
            ("qoqon", 45.0),
            ("dostlik", 50.0),
        ],
    },
    DefaultVehicle {
        name: "Starex",
        seats: 7,
        person: "3-8",
        rates: &[
            ("tagRate", 60.0),
            ("vstrecha", 25.0),
            ("margilan", 55.0),
            ("qoqon", 70.0),
            ("dostlik", 80.0),
        ],
    },
    DefaultVehicle {
        name: "Sprinter",
        seats: 16,
        person: "9-16",
        rates: &[
            ("tagRate", 100.0),
            ("vstrecha", 40.0),
            ("margilan", 90.0),
            ("qoqon", 110.0),
            ("dostlik", 120.0),
        ],
    },
    DefaultVehicle {
        name: "Yutong 33",
        seats: 33,
        person: "17-30",
        rates: &[
            ("tagRate", 140.0),
            ("vstrecha", 55.0),
            ("margilan", 130.0),
            ("qoqon", 150.0),
            ("dostlik", 170.0),
        ],
    },
];

fn build(defaults: &[DefaultVehicle]) -> Vec<Vehicle> {
    defaults
        .iter()
        .map(|vehicle| Vehicle {
            id: None,
            name: vehicle.name.to_string(),
            seats: vehicle.seats,
            person: vehicle.person.to_string(),
            rates: vehicle
                .rates
                .iter()
                .map(|(field, price)| (field.to_string(), *price))
                .collect::<BTreeMap<_, _>>(),
        })
        .collect()
}

pub fn default_catalogs() -> VehicleCatalogs {
    VehicleCatalogs {
        sevil: build(SEVIL_DEFAULTS),
        xayrulla: build(XAYRULLA_DEFAULTS),
        nosir: build(NOSIR_DEFAULTS),
    }
}

/// Stored catalogs, with every empty or unavailable provider table taken from
/// `fallback`.
pub fn resolve_catalogs(
    loaded: Result<VehicleCatalogs>,
    fallback: &VehicleCatalogs,
) -> VehicleCatalogs {
    match loaded {
        Ok(mut catalogs) => {
            for provider in Provider::ALL {
                if catalogs.for_provider(provider).is_empty() {
                    log::warn!("No stored vehicles for {}, using defaults", provider);
                    *catalogs.for_provider_mut(provider) = fallback.for_provider(provider).to_vec();
                }
            }
            catalogs
        }
        Err(err) => {
            log::warn!("Vehicle catalogs unavailable ({}), using defaults", err);
            fallback.clone()
        }
    }
}

/// Catalog entry for a stored transport type. Exact name first, then the
/// longest catalog name contained in (or containing) the stored one, so that
/// "Yutong 33 (9-20)" still finds "Yutong 33".
pub fn find_vehicle<'a>(catalog: &'a [Vehicle], transport_type: &str) -> Option<&'a Vehicle> {
    let wanted = transport_type.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    catalog
        .iter()
        .find(|vehicle| vehicle.name.trim().to_lowercase() == wanted)
        .or_else(|| {
            catalog
                .iter()
                .filter(|vehicle| {
                    let name = vehicle.name.trim().to_lowercase();
                    !name.is_empty() && (wanted.contains(&name) || name.contains(&wanted))
                })
                .max_by_key(|vehicle| vehicle.name.len())
        })
}

pub fn lookup_price(catalog: &[Vehicle], transport_type: &str, rate: RateType) -> Option<f64> {
    let vehicle = find_vehicle(catalog, transport_type)?;
    let price = vehicle.rate(rate);
    if price.is_none() {
        log::warn!("{} has no {} rate", vehicle.name, rate.rate_field());
    }
    price
}
