pub mod accommodation_autofill;
pub mod accommodation_cost;
pub mod booking_service;
pub mod date_math;
pub mod fx;
pub mod matching;
pub mod pipeline;
pub mod pricing_service;
pub mod rate_type;
pub mod room_allocation;
pub mod route_assignment;
pub mod route_sorter;
pub mod vehicle_catalog;
pub mod vehicle_picker;
