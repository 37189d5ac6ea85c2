pub mod accommodation;
pub mod booking;
pub mod itinerary;
pub mod route;
pub mod tourist;
pub mod vehicle;
