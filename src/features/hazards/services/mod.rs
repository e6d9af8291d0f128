pub mod credibility_service;
pub mod hazard_service;
pub mod location_service;
pub mod validation_service;

pub use hazard_service::{HazardFilter, HazardService, HazardSort, SortField};
