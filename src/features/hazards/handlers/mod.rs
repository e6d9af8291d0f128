pub mod hazard_handler;
pub mod health_handler;

pub use hazard_handler::{
    create_hazard, delete_hazard, get_hazard, list_hazards, update_hazard, HazardState,
};
pub use health_handler::health_check;
