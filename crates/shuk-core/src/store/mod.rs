//! Store domain module.

mod model;
mod repository;

pub use model::Store;
pub use repository::{CityFilter, StoreRepository};
