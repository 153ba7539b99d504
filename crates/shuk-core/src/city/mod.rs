//! City domain module.

mod model;
mod repository;

pub use model::{City, slugify};
pub use repository::CityRepository;
