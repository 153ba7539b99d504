//! In-memory repository implementations.
//!
//! One implementation per repository trait, each backed by
//! `tokio::sync::RwLock<HashMap>`. Used by the test suites and the demo CLI;
//! a production deployment substitutes database-backed implementations.

mod city_repository;
mod product_repository;
mod report_repository;
mod session_repository;
mod store_repository;
mod user_repository;

pub use city_repository::InMemoryCityRepository;
pub use product_repository::InMemoryProductRepository;
pub use report_repository::InMemoryPriceReportRepository;
pub use session_repository::{InMemoryLookupSessionRepository, InMemoryReportSessionRepository};
pub use store_repository::InMemoryStoreRepository;
pub use user_repository::InMemoryUserRepository;
