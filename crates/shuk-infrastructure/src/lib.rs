//! Infrastructure layer for Shuk.
//!
//! Provides concrete implementations of the repository traits defined in
//! `shuk-core`. Only in-memory backends live here today; the traits are the
//! seam for database-backed implementations.

pub mod memory;

pub use memory::{
    InMemoryCityRepository, InMemoryLookupSessionRepository, InMemoryPriceReportRepository,
    InMemoryProductRepository, InMemoryReportSessionRepository, InMemoryStoreRepository,
    InMemoryUserRepository,
};
