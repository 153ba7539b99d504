//! Domain layer for Shuk, a chat service where users report and look up
//! grocery prices.
//!
//! This crate holds the pure building blocks: domain entities with their
//! repository traits, text normalization and keyword classification, the
//! canonical unit catalog, the bilingual message catalog, and the session
//! models both conversation flows run on. The conversation logic itself
//! lives in `shuk-application`.

pub mod city;
pub mod config;
pub mod error;
pub mod i18n;
pub mod locale;
pub mod message;
pub mod product;
pub mod report;
pub mod session;
pub mod store;
pub mod text;
pub mod units;
pub mod user;

// Re-export common error type
pub use error::{Result, ShukError};
