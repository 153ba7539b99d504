//! Session domain module.
//!
//! # Module Structure
//!
//! - `step`: conversation step enums for both flows
//! - `draft`: typed, versioned answer accumulators
//! - `model`: session entities (`ReportSession`, `LookupSession`)
//! - `repository`: persistence traits, one per flow kind

mod draft;
mod model;
mod repository;
mod step;

pub use draft::{DRAFT_VERSION, LookupDraft, ReportDraft};
pub use model::{LookupSession, ReportSession};
pub use repository::{LookupSessionRepository, ReportSessionRepository};
pub use step::{LookupStep, ReportStep};
