//! Application layer for Shuk.
//!
//! This crate implements the conversation engine on top of the `shuk-core`
//! domain: the message router, the report and search flows, fuzzy entity
//! resolution, and report materialization. Everything here is
//! transport-agnostic; replies are returned as values for the caller to
//! dispatch.

pub mod entity_resolver;
pub mod materializer;
pub mod report_flow;
pub mod router;
pub mod search_flow;

pub use entity_resolver::{CityResolution, EntityResolver};
pub use materializer::ReportMaterializer;
pub use report_flow::{ReportFlowService, StepOutcome};
pub use router::{InboundMessage, MessageRouter};
pub use search_flow::SearchFlowService;
