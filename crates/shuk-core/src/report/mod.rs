//! Price report domain module.

mod model;
mod repository;

pub use model::PriceReport;
pub use repository::{PriceReportRepository, ReportQuery};
