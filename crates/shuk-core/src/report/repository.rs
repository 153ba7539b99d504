//! Price report repository trait and search query.

use async_trait::async_trait;

use super::model::PriceReport;
use crate::error::Result;

/// Filters for the read-only report search.
///
/// `product` matches case-insensitive substrings of either bilingual product
/// name or the raw product text; `brand` matches the product's brand or name
/// fields; `city` matches the store's city fields or its linked city record.
/// Only moderated reports are ever returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub product: String,
    pub brand: Option<String>,
    pub city: Option<String>,
}

/// An abstract repository for price reports.
#[async_trait]
pub trait PriceReportRepository: Send + Sync {
    /// Finds a report by id.
    async fn find_by_id(&self, report_id: &str) -> Result<Option<PriceReport>>;

    /// Persists a new report. Reports are immutable; there is no update.
    async fn create(&self, report: &PriceReport) -> Result<()>;

    /// Moderated reports matching the query, most recent observation first.
    async fn search(&self, query: &ReportQuery) -> Result<Vec<PriceReport>>;
}
