//! Seams between the pipeline and its collaborators.

use async_trait::async_trait;
use c19_common::{CumulativePoint, Result, Scope, SummaryFields, Window};

/// Source of cumulative time series and point-in-time summaries.
///
/// [`crate::TimeSeriesFetcher`] is the HTTP implementation; tests swap in
/// the generated `MockDataSource`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches cumulative totals for `scope`, oldest first.
    async fn fetch(&self, scope: &Scope, window: Window) -> Result<Vec<CumulativePoint>>;

    /// Fetches the current summary figures for `scope`.
    async fn fetch_summary(&self, scope: &Scope) -> Result<SummaryFields>;
}
