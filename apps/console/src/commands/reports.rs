//! # Report Commands

use chrono::NaiveDate;
use pincorp_core::report::{ReportWindow, SalesReport};
use pincorp_store::Store;
use serde::Serialize;
use tracing::debug;

use super::rejected;
use crate::error::ApiError;
use crate::state::ConfigState;

/// The report plus its headline totals formatted for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    #[serde(flatten)]
    pub report: SalesReport,
    pub display_revenue: String,
    pub display_cost: String,
    pub display_profit: String,
}

/// Revenue, cost and profit for the local days `start..=end`.
///
/// Days are taken in the configured report time zone. A reversed range
/// yields an empty report.
pub fn sales_report(
    store: &Store,
    config: &ConfigState,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ReportResponse, ApiError> {
    debug!(start = %start, end = %end, "sales_report command");
    let window = ReportWindow::new(start, end, config.report_offset());
    let report = store
        .sales()
        .report(&window)
        .map_err(rejected("sales_report"))?;

    Ok(ReportResponse {
        display_revenue: config.format_currency(report.total_revenue),
        display_cost: config.format_currency(report.total_cost),
        display_profit: config.format_currency(report.total_profit),
        report,
    })
}
