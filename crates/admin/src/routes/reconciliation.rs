//! Shipping-loss report.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use kensington_core::{ReconciliationReport, reconcile};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::Result;
use crate::state::AppState;

/// Date range for the report; open-ended when omitted.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// `GET /reports/shipping-loss` - charged-vs-actual reconciliation over the
/// requested date range.
///
/// Recomputed from the order store on every call; the report never writes
/// anything back.
#[instrument(skip(state))]
pub async fn shipping_loss(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReconciliationReport>> {
    let orders = state.backend().list_orders(None, query.from, query.to).await?;
    let report = reconcile(&orders);
    info!(
        orders = orders.len(),
        missing_cost_data = report.missing_cost_data,
        total_loss = %report.total_loss,
        "shipping-loss report built"
    );
    Ok(Json(report))
}
