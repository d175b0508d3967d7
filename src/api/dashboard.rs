//! Dashboard counter endpoints.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::models::{PointDashboard, VehicleStats};
use crate::AppState;

/// GET /api/dashboard - Vehicle counters over the vehicle sheet.
pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<VehicleStats> {
    Ok(Json(state.service.vehicle_stats().await?))
}

/// GET /api/dashboard-data - Metric snapshots of the Point FS and Point MC sheets.
///
/// Empty sheets answer 404 and failed fetches 500, both with an error body.
pub async fn get_dashboard_data(State(state): State<AppState>) -> ApiResult<PointDashboard> {
    Ok(Json(state.service.dashboard_data().await?))
}
