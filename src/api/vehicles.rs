//! Vehicle listing endpoints.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::models::{ImmoListing, VehiclesResponse};
use crate::AppState;

/// GET /api/vehicles - Vehicles grouped by category.
pub async fn get_vehicles(State(state): State<AppState>) -> ApiResult<VehiclesResponse> {
    Ok(Json(state.service.vehicles().await?))
}

/// GET /api/immo - Immobilized vehicles.
pub async fn get_immo(State(state): State<AppState>) -> ApiResult<ImmoListing> {
    Ok(Json(state.service.immo().await?))
}
