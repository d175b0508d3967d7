//! Raw table endpoints behind the Point FS / Point MC pages.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::models::{PointRows, PointSheet};
use crate::AppState;

/// GET /get_point_fs_data - Non-blank rows of the Point FS table.
pub async fn get_point_fs_data(State(state): State<AppState>) -> ApiResult<PointRows> {
    Ok(Json(state.service.point_rows(PointSheet::Fs).await?))
}

/// GET /get_point_mc_data - Non-blank rows of the Point MC table.
pub async fn get_point_mc_data(State(state): State<AppState>) -> ApiResult<PointRows> {
    Ok(Json(state.service.point_rows(PointSheet::Mc).await?))
}
