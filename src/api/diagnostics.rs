//! Debug endpoint.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::service::Diagnostics;
use crate::AppState;

/// GET /test - Workbook title, sheet names and a sample of the vehicle sheet.
pub async fn test_sheets(State(state): State<AppState>) -> ApiResult<Diagnostics> {
    Ok(Json(state.service.diagnostics().await?))
}
