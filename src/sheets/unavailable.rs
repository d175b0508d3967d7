//! Stand-in source used when the real client could not be constructed.

use super::{CellGridClient, RenderMode, SpreadsheetMetadata};
use crate::errors::AppError;
use crate::models::Grid;

/// Fails every call with [`AppError::SourceUnavailable`].
#[derive(Debug, Clone)]
pub struct UnavailableSource {
    reason: String,
}

impl UnavailableSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> AppError {
        AppError::SourceUnavailable(format!(
            "Spreadsheet source is not available: {}",
            self.reason
        ))
    }
}

#[async_trait::async_trait]
impl CellGridClient for UnavailableSource {
    async fn fetch_range(&self, _range: &str, _mode: RenderMode) -> Result<Grid, AppError> {
        Err(self.error())
    }

    async fn fetch_ranges_batch(
        &self,
        _ranges: &[&str],
        _mode: RenderMode,
    ) -> Result<Vec<Grid>, AppError> {
        Err(self.error())
    }

    async fn spreadsheet_metadata(&self) -> Result<SpreadsheetMetadata, AppError> {
        Err(self.error())
    }

    fn spreadsheet_id(&self) -> Option<&str> {
        None
    }
}
