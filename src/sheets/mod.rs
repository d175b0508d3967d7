//! Cell-grid client abstraction over the spreadsheet source.
//!
//! The query service only ever sees a [`CellGridClient`]: given a range it
//! returns a grid of raw cells. Authentication and transport stay behind it.

#[cfg(test)]
pub mod fake;
mod google;
mod unavailable;

pub use google::*;
pub use unavailable::*;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::Grid;

/// Ranges read by the dashboard.
pub mod ranges {
    /// Label/value summary of the FS activity.
    pub const POINT_FS_SUMMARY: &str = "'Point FS'!A1:D50";
    /// Label/value summary of the MC activity.
    pub const POINT_MC_SUMMARY: &str = "'POINT MC'!A1:D50";
    /// Table shown on the Point FS page.
    pub const POINT_FS_TABLE: &str = "'POINT FS'!B2:D71";
    /// Table shown on the Point MC page.
    pub const POINT_MC_TABLE: &str = "'POINT MC'!B2:D61";
    /// Immobilized vehicles block.
    pub const IMMO: &str = "'VÉHICULE'!T2:U55";
    /// Top-left corner of the vehicle sheet, used by the diagnostics route.
    pub const VEHICLE_SAMPLE: &str = "'VÉHICULE'!A1:D5";
}

/// How cell values are rendered by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Values as displayed, always strings.
    Formatted,
    /// Raw numbers and booleans.
    Unformatted,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Formatted => "FORMATTED_VALUE",
            RenderMode::Unformatted => "UNFORMATTED_VALUE",
        }
    }
}

/// Workbook-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetMetadata {
    pub title: Option<String>,
    pub sheet_names: Vec<String>,
}

/// Read access to a spreadsheet.
#[async_trait::async_trait]
pub trait CellGridClient: Send + Sync {
    /// Fetch one range.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::FetchFailed`] when the request fails and
    /// [`AppError::SourceUnavailable`] when no source is configured.
    async fn fetch_range(&self, range: &str, mode: RenderMode) -> Result<Grid, AppError>;

    /// Fetch several ranges in one round trip; grids come back in request order.
    ///
    /// # Errors
    ///
    /// Same as [`CellGridClient::fetch_range`].
    async fn fetch_ranges_batch(
        &self,
        ranges: &[&str],
        mode: RenderMode,
    ) -> Result<Vec<Grid>, AppError>;

    /// Title and sheet names of the workbook.
    ///
    /// # Errors
    ///
    /// Same as [`CellGridClient::fetch_range`].
    async fn spreadsheet_metadata(&self) -> Result<SpreadsheetMetadata, AppError>;

    /// Sheet names of the workbook.
    ///
    /// # Errors
    ///
    /// Same as [`CellGridClient::fetch_range`].
    async fn list_sheet_names(&self) -> Result<Vec<String>, AppError> {
        Ok(self.spreadsheet_metadata().await?.sheet_names)
    }

    /// Identifier of the workbook, for diagnostics.
    fn spreadsheet_id(&self) -> Option<&str>;
}
