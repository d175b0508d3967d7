//! In-memory cell-grid client for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{CellGridClient, RenderMode, SpreadsheetMetadata};
use crate::errors::AppError;
use crate::models::Grid;

/// Serves fixed grids by range and counts range fetches.
#[derive(Debug, Default)]
pub struct FakeGridClient {
    pub grids: HashMap<String, Grid>,
    pub metadata: SpreadsheetMetadata,
    /// Ranges that fail with [`AppError::FetchFailed`].
    pub failing: Vec<String>,
    pub fetch_calls: AtomicU64,
}

impl FakeGridClient {
    pub fn with_grid(mut self, range: &str, grid: Grid) -> Self {
        self.grids.insert(range.to_string(), grid);
        self
    }

    pub fn failing_on(mut self, range: &str) -> Self {
        self.failing.push(range.to_string());
        self
    }

    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::Relaxed)
    }

    fn lookup(&self, range: &str) -> Result<Grid, AppError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        if self.failing.iter().any(|r| r == range) {
            return Err(AppError::FetchFailed(format!("Failed to fetch {}", range)));
        }
        Ok(self.grids.get(range).cloned().unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl CellGridClient for FakeGridClient {
    async fn fetch_range(&self, range: &str, _mode: RenderMode) -> Result<Grid, AppError> {
        self.lookup(range)
    }

    async fn fetch_ranges_batch(
        &self,
        ranges: &[&str],
        _mode: RenderMode,
    ) -> Result<Vec<Grid>, AppError> {
        ranges.iter().map(|range| self.lookup(range)).collect()
    }

    async fn spreadsheet_metadata(&self) -> Result<SpreadsheetMetadata, AppError> {
        Ok(self.metadata.clone())
    }

    fn spreadsheet_id(&self) -> Option<&str> {
        Some("fake-spreadsheet")
    }
}
