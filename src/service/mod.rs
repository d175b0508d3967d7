//! Query service: fetch, normalize and aggregate for each dashboard query.
//!
//! Every query walks the same stages (see [`QueryStage`]). A failure at any
//! stage is logged with the stage name and returned to the request layer,
//! which turns it into an error payload.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::cache::ResultCache;
use crate::errors::AppError;
use crate::models::{
    Category, Grid, ImmoEntry, ImmoListing, MetricSnapshot, PointDashboard, PointRows, PointSheet,
    Vehicle, VehicleStats, VehiclesResponse,
};
use crate::normalize::{aggregate_metrics, tally_vehicles, VehicleLayout};
use crate::sheets::{ranges, CellGridClient, RenderMode};

/// Stage of a query, used to label log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Fetching,
    Normalizing,
    Aggregating,
    Done,
}

impl std::fmt::Display for QueryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QueryStage::Fetching => "FETCHING",
            QueryStage::Normalizing => "NORMALIZING",
            QueryStage::Aggregating => "AGGREGATING",
            QueryStage::Done => "DONE",
        };
        f.write_str(name)
    }
}

fn enter(query: &str, stage: QueryStage) {
    tracing::debug!(query, stage = %stage, "query stage");
}

fn failed(query: &str, stage: QueryStage, err: AppError) -> AppError {
    tracing::error!(query, stage = %stage, "query failed: {}", err);
    err
}

fn summarize(query: &str, sheet: PointSheet, rows: Grid) -> Result<MetricSnapshot, AppError> {
    if rows.is_empty() {
        tracing::warn!("No data found in {} sheet", sheet.name());
        return Err(AppError::NotFound(format!("No data found in {}", sheet.name())));
    }

    enter(query, QueryStage::Aggregating);
    tracing::info!("Processing {} rows of data from {}", rows.len(), sheet.name());
    Ok(aggregate_metrics(&rows, sheet))
}

/// Raw diagnostics for the debug route. Not a stable contract.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub spreadsheet_title: Option<String>,
    pub sheet_names: Vec<String>,
    pub data: Grid,
    pub spreadsheet_id: Option<String>,
}

impl PointSheet {
    fn summary_range(&self) -> &'static str {
        match self {
            PointSheet::Fs => ranges::POINT_FS_SUMMARY,
            PointSheet::Mc => ranges::POINT_MC_SUMMARY,
        }
    }

    fn table_range(&self) -> &'static str {
        match self {
            PointSheet::Fs => ranges::POINT_FS_TABLE,
            PointSheet::Mc => ranges::POINT_MC_TABLE,
        }
    }
}

/// Orchestrates the cell-grid client, the normalizer and the aggregators.
pub struct DashboardService {
    client: Arc<dyn CellGridClient>,
    layout: VehicleLayout,
    vehicles_cache: ResultCache<VehiclesResponse>,
}

impl DashboardService {
    pub fn new(client: Arc<dyn CellGridClient>, layout: VehicleLayout, cache_ttl: Duration) -> Self {
        Self {
            client,
            layout,
            vehicles_cache: ResultCache::new(cache_ttl),
        }
    }

    /// Fetch one range; an empty grid is reported as [`AppError::NotFound`].
    async fn fetch_rows(&self, query: &str, range: &str, mode: RenderMode) -> Result<Grid, AppError> {
        enter(query, QueryStage::Fetching);
        let rows = self
            .client
            .fetch_range(range, mode)
            .await
            .map_err(|e| failed(query, QueryStage::Fetching, e))?;

        if rows.is_empty() {
            tracing::warn!("No data found in {}", range);
            return Err(AppError::NotFound(format!("No data found in {}", range)));
        }
        Ok(rows)
    }

    /// Vehicles grouped by category, served from the cache when fresh.
    pub async fn vehicles(&self) -> Result<VehiclesResponse, AppError> {
        const QUERY: &str = "vehicles";

        if let Some(cached) = self.vehicles_cache.get().await {
            tracing::debug!("Serving vehicles from cache");
            return Ok(cached);
        }

        let rows = self
            .fetch_rows(QUERY, self.layout.range(), RenderMode::Formatted)
            .await?;

        enter(QUERY, QueryStage::Normalizing);
        let vehicles = self.layout.normalize(&rows);

        enter(QUERY, QueryStage::Aggregating);
        let mut categories: BTreeMap<Category, Vec<Vehicle>> = self
            .layout
            .categories()
            .into_iter()
            .map(|category| (category, Vec::new()))
            .collect();
        for vehicle in vehicles {
            categories.entry(vehicle.category).or_default().push(vehicle);
        }

        let response = VehiclesResponse {
            categories,
            success: true,
            generated_at: Utc::now().to_rfc3339(),
        };
        self.vehicles_cache.set(response.clone()).await;

        enter(QUERY, QueryStage::Done);
        Ok(response)
    }

    /// Vehicle counters over the whole vehicle sheet.
    ///
    /// An empty sheet yields zeroed counters rather than an error.
    pub async fn vehicle_stats(&self) -> Result<VehicleStats, AppError> {
        const QUERY: &str = "vehicle_stats";

        let rows = match self
            .fetch_rows(QUERY, self.layout.range(), RenderMode::Formatted)
            .await
        {
            Ok(rows) => rows,
            Err(AppError::NotFound(_)) => return Ok(VehicleStats::default()),
            Err(e) => return Err(e),
        };

        enter(QUERY, QueryStage::Aggregating);
        let stats = tally_vehicles(&rows, self.layout);
        tracing::info!(
            "Dashboard stats: {} vehicles in {} categories",
            stats.total,
            stats.by_category.len()
        );

        enter(QUERY, QueryStage::Done);
        Ok(stats)
    }

    /// Metric snapshots of both summary sheets, fetched in one batch.
    pub async fn dashboard_data(&self) -> Result<PointDashboard, AppError> {
        const QUERY: &str = "dashboard_data";

        enter(QUERY, QueryStage::Fetching);
        let summary_ranges = [
            PointSheet::Fs.summary_range(),
            PointSheet::Mc.summary_range(),
        ];
        let grids = self
            .client
            .fetch_ranges_batch(&summary_ranges, RenderMode::Unformatted)
            .await
            .map_err(|e| failed(QUERY, QueryStage::Fetching, e))?;

        let mut grids = grids.into_iter();
        let point_fs = summarize(QUERY, PointSheet::Fs, grids.next().unwrap_or_default())?;
        let point_mc = summarize(QUERY, PointSheet::Mc, grids.next().unwrap_or_default())?;

        enter(QUERY, QueryStage::Done);
        Ok(PointDashboard { point_fs, point_mc })
    }

    /// Non-blank rows of a summary sheet's table.
    pub async fn point_rows(&self, sheet: PointSheet) -> Result<PointRows, AppError> {
        const QUERY: &str = "point_rows";

        enter(QUERY, QueryStage::Fetching);
        let sheet_names = self
            .client
            .list_sheet_names()
            .await
            .map_err(|e| failed(QUERY, QueryStage::Fetching, e))?;
        tracing::debug!("Available sheets: {:?}", sheet_names);

        let range = sheet.table_range();
        let rows = match self.fetch_rows(QUERY, range, RenderMode::Formatted).await {
            Ok(rows) => rows,
            Err(AppError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        tracing::debug!("Total rows received from {}: {}", range, rows.len());

        enter(QUERY, QueryStage::Normalizing);
        let data: Vec<_> = rows.into_iter().filter(|row| !row.is_blank()).collect();
        tracing::debug!("Kept {} non-blank rows from {}", data.len(), range);

        enter(QUERY, QueryStage::Done);
        Ok(PointRows { data })
    }

    /// Immobilized vehicles from the IMMO block.
    pub async fn immo(&self) -> Result<ImmoListing, AppError> {
        const QUERY: &str = "immo";

        let rows = match self
            .fetch_rows(QUERY, ranges::IMMO, RenderMode::Formatted)
            .await
        {
            Ok(rows) => rows,
            Err(AppError::NotFound(_)) => return Ok(ImmoListing::default()),
            Err(e) => return Err(e),
        };

        enter(QUERY, QueryStage::Normalizing);
        let data: Vec<ImmoEntry> = rows
            .iter()
            .filter(|row| !row.cell(0).is_whitespace())
            .map(|row| ImmoEntry {
                vehicle: row.text(0),
                status: row.text(1),
            })
            .collect();

        enter(QUERY, QueryStage::Done);
        Ok(ImmoListing {
            count: data.len(),
            data,
        })
    }

    /// Workbook metadata and a sample of the vehicle sheet.
    pub async fn diagnostics(&self) -> Result<Diagnostics, AppError> {
        const QUERY: &str = "diagnostics";

        enter(QUERY, QueryStage::Fetching);
        let metadata = self
            .client
            .spreadsheet_metadata()
            .await
            .map_err(|e| failed(QUERY, QueryStage::Fetching, e))?;
        let data = self
            .client
            .fetch_range(ranges::VEHICLE_SAMPLE, RenderMode::Formatted)
            .await
            .map_err(|e| failed(QUERY, QueryStage::Fetching, e))?;

        enter(QUERY, QueryStage::Done);
        Ok(Diagnostics {
            spreadsheet_title: metadata.title,
            sheet_names: metadata.sheet_names,
            data,
            spreadsheet_id: self.client.spreadsheet_id().map(str::to_string),
        })
    }
}
