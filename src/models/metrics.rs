//! Summary metrics read from the "Point" sheets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Category, RawRow};

/// A coerced spreadsheet number: integers stay integers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Default for Numeric {
    fn default() -> Self {
        Numeric::Int(0)
    }
}

/// Status discriminators counted on the summary sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusLabel {
    Mc,
    Fc,
    FranceServ,
}

/// The two summary sheets of the workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSheet {
    Fs,
    Mc,
}

impl PointSheet {
    pub fn name(&self) -> &'static str {
        match self {
            PointSheet::Fs => "Point FS",
            PointSheet::Mc => "Point MC",
        }
    }

    /// Bucket that "dispo" labels on this sheet count towards.
    pub fn available_category(&self) -> Category {
        match self {
            PointSheet::Fs => Category::DisponibleFs,
            PointSheet::Mc => Category::DisponibleMc,
        }
    }
}

/// Aggregate counters built from one summary sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub active_drivers: Numeric,
    pub total_vehicles: Numeric,
    pub available_vehicles: Numeric,
    pub category_counts: BTreeMap<Category, Numeric>,
    pub status_counts: BTreeMap<StatusLabel, Numeric>,
    pub vehicle_types: Vec<String>,
    pub weekly_departures: Numeric,
    pub daily_departures: Numeric,
    pub weekly_stops: Numeric,
    pub daily_stops: Numeric,
    pub ca_week: Numeric,
    pub ca_day: Numeric,
}

impl MetricSnapshot {
    /// An all-zero snapshot for `sheet`.
    pub fn empty(sheet: PointSheet) -> Self {
        let category_counts = [
            Category::Flotte,
            Category::Chauffeur,
            Category::Transco,
            sheet.available_category(),
        ]
        .into_iter()
        .map(|c| (c, Numeric::default()))
        .collect();

        let status_counts = [StatusLabel::Mc, StatusLabel::Fc, StatusLabel::FranceServ]
            .into_iter()
            .map(|s| (s, Numeric::default()))
            .collect();

        Self {
            active_drivers: Numeric::default(),
            total_vehicles: Numeric::default(),
            available_vehicles: Numeric::default(),
            category_counts,
            status_counts,
            vehicle_types: Vec::new(),
            weekly_departures: Numeric::default(),
            daily_departures: Numeric::default(),
            weekly_stops: Numeric::default(),
            daily_stops: Numeric::default(),
            ca_week: Numeric::default(),
            ca_day: Numeric::default(),
        }
    }
}

/// Snapshots of both summary sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDashboard {
    pub point_fs: MetricSnapshot,
    pub point_mc: MetricSnapshot,
}

/// Non-blank rows of a summary sheet's table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointRows {
    pub data: Vec<RawRow>,
}
