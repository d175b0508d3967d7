//! Aggregation of sheet rows into dashboard counters.

use super::coerce::{coerce, fold_label};
use super::rows::VehicleLayout;
use crate::models::{Category, MetricSnapshot, PointSheet, RawRow, VehicleStats};

/// Label fragments that identify a vehicle model row.
const VEHICLE_TYPE_KEYWORDS: &[&str] = &[
    "chr", "corolla", "kona", "model 3", "swace", "auris", "isuzu",
];

/// Fold `[label, value, ...]` rows of a summary sheet into a snapshot.
///
/// Category keywords are checked independently of each other and of the
/// metric rules, so one row may feed several fields. Within the metric rules
/// only the first matching rule applies. A later row matching the same field
/// overwrites the earlier value.
pub fn aggregate_metrics(rows: &[RawRow], sheet: PointSheet) -> MetricSnapshot {
    let mut snapshot = MetricSnapshot::empty(sheet);

    for row in rows {
        if row.len() < 2 {
            continue;
        }

        let original_label = row.text(0);
        let label = fold_label(&original_label);
        let value = coerce(row.cell(1));

        let category_keywords = [
            ("flotte", Category::Flotte),
            ("chauffeur", Category::Chauffeur),
            ("transco", Category::Transco),
            ("dispo", sheet.available_category()),
        ];
        for (keyword, category) in category_keywords {
            if label.contains(keyword) {
                snapshot.category_counts.insert(category, value);
            }
        }

        let has = |keyword: &str| label.contains(keyword);

        if has("chauffeur") && has("actif") {
            snapshot.active_drivers = value;
        } else if has("vehicule") && has("total") {
            snapshot.total_vehicles = value;
        } else if has("vehicule") && has("dispo") {
            snapshot.available_vehicles = value;
        } else if VEHICLE_TYPE_KEYWORDS.iter().any(|k| has(*k)) {
            if !snapshot.vehicle_types.contains(&original_label) {
                snapshot.vehicle_types.push(original_label);
            }
        } else if has("depart") && has("semaine") {
            snapshot.weekly_departures = value;
        } else if has("depart") && has("jour") {
            snapshot.daily_departures = value;
        } else if has("stop") && has("semaine") {
            snapshot.weekly_stops = value;
        } else if has("stop") && has("jour") {
            snapshot.daily_stops = value;
        } else if has("ca s-1") {
            snapshot.ca_week = value;
        } else if label.starts_with("ca") && !has("semaine") {
            snapshot.ca_day = value;
        }
    }

    tracing::debug!("Aggregated {} rows from {}", rows.len(), sheet.name());
    snapshot
}

/// Normalize vehicle rows per `layout` and count them.
pub fn tally_vehicles(rows: &[RawRow], layout: VehicleLayout) -> VehicleStats {
    let mut stats = VehicleStats::default();
    for vehicle in layout.normalize(rows) {
        stats.record(&vehicle);
    }
    stats
}
