//! Vehicle records and their category tags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category bucket a vehicle is listed under.
///
/// Serialized as the lower snake case key used by the front end
/// (`flotte`, `disponible_fs`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Flotte,
    Chauffeur,
    Transco,
    DisponibleFs,
    DisponibleMc,
    Immo,
    Gestionnaire,
    Gratuit,
}

impl Category {
    /// Upper-case tag name, as written in the workbook.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Flotte => "FLOTTE",
            Category::Chauffeur => "CHAUFFEUR",
            Category::Transco => "TRANSCO",
            Category::DisponibleFs => "DISPONIBLE_FS",
            Category::DisponibleMc => "DISPONIBLE_MC",
            Category::Immo => "IMMO",
            Category::Gestionnaire => "GESTIONNAIRE",
            Category::Gratuit => "GRATUIT",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle listed in the workbook.
///
/// `status` is free text copied from the sheet; only the category is a closed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub registration: String,
    pub fleet_code: String,
    pub service_label: String,
    pub status: String,
    pub mc_fc: String,
    pub category: Category,
}

impl Vehicle {
    /// A vehicle read from a category block, where only type, registration
    /// and status are known.
    pub fn in_block(
        category: Category,
        vehicle_type: impl Into<String>,
        registration: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            vehicle_type: vehicle_type.into(),
            registration: registration.into(),
            fleet_code: String::new(),
            service_label: String::new(),
            status: status.into(),
            mc_fc: String::new(),
            category,
        }
    }
}

/// Counters over a list of vehicles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStats {
    pub total: u64,
    pub by_type: BTreeMap<String, u64>,
    pub by_category: BTreeMap<Category, u64>,
    pub by_status: BTreeMap<String, u64>,
}

impl VehicleStats {
    /// Count one vehicle. Empty statuses are not tallied.
    pub fn record(&mut self, vehicle: &Vehicle) {
        self.total += 1;
        *self.by_type.entry(vehicle.vehicle_type.clone()).or_default() += 1;
        *self.by_category.entry(vehicle.category).or_default() += 1;
        if !vehicle.status.is_empty() {
            *self.by_status.entry(vehicle.status.clone()).or_default() += 1;
        }
    }
}

/// Response body of the vehicle listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclesResponse {
    pub categories: BTreeMap<Category, Vec<Vehicle>>,
    pub success: bool,
    pub generated_at: String,
}

/// One row of the immobilized-vehicle listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmoEntry {
    pub vehicle: String,
    pub status: String,
}

/// Immobilized vehicles as listed in the IMMO block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmoListing {
    pub count: usize,
    pub data: Vec<ImmoEntry>,
}
