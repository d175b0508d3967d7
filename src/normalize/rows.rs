//! Row normalizer: turns vehicle sheet rows into [`Vehicle`] records.
//!
//! Two sheet shapes are supported. Flat rows hold one vehicle per row and the
//! category is read from the row content. Segmented rows come from a wide grid
//! where each category owns a fixed block of columns, so one row can carry
//! several vehicles.

use std::str::FromStr;

use super::coerce::parse_type_and_registration;
use crate::models::{Category, RawRow, Vehicle};

/// How a block of columns describes a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Type and registration in two adjacent cells, status in the third.
    Triple,
    /// Type and registration in two adjacent cells, fixed status.
    Pair { status: &'static str },
    /// One `"TYPE (REGISTRATION)"` cell, fixed status.
    Single { status: &'static str },
}

/// A category block in the segmented vehicle grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub category: Category,
    /// Zero-based offset of the block's first column within the fetched range.
    pub offset: usize,
    pub kind: SegmentKind,
}

impl Segment {
    const fn new(category: Category, offset: usize, kind: SegmentKind) -> Self {
        Self {
            category,
            offset,
            kind,
        }
    }

    /// The vehicle this block holds on `row`, if the block is populated.
    pub fn extract(&self, row: &RawRow) -> Option<Vehicle> {
        let first = row.cell(self.offset);
        let second = row.cell(self.offset + 1);

        match self.kind {
            SegmentKind::Triple => {
                if first.is_blank() || second.is_blank() {
                    return None;
                }
                Some(Vehicle::in_block(
                    self.category,
                    first.as_text(),
                    second.as_text(),
                    row.text(self.offset + 2),
                ))
            }
            SegmentKind::Pair { status } => {
                if first.is_blank() || second.is_blank() {
                    return None;
                }
                let (vehicle_type, registration) = (first.as_text(), second.as_text());
                if vehicle_type.trim() == "0" || registration.trim() == "0" {
                    return None;
                }
                Some(Vehicle::in_block(
                    self.category,
                    vehicle_type,
                    registration,
                    status,
                ))
            }
            SegmentKind::Single { status } => {
                let raw = first.as_text();
                if first.is_blank() || raw.trim() == "0" {
                    return None;
                }
                let (vehicle_type, registration) = parse_type_and_registration(&raw);
                if vehicle_type.is_empty() || registration.is_empty() {
                    return None;
                }
                Some(Vehicle::in_block(
                    self.category,
                    vehicle_type,
                    registration,
                    status,
                ))
            }
        }
    }
}

/// Column blocks of the `VÉHICULE` sheet, starting at column A.
pub const STANDARD_SEGMENTS: &[Segment] = &[
    Segment::new(Category::Flotte, 0, SegmentKind::Triple),
    Segment::new(Category::Chauffeur, 3, SegmentKind::Triple),
    Segment::new(Category::Transco, 6, SegmentKind::Triple),
    Segment::new(
        Category::DisponibleFs,
        13,
        SegmentKind::Single {
            status: "Disponible FS",
        },
    ),
    Segment::new(
        Category::DisponibleMc,
        16,
        SegmentKind::Single {
            status: "Disponible MC",
        },
    ),
    Segment::new(Category::Immo, 19, SegmentKind::Pair { status: "IMMO" }),
];

/// Standard blocks plus the manager (J–L) and free-use (W–Y) blocks.
pub const EXTENDED_SEGMENTS: &[Segment] = &[
    Segment::new(Category::Flotte, 0, SegmentKind::Triple),
    Segment::new(Category::Chauffeur, 3, SegmentKind::Triple),
    Segment::new(Category::Transco, 6, SegmentKind::Triple),
    Segment::new(Category::Gestionnaire, 9, SegmentKind::Triple),
    Segment::new(
        Category::DisponibleFs,
        13,
        SegmentKind::Single {
            status: "Disponible FS",
        },
    ),
    Segment::new(
        Category::DisponibleMc,
        16,
        SegmentKind::Single {
            status: "Disponible MC",
        },
    ),
    Segment::new(Category::Immo, 19, SegmentKind::Pair { status: "IMMO" }),
    Segment::new(Category::Gratuit, 22, SegmentKind::Triple),
];

/// Which shape the vehicle sheet is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VehicleLayout {
    /// Wide grid A–U, one column block per category.
    #[default]
    Segmented,
    /// Wide grid A–Y with the manager and free-use blocks.
    Extended,
    /// One vehicle per row, category derived from service and status.
    Flat,
}

impl VehicleLayout {
    /// Range fetched for this layout.
    pub fn range(&self) -> &'static str {
        match self {
            VehicleLayout::Segmented => "'VÉHICULE'!A2:U1000",
            VehicleLayout::Extended => "'VÉHICULE'!A2:Y1000",
            VehicleLayout::Flat => "'VÉHICULE'!A2:G1000",
        }
    }

    /// Categories listed in the vehicles response, in display order.
    pub fn categories(&self) -> Vec<Category> {
        match self {
            VehicleLayout::Segmented => STANDARD_SEGMENTS.iter().map(|s| s.category).collect(),
            VehicleLayout::Extended => EXTENDED_SEGMENTS.iter().map(|s| s.category).collect(),
            VehicleLayout::Flat => vec![Category::Flotte, Category::Chauffeur, Category::Transco],
        }
    }

    /// Normalize fetched rows into vehicles.
    pub fn normalize(&self, rows: &[RawRow]) -> Vec<Vehicle> {
        match self {
            VehicleLayout::Segmented => normalize_segmented_rows(rows, STANDARD_SEGMENTS),
            VehicleLayout::Extended => normalize_segmented_rows(rows, EXTENDED_SEGMENTS),
            VehicleLayout::Flat => normalize_flat_rows(rows),
        }
    }
}

impl FromStr for VehicleLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "segmented" => Ok(VehicleLayout::Segmented),
            "extended" => Ok(VehicleLayout::Extended),
            "flat" => Ok(VehicleLayout::Flat),
            other => Err(format!("unknown vehicle layout: {}", other)),
        }
    }
}

/// Category of a flat row: the service label wins over the status column.
fn flat_category(service_label: &str, status: &str) -> Category {
    if service_label.contains("FRANCE SERV") {
        return Category::Chauffeur;
    }
    let status = status.to_uppercase();
    if status.contains("MC") || status.contains("FC") {
        Category::Transco
    } else {
        Category::Flotte
    }
}

/// Normalize one-vehicle-per-row data.
///
/// Rows shorter than six cells are skipped. The result is sorted by category
/// tag name, then type.
pub fn normalize_flat_rows(rows: &[RawRow]) -> Vec<Vehicle> {
    let mut vehicles: Vec<Vehicle> = rows
        .iter()
        .filter(|row| row.len() >= 6)
        .map(|row| {
            let service_label = row.text(4);
            let status = row.text(5);
            Vehicle {
                vehicle_type: row.text(0),
                registration: row.text(2),
                fleet_code: row.text(1),
                category: flat_category(&service_label, &status),
                service_label,
                status,
                mc_fc: row.text(6),
            }
        })
        .collect();

    vehicles.sort_by(|a, b| {
        a.category
            .as_str()
            .cmp(b.category.as_str())
            .then_with(|| a.vehicle_type.cmp(&b.vehicle_type))
    });

    tracing::debug!("Parsed {} flat vehicle rows", vehicles.len());
    vehicles
}

/// Normalize a wide grid where each category owns a block of columns.
///
/// Output is grouped by segment in `segments` order; within a segment, row
/// order is preserved.
pub fn normalize_segmented_rows(rows: &[RawRow], segments: &[Segment]) -> Vec<Vehicle> {
    let vehicles: Vec<Vehicle> = segments
        .iter()
        .flat_map(|segment| rows.iter().filter_map(move |row| segment.extract(row)))
        .collect();

    tracing::debug!(
        "Parsed {} vehicles from {} segmented rows",
        vehicles.len(),
        rows.len()
    );
    vehicles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;

    fn row(cells: &[&str]) -> RawRow {
        RawRow::from_iter(cells.iter().copied())
    }

    /// A row of the wide grid with the given (column, value) cells set.
    fn wide_row(cells: &[(usize, &str)]) -> RawRow {
        let mut values = vec![Cell::Empty; 21];
        for (col, value) in cells {
            values[*col] = Cell::from(*value);
        }
        RawRow::new(values)
    }

    #[test]
    fn test_flat_france_serv_wins_over_status() {
        let rows = [row(&[
            "KONA",
            "C12",
            "AB-123",
            "",
            "FRANCE SERV QUELQUECHOSE",
            "MC",
            "x",
        ])];
        let vehicles = normalize_flat_rows(&rows);
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].category, Category::Chauffeur);
        assert_eq!(vehicles[0].fleet_code, "C12");
        assert_eq!(vehicles[0].registration, "AB-123");
        assert_eq!(vehicles[0].mc_fc, "x");
    }

    #[test]
    fn test_flat_status_any_case_is_transco() {
        let rows = [row(&["KONA", "C12", "AB-123", "", "LIVRAISON", "mc"])];
        let vehicles = normalize_flat_rows(&rows);
        assert_eq!(vehicles[0].category, Category::Transco);
        assert_eq!(vehicles[0].mc_fc, "");
    }

    #[test]
    fn test_flat_france_serv_is_case_sensitive() {
        let rows = [row(&["KONA", "C12", "AB-123", "", "france serv", ""])];
        assert_eq!(normalize_flat_rows(&rows)[0].category, Category::Flotte);
    }

    #[test]
    fn test_flat_short_rows_skipped() {
        let rows = [row(&["KONA", "C12", "AB-123", "", "FRANCE SERV"])];
        assert!(normalize_flat_rows(&rows).is_empty());
    }

    #[test]
    fn test_flat_sorted_by_category_then_type() {
        let rows = [
            row(&["SWACE", "1", "R1", "", "", ""]),
            row(&["AURIS", "2", "R2", "", "", "FC"]),
            row(&["COROLLA", "3", "R3", "", "FRANCE SERV", ""]),
            row(&["CHR", "4", "R4", "", "", ""]),
        ];
        let order: Vec<(Category, String)> = normalize_flat_rows(&rows)
            .into_iter()
            .map(|v| (v.category, v.vehicle_type))
            .collect();
        assert_eq!(
            order,
            vec![
                (Category::Chauffeur, "COROLLA".to_string()),
                (Category::Flotte, "CHR".to_string()),
                (Category::Flotte, "SWACE".to_string()),
                (Category::Transco, "AURIS".to_string()),
            ]
        );
    }

    #[test]
    fn test_segmented_flotte_and_immo_on_one_row() {
        let rows = [wide_row(&[
            (0, "KONA"),
            (1, "AB-123"),
            (2, "OK"),
            (19, "CHR"),
            (20, "GG441SX"),
        ])];
        let vehicles = normalize_segmented_rows(&rows, STANDARD_SEGMENTS);
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].category, Category::Flotte);
        assert_eq!(vehicles[0].status, "OK");
        assert_eq!(vehicles[1].category, Category::Immo);
        assert_eq!(vehicles[1].status, "IMMO");
    }

    #[test]
    fn test_segmented_requires_first_two_cells() {
        let rows = [wide_row(&[(3, "KONA"), (5, "MC")])];
        assert!(normalize_segmented_rows(&rows, STANDARD_SEGMENTS).is_empty());
    }

    #[test]
    fn test_single_cell_segment() {
        let zero = [wide_row(&[(13, "0")])];
        assert!(normalize_segmented_rows(&zero, STANDARD_SEGMENTS).is_empty());

        let blank = [wide_row(&[(13, "")])];
        assert!(normalize_segmented_rows(&blank, STANDARD_SEGMENTS).is_empty());

        let filled = [wide_row(&[(13, "CHR (X1)")])];
        let vehicles = normalize_segmented_rows(&filled, STANDARD_SEGMENTS);
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].vehicle_type, "CHR");
        assert_eq!(vehicles[0].registration, "X1");
        assert_eq!(vehicles[0].category, Category::DisponibleFs);
        assert_eq!(vehicles[0].status, "Disponible FS");
    }

    #[test]
    fn test_single_cell_without_registration_skipped() {
        let rows = [wide_row(&[(16, "CHR")])];
        assert!(normalize_segmented_rows(&rows, STANDARD_SEGMENTS).is_empty());
    }

    #[test]
    fn test_immo_rejects_zero_cells() {
        let rows = [wide_row(&[(19, "CHR"), (20, " 0 ")])];
        assert!(normalize_segmented_rows(&rows, STANDARD_SEGMENTS).is_empty());
    }

    #[test]
    fn test_segmented_groups_by_category_preserving_row_order() {
        let rows = [
            wide_row(&[(3, "SWACE"), (4, "R1"), (0, "KONA"), (1, "R2")]),
            wide_row(&[(0, "AURIS"), (1, "R3")]),
        ];
        let vehicles = normalize_segmented_rows(&rows, STANDARD_SEGMENTS);
        let types: Vec<&str> = vehicles.iter().map(|v| v.vehicle_type.as_str()).collect();
        assert_eq!(types, vec!["KONA", "AURIS", "SWACE"]);
    }

    #[test]
    fn test_short_rows_never_panic() {
        let rows = [row(&["KONA"]), RawRow::default()];
        assert!(normalize_segmented_rows(&rows, EXTENDED_SEGMENTS).is_empty());
    }

    #[test]
    fn test_extended_blocks() {
        let mut values = vec![Cell::Empty; 25];
        values[9] = Cell::from("ISUZU");
        values[10] = Cell::from("GE-1");
        values[22] = Cell::from("KONA");
        values[23] = Cell::from("GR-1");
        values[24] = Cell::from("prêt");
        let vehicles = VehicleLayout::Extended.normalize(&[RawRow::new(values)]);
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].category, Category::Gestionnaire);
        assert_eq!(vehicles[1].category, Category::Gratuit);
        assert_eq!(vehicles[1].status, "prêt");
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("Flat".parse::<VehicleLayout>(), Ok(VehicleLayout::Flat));
        assert_eq!(
            " extended ".parse::<VehicleLayout>(),
            Ok(VehicleLayout::Extended)
        );
        assert!("diagonal".parse::<VehicleLayout>().is_err());
    }
}
