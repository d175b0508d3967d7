//! Raw spreadsheet cells, rows and grids as returned by the cell-grid client.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A single raw cell value.
///
/// Sheets returns `null`, numbers, booleans or strings depending on the
/// render mode; nothing else is a valid cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(serde_json::Number),
    Bool(bool),
    Text(String),
}

impl Cell {
    /// Blank cells are absent values and empty strings.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(_) | Cell::Bool(_) => false,
        }
    }

    /// Blank, or text made only of whitespace.
    pub fn is_whitespace(&self) -> bool {
        match self {
            Cell::Text(s) => s.trim().is_empty(),
            other => other.is_blank(),
        }
    }

    /// The cell rendered as text, the way a spreadsheet user would read it.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value.into())
    }
}

impl TryFrom<serde_json::Value> for Cell {
    type Error = AppError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Ok(Cell::Empty),
            serde_json::Value::Number(n) => Ok(Cell::Number(n)),
            serde_json::Value::Bool(b) => Ok(Cell::Bool(b)),
            serde_json::Value::String(s) => Ok(Cell::Text(s)),
            other => Err(AppError::RowParse(format!(
                "unsupported cell value: {}",
                other
            ))),
        }
    }
}

/// One spreadsheet row. Meaning is assigned purely by column offset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(Vec<Cell>);

static EMPTY_CELL: Cell = Cell::Empty;

impl RawRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cell at `index`, or an empty cell past the end of the row.
    pub fn cell(&self, index: usize) -> &Cell {
        self.0.get(index).unwrap_or(&EMPTY_CELL)
    }

    /// Text of the cell at `index`, or `""` past the end of the row.
    pub fn text(&self, index: usize) -> String {
        self.cell(index).as_text()
    }

    /// True when no cell carries any content.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(Cell::is_whitespace)
    }

    /// Build a row from raw JSON values, rejecting nested arrays and objects.
    pub fn try_from_values(values: Vec<serde_json::Value>) -> Result<Self, AppError> {
        values
            .into_iter()
            .map(Cell::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(RawRow)
    }
}

impl<C: Into<Cell>> FromIterator<C> for RawRow {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        RawRow(iter.into_iter().map(Into::into).collect())
    }
}

/// The rows returned for one range.
pub type Grid = Vec<RawRow>;

/// Convert a raw `values` payload into a grid.
///
/// A row that cannot be represented is logged and dropped; it never aborts
/// the rest of the grid.
pub fn grid_from_values(range: &str, values: Vec<Vec<serde_json::Value>>) -> Grid {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match RawRow::try_from_values(row) {
            Ok(row) => Some(row),
            Err(e) => {
                tracing::warn!("Skipping row {} of {}: {}", index, range, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_deserialize_variants() {
        let row: RawRow = serde_json::from_value(json!([null, 5, 2.5, true, "CHR"])).unwrap();
        assert_eq!(row.cell(0), &Cell::Empty);
        assert_eq!(row.text(1), "5");
        assert_eq!(row.text(2), "2.5");
        assert_eq!(row.text(3), "TRUE");
        assert_eq!(row.text(4), "CHR");
    }

    #[test]
    fn test_get_or_default_past_end() {
        let row = RawRow::from_iter(["a"]);
        assert_eq!(row.cell(7), &Cell::Empty);
        assert_eq!(row.text(7), "");
    }

    #[test]
    fn test_blank_rows() {
        assert!(RawRow::from_iter(["", "  "]).is_blank());
        assert!(RawRow::default().is_blank());
        assert!(!RawRow::new(vec![Cell::Empty, Cell::from(0)]).is_blank());
    }

    #[test]
    fn test_grid_skips_nested_values() {
        let grid = grid_from_values(
            "'Point FS'!A1:D50",
            vec![
                vec![json!("ok"), json!(1)],
                vec![json!({"nested": true})],
                vec![json!("also ok")],
            ],
        );
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1].text(0), "also ok");
    }
}
