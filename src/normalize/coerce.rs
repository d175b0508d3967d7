//! Cell coercion helpers.
//!
//! Everything here is fail-soft: messy spreadsheet input degrades to a zero
//! or an empty string, never to an error.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Cell, Numeric};

/// Coerce a raw cell into a number.
///
/// Text is read with French formatting in mind: `€` markers and all
/// whitespace (including no-break thousands separators) are removed and a
/// decimal comma becomes a period.
pub fn coerce(cell: &Cell) -> Numeric {
    match cell {
        Cell::Empty | Cell::Bool(_) => Numeric::default(),
        Cell::Number(n) => n
            .as_i64()
            .map(Numeric::Int)
            .or_else(|| n.as_f64().map(Numeric::Float))
            .unwrap_or_default(),
        Cell::Text(s) => coerce_text(s),
    }
}

fn coerce_text(raw: &str) -> Numeric {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '€' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.contains('.') {
        match cleaned.parse::<f64>() {
            Ok(f) if f.is_finite() => Numeric::Float(f),
            _ => Numeric::default(),
        }
    } else {
        cleaned.parse::<i64>().map(Numeric::Int).unwrap_or_default()
    }
}

/// Split a cell like `"CHR (GG441SX)"` into type and registration.
///
/// Input without both parentheses comes back unchanged with an empty
/// registration.
pub fn parse_type_and_registration(raw: &str) -> (String, String) {
    if !raw.contains('(') || !raw.contains(')') {
        return (raw.to_string(), String::new());
    }

    let mut parts = raw.split('(');
    let vehicle_type = parts.next().unwrap_or_default().trim().to_string();
    let registration = parts
        .next()
        .unwrap_or_default()
        .replace(')', "")
        .trim()
        .to_string();

    (vehicle_type, registration)
}

/// Lower-case a sheet label and strip diacritics for keyword matching.
///
/// Labels are decomposed first, so precomposed and combining-mark spellings
/// fold to the same text.
pub fn fold_label(raw: &str) -> String {
    raw.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
