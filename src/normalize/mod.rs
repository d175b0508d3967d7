//! Row-to-domain normalization.
//!
//! Pure functions only: nothing in here performs I/O or returns an error.

mod aggregate;
mod coerce;
mod rows;

pub use aggregate::*;
pub use rows::*;
