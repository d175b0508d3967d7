//! REST API module.
//!
//! Thin handlers over the query service; every failure becomes the JSON error body.

mod dashboard;
mod diagnostics;
mod points;
mod vehicles;

pub use dashboard::*;
pub use diagnostics::*;
pub use points::*;
pub use vehicles::*;

use axum::Json;

use crate::errors::AppError;

/// Response type that can be either a JSON payload or an error body.
pub type ApiResult<T> = Result<Json<T>, AppError>;
