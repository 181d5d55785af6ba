//! Utility functions and helpers

pub mod error;
pub mod validation;

pub use error::{AppError, AppResult, ErrorResponse};
pub use validation::{parse_id, ValidatedJson};
