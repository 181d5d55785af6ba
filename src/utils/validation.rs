//! Input validation utilities

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use super::error::AppError;

/// JSON body that has been deserialized and validated
///
/// A body that is not valid JSON for `T` (including a missing required field)
/// is reported as a validation error, the same as a rule violation.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Parse an identifier taken from the request path.
///
/// `label` names the identifier in the error message, e.g. "organization ID".
pub fn parse_id(raw: &str, label: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request(format!("Invalid {}", label)))
}
