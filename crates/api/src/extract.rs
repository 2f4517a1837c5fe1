//! Request extractors shared by every handler.
//!
//! - [`DbSession`] acquires an admission-gated database session for the
//!   lifetime of the handler.
//! - [`NormalizedJson`] parses a record body, canonicalizes its temporal
//!   fields, then deserializes and validates it into a typed DTO.

use std::ops::{Deref, DerefMut};

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use fishsense_core::normalize::{normalize_for, TemporalSchema};
use fishsense_db::Session;
use serde::de::DeserializeOwned;
use sqlx::PgConnection;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;
use crate::state::AppState;

/// One database session per request. Released when the handler returns,
/// fails, or is cancelled by the request timeout.
pub struct DbSession(pub Session);

impl FromRequestParts<AppState> for DbSession {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(DbSession(state.sessions.acquire().await?))
    }
}

impl Deref for DbSession {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        &self.0
    }
}

impl DerefMut for DbSession {
    fn deref_mut(&mut self) -> &mut PgConnection {
        &mut self.0
    }
}

/// JSON body normalized against `T`'s [`TemporalSchema`] before typing.
///
/// Rejections:
/// - malformed JSON or wrong content type: 400
/// - a field of the wrong shape, or an unparseable timestamp: 422 naming it
/// - a failed `validator` rule: 422 naming the first offending field
pub struct NormalizedJson<T>(pub T);

impl<T, S> FromRequest<S> for NormalizedJson<T>
where
    T: DeserializeOwned + TemporalSchema + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        decode_record(raw).map(NormalizedJson)
    }
}

/// Normalize, deserialize and validate one raw record.
///
/// Used directly by handlers whose body schema depends on a path segment.
pub fn decode_record<T>(raw: serde_json::Value) -> Result<T, AppError>
where
    T: DeserializeOwned + TemporalSchema + Validate,
{
    let normalized = normalize_for::<T>(raw);
    let value: T = serde_path_to_error::deserialize(normalized).map_err(|err| {
        AppError::Unprocessable {
            field: err.path().to_string(),
            message: err.inner().to_string(),
        }
    })?;

    value.validate().map_err(|errors| first_violation(&errors))?;
    Ok(value)
}

/// Report the alphabetically first failing field, so responses are stable.
fn first_violation(errors: &ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let Some((field, violations)) = fields.into_iter().next() else {
        return AppError::Unprocessable {
            field: String::new(),
            message: errors.to_string(),
        };
    };
    let message = violations
        .first()
        .map(|violation| match &violation.message {
            Some(message) => message.to_string(),
            None => format!("failed `{}` check", violation.code),
        })
        .unwrap_or_else(|| "invalid value".to_string());

    AppError::Unprocessable {
        field: field.to_string(),
        message,
    }
}
