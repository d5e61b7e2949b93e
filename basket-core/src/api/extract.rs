//! Request extractors that turn framework rejections into `AppError`
//!
//! Handlers take `ValidatedJson<T>` / `ValidatedQuery<T>` instead of the
//! plain axum extractors, so every body and query string is deserialized and
//! checked against its `validator` rules before the handler runs.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::domain::StringUuid;
use crate::error::{AppError, FieldError};

/// JSON body, deserialized and validated
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        // Well-formed JSON of the wrong shape: missing field, wrong type, bad enum value
        JsonRejection::JsonDataError(e) => {
            AppError::Validation(vec![FieldError::new("body", e.body_text())])
        }
        JsonRejection::JsonSyntaxError(_) => {
            AppError::BadRequest("Malformed JSON body".to_string())
        }
        JsonRejection::MissingJsonContentType(_) => {
            AppError::BadRequest("Expected a JSON body (Content-Type: application/json)".to_string())
        }
        other => AppError::BadRequest(other.body_text()),
    }
}

/// Query string, deserialized and validated
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::Validation(vec![FieldError::new("query", rejection.body_text())])
}

/// Single `{id}` path segment parsed as a UUID
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub StringUuid);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;
        StringUuid::parse_str(&raw)
            .map(IdPath)
            .map_err(|_| AppError::BadRequest(format!("Invalid id: {}", raw)))
    }
}

fn path_rejection(rejection: PathRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
