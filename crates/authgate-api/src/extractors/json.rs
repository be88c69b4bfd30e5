//! JSON body extractors: `NormalizedJson` and `ValidatedJson`.

use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;
use serde::de::DeserializeOwned;
use validator::Validate;

use authgate_core::error::AppError;

use crate::dto::request::Normalize;
use crate::error::ApiError;

/// A JSON body that has passed [`Normalize`] but not yet validation.
///
/// For bodies whose rules need application state; the handler validates.
#[derive(Debug, Clone)]
pub struct NormalizedJson<T>(pub T);

impl<T, S> FromRequest<S> for NormalizedJson<T>
where
    T: DeserializeOwned + Normalize,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.normalize();
        Ok(Self(value))
    }
}

/// A JSON body that has passed [`Normalize`] and [`Validate`].
///
/// Malformed JSON and field-level failures both reject with 400.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Normalize + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let NormalizedJson(value) = NormalizedJson::<T>::from_request(req, state).await?;
        value.validate()?;

        Ok(Self(value))
    }
}

/// Maps body parse failures to a 400 with the parser's explanation.
pub fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError(AppError::validation(format!(
        "Invalid request body: {}",
        rejection.body_text()
    )))
}
