//! Request body extractors that reject with [`ApiError`].

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use weather_core::FromPayload;

use crate::error::ApiError;

/// JSON body whose rejections render as problem details.
#[derive(Debug, Clone)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// JSON body that was checked against `T`'s constraints before the handler
/// runs. Invalid bodies never reach the handler.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T, S> FromRequest<S> for Validated<T>
where
    T: FromPayload,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let AppJson(payload) = AppJson::<T::Payload>::from_request(req, state).await?;

        let value = T::from_payload(payload).inspect_err(|failure| {
            tracing::debug!(%failure, "Rejected request body");
        })?;

        Ok(Self(value))
    }
}
