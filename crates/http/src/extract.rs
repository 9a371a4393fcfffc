//! Request body extraction that accepts JSON or urlencoded forms.

use std::convert::Infallible;

use axum::{
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde::de::DeserializeOwned;

/// Body extractor that never rejects.
///
/// `application/json` bodies are decoded as JSON; anything else is decoded as
/// an urlencoded form. A missing or undecodable body yields `T::default()`, so
/// handlers see absent fields instead of an extractor rejection.
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let decoded = if is_json(&req) {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|rejection| rejection.body_text())
        } else {
            Form::<T>::from_request(req, state)
                .await
                .map(|Form(value)| value)
                .map_err(|rejection| rejection.body_text())
        };

        Ok(Self(decoded.unwrap_or_else(|reason| {
            tracing::debug!(%reason, "request body not decodable; treating as empty");
            T::default()
        })))
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"))
}
