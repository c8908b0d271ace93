use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_querystring::ParseMode;

use crate::infrastructure::http::api::ApiError;

/// Query string extractor backed by `serde-querystring`.
///
/// Repeated keys keep the last value. A query that does not fit `T` is
/// rejected with `400` and the usual JSON error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryString<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryString<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        serde_querystring::from_str(query, ParseMode::UrlEncoded)
            .map(QueryString)
            .map_err(|err| ApiError::BadRequest(format!("Invalid query string: {err}")))
    }
}

impl<T> Deref for QueryString<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
