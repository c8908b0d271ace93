use axum::http::StatusCode;
use serde::Deserialize;

pub mod authors;
pub mod publications;

/// `?id=` of the search boxes; absent and blank both mean "no search".
#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    pub id: Option<String>,
}

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
