use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use editorial_common::AuthorDraft;

use crate::domain::AppState;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::SearchParams;
use crate::infrastructure::http::handlers::authors::dto::{AuthorBoardResponse, AuthorResponse};
use crate::infrastructure::http::querystring::QueryString;

mod dto;

pub async fn list_authors<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<AuthorBoardResponse>, ApiError> {
    let board = state.authors().list().await.unwrap_or_else(|err| {
        tracing::debug!("serving cached authors: {}", err);
        state.authors().board()
    });

    Ok(ApiSuccess::new(StatusCode::OK, AuthorBoardResponse::from(board)))
}

pub async fn create_author<S: AppState>(
    State(state): State<S>,
    Json(draft): Json<AuthorDraft>,
) -> Result<ApiSuccess<AuthorResponse>, ApiError> {
    let created = state.authors().create(&draft).await?;
    Ok(ApiSuccess::new(StatusCode::CREATED, AuthorResponse::from(created)))
}

pub async fn dismiss_authors_error<S: AppState>(State(state): State<S>) -> StatusCode {
    state.authors().dismiss_error();
    StatusCode::NO_CONTENT
}

pub async fn search_author<S: AppState>(
    QueryString(params): QueryString<SearchParams>,
    State(state): State<S>,
) -> Result<Response, ApiError> {
    let raw_id = params.id.unwrap_or_default();
    find(&state, &raw_id).await
}

pub async fn find_author_by_id<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<Response, ApiError> {
    find(&state, &id).await
}

pub async fn author_detail<S: AppState>(State(state): State<S>) -> Response {
    match state.authors().detail() {
        Some(author) => ApiSuccess::new(StatusCode::OK, AuthorResponse::from(author)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn close_author_detail<S: AppState>(State(state): State<S>) -> StatusCode {
    state.authors().close_detail();
    StatusCode::NO_CONTENT
}

async fn find<S: AppState>(state: &S, raw_id: &str) -> Result<Response, ApiError> {
    Ok(match state.authors().get_by_id(raw_id).await? {
        Some(author) => ApiSuccess::new(StatusCode::OK, AuthorResponse::from(author)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
