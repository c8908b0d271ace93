use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use editorial_common::{EditorialStatus, PublicationDraft, PublicationId};
use serde::Deserialize;

use crate::domain::AppState;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::publications::dto::{
    PublicationBoardResponse, PublicationDetailResponse, PublicationRowResponse,
    StatusChangedResponse, TransitionDialogResponse,
};
use crate::infrastructure::http::handlers::SearchParams;
use crate::infrastructure::http::querystring::QueryString;

mod dto;

#[derive(Deserialize, Debug)]
pub struct StatusParams {
    pub status: String,
}

/// Reloads the list. A failed reload still answers with the rows already
/// held, the banner carries the failure.
pub async fn list_publications<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<PublicationBoardResponse>, ApiError> {
    let (board, names) = futures::join!(
        state.publications().list(),
        state.authors().author_names()
    );
    let board = board.unwrap_or_else(|err| {
        tracing::debug!("serving cached publications: {}", err);
        state.publications().board()
    });

    Ok(ApiSuccess::new(
        StatusCode::OK,
        PublicationBoardResponse::new(board, &names),
    ))
}

pub async fn create_publication<S: AppState>(
    State(state): State<S>,
    Json(draft): Json<PublicationDraft>,
) -> Result<ApiSuccess<PublicationDetailResponse>, ApiError> {
    let created = state.publications().create(&draft).await?;
    let names = state.authors().author_names().await;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        PublicationDetailResponse::new(created, &names),
    ))
}

pub async fn dismiss_publications_error<S: AppState>(State(state): State<S>) -> StatusCode {
    state.publications().dismiss_error();
    StatusCode::NO_CONTENT
}

pub async fn search_publication<S: AppState>(
    QueryString(params): QueryString<SearchParams>,
    State(state): State<S>,
) -> Result<Response, ApiError> {
    let raw_id = params.id.unwrap_or_default();
    find(&state, &raw_id).await
}

pub async fn find_publication_by_id<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<Response, ApiError> {
    find(&state, &id).await
}

pub async fn publication_detail<S: AppState>(State(state): State<S>) -> Response {
    let Some(publication) = state.publications().detail() else {
        return StatusCode::NO_CONTENT.into_response();
    };
    let names = state.authors().author_names().await;

    ApiSuccess::new(
        StatusCode::OK,
        PublicationDetailResponse::new(publication, &names),
    )
    .into_response()
}

pub async fn close_publication_detail<S: AppState>(State(state): State<S>) -> StatusCode {
    state.publications().close_detail();
    StatusCode::NO_CONTENT
}

pub async fn open_transition<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<TransitionDialogResponse>, ApiError> {
    let id = parse_id(id)?;
    let dialog = state.publications().open_transition(&id)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TransitionDialogResponse::from(dialog),
    ))
}

pub async fn change_status<S: AppState>(
    Path(id): Path<String>,
    QueryString(params): QueryString<StatusParams>,
    State(state): State<S>,
) -> Result<ApiSuccess<StatusChangedResponse>, ApiError> {
    let id = parse_id(id)?;
    let target = EditorialStatus::from_str(&params.status)
        .map_err(|err| ApiError::UnprocessableEntity(err.to_string()))?;

    let updated = state.publications().transition(&id, target).await?;
    let names = state.authors().author_names().await;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        StatusChangedResponse::new(PublicationRowResponse::new(&updated, &names)),
    ))
}

async fn find<S: AppState>(state: &S, raw_id: &str) -> Result<Response, ApiError> {
    let Some(publication) = state.publications().get_by_id(raw_id).await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    let names = state.authors().author_names().await;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        PublicationDetailResponse::new(publication, &names),
    )
    .into_response())
}

fn parse_id(id: String) -> Result<PublicationId, ApiError> {
    PublicationId::try_new(id).map_err(|err| ApiError::UnprocessableEntity(err.to_string()))
}
