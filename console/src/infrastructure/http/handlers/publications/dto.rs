use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use editorial_common::{EditorialStatus, Publication, PublicationKind};
use serde::Serialize;

use crate::domain::authors::AuthorNames;
use crate::domain::workflow::{PublicationBoard, TransitionDialog};

const NO_DATE: &str = "-";

/// Response for the publication list route
#[derive(Debug, Clone, Serialize)]
pub struct PublicationBoardResponse {
    data: Vec<PublicationRowResponse>,
    meta: MetadataResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataResponse {
    total: usize,
}

impl PublicationBoardResponse {
    pub fn new(board: PublicationBoard, names: &AuthorNames) -> Self {
        let data = board
            .publications
            .iter()
            .map(|publication| PublicationRowResponse::new(publication, names))
            .collect::<Vec<_>>();
        Self {
            meta: MetadataResponse { total: data.len() },
            data,
            error: board.error,
        }
    }
}

/// One table row: the author joined by name, the publication date only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationRowResponse {
    id: String,
    title: String,
    author_id: Option<String>,
    author: Option<String>,
    summary: String,
    tipo_publicacion: PublicationKind,
    category: String,
    status: EditorialStatus,
    published_on: String,
}

impl PartialEq for PublicationRowResponse {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl PublicationRowResponse {
    pub fn new(publication: &Publication, names: &AuthorNames) -> Self {
        Self {
            id: publication.id.to_string(),
            title: publication.title.clone(),
            author_id: publication.author_id.as_ref().map(ToString::to_string),
            author: author_name(publication, names),
            summary: publication.summary.clone(),
            tipo_publicacion: publication.kind.clone(),
            category: publication.category.clone(),
            status: publication.status,
            published_on: published_on(publication.published_at),
        }
    }
}

/// Full record for the detail dialog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationDetailResponse {
    id: String,
    title: String,
    author_id: Option<String>,
    author: Option<String>,
    summary: String,
    content: Option<String>,
    tipo_publicacion: PublicationKind,
    category: String,
    status: EditorialStatus,
    published_at: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl PublicationDetailResponse {
    pub fn new(publication: Publication, names: &AuthorNames) -> Self {
        Self {
            id: publication.id.to_string(),
            author: author_name(&publication, names),
            author_id: publication.author_id.as_ref().map(ToString::to_string),
            title: publication.title,
            summary: publication.summary,
            content: publication.content,
            tipo_publicacion: publication.kind,
            category: publication.category,
            status: publication.status,
            published_at: publication
                .published_at
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            extra: publication.extra,
        }
    }
}

/// Status dialog: current status pre-selected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDialogResponse {
    id: String,
    title: String,
    current: EditorialStatus,
    target: EditorialStatus,
    options: Vec<EditorialStatus>,
    pending: bool,
}

impl From<TransitionDialog> for TransitionDialogResponse {
    fn from(value: TransitionDialog) -> Self {
        Self {
            id: value.publication.id.to_string(),
            title: value.publication.title,
            current: value.publication.status,
            target: value.target,
            options: value.options,
            pending: value.pending,
        }
    }
}

/// Confirmation returned after a status change.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChangedResponse {
    message: &'static str,
    data: PublicationRowResponse,
}

impl StatusChangedResponse {
    pub fn new(data: PublicationRowResponse) -> Self {
        Self {
            message: "Editorial status updated",
            data,
        }
    }
}

fn author_name(publication: &Publication, names: &AuthorNames) -> Option<String> {
    publication
        .author_id
        .as_ref()
        .and_then(|id| names.name_of(id))
        .map(str::to_owned)
}

fn published_on(published_at: Option<DateTime<Utc>>) -> String {
    published_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}
