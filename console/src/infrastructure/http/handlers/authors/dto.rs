use editorial_common::{Author, IdentificationType};
use serde::Serialize;

use crate::domain::authors::AuthorBoard;

/// Response for the author list route
#[derive(Debug, Clone, Serialize)]
pub struct AuthorBoardResponse {
    data: Vec<AuthorResponse>,
    meta: MetadataResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataResponse {
    total: usize,
}

impl From<AuthorBoard> for AuthorBoardResponse {
    fn from(value: AuthorBoard) -> Self {
        let data = value
            .authors
            .into_iter()
            .map(AuthorResponse::from)
            .collect::<Vec<_>>();
        Self {
            meta: MetadataResponse { total: data.len() },
            data,
            error: value.error,
        }
    }
}

/// One author, wire field names kept and the display name added.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    id: String,
    display_name: String,
    tipo_identificacion: IdentificationType,
    identificacion: String,
    nacionalidad: String,
    nombre: String,
    apellido: String,
    email: String,
    telefono: String,
    biografia: Option<String>,
    genero_literario: String,
}

impl PartialEq for AuthorResponse {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl From<Author> for AuthorResponse {
    fn from(value: Author) -> Self {
        Self {
            id: value.id.to_string(),
            display_name: value.display_name(),
            tipo_identificacion: value.identification_type,
            identificacion: value.identification,
            nacionalidad: value.nationality,
            nombre: value.first_name,
            apellido: value.last_name,
            email: value.email,
            telefono: value.phone,
            biografia: value.biography,
            genero_literario: value.literary_genre,
        }
    }
}
