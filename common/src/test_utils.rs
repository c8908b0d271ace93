use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    Author, AuthorId, EditorialStatus, IdentificationType, Publication, PublicationId,
    PublicationKind,
};

/// Builds a publication record the way the publication service returns it.
///
/// Public so that other crates can reuse it for their own tests.
pub fn make_publication(id: &str, author_id: &str, status: EditorialStatus) -> Publication {
    Publication {
        id: PublicationId::try_new(id).unwrap(),
        title: format!("Title of {id}"),
        author_id: AuthorId::try_new(author_id).ok(),
        summary: format!("Summary of {id}"),
        content: Some(format!("Body of {id}")),
        kind: PublicationKind::Article,
        category: "science".to_string(),
        status,
        published_at: None,
        extra: BTreeMap::new(),
    }
}

/// Convenience for a published record carrying its server-side timestamp.
pub fn make_published(id: &str, author_id: &str, published_at: DateTime<Utc>) -> Publication {
    Publication {
        published_at: Some(published_at),
        ..make_publication(id, author_id, EditorialStatus::Published)
    }
}

/// Builds an author record the way the author service returns it.
pub fn make_author(id: &str, first_name: &str, last_name: &str) -> Author {
    Author {
        id: AuthorId::try_new(id).unwrap(),
        identification_type: IdentificationType::NationalId,
        identification: format!("ID-{id}"),
        nationality: "Ecuadorian".to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@example.org", first_name.to_lowercase()),
        phone: "0999999999".to_string(),
        biography: None,
        literary_genre: "Essay".to_string(),
    }
}

pub fn publication_id(id: &str) -> PublicationId {
    PublicationId::try_new(id).unwrap()
}

pub fn author_id(id: &str) -> AuthorId {
    AuthorId::try_new(id).unwrap()
}
